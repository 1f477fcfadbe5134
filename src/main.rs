use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use lambdaless_flow::flow::FlowBuilder;
use lambdaless_flow::jsonata::states;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a flow definition file as a JSONata state machine definition
    Render {
        /// Path to the flow file
        #[arg(short, long)]
        file: String,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },
    /// List the well-known $states expressions
    States,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Render { file, compact } => {
            let built = FlowBuilder::new()
                .build_from_file(&file)
                .with_context(|| format!("Failed to build flow from {}", file))?;
            log::info!("Rendering flow '{}'", built.name);

            let definition = built.definition()?;
            let rendered = if compact {
                serde_json::to_string(&definition)?
            } else {
                serde_json::to_string_pretty(&definition)?
            };
            println!("{}", rendered);
        }
        Commands::States => {
            let s = states();
            let execution = &s.context.execution;
            let state = &s.context.state;
            let machine = &s.context.state_machine;
            let lines = [
                ("input", s.input.to_string()),
                ("result", s.result.to_string()),
                ("error_output", s.error_output.to_string()),
                ("error_output.error", s.error_output.error.to_string()),
                ("error_output.cause", s.error_output.cause.to_string()),
                ("context", s.context.to_string()),
                ("context.execution", execution.to_string()),
                ("context.execution.id", execution.id.to_string()),
                ("context.execution.input", execution.input.to_string()),
                ("context.execution.name", execution.name.to_string()),
                ("context.execution.role_arn", execution.role_arn.to_string()),
                ("context.execution.start_time", execution.start_time.to_string()),
                ("context.execution.redrive_count", execution.redrive_count.to_string()),
                ("context.execution.redrive_time", execution.redrive_time.to_string()),
                ("context.state", state.to_string()),
                ("context.state.entered_time", state.entered_time.to_string()),
                ("context.state.name", state.name.to_string()),
                ("context.state.retry_count", state.retry_count.to_string()),
                ("context.state_machine", machine.to_string()),
                ("context.state_machine.id", machine.id.to_string()),
                ("context.state_machine.name", machine.name.to_string()),
                ("context.task", s.context.task.to_string()),
                ("context.task.token", s.context.task.token.to_string()),
            ];
            for (key, expr) in lines {
                println!("{:<34} {}", key, expr);
            }
        }
    }

    Ok(())
}
