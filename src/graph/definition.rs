// SPDX-License-Identifier: MIT

//! Rendering a graph to a JSONata state-language definition

use serde_json::{json, Map, Value};

use super::fragment::{Chainable, StateId};
use super::state::{State, StateKind};
use super::state_graph::StateGraph;
use crate::error::GraphError;

pub const QUERY_LANGUAGE: &str = "JSONata";

impl StateGraph {
    /// Render every state reachable from `start` as a definition document
    pub fn to_definition(
        &self,
        start: &impl Chainable,
        comment: Option<&str>,
    ) -> Result<Value, GraphError> {
        let start_id = start.start_state();
        let reachable = self.reachable_states(start_id)?;

        let mut states = Map::new();
        for id in &reachable {
            let state = self.state(*id)?;
            states.insert(state.name().to_string(), self.render_state(state)?);
        }

        let mut doc = Map::new();
        if let Some(comment) = comment {
            doc.insert("Comment".into(), json!(comment));
        }
        doc.insert("QueryLanguage".into(), json!(QUERY_LANGUAGE));
        doc.insert("StartAt".into(), json!(self.state(start_id)?.name()));
        doc.insert("States".into(), Value::Object(states));

        log::debug!("Rendered definition with {} states", reachable.len());
        Ok(Value::Object(doc))
    }

    fn name_of(&self, id: StateId) -> Result<Value, GraphError> {
        Ok(json!(self.state(id)?.name()))
    }

    fn render_state(&self, state: &State) -> Result<Value, GraphError> {
        let mut out = Map::new();
        out.insert("Type".into(), json!(state.kind().type_name()));

        match state.kind() {
            StateKind::Pass(pass) => {
                insert_opt(&mut out, "Comment", pass.comment.as_ref().map(|c| json!(c)));
                insert_assign(&mut out, &pass.assign);
                insert_opt(&mut out, "Output", pass.outputs.clone());
            }
            StateKind::Task(task) => {
                insert_opt(&mut out, "Comment", task.comment.as_ref().map(|c| json!(c)));
                out.insert("Resource".into(), json!(task.resource()));
                insert_opt(&mut out, "Arguments", task.parameters.clone());
                insert_assign(&mut out, &task.assign);
                insert_opt(&mut out, "Output", task.outputs.clone());
                if !task.catches().is_empty() {
                    let mut catches = Vec::with_capacity(task.catches().len());
                    for catch in task.catches() {
                        let mut c = Map::new();
                        c.insert("ErrorEquals".into(), json!(catch.errors));
                        c.insert("Next".into(), self.name_of(catch.next)?);
                        insert_opt(&mut c, "Output", catch.outputs.clone());
                        catches.push(Value::Object(c));
                    }
                    out.insert("Catch".into(), Value::Array(catches));
                }
            }
            StateKind::Choice(choice) => {
                insert_opt(&mut out, "Comment", choice.comment.as_ref().map(|c| json!(c)));
                let mut rules = Vec::with_capacity(choice.rules.len());
                for rule in &choice.rules {
                    rules.push(json!({
                        "Condition": rule.condition.to_template(),
                        "Next": self.name_of(rule.next)?,
                    }));
                }
                out.insert("Choices".into(), Value::Array(rules));
                if let Some(default) = choice.otherwise {
                    out.insert("Default".into(), self.name_of(default)?);
                }
            }
            StateKind::Fail(fail) => {
                insert_opt(&mut out, "Comment", fail.comment.as_ref().map(|c| json!(c)));
                insert_opt(&mut out, "Error", fail.error.as_ref().map(|e| json!(e)));
                insert_opt(&mut out, "Cause", fail.cause.as_ref().map(|c| json!(c)));
            }
        }

        if state.is_nextable() {
            match state.next() {
                Some(next) => {
                    out.insert("Next".into(), self.name_of(next)?);
                }
                None => {
                    out.insert("End".into(), json!(true));
                }
            }
        }
        Ok(Value::Object(out))
    }
}

fn insert_opt(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value);
    }
}

fn insert_assign(out: &mut Map<String, Value>, assign: &Map<String, Value>) {
    if !assign.is_empty() {
        out.insert("Assign".into(), Value::Object(assign.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CatchProps, Condition, Fail, Pass, Task};

    #[test]
    fn test_renders_linear_chain() {
        let mut graph = StateGraph::new();
        let get = graph
            .add_task(
                "GetBucketTagging",
                Task::aws_sdk("s3", "getBucketTagging")
                    .parameters(json!({"Bucket": "{% $ResourceProperties.BucketName %}"})),
            )
            .unwrap();
        let done = graph.add_pass("Done", Pass::new()).unwrap();
        let flow = graph
            .chain(&graph.fragment(get).unwrap(), &graph.fragment(done).unwrap())
            .unwrap();

        let def = graph.to_definition(&flow, Some("demo")).unwrap();
        assert_eq!(
            def,
            json!({
                "Comment": "demo",
                "QueryLanguage": "JSONata",
                "StartAt": "GetBucketTagging",
                "States": {
                    "GetBucketTagging": {
                        "Type": "Task",
                        "Resource": "arn:aws:states:::aws-sdk:s3:getBucketTagging",
                        "Arguments": {"Bucket": "{% $ResourceProperties.BucketName %}"},
                        "Next": "Done"
                    },
                    "Done": {"Type": "Pass", "End": true}
                }
            })
        );
    }

    #[test]
    fn test_renders_choice_catch_and_fail() {
        let mut graph = StateGraph::new();
        let revoke = graph
            .add_task("RevokeEgress", Task::aws_sdk("ec2", "revokeSecurityGroupEgress"))
            .unwrap();
        let check = graph.add_choice("RevokeEgressCatch").unwrap();
        let fail = graph
            .add_fail(
                "Fail",
                Fail::new()
                    .error("{% $states.input.Error %}")
                    .cause("{% $states.input.Cause %}"),
            )
            .unwrap();
        let ok = graph.add_pass("Ignore", Pass::new()).unwrap();
        graph
            .when(
                check,
                Condition::contains("$states.input.Cause", "does not exist"),
                &graph.fragment(ok).unwrap(),
            )
            .unwrap();
        graph.otherwise(check, &graph.fragment(fail).unwrap()).unwrap();
        graph
            .add_catch(
                revoke,
                &graph.fragment(check).unwrap(),
                CatchProps::default().outputs("{% $states.errorOutput %}"),
            )
            .unwrap();

        let def = graph.to_definition(&graph.fragment(revoke).unwrap(), None).unwrap();
        let states = &def["States"];
        assert!(def.get("Comment").is_none());
        assert_eq!(states["RevokeEgress"]["End"], json!(true));
        assert_eq!(
            states["RevokeEgress"]["Catch"],
            json!([{
                "ErrorEquals": ["States.ALL"],
                "Next": "RevokeEgressCatch",
                "Output": "{% $states.errorOutput %}"
            }])
        );
        assert_eq!(
            states["RevokeEgressCatch"],
            json!({
                "Type": "Choice",
                "Choices": [{
                    "Condition": "{% $contains($states.input.Cause, \"does not exist\") %}",
                    "Next": "Ignore"
                }],
                "Default": "Fail"
            })
        );
        assert_eq!(
            states["Fail"],
            json!({
                "Type": "Fail",
                "Error": "{% $states.input.Error %}",
                "Cause": "{% $states.input.Cause %}"
            })
        );
    }
}
