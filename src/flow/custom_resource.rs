// SPDX-License-Identifier: MIT

//! Create / Update / Delete dispatch for custom resource workflows
//!
//! [`CustomResourceFlow`] puts an `Initialize` pass state in front of a
//! three-way choice. `Initialize` copies the standard lifecycle event fields
//! into variables (`$RequestType`, `$ResourceProperties`, ...) and the
//! choice routes on `$RequestType` to the caller's branch fragments.
//!
//! ```text
//! Initialize -> Which Request Type? -+- "Create" -> on_create (or on_update, or no-op)
//!                                    +- "Update" -> on_update (or no-op)
//!                                    +- "Delete" -> on_delete (or no-op)
//! ```
//!
//! There is no default branch. An unrecognized request type matches no rule
//! and the executor fails the run with `States.NoChoiceMatched`.

use std::fmt;

use crate::error::{FlowError, GraphError};
use crate::graph::{Chainable, Condition, Fragment, Pass, StateGraph, StateId};
use crate::jsonata::{exists_or_null, states, template};

pub const INITIALIZE_STATE: &str = "Initialize";
pub const DISPATCH_STATE: &str = "Which Request Type?";

/// Variable holding the lifecycle kind, as captured by `Initialize`
pub const REQUEST_TYPE_VARIABLE: &str = "RequestType";

/// Event fields captured by `Initialize`; `true` marks fields that may be
/// absent from the event and fall back to `null`
const CAPTURED_FIELDS: [(&str, bool); 8] = [
    ("RequestType", false),
    ("StackId", false),
    ("RequestId", false),
    ("ResourceType", false),
    ("LogicalResourceId", false),
    ("PhysicalResourceId", true),
    ("ResourceProperties", false),
    ("OldResourceProperties", true),
];

/// Lifecycle kinds a custom resource event can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub const ALL: [RequestType; 3] = [RequestType::Create, RequestType::Update, RequestType::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Branch behaviours for a [`CustomResourceFlow`]
#[derive(Debug, Clone, Default)]
pub struct CustomResourceFlowProps {
    /// Runs on Create. Defaults to `on_update`, then to a no-op.
    pub on_create: Option<Fragment>,
    /// Runs on Update. Defaults to a no-op.
    pub on_update: Option<Fragment>,
    /// Runs on Delete. Defaults to a no-op.
    pub on_delete: Option<Fragment>,
}

impl CustomResourceFlowProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(mut self, fragment: &impl Chainable) -> Self {
        self.on_create = Some(fragment.to_fragment());
        self
    }

    pub fn on_update(mut self, fragment: &impl Chainable) -> Self {
        self.on_update = Some(fragment.to_fragment());
        self
    }

    pub fn on_delete(mut self, fragment: &impl Chainable) -> Self {
        self.on_delete = Some(fragment.to_fragment());
        self
    }
}

/// Assembled lifecycle dispatch fragment
#[derive(Debug, Clone)]
pub struct CustomResourceFlow {
    initialize: StateId,
    dispatch: StateId,
    on_create: Fragment,
    on_update: Fragment,
    on_delete: Fragment,
    ends: Vec<StateId>,
}

impl CustomResourceFlow {
    /// Add the dispatch front matter to `graph` and wire it to the branches.
    ///
    /// Fails with [`FlowError::Configuration`] when no branch is given.
    pub fn new(graph: &mut StateGraph, props: CustomResourceFlowProps) -> Result<Self, FlowError> {
        let CustomResourceFlowProps {
            on_create,
            on_update,
            on_delete,
        } = props;

        if on_create.is_none() && on_update.is_none() && on_delete.is_none() {
            return Err(FlowError::configuration(
                "At least one of on_create, on_update or on_delete must be specified",
            ));
        }

        // Check every name up front so a clash leaves the graph untouched.
        let mut names = vec![INITIALIZE_STATE, DISPATCH_STATE];
        if on_create.is_none() && on_update.is_none() {
            names.push(RequestType::Create.as_str());
        }
        if on_update.is_none() {
            names.push(RequestType::Update.as_str());
        }
        if on_delete.is_none() {
            names.push(RequestType::Delete.as_str());
        }
        if let Some(taken) = names.iter().find(|n| !graph.is_name_available(n)) {
            return Err(GraphError::DuplicateStateName(taken.to_string()).into());
        }
        for fragment in [&on_create, &on_update, &on_delete].into_iter().flatten() {
            graph.state(fragment.start_state())?;
            for end in fragment.end_states() {
                graph.state(*end)?;
            }
        }

        log::debug!(
            "Assembling custom resource flow (create: {}, update: {}, delete: {})",
            describe(&on_create, on_update.as_ref().map(|_| "update")),
            describe(&on_update, None),
            describe(&on_delete, None),
        );

        let on_create = match on_create.or_else(|| on_update.clone()) {
            Some(fragment) => fragment,
            None => noop(graph, RequestType::Create)?,
        };
        let on_update = match on_update {
            Some(fragment) => fragment,
            None => noop(graph, RequestType::Update)?,
        };
        let on_delete = match on_delete {
            Some(fragment) => fragment,
            None => noop(graph, RequestType::Delete)?,
        };

        let dispatch = graph.add_choice(DISPATCH_STATE)?;
        for (request_type, target) in [
            (RequestType::Create, &on_create),
            (RequestType::Update, &on_update),
            (RequestType::Delete, &on_delete),
        ] {
            graph.when(dispatch, request_type_is(request_type), target)?;
        }

        let initialize = graph.add_pass(INITIALIZE_STATE, initialize_pass())?;
        graph.set_next(initialize, dispatch)?;

        let mut ends = Vec::new();
        for fragment in [&on_create, &on_update, &on_delete] {
            for end in fragment.end_states() {
                if !ends.contains(end) {
                    ends.push(*end);
                }
            }
        }

        Ok(Self {
            initialize,
            dispatch,
            on_create,
            on_update,
            on_delete,
            ends,
        })
    }

    /// The `Initialize` pass state (the entry point)
    pub fn initialize_state(&self) -> StateId {
        self.initialize
    }

    /// The `Which Request Type?` choice state
    pub fn dispatch_state(&self) -> StateId {
        self.dispatch
    }

    /// Fragment the dispatch routes `request_type` to, after defaulting
    pub fn branch(&self, request_type: RequestType) -> &Fragment {
        match request_type {
            RequestType::Create => &self.on_create,
            RequestType::Update => &self.on_update,
            RequestType::Delete => &self.on_delete,
        }
    }

    /// Prefix every state of this flow, branches included, so another copy
    /// can live in the same graph
    pub fn prefix_states(&self, graph: &mut StateGraph, prefix: &str) -> Result<(), GraphError> {
        graph.prefix_states(self, prefix)
    }
}

impl Chainable for CustomResourceFlow {
    fn start_state(&self) -> StateId {
        self.initialize
    }

    fn end_states(&self) -> &[StateId] {
        &self.ends
    }
}

/// `$RequestType = "<kind>"`
pub fn request_type_is(request_type: RequestType) -> Condition {
    Condition::equals(
        format!("${}", REQUEST_TYPE_VARIABLE),
        request_type.as_str(),
    )
}

fn initialize_pass() -> Pass {
    let input = &states().input;
    CAPTURED_FIELDS
        .iter()
        .fold(Pass::new(), |pass, (field, optional)| {
            let source = input.field(*field);
            let expr = if *optional {
                template(exists_or_null(&source))
            } else {
                template(&source)
            };
            pass.assign(*field, expr)
        })
}

fn noop(graph: &mut StateGraph, request_type: RequestType) -> Result<Fragment, GraphError> {
    let id = graph.add_pass(request_type.as_str(), Pass::new())?;
    graph.fragment(id)
}

fn describe(given: &Option<Fragment>, fallback: Option<&'static str>) -> &'static str {
    match (given, fallback) {
        (Some(_), _) => "given",
        (None, Some(fallback)) => fallback,
        (None, None) => "no-op",
    }
}
