// SPDX-License-Identifier: MIT

//! Arena holding every state of a workflow under construction

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use super::condition::{evaluate, Condition};
use super::fragment::{push_unique, Chainable, Fragment, StateId};
use super::state::{Catch, CatchProps, Choice, ChoiceRule, Fail, Pass, Selection, State, StateKind, Task};
use crate::error::GraphError;

/// Owns states and the transitions between them.
///
/// State names are unique within one graph. Independent graphs share
/// nothing, so separate assemblies can run on separate threads.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    states: Vec<State>,
    names: HashMap<String, StateId>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `name` is free to be used for a new state
    pub fn is_name_available(&self, name: &str) -> bool {
        !self.names.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    pub fn state(&self, id: StateId) -> Result<&State, GraphError> {
        self.states.get(id.0).ok_or(GraphError::UnknownState(id.0))
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State, GraphError> {
        self.states.get_mut(id.0).ok_or(GraphError::UnknownState(id.0))
    }

    fn add_state(&mut self, name: String, kind: StateKind) -> Result<StateId, GraphError> {
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateStateName(name));
        }
        let id = StateId(self.states.len());
        log::trace!("Adding {} state '{}'", kind.type_name(), name);
        self.names.insert(name.clone(), id);
        self.states.push(State {
            name,
            kind,
            next: None,
        });
        Ok(id)
    }

    pub fn add_pass(&mut self, name: impl Into<String>, pass: Pass) -> Result<StateId, GraphError> {
        self.add_state(name.into(), StateKind::Pass(pass))
    }

    pub fn add_choice(&mut self, name: impl Into<String>) -> Result<StateId, GraphError> {
        self.add_state(name.into(), StateKind::Choice(Choice::default()))
    }

    pub fn add_task(&mut self, name: impl Into<String>, task: Task) -> Result<StateId, GraphError> {
        self.add_state(name.into(), StateKind::Task(task))
    }

    pub fn add_fail(&mut self, name: impl Into<String>, fail: Fail) -> Result<StateId, GraphError> {
        self.add_state(name.into(), StateKind::Fail(fail))
    }

    /// Default fragment for a single state.
    ///
    /// Pass and Task states end at themselves, Fail states have no ends and
    /// a Choice ends wherever its branches terminate.
    pub fn fragment(&self, id: StateId) -> Result<Fragment, GraphError> {
        let state = self.state(id)?;
        let ends = match state.kind {
            StateKind::Pass(_) | StateKind::Task(_) => vec![id],
            StateKind::Fail(_) => vec![],
            StateKind::Choice(_) => self.reachable_end_states(id)?,
        };
        Ok(Fragment::new(id, ends))
    }

    /// Set the `next` transition of `from`
    pub fn set_next(&mut self, from: StateId, to: StateId) -> Result<(), GraphError> {
        self.state(to)?;
        let state = self.state_mut(from)?;
        if !state.is_nextable() {
            return Err(GraphError::NotNextable(state.name.clone()));
        }
        if state.next.is_some() {
            return Err(GraphError::AlreadyHasNext(state.name.clone()));
        }
        state.next = Some(to);
        Ok(())
    }

    /// Continue every end of `first` with `then`.
    ///
    /// Either all ends are wired or none are.
    pub fn chain(
        &mut self,
        first: &impl Chainable,
        then: &impl Chainable,
    ) -> Result<Fragment, GraphError> {
        let ends = first.end_states();
        if ends.is_empty() {
            let start = self.state(first.start_state())?;
            return Err(GraphError::NotNextable(start.name.clone()));
        }
        self.state(then.start_state())?;
        for end in ends {
            let state = self.state(*end)?;
            if !state.is_nextable() {
                return Err(GraphError::NotNextable(state.name.clone()));
            }
            if state.next.is_some() {
                return Err(GraphError::AlreadyHasNext(state.name.clone()));
            }
        }
        for end in ends {
            self.set_next(*end, then.start_state())?;
        }
        Ok(Fragment::new(first.start_state(), then.end_states().to_vec()))
    }

    fn choice_mut(&mut self, choice: StateId) -> Result<&mut Choice, GraphError> {
        let state = self.state_mut(choice)?;
        match &mut state.kind {
            StateKind::Choice(c) => Ok(c),
            _ => Err(GraphError::NotAChoice(state.name.clone())),
        }
    }

    /// Add a rule to a Choice state, evaluated after existing rules
    pub fn when(
        &mut self,
        choice: StateId,
        condition: Condition,
        target: &impl Chainable,
    ) -> Result<(), GraphError> {
        let next = target.start_state();
        self.state(next)?;
        self.choice_mut(choice)?
            .rules
            .push(ChoiceRule { condition, next });
        Ok(())
    }

    /// Set the default branch of a Choice state
    pub fn otherwise(&mut self, choice: StateId, target: &impl Chainable) -> Result<(), GraphError> {
        let next = target.start_state();
        self.state(next)?;
        self.choice_mut(choice)?.otherwise = Some(next);
        Ok(())
    }

    /// Route errors raised by a Task state to `handler`
    pub fn add_catch(
        &mut self,
        task: StateId,
        handler: &impl Chainable,
        props: CatchProps,
    ) -> Result<(), GraphError> {
        let next = handler.start_state();
        self.state(next)?;
        let state = self.state_mut(task)?;
        match &mut state.kind {
            StateKind::Task(t) => {
                t.catches.push(Catch {
                    errors: props.errors,
                    next,
                    outputs: props.outputs,
                });
                Ok(())
            }
            _ => Err(GraphError::NotCatchable(state.name.clone())),
        }
    }

    /// Every state reachable from `start`, error handlers included, in
    /// depth-first order
    pub fn reachable_states(&self, start: StateId) -> Result<Vec<StateId>, GraphError> {
        self.state(start)?;
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            let successors = self.state(id)?.successors();
            stack.extend(successors.into_iter().rev());
        }
        Ok(order)
    }

    /// Reachable states that could still be continued with `next`
    pub fn reachable_end_states(&self, start: StateId) -> Result<Vec<StateId>, GraphError> {
        let mut ends = Vec::new();
        for id in self.reachable_states(start)? {
            let state = self.state(id)?;
            if state.is_nextable() && state.next.is_none() {
                push_unique(&mut ends, &[id]);
            }
        }
        Ok(ends)
    }

    /// Prefix the name of every state reachable from `fragment`'s start.
    ///
    /// Used to nest several copies of one fragment in a single graph. Nothing
    /// is renamed if any new name would collide with an existing state.
    pub fn prefix_states(&mut self, fragment: &impl Chainable, prefix: &str) -> Result<(), GraphError> {
        let ids = self.reachable_states(fragment.start_state())?;
        let renamed: HashSet<StateId> = ids.iter().copied().collect();

        let mut new_names = Vec::with_capacity(ids.len());
        for id in &ids {
            let new_name = format!("{}{}", prefix, self.state(*id)?.name);
            if let Some(owner) = self.names.get(&new_name) {
                if !renamed.contains(owner) {
                    return Err(GraphError::DuplicateStateName(new_name));
                }
            }
            new_names.push(new_name);
        }

        for id in &ids {
            let old = self.state(*id)?.name.clone();
            self.names.remove(&old);
        }
        for (id, new_name) in ids.iter().zip(new_names) {
            self.names.insert(new_name.clone(), *id);
            self.state_mut(*id)?.name = new_name;
        }
        log::debug!("Prefixed {} states with '{}'", ids.len(), prefix);
        Ok(())
    }

    /// Probe which branch a Choice state would take for `variables`
    pub fn select(
        &self,
        choice: StateId,
        variables: &Map<String, Value>,
    ) -> Result<Selection, GraphError> {
        let state = self.state(choice)?;
        let StateKind::Choice(c) = &state.kind else {
            return Err(GraphError::NotAChoice(state.name.clone()));
        };
        for (index, rule) in c.rules.iter().enumerate() {
            match evaluate(&rule.condition, variables) {
                Some(true) => return Ok(Selection::Rule(index, rule.next)),
                Some(false) => continue,
                None => return Ok(Selection::Undecidable(index)),
            }
        }
        Ok(match c.otherwise {
            Some(next) => Selection::Otherwise(next),
            None => Selection::NoMatch,
        })
    }
}
