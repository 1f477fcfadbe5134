// SPDX-License-Identifier: MIT

//! Graph fragments: one entry state, zero or more exit states

/// Opaque handle to a state owned by a [`StateGraph`](super::StateGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Anything with a single entry state and a set of exit states
pub trait Chainable {
    fn start_state(&self) -> StateId;

    /// States a following fragment would be attached to
    fn end_states(&self) -> &[StateId];

    fn to_fragment(&self) -> Fragment {
        Fragment::new(self.start_state(), self.end_states().to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    start: StateId,
    ends: Vec<StateId>,
}

impl Fragment {
    pub fn new(start: StateId, ends: Vec<StateId>) -> Self {
        Self { start, ends }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn ends(&self) -> &[StateId] {
        &self.ends
    }
}

impl Chainable for Fragment {
    fn start_state(&self) -> StateId {
        self.start
    }

    fn end_states(&self) -> &[StateId] {
        &self.ends
    }
}

/// Append `ids` to `into`, skipping handles already present
pub(crate) fn push_unique(into: &mut Vec<StateId>, ids: &[StateId]) {
    for id in ids {
        if !into.contains(id) {
            into.push(*id);
        }
    }
}
