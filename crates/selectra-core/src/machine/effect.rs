use serde::Serialize;

use super::{EventSource, SelectState};
use crate::model::{SelectedOptions, Value};

/// Extra data delivered with every change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtraParams {
    pub source: EventSource,
    /// The selection came from free-text entry rather than the list.
    pub created: bool,
    /// Keyboard-originated single-select change; the host may deliver it
    /// one tick later.
    pub deferred: bool,
}

/// Side effect requested by a transition. Controllers apply effects in
/// order, so `SetInputValue` always lands before the `Change` it precedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetInputValue(String),
    SetSelected(Option<SelectedOptions>),
    /// Re-run list filtering (or fetching) for this query.
    Search(String),
    Change {
        value: Value,
        selected: Option<SelectedOptions>,
        extra: ExtraParams,
    },
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SelectState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub(crate) fn state_only(state: SelectState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub(crate) fn new(state: SelectState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    /// The emitted change, if any.
    pub fn change(&self) -> Option<(&Value, &ExtraParams)> {
        self.effects.iter().find_map(|e| match e {
            Effect::Change { value, extra, .. } => Some((value, extra)),
            _ => None,
        })
    }
}
