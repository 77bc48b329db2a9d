// ── Selected options ──
//
// Cached lookup results for the current value. Always derived from the
// value and the flat list, never edited independently of them.

use serde::{Deserialize, Serialize};

use super::{OptionValue, SelectOption};

/// The option(s) backing the current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedOptions {
    Single(SelectOption),
    Multi(Vec<SelectOption>),
}

impl SelectedOptions {
    pub fn as_slice(&self) -> &[SelectOption] {
        match self {
            Self::Single(option) => std::slice::from_ref(option),
            Self::Multi(options) => options,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Most recently selected option.
    pub fn last(&self) -> Option<&SelectOption> {
        self.as_slice().last()
    }

    pub fn contains(&self, value: &OptionValue) -> bool {
        self.as_slice().iter().any(|o| &o.value == value)
    }

    pub fn find(&self, value: &OptionValue) -> Option<&SelectOption> {
        self.as_slice().iter().find(|o| &o.value == value)
    }

    /// Label shown in the search input for single-select.
    pub fn single_label(&self) -> Option<&str> {
        match self {
            Self::Single(option) => Some(option.label.as_str()),
            Self::Multi(_) => None,
        }
    }
}

/// Display state of the "select all" toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllState {
    #[default]
    Unchecked,
    Indeterminate,
    Checked,
}
