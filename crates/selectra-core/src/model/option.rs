// ── Option identity and list items ──
//
// OptionValue is the opaque identifier every comparison is keyed on.
// SelectOption pairs it with a label and metadata; ListItem allows
// options to arrive grouped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved value meaning "select every option in the flat list".
pub const SELECT_ALL_VALUE: &str = "__selectra_select_all__";

// ── OptionValue ─────────────────────────────────────────────────────

/// Opaque option identifier, compared by equality only.
///
/// Accepts both integer and string identifiers so JSON lists from
/// either kind of backend deserialize without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Text(String),
}

impl OptionValue {
    /// The select-all sentinel.
    pub fn select_all() -> Self {
        Self::Text(SELECT_ALL_VALUE.to_owned())
    }

    pub fn is_select_all(&self) -> bool {
        matches!(self, Self::Text(s) if s == SELECT_ALL_VALUE)
    }

    /// An empty string is never a valid selection.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

// ── SelectOption ────────────────────────────────────────────────────

/// A single selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: OptionValue,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_label: Option<String>,

    /// Disabled options cannot be picked, and disabled selections cannot
    /// be removed by backspace, chip removal or "deselect all".
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    /// Set on placeholders for selected values missing from the list.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_orphan_value: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl SelectOption {
    pub fn new(value: impl Into<OptionValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            secondary_label: None,
            disabled: false,
            is_orphan_value: false,
        }
    }

    /// Placeholder for a value that has no matching list entry.
    pub fn orphan(value: OptionValue) -> Self {
        Self {
            value,
            label: String::new(),
            secondary_label: None,
            disabled: false,
            is_orphan_value: true,
        }
    }

    #[must_use]
    pub fn with_secondary_label(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_label = Some(secondary.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

// ── ListItem ────────────────────────────────────────────────────────

/// An entry of a possibly-nested option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Group {
        label: String,
        options: Vec<SelectOption>,
    },
    Option(SelectOption),
}

impl From<SelectOption> for ListItem {
    fn from(option: SelectOption) -> Self {
        Self::Option(option)
    }
}

/// Remove group structure, keeping options in display order.
pub fn flatten_list(items: &[ListItem]) -> Vec<SelectOption> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ListItem::Option(option) => flat.push(option.clone()),
            ListItem::Group { options, .. } => flat.extend(options.iter().cloned()),
        }
    }
    flat
}
