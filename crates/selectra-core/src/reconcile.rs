// ── Value reconciliation helpers ──
//
// Pure conversions between the external `Value` and the `SelectedOptions`
// looked up in the flat list. Empty strings, `Null` and `Undefined` are
// all "no value"; unmatched identifiers survive as orphan placeholders.

use crate::diagnostics::Diagnostics;
use crate::model::{OptionValue, SelectAllState, SelectOption, SelectedOptions, Value};

/// `true` for an absent identifier or an empty string.
pub fn is_invalid_value(value: Option<&OptionValue>) -> bool {
    value.is_none_or(OptionValue::is_empty_text)
}

/// Lookup options for [`construct_selected_options_from_value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructOptions {
    pub is_multi: bool,
    /// Report identifiers that are valid but absent from the list.
    pub check_for_invalid_value: bool,
}

/// Resolve `value` against `list`.
///
/// Single-select yields one option, or an orphan placeholder when the
/// identifier is valid but unknown, or `None` when the identifier itself
/// is invalid. Multi-select maps every entry independently and only
/// yields `None` for an empty selection.
pub fn construct_selected_options_from_value(
    value: &Value,
    list: &[SelectOption],
    options: ConstructOptions,
    diagnostics: &dyn Diagnostics,
) -> Option<SelectedOptions> {
    let identifiers = value.identifiers();

    if options.is_multi {
        if identifiers.is_empty() {
            return None;
        }
        let selected = identifiers
            .iter()
            .map(|id| lookup_or_orphan(id, list, options, diagnostics))
            .collect();
        return Some(SelectedOptions::Multi(selected));
    }

    let id = identifiers.first();
    if is_invalid_value(id) {
        return None;
    }
    id.map(|id| SelectedOptions::Single(lookup_or_orphan(id, list, options, diagnostics)))
}

fn lookup_or_orphan(
    id: &OptionValue,
    list: &[SelectOption],
    options: ConstructOptions,
    diagnostics: &dyn Diagnostics,
) -> SelectOption {
    if let Some(found) = list.iter().find(|o| &o.value == id) {
        return found.clone();
    }
    if options.check_for_invalid_value && !is_invalid_value(Some(id)) {
        diagnostics.orphan_value(id);
    }
    SelectOption::orphan(id.clone())
}

/// Inverse of [`construct_selected_options_from_value`].
///
/// Single-select reports `Null` (never `Undefined`) when nothing is
/// selected; multi-select reports an empty array.
pub fn get_value_from_selected_options(
    selected: Option<&SelectedOptions>,
    is_multi: bool,
) -> Value {
    if is_multi {
        return Value::Many(
            selected
                .map(|s| s.as_slice().iter().map(|o| o.value.clone()).collect())
                .unwrap_or_default(),
        );
    }
    selected
        .and_then(|s| s.as_slice().first())
        .map_or(Value::Null, |o| Value::One(o.value.clone()))
}

/// Shallow, order-sensitive comparison of two values.
///
/// Two values that each reduce to a single invalid entry (for example
/// `Undefined` and `Null`, or `Null` and `""`) compare equal so a parent
/// switching between empty representations causes no churn.
pub fn has_different_latest_and_previous_value(latest: &Value, previous: &Value) -> bool {
    let latest = latest.entries();
    let previous = previous.entries();

    if latest.len() != previous.len() {
        return true;
    }
    if let ([l], [p]) = (latest.as_slice(), previous.as_slice()) {
        if is_invalid_value(*l) && is_invalid_value(*p) {
            return false;
        }
    }
    latest.iter().zip(previous.iter()).any(|(l, p)| l != p)
}

/// `true` when the selection is as large as the flat list.
pub fn has_all_items_selected(selected: Option<&SelectedOptions>, list: &[SelectOption]) -> bool {
    selected.map_or(0, SelectedOptions::len) == list.len()
}

/// Checked / indeterminate / unchecked display of the select-all toggle.
pub fn select_all_state(selected: Option<&SelectedOptions>, list: &[SelectOption]) -> SelectAllState {
    match selected {
        None => SelectAllState::Unchecked,
        Some(s) if s.is_empty() => SelectAllState::Unchecked,
        Some(_) if has_all_items_selected(selected, list) => SelectAllState::Checked,
        Some(_) => SelectAllState::Indeterminate,
    }
}

/// Backspace on an empty multi-select input removes the last selection,
/// unless that selection is disabled.
pub fn should_remove_selected_value_on_backspace(
    is_multi: bool,
    input_value: &str,
    selected: Option<&SelectedOptions>,
) -> bool {
    is_multi
        && input_value.is_empty()
        && selected
            .and_then(SelectedOptions::last)
            .is_some_and(|o| !o.disabled)
}
