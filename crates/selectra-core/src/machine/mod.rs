// ── Select state machine ──
//
// A pure reducer over `SelectState`. Every action yields the next state
// plus an ordered list of effects; the controllers own the data those
// effects touch (input text, selected options, list filter, change sink).
// No transition panics, and inapplicable actions return the state as-is.

mod action;
mod effect;
mod state;

pub use action::{Action, EventSource, Key};
pub use effect::{Effect, ExtraParams, Transition};
pub use state::SelectState;

use crate::model::{OptionValue, SelectOption, SelectedOptions};
use crate::reconcile::{get_value_from_selected_options, should_remove_selected_value_on_backspace};

/// Read-only view of the controller data a transition depends on.
#[derive(Debug, Clone, Copy)]
pub struct SelectContext<'a> {
    pub is_multi: bool,
    pub is_disabled: bool,
    pub is_creatable: bool,
    /// Full flat list the select-all sentinel expands to.
    pub flat_list: &'a [SelectOption],
    pub selected: Option<&'a SelectedOptions>,
    pub input_value: &'a str,
}

/// Compute the next state and effects for `action`.
pub fn transition(state: SelectState, action: Action, ctx: &SelectContext<'_>) -> Transition {
    match action {
        Action::Open => open(state, ctx),
        Action::Close => Transition::state_only(state.closed()),
        Action::ToggleMenu => toggle_menu(state, ctx),
        Action::SetWidth { width } => Transition::state_only(SelectState {
            container_width: width,
            ..state
        }),
        Action::InputFocus => Transition::state_only(state.focused(true)),
        Action::InputBlur => Transition::state_only(state.focused(false)),
        Action::InputKeydown { key } => key_down(state, key, ctx),
        Action::InputTextChange { text } => text_change(state, text, ctx),
        Action::OnChange { option, source } => select_option(state, option, source, ctx),
        Action::OutsideClick => dismiss(state, ctx, true),
        Action::RemoveValue { value } => remove_value(state, &value, ctx),
        Action::ToggleAll { checked } => toggle_all(state, checked, ctx),
        Action::ClearAll => clear_all(state, ctx),
    }
}

// ── Menu ─────────────────────────────────────────────────────────────

fn open(state: SelectState, ctx: &SelectContext<'_>) -> Transition {
    if ctx.is_disabled {
        return Transition::state_only(state);
    }
    Transition::state_only(state.opened())
}

fn toggle_menu(state: SelectState, ctx: &SelectContext<'_>) -> Transition {
    if !state.is_menu_open {
        return open(state, ctx);
    }
    // Keep the menu up while the user is typing into it.
    if state.is_search_input_focused {
        return Transition::state_only(state);
    }
    Transition::state_only(state.closed())
}

/// Outside click and Escape. An abandoned single-select search snaps back
/// to the selected label so the input never disagrees with the value.
fn dismiss(state: SelectState, ctx: &SelectContext<'_>, blur: bool) -> Transition {
    let next = if blur {
        state.closed().focused(false)
    } else {
        state.closed()
    };
    if ctx.is_multi {
        return Transition::state_only(next);
    }

    let label = ctx
        .selected
        .and_then(SelectedOptions::single_label)
        .unwrap_or_default();
    if ctx.input_value == label {
        return Transition::state_only(next);
    }
    Transition::new(
        next,
        vec![
            Effect::SetInputValue(label.to_owned()),
            Effect::Search(label.to_owned()),
        ],
    )
}

// ── Input ────────────────────────────────────────────────────────────

fn text_change(state: SelectState, text: String, ctx: &SelectContext<'_>) -> Transition {
    if ctx.is_disabled {
        return Transition::state_only(state);
    }
    Transition::new(
        state.opened(),
        vec![Effect::SetInputValue(text.clone()), Effect::Search(text)],
    )
}

fn key_down(state: SelectState, key: Key, ctx: &SelectContext<'_>) -> Transition {
    match key {
        Key::Escape => dismiss(state, ctx, false),
        Key::Backspace => backspace(state, ctx),
        Key::Enter => create_option(state, ctx),
        Key::ArrowDown => open(state, ctx),
        Key::ArrowUp | Key::Tab | Key::Char(_) => Transition::state_only(state),
    }
}

fn backspace(state: SelectState, ctx: &SelectContext<'_>) -> Transition {
    if ctx.is_disabled
        || !should_remove_selected_value_on_backspace(ctx.is_multi, ctx.input_value, ctx.selected)
    {
        return Transition::state_only(state);
    }
    let Some((_, rest)) = ctx.selected.and_then(|s| s.as_slice().split_last()) else {
        return Transition::state_only(state);
    };
    let extra = ExtraParams {
        source: EventSource::Keyboard,
        ..ExtraParams::default()
    };
    Transition::new(
        state,
        commit(Some(SelectedOptions::Multi(rest.to_vec())), true, extra),
    )
}

/// Enter on free text that matches no label creates a new option.
fn create_option(state: SelectState, ctx: &SelectContext<'_>) -> Transition {
    let text = ctx.input_value.trim();
    if !ctx.is_creatable
        || ctx.is_disabled
        || text.is_empty()
        || ctx.flat_list.iter().any(|o| o.label.eq_ignore_ascii_case(text))
    {
        return Transition::state_only(state);
    }

    let option = SelectOption::new(text.to_owned(), text);
    let extra = ExtraParams {
        source: EventSource::Keyboard,
        created: true,
        deferred: false,
    };

    if !ctx.is_multi {
        return select_single(state, option, extra);
    }
    if ctx.selected.is_some_and(|s| s.contains(&option.value)) {
        return Transition::state_only(state);
    }
    let mut next = current(ctx.selected);
    next.push(option);

    let mut effects = vec![
        Effect::SetInputValue(String::new()),
        Effect::Search(String::new()),
    ];
    effects.extend(commit(Some(SelectedOptions::Multi(next)), true, extra));
    Transition::new(state, effects)
}

// ── Selection ────────────────────────────────────────────────────────

fn select_option(
    state: SelectState,
    option: SelectOption,
    source: EventSource,
    ctx: &SelectContext<'_>,
) -> Transition {
    if ctx.is_disabled || option.disabled {
        return Transition::state_only(state);
    }
    let extra = ExtraParams {
        source,
        ..ExtraParams::default()
    };

    if !ctx.is_multi {
        return select_single(state, option, extra);
    }

    // Multi-select stays open for further picks.
    let next = if option.value.is_select_all() {
        select_all(ctx)
    } else {
        toggled(ctx.selected, option)
    };
    Transition::new(
        state,
        commit(Some(SelectedOptions::Multi(next)), true, extra),
    )
}

/// Input text is set before the change is emitted; keyboard picks are
/// flagged for deferred delivery.
fn select_single(state: SelectState, option: SelectOption, extra: ExtraParams) -> Transition {
    let extra = ExtraParams {
        deferred: extra.source == EventSource::Keyboard,
        ..extra
    };
    let mut effects = vec![Effect::SetInputValue(option.label.clone())];
    effects.extend(commit(Some(SelectedOptions::Single(option)), false, extra));
    Transition::new(state.closed(), effects)
}

fn remove_value(
    state: SelectState,
    value: &OptionValue,
    ctx: &SelectContext<'_>,
) -> Transition {
    let Some(selected) = ctx.selected else {
        return Transition::state_only(state);
    };
    if ctx.is_disabled || selected.find(value).is_none_or(|o| o.disabled) {
        return Transition::state_only(state);
    }

    let extra = ExtraParams::default();
    if !ctx.is_multi {
        let mut effects = vec![Effect::SetInputValue(String::new())];
        effects.extend(commit(None, false, extra));
        return Transition::new(state, effects);
    }

    let next = selected
        .as_slice()
        .iter()
        .filter(|o| &o.value != value)
        .cloned()
        .collect();
    Transition::new(
        state,
        commit(Some(SelectedOptions::Multi(next)), true, extra),
    )
}

fn toggle_all(state: SelectState, checked: bool, ctx: &SelectContext<'_>) -> Transition {
    if ctx.is_disabled || !ctx.is_multi {
        return Transition::state_only(state);
    }
    let next = if checked {
        select_all(ctx)
    } else {
        // Locked selections survive "deselect all".
        current(ctx.selected)
            .into_iter()
            .filter(|o| o.disabled)
            .collect()
    };
    Transition::new(
        state,
        commit(
            Some(SelectedOptions::Multi(next)),
            true,
            ExtraParams::default(),
        ),
    )
}

fn clear_all(state: SelectState, ctx: &SelectContext<'_>) -> Transition {
    if ctx.is_disabled {
        return Transition::state_only(state);
    }
    Transition::new(
        state,
        vec![
            Effect::SetInputValue(String::new()),
            Effect::SetSelected(None),
            Effect::Search(String::new()),
            Effect::Change {
                value: get_value_from_selected_options(None, ctx.is_multi),
                selected: None,
                extra: ExtraParams::default(),
            },
        ],
    )
}

// ── Helpers ──────────────────────────────────────────────────────────

fn current(selected: Option<&SelectedOptions>) -> Vec<SelectOption> {
    selected.map(|s| s.as_slice().to_vec()).unwrap_or_default()
}

/// Existing selections first, then every list option not yet selected.
fn select_all(ctx: &SelectContext<'_>) -> Vec<SelectOption> {
    let mut next = current(ctx.selected);
    for option in ctx.flat_list {
        if option.value.is_select_all() || next.iter().any(|o| o.value == option.value) {
            continue;
        }
        next.push(option.clone());
    }
    next
}

fn toggled(selected: Option<&SelectedOptions>, option: SelectOption) -> Vec<SelectOption> {
    let mut next = current(selected);
    match next.iter().position(|o| o.value == option.value) {
        Some(pos) => {
            if next.get(pos).is_some_and(|o| !o.disabled) {
                next.remove(pos);
            }
        }
        None => next.push(option),
    }
    next
}

fn commit(selected: Option<SelectedOptions>, is_multi: bool, extra: ExtraParams) -> Vec<Effect> {
    let value = get_value_from_selected_options(selected.as_ref(), is_multi);
    vec![
        Effect::SetSelected(selected.clone()),
        Effect::Change {
            value,
            selected,
            extra,
        },
    ]
}
