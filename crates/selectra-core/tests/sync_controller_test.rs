// Integration tests for `SyncListController`.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use selectra_core::{
    Action, ChangeEvent, ControllerOptions, EventSource, Key, ListItem, OptionValue,
    RecordingDiagnostics, SelectAllState, SelectConfig, SelectOption, SelectProps,
    SelectedOptions, SyncListController, Value,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn letters() -> Vec<ListItem> {
    vec![
        SelectOption::new(1, "A").into(),
        SelectOption::new(2, "B").into(),
    ]
}

fn fruit() -> Vec<ListItem> {
    vec![
        SelectOption::new(1, "Apple").into(),
        SelectOption::new(2, "Banana").into(),
        SelectOption::new(3, "Cherry").disabled().into(),
    ]
}

fn one(v: i64) -> Value {
    Value::One(OptionValue::Int(v))
}

fn many(vs: &[i64]) -> Value {
    Value::Many(vs.iter().copied().map(OptionValue::Int).collect())
}

struct Harness {
    controller: SyncListController,
    changes: mpsc::UnboundedReceiver<ChangeEvent>,
    diagnostics: Arc<RecordingDiagnostics>,
}

fn mount(props: SelectProps, list: Vec<ListItem>, config: SelectConfig) -> Harness {
    let (tx, changes) = mpsc::unbounded_channel();
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let options = ControllerOptions::default()
        .with_config(config)
        .with_diagnostics(diagnostics.clone());
    Harness {
        controller: SyncListController::new(props, list, tx, options),
        changes,
        diagnostics,
    }
}

fn values(options: &[SelectOption]) -> Vec<OptionValue> {
    options.iter().map(|o| o.value.clone()).collect()
}

// ── Reconciliation ──────────────────────────────────────────────────

#[test]
fn test_controlled_value_resolves_label() {
    let h = mount(
        SelectProps::single().with_value(one(2)),
        letters(),
        SelectConfig::immediate(),
    );

    assert_eq!(
        h.controller.selected_options(),
        Some(SelectedOptions::Single(SelectOption::new(2, "B")))
    );
    assert_eq!(h.controller.input_value(), "B");
    assert_eq!(h.controller.snapshot().input_value, "B");
}

#[test]
fn test_unknown_value_becomes_orphan_with_one_warning() {
    let h = mount(
        SelectProps::single().with_value(one(99)),
        letters(),
        SelectConfig::immediate(),
    );

    let selected = h.controller.selected_options().unwrap();
    let SelectedOptions::Single(option) = selected else {
        panic!("expected a single selection");
    };
    assert_eq!(option.value, OptionValue::Int(99));
    assert!(option.is_orphan_value);
    assert_eq!(h.diagnostics.orphans(), vec![OptionValue::Int(99)]);
    assert_eq!(h.controller.input_value(), "");
}

#[test]
fn test_same_value_prop_does_not_reconcile_again() {
    let h = mount(
        SelectProps::single().with_value(one(99)),
        letters(),
        SelectConfig::immediate(),
    );

    h.controller.set_value(one(99));
    h.controller.set_value(Value::Many(vec![OptionValue::Int(99)]));

    assert_eq!(h.diagnostics.orphans().len(), 1);
}

#[test]
fn test_new_value_prop_reconciles() {
    let h = mount(
        SelectProps::single().with_value(one(1)),
        letters(),
        SelectConfig::immediate(),
    );

    h.controller.set_value(one(2));

    assert_eq!(h.controller.value(), one(2));
    assert_eq!(h.controller.input_value(), "B");
}

#[test]
fn test_new_list_identity_re_resolves_orphans() {
    let h = mount(
        SelectProps::multi().with_value(many(&[1, 7])),
        letters(),
        SelectConfig::immediate(),
    );
    let list: Arc<[ListItem]> = Arc::from(vec![
        ListItem::from(SelectOption::new(1, "A")),
        ListItem::from(SelectOption::new(7, "G")),
    ]);

    h.controller.set_list(Arc::clone(&list));
    h.controller.set_list(list);

    let selected = h.controller.selected_options().unwrap();
    assert_eq!(
        selected.as_slice(),
        &[SelectOption::new(1, "A"), SelectOption::new(7, "G")]
    );
    // Only the initial mount saw 7 as an orphan.
    assert_eq!(h.diagnostics.orphans(), vec![OptionValue::Int(7)]);
}

#[test]
fn test_default_value_seeds_uncontrolled_control() {
    let mut h = mount(
        SelectProps::single().with_default_value(one(1)),
        letters(),
        SelectConfig::immediate(),
    );

    assert_eq!(h.controller.value(), one(1));
    assert_eq!(h.controller.input_value(), "A");
    assert!(h.changes.try_recv().is_err());
}

#[test]
fn test_default_search_query_filters_uncontrolled_list() {
    let h = mount(
        SelectProps::multi().with_default_search_query("ch"),
        fruit(),
        SelectConfig::immediate(),
    );

    assert_eq!(h.controller.input_value(), "ch");
    assert_eq!(values(&h.controller.filtered_list()), vec![OptionValue::Int(3)]);
}

// ── User interaction ────────────────────────────────────────────────

#[test]
fn test_single_pick_sets_label_then_emits_change() {
    let mut h = mount(
        SelectProps::single().with_name("letter"),
        letters(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::Open);
    h.controller.dispatch(Action::OnChange {
        option: SelectOption::new(1, "A"),
        source: EventSource::Pointer,
    });

    let event = h.changes.try_recv().unwrap();
    assert_eq!(event.name.as_deref(), Some("letter"));
    assert_eq!(event.value, one(1));
    assert_eq!(event.extra.source, EventSource::Pointer);
    assert!(!event.extra.deferred);
    assert_eq!(h.controller.input_value(), "A");
    assert!(!h.controller.state().is_menu_open);
}

#[test]
fn test_backspace_removes_last_selection() {
    let mut h = mount(
        SelectProps::multi().with_value(many(&[3, 1, 2])),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::InputKeydown {
        key: Key::Backspace,
    });

    let event = h.changes.try_recv().unwrap();
    assert_eq!(event.value, many(&[3, 1]));
    assert_eq!(event.extra.source, EventSource::Keyboard);
    assert_eq!(
        values(h.controller.selected_options().unwrap().as_slice()),
        vec![OptionValue::Int(3), OptionValue::Int(1)]
    );
}

#[test]
fn test_backspace_keeps_disabled_last_selection() {
    let mut h = mount(
        SelectProps::multi().with_value(many(&[1, 2, 3])),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::InputKeydown {
        key: Key::Backspace,
    });

    assert!(h.changes.try_recv().is_err());
    assert_eq!(h.controller.value(), many(&[1, 2, 3]));
}

#[test]
fn test_backspace_with_text_keeps_selection() {
    let mut h = mount(
        SelectProps::multi().with_value(many(&[1, 2])),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::InputTextChange { text: "b".into() });
    h.controller.dispatch(Action::InputKeydown {
        key: Key::Backspace,
    });

    assert!(h.changes.try_recv().is_err());
    assert_eq!(h.controller.value(), many(&[1, 2]));
}

#[test]
fn test_orphan_survives_and_can_be_removed() {
    let mut h = mount(
        SelectProps::multi().with_value(many(&[1, 99])),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::OnChange {
        option: SelectOption::new(2, "Banana"),
        source: EventSource::Pointer,
    });
    assert_eq!(h.changes.try_recv().unwrap().value, many(&[1, 99, 2]));

    h.controller.dispatch(Action::RemoveValue {
        value: OptionValue::Int(99),
    });
    assert_eq!(h.changes.try_recv().unwrap().value, many(&[1, 2]));
}

#[test]
fn test_select_all_and_clear_all_are_idempotent() {
    let mut h = mount(SelectProps::multi(), fruit(), SelectConfig::immediate());

    h.controller.dispatch(Action::ToggleAll { checked: true });
    let first = h.changes.try_recv().unwrap();
    h.controller.dispatch(Action::ToggleAll { checked: true });
    let second = h.changes.try_recv().unwrap();
    assert_eq!(first.value, many(&[1, 2, 3]));
    assert_eq!(first.value, second.value);
    assert_eq!(h.controller.select_all_state(), SelectAllState::Checked);

    h.controller.dispatch(Action::ClearAll);
    h.controller.dispatch(Action::ClearAll);
    assert_eq!(h.changes.try_recv().unwrap().value, many(&[]));
    assert_eq!(h.changes.try_recv().unwrap().value, many(&[]));
    assert_eq!(h.controller.selected_options(), None);
    assert_eq!(h.controller.select_all_state(), SelectAllState::Unchecked);
}

#[test]
fn test_outside_click_restores_selected_label() {
    let h = mount(
        SelectProps::single().with_value(one(2)),
        letters(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::InputFocus);
    h.controller.dispatch(Action::InputTextChange { text: "zz".into() });
    assert!(h.controller.filtered_list().is_empty());

    h.controller.dispatch(Action::OutsideClick);

    assert_eq!(h.controller.input_value(), "B");
    assert_eq!(h.controller.filtered_list().len(), 1);
    let state = h.controller.state();
    assert!(!state.is_menu_open);
    assert!(!state.is_search_input_focused);
}

#[test]
fn test_enter_creates_option_from_free_text() {
    let mut h = mount(
        SelectProps::multi().creatable(),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::InputTextChange {
        text: "Durian".into(),
    });
    h.controller.dispatch(Action::InputKeydown { key: Key::Enter });

    let event = h.changes.try_recv().unwrap();
    assert!(event.extra.created);
    assert_eq!(event.value, Value::Many(vec![OptionValue::from("Durian")]));
    assert_eq!(h.controller.input_value(), "");
    assert_eq!(h.controller.filtered_list().len(), 3);
}

#[test]
fn test_disabled_control_ignores_interaction() {
    let mut h = mount(
        SelectProps::multi().disabled(true),
        fruit(),
        SelectConfig::immediate(),
    );

    h.controller.dispatch(Action::Open);
    h.controller.dispatch(Action::ToggleAll { checked: true });

    assert!(!h.controller.state().is_menu_open);
    assert!(h.changes.try_recv().is_err());
}

// ── Deferred delivery ───────────────────────────────────────────────

#[test]
fn test_keyboard_change_waits_for_flush() {
    let config = SelectConfig {
        defer_keyboard_change: true,
        ..SelectConfig::immediate()
    };
    let mut h = mount(SelectProps::single(), letters(), config);

    h.controller.dispatch(Action::OnChange {
        option: SelectOption::new(2, "B"),
        source: EventSource::Keyboard,
    });

    assert!(h.changes.try_recv().is_err());
    assert_eq!(h.controller.input_value(), "B");

    assert_eq!(h.controller.flush_deferred(), 1);
    let event = h.changes.try_recv().unwrap();
    assert!(event.extra.deferred);
    assert_eq!(event.value, one(2));
    assert_eq!(h.controller.flush_deferred(), 0);
}

// ── Debounce & snapshots ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_filter_waits_for_quiet_period() {
    let h = mount(SelectProps::multi(), fruit(), SelectConfig::default());

    h.controller.dispatch(Action::InputTextChange { text: "b".into() });
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.controller.dispatch(Action::InputTextChange { text: "ban".into() });

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(h.controller.filtered_list().len(), 3);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(values(&h.controller.filtered_list()), vec![OptionValue::Int(2)]);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_controller_cancels_pending_filter() {
    let h = mount(SelectProps::multi(), fruit(), SelectConfig::default());
    let stream = h.controller.subscribe();

    h.controller.dispatch(Action::InputTextChange { text: "b".into() });
    drop(h);
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(stream.latest().list.len(), 3);
}

#[tokio::test]
async fn test_subscribers_see_published_snapshots() {
    let h = mount(SelectProps::single(), letters(), SelectConfig::immediate());
    let mut stream = h.controller.subscribe();
    assert!(!stream.current().state.is_menu_open);

    h.controller.dispatch(Action::Open);

    let snap = stream.changed().await.unwrap();
    assert!(snap.state.is_menu_open);
    assert_eq!(snap.list.len(), 2);
}

#[tokio::test]
async fn test_snapshot_stream_yields_current_then_updates() {
    let h = mount(SelectProps::single(), letters(), SelectConfig::immediate());
    let mut stream = h.controller.subscribe().into_stream();

    let first = stream.next().await.unwrap();
    assert!(!first.state.is_menu_open);

    h.controller.dispatch(Action::Open);
    let opened = stream.next().await.unwrap();
    assert!(opened.state.is_menu_open);

    drop(h.controller);
    assert!(stream.next().await.is_none());
}
