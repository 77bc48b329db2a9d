//! Shared helpers for command handlers: input files, JSON values and
//! change-event plumbing.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use selectra_core::{Action, ChangeEvent, ListItem, Value};

use crate::error::CliError;

/// Read a file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    let display = path.display().to_string();
    let read = if display == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CliError::ReadFailed {
        path: display,
        source,
    })
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: String) -> Result<T, CliError> {
    serde_json::from_str(raw).map_err(|source| CliError::InvalidJson { what, source })
}

pub fn read_list(path: &Path) -> Result<Vec<ListItem>, CliError> {
    let raw = read_input(path)?;
    let list: Vec<ListItem> = parse_json(&raw, format!("option list {}", path.display()))?;
    tracing::debug!(items = list.len(), "option list loaded");
    Ok(list)
}

pub fn read_script(path: &Path) -> Result<Vec<Action>, CliError> {
    let raw = read_input(path)?;
    parse_json(&raw, format!("action script {}", path.display()))
}

/// Parse a `--value` argument. Anything but a scalar, an array of
/// scalars or `null` is a usage error.
pub fn parse_value(field: &str, raw: &str) -> Result<Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected a JSON number, string, array or null ({e})"),
    })
}

/// Collect every change event delivered so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ChangeEvent>) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use selectra_core::OptionValue;

    use super::*;

    #[test]
    fn parse_value_accepts_scalars_arrays_and_null() {
        assert_eq!(parse_value("value", "2").unwrap(), Value::One(OptionValue::Int(2)));
        assert_eq!(
            parse_value("value", r#"["a", 3]"#).unwrap(),
            Value::Many(vec![OptionValue::from("a"), OptionValue::Int(3)])
        );
        assert_eq!(parse_value("value", "null").unwrap(), Value::Null);
    }

    #[test]
    fn parse_value_rejects_objects() {
        let err = parse_value("value", r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_list(Path::new("/nonexistent/selectra/list.json")).unwrap_err();
        assert!(matches!(err, CliError::ReadFailed { ref path, .. } if path.ends_with("list.json")));
    }
}
