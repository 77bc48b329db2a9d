//! All inputs the select state machine understands. Actions are the sole
//! mechanism for state mutation.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::model::{OptionValue, SelectOption};

/// What produced a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventSource {
    #[default]
    Pointer,
    Keyboard,
    Programmatic,
}

/// Keys the search input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Backspace,
    Enter,
    ArrowDown,
    ArrowUp,
    Tab,
    Char(char),
}

/// Closed action vocabulary of the select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Open,
    Close,
    #[serde(alias = "toggle")]
    ToggleMenu,
    SetWidth {
        width: u32,
    },
    InputFocus,
    InputBlur,
    InputKeydown {
        key: Key,
    },
    InputTextChange {
        text: String,
    },
    /// An option was picked from the list.
    OnChange {
        option: SelectOption,
        #[serde(default)]
        source: EventSource,
    },
    OutsideClick,
    /// A multi-select chip was removed.
    RemoveValue {
        value: OptionValue,
    },
    ToggleAll {
        checked: bool,
    },
    ClearAll,
}

impl Action {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
