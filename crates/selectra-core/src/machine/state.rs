use serde::Serialize;

/// Ephemeral UI state of one select control. Reset on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectState {
    pub container_width: u32,
    pub is_menu_open: bool,
    pub is_search_input_focused: bool,
}

impl SelectState {
    #[must_use]
    pub(crate) fn opened(self) -> Self {
        Self {
            is_menu_open: true,
            ..self
        }
    }

    #[must_use]
    pub(crate) fn closed(self) -> Self {
        Self {
            is_menu_open: false,
            ..self
        }
    }

    #[must_use]
    pub(crate) fn focused(self, focused: bool) -> Self {
        Self {
            is_search_input_focused: focused,
            ..self
        }
    }
}
