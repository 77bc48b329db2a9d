// ── Option matching ──
//
// The matching algorithm is pluggable: controllers only need a pure
// `(list, query) -> list` function. `LabelMatcher` is the default.

use crate::model::SelectOption;

/// Pure list filter used by the synchronous controller.
pub trait OptionMatcher: Send + Sync {
    fn filter(&self, list: &[SelectOption], query: &str) -> Vec<SelectOption>;
}

/// Case-insensitive substring match on the label and secondary label.
/// An empty or whitespace-only query returns the whole list.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelMatcher;

impl OptionMatcher for LabelMatcher {
    fn filter(&self, list: &[SelectOption], query: &str) -> Vec<SelectOption> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return list.to_vec();
        }
        list.iter()
            .filter(|o| {
                o.label.to_lowercase().contains(&needle)
                    || o
                        .secondary_label
                        .as_ref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

impl<F> OptionMatcher for F
where
    F: Fn(&[SelectOption], &str) -> Vec<SelectOption> + Send + Sync,
{
    fn filter(&self, list: &[SelectOption], query: &str) -> Vec<SelectOption> {
        self(list, query)
    }
}
