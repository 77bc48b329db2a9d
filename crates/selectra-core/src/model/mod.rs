// ── Domain model ──
//
// Options, grouped lists, external values and the selected options
// derived from them. Group structure is display-only: every lookup
// works against the flattened list.

mod option;
mod selected;
mod value;

pub use option::{ListItem, OptionValue, SELECT_ALL_VALUE, SelectOption, flatten_list};
pub use selected::{SelectAllState, SelectedOptions};
pub use value::Value;
