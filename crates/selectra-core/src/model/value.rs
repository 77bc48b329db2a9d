// ── External value ──
//
// The value a parent passes in and receives through `on_change`.
// `Undefined` and `Null` are kept apart because they are distinct on the
// wire (absent vs. explicit null), but both mean "nothing selected".

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::OptionValue;

/// Externally visible selection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No value supplied; the control is uncontrolled.
    #[default]
    Undefined,
    /// Explicit "nothing selected".
    Null,
    /// Single-select identifier.
    One(OptionValue),
    /// Multi-select identifiers in selection order.
    Many(Vec<OptionValue>),
}

impl Value {
    /// A control is controlled whenever its value prop is present,
    /// even if that value is `Null`.
    pub fn is_controlled(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Array view used by shallow comparisons: scalar values behave like
    /// a one-element array, absent values like `[absent]`.
    pub(crate) fn entries(&self) -> Vec<Option<&OptionValue>> {
        match self {
            Self::Undefined | Self::Null => vec![None],
            Self::One(v) => vec![Some(v)],
            Self::Many(vs) => vs.iter().map(Some).collect(),
        }
    }

    /// Identifiers carried by this value, scalar values included.
    pub fn identifiers(&self) -> &[OptionValue] {
        match self {
            Self::Undefined | Self::Null => &[],
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }
}

impl From<OptionValue> for Value {
    fn from(v: OptionValue) -> Self {
        Self::One(v)
    }
}

impl From<Vec<OptionValue>> for Value {
    fn from(vs: Vec<OptionValue>) -> Self {
        Self::Many(vs)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_none(),
            Self::One(v) => v.serialize(serializer),
            Self::Many(vs) => vs.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Many(Vec<OptionValue>),
    One(OptionValue),
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ValueRepr>::deserialize(deserializer)? {
            None => Self::Null,
            Some(ValueRepr::One(v)) => Self::One(v),
            Some(ValueRepr::Many(vs)) => Self::Many(vs),
        })
    }
}
