//! Value classification
//!
//! Every host value is drawn as exactly one [`ValueKind`]. The [`Classifier`]
//! tries its recognizers in a fixed priority order and the first match wins;
//! anything no recognizer claims becomes [`ValueKind::Opaque`], so
//! classification never fails.
//!
//! The numeric-array recognizer is optional. With it disabled, arrays fall
//! through to `Opaque` and the rest of the pipeline is unaffected.

use super::palette::DEFAULT_PALETTE;
use crate::memory::value::HostValue;

/// Rendering classification of a heap value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Singleton,
    Sequence { mutable: bool },
    Mapping,
    SetCollection,
    MultiDimArray,
    Opaque,
}

impl ValueKind {
    /// Fill color for slots of this kind, `None` for unfilled cells
    pub fn color(self) -> Option<&'static str> {
        match self {
            ValueKind::Scalar => Some(DEFAULT_PALETTE.scalar),
            ValueKind::Singleton => Some(DEFAULT_PALETTE.singleton),
            ValueKind::Sequence { mutable: true } => Some(DEFAULT_PALETTE.list),
            ValueKind::Sequence { mutable: false } => Some(DEFAULT_PALETTE.tuple),
            ValueKind::Mapping => Some(DEFAULT_PALETTE.dict),
            ValueKind::SetCollection => Some(DEFAULT_PALETTE.set),
            ValueKind::MultiDimArray => Some(DEFAULT_PALETTE.array),
            ValueKind::Opaque => None,
        }
    }
}

type Recognizer = fn(&HostValue) -> Option<ValueKind>;

/// Recognizers that are always present, highest priority first
const CORE_RECOGNIZERS: &[Recognizer] = &[scalar, singleton, sequence, mapping, set_collection];

fn scalar(value: &HostValue) -> Option<ValueKind> {
    matches!(
        value,
        HostValue::Int { .. } | HostValue::Float { .. } | HostValue::Str { .. }
    )
    .then_some(ValueKind::Scalar)
}

fn singleton(value: &HostValue) -> Option<ValueKind> {
    matches!(value, HostValue::Bool { .. } | HostValue::None).then_some(ValueKind::Singleton)
}

fn sequence(value: &HostValue) -> Option<ValueKind> {
    match value {
        HostValue::List { .. } => Some(ValueKind::Sequence { mutable: true }),
        HostValue::Tuple { .. } => Some(ValueKind::Sequence { mutable: false }),
        _ => None,
    }
}

fn mapping(value: &HostValue) -> Option<ValueKind> {
    matches!(value, HostValue::Dict { .. }).then_some(ValueKind::Mapping)
}

fn set_collection(value: &HostValue) -> Option<ValueKind> {
    matches!(value, HostValue::Set { .. }).then_some(ValueKind::SetCollection)
}

fn multi_dim_array(value: &HostValue) -> Option<ValueKind> {
    matches!(value, HostValue::Array(_)).then_some(ValueKind::MultiDimArray)
}

/// Ordered value classifier
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    arrays: bool,
}

impl Classifier {
    /// Classifier with every recognizer, including numeric arrays
    pub fn new() -> Self {
        Classifier { arrays: true }
    }

    /// Classifier without the numeric-array recognizer
    pub fn without_arrays() -> Self {
        Classifier { arrays: false }
    }

    /// Classify a value; the first matching recognizer wins
    pub fn classify(&self, value: &HostValue) -> ValueKind {
        CORE_RECOGNIZERS
            .iter()
            .find_map(|recognize| recognize(value))
            .or_else(|| {
                if self.arrays {
                    multi_dim_array(value)
                } else {
                    None
                }
            })
            .unwrap_or(ValueKind::Opaque)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::{ArrayData, ObjectId};

    fn array() -> HostValue {
        HostValue::Array(ArrayData {
            shape: vec![2, 2],
            dtype: "int64".to_string(),
            elements: vec![],
            base: None,
        })
    }

    #[test]
    fn test_classify_each_shape() {
        let c = Classifier::new();
        assert_eq!(c.classify(&HostValue::Int { value: 3 }), ValueKind::Scalar);
        assert_eq!(c.classify(&HostValue::Float { value: 0.5 }), ValueKind::Scalar);
        assert_eq!(
            c.classify(&HostValue::Str {
                value: "hi".to_string()
            }),
            ValueKind::Scalar
        );
        assert_eq!(c.classify(&HostValue::Bool { value: false }), ValueKind::Singleton);
        assert_eq!(c.classify(&HostValue::None), ValueKind::Singleton);
        assert_eq!(
            c.classify(&HostValue::List {
                items: vec![ObjectId(1)]
            }),
            ValueKind::Sequence { mutable: true }
        );
        assert_eq!(
            c.classify(&HostValue::Tuple { items: vec![] }),
            ValueKind::Sequence { mutable: false }
        );
        assert_eq!(c.classify(&HostValue::Dict { entries: vec![] }), ValueKind::Mapping);
        assert_eq!(c.classify(&HostValue::Set { items: vec![] }), ValueKind::SetCollection);
        assert_eq!(c.classify(&array()), ValueKind::MultiDimArray);
        assert_eq!(c.classify(&HostValue::Object), ValueKind::Opaque);
        assert_eq!(
            c.classify(&HostValue::Function {
                name: "f".to_string()
            }),
            ValueKind::Opaque
        );
    }

    #[test]
    fn test_arrays_fall_through_without_recognizer() {
        let c = Classifier::without_arrays();
        assert_eq!(c.classify(&array()), ValueKind::Opaque);
        assert_eq!(
            c.classify(&HostValue::List { items: vec![] }),
            ValueKind::Sequence { mutable: true }
        );
    }

    #[test]
    fn test_sequence_colors_differ_by_mutability() {
        assert_eq!(
            ValueKind::Sequence { mutable: true }.color(),
            Some("#fb8072")
        );
        assert_eq!(
            ValueKind::Sequence { mutable: false }.color(),
            Some("#fdb462")
        );
        assert_eq!(ValueKind::Opaque.color(), None);
    }
}
