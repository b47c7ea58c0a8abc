use alloc::vec::Vec;

use serde::Deserialize;

use crate::value::Value;

// -----------------------------------------------------------------------------
// OrdinalLookup

/// The `findByCode` half of an ordinal type.
///
/// Implementations return `None` when no constant carries `code`.
/// Any `Fn(&str, i32) -> Option<Value>` closure is a lookup.
pub trait OrdinalLookup: Send + Sync {
    fn find_by_code(&self, class: &str, code: i32) -> Option<Value>;
}

impl<F> OrdinalLookup for F
where
    F: Fn(&str, i32) -> Option<Value> + Send + Sync,
{
    #[inline]
    fn find_by_code(&self, class: &str, code: i32) -> Option<Value> {
        self(class, code)
    }
}

// -----------------------------------------------------------------------------
// CodeTable

/// A lookup over a fixed set of codes, producing [`Value::Ordinal`].
///
/// # Example
///
/// ```
/// use egen_codec::registry::{CodeTable, OrdinalLookup};
/// use egen_codec::value::Value;
///
/// let colors = CodeTable::new([0, 1, 2]);
/// assert_eq!(
///     colors.find_by_code("Color", 1),
///     Some(Value::Ordinal { class: "Color".into(), code: 1 }),
/// );
/// assert_eq!(colors.find_by_code("Color", 7), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<i32>")]
pub struct CodeTable {
    codes: Vec<i32>,
}

impl CodeTable {
    pub fn new(codes: impl IntoIterator<Item = i32>) -> Self {
        let mut codes: Vec<i32> = codes.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();
        Self { codes }
    }

    #[inline]
    pub fn contains(&self, code: i32) -> bool {
        self.codes.binary_search(&code).is_ok()
    }
}

impl From<Vec<i32>> for CodeTable {
    #[inline]
    fn from(codes: Vec<i32>) -> Self {
        Self::new(codes)
    }
}

impl OrdinalLookup for CodeTable {
    fn find_by_code(&self, class: &str, code: i32) -> Option<Value> {
        self.contains(code).then(|| Value::Ordinal {
            class: class.into(),
            code,
        })
    }
}
