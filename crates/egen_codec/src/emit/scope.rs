use alloc::format;
use alloc::string::String;

use super::Symbol;

// -----------------------------------------------------------------------------
// NameScope

/// Hands out collision-free temporary names while one field is emitted.
///
/// A scope is created per top-level field and never shared, so nested
/// containers get distinct counters, sizes and elements.
///
/// # Example
///
/// ```
/// use egen_codec::emit::NameScope;
///
/// let mut scope = NameScope::new("xs");
/// assert_eq!(scope.fresh("size").as_str(), "xs$size0");
/// assert_eq!(scope.fresh("size").as_str(), "xs$size1");
/// ```
#[derive(Debug, Clone)]
pub struct NameScope {
    base: String,
    next: usize,
}

impl NameScope {
    #[inline]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            next: 0,
        }
    }

    /// Returns `{base}${role}{n}`.
    pub fn fresh(&mut self, role: &str) -> Symbol {
        let symbol = Symbol::new(format!("{}${role}{}", self.base, self.next));
        self.next += 1;
        symbol
    }
}
