//! Configuration for indirect-reference resolution.

/// Default limit on how many references are followed in one chain.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Options controlling [`resolve`](crate::resolve::resolve).
///
/// # Example
///
/// ```
/// use pdf_lex::config::ResolveOptions;
///
/// let opts = ResolveOptions::new().with_max_depth(8);
/// assert_eq!(opts.max_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of references followed before giving up
    ///
    /// A reference may point at another reference. Chains longer than this
    /// fail with [`Error::RecursionLimitExceeded`](crate::Error::RecursionLimitExceeded).
    pub max_depth: u32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the reference chain limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ResolveOptions::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder() {
        let opts = ResolveOptions::new().with_max_depth(1);
        assert_eq!(opts.max_depth, 1);
    }
}
