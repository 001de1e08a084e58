//! Per-call options for stub creation.

/// Options accepted by [`crate::StubFactory::create_one`] and
/// [`crate::StubFactory::create_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubOptions {
    /// Expand relations into related stubs
    pub deep: bool,

    /// Reserved; accepted but currently has no effect
    pub null_defaults: bool,

    /// Seed for reproducible output. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            deep: true,
            null_defaults: false,
            seed: None,
        }
    }
}

impl StubOptions {
    /// Options that populate own and inherited fields only.
    pub fn shallow() -> Self {
        Self {
            deep: false,
            ..Self::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_null_defaults(mut self, null_defaults: bool) -> Self {
        self.null_defaults = null_defaults;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = StubOptions::default();
        assert!(options.deep);
        assert!(!options.null_defaults);
        assert_eq!(options.seed, None);
    }

    #[test]
    fn test_builders() {
        let options = StubOptions::shallow().with_seed(9).with_null_defaults(true);
        assert!(!options.deep);
        assert!(options.null_defaults);
        assert_eq!(options.seed, Some(9));
    }
}
