//! Render-wide configuration for execution contexts

use serde::{Deserialize, Serialize};

/// Defaults applied when a root execution context is built
///
/// Values are copied into each root context at construction time, so
/// changing a config afterwards never affects contexts already built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Initial autoescape flag of root contexts
    pub autoescape: bool,
    /// Maximum number of nested macro invocations
    pub max_macro_depth: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            autoescape: true,
            max_macro_depth: 1000,
        }
    }
}

impl ScopeConfig {
    /// Set the initial autoescape flag
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }

    /// Set the macro recursion limit
    pub fn with_max_macro_depth(mut self, max_macro_depth: usize) -> Self {
        self.max_macro_depth = max_macro_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ScopeConfig = serde_json::from_str(r#"{"autoescape": false}"#).unwrap();
        assert_eq!(
            config,
            ScopeConfig::default().with_autoescape(false)
        );
        assert_eq!(config.max_macro_depth, 1000);
    }
}
