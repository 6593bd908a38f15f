//! Service configuration.

use std::time::Duration;

const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 800;

/// Tunables for [`ContentService`](crate::ContentService).
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Quiet period before queued prompt edits are flushed to storage.
    pub autosave_debounce: Duration,
    /// Storage namespace for rows.
    pub rows_namespace: String,
    /// Storage namespace for prompt pairs.
    pub prompts_namespace: String,
    /// Storage namespace for cached meta fields.
    pub meta_namespace: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            autosave_debounce: Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            rows_namespace: "rows".to_string(),
            prompts_namespace: "prompts".to_string(),
            meta_namespace: "meta".to_string(),
        }
    }
}

impl CoreConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a custom auto-save debounce.
    #[inline]
    #[must_use]
    pub fn with_autosave_debounce(mut self, debounce: Duration) -> Self {
        self.autosave_debounce = debounce;
        self
    }

    /// Prefix all three namespaces, keeping multiple services on one
    /// backing store apart.
    #[must_use]
    pub fn with_namespace_prefix(mut self, prefix: &str) -> Self {
        self.rows_namespace = format!("{prefix}-{}", self.rows_namespace);
        self.prompts_namespace = format!("{prefix}-{}", self.prompts_namespace);
        self.meta_namespace = format!("{prefix}-{}", self.meta_namespace);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_prefix_applies_to_all_three() {
        let config = CoreConfig::new().with_namespace_prefix("blog");
        assert_eq!(config.rows_namespace, "blog-rows");
        assert_eq!(config.prompts_namespace, "blog-prompts");
        assert_eq!(config.meta_namespace, "blog-meta");
    }
}
