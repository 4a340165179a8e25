//! Evaluation configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default limit on nested graph evaluations
pub const DEFAULT_MAX_GRAPH_DEPTH: usize = 64;

/// Limits and policies applied by an [`EvalContext`](crate::context::EvalContext)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvalConfig {
    /// Maximum number of dequeues per top-level evaluation (None = unbounded)
    pub max_steps: Option<usize>,
    /// Maximum number of graphs on the graph stack at once
    pub max_graph_depth: usize,
    /// Abort root evaluation of a non-root node instead of reporting it
    pub strict_roots: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_graph_depth: DEFAULT_MAX_GRAPH_DEPTH,
            strict_roots: false,
        }
    }
}

impl EvalConfig {
    /// Parse a configuration, filling omitted keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_max_graph_depth(mut self, depth: usize) -> Self {
        self.max_graph_depth = depth;
        self
    }

    pub fn with_strict_roots(mut self, strict: bool) -> Self {
        self.strict_roots = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.max_steps, None);
        assert_eq!(config.max_graph_depth, DEFAULT_MAX_GRAPH_DEPTH);
        assert!(!config.strict_roots);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EvalConfig::from_json(r#"{"maxSteps": 100}"#).unwrap();
        assert_eq!(config.max_steps, Some(100));
        assert_eq!(config.max_graph_depth, DEFAULT_MAX_GRAPH_DEPTH);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(EvalConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = EvalConfig::default()
            .with_max_steps(10)
            .with_max_graph_depth(2)
            .with_strict_roots(true);
        assert_eq!(config.max_steps, Some(10));
        assert_eq!(config.max_graph_depth, 2);
        assert!(config.strict_roots);
    }
}
