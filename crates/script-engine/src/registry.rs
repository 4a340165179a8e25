//! Definition registry for node types
//!
//! Maps node type strings to shared [`NodeDefinition`]s. The registry is an
//! ordinary value passed to whoever builds graphs, so independent registries
//! (and the graphs built from them) can coexist in one process.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = DefinitionRegistry::with_builtins();
//! registry.register(MyNode::definition())?;
//!
//! let print = registry.create_node("print")?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::{DefinitionFn, NodeCategory, NodeDefinition, NodeEvaluator, NodeMetadata};
use crate::error::{Result, ScriptEngineError};
use crate::node::Node;

/// Registry of node definitions keyed by node type
pub struct DefinitionRegistry {
    entries: HashMap<String, Arc<NodeDefinition>>,
}

impl DefinitionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every definition submitted via `inventory`
    ///
    /// Definitions that fail validation are logged and left out.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for definition_fn in inventory::iter::<DefinitionFn> {
            let definition = (definition_fn.0)();
            let node_type = definition.node_type().to_string();
            if let Err(e) = registry.register(definition) {
                log::error!("Skipping built-in node type '{}': {}", node_type, e);
            }
        }
        log::debug!("Registered {} built-in node types", registry.entries.len());
        registry
    }

    /// Register a definition, replacing any previous one of the same type
    pub fn register(&mut self, definition: NodeDefinition) -> Result<Arc<NodeDefinition>> {
        definition.metadata().validate()?;
        let definition = Arc::new(definition);
        if self
            .entries
            .insert(definition.node_type().to_string(), definition.clone())
            .is_some()
        {
            log::warn!("Node type '{}' was registered twice", definition.node_type());
        }
        Ok(definition)
    }

    /// Register a node type backed by a closure or evaluator value
    pub fn register_evaluator(
        &mut self,
        metadata: NodeMetadata,
        evaluator: impl NodeEvaluator + 'static,
    ) -> Result<Arc<NodeDefinition>> {
        self.register(NodeDefinition::new(metadata, evaluator))
    }

    /// Register a node type with metadata only (no evaluation routine)
    pub fn register_metadata(&mut self, metadata: NodeMetadata) -> Result<Arc<NodeDefinition>> {
        self.register(NodeDefinition::metadata_only(metadata))
    }

    pub fn get(&self, node_type: &str) -> Option<Arc<NodeDefinition>> {
        self.entries.get(node_type).cloned()
    }

    /// Instantiate a node of the given type with default ports and fields
    pub fn create_node(&self, node_type: &str) -> Result<Node> {
        self.get(node_type)
            .map(Node::new)
            .ok_or_else(|| ScriptEngineError::UnknownNodeType(node_type.to_string()))
    }

    pub fn get_metadata(&self, node_type: &str) -> Option<&NodeMetadata> {
        self.entries.get(node_type).map(|d| d.metadata())
    }

    pub fn all_metadata(&self) -> Vec<&NodeMetadata> {
        self.entries.values().map(|d| d.metadata()).collect()
    }

    /// Get metadata grouped by category
    pub fn metadata_by_category(&self) -> HashMap<NodeCategory, Vec<&NodeMetadata>> {
        let mut grouped: HashMap<NodeCategory, Vec<&NodeMetadata>> = HashMap::new();
        for definition in self.entries.values() {
            grouped
                .entry(definition.metadata().category)
                .or_default()
                .push(definition.metadata());
        }
        grouped
    }

    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` with the same node type.
    pub fn merge(&mut self, other: DefinitionRegistry) {
        self.entries.extend(other.entries);
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EvalContext;
    use crate::definition::PortMetadata;
    use crate::value::ValueType;

    fn test_metadata(node_type: &str) -> NodeMetadata {
        NodeMetadata {
            node_type: node_type.to_string(),
            category: NodeCategory::Value,
            label: format!("Test {}", node_type),
            description: "Test node".to_string(),
            inputs: vec![PortMetadata::data("input", "Input", ValueType::Any)],
            variadic: None,
            outputs: vec![PortMetadata::data("output", "Output", ValueType::Any)],
            fields: Vec::new(),
            is_pure: true,
            is_root: false,
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DefinitionRegistry::new();
        registry.register_metadata(test_metadata("test-node")).unwrap();

        assert!(registry.has_node_type("test-node"));
        assert!(!registry.has_node_type("unknown"));
        assert_eq!(registry.get_metadata("test-node").unwrap().label, "Test test-node");
    }

    #[test]
    fn test_register_rejects_invalid_definition() {
        let mut registry = DefinitionRegistry::new();
        let mut meta = test_metadata("bad");
        meta.outputs.push(PortMetadata::execution("next", "Next"));

        assert!(registry.register_metadata(meta).is_err());
        assert!(!registry.has_node_type("bad"));
    }

    #[test]
    fn test_create_node_shares_definition() {
        let mut registry = DefinitionRegistry::new();
        let def = registry
            .register_evaluator(test_metadata("echo"), |_ctx: &mut EvalContext| Ok(()))
            .unwrap();

        let a = registry.create_node("echo").unwrap();
        let b = registry.create_node("echo").unwrap();
        assert!(Arc::ptr_eq(a.definition(), &def));
        assert!(Arc::ptr_eq(b.definition(), &def));
        assert!(def.evaluation().is_some());

        assert!(matches!(
            registry.create_node("missing"),
            Err(ScriptEngineError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_merge_override() {
        let mut registry1 = DefinitionRegistry::new();
        let mut meta1 = test_metadata("node-a");
        meta1.label = "Original".to_string();
        registry1.register_metadata(meta1).unwrap();

        let mut registry2 = DefinitionRegistry::new();
        let mut meta2 = test_metadata("node-a");
        meta2.label = "Override".to_string();
        registry2.register_metadata(meta2).unwrap();
        registry2.register_metadata(test_metadata("node-b")).unwrap();

        registry1.merge(registry2);
        assert_eq!(registry1.all_metadata().len(), 2);
        assert_eq!(registry1.get_metadata("node-a").unwrap().label, "Override");
    }

    #[test]
    fn test_metadata_by_category() {
        let mut registry = DefinitionRegistry::new();
        registry.register_metadata(test_metadata("integer")).unwrap();

        let mut meta_event = test_metadata("on-start");
        meta_event.category = NodeCategory::Event;
        meta_event.is_pure = false;
        meta_event.is_root = true;
        registry.register_metadata(meta_event).unwrap();

        let grouped = registry.metadata_by_category();
        assert_eq!(grouped.get(&NodeCategory::Value).unwrap().len(), 1);
        assert_eq!(grouped.get(&NodeCategory::Event).unwrap().len(), 1);
        assert_eq!(registry.node_types().len(), 2);
    }
}
