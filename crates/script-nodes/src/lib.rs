//! Script Nodes
//!
//! Built-in node types for the script engine. Every node registers its
//! definition at link time, so `DefinitionRegistry::with_builtins()` picks
//! all of them up.
//!
//! # Categories
//!
//! - **Events**: Root nodes fired by the host
//! - **Values**: Pure constants and arithmetic
//! - **Control**: Branching and sequencing
//! - **Output**: Side effects visible to the host
//! - **Graph**: Calls into other graphs

pub mod console;
pub mod control;
pub mod events;
pub mod graph;
pub mod output;
pub mod setup;
pub mod values;

#[cfg(test)]
mod test_support;

// Re-export all nodes for convenience
pub use console::Console;
pub use control::*;
pub use events::*;
pub use graph::*;
pub use output::*;
pub use setup::setup_extensions;
pub use values::*;

#[cfg(test)]
mod tests {
    use script_engine::DefinitionRegistry;

    #[test]
    fn test_inventory_collects_all_builtins() {
        let registry = DefinitionRegistry::with_builtins();
        let all = registry.all_metadata();

        assert_eq!(all.len(), 10, "Expected 10 built-in nodes");

        // Spot-check known types
        for node_type in [
            "on-interact",
            "on-start",
            "print",
            "integer",
            "boolean",
            "add",
            "greater-than",
            "branch",
            "sequence",
            "call-graph",
        ] {
            assert!(registry.has_node_type(node_type), "missing {}", node_type);
        }

        // Every built-in ships an evaluation routine
        for node_type in registry.node_types() {
            assert!(registry.get(node_type).unwrap().evaluation().is_some());
        }
    }
}
