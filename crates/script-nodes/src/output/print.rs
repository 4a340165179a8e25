//! Print Node
//!
//! Writes a value to the host console and continues execution.

use std::sync::Arc;

use script_engine::{
    extension_keys, EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator,
    NodeMetadata, PortMetadata, Result, Value, ValueType,
};

use crate::console::Console;

/// Print Node
///
/// Formats its input with `Display` and writes the line to the [`Console`]
/// extension when the host installed one. The line is always logged at info
/// level.
///
/// # Inputs
/// - `value` (any, required) - The value to print
///
/// # Outputs
/// - `next` (execution) - Fired after printing
pub struct PrintNode;

impl PrintNode {
    /// Input index of `value`
    pub const INPUT_VALUE: usize = 0;
    /// Output index of `next`
    pub const OUTPUT_NEXT: usize = 0;
}

impl NodeDescriptor for PrintNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "print".to_string(),
                category: NodeCategory::Output,
                label: "Print".to_string(),
                description: "Prints a value to the console".to_string(),
                inputs: vec![PortMetadata::data("value", "Value", ValueType::Any)],
                variadic: None,
                outputs: vec![PortMetadata::execution("next", "Next")],
                fields: Vec::new(),
                is_pure: false,
                is_root: false,
            },
            PrintNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(PrintNode::definition));

impl NodeEvaluator for PrintNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let value: Value = ctx.get_input(Self::INPUT_VALUE)?;
        let line = value.to_string();
        log::info!("{}", line);

        if let Some(console) = ctx.extensions().get::<Arc<Console>>(extension_keys::CONSOLE) {
            console.write_line(line);
        }

        ctx.execute_targets_of_port(Self::OUTPUT_NEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_engine::{EvalExtensions, Graph, Node, ScriptEngineError};

    fn print_graph(value: Option<Value>) -> (Graph, script_engine::NodeIndex, usize) {
        let mut graph = Graph::new("print");
        let print = graph.add_node(Node::new(Arc::new(PrintNode::definition())));
        if let Some(value) = value {
            graph
                .set_input_constant(print, PrintNode::INPUT_VALUE, value)
                .unwrap();
        }
        let run = graph.add_execution_input("run");
        graph.add_execution_input_edge(run, print).unwrap();
        (graph, print, run)
    }

    #[test]
    fn test_writes_to_console() {
        let console = Arc::new(Console::new());
        let mut extensions = EvalExtensions::new();
        extensions.set(extension_keys::CONSOLE, console.clone());

        let (graph, _, run) = print_graph(Some(Value::from("hello")));
        let mut ctx = EvalContext::new().with_extensions(Arc::new(extensions));
        ctx.evaluate_graph(Arc::new(graph), run).unwrap();

        assert_eq!(console.lines(), vec!["hello"]);
    }

    #[test]
    fn test_without_console_still_runs() {
        let (graph, _, run) = print_graph(Some(Value::Int(3)));
        let mut ctx = EvalContext::new();
        ctx.evaluate_graph(Arc::new(graph), run).unwrap();

        assert!(ctx.diagnostics().is_empty());
        assert_eq!(ctx.stats().nodes_evaluated, 1);
    }

    #[test]
    fn test_unbound_value_is_reported() {
        let (graph, print, run) = print_graph(None);
        let mut ctx = EvalContext::new();
        ctx.evaluate_graph(Arc::new(graph), run).unwrap();

        assert_eq!(ctx.diagnostics()[0].node, Some(print));
        assert!(matches!(
            ctx.diagnostics()[0].error,
            ScriptEngineError::UnboundInput { port: 0, .. }
        ));
    }
}
