//! Add Node
//!
//! Sums a variable number of integer operands.

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result, ScriptEngineError, ValueType, VariadicInput,
};

/// Add Node
///
/// Has no fixed inputs; every input is a variadic `operand`. New nodes start
/// with two operands and more can be appended with
/// [`Node::add_variadic_input`](script_engine::Node::add_variadic_input).
///
/// # Inputs
/// - `operand` (int, variadic) - Values to sum
///
/// # Outputs
/// - `sum` (int) - Sum of all operands
pub struct AddNode;

impl AddNode {
    /// Output index of `sum`
    pub const OUTPUT_SUM: usize = 0;
    /// Operands a new node starts with
    pub const DEFAULT_OPERANDS: usize = 2;
}

impl NodeDescriptor for AddNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "add".to_string(),
                category: NodeCategory::Value,
                label: "Add".to_string(),
                description: "Sums its integer operands".to_string(),
                inputs: Vec::new(),
                variadic: Some(VariadicInput {
                    port: PortMetadata::data("operand", "Operand", ValueType::Int),
                    default_count: Self::DEFAULT_OPERANDS,
                }),
                outputs: vec![PortMetadata::data("sum", "Sum", ValueType::Int)],
                fields: Vec::new(),
                is_pure: true,
                is_root: false,
            },
            AddNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(AddNode::definition));

impl NodeEvaluator for AddNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let mut sum: i64 = 0;
        for port in 0..ctx.input_count()? {
            let operand: i64 = ctx.get_input(port)?;
            sum = sum
                .checked_add(operand)
                .ok_or_else(|| ScriptEngineError::failed("integer overflow in add"))?;
        }
        ctx.set_output(Self::OUTPUT_SUM, sum)
    }
}
