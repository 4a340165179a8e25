//! Node instances
//!
//! A [`Node`] holds the per-instance state of one node in a graph: its input
//! constants, its output port slots and its field values. Wiring lives in the
//! [`Graph`](crate::graph::Graph), and computed output values live in the
//! evaluation context's cache, never in the node itself.

use std::sync::Arc;

use crate::definition::NodeDefinition;
use crate::error::{PortDirection, Result, ScriptEngineError};
use crate::value::{FromValue, Value};

/// An input port slot
///
/// Resolved either through a data edge or through its constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputPort {
    pub constant: Option<Value>,
}

impl InputPort {
    pub fn constant(&self) -> Option<&Value> {
        self.constant.as_ref()
    }
}

/// An output port slot
///
/// Carries no value; computed values are cached by the evaluation context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPort;

/// A schema-bound node instance
#[derive(Debug, Clone)]
pub struct Node {
    definition: Arc<NodeDefinition>,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    fields: Vec<Value>,
}

impl Node {
    /// Create a node with the definition's default port and field layout
    pub fn new(definition: Arc<NodeDefinition>) -> Self {
        let metadata = definition.metadata();
        let input_count = metadata.fixed_input_count() + metadata.variadic_input_count();
        let inputs = vec![InputPort::default(); input_count];
        let outputs = vec![OutputPort; metadata.output_count()];
        let fields = metadata.fields.iter().map(|f| f.default.clone()).collect();

        Self {
            definition,
            inputs,
            outputs,
            fields,
        }
    }

    pub fn definition(&self) -> &Arc<NodeDefinition> {
        &self.definition
    }

    pub fn node_type(&self) -> &str {
        self.definition.node_type()
    }

    /// Total inputs, fixed plus variadic
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of variadic inputs currently on this node
    pub fn variadic_inputs(&self) -> usize {
        self.inputs.len() - self.definition.metadata().fixed_input_count()
    }

    pub fn get_input(&self, index: usize) -> Result<&InputPort> {
        self.inputs
            .get(index)
            .ok_or_else(|| self.out_of_range(PortDirection::Input, index, self.inputs.len()))
    }

    pub fn get_output(&self, index: usize) -> Result<&OutputPort> {
        self.outputs
            .get(index)
            .ok_or_else(|| self.out_of_range(PortDirection::Output, index, self.outputs.len()))
    }

    /// Overwrite the constant of an input
    ///
    /// Does not touch data edges; use
    /// [`Graph::set_input_constant`](crate::graph::Graph::set_input_constant)
    /// to keep edge/constant exclusivity checked.
    pub fn set_input_constant(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let count = self.inputs.len();
        let port = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| out_of_range(&self.definition, PortDirection::Input, index, count))?;
        port.constant = Some(value.into());
        Ok(())
    }

    pub(crate) fn clear_input_constant(&mut self, index: usize) {
        if let Some(port) = self.inputs.get_mut(index) {
            port.constant = None;
        }
    }

    /// Append a variadic input and return its ordinal
    pub fn add_variadic_input(&mut self) -> Result<usize> {
        if self.definition.metadata().variadic.is_none() {
            return Err(ScriptEngineError::InvalidDefinition {
                node_type: self.node_type().to_string(),
                reason: "node type has no variadic inputs".to_string(),
            });
        }
        self.inputs.push(InputPort::default());
        Ok(self.inputs.len() - 1)
    }

    pub fn field(&self, index: usize) -> Result<&Value> {
        self.fields
            .get(index)
            .ok_or_else(|| self.out_of_range(PortDirection::Field, index, self.fields.len()))
    }

    pub fn set_field(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let count = self.fields.len();
        let field = self
            .fields
            .get_mut(index)
            .ok_or_else(|| out_of_range(&self.definition, PortDirection::Field, index, count))?;
        *field = value.into();
        Ok(())
    }

    /// Read a field as a concrete type
    pub fn try_get_field<T: FromValue>(&self, index: usize) -> Result<T> {
        self.field(index)?.get()
    }

    fn out_of_range(&self, direction: PortDirection, port: usize, count: usize) -> ScriptEngineError {
        out_of_range(&self.definition, direction, port, count)
    }
}

fn out_of_range(
    definition: &NodeDefinition,
    direction: PortDirection,
    port: usize,
    count: usize,
) -> ScriptEngineError {
    ScriptEngineError::PortOutOfRange {
        node_type: definition.node_type().to_string(),
        direction,
        port,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{
        FieldMetadata, NodeCategory, NodeMetadata, PortMetadata, VariadicInput,
    };
    use crate::value::ValueType;

    fn sum_definition() -> Arc<NodeDefinition> {
        Arc::new(NodeDefinition::metadata_only(NodeMetadata {
            node_type: "sum".to_string(),
            category: NodeCategory::Value,
            label: "Sum".to_string(),
            description: "Adds terms".to_string(),
            inputs: vec![PortMetadata::data("base", "Base", ValueType::Int)],
            variadic: Some(VariadicInput {
                port: PortMetadata::data("term", "Term", ValueType::Int),
                default_count: 2,
            }),
            outputs: vec![PortMetadata::data("sum", "Sum", ValueType::Int)],
            fields: vec![FieldMetadata::new("scale", "Scale", 1i64)],
            is_pure: true,
            is_root: false,
        }))
    }

    #[test]
    fn test_layout_from_definition() {
        let node = Node::new(sum_definition());
        assert_eq!(node.input_count(), 3);
        assert_eq!(node.variadic_inputs(), 2);
        assert_eq!(node.output_count(), 1);
        assert_eq!(node.try_get_field::<i64>(0).unwrap(), 1);
    }

    #[test]
    fn test_port_bounds() {
        let node = Node::new(sum_definition());
        assert!(node.get_input(2).is_ok());
        assert!(node.get_output(0).is_ok());

        match node.get_input(3) {
            Err(ScriptEngineError::PortOutOfRange {
                direction, port, count, ..
            }) => {
                assert_eq!(direction, PortDirection::Input);
                assert_eq!(port, 3);
                assert_eq!(count, 3);
            }
            other => panic!("Expected PortOutOfRange, got {:?}", other),
        }
        assert!(node.get_output(1).is_err());
    }

    #[test]
    fn test_set_input_constant_overwrites() {
        let mut node = Node::new(sum_definition());
        node.set_input_constant(0, 1i64).unwrap();
        node.set_input_constant(0, 5i64).unwrap();
        assert_eq!(node.get_input(0).unwrap().constant(), Some(&Value::Int(5)));
        assert!(node.set_input_constant(9, 1i64).is_err());
    }

    #[test]
    fn test_add_variadic_input() {
        let mut node = Node::new(sum_definition());
        assert_eq!(node.add_variadic_input().unwrap(), 3);
        assert_eq!(node.variadic_inputs(), 3);
    }

    #[test]
    fn test_field_type_mismatch() {
        let mut node = Node::new(sum_definition());
        node.set_field(0, "two").unwrap();
        assert!(matches!(
            node.try_get_field::<i64>(0),
            Err(ScriptEngineError::TypeMismatch { .. })
        ));
    }
}
