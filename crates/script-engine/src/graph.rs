//! Graph topology: nodes, data edges and execution edges
//!
//! The graph owns its node arena and both edge tables. The evaluator only
//! borrows it through the lookups below:
//!
//! - [`Graph::get_node`]
//! - [`Graph::try_get_output_port_of`] (data edge, input → producing output)
//! - [`Graph::get_execution_input_ports_of`] (execution fan-out of an output)
//! - [`Graph::input_execution_edges`] (targets of a graph execution input)
//! - [`Graph::execution_input_count`]

use std::collections::HashMap;
use std::sync::Arc;

use crate::arena::Arena;
use crate::definition::PortKind;
use crate::error::{Result, ScriptEngineError};
use crate::index::{GraphId, NodeIndex, PortIndex};
use crate::node::Node;
use crate::value::{Value, ValueType};

/// A named entry point into a graph, usable for sub-graph invocation
#[derive(Debug, Clone)]
pub struct ExecutionInput {
    pub name: String,
    pub targets: Vec<NodeIndex>,
}

/// A node graph with data and execution edges
///
/// Cloning yields a new graph with its own [`GraphId`], so a clone edited
/// afterwards never shares cached outputs with the original.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    name: String,
    nodes: Arena<Node>,
    /// Input port → producing output port
    data_edges: HashMap<PortIndex, PortIndex>,
    /// Execution output port → ordered target nodes
    execution_edges: HashMap<PortIndex, Vec<NodeIndex>>,
    execution_inputs: Vec<ExecutionInput>,
    roots: Vec<NodeIndex>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GraphId::new(),
            name: name.into(),
            nodes: Arena::new(),
            data_edges: HashMap::new(),
            execution_edges: HashMap::new(),
            execution_inputs: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.nodes.insert(node)
    }

    /// Add a node and record it as one of the graph's roots
    pub fn add_root(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.insert(node);
        self.roots.push(index);
        index
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, index: NodeIndex) -> Result<Node> {
        let node = self.nodes.remove(index)?;

        self.data_edges
            .retain(|input, output| input.node != index && output.node != index);
        self.execution_edges.retain(|output, _| output.node != index);
        for targets in self.execution_edges.values_mut() {
            targets.retain(|t| *t != index);
        }
        for input in &mut self.execution_inputs {
            input.targets.retain(|t| *t != index);
        }
        self.roots.retain(|r| *r != index);

        Ok(node)
    }

    pub fn get_node(&self, index: NodeIndex) -> Result<&Node> {
        self.nodes.get(index)
    }

    pub fn get_node_mut(&mut self, index: NodeIndex) -> Result<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter()
    }

    /// Connect a data output to a data input
    ///
    /// An input has at most one producer; any constant on it is cleared so the
    /// input is resolved by the edge alone.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        from_port: usize,
        to: NodeIndex,
        to_port: usize,
    ) -> Result<()> {
        let source = self.nodes.get(from)?;
        source.get_output(from_port)?;
        if let PortKind::Execution = source.definition().metadata().outputs[from_port].kind {
            return Err(ScriptEngineError::PortKindMismatch {
                node_type: source.node_type().to_string(),
                port: from_port,
                expected: "a data",
            });
        }

        let produced = source.definition().metadata().outputs[from_port].kind;
        let target = self.nodes.get(to)?;
        target.get_input(to_port)?;
        if let (PortKind::Data(produced), Some(PortKind::Data(expected))) = (
            produced,
            target.definition().metadata().input_port(to_port).map(|p| p.kind),
        ) {
            if produced != ValueType::Any && !expected.accepts(produced) {
                log::debug!(
                    "Edge {:?}:{} -> {:?}:{} connects {} to {}; reads are checked at evaluation",
                    from,
                    from_port,
                    to,
                    to_port,
                    produced,
                    expected
                );
            }
        }

        let input = PortIndex::new(to, to_port);
        if self.data_edges.contains_key(&input) {
            return Err(ScriptEngineError::InputAlreadyConnected {
                node: to,
                port: to_port,
            });
        }

        self.nodes.get_mut(to)?.clear_input_constant(to_port);
        self.data_edges.insert(input, PortIndex::new(from, from_port));
        Ok(())
    }

    /// Disconnect the data edge feeding an input, returning its producer
    pub fn remove_edge(&mut self, to: NodeIndex, to_port: usize) -> Option<PortIndex> {
        self.data_edges.remove(&PortIndex::new(to, to_port))
    }

    /// Set an input constant, refusing inputs already fed by a data edge
    pub fn set_input_constant(
        &mut self,
        node: NodeIndex,
        port: usize,
        value: impl Into<Value>,
    ) -> Result<()> {
        if self.data_edges.contains_key(&PortIndex::new(node, port)) {
            return Err(ScriptEngineError::InputAlreadyConnected { node, port });
        }
        self.nodes.get_mut(node)?.set_input_constant(port, value)
    }

    /// Connect an execution output to the execution input of `to`
    ///
    /// Targets fire in the order their edges were added.
    pub fn add_execution_edge(&mut self, from: NodeIndex, from_port: usize, to: NodeIndex) -> Result<()> {
        let source = self.nodes.get(from)?;
        source.get_output(from_port)?;
        if source.definition().is_pure() {
            return Err(ScriptEngineError::PureExecutionEdge(
                source.node_type().to_string(),
            ));
        }
        if !source.definition().metadata().outputs[from_port].is_execution() {
            return Err(ScriptEngineError::PortKindMismatch {
                node_type: source.node_type().to_string(),
                port: from_port,
                expected: "an execution",
            });
        }
        self.check_execution_target(to)?;

        self.execution_edges
            .entry(PortIndex::new(from, from_port))
            .or_default()
            .push(to);
        Ok(())
    }

    /// Declare a new execution input and return its ordinal
    pub fn add_execution_input(&mut self, name: impl Into<String>) -> usize {
        self.execution_inputs.push(ExecutionInput {
            name: name.into(),
            targets: Vec::new(),
        });
        self.execution_inputs.len() - 1
    }

    /// Wire a graph execution input to a node
    pub fn add_execution_input_edge(&mut self, ordinal: usize, to: NodeIndex) -> Result<()> {
        self.check_execution_target(to)?;
        let count = self.execution_inputs.len();
        let input = self
            .execution_inputs
            .get_mut(ordinal)
            .ok_or(ScriptEngineError::ExecutionInputOutOfRange {
                index: ordinal,
                count,
            })?;
        input.targets.push(to);
        Ok(())
    }

    fn check_execution_target(&self, to: NodeIndex) -> Result<()> {
        let target = self.nodes.get(to)?;
        if target.definition().is_pure() {
            return Err(ScriptEngineError::PureExecutionEdge(
                target.node_type().to_string(),
            ));
        }
        Ok(())
    }

    /// Producer of a data input, if it is wired
    pub fn try_get_output_port_of(&self, input: PortIndex) -> Option<PortIndex> {
        self.data_edges.get(&input).copied()
    }

    /// Targets of an execution output, in firing order
    pub fn get_execution_input_ports_of(&self, output: PortIndex) -> &[NodeIndex] {
        self.execution_edges
            .get(&output)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Targets of one of the graph's execution inputs
    pub fn input_execution_edges(&self, ordinal: usize) -> Result<&[NodeIndex]> {
        self.execution_inputs
            .get(ordinal)
            .map(|input| input.targets.as_slice())
            .ok_or(ScriptEngineError::ExecutionInputOutOfRange {
                index: ordinal,
                count: self.execution_inputs.len(),
            })
    }

    pub fn execution_input_count(&self) -> usize {
        self.execution_inputs.len()
    }

    pub fn execution_input_name(&self, ordinal: usize) -> Option<&str> {
        self.execution_inputs.get(ordinal).map(|i| i.name.as_str())
    }

    /// Ordinal of the execution input with the given name
    pub fn find_execution_input(&self, name: &str) -> Option<usize> {
        self.execution_inputs.iter().position(|i| i.name == name)
    }
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        Self {
            id: GraphId::new(),
            name: self.name.clone(),
            nodes: self.nodes.clone(),
            data_edges: self.data_edges.clone(),
            execution_edges: self.execution_edges.clone(),
            execution_inputs: self.execution_inputs.clone(),
            roots: self.roots.clone(),
        }
    }
}

/// Named graphs available for sub-graph invocation
#[derive(Debug, Clone, Default)]
pub struct GraphLibrary {
    graphs: HashMap<String, Arc<Graph>>,
}

impl GraphLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph under its own name, replacing any previous entry
    pub fn insert(&mut self, graph: Graph) -> Arc<Graph> {
        let graph = Arc::new(graph);
        self.graphs.insert(graph.name().to_string(), graph.clone());
        graph
    }

    pub fn get(&self, name: &str) -> Result<Arc<Graph>> {
        self.graphs
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptEngineError::UnknownGraph(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.graphs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
