//! Evaluation context: the scheduler and interpreter
//!
//! An [`EvalContext`] is a single-use session. It evaluates graphs by
//! draining a FIFO queue of impure node invocations, resolving pure data
//! dependencies on demand before each invocation.
//!
//! # Scheduling
//!
//! - **Push**: impure nodes are queued explicitly, by an entry point or by a
//!   running node firing one of its execution outputs
//!   ([`EvalContext::execute_targets_of_port`]).
//! - **Pull**: before a dequeued node runs, every data input wired to an
//!   output that is not cached yet is inspected. Pure producers are queued
//!   ahead of the node and the node is re-queued at the tail; an impure
//!   producer that has not run is an invalid data flow and the node is
//!   dropped.
//! - **Memoization**: a pure node runs at most once per graph per context;
//!   every consumer reads the same cached outputs.
//!
//! Cache entries and node bookkeeping are qualified by [`GraphId`], and each
//! graph on the graph stack has its own queue, so a node body can run a
//! nested evaluation on the same context without disturbing the caller.
//!
//! # Error handling
//!
//! Problems local to one node (broken dependency, missing evaluation
//! routine, failing body) are logged, recorded in
//! [`EvalContext::diagnostics`] and the drain continues with the next node.
//! Only invalid entry calls and exhausted limits abort.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::config::EvalConfig;
use crate::error::{Result, ScriptEngineError};
use crate::events::{EvalEntry, EvalEvent, EventSink, NullEventSink};
use crate::extensions::EvalExtensions;
use crate::graph::Graph;
use crate::index::{GraphId, NodeIndex, PortIndex};
use crate::value::{FromValue, Value};

/// Output cache key: an output port of a node in a specific graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    graph: GraphId,
    port: PortIndex,
}

impl CacheKey {
    fn new(graph: GraphId, port: PortIndex) -> Self {
        Self { graph, port }
    }
}

/// A node in a specific graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    graph: GraphId,
    node: NodeIndex,
}

impl NodeKey {
    fn new(graph: GraphId, node: NodeIndex) -> Self {
        Self { graph, node }
    }
}

/// One entry of the graph stack
struct GraphFrame {
    graph: Arc<Graph>,
    queue: VecDeque<NodeIndex>,
}

/// A problem reported during evaluation
#[derive(Debug)]
pub struct Diagnostic {
    pub graph: GraphId,
    /// Node the problem was attributed to, if any
    pub node: Option<NodeIndex>,
    pub error: ScriptEngineError,
}

/// Counters for one context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Dequeues, including skipped and deferred nodes
    pub steps: usize,
    /// Node bodies invoked
    pub nodes_evaluated: usize,
    /// Times a node was re-queued behind its dependencies
    pub nodes_deferred: usize,
    /// Nodes dropped without running
    pub nodes_dropped: usize,
}

/// Single-use evaluation session
///
/// Create one per top-level evaluation and discard it afterwards; the output
/// cache and bookkeeping have no reset.
pub struct EvalContext {
    execution_id: String,
    config: EvalConfig,
    extensions: Arc<EvalExtensions>,
    events: Arc<dyn EventSink>,
    frames: Vec<GraphFrame>,
    call_stack: Vec<NodeIndex>,
    output_cache: HashMap<CacheKey, Value>,
    /// Nodes whose body has run
    evaluated: HashSet<NodeKey>,
    /// Nodes that will not be attempted again
    dropped: HashSet<NodeKey>,
    diagnostics: Vec<Diagnostic>,
    stats: EvalStats,
}

impl EvalContext {
    /// Create a context with default configuration and no extensions
    pub fn new() -> Self {
        Self {
            execution_id: uuid::Uuid::new_v4().to_string(),
            config: EvalConfig::default(),
            extensions: Arc::new(EvalExtensions::new()),
            events: Arc::new(NullEventSink),
            frames: Vec::new(),
            call_stack: Vec::new(),
            output_cache: HashMap::new(),
            evaluated: HashSet::new(),
            dropped: HashSet::new(),
            diagnostics: Vec::new(),
            stats: EvalStats::default(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_extensions(mut self, extensions: Arc<EvalExtensions>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Host objects available to node bodies
    pub fn extensions(&self) -> &EvalExtensions {
        &self.extensions
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    /// Number of graphs currently on the graph stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Cached value of an output port, if it has been set
    pub fn cached_output(&self, graph: GraphId, port: PortIndex) -> Option<&Value> {
        self.output_cache.get(&CacheKey::new(graph, port))
    }

    pub fn cache_len(&self) -> usize {
        self.output_cache.len()
    }

    /// Whether a node's body has run in this context
    pub fn is_evaluated(&self, graph: GraphId, node: NodeIndex) -> bool {
        self.evaluated.contains(&NodeKey::new(graph, node))
    }

    // ------------------------------------------------------------------
    // Operations for running node bodies
    // ------------------------------------------------------------------

    /// The node currently being evaluated (innermost)
    pub fn active_node(&self) -> Result<NodeIndex> {
        self.call_stack
            .last()
            .copied()
            .ok_or(ScriptEngineError::NoActiveNode)
    }

    /// The graph on top of the graph stack
    pub fn active_graph(&self) -> Result<&Arc<Graph>> {
        self.frames
            .last()
            .map(|frame| &frame.graph)
            .ok_or(ScriptEngineError::NoActiveGraph)
    }

    /// Read a field of the active node
    pub fn get_field<T: FromValue>(&self, index: usize) -> Result<T> {
        let node = self.active_node()?;
        self.active_graph()?.get_node(node)?.try_get_field(index)
    }

    /// Number of inputs (fixed plus variadic) of the active node
    pub fn input_count(&self) -> Result<usize> {
        let node = self.active_node()?;
        Ok(self.active_graph()?.get_node(node)?.input_count())
    }

    /// Resolve an input of the active node
    ///
    /// A wired input yields the cached upstream value; an unwired input
    /// yields its constant.
    pub fn get_input<T: FromValue>(&self, port: usize) -> Result<T> {
        self.get_input_value(port)?.get()
    }

    /// Resolve an input of the active node without a type conversion
    pub fn get_input_value(&self, port: usize) -> Result<&Value> {
        let node = self.active_node()?;
        let graph = self.active_graph()?;
        let input = graph.get_node(node)?.get_input(port)?;

        match graph.try_get_output_port_of(PortIndex::new(node, port)) {
            Some(output) => self
                .output_cache
                .get(&CacheKey::new(graph.id(), output))
                .ok_or(ScriptEngineError::MissingOutput {
                    upstream: output.node,
                    port: output.port,
                }),
            None => input
                .constant()
                .ok_or(ScriptEngineError::UnboundInput { node, port }),
        }
    }

    /// Store a value on an output of the active node
    ///
    /// Visible to every later reader for the rest of this context's life.
    pub fn set_output<T: Into<Value>>(&mut self, port: usize, value: T) -> Result<()> {
        let node = self.active_node()?;
        let graph = self.active_graph()?;
        graph.get_node(node)?.get_output(port)?;

        let key = CacheKey::new(graph.id(), PortIndex::new(node, port));
        self.output_cache.insert(key, value.into());
        Ok(())
    }

    /// Queue every target of one of the active node's execution outputs
    ///
    /// Targets are queued in the order their edges were declared. Not calling
    /// this for any output ends the branch.
    pub fn execute_targets_of_port(&mut self, port: usize) -> Result<()> {
        let node = self.active_node()?;
        let frame = self
            .frames
            .last_mut()
            .ok_or(ScriptEngineError::NoActiveGraph)?;
        frame.graph.get_node(node)?.get_output(port)?;

        let targets = frame
            .graph
            .get_execution_input_ports_of(PortIndex::new(node, port));
        log::debug!(
            "Node {:?} fires output {} to {} target(s)",
            node,
            port,
            targets.len()
        );
        frame.queue.extend(targets.iter().copied());
        Ok(())
    }

    /// Append a node of the active graph to its queue
    pub fn queue_node(&mut self, node: NodeIndex) -> Result<()> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(ScriptEngineError::NoActiveGraph)?;
        frame.graph.get_node(node)?;
        frame.queue.push_back(node);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Evaluate a graph starting at one of its root nodes
    ///
    /// A node whose definition is not a root is reported and evaluated
    /// anyway, unless `strict_roots` is configured.
    pub fn evaluate_graph_from_root(&mut self, graph: Arc<Graph>, root: NodeIndex) -> Result<()> {
        self.check_depth()?;
        let definition = graph.get_node(root)?.definition().clone();
        if !definition.is_root() {
            let error = ScriptEngineError::NotRoot(definition.node_type().to_string());
            self.emit(EvalEvent::NonRootEntry {
                execution_id: self.execution_id.clone(),
                graph_id: graph.id(),
                node: root,
                node_type: definition.node_type().to_string(),
            });
            if self.config.strict_roots {
                log::error!("Refusing to evaluate from non-root node {:?}: {}", root, error);
                return Err(error);
            }
            log::error!("Attempted to evaluate starting from non-root node {:?}", root);
            self.diagnostics.push(Diagnostic {
                graph: graph.id(),
                node: Some(root),
                error,
            });
        }

        self.push_graph(graph, EvalEntry::Root { node: root });
        self.enqueue_on_top(std::iter::once(root));
        let result = self.drain();
        self.pop_graph();
        result
    }

    /// Evaluate a graph through one of its execution inputs
    ///
    /// An ordinal outside the graph's declared execution inputs aborts
    /// before anything is queued.
    pub fn evaluate_graph(&mut self, graph: Arc<Graph>, execution_input: usize) -> Result<()> {
        let count = graph.execution_input_count();
        if execution_input >= count {
            log::error!(
                "Execution input {} out of range for graph '{}' ({} declared)",
                execution_input,
                graph.name(),
                count
            );
            return Err(ScriptEngineError::ExecutionInputOutOfRange {
                index: execution_input,
                count,
            });
        }
        self.check_depth()?;

        let targets = graph.input_execution_edges(execution_input)?.to_vec();
        self.push_graph(
            graph,
            EvalEntry::ExecutionInput {
                ordinal: execution_input,
            },
        );
        self.enqueue_on_top(targets);
        let result = self.drain();
        self.pop_graph();
        result
    }

    // ------------------------------------------------------------------
    // Scheduler internals
    // ------------------------------------------------------------------

    fn check_depth(&self) -> Result<()> {
        if self.frames.len() >= self.config.max_graph_depth {
            log::error!(
                "Graph stack depth limit of {} reached",
                self.config.max_graph_depth
            );
            return Err(ScriptEngineError::GraphDepthExceeded(
                self.config.max_graph_depth,
            ));
        }
        Ok(())
    }

    fn push_graph(&mut self, graph: Arc<Graph>, entry: EvalEntry) {
        if self.frames.is_empty() {
            log::info!("Evaluating graph '{}' ({})", graph.name(), self.execution_id);
        } else {
            log::debug!(
                "Entering nested graph '{}' at depth {}",
                graph.name(),
                self.frames.len()
            );
        }
        self.emit(EvalEvent::EvaluationStarted {
            execution_id: self.execution_id.clone(),
            graph_id: graph.id(),
            entry,
        });
        self.frames.push(GraphFrame {
            graph,
            queue: VecDeque::new(),
        });
    }

    fn pop_graph(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.emit(EvalEvent::EvaluationCompleted {
                execution_id: self.execution_id.clone(),
                graph_id: frame.graph.id(),
            });
            if self.frames.is_empty() {
                log::info!(
                    "Finished graph '{}': {} step(s), {} node(s) evaluated, {} dropped",
                    frame.graph.name(),
                    self.stats.steps,
                    self.stats.nodes_evaluated,
                    self.stats.nodes_dropped
                );
            }
        }
    }

    fn enqueue_on_top(&mut self, nodes: impl IntoIterator<Item = NodeIndex>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.queue.extend(nodes);
        }
    }

    fn dequeue(&mut self) -> Option<NodeIndex> {
        self.frames.last_mut().and_then(|frame| frame.queue.pop_front())
    }

    /// Run the top frame's queue until it is empty
    fn drain(&mut self) -> Result<()> {
        let graph = self.active_graph()?.clone();
        let graph_id = graph.id();

        while let Some(node) = self.dequeue() {
            self.stats.steps += 1;
            if let Some(limit) = self.config.max_steps {
                if self.stats.steps > limit {
                    log::error!("Evaluation exceeded step limit of {}", limit);
                    return Err(ScriptEngineError::StepLimitExceeded(limit));
                }
            }

            let key = NodeKey::new(graph_id, node);
            if self.dropped.contains(&key) {
                log::debug!("Skipping dropped node {:?}", node);
                continue;
            }

            let definition = match graph.get_node(node) {
                Ok(n) => n.definition().clone(),
                Err(e) => {
                    self.drop_node(graph_id, node, e);
                    continue;
                }
            };
            if definition.is_pure() && self.evaluated.contains(&key) {
                log::debug!("Pure node {:?} already evaluated", node);
                continue;
            }

            match self.enqueue_unevaluated_pure_dependencies(&graph, node) {
                Ok(0) => {}
                Ok(count) => {
                    log::debug!(
                        "Deferring node {:?} behind {} pure dependency(ies)",
                        node,
                        count
                    );
                    self.stats.nodes_deferred += 1;
                    self.emit(EvalEvent::NodeDeferred {
                        execution_id: self.execution_id.clone(),
                        graph_id,
                        node,
                        dependencies: count,
                    });
                    self.enqueue_on_top(std::iter::once(node));
                    continue;
                }
                Err(e) => {
                    self.drop_node(graph_id, node, e);
                    continue;
                }
            }

            let Some(evaluation) = definition.evaluation() else {
                let error = ScriptEngineError::MissingEvaluation(definition.node_type().to_string());
                self.drop_node(graph_id, node, error);
                continue;
            };

            log::debug!("Evaluating node {:?} ({})", node, definition.node_type());
            self.emit(EvalEvent::NodeStarted {
                execution_id: self.execution_id.clone(),
                graph_id,
                node,
                node_type: definition.node_type().to_string(),
            });

            self.call_stack.push(node);
            let result = evaluation.evaluate(self);
            self.call_stack.pop();

            self.evaluated.insert(key);
            self.stats.nodes_evaluated += 1;

            match result {
                Ok(()) => self.emit(EvalEvent::NodeCompleted {
                    execution_id: self.execution_id.clone(),
                    graph_id,
                    node,
                    node_type: definition.node_type().to_string(),
                }),
                Err(error) => {
                    log::error!(
                        "Node {:?} ({}) failed: {}",
                        node,
                        definition.node_type(),
                        error
                    );
                    // Dependents of a failed pure node must not re-queue it
                    if definition.is_pure() {
                        self.dropped.insert(key);
                    }
                    self.emit(EvalEvent::NodeFailed {
                        execution_id: self.execution_id.clone(),
                        graph_id,
                        node,
                        error: error.to_string(),
                    });
                    self.diagnostics.push(Diagnostic {
                        graph: graph_id,
                        node: Some(node),
                        error,
                    });
                }
            }
        }

        Ok(())
    }

    /// Queue the pure producers of `node`'s inputs that have not run yet
    ///
    /// Returns how many producers were queued. Fails when a missing value
    /// can never arrive: the producer is impure, was dropped, already ran
    /// without setting the port, or depends back on `node`.
    fn enqueue_unevaluated_pure_dependencies(
        &mut self,
        graph: &Graph,
        node: NodeIndex,
    ) -> Result<usize> {
        let graph_id = graph.id();
        let current = graph.get_node(node)?;
        let mut pending: Vec<NodeIndex> = Vec::new();

        for port in 0..current.input_count() {
            let Some(output) = graph.try_get_output_port_of(PortIndex::new(node, port)) else {
                continue;
            };
            if self.output_cache.contains_key(&CacheKey::new(graph_id, output)) {
                continue;
            }

            let upstream = output.node;
            let upstream_key = NodeKey::new(graph_id, upstream);
            if !graph.get_node(upstream)?.definition().is_pure() {
                return Err(ScriptEngineError::InvalidDataFlow { node, upstream });
            }
            if self.dropped.contains(&upstream_key) {
                return Err(ScriptEngineError::UpstreamDropped { node, upstream });
            }
            if self.evaluated.contains(&upstream_key) {
                return Err(ScriptEngineError::MissingOutput {
                    upstream,
                    port: output.port,
                });
            }
            if !pending.contains(&upstream) {
                pending.push(upstream);
            }
        }

        if pending.is_empty() {
            return Ok(0);
        }
        if current.definition().is_pure() && self.depends_on_itself(graph, node) {
            return Err(ScriptEngineError::CyclicDependency { node });
        }

        let count = pending.len();
        self.enqueue_on_top(pending);
        Ok(count)
    }

    /// Whether `start` is reachable from its own uncached pure producers
    fn depends_on_itself(&self, graph: &Graph, start: NodeIndex) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            let Ok(node) = graph.get_node(current) else {
                continue;
            };
            for port in 0..node.input_count() {
                let Some(output) = graph.try_get_output_port_of(PortIndex::new(current, port))
                else {
                    continue;
                };
                if self
                    .output_cache
                    .contains_key(&CacheKey::new(graph.id(), output))
                {
                    continue;
                }
                if output.node == start {
                    return true;
                }
                let is_pure = graph
                    .get_node(output.node)
                    .map(|n| n.definition().is_pure())
                    .unwrap_or(false);
                if is_pure && visited.insert(output.node) {
                    stack.push(output.node);
                }
            }
        }
        false
    }

    fn drop_node(&mut self, graph: GraphId, node: NodeIndex, error: ScriptEngineError) {
        if error.is_data_flow() {
            log::error!("Invalid graph configuration at node {:?}: {}", node, error);
        } else {
            log::error!("Skipping node {:?}: {}", node, error);
        }
        self.dropped.insert(NodeKey::new(graph, node));
        self.stats.nodes_dropped += 1;
        self.emit(EvalEvent::NodeDropped {
            execution_id: self.execution_id.clone(),
            graph_id: graph,
            node,
            reason: error.to_string(),
        });
        self.diagnostics.push(Diagnostic {
            graph,
            node: Some(node),
            error,
        });
    }

    fn emit(&self, event: EvalEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Failed to deliver evaluation event: {}", e);
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
