//! Event types for observing an evaluation
//!
//! The evaluation context reports scheduling progress (node started,
//! deferred, dropped, failed) to an [`EventSink`], which lets hosts stream
//! the run to a debugger or collect it in tests.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::index::{GraphId, NodeIndex};

/// Trait for receiving evaluation events
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered
    fn send(&self, event: EvalEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// How an evaluation was entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EvalEntry {
    /// Started at a root node
    Root { node: NodeIndex },
    /// Started at a numbered execution input
    ExecutionInput { ordinal: usize },
}

/// Events emitted during evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EvalEvent {
    /// A graph was pushed and its queue seeded
    #[serde(rename_all = "camelCase")]
    EvaluationStarted {
        execution_id: String,
        graph_id: GraphId,
        entry: EvalEntry,
    },

    /// A graph's queue drained and the graph was popped
    #[serde(rename_all = "camelCase")]
    EvaluationCompleted {
        execution_id: String,
        graph_id: GraphId,
    },

    /// Evaluation was entered at a node that is not a root
    #[serde(rename_all = "camelCase")]
    NonRootEntry {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        node_type: String,
    },

    /// A node body is about to run
    #[serde(rename_all = "camelCase")]
    NodeStarted {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        node_type: String,
    },

    /// A node body returned successfully
    #[serde(rename_all = "camelCase")]
    NodeCompleted {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        node_type: String,
    },

    /// A node was re-queued behind its pure dependencies
    #[serde(rename_all = "camelCase")]
    NodeDeferred {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        dependencies: usize,
    },

    /// A node was dropped without running
    #[serde(rename_all = "camelCase")]
    NodeDropped {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        reason: String,
    },

    /// A node body returned an error
    #[serde(rename_all = "camelCase")]
    NodeFailed {
        execution_id: String,
        graph_id: GraphId,
        node: NodeIndex,
        error: String,
    },
}

impl EvalEvent {
    /// Node the event refers to, if any
    pub fn node(&self) -> Option<NodeIndex> {
        match self {
            Self::NonRootEntry { node, .. }
            | Self::NodeStarted { node, .. }
            | Self::NodeCompleted { node, .. }
            | Self::NodeDeferred { node, .. }
            | Self::NodeDropped { node, .. }
            | Self::NodeFailed { node, .. } => Some(*node),
            Self::EvaluationStarted { .. } | Self::EvaluationCompleted { .. } => None,
        }
    }
}

/// A no-op event sink that discards all events
///
/// Used when the host does not observe the evaluation.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: EvalEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: Mutex<Vec<EvalEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<EvalEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: EvalEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_vec_event_sink() {
        let mut nodes: SlotMap<NodeIndex, ()> = SlotMap::with_key();
        let node = nodes.insert(());
        let sink = VecEventSink::new();

        sink.send(EvalEvent::NodeDeferred {
            execution_id: "exec1".to_string(),
            graph_id: GraphId::new(),
            node,
            dependencies: 2,
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].node(), Some(node));
        match &events[0] {
            EvalEvent::NodeDeferred { dependencies, .. } => assert_eq!(*dependencies, 2),
            _ => panic!("Expected NodeDeferred event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(EvalEvent::EvaluationCompleted {
            execution_id: "exec1".to_string(),
            graph_id: GraphId::new(),
        })
        .unwrap();
    }

    #[test]
    fn test_event_serialization() {
        let event = EvalEvent::EvaluationStarted {
            execution_id: "exec1".to_string(),
            graph_id: GraphId::new(),
            entry: EvalEntry::ExecutionInput { ordinal: 0 },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "evaluationStarted");
        assert_eq!(json["executionId"], "exec1");
        assert_eq!(json["entry"]["type"], "executionInput");
    }
}
