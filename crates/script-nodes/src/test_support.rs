//! Helpers for driving pure nodes in unit tests

use std::sync::Arc;

use script_engine::{
    EvalContext, Graph, NodeCategory, NodeDefinition, NodeIndex, NodeMetadata, PortMetadata,
    Value, ValueType,
};

/// Impure root that reads input 0 and nothing else
pub(crate) fn probe() -> Arc<NodeDefinition> {
    Arc::new(NodeDefinition::new(
        NodeMetadata {
            node_type: "probe".to_string(),
            category: NodeCategory::Output,
            label: "Probe".to_string(),
            description: "Pulls one value".to_string(),
            inputs: vec![PortMetadata::data("value", "Value", ValueType::Any)],
            variadic: None,
            outputs: Vec::new(),
            fields: Vec::new(),
            is_pure: false,
            is_root: true,
        },
        |ctx: &mut EvalContext| ctx.get_input::<Value>(0).map(|_| ()),
    ))
}

/// Wire `producer`'s output `port` into a probe and evaluate from the probe
pub(crate) fn pull(mut graph: Graph, producer: NodeIndex, port: usize) -> (EvalContext, Arc<Graph>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let root = graph.add_root(script_engine::Node::new(probe()));
    graph
        .add_edge(producer, port, root, 0)
        .expect("probe edge");
    let graph = Arc::new(graph);

    let mut ctx = EvalContext::new();
    ctx.evaluate_graph_from_root(graph.clone(), root)
        .expect("probe evaluation");
    (ctx, graph)
}
