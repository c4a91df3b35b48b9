use serde::{Deserialize, Serialize};

use super::graph::GraphState;

/// Serializable snapshot of a runtime graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub state: GraphState,
    pub input_name: String,
    pub output_name: String,
    pub operator_count: usize,
    /// Operator names in execution order; empty until the graph is built
    pub topo_order: Vec<String>,
    pub operators: Vec<OperatorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSummary {
    pub name: String,
    pub op_type: String,
    pub defined: bool,
    pub inputs: Vec<String>,
    pub successors: Vec<String>,
    pub output_shape: Option<Vec<i32>>,
    pub params: Vec<String>,
    pub attrs: Vec<String>,
}
