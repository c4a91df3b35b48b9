use std::collections::BTreeMap;

use super::attribute::Attribute;
use super::operand::Operand;
use super::parameter::Parameter;

/// Index of an operator in the graph's arena
pub type NodeId = usize;

/// One computation node of the runtime graph.
///
/// Operators live in the graph's arena and refer to each other by
/// [`NodeId`]; successor edges are keyed by consumer name so traversal
/// visits them in ascending name order.
#[derive(Debug, Clone, Default)]
pub struct Operator {
    pub id: NodeId,
    pub name: String,
    pub op_type: String,
    /// Set by the execution layer once a kernel is bound
    pub has_forward: bool,

    /// Input operands in description order
    pub input_operands_seq: Vec<Operand>,
    /// Input lookup keyed by producer name, into `input_operands_seq`
    input_operands: BTreeMap<String, usize>,
    /// Output operand, named after this operator; `None` for sinks
    pub output_operand: Option<Operand>,

    /// Consumer names, in description order
    pub output_names: Vec<String>,
    /// Successor edges by consumer name
    pub output_operators: BTreeMap<String, NodeId>,

    pub params: BTreeMap<String, Parameter>,
    pub attrs: BTreeMap<String, Attribute>,

    pub(crate) visited: bool,
    pub(crate) defined: bool,
}

impl Operator {
    /// Placeholder for a name that may be defined later
    pub(crate) fn placeholder(id: NodeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Register an input operand under `key`. The first operand registered
    /// for a key wins the lookup; every operand stays in the sequence.
    pub fn add_input_operand(&mut self, key: impl Into<String>, operand: Operand) {
        let index = self.input_operands_seq.len();
        self.input_operands_seq.push(operand);
        self.input_operands.entry(key.into()).or_insert(index);
    }

    /// Input operand produced by `producer`
    pub fn input_operand(&self, producer: &str) -> Option<&Operand> {
        self.input_operands
            .get(producer)
            .and_then(|&index| self.input_operands_seq.get(index))
    }

    /// Input keys with their operands, in key order
    pub fn input_operands(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.input_operands
            .iter()
            .filter_map(move |(key, &index)| self.input_operands_seq.get(index).map(|op| (key.as_str(), op)))
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.get(name)
    }

    pub fn attr_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attrs.get_mut(name)
    }

    /// Successor ids in traversal order
    pub fn successors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.output_operators.values().copied()
    }

    /// Whether the last `build()` traversal reached this operator
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Whether a description node defined this operator, as opposed to it
    /// only being referenced as a consumer
    pub fn is_defined(&self) -> bool {
        self.defined
    }
}
