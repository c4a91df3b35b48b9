use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::datatype::DataType;
use super::operand::Operand;
use super::operator::{NodeId, Operator};
use super::options::GraphOptions;
use super::parameter::Parameter;
use super::summary::{GraphSummary, OperatorSummary};
use crate::error::{Error, Result};
use crate::model::{AttributeDescription, NodeDescription, OperandDescription, ParameterDescription};
use crate::parser::{DescriptionLoader, ProtoModelLoader};

/// Lifecycle state of a [`RuntimeGraph`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GraphState {
    NeedInit = -2,
    NeedBuild = -1,
    Completed = 0,
}

/// Computation graph loaded from a structure file and a weights file.
///
/// ```text
/// new ──► NeedInit ──init()──► NeedBuild ──build()──► Completed
/// ```
///
/// Operators are stored in an arena and addressed by [`NodeId`]; a name
/// index resolves consumers that are referenced before their own node is
/// read.
pub struct RuntimeGraph {
    param_path: String,
    bin_path: String,
    input_name: String,
    output_name: String,
    state: GraphState,
    operators: Vec<Operator>,
    operators_map: HashMap<String, NodeId>,
    topo_operators: Vec<NodeId>,
    options: GraphOptions,
    loader: Box<dyn DescriptionLoader>,
}

impl fmt::Debug for RuntimeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeGraph")
            .field("param_path", &self.param_path)
            .field("bin_path", &self.bin_path)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("state", &self.state)
            .field("operators", &self.operators.len())
            .field("topo_operators", &self.topo_operators)
            .field("options", &self.options)
            .finish()
    }
}

impl RuntimeGraph {
    pub fn new(param_path: impl Into<String>, bin_path: impl Into<String>) -> Self {
        Self::with_options(param_path, bin_path, GraphOptions::default())
    }

    pub fn with_options(param_path: impl Into<String>, bin_path: impl Into<String>, options: GraphOptions) -> Self {
        Self {
            param_path: param_path.into(),
            bin_path: bin_path.into(),
            input_name: String::new(),
            output_name: String::new(),
            state: GraphState::NeedInit,
            operators: Vec::new(),
            operators_map: HashMap::new(),
            topo_operators: Vec::new(),
            options,
            loader: Box::new(ProtoModelLoader),
        }
    }

    /// Replace the description loader
    pub fn with_loader<L: DescriptionLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn set_param_path(&mut self, param_path: impl Into<String>) {
        self.param_path = param_path.into();
    }

    pub fn set_bin_path(&mut self, bin_path: impl Into<String>) {
        self.bin_path = bin_path.into();
    }

    pub fn param_path(&self) -> &str {
        &self.param_path
    }

    pub fn bin_path(&self) -> &str {
        &self.bin_path
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Load the description and build the operator set.
    ///
    /// A no-op once the graph is past `NeedInit`. Missing paths, loader
    /// failures, an empty description and duplicate node definitions are
    /// reported; unsupported type tags, output counts and operand shapes
    /// panic.
    pub fn init(&mut self) -> Result<()> {
        if self.state != GraphState::NeedInit {
            debug!("Graph already initialized, state is {}", self.state);
            return Ok(());
        }

        if self.param_path.is_empty() {
            error!("The structure file path of the graph is empty");
            return Err(Error::MissingPath("structure".to_string()));
        }
        if self.bin_path.is_empty() {
            error!("The weights file path of the graph is empty");
            return Err(Error::MissingPath("weights".to_string()));
        }

        let description = match self
            .loader
            .load(Path::new(&self.param_path), Path::new(&self.bin_path))
        {
            Ok(description) => description,
            Err(e) => {
                error!("Can not load the graph description {}: {}", self.param_path, e);
                return Err(e);
            }
        };

        if description.is_empty() {
            error!("The graph description {} has no operators", self.param_path);
            return Err(Error::EmptyGraph);
        }

        self.reset();
        if let Err(e) = self.init_operators(&description.nodes) {
            error!("Failed to initialize graph {}: {}", self.param_path, e);
            self.reset();
            return Err(e);
        }

        self.state = GraphState::NeedBuild;
        info!(
            "Graph {} initialized with {} operators",
            self.param_path,
            self.operators.len()
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.operators.clear();
        self.operators_map.clear();
        self.topo_operators.clear();
    }

    fn init_operators(&mut self, nodes: &[NodeDescription]) -> Result<()> {
        for node in nodes {
            if node.name.is_empty() {
                warn!("Skipping an unnamed {} node", node.op_type);
                continue;
            }

            let id = self.create_op(&node.name);
            if self.operators[id].defined {
                return Err(Error::InvalidModel(format!(
                    "Operator {} is defined more than once",
                    node.name
                )));
            }

            {
                let op = &mut self.operators[id];
                op.op_type = node.op_type.clone();
                op.defined = true;
            }

            self.init_input_operands(id, &node.inputs);
            self.init_output_operands(id, &node.outputs);
            self.init_op_attrs(id, &node.attrs);
            self.init_op_params(id, &node.params);

            debug!(
                "Operator {} ({}) has {} inputs, {} successors, {} params, {} attrs",
                node.name,
                node.op_type,
                self.operators[id].input_operands_seq.len(),
                self.operators[id].output_operators.len(),
                self.operators[id].params.len(),
                self.operators[id].attrs.len()
            );
        }

        for op in self.operators.iter().filter(|op| !op.defined) {
            if self.options.require_defined_operators {
                return Err(Error::UndefinedOperator(op.name.clone()));
            }
            warn!("Operator {} is referenced but never defined", op.name);
        }
        Ok(())
    }

    /// Id of the operator called `name`, inserting a placeholder if absent
    fn create_op(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.operators_map.get(name) {
            return id;
        }
        let id = self.operators.len();
        self.operators.push(Operator::placeholder(id, name));
        self.operators_map.insert(name.to_string(), id);
        id
    }

    fn operand_data_type(operand: &OperandDescription) -> DataType {
        DataType::from_description_tag(operand.elem_type).unwrap_or_else(|| {
            panic!(
                "Unknown element type {} of operand {}",
                operand.elem_type, operand.name
            )
        })
    }

    fn init_input_operands(&mut self, id: NodeId, inputs: &[OperandDescription]) {
        let allocate = self.options.allocate_operand_data;
        let op = &mut self.operators[id];

        for input in inputs {
            let data_type = Self::operand_data_type(input);
            // keyed by the producing operator, whose output operand carries its name
            let key = input.producer.clone().unwrap_or_else(|| input.name.clone());
            let operand = Operand::from_description(key.clone(), data_type, input.shape.clone(), allocate);
            op.add_input_operand(key, operand);
        }
    }

    fn init_output_operands(&mut self, id: NodeId, outputs: &[OperandDescription]) {
        let output = match outputs {
            [] => return,
            [output] => output,
            _ => panic!(
                "Operator {} has {} outputs, only one is supported",
                self.operators[id].name,
                outputs.len()
            ),
        };

        let allocate = self.options.allocate_operand_data && self.options.allocate_output_tensors;
        let data_type = Self::operand_data_type(output);
        let name = self.operators[id].name.clone();
        let operand = Operand::from_description(name, data_type, output.shape.clone(), allocate);
        self.operators[id].output_operand = Some(operand);

        for consumer in &output.consumers {
            let consumer_id = self.create_op(consumer);
            let op = &mut self.operators[id];
            op.output_names.push(consumer.clone());
            op.output_operators.insert(consumer.clone(), consumer_id);
        }
    }

    fn init_op_attrs(&mut self, id: NodeId, attrs: &BTreeMap<String, AttributeDescription>) {
        let op = &mut self.operators[id];
        for (name, attr) in attrs {
            match DataType::from_description_tag(attr.elem_type) {
                Some(DataType::Float32) => {
                    op.attrs.insert(
                        name.clone(),
                        Attribute::new(DataType::Float32, attr.shape.clone(), attr.data.clone()),
                    );
                }
                _ => panic!(
                    "Unsupported element type {} of attribute {} in operator {}",
                    attr.elem_type, name, op.name
                ),
            }
        }
    }

    fn init_op_params(&mut self, id: NodeId, params: &BTreeMap<String, ParameterDescription>) {
        let op = &mut self.operators[id];
        for (name, param) in params {
            op.params.insert(name.clone(), Parameter::from_description(param));
        }
    }

    /// Compute the execution order starting at `input_name`.
    ///
    /// Operators are ordered by reverse post-order of a depth-first walk
    /// along successor edges, so only operators reachable from the entry
    /// appear. `output_name` is stored for the execution layer.
    ///
    /// # Panics
    /// If called before a successful `init()`, or on a cycle when cycle
    /// detection is enabled.
    pub fn build(&mut self, input_name: &str, output_name: &str) -> Result<()> {
        match self.state {
            GraphState::NeedInit => panic!("The graph must be initialized first: build before init"),
            GraphState::Completed => {
                debug!("Graph {} is already built", self.param_path);
                return Ok(());
            }
            GraphState::NeedBuild => {}
        }

        let entry = match self.operators_map.get(input_name) {
            Some(&id) => id,
            None => {
                error!("Can not find the input operator {} in the graph", input_name);
                return Err(Error::OperatorNotFound(input_name.to_string()));
            }
        };

        self.input_name = input_name.to_string();
        self.output_name = output_name.to_string();

        for op in &mut self.operators {
            op.visited = false;
        }
        self.topo_operators = self.reverse_post_order(entry);

        self.state = GraphState::Completed;
        info!(
            "Graph {} built from {}: {} of {} operators scheduled",
            self.param_path,
            input_name,
            self.topo_operators.len(),
            self.operators.len()
        );
        Ok(())
    }

    fn reverse_post_order(&mut self, entry: NodeId) -> Vec<NodeId> {
        let detect_cycles = self.options.detect_cycles;
        let mut on_stack = vec![false; self.operators.len()];
        let mut post_order = Vec::with_capacity(self.operators.len());

        // (operator, its successors, index of the next successor to visit)
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = Vec::new();
        self.operators[entry].visited = true;
        on_stack[entry] = true;
        stack.push((entry, self.operators[entry].successors().collect(), 0));

        while let Some((current, successors, cursor)) = stack.last_mut() {
            let current = *current;
            let next = successors.get(*cursor).copied();
            *cursor += 1;

            match next {
                Some(successor) => {
                    if on_stack[successor] && detect_cycles {
                        panic!(
                            "Cycle detected: operator {} leads back to {}",
                            self.operators[current].name, self.operators[successor].name
                        );
                    }
                    if self.operators[successor].visited {
                        continue;
                    }

                    debug!(
                        "Visiting {} from {}",
                        self.operators[successor].name, self.operators[current].name
                    );
                    self.operators[successor].visited = true;
                    on_stack[successor] = true;
                    stack.push((successor, self.operators[successor].successors().collect(), 0));
                }
                None => {
                    stack.pop();
                    on_stack[current] = false;
                    post_order.push(current);
                }
            }
        }

        post_order.reverse();
        post_order
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    /// Every operator, including those unreachable from the entry
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn operator(&self, id: NodeId) -> Option<&Operator> {
        self.operators.get(id)
    }

    pub fn operator_mut(&mut self, id: NodeId) -> Option<&mut Operator> {
        self.operators.get_mut(id)
    }

    pub fn operator_by_name(&self, name: &str) -> Option<&Operator> {
        self.operators_map.get(name).and_then(|&id| self.operators.get(id))
    }

    /// Operators in execution order.
    ///
    /// # Panics
    /// If the graph has not been built.
    pub fn get_topo_seq(&self) -> Vec<&Operator> {
        assert_eq!(
            self.state,
            GraphState::Completed,
            "The topological sequence is only available after build"
        );
        self.topo_operators.iter().map(|&id| &self.operators[id]).collect()
    }

    /// Operator ids in execution order; empty until the graph is built
    pub fn topo_order(&self) -> &[NodeId] {
        &self.topo_operators
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn summary(&self) -> GraphSummary {
        let operators = self
            .operators
            .iter()
            .map(|op| OperatorSummary {
                name: op.name.clone(),
                op_type: op.op_type.clone(),
                defined: op.defined,
                inputs: op.input_operands().map(|(key, _)| key.to_string()).collect(),
                successors: op.output_operators.keys().cloned().collect(),
                output_shape: op.output_operand.as_ref().map(|o| o.shape.clone()),
                params: op.params.keys().cloned().collect(),
                attrs: op.attrs.keys().cloned().collect(),
            })
            .collect();

        GraphSummary {
            state: self.state,
            input_name: self.input_name.clone(),
            output_name: self.output_name.clone(),
            operator_count: self.operators.len(),
            topo_order: self
                .topo_operators
                .iter()
                .map(|&id| self.operators[id].name.clone())
                .collect(),
            operators,
        }
    }

    pub fn summary_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}
