use std::collections::BTreeMap;

/// Parsed form of an external graph description.
///
/// Type tags are kept exactly as the description states them; the runtime
/// graph decides which tags it accepts.
#[derive(Debug, Clone, Default)]
pub struct GraphDescription {
    pub name: String,
    pub nodes: Vec<NodeDescription>,
}

impl GraphDescription {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by name
    pub fn node(&self, name: &str) -> Option<&NodeDescription> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Node in the external description
#[derive(Debug, Clone, Default)]
pub struct NodeDescription {
    pub name: String,
    pub op_type: String,
    pub inputs: Vec<OperandDescription>,
    pub outputs: Vec<OperandDescription>,
    pub params: BTreeMap<String, ParameterDescription>,
    pub attrs: BTreeMap<String, AttributeDescription>,
}

/// Operand as seen from one node, with its producer and consumers resolved
#[derive(Debug, Clone, Default)]
pub struct OperandDescription {
    pub name: String,
    /// Name of the producing node; `None` for operands nothing in the graph produces.
    pub producer: Option<String>,
    /// Names of consuming nodes, in description order.
    pub consumers: Vec<String>,
    pub elem_type: i32,
    pub shape: Vec<i32>,
}

/// Hyper-parameter with a raw type tag and every value slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterDescription {
    pub type_tag: i32,
    pub b: bool,
    pub i: i32,
    pub f: f32,
    pub s: String,
    pub ai: Vec<i32>,
    pub af: Vec<f32>,
    pub strings: Vec<String>,
}

impl ParameterDescription {
    pub fn bool(value: bool) -> Self {
        Self { type_tag: 1, b: value, ..Default::default() }
    }

    pub fn int(value: i32) -> Self {
        Self { type_tag: 2, i: value, ..Default::default() }
    }

    pub fn float(value: f32) -> Self {
        Self { type_tag: 3, f: value, ..Default::default() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self { type_tag: 4, s: value.into(), ..Default::default() }
    }

    pub fn int_array(values: Vec<i32>) -> Self {
        Self { type_tag: 5, ai: values, ..Default::default() }
    }

    pub fn float_array(values: Vec<f32>) -> Self {
        Self { type_tag: 6, af: values, ..Default::default() }
    }

    pub fn string_array(values: Vec<String>) -> Self {
        Self { type_tag: 7, strings: values, ..Default::default() }
    }
}

/// Weight blob attached to a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDescription {
    pub elem_type: i32,
    pub shape: Vec<i32>,
    pub data: Vec<u8>,
}

impl AttributeDescription {
    /// Little-endian float32 blob
    pub fn from_f32(shape: Vec<i32>, values: &[f32]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 4);
        for &val in values {
            data.extend_from_slice(&val.to_le_bytes());
        }
        Self { elem_type: 1, shape, data }
    }
}
