use std::fs;
use std::path::Path;

use prost::Message;

use crate::error::{Error, Result};
use crate::model::{AttributeDescription, ParameterDescription};
use crate::proto::{AttributeProto, GraphProto, NodeProto, OperandProto, ParameterProto};

/// Assembles a structure file and its weights file.
///
/// Attribute blobs are appended to the weights buffer in insertion order and
/// referenced by offset from the structure.
#[derive(Debug, Clone, Default)]
pub struct ModelWriter {
    graph: GraphProto,
    weights: Vec<u8>,
}

impl ModelWriter {
    pub fn new(name: &str) -> Self {
        Self {
            graph: GraphProto {
                name: name.to_string(),
                ..Default::default()
            },
            weights: Vec::new(),
        }
    }

    /// Declare an operand
    pub fn add_operand(&mut self, name: &str, elem_type: i32, shape: &[i32]) -> &mut Self {
        self.graph.operand.push(OperandProto {
            name: name.to_string(),
            elem_type,
            shape: shape.to_vec(),
        });
        self
    }

    /// Add a node wired to already (or later) declared operands
    pub fn add_node(&mut self, name: &str, op_type: &str, inputs: &[&str], outputs: &[&str]) -> &mut Self {
        self.graph.node.push(NodeProto {
            name: name.to_string(),
            op_type: op_type.to_string(),
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: outputs.iter().map(|s| s.to_string()).collect(),
            param: Vec::new(),
            attr: Vec::new(),
        });
        self
    }

    pub fn add_parameter(
        &mut self,
        node: &str,
        name: &str,
        param: ParameterDescription,
    ) -> Result<&mut Self> {
        let node_proto = self.node_mut(node)?;
        node_proto.param.push(ParameterProto {
            name: name.to_string(),
            r#type: param.type_tag,
            b: param.b,
            i: param.i,
            f: param.f,
            s: param.s,
            ai: param.ai,
            af: param.af,
            strings: param.strings,
        });
        Ok(self)
    }

    pub fn add_attribute(
        &mut self,
        node: &str,
        name: &str,
        attr: AttributeDescription,
    ) -> Result<&mut Self> {
        let offset = self.weights.len() as u64;
        let length = attr.data.len() as u64;

        let node_proto = self.node_mut(node)?;
        node_proto.attr.push(AttributeProto {
            name: name.to_string(),
            elem_type: attr.elem_type,
            shape: attr.shape,
            offset,
            length,
        });
        self.weights.extend_from_slice(&attr.data);
        Ok(self)
    }

    fn node_mut(&mut self, name: &str) -> Result<&mut NodeProto> {
        self.graph
            .node
            .iter_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| Error::OperatorNotFound(name.to_string()))
    }

    /// Encoded structure bytes and weights bytes
    pub fn to_bytes(&self) -> (Vec<u8>, Vec<u8>) {
        (self.graph.encode_to_vec(), self.weights.clone())
    }

    /// Write the structure file and the weights file
    pub fn write(&self, param_path: &Path, bin_path: &Path) -> Result<()> {
        let (structure, weights) = self.to_bytes();
        fs::write(param_path, structure)?;
        fs::write(bin_path, weights)?;
        Ok(())
    }
}
