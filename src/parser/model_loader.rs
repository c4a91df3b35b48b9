use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use prost::Message;

use crate::error::{Error, Result};
use crate::model::{
    AttributeDescription, GraphDescription, NodeDescription, OperandDescription,
    ParameterDescription,
};
use crate::proto::{AttributeProto, GraphProto, NodeProto, OperandProto, ParameterProto};

/// Source of graph descriptions.
///
/// The runtime graph only talks to this trait, so the on-disk format is
/// interchangeable.
pub trait DescriptionLoader: Send + Sync {
    /// Parse the structure file and resolve weights from the weights file
    fn load(&self, param_path: &Path, bin_path: &Path) -> Result<GraphDescription>;
}

/// Loader for protobuf structure files with a flat binary weights file
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoModelLoader;

impl DescriptionLoader for ProtoModelLoader {
    fn load(&self, param_path: &Path, bin_path: &Path) -> Result<GraphDescription> {
        Self::load_model(param_path, bin_path)
    }
}

/// Loader that hands out a description already held in memory.
///
/// The paths passed to `load` are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    description: GraphDescription,
}

impl MemoryLoader {
    pub fn new(description: GraphDescription) -> Self {
        Self { description }
    }
}

impl DescriptionLoader for MemoryLoader {
    fn load(&self, _param_path: &Path, _bin_path: &Path) -> Result<GraphDescription> {
        Ok(self.description.clone())
    }
}

impl ProtoModelLoader {
    /// Load a description from a structure file and a weights file
    pub fn load_model(param_path: &Path, bin_path: &Path) -> Result<GraphDescription> {
        let structure = Self::read_file(param_path)?;
        let weights = Self::read_file(bin_path)?;

        Self::load_model_from_bytes(&structure, &weights)
    }

    /// Load a description from in-memory structure and weights bytes
    pub fn load_model_from_bytes(structure: &[u8], weights: &[u8]) -> Result<GraphDescription> {
        let graph_proto = Self::deserialize_graph_proto(structure)?;
        Self::convert_proto_to_description(graph_proto, weights)
    }

    /// Deserialize protobuf bytes into a GraphProto
    pub fn deserialize_graph_proto(bytes: &[u8]) -> Result<GraphProto> {
        GraphProto::decode(bytes).map_err(Error::ProtobufError)
    }

    fn read_file(path: &Path) -> Result<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to open file: {}", e))
        })?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to read file: {}", e))
        })?;

        Ok(buffer)
    }

    /// Convert the wire graph to the description model, resolving operand
    /// producers/consumers and slicing weight blobs.
    pub fn convert_proto_to_description(
        proto: GraphProto,
        weights: &[u8],
    ) -> Result<GraphDescription> {
        let mut operands: HashMap<&str, &OperandProto> = HashMap::new();
        for operand in &proto.operand {
            if operand.name.is_empty() {
                return Err(Error::MissingField("Operand is missing a name".to_string()));
            }
            if operands.insert(operand.name.as_str(), operand).is_some() {
                return Err(Error::InvalidModel(format!(
                    "Operand {} is declared more than once",
                    operand.name
                )));
            }
        }

        // Producer and consumers of every operand, derived from node wiring
        let mut producers: HashMap<&str, &str> = HashMap::new();
        let mut consumers: HashMap<&str, Vec<String>> = HashMap::new();

        for node in &proto.node {
            if node.name.is_empty() {
                return Err(Error::MissingField(format!(
                    "Node of type {} is missing a name",
                    node.op_type
                )));
            }

            for output in &node.output {
                Self::lookup_operand(&operands, output, &node.name)?;
                if let Some(previous) = producers.insert(output.as_str(), node.name.as_str()) {
                    return Err(Error::InvalidModel(format!(
                        "Operand {} is produced by both {} and {}",
                        output, previous, node.name
                    )));
                }
            }

            for input in &node.input {
                Self::lookup_operand(&operands, input, &node.name)?;
                consumers
                    .entry(input.as_str())
                    .or_insert_with(Vec::new)
                    .push(node.name.clone());
            }
        }

        let nodes = proto
            .node
            .iter()
            .map(|node| Self::convert_node_proto(node, &operands, &producers, &consumers, weights))
            .collect::<Result<Vec<_>>>()?;

        Ok(GraphDescription {
            name: proto.name,
            nodes,
        })
    }

    fn lookup_operand<'a>(
        operands: &HashMap<&str, &'a OperandProto>,
        name: &str,
        node_name: &str,
    ) -> Result<&'a OperandProto> {
        operands.get(name).copied().ok_or_else(|| {
            Error::InvalidModel(format!(
                "Node {} references undeclared operand {}",
                node_name, name
            ))
        })
    }

    fn convert_node_proto(
        node_proto: &NodeProto,
        operands: &HashMap<&str, &OperandProto>,
        producers: &HashMap<&str, &str>,
        consumers: &HashMap<&str, Vec<String>>,
        weights: &[u8],
    ) -> Result<NodeDescription> {
        let resolve = |name: &String| -> Result<OperandDescription> {
            let operand = Self::lookup_operand(operands, name, &node_proto.name)?;
            Ok(OperandDescription {
                name: operand.name.clone(),
                producer: producers.get(name.as_str()).map(|p| p.to_string()),
                consumers: consumers.get(name.as_str()).cloned().unwrap_or_default(),
                elem_type: operand.elem_type,
                shape: operand.shape.clone(),
            })
        };

        let inputs = node_proto.input.iter().map(&resolve).collect::<Result<Vec<_>>>()?;
        let outputs = node_proto.output.iter().map(&resolve).collect::<Result<Vec<_>>>()?;

        let mut params = BTreeMap::new();
        for param in &node_proto.param {
            params.insert(param.name.clone(), Self::convert_parameter_proto(param));
        }

        let mut attrs = BTreeMap::new();
        for attr in &node_proto.attr {
            let value = Self::convert_attribute_proto(attr, weights, &node_proto.name)?;
            attrs.insert(attr.name.clone(), value);
        }

        Ok(NodeDescription {
            name: node_proto.name.clone(),
            op_type: node_proto.op_type.clone(),
            inputs,
            outputs,
            params,
            attrs,
        })
    }

    fn convert_parameter_proto(param: &ParameterProto) -> ParameterDescription {
        ParameterDescription {
            type_tag: param.r#type,
            b: param.b,
            i: param.i,
            f: param.f,
            s: param.s.clone(),
            ai: param.ai.clone(),
            af: param.af.clone(),
            strings: param.strings.clone(),
        }
    }

    /// Slice the attribute's blob out of the weights file
    fn convert_attribute_proto(
        attr: &AttributeProto,
        weights: &[u8],
        node_name: &str,
    ) -> Result<AttributeDescription> {
        let start = usize::try_from(attr.offset).ok();
        let end = start.and_then(|s| usize::try_from(attr.length).ok().and_then(|l| s.checked_add(l)));

        let data = match (start, end) {
            (Some(start), Some(end)) if end <= weights.len() => weights[start..end].to_vec(),
            _ => {
                return Err(Error::InvalidModel(format!(
                    "Attribute {} of node {} spans bytes {}..{} but the weights file has {} bytes",
                    attr.name,
                    node_name,
                    attr.offset,
                    attr.offset.saturating_add(attr.length),
                    weights.len()
                )))
            }
        };

        Ok(AttributeDescription {
            elem_type: attr.elem_type,
            shape: attr.shape.clone(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operand(name: &str, shape: Vec<i32>) -> OperandProto {
        OperandProto {
            name: name.to_string(),
            elem_type: 1,
            shape,
        }
    }

    fn node(name: &str, inputs: &[&str], outputs: &[&str]) -> NodeProto {
        NodeProto {
            name: name.to_string(),
            op_type: "nn.ReLU".to_string(),
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: outputs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_producers_and_consumers_resolved() {
        let proto = GraphProto {
            name: "chain".to_string(),
            node: vec![
                node("in", &[], &["0"]),
                node("relu", &["0"], &["1"]),
                node("out", &["1"], &[]),
            ],
            operand: vec![operand("0", vec![1, 4]), operand("1", vec![1, 4])],
        };

        let description = ProtoModelLoader::convert_proto_to_description(proto, &[]).unwrap();
        assert_eq!(description.nodes.len(), 3);

        let relu = description.node("relu").unwrap();
        assert_eq!(relu.inputs[0].producer.as_deref(), Some("in"));
        assert_eq!(relu.outputs[0].consumers, vec!["out".to_string()]);
        assert_eq!(relu.outputs[0].shape, vec![1, 4]);
    }

    #[test]
    fn test_undeclared_operand_rejected() {
        let proto = GraphProto {
            name: String::new(),
            node: vec![node("relu", &["missing"], &[])],
            operand: vec![],
        };

        let result = ProtoModelLoader::convert_proto_to_description(proto, &[]);
        assert!(matches!(result, Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_attribute_out_of_range_rejected() {
        let mut linear = node("linear", &[], &[]);
        linear.attr.push(AttributeProto {
            name: "weight".to_string(),
            elem_type: 1,
            shape: vec![2],
            offset: 4,
            length: 8,
        });
        let proto = GraphProto {
            name: String::new(),
            node: vec![linear],
            operand: vec![],
        };

        let result = ProtoModelLoader::convert_proto_to_description(proto, &[0u8; 8]);
        assert!(matches!(result, Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_attribute_blob_sliced() {
        let mut linear = node("linear", &[], &[]);
        linear.attr.push(AttributeProto {
            name: "bias".to_string(),
            elem_type: 1,
            shape: vec![1],
            offset: 4,
            length: 4,
        });
        let proto = GraphProto {
            name: String::new(),
            node: vec![linear],
            operand: vec![],
        };
        let weights = [0u8, 0, 0, 0, 0x00, 0x00, 0x80, 0x3F];

        let description = ProtoModelLoader::convert_proto_to_description(proto, &weights).unwrap();
        let bias = &description.nodes[0].attrs["bias"];
        assert_eq!(bias.data, vec![0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = ProtoModelLoader::load_model_from_bytes(&[0xff, 0xff, 0xff], &[]);
        assert!(matches!(result, Err(Error::ProtobufError(_))));
    }
}
