//! Wire types of the structure description file.
//!
//! The structure file is a single protobuf-encoded [`GraphProto`]. Weight
//! blobs are not stored inline: each [`AttributeProto`] points at a byte
//! range of the companion weights file.

/// Whole graph: operands are declared once and referenced by name from nodes.
#[derive(Clone, PartialEq, prost_derive::Message)]
pub struct GraphProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub node: Vec<NodeProto>,
    #[prost(message, repeated, tag = "3")]
    pub operand: Vec<OperandProto>,
}

#[derive(Clone, PartialEq, prost_derive::Message)]
pub struct NodeProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub op_type: String,
    /// Names of consumed operands, in input order.
    #[prost(string, repeated, tag = "3")]
    pub input: Vec<String>,
    /// Names of produced operands.
    #[prost(string, repeated, tag = "4")]
    pub output: Vec<String>,
    #[prost(message, repeated, tag = "5")]
    pub param: Vec<ParameterProto>,
    #[prost(message, repeated, tag = "6")]
    pub attr: Vec<AttributeProto>,
}

#[derive(Clone, PartialEq, prost_derive::Message)]
pub struct OperandProto {
    #[prost(string, tag = "1")]
    pub name: String,
    /// Element type tag: 0 unknown, 1 float32.
    #[prost(int32, tag = "2")]
    pub elem_type: i32,
    /// Batch first; -1 marks a dynamic dimension.
    #[prost(int32, repeated, tag = "3")]
    pub shape: Vec<i32>,
}

/// Named hyper-parameter. `r#type` selects which value slot is meaningful.
#[derive(Clone, PartialEq, prost_derive::Message)]
pub struct ParameterProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "2")]
    pub r#type: i32,
    #[prost(bool, tag = "3")]
    pub b: bool,
    #[prost(int32, tag = "4")]
    pub i: i32,
    #[prost(float, tag = "5")]
    pub f: f32,
    #[prost(string, tag = "6")]
    pub s: String,
    #[prost(int32, repeated, tag = "7")]
    pub ai: Vec<i32>,
    #[prost(float, repeated, tag = "8")]
    pub af: Vec<f32>,
    #[prost(string, repeated, tag = "9")]
    pub strings: Vec<String>,
}

#[derive(Clone, PartialEq, prost_derive::Message)]
pub struct AttributeProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "2")]
    pub elem_type: i32,
    #[prost(int32, repeated, tag = "3")]
    pub shape: Vec<i32>,
    /// Byte offset into the weights file.
    #[prost(uint64, tag = "4")]
    pub offset: u64,
    /// Byte length of the blob.
    #[prost(uint64, tag = "5")]
    pub length: u64,
}
