pub mod parser;
pub mod error;
pub mod model;
pub mod proto;
pub mod data;
pub mod runtime;

// Re-export commonly used types
pub use model::{AttributeDescription, GraphDescription, NodeDescription, OperandDescription, ParameterDescription};
pub use error::{Error, Result};
pub use data::Tensor;
pub use parser::{DescriptionLoader, MemoryLoader, ModelWriter, ProtoModelLoader};
pub use runtime::{
    Attribute, AttributeElement, DataType, GraphOptions, GraphState, GraphSummary, NodeId, Operand, Operator,
    OperatorSummary, Parameter, ParameterType, RuntimeGraph,
};
