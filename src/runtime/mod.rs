pub mod attribute;
pub mod datatype;
pub mod graph;
pub mod operand;
pub mod operator;
pub mod options;
pub mod parameter;
pub mod summary;

pub use attribute::{Attribute, AttributeElement};
pub use datatype::DataType;
pub use graph::{GraphState, RuntimeGraph};
pub use operand::Operand;
pub use operator::{NodeId, Operator};
pub use options::GraphOptions;
pub use parameter::{Parameter, ParameterType};
pub use summary::{GraphSummary, OperatorSummary};
