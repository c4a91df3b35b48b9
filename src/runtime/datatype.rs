use serde::{Deserialize, Serialize};

/// Element type of operands and attribute weights
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum DataType {
    #[default]
    Unknown = 0,
    Float32 = 1,
    Float64 = 2,
    Float16 = 3,
    Int32 = 4,
    Int64 = 5,
    Int16 = 6,
    Int8 = 7,
    UInt8 = 8,
}

impl DataType {
    /// Map an element-type tag of the graph description.
    ///
    /// Descriptions only ever carry `0` (unknown) and `1` (float32); every
    /// other tag yields `None`.
    pub fn from_description_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(DataType::Unknown),
            1 => Some(DataType::Float32),
            _ => None,
        }
    }

    /// Size of one element in bytes; zero for `Unknown`
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DataType::Unknown => 0,
            DataType::Float32 => 4,
            DataType::Float64 => 8,
            DataType::Float16 => 2,
            DataType::Int32 => 4,
            DataType::Int64 => 8,
            DataType::Int16 => 2,
            DataType::Int8 => 1,
            DataType::UInt8 => 1,
        }
    }
}
