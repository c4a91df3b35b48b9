use num_traits::ToPrimitive;

use super::datatype::DataType;
use crate::data::Tensor;

/// Named, typed data slot between a producing and a consuming operator.
///
/// `shape` is the logical shape from the description: a batch dimension
/// followed by one to three tensor dimensions. For float32 operands `data`
/// holds one tensor per batch entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operand {
    pub name: String,
    pub data_type: DataType,
    pub shape: Vec<i32>,
    pub data: Vec<Tensor>,
}

impl Operand {
    pub fn new(name: impl Into<String>, data_type: DataType, shape: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            data_type,
            shape,
            data: Vec::new(),
        }
    }

    /// Build an operand from its description shape, allocating one zeroed
    /// tensor per batch entry when `allocate` is set and the type is float32.
    ///
    /// # Panics
    /// If the shape is not two to four dimensions, if the batch dimension is
    /// negative (dynamic), or if a tensor dimension is not positive when
    /// tensors are allocated.
    pub fn from_description(name: impl Into<String>, data_type: DataType, shape: Vec<i32>, allocate: bool) -> Self {
        let mut operand = Self::new(name, data_type, shape);
        operand.check_shape();

        if allocate && operand.data_type == DataType::Float32 {
            let dims = operand.tensor_dims();
            operand.data = (0..operand.batch_size()).map(|_| Tensor::from_shape(&dims)).collect();
        }
        operand
    }

    fn check_shape(&self) {
        assert!(
            (2..=4).contains(&self.shape.len()),
            "Operand {} has unsupported shape {:?}: expected 2 to 4 dimensions",
            self.name,
            self.shape
        );
        assert!(
            self.shape[0] >= 0,
            "Operand {} has a dynamic batch dimension {}",
            self.name,
            self.shape[0]
        );
    }

    /// Number of entries in the batch dimension
    pub fn batch_size(&self) -> usize {
        self.shape.first().and_then(|b| b.to_usize()).unwrap_or(0)
    }

    /// Shape of each per-batch tensor, i.e. the logical shape without the batch dimension.
    ///
    /// # Panics
    /// If any of these dimensions is not positive.
    pub fn tensor_dims(&self) -> Vec<usize> {
        self.shape
            .iter()
            .skip(1)
            .map(|&dim| match dim.to_usize() {
                Some(d) if d > 0 => d,
                _ => panic!("Operand {} has non-positive dimension in shape {:?}", self.name, self.shape),
            })
            .collect()
    }

    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }
}
