use bytes::Buf;
use half::f16;

use super::datatype::DataType;

/// Element type that can be decoded from a little-endian weight blob
pub trait AttributeElement: Sized + Copy {
    const DATA_TYPE: DataType;

    /// Read one element, advancing the buffer
    fn read(buf: &mut &[u8]) -> Self;
}

macro_rules! attribute_element {
    ($ty:ty, $data_type:expr, $getter:ident) => {
        impl AttributeElement for $ty {
            const DATA_TYPE: DataType = $data_type;

            fn read(buf: &mut &[u8]) -> Self {
                buf.$getter()
            }
        }
    };
}

attribute_element!(f32, DataType::Float32, get_f32_le);
attribute_element!(f64, DataType::Float64, get_f64_le);
attribute_element!(i64, DataType::Int64, get_i64_le);
attribute_element!(i32, DataType::Int32, get_i32_le);
attribute_element!(i16, DataType::Int16, get_i16_le);
attribute_element!(i8, DataType::Int8, get_i8);
attribute_element!(u8, DataType::UInt8, get_u8);

impl AttributeElement for f16 {
    const DATA_TYPE: DataType = DataType::Float16;

    fn read(buf: &mut &[u8]) -> Self {
        f16::from_bits(buf.get_u16_le())
    }
}

/// Weight blob of an operator, e.g. a convolution kernel or a bias vector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub data_type: DataType,
    pub shape: Vec<i32>,
    pub weight_data: Vec<u8>,
}

impl Attribute {
    /// # Panics
    /// If the blob length is not a whole number of `data_type` elements.
    pub fn new(data_type: DataType, shape: Vec<i32>, weight_data: Vec<u8>) -> Self {
        let element_size = data_type.size_in_bytes();
        assert!(
            element_size == 0 || weight_data.len() % element_size == 0,
            "Attribute blob of {} bytes is not a whole number of {} elements",
            weight_data.len(),
            data_type
        );

        Self {
            data_type,
            shape,
            weight_data,
        }
    }

    /// Decode the blob as a sequence of `T`, releasing the blob afterwards
    /// when `clear_after` is set.
    ///
    /// # Panics
    /// If the blob is empty (or was already cleared), if `T` does not match
    /// the stored element type, or if the blob length is not a whole number
    /// of elements.
    pub fn get<T: AttributeElement>(&mut self, clear_after: bool) -> Vec<T> {
        let weights = self.values::<T>();
        if clear_after {
            self.clear_weight();
        }
        weights
    }

    /// Decode the blob without releasing it. Same panics as [`Attribute::get`].
    pub fn values<T: AttributeElement>(&self) -> Vec<T> {
        assert!(
            !self.weight_data.is_empty(),
            "Attribute weight data is empty or has been cleared"
        );
        assert_ne!(self.data_type, DataType::Unknown, "Attribute has an unknown weight type");
        assert_eq!(
            T::DATA_TYPE,
            self.data_type,
            "Attribute holds {} weights but {} was requested",
            self.data_type,
            T::DATA_TYPE
        );

        let element_size = self.data_type.size_in_bytes();
        assert_eq!(
            self.weight_data.len() % element_size,
            0,
            "Attribute blob of {} bytes is not a whole number of {} elements",
            self.weight_data.len(),
            self.data_type
        );

        let mut buf = self.weight_data.as_slice();
        let mut weights = Vec::with_capacity(self.weight_data.len() / element_size);
        while buf.has_remaining() {
            weights.push(T::read(&mut buf));
        }
        weights
    }

    /// Release the weight blob
    pub fn clear_weight(&mut self) {
        if !self.weight_data.is_empty() {
            self.weight_data = Vec::new();
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.weight_data.is_empty()
    }

    /// Element count implied by the declared shape
    pub fn element_count(&self) -> usize {
        self.shape.iter().map(|&d| d.max(0) as usize).product()
    }
}
