use serde::{Deserialize, Serialize};

use crate::model::ParameterDescription;

/// Kind of a [`Parameter`], with the description's tag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter)]
pub enum ParameterType {
    Unknown = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    IntArray = 5,
    FloatArray = 6,
    StringArray = 7,
}

impl ParameterType {
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(ParameterType::Unknown),
            1 => Some(ParameterType::Bool),
            2 => Some(ParameterType::Int),
            3 => Some(ParameterType::Float),
            4 => Some(ParameterType::String),
            5 => Some(ParameterType::IntArray),
            6 => Some(ParameterType::FloatArray),
            7 => Some(ParameterType::StringArray),
            _ => None,
        }
    }
}

/// Scalar or array hyper-parameter of an operator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Parameter {
    #[default]
    Unknown,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
}

impl Parameter {
    /// Build from a description entry.
    ///
    /// # Panics
    /// On a type tag outside the closed parameter set.
    pub fn from_description(param: &ParameterDescription) -> Self {
        let parameter_type = ParameterType::from_tag(param.type_tag)
            .unwrap_or_else(|| panic!("Unknown parameter type: {}", param.type_tag));

        match parameter_type {
            ParameterType::Unknown => Parameter::Unknown,
            ParameterType::Bool => Parameter::Bool(param.b),
            ParameterType::Int => Parameter::Int(param.i),
            ParameterType::Float => Parameter::Float(param.f),
            ParameterType::String => Parameter::String(param.s.clone()),
            ParameterType::IntArray => Parameter::IntArray(param.ai.clone()),
            ParameterType::FloatArray => Parameter::FloatArray(param.af.clone()),
            ParameterType::StringArray => Parameter::StringArray(param.strings.clone()),
        }
    }

    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Parameter::Unknown => ParameterType::Unknown,
            Parameter::Bool(_) => ParameterType::Bool,
            Parameter::Int(_) => ParameterType::Int,
            Parameter::Float(_) => ParameterType::Float,
            Parameter::String(_) => ParameterType::String,
            Parameter::IntArray(_) => ParameterType::IntArray,
            Parameter::FloatArray(_) => ParameterType::FloatArray,
            Parameter::StringArray(_) => ParameterType::StringArray,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Parameter::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Parameter::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Parameter::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parameter::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Parameter::IntArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_float_array(&self) -> Option<&[f32]> {
        match self {
            Parameter::FloatArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Parameter::StringArray(values) => Some(values),
            _ => None,
        }
    }
}
