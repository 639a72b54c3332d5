use std::cmp::Ordering;
use std::fmt;

use anyhow::{bail, Result};

use crate::catalog::column::DataType;

use super::{boolean::Boolean, integer::Integer, smallint::SmallInt, tinyint::TinyInt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Boolean(Boolean),
    TinyInt(TinyInt),
    SmallInt(SmallInt),
    Integer(Integer),
}

impl Value {
    pub fn boolean(value: bool) -> Self {
        Self::Boolean(Boolean::new(value))
    }

    pub fn tinyint(value: i8) -> Self {
        Self::TinyInt(TinyInt::new(value))
    }

    pub fn smallint(value: i16) -> Self {
        Self::SmallInt(SmallInt::new(value))
    }

    pub fn integer(value: i32) -> Self {
        Self::Integer(Integer::new(value))
    }

    pub fn from_bytes(bytes: &[u8], data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Boolean(Boolean::from_bytes(bytes)),
            DataType::TinyInt => Self::TinyInt(TinyInt::from_bytes(bytes)),
            DataType::SmallInt => Self::SmallInt(SmallInt::from_bytes(bytes)),
            DataType::Integer => Self::Integer(Integer::from_bytes(bytes)),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Boolean(v) => v.to_bytes().to_vec(),
            Self::TinyInt(v) => v.to_bytes().to_vec(),
            Self::SmallInt(v) => v.to_bytes().to_vec(),
            Self::Integer(v) => v.to_bytes().to_vec(),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::TinyInt(_) => DataType::TinyInt,
            Self::SmallInt(_) => DataType::SmallInt,
            Self::Integer(_) => DataType::Integer,
        }
    }

    /// Compares two values of the same data type.
    pub fn try_compare(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Self::Boolean(v1), Self::Boolean(v2)) => Ok(v1.value.cmp(&v2.value)),
            (Self::TinyInt(v1), Self::TinyInt(v2)) => Ok(v1.value.cmp(&v2.value)),
            (Self::SmallInt(v1), Self::SmallInt(v2)) => Ok(v1.value.cmp(&v2.value)),
            (Self::Integer(v1), Self::Integer(v2)) => Ok(v1.value.cmp(&v2.value)),
            _ => bail!(
                "cannot compare {:?} against {:?}",
                self.data_type(),
                other.data_type()
            ),
        }
    }

    /// Integer addition; both operands must be of the same integral type.
    pub fn add(&self, other: &Self) -> Result<Value> {
        match (self, other) {
            (Self::TinyInt(v1), Self::TinyInt(v2)) => {
                Ok(Self::tinyint(v1.value.wrapping_add(v2.value)))
            }
            (Self::SmallInt(v1), Self::SmallInt(v2)) => {
                Ok(Self::smallint(v1.value.wrapping_add(v2.value)))
            }
            (Self::Integer(v1), Self::Integer(v2)) => {
                Ok(Self::integer(v1.value.wrapping_add(v2.value)))
            }
            _ => bail!(
                "cannot add {:?} to {:?}",
                other.data_type(),
                self.data_type()
            ),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Self::Boolean(v) => Ok(v.value),
            _ => bail!("value of type {:?} is not a boolean", self.data_type()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v.value),
            Self::TinyInt(v) => write!(f, "{}", v.value),
            Self::SmallInt(v) => write!(f, "{}", v.value),
            Self::Integer(v) => write!(f, "{}", v.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_byte_round_trip() {
        let values = [
            Value::boolean(true),
            Value::tinyint(-5),
            Value::smallint(300),
            Value::integer(123456),
        ];
        for value in values {
            let bytes = value.to_bytes();
            assert_eq!(bytes.len(), value.data_type().size());
            assert_eq!(value, Value::from_bytes(&bytes, value.data_type()));
        }
    }

    #[test]
    fn test_value_compare_and_add() {
        let a = Value::integer(1);
        let b = Value::integer(2);
        assert_eq!(a.try_compare(&b).unwrap(), Ordering::Less);
        assert_eq!(a.add(&b).unwrap(), Value::integer(3));
        assert!(a.try_compare(&Value::boolean(true)).is_err());
        assert!(a.add(&Value::smallint(1)).is_err());
    }
}
