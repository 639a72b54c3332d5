use derive_new::new;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
}

impl DataType {
    /// Serialized width in bytes. All supported types are fixed-length.
    pub fn size(&self) -> usize {
        match self {
            DataType::Boolean => 1,
            DataType::TinyInt => 1,
            DataType::SmallInt => 2,
            DataType::Integer => 4,
        }
    }
}

#[derive(Debug, Clone, new)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}
