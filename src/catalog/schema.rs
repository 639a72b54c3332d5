use crate::catalog::column::Column;

/// An ordered list of fixed-length columns. Byte offsets of a tuple's fields
/// follow directly from the column order.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Total serialized width of a tuple under this schema.
    pub fn fixed_length(&self) -> usize {
        self.columns.iter().map(|c| c.data_type.size()).sum()
    }

    /// Byte offset of the given column within a serialized tuple.
    pub fn column_offset(&self, index: usize) -> usize {
        self.columns[..index]
            .iter()
            .map(|c| c.data_type.size())
            .sum()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Builds the schema formed by the given column indices, in order.
    pub fn project(&self, attrs: &[usize]) -> Schema {
        Schema::new(attrs.iter().map(|i| self.columns[*i].clone()).collect())
    }
}
