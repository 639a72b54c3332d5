use crate::catalog::schema::Schema;
use crate::common::rid::Rid;
use crate::dbtype::Value;

/// A fixed-length byte record, decoded through a schema. The tuple itself
/// is schema-agnostic; byte offsets come from the schema at access time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
    rid: Rid,
    data: Vec<u8>,
}

impl Tuple {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            rid: Rid::invalid(),
            data,
        }
    }

    /// Serializes one value per schema column, in column order.
    pub fn from_values(values: &[Value], schema: &Schema) -> Self {
        assert_eq!(values.len(), schema.column_count());
        let mut data = Vec::with_capacity(schema.fixed_length());
        for (value, column) in values.iter().zip(schema.columns()) {
            assert_eq!(value.data_type(), column.data_type);
            data.extend_from_slice(&value.to_bytes());
        }
        Self::new(data)
    }

    pub fn rid(&self) -> Rid {
        self.rid
    }

    pub fn set_rid(&mut self, rid: Rid) {
        self.rid = rid;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decodes the value of one column.
    pub fn value_at(&self, schema: &Schema, index: usize) -> Value {
        let column = schema.column(index);
        let offset = schema.column_offset(index);
        Value::from_bytes(
            &self.data[offset..offset + column.data_type.size()],
            column.data_type,
        )
    }

    /// Decodes every column.
    pub fn values(&self, schema: &Schema) -> Vec<Value> {
        (0..schema.column_count())
            .map(|i| self.value_at(schema, i))
            .collect()
    }

    /// Extracts the key columns into a tuple under the key schema, the form
    /// indexes store.
    pub fn key_tuple(&self, schema: &Schema, key_attrs: &[usize], key_schema: &Schema) -> Tuple {
        let values: Vec<Value> = key_attrs.iter().map(|i| self.value_at(schema, *i)).collect();
        Tuple::from_values(&values, key_schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::column::{Column, DataType};

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Column::new("id".to_string(), DataType::Integer),
            Column::new("active".to_string(), DataType::Boolean),
            Column::new("score".to_string(), DataType::SmallInt),
        ])
    }

    #[test]
    fn test_tuple_round_trip() {
        let schema = sample_schema();
        let values = vec![
            Value::integer(7),
            Value::boolean(true),
            Value::smallint(-3),
        ];
        let tuple = Tuple::from_values(&values, &schema);
        assert_eq!(tuple.data().len(), schema.fixed_length());
        assert_eq!(tuple.values(&schema), values);
        assert_eq!(tuple.value_at(&schema, 2), Value::smallint(-3));
    }

    #[test]
    fn test_key_tuple_projection() {
        let schema = sample_schema();
        let tuple = Tuple::from_values(
            &[Value::integer(7), Value::boolean(false), Value::smallint(9)],
            &schema,
        );
        let key_schema = schema.project(&[2]);
        let key = tuple.key_tuple(&schema, &[2], &key_schema);
        assert_eq!(key.values(&key_schema), vec![Value::smallint(9)]);
    }
}
