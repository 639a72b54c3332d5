use anyhow::{bail, Result};
use derive_new::new;

use crate::catalog::schema::Schema;
use crate::dbtype::Value;
use crate::storage::table::tuple::Tuple;

/// Which side of a join a column reference resolves against.
pub const LEFT_TUPLE: usize = 0;
pub const RIGHT_TUPLE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// A reference to one column of an input tuple. `tuple_idx` selects the
/// left or right input when evaluated over a join pair and is ignored
/// otherwise.
#[derive(Debug, Clone, new)]
pub struct ColumnValueExpression {
    pub tuple_idx: usize,
    pub col_idx: usize,
}

#[derive(Debug, Clone, new)]
pub struct ConstantExpression {
    pub value: Value,
}

#[derive(Debug, Clone, new)]
pub struct ComparisonExpression {
    pub op: ComparisonOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// A reference to one term of an aggregation's `(group key, aggregates)`
/// pair, usable only in `having` clauses and aggregation output columns.
#[derive(Debug, Clone, new)]
pub struct AggregateRefExpression {
    pub is_group_by: bool,
    pub term_idx: usize,
}

#[derive(Debug, Clone)]
pub enum Expression {
    ColumnValue(ColumnValueExpression),
    Constant(ConstantExpression),
    Comparison(ComparisonExpression),
    AggregateRef(AggregateRefExpression),
}

impl Expression {
    pub fn column(col_idx: usize) -> Self {
        Self::ColumnValue(ColumnValueExpression::new(LEFT_TUPLE, col_idx))
    }

    pub fn join_column(tuple_idx: usize, col_idx: usize) -> Self {
        Self::ColumnValue(ColumnValueExpression::new(tuple_idx, col_idx))
    }

    pub fn constant(value: Value) -> Self {
        Self::Constant(ConstantExpression::new(value))
    }

    pub fn comparison(op: ComparisonOp, left: Expression, right: Expression) -> Self {
        Self::Comparison(ComparisonExpression::new(op, Box::new(left), Box::new(right)))
    }

    pub fn group_by_ref(term_idx: usize) -> Self {
        Self::AggregateRef(AggregateRefExpression::new(true, term_idx))
    }

    pub fn aggregate_ref(term_idx: usize) -> Self {
        Self::AggregateRef(AggregateRefExpression::new(false, term_idx))
    }

    /// Evaluates against a single tuple.
    pub fn evaluate(&self, tuple: &Tuple, schema: &Schema) -> Result<Value> {
        match self {
            Self::ColumnValue(e) => {
                if e.col_idx >= schema.column_count() {
                    bail!(
                        "column index {} out of range for schema of {} columns",
                        e.col_idx,
                        schema.column_count()
                    );
                }
                Ok(tuple.value_at(schema, e.col_idx))
            }
            Self::Constant(e) => Ok(e.value),
            Self::Comparison(e) => {
                let left = e.left.evaluate(tuple, schema)?;
                let right = e.right.evaluate(tuple, schema)?;
                Ok(Value::boolean(Self::apply(e.op, &left, &right)?))
            }
            Self::AggregateRef(_) => {
                bail!("aggregate reference evaluated outside an aggregation")
            }
        }
    }

    /// Evaluates against a join pair; column references pick their side via
    /// `tuple_idx`.
    pub fn evaluate_join(
        &self,
        left: &Tuple,
        left_schema: &Schema,
        right: &Tuple,
        right_schema: &Schema,
    ) -> Result<Value> {
        match self {
            Self::ColumnValue(e) => match e.tuple_idx {
                LEFT_TUPLE => self.evaluate(left, left_schema),
                RIGHT_TUPLE => self.evaluate(right, right_schema),
                other => bail!("join side {} out of range", other),
            },
            Self::Constant(e) => Ok(e.value),
            Self::Comparison(e) => {
                let lhs = e.left.evaluate_join(left, left_schema, right, right_schema)?;
                let rhs = e
                    .right
                    .evaluate_join(left, left_schema, right, right_schema)?;
                Ok(Value::boolean(Self::apply(e.op, &lhs, &rhs)?))
            }
            Self::AggregateRef(_) => {
                bail!("aggregate reference evaluated outside an aggregation")
            }
        }
    }

    /// Evaluates against one aggregation group.
    pub fn evaluate_aggregate(&self, group_bys: &[Value], aggregates: &[Value]) -> Result<Value> {
        match self {
            Self::AggregateRef(e) => {
                let terms = if e.is_group_by { group_bys } else { aggregates };
                if e.term_idx >= terms.len() {
                    bail!("aggregate term {} out of range", e.term_idx);
                }
                Ok(terms[e.term_idx])
            }
            Self::Constant(e) => Ok(e.value),
            Self::Comparison(e) => {
                let left = e.left.evaluate_aggregate(group_bys, aggregates)?;
                let right = e.right.evaluate_aggregate(group_bys, aggregates)?;
                Ok(Value::boolean(Self::apply(e.op, &left, &right)?))
            }
            Self::ColumnValue(_) => {
                bail!("column reference evaluated against an aggregation group")
            }
        }
    }

    fn apply(op: ComparisonOp, left: &Value, right: &Value) -> Result<bool> {
        let ordering = left.try_compare(right)?;
        Ok(match op {
            ComparisonOp::Equal => ordering.is_eq(),
            ComparisonOp::NotEqual => ordering.is_ne(),
            ComparisonOp::LessThan => ordering.is_lt(),
            ComparisonOp::LessThanOrEqual => ordering.is_le(),
            ComparisonOp::GreaterThan => ordering.is_gt(),
            ComparisonOp::GreaterThanOrEqual => ordering.is_ge(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::column::{Column, DataType};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("a".to_string(), DataType::Integer),
            Column::new("b".to_string(), DataType::Integer),
        ])
    }

    #[test]
    fn test_evaluate_comparison() {
        let schema = schema();
        let tuple = Tuple::from_values(&[Value::integer(3), Value::integer(5)], &schema);

        let predicate = Expression::comparison(
            ComparisonOp::LessThan,
            Expression::column(0),
            Expression::column(1),
        );
        assert_eq!(
            predicate.evaluate(&tuple, &schema).unwrap(),
            Value::boolean(true)
        );

        let predicate = Expression::comparison(
            ComparisonOp::Equal,
            Expression::column(1),
            Expression::constant(Value::integer(4)),
        );
        assert_eq!(
            predicate.evaluate(&tuple, &schema).unwrap(),
            Value::boolean(false)
        );
    }

    #[test]
    fn test_evaluate_errors_are_reported() {
        let schema = schema();
        let tuple = Tuple::from_values(&[Value::integer(3), Value::integer(5)], &schema);

        assert!(Expression::column(9).evaluate(&tuple, &schema).is_err());
        let mismatched = Expression::comparison(
            ComparisonOp::Equal,
            Expression::column(0),
            Expression::constant(Value::boolean(true)),
        );
        assert!(mismatched.evaluate(&tuple, &schema).is_err());
        assert!(Expression::aggregate_ref(0).evaluate(&tuple, &schema).is_err());
    }

    #[test]
    fn test_evaluate_join_sides() {
        let schema = schema();
        let left = Tuple::from_values(&[Value::integer(1), Value::integer(2)], &schema);
        let right = Tuple::from_values(&[Value::integer(2), Value::integer(9)], &schema);

        let predicate = Expression::comparison(
            ComparisonOp::Equal,
            Expression::join_column(LEFT_TUPLE, 1),
            Expression::join_column(RIGHT_TUPLE, 0),
        );
        assert_eq!(
            predicate
                .evaluate_join(&left, &schema, &right, &schema)
                .unwrap(),
            Value::boolean(true)
        );
    }

    #[test]
    fn test_evaluate_aggregate_refs() {
        let group_bys = vec![Value::integer(7)];
        let aggregates = vec![Value::integer(100)];

        let having = Expression::comparison(
            ComparisonOp::GreaterThan,
            Expression::aggregate_ref(0),
            Expression::constant(Value::integer(50)),
        );
        assert_eq!(
            having.evaluate_aggregate(&group_bys, &aggregates).unwrap(),
            Value::boolean(true)
        );
        assert_eq!(
            Expression::group_by_ref(0)
                .evaluate_aggregate(&group_bys, &aggregates)
                .unwrap(),
            Value::integer(7)
        );
    }
}
