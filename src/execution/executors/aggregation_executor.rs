use std::collections::HashMap;

use anyhow::Result;
use itertools::izip;

use crate::catalog::Schema;
use crate::common::rid::Rid;
use crate::dbtype::Value;
use crate::execution::executors::Executor;
use crate::execution::plans::aggregation::{AggregationPlanNode, AggregationType};
use crate::storage::table::tuple::Tuple;

/// In-memory hash aggregation table mapping group keys to running
/// aggregate values.
struct SimpleAggregationHashTable {
    aggregate_types: Vec<AggregationType>,
    groups: HashMap<Vec<Value>, Vec<Value>>,
}

impl SimpleAggregationHashTable {
    fn new(aggregate_types: Vec<AggregationType>) -> Self {
        Self {
            aggregate_types,
            groups: HashMap::new(),
        }
    }

    fn initial_aggregates(aggregate_types: &[AggregationType]) -> Vec<Value> {
        aggregate_types
            .iter()
            .map(|agg_type| match agg_type {
                AggregationType::Count => Value::integer(0),
                AggregationType::Sum => Value::integer(0),
                AggregationType::Min => Value::integer(i32::MAX),
                AggregationType::Max => Value::integer(i32::MIN),
            })
            .collect()
    }

    /// Folds one input row into its group: count increments, sum adds,
    /// min/max compare.
    fn insert_combine(&mut self, group_key: Vec<Value>, inputs: Vec<Value>) -> Result<()> {
        let aggregates = self
            .groups
            .entry(group_key)
            .or_insert_with(|| Self::initial_aggregates(&self.aggregate_types));
        for (agg_type, aggregate, input) in
            izip!(&self.aggregate_types, aggregates.iter_mut(), &inputs)
        {
            match agg_type {
                AggregationType::Count => *aggregate = aggregate.add(&Value::integer(1))?,
                AggregationType::Sum => *aggregate = aggregate.add(input)?,
                AggregationType::Min => {
                    if input.try_compare(aggregate)?.is_lt() {
                        *aggregate = *input;
                    }
                }
                AggregationType::Max => {
                    if input.try_compare(aggregate)?.is_gt() {
                        *aggregate = *input;
                    }
                }
            }
        }
        Ok(())
    }

    fn into_groups(self) -> Vec<(Vec<Value>, Vec<Value>)> {
        self.groups.into_iter().collect()
    }
}

/// AggregationExecutor drains its child into a hash aggregation table
/// during `init`, then emits one output tuple per group that passes the
/// plan's `having` clause.
pub struct AggregationExecutor<'a> {
    plan: &'a AggregationPlanNode,
    child: Box<dyn Executor + 'a>,
    groups: Vec<(Vec<Value>, Vec<Value>)>,
    cursor: usize,
}

impl<'a> AggregationExecutor<'a> {
    pub fn new(plan: &'a AggregationPlanNode, child: Box<dyn Executor + 'a>) -> Self {
        Self {
            plan,
            child,
            groups: Vec::new(),
            cursor: 0,
        }
    }
}

impl Executor for AggregationExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.child.init()?;
        self.cursor = 0;

        let mut table = SimpleAggregationHashTable::new(self.plan.aggregate_types.clone());
        let child_schema = self.child.output_schema().clone();
        let mut tuple = Tuple::default();
        let mut rid = Rid::default();
        while self.child.next(&mut tuple, &mut rid)? {
            let group_key = self
                .plan
                .group_by_exprs
                .iter()
                .map(|e| e.evaluate(&tuple, &child_schema))
                .collect::<Result<Vec<_>>>()?;
            let inputs = self
                .plan
                .aggregate_exprs
                .iter()
                .map(|e| e.evaluate(&tuple, &child_schema))
                .collect::<Result<Vec<_>>>()?;
            table.insert_combine(group_key, inputs)?;
        }
        self.groups = table.into_groups();
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        // groups failing `having` are skipped without surfacing to the caller
        while let Some((group_key, aggregates)) = self.groups.get(self.cursor) {
            self.cursor += 1;
            let passes = match &self.plan.having {
                Some(having) => having
                    .evaluate_aggregate(group_key, aggregates)?
                    .as_boolean()?,
                None => true,
            };
            if !passes {
                continue;
            }
            let values = self
                .plan
                .output_exprs
                .iter()
                .map(|e| e.evaluate_aggregate(group_key, aggregates))
                .collect::<Result<Vec<_>>>()?;
            *tuple = Tuple::from_values(&values, &self.plan.output_schema);
            *rid = Rid::default();
            return Ok(true);
        }
        Ok(false)
    }

    fn output_schema(&self) -> &Schema {
        &self.plan.output_schema
    }
}
