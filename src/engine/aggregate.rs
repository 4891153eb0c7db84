//! Grouping rows by one column and reducing each group to a number.

use indexmap::IndexMap;

use crate::engine::number::number_or_zero;
use crate::engine::table::Row;
use crate::plan::{Aggregate, AggregateFn};

/// Label for rows whose table has no such group-by column.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Per-group numeric contributions, keyed by group label in order of first
/// appearance.
pub type Partitions = IndexMap<String, Vec<f64>>;

/// Split `rows` into groups by the `group_by` column and collect each row's
/// contribution: `1` for counts, otherwise the aggregated field read as a
/// number (unreadable text counts as `0`).
pub fn partition(rows: &[&Row], group_by: &str, aggregate: &Aggregate) -> Partitions {
    let mut groups = Partitions::new();
    for row in rows {
        let key = row.get(group_by).unwrap_or(UNKNOWN_GROUP);
        let contribution = match aggregate.r#fn {
            AggregateFn::Count => 1.0,
            _ => number_or_zero(row.get_or_empty(&aggregate.field)),
        };
        match groups.get_mut(key) {
            Some(nums) => nums.push(contribution),
            None => {
                groups.insert(key.to_string(), vec![contribution]);
            }
        }
    }
    groups
}

/// Reduce one group's contributions. `nums` is never empty for a group
/// produced by [`partition`]; an empty slice reduces to `0`.
pub fn reduce(nums: &[f64], r#fn: AggregateFn) -> f64 {
    if nums.is_empty() {
        return 0.0;
    }
    let total: f64 = nums.iter().sum();
    match r#fn {
        AggregateFn::Sum | AggregateFn::Unknown => total,
        AggregateFn::Avg => total / nums.len() as f64,
        AggregateFn::Count => nums.len() as f64,
        AggregateFn::Min => nums.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateFn::Max => nums.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Group and reduce, returning parallel label and value sequences in
/// first-appearance order.
pub fn aggregate(rows: &[&Row], group_by: &str, aggregate: &Aggregate) -> (Vec<String>, Vec<f64>) {
    partition(rows, group_by, aggregate)
        .into_iter()
        .map(|(label, nums)| {
            let value = reduce(&nums, aggregate.r#fn);
            (label, value)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("cat", "B"), ("amt", "5")]),
            Row::from_pairs([("cat", "A"), ("amt", "10")]),
            Row::from_pairs([("cat", "B"), ("amt", "oops")]),
            Row::from_pairs([("cat", "A"), ("amt", "20")]),
            Row::from_pairs([("cat", "C"), ("amt", "-4")]),
        ]
    }

    fn agg(field: &str, r#fn: AggregateFn) -> Aggregate {
        Aggregate { field: field.into(), r#fn }
    }

    #[test]
    fn labels_follow_first_appearance() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let (labels, values) = aggregate(&refs, "cat", &agg("amt", AggregateFn::Sum));
        assert_eq!(labels, ["B", "A", "C"]);
        assert_eq!(values, [5.0, 30.0, -4.0]);
    }

    #[test]
    fn every_function_reduces_per_group() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let values = |f| aggregate(&refs, "cat", &agg("amt", f)).1;

        assert_eq!(values(AggregateFn::Avg), [2.5, 15.0, -4.0]);
        assert_eq!(values(AggregateFn::Count), [2.0, 2.0, 1.0]);
        assert_eq!(values(AggregateFn::Min), [0.0, 10.0, -4.0]);
        assert_eq!(values(AggregateFn::Max), [5.0, 20.0, -4.0]);
        assert_eq!(values(AggregateFn::Unknown), values(AggregateFn::Sum));
    }

    #[test]
    fn count_ignores_field_content() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let (_, values) = aggregate(&refs, "cat", &agg("no_such_column", AggregateFn::Count));
        assert_eq!(values, [2.0, 2.0, 1.0]);
    }

    #[test]
    fn missing_group_column_collapses_to_unknown() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let (labels, values) = aggregate(&refs, "region", &agg("amt", AggregateFn::Sum));
        assert_eq!(labels, [UNKNOWN_GROUP]);
        assert_eq!(values, [31.0]);
    }

    #[test]
    fn missing_aggregate_column_contributes_zero() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let (_, values) = aggregate(&refs, "cat", &agg("price", AggregateFn::Max));
        assert_eq!(values, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_group_value_is_its_own_group() {
        let rows = vec![
            Row::from_pairs([("cat", ""), ("amt", "1")]),
            Row::from_pairs([("cat", "A"), ("amt", "2")]),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let (labels, _) = aggregate(&refs, "cat", &agg("amt", AggregateFn::Sum));
        assert_eq!(labels, ["", "A"]);
    }

    #[test]
    fn no_rows_no_groups() {
        let (labels, values) = aggregate(&[], "cat", &agg("amt", AggregateFn::Sum));
        assert!(labels.is_empty());
        assert!(values.is_empty());
        assert_eq!(reduce(&[], AggregateFn::Avg), 0.0);
    }
}
