//! Row filtering by a single field/operator/literal predicate.

use crate::engine::number::parse_number;
use crate::engine::table::Row;
use crate::plan::{Filter, FilterOp};

impl Filter {
    /// Whether `row` satisfies this predicate.
    ///
    /// Text comparisons ignore case. Numeric comparisons need both the cell
    /// and the literal to read as numbers; otherwise the row does not match.
    /// An unknown operator matches everything.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get_or_empty(&self.field);
        match self.op {
            FilterOp::Eq => cell.to_lowercase() == self.value.to_lowercase(),
            FilterOp::Neq => cell.to_lowercase() != self.value.to_lowercase(),
            FilterOp::Contains => cell.to_lowercase().contains(&self.value.to_lowercase()),
            FilterOp::Gt => self.compare(cell, |c, v| c > v),
            FilterOp::Lt => self.compare(cell, |c, v| c < v),
            FilterOp::Gte => self.compare(cell, |c, v| c >= v),
            FilterOp::Lte => self.compare(cell, |c, v| c <= v),
            FilterOp::Unknown => true,
        }
    }

    fn compare(&self, cell: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
        match (parse_number(cell), parse_number(&self.value)) {
            (Some(c), Some(v)) => cmp(c, v),
            _ => false,
        }
    }
}

/// Keep the rows matching `filter`, in their original order. No filter
/// keeps every row.
pub fn apply_filter<'a>(rows: &'a [Row], filter: Option<&Filter>) -> Vec<&'a Row> {
    match filter {
        None => rows.iter().collect(),
        Some(f) => rows.iter().filter(|row| f.matches(row)).collect(),
    }
}
