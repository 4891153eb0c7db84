//! Query-plan execution over an in-memory table.
//!
//! The pipeline is filter, then group and reduce, then an optional sort, then
//! assembly into a labelled series. Every stage is infallible: bad numbers
//! count as zero, missing columns fall back to empty text or the
//! [`UNKNOWN_GROUP`] label, and unknown operators pass rows through. An empty
//! result is a valid answer meaning nothing matched.

pub mod aggregate;
pub mod filter;
pub mod number;
pub mod result;
pub mod sort;
pub mod table;

use tracing::debug;

use crate::plan::QueryPlan;

pub use aggregate::UNKNOWN_GROUP;
pub use filter::apply_filter;
pub use result::{AnalysisResult, ExecutionResult, Series};
pub use table::{parse_csv, ParsedTable, Row};

/// Run `plan` against `table`.
///
/// Pure function of its inputs: the same table and plan always yield the
/// same result, and the table is only borrowed for the call.
pub fn execute_query(table: &ParsedTable, plan: &QueryPlan) -> ExecutionResult {
    let rows = apply_filter(table.rows(), plan.filter.as_ref());
    debug!(total = table.len(), kept = rows.len(), "filter applied");

    let (labels, values) = aggregate::aggregate(&rows, &plan.group_by, &plan.aggregate);
    debug!(groups = labels.len(), "rows grouped");

    let (labels, values) = sort::sort_groups(
        labels,
        values,
        plan.sort_by.as_ref(),
        &plan.aggregate.field,
        table.headers(),
    );

    ExecutionResult::new(labels, plan.aggregate.field.clone(), values)
}

/// Run `plan` and pair the result with it.
pub fn analyze(table: &ParsedTable, plan: QueryPlan) -> AnalysisResult {
    let result = execute_query(table, &plan);
    AnalysisResult::new(result, plan)
}
