//! Query plans: the structured instruction the planner produces and the
//! engine consumes.
//!
//! Plans come from a language model, so deserialization is deliberately
//! forgiving. Unknown enum strings map to an `Unknown` variant and optional
//! sections may be missing; only text that is not JSON at all is rejected.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
    #[serde(other)]
    Unknown,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Unknown => "unknown",
        }
    }
}

/// Reduction applied to each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    #[default]
    Sum,
    Avg,
    Count,
    Min,
    Max,
    /// Anything else; reduces like `Sum`.
    #[serde(other)]
    Unknown,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Avg => "avg",
            AggregateFn::Count => "count",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    /// Unrecognised operator; the filter lets every row through.
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
    /// Unrecognised direction; sorts ascending.
    #[serde(other)]
    Unknown,
}

impl SortDir {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortDir::Desc)
    }
}

/// What a sort orders by. `Auto` keeps the field-name heuristic used by
/// existing plans; the other two pin the choice explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortTarget {
    Value,
    Label,
    #[default]
    #[serde(other)]
    Auto,
}

impl SortTarget {
    fn is_auto(&self) -> bool {
        matches!(self, SortTarget::Auto)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub r#fn: AggregateFn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub op: FilterOp,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub dir: SortDir,
    #[serde(default, skip_serializing_if = "SortTarget::is_auto")]
    pub target: SortTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub group_by: String,
    #[serde(default)]
    pub aggregate: Aggregate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
}

impl QueryPlan {
    pub fn new(group_by: impl Into<String>, field: impl Into<String>, r#fn: AggregateFn) -> Self {
        Self {
            group_by: group_by.into(),
            aggregate: Aggregate { field: field.into(), r#fn },
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        self.filter = Some(Filter { field: field.into(), op, value: value.into() });
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.sort_by = Some(SortBy { field: field.into(), dir, target: SortTarget::Auto });
        self
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no JSON object found in model response")]
    NoJson,
    #[error("query plan is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Pull a query plan out of free-form model text.
///
/// The span from the first `{` to the last `}` is parsed, so surrounding
/// prose or Markdown code fences are ignored.
pub fn extract_plan(text: &str) -> Result<QueryPlan, PlanError> {
    let text = text.trim();
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(PlanError::NoJson);
    };
    if end < start {
        return Err(PlanError::NoJson);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_plan() {
        let plan = extract_plan(
            r#"{
                "chartType": "line",
                "groupBy": "product",
                "aggregate": {"field": "revenue", "fn": "avg"},
                "filter": {"field": "region", "op": "eq", "value": "North"},
                "sortBy": {"field": "revenue", "dir": "desc"},
                "title": "Revenue",
                "explanation": "Average revenue per product"
            }"#,
        )
        .unwrap();
        assert_eq!(plan.chart_type, ChartType::Line);
        assert_eq!(plan.group_by, "product");
        assert_eq!(plan.aggregate.r#fn, AggregateFn::Avg);
        let filter = plan.filter.unwrap();
        assert_eq!(filter.op, FilterOp::Eq);
        assert_eq!(filter.value, "North");
        let sort = plan.sort_by.unwrap();
        assert_eq!(sort.dir, SortDir::Desc);
        assert_eq!(sort.target, SortTarget::Auto);
    }

    #[test]
    fn unknown_enum_values_do_not_fail() {
        let plan = extract_plan(
            r#"{"chartType": "radar", "groupBy": "a",
                "aggregate": {"field": "b", "fn": "median"},
                "filter": {"field": "a", "op": "between", "value": "x"},
                "sortBy": {"field": "b", "dir": "sideways", "target": "weird"}}"#,
        )
        .unwrap();
        assert_eq!(plan.chart_type, ChartType::Unknown);
        assert_eq!(plan.aggregate.r#fn, AggregateFn::Unknown);
        assert_eq!(plan.filter.unwrap().op, FilterOp::Unknown);
        let sort = plan.sort_by.unwrap();
        assert_eq!(sort.dir, SortDir::Unknown);
        assert_eq!(sort.target, SortTarget::Auto);
    }

    #[test]
    fn explicit_sort_target_round_trips() {
        let plan = extract_plan(
            r#"{"groupBy": "a", "aggregate": {"field": "b", "fn": "sum"},
                "sortBy": {"field": "a", "dir": "asc", "target": "value"}}"#,
        )
        .unwrap();
        assert_eq!(plan.sort_by.as_ref().unwrap().target, SortTarget::Value);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["sortBy"]["target"], "value");

        let back: QueryPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn filter_value_accepts_numbers() {
        let plan = extract_plan(
            r#"{"groupBy": "a", "aggregate": {"field": "b", "fn": "sum"},
                "filter": {"field": "b", "op": "gt", "value": 100}}"#,
        )
        .unwrap();
        assert_eq!(plan.filter.unwrap().value, "100");
    }

    #[test]
    fn surrounding_text_and_fences_are_ignored() {
        let text = "Here is the plan:\n```json\n{\"groupBy\": \"city\", \"aggregate\": {\"field\": \"temp_f\", \"fn\": \"max\"}}\n```\nEnjoy!";
        let plan = extract_plan(text).unwrap();
        assert_eq!(plan.group_by, "city");
        assert_eq!(plan.aggregate.r#fn, AggregateFn::Max);
        assert!(plan.filter.is_none());
        assert!(plan.sort_by.is_none());
        assert_eq!(plan.title, "");
    }

    #[test]
    fn missing_or_broken_json_is_an_error() {
        assert!(matches!(extract_plan("no plan here"), Err(PlanError::NoJson)));
        assert!(matches!(extract_plan("} backwards {"), Err(PlanError::NoJson)));
        assert!(matches!(extract_plan("{\"groupBy\": }"), Err(PlanError::Malformed(_))));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let plan = QueryPlan::new("cat", "amt", AggregateFn::Sum).with_sort("amt", SortDir::Desc);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["groupBy"], "cat");
        assert_eq!(json["aggregate"]["fn"], "sum");
        assert_eq!(json["sortBy"]["dir"], "desc");
        assert!(json["sortBy"].get("target").is_none());
        assert!(json.get("filter").is_none());
    }
}
