//! Message text sent to the planning model.

use serde::Serialize;

use crate::engine::{ParsedTable, Row};

pub const SYSTEM_PROMPT: &str = r#"You are a data analyst assistant. Given a dataset schema and sample data, generate a query plan to answer the user's question.

Return ONLY valid JSON with this exact structure (no markdown, no extra text):
{
  "chartType": "bar" | "line" | "pie" | "area" | "scatter",
  "groupBy": "<column name to group by>",
  "aggregate": {
    "field": "<column name to aggregate>",
    "fn": "sum" | "avg" | "count" | "min" | "max"
  },
  "filter": {
    "field": "<column name>",
    "op": "eq" | "neq" | "gt" | "lt" | "gte" | "lte" | "contains",
    "value": "<string value>"
  },
  "sortBy": {
    "field": "<groupBy column or aggregate field name>",
    "dir": "asc" | "desc"
  },
  "title": "<descriptive chart title>",
  "explanation": "<brief explanation of what this visualization shows and why>"
}

Rules:
- "filter" and "sortBy" are optional — only include them if relevant
- groupBy and aggregate.field must be actual column names from the dataset
- For count queries, aggregate.field can be any column (count ignores the field value)
- Choose the most appropriate chartType for the data pattern"#;

/// What the planner is told about the data and the question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub question: String,
    pub headers: Vec<String>,
    pub sample_rows: Vec<Row>,
    pub row_count: usize,
}

impl PlanRequest {
    /// Describe `table` by its headers, first `sample_rows` rows and size.
    pub fn from_table(question: &str, table: &ParsedTable, sample_rows: usize) -> Self {
        Self {
            question: question.trim().to_string(),
            headers: table.headers().to_vec(),
            sample_rows: table.head(sample_rows).to_vec(),
            row_count: table.len(),
        }
    }

    pub fn schema_description(&self) -> String {
        let samples = serde_json::to_string_pretty(&self.sample_rows).unwrap_or_else(|_| "[]".into());
        format!(
            "Dataset with {} rows.\nColumns: {}\nSample rows:\n{}",
            self.row_count,
            self.headers.join(", "),
            samples
        )
    }

    pub fn user_message(&self) -> String {
        format!("Dataset:\n{}\n\nQuestion: {}", self.schema_description(), self.question)
    }
}
