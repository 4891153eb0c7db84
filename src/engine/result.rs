use serde::{Deserialize, Serialize};

use crate::plan::QueryPlan;

/// One named sequence of values, positionally aligned with the labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    #[serde(with = "float_values")]
    pub values: Vec<f64>,
}

/// Engine output: group labels plus the aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
}

impl ExecutionResult {
    pub fn new(labels: Vec<String>, name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Series { name: name.into(), values }],
        }
    }

    /// No group survived filtering.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Values of the primary series.
    pub fn values(&self) -> &[f64] {
        self.datasets.first().map(|s| s.values.as_slice()).unwrap_or(&[])
    }

    /// `(label, value)` pairs of the primary series.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values().iter().copied())
    }
}

/// An execution result with the plan that produced it, as handed to a
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
    pub query_plan: QueryPlan,
}

impl AnalysisResult {
    pub fn new(result: ExecutionResult, query_plan: QueryPlan) -> Self {
        Self {
            labels: result.labels,
            datasets: result.datasets,
            query_plan,
        }
    }

    pub fn execution(&self) -> ExecutionResult {
        ExecutionResult {
            labels: self.labels.clone(),
            datasets: self.datasets.clone(),
        }
    }
}

/// JSON has no literal for non-finite floats, so they are written as the
/// strings `"Infinity"`, `"-Infinity"` and `"NaN"`. `null` reads back as NaN.
mod float_values {
    use serde::{de::Error as _, ser::SerializeSeq, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            if v.is_finite() {
                seq.serialize_element(v)?;
            } else if v.is_nan() {
                seq.serialize_element("NaN")?;
            } else if v.is_sign_positive() {
                seq.serialize_element("Infinity")?;
            } else {
                seq.serialize_element("-Infinity")?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Value>::deserialize(deserializer)?
            .into_iter()
            .map(|v| match v {
                Value::Number(n) => n.as_f64().ok_or_else(|| D::Error::custom("number out of range")),
                Value::Null => Ok(f64::NAN),
                Value::String(s) => match s.as_str() {
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    "NaN" => Ok(f64::NAN),
                    other => Err(D::Error::custom(format!("not a number: {other:?}"))),
                },
                other => Err(D::Error::custom(format!("not a number: {other}"))),
            })
            .collect()
    }
}
