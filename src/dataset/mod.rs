//! Built-in sample datasets and loading user-provided CSV.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::engine::{parse_csv, ParsedTable};
use crate::error::{AnalystError, Result};

/// A bundled CSV with the blurb and starter questions shown for it.
#[derive(Debug, Clone, Copy)]
pub struct SampleDataset {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub csv: &'static str,
    pub suggestions: [&'static str; 3],
}

pub const SAMPLES: [SampleDataset; 3] = [
    SampleDataset {
        key: "sales",
        label: "Sales Performance",
        description: "50 rows · products, revenue, regions",
        icon: "trending",
        csv: include_str!("../../data/sales.csv"),
        suggestions: [
            "Show total revenue by product as a bar chart",
            "What is the monthly revenue trend?",
            "Which region has the highest total sales?",
        ],
    },
    SampleDataset {
        key: "analytics",
        label: "User Analytics",
        description: "30 rows · signups, active users, churn",
        icon: "users",
        csv: include_str!("../../data/analytics.csv"),
        suggestions: [
            "Show daily signups as a line chart",
            "What is the active users growth trend?",
            "Compare churn rate over time as an area chart",
        ],
    },
    SampleDataset {
        key: "weather",
        label: "Weather Data",
        description: "40 rows · cities, temperature, humidity",
        icon: "weather",
        csv: include_str!("../../data/weather.csv"),
        suggestions: [
            "Which city has the highest average temperature?",
            "Show humidity levels by city",
            "What conditions occur most frequently?",
        ],
    },
];

/// Starter questions for data that is not one of the samples.
pub const CUSTOM_SUGGESTIONS: [&str; 3] = [
    "Show me a summary by category",
    "What are the top values?",
    "Show distribution as a bar chart",
];

pub fn sample(key: &str) -> Result<&'static SampleDataset> {
    SAMPLES
        .iter()
        .find(|s| s.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| AnalystError::UnknownDataset(key.to_string()))
}

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sample(String),
    File(PathBuf),
    Stdin,
}

impl DataSource {
    /// `-` means stdin, anything else is a path.
    pub fn from_path_arg(arg: &str) -> Self {
        if arg == "-" {
            DataSource::Stdin
        } else {
            DataSource::File(PathBuf::from(arg))
        }
    }
}

/// A parsed table plus the name it is known by.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub table: ParsedTable,
    pub suggestions: Vec<String>,
}

impl Dataset {
    pub fn load(source: &DataSource) -> Result<Self> {
        match source {
            DataSource::Sample(key) => {
                let s = sample(key)?;
                Ok(Self {
                    name: s.key.to_string(),
                    table: parse_csv(s.csv),
                    suggestions: s.suggestions.iter().map(|q| q.to_string()).collect(),
                })
            }
            DataSource::File(path) => Ok(Self::custom(display_name(path), &read_text_file(path)?)),
            DataSource::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(Self::custom("stdin".to_string(), &text))
            }
        }
    }

    pub fn custom(name: String, text: &str) -> Self {
        let table = parse_csv(text);
        debug!(dataset = %name, rows = table.len(), "loaded custom dataset");
        Self {
            name,
            table,
            suggestions: CUSTOM_SUGGESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }
}

fn read_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
