//! Run-plan handler: execute a plan file locally, no model involved.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::dataset::Dataset;
use crate::engine::analyze;
use crate::plan::extract_plan;

use super::OutputOptions;

pub fn run(dataset: &Dataset, plan_path: &Path, output: OutputOptions) -> Result<()> {
    let text = fs::read_to_string(plan_path)
        .with_context(|| format!("reading plan file: {}", plan_path.display()))?;
    let plan = extract_plan(&text)
        .with_context(|| format!("parsing plan file: {}", plan_path.display()))?;
    let result = analyze(&dataset.table, plan);
    output.emit(&result)
}
