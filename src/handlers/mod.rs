//! Command handlers and the state they share.

pub mod ask;
pub mod history;
pub mod repl;
pub mod run_plan;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cache::{History, HistoryEntry, PlanCache};
use crate::dataset::Dataset;
use crate::engine::{analyze, AnalysisResult};
use crate::planner::{PlanRequest, Planner};
use crate::printer::ResultPrinter;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub color: bool,
    pub markdown: bool,
}

impl OutputOptions {
    pub fn emit(&self, result: &AnalysisResult) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            ResultPrinter { color: self.color, markdown: self.markdown }.print(result);
        }
        Ok(())
    }
}

/// Everything needed to answer questions about one dataset.
pub struct Session {
    pub dataset: Dataset,
    pub planner: Planner,
    pub cache: Option<PlanCache>,
    pub history: History,
    pub sample_rows: usize,
}

impl Session {
    /// Plan (from cache when possible), execute, and record the answer.
    pub async fn answer(&self, question: &str) -> Result<AnalysisResult> {
        let request = PlanRequest::from_table(question, &self.dataset.table, self.sample_rows);

        let key = self
            .cache
            .as_ref()
            .map(|c| c.key_for(self.planner.base_url(), self.planner.model(), &request));
        let cached = match (&self.cache, &key) {
            (Some(cache), Some(key)) => cache.get(key),
            _ => None,
        };

        let plan = match cached {
            Some(plan) => {
                debug!("using cached query plan");
                plan
            }
            None => {
                let (plan, _raw) = self.planner.plan(&request).await?;
                if let (Some(cache), Some(key)) = (&self.cache, &key) {
                    if let Err(e) = cache.set(key, &plan) {
                        warn!(error = %e, "could not cache query plan");
                    }
                }
                plan
            }
        };

        let result = analyze(&self.dataset.table, plan);
        let entry = HistoryEntry::new(&request.question, &self.dataset.name, result.clone());
        if let Err(e) = self.history.push(entry) {
            warn!(error = %e, "could not record history");
        }
        Ok(result)
    }
}
