//! Plan cache and analysis history persistence.

use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::engine::AnalysisResult;
use crate::error::Result;
use crate::plan::QueryPlan;
use crate::planner::PlanRequest;

/// Query plans keyed by everything the planner saw, so repeating a question
/// on the same data skips the model call.
#[derive(Debug, Clone)]
pub struct PlanCache {
    length: usize,
    cache_path: PathBuf,
}

impl PlanCache {
    pub fn from_config(cfg: &Config) -> Self {
        let len = cfg.get_usize("CACHE_LENGTH").unwrap_or(100);
        Self::new(cfg.cache_path(), len)
    }

    pub fn new(cache_path: PathBuf, length: usize) -> Self {
        let _ = fs::create_dir_all(&cache_path);
        Self { length, cache_path }
    }

    pub fn key_for(&self, base_url: &str, model: &str, request: &PlanRequest) -> String {
        let payload = serde_json::json!({
            "base_url": base_url,
            "model": model,
            "request": request,
        });
        let data = serde_json::to_vec(&payload).unwrap_or_default();
        format!("{:x}", md5::compute(data))
    }

    /// A cached plan, if one exists and still parses.
    pub fn get(&self, key: &str) -> Option<QueryPlan> {
        let text = fs::read_to_string(self.cache_path.join(key)).ok()?;
        match serde_json::from_str(&text) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cached plan");
                let _ = fs::remove_file(self.cache_path.join(key));
                None
            }
        }
    }

    pub fn set(&self, key: &str, plan: &QueryPlan) -> Result<()> {
        fs::write(self.cache_path.join(key), serde_json::to_string(plan)?)?;
        self.prune()
    }

    fn prune(&self) -> Result<()> {
        let mut entries: Vec<_> = fs::read_dir(&self.cache_path)?.filter_map(|e| e.ok()).collect();
        if entries.len() <= self.length {
            return Ok(());
        }
        entries.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
        let to_delete = entries.len() - self.length;
        for entry in &entries[..to_delete] {
            let _ = fs::remove_file(entry.path());
        }
        Ok(())
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub question: String,
    pub dataset: String,
    pub result: AnalysisResult,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

impl HistoryEntry {
    pub fn new(question: &str, dataset: &str, result: AnalysisResult) -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            id: now.as_millis().to_string(),
            question: question.to_string(),
            dataset: dataset.to_string(),
            result,
            timestamp: now.as_secs(),
        }
    }
}

/// Recent analyses, newest first, capped in length.
#[derive(Debug, Clone)]
pub struct History {
    length: usize,
    file: PathBuf,
}

impl History {
    pub fn from_config(cfg: &Config) -> Self {
        let len = cfg.get_usize("HISTORY_LENGTH").unwrap_or(20);
        Self::new(cfg.history_path(), len)
    }

    pub fn new(dir: PathBuf, length: usize) -> Self {
        let _ = fs::create_dir_all(&dir);
        Self { length, file: dir.join("history.json") }
    }

    pub fn read(&self) -> Result<Vec<HistoryEntry>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.file)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn push(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                let backup = self.backup_path();
                warn!(error = %e, backup = %backup.display(), "history file unreadable, moving it aside");
                fs::rename(&self.file, &backup)?;
                Vec::new()
            }
        };
        entries.insert(0, entry);
        entries.truncate(self.length);
        fs::write(&self.file, serde_json::to_string(&entries)?)?;
        Ok(())
    }

    /// Where an unreadable history file is kept instead of being overwritten.
    pub fn backup_path(&self) -> PathBuf {
        self.file.with_extension("json.bak")
    }

    pub fn clear(&self) -> Result<()> {
        if self.file.exists() {
            fs::remove_file(&self.file)?;
        }
        Ok(())
    }
}
