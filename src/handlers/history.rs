//! History handler: list or clear past analyses.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cache::History;
use crate::printer::format_value;

pub fn list(history: &History, color: bool) -> Result<()> {
    let entries = history.read()?;
    if entries.is_empty() {
        println!("No analyses yet.");
        return Ok(());
    }
    for e in entries {
        let head = format!("[{}] {} ({})", e.id, e.question, e.dataset);
        if color {
            println!("{}", head.magenta());
        } else {
            println!("{}", head);
        }
        let summary: Vec<String> = e
            .result
            .execution()
            .pairs()
            .take(5)
            .map(|(l, v)| format!("{}={}", l, format_value(v)))
            .collect();
        let more = e.result.labels.len().saturating_sub(summary.len());
        if summary.is_empty() {
            println!("  no data matched");
        } else if more > 0 {
            println!("  {} … (+{} more)", summary.join(", "), more);
        } else {
            println!("  {}", summary.join(", "));
        }
    }
    Ok(())
}

pub fn clear(history: &History) -> Result<()> {
    history.clear()?;
    println!("History cleared.");
    Ok(())
}
