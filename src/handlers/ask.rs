//! Ask handler: one question, one plan, one result.

use anyhow::{bail, Result};

use super::{OutputOptions, Session};

pub async fn run(session: &Session, question: &str, output: OutputOptions) -> Result<()> {
    if question.trim().is_empty() {
        let example = session
            .dataset
            .suggestions
            .first()
            .map(String::as_str)
            .unwrap_or("Show totals by category");
        bail!("Provide a question, e.g. \"{}\"", example);
    }
    let result = session.answer(question).await?;
    output.emit(&result)
}
