use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "analyst", about = "Ask questions about CSV data in plain English", version)]
#[command(group(ArgGroup::new("source").args(["sample", "file"]).multiple(false)))]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
#[command(group(ArgGroup::new("mode").args(["repl", "plan", "history", "clear_history", "list_samples"]).multiple(false)))]
pub struct Cli {
    /// The question to answer about the data.
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Built-in sample dataset (sales, analytics, weather).
    #[arg(long, short = 's')]
    pub sample: Option<String>,

    /// CSV file to analyse; "-" reads stdin.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<String>,

    /// Execute a query plan JSON file instead of asking the model.
    #[arg(long, value_name = "PLAN")]
    pub plan: Option<PathBuf>,

    /// Large language model to plan with.
    #[arg(long)]
    pub model: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Show the first rows of the dataset.
    #[arg(long)]
    pub preview: bool,

    /// Show suggested questions for the dataset.
    #[arg(long)]
    pub suggest: bool,

    /// List the built-in sample datasets.
    #[arg(long = "list-samples")]
    pub list_samples: bool,

    /// Ask questions interactively.
    #[arg(long)]
    pub repl: bool,

    /// Show past analyses.
    #[arg(long)]
    pub history: bool,

    /// Delete past analyses.
    #[arg(long = "clear-history")]
    pub clear_history: bool,

    /// Render explanations as Markdown.
    #[arg(long)]
    pub md: bool,
    /// Print explanations as plain text.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// Always ask the model, ignoring cached plans.
    #[arg(long = "no-cache")]
    pub no_cache: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
