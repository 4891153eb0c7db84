mod cli;

use ai_data_analyst::{
    cache::{History, PlanCache},
    config::Config,
    dataset::{self, DataSource, Dataset},
    handlers::{self, OutputOptions, Session},
    planner::Planner,
    printer::render_preview,
};
use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use std::io;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if std::env::var("ANALYST_LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = cli::Cli::parse();
    let cfg = Config::load();

    let color = io::stdout().is_terminal();
    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN")
    };
    let output = OutputOptions { json: args.json, color, markdown };

    // Shortcuts that need no dataset
    if args.list_samples {
        for s in dataset::SAMPLES.iter() {
            println!("{:<10} {:<18} {}", s.key, s.label, s.description);
        }
        return Ok(());
    }
    let history = History::from_config(&cfg);
    if args.history {
        return handlers::history::list(&history, color);
    }
    if args.clear_history {
        return handlers::history::clear(&history);
    }

    // Resolve data source: --file, --sample, piped stdin, else the sales sample
    let stdin_is_tty = io::stdin().is_terminal();
    let source = match (&args.file, &args.sample) {
        (Some(path), _) => DataSource::from_path_arg(path),
        (None, Some(key)) => DataSource::Sample(key.clone()),
        (None, None) if !stdin_is_tty && !args.repl => DataSource::Stdin,
        (None, None) => DataSource::Sample("sales".to_string()),
    };
    if args.repl && source == DataSource::Stdin {
        bail!("--repl reads questions from stdin; pass the data with --file <path>");
    }
    let dataset = Dataset::load(&source)?;
    if dataset.table.headers().is_empty() {
        bail!("no columns found in {}", dataset.name);
    }

    if args.preview {
        print!("{}", render_preview(&dataset.table, 10));
    }
    if args.suggest {
        for q in &dataset.suggestions {
            println!("{}", q);
        }
    }
    if let Some(plan_path) = &args.plan {
        return handlers::run_plan::run(&dataset, plan_path, output);
    }

    let question = args.question.clone().unwrap_or_default();
    if question.trim().is_empty() && !args.repl && (args.preview || args.suggest) {
        return Ok(());
    }

    let session = Session {
        planner: Planner::from_config(&cfg, args.model.as_deref())?,
        cache: if args.no_cache { None } else { Some(PlanCache::from_config(&cfg)) },
        history,
        sample_rows: cfg.get_usize("SAMPLE_ROWS").unwrap_or(5),
        dataset,
    };

    if args.repl {
        handlers::repl::run(&session, Some(question.as_str()), output).await
    } else {
        handlers::ask::run(&session, &question, output).await
    }
}
