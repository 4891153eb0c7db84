//! REPL handler: keep one dataset loaded and answer questions line by line.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::printer::render_preview;

use super::{OutputOptions, Session};

const HELP: &str = "Type a question, or :preview, :suggest, :help, exit";

pub async fn run(session: &Session, init_question: Option<&str>, output: OutputOptions) -> Result<()> {
    println!(
        "{} · {} rows · columns: {}",
        session.dataset.name,
        session.dataset.table.len(),
        session.dataset.table.headers().join(", ")
    );
    println!("{}", HELP);

    if let Some(q) = init_question.filter(|q| !q.trim().is_empty()) {
        ask(session, q, output).await;
    }

    read_loop(session, BufReader::new(tokio::io::stdin()), output).await
}

/// Answer lines from `input` until it ends or the user leaves.
pub async fn read_loop<R>(session: &Session, input: R, output: OutputOptions) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        if output.color {
            print!("{} ", ">>>".green());
        } else {
            print!(">>> ");
        }
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        match line.trim() {
            "" => continue,
            "exit" | "quit" | ":q" => break,
            ":help" => println!("{}", HELP),
            ":preview" => print!("{}", render_preview(&session.dataset.table, 10)),
            ":suggest" => {
                for s in &session.dataset.suggestions {
                    println!("  {}", s);
                }
            }
            question => ask(session, question, output).await,
        }
    }
    Ok(())
}

// A failed question should not end the session.
async fn ask(session: &Session, question: &str, output: OutputOptions) {
    let outcome = match session.answer(question).await {
        Ok(result) => output.emit(&result),
        Err(e) => Err(e),
    };
    if let Err(e) = outcome {
        if output.color {
            eprintln!("{} {:#}", "error:".red(), e);
        } else {
            eprintln!("error: {:#}", e);
        }
    }
}
