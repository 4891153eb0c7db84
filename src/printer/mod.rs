//! Printers: result tables, data previews and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;
use unicode_width::UnicodeWidthStr;

use crate::engine::{AnalysisResult, ParsedTable};

const BAR_WIDTH: usize = 30;
const MAX_LABEL_WIDTH: usize = 32;

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
    }
}

/// Renders an [`AnalysisResult`] as a label/value table with bar gauges.
pub struct ResultPrinter {
    pub color: bool,
    pub markdown: bool,
}

impl ResultPrinter {
    pub fn print(&self, result: &AnalysisResult) {
        let plan = &result.query_plan;
        if !plan.title.is_empty() {
            if self.color {
                println!("{}", plan.title.bold().cyan());
            } else {
                println!("{}", plan.title);
            }
        }
        print!("{}", self.render_table(result));
        if !plan.explanation.is_empty() {
            println!();
            if self.markdown {
                MarkdownPrinter::default().print(&plan.explanation);
            } else {
                println!("{}", plan.explanation);
            }
        }
    }

    /// The table body, one line per group, plus a footer naming the plan.
    pub fn render_table(&self, result: &AnalysisResult) -> String {
        let exec = result.execution();
        if exec.is_empty() {
            return "No data matched\n".to_string();
        }

        let labels: Vec<String> = exec.labels.iter().map(|l| truncate(l, MAX_LABEL_WIDTH)).collect();
        let values: Vec<String> = exec.values().iter().map(|v| format_value(*v)).collect();
        let label_w = labels.iter().map(|l| l.width()).max().unwrap_or(0);
        let value_w = values.iter().map(|v| v.width()).max().unwrap_or(0);
        let max_abs = exec.values().iter().fold(0.0_f64, |m, v| m.max(v.abs()));

        let mut out = String::new();
        for ((label, value), raw) in labels.iter().zip(&values).zip(exec.values()) {
            let bar = "█".repeat(bar_len(*raw, max_abs));
            let bar = if self.color { bar.green().to_string() } else { bar };
            out.push_str(&format!(
                "{}{}  {:>vw$}  {}\n",
                label,
                " ".repeat(label_w - label.width()),
                value,
                bar,
                vw = value_w
            ));
        }

        let plan = &result.query_plan;
        let footer = format!(
            "{}({}) by {} · {} chart",
            plan.aggregate.r#fn.as_str(),
            plan.aggregate.field,
            plan.group_by,
            plan.chart_type.as_str()
        );
        if self.color {
            out.push_str(&format!("{}\n", footer.dimmed()));
        } else {
            out.push_str(&footer);
            out.push('\n');
        }
        out
    }
}

/// First `rows` rows of `table` as an aligned text grid.
pub fn render_preview(table: &ParsedTable, rows: usize) -> String {
    let headers = table.headers();
    let body = table.head(rows);
    let widths: Vec<usize> = headers
        .iter()
        .map(|h| {
            body.iter()
                .map(|r| truncate(r.get_or_empty(h), MAX_LABEL_WIDTH).width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{}{}", c, " ".repeat(w - c.width())))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    for row in body {
        let cells = headers
            .iter()
            .map(|h| truncate(row.get_or_empty(h), MAX_LABEL_WIDTH))
            .collect();
        out.push_str(&line(cells));
        out.push('\n');
    }
    out.push_str(&format!("({} of {} rows)\n", body.len(), table.len()));
    out
}

/// Whole numbers print without decimals, others with up to four.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{:.0}", v);
    }
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn bar_len(v: f64, max_abs: f64) -> usize {
    if max_abs <= 0.0 || !v.is_finite() || !max_abs.is_finite() {
        return 0;
    }
    ((v.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
}

fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        if (out.as_str().width() + ch.to_string().width()) >= max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}
