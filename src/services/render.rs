use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{RenderedRound, Roster, Round, TableAssignment};

const CONSOLE_RULE_WIDTH: usize = 60;

/// Markdown file name for a 1-based round index
pub fn markdown_filename(round_index: usize) -> String {
    format!("round_{}.md", round_index)
}

/// Escape characters that would break a markdown table cell
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Resolve names and assign 1-based table numbers
pub fn to_rendered(round_index: usize, round: &Round, roster: &Roster) -> RenderedRound {
    RenderedRound {
        round: round_index,
        tables: round
            .pairs()
            .iter()
            .enumerate()
            .map(|(i, pair)| TableAssignment {
                table: i + 1,
                name_1: roster.display_name(&pair.first).to_string(),
                name_2: roster.display_name(&pair.second).to_string(),
            })
            .collect(),
        sitting_out: round
            .leftovers()
            .iter()
            .map(|id| roster.display_name(id).to_string())
            .collect(),
    }
}

/// Render one round as a markdown document
///
/// Participants sitting out go in a one-column table so the verifier never
/// reads them as a pair.
pub fn render_markdown(round_index: usize, round: &Round, roster: &Roster) -> String {
    let rendered = to_rendered(round_index, round, roster);

    let mut lines = vec![
        format!("# Round {}\n", round_index),
        "| Table # | Name 1 | Name 2 |".to_string(),
        "|--------:|--------|--------|".to_string(),
    ];
    for t in &rendered.tables {
        lines.push(format!(
            "| {} | {} | {} |",
            t.table,
            escape_cell(&t.name_1),
            escape_cell(&t.name_2)
        ));
    }

    if !rendered.sitting_out.is_empty() {
        lines.push(String::new());
        lines.push("## Sitting out\n".to_string());
        lines.push("| Name |".to_string());
        lines.push("|------|".to_string());
        for name in &rendered.sitting_out {
            lines.push(format!("| {} |", escape_cell(name)));
        }
    }

    lines.join("\n") + "\n"
}

/// Write `round_<n>.md` into `dir`, replacing any existing file
pub fn write_round_markdown(dir: &Path, round_index: usize, round: &Round, roster: &Roster) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(markdown_filename(round_index));
    fs::write(&path, render_markdown(round_index, round, roster))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}

/// Render one round as a fixed-width console table
pub fn render_console(round_index: usize, round: &Round, roster: &Roster) -> String {
    let rendered = to_rendered(round_index, round, roster);
    let rule = "-".repeat(CONSOLE_RULE_WIDTH);

    let mut out = format!("Round {}:\n{}\n", round_index, rule);
    out.push_str(&format!("{:<8} {:<24} {:<24}\n", "Table #", "Name 1", "Name 2"));
    out.push_str(&rule);
    out.push('\n');

    for t in &rendered.tables {
        out.push_str(&format!("{:<8} {:<24} {:<24}\n", t.table, t.name_1, t.name_2));
    }
    if !rendered.sitting_out.is_empty() {
        out.push_str(&format!("Sitting out: {}\n", rendered.sitting_out.join(", ")));
    }
    out
}
