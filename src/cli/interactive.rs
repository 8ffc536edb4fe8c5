//! Interactive paging for the `review` command.

use super::display_path;
use console::{style, Term};
use dupli_pic_finder::core::finder::RunReport;
use dupli_pic_finder::core::matcher::DuplicatePair;
use dupli_pic_finder::error::Result;
use dupli_pic_finder::review::{FsRemover, ReviewSession, Side};
use std::path::Path;
use std::str::FromStr;

const HELP: &str = "\
n              next page
p              previous page
v <#>          show details of pair #
d <#> <1|2>    delete image 1 or 2 of pair #
s <#> <1|2>    select or unselect image 1 or 2 of pair #
x              delete all selected images
q              quit";

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    View(usize),
    Delete(usize, Side),
    Select(usize, Side),
    DeleteSelected,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        match (command, args.as_slice()) {
            ("n", []) => Ok(Command::Next),
            ("p", []) => Ok(Command::Prev),
            ("x", []) => Ok(Command::DeleteSelected),
            ("q", []) => Ok(Command::Quit),
            ("h" | "?" | "", []) => Ok(Command::Help),
            ("v", [index]) => Ok(Command::View(parse_index(index)?)),
            ("d", [index, side]) => Ok(Command::Delete(parse_index(index)?, parse_side(side)?)),
            ("s", [index, side]) => Ok(Command::Select(parse_index(index)?, parse_side(side)?)),
            _ => Err(format!("Unknown command `{}` (h for help)", line.trim())),
        }
    }
}

/// Pair numbers are shown 1-based
fn parse_index(word: &str) -> std::result::Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("`{}` is not a pair number", word)),
    }
}

fn parse_side(word: &str) -> std::result::Result<Side, String> {
    word.parse::<u8>()
        .ok()
        .and_then(Side::from_number)
        .ok_or_else(|| format!("`{}` must be 1 or 2", word))
}

/// Page through pairs until the user quits or input ends
pub fn review(mut session: ReviewSession, report: &RunReport) -> Result<()> {
    let term = Term::stdout();

    if !report.failures.is_empty() {
        term.write_line(&format!(
            "{} {} images could not be read and were skipped",
            style("!").yellow(),
            report.failures.len()
        ))
        .ok();
    }

    if session.is_empty() {
        term.write_line(&format!("{}", style("No duplicates found.").green()))
            .ok();
        return Ok(());
    }

    if !term.is_term() {
        term.write_line(&format!(
            "{} pairs found; review needs an interactive terminal, use `scan` instead",
            session.len()
        ))
        .ok();
        return Ok(());
    }

    render_page(&term, &session);

    while let Some(line) = read_line(&term, "> ") {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                term.write_line(&format!("{}", style(message).red())).ok();
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                term.write_line(HELP).ok();
                continue;
            }
            Command::Next => {
                if !session.next_page() {
                    term.write_line("Already on the last page").ok();
                    continue;
                }
            }
            Command::Prev => {
                if !session.prev_page() {
                    term.write_line("Already on the first page").ok();
                    continue;
                }
            }
            Command::View(index) => {
                match session.entry(index) {
                    Ok(pair) => show_pair(&term, index, pair),
                    Err(e) => {
                        term.write_line(&format!("{}", style(e).red())).ok();
                    }
                }
                continue;
            }
            Command::Select(index, side) => {
                let path = match session.entry(index) {
                    Ok(pair) => side.of(pair).to_path_buf(),
                    Err(e) => {
                        term.write_line(&format!("{}", style(e).red())).ok();
                        continue;
                    }
                };
                session.toggle_selection(&path);
            }
            Command::Delete(index, side) => {
                let path = match session.entry(index) {
                    Ok(pair) => side.of(pair).to_path_buf(),
                    Err(e) => {
                        term.write_line(&format!("{}", style(e).red())).ok();
                        continue;
                    }
                };
                let question = format!("Delete {}? [y/N] ", display_path(&path));
                if !confirm(&term, &question) {
                    continue;
                }
                match session.delete(&path, &FsRemover) {
                    Ok(_) => {
                        term.write_line(&format!(
                            "{} Deleted {}",
                            style("✓").green(),
                            display_path(&path)
                        ))
                        .ok();
                    }
                    Err(e) => {
                        term.write_line(&format!("{}", style(e).red())).ok();
                    }
                }
            }
            Command::DeleteSelected => {
                let count = session.selected().count();
                if count == 0 {
                    term.write_line("Nothing selected").ok();
                    continue;
                }
                if !confirm(&term, &format!("Delete {} selected images? [y/N] ", count)) {
                    continue;
                }
                let summary = session.delete_selected(&FsRemover);
                term.write_line(&format!(
                    "{} Deleted {} images",
                    style("✓").green(),
                    summary.deleted.len()
                ))
                .ok();
                for error in summary.errors {
                    term.write_line(&format!("{}", style(error).red())).ok();
                }
            }
        }

        if session.is_empty() {
            term.write_line(&format!("{}", style("No duplicates left.").green()))
                .ok();
            break;
        }
        render_page(&term, &session);
    }

    Ok(())
}

fn render_page(term: &Term, session: &ReviewSession) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {}",
        style(format!(
            "Page {}/{}",
            session.current_page() + 1,
            session.page_count()
        ))
        .bold(),
        style(format!("({} pairs, h for help)", session.len())).dim()
    ))
    .ok();

    for entry in session.page_entries() {
        let mark = |path: &Path| {
            if session.is_selected(path) {
                style("●").yellow().to_string()
            } else {
                " ".to_string()
            }
        };
        term.write_line(&format!(
            "  {} 1{} {}",
            style(format!("{:>3}.", entry.index + 1)).bold(),
            mark(entry.pair.first()),
            display_path(entry.pair.first())
        ))
        .ok();
        term.write_line(&format!(
            "       2{} {} {}",
            mark(entry.pair.second()),
            display_path(entry.pair.second()),
            style(format!("(distance {})", entry.pair.distance())).dim()
        ))
        .ok();
    }
}

fn show_pair(term: &Term, index: usize, pair: &DuplicatePair) {
    term.write_line(&format!(
        "{} distance {}",
        style(format!("Pair {}:", index + 1)).bold(),
        pair.distance()
    ))
    .ok();

    for (n, path) in [(1, pair.first()), (2, pair.second())] {
        let dimensions = image::image_dimensions(path)
            .map(|(w, h)| format!("{}x{}", w, h))
            .unwrap_or_else(|_| "unreadable".to_string());
        let size = std::fs::metadata(path)
            .map(|m| format_bytes(m.len()))
            .unwrap_or_else(|_| "missing".to_string());
        term.write_line(&format!(
            "  {} {} {}",
            n,
            display_path(path),
            style(format!("[{}, {}]", dimensions, size)).dim()
        ))
        .ok();
    }
}

fn confirm(term: &Term, question: &str) -> bool {
    read_line(term, question).is_some_and(|answer| is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

/// `None` when the terminal can no longer be read
fn read_line(term: &Term, prompt: &str) -> Option<String> {
    term.write_str(prompt).ok();
    term.flush().ok();
    term.read_line().ok().map(|line| line.trim().to_string())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
