//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::application::report::{gauge_lines, summary_lines};
use crate::application::Language;
use crate::domain::Aggregate;

/// Width of the fill gauges in `show`.
pub const GAUGE_WIDTH: usize = 30;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print the summary lines; the used/left line turns red when over a limit.
pub fn summary(aggregate: &Aggregate, language: Language) {
    let lines = summary_lines(aggregate, language);
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if i == last && aggregate.any_over_limit() {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}

/// Print one fill gauge per dimension, red when over, green otherwise.
pub fn gauges(aggregate: &Aggregate, language: Language) {
    let lines = gauge_lines(aggregate, GAUGE_WIDTH, language);
    let over = [aggregate.weight_over_limit, aggregate.volume_over_limit];
    for (line, over) in lines.iter().zip(over) {
        if over {
            println!("{}", line.red().bold());
        } else {
            println!("{}", line.green());
        }
    }
}
