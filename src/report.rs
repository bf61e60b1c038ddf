//! Output: tallies as text
//!
//! The machine format is one line of `code:value` pairs ending in `total`. Line-based runs print
//! one such line per id, prefixed with `%id` so the lines can be told apart from the counts. The
//! human format is a `value code (name)` row per entry.
use std::cmp::Ordering;
use log::Level;

use aggregate::{Tally, Value, TRACE_TARGET};
use config::Config;
use dictionary::CategoryRegistry;

/// First line of human-readable output
pub const HUMAN_HEADER: &'static str = "count | category | category name (if present)";

/// Largest value first; ties keep their report order
pub fn sort_report(report: &mut Vec<(String, Value)>) {
    report.sort_by(|a, b| b.1.as_f64().partial_cmp(&a.1.as_f64()).unwrap_or(Ordering::Equal));
}

/// `cat0:value0 cat1:value1 ... total:n`
pub fn machine(report: &[(String, Value)]) -> String {
    report.iter()
        .map(|&(ref code, ref value)| format!("{}:{}", code, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `value code (name)` row per entry, each ending in a newline
pub fn human(report: &[(String, Value)], categories: &CategoryRegistry) -> String {
    report.iter()
        .map(|&(ref code, ref value)| match categories.name(code) {
            Some(name) => format!("{} {} ({})\n", value, code, name),
            None => format!("{} {}\n", value, code),
        })
        .collect()
}

/// One id of line-based machine output
pub fn record(id: &str, report: &[(String, Value)]) -> String {
    format!("%{} {}", id, machine(report))
}

/// Whether percentages of this tally say nothing, because it has no words
pub fn percent_of_nothing(tally: &Tally, config: &Config) -> bool {
    config.percent && tally.total() == 0
}

/// The report for a tally as configured, warning when its percentages are all 0 for lack of words
///
/// `id` names the text in line-based runs.
pub fn tally_report(tally: &Tally, config: &Config, id: Option<&str>) -> Vec<(String, Value)> {
    if percent_of_nothing(tally, config) {
        match id {
            Some(id) => warn!("Id {} has no words, so every percentage is 0", id),
            None => warn!("The input has no words, so every percentage is 0"),
        }
    }
    tally.report(config.percent, config.round_digits)
}

/// What goes in front of a log line: nothing for `--show-matching` lines, the level otherwise
pub fn log_prefix(target: &str, level: Level) -> &'static str {
    if target == TRACE_TARGET {
        return "";
    }
    match level {
        Level::Error => "[Error] ",
        Level::Warn => "[Warning] ",
        Level::Info => "[Info] ",
        Level::Debug => "[Debug] ",
        Level::Trace => "[Trace] ",
    }
}
