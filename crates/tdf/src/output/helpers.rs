//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Timelike};
use owo_colors::OwoColorize;
use todo_filter::Due;

/// Truncates an ID to 6 characters for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(6).collect()
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats priority for display, padded to `width` before coloring.
///
/// The label is the raw priority, so `p1` in the table is what `p1` in a
/// filter matches.
pub fn format_priority(priority: i32, width: usize, use_colors: bool) -> String {
    let label = format!("{:<width$}", format!("p{priority}"));

    if use_colors {
        match priority {
            1 => label.red().to_string(),
            2 => label.yellow().to_string(),
            3 => label.blue().to_string(),
            _ => label.dimmed().to_string(),
        }
    } else {
        label
    }
}

/// Describes a due date relative to `now`.
///
/// Returns the text and whether the item is overdue. An unreadable due
/// date is shown verbatim.
pub fn describe_due(due: &Due, now: DateTime<Local>) -> (String, bool) {
    let Ok(when) = due.to_local_datetime() else {
        return (due.date.clone(), false);
    };

    let today = now.date_naive();
    let date = when.date_naive();
    let has_time = due.datetime.is_some() || due.date.contains('T');

    let day = match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        days if days < 0 => format!("{} days ago", -days),
        _ => date.format("%b %d").to_string(),
    };

    let text = if has_time {
        format!("{day} {:02}:{:02}", when.hour(), when.minute())
    } else {
        day
    };
    let overdue = if has_time { when < now } else { date < today };
    (text, overdue)
}

/// Formats a due date for display, padded to `width` before coloring.
pub fn format_due(due: Option<&Due>, now: DateTime<Local>, width: usize, use_colors: bool) -> String {
    let Some(due) = due else {
        return format!("{:<width$}", "");
    };

    let (text, overdue) = describe_due(due, now);
    let is_today = text.starts_with("Today");
    let padded = format!("{:<width$}", text);

    if use_colors && overdue {
        padded.red().to_string()
    } else if use_colors && is_today {
        padded.yellow().to_string()
    } else {
        padded
    }
}

/// Formats labels for display.
pub fn format_labels(labels: &[&str], max_len: usize) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = labels.iter().map(|l| format!("@{l}")).collect();
    let joined = formatted.join(" ");

    truncate_str(&joined, max_len)
}
