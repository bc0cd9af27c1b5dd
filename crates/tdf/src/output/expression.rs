//! Parsed filter output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use todo_filter::filter::{BoolOperator, DueDateExpr, DueDateOperation, Expression};

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub input: &'a str,
    pub rendered: String,
    pub tree: &'a Expression,
}

/// Formats a parsed filter as JSON.
pub fn format_expression_json(input: &str, expr: &Expression) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        input,
        rendered: expr.to_string(),
        tree: expr,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed filter as an indented tree followed by its canonical form.
pub fn format_expression_text(expr: &Expression, use_colors: bool) -> String {
    let mut output = String::new();
    write_node(&mut output, expr, 0, use_colors);

    let rendered = expr.to_string();
    let footer = if rendered.is_empty() {
        "(matches everything)".to_string()
    } else {
        rendered
    };
    if use_colors {
        output.push_str(&format!("\n{} {}\n", "Canonical:".dimmed(), footer));
    } else {
        output.push_str(&format!("\nCanonical: {}\n", footer));
    }
    output
}

fn write_node(output: &mut String, expr: &Expression, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    let (kind, detail) = describe(expr);
    let kind = if use_colors {
        kind.cyan().to_string()
    } else {
        kind.to_string()
    };

    match detail {
        Some(detail) => output.push_str(&format!("{indent}{kind} {detail}\n")),
        None => output.push_str(&format!("{indent}{kind}\n")),
    }

    match expr {
        Expression::BoolInfix { left, right, .. } => {
            write_node(output, left, depth + 1, use_colors);
            write_node(output, right, depth + 1, use_colors);
        }
        Expression::Not(inner) => write_node(output, inner, depth + 1, use_colors),
        _ => {}
    }
}

fn describe(expr: &Expression) -> (&'static str, Option<String>) {
    match expr {
        Expression::MatchAll => ("all", None),
        Expression::String(literal) => ("priority", Some(literal.clone())),
        Expression::Label(name) => ("label", Some(name.clone())),
        Expression::Project(name) => ("project", Some(name.clone())),
        Expression::DueDate(due) => (due_kind(due), due_detail(due)),
        Expression::BoolInfix { operator, .. } => match operator {
            BoolOperator::And => ("and", None),
            BoolOperator::Or => ("or", None),
        },
        Expression::Not(_) => ("not", None),
    }
}

fn due_kind(due: &DueDateExpr) -> &'static str {
    match due.operation {
        DueDateOperation::DueOn => "due on",
        DueDateOperation::DueBefore => "due before",
        DueDateOperation::DueAfter => "due after",
        DueDateOperation::NoDueDate => "no due date",
    }
}

fn due_detail(due: &DueDateExpr) -> Option<String> {
    match (due.operation, due.all_day) {
        (DueDateOperation::NoDueDate, _) => None,
        (_, true) => Some(format!("{} (all day)", due.datetime.format("%Y-%m-%d"))),
        (_, false) => Some(due.datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use todo_filter::filter::{FilterParser, FixedClock};

    fn parse(input: &str) -> Expression {
        let clock = FixedClock(Local.with_ymd_and_hms(2017, 1, 2, 1, 0, 0).unwrap());
        FilterParser::parse_with_clock(input, &clock).unwrap()
    }

    #[test]
    fn test_format_expression_text_tree() {
        let text = format_expression_text(&parse("p1 & !(@home | tomorrow)"), false);
        assert_eq!(
            text,
            "and\n  priority p1\n  not\n    or\n      label home\n      due on 2017-01-03 (all day)\n\nCanonical: p1 & !(@home | 01/03/2017)\n"
        );
    }

    #[test]
    fn test_format_expression_text_match_all() {
        let text = format_expression_text(&parse(""), false);
        assert_eq!(text, "all\n\nCanonical: (matches everything)\n");
    }

    #[test]
    fn test_format_expression_text_timed() {
        let text = format_expression_text(&parse("due before 16:00"), false);
        assert!(text.starts_with("due before 2017-01-02 16:00:00\n"));
    }

    #[test]
    fn test_format_expression_json() {
        let json = format_expression_json("p1 | p2", &parse("p1 | p2")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input"], "p1 | p2");
        assert_eq!(value["rendered"], "p1 | p2");
        assert_eq!(value["tree"]["type"], "bool_infix");
        assert_eq!(value["tree"]["value"]["operator"], "or");
    }
}
