//! Filter evaluation against items.
//!
//! This module provides the [`FilterEvaluator`] for evaluating parsed filter
//! expressions against items, resolving label and project names through a
//! read-only [`Store`].
//!
//! # Example
//!
//! ```
//! use todo_filter::filter::{FilterEvaluator, FilterParser};
//! use todo_filter::{Item, Label, Store};
//!
//! let store = Store::new(
//!     vec![Label { id: "l1".to_string(), name: "home".to_string() }],
//!     vec![],
//! );
//! let item = Item {
//!     id: "1".to_string(),
//!     content: "Water the plants".to_string(),
//!     priority: 1,
//!     due: None,
//!     label_ids: vec!["l1".to_string()],
//!     project_id: "inbox".to_string(),
//! };
//!
//! let expr = FilterParser::parse("p1 & @home").unwrap();
//! let evaluator = FilterEvaluator::new(&expr, &store);
//! assert!(evaluator.matches(&item));
//! ```
//!
//! # Error policy
//!
//! The only failure during evaluation is an item whose stored due date
//! cannot be read. Such a failure is swallowed at the nearest `&`, `|` or
//! `!` and counts as `false` for that operand. A negated failure is also
//! `false`, not `true`.

use chrono::{DateTime, Days, Local};
use tracing::debug;

use super::ast::{DueDateExpr, DueDateOperation, Expression};
use super::error::FilterResult;
use crate::models::{Item, Store};

/// Evaluates a parsed filter against items.
///
/// The evaluator borrows a parsed [`Expression`] and a [`Store`], then can
/// test whether items match the filter criteria.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    expr: &'a Expression,
    store: &'a Store,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    ///
    /// # Arguments
    ///
    /// * `expr` - The parsed filter to evaluate
    /// * `store` - Labels and projects used to resolve names
    pub fn new(expr: &'a Expression, store: &'a Store) -> Self {
        Self { expr, store }
    }

    /// Evaluates the filter against an item.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidDue` only when the whole filter is a
    /// single due-date predicate and the item's due date is unreadable.
    /// Inside boolean operators the same failure reads as `false`.
    pub fn evaluate(&self, item: &Item) -> FilterResult<bool> {
        self.evaluate_expression(self.expr, item)
    }

    /// Returns true if the item matches the filter.
    pub fn matches(&self, item: &Item) -> bool {
        self.evaluate_or_false(self.expr, item)
    }

    /// Filters a slice of items, returning only those that match.
    pub fn filter_items<'b>(&self, items: &'b [Item]) -> Vec<&'b Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    fn evaluate_expression(&self, expr: &Expression, item: &Item) -> FilterResult<bool> {
        match expr {
            Expression::MatchAll => Ok(true),
            Expression::String(literal) => Ok(matches_priority(literal, item)),
            Expression::Label(name) => Ok(self.store.item_has_label(item, name)),
            Expression::Project(name) => Ok(self.store.item_in_project(item, name)),
            Expression::DueDate(due) => evaluate_due_date(due, item),

            // Both sides are always evaluated.
            Expression::BoolInfix {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate_or_false(left, item);
                let right = self.evaluate_or_false(right, item);
                Ok(operator.apply(left, right))
            }

            Expression::Not(inner) => match self.evaluate_expression(inner, item) {
                Ok(matched) => Ok(!matched),
                Err(error) => {
                    debug!(item_id = %item.id, %error, "negated operand failed, treating as no match");
                    Ok(false)
                }
            },
        }
    }

    fn evaluate_or_false(&self, expr: &Expression, item: &Item) -> bool {
        self.evaluate_expression(expr, item).unwrap_or_else(|error| {
            debug!(item_id = %item.id, %error, "operand failed, treating as no match");
            false
        })
    }
}

/// Checks a raw literal as a priority: exactly `p1`..`p4`, compared to the
/// item's priority by equality.
fn matches_priority(literal: &str, item: &Item) -> bool {
    match literal.strip_prefix('p') {
        Some(digit @ ("1" | "2" | "3" | "4")) => digit.parse::<i32>() == Ok(item.priority),
        _ => false,
    }
}

/// Start of the day after `start`, in local calendar terms.
fn next_day(start: DateTime<Local>) -> DateTime<Local> {
    start
        .checked_add_days(Days::new(1))
        .unwrap_or(start + chrono::Duration::days(1))
}

/// Evaluates a due-date predicate against an item.
///
/// `DueOn` without `all_day` never matches: an exact-instant "due on" has
/// no matching rule.
pub fn evaluate_due_date(due: &DueDateExpr, item: &Item) -> FilterResult<bool> {
    let Some(item_due) = item.due_datetime()? else {
        return Ok(due.operation == DueDateOperation::NoDueDate);
    };

    let matched = match due.operation {
        DueDateOperation::DueOn if due.all_day => {
            item_due >= due.datetime && item_due < next_day(due.datetime)
        }
        DueDateOperation::DueOn => false,
        DueDateOperation::DueBefore => item_due < due.datetime,
        DueDateOperation::DueAfter => {
            let end = if due.all_day {
                next_day(due.datetime) - chrono::Duration::microseconds(1)
            } else {
                due.datetime
            };
            item_due > end
        }
        DueDateOperation::NoDueDate => false,
    };
    Ok(matched)
}
