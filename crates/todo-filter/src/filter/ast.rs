//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// A binary boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOperator {
    /// Logical AND (`&`).
    And,
    /// Logical OR (`|`).
    Or,
}

impl BoolOperator {
    /// Returns the operator's filter-syntax symbol.
    pub fn symbol(self) -> char {
        match self {
            BoolOperator::And => '&',
            BoolOperator::Or => '|',
        }
    }

    /// Combines two already-evaluated operands.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            BoolOperator::And => left && right,
            BoolOperator::Or => left || right,
        }
    }
}

/// The comparison a due-date predicate performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateOperation {
    /// Due within the day (all-day) or at the instant.
    DueOn,
    /// Due strictly before the instant.
    DueBefore,
    /// Due strictly after the day (all-day) or the instant.
    DueAfter,
    /// No due date set.
    NoDueDate,
}

/// A resolved due-date predicate.
///
/// `datetime` is always a concrete local instant. When `all_day` is true it
/// is the local midnight that opens the matched day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueDateExpr {
    /// What to compare.
    pub operation: DueDateOperation,
    /// The reference instant.
    pub datetime: DateTime<Local>,
    /// Whether `datetime` stands for a whole calendar day.
    pub all_day: bool,
}

impl DueDateExpr {
    /// Creates a predicate with the given operation.
    pub fn new(operation: DueDateOperation, datetime: DateTime<Local>, all_day: bool) -> Self {
        Self {
            operation,
            datetime,
            all_day,
        }
    }

    /// Creates a `DueOn` predicate.
    pub fn on(datetime: DateTime<Local>, all_day: bool) -> Self {
        Self::new(DueDateOperation::DueOn, datetime, all_day)
    }
}

/// Represents a parsed filter expression.
///
/// Trees are built once by the parser and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expression {
    /// Matches every item. Produced for an empty filter.
    MatchAll,

    /// A raw word, interpreted as a priority (`p1`..`p4`) at evaluation time.
    String(String),

    /// Matches items carrying the named label.
    Label(String),

    /// Matches items in the named project.
    Project(String),

    /// Matches items by due date.
    DueDate(DueDateExpr),

    /// Boolean combination of two expressions.
    BoolInfix {
        /// Left operand.
        left: Box<Expression>,
        /// The operator.
        operator: BoolOperator,
        /// Right operand.
        right: Box<Expression>,
    },

    /// Logical NOT of an expression.
    Not(Box<Expression>),
}

impl Expression {
    /// Creates a boolean infix expression.
    pub fn infix(left: Expression, operator: BoolOperator, right: Expression) -> Self {
        Expression::BoolInfix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Creates an AND expression from two expressions.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_filter::filter::{BoolOperator, Expression};
    ///
    /// let expr = Expression::and(Expression::String("p1".into()), Expression::Label("home".into()));
    /// assert!(matches!(expr, Expression::BoolInfix { operator: BoolOperator::And, .. }));
    /// ```
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::infix(left, BoolOperator::And, right)
    }

    /// Creates an OR expression from two expressions.
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::infix(left, BoolOperator::Or, right)
    }

    /// Creates a NOT expression from another expression.
    pub fn negate(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }
}

/// Writes a label or project name, quoting it when it would not lex back
/// as a single name.
fn write_name(f: &mut fmt::Formatter<'_>, prefix: char, name: &str) -> fmt::Result {
    let needs_quotes = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || "&|!()\"'".contains(c));
    if !needs_quotes {
        return write!(f, "{prefix}{name}");
    }

    write!(f, "{prefix}\"")?;
    for c in name.chars() {
        if c == '"' || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "\"")
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression) -> fmt::Result {
    match expr {
        Expression::BoolInfix { .. } => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}

impl fmt::Display for DueDateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = if self.all_day {
            self.datetime.format("%m/%d/%Y").to_string()
        } else {
            self.datetime.format("%m/%d/%Y %H:%M:%S").to_string()
        };
        match self.operation {
            DueDateOperation::DueOn => write!(f, "{when}"),
            DueDateOperation::DueBefore => write!(f, "due before {when}"),
            DueDateOperation::DueAfter => write!(f, "due after {when}"),
            DueDateOperation::NoDueDate => write!(f, "no due date"),
        }
    }
}

/// Renders the expression back into filter syntax.
///
/// Dates are written with an explicit year, so re-parsing the output yields
/// the same tree regardless of the clock.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::MatchAll => Ok(()),
            Expression::String(literal) => write!(f, "{literal}"),
            Expression::Label(name) => write_name(f, '@', name),
            Expression::Project(name) => write_name(f, '#', name),
            Expression::DueDate(due) => write!(f, "{due}"),
            Expression::BoolInfix {
                left,
                operator,
                right,
            } => {
                write_operand(f, left)?;
                write!(f, " {} ", operator.symbol())?;
                write_operand(f, right)
            }
            Expression::Not(inner) => {
                write!(f, "!")?;
                write_operand(f, inner)
            }
        }
    }
}
