//! Filter expression parser and evaluator.
//!
//! # Supported Syntax
//!
//! ## Priority
//! - `p1`, `p2`, `p3`, `p4` - Items whose priority equals the digit
//!
//! ## Labels and Projects
//! - `@label` - Items carrying a label with this exact name
//! - `#project` - Items in a project with this exact name
//! - `@"two words"`, `#'two words'` - Quoted names
//!
//! ## Dates
//! - `today` / `tod`, `tomorrow`, `yesterday`
//! - `10/5/2017` (month/day/year), `16/05` (day/month)
//! - `Jan 3`, `3 Jan`, `10 Feb 2020`
//! - `16:00`, `16:10:03`, `3pm`, `7 am`, `10 Feb 2020 3pm`
//! - `due before <date>`, `due after <date>`, `overdue`
//! - `no due date` / `no date`
//!
//! ## Boolean Operators
//! - `&` - AND
//! - `|` - OR
//! - `!` - NOT
//! - `()` - Grouping
//!
//! `&` and `|` have equal precedence and are applied left to right.
//!
//! # Example
//!
//! ```
//! use chrono::{Local, TimeZone};
//! use todo_filter::filter::{FilterEvaluator, FilterParser, FixedClock};
//! use todo_filter::{Item, Store};
//!
//! let clock = FixedClock(Local.with_ymd_and_hms(2017, 1, 1, 9, 0, 0).unwrap());
//! let expr = FilterParser::parse_with_clock("p1 & (today | tomorrow)", &clock).unwrap();
//!
//! let store = Store::default();
//! let items: Vec<Item> = vec![];
//! let evaluator = FilterEvaluator::new(&expr, &store);
//! assert!(evaluator.filter_items(&items).is_empty());
//! ```

mod ast;
mod dates;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use ast::{BoolOperator, DueDateExpr, DueDateOperation, Expression};
pub use dates::DateResolver;
pub use error::{FilterError, FilterResult};
pub use evaluator::{evaluate_due_date, FilterEvaluator};
pub use lexer::{FilterToken, Lexer, PositionedToken};
pub use parser::FilterParser;
