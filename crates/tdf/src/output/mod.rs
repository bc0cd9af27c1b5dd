//! Output formatting utilities for the tdf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules:
//!
//! - [`tasks`] - Item output formatting (list)
//! - [`expression`] - Parsed filter output formatting (parse)
//! - [`helpers`] - Common formatting utilities (truncation, priority, due dates)

mod expression;
pub mod helpers;
mod tasks;

pub use expression::{format_expression_json, format_expression_text};
pub use tasks::{format_items_json, format_items_table};
