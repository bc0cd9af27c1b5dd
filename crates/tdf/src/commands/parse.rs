//! Parse command implementation.
//!
//! Prints the tree a filter expression parses into, without reading any items.

use todo_filter::filter::FilterParser;

use super::{CommandContext, Result};
use crate::output::{format_expression_json, format_expression_text};

/// Executes the parse command.
pub fn execute(ctx: &CommandContext, filter: &str) -> Result<()> {
    let clock = ctx.clock();
    let expr = FilterParser::parse_with_clock(filter, &*clock)?;

    if ctx.json_output {
        println!("{}", format_expression_json(filter, &expr)?);
    } else if !ctx.quiet {
        print!("{}", format_expression_text(&expr, ctx.use_colors));
    }

    Ok(())
}
