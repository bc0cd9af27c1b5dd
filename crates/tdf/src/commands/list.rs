//! List command implementation.
//!
//! Lists items from a snapshot file, optionally narrowed by a filter expression.

use std::path::PathBuf;

use todo_filter::filter::{Clock, FilterEvaluator, FilterParser};
use todo_filter::{Item, Store};
use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_items_json, format_items_table};
use crate::snapshot::Snapshot;

/// Options for the list command.
#[derive(Debug)]
pub struct ListOptions {
    /// Filter expression.
    pub filter: Option<String>,
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if no snapshot is configured, if it cannot be read, or
/// if the filter expression is invalid.
pub fn execute(ctx: &CommandContext, opts: &ListOptions) -> Result<()> {
    let path = snapshot_path(ctx)?;
    let (items, store) = Snapshot::load(&path)?.into_parts();

    let filter = opts.filter.as_deref().unwrap_or("");
    let matched = filter_items(ctx, filter, &items, &store)?;
    debug!(filter, total = items.len(), matched = matched.len(), "filtered items");

    if ctx.json_output {
        let output = format_items_json(filter, &matched, &store)?;
        println!("{output}");
    } else if !ctx.quiet {
        let now = ctx.clock().now();
        let output = format_items_table(&matched, &store, now, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Returns the snapshot path from `--data` or the config file.
fn snapshot_path(ctx: &CommandContext) -> Result<PathBuf> {
    ctx.data_path.clone().ok_or_else(|| {
        CommandError::Config(
            "no snapshot file given; pass --data or set data_path in the config file".to_string(),
        )
    })
}

/// Parses `filter` and returns the items it matches, in snapshot order.
fn filter_items<'a>(
    ctx: &CommandContext,
    filter: &str,
    items: &'a [Item],
    store: &Store,
) -> Result<Vec<&'a Item>> {
    let clock = ctx.clock();
    let expr = FilterParser::parse_with_clock(filter, &*clock)?;
    Ok(FilterEvaluator::new(&expr, store).filter_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use todo_filter::{Due, Label};

    fn ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            data_path: None,
            now: Some(Local.with_ymd_and_hms(2017, 10, 5, 9, 0, 0).unwrap()),
        }
    }

    fn make_item(id: &str, priority: i32, due: Option<&str>) -> Item {
        Item {
            id: id.to_string(),
            content: format!("Task {id}"),
            priority,
            due: due.map(Due::from_date),
            label_ids: vec![],
            project_id: "inbox".to_string(),
        }
    }

    #[test]
    fn test_filter_items_uses_pinned_clock() {
        let items = vec![
            make_item("1", 1, Some("2017-10-05")),
            make_item("2", 1, Some("2017-10-06")),
            make_item("3", 2, Some("2017-10-05")),
            make_item("4", 1, None),
        ];
        let store = Store::default();

        let ids: Vec<&str> = filter_items(&ctx(), "p1 & today", &items, &store)
            .unwrap()
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_filter_items_empty_filter_returns_all() {
        let items = vec![make_item("1", 1, None), make_item("2", 4, None)];
        let matched = filter_items(&ctx(), "", &items, &Store::default()).unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_filter_items_label() {
        let mut tagged = make_item("1", 1, None);
        tagged.label_ids = vec!["l1".to_string()];
        let items = vec![tagged, make_item("2", 1, None)];
        let store = Store::new(
            vec![Label {
                id: "l1".to_string(),
                name: "home".to_string(),
            }],
            vec![],
        );

        let matched = filter_items(&ctx(), "@home", &items, &store).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");
    }

    #[test]
    fn test_filter_items_invalid_filter() {
        let result = filter_items(&ctx(), "p1 &", &[], &Store::default());
        assert!(matches!(result, Err(CommandError::Filter(_))));
    }

    #[test]
    fn test_execute_without_snapshot_is_config_error() {
        let opts = ListOptions { filter: None };
        assert!(matches!(
            execute(&ctx(), &opts),
            Err(CommandError::Config(_))
        ));
    }
}
