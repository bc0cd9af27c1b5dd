//! Item output formatting.

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use serde::Serialize;
use todo_filter::{Item, Store};

use super::helpers::{format_due, format_labels, format_priority, truncate_id, truncate_str};

/// JSON output structure for list command.
#[derive(Serialize)]
pub struct ListOutput<'a> {
    pub filter: &'a str,
    pub count: usize,
    pub items: Vec<ItemOutput<'a>>,
}

/// JSON output structure for a single item.
#[derive(Serialize)]
pub struct ItemOutput<'a> {
    pub id: &'a str,
    pub content: &'a str,
    pub priority: i32,
    pub due: Option<DueOutput<'a>>,
    pub project_id: &'a str,
    pub project_name: Option<&'a str>,
    pub labels: Vec<&'a str>,
}

/// JSON output for due date.
#[derive(Serialize)]
pub struct DueOutput<'a> {
    pub date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<&'a str>,
    pub is_recurring: bool,
}

/// Resolves an item's label IDs to names, skipping unknown IDs.
fn label_names<'a>(item: &'a Item, store: &'a Store) -> Vec<&'a str> {
    item.label_ids
        .iter()
        .filter_map(|id| store.labels.iter().find(|l| l.id == *id))
        .map(|l| l.name.as_str())
        .collect()
}

fn project_name<'a>(item: &Item, store: &'a Store) -> Option<&'a str> {
    store
        .projects
        .iter()
        .find(|p| p.id == item.project_id)
        .map(|p| p.name.as_str())
}

/// Formats items as JSON.
pub fn format_items_json(
    filter: &str,
    items: &[&Item],
    store: &Store,
) -> Result<String, serde_json::Error> {
    let items: Vec<ItemOutput> = items
        .iter()
        .map(|item| ItemOutput {
            id: &item.id,
            content: &item.content,
            priority: item.priority,
            due: item.due.as_ref().map(|d| DueOutput {
                date: &d.date,
                datetime: d.datetime.as_deref(),
                string: d.string.as_deref(),
                is_recurring: d.is_recurring,
            }),
            project_id: &item.project_id,
            project_name: project_name(item, store),
            labels: label_names(item, store),
        })
        .collect();

    let output = ListOutput {
        filter,
        count: items.len(),
        items,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats items as a table.
pub fn format_items_table(
    items: &[&Item],
    store: &Store,
    now: DateTime<Local>,
    use_colors: bool,
) -> String {
    if items.is_empty() {
        return "No items found.\n".to_string();
    }

    let mut output = String::new();

    // Header
    let header = format!(
        "{:<8} {:<4} {:<16} {:<15} {:<15} {}",
        "ID", "Pri", "Due", "Project", "Labels", "Content"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for item in items {
        let id_prefix = truncate_id(&item.id);
        let priority = format_priority(item.priority, 4, use_colors);
        let due = format_due(item.due.as_ref(), now, 16, use_colors);
        let project = project_name(item, store)
            .map(|name| truncate_str(name, 15))
            .unwrap_or_default();
        let labels = format_labels(&label_names(item, store), 15);

        let line = format!(
            "{:<8} {} {} {:<15} {:<15} {}",
            id_prefix, priority, due, project, labels, item.content
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use todo_filter::{Due, Label, Project};

    fn store() -> Store {
        Store::new(
            vec![Label {
                id: "l1".to_string(),
                name: "home".to_string(),
            }],
            vec![Project {
                id: "p1".to_string(),
                name: "Inbox".to_string(),
            }],
        )
    }

    fn item() -> Item {
        Item {
            id: "1234567890".to_string(),
            content: "Water the plants".to_string(),
            priority: 1,
            due: Some(Due::from_date("2017-10-05")),
            label_ids: vec!["l1".to_string(), "missing".to_string()],
            project_id: "p1".to_string(),
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2017, 10, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_format_items_table_empty() {
        assert_eq!(
            format_items_table(&[], &store(), now(), false),
            "No items found.\n"
        );
    }

    #[test]
    fn test_format_items_table_row() {
        let item = item();
        let table = format_items_table(&[&item], &store(), now(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("123456   p1   Today"));
        assert!(lines[1].contains("Inbox"));
        assert!(lines[1].contains("@home"));
        assert!(lines[1].ends_with("Water the plants"));
    }

    #[test]
    fn test_format_items_json() {
        let item = item();
        let json = format_items_json("p1", &[&item], &store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["filter"], "p1");
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["id"], "1234567890");
        assert_eq!(value["items"][0]["priority"], 1);
        assert_eq!(value["items"][0]["project_name"], "Inbox");
        assert_eq!(value["items"][0]["labels"], serde_json::json!(["home"]));
        assert_eq!(value["items"][0]["due"]["date"], "2017-10-05");
        assert!(value["items"][0]["due"].get("datetime").is_none());
    }
}
