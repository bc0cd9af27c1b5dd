//! Data shapes consumed by the filter evaluator.
//!
//! These mirror the item, label and project records a sync client or local
//! cache hands over. The filter core only reads them.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::localize;

/// Errors raised when an item's stored due date cannot be interpreted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DueParseError {
    /// The due string matches none of the accepted formats.
    #[error("malformed due date: {value}")]
    Malformed {
        /// The offending due string.
        value: String,
    },

    /// The wall-clock time has no mapping to an instant in the local timezone.
    #[error("due date {value} cannot be placed in the local timezone")]
    NonexistentLocalTime {
        /// The offending due string.
        value: String,
    },
}

/// Due date information attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    /// The date in `YYYY-MM-DD` format, or a floating `YYYY-MM-DDTHH:MM:SS`.
    pub date: String,

    /// The full datetime in RFC 3339 format (if a time is set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Whether this is a recurring due date.
    #[serde(default)]
    pub is_recurring: bool,

    /// Human-readable representation of the due date (e.g., "every day").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,

    /// The timezone for the due datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Due {
    /// Creates a new Due with just a date.
    pub fn from_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            datetime: None,
            is_recurring: false,
            string: None,
            timezone: None,
        }
    }

    /// Creates a new Due carrying an exact RFC 3339 instant.
    pub fn from_datetime(datetime: impl Into<String>) -> Self {
        let datetime = datetime.into();
        let date = datetime.get(..10).unwrap_or_default().to_string();
        Self {
            date,
            datetime: Some(datetime),
            is_recurring: false,
            string: None,
            timezone: None,
        }
    }

    /// Resolves this due date to an instant in the local timezone.
    ///
    /// `datetime` wins when present. Otherwise `date` is read as an RFC 3339
    /// instant, a floating local datetime, or a plain date (local midnight).
    pub fn to_local_datetime(&self) -> Result<DateTime<Local>, DueParseError> {
        if let Some(datetime) = &self.datetime {
            return DateTime::parse_from_rfc3339(datetime)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(|_| DueParseError::Malformed {
                    value: datetime.clone(),
                });
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Ok(dt.with_timezone(&Local));
        }

        let naive = NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
            .ok_or_else(|| DueParseError::Malformed {
                value: self.date.clone(),
            })?;

        localize(naive).ok_or_else(|| DueParseError::NonexistentLocalTime {
            value: self.date.clone(),
        })
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The ID of the item.
    pub id: String,

    /// The text content of the item.
    #[serde(default)]
    pub content: String,

    /// Item priority, compared verbatim against `p1`..`p4` filters.
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Due date information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Due>,

    /// IDs of the labels attached to this item.
    #[serde(default)]
    pub label_ids: Vec<String>,

    /// The ID of the project this item belongs to.
    pub project_id: String,
}

fn default_priority() -> i32 {
    1
}

impl Item {
    /// Returns the due instant, or `None` when the item has no due date.
    pub fn due_datetime(&self) -> Result<Option<DateTime<Local>>, DueParseError> {
        self.due.as_ref().map(Due::to_local_datetime).transpose()
    }
}

/// A label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The ID of the label.
    pub id: String,

    /// The name of the label.
    pub name: String,
}

/// A project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The ID of the project.
    pub id: String,

    /// The name of the project.
    pub name: String,
}

/// Read-only snapshot of labels and projects used to resolve filter names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Known labels, in sync order.
    #[serde(default)]
    pub labels: Vec<Label>,

    /// Known projects, in sync order.
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Store {
    /// Creates a store from labels and projects.
    pub fn new(labels: Vec<Label>, projects: Vec<Project>) -> Self {
        Self { labels, projects }
    }

    /// Returns true if `item` carries a label whose name is exactly `name`.
    pub fn item_has_label(&self, item: &Item, name: &str) -> bool {
        self.labels
            .iter()
            .filter(|label| label.name == name)
            .any(|label| item.label_ids.iter().any(|id| *id == label.id))
    }

    /// Returns true if `item` belongs to a project whose name is exactly `name`.
    pub fn item_in_project(&self, item: &Item, name: &str) -> bool {
        self.projects
            .iter()
            .any(|project| project.id == item.project_id && project.name == name)
    }
}
