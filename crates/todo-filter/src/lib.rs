//! Filter expressions for to-do items.
//!
//! A filter such as `p1 & (today | tomorrow)` is parsed once into an
//! [`Expression`](filter::Expression) tree, then evaluated against each item
//! of a list. Label and project names are resolved through a read-only
//! [`Store`].
//!
//! The crate does no I/O. Items, labels and projects come from whatever
//! sync client or cache the caller uses.

pub mod clock;
pub mod filter;
pub mod models;

pub use models::{Due, DueParseError, Item, Label, Project, Store};
