//! Table observer for pretty-printing counters and diffs.
//!
//! This module provides [`TableObserver`], which renders a [`Counter`] or a
//! [`Diff`] as a formatted ASCII table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! tally = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ## Counter with its reference
//!
//! ```rust,ignore
//! use tally::counter::Counter;
//! use tally::observers::table::{TableObserver, TableStyle};
//!
//! let picked: Counter = Counter::with_reference([("apples", 2)], [("apples", 3), ("pears", 1)]);
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render_counter(&picked));
//! // ╭────────┬───────┬───────────╮
//! // │ Id     │ Count │ Reference │
//! // ├────────┼───────┼───────────┤
//! // │ apples │ 2     │ 3         │
//! // │ pears  │ 0     │ 1         │
//! // ╰────────┴───────┴───────────╯
//! ```
//!
//! ## Diff
//!
//! ```rust,ignore
//! let diff = picked.diff(DiffOptions::default())?;
//! println!("{}", TableObserver::new().render_diff(&diff));
//! // ╭────────┬──────┬───────┬──────╮
//! // │ Id     │ Mine │ Other │ Diff │
//! // ├────────┼──────┼───────┼──────┤
//! // │ apples │ 2    │ 3     │ -1   │
//! // │ pears  │ 0    │ 1     │ -1   │
//! // ╰────────┴──────┴───────┴──────╯
//! ```

use crate::counter::Counter;
use crate::diff::Diff;
use crate::quantity::Quantity;
use std::collections::BTreeSet;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// Extended ASCII characters
    Extended,
    /// GitHub-flavored Markdown table
    Markdown,
    /// ReStructuredText table
    ReStructuredText,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row.
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
        }
    }
}

#[derive(Tabled)]
struct DiffRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Mine")]
    mine: String,
    #[tabled(rename = "Other")]
    other: String,
    #[tabled(rename = "Diff")]
    diff: String,
}

/// An observer that renders counters and diffs as formatted tables.
///
/// Counters render one row per identifier, with a `Reference` column when
/// the counter has a reference. Diffs render as an `Id | Mine | Other | Diff`
/// table.
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    ///
    /// Default style is [`TableStyle::Rounded`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Extended => {
                table.with(Style::extended());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::ReStructuredText => {
                table.with(Style::re_structured_text());
            }
            TableStyle::Dots => {
                table.with(Style::dots());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    fn finish(&self, mut table: Table) -> String {
        self.apply_style(&mut table);

        if let Some(ref title) = self.config.title {
            format!("{}\n{}", title, table)
        } else {
            table.to_string()
        }
    }

    /// Renders a counter as a formatted table string.
    ///
    /// Identifiers counted by either the counter or its reference each get
    /// a row; missing quantities show as zero.
    pub fn render_counter<V: Quantity>(&self, counter: &Counter<V>) -> String {
        let reference = counter.reference();
        let mut builder = Builder::default();

        if self.config.show_header {
            let mut header = vec!["Id".to_string(), "Count".to_string()];
            if reference.is_some() {
                header.push("Reference".to_string());
            }
            builder.push_record(header);
        }

        let ids: BTreeSet<&str> = counter
            .counts()
            .keys()
            .chain(reference.into_iter().flat_map(|r| r.counts().keys()))
            .map(String::as_str)
            .collect();

        for id in ids {
            let mut row = vec![id.to_string(), counter.get(id).to_string()];
            if let Some(reference) = reference {
                row.push(reference.get(id).to_string());
            }
            builder.push_record(row);
        }

        self.finish(builder.build())
    }

    /// Renders a diff as an `Id | Mine | Other | Diff` table.
    pub fn render_diff<V: Quantity>(&self, diff: &Diff<V>) -> String {
        let rows: Vec<DiffRow> = diff
            .iter()
            .map(|(id, entry)| DiffRow {
                id: id.to_string(),
                mine: entry.mine.to_string(),
                other: entry.other.to_string(),
                diff: entry.diff.to_string(),
            })
            .collect();

        let mut table = Table::new(&rows);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        self.finish(table)
    }
}
