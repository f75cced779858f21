//! Format schemas for simulation-time `$write` output.
//!
//! Elaboration collects display arguments into an explicit schema value
//! rather than a variadic call: an ordered sequence of literal strings and
//! bit slots. Each bit slot consumes one net input of the `Display` net that
//! carries the schema.

use serde::{Deserialize, Serialize};

/// One item of a display schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatItem {
    /// Literal string, emitted double-quoted
    Str(String),
    /// Value slot of the given width, consuming the next net input
    Bit(usize),
}

/// Ordered display schema, built up front by the elaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormat {
    items: Vec<FormatItem>,
}

impl DisplayFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal string item
    pub fn str(mut self, s: impl Into<String>) -> Self {
        self.items.push(FormatItem::Str(s.into()));
        self
    }

    /// Append a value slot of the given width
    pub fn bit(mut self, width: usize) -> Self {
        self.items.push(FormatItem::Bit(width));
        self
    }

    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// Widths of the value slots, in schema order
    pub fn bit_widths(&self) -> Vec<usize> {
        self.items
            .iter()
            .filter_map(|item| match item {
                FormatItem::Bit(w) => Some(*w),
                FormatItem::Str(_) => None,
            })
            .collect()
    }
}
