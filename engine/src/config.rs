//! FILENAME: engine/src/config.rs
//! Rendering configuration.
//!
//! Serializable so callers can keep their display preferences alongside
//! other settings. Every field has a default, so partial documents load.

use serde::{Deserialize, Serialize};

/// Name of the leading key column when the grouping series has no name.
pub const DEFAULT_KEY_COLUMN: &str = "_key";

/// How a dataframe is turned into text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Shown in place of absent values.
    pub absent_placeholder: String,

    /// Placed between adjacent columns.
    pub column_separator: String,

    /// Repeated to the column width on the rule line below the header.
    pub rule_char: char,

    /// Rendered for a dataframe without any columns.
    pub empty_frame_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            absent_placeholder: "?".to_string(),
            column_separator: " ".to_string(),
            rule_char: '-',
            empty_frame_text: "(Empty dataframe)".to_string(),
        }
    }
}
