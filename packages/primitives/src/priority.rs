//! Per-file download priority.
//!
//! It expresses the download intent for one file of a transfer: whether the
//! transport should fetch its pieces at all and how eagerly.
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Default, Display)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// The file is not wanted.
    #[default]
    #[display("none")]
    None,
    /// The file is wanted.
    #[display("normal")]
    Normal,
    /// The file is wanted before the `normal` ones.
    #[display("high")]
    High,
    /// The file is being read and its next pieces are wanted first.
    #[display("readahead")]
    Readahead,
}

impl Priority {
    /// Parses a priority name, ignoring its case.
    ///
    /// Returns `None` when the name is not one of `none`, `normal`, `high`
    /// or `readahead`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "readahead" => Some(Self::Readahead),
            _ => None,
        }
    }

    /// Whether the file is wanted at all.
    #[must_use]
    pub fn is_wanted(&self) -> bool {
        *self != Self::None
    }
}
