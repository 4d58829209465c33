//! Read-only fields supplied by the content-management layer, and the
//! section footer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// One block of structured rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type", default = "paragraph")]
    pub kind: String,
    pub text: String,
}

fn paragraph() -> String {
    "paragraph".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<TextBlock>);

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![TextBlock {
            kind: paragraph(),
            text: text.into(),
        }])
    }

    /// Plain-text rendering: block texts joined by a single space.
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .map(|block| block.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|block| block.text.trim().is_empty())
    }
}

/// Slice fields rendered around the carousel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceContent {
    pub heading: RichText,
    pub price_copy: RichText,
    /// Name shown in the footer's copyright line.
    pub owner: String,
}

impl SliceContent {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

/// Footer copyright line whose year is patched in once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyrightNotice {
    owner: String,
    year: Option<i32>,
}

impl CopyrightNotice {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            year: None,
        }
    }

    /// Sets the year the first time only. Returns whether this call applied.
    pub fn stamp_year(&mut self, year: i32) -> bool {
        if self.year.is_some() {
            return false;
        }
        self.year = Some(year);
        true
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn render(&self) -> String {
        let year = self.year.map(|y| format!(" {y}")).unwrap_or_default();
        if self.owner.is_empty() {
            format!("©{year}. All Rights Reserved.")
        } else {
            format!("©{year} Created by {}. All Rights Reserved.", self.owner)
        }
    }
}
