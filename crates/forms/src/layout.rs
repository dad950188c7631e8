//! Layout calibration files
//!
//! The coordinate tables that map fields onto the scanned tax forms live in
//! versioned JSON files, embedded at compile time. Recalibrating a form
//! after a municipality reprints it means editing the JSON, not the code.
//! All coordinates are millimeters from the top-left corner of the page.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete layout for one form template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Calibration file version
    pub version: u32,
    /// Font size in points for every field on the form
    pub font_size: f32,
    /// Page backgrounds and their placement
    pub pages: Vec<PageSpec>,
    /// Text field placements
    pub fields: Vec<FieldPlacement>,
    /// Checkbox-style choice tables
    #[serde(default)]
    pub choices: Vec<ChoicePlacement>,
}

/// One page of the form and its scanned background
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    /// Page number, 1-indexed
    pub number: usize,
    /// Key into the caller-supplied background map
    pub background: String,
    /// Background placement rectangle in mm
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where one field's value is drawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPlacement {
    /// Field name in the record (or a derived field)
    pub field: String,
    /// Page number, 1-indexed
    pub page: usize,
    /// Position in mm
    pub x: f64,
    pub y: f64,
    /// Optional re-rendering of the raw value
    #[serde(default)]
    pub format: Option<ValueFormat>,
    /// Literal prefixed to the value when it is non-empty
    #[serde(default)]
    pub prefix: Option<String>,
}

/// How a raw field value is rewritten before drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueFormat {
    /// Replace the first decimal point with a comma
    DecimalComma,
}

/// A single-choice table: the selected option gets one glyph drawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoicePlacement {
    /// Field holding the selected option token
    pub field: String,
    /// Glyph drawn at the selected position (an "X" on the tax form)
    pub glyph: String,
    /// Option token to position; unknown tokens draw nothing
    pub options: BTreeMap<String, Position>,
}

/// A position on a page, in mm
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub page: usize,
    pub x: f64,
    pub y: f64,
}

/// The ITBI form calibration for Pedro Osório/RS
const ITBI_PEDRO_OSORIO: &str = include_str!("../data/itbi-pedro-osorio.json");

impl Layout {
    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The embedded Pedro Osório ITBI calibration
    pub fn itbi_pedro_osorio() -> Result<Self> {
        Self::from_json(ITBI_PEDRO_OSORIO)
    }

    /// Highest page number any placement refers to
    pub fn page_count(&self) -> usize {
        let field_max = self.fields.iter().map(|f| f.page).max().unwrap_or(0);
        let page_max = self.pages.iter().map(|p| p.number).max().unwrap_or(0);
        let choice_max = self
            .choices
            .iter()
            .flat_map(|c| c.options.values())
            .map(|p| p.page)
            .max()
            .unwrap_or(0);
        field_max.max(page_max).max(choice_max)
    }
}
