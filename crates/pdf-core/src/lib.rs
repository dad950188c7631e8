//! PDF Core - Low-level PDF composition
//!
//! This crate provides:
//! - Building PDF documents from blank A4 pages
//! - Embedding TrueType fonts
//! - Drawing text at absolute coordinates
//! - Drawing images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{PdfDocument, Align, mm};
//!
//! let mut doc = PdfDocument::new(2)?;
//! doc.add_font("times", &std::fs::read("times.ttf")?)?;
//! doc.set_font("times", 11.0)?;
//! doc.insert_text("Machado de Assis", 1, mm::to_pt(70.0), mm::to_pt(21.0), Align::Left)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{Color, PdfDocument};
pub use font::Typeface;
pub use image::{probe_dimensions, scaled_dimensions, ImageDimensions, ImageScaleMode};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF structure error: {0}")]
    StructureError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Millimeter-based page geometry
///
/// Layout calibration in this workspace is expressed in millimeters,
/// matching the scanned-form overlays it was measured against. This module
/// is the single place where millimeters become PDF points.
pub mod mm {
    /// One millimeter in PDF points
    pub const PT_PER_MM: f64 = 72.0 / 25.4;

    /// A4 portrait width in points
    pub const A4_WIDTH_PT: f64 = 595.28;
    /// A4 portrait height in points
    pub const A4_HEIGHT_PT: f64 = 841.89;

    /// A4 portrait width in millimeters
    pub const A4_WIDTH_MM: f64 = 210.0;
    /// A4 portrait height in millimeters
    pub const A4_HEIGHT_MM: f64 = 297.0;

    /// Convert millimeters to points
    pub fn to_pt(v: f64) -> f64 {
        v * PT_PER_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_mm_to_pt() {
        assert!((mm::to_pt(25.4) - 72.0).abs() < 1e-9);
        assert!((mm::to_pt(210.0) - 595.275_590_551).abs() < 1e-6);
    }
}
