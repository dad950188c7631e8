//! Forms - document templates over pdf-core
//!
//! This crate provides:
//! - `FormRecord`: the flat field map the frontend submits
//! - Validation with the form's pt-BR error messages
//! - Derived values (totals, formatted dates, the address mirror)
//! - The ITBI transfer-tax form renderer (coordinate overlay)
//! - The buyer declaration composer (HTML to be rasterized by the browser)
//!
//! # Example
//!
//! ```ignore
//! use forms::{FormRecord, ItbiAssets, ItbiRenderer};
//!
//! let record: FormRecord = serde_json::from_str(json)?;
//! let renderer = ItbiRenderer::new()?;
//! let pdf = renderer.render(&record, &assets)?;
//! ```

mod declaration;
mod derive;
mod itbi;
mod layout;
mod record;
pub mod validate;

pub use declaration::{
    declaration_filename, render_from_raster, DeclarationText, DECLARATION_BASE_FILENAME,
};
pub use derive::{recompute, DerivedFields};
pub use itbi::{ItbiAssets, ItbiRenderer, TextDraw, ITBI_FILENAME};
pub use layout::{ChoicePlacement, FieldPlacement, Layout, PageSpec, Position, ValueFormat};
pub use record::FormRecord;
pub use validate::FieldError;

use thiserror::Error;

/// Errors that can occur while building documents
#[derive(Debug, Error)]
pub enum FormsError {
    #[error("Layout error: {0}")]
    LayoutError(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),
}

/// Result type for forms operations
pub type Result<T> = std::result::Result<T, FormsError>;
