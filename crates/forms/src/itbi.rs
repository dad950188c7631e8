//! ITBI transfer-tax form renderer
//!
//! The form is the municipality's scanned sheet with values drawn on top
//! at calibrated positions. Rendering runs in two stages: `plan` resolves
//! the layout against a record into concrete draws (testable without any
//! font or image asset), `render` executes the plan onto a two-page PDF.

use crate::{recompute, FormRecord, Layout, Result, ValueFormat};
use br_text::decimal_comma;
use pdf_core::{mm, Align, PdfDocument};
use std::collections::BTreeMap;

/// Download name for the rendered form
pub const ITBI_FILENAME: &str = "ITBI_Pedro_Osorio.pdf";

/// One resolved text placement, in layout units
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    /// Page number, 1-indexed
    pub page: usize,
    /// Position in mm from the top-left corner
    pub x_mm: f64,
    pub y_mm: f64,
}

/// Binary assets the renderer needs, fetched by the caller
#[derive(Debug, Clone, Default)]
pub struct ItbiAssets {
    /// TrueType font for the form values
    pub font: Vec<u8>,
    /// Scanned form backgrounds by layout key (JPEG or PNG)
    pub backgrounds: BTreeMap<String, Vec<u8>>,
}

impl ItbiAssets {
    pub fn new(font: Vec<u8>) -> Self {
        Self {
            font,
            backgrounds: BTreeMap::new(),
        }
    }

    pub fn add_background(&mut self, name: &str, data: Vec<u8>) {
        self.backgrounds.insert(name.to_string(), data);
    }
}

/// Renders ITBI records against a layout calibration
pub struct ItbiRenderer {
    layout: Layout,
}

impl ItbiRenderer {
    /// Renderer for the embedded Pedro Osório calibration
    pub fn new() -> Result<Self> {
        Ok(Self {
            layout: Layout::itbi_pedro_osorio()?,
        })
    }

    /// Renderer for a custom calibration
    pub fn with_layout(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolve the layout against a record into concrete draws
    ///
    /// Empty values are skipped. Derived fields (the address mirror, the
    /// total) take precedence over raw record values of the same name.
    pub fn plan(&self, record: &FormRecord) -> Vec<TextDraw> {
        let derived = recompute(record);
        let mut draws = Vec::new();

        for placement in &self.layout.fields {
            let raw = derived
                .get(&placement.field)
                .unwrap_or_else(|| record.get(&placement.field));
            if raw.is_empty() {
                continue;
            }

            let mut text = match placement.format {
                Some(ValueFormat::DecimalComma) => decimal_comma(raw),
                None => raw.to_string(),
            };
            if let Some(prefix) = &placement.prefix {
                text = format!("{prefix}{text}");
            }

            draws.push(TextDraw {
                text,
                page: placement.page,
                x_mm: placement.x,
                y_mm: placement.y,
            });
        }

        for choice in &self.layout.choices {
            let token = record.get(&choice.field);
            // Unknown or empty token: no mark, no error
            if let Some(position) = choice.options.get(token) {
                draws.push(TextDraw {
                    text: choice.glyph.clone(),
                    page: position.page,
                    x_mm: position.x,
                    y_mm: position.y,
                });
            }
        }

        draws
    }

    /// Render a record into PDF bytes
    ///
    /// A background missing from the assets skips that draw and keeps
    /// going; a partially blank print still beats no print at the counter.
    pub fn render(&self, record: &FormRecord, assets: &ItbiAssets) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(self.layout.page_count())?;

        for page in &self.layout.pages {
            if let Some(background) = assets.backgrounds.get(&page.background) {
                doc.insert_image(
                    background,
                    page.number,
                    mm::to_pt(page.x),
                    mm::to_pt(page.y),
                    mm::to_pt(page.width),
                    mm::to_pt(page.height),
                )?;
            }
        }

        doc.add_font("times", &assets.font)?;
        doc.set_font("times", self.layout.font_size)?;

        for draw in self.plan(record) {
            doc.insert_text(
                &draw.text,
                draw.page,
                mm::to_pt(draw.x_mm),
                mm::to_pt(draw.y_mm),
                Align::Left,
            )?;
        }

        Ok(doc.to_bytes()?)
    }
}
