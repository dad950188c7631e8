//! Buyer first-acquisition declaration
//!
//! This document is prose, not a coordinate overlay: the legal text is
//! composed here, styled as HTML, and rasterized by the browser (the only
//! renderer that ships Times New Roman and full text shaping). The bitmap
//! comes back to `render_from_raster`, which fits it onto one A4 page.

use crate::{recompute, FormRecord, Result};
use pdf_core::{mm, probe_dimensions, scaled_dimensions, ImageScaleMode, PdfDocument};

/// Download name used when the buyer name is empty
pub const DECLARATION_BASE_FILENAME: &str = "declaracao-comprador";

const ART_12H_CAPUT: &str = "ART. 12-H – OS EMOLUMENTOS DEVIDOS PELOS ATOS \
RELACIONADOS COM A PRIMEIRA AQUISIÇÃO IMOBILIÁRIA PARA FINS RESIDENCIAIS \
FINANCIADA PELO SISTEMA FINANCEIRO DE HABITAÇÃO, DEVEM TER REDUÇÃO DE 50%, \
DE ACORDO COM A DISCIPLINA LEGAL DA MATÉRIA (ART. 290 DA LEI 6015/73).";

const ART_12H_PARAGRAPH_1: &str = "§1º - O DESCONTO DO CAPUT APLICA-SE, \
INCLUSIVE, ÀS AVERBAÇÕES DAS EDIFICAÇÕES DECORRENTES DO FINANCIAMENTO E AOS \
CANCELAMENTOS DAS RESPECTIVAS GARANTIAS FIDUCIÁRIAS OU HIPOTECÁRIAS.";

/// The composed declaration, ready to be styled as HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationText {
    /// The main declaration paragraph up to the bolded verb
    pub opening: String,
    /// The remainder of the declaration paragraph
    pub body: String,
    /// Quoted art. 12-H caput
    pub caput: String,
    /// Quoted art. 12-H §1º
    pub paragraph_1: String,
    /// "City (UF), day de month de year."
    pub date_line: String,
    /// Upper-cased name above the signature rule
    pub signature_name: String,
}

impl DeclarationText {
    /// Compose the declaration from a record
    pub fn compose(record: &FormRecord) -> Self {
        let derived = recompute(record);

        let opening = format!(
            "{}, {}, {}, {}, inscrito(a) no CPF sob nº {}, portador(a) da CDI \
nº {} - {}, expedida em {}, residente e domiciliado(a) na {}, {}, cidade de {}, ",
            record.get("name"),
            record.get("nationality"),
            record.get("marital_status"),
            record.get("profession"),
            record.get("cpf"),
            record.get("identity_register"),
            record.get("issuing_authority"),
            derived.expedition_date,
            record.get("street_name"),
            record.get("house_number"),
            record.get("city"),
        );

        let body = ", sob as penas da Lei, que o imóvel que está adquirindo, \
casa residencial objeto da matrícula é sua primeira aquisição imobiliária \
para fins residenciais. Declaração com base no art. 12-H da Consolidação \
Normativa Notarial e Registral da Corregedoria-Geral da Justiça do Estado do \
Rio Grande do Sul, que diz:"
            .to_string();

        let date_line = format!(
            "{} ({}), {} de {}.",
            record.get("city"),
            record.get("uf"),
            record.get("signature_day"),
            derived.signature_date,
        );

        Self {
            opening,
            body,
            caput: ART_12H_CAPUT.to_string(),
            paragraph_1: ART_12H_PARAGRAPH_1.to_string(),
            date_line,
            signature_name: record.get("name").to_uppercase(),
        }
    }

    /// The styled HTML block the browser rasterizes
    ///
    /// Oversized (420mm wide, 24pt) so the downscaled bitmap stays sharp
    /// on the printed page.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div id="pdf-content" style="width: 420mm; padding: 60mm; font-family: Times New Roman; font-size: 24pt; line-height: 1.5;">
  <h1 style="text-align: center; font-size: 24pt; font-style: italic; font-weight: bold; text-decoration: underline; margin-bottom: 40px;">DECLARAÇÃO</h1>
  <p style="text-align: justify; margin: 0;">{opening}<strong>declara</strong>{body}</p>
  <div style="display: flex; flex-direction: column; gap: 20px; margin-top: 20px;">
    <p style="text-align: justify; text-indent: 48px; margin: 0;">&quot;{caput}</p>
    <p style="text-align: justify; margin: 0;">{paragraph_1}&quot;</p>
  </div>
  <div style="margin-top: 120px; text-align: right;">{date_line}</div>
  <div style="margin-top: 120px; text-align: center;">
    <div style="border-top: 1px solid black; width: 640px; margin: 0 auto; padding-top: 4px;">{signature_name}</div>
  </div>
</div>"#,
            opening = escape_html(&self.opening),
            body = escape_html(&self.body),
            caput = escape_html(&self.caput),
            paragraph_1 = escape_html(&self.paragraph_1),
            date_line = escape_html(&self.date_line),
            signature_name = escape_html(&self.signature_name),
        )
    }
}

/// Minimal HTML escaping for interpolated user text
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Fit a rasterized declaration bitmap onto one A4 page
///
/// The bitmap is scaled to the page preserving aspect ratio, centered
/// horizontally, flush with the top edge.
pub fn render_from_raster(raster: &[u8]) -> Result<Vec<u8>> {
    let dims = probe_dimensions(raster)?;
    let (width_mm, height_mm) = scaled_dimensions(
        dims.width,
        dims.height,
        mm::A4_WIDTH_MM,
        mm::A4_HEIGHT_MM,
        ImageScaleMode::FitBox,
    );
    let x_mm = (mm::A4_WIDTH_MM - width_mm) / 2.0;

    let mut doc = PdfDocument::new(1)?;
    doc.insert_image(
        raster,
        1,
        mm::to_pt(x_mm),
        0.0,
        mm::to_pt(width_mm),
        mm::to_pt(height_mm),
    )?;

    Ok(doc.to_bytes()?)
}

/// Download name for a buyer: first name token, lowercased
///
/// # Examples
/// ```
/// use forms::declaration_filename;
/// assert_eq!(
///     declaration_filename("Machado de Assis"),
///     "declaracao-comprador-machado.pdf"
/// );
/// assert_eq!(declaration_filename(""), "declaracao-comprador.pdf");
/// ```
pub fn declaration_filename(name: &str) -> String {
    match name.split_whitespace().next() {
        Some(first) => format!("{DECLARATION_BASE_FILENAME}-{}.pdf", first.to_lowercase()),
        None => format!("{DECLARATION_BASE_FILENAME}.pdf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> FormRecord {
        FormRecord::from([
            ("name", "Machado de Assis"),
            ("nationality", "brasileiro"),
            ("marital_status", "casado"),
            ("profession", "escritor"),
            ("cpf", "123.456.789-10"),
            ("identity_register", "1234567890"),
            ("issuing_authority", "SSP/RS"),
            ("expedition_date", "1999-05-06"),
            ("street_name", "Rua Quinze de Novembro"),
            ("house_number", "123"),
            ("city", "Pedro Osório"),
            ("uf", "RS"),
            ("signature_day", "14"),
            ("signature_month", "2024-03"),
        ])
    }

    #[test]
    fn test_compose_opening() {
        let text = DeclarationText::compose(&sample_record());
        assert!(text
            .opening
            .starts_with("Machado de Assis, brasileiro, casado, escritor, "));
        assert!(text.opening.contains("inscrito(a) no CPF sob nº 123.456.789-10"));
        assert!(text.opening.contains("portador(a) da CDI nº 1234567890 - SSP/RS"));
        assert!(text.opening.contains("expedida em 06/05/1999"));
        assert!(text
            .opening
            .contains("residente e domiciliado(a) na Rua Quinze de Novembro, 123"));
    }

    #[test]
    fn test_compose_date_line() {
        let text = DeclarationText::compose(&sample_record());
        assert_eq!(text.date_line, "Pedro Osório (RS), 14 de março de 2024.");
    }

    #[test]
    fn test_compose_with_empty_record() {
        let text = DeclarationText::compose(&FormRecord::new());
        assert!(text.date_line.ends_with("de ."));
        assert_eq!(text.signature_name, "");
    }

    #[test]
    fn test_compose_signature_uppercased() {
        let text = DeclarationText::compose(&sample_record());
        assert_eq!(text.signature_name, "MACHADO DE ASSIS");
    }

    #[test]
    fn test_compose_quotes_fixed_articles() {
        let text = DeclarationText::compose(&sample_record());
        assert!(text.caput.starts_with("ART. 12-H"));
        assert!(text.caput.contains("ART. 290 DA LEI 6015/73"));
        assert!(text.paragraph_1.starts_with("§1º"));
    }

    #[test]
    fn test_html_structure() {
        let html = DeclarationText::compose(&sample_record()).to_html();
        assert!(html.contains("DECLARAÇÃO"));
        assert!(html.contains("<strong>declara</strong>"));
        assert!(html.contains("Times New Roman"));
        assert!(html.contains("&quot;ART. 12-H"));
        assert!(html.contains("MACHADO DE ASSIS"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let record = FormRecord::from([("name", "A <b>& B</b>")]);
        let html = DeclarationText::compose(&record).to_html();
        assert!(html.contains("A &lt;b&gt;&amp; B&lt;/b&gt;"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            declaration_filename("Machado de Assis"),
            "declaracao-comprador-machado.pdf"
        );
        assert_eq!(declaration_filename("ANA"), "declaracao-comprador-ana.pdf");
        assert_eq!(declaration_filename(""), "declaracao-comprador.pdf");
        assert_eq!(declaration_filename("   "), "declaracao-comprador.pdf");
    }
}
