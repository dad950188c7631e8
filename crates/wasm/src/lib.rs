//! WASM bindings for docform
//!
//! JavaScript-friendly API for the two document flows:
//! - ITBI tax form: load assets, render a form object to PDF bytes
//! - Buyer declaration: compose HTML, hand back the rasterized bitmap
//! - `savePdf` triggers the browser download for either
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { ItbiDocument, recompute, validateItbi, savePdf } from 'docform-wasm';
//!
//! await init();
//!
//! const errors = validateItbi(form);
//! if (errors.length === 0) {
//!   const doc = new ItbiDocument();
//!   doc.loadFont(fontBytes);
//!   doc.loadBackground('front', frontBytes);
//!   doc.loadBackground('back', backBytes);
//!   savePdf(doc.render(form), doc.filename());
//! }
//! ```

use forms::FormRecord;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Panic hook and console logger, so failures surface in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn err_to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn record_from_js(form: JsValue) -> Result<FormRecord, JsValue> {
    serde_wasm_bindgen::from_value(form).map_err(|e| err_to_js(e))
}

/// pt-BR formatting helpers for form-side display
#[wasm_bindgen]
pub struct Formatter;

#[wasm_bindgen]
impl Formatter {
    /// "YYYY-MM-DD" to "DD/MM/YYYY"; invalid input yields ""
    #[wasm_bindgen(js_name = formatExpeditionDate)]
    pub fn format_expedition_date(iso: &str) -> String {
        br_text::format_expedition_date(iso)
    }

    /// "YYYY-MM" to "<mês> de <YYYY>"; invalid input yields ""
    #[wasm_bindgen(js_name = formatSignatureDate)]
    pub fn format_signature_date(year_month: &str) -> String {
        br_text::format_signature_date(year_month)
    }

    /// "88.500,00" to 88500.0; unparsable input yields 0
    #[wasm_bindgen(js_name = parseCurrency)]
    pub fn parse_currency(text: &str) -> f64 {
        br_text::parse_currency(text)
    }

    /// 128500.0 to "128.500,00"
    #[wasm_bindgen(js_name = formatCurrency)]
    pub fn format_currency(value: f64) -> String {
        br_text::format_currency(value)
    }
}

/// Recompute derived fields from a form object
///
/// @param form - Plain object of field name to string value
/// @returns Object with total_value, expedition_date, signature_date,
///          address, register_city_label
#[wasm_bindgen]
pub fn recompute(form: JsValue) -> Result<JsValue, JsValue> {
    let record = record_from_js(form)?;
    serde_wasm_bindgen::to_value(&forms::recompute(&record)).map_err(|e| err_to_js(e))
}

/// Validate a form against the ITBI rules
///
/// @returns Array of { field, message }; empty means exportable
#[wasm_bindgen(js_name = validateItbi)]
pub fn validate_itbi(form: JsValue) -> Result<JsValue, JsValue> {
    let record = record_from_js(form)?;
    serde_wasm_bindgen::to_value(&forms::validate::validate_itbi(&record)).map_err(|e| err_to_js(e))
}

/// Validate a form against the buyer declaration rules
#[wasm_bindgen(js_name = validateDeclaration)]
pub fn validate_declaration(form: JsValue) -> Result<JsValue, JsValue> {
    let record = record_from_js(form)?;
    serde_wasm_bindgen::to_value(&forms::validate::validate_declaration(&record))
        .map_err(|e| err_to_js(e))
}

/// The ITBI tax form renderer
#[wasm_bindgen]
pub struct ItbiDocument {
    renderer: forms::ItbiRenderer,
    assets: forms::ItbiAssets,
}

#[wasm_bindgen]
impl ItbiDocument {
    /// Renderer for the embedded Pedro Osório calibration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ItbiDocument, JsValue> {
        Ok(ItbiDocument {
            renderer: forms::ItbiRenderer::new().map_err(err_to_js)?,
            assets: forms::ItbiAssets::default(),
        })
    }

    /// Load the TrueType font used for form values
    ///
    /// @param data - TTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, data: &[u8]) {
        self.assets.font = data.to_vec();
    }

    /// Load one scanned background ("front" or "back")
    ///
    /// @param name - Background key from the layout
    /// @param data - JPEG or PNG bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadBackground)]
    pub fn load_background(&mut self, name: &str, data: &[u8]) {
        self.assets.add_background(name, data.to_vec());
    }

    /// Render a form object to PDF bytes
    ///
    /// @param form - Plain object of field name to string value
    /// @returns PDF bytes (Uint8Array)
    pub fn render(&self, form: JsValue) -> Result<Vec<u8>, JsValue> {
        let record = record_from_js(form)?;
        self.renderer.render(&record, &self.assets).map_err(err_to_js)
    }

    /// Fixed download name for the form
    pub fn filename(&self) -> String {
        forms::ITBI_FILENAME.to_string()
    }
}

/// The buyer declaration flow
#[wasm_bindgen]
pub struct BuyerDeclaration;

#[wasm_bindgen]
impl BuyerDeclaration {
    /// Compose the styled HTML block the caller rasterizes off-screen
    #[wasm_bindgen(js_name = composeHtml)]
    pub fn compose_html(form: JsValue) -> Result<String, JsValue> {
        let record = record_from_js(form)?;
        Ok(forms::DeclarationText::compose(&record).to_html())
    }

    /// Fit the rasterized bitmap (JPEG or PNG) onto one A4 page
    ///
    /// @param raster - Bitmap bytes from the canvas
    /// @returns PDF bytes (Uint8Array)
    #[wasm_bindgen(js_name = renderFromRaster)]
    pub fn render_from_raster(raster: &[u8]) -> Result<Vec<u8>, JsValue> {
        forms::render_from_raster(raster).map_err(err_to_js)
    }

    /// Download name derived from the buyer's first name
    #[wasm_bindgen(js_name = filenameFor)]
    pub fn filename_for(form: JsValue) -> Result<String, JsValue> {
        let record = record_from_js(form)?;
        Ok(forms::declaration_filename(record.get("name")))
    }
}

/// Trigger a browser download of PDF bytes
///
/// The object URL is revoked and the anchor removed on success and on
/// every error path; failures are logged and returned so the caller can
/// offer a retry.
#[wasm_bindgen(js_name = savePdf)]
pub fn save_pdf(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes).buffer());

    let bag = web_sys::BlobPropertyBag::new();
    bag.set_type("application/pdf");
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &bag)
        .inspect_err(|e| log::error!("failed to build PDF blob: {e:?}"))?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .inspect_err(|e| log::error!("failed to create object URL: {e:?}"))?;

    let result = click_download_anchor(&url, filename);

    if let Err(e) = web_sys::Url::revoke_object_url(&url) {
        log::error!("failed to revoke object URL: {e:?}");
    }
    if let Err(e) = &result {
        log::error!("PDF download failed: {e:?}");
    }

    result
}

fn click_download_anchor(url: &str, filename: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(url);
    anchor.set_download(filename);

    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;

    Ok(())
}
