//! PDF document builder
//!
//! Documents start from blank A4 pages and are filled with positioned text
//! and images. Content operators are buffered per page and flushed once at
//! save time, together with the font embedding pass.

use crate::font::Typeface;
use crate::image::{generate_image_operators, scaled_dimensions, ImageScaleMode, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{mm, Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// RGB color, components 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 0-255 components
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// High-level PDF document being composed
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// The Pages tree node
    pages_id: ObjectId,
    /// Page objects in order (index 0 is page 1)
    page_ids: Vec<ObjectId>,
    /// Registered typefaces by name
    fonts: HashMap<String, Typeface>,
    /// Currently selected font name
    current_font: Option<String>,
    /// Current font size in points
    current_font_size: f32,
    /// Current fill color for text
    current_text_color: Color,
    /// Per page: font name -> content-stream resource name ("F1", ...)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    next_font_resource: u32,
    /// Embedded fonts (font name -> Type0 object ID), filled at save
    embedded_fonts: HashMap<String, ObjectId>,
    /// Embedded images keyed by content hash, for deduplication
    embedded_images: HashMap<u64, ObjectId>,
    /// Per page: resource name ("Im1", ...) -> image object ID
    page_image_resources: HashMap<usize, HashMap<String, ObjectId>>,
    next_image_resource: u32,
    /// Buffered content operators per page, flushed at save
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Create a document with `pages` blank A4 portrait pages
    pub fn new(pages: usize) -> Result<Self> {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        let mut page_ids = Vec::with_capacity(pages);

        for _ in 0..pages {
            let page_id = Self::new_page_object(&mut inner, pages_id);
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );

        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Ok(Self {
            inner,
            pages_id,
            page_ids,
            fonts: HashMap::new(),
            current_font: None,
            current_font_size: 11.0,
            current_text_color: Color::default(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            embedded_fonts: HashMap::new(),
            embedded_images: HashMap::new(),
            page_image_resources: HashMap::new(),
            next_image_resource: 1,
            page_content_buffer: HashMap::new(),
        })
    }

    /// Build one blank A4 page object with an empty content stream
    fn new_page_object(inner: &mut Document, parent: ObjectId) -> ObjectId {
        let contents_id = inner.add_object(Stream::new(Dictionary::new(), vec![]));
        inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => parent,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(mm::A4_WIDTH_PT as f32),
                Object::Real(mm::A4_HEIGHT_PT as f32),
            ],
            "Contents" => contents_id,
        })
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a blank A4 page, returning its 1-indexed page number
    pub fn add_blank_page(&mut self) -> Result<usize> {
        let page_id = Self::new_page_object(&mut self.inner, self.pages_id);
        self.page_ids.push(page_id);

        let pages_dict = self
            .inner
            .get_object_mut(self.pages_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::StructureError("Pages node is not a dictionary".to_string()))?;

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        pages_dict.set("Kids", kids);
        pages_dict.set("Count", self.page_ids.len() as i64);

        Ok(self.page_ids.len())
    }

    /// Register a TrueType font under `name`
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let typeface = Typeface::from_bytes(name, ttf_data)?;
        self.fonts.insert(name.to_string(), typeface);

        Ok(())
    }

    /// Select the current font and size
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }

        self.current_font = Some(name.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Change only the font size
    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        if self.current_font.is_none() {
            return Err(PdfError::FontNotFound("No font set".to_string()));
        }

        self.current_font_size = size;
        Ok(())
    }

    /// Set the text fill color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points with the current font and size
    pub fn text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_typeface()?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Draw text at a position
    ///
    /// `x`/`y` are points with `y` measured from the top edge of the page;
    /// the conversion to PDF bottom-origin coordinates happens here. Empty
    /// text is a no-op.
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let font_name = self
            .current_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;

        let (text_hex, text_width) = {
            let font = self
                .fonts
                .get_mut(&font_name)
                .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
            font.note_chars(text);
            (
                font.encode_text_hex(text),
                font.text_width_points(text, self.current_font_size) as f64,
            )
        };

        let font_resource_name = self.font_resource_name(&font_name, page);

        // All pages are A4 portrait
        let pdf_y = mm::A4_HEIGHT_PT - y;

        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: self.current_font_size,
            text_width,
            color: self.current_text_color,
        };
        let operators = generate_text_operators(&text_hex, x, pdf_y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw an image stretched to the given rectangle
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.insert_image_scaled(data, page, x, y, width, height, ImageScaleMode::Stretch)
    }

    /// Draw an image with a scale mode
    ///
    /// `x`/`y` name the top-left corner of the display rectangle in points,
    /// `y` from the top edge.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image_scaled(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        self.check_page(page)?;

        let (resource_name, orig_width, orig_height) = self.image_resource(data, page)?;

        let (actual_width, actual_height) =
            scaled_dimensions(orig_width, orig_height, width, height, mode);

        let pdf_y = mm::A4_HEIGHT_PT - y - actual_height;

        let operators =
            generate_image_operators(&resource_name, x, pdf_y, actual_width, actual_height);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// A reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn current_typeface(&self) -> Result<&Typeface> {
        let name = self
            .current_font
            .as_ref()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;
        self.fonts
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.clone()))
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.page_ids.len() {
            return Err(PdfError::InvalidPage(page, self.page_ids.len()));
        }
        Ok(())
    }

    fn page_object_id(&self, page: usize) -> Result<ObjectId> {
        self.page_ids
            .get(page - 1)
            .copied()
            .ok_or(PdfError::InvalidPage(page, self.page_ids.len()))
    }

    /// Resource name ("F1", "F2", ...) for a font on a page
    fn font_resource_name(&mut self, font_name: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(font_name) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Embed an image (deduplicated by content hash) and register it on the
    /// page; returns the resource name and the pixel dimensions
    fn image_resource(&mut self, data: &[u8], page: usize) -> Result<(String, u32, u32)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        let object_id = match self.embedded_images.get(&data_hash) {
            Some(&id) => id,
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                let id = self.inner.add_object(xobject.to_pdf_stream());
                self.embedded_images.insert(data_hash, id);
                id
            }
        };

        let (width, height) = {
            let stream = self
                .inner
                .get_object(object_id)?
                .as_stream()
                .map_err(|_| PdfError::StructureError("Image object is not a stream".to_string()))?;
            let width = stream
                .dict
                .get(b"Width")
                .ok()
                .and_then(|v| v.as_i64().ok())
                .ok_or_else(|| PdfError::StructureError("Image missing Width".to_string()))?;
            let height = stream
                .dict
                .get(b"Height")
                .ok()
                .and_then(|v| v.as_i64().ok())
                .ok_or_else(|| PdfError::StructureError("Image missing Height".to_string()))?;
            (width as u32, height as u32)
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        for (name, &id) in page_resources.iter() {
            if id == object_id {
                return Ok((name.clone(), width, height));
            }
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        Ok((resource_name, width, height))
    }

    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Embed fonts, attach page resources, flush content buffers
    fn finalize(&mut self) -> Result<()> {
        self.embed_fonts()?;
        self.attach_page_resources()?;
        self.flush_content_buffers()?;
        Ok(())
    }

    /// Embed every font that drew at least one character
    fn embed_fonts(&mut self) -> Result<()> {
        self.embedded_fonts.clear();

        let mut font_names: Vec<String> = self
            .fonts
            .iter()
            .filter(|(_, f)| !f.used_chars.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        font_names.sort();

        for font_name in font_names {
            let font = self
                .fonts
                .get(&font_name)
                .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
            let objects = font.to_pdf_objects()?;

            let font_file_id = self.inner.add_object(objects.font_file_stream);

            let mut font_descriptor = objects.font_descriptor;
            font_descriptor.set("FontFile2", Object::Reference(font_file_id));
            let font_descriptor_id = self.inner.add_object(font_descriptor);

            let mut cid_font = objects.cid_font;
            cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
            let cid_font_id = self.inner.add_object(cid_font);

            let tounicode_id = self.inner.add_object(objects.tounicode_stream);

            let mut type0_font = objects.type0_font;
            type0_font.set(
                "DescendantFonts",
                Object::Array(vec![Object::Reference(cid_font_id)]),
            );
            type0_font.set("ToUnicode", Object::Reference(tounicode_id));
            let type0_font_id = self.inner.add_object(type0_font);

            self.embedded_fonts.insert(font_name, type0_font_id);
        }

        Ok(())
    }

    /// Write the Resources dictionary (Font + XObject) onto each page
    fn attach_page_resources(&mut self) -> Result<()> {
        let mut updates: Vec<(ObjectId, Dictionary)> = Vec::new();

        for page in 1..=self.page_ids.len() {
            let mut font_dict = Dictionary::new();
            if let Some(fonts) = self.page_font_resources.get(&page) {
                for (font_name, resource_name) in fonts {
                    let font_id = self
                        .embedded_fonts
                        .get(font_name)
                        .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
                    font_dict.set(resource_name.as_bytes(), Object::Reference(*font_id));
                }
            }

            let mut xobject_dict = Dictionary::new();
            if let Some(images) = self.page_image_resources.get(&page) {
                for (resource_name, &object_id) in images {
                    xobject_dict.set(resource_name.as_bytes(), Object::Reference(object_id));
                }
            }

            if font_dict.is_empty() && xobject_dict.is_empty() {
                continue;
            }

            let mut resources = Dictionary::new();
            if !font_dict.is_empty() {
                resources.set("Font", Object::Dictionary(font_dict));
            }
            if !xobject_dict.is_empty() {
                resources.set("XObject", Object::Dictionary(xobject_dict));
            }

            updates.push((self.page_object_id(page)?, resources));
        }

        for (page_id, resources) in updates {
            let page_dict = self
                .inner
                .get_object_mut(page_id)?
                .as_dict_mut()
                .map_err(|_| {
                    PdfError::StructureError("Page object is not a dictionary".to_string())
                })?;
            page_dict.set("Resources", Object::Dictionary(resources));
        }

        Ok(())
    }

    /// Append all buffered operators to their page content streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let mut buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();
        buffers.sort_by_key(|(page, _)| *page);

        for (page, content) in buffers {
            if content.is_empty() {
                continue;
            }

            let page_id = self.page_object_id(page)?;
            let contents_id = {
                let page_dict = self.inner.get_object(page_id)?.as_dict().map_err(|_| {
                    PdfError::StructureError("Page object is not a dictionary".to_string())
                })?;
                page_dict
                    .get(b"Contents")
                    .map_err(|_| {
                        PdfError::StructureError("Page missing Contents".to_string())
                    })?
                    .as_reference()
                    .map_err(|_| {
                        PdfError::StructureError("Contents is not a reference".to_string())
                    })?
            };

            let stream = self
                .inner
                .get_object_mut(contents_id)?
                .as_stream_mut()
                .map_err(|_| {
                    PdfError::StructureError("Contents is not a stream".to_string())
                })?;
            stream.content.extend_from_slice(&content);
            stream.dict.set("Length", stream.content.len() as i64);
        }

        Ok(())
    }
}
