// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Low-level PDF rendering utilities.
//!
//! This module provides low-level abstractions over [`printpdf`][]:  A [`Renderer`][] creates a
//! document with one or more pages.  A [`Page`][] has a single [`Layer`][] whose [`Area`][] is
//! used for all drawing.
//!
//! An [`Area`][] can print single lines of text, draw lines and rectangles and embed images.  All
//! positions are relative to the upper left corner of the area; the conversion into the PDF
//! coordinate system (origin in the lower left corner) happens here.
//!
//! [`printpdf`]: https://docs.rs/printpdf/latest/printpdf
//! [`Renderer`]: struct.Renderer.html
//! [`Page`]: struct.Page.html
//! [`Layer`]: struct.Layer.html
//! [`Area`]: struct.Area.html

use std::io;

use crate::error::{Context as _, Error, ErrorKind};
use crate::fonts;
use crate::style::{Color, Style};
use crate::{Mm, Position, Size};

/// Renders a PDF document with one or more pages.
///
/// This is a wrapper around a [`printpdf::PdfDocumentReference`][].
///
/// [`printpdf::PdfDocumentReference`]: https://docs.rs/printpdf/0.3.2/printpdf/types/pdf_document/struct.PdfDocumentReference.html
pub struct Renderer {
    doc: printpdf::PdfDocumentReference,
    // invariant: pages.len() >= 1
    pages: Vec<Page>,
}

impl Renderer {
    /// Creates a new PDF document renderer with one page of the given size and the given title.
    pub fn new(size: impl Into<Size>, title: impl AsRef<str>) -> Result<Renderer, Error> {
        let size = size.into();
        let (doc, page_idx, layer_idx) = printpdf::PdfDocument::new(
            title.as_ref(),
            size.width.into(),
            size.height.into(),
            "Layer 1",
        );
        let page_ref = doc.get_page(page_idx);
        let layer_ref = page_ref.get_layer(layer_idx);
        let page = Page::new(page_ref, layer_ref, size);

        Ok(Renderer {
            doc,
            pages: vec![page],
        })
    }

    /// Sets the PDF conformance for the generated PDF document.
    pub fn with_conformance(mut self, conformance: printpdf::PdfConformance) -> Self {
        self.doc = self.doc.with_conformance(conformance);
        self
    }

    /// Adds a new page with the given size to the document.
    pub fn add_page(&mut self, size: impl Into<Size>) {
        let size = size.into();
        let (page_idx, layer_idx) =
            self.doc
                .add_page(size.width.into(), size.height.into(), "Layer 1");
        let page_ref = self.doc.get_page(page_idx);
        let layer_ref = page_ref.get_layer(layer_idx);
        self.pages.push(Page::new(page_ref, layer_ref, size))
    }

    /// Returns the number of pages in this document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the last page of this document.
    pub fn last_page(&self) -> &Page {
        &self.pages[self.pages.len() - 1]
    }

    /// Loads the given built-in font, adds it to the generated document and returns a reference
    /// to it.
    pub fn add_builtin_font(
        &self,
        builtin: printpdf::BuiltinFont,
    ) -> Result<printpdf::IndirectFontRef, Error> {
        self.doc
            .add_builtin_font(builtin)
            .context("Failed to load PDF font")
    }

    /// Loads the font from the given data, adds it to the generated document and returns a
    /// reference to it.
    pub fn add_embedded_font(&self, data: &[u8]) -> Result<printpdf::IndirectFontRef, Error> {
        self.doc
            .add_external_font(data)
            .context("Failed to load PDF font")
    }

    /// Writes this PDF document to a writer.
    pub fn write(self, w: impl io::Write) -> Result<(), Error> {
        self.doc
            .save(&mut io::BufWriter::new(w))
            .context("Failed to save document")
    }
}

/// A page of a PDF document with a single drawing layer.
///
/// This is a wrapper around a [`printpdf::PdfPageReference`][].
///
/// [`printpdf::PdfPageReference`]: https://docs.rs/printpdf/0.3.2/printpdf/types/pdf_page/struct.PdfPageReference.html
pub struct Page {
    _page: printpdf::PdfPageReference,
    layer: Layer,
}

impl Page {
    fn new(
        page: printpdf::PdfPageReference,
        layer: printpdf::PdfLayerReference,
        size: Size,
    ) -> Page {
        Page {
            _page: page,
            layer: Layer::new(layer, size),
        }
    }

    /// Returns the drawing layer of this page.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }
}

/// The layer of a page of a PDF document.
///
/// This is a wrapper around a [`printpdf::PdfLayerReference`][].
///
/// [`printpdf::PdfLayerReference`]: https://docs.rs/printpdf/0.3.2/printpdf/types/pdf_layer/struct.PdfLayerReference.html
pub struct Layer {
    layer: printpdf::PdfLayerReference,
    size: Size,
}

impl Layer {
    fn new(layer: printpdf::PdfLayerReference, size: Size) -> Layer {
        Layer { layer, size }
    }

    /// Returns a drawable area for this layer.
    pub fn area(&self) -> Area<'_> {
        Area::new(self, Position::default(), self.size)
    }

    /// Transforms the given position that is relative to the upper left corner of the layer to a
    /// position that is relative to the lower left corner of the layer (as used by `printpdf`).
    fn transform_position(&self, mut position: Position) -> Position {
        position.y = self.size.height - position.y;
        position
    }
}

/// A view on an area of a PDF layer that can be drawn on.
///
/// This struct provides access to the drawing methods of a [`printpdf::PdfLayerReference`][].  It
/// is defined by the layer that is drawn on and the origin and the size of the area.
///
/// [`printpdf::PdfLayerReference`]: https://docs.rs/printpdf/0.3.2/printpdf/types/pdf_layer/struct.PdfLayerReference.html
#[derive(Clone)]
pub struct Area<'a> {
    layer: &'a Layer,
    origin: Position,
    size: Size,
}

impl<'a> Area<'a> {
    fn new(layer: &'a Layer, origin: Position, size: Size) -> Area<'a> {
        Area {
            layer,
            origin,
            size,
        }
    }

    /// Returns the size of this area.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Draws a line with the given points and the given style.
    ///
    /// Currently, this method only uses the color of the given style as the outline color (if
    /// set).  The points are relative to the upper left corner of the area.
    pub fn draw_line(&self, points: Vec<Position>, style: Style) {
        let line_points: Vec<_> = points
            .into_iter()
            .map(|pos| (self.transform_position(pos).into(), false))
            .collect();
        let line = printpdf::Line {
            points: line_points,
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        };
        if let Some(color) = style.color() {
            self.layer().set_outline_color(color.into());
        }
        self.layer().add_shape(line);
        if style.color().is_some() {
            self.layer().set_outline_color(Color::Rgb(0, 0, 0).into());
        }
    }

    /// Fills the given rectangle with the given color.
    ///
    /// The position is the upper left corner of the rectangle, relative to the upper left corner
    /// of the area.  The rectangle is filled without an outline; borders are drawn separately
    /// with [`draw_line`][].
    ///
    /// [`draw_line`]: #method.draw_line
    pub fn draw_rect(&self, position: Position, size: Size, fill: Color) {
        let corners = [
            position,
            Position::new(position.x + size.width, position.y),
            Position::new(position.x + size.width, position.y + size.height),
            Position::new(position.x, position.y + size.height),
        ];
        let points: Vec<_> = corners
            .iter()
            .map(|&pos| (self.transform_position(pos).into(), false))
            .collect();
        let rect = printpdf::Line {
            points,
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        };
        self.layer().set_fill_color(fill.into());
        self.layer().add_shape(rect);
        self.layer().set_fill_color(Color::Rgb(0, 0, 0).into());
    }

    /// Prints a single line of text at the given position with the given style.
    ///
    /// The position is the upper left corner of the text, relative to the upper left corner of
    /// the area.  The font cache must contain the PDF font for the font set in the style.  Empty
    /// strings are a no-op and do not require a font.
    pub fn print_str<S: AsRef<str>>(
        &self,
        font_cache: &fonts::FontCache,
        position: Position,
        style: Style,
        s: S,
    ) -> Result<(), Error> {
        let s = s.as_ref();
        if s.is_empty() {
            return Ok(());
        }

        let font = font_cache.font(style)?;
        let font_size = style.font_size();
        let ascent = font.glyph_height(font_size);

        let positions = font
            .kerning(font_cache, s.chars())
            .into_iter()
            // Kerning is measured in 1/1000 em
            .map(|pos| pos * -1000.0)
            .map(|pos| pos as i64);
        let codepoints = if font.is_builtin() {
            // Built-in fonts always use the Windows-1252 encoding
            encode_win1252(s)?
        } else {
            font.glyph_ids(font_cache, s.chars())
        };

        let pdf_font = font_cache.get_pdf_font(font).ok_or_else(|| {
            Error::new(
                "Could not find PDF font in font cache",
                ErrorKind::FontNotRegistered,
            )
        })?;

        let layer = self.layer();
        layer.begin_text_section();
        if let Some(color) = style.color() {
            layer.set_fill_color(color.into());
        }
        layer.set_font(pdf_font, font_size.into());
        let cursor = self.transform_position(position);
        layer.set_text_cursor(cursor.x.into(), (cursor.y - ascent).into());
        layer.write_positioned_codepoints(positions.zip(codepoints.iter().copied()));
        if style.color().is_some() {
            layer.set_fill_color(Color::Rgb(0, 0, 0).into());
        }
        layer.end_text_section();

        if style.is_underline() {
            let width = font.str_width(font_cache, s, font_size);
            let y = position.y + ascent + Mm::from(0.5);
            self.draw_line(
                vec![Position::new(position.x, y), Position::new(position.x + width, y)],
                style,
            );
        }

        Ok(())
    }

    /// Embeds the given image with its upper left corner at the given position, scaled to the
    /// given width while keeping the aspect ratio.
    pub fn draw_image(&self, position: Position, width: Mm, image: &image::DynamicImage) {
        use image::GenericImageView as _;

        let (px_width, px_height) = image.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }
        // The embedding path does not support transparency, so flatten down to RGB.
        let xobject = printpdf::ImageXObject {
            width: printpdf::Px(px_width as usize),
            height: printpdf::Px(px_height as usize),
            color_space: printpdf::ColorSpace::Rgb,
            bits_per_component: printpdf::ColorBits::Bit8,
            interpolate: true,
            image_data: image.to_rgb8().into_raw(),
            image_filter: None,
            clipping_bbox: None,
        };

        // Choose the dpi so that the image comes out at the requested width.
        let dpi = f64::from(px_width) / (width.0 / 25.4);
        let height = Mm(f64::from(px_height) / dpi * 25.4);

        // printpdf expects the lower left corner of the image.
        let anchor = self.transform_position(Position::new(
            position.x,
            position.y + height,
        ));
        printpdf::Image::from(xobject).add_to_layer(
            self.layer().clone(),
            Some(anchor.x.into()),
            Some(anchor.y.into()),
            None,
            None,
            None,
            Some(dpi),
        );
    }

    /// Transforms the given position that is relative to the upper left corner of the area to a
    /// position that is relative to the lower left corner of its layer (as used by `printpdf`).
    fn transform_position(&self, mut position: Position) -> Position {
        position += self.origin;
        self.layer.transform_position(position)
    }

    fn layer(&self) -> &printpdf::PdfLayerReference {
        &self.layer.layer
    }
}

/// Encodes the given string using the Windows-1252 encoding for use with built-in PDF fonts,
/// returning an error if it contains unsupported characters.
fn encode_win1252(s: &str) -> Result<Vec<u16>, Error> {
    let bytes: Vec<_> = lopdf::Document::encode_text(Some("WinAnsiEncoding"), s)
        .into_iter()
        .map(u16::from)
        .collect();

    // Windows-1252 is a single-byte encoding, so one byte is one character.
    if bytes.len() != s.chars().count() {
        Err(Error::new(
            format!(
                "Tried to print a string with characters that are not supported by the \
                Windows-1252 encoding with a built-in font: {}",
                s
            ),
            ErrorKind::UnsupportedEncoding,
        ))
    } else {
        Ok(bytes)
    }
}
