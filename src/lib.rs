// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Tax invoice, purchase order and quotation PDF generator written in pure Rust.
//!
//! `invoicegen` is a business document generator built ontop of [`printpdf`][] and
//! [`rusttype`][].  It lays out tabular documents with a cursor-based interface:  content is
//! added top to bottom, rows of cells are measured before they are drawn, and a new page is
//! started automatically when a row would not fit into the remaining page body.  All of its
//! dependencies are written in Rust, so you don't need any pre-installed libraries or tools.
//!
//! # Quickstart
//!
//! To generate a PDF document, load a font family into a [`FontCache`][], create a
//! [`Document`][] and add rows to it.  Then call the [`Document::finish`][] method to obtain the
//! PDF data.
//!
//! ```no_run
//! use invoicegen::table::{Cell, Row};
//!
//! let mut font_cache = invoicegen::fonts::FontCache::new();
//! font_cache
//!     .load_font_family("./fonts", "Liberation")
//!     .expect("Failed to load font family");
//! let mut doc = invoicegen::Document::new(font_cache, "Demo document")
//!     .expect("Failed to create PDF document");
//! doc.row(&Row::new(vec![
//!     Cell::new(90, "Description"),
//!     Cell::new(90, "Amount"),
//! ]))
//! .expect("Failed to render row");
//! let data = doc.finish().expect("Failed to render PDF document");
//! std::fs::write("output.pdf", data).expect("Failed to write PDF file");
//! ```
//!
//! # Overview
//!
//! A [`Document`][] consists of a low-level renderer, a [`FontCache`][] instance that keeps
//! track of the loaded fonts, a cursor and an optional [`PageDecorator`][] that draws the page
//! chrome (header and footer) of every page.
//!
//! The main layout primitive is the [`Row`][]:  a horizontal strip of [`Cell`][] instances with
//! fixed widths.  Rendering a row is a two-phase process.  First, the heights of all cells are
//! resolved from the wrapped text they contain, and the row height is the maximum of the cell
//! heights.  Then all cells are drawn with this uniform height so that their borders line up.
//! If the row does not fit into the remaining page body, a page break is inserted before the
//! row; a single row that is taller than an empty page body is an error.
//!
//! The [`documents`][] module contains ready-made composers for tax invoices, purchase orders
//! and quotations that are built entirely from this interface.
//!
//! In `invoicegen`, all lengths are measured in millimeters.  The only exceptions are font sizes
//! that are measured in points.  The [`Mm`][] newtype struct is used for all lengths, and the
//! [`Position`][] and [`Size`][] types are used to describe points and rectangles in the PDF
//! document.
//!
//! [`printpdf`]: https://docs.rs/printpdf
//! [`rusttype`]: https://docs.rs/rusttype
//! [`documents`]: documents/
//! [`Document`]: struct.Document.html
//! [`Document::finish`]: struct.Document.html#method.finish
//! [`FontCache`]: fonts/struct.FontCache.html
//! [`PageDecorator`]: decorator/trait.PageDecorator.html
//! [`Row`]: table/struct.Row.html
//! [`Cell`]: table/struct.Cell.html
//! [`Mm`]: struct.Mm.html
//! [`Size`]: struct.Size.html
//! [`Position`]: struct.Position.html

#![warn(missing_docs, rust_2018_idioms)]

pub mod decorator;
pub mod documents;
pub mod error;
pub mod fonts;
pub mod numbers;
pub mod render;
pub mod style;
pub mod table;
pub mod wrap;

use std::fs;
use std::path;

use derive_more::{
    Add, AddAssign, Div, DivAssign, From, Into, Mul, MulAssign, Sub, SubAssign, Sum,
};

use crate::error::{Error, ErrorKind};
use crate::fonts::Metrics as _;
use crate::table::{Cell, Row};

/// A length measured in millimeters.
///
/// `invoicegen` always uses millimeters as its length unit, except for the font size that is
/// measured in points.
///
/// If you want to convert pixels or points into millimeters, you can use the [`printpdf::Pt`][]
/// and [`printpdf::Px`][] types.
///
/// [`printpdf::Pt`]: https://docs.rs/printpdf/0.3.2/printpdf/scale/struct.Pt.html
/// [`printpdf::Px`]: https://docs.rs/printpdf/0.3.2/printpdf/scale/struct.Px.html
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Div,
    DivAssign,
    From,
    Into,
    Mul,
    MulAssign,
    Sub,
    SubAssign,
    Sum,
)]
pub struct Mm(pub f64);

impl Mm {
    /// Returns the maximum of this value and the given value.
    pub fn max(self, other: Mm) -> Mm {
        Mm(self.0.max(other.0))
    }
}

impl From<i8> for Mm {
    fn from(mm: i8) -> Mm {
        Mm(mm.into())
    }
}

impl From<i16> for Mm {
    fn from(mm: i16) -> Mm {
        Mm(mm.into())
    }
}

impl From<i32> for Mm {
    fn from(mm: i32) -> Mm {
        Mm(mm.into())
    }
}

impl From<u8> for Mm {
    fn from(mm: u8) -> Mm {
        Mm(mm.into())
    }
}

impl From<u16> for Mm {
    fn from(mm: u16) -> Mm {
        Mm(mm.into())
    }
}

impl From<u32> for Mm {
    fn from(mm: u32) -> Mm {
        Mm(mm.into())
    }
}

impl From<f32> for Mm {
    fn from(mm: f32) -> Mm {
        Mm(mm.into())
    }
}

impl From<printpdf::Mm> for Mm {
    fn from(mm: printpdf::Mm) -> Mm {
        Mm(mm.0)
    }
}

impl From<printpdf::Pt> for Mm {
    fn from(pt: printpdf::Pt) -> Mm {
        let mm: printpdf::Mm = pt.into();
        mm.into()
    }
}

impl From<Mm> for printpdf::Mm {
    fn from(mm: Mm) -> printpdf::Mm {
        printpdf::Mm(mm.0)
    }
}

impl From<Mm> for printpdf::Pt {
    fn from(mm: Mm) -> printpdf::Pt {
        printpdf::Mm(mm.0).into()
    }
}

/// A position on a PDF layer, measured in millimeters.
///
/// All positions used by `invoicegen` are measured from the top left corner of the reference
/// area.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign)]
pub struct Position {
    /// The x coordinate of the position, measured from the left border of the reference area.
    pub x: Mm,
    /// The y coordinate of the position, measured from the top border of the reference area.
    pub y: Mm,
}

impl Position {
    /// Creates a new position from the given coordinates.
    pub fn new(x: impl Into<Mm>, y: impl Into<Mm>) -> Position {
        Position {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl<X: Into<Mm>, Y: Into<Mm>> From<(X, Y)> for Position {
    fn from(values: (X, Y)) -> Position {
        Position::new(values.0, values.1)
    }
}

impl From<Position> for printpdf::Point {
    fn from(pos: Position) -> printpdf::Point {
        printpdf::Point::new(pos.x.into(), pos.y.into())
    }
}

/// A size of an area on a PDF layer, measured in millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign)]
pub struct Size {
    /// The width of the area.
    pub width: Mm,
    /// The height of the area.
    pub height: Mm,
}

impl Size {
    /// Creates a new size from the given width and height.
    pub fn new(width: impl Into<Mm>, height: impl Into<Mm>) -> Size {
        Size {
            width: width.into(),
            height: height.into(),
        }
    }
}

impl<W: Into<Mm>, H: Into<Mm>> From<(W, H)> for Size {
    fn from(values: (W, H)) -> Size {
        Size::new(values.0, values.1)
    }
}

/// A paper size like A4, legal or letter.
///
/// This enum provides variants for typical paper sizes that can be converted into [`Size`][]
/// instances.
///
/// [`Size`]: struct.Size.html
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum PaperSize {
    /// The A4 paper size (210x297mm).
    A4,
    /// The legal paper size (216x356mm).
    Legal,
    /// The letter paper size (216x279mm).
    Letter,
}

impl From<PaperSize> for Size {
    fn from(size: PaperSize) -> Size {
        match size {
            PaperSize::A4 => Size::new(210, 297),
            PaperSize::Legal => Size::new(216, 356),
            PaperSize::Letter => Size::new(216, 279),
        }
    }
}

/// The margins of an area, measured in millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Margins {
    top: Mm,
    right: Mm,
    bottom: Mm,
    left: Mm,
}

impl Margins {
    /// Creates a new `Margins` instance from the given top, right, bottom and left margins.
    pub fn trbl(
        top: impl Into<Mm>,
        right: impl Into<Mm>,
        bottom: impl Into<Mm>,
        left: impl Into<Mm>,
    ) -> Margins {
        Margins {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }

    /// Creates a new `Margins` instance from the given vertical (top and bottom) and horizontal
    /// (left and right) margins.
    pub fn vh(vertical: impl Into<Mm>, horizontal: impl Into<Mm>) -> Margins {
        let (vertical, horizontal) = (vertical.into(), horizontal.into());
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Creates a new `Margins` instance with all four margins set to the given value.
    pub fn all(all: impl Into<Mm>) -> Margins {
        let all = all.into();
        Margins::trbl(all, all, all, all)
    }

    /// Returns the top margin.
    pub fn top(&self) -> Mm {
        self.top
    }

    /// Returns the right margin.
    pub fn right(&self) -> Mm {
        self.right
    }

    /// Returns the bottom margin.
    pub fn bottom(&self) -> Mm {
        self.bottom
    }

    /// Returns the left margin.
    pub fn left(&self) -> Mm {
        self.left
    }
}

impl<T: Into<Mm>, R: Into<Mm>, B: Into<Mm>, L: Into<Mm>> From<(T, R, B, L)> for Margins {
    fn from(values: (T, R, B, L)) -> Margins {
        Margins::trbl(values.0, values.1, values.2, values.3)
    }
}

impl<V: Into<Mm>, H: Into<Mm>> From<(V, H)> for Margins {
    fn from(values: (V, H)) -> Margins {
        Margins::vh(values.0, values.1)
    }
}

impl<T: Into<Mm>> From<T> for Margins {
    fn from(value: T) -> Margins {
        Margins::all(value)
    }
}

/// The horizontal alignment of text within a cell or paragraph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Alignment {
    /// Align the text at the left edge.
    Left,
    /// Center the text.
    Center,
    /// Align the text at the right edge.
    Right,
}

impl Default for Alignment {
    fn default() -> Alignment {
        Alignment::Left
    }
}

/// A PDF document under construction.
///
/// This struct is the entry point of the `invoicegen` API.  It keeps a cursor (measured from the
/// upper left corner of the page) and renders content top to bottom:  [`row`][] draws a strip of
/// bordered cells and moves the cursor below it, [`paragraph`][] draws wrapped text, and
/// [`image`][] embeds an image at an absolute position.  A page break is inserted automatically
/// when a row or line would not fit into the remaining page body.
///
/// If a [`PageDecorator`][] has been set with [`set_decorator`][], it is invoked once per page
/// before the first content is placed on that page, and the vertical insets it returns shrink
/// the page body.
///
/// Rendering is finished by calling [`finish`][], which consumes the underlying renderer and
/// returns the PDF data.  All content methods called after that fail with
/// [`ErrorKind::DocumentFinalized`][].
///
/// # Example
///
/// ```no_run
/// use invoicegen::table::{Cell, Row};
///
/// let mut font_cache = invoicegen::fonts::FontCache::new();
/// font_cache.load_font_family("./fonts", "Liberation").unwrap();
/// let mut doc = invoicegen::Document::new(font_cache, "Invoice").unwrap();
/// doc.row(&Row::new(vec![Cell::new(180, "Hello")])).unwrap();
/// let data = doc.finish().unwrap();
/// ```
///
/// [`row`]: #method.row
/// [`paragraph`]: #method.paragraph
/// [`image`]: #method.image
/// [`set_decorator`]: #method.set_decorator
/// [`finish`]: #method.finish
/// [`PageDecorator`]: decorator/trait.PageDecorator.html
/// [`ErrorKind::DocumentFinalized`]: error/enum.ErrorKind.html#variant.DocumentFinalized
pub struct Document {
    renderer: Option<render::Renderer>,
    font_cache: fonts::FontCache,
    decorator: Option<Box<dyn decorator::PageDecorator>>,
    style: style::Style,
    paper_size: Size,
    margins: Margins,
    cursor: Position,
    page_index: usize,
    content_top: Mm,
    footer_height: Mm,
    page_decorated: bool,
    in_decorator: bool,
}

impl Document {
    /// Creates a new A4 document with the given title.
    ///
    /// All font families that the document uses must already have been loaded into the given
    /// font cache, see [`FontCache::load_font_family`][].  The fonts are embedded into the PDF
    /// document immediately.
    ///
    /// [`FontCache::load_font_family`]: fonts/struct.FontCache.html#method.load_font_family
    pub fn new(font_cache: fonts::FontCache, title: impl AsRef<str>) -> Result<Document, Error> {
        Document::with_paper_size(font_cache, title, PaperSize::A4)
    }

    /// Creates a new document with the given title and paper size.
    ///
    /// See [`new`](#method.new) for the font handling.
    pub fn with_paper_size(
        mut font_cache: fonts::FontCache,
        title: impl AsRef<str>,
        paper_size: impl Into<Size>,
    ) -> Result<Document, Error> {
        let paper_size = paper_size.into();
        // ICC profiles and XMP metadata only add to the file size.
        let renderer = render::Renderer::new(paper_size, title)?.with_conformance(
            printpdf::PdfConformance::Custom(printpdf::CustomPdfConformance {
                requires_icc_profile: false,
                requires_xmp_metadata: false,
                ..Default::default()
            }),
        );
        font_cache.load_pdf_fonts(&renderer)?;

        let margins = Margins::trbl(10, 15, 15, 15);
        Ok(Document {
            renderer: Some(renderer),
            font_cache,
            decorator: None,
            style: style::Style::new(),
            paper_size,
            margins,
            cursor: Position::new(margins.left, margins.top),
            page_index: 0,
            content_top: margins.top,
            footer_height: Mm(0.0),
            page_decorated: false,
            in_decorator: false,
        })
    }

    /// Sets the page margins of this document.
    ///
    /// If this method is not called, the default margins of 10mm at the top and 15mm at the
    /// other edges are used.  This method should be called before any content is added.
    pub fn set_margins(&mut self, margins: impl Into<Margins>) {
        self.margins = margins.into();
        self.content_top = self.margins.top;
        self.cursor = Position::new(self.margins.left, self.margins.top);
    }

    /// Sets the default font size in points for this document.
    ///
    /// If this method is not called, the default value of 12 points is used.
    pub fn set_font_size(&mut self, font_size: u8) {
        self.style.set_font_size(font_size);
    }

    /// Sets the default line spacing factor for this document.
    ///
    /// If this method is not called, the default value of 1 is used.
    pub fn set_line_spacing(&mut self, line_spacing: f64) {
        self.style.set_line_spacing(line_spacing);
    }

    /// Sets the page decorator for this document.
    ///
    /// The decorator is called once per page before the first content is placed on that page,
    /// including pages that are created by automatic page breaks.
    pub fn set_decorator(&mut self, decorator: impl decorator::PageDecorator + 'static) {
        self.decorator = Some(Box::new(decorator));
    }

    /// Returns the font cache of this document.
    pub fn font_cache(&self) -> &fonts::FontCache {
        &self.font_cache
    }

    /// Returns the paper size of this document.
    pub fn paper_size(&self) -> Size {
        self.paper_size
    }

    /// Returns the page margins of this document.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Returns the width of the page between the left and the right margin.
    pub fn content_width(&self) -> Mm {
        self.paper_size.width - self.margins.left - self.margins.right
    }

    /// Returns the current cursor position, measured from the upper left corner of the page.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the number of the current page, starting at 1.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Moves the cursor to the given absolute position.
    ///
    /// Fails with [`ErrorKind::OutOfBounds`][] if the position lies outside the page.
    ///
    /// [`ErrorKind::OutOfBounds`]: error/enum.ErrorKind.html#variant.OutOfBounds
    pub fn move_to(&mut self, position: impl Into<Position>) -> Result<(), Error> {
        self.check_open()?;
        let position = position.into();
        if position.x < Mm(0.0)
            || position.y < Mm(0.0)
            || position.x > self.paper_size.width
            || position.y > self.paper_size.height
        {
            return Err(Error::new(
                format!(
                    "Position ({}mm, {}mm) lies outside the {}x{}mm page",
                    position.x.0, position.y.0, self.paper_size.width.0, self.paper_size.height.0
                ),
                ErrorKind::OutOfBounds,
            ));
        }
        self.cursor = position;
        Ok(())
    }

    /// Moves the cursor down by the given distance and back to the left margin.
    pub fn advance(&mut self, dy: impl Into<Mm>) {
        self.cursor.y += dy.into();
        self.cursor.x = self.margins.left;
    }

    /// Returns true if content of the given height does not fit into the remaining page body.
    ///
    /// The page body ends above the bottom margin and the footer area reserved by the page
    /// decorator.
    pub fn would_overflow(&self, height: Mm) -> bool {
        self.cursor.y + height > self.body_end()
    }

    /// Starts a new page and places the cursor at the top of its body.
    pub fn new_page(&mut self) -> Result<(), Error> {
        self.check_open()?;
        // The current page gets its chrome even if no content was placed on it.
        self.ensure_decorated()?;
        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(Document::finalized_error)?;
        renderer.add_page(self.paper_size);
        self.page_index += 1;
        self.page_decorated = false;
        self.content_top = self.margins.top;
        self.footer_height = Mm(0.0);
        self.cursor = Position::new(self.margins.left, self.margins.top);
        log::debug!("Starting page {}", self.page_index + 1);
        self.ensure_decorated()
    }

    /// Draws a single cell at the cursor with the given height and moves the cursor to its right
    /// edge.
    ///
    /// The cell is not broken across pages:  if it does not fit into the remaining page body, a
    /// new page is started first.
    pub fn cell(&mut self, cell: &Cell, height: impl Into<Mm>) -> Result<(), Error> {
        self.check_open()?;
        let height = height.into();
        if !self.in_decorator {
            self.ensure_decorated()?;
            if self.would_overflow(height) {
                let x = self.cursor.x;
                self.new_page()?;
                self.cursor.x = x;
            }
        }
        let style = self.style;
        let position = self.cursor;
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(Document::finalized_error)?;
        let area = renderer.last_page().layer().area();
        cell.draw(&area, &self.font_cache, style, position, height)?;
        self.cursor.x += cell.width();
        Ok(())
    }

    /// Resolves the height the given row would be drawn with, without drawing anything.
    ///
    /// This is the measurement pass of [`row`](#method.row), see [`Row::resolve_height`][].
    /// Decorators use it to size blocks that are anchored to the bottom of the page.
    ///
    /// [`Row::resolve_height`]: table/struct.Row.html#method.resolve_height
    pub fn row_height(&self, row: &Row) -> Result<Mm, Error> {
        let base = self.style;
        row.resolve_height(|cell| self.font_cache.metrics(base.and(cell.style())))
    }

    /// Draws a row of cells at the cursor and moves the cursor below it.
    ///
    /// The row height is resolved before anything is drawn:  every cell's text is wrapped to the
    /// cell width, the row height is the maximum of the cell heights (at least the row's minimum
    /// height), and all cells are then drawn with this uniform height.  If the row does not fit
    /// into the remaining page body, a new page is started first.  A row that does not even fit
    /// into an empty page body fails with [`ErrorKind::RowExceedsPageBody`][].
    ///
    /// [`ErrorKind::RowExceedsPageBody`]: error/enum.ErrorKind.html#variant.RowExceedsPageBody
    pub fn row(&mut self, row: &Row) -> Result<(), Error> {
        self.check_open()?;
        if !self.in_decorator {
            self.ensure_decorated()?;
        }

        let height = self.row_height(row)?;

        if !self.in_decorator && self.would_overflow(height) {
            self.new_page()?;
            if self.would_overflow(height) {
                return Err(Error::new(
                    format!(
                        "A row of height {:.1}mm does not fit into the page body (first cell: \
                         {:?})",
                        height.0,
                        row.first_text_excerpt()
                    ),
                    ErrorKind::RowExceedsPageBody,
                ));
            }
        }

        let style = self.style;
        let position = self.cursor;
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(Document::finalized_error)?;
        let area = renderer.last_page().layer().area();
        let mut x = position.x;
        for cell in row.cells() {
            cell.draw(
                &area,
                &self.font_cache,
                style,
                Position::new(x, position.y),
                height,
            )?;
            x += cell.width();
        }
        self.cursor = Position::new(self.margins.left, position.y + height);
        Ok(())
    }

    /// Prints wrapped text at the cursor and moves the cursor below it.
    ///
    /// The text is wrapped to the width between the cursor and the right margin and aligned
    /// within it.  Page breaks are inserted between lines where necessary.
    pub fn paragraph(
        &mut self,
        text: &str,
        style: style::Style,
        alignment: Alignment,
    ) -> Result<(), Error> {
        self.check_open()?;
        if !self.in_decorator {
            self.ensure_decorated()?;
        }

        let style = self.style.and(style);
        let width = self.paper_size.width - self.margins.right - self.cursor.x;
        let (lines, line_height) = {
            let metrics = self.font_cache.metrics(style)?;
            let lines: Vec<_> = wrap::wrap(&metrics, text, width).collect();
            (lines, metrics.line_height())
        };

        let x = self.cursor.x;
        for line in lines {
            if !self.in_decorator && self.would_overflow(line_height) {
                self.new_page()?;
                self.cursor.x = x;
            }
            let line_width = self.font_cache.metrics(style)?.str_width(&line);
            let offset = match alignment {
                Alignment::Left => Mm(0.0),
                Alignment::Center => (width - line_width) / 2.0,
                Alignment::Right => width - line_width,
            };
            let position = Position::new(self.cursor.x + offset, self.cursor.y);
            let renderer = self
                .renderer
                .as_ref()
                .ok_or_else(Document::finalized_error)?;
            renderer
                .last_page()
                .layer()
                .area()
                .print_str(&self.font_cache, position, style, &line)?;
            self.cursor.y += line_height;
        }
        self.cursor.x = self.margins.left;
        Ok(())
    }

    /// Prints left-aligned wrapped text at the cursor, see [`paragraph`](#method.paragraph).
    pub fn text(&mut self, text: &str, style: style::Style) -> Result<(), Error> {
        self.paragraph(text, style, Alignment::Left)
    }

    /// Embeds an image with its upper left corner at the given absolute position, scaled to the
    /// given width.
    ///
    /// The cursor is not moved.  An image that cannot be decoded is skipped with a warning so
    /// that a missing logo does not abort the document generation.
    pub fn image(
        &mut self,
        data: &[u8],
        position: impl Into<Position>,
        width: impl Into<Mm>,
    ) -> Result<(), Error> {
        self.check_open()?;
        let position = position.into();
        let width = width.into();
        if position.x < Mm(0.0)
            || position.y < Mm(0.0)
            || width <= Mm(0.0)
            || position.x + width > self.paper_size.width
            || position.y > self.paper_size.height
        {
            return Err(Error::new(
                format!(
                    "An image of width {:.1}mm at ({}mm, {}mm) lies outside the page",
                    width.0, position.x.0, position.y.0
                ),
                ErrorKind::OutOfBounds,
            ));
        }
        if !self.in_decorator {
            self.ensure_decorated()?;
        }
        let image = match image::load_from_memory(data) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Skipping image that could not be decoded: {}", err);
                return Ok(());
            }
        };
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(Document::finalized_error)?;
        renderer
            .last_page()
            .layer()
            .area()
            .draw_image(position, width, &image);
        Ok(())
    }

    /// Finishes the document and returns the PDF data.
    ///
    /// After this method has been called, all further content methods fail with
    /// [`ErrorKind::DocumentFinalized`][].
    ///
    /// [`ErrorKind::DocumentFinalized`]: error/enum.ErrorKind.html#variant.DocumentFinalized
    pub fn finish(&mut self) -> Result<Vec<u8>, Error> {
        self.check_open()?;
        // The last page gets its chrome even if it is empty.
        self.ensure_decorated()?;
        let renderer = self
            .renderer
            .take()
            .ok_or_else(Document::finalized_error)?;
        let mut data = Vec::new();
        renderer.write(&mut data)?;
        Ok(data)
    }

    /// Finishes the document and writes the PDF data to the file at the given path.
    ///
    /// If the given file does not exist, it is created.  If it exists, it is overwritten.
    pub fn finish_to_file(&mut self, path: impl AsRef<path::Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let data = self.finish()?;
        fs::write(path, data)
            .map_err(|err| Error::new(format!("Could not create file {}", path.display()), err))
    }

    fn body_end(&self) -> Mm {
        self.paper_size.height - self.margins.bottom - self.footer_height
    }

    fn ensure_decorated(&mut self) -> Result<(), Error> {
        if self.page_decorated || self.in_decorator {
            return Ok(());
        }
        self.page_decorated = true;
        if let Some(mut decorator) = self.decorator.take() {
            self.in_decorator = true;
            let result = decorator.decorate_page(self, self.page_index + 1);
            self.in_decorator = false;
            self.decorator = Some(decorator);
            let insets = result?;
            self.content_top = self.margins.top.max(insets.top);
            self.footer_height = insets.bottom;
            self.cursor = Position::new(self.margins.left, self.content_top);
        }
        Ok(())
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.renderer.is_none() {
            Err(Document::finalized_error())
        } else {
            Ok(())
        }
    }

    fn finalized_error() -> Error {
        Error::new(
            "The document has already been finalized",
            ErrorKind::DocumentFinalized,
        )
    }
}
