// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Page decorators that draw the repeating chrome of every page.
//!
//! A [`PageDecorator`][] is invoked by [`Document`][] once per page, before the first body
//! content is placed on that page.  It draws static content (logo, document title, contact
//! block, page number) at fixed coordinates and returns the vertical [`PageInsets`][] that the
//! body content has to stay within.
//!
//! [`PageChrome`][] is a ready-made decorator for business documents:  an optional logo in the
//! upper right corner, a right-aligned company block, a centered title, a reference line and a
//! centered footer block with contact lines and optional page numbers.
//!
//! [`PageDecorator`]: trait.PageDecorator.html
//! [`PageChrome`]: struct.PageChrome.html
//! [`PageInsets`]: struct.PageInsets.html
//! [`Document`]: ../struct.Document.html

use crate::error::Error;
use crate::style::Style;
use crate::table::{Cell, Row};
use crate::{Alignment, Document, Mm, Position};

/// The distance between the bottom of the footer block and the bottom page edge.
const FOOTER_CLEARANCE: Mm = Mm(6.0);

/// The vertical distance of the logo from the top edge of the page.
const LOGO_TOP: Mm = Mm(2.5);

/// The vertical space that the body content of a page has to stay within.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct PageInsets {
    /// The distance from the top edge of the page to the start of the body content.
    pub top: Mm,
    /// The height of the footer area above the bottom margin that the body must not enter.
    pub bottom: Mm,
}

/// A decorator that draws the repeating chrome of every page.
///
/// Implementations are called once per page, including the first page and pages created by
/// automatic page breaks.  Pagination is disabled while the decorator runs, so all drawing
/// happens on the page that is being decorated.
pub trait PageDecorator {
    /// Draws the chrome of the given page and returns the insets for its body content.
    ///
    /// The page number starts at 1.
    fn decorate_page(
        &mut self,
        doc: &mut Document,
        page_number: usize,
    ) -> Result<PageInsets, Error>;
}

/// The standard page chrome of business documents.
///
/// The header consists of an optional logo in the upper right corner, an optional right-aligned
/// company name with a tagline, the centered document title and an optional reference line (for
/// example the document number on the left and the date on the right).  The footer consists of
/// centered contact lines, blue link lines and an optional page number; the footer block is
/// sized to its content and anchored above the bottom page edge.
///
/// By default the header is repeated on every page; call
/// [`header_on_first_page_only`](#method.header_on_first_page_only) to restrict it to the first
/// page while keeping the footer everywhere.
pub struct PageChrome {
    title: String,
    title_size: u8,
    company: Option<(String, String)>,
    reference: Option<(String, String)>,
    logo: Option<Vec<u8>>,
    logo_width: Mm,
    footer_lines: Vec<String>,
    footer_links: Vec<(String, String)>,
    first_page_only: bool,
    page_numbers: bool,
}

impl PageChrome {
    /// Creates a new page chrome with the given document title.
    pub fn new(title: impl Into<String>) -> PageChrome {
        PageChrome {
            title: title.into(),
            title_size: 15,
            company: None,
            reference: None,
            logo: None,
            logo_width: Mm(45.0),
            footer_lines: Vec::new(),
            footer_links: Vec::new(),
            first_page_only: false,
            page_numbers: false,
        }
    }

    /// Sets the font size of the title in points.
    pub fn with_title_size(mut self, title_size: u8) -> PageChrome {
        self.title_size = title_size;
        self
    }

    /// Sets the company name and tagline that are drawn right-aligned above the title.
    pub fn with_company(
        mut self,
        name: impl Into<String>,
        tagline: impl Into<String>,
    ) -> PageChrome {
        self.company = Some((name.into(), tagline.into()));
        self
    }

    /// Sets the reference line below the title, for example the document number on the left and
    /// the date on the right.
    pub fn with_reference(
        mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> PageChrome {
        self.reference = Some((left.into(), right.into()));
        self
    }

    /// Sets the logo that is drawn in the upper right corner of the header.
    pub fn with_logo(mut self, data: Vec<u8>, width: impl Into<Mm>) -> PageChrome {
        self.logo = Some(data);
        self.logo_width = width.into();
        self
    }

    /// Adds a centered line of text to the footer.
    pub fn footer_line(mut self, line: impl Into<String>) -> PageChrome {
        self.footer_lines.push(line.into());
        self
    }

    /// Adds a centered link line to the footer.
    ///
    /// Link lines are rendered in blue, see [`Cell::linked`][].
    ///
    /// [`Cell::linked`]: ../table/struct.Cell.html#method.linked
    pub fn footer_link(
        mut self,
        text: impl Into<String>,
        target: impl Into<String>,
    ) -> PageChrome {
        self.footer_links.push((text.into(), target.into()));
        self
    }

    /// Restricts the header to the first page.
    ///
    /// The footer is still drawn on every page.
    pub fn header_on_first_page_only(mut self) -> PageChrome {
        self.first_page_only = true;
        self
    }

    /// Adds a page number to the footer of every page.
    pub fn with_page_numbers(mut self) -> PageChrome {
        self.page_numbers = true;
        self
    }

    fn draw_header(&self, doc: &mut Document) -> Result<Mm, Error> {
        let margins = doc.margins();
        let width = doc.content_width();
        doc.move_to(Position::new(margins.left(), margins.top()))?;

        if let Some(logo) = &self.logo {
            let x = doc.paper_size().width - margins.right() - self.logo_width;
            doc.image(logo, Position::new(x, LOGO_TOP), self.logo_width)?;
        }

        if let Some((name, tagline)) = &self.company {
            doc.row(&Row::new(vec![Cell::new(width, name.as_str())
                .styled(Style::new().bold().with_font_size(14))
                .aligned(Alignment::Right)
                .borderless()]))?;
            doc.row(&Row::new(vec![Cell::new(width, tagline.as_str())
                .styled(Style::new().italic().with_font_size(9))
                .aligned(Alignment::Right)
                .borderless()]))?;
        }

        doc.row(&Row::new(vec![Cell::new(width, self.title.as_str())
            .styled(Style::new().bold().with_font_size(self.title_size))
            .aligned(Alignment::Center)
            .borderless()]))?;

        if let Some((left, right)) = &self.reference {
            let half = width / 2.0;
            doc.row(&Row::new(vec![
                Cell::new(half, left.as_str())
                    .styled(Style::new().with_font_size(10))
                    .borderless(),
                Cell::new(half, right.as_str())
                    .styled(Style::new().with_font_size(10))
                    .aligned(Alignment::Right)
                    .borderless(),
            ]))?;
        }

        doc.advance(2);
        Ok(doc.cursor().y)
    }

    fn footer_rows(&self, width: Mm, page_number: usize) -> Vec<Row> {
        let mut rows = Vec::new();
        for line in &self.footer_lines {
            rows.push(Row::new(vec![Cell::new(width, line.as_str())
                .styled(Style::new().italic().with_font_size(8))
                .aligned(Alignment::Center)
                .borderless()]));
        }
        for (text, target) in &self.footer_links {
            rows.push(Row::new(vec![Cell::new(width, text.as_str())
                .styled(Style::new().with_font_size(8))
                .aligned(Alignment::Center)
                .borderless()
                .linked(target.as_str())]));
        }
        if self.page_numbers {
            rows.push(Row::new(vec![Cell::new(
                width,
                format!("Page {}", page_number),
            )
            .styled(Style::new().with_font_size(8))
            .aligned(Alignment::Right)
            .borderless()]));
        }
        rows
    }

    fn draw_footer(&self, doc: &mut Document, page_number: usize) -> Result<Mm, Error> {
        let rows = self.footer_rows(doc.content_width(), page_number);
        if rows.is_empty() {
            return Ok(Mm(0.0));
        }

        // The footer block grows with its content, so its height is resolved before it is
        // placed.  Otherwise a long contact block would run past the bottom page edge.
        let mut height = Mm(0.0);
        for row in &rows {
            height += doc.row_height(row)?;
        }

        let margins = doc.margins();
        let top = doc.paper_size().height - FOOTER_CLEARANCE - height;
        doc.move_to(Position::new(margins.left(), top))?;
        for row in &rows {
            doc.row(row)?;
        }

        Ok(height + FOOTER_CLEARANCE)
    }
}

impl PageDecorator for PageChrome {
    fn decorate_page(
        &mut self,
        doc: &mut Document,
        page_number: usize,
    ) -> Result<PageInsets, Error> {
        let top = if page_number == 1 || !self.first_page_only {
            self.draw_header(doc)?
        } else {
            doc.margins().top()
        };
        let bottom = self.draw_footer(doc, page_number)?;
        Ok(PageInsets { top, bottom })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fonts::testing::FixedMetrics;

    #[test]
    fn footer_is_empty_by_default() {
        let chrome = PageChrome::new("TAX INVOICE");
        assert!(chrome.footer_lines.is_empty());
        assert!(chrome.footer_links.is_empty());
        assert!(!chrome.page_numbers);
        assert!(!chrome.first_page_only);
        assert!(chrome.footer_rows(Mm(180.0), 1).is_empty());
    }

    #[test]
    fn footer_height_tracks_its_content() {
        let chrome = PageChrome::new("PURCHASE ORDER")
            .footer_line("E402, Ganesh Glory 11, Ahmedabad - 382481")
            .footer_link("cad@cmi.com | info@cminfotech.com", "mailto:cad@cmi.com")
            .footer_link("Call: +91 873 391 5721", "tel:+918733915721")
            .with_page_numbers();
        let rows = chrome.footer_rows(Mm(180.0), 2);
        assert_eq!(rows.len(), 4);

        // Four single-line rows at 5mm line height plus 2mm inner padding each.  The footer
        // block has to reserve all of it, not a fixed number of rows.
        let height: Mm = rows
            .iter()
            .map(|row| {
                row.resolve_height(|_| Ok::<_, Error>(FixedMetrics::new()))
                    .unwrap()
            })
            .sum();
        assert_eq!(height, Mm(28.0));
    }

    #[test]
    fn chrome_is_configured_by_chaining() {
        let chrome = PageChrome::new("PURCHASE ORDER")
            .with_company("CM Infotech", "We aim for the best")
            .with_reference("PO No: 42", "Date: 01/04/2025")
            .footer_line("Ahmedabad, Gujarat")
            .footer_link("info@example.com", "mailto:info@example.com")
            .header_on_first_page_only()
            .with_page_numbers();
        assert_eq!(chrome.title, "PURCHASE ORDER");
        assert!(chrome.company.is_some());
        assert!(chrome.reference.is_some());
        assert_eq!(chrome.footer_lines.len(), 1);
        assert_eq!(chrome.footer_links.len(), 1);
        assert!(chrome.first_page_only);
        assert!(chrome.page_numbers);
    }
}
