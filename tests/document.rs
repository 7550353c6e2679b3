// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Integration tests for the document lifecycle.
//!
//! These tests run without font files, so they only use content that does not require text
//! metrics:  border-only cells, cursor movement and page breaks.  Text rendering is covered by
//! the unit tests with fixed metrics.

use invoicegen::error::ErrorKind;
use invoicegen::fonts::FontCache;
use invoicegen::style::Color;
use invoicegen::table::{Cell, Row};
use invoicegen::{Document, Mm, Position};

fn empty_document() -> Document {
    Document::new(FontCache::new(), "test").expect("failed to create document")
}

#[test]
fn finish_produces_pdf_data() {
    let mut doc = empty_document();
    let data = doc.finish().expect("failed to finish document");
    assert!(data.starts_with(b"%PDF"), "output does not look like a PDF");
}

#[test]
fn border_grids_render_without_fonts() {
    let mut doc = empty_document();
    for _ in 0..3 {
        doc.row(
            &Row::new(vec![Cell::new(90, ""), Cell::new(90, "")]).with_min_height(7),
        )
        .expect("failed to render empty row");
    }
    let data = doc.finish().expect("failed to finish document");
    assert!(data.starts_with(b"%PDF"));
}

#[test]
fn filled_cells_render_without_fonts() {
    let mut doc = empty_document();
    let grey = Color::Rgb(220, 220, 220);
    doc.row(
        &Row::new(vec![
            Cell::new(90, "").filled(grey),
            Cell::new(90, "").filled(grey).borderless(),
        ])
        .with_min_height(7),
    )
    .expect("failed to render filled row");
    let data = doc.finish().expect("failed to finish document");
    assert!(data.starts_with(b"%PDF"));
}

#[test]
fn row_height_of_empty_cells_is_the_minimum_height() {
    let doc = empty_document();
    let row = Row::new(vec![Cell::new(90, ""), Cell::new(90, "")]).with_min_height(12);
    assert_eq!(
        doc.row_height(&row).expect("failed to resolve row height"),
        Mm(12.0)
    );
}

#[test]
fn text_without_registered_fonts_fails() {
    let mut doc = empty_document();
    let err = doc
        .row(&Row::new(vec![Cell::new(90, "hello")]))
        .expect_err("rendering text without fonts must fail");
    assert!(matches!(err.kind(), ErrorKind::FontNotRegistered));
}

#[test]
fn move_to_outside_the_page_fails() {
    let mut doc = empty_document();
    let err = doc
        .move_to(Position::new(10, 400))
        .expect_err("moving below the page must fail");
    assert!(matches!(err.kind(), ErrorKind::OutOfBounds));

    let err = doc
        .move_to(Position::new(-1, 10))
        .expect_err("moving left of the page must fail");
    assert!(matches!(err.kind(), ErrorKind::OutOfBounds));

    doc.move_to(Position::new(10, 10))
        .expect("moving within the page must succeed");
}

#[test]
fn finalized_documents_reject_further_content() {
    let mut doc = empty_document();
    doc.finish().expect("failed to finish document");

    let err = doc.finish().expect_err("finishing twice must fail");
    assert!(matches!(err.kind(), ErrorKind::DocumentFinalized));

    let err = doc
        .row(&Row::new(vec![Cell::new(90, "")]))
        .expect_err("adding rows after finish must fail");
    assert!(matches!(err.kind(), ErrorKind::DocumentFinalized));

    let err = doc
        .move_to(Position::new(10, 10))
        .expect_err("moving the cursor after finish must fail");
    assert!(matches!(err.kind(), ErrorKind::DocumentFinalized));
}

#[test]
fn new_page_advances_the_page_number() {
    let mut doc = empty_document();
    assert_eq!(doc.page_number(), 1);
    doc.new_page().expect("failed to start a new page");
    assert_eq!(doc.page_number(), 2);
    assert_eq!(doc.cursor(), Position::new(doc.margins().left(), doc.margins().top()));
}

#[test]
fn overflow_is_measured_against_the_page_body() {
    let doc = empty_document();
    // A4 with a 15mm bottom margin: the body ends at 282mm, the cursor starts at 10mm.
    assert!(!doc.would_overflow(Mm::from(272)));
    assert!(doc.would_overflow(Mm::from(273)));
}

#[test]
fn tall_rows_break_onto_a_new_page() {
    let mut doc = empty_document();
    doc.row(&Row::new(vec![Cell::new(90, "")]).with_min_height(200))
        .expect("failed to render first row");
    assert_eq!(doc.page_number(), 1);
    doc.row(&Row::new(vec![Cell::new(90, "")]).with_min_height(200))
        .expect("failed to render second row");
    assert_eq!(doc.page_number(), 2);
}

#[test]
fn rows_taller_than_the_page_body_fail() {
    let mut doc = empty_document();
    let err = doc
        .row(&Row::new(vec![Cell::new(90, "")]).with_min_height(300))
        .expect_err("a row taller than the page body must fail");
    assert!(matches!(err.kind(), ErrorKind::RowExceedsPageBody));
}

#[test]
fn undecodable_images_are_skipped() {
    let mut doc = empty_document();
    doc.image(b"not an image", Position::new(10, 10), Mm::from(30))
        .expect("undecodable images must be skipped, not fail");

    let err = doc
        .image(b"not an image", Position::new(200, 10), Mm::from(30))
        .expect_err("images outside the page must fail");
    assert!(matches!(err.kind(), ErrorKind::OutOfBounds));
}

#[test]
fn advance_moves_down_and_back_to_the_left_margin() {
    let mut doc = empty_document();
    doc.move_to(Position::new(100, 50)).expect("failed to move");
    doc.advance(10);
    assert_eq!(doc.cursor(), Position::new(doc.margins().left(), Mm::from(60)));
}
