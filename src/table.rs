// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Cells and rows, the layout primitives of tabular documents.
//!
//! A [`Cell`][] is a rectangle of fixed width with optional borders, an optional fill color and
//! wrapped, aligned text.  A [`Row`][] is a horizontal strip of cells that is rendered in two
//! phases:  first the row height is resolved from the wrapped text of all cells (see
//! [`Row::resolve_height`][]), then all cells are drawn with this uniform height so that their
//! borders line up.  The measurement phase is pure and can be repeated without drawing anything,
//! which is what [`Document::row`][] uses to decide on page breaks before the first cell is
//! drawn.
//!
//! [`Cell`]: struct.Cell.html
//! [`Row`]: struct.Row.html
//! [`Row::resolve_height`]: struct.Row.html#method.resolve_height
//! [`Document::row`]: ../struct.Document.html#method.row

use crate::error::Error;
use crate::fonts;
use crate::fonts::Metrics;
use crate::render;
use crate::style::{Color, Style};
use crate::wrap;
use crate::{Alignment, Mm, Position, Size};

/// The inner padding between a cell border and its text.
const CELL_PADDING: Mm = Mm(1.0);

/// The borders of a cell.
///
/// Each of the four borders can be toggled individually so that adjacent cells can share edges,
/// for example a label cell with a left border next to a value cell with a right border.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Borders {
    /// Whether the top border is drawn.
    pub top: bool,
    /// Whether the right border is drawn.
    pub right: bool,
    /// Whether the bottom border is drawn.
    pub bottom: bool,
    /// Whether the left border is drawn.
    pub left: bool,
}

impl Borders {
    /// Creates borders with the given top, right, bottom and left visibility.
    pub fn trbl(top: bool, right: bool, bottom: bool, left: bool) -> Borders {
        Borders {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates borders with all four edges drawn.
    pub fn all() -> Borders {
        Borders::trbl(true, true, true, true)
    }

    /// Creates borders with no edges drawn.
    pub fn none() -> Borders {
        Borders::trbl(false, false, false, false)
    }

    fn draw(&self, area: &render::Area<'_>, position: Position, size: Size) {
        let style = Style::new();
        let top_left = position;
        let top_right = Position::new(position.x + size.width, position.y);
        let bottom_left = Position::new(position.x, position.y + size.height);
        let bottom_right = Position::new(position.x + size.width, position.y + size.height);
        if self.top {
            area.draw_line(vec![top_left, top_right], style);
        }
        if self.right {
            area.draw_line(vec![top_right, bottom_right], style);
        }
        if self.bottom {
            area.draw_line(vec![bottom_left, bottom_right], style);
        }
        if self.left {
            area.draw_line(vec![top_left, bottom_left], style);
        }
    }
}

impl Default for Borders {
    fn default() -> Borders {
        Borders::all()
    }
}

/// A cell of fixed width with wrapped, aligned text.
///
/// By default, a cell has all four borders, no fill color and left-aligned text.  The text is
/// wrapped to the cell width minus the inner padding; the height of a cell is determined by the
/// row it is placed in, see [`Row::resolve_height`][].
///
/// [`Row::resolve_height`]: struct.Row.html#method.resolve_height
#[derive(Clone, Debug)]
pub struct Cell {
    width: Mm,
    text: String,
    style: Style,
    alignment: Alignment,
    borders: Borders,
    fill: Option<Color>,
    link: Option<String>,
}

impl Cell {
    /// Creates a new cell with the given width and text.
    pub fn new(width: impl Into<Mm>, text: impl Into<String>) -> Cell {
        Cell {
            width: width.into(),
            text: text.into(),
            style: Style::new(),
            alignment: Alignment::Left,
            borders: Borders::all(),
            fill: None,
            link: None,
        }
    }

    /// Sets the style of this cell.
    pub fn styled(mut self, style: impl Into<Style>) -> Cell {
        self.style = style.into();
        self
    }

    /// Sets the horizontal text alignment of this cell.
    pub fn aligned(mut self, alignment: Alignment) -> Cell {
        self.alignment = alignment;
        self
    }

    /// Sets the borders of this cell.
    pub fn bordered(mut self, borders: Borders) -> Cell {
        self.borders = borders;
        self
    }

    /// Removes all borders from this cell.
    pub fn borderless(mut self) -> Cell {
        self.borders = Borders::none();
        self
    }

    /// Sets the fill color of this cell.
    pub fn filled(mut self, fill: Color) -> Cell {
        self.fill = Some(fill);
        self
    }

    /// Marks this cell as a hyperlink to the given target.
    ///
    /// The target is currently not embedded as a link annotation; linked cells are rendered in
    /// blue unless the cell style sets a color.
    pub fn linked(mut self, target: impl Into<String>) -> Cell {
        self.link = Some(target.into());
        self
    }

    /// Returns the width of this cell.
    pub fn width(&self) -> Mm {
        self.width
    }

    /// Returns the text of this cell.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the style of this cell.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Returns the fill color of this cell, if set.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Returns the width that is available for text in this cell.
    pub fn text_width(&self) -> Mm {
        self.width - CELL_PADDING * 2.0
    }

    /// Draws this cell at the given position with the given height.
    ///
    /// The given style is the document default that the cell style is merged into.
    pub(crate) fn draw(
        &self,
        area: &render::Area<'_>,
        font_cache: &fonts::FontCache,
        base: Style,
        position: Position,
        height: Mm,
    ) -> Result<(), Error> {
        let mut style = base.and(self.style);
        if self.link.is_some() && style.color().is_none() {
            style = style.with_color(Color::Rgb(0, 0, 255));
        }

        if let Some(fill) = self.fill {
            area.draw_rect(position, Size::new(self.width, height), fill);
        }

        // Empty cells are drawn without touching the font cache so that border-only grids do not
        // require a registered font.
        if !self.text.is_empty() {
            let metrics = font_cache.metrics(style)?;
            let lines: Vec<_> = wrap::wrap(&metrics, &self.text, self.text_width()).collect();
            let line_height = metrics.line_height();
            // Text is top-aligned within the cell box so that single-line cells next to a tall
            // wrapped cell start at the same y-coordinate.
            let mut y = position.y + CELL_PADDING;
            for line in &lines {
                let line_width = metrics.str_width(line);
                let offset = match self.alignment {
                    Alignment::Left => CELL_PADDING,
                    Alignment::Center => ((self.width - line_width) / 2.0).max(Mm(0.0)),
                    Alignment::Right => (self.width - line_width - CELL_PADDING).max(Mm(0.0)),
                };
                area.print_str(
                    font_cache,
                    Position::new(position.x + offset, y),
                    style,
                    line,
                )?;
                y += line_height;
            }
        }

        self.borders.draw(area, position, Size::new(self.width, height));
        Ok(())
    }
}

/// A horizontal strip of cells that is drawn with a uniform height.
#[derive(Clone, Debug, Default)]
pub struct Row {
    cells: Vec<Cell>,
    min_height: Mm,
}

impl Row {
    /// Creates a new row from the given cells.
    pub fn new(cells: Vec<Cell>) -> Row {
        Row {
            cells,
            min_height: Mm(0.0),
        }
    }

    /// Sets the minimum height of this row.
    ///
    /// The resolved row height never falls below this value, even if all cells are empty.
    pub fn with_min_height(mut self, min_height: impl Into<Mm>) -> Row {
        self.min_height = min_height.into();
        self
    }

    /// Appends a cell to this row.
    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Returns the cells of this row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the total width of this row, the sum of all cell widths.
    pub fn width(&self) -> Mm {
        self.cells.iter().map(Cell::width).sum()
    }

    /// Resolves the height of this row without drawing anything.
    ///
    /// The text of every cell is wrapped to the cell width and the cell height is the number of
    /// lines times the line height, plus the inner padding.  The row height is the maximum of
    /// all cell heights and the minimum height of the row.  Empty cells do not request metrics,
    /// so a row of empty cells resolves to its minimum height even if no fonts are loaded.
    pub fn resolve_height<M, F>(&self, mut metrics_for: F) -> Result<Mm, Error>
    where
        M: Metrics,
        F: FnMut(&Cell) -> Result<M, Error>,
    {
        let mut height = self.min_height;
        for cell in &self.cells {
            if cell.text.is_empty() {
                continue;
            }
            let metrics = metrics_for(cell)?;
            let lines = wrap::line_count(&metrics, &cell.text, cell.text_width());
            let cell_height = metrics.line_height() * lines as f64 + CELL_PADDING * 2.0;
            height = height.max(cell_height);
        }
        Ok(height)
    }

    /// Returns the beginning of the first non-empty cell text, for error messages.
    pub(crate) fn first_text_excerpt(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.text.as_str())
            .find(|text| !text.is_empty())
            .unwrap_or("")
            .chars()
            .take(40)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::testing::FixedMetrics;

    fn resolve(row: &Row) -> Mm {
        row.resolve_height(|_| Ok(FixedMetrics::new()))
            .expect("failed to resolve row height")
    }

    #[test]
    fn single_line_row() {
        // FixedMetrics: 2mm per character, 5mm line height, 1mm cell padding.
        let row = Row::new(vec![Cell::new(30, "label"), Cell::new(30, "value")]);
        assert_eq!(resolve(&row), Mm(7.0));
    }

    #[test]
    fn row_height_is_the_maximum_of_the_cell_heights() {
        // 24 characters in a 22mm cell (20mm of text width) wrap onto three lines of up to ten
        // characters each.
        let row = Row::new(vec![
            Cell::new(22, "aaaa bbbb cccc dddd eeee"),
            Cell::new(60, "short"),
        ]);
        assert_eq!(resolve(&row), Mm(17.0));
    }

    #[test]
    fn min_height_is_a_floor() {
        let row = Row::new(vec![Cell::new(50, "x")]).with_min_height(12);
        assert_eq!(resolve(&row), Mm(12.0));

        let row = Row::new(vec![Cell::new(22, "aaaa bbbb cccc dddd eeee")]).with_min_height(12);
        assert_eq!(resolve(&row), Mm(17.0));
    }

    #[test]
    fn empty_row_resolves_without_metrics() {
        let row = Row::new(vec![Cell::new(40, ""), Cell::new(40, "")]).with_min_height(7);
        let height = row
            .resolve_height(|_| -> Result<FixedMetrics, Error> {
                panic!("empty cells must not request metrics")
            })
            .expect("failed to resolve row height");
        assert_eq!(height, Mm(7.0));
    }

    #[test]
    fn longer_text_never_shrinks_a_row() {
        let mut previous = Mm(0.0);
        let mut text = String::new();
        for i in 0..20 {
            text.push_str(&format!("word{} ", i));
            let row = Row::new(vec![Cell::new(30, text.trim())]);
            let height = resolve(&row);
            assert!(height >= previous, "row height shrank for longer text");
            previous = height;
        }
    }

    #[test]
    fn row_width_is_the_sum_of_the_cell_widths() {
        let row = Row::new(vec![
            Cell::new(10, ""),
            Cell::new(80, ""),
            Cell::new(20, ""),
            Cell::new(20, ""),
            Cell::new(20, ""),
            Cell::new(20, ""),
        ]);
        assert_eq!(row.width(), Mm(170.0));
    }
}
