// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! The purchase order composer.
//!
//! A purchase order shares its page layout with the [`quotation`](../quotation/) composer:  a
//! first-page header with logo, company block, title and reference line, a footer with the
//! company contact block on every page, the vendor and ship-to blocks, the products table with
//! per-unit GST, the grand total with the amount in words, the terms, an optional end user
//! block and the signature area.  Only the title and the reference label differ between the two
//! document types.

use crate::decorator::PageChrome;
use crate::documents::CompanyProfile;
use crate::error::Error;
use crate::fonts::FontCache;
use crate::numbers::{format_currency, format_quantity, rupees_in_words};
use crate::style::Style;
use crate::table::{Cell, Row};
use crate::{Alignment, Document, Mm, Position};

/// The width of all sections in millimeters.
const TABLE_WIDTH: f64 = 180.0;

/// The column widths of the products table:  description, basic price, GST amount, unit price,
/// quantity and total.
const PRODUCT_COLUMNS: [f64; 6] = [62.0, 24.0, 24.0, 26.0, 18.0, 26.0];

/// A product line of the order.
#[derive(Clone, Debug, Default)]
pub struct Product {
    /// The product description; wrapped within its column.
    pub name: String,
    /// The basic price per unit, before GST.
    pub basic: f64,
    /// The GST rate in percent.
    pub gst_percent: f64,
    /// The ordered quantity.
    pub quantity: f64,
}

impl Product {
    /// Returns the GST amount per unit.
    pub fn gst_amount(&self) -> f64 {
        self.basic * self.gst_percent / 100.0
    }

    /// Returns the price per unit including GST.
    pub fn unit_price(&self) -> f64 {
        self.basic + self.gst_amount()
    }

    /// Returns the total of this line, the unit price times the quantity.
    pub fn total(&self) -> f64 {
        self.unit_price() * self.quantity
    }
}

/// The end user of the ordered products, shown below the terms.
#[derive(Clone, Debug, Default)]
pub struct EndUser {
    /// The end user's name.
    pub name: String,
    /// The end user's address; may contain newlines.
    pub address: String,
    /// The contact person or phone number.
    pub contact: String,
}

/// The complete input of a purchase order or quotation build.
#[derive(Clone, Debug, Default)]
pub struct OrderData {
    /// The document number, shown in the reference line.
    pub number: String,
    /// The document date, shown in the reference line.
    pub date: String,
    /// The vendor block; may contain newlines.
    pub vendor: String,
    /// The ship-to block; may contain newlines.
    pub ship_to: String,
    /// The product lines.
    pub products: Vec<Product>,
    /// The terms and conditions, one entry per numbered line.
    pub terms: Vec<String>,
    /// The optional end user block.
    pub end_user: Option<EndUser>,
    /// The name in the "Prepared By" line.
    pub prepared_by: String,
    /// The name in the "Authorized By" line.
    pub authorized_by: String,
}

/// Returns the grand total of the given products.
pub fn grand_total(products: &[Product]) -> f64 {
    products.iter().map(Product::total).sum()
}

/// Renders a purchase order and returns the PDF data.
///
/// All font families used by the document must already be loaded into the given font cache.
pub fn render(
    profile: &CompanyProfile,
    data: &OrderData,
    font_cache: FontCache,
) -> Result<Vec<u8>, Error> {
    render_as("PURCHASE ORDER", "PO No", profile, data, font_cache)
}

/// Renders the shared purchase order/quotation layout with the given title and reference label.
pub(crate) fn render_as(
    title: &str,
    number_label: &str,
    profile: &CompanyProfile,
    data: &OrderData,
    font_cache: FontCache,
) -> Result<Vec<u8>, Error> {
    let total = grand_total(&data.products);
    let mut doc = Document::new(font_cache, format!("{} {}", title, data.number))?;
    doc.set_font_size(9);
    doc.set_decorator(chrome(title, number_label, profile, data));

    party_blocks(&mut doc, data)?;
    products_table(&mut doc, &data.products)?;

    let total_width = PRODUCT_COLUMNS[PRODUCT_COLUMNS.len() - 1];
    doc.row(&Row::new(vec![
        Cell::new(TABLE_WIDTH - total_width, "Grand Total")
            .styled(Style::new().bold())
            .aligned(Alignment::Right),
        Cell::new(total_width, format_currency(total))
            .styled(Style::new().bold())
            .aligned(Alignment::Right),
    ]))?;
    doc.row(&Row::new(vec![Cell::new(
        TABLE_WIDTH,
        format!("Amount in Words: {}", rupees_in_words(total)),
    )
    .styled(Style::new().bold())]))?;

    terms(&mut doc, data)?;
    end_user_block(&mut doc, data)?;
    signature_block(&mut doc, profile, data)?;

    doc.finish()
}

fn chrome(
    title: &str,
    number_label: &str,
    profile: &CompanyProfile,
    data: &OrderData,
) -> PageChrome {
    let mut chrome = PageChrome::new(title)
        .with_company(&profile.name, &profile.tagline)
        .with_reference(
            format!("{}: {}", number_label, data.number),
            format!("Date: {}", data.date),
        )
        .header_on_first_page_only()
        .footer_line(&profile.address);
    if let Some(logo) = &profile.logo {
        chrome = chrome.with_logo(logo.clone(), Mm(45.0));
    }
    // All e-mail addresses share one footer line, linked to the first address.
    if !profile.emails.is_empty() {
        chrome = chrome.footer_link(
            profile.emails.join(" | "),
            format!("mailto:{}", profile.emails[0]),
        );
    }
    if !profile.phone.is_empty() {
        chrome = chrome.footer_link(&profile.phone, format!("tel:{}", profile.phone));
    }
    chrome
}

fn party_blocks(doc: &mut Document, data: &OrderData) -> Result<(), Error> {
    let half = TABLE_WIDTH / 2.0;
    doc.row(&Row::new(vec![
        Cell::new(half, format!("To,\n{}", data.vendor)),
        Cell::new(half, format!("Ship To:\n{}", data.ship_to)),
    ]))?;
    doc.advance(2);
    Ok(())
}

fn products_table(doc: &mut Document, products: &[Product]) -> Result<(), Error> {
    let header = Style::new().bold();
    let labels = [
        "Product Description",
        "Basic Price",
        "GST Amount",
        "Unit Price",
        "Qty",
        "Total",
    ];
    doc.row(
        &Row::new(
            labels
                .iter()
                .zip(PRODUCT_COLUMNS.iter())
                .map(|(&label, &width)| {
                    Cell::new(width, label)
                        .styled(header)
                        .aligned(Alignment::Center)
                })
                .collect(),
        )
        .with_min_height(7),
    )?;
    for product in products {
        doc.row(&Row::new(vec![
            Cell::new(PRODUCT_COLUMNS[0], product.name.as_str()),
            Cell::new(PRODUCT_COLUMNS[1], format_currency(product.basic))
                .aligned(Alignment::Right),
            Cell::new(PRODUCT_COLUMNS[2], format_currency(product.gst_amount()))
                .aligned(Alignment::Right),
            Cell::new(PRODUCT_COLUMNS[3], format_currency(product.unit_price()))
                .aligned(Alignment::Right),
            Cell::new(PRODUCT_COLUMNS[4], format_quantity(product.quantity))
                .aligned(Alignment::Right),
            Cell::new(PRODUCT_COLUMNS[5], format_currency(product.total()))
                .aligned(Alignment::Right),
        ]))?;
    }
    Ok(())
}

fn terms(doc: &mut Document, data: &OrderData) -> Result<(), Error> {
    if data.terms.is_empty() {
        return Ok(());
    }
    doc.advance(3);
    doc.text("Terms & Conditions:", Style::new().bold())?;
    for (idx, term) in data.terms.iter().enumerate() {
        doc.text(
            &format!("{}. {}", idx + 1, term),
            Style::new().with_font_size(8),
        )?;
    }
    Ok(())
}

fn end_user_block(doc: &mut Document, data: &OrderData) -> Result<(), Error> {
    let end_user = match &data.end_user {
        Some(end_user) => end_user,
        None => return Ok(()),
    };
    doc.advance(3);
    doc.row(&Row::new(vec![Cell::new(
        TABLE_WIDTH,
        format!(
            "End User Details:\n{}\n{}\n{}",
            end_user.name, end_user.address, end_user.contact
        ),
    )]))?;
    Ok(())
}

fn signature_block(
    doc: &mut Document,
    profile: &CompanyProfile,
    data: &OrderData,
) -> Result<(), Error> {
    doc.advance(4);
    let half = TABLE_WIDTH / 2.0;
    doc.row(&Row::new(vec![
        Cell::new(half, format!("Prepared By: {}", data.prepared_by)).borderless(),
        Cell::new(half, format!("Authorized By: {}", data.authorized_by))
            .aligned(Alignment::Right)
            .borderless(),
    ]))?;

    doc.advance(4);
    doc.paragraph(
        &format!("For, {}", profile.name),
        Style::new().bold(),
        Alignment::Right,
    )?;
    if let Some(stamp) = &profile.stamp {
        let x = doc.paper_size().width - doc.margins().right() - Mm(30.0);
        let y = doc.cursor().y + Mm(1.0);
        doc.image(stamp, Position::new(x, y), Mm(30.0))?;
    }
    doc.advance(22);
    doc.paragraph("Authorised Signatory", Style::new(), Alignment::Right)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_unit_gst_math() {
        let product = Product {
            name: String::from("Endpoint license"),
            basic: 100.0,
            gst_percent: 18.0,
            quantity: 2.0,
        };
        assert_eq!(product.gst_amount(), 18.0);
        assert_eq!(product.unit_price(), 118.0);
        assert_eq!(product.total(), 236.0);
    }

    #[test]
    fn grand_total_sums_all_lines() {
        let products = vec![
            Product {
                name: String::from("A"),
                basic: 100.0,
                gst_percent: 18.0,
                quantity: 2.0,
            },
            Product {
                name: String::from("B"),
                basic: 50.0,
                gst_percent: 18.0,
                quantity: 1.0,
            },
        ];
        assert_eq!(grand_total(&products), 236.0 + 59.0);
    }

    #[test]
    fn product_columns_span_the_content_width() {
        assert_eq!(PRODUCT_COLUMNS.iter().sum::<f64>(), TABLE_WIDTH);
    }
}
