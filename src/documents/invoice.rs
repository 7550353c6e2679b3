// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! The tax invoice composer.
//!
//! A tax invoice consists of the page chrome (company block, centered "TAX INVOICE" title,
//! footer note), the supplier and buyer party blocks, a metadata grid (invoice number, dates,
//! references), the itemized goods table, the tax totals with SGST and CGST, the total amount in
//! words, a per-HSN tax summary, the bank details, a declaration and the signature block.
//!
//! The layout is a fixed-width table flow:  every section is 180mm wide, matching the A4
//! content width between 15mm side margins, so that all section borders line up vertically.

use std::collections::BTreeMap;

use crate::decorator::PageChrome;
use crate::documents::CompanyProfile;
use crate::error::Error;
use crate::fonts::FontCache;
use crate::numbers::{format_currency, format_percent, format_quantity, rupees_in_words};
use crate::style::{Color, Style};
use crate::table::{Borders, Cell, Row};
use crate::{Alignment, Document, Mm, Position};

/// The width of all invoice sections in millimeters.
const TABLE_WIDTH: f64 = 180.0;

/// The background color of table headers and section titles.
const HEADER_FILL: Color = Color::Rgb(220, 220, 220);

/// The column widths of the goods table:  serial number, description, HSN/SAC, quantity, rate
/// and amount.
const ITEM_COLUMNS: [f64; 6] = [10.0, 75.0, 25.0, 20.0, 25.0, 25.0];

/// The column widths of the per-HSN tax summary table.
const TAX_COLUMNS: [f64; 6] = [30.0, 40.0, 25.0, 30.0, 25.0, 30.0];

/// A party of the invoice, either the supplier or the buyer.
#[derive(Clone, Debug, Default)]
pub struct Party {
    /// The legal name.
    pub name: String,
    /// The postal address; may contain newlines.
    pub address: String,
    /// The GST identification number.
    pub gstin: String,
    /// The state name and code.
    pub state: String,
    /// The contact email address; left out of the party block if empty.
    pub email: String,
}

/// The metadata grid of the invoice.
#[derive(Clone, Debug, Default)]
pub struct InvoiceInfo {
    /// The invoice number.
    pub invoice_no: String,
    /// The invoice date.
    pub dated: String,
    /// The delivery note reference.
    pub delivery_note: String,
    /// The mode or terms of payment.
    pub payment_terms: String,
    /// The reference number and date.
    pub reference: String,
    /// Other references.
    pub other_references: String,
    /// The buyer's order number.
    pub buyer_order_no: String,
    /// The buyer's order date.
    pub buyer_order_date: String,
    /// The dispatch method.
    pub dispatched_through: String,
    /// The destination of the shipment.
    pub destination: String,
}

/// A line item of the goods table.
#[derive(Clone, Debug, Default)]
pub struct InvoiceItem {
    /// The description of the goods; wrapped within its column.
    pub description: String,
    /// The HSN/SAC classification code.
    pub hsn_sac: String,
    /// The quantity.
    pub quantity: f64,
    /// The rate per unit.
    pub unit_rate: f64,
}

impl InvoiceItem {
    /// Returns the amount of this item, the quantity times the unit rate.
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_rate
    }
}

/// The bank details block of the invoice.
#[derive(Clone, Debug, Default)]
pub struct BankDetails {
    /// The account holder's name.
    pub account_holder: String,
    /// The bank name.
    pub bank_name: String,
    /// The account number.
    pub account_number: String,
    /// The branch and IFS code.
    pub branch_ifsc: String,
}

/// The complete input of a tax invoice build.
#[derive(Clone, Debug)]
pub struct InvoiceData {
    /// The supplier party block.
    pub supplier: Party,
    /// The buyer party block.
    pub buyer: Party,
    /// The metadata grid.
    pub info: InvoiceInfo,
    /// The line items of the goods table.
    pub items: Vec<InvoiceItem>,
    /// The bank details block.
    pub bank: BankDetails,
    /// The SGST rate in percent.
    pub sgst_rate: f64,
    /// The CGST rate in percent.
    pub cgst_rate: f64,
}

impl Default for InvoiceData {
    fn default() -> InvoiceData {
        InvoiceData {
            supplier: Party::default(),
            buyer: Party::default(),
            info: InvoiceInfo::default(),
            items: Vec::new(),
            bank: BankDetails::default(),
            sgst_rate: 9.0,
            cgst_rate: 9.0,
        }
    }
}

/// The computed totals of an invoice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InvoiceTotals {
    /// The basic amount, the sum of all item amounts.
    pub basic: f64,
    /// The SGST amount, rounded to two decimal places.
    pub sgst: f64,
    /// The CGST amount, rounded to two decimal places.
    pub cgst: f64,
    /// The difference between the rounded total and the exact sum.
    pub round_off: f64,
    /// The final total, rounded to whole rupees.
    pub total: f64,
}

impl InvoiceTotals {
    /// Computes the totals for the given items and tax rates.
    pub fn compute(items: &[InvoiceItem], sgst_rate: f64, cgst_rate: f64) -> InvoiceTotals {
        let basic: f64 = items.iter().map(InvoiceItem::amount).sum();
        let sgst = round2(basic * sgst_rate / 100.0);
        let cgst = round2(basic * cgst_rate / 100.0);
        let exact = basic + sgst + cgst;
        let total = exact.round();
        let round_off = round2(total - exact);
        InvoiceTotals {
            basic,
            sgst,
            cgst,
            round_off,
            total,
        }
    }
}

/// Renders a tax invoice and returns the PDF data.
///
/// All font families used by the invoice must already be loaded into the given font cache.
pub fn render(
    profile: &CompanyProfile,
    data: &InvoiceData,
    font_cache: FontCache,
) -> Result<Vec<u8>, Error> {
    let totals = InvoiceTotals::compute(&data.items, data.sgst_rate, data.cgst_rate);
    let mut doc = Document::new(font_cache, format!("Tax Invoice {}", data.info.invoice_no))?;
    doc.set_font_size(9);

    let mut chrome = PageChrome::new("TAX INVOICE")
        .with_title_size(18)
        .with_company(&profile.name, &profile.tagline)
        .footer_line("This is a Computer Generated Invoice");
    if let Some(logo) = &profile.logo {
        chrome = chrome.with_logo(logo.clone(), Mm(40.0));
    }
    doc.set_decorator(chrome);

    party_blocks(&mut doc, data)?;
    meta_grid(&mut doc, &data.info)?;
    items_table(&mut doc, &data.items)?;
    totals_rows(&mut doc, data, &totals)?;
    doc.row(&Row::new(vec![Cell::new(
        TABLE_WIDTH,
        format!(
            "Amount Chargeable (in words): {}",
            rupees_in_words(totals.total)
        ),
    )
    .styled(Style::new().bold())]))?;
    tax_summary(&mut doc, data, &totals)?;
    bank_details(&mut doc, &data.bank)?;
    doc.row(&Row::new(vec![Cell::new(
        TABLE_WIDTH,
        "Declaration: We declare that this invoice shows the actual price of the goods \
         described and that all particulars are true and correct.",
    )
    .styled(Style::new().with_font_size(8))]))?;
    signature_block(&mut doc, profile)?;

    doc.finish()
}

fn party_text(party: &Party, label: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(label) = label {
        text.push_str(label);
        text.push('\n');
    }
    text.push_str(&party.name);
    text.push('\n');
    text.push_str(&party.address);
    text.push_str(&format!("\nGSTIN/UIN: {}", party.gstin));
    text.push_str(&format!("\nState Name: {}", party.state));
    if !party.email.is_empty() {
        text.push_str(&format!("\nE-Mail: {}", party.email));
    }
    text
}

fn party_blocks(doc: &mut Document, data: &InvoiceData) -> Result<(), Error> {
    let half = TABLE_WIDTH / 2.0;
    doc.row(&Row::new(vec![
        Cell::new(half, party_text(&data.supplier, None)),
        Cell::new(half, party_text(&data.buyer, Some("Buyer (Bill to)"))),
    ]))
}

fn meta_grid(doc: &mut Document, info: &InvoiceInfo) -> Result<(), Error> {
    let rows = [
        ("Invoice No.", &info.invoice_no, "Dated", &info.dated),
        (
            "Delivery Note",
            &info.delivery_note,
            "Mode/Terms of Payment",
            &info.payment_terms,
        ),
        (
            "Reference No. & Date",
            &info.reference,
            "Other References",
            &info.other_references,
        ),
        (
            "Buyer's Order No.",
            &info.buyer_order_no,
            "Dated",
            &info.buyer_order_date,
        ),
        (
            "Dispatched through",
            &info.dispatched_through,
            "Destination",
            &info.destination,
        ),
    ];
    let label_style = Style::new().with_font_size(8);
    let width = TABLE_WIDTH / 4.0;
    for (label_1, value_1, label_2, value_2) in &rows {
        doc.row(
            &Row::new(vec![
                Cell::new(width, *label_1).styled(label_style),
                Cell::new(width, value_1.as_str()),
                Cell::new(width, *label_2).styled(label_style),
                Cell::new(width, value_2.as_str()),
            ])
            .with_min_height(7),
        )?;
    }
    Ok(())
}

fn items_header_row() -> Row {
    let header = Style::new().bold();
    let labels = [
        "Sr. No.",
        "Description of Goods",
        "HSN/SAC",
        "Quantity",
        "Unit Rate",
        "Amount",
    ];
    Row::new(
        labels
            .iter()
            .zip(ITEM_COLUMNS.iter())
            .map(|(&label, &width)| {
                Cell::new(width, label)
                    .styled(header)
                    .aligned(Alignment::Center)
                    .filled(HEADER_FILL)
            })
            .collect(),
    )
    .with_min_height(7)
}

fn items_table(doc: &mut Document, items: &[InvoiceItem]) -> Result<(), Error> {
    doc.row(&items_header_row())?;

    for (idx, item) in items.iter().enumerate() {
        doc.row(&Row::new(vec![
            Cell::new(ITEM_COLUMNS[0], (idx + 1).to_string()).aligned(Alignment::Center),
            Cell::new(ITEM_COLUMNS[1], item.description.as_str()),
            Cell::new(ITEM_COLUMNS[2], item.hsn_sac.as_str()).aligned(Alignment::Center),
            Cell::new(ITEM_COLUMNS[3], format_quantity(item.quantity))
                .aligned(Alignment::Right),
            Cell::new(ITEM_COLUMNS[4], format_currency(item.unit_rate))
                .aligned(Alignment::Right),
            Cell::new(ITEM_COLUMNS[5], format_currency(item.amount()))
                .aligned(Alignment::Right),
        ]))?;
    }
    Ok(())
}

fn totals_rows(
    doc: &mut Document,
    data: &InvoiceData,
    totals: &InvoiceTotals,
) -> Result<(), Error> {
    let amount_width = ITEM_COLUMNS[ITEM_COLUMNS.len() - 1];
    let label_width = TABLE_WIDTH - amount_width;
    let rows = [
        ("Basic Amount".to_string(), totals.basic, false),
        (
            format!("SGST @ {}", format_percent(data.sgst_rate)),
            totals.sgst,
            false,
        ),
        (
            format!("CGST @ {}", format_percent(data.cgst_rate)),
            totals.cgst,
            false,
        ),
        ("Round Off".to_string(), totals.round_off, false),
        ("Total Amount".to_string(), totals.total, true),
    ];
    for (label, amount, bold) in &rows {
        let style = if *bold {
            Style::new().bold()
        } else {
            Style::new()
        };
        doc.row(&Row::new(vec![
            Cell::new(label_width, label.as_str())
                .styled(style)
                .aligned(Alignment::Right),
            Cell::new(amount_width, format_currency(*amount))
                .styled(style)
                .aligned(Alignment::Right),
        ]))?;
    }
    Ok(())
}

fn tax_header_rows() -> Vec<Row> {
    let header = Style::new().with_font_size(8).bold();
    let title = Row::new(vec![Cell::new(TABLE_WIDTH, "HSN/SAC Tax Details")
        .styled(Style::new().bold())
        .bordered(Borders::trbl(true, true, false, true))
        .filled(HEADER_FILL)]);

    // The central and state tax groups each span their rate and amount columns; the HSN/SAC and
    // taxable value cells span both header tiers, so their shared edge is not drawn.
    let upper = Row::new(vec![
        Cell::new(TAX_COLUMNS[0], "HSN/SAC")
            .styled(header)
            .aligned(Alignment::Center)
            .bordered(Borders::trbl(true, true, false, true))
            .filled(HEADER_FILL),
        Cell::new(TAX_COLUMNS[1], "Taxable Value")
            .styled(header)
            .aligned(Alignment::Center)
            .bordered(Borders::trbl(true, true, false, true))
            .filled(HEADER_FILL),
        Cell::new(TAX_COLUMNS[2] + TAX_COLUMNS[3], "Central Tax")
            .styled(header)
            .aligned(Alignment::Center)
            .filled(HEADER_FILL),
        Cell::new(TAX_COLUMNS[4] + TAX_COLUMNS[5], "State Tax")
            .styled(header)
            .aligned(Alignment::Center)
            .filled(HEADER_FILL),
    ]);

    let mut lower = vec![
        Cell::new(TAX_COLUMNS[0], "")
            .bordered(Borders::trbl(false, true, true, true))
            .filled(HEADER_FILL),
        Cell::new(TAX_COLUMNS[1], "")
            .bordered(Borders::trbl(false, true, true, true))
            .filled(HEADER_FILL),
    ];
    for (idx, &width) in TAX_COLUMNS[2..].iter().enumerate() {
        let label = if idx % 2 == 0 { "Rate" } else { "Amount" };
        lower.push(
            Cell::new(width, label)
                .styled(header)
                .aligned(Alignment::Center)
                .filled(HEADER_FILL),
        );
    }

    vec![title, upper, Row::new(lower)]
}

fn tax_summary(
    doc: &mut Document,
    data: &InvoiceData,
    totals: &InvoiceTotals,
) -> Result<(), Error> {
    let small = Style::new().with_font_size(8);
    let header = small.bold();
    for row in tax_header_rows() {
        doc.row(&row)?;
    }

    let mut by_hsn: BTreeMap<&str, f64> = BTreeMap::new();
    for item in &data.items {
        *by_hsn.entry(item.hsn_sac.as_str()).or_insert(0.0) += item.amount();
    }
    for (hsn, taxable) in &by_hsn {
        let cgst = round2(taxable * data.cgst_rate / 100.0);
        let sgst = round2(taxable * data.sgst_rate / 100.0);
        doc.row(&Row::new(vec![
            Cell::new(TAX_COLUMNS[0], *hsn).styled(small).aligned(Alignment::Center),
            Cell::new(TAX_COLUMNS[1], format_currency(*taxable))
                .styled(small)
                .aligned(Alignment::Right),
            Cell::new(TAX_COLUMNS[2], format_percent(data.cgst_rate))
                .styled(small)
                .aligned(Alignment::Center),
            Cell::new(TAX_COLUMNS[3], format_currency(cgst))
                .styled(small)
                .aligned(Alignment::Right),
            Cell::new(TAX_COLUMNS[4], format_percent(data.sgst_rate))
                .styled(small)
                .aligned(Alignment::Center),
            Cell::new(TAX_COLUMNS[5], format_currency(sgst))
                .styled(small)
                .aligned(Alignment::Right),
        ]))?;
    }
    doc.row(&Row::new(vec![
        Cell::new(TAX_COLUMNS[0], "Total").styled(header).aligned(Alignment::Center),
        Cell::new(TAX_COLUMNS[1], format_currency(totals.basic))
            .styled(header)
            .aligned(Alignment::Right),
        Cell::new(TAX_COLUMNS[2], ""),
        Cell::new(TAX_COLUMNS[3], format_currency(totals.cgst))
            .styled(header)
            .aligned(Alignment::Right),
        Cell::new(TAX_COLUMNS[4], ""),
        Cell::new(TAX_COLUMNS[5], format_currency(totals.sgst))
            .styled(header)
            .aligned(Alignment::Right),
    ]))
}

fn bank_details(doc: &mut Document, bank: &BankDetails) -> Result<(), Error> {
    doc.row(&Row::new(vec![Cell::new(
        TABLE_WIDTH,
        "Company's Bank Details",
    )
    .styled(Style::new().bold())
    .bordered(Borders::trbl(true, true, false, true))
    .filled(HEADER_FILL)]))?;

    let rows = [
        ("Account Holder's Name", &bank.account_holder),
        ("Bank Name", &bank.bank_name),
        ("A/c No.", &bank.account_number),
        ("Branch & IFS Code", &bank.branch_ifsc),
    ];
    for (idx, (label, value)) in rows.iter().enumerate() {
        let last = idx == rows.len() - 1;
        doc.row(&Row::new(vec![
            Cell::new(60, *label).bordered(Borders::trbl(false, false, last, true)),
            Cell::new(TABLE_WIDTH - 60.0, value.as_str())
                .bordered(Borders::trbl(false, true, last, false)),
        ]))?;
    }
    Ok(())
}

fn signature_block(doc: &mut Document, profile: &CompanyProfile) -> Result<(), Error> {
    let half = TABLE_WIDTH / 2.0;
    doc.row(
        &Row::new(vec![
            Cell::new(half, "Customer's Seal and Signature")
                .styled(Style::new().with_font_size(8)),
            Cell::new(
                half,
                format!("for {}\n\n\n\nAuthorised Signatory", profile.name),
            )
            .aligned(Alignment::Right),
        ])
        .with_min_height(28),
    )?;
    if let Some(stamp) = &profile.stamp {
        // Overlay the stamp on the signature cell that was just drawn.
        let x = doc.margins().left() + Mm(half + 10.0);
        let y = doc.cursor().y - Mm(26.0);
        doc.image(stamp, Position::new(x, y), Mm(30.0))?;
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<InvoiceItem> {
        vec![InvoiceItem {
            description: String::from("Annual maintenance contract"),
            hsn_sac: String::from("998713"),
            quantity: 1.0,
            unit_rate: 36500.0,
        }]
    }

    #[test]
    fn totals_for_the_standard_gst_split() {
        let totals = InvoiceTotals::compute(&items(), 9.0, 9.0);
        assert_eq!(totals.basic, 36500.0);
        assert_eq!(totals.sgst, 3285.0);
        assert_eq!(totals.cgst, 3285.0);
        assert_eq!(totals.total, 43070.0);
        assert_eq!(totals.round_off, 0.0);
    }

    #[test]
    fn round_off_compensates_fractional_totals() {
        let items = vec![InvoiceItem {
            description: String::from("Subscription"),
            hsn_sac: String::from("9983"),
            quantity: 3.0,
            unit_rate: 99.99,
        }];
        let totals = InvoiceTotals::compute(&items, 9.0, 9.0);
        let exact = totals.basic + totals.sgst + totals.cgst;
        assert_eq!(totals.total, exact.round());
        assert!((totals.total - exact - totals.round_off).abs() < 1e-9);
    }

    #[test]
    fn item_amount_is_rate_times_quantity() {
        let item = InvoiceItem {
            description: String::new(),
            hsn_sac: String::new(),
            quantity: 2.5,
            unit_rate: 100.0,
        };
        assert_eq!(item.amount(), 250.0);
    }

    #[test]
    fn tables_span_the_content_width() {
        assert_eq!(ITEM_COLUMNS.iter().sum::<f64>(), TABLE_WIDTH);
        assert_eq!(TAX_COLUMNS.iter().sum::<f64>(), TABLE_WIDTH);
    }

    #[test]
    fn the_goods_header_matches_the_printed_form() {
        let row = items_header_row();
        assert_eq!(row.width(), Mm(TABLE_WIDTH));
        let cells = row.cells();
        assert_eq!(cells[0].text(), "Sr. No.");
        assert_eq!(cells[4].text(), "Unit Rate");
        assert!(cells.iter().all(|cell| cell.fill() == Some(HEADER_FILL)));
    }

    #[test]
    fn the_tax_header_groups_central_and_state_columns() {
        let rows = tax_header_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells()[0].text(), "HSN/SAC Tax Details");
        assert_eq!(rows[0].cells()[0].fill(), Some(HEADER_FILL));

        let upper = rows[1].cells();
        assert_eq!(rows[1].width(), Mm(TABLE_WIDTH));
        assert_eq!(upper[2].text(), "Central Tax");
        assert_eq!(upper[2].width(), Mm(TAX_COLUMNS[2] + TAX_COLUMNS[3]));
        assert_eq!(upper[3].text(), "State Tax");
        assert_eq!(upper[3].width(), Mm(TAX_COLUMNS[4] + TAX_COLUMNS[5]));

        let lower = rows[2].cells();
        assert_eq!(rows[2].width(), Mm(TABLE_WIDTH));
        assert_eq!(lower.len(), 6);
        assert_eq!(lower[2].text(), "Rate");
        assert_eq!(lower[3].text(), "Amount");
        assert_eq!(lower[4].text(), "Rate");
        assert_eq!(lower[5].text(), "Amount");
    }

    #[test]
    fn default_rates_are_the_gst_split() {
        let data = InvoiceData::default();
        assert_eq!(data.sgst_rate, 9.0);
        assert_eq!(data.cgst_rate, 9.0);
    }
}
