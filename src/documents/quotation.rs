// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! The quotation composer.
//!
//! A quotation is laid out exactly like a [`purchase order`](../purchase_order/); only the
//! document title and the reference label differ.  It therefore shares the
//! [`OrderData`](struct.OrderData.html) input record.

pub use crate::documents::purchase_order::{grand_total, EndUser, OrderData, Product};

use crate::documents::purchase_order::render_as;
use crate::documents::CompanyProfile;
use crate::error::Error;
use crate::fonts::FontCache;

/// Renders a quotation and returns the PDF data.
///
/// All font families used by the document must already be loaded into the given font cache.
pub fn render(
    profile: &CompanyProfile,
    data: &OrderData,
    font_cache: FontCache,
) -> Result<Vec<u8>, Error> {
    render_as("PROPOSAL / QUOTATION", "Quotation No", profile, data, font_cache)
}
