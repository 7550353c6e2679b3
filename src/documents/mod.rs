// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Ready-made composers for complete business documents.
//!
//! The composers in this module sequence the layout primitives of the crate into full paginated
//! documents:  a [`tax invoice`](invoice/), a [`purchase order`](purchase_order/) and a
//! [`quotation`](quotation/).  They take a [`CompanyProfile`][] describing the issuing company
//! and a document-specific data record, and return the rendered PDF data.
//!
//! All input is expected to be validated by the caller; the composers only lay it out.
//!
//! [`CompanyProfile`]: struct.CompanyProfile.html

pub mod invoice;
pub mod purchase_order;
pub mod quotation;

/// The issuing company, shared by all document types.
///
/// The profile is passed explicitly to every render call; the crate holds no global company
/// state.  The logo and stamp images are optional, and images that cannot be decoded are
/// skipped with a warning instead of failing the document build.
#[derive(Clone, Debug, Default)]
pub struct CompanyProfile {
    /// The company name, shown in the page header and the signature block.
    pub name: String,
    /// The tagline shown below the company name in the page header.
    pub tagline: String,
    /// The postal address, shown in the page footer.
    pub address: String,
    /// Contact email addresses, shown as links in the page footer.
    pub emails: Vec<String>,
    /// The contact phone number, shown as a link in the page footer.
    pub phone: String,
    /// The company website.
    pub website: String,
    /// The logo image data (any format supported by the `image` crate).
    pub logo: Option<Vec<u8>>,
    /// The stamp image data, drawn next to the signature block.
    pub stamp: Option<Vec<u8>>,
}
