// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Numeric formatting for business documents.
//!
//! Currency amounts are rendered with exactly two decimal places and thousands separators,
//! percentages with one decimal place, and final totals can be spelled out in words for the
//! "Amount Chargeable (in words)" line of an invoice.

/// Formats a currency amount with two decimal places and thousands separators.
///
/// # Example
///
/// ```
/// assert_eq!(invoicegen::numbers::format_currency(43070.0), "43,070.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Formats a quantity with two decimal places.
pub fn format_quantity(quantity: f64) -> String {
    format!("{:.2}", quantity)
}

/// Formats a percentage with one decimal place.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Spells out an amount in English words in title case.
///
/// Fractions are expressed in paise.  The sign is ignored.
///
/// # Example
///
/// ```
/// assert_eq!(
///     invoicegen::numbers::amount_in_words(43070.0),
///     "Forty Three Thousand And Seventy"
/// );
/// ```
pub fn amount_in_words(amount: f64) -> String {
    let total_paise = (amount.abs() * 100.0).round() as u64;
    let rupees = total_paise / 100;
    let paise = total_paise % 100;
    let mut words = cardinal(rupees);
    if paise > 0 {
        words.push_str(" And ");
        words.push_str(&cardinal(paise));
        words.push_str(" Paise");
    }
    words
}

/// Spells out a rupee amount as it appears on an invoice.
///
/// # Example
///
/// ```
/// assert_eq!(
///     invoicegen::numbers::rupees_in_words(43070.0),
///     "Rs. Forty Three Thousand And Seventy Only/-"
/// );
/// ```
pub fn rupees_in_words(amount: f64) -> String {
    format!("Rs. {} Only/-", amount_in_words(amount))
}

const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "Ten", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 7] = [
    "",
    " Thousand",
    " Million",
    " Billion",
    " Trillion",
    " Quadrillion",
    " Quintillion",
];

/// Spells out a cardinal number, for example `43070` as "Forty Three Thousand And Seventy".
fn cardinal(n: u64) -> String {
    if n == 0 {
        return String::from("Zero");
    }

    // Three-digit groups, lowest first.
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut words = String::new();
    for (scale, &value) in groups.iter().enumerate().rev() {
        if value == 0 {
            continue;
        }
        if !words.is_empty() {
            // "Forty Three Thousand And Seventy", but "Forty Three Thousand One Hundred".
            if scale == 0 && value < 100 {
                words.push_str(" And ");
            } else {
                words.push(' ');
            }
        }
        words.push_str(&group(value));
        words.push_str(SCALES[scale]);
    }
    words
}

fn group(n: u64) -> String {
    let mut words = String::new();
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        words.push_str(ONES[hundreds as usize]);
        words.push_str(" Hundred");
        if rest > 0 {
            words.push_str(" And ");
        }
    }
    if rest > 0 {
        words.push_str(&tens(rest));
    }
    words
}

fn tens(n: u64) -> String {
    if n < 20 {
        String::from(ONES[n as usize])
    } else {
        let mut words = String::from(TENS[(n / 10) as usize]);
        if n % 10 > 0 {
            words.push(' ');
            words.push_str(ONES[(n % 10) as usize]);
        }
        words
    }
}

/// Groups the digits of an integer into thousands, for example `43070` as "43,070".
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::new();
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_two_decimals_and_thousands_separators() {
        assert_eq!(format_currency(43070.0), "43,070.00");
        assert_eq!(format_currency(36500.0), "36,500.00");
        assert_eq!(format_currency(6570.0), "6,570.00");
        assert_eq!(format_currency(1234567.891), "1,234,567.89");
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(999.999), "1,000.00");
        assert_eq!(format_currency(-1500.5), "-1,500.50");
    }

    #[test]
    fn quantities_and_percentages() {
        assert_eq!(format_quantity(2.0), "2.00");
        assert_eq!(format_quantity(1.5), "1.50");
        assert_eq!(format_percent(18.0), "18.0%");
        assert_eq!(format_percent(9.0), "9.0%");
    }

    #[test]
    fn cardinal_numbers() {
        assert_eq!(cardinal(0), "Zero");
        assert_eq!(cardinal(7), "Seven");
        assert_eq!(cardinal(13), "Thirteen");
        assert_eq!(cardinal(42), "Forty Two");
        assert_eq!(cardinal(105), "One Hundred And Five");
        assert_eq!(cardinal(999), "Nine Hundred And Ninety Nine");
        assert_eq!(cardinal(1000), "One Thousand");
        assert_eq!(cardinal(43070), "Forty Three Thousand And Seventy");
        assert_eq!(cardinal(43170), "Forty Three Thousand One Hundred And Seventy");
        assert_eq!(
            cardinal(1234567),
            "One Million Two Hundred And Thirty Four Thousand Five Hundred And Sixty Seven"
        );
    }

    #[test]
    fn amounts_in_words() {
        assert_eq!(amount_in_words(43070.0), "Forty Three Thousand And Seventy");
        assert_eq!(
            amount_in_words(1250.75),
            "One Thousand Two Hundred And Fifty And Seventy Five Paise"
        );
        assert_eq!(
            rupees_in_words(43070.0),
            "Rs. Forty Three Thousand And Seventy Only/-"
        );
    }
}
