// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Utilities for text wrapping.
//!
//! [`wrap`][] splits a string into lines that each fit into a maximum width, using greedy word
//! wrapping:  words are accumulated onto the current line as long as the line, a separating space
//! and the next word still fit.  Explicit newline characters always force a line break.  A single
//! word that is wider than the maximum width is placed alone on its own line and is not split.
//!
//! Wrapping is pure:  it draws nothing and can be repeated with identical results.  The table
//! renderer relies on this to measure row heights before drawing a single cell, see
//! [`Row`](../table/struct.Row.html).
//!
//! [`wrap`]: fn.wrap.html

use std::iter;
use std::str;

use crate::fonts::Metrics;
use crate::Mm;

/// Wraps the given text so that no produced line is wider than `max_width`.
///
/// The returned iterator is finite and yields at least one line:  empty input produces a single
/// empty line, and every empty paragraph (consecutive newlines) produces an empty line of its
/// own.  The only lines that may exceed `max_width` are single words that do not fit into the
/// width on their own; they are never split or hyphenated.
pub fn wrap<'m, 's, M: Metrics>(metrics: &'m M, text: &'s str, max_width: Mm) -> Lines<'m, 's, M> {
    Lines {
        metrics,
        max_width,
        paragraphs: text.split('\n'),
        words: None,
    }
}

/// Returns the number of lines that [`wrap`][] produces for the given input.
///
/// [`wrap`]: fn.wrap.html
pub fn line_count<M: Metrics>(metrics: &M, text: &str, max_width: Mm) -> usize {
    wrap(metrics, text, max_width).count()
}

/// An iterator over the wrapped lines of a string, see [`wrap`][].
///
/// [`wrap`]: fn.wrap.html
pub struct Lines<'m, 's, M: Metrics> {
    metrics: &'m M,
    max_width: Mm,
    paragraphs: str::Split<'s, char>,
    words: Option<iter::Peekable<str::SplitWhitespace<'s>>>,
}

impl<'m, 's, M: Metrics> Iterator for Lines<'m, 's, M> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.words.is_none() {
            let paragraph = self.paragraphs.next()?;
            self.words = Some(paragraph.split_whitespace().peekable());
        }
        let words = self.words.as_mut().expect("words iterator must be set");

        let mut line = match words.next() {
            Some(word) => String::from(word),
            // An empty paragraph still produces an empty line so that blank lines in multi-line
            // text blocks keep their vertical space.
            None => {
                self.words = None;
                return Some(String::new());
            }
        };

        while let Some(word) = words.peek() {
            let mut candidate = line.clone();
            candidate.push(' ');
            candidate.push_str(word);
            if self.metrics.str_width(&candidate) > self.max_width {
                break;
            }
            line = candidate;
            words.next();
        }

        if words.peek().is_none() {
            self.words = None;
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::testing::FixedMetrics;
    use crate::Mm;

    fn wrap_all(text: &str, max_width: impl Into<Mm>) -> Vec<String> {
        wrap(&FixedMetrics::new(), text, max_width.into()).collect()
    }

    #[test]
    fn fits_on_a_single_line() {
        assert_eq!(wrap_all("Hello world", 1000), vec!["Hello world"]);
    }

    #[test]
    fn breaks_at_the_measured_width() {
        let metrics = FixedMetrics::new();
        let max_width = metrics.str_width("AAAA BBBB");
        assert_eq!(
            wrap_all("AAAA BBBB CCCC", max_width),
            vec!["AAAA BBBB", "CCCC"]
        );
    }

    #[test]
    fn long_word_is_placed_alone() {
        // 20 chars at 2mm each do not fit into 10mm, but the word must not be split.
        assert_eq!(
            wrap_all("aaaaaaaaaaaaaaaaaaaa bb", 10),
            vec!["aaaaaaaaaaaaaaaaaaaa", "bb"]
        );
    }

    #[test]
    fn explicit_newlines_force_breaks() {
        assert_eq!(wrap_all("one\ntwo three", 1000), vec!["one", "two three"]);
    }

    #[test]
    fn empty_input_produces_one_empty_line() {
        assert_eq!(wrap_all("", 100), vec![""]);
    }

    #[test]
    fn empty_paragraphs_are_preserved() {
        assert_eq!(wrap_all("a\n\nb", 1000), vec!["a", "", "b"]);
    }

    #[test]
    fn wrapping_is_restartable() {
        let metrics = FixedMetrics::new();
        let text = "The quick brown fox jumps over the lazy dog";
        let first: Vec<_> = wrap(&metrics, text, Mm::from(20)).collect();
        let second: Vec<_> = wrap(&metrics, text, Mm::from(20)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn no_line_exceeds_the_width() {
        let metrics = FixedMetrics::new();
        let max_width = Mm::from(24);
        for line in wrap(&metrics, "several words of similar length spread over lines", max_width)
        {
            assert!(metrics.str_width(&line) <= max_width, "line too wide: {}", line);
        }
    }

    #[test]
    fn line_count_matches_wrap() {
        let metrics = FixedMetrics::new();
        let text = "counting lines must agree with the wrapping pass";
        assert_eq!(
            line_count(&metrics, text, Mm::from(30)),
            wrap(&metrics, text, Mm::from(30)).count()
        );
    }
}
