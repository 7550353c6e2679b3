// SPDX-FileCopyrightText: 2025 the invoicegen developers
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Fonts, font families, a font cache and text metrics.
//!
//! The [`FontCache`][] caches all loaded fonts.  Fonts are loaded from TTF files or from raw font
//! data and stored in the [`FontCache`][].  A [`Font`][] is a reference to a cached font in the
//! [`FontCache`][].  A [`FontFamily`][] is a collection of a regular, a bold, an italic and a bold
//! italic font.
//!
//! Font registration is a setup-time concern:  all font families used by a document build must be
//! registered with the cache before the [`Document`][] is created.  The first registered family
//! becomes the default family.  If a style references no family and no default is registered,
//! measurement and rendering fail with [`ErrorKind::FontNotRegistered`][].
//!
//! **Note:**  The [`Font`][] and [`FontFamily`][] structs are only valid for the [`FontCache`][]
//! they have been created with.
//!
//! # Internals
//!
//! There are two types of font data:  A [`rusttype::Font`][] is used to calculate the size of
//! formatted text.  Once the PDF document is rendered, a [`printpdf::IndirectFontRef`][] is used
//! to draw text in the PDF document.  A font family may be backed by one of the 14 built-in PDF
//! fonts; in that case the TTF data is only used for measurement and the built-in font is
//! referenced instead of embedding the TTF file.
//!
//! Text measurement is exposed through the [`Metrics`][] trait so that the layout engine (line
//! wrapping, row-height resolution) does not depend on loaded font files.  [`StyleMetrics`][] is
//! the implementation backed by a cache entry; it is pure and deterministic: the same (font,
//! string) pair always measures to the same width.
//!
//! [`Document`]: ../struct.Document.html
//! [`ErrorKind::FontNotRegistered`]: ../error/enum.ErrorKind.html
//! [`FontCache`]: struct.FontCache.html
//! [`Font`]: struct.Font.html
//! [`FontFamily`]: struct.FontFamily.html
//! [`Metrics`]: trait.Metrics.html
//! [`StyleMetrics`]: struct.StyleMetrics.html
//! [`rusttype::Font`]: https://docs.rs/rusttype/0.8.3/rusttype/struct.Font.html
//! [`printpdf::IndirectFontRef`]: https://docs.rs/printpdf/0.3.3/printpdf/types/plugins/graphics/two_dimensional/font/struct.IndirectFontRef.html

use std::fs;
use std::path;

use crate::error::{Error, ErrorKind};
use crate::render;
use crate::style::Style;
use crate::Mm;

/// Stores font data that can be referenced by a [`Font`][] or [`FontFamily`][].
///
/// [`Font`]: struct.Font.html
/// [`FontFamily`]: struct.FontFamily.html
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: Vec<FontData>,
    pdf_fonts: Vec<printpdf::IndirectFontRef>,
    default_font_family: Option<FontFamily<Font>>,
}

impl FontCache {
    /// Creates a new, empty font cache.
    pub fn new() -> FontCache {
        FontCache::default()
    }

    /// Loads the font at the given path.
    pub fn load_font(&mut self, path: impl AsRef<path::Path>) -> Result<Font, Error> {
        let path = path.as_ref();
        let buf = fs::read(path).map_err(|err| {
            Error::new(format!("Failed to read font file {}", path.display()), err)
        })?;
        let font_data = FontData::new(buf, None).map_err(|err| {
            Error::new(
                format!("Failed to load rusttype font from file {}", path.display()),
                err,
            )
        })?;
        self.add_font(font_data)
    }

    /// Adds the given font data to the cache and returns a reference to it.
    pub fn add_font(&mut self, font_data: FontData) -> Result<Font, Error> {
        let font = Font::new(self.fonts.len(), &font_data)?;
        self.fonts.push(font_data);
        Ok(font)
    }

    /// Loads the font family at the given path with the given name.
    ///
    /// This method assumes that at the given path, these files exist and are valid font files:
    /// - `{name}-Regular.ttf`
    /// - `{name}-Bold.ttf`
    /// - `{name}-Italic.ttf`
    /// - `{name}-BoldItalic.ttf`
    ///
    /// The first loaded family becomes the default family of this cache.
    pub fn load_font_family(
        &mut self,
        dir: impl AsRef<path::Path>,
        name: &str,
    ) -> Result<FontFamily<Font>, Error> {
        let dir = dir.as_ref();
        let family = FontFamily {
            regular: self.load_font(&dir.join(format!("{}-Regular.ttf", name)))?,
            bold: self.load_font(&dir.join(format!("{}-Bold.ttf", name)))?,
            italic: self.load_font(&dir.join(format!("{}-Italic.ttf", name)))?,
            bold_italic: self.load_font(&dir.join(format!("{}-BoldItalic.ttf", name)))?,
        };
        if self.default_font_family.is_none() {
            self.default_font_family = Some(family);
        }
        Ok(family)
    }

    /// Adds the given font family data to the cache and returns a reference to it.
    ///
    /// The first registered family becomes the default family of this cache.
    pub fn register_font_family(
        &mut self,
        family: FontFamily<FontData>,
    ) -> Result<FontFamily<Font>, Error> {
        let family = FontFamily {
            regular: self.add_font(family.regular)?,
            bold: self.add_font(family.bold)?,
            italic: self.add_font(family.italic)?,
            bold_italic: self.add_font(family.bold_italic)?,
        };
        if self.default_font_family.is_none() {
            self.default_font_family = Some(family);
        }
        Ok(family)
    }

    /// Embeds all loaded fonts into the document generated by the given renderer and caches a
    /// reference to them.
    pub fn load_pdf_fonts(&mut self, renderer: &render::Renderer) -> Result<(), Error> {
        self.pdf_fonts.clear();
        for font in &self.fonts {
            let pdf_font = if let Some(builtin) = font.builtin {
                renderer.add_builtin_font(builtin)?
            } else {
                renderer.add_embedded_font(&font.raw_data)?
            };
            self.pdf_fonts.push(pdf_font);
        }
        Ok(())
    }

    /// Returns the default font family for this font cache, if one has been registered.
    pub fn default_font_family(&self) -> Option<FontFamily<Font>> {
        self.default_font_family
    }

    /// Returns the font for the given style.
    ///
    /// If neither the style nor this cache defines a font family, this method fails with
    /// [`ErrorKind::FontNotRegistered`][].
    ///
    /// [`ErrorKind::FontNotRegistered`]: ../error/enum.ErrorKind.html
    pub fn font(&self, style: Style) -> Result<Font, Error> {
        let family = style
            .font_family()
            .or_else(|| self.default_font_family())
            .ok_or_else(|| {
                Error::new(
                    "The style does not set a font family and no default font family has \
                     been registered",
                    ErrorKind::FontNotRegistered,
                )
            })?;
        Ok(family.get(style))
    }

    /// Returns the text metrics for the given style.
    ///
    /// Fails with [`ErrorKind::FontNotRegistered`][] if no font family is available for the
    /// style, see [`font`](#method.font).
    ///
    /// [`ErrorKind::FontNotRegistered`]: ../error/enum.ErrorKind.html
    pub fn metrics(&self, style: Style) -> Result<StyleMetrics<'_>, Error> {
        let font = self.font(style)?;
        Ok(StyleMetrics {
            cache: self,
            font,
            font_size: style.font_size(),
            line_spacing: style.line_spacing(),
        })
    }

    /// Returns a reference to the embedded PDF font for the given font, if available.
    ///
    /// This method may only be called with [`Font`][] instances that have been created by this
    /// font cache.  PDF fonts are only available if [`load_pdf_fonts`][] has been called.
    ///
    /// [`Font`]: struct.Font.html
    /// [`load_pdf_fonts`]: #method.load_pdf_fonts
    pub fn get_pdf_font(&self, font: Font) -> Option<&printpdf::IndirectFontRef> {
        self.pdf_fonts.get(font.idx)
    }

    /// Returns a reference to the Rusttype font for the given font.
    ///
    /// This method may only be called with [`Font`][] instances that have been created by this
    /// font cache.
    ///
    /// [`Font`]: struct.Font.html
    pub fn get_rt_font(&self, font: Font) -> &rusttype::Font<'static> {
        &self.fonts[font.idx].rt_font
    }
}

/// The data for a font that is cached by a [`FontCache`][].
///
/// [`FontCache`]: struct.FontCache.html
#[derive(Clone, Debug)]
pub struct FontData {
    rt_font: rusttype::Font<'static>,
    raw_data: Vec<u8>,
    builtin: Option<printpdf::BuiltinFont>,
}

impl FontData {
    /// Loads a font from the given data.
    ///
    /// The provided data must be readable by [`rusttype`][].  If `builtin` is set, the built-in
    /// PDF font is referenced in the generated document instead of embedding the data; the data
    /// is still required for text measurement and should be metrically compatible with the
    /// built-in font.
    ///
    /// [`rusttype`]: https://docs.rs/rusttype
    pub fn new(
        data: Vec<u8>,
        builtin: Option<printpdf::BuiltinFont>,
    ) -> Result<FontData, rusttype::Error> {
        let rt_font = rusttype::Font::from_bytes(data.clone())?;
        Ok(FontData {
            rt_font,
            raw_data: data,
            builtin,
        })
    }
}

/// A collection of fonts with different styles.
///
/// See the [module documentation](index.html) for details on the internals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFamily<T> {
    /// The regular variant of this font family.
    pub regular: T,
    /// The bold variant of this font family.
    pub bold: T,
    /// The italic variant of this font family.
    pub italic: T,
    /// The bold italic variant of this font family.
    pub bold_italic: T,
}

impl<T: Copy> FontFamily<T> {
    /// Returns the font for the given style.
    pub fn get(&self, style: Style) -> T {
        if style.is_bold() && style.is_italic() {
            self.bold_italic
        } else if style.is_bold() {
            self.bold
        } else if style.is_italic() {
            self.italic
        } else {
            self.regular
        }
    }
}

/// A reference to a font cached by a [`FontCache`][].
///
/// See the [module documentation](index.html) for details on the internals.
///
/// [`FontCache`]: struct.FontCache.html
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    idx: usize,
    scale: f32,
    line_height: Mm,
    glyph_height: Mm,
    builtin: bool,
}

impl Font {
    fn new(idx: usize, font_data: &FontData) -> Result<Font, Error> {
        let rt_font = &font_data.rt_font;
        let scale = rt_font.units_per_em();
        if scale == 0 {
            return Err(Error::new(
                "The font is not scalable",
                ErrorKind::InvalidFont,
            ));
        }
        let scale = f32::from(scale);
        let v_metrics = rt_font.v_metrics_unscaled() * (1.0 / scale);
        let glyph_height = v_metrics.ascent - v_metrics.descent;
        let line_height = glyph_height + v_metrics.line_gap;
        Ok(Font {
            idx,
            scale,
            line_height: printpdf::Pt(f64::from(line_height)).into(),
            glyph_height: printpdf::Pt(f64::from(glyph_height)).into(),
            builtin: font_data.builtin.is_some(),
        })
    }

    /// Returns whether this font references a built-in PDF font.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Returns the line height for text with this font and the given font size.
    pub fn get_line_height(&self, font_size: u8) -> Mm {
        self.line_height * f64::from(font_size)
    }

    /// Returns the glyph height for text with this font and the given font size.
    pub fn glyph_height(&self, font_size: u8) -> Mm {
        self.glyph_height * f64::from(font_size)
    }

    /// Returns the kerning data for the given sequence of characters.
    ///
    /// The given [`FontCache`][] must be the font cache that loaded this font.
    ///
    /// [`FontCache`]: struct.FontCache.html
    pub fn kerning<I>(&self, font_cache: &FontCache, iter: I) -> Vec<f64>
    where
        I: IntoIterator<Item = char>,
    {
        let font = font_cache.get_rt_font(*self);
        let mut kerning_data = Vec::new();
        let mut previous = None;
        for c in iter {
            let glyph = font.glyph(c).id();
            let kerning = previous
                .map(|previous| font.pair_kerning(rusttype::Scale::uniform(1.0), previous, glyph))
                .unwrap_or_default();
            kerning_data.push(f64::from(kerning));
            previous = Some(glyph);
        }
        kerning_data
    }

    /// Returns the glyph IDs for the given sequence of characters.
    ///
    /// The given [`FontCache`][] must be the font cache that loaded this font.
    ///
    /// [`FontCache`]: struct.FontCache.html
    pub fn glyph_ids<I>(&self, font_cache: &FontCache, iter: I) -> Vec<u16>
    where
        I: IntoIterator<Item = char>,
    {
        let font = font_cache.get_rt_font(*self);
        iter.into_iter()
            .map(|c| font.glyph(c).id().0 as u16)
            .collect()
    }

    /// Returns the width of a character with this font and the given font size.
    ///
    /// The given [`FontCache`][] must be the font cache that loaded this font.
    ///
    /// [`FontCache`]: struct.FontCache.html
    pub fn char_width(&self, font_cache: &FontCache, c: char, font_size: u8) -> Mm {
        let glyph = font_cache
            .get_rt_font(*self)
            .glyph(c)
            .standalone()
            .get_data()
            .expect("No data for standalone glyph");
        let width = glyph.unit_h_metrics.advance_width / self.scale * f32::from(font_size);
        Mm::from(printpdf::Pt(f64::from(width)))
    }

    /// Returns the width of a string with this font and the given font size.
    ///
    /// The given [`FontCache`][] must be the font cache that loaded this font.
    ///
    /// [`FontCache`]: struct.FontCache.html
    pub fn str_width(&self, font_cache: &FontCache, s: &str, font_size: u8) -> Mm {
        s.chars()
            .map(|c| self.char_width(font_cache, c, font_size))
            .sum()
    }
}

/// Text measurement for a combination of a font, a font size and a line spacing factor.
///
/// The layout engine only measures text through this trait, so layout logic can be exercised
/// without loading font files.  Implementations must be pure:  the same input always measures to
/// the same width, and measuring has no side effects.
pub trait Metrics {
    /// Returns the width of the given string.
    fn str_width(&self, s: &str) -> Mm;

    /// Returns the height of one line of text, including line spacing.
    fn line_height(&self) -> Mm;
}

/// [`Metrics`][] backed by a [`FontCache`][] entry, resolved from a style with
/// [`FontCache::metrics`][].
///
/// [`Metrics`]: trait.Metrics.html
/// [`FontCache`]: struct.FontCache.html
/// [`FontCache::metrics`]: struct.FontCache.html#method.metrics
pub struct StyleMetrics<'c> {
    cache: &'c FontCache,
    font: Font,
    font_size: u8,
    line_spacing: f64,
}

impl<'c> StyleMetrics<'c> {
    /// Returns the font backing these metrics.
    pub fn font(&self) -> Font {
        self.font
    }
}

impl<'c> Metrics for StyleMetrics<'c> {
    fn str_width(&self, s: &str) -> Mm {
        self.font.str_width(self.cache, s, self.font_size)
    }

    fn line_height(&self) -> Mm {
        self.font.get_line_height(self.font_size) * self.line_spacing
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Metrics;
    use crate::Mm;

    /// Fixed-advance metrics: every character is `char_width` wide.
    pub struct FixedMetrics {
        pub char_width: Mm,
        pub line_height: Mm,
    }

    impl FixedMetrics {
        pub fn new() -> FixedMetrics {
            FixedMetrics {
                char_width: Mm::from(2),
                line_height: Mm::from(5),
            }
        }
    }

    impl Metrics for FixedMetrics {
        fn str_width(&self, s: &str) -> Mm {
            self.char_width * s.chars().count() as f64
        }

        fn line_height(&self) -> Mm {
            self.line_height
        }
    }
}
