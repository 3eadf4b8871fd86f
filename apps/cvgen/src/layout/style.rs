//! Colour theme and paragraph styles, keyed by semantic role.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{FontFace, MM};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parses `#RRGGBB` at compile time. Panics on malformed literals.
    pub const fn from_hex(hex: &str) -> Color {
        let b = hex.as_bytes();
        assert!(b.len() == 7 && b[0] == b'#', "colour must be #RRGGBB");
        Color {
            r: nibble(b[1]) * 16 + nibble(b[2]),
            g: nibble(b[3]) * 16 + nibble(b[4]),
            b: nibble(b[5]) * 16 + nibble(b[6]),
        }
    }

    /// Components in 0.0..=1.0, as the PDF colour operators take them.
    pub fn to_unit_rgb(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

/// The dark theme every page is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Teal accent: subtitle, section headings, profile divider.
    pub primary: Color,
    /// Page and table background.
    pub background: Color,
    /// Body text and rules.
    pub text: Color,
    /// Contact line.
    pub muted: Color,
}

pub const PALETTE: Palette = Palette {
    primary: Color::from_hex("#5EEAD4"),
    background: Color::from_hex("#1E293B"),
    text: Color::from_hex("#E2E8F0"),
    muted: Color::from_hex("#94A3B8"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Justify,
}

/// The roles a text block can be styled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleRole {
    Name,
    Subtitle,
    SectionHeading,
    Body,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub font: FontFace,
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub color: Color,
    pub space_before: f32,
    pub space_after: f32,
    pub alignment: Alignment,
}

/// Named paragraph styles plus the palette they were built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    pub palette: Palette,
    pub name: ParagraphStyle,
    pub subtitle: ParagraphStyle,
    pub section_heading: ParagraphStyle,
    pub body: ParagraphStyle,
    pub contact: ParagraphStyle,
}

impl StyleSheet {
    pub fn get(&self, role: StyleRole) -> &ParagraphStyle {
        match role {
            StyleRole::Name => &self.name,
            StyleRole::Subtitle => &self.subtitle,
            StyleRole::SectionHeading => &self.section_heading,
            StyleRole::Body => &self.body,
            StyleRole::Contact => &self.contact,
        }
    }
}

pub fn create_styles(palette: Palette) -> StyleSheet {
    StyleSheet {
        palette,
        name: ParagraphStyle {
            font: FontFace::HelveticaBold,
            font_size: 28.0,
            leading: 32.0,
            color: palette.text,
            space_before: 0.0,
            space_after: 4.0 * MM,
            alignment: Alignment::Left,
        },
        subtitle: ParagraphStyle {
            font: FontFace::Helvetica,
            font_size: 14.0,
            leading: 16.8,
            color: palette.primary,
            space_before: 0.0,
            space_after: 6.0 * MM,
            alignment: Alignment::Left,
        },
        section_heading: ParagraphStyle {
            font: FontFace::HelveticaBold,
            font_size: 12.0,
            leading: 18.0,
            color: palette.primary,
            space_before: 8.0 * MM,
            space_after: 4.0 * MM,
            alignment: Alignment::Left,
        },
        body: ParagraphStyle {
            font: FontFace::Helvetica,
            font_size: 10.0,
            leading: 14.0,
            color: palette.text,
            space_before: 0.0,
            space_after: 2.0 * MM,
            alignment: Alignment::Justify,
        },
        contact: ParagraphStyle {
            font: FontFace::Helvetica,
            font_size: 9.0,
            leading: 12.0,
            color: palette.muted,
            space_before: 0.0,
            space_after: 1.0 * MM,
            alignment: Alignment::Left,
        },
    }
}
