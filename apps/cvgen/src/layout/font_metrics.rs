//! Static font-metric tables for the two base-14 faces the résumé uses.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em, so a string's width in
//! points is `sum(widths) * font_size / 1000`. The tables cover ASCII 0x20..=0x7E
//! (index = `(char as usize) - 32`) plus the handful of WinAnsi extras the layout
//! emits itself (bullet, dashes, typographic quotes). Anything else falls back to
//! `average_char_width`.

use serde::{Deserialize, Serialize};

pub const MM: f32 = 72.0 / 25.4;
pub const CM: f32 = 10.0 * MM;

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

/// The base-14 faces used by the style sheet. Both are available in every PDF reader,
/// so nothing is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    /// PostScript name written as the font's `BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
        }
    }

    pub const ALL: [FontFace; 2] = [FontFace::Helvetica, FontFace::HelveticaBold];
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageConfig {
    /// Usable width between the left and right margins.
    pub fn body_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Usable height between the top and bottom margins.
    pub fn body_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// A4 portrait with 2 cm margins on every side.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width: 595.2756,
        height: 841.8898,
        margin_left: 2.0 * CM,
        margin_right: 2.0 * CM,
        margin_top: 2.0 * CM,
        margin_bottom: 2.0 * CM,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Bullet, dashes, quotes and ellipsis.
    extras: &'static [(char, u16)],
    pub average_char_width: u16,
    pub space_width: u16,
}

impl FontMetricTable {
    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extras
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.average_char_width)
    }

    /// Rendered width of `s` in points at `font_size`.
    pub fn measure_str(&self, s: &str, font_size: f32) -> f32 {
        let units: u32 = s.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Width of a single inter-word space in points at `font_size`.
    pub fn space(&self, font_size: f32) -> f32 {
        self.space_width as f32 * font_size / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_EXTRAS: [(char, u16); 9] = [
    ('•', 350),
    ('—', 1000),
    ('–', 556),
    ('‘', 222),
    ('’', 222),
    ('“', 333),
    ('”', 333),
    ('…', 1000),
    ('€', 556),
];

static HELVETICA_BOLD_EXTRAS: [(char, u16); 9] = [
    ('•', 350),
    ('—', 1000),
    ('–', 556),
    ('‘', 278),
    ('’', 278),
    ('“', 500),
    ('”', 500),
    ('…', 1000),
    ('€', 556),
];

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    extras: &HELVETICA_EXTRAS,
    average_char_width: 556,
    space_width: 278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    extras: &HELVETICA_BOLD_EXTRAS,
    average_char_width: 611,
    space_width: 278,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}
