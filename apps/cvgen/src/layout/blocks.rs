//! The abstract block model handed from the builder to the rendering engine.

use serde::{Deserialize, Serialize};

use crate::layout::style::{Color, StyleRole};

/// One inline run inside a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Bold(String),
    Link { label: String, url: String },
    LineBreak,
}

/// Styled inline content. Text is carried verbatim; emphasis and breaks are
/// explicit runs, never parsed out of the text itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<Inline>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, s: impl Into<String>) -> Self {
        self.runs.push(Inline::Text(s.into()));
        self
    }

    pub fn bold(mut self, s: impl Into<String>) -> Self {
        self.runs.push(Inline::Bold(s.into()));
        self
    }

    pub fn link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.runs.push(Inline::Link {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    pub fn line_break(mut self) -> Self {
        self.runs.push(Inline::LineBreak);
        self
    }

    /// Concatenated text with breaks as `\n`.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            match run {
                Inline::Text(s) | Inline::Bold(s) => out.push_str(s),
                Inline::Link { label, .. } => out.push_str(label),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        RichText::new().text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub role: StyleRole,
    pub content: RichText,
}

/// Side-by-side columns sharing one row. Cells hold ordinary blocks but may not
/// contain another table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoColumnTable {
    pub left: Vec<LayoutBlock>,
    pub right: Vec<LayoutBlock>,
    pub col_width: f32,
    /// Left and right cell padding; top and bottom padding are zero.
    pub padding: f32,
    /// Vertical rule drawn after the left column.
    pub divider: Color,
    pub background: Color,
}

/// A filled bar, used as the horizontal rule under the header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutBlock {
    Text(TextBlock),
    Spacer(f32),
    Columns(TwoColumnTable),
    Separator(Separator),
}

impl LayoutBlock {
    pub fn paragraph(role: StyleRole, content: impl Into<RichText>) -> Self {
        LayoutBlock::Text(TextBlock {
            role,
            content: content.into(),
        })
    }

    /// The block's text if it is a text block in the given role.
    #[cfg(test)]
    pub fn text_in_role(&self, role: StyleRole) -> Option<String> {
        match self {
            LayoutBlock::Text(t) if t.role == role => Some(t.content.plain_text()),
            _ => None,
        }
    }
}
