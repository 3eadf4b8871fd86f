//! Flow engine: turns layout blocks into positioned draw operations on pages.
//!
//! # Stages
//! 1. `layout_story` wraps every text block into lines (greedy, measured with the
//!    static AFM tables) and flattens the story into rows. Two-column tables keep
//!    their two row lists side by side.
//! 2. `paginate` walks the rows top to bottom inside the body frame. Paragraphs
//!    split between lines; a table that does not fit moves to a fresh page when it
//!    would fit there, otherwise it is sliced across pages with both columns
//!    continuing.
//!
//! Gaps (space before/after and spacers) are dropped at the top of a page and at the
//! top of a table cell. A paragraph's space-before is reduced by the space-after of
//! the paragraph directly above it.

use serde::Serialize;

use crate::errors::RenderError;
use crate::layout::blocks::{Inline, LayoutBlock, RichText, TextBlock, TwoColumnTable};
use crate::layout::font_metrics::{get_metrics, FontFace, PageConfig};
use crate::layout::style::{Alignment, Color, ParagraphStyle, StyleSheet};

/// Helvetica ascender as a fraction of the font size.
pub const ASCENT: f32 = 0.718;
/// Helvetica descender depth as a fraction of the font size.
pub const DESCENT: f32 = 0.207;
const EPSILON: f32 = 1e-3;

// ────────────────────────────────────────────────────────────────────────────
// Line boxes and rows
// ────────────────────────────────────────────────────────────────────────────

/// A run of characters in one face, measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub face: FontFace,
    pub width: f32,
    pub link: Option<String>,
}

/// One or more fragments with no whitespace between them; never broken.
#[derive(Debug, Clone)]
struct Word {
    fragments: Vec<Fragment>,
    width: f32,
}

#[derive(Debug)]
enum Token {
    Word(Word),
    Break,
}

/// A wrapped line. Fragment offsets are relative to the line's left edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    pub height: f32,
    /// Distance from the top of the line box down to the baseline.
    pub baseline: f32,
    pub font_size: f32,
    pub color: Color,
    pub fragments: Vec<(f32, Fragment)>,
}

impl LineBox {
    /// Right edge of the last fragment.
    #[cfg(test)]
    pub fn extent(&self) -> f32 {
        self.fragments
            .last()
            .map(|(x, f)| x + f.width)
            .unwrap_or(0.0)
    }
}

/// The unit of vertical flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Row {
    Gap(f32),
    Line(LineBox),
    Rule { width: f32, height: f32, color: Color },
}

impl Row {
    pub fn height(&self) -> f32 {
        match self {
            Row::Gap(h) => *h,
            Row::Line(line) => line.height,
            Row::Rule { height, .. } => *height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub left: Vec<Row>,
    pub right: Vec<Row>,
    pub col_width: f32,
    pub padding: f32,
    pub divider: Color,
    pub background: Color,
}

impl TableLayout {
    pub fn natural_height(&self) -> f32 {
        column_height(&self.left).max(column_height(&self.right))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FlowItem {
    Row(Row),
    Table(TableLayout),
}

// ────────────────────────────────────────────────────────────────────────────
// Text wrapping
// ────────────────────────────────────────────────────────────────────────────

fn tokenize(content: &RichText, style: &ParagraphStyle) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<Word> = None;

    for run in &content.runs {
        let (text, face, link) = match run {
            Inline::Text(s) => (s.as_str(), style.font, None),
            Inline::Bold(s) => (s.as_str(), FontFace::HelveticaBold, None),
            Inline::Link { label, url } => (label.as_str(), style.font, Some(url.as_str())),
            Inline::LineBreak => {
                flush_word(&mut current, &mut tokens);
                tokens.push(Token::Break);
                continue;
            }
        };

        let mut piece = String::new();
        for c in text.chars() {
            if c.is_whitespace() {
                push_piece(&mut current, &mut piece, face, style.font_size, link);
                flush_word(&mut current, &mut tokens);
            } else {
                piece.push(c);
            }
        }
        // No trailing whitespace: the word stays open so the next run can glue onto it.
        push_piece(&mut current, &mut piece, face, style.font_size, link);
    }
    flush_word(&mut current, &mut tokens);
    tokens
}

fn push_piece(
    current: &mut Option<Word>,
    piece: &mut String,
    face: FontFace,
    font_size: f32,
    link: Option<&str>,
) {
    if piece.is_empty() {
        return;
    }
    let width = get_metrics(face).measure_str(piece, font_size);
    let word = current.get_or_insert_with(|| Word {
        fragments: Vec::new(),
        width: 0.0,
    });
    word.width += width;
    word.fragments.push(Fragment {
        text: std::mem::take(piece),
        face,
        width,
        link: link.map(str::to_string),
    });
}

fn flush_word(current: &mut Option<Word>, tokens: &mut Vec<Token>) {
    if let Some(word) = current.take() {
        tokens.push(Token::Word(word));
    }
}

/// Greedy word wrap of one text block at `max_width`.
///
/// Justified styles stretch the gaps of every line except the last line before a
/// forced break or the end of the paragraph. A word wider than `max_width` gets a
/// line of its own and overflows.
pub fn wrap_text(content: &RichText, style: &ParagraphStyle, max_width: f32) -> Vec<LineBox> {
    let space = get_metrics(style.font).space(style.font_size);
    let mut lines = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut width = 0.0_f32;

    for token in tokenize(content, style) {
        match token {
            Token::Break => {
                lines.push(place_line(std::mem::take(&mut line), style, max_width, space, false));
                width = 0.0;
            }
            Token::Word(word) => {
                let gap = if line.is_empty() { 0.0 } else { space };
                if !line.is_empty() && width + gap + word.width > max_width + EPSILON {
                    lines.push(place_line(std::mem::take(&mut line), style, max_width, space, true));
                    width = word.width;
                } else {
                    width += gap + word.width;
                }
                line.push(word);
            }
        }
    }
    if !line.is_empty() {
        lines.push(place_line(line, style, max_width, space, false));
    }
    lines
}

fn place_line(
    words: Vec<Word>,
    style: &ParagraphStyle,
    max_width: f32,
    space: f32,
    wrapped: bool,
) -> LineBox {
    let natural: f32 =
        words.iter().map(|w| w.width).sum::<f32>() + space * words.len().saturating_sub(1) as f32;
    let stretch = if wrapped
        && style.alignment == Alignment::Justify
        && words.len() > 1
        && natural < max_width
    {
        (max_width - natural) / (words.len() - 1) as f32
    } else {
        0.0
    };

    let mut fragments = Vec::new();
    let mut x = 0.0_f32;
    for (i, word) in words.into_iter().enumerate() {
        if i > 0 {
            x += space + stretch;
        }
        for fragment in word.fragments {
            let w = fragment.width;
            fragments.push((x, fragment));
            x += w;
        }
    }

    LineBox {
        height: style.leading,
        baseline: (style.leading - style.font_size) / 2.0 + style.font_size * ASCENT,
        font_size: style.font_size,
        color: style.color,
        fragments,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Story → rows
// ────────────────────────────────────────────────────────────────────────────

/// Flattens the story into flow items at the given body width.
pub fn layout_story(
    blocks: &[LayoutBlock],
    styles: &StyleSheet,
    body_width: f32,
) -> Result<Vec<FlowItem>, RenderError> {
    let mut items = Vec::new();
    let mut prev_after = 0.0_f32;

    for block in blocks {
        match block {
            LayoutBlock::Columns(table) => {
                items.push(FlowItem::Table(layout_table(table, styles)?));
                prev_after = 0.0;
            }
            other => {
                let rows = block_rows(other, styles, body_width, &mut prev_after)?;
                items.extend(rows.into_iter().map(FlowItem::Row));
            }
        }
    }
    Ok(items)
}

fn block_rows(
    block: &LayoutBlock,
    styles: &StyleSheet,
    width: f32,
    prev_after: &mut f32,
) -> Result<Vec<Row>, RenderError> {
    match block {
        LayoutBlock::Text(text) => {
            let style = styles.get(text.role);
            let rows = text_rows(text, style, width, *prev_after);
            *prev_after = style.space_after;
            Ok(rows)
        }
        LayoutBlock::Spacer(height) => {
            *prev_after = 0.0;
            Ok(vec![Row::Gap(*height)])
        }
        LayoutBlock::Separator(sep) => {
            *prev_after = 0.0;
            Ok(vec![Row::Rule {
                width: sep.width,
                height: sep.height,
                color: sep.color,
            }])
        }
        LayoutBlock::Columns(_) => Err(RenderError::NestedTable),
    }
}

fn text_rows(block: &TextBlock, style: &ParagraphStyle, width: f32, prev_after: f32) -> Vec<Row> {
    let mut rows = Vec::new();
    let before = (style.space_before - prev_after).max(0.0);
    if before > 0.0 {
        rows.push(Row::Gap(before));
    }
    rows.extend(
        wrap_text(&block.content, style, width)
            .into_iter()
            .map(Row::Line),
    );
    if style.space_after > 0.0 {
        rows.push(Row::Gap(style.space_after));
    }
    rows
}

fn layout_table(table: &TwoColumnTable, styles: &StyleSheet) -> Result<TableLayout, RenderError> {
    let inner = table.col_width - 2.0 * table.padding;
    if inner <= 0.0 {
        return Err(RenderError::ColumnTooNarrow(table.col_width));
    }

    let column = |blocks: &[LayoutBlock]| -> Result<Vec<Row>, RenderError> {
        let mut rows = Vec::new();
        let mut prev_after = 0.0_f32;
        for block in blocks {
            rows.extend(block_rows(block, styles, inner, &mut prev_after)?);
        }
        Ok(skip_gaps(&rows).to_vec())
    };

    Ok(TableLayout {
        left: column(&table.left)?,
        right: column(&table.right)?,
        col_width: table.col_width,
        padding: table.padding,
        divider: table.divider,
        background: table.background,
    })
}

fn column_height(rows: &[Row]) -> f32 {
    rows.iter().map(Row::height).sum()
}

fn skip_gaps(rows: &[Row]) -> &[Row] {
    let start = rows
        .iter()
        .position(|r| !matches!(r, Row::Gap(_)))
        .unwrap_or(rows.len());
    &rows[start..]
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// A positioned drawing operation in PDF user space (origin bottom-left, points).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline.
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
    },
    Link {
        /// `[x1, y1, x2, y2]`
        rect: [f32; 4],
        url: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Places flow items onto as many pages as they need. Always returns at least one page.
pub fn paginate(items: &[FlowItem], page: &PageConfig) -> Vec<Page> {
    let mut paginator = Paginator {
        page: *page,
        pages: Vec::new(),
        current: Page::default(),
        cursor: 0.0,
        at_top: true,
    };
    for item in items {
        match item {
            FlowItem::Row(row) => paginator.place_row(row),
            FlowItem::Table(table) => paginator.place_table(table),
        }
    }
    paginator.finish()
}

struct Paginator {
    page: PageConfig,
    pages: Vec<Page>,
    current: Page,
    /// Distance already used from the top of the body frame.
    cursor: f32,
    at_top: bool,
}

impl Paginator {
    fn remaining(&self) -> f32 {
        self.page.body_height() - self.cursor
    }

    /// PDF y coordinate of the cursor.
    fn top_y(&self) -> f32 {
        self.page.height - self.page.margin_top - self.cursor
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
        self.at_top = true;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.at_top || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }

    fn place_row(&mut self, row: &Row) {
        if let Row::Gap(height) = row {
            if self.at_top {
                return;
            }
            if *height > self.remaining() + EPSILON {
                self.break_page();
            } else {
                self.cursor += height;
            }
            return;
        }

        let height = row.height();
        if !self.at_top && height > self.remaining() + EPSILON {
            self.break_page();
        }
        let top = self.top_y();
        draw_row(&mut self.current.ops, row, self.page.margin_left, top);
        self.cursor += height;
        self.at_top = false;
    }

    fn place_table(&mut self, table: &TableLayout) {
        let natural = table.natural_height();
        if !self.at_top
            && natural > self.remaining() + EPSILON
            && natural <= self.page.body_height() + EPSILON
        {
            self.break_page();
        }

        let mut left = &table.left[..];
        let mut right = &table.right[..];
        loop {
            let avail = self.remaining();
            let (left_n, left_h) = take_rows(left, avail, self.at_top);
            let (right_n, right_h) = take_rows(right, avail, self.at_top);

            if left_n == 0 && right_n == 0 {
                if self.at_top {
                    break;
                }
                self.break_page();
                left = skip_gaps(left);
                right = skip_gaps(right);
                continue;
            }

            let height = left_h.max(right_h);
            self.draw_table_slice(table, &left[..left_n], &right[..right_n], height);
            self.cursor += height;
            self.at_top = false;

            left = skip_gaps(&left[left_n..]);
            right = skip_gaps(&right[right_n..]);
            if left.is_empty() && right.is_empty() {
                break;
            }
            self.break_page();
        }
    }

    fn draw_table_slice(&mut self, table: &TableLayout, left: &[Row], right: &[Row], height: f32) {
        let table_width = 2.0 * table.col_width;
        let x0 = self.page.margin_left + (self.page.body_width() - table_width) / 2.0;
        let top = self.top_y();
        let ops = &mut self.current.ops;

        ops.push(DrawOp::FillRect {
            x: x0,
            y: top - height,
            width: table_width,
            height,
            color: table.background,
        });
        let divider_x = x0 + table.col_width;
        ops.push(DrawOp::Line {
            from: (divider_x, top),
            to: (divider_x, top - height),
            width: 1.0,
            color: table.divider,
        });

        for (rows, x) in [
            (left, x0 + table.padding),
            (right, x0 + table.col_width + table.padding),
        ] {
            let mut y = top;
            for row in rows {
                draw_row(ops, row, x, y);
                y -= row.height();
            }
        }
    }
}

/// How many leading rows fit into `avail`, and their total height.
/// With `force`, the first row is taken even when it is taller than `avail`.
fn take_rows(rows: &[Row], avail: f32, force: bool) -> (usize, f32) {
    let mut used = 0.0_f32;
    let mut count = 0;
    for row in rows {
        let h = row.height();
        if used + h > avail + EPSILON {
            if count == 0 && force && !matches!(row, Row::Gap(_)) {
                return (1, h);
            }
            break;
        }
        used += h;
        count += 1;
    }
    (count, used)
}

fn draw_row(ops: &mut Vec<DrawOp>, row: &Row, x: f32, top: f32) {
    match row {
        Row::Gap(_) => {}
        Row::Rule {
            width,
            height,
            color,
        } => ops.push(DrawOp::FillRect {
            x,
            y: top - height,
            width: *width,
            height: *height,
            color: *color,
        }),
        Row::Line(line) => {
            let baseline = top - line.baseline;
            for (dx, fragment) in &line.fragments {
                let fx = x + dx;
                ops.push(DrawOp::Text {
                    x: fx,
                    y: baseline,
                    text: fragment.text.clone(),
                    face: fragment.face,
                    size: line.font_size,
                    color: line.color,
                });
                if let Some(url) = &fragment.link {
                    ops.push(DrawOp::Link {
                        rect: [
                            fx,
                            baseline - line.font_size * DESCENT,
                            fx + fragment.width,
                            baseline + line.font_size * ASCENT,
                        ],
                        url: url.clone(),
                    });
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
