//! PDF serialisation of paginated draw operations.
//!
//! Object layout: catalog, page tree, document info, one Type1 font per face, then
//! for each page its page object, content stream and link annotations. Content
//! streams are Flate-compressed. The info dictionary carries no timestamps, so
//! the same input always produces the same bytes.

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::{debug, warn};

use crate::layout::font_metrics::{FontFace, PageConfig};
use crate::layout::style::Color;
use crate::render::encoding::{is_winansi_encodable, to_winansi_bytes};
use crate::render::flow::{DrawOp, Page};

/// Draws underneath the flowed content of every page.
pub trait PagePainter {
    fn paint(&self, canvas: &mut Content, page: &PageConfig);
}

impl<F> PagePainter for F
where
    F: Fn(&mut Content, &PageConfig),
{
    fn paint(&self, canvas: &mut Content, page: &PageConfig) {
        self(canvas, page)
    }
}

/// Fills the whole page, margins included, with one colour.
pub fn background_painter(color: Color) -> impl PagePainter {
    move |canvas: &mut Content, page: &PageConfig| {
        let (r, g, b) = color.to_unit_rgb();
        canvas.save_state();
        canvas.set_fill_rgb(r, g, b);
        canvas.rect(0.0, 0.0, page.width, page.height);
        canvas.fill_nonzero();
        canvas.restore_state();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    pub title: String,
    pub author: Option<String>,
}

pub fn write_pdf(
    pages: &[Page],
    page: &PageConfig,
    painter: &dyn PagePainter,
    meta: &DocumentMeta,
) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_refs: Vec<(FontFace, Ref)> = FontFace::ALL.iter().map(|f| (*f, alloc())).collect();

    for (face, font_ref) in &font_refs {
        pdf.type1_font(*font_ref)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    {
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(&meta.title));
        if let Some(author) = &meta.author {
            info.author(TextStr(author));
        }
        info.creator(TextStr(env!("CARGO_PKG_NAME")));
    }

    let mut page_ids = Vec::with_capacity(pages.len());
    for (index, flowed) in pages.iter().enumerate() {
        let page_id = alloc();
        let content_id = alloc();
        page_ids.push(page_id);

        let mut content = Content::new();
        painter.paint(&mut content, page);
        let links = draw_ops(&mut content, &flowed.ops);

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let annot_refs: Vec<Ref> = links
            .iter()
            .map(|(rect, url)| {
                let annot_ref = alloc();
                let mut annot = pdf.annotation(annot_ref);
                annot
                    .subtype(AnnotationType::Link)
                    .rect(Rect::new(rect[0], rect[1], rect[2], rect[3]))
                    .border(0.0, 0.0, 0.0, None);
                annot
                    .action()
                    .action_type(ActionType::Uri)
                    .uri(Str(url.as_bytes()));
                annot_ref
            })
            .collect();

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(pages_id)
            .contents(content_id);
        if !annot_refs.is_empty() {
            pdf_page.annotations(annot_refs.iter().copied());
        }
        {
            let mut resources = pdf_page.resources();
            let mut fonts = resources.fonts();
            for (face, font_ref) in &font_refs {
                fonts.pair(Name(face.resource_name().as_bytes()), *font_ref);
            }
        }
        drop(pdf_page);

        debug!(
            page = index + 1,
            ops = flowed.ops.len(),
            links = annot_refs.len(),
            "Page written"
        );
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    pdf.finish()
}

/// Emits the page's operators and returns its link rectangles.
fn draw_ops<'a>(content: &mut Content, ops: &'a [DrawOp]) -> Vec<([f32; 4], &'a str)> {
    let mut links = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => {
                if let Some(c) = text.chars().find(|c| !is_winansi_encodable(*c)) {
                    warn!(character = %c, text = %text, "Character outside WinAnsi, drawn as '?'");
                }
                let (r, g, b) = color.to_unit_rgb();
                let bytes = to_winansi_bytes(text);
                content.set_fill_rgb(r, g, b);
                content
                    .begin_text()
                    .set_font(Name(face.resource_name().as_bytes()), *size)
                    .next_line(*x, *y)
                    .show(Str(&bytes))
                    .end_text();
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.to_unit_rgb();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let (r, g, b) = color.to_unit_rgb();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
                content.move_to(from.0, from.1);
                content.line_to(to.0, to.1);
                content.stroke();
            }
            DrawOp::Link { rect, url } => links.push((*rect, url.as_str())),
        }
    }
    links
}
