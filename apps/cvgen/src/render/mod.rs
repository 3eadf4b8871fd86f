pub mod encoding;
pub mod flow;
pub mod pdf;

use tracing::info;

use crate::errors::RenderError;
use crate::layout::blocks::LayoutBlock;
use crate::layout::font_metrics::PageConfig;
use crate::layout::style::StyleSheet;

pub use flow::{layout_story, paginate};
pub use pdf::{background_painter, write_pdf, DocumentMeta, PagePainter};

/// Lays out, paginates and serialises the story. Returns the finished PDF bytes.
pub fn render_document(
    blocks: &[LayoutBlock],
    styles: &StyleSheet,
    page: &PageConfig,
    painter: &dyn PagePainter,
    meta: &DocumentMeta,
) -> Result<Vec<u8>, RenderError> {
    let items = layout_story(blocks, styles, page.body_width())?;
    let pages = paginate(&items, page);
    let bytes = write_pdf(&pages, page, painter, meta);

    info!(
        blocks = blocks.len(),
        pages = pages.len(),
        bytes = bytes.len(),
        "Document rendered"
    );
    Ok(bytes)
}
