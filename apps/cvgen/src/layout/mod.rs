//! Page geometry, styles and the résumé → block builder.
//! Nothing here measures pages or breaks lines; that happens in `render`.

pub mod blocks;
pub mod builder;
pub mod font_metrics;
pub mod style;

pub use builder::{build_story, resolve_links};
pub use font_metrics::default_page_config;
pub use style::{create_styles, PALETTE};
