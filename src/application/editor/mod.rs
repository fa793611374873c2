//! The visual editor bridge: HTML fragment to block document and back.
//!
//! Round trips are faithful for the editor-native block types and lossy for
//! everything else. The reverse direction renders non-native blocks as
//! comment placeholders that the forward direction deliberately drops; the
//! admin surface warns that such posts belong in document mode.

mod convert;
mod render;
mod text;

pub use convert::{EditorError, html_to_blocks};
pub use render::blocks_to_html;
