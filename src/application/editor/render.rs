//! Block document to HTML rendering for the visual editor surface.
//!
//! Only the editor-native block types get a real HTML shape. Everything else
//! degrades to a comment placeholder carrying the type and id, which the
//! forward conversion does not parse back. Posts containing such blocks must
//! be edited in document mode; saving them through the visual editor loses
//! the placeholder blocks.

use crate::domain::blocks::{BlockKind, CalloutVariant, ContentBlock, ListStyle};

use super::text::{escape_attr, escape_text};

/// Render a document into the HTML fragment the visual editor loads.
pub fn blocks_to_html(document: &[ContentBlock]) -> String {
    document
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &ContentBlock) -> String {
    match &block.kind {
        BlockKind::Paragraph { content } => format!("<p>{content}</p>"),
        BlockKind::Heading { level, content } => {
            format!("<h{level}>{}</h{level}>", escape_text(content))
        }
        BlockKind::Code {
            language,
            code,
            filename,
        } => {
            let filename_attr = filename
                .as_deref()
                .map(|name| format!(" data-filename=\"{}\"", escape_attr(name)))
                .unwrap_or_default();
            format!(
                "<pre{filename_attr}><code class=\"language-{}\">{}</code></pre>",
                escape_attr(language),
                escape_text(code)
            )
        }
        BlockKind::Image { src, alt, caption } => {
            let caption_attr = caption
                .as_deref()
                .map(|text| format!(" title=\"{}\"", escape_attr(text)))
                .unwrap_or_default();
            format!(
                "<img src=\"{}\" alt=\"{}\"{caption_attr}>",
                escape_attr(src),
                escape_attr(alt)
            )
        }
        BlockKind::Quote { content, author } => {
            let cite = author
                .as_deref()
                .map(|name| format!("<cite>{}</cite>", escape_text(name)))
                .unwrap_or_default();
            format!("<blockquote>{}{cite}</blockquote>", escape_text(content))
        }
        BlockKind::List { style, items } => {
            let tag = match style {
                ListStyle::Ordered => "ol",
                ListStyle::Unordered => "ul",
            };
            let body = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_text(item)))
                .collect::<String>();
            format!("<{tag}>{body}</{tag}>")
        }
        BlockKind::Divider => "<hr>".to_string(),
        BlockKind::Callout {
            variant,
            content,
            title,
        } => {
            let variant = match variant {
                CalloutVariant::Info => "info",
                CalloutVariant::Warning => "warning",
                CalloutVariant::Error => "error",
                CalloutVariant::Success => "success",
            };
            let title_attr = title
                .as_deref()
                .map(|text| format!(" data-title=\"{}\"", escape_attr(text)))
                .unwrap_or_default();
            format!("<div data-callout=\"{variant}\"{title_attr}>{content}</div>")
        }
        BlockKind::Embed { .. }
        | BlockKind::Table { .. }
        | BlockKind::Quiz { .. }
        | BlockKind::Flowchart { .. }
        | BlockKind::Math { .. }
        | BlockKind::Diff { .. }
        | BlockKind::Terminal { .. }
        | BlockKind::Api { .. }
        | BlockKind::Filetree { .. }
        | BlockKind::Banner { .. }
        | BlockKind::Stats { .. }
        | BlockKind::Comparison { .. } => {
            format!(
                "<!-- block:{} id=\"{}\" (document mode only) -->",
                block.type_name(),
                escape_attr(&block.id)
            )
        }
    }
}
