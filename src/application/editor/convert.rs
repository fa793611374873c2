//! HTML to block document conversion for the visual editor surface.
//!
//! The converter walks the fragment with a streaming rewriter and keeps a
//! small state machine: at most one block-level capture is open at a time,
//! and unknown elements are transparent so wrapper markup does not hide the
//! structure underneath. Comments are never parsed, so placeholder comments
//! emitted by the reverse direction vanish on the way back in.

use std::{cell::RefCell, rc::Rc};

use lol_html::{RewriteStrSettings, doc_text, element, html_content::Element, rewrite_str};
use thiserror::Error;

use crate::domain::blocks::{BlockKind, CalloutVariant, ContentBlock, ListStyle};

use super::text::{decode_entities, escape_attr};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("html fragment could not be parsed: {message}")]
    Parse { message: String },
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Start tags that implicitly close an open `<p>`, as in the HTML parsing
/// spec. Editors routinely omit `</p>` before the next block.
const PARAGRAPH_BOUNDARY_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "ul", "ol", "pre", "hr", "div",
];

enum Capture {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        html: String,
    },
    Quote {
        text: String,
        author: String,
        in_cite: bool,
    },
    List {
        style: ListStyle,
        items: Vec<String>,
        current: Option<String>,
    },
    Code {
        language: Option<String>,
        filename: Option<String>,
        pre_text: String,
        code_text: String,
        has_code_child: bool,
        in_code: bool,
    },
    Callout {
        variant: CalloutVariant,
        title: Option<String>,
        html: String,
    },
}

#[derive(Default)]
struct ConvertState {
    blocks: Vec<ContentBlock>,
    next_id: usize,
    pending_text: String,
    capture: Option<Capture>,
}

impl ConvertState {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("b{}", self.next_id)
    }

    fn push(&mut self, kind: BlockKind) {
        let id = self.allocate_id();
        self.blocks.push(ContentBlock::new(id, kind));
    }

    /// Bare text between block elements becomes a paragraph of its own.
    fn flush_pending_text(&mut self) {
        let trimmed = self.pending_text.trim().to_string();
        self.pending_text.clear();
        if !trimmed.is_empty() {
            self.push(BlockKind::Paragraph { content: trimmed });
        }
    }

    fn finish_capture(&mut self) {
        match self.capture.take() {
            Some(Capture::Heading { level, text }) => {
                let content = text.trim().to_string();
                if !content.is_empty() {
                    self.push(BlockKind::Heading { level, content });
                }
            }
            Some(Capture::Paragraph { html }) => {
                let content = html.trim().to_string();
                if !content.is_empty() {
                    self.push(BlockKind::Paragraph { content });
                }
            }
            Some(Capture::Quote { text, author, .. }) => {
                let author = author.trim();
                self.push(BlockKind::Quote {
                    content: text.trim().to_string(),
                    author: (!author.is_empty()).then(|| author.to_string()),
                });
            }
            Some(Capture::List {
                style,
                mut items,
                current,
            }) => {
                if let Some(item) = current {
                    push_list_item(&mut items, item);
                }
                if !items.is_empty() {
                    self.push(BlockKind::List { style, items });
                }
            }
            Some(Capture::Code {
                language,
                filename,
                pre_text,
                code_text,
                has_code_child,
                ..
            }) => {
                let code = if has_code_child { code_text } else { pre_text };
                self.push(BlockKind::Code {
                    language: language.unwrap_or_else(|| "plaintext".to_string()),
                    code,
                    filename,
                });
            }
            Some(Capture::Callout {
                variant,
                title,
                html,
            }) => {
                self.push(BlockKind::Callout {
                    variant,
                    content: html.trim().to_string(),
                    title,
                });
            }
            None => {}
        }
    }
}

fn push_list_item(items: &mut Vec<String>, item: String) {
    let trimmed = item.trim().to_string();
    if !trimmed.is_empty() {
        items.push(trimmed);
    }
}

/// Convert a rich-text HTML fragment into a block document. Best-effort
/// structural mapping; markup that matches no rule contributes its text and
/// nothing else.
pub fn html_to_blocks(html: &str) -> Result<Vec<ContentBlock>, EditorError> {
    let state = Rc::new(RefCell::new(ConvertState::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", {
                let state = Rc::clone(&state);
                move |el| {
                    handle_element(&state, el);
                    Ok(())
                }
            })],
            document_content_handlers: vec![doc_text!({
                let state = Rc::clone(&state);
                move |chunk| {
                    handle_text(&mut state.borrow_mut(), chunk.as_str());
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| EditorError::Parse {
        message: err.to_string(),
    })?;

    let mut state = state.borrow_mut();
    // A capture left open at end of input (unclosed tag) still counts.
    state.finish_capture();
    state.flush_pending_text();
    Ok(std::mem::take(&mut state.blocks))
}

/// What to do when an element opened inside an active capture closes again.
enum NestedAction {
    None,
    AppendClosing(String),
    LeaveCite,
    FinishListItem,
    LeaveCode,
}

fn handle_element(state: &Rc<RefCell<ConvertState>>, el: &mut Element) {
    let tag = el.tag_name();

    // An unclosed paragraph ends at the next block-level start tag.
    if PARAGRAPH_BOUNDARY_TAGS.contains(&tag.as_str()) {
        let mut guard = state.borrow_mut();
        if matches!(guard.capture, Some(Capture::Paragraph { .. })) {
            guard.finish_capture();
        }
    }

    let capture_active = state.borrow().capture.is_some();

    if capture_active {
        let action = handle_nested_start(&mut state.borrow_mut(), el, &tag);
        match action {
            NestedAction::None => {}
            NestedAction::AppendClosing(closing) => on_end_tag(state, el, move |state| {
                if let Some(Capture::Paragraph { html }) | Some(Capture::Callout { html, .. }) =
                    state.capture.as_mut()
                {
                    html.push_str(&closing);
                }
            }),
            NestedAction::LeaveCite => on_end_tag(state, el, |state| {
                if let Some(Capture::Quote { in_cite, .. }) = state.capture.as_mut() {
                    *in_cite = false;
                }
            }),
            NestedAction::FinishListItem => on_end_tag(state, el, |state| {
                if let Some(Capture::List { items, current, .. }) = state.capture.as_mut()
                    && let Some(item) = current.take()
                {
                    push_list_item(items, item);
                }
            }),
            NestedAction::LeaveCode => on_end_tag(state, el, |state| {
                if let Some(Capture::Code { in_code, .. }) = state.capture.as_mut() {
                    *in_code = false;
                }
            }),
        }
        return;
    }

    match tag.as_str() {
        "h1" | "h2" | "h3" | "h4" => {
            let level = tag.as_bytes()[1] - b'0';
            start_capture(
                state,
                el,
                Capture::Heading {
                    level,
                    text: String::new(),
                },
            );
        }
        "p" => start_capture(
            state,
            el,
            Capture::Paragraph {
                html: String::new(),
            },
        ),
        "blockquote" => start_capture(
            state,
            el,
            Capture::Quote {
                text: String::new(),
                author: String::new(),
                in_cite: false,
            },
        ),
        "ul" | "ol" => {
            let style = if tag == "ol" {
                ListStyle::Ordered
            } else {
                ListStyle::Unordered
            };
            start_capture(
                state,
                el,
                Capture::List {
                    style,
                    items: Vec::new(),
                    current: None,
                },
            );
        }
        "pre" => {
            let filename = el.get_attribute("data-filename");
            start_capture(
                state,
                el,
                Capture::Code {
                    language: None,
                    filename,
                    pre_text: String::new(),
                    code_text: String::new(),
                    has_code_child: false,
                    in_code: false,
                },
            );
        }
        "img" => {
            let mut state = state.borrow_mut();
            state.flush_pending_text();
            let src = el.get_attribute("src").unwrap_or_default();
            let alt = el.get_attribute("alt").unwrap_or_default();
            let caption = el
                .get_attribute("title")
                .filter(|title| !title.trim().is_empty());
            state.push(BlockKind::Image { src, alt, caption });
        }
        "hr" => {
            let mut state = state.borrow_mut();
            state.flush_pending_text();
            state.push(BlockKind::Divider);
        }
        "div" => {
            if let Some(variant) = el.get_attribute("data-callout") {
                let variant = match variant.as_str() {
                    "warning" => CalloutVariant::Warning,
                    "error" => CalloutVariant::Error,
                    "success" => CalloutVariant::Success,
                    _ => CalloutVariant::Info,
                };
                let title = el
                    .get_attribute("data-title")
                    .filter(|title| !title.trim().is_empty());
                start_capture(
                    state,
                    el,
                    Capture::Callout {
                        variant,
                        title,
                        html: String::new(),
                    },
                );
            }
            // A plain div is a transparent wrapper.
        }
        _ => {}
    }
}

fn handle_nested_start(state: &mut ConvertState, el: &mut Element, tag: &str) -> NestedAction {
    match state.capture.as_mut() {
        Some(Capture::Paragraph { html }) | Some(Capture::Callout { html, .. }) => {
            html.push_str(&serialize_start_tag(el, tag));
            if VOID_TAGS.contains(&tag) {
                NestedAction::None
            } else {
                NestedAction::AppendClosing(format!("</{tag}>"))
            }
        }
        Some(Capture::Quote { in_cite, .. }) if tag == "cite" => {
            *in_cite = true;
            NestedAction::LeaveCite
        }
        Some(Capture::List { items, current, .. }) if tag == "li" => {
            if let Some(item) = current.take() {
                push_list_item(items, item);
            }
            *current = Some(String::new());
            NestedAction::FinishListItem
        }
        Some(Capture::Code {
            language,
            filename,
            has_code_child,
            in_code,
            ..
        }) if tag == "code" => {
            *has_code_child = true;
            *in_code = true;
            if language.is_none() {
                *language = el.get_attribute("class").and_then(|class| {
                    class
                        .split_whitespace()
                        .find_map(|name| name.strip_prefix("language-"))
                        .map(str::to_string)
                });
            }
            if filename.is_none() {
                *filename = el.get_attribute("data-filename");
            }
            NestedAction::LeaveCode
        }
        _ => NestedAction::None,
    }
}

fn start_capture(state: &Rc<RefCell<ConvertState>>, el: &mut Element, capture: Capture) {
    {
        let mut guard = state.borrow_mut();
        guard.flush_pending_text();
        guard.capture = Some(capture);
    }
    on_end_tag(state, el, ConvertState::finish_capture);
}

/// Register a handler to run when `el` closes. Void elements carry no end
/// tag and are skipped.
fn on_end_tag(
    state: &Rc<RefCell<ConvertState>>,
    el: &mut Element,
    apply: impl FnOnce(&mut ConvertState) + 'static,
) {
    if let Some(handlers) = el.end_tag_handlers() {
        let state = Rc::clone(state);
        handlers.push(Box::new(move |_end| {
            apply(&mut state.borrow_mut());
            Ok(())
        }));
    }
}

fn handle_text(state: &mut ConvertState, chunk: &str) {
    match state.capture.as_mut() {
        Some(Capture::Heading { text, .. }) => text.push_str(&decode_entities(chunk)),
        Some(Capture::Paragraph { html }) | Some(Capture::Callout { html, .. }) => {
            html.push_str(chunk);
        }
        Some(Capture::Quote {
            text,
            author,
            in_cite,
        }) => {
            let decoded = decode_entities(chunk);
            if *in_cite {
                author.push_str(&decoded);
            } else {
                text.push_str(&decoded);
            }
        }
        Some(Capture::List { current, .. }) => {
            if let Some(item) = current.as_mut() {
                item.push_str(&decode_entities(chunk));
            }
        }
        Some(Capture::Code {
            pre_text,
            code_text,
            in_code,
            ..
        }) => {
            let decoded = decode_entities(chunk);
            pre_text.push_str(&decoded);
            if *in_code {
                code_text.push_str(&decoded);
            }
        }
        None => state.pending_text.push_str(chunk),
    }
}

fn serialize_start_tag(el: &Element, tag: &str) -> String {
    let mut output = format!("<{tag}");
    for attr in el.attributes() {
        output.push(' ');
        output.push_str(&attr.name());
        output.push_str("=\"");
        output.push_str(&escape_attr(&attr.value()));
        output.push('"');
    }
    output.push('>');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(html: &str) -> Vec<BlockKind> {
        html_to_blocks(html)
            .expect("convert")
            .into_iter()
            .map(|block| block.kind)
            .collect()
    }

    #[test]
    fn headings_take_their_level_from_the_tag() {
        assert_eq!(
            kinds("<h2>Setup</h2><h4>Notes</h4>"),
            vec![
                BlockKind::Heading {
                    level: 2,
                    content: "Setup".to_string()
                },
                BlockKind::Heading {
                    level: 4,
                    content: "Notes".to_string()
                },
            ]
        );
    }

    #[test]
    fn paragraph_preserves_inline_markup() {
        assert_eq!(
            kinds("<p>read <a href=\"/docs\">the <strong>docs</strong></a> now</p>"),
            vec![BlockKind::Paragraph {
                content: "read <a href=\"/docs\">the <strong>docs</strong></a> now".to_string()
            }]
        );
    }

    #[test]
    fn empty_paragraph_is_dropped() {
        assert!(kinds("<p>   </p><p></p>").is_empty());
    }

    #[test]
    fn quote_strips_inline_markup_and_reads_cite_as_author() {
        assert_eq!(
            kinds("<blockquote>stay <em>curious</em><cite>Unknown</cite></blockquote>"),
            vec![BlockKind::Quote {
                content: "stay curious".to_string(),
                author: Some("Unknown".to_string()),
            }]
        );
    }

    #[test]
    fn list_collects_item_text() {
        assert_eq!(
            kinds("<ol><li>clone</li><li>build <code>soon</code></li></ol>"),
            vec![BlockKind::List {
                style: ListStyle::Ordered,
                items: vec!["clone".to_string(), "build soon".to_string()],
            }]
        );
    }

    #[test]
    fn empty_list_produces_no_block() {
        assert!(kinds("<ul></ul>").is_empty());
    }

    #[test]
    fn code_language_comes_from_the_class_and_defaults_to_plaintext() {
        assert_eq!(
            kinds("<pre><code class=\"language-rust\">fn main() {}</code></pre>"),
            vec![BlockKind::Code {
                language: "rust".to_string(),
                code: "fn main() {}".to_string(),
                filename: None,
            }]
        );
        assert_eq!(
            kinds("<pre>plain body</pre>"),
            vec![BlockKind::Code {
                language: "plaintext".to_string(),
                code: "plain body".to_string(),
                filename: None,
            }]
        );
    }

    #[test]
    fn code_entities_are_decoded() {
        assert_eq!(
            kinds("<pre><code class=\"language-rust\">a &lt; b &amp;&amp; c</code></pre>"),
            vec![BlockKind::Code {
                language: "rust".to_string(),
                code: "a < b && c".to_string(),
                filename: None,
            }]
        );
    }

    #[test]
    fn image_attributes_default_to_empty_strings() {
        assert_eq!(
            kinds("<img>"),
            vec![BlockKind::Image {
                src: String::new(),
                alt: String::new(),
                caption: None,
            }]
        );
    }

    #[test]
    fn bare_text_becomes_a_paragraph() {
        assert_eq!(
            kinds("loose opening text<hr>"),
            vec![
                BlockKind::Paragraph {
                    content: "loose opening text".to_string()
                },
                BlockKind::Divider,
            ]
        );
    }

    #[test]
    fn wrapper_elements_are_transparent() {
        assert_eq!(
            kinds("<div><section><h3>Inside</h3></section></div>"),
            vec![BlockKind::Heading {
                level: 3,
                content: "Inside".to_string()
            }]
        );
    }

    #[test]
    fn an_unclosed_block_at_end_of_input_still_produces_its_block() {
        assert_eq!(
            kinds("<p>hello world"),
            vec![BlockKind::Paragraph {
                content: "hello world".to_string()
            }]
        );
        assert_eq!(
            kinds("<h2>Setup"),
            vec![BlockKind::Heading {
                level: 2,
                content: "Setup".to_string()
            }]
        );
    }

    #[test]
    fn a_block_start_tag_implicitly_closes_an_open_paragraph() {
        assert_eq!(
            kinds("<p>first<p>second</p>"),
            vec![
                BlockKind::Paragraph {
                    content: "first".to_string()
                },
                BlockKind::Paragraph {
                    content: "second".to_string()
                },
            ]
        );
        assert_eq!(
            kinds("<p>intro<h3>Details</h3>"),
            vec![
                BlockKind::Paragraph {
                    content: "intro".to_string()
                },
                BlockKind::Heading {
                    level: 3,
                    content: "Details".to_string()
                },
            ]
        );
    }

    #[test]
    fn comments_are_not_parsed() {
        assert!(kinds("<!-- block:quiz id=\"q1\" (document mode only) -->").is_empty());
    }

    #[test]
    fn ids_are_unique_within_one_conversion() {
        let blocks = html_to_blocks("<p>one</p><hr><p>two</p>").expect("convert");
        let ids: Vec<&str> = blocks.iter().map(|block| block.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "b3"]);
    }
}
