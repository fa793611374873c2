//! The content-block model: a blog post body is an ordered sequence of
//! typed, renderable units persisted as one serialized document per
//! (post, locale) pair.
//!
//! The variant set is closed on purpose. Every consumer (serialization,
//! validation, the editor bridge) matches exhaustively, so adding a new
//! block type is a compile-time-checked, single-point change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// One typed unit of a post body. `id` is caller-assigned, opaque, and used
/// only for stable list rendering and diffing — blocks never reference each
/// other by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// The wire discriminant for this block.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph {
        /// Rich-text string; may contain inline HTML (bold/italic/links).
        content: String,
    },
    Heading {
        level: u8,
        content: String,
    },
    Code {
        language: String,
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Quote {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    List {
        style: ListStyle,
        items: Vec<String>,
    },
    Divider,
    Callout {
        variant: CalloutVariant,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Embed {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        provider: Option<EmbedProvider>,
    },
    Table {
        columns: Vec<TableColumn>,
        rows: Vec<BTreeMap<String, serde_json::Value>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        striped: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Quiz {
        title: String,
        questions: Vec<QuizQuestion>,
    },
    Flowchart {
        nodes: Vec<FlowNode>,
        edges: Vec<FlowEdge>,
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<FlowDirection>,
    },
    Math {
        formula: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        inline: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Diff {
        before: String,
        after: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    Terminal {
        commands: Vec<TerminalCommand>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Api {
        method: HttpMethod,
        endpoint: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    Filetree {
        items: Vec<FileTreeItem>,
    },
    Banner {
        variant: BannerVariant,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Stats {
        items: Vec<StatItem>,
        #[serde(skip_serializing_if = "Option::is_none")]
        columns: Option<u8>,
    },
    #[serde(rename_all = "camelCase")]
    Comparison {
        left_title: String,
        right_title: String,
        left_items: Vec<String>,
        right_items: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        left_color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        right_color: Option<String>,
    },
}

impl BlockKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::Code { .. } => "code",
            BlockKind::Image { .. } => "image",
            BlockKind::Quote { .. } => "quote",
            BlockKind::List { .. } => "list",
            BlockKind::Divider => "divider",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Embed { .. } => "embed",
            BlockKind::Table { .. } => "table",
            BlockKind::Quiz { .. } => "quiz",
            BlockKind::Flowchart { .. } => "flowchart",
            BlockKind::Math { .. } => "math",
            BlockKind::Diff { .. } => "diff",
            BlockKind::Terminal { .. } => "terminal",
            BlockKind::Api { .. } => "api",
            BlockKind::Filetree { .. } => "filetree",
            BlockKind::Banner { .. } => "banner",
            BlockKind::Stats { .. } => "stats",
            BlockKind::Comparison { .. } => "comparison",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutVariant {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerVariant {
    Info,
    Warning,
    Error,
    Success,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedProvider {
    Youtube,
    Twitter,
    Codepen,
    Other,
}

impl EmbedProvider {
    /// Classify an embed URL by its host. Unparseable URLs and unknown
    /// hosts map to `Other`.
    pub fn classify(embed_url: &str) -> Self {
        let Ok(parsed) = url::Url::parse(embed_url) else {
            return Self::Other;
        };
        let Some(host) = parsed.host_str() else {
            return Self::Other;
        };
        let host = host.strip_prefix("www.").unwrap_or(host);

        match host {
            "youtube.com" | "youtu.be" => Self::Youtube,
            "twitter.com" | "x.com" => Self::Twitter,
            "codepen.io" => Self::Codepen,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub key: String,
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<FlowNodeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeType {
    Start,
    End,
    Process,
    Decision,
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "LR")]
    LeftRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalCommand {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTreeItem {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: FileTreeEntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTreeEntryType {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatItem {
    pub value: StatValue,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Stat values arrive from editors both as numbers and as display strings
/// ("1.2M"); keep whichever shape the document used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

/// Structural validation applied on the write path. Render-side consumers
/// never call this; a stored document is trusted as-is.
pub fn validate_document(document: &[ContentBlock]) -> Result<(), DomainError> {
    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();

    for block in document {
        if block.id.trim().is_empty() {
            return Err(DomainError::validation("block id must not be empty"));
        }
        if !seen_ids.insert(block.id.as_str()) {
            return Err(DomainError::validation(format!(
                "duplicate block id `{}`",
                block.id
            )));
        }
        validate_block(block)?;
    }

    Ok(())
}

fn validate_block(block: &ContentBlock) -> Result<(), DomainError> {
    match &block.kind {
        BlockKind::Heading { level, .. } => {
            if !(1..=4).contains(level) {
                return Err(DomainError::validation(format!(
                    "heading level must be 1-4, got {level} in block `{}`",
                    block.id
                )));
            }
        }
        BlockKind::Quiz { questions, .. } => {
            for (index, question) in questions.iter().enumerate() {
                if question.correct_index >= question.options.len() {
                    return Err(DomainError::validation(format!(
                        "quiz question {index} in block `{}` marks option {} correct but only {} options exist",
                        block.id,
                        question.correct_index,
                        question.options.len()
                    )));
                }
            }
        }
        BlockKind::Flowchart { nodes, edges, .. } => {
            let node_ids: BTreeSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
            for edge in edges {
                if !node_ids.contains(edge.from.as_str()) {
                    return Err(DomainError::validation(format!(
                        "flowchart edge in block `{}` references unknown node `{}`",
                        block.id, edge.from
                    )));
                }
                if !node_ids.contains(edge.to.as_str()) {
                    return Err(DomainError::validation(format!(
                        "flowchart edge in block `{}` references unknown node `{}`",
                        block.id, edge.to
                    )));
                }
            }
        }
        BlockKind::Stats { columns, .. } => {
            if let Some(columns) = columns
                && !(2..=4).contains(columns)
            {
                return Err(DomainError::validation(format!(
                    "stats columns must be 2-4, got {columns} in block `{}`",
                    block.id
                )));
            }
        }
        BlockKind::Table { columns, rows, .. } => {
            let keys: BTreeSet<&str> = columns.iter().map(|column| column.key.as_str()).collect();
            if keys.len() != columns.len() {
                return Err(DomainError::validation(format!(
                    "table block `{}` declares duplicate column keys",
                    block.id
                )));
            }
            for row in rows {
                for key in row.keys() {
                    if !keys.contains(key.as_str()) {
                        return Err(DomainError::validation(format!(
                            "table block `{}` row references undeclared column `{key}`",
                            block.id
                        )));
                    }
                }
            }
        }
        BlockKind::Paragraph { .. }
        | BlockKind::Code { .. }
        | BlockKind::Image { .. }
        | BlockKind::Quote { .. }
        | BlockKind::List { .. }
        | BlockKind::Divider
        | BlockKind::Callout { .. }
        | BlockKind::Embed { .. }
        | BlockKind::Math { .. }
        | BlockKind::Diff { .. }
        | BlockKind::Terminal { .. }
        | BlockKind::Api { .. }
        | BlockKind::Filetree { .. }
        | BlockKind::Banner { .. }
        | BlockKind::Comparison { .. } => {}
    }

    Ok(())
}
