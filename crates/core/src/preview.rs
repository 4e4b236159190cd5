//! Preview and download contract for populated templates.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::template::TransformResult;
use crate::transform::tokenizer::{self, Token, TokenKind};

/// Elements whose text content is whitespace-sensitive.
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "script", "style"];

/// Elements around which whitespace-only text does not render.
const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "title", "meta", "link", "style", "table", "thead", "tbody", "tfoot",
    "tr", "td", "th", "caption", "colgroup", "col", "div", "p", "ul", "ol", "li", "h1", "h2",
    "h3", "h4", "h5", "h6", "center", "blockquote", "hr", "br",
];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Which side of a transform result is being previewed or downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewVariant {
    Original,
    Transformed,
}

impl PreviewVariant {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "original" => Ok(Self::Original),
            "transformed" => Ok(Self::Transformed),
            other => Err(CoreError::Validation(format!(
                "Invalid preview variant '{other}'. Must be one of: original, transformed"
            ))),
        }
    }

    pub fn download_filename(self) -> &'static str {
        match self {
            Self::Original => "original.html",
            Self::Transformed => "minified.html",
        }
    }

    /// Downloadable body for this variant. The transformed side is minified;
    /// the original is returned as uploaded.
    pub fn render(self, result: &TransformResult) -> String {
        match self {
            Self::Original => result.sanitized_original.clone(),
            Self::Transformed => minify_html(&result.transformed_html),
        }
    }
}

/// Minify markup: drop ordinary comments (conditional comments are kept) and
/// collapse whitespace in text outside whitespace-sensitive elements.
/// Whitespace-only text shrinks to one space, or disappears next to block
/// tags.
pub fn minify_html(html: &str) -> String {
    let tokens = tokenizer::tokenize(html).tokens;
    let mut out = String::with_capacity(html.len());
    let mut preserve_depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let end = tokens.get(i + 1).map_or(html.len(), |t| t.offset);
        let raw = &html[token.offset..end];

        match &token.kind {
            TokenKind::Comment(body) if !is_conditional_comment(body) => {}
            TokenKind::StartTag {
                name, self_closing, ..
            } => {
                if !*self_closing && PRESERVE_WHITESPACE.contains(&name.as_str()) {
                    preserve_depth += 1;
                }
                out.push_str(raw);
            }
            TokenKind::EndTag { name } => {
                if PRESERVE_WHITESPACE.contains(&name.as_str()) {
                    preserve_depth = preserve_depth.saturating_sub(1);
                }
                out.push_str(raw);
            }
            TokenKind::Text(text) if preserve_depth == 0 => {
                if !text.trim().is_empty() {
                    out.push_str(&WHITESPACE_RUN.replace_all(text, " "));
                } else if !is_block_boundary(i.checked_sub(1).and_then(|p| tokens.get(p)))
                    && !is_block_boundary(tokens.get(i + 1))
                {
                    out.push(' ');
                }
            }
            _ => out.push_str(raw),
        }
    }

    out
}

/// Document edges, the doctype and block-level tags.
fn is_block_boundary(token: Option<&Token>) -> bool {
    match token.map(|t| &t.kind) {
        None | Some(TokenKind::Declaration(_)) => true,
        Some(TokenKind::StartTag { name, .. } | TokenKind::EndTag { name }) => {
            BLOCK_TAGS.contains(&name.as_str())
        }
        _ => false,
    }
}

/// `<!--[if mso]>...<![endif]-->` and friends target specific clients.
fn is_conditional_comment(body: &str) -> bool {
    let body = body.trim_start();
    body.starts_with("[if") || body.starts_with("<![endif")
}
