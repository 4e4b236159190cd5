//! HTML-to-email transform engine.
//!
//! [`transform`] rewrites arbitrary HTML into markup that renders
//! consistently in restrictive email clients and reports every unsupported
//! construct it met along the way:
//!
//! - block layout tags (`div`, `section`, ...) become presentation tables,
//! - simple `<style>` rules are inlined into `style` attributes,
//! - unsupported CSS properties and values are dropped,
//! - `script`/`iframe`/`object`/`embed`/`applet` are removed with their content,
//! - `on*` event handler attributes are removed,
//! - URI attributes are restricted to [`uri::ALLOWED_SCHEMES`] or relative paths.
//!
//! The engine is a pure function. It never fails on malformed input; it
//! records a diagnostic and keeps going. Diagnostics are ordered by the
//! position of their first occurrence in the source and reported once each.

pub mod css;
pub mod tokenizer;
pub mod uri;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use css::{CssBlock, Declaration, DeclarationVerdict, SimpleSelector};
use tokenizer::{Attr, Token, TokenKind};
use uri::{check_uri, check_uri_list, UriVerdict, URI_ATTRIBUTES, URI_LIST_ATTRIBUTES};

/// Block-level tags flattened into table layouts.
pub const LAYOUT_TAGS: &[&str] = &[
    "div", "section", "article", "header", "footer", "main", "nav", "aside",
];

/// Tags removed together with their content.
pub const FORBIDDEN_TAGS: &[&str] = &["script", "iframe", "object", "embed", "applet"];

/// Tags kept in the output but flagged as unsupported by most email clients.
pub const UNSUPPORTED_TAGS: &[&str] = &[
    "form", "input", "button", "select", "textarea", "video", "audio", "canvas", "svg",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const LAYOUT_TABLE_OPEN: &str =
    r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0"><tr><td"#;
const LAYOUT_TABLE_CLOSE: &str = "</td></tr></table>";

/// Result of a transform: the rewritten markup and the ordered diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutput {
    pub data: String,
    pub errors: Vec<String>,
}

/// Rewrite `html` for email clients. See the module docs for the rules.
pub fn transform(html: &str) -> TransformOutput {
    let tokenized = tokenizer::tokenize(html);
    let mut diagnostics = Diagnostics::default();

    for (offset, note) in &tokenized.malformed {
        diagnostics.push(*offset, format!("Malformed markup: {note}"));
    }

    let styles = StyleSheets::collect(&tokenized.tokens, &mut diagnostics);

    let mut rewriter = Rewriter {
        styles: &styles,
        diagnostics: &mut diagnostics,
        out: String::with_capacity(html.len()),
        open_layout: Vec::new(),
        skip: None,
    };
    for (index, token) in tokenized.tokens.iter().enumerate() {
        rewriter.token(index, token);
    }
    let data = rewriter.finish();

    TransformOutput {
        data,
        errors: diagnostics.into_messages(),
    }
}

fn is_forbidden(name: &str) -> bool {
    FORBIDDEN_TAGS.contains(&name)
}

/// Whether a start tag opens content that must be skipped to its close tag.
fn opens_skipped_content(name: &str, self_closing: bool) -> bool {
    !self_closing && !VOID_TAGS.contains(&name)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Diagnostics {
    entries: Vec<(usize, String)>,
}

impl Diagnostics {
    fn push(&mut self, offset: usize, message: String) {
        self.entries.push((offset, message));
    }

    /// Messages ordered by source offset, duplicates collapsed onto their
    /// first occurrence.
    fn into_messages(mut self) -> Vec<String> {
        self.entries.sort_by_key(|(offset, _)| *offset);
        let unique: IndexSet<String> = self.entries.into_iter().map(|(_, m)| m).collect();
        unique.into_iter().collect()
    }
}

/// Drop declarations email clients cannot render, reporting each one.
fn filter_supported(
    decls: Vec<Declaration>,
    offset: usize,
    diagnostics: &mut Diagnostics,
) -> Vec<Declaration> {
    decls
        .into_iter()
        .filter(|decl| match css::check_declaration(decl) {
            DeclarationVerdict::Supported => true,
            DeclarationVerdict::UnsupportedProperty => {
                diagnostics.push(
                    offset,
                    format!("Unsupported CSS property `{}` removed", decl.property),
                );
                false
            }
            DeclarationVerdict::UnsupportedValue => {
                diagnostics.push(
                    offset,
                    format!(
                        "Unsupported CSS value `{}: {}` removed",
                        decl.property, decl.value
                    ),
                );
                false
            }
            DeclarationVerdict::DisallowedUri(scheme) => {
                diagnostics.push(
                    offset,
                    format!(
                        "Disallowed URI scheme `{scheme}:` in CSS `{}` removed",
                        decl.property
                    ),
                );
                false
            }
        })
        .collect()
}

/// Keep an at-rule verbatim unless it references a disallowed URI.
fn retain_at_rule(text: String, offset: usize, diagnostics: &mut Diagnostics) -> Option<String> {
    match css::check_at_rule(&text) {
        UriVerdict::Allowed => Some(text),
        UriVerdict::Disallowed(scheme) => {
            diagnostics.push(
                offset,
                format!(
                    "Disallowed URI scheme `{scheme}:` in CSS `@{}` removed",
                    css::at_rule_name(&text)
                ),
            );
            None
        }
    }
}

/// Filter the rules nested in `@media`-like blocks the same way as top-level
/// rules. Nothing inside is inlined. The block is dropped once it is empty.
fn retain_group(
    prelude: &str,
    blocks: Vec<CssBlock>,
    offset: usize,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    retain_at_rule(prelude.to_string(), offset, diagnostics)?;

    let mut inner = Vec::new();
    for block in blocks {
        let kept = match block {
            CssBlock::Rule { selectors, body } => {
                let declarations =
                    filter_supported(css::parse_declarations(&body), offset, diagnostics);
                (!declarations.is_empty()).then(|| {
                    format!(
                        "{} {{ {} }}",
                        css::split_selectors(&selectors).join(", "),
                        css::serialize_declarations(&declarations)
                    )
                })
            }
            CssBlock::Group { prelude, blocks } => {
                retain_group(&prelude, blocks, offset, diagnostics)
            }
            CssBlock::AtRule(text) => retain_at_rule(text, offset, diagnostics),
        };
        inner.extend(kept);
    }

    (!inner.is_empty()).then(|| format!("{prelude} {{ {} }}", inner.join(" ")))
}

/// Insert `decl`, unless an `!important` declaration of the same property is
/// already present and `decl` is not important itself.
fn merge_declaration(into: &mut IndexMap<String, Declaration>, decl: Declaration) {
    if into
        .get(&decl.property)
        .is_some_and(|existing| existing.important && !decl.important)
    {
        return;
    }
    into.insert(decl.property.clone(), decl);
}

// ---------------------------------------------------------------------------
// Style sheets
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct InlineRule {
    selector: SimpleSelector,
    order: usize,
    declarations: Vec<Declaration>,
}

/// All `<style>` blocks of a document, split into inlinable rules and the CSS
/// that has to stay in a `<style>` element.
#[derive(Debug, Default)]
struct StyleSheets {
    rules: Vec<InlineRule>,
    /// Retained CSS keyed by the token index of its `<style>` start tag.
    retained: HashMap<usize, String>,
}

impl StyleSheets {
    fn collect(tokens: &[Token], diagnostics: &mut Diagnostics) -> Self {
        let mut sheets = Self::default();
        let mut skip: Option<(&str, usize)> = None;

        for (index, token) in tokens.iter().enumerate() {
            match &token.kind {
                TokenKind::StartTag {
                    name, self_closing, ..
                } => {
                    if let Some((skipped, depth)) = skip.as_mut() {
                        if *skipped == name.as_str() && !*self_closing {
                            *depth += 1;
                        }
                        continue;
                    }
                    if is_forbidden(name) && opens_skipped_content(name, *self_closing) {
                        skip = Some((name.as_str(), 1));
                        continue;
                    }
                    if name == "style" && !*self_closing {
                        let body = match tokens.get(index + 1).map(|t| &t.kind) {
                            Some(TokenKind::RawText(body)) => body.as_str(),
                            _ => "",
                        };
                        sheets.add_block(index, token.offset, body, diagnostics);
                    }
                }
                TokenKind::EndTag { name } => {
                    if let Some((skipped, depth)) = skip.as_mut() {
                        if *skipped == name.as_str() {
                            *depth -= 1;
                            if *depth == 0 {
                                skip = None;
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        sheets
    }

    fn add_block(
        &mut self,
        index: usize,
        offset: usize,
        body: &str,
        diagnostics: &mut Diagnostics,
    ) {
        let (blocks, malformed) = css::parse_stylesheet(body);
        if malformed {
            diagnostics.push(offset, "Malformed CSS in <style> block".to_string());
        }

        let mut retained = Vec::new();
        for block in blocks {
            match block {
                CssBlock::AtRule(text) => {
                    retained.extend(retain_at_rule(text, offset, diagnostics));
                }
                CssBlock::Group { prelude, blocks } => {
                    retained.extend(retain_group(&prelude, blocks, offset, diagnostics));
                }
                CssBlock::Rule { selectors, body } => {
                    let declarations =
                        filter_supported(css::parse_declarations(&body), offset, diagnostics);
                    if declarations.is_empty() {
                        continue;
                    }

                    let mut kept_selectors = Vec::new();
                    for selector in css::split_selectors(&selectors) {
                        match SimpleSelector::parse(&selector) {
                            Some(parsed) => self.rules.push(InlineRule {
                                selector: parsed,
                                order: self.rules.len(),
                                declarations: declarations.clone(),
                            }),
                            None => kept_selectors.push(selector),
                        }
                    }

                    if !kept_selectors.is_empty() {
                        retained.push(format!(
                            "{} {{ {} }}",
                            kept_selectors.join(", "),
                            css::serialize_declarations(&declarations)
                        ));
                    }
                }
            }
        }

        if !retained.is_empty() {
            self.retained.insert(index, retained.join("\n"));
        }
    }

    /// Class attributes stay when some CSS could not be inlined, since the
    /// retained rules may still target them.
    fn keeps_classes(&self) -> bool {
        !self.retained.is_empty()
    }

    fn matched(&self, tag: &str, classes: &[&str], id: Option<&str>) -> IndexMap<String, Declaration> {
        let mut matched: Vec<&InlineRule> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.matches(tag, classes, id))
            .collect();
        matched.sort_by_key(|rule| (rule.selector.specificity(), rule.order));

        let mut out = IndexMap::new();
        for rule in matched {
            for decl in &rule.declarations {
                merge_declaration(&mut out, decl.clone());
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Rewriter
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Skip {
    name: String,
    depth: usize,
    offset: usize,
    report_unclosed: bool,
}

struct Rewriter<'a> {
    styles: &'a StyleSheets,
    diagnostics: &'a mut Diagnostics,
    out: String,
    /// Open flattened layout elements: `(tag, source offset)`.
    open_layout: Vec<(String, usize)>,
    skip: Option<Skip>,
}

impl Rewriter<'_> {
    fn token(&mut self, index: usize, token: &Token) {
        match &token.kind {
            TokenKind::StartTag {
                name,
                attrs,
                self_closing,
            } => self.start_tag(index, token.offset, name, attrs, *self_closing),
            TokenKind::EndTag { name } => self.end_tag(token.offset, name),
            _ if self.skip.is_some() => {}
            TokenKind::Declaration(raw) => self.out.push_str(raw),
            TokenKind::Comment(body) => {
                self.out.push_str("<!--");
                self.out.push_str(body);
                self.out.push_str("-->");
            }
            TokenKind::Text(text) | TokenKind::RawText(text) => self.out.push_str(text),
        }
    }

    fn start_tag(
        &mut self,
        index: usize,
        offset: usize,
        name: &str,
        attrs: &[Attr],
        self_closing: bool,
    ) {
        if let Some(skip) = self.skip.as_mut() {
            if skip.name == name && !self_closing {
                skip.depth += 1;
            }
            return;
        }

        if is_forbidden(name) {
            self.diagnostics
                .push(offset, format!("Unsupported tag <{name}> removed"));
            if opens_skipped_content(name, self_closing) {
                self.skip = Some(Skip {
                    name: name.to_string(),
                    depth: 1,
                    offset,
                    report_unclosed: true,
                });
            }
            return;
        }

        if name == "style" {
            if let Some(retained) = self.styles.retained.get(&index) {
                self.out.push_str("<style");
                self.out.push_str(&render_attrs(attrs));
                self.out.push('>');
                self.out.push_str(retained);
                self.out.push_str("</style>");
            }
            if !self_closing {
                self.skip = Some(Skip {
                    name: name.to_string(),
                    depth: 1,
                    offset,
                    report_unclosed: false,
                });
            }
            return;
        }

        if UNSUPPORTED_TAGS.contains(&name) {
            self.diagnostics.push(
                offset,
                format!("Tag <{name}> is not supported by most email clients"),
            );
        }

        let rewritten = self.rewrite_attrs(offset, name, attrs);

        if LAYOUT_TAGS.contains(&name) {
            self.out.push_str(LAYOUT_TABLE_OPEN);
            self.out.push_str(&render_attrs(&rewritten));
            self.out.push('>');
            if self_closing {
                self.out.push_str(LAYOUT_TABLE_CLOSE);
            } else {
                self.open_layout.push((name.to_string(), offset));
            }
            return;
        }

        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(&render_attrs(&rewritten));
        if self_closing {
            self.out.push_str(" /");
        }
        self.out.push('>');
    }

    fn end_tag(&mut self, offset: usize, name: &str) {
        if let Some(skip) = self.skip.as_mut() {
            if skip.name == name {
                skip.depth -= 1;
                if skip.depth == 0 {
                    self.skip = None;
                }
            }
            return;
        }

        if LAYOUT_TAGS.contains(&name) || is_forbidden(name) {
            let Some(pos) = self.open_layout.iter().rposition(|(open, _)| open == name) else {
                self.diagnostics
                    .push(offset, format!("Unmatched closing tag </{name}> removed"));
                return;
            };
            while self.open_layout.len() > pos + 1 {
                if let Some((inner, inner_offset)) = self.open_layout.pop() {
                    self.diagnostics.push(
                        inner_offset,
                        format!("Unclosed <{inner}> closed before </{name}>"),
                    );
                    self.out.push_str(LAYOUT_TABLE_CLOSE);
                }
            }
            self.open_layout.pop();
            self.out.push_str(LAYOUT_TABLE_CLOSE);
            return;
        }

        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Apply the attribute rules: drop event handlers and disallowed URIs,
    /// merge inlined and inline styles, and drop `class` once inlined.
    fn rewrite_attrs(&mut self, offset: usize, tag: &str, attrs: &[Attr]) -> Vec<Attr> {
        let classes: Vec<&str> = attrs
            .iter()
            .find(|a| a.name == "class")
            .and_then(|a| a.value.as_deref())
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default();
        let id = attrs
            .iter()
            .find(|a| a.name == "id")
            .and_then(|a| a.value.as_deref());

        let mut style = self.styles.matched(tag, &classes, id);
        let keep_classes = self.styles.keeps_classes();
        let mut out = Vec::with_capacity(attrs.len());

        for attr in attrs {
            let attr_name = attr.name.as_str();

            if attr_name.starts_with("on") {
                self.diagnostics.push(
                    offset,
                    format!("Event handler attribute `{attr_name}` removed"),
                );
                continue;
            }

            let uri_check: Option<fn(&str) -> UriVerdict> = match attr_name {
                name if URI_ATTRIBUTES.contains(&name) => Some(check_uri),
                name if URI_LIST_ATTRIBUTES.contains(&name) => Some(check_uri_list),
                _ => None,
            };
            if let (Some(check), Some(value)) = (uri_check, attr.value.as_deref()) {
                if let UriVerdict::Disallowed(scheme) = check(value) {
                    self.diagnostics.push(
                        offset,
                        format!("Disallowed URI scheme `{scheme}:` in `{attr_name}` attribute removed"),
                    );
                    continue;
                }
            }

            match attr_name {
                "style" => {
                    let inline = css::parse_declarations(attr.value.as_deref().unwrap_or_default());
                    for decl in filter_supported(inline, offset, self.diagnostics) {
                        merge_declaration(&mut style, decl);
                    }
                }
                "class" if !keep_classes => {}
                _ => out.push(attr.clone()),
            }
        }

        if !style.is_empty() {
            out.push(Attr {
                name: "style".to_string(),
                value: Some(css::serialize_declarations(style.values())),
            });
        }
        out
    }

    fn finish(mut self) -> String {
        if let Some(skip) = self.skip.take() {
            if skip.report_unclosed {
                self.diagnostics.push(
                    skip.offset,
                    format!("Unclosed <{}> removed through end of document", skip.name),
                );
            }
        }

        while let Some((name, offset)) = self.open_layout.pop() {
            self.diagnostics
                .push(offset, format!("Unclosed <{name}> closed at end of document"));
            self.out.push_str(LAYOUT_TABLE_CLOSE);
        }

        self.out
    }
}

fn render_attrs(attrs: &[Attr]) -> String {
    let mut out = String::new();
    for attr in attrs {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str =
        r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0"><tr><td"#;

    #[test]
    fn event_handler_is_removed_and_named() {
        let out = transform(r#"<div onclick="x()">Hi</div>"#);
        assert!(!out.data.contains("onclick"));
        assert!(out.errors.iter().any(|e| e.contains("onclick")));
        assert_eq!(out.data, format!("{TABLE}>Hi</td></tr></table>"));
    }

    #[test]
    fn script_is_removed_with_its_content() {
        let out = transform("<p>a</p><script>alert(1)</script><p>b</p>");
        assert_eq!(out.data, "<p>a</p><p>b</p>");
        assert_eq!(out.errors, vec!["Unsupported tag <script> removed"]);
    }

    #[test]
    fn javascript_href_is_neutralized() {
        let out = transform(r#"<a href="javascript:alert(1)">x</a>"#);
        assert_eq!(out.data, "<a>x</a>");
        assert_eq!(
            out.errors,
            vec!["Disallowed URI scheme `javascript:` in `href` attribute removed"]
        );
    }

    #[test]
    fn allowed_links_pass_through() {
        let html = r#"<a href="https://example.com/?a=1&amp;b=2">x</a><img src="/logo.png" alt="">"#;
        let out = transform(html);
        assert_eq!(out.data, html);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn iframe_object_and_embed_are_removed() {
        let out = transform(
            r#"<iframe src="https://x"><p>inner</p></iframe><object><object></object>fallback</object><embed src="a.swf">ok"#,
        );
        assert_eq!(out.data, "ok");
        assert_eq!(
            out.errors,
            vec![
                "Unsupported tag <iframe> removed",
                "Unsupported tag <object> removed",
                "Unsupported tag <embed> removed",
            ]
        );
    }

    #[test]
    fn style_rules_are_inlined_and_unsupported_css_dropped() {
        let out = transform(
            "<style>.box { color: red; position: absolute } p { margin: 0 }</style><div class=\"box\"><p style=\"color: blue; display: flex\">x</p></div>",
        );
        assert_eq!(
            out.data,
            format!("{TABLE} style=\"color: red\"><p style=\"margin: 0; color: blue\">x</p></td></tr></table>")
        );
        assert_eq!(
            out.errors,
            vec![
                "Unsupported CSS property `position` removed",
                "Unsupported CSS value `display: flex` removed",
            ]
        );
    }

    #[test]
    fn specificity_and_important_decide_inlined_values() {
        let out = transform(
            "<style>#hero { color: green } .lead { color: red !important } p { color: blue }</style><p id=\"hero\" class=\"lead\" style=\"color: black\">x</p>",
        );
        assert_eq!(out.data, "<p id=\"hero\" style=\"color: red !important\">x</p>");
    }

    #[test]
    fn media_queries_are_retained_and_classes_kept() {
        let out = transform(
            "<style>.col { width: 50% } @media (max-width: 600px) { .col { width: 100% } }</style><td class=\"col\">x</td>",
        );
        assert_eq!(
            out.data,
            "<style>@media (max-width: 600px) { .col { width: 100% } }</style><td class=\"col\" style=\"width: 50%\">x</td>"
        );
        assert!(out.errors.is_empty());
    }

    #[test]
    fn declarations_inside_media_blocks_are_filtered() {
        let out = transform(
            "<style>@media all { .a { position: fixed; color: red; background: url(javascript:alert(1)) } .b { float: left } }</style><p class=\"a\">x</p>",
        );
        assert_eq!(
            out.data,
            "<style>@media all { .a { color: red } }</style><p class=\"a\">x</p>"
        );
        assert_eq!(
            out.errors,
            vec![
                "Unsupported CSS property `position` removed",
                "Disallowed URI scheme `javascript:` in CSS `background` removed",
                "Unsupported CSS property `float` removed",
            ]
        );
    }

    #[test]
    fn emptied_media_blocks_and_unsafe_imports_are_dropped() {
        let out = transform(
            "<style>@import url(javascript:alert(1)); @import url(https://fonts.example.com/a.css); @media print { .a { position: fixed } }</style><p>x</p>",
        );
        assert_eq!(
            out.data,
            "<style>@import url(https://fonts.example.com/a.css);</style><p>x</p>"
        );
        assert_eq!(
            out.errors,
            vec![
                "Disallowed URI scheme `javascript:` in CSS `@import` removed",
                "Unsupported CSS property `position` removed",
            ]
        );
    }

    #[test]
    fn encoded_script_uris_are_removed() {
        for href in [
            "&#106;avascript:alert(1)",
            "javascript&#58;alert(1)",
            "javascript&colon;alert(1)",
        ] {
            let out = transform(&format!(r#"<a href="{href}">x</a>"#));
            assert_eq!(out.data, "<a>x</a>", "{href}");
            assert_eq!(
                out.errors,
                vec!["Disallowed URI scheme `javascript:` in `href` attribute removed"]
            );
        }
    }

    #[test]
    fn secondary_uri_attributes_are_checked() {
        let out = transform(
            r#"<button formaction="javascript:alert(1)">b</button><img srcset="/a.png 1x, data:image/png;base64,AA 2x" alt=""><blockquote cite="https://example.com/q">q</blockquote>"#,
        );
        assert_eq!(
            out.data,
            r#"<button>b</button><img alt=""><blockquote cite="https://example.com/q">q</blockquote>"#
        );
        assert_eq!(
            out.errors,
            vec![
                "Tag <button> is not supported by most email clients",
                "Disallowed URI scheme `javascript:` in `formaction` attribute removed",
                "Disallowed URI scheme `data:` in `srcset` attribute removed",
            ]
        );

        let svg = transform(r#"<svg><a xlink:href="JavaScript:x()">s</a></svg>"#);
        assert_eq!(svg.data, "<svg><a>s</a></svg>");
        assert!(svg
            .errors
            .contains(&"Disallowed URI scheme `javascript:` in `xlink:href` attribute removed".to_string()));
    }

    #[test]
    fn non_inlinable_selectors_stay_in_style_block() {
        let out = transform("<style>a:hover, a { color: red }</style><a href=\"#\">x</a>");
        assert_eq!(
            out.data,
            "<style>a:hover { color: red }</style><a href=\"#\" style=\"color: red\">x</a>"
        );
    }

    #[test]
    fn diagnostics_follow_document_order_of_first_occurrence() {
        let out = transform(
            r#"<p onload="a()">x</p><a href="data:x">y</a><style>.a { float: left }</style><p onload="b()">z</p>"#,
        );
        assert_eq!(
            out.errors,
            vec![
                "Event handler attribute `onload` removed",
                "Disallowed URI scheme `data:` in `href` attribute removed",
                "Unsupported CSS property `float` removed",
            ]
        );
    }

    #[test]
    fn stray_and_unclosed_layout_tags_degrade_gracefully() {
        let out = transform("</div><section><div>a</section>b<div>c");
        assert_eq!(
            out.data,
            format!(
                "{TABLE}>{TABLE}>a</td></tr></table></td></tr></table>b{TABLE}>c</td></tr></table>"
            )
        );
        assert_eq!(
            out.errors,
            vec![
                "Unmatched closing tag </div> removed",
                "Unclosed <div> closed before </section>",
                "Unclosed <div> closed at end of document",
            ]
        );
    }

    #[test]
    fn unsupported_tags_are_flagged_but_kept() {
        let out = transform("<form><input type=\"text\"></form>");
        assert_eq!(out.data, "<form><input type=\"text\"></form>");
        assert_eq!(
            out.errors,
            vec![
                "Tag <form> is not supported by most email clients",
                "Tag <input> is not supported by most email clients",
            ]
        );
    }

    #[test]
    fn malformed_input_never_aborts() {
        let out = transform("<p>ok<b>bold<div class=\"x");
        assert!(out.data.starts_with("<p>ok<b>bold"));
        assert!(out.errors.iter().any(|e| e.starts_with("Malformed markup")));
    }

    #[test]
    fn transform_is_deterministic() {
        let html = "<style>.a{color:red} @media x { .a { color: blue } }</style><div class=\"a\" onclick=\"x\"><script>1</script><a href=\"vbscript:x\">l</a></div>";
        assert_eq!(transform(html), transform(html));
    }

    #[test]
    fn comments_and_doctype_pass_through() {
        let html = "<!DOCTYPE html><!--[if mso]><table><![endif]--><p>x</p>";
        assert_eq!(transform(html).data, html);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = transform("");
        assert_eq!(out.data, "");
        assert!(out.errors.is_empty());
    }
}
