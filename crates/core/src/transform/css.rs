//! Minimal CSS handling for email rewriting.
//!
//! Only what the inliner needs: split a stylesheet into rules and at-rule
//! blocks, parse declaration lists, match simple selectors, and decide whether
//! a declaration or at-rule is safe for email clients.

use super::uri::{check_uri, UriVerdict};

/// Properties (exact names) that render reliably across email clients.
const SUPPORTED_PROPERTIES: &[&str] = &[
    "color",
    "width",
    "height",
    "max-width",
    "min-width",
    "max-height",
    "min-height",
    "line-height",
    "letter-spacing",
    "word-spacing",
    "white-space",
    "vertical-align",
    "direction",
    "display",
    "table-layout",
    "caption-side",
    "empty-cells",
    "overflow",
    "visibility",
    "word-break",
    "word-wrap",
    "overflow-wrap",
    "text-size-adjust",
    "-webkit-text-size-adjust",
    "-ms-text-size-adjust",
];

/// Property families accepted by prefix (`border-*`, `font-*`, Outlook `mso-*`, ...).
const SUPPORTED_PREFIXES: &[&str] = &[
    "background",
    "border",
    "margin",
    "padding",
    "font",
    "text-",
    "list-style",
    "mso-",
];

/// At-rules whose body is a list of rules rather than declarations.
const GROUP_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "-moz-document",
    "container",
    "layer",
    "scope",
];

/// `display` values that email clients do not lay out.
const UNSUPPORTED_DISPLAY_VALUES: &[&str] = &["flex", "inline-flex", "grid", "inline-grid"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    fn render(&self) -> String {
        if self.important {
            format!("{}: {} !important", self.property, self.value)
        } else {
            format!("{}: {}", self.property, self.value)
        }
    }
}

/// Outcome of checking one declaration against the email-safe rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationVerdict {
    Supported,
    UnsupportedProperty,
    UnsupportedValue,
    DisallowedUri(String),
}

/// A top-level block in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssBlock {
    Rule { selectors: String, body: String },
    /// `@media`, `@supports`, ... with their nested blocks parsed.
    Group { prelude: String, blocks: Vec<CssBlock> },
    /// `@font-face`, `@import`, `@keyframes`, ... kept verbatim.
    AtRule(String),
}

/// A selector the inliner can apply: `tag`, `.class`, `#id` or a compound of
/// those without combinators or pseudo-classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
}

impl SimpleSelector {
    pub fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty()
            || selector
                .chars()
                .any(|c| c.is_whitespace() || ">+~:[]*()\\".contains(c))
        {
            return None;
        }

        let mut tag = None;
        let mut classes = Vec::new();
        let mut id = None;

        let first_marker = selector.find(['.', '#']).unwrap_or(selector.len());
        if first_marker > 0 {
            tag = Some(selector[..first_marker].to_ascii_lowercase());
        }

        let mut rest = &selector[first_marker..];
        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let end = rest[1..].find(['.', '#']).map(|e| e + 1).unwrap_or(rest.len());
            let name = &rest[1..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                b'.' => classes.push(name.to_string()),
                _ if id.is_none() => id = Some(name.to_string()),
                _ => return None,
            }
            rest = &rest[end..];
        }

        Some(Self { tag, classes, id })
    }

    /// `(ids, classes, tags)` specificity triple.
    pub fn specificity(&self) -> (u32, u32, u32) {
        (
            u32::from(self.id.is_some()),
            self.classes.len() as u32,
            u32::from(self.tag.is_some()),
        )
    }

    pub fn matches(&self, tag: &str, classes: &[&str], id: Option<&str>) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if self.id.is_some() && self.id.as_deref() != id {
            return false;
        }
        self.classes.iter().all(|c| classes.contains(&c.as_str()))
    }
}

/// Split a stylesheet into top-level blocks. Returns the blocks and whether
/// any malformed trailing input had to be discarded.
pub fn parse_stylesheet(css: &str) -> (Vec<CssBlock>, bool) {
    let css = strip_comments(css);
    let bytes = css.as_bytes();
    let mut blocks = Vec::new();
    let mut i = 0usize;
    let mut malformed = false;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let open = find_outside_quotes(&css, i, b'{');
        if bytes[i] == b'@' {
            let semi = find_outside_quotes(&css, i, b';');
            match (open, semi) {
                (Some(o), Some(s)) if s < o => {
                    blocks.push(CssBlock::AtRule(css[i..=s].trim().to_string()));
                    i = s + 1;
                }
                (Some(o), _) => {
                    let (body_end, next) = match matching_brace(&css, o) {
                        Some(close) => (close, close + 1),
                        None => {
                            malformed = true;
                            (css.len(), css.len())
                        }
                    };
                    if GROUP_AT_RULES.contains(&at_rule_name(&css[i..]).as_str()) {
                        let (inner, inner_malformed) = parse_stylesheet(&css[o + 1..body_end]);
                        malformed |= inner_malformed;
                        blocks.push(CssBlock::Group {
                            prelude: css[i..o].trim().to_string(),
                            blocks: inner,
                        });
                    } else {
                        blocks.push(CssBlock::AtRule(css[i..next].trim().to_string()));
                    }
                    i = next;
                }
                (None, Some(s)) => {
                    blocks.push(CssBlock::AtRule(css[i..=s].trim().to_string()));
                    i = s + 1;
                }
                (None, None) => {
                    malformed = true;
                    break;
                }
            }
            continue;
        }

        let Some(o) = open else {
            malformed = true;
            break;
        };
        let (body_end, next) = match matching_brace(&css, o) {
            Some(close) => (close, close + 1),
            None => {
                malformed = true;
                (css.len(), css.len())
            }
        };
        blocks.push(CssBlock::Rule {
            selectors: css[i..o].trim().to_string(),
            body: css[o + 1..body_end].to_string(),
        });
        i = next;
    }

    (blocks, malformed)
}

/// Parse a declaration list (`a: b; c: d !important`).
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    split_top_level(text, b';')
        .into_iter()
        .filter_map(|chunk| {
            let (property, value) = chunk.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let mut value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }

            let mut important = false;
            let lower = value.to_ascii_lowercase();
            if let Some(pos) = lower.rfind("!important") {
                if lower[pos + "!important".len()..].trim().is_empty() {
                    important = true;
                    value = value[..pos].trim_end();
                }
            }

            Some(Declaration {
                property,
                value: value.to_string(),
                important,
            })
        })
        .collect()
}

/// Render declarations back into a `style` attribute value.
pub fn serialize_declarations<'a>(decls: impl IntoIterator<Item = &'a Declaration>) -> String {
    decls
        .into_iter()
        .map(Declaration::render)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Split a selector list on top-level commas.
pub fn split_selectors(selectors: &str) -> Vec<String> {
    split_top_level(selectors, b',')
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn check_declaration(decl: &Declaration) -> DeclarationVerdict {
    let property = decl.property.as_str();
    let supported = SUPPORTED_PROPERTIES.contains(&property)
        || SUPPORTED_PREFIXES.iter().any(|p| property.starts_with(p));
    if !supported {
        return DeclarationVerdict::UnsupportedProperty;
    }

    let value = decl.value.to_ascii_lowercase();
    if property == "display" && UNSUPPORTED_DISPLAY_VALUES.contains(&value.trim()) {
        return DeclarationVerdict::UnsupportedValue;
    }
    if value.contains("expression(") {
        return DeclarationVerdict::UnsupportedValue;
    }

    for url in extract_urls(&decl.value) {
        if let UriVerdict::Disallowed(scheme) = check_uri(&url) {
            return DeclarationVerdict::DisallowedUri(scheme);
        }
    }

    DeclarationVerdict::Supported
}

/// Lowercased name of the at-rule `text` starts with, without the `@`.
pub fn at_rule_name(text: &str) -> String {
    text.trim_start()
        .trim_start_matches('@')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Check the URIs an at-rule references: every `url(...)` plus the quoted
/// target of `@import "..."`.
pub fn check_at_rule(text: &str) -> UriVerdict {
    let mut urls = extract_urls(text);
    if at_rule_name(text) == "import" {
        let target = text.trim_start()["@import".len()..].trim_start();
        if let Some(quote) = target.chars().next().filter(|c| matches!(*c, '"' | '\'')) {
            if let Some(end) = target[1..].find(quote) {
                urls.push(target[1..1 + end].to_string());
            }
        }
    }

    urls.iter()
        .map(|url| check_uri(url))
        .find(|verdict| matches!(verdict, UriVerdict::Disallowed(_)))
        .unwrap_or(UriVerdict::Allowed)
}

/// Pull the targets out of every `url(...)` in a value.
fn extract_urls(value: &str) -> Vec<String> {
    let lower = value.to_ascii_lowercase();
    let mut urls = Vec::new();
    let mut from = 0usize;

    while let Some(rel) = lower[from..].find("url(") {
        let start = from + rel + 4;
        let Some(end) = lower[start..].find(')') else {
            break;
        };
        let raw = value[start..start + end]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'');
        urls.push(raw.to_string());
        from = start + end + 1;
    }

    urls
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn find_outside_quotes(css: &str, from: usize, needle: u8) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in css.as_bytes().iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == needle => return Some(i),
            None => {}
        }
    }
    None
}

fn matching_brace(css: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, &b) in css.as_bytes().iter().enumerate().skip(open) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Split on `sep` where it is outside quotes and parentheses.
fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0usize;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ if b == sep && depth == 0 => {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_rules_and_at_rules() {
        let (blocks, malformed) = parse_stylesheet(
            "/* c */ .btn { color: red; } @media (max-width: 600px) { .col { width: 100%; } } p{margin:0}",
        );
        assert!(!malformed);
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            CssBlock::Rule {
                selectors: ".btn".into(),
                body: " color: red; ".into()
            }
        );
        assert_matches!(
            &blocks[1],
            CssBlock::Group { prelude, blocks } if prelude == "@media (max-width: 600px)" && blocks.len() == 1
        );
    }

    #[test]
    fn group_at_rules_nest_and_others_stay_verbatim() {
        let (blocks, malformed) = parse_stylesheet(
            "@import url(a.css); @supports (display: grid) { @media print { p { color: red } } } @font-face { font-family: X; src: url(x.woff) }",
        );
        assert!(!malformed);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], CssBlock::AtRule("@import url(a.css);".into()));
        assert_matches!(
            &blocks[1],
            CssBlock::Group { blocks, .. } if matches!(&blocks[..], [CssBlock::Group { prelude, .. }] if prelude == "@media print")
        );
        assert_matches!(&blocks[2], CssBlock::AtRule(s) if s.starts_with("@font-face") && s.ends_with('}'));
    }

    #[test]
    fn unterminated_group_is_flagged() {
        let (blocks, malformed) = parse_stylesheet("@media all { .a { color: red }");
        assert!(malformed);
        assert_matches!(&blocks[..], [CssBlock::Group { blocks, .. }] if blocks.len() == 1);
    }

    #[test]
    fn at_rule_uris_are_checked() {
        assert_eq!(check_at_rule("@import url(https://x/a.css);"), UriVerdict::Allowed);
        assert_eq!(check_at_rule("@import 'theme.css' screen;"), UriVerdict::Allowed);
        assert_eq!(
            check_at_rule("@IMPORT url(javascript:alert(1));"),
            UriVerdict::Disallowed("javascript".into())
        );
        assert_eq!(
            check_at_rule("@import \"data:text/css,p{}\";"),
            UriVerdict::Disallowed("data".into())
        );
        assert_eq!(
            check_at_rule("@font-face { src: url(vbscript:x) }"),
            UriVerdict::Disallowed("vbscript".into())
        );
    }

    #[test]
    fn unterminated_rule_is_flagged() {
        let (blocks, malformed) = parse_stylesheet(".a { color: red");
        assert!(malformed);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn declarations_respect_parentheses_and_important() {
        let decls = parse_declarations(
            "background: url('a;b.png') no-repeat; COLOR: Blue !IMPORTANT; junk",
        );
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url('a;b.png') no-repeat");
        assert_eq!(decls[1].property, "color");
        assert_eq!(decls[1].value, "Blue");
        assert!(decls[1].important);
    }

    #[test]
    fn simple_selectors_parse_and_match() {
        let sel = SimpleSelector::parse("td.cell.wide").unwrap();
        assert_eq!(sel.specificity(), (0, 2, 1));
        assert!(sel.matches("td", &["wide", "cell", "x"], None));
        assert!(!sel.matches("th", &["wide", "cell"], None));

        let id = SimpleSelector::parse("#hero").unwrap();
        assert!(id.matches("div", &[], Some("hero")));

        assert!(SimpleSelector::parse("a:hover").is_none());
        assert!(SimpleSelector::parse("table td").is_none());
        assert!(SimpleSelector::parse(".").is_none());
    }

    #[test]
    fn flags_unsupported_properties_and_values() {
        let d = |p: &str, v: &str| Declaration {
            property: p.into(),
            value: v.into(),
            important: false,
        };
        assert_eq!(check_declaration(&d("padding-left", "4px")), DeclarationVerdict::Supported);
        assert_eq!(check_declaration(&d("position", "absolute")), DeclarationVerdict::UnsupportedProperty);
        assert_eq!(check_declaration(&d("display", "flex")), DeclarationVerdict::UnsupportedValue);
        assert_eq!(
            check_declaration(&d("background-image", "url(javascript:alert(1))")),
            DeclarationVerdict::DisallowedUri("javascript".into())
        );
    }
}
