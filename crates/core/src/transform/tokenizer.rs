//! Lenient HTML tokenizer.
//!
//! Splits markup into a flat token stream without building a tree. The
//! tokenizer never fails: anything it cannot make sense of is emitted as text
//! and recorded as a malformed-markup note so the engine can report it.

/// Elements whose body is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A single parsed attribute. `value` is `None` for bare attributes (`disabled`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!DOCTYPE …>`, `<![CDATA[…]]>`, `<?xml …?>` kept verbatim.
    Declaration(String),
    /// Inner text of `<!-- … -->`.
    Comment(String),
    StartTag {
        name: String,
        attrs: Vec<Attr>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    /// Body of a `script` or `style` element.
    RawText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte offset of the token in the source.
    pub offset: usize,
    pub kind: TokenKind,
}

/// Tokenizer output: the token stream plus notes about malformed markup.
#[derive(Debug, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub malformed: Vec<(usize, String)>,
}

impl Tokenized {
    fn push(&mut self, offset: usize, kind: TokenKind) {
        self.tokens.push(Token { offset, kind });
    }

    fn push_text(&mut self, input: &str, start: usize, end: usize) {
        if end > start {
            self.push(start, TokenKind::Text(input[start..end].to_string()));
        }
    }

    fn note(&mut self, offset: usize, message: impl Into<String>) {
        self.malformed.push((offset, message.into()));
    }
}

/// Tokenize `input` into a flat stream of [`Token`]s.
pub fn tokenize(input: &str) -> Tokenized {
    let mut out = Tokenized::default();
    let bytes = input.as_bytes();
    let mut text_start = 0usize;
    let mut i = 0usize;

    while let Some(rel) = input[i..].find('<') {
        let lt = i + rel;
        let rest = &input[lt..];
        let next = bytes.get(lt + 1).copied();

        if rest.starts_with("<!--") {
            out.push_text(input, text_start, lt);
            match input[lt + 4..].find("-->") {
                Some(end) => {
                    let body_end = lt + 4 + end;
                    out.push(lt, TokenKind::Comment(input[lt + 4..body_end].to_string()));
                    i = body_end + 3;
                }
                None => {
                    out.note(lt, "Unterminated comment");
                    out.push(lt, TokenKind::Comment(input[lt + 4..].to_string()));
                    i = input.len();
                }
            }
            text_start = i;
            continue;
        }

        if matches!(next, Some(b'!') | Some(b'?')) {
            out.push_text(input, text_start, lt);
            match input[lt..].find('>') {
                Some(end) => {
                    let decl_end = lt + end + 1;
                    out.push(lt, TokenKind::Declaration(input[lt..decl_end].to_string()));
                    i = decl_end;
                }
                None => {
                    out.note(lt, "Unterminated declaration");
                    out.push_text(input, lt, input.len());
                    i = input.len();
                }
            }
            text_start = i;
            continue;
        }

        if next == Some(b'/') && bytes.get(lt + 2).is_some_and(u8::is_ascii_alphabetic) {
            out.push_text(input, text_start, lt);
            match input[lt..].find('>') {
                Some(end) => {
                    let inside = &input[lt + 2..lt + end];
                    let name = tag_name(inside);
                    out.push(lt, TokenKind::EndTag { name });
                    i = lt + end + 1;
                }
                None => {
                    out.note(lt, "Unterminated closing tag");
                    out.push_text(input, lt, input.len());
                    i = input.len();
                }
            }
            text_start = i;
            continue;
        }

        if next.is_some_and(|b| b.is_ascii_alphabetic()) {
            out.push_text(input, text_start, lt);
            let gt = match find_tag_end(input, lt) {
                Some(gt) => gt,
                None => match input[lt..].find('>') {
                    Some(end) => {
                        out.note(lt, "Unbalanced quote in tag");
                        lt + end
                    }
                    None => {
                        out.note(lt, "Unterminated tag");
                        out.push_text(input, lt, input.len());
                        i = input.len();
                        text_start = i;
                        break;
                    }
                },
            };

            let (raw_name, raw_attrs, self_closing) = split_start_tag(&input[lt + 1..gt]);
            let name = raw_name.to_ascii_lowercase();
            let attrs = parse_attributes(raw_attrs);
            let is_raw = RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing;
            out.push(
                lt,
                TokenKind::StartTag {
                    name: name.clone(),
                    attrs,
                    self_closing,
                },
            );
            i = gt + 1;

            if is_raw {
                i = consume_raw_text(input, i, &name, &mut out);
            }
            text_start = i;
            continue;
        }

        // A bare `<` that does not open a tag is ordinary text.
        i = lt + 1;
    }

    out.push_text(input, text_start, input.len());
    out
}

/// Consume the body of a raw-text element starting at `start` and the matching
/// close tag. Returns the index just past the close tag.
fn consume_raw_text(input: &str, start: usize, name: &str, out: &mut Tokenized) -> usize {
    let needle = format!("</{name}");
    let lower = input[start..].to_ascii_lowercase();

    match lower.find(&needle) {
        Some(rel) => {
            let close = start + rel;
            if close > start {
                out.push(start, TokenKind::RawText(input[start..close].to_string()));
            }
            let end = input[close..]
                .find('>')
                .map(|e| close + e + 1)
                .unwrap_or(input.len());
            out.push(
                close,
                TokenKind::EndTag {
                    name: name.to_string(),
                },
            );
            end
        }
        None => {
            out.note(start, format!("Unclosed <{name}> element"));
            if start < input.len() {
                out.push(start, TokenKind::RawText(input[start..].to_string()));
            }
            input.len()
        }
    }
}

fn tag_name(inside: &str) -> String {
    inside
        .split(|c: char| c.is_ascii_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn split_start_tag(inside: &str) -> (&str, &str, bool) {
    let trimmed = inside.trim();
    let self_closing = trimmed.ends_with('/');
    let core = if self_closing {
        trimmed[..trimmed.len() - 1].trim_end()
    } else {
        trimmed
    };

    let name_end = core
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace() || *ch == '/')
        .map(|(idx, _)| idx)
        .unwrap_or(core.len());

    (&core[..name_end], core[name_end..].trim_start(), self_closing)
}

fn parse_attributes(input: &str) -> Vec<Attr> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if i == name_start {
            i += 1;
            continue;
        }
        let name = input[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            out.push(Attr { name, value: None });
            continue;
        }

        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            out.push(Attr {
                name,
                value: Some(String::new()),
            });
            break;
        }

        let value = if bytes[i] == b'"' || bytes[i] == b'\'' {
            let quote = bytes[i];
            i += 1;
            let val_start = i;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            let v = input[val_start..i].to_string();
            if i < bytes.len() {
                i += 1;
            }
            v
        } else {
            let val_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            input[val_start..i].to_string()
        };

        out.push(Attr {
            name,
            value: Some(value),
        });
    }

    out
}

/// Find the `>` closing the tag opened at `lt_idx`, skipping quoted values.
fn find_tag_end(input: &str, lt_idx: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate().skip(lt_idx + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }

    None
}
