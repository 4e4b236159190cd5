//! URI scheme allow-listing for `href`/`src`-style attributes.

/// Schemes allowed in links and resource references.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp"];

/// Attributes whose values are URIs.
pub const URI_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "background",
    "poster",
    "cite",
    "longdesc",
    "xlink:href",
];

/// Attributes holding a comma-separated list of `url descriptor` candidates.
pub const URI_LIST_ATTRIBUTES: &[&str] = &["srcset"];

/// Named character references that can spell out a scheme or its delimiter.
const NAMED_REFS: &[(&str, char)] = &[
    ("colon;", ':'),
    ("Tab;", '\t'),
    ("NewLine;", '\n'),
    ("sol;", '/'),
    ("quest;", '?'),
    ("num;", '#'),
    ("period;", '.'),
    ("plus;", '+'),
    ("hyphen;", '-'),
    ("amp;", '&'),
    ("amp", '&'),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriVerdict {
    Allowed,
    Disallowed(String),
}

/// Check a URI against [`ALLOWED_SCHEMES`]. Relative references (no scheme)
/// are allowed.
///
/// Character references are decoded first and whitespace and control
/// characters are ignored while looking for the scheme, since browsers do the
/// same (`java&#9;script:`, `&#106;avascript:`, `javascript&colon;`).
pub fn check_uri(value: &str) -> UriVerdict {
    let compact: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let Some(colon) = compact.find(':') else {
        return UriVerdict::Allowed;
    };
    if compact[..colon].contains(['/', '?', '#']) {
        return UriVerdict::Allowed;
    }

    let scheme = compact[..colon].to_ascii_lowercase();
    let looks_like_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if !looks_like_scheme || ALLOWED_SCHEMES.contains(&scheme.as_str()) {
        UriVerdict::Allowed
    } else {
        UriVerdict::Disallowed(scheme)
    }
}

/// Check every candidate URL of a `srcset` value. The first disallowed
/// candidate decides.
pub fn check_uri_list(value: &str) -> UriVerdict {
    decode_char_refs(value)
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .map(check_uri)
        .find(|verdict| matches!(verdict, UriVerdict::Disallowed(_)))
        .unwrap_or(UriVerdict::Allowed)
}

/// Decode numeric (`&#106;`, `&#x6A;`) and the scheme-relevant named
/// character references. The trailing `;` of numeric references is optional.
/// Unknown references are kept as written.
fn decode_char_refs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        match decode_one(rest) {
            Some((ch, used)) => {
                out.push(ch);
                rest = &rest[used..];
            }
            None => out.push('&'),
        }
    }

    out.push_str(rest);
    out
}

/// Decode the reference at the start of `s` (just past the `&`). Returns the
/// character and the number of bytes consumed.
fn decode_one(s: &str) -> Option<(char, usize)> {
    if let Some(numeric) = s.strip_prefix('#') {
        let (digits, radix, prefix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let ch = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((ch, prefix + len + semicolon));
    }

    NAMED_REFS
        .iter()
        .find(|(name, _)| s.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_listed_schemes_and_relative_paths() {
        for uri in [
            "https://example.com",
            "HTTP://example.com",
            "mailto:a@b.c",
            "tel:+100",
            "ftp://files",
            "/images/logo.png",
            "#top",
            "page.html?x=a:b",
            "https://example.com/?a=1&amp;b=2",
            "&#104;ttps://example.com",
            "",
        ] {
            assert_eq!(check_uri(uri), UriVerdict::Allowed, "{uri}");
        }
    }

    #[test]
    fn rejects_script_and_data_schemes() {
        assert_eq!(
            check_uri("javascript:alert(1)"),
            UriVerdict::Disallowed("javascript".into())
        );
        assert_eq!(
            check_uri(" java\tscript:alert(1)"),
            UriVerdict::Disallowed("javascript".into())
        );
        assert_eq!(
            check_uri("data:text/html;base64,AAAA"),
            UriVerdict::Disallowed("data".into())
        );
    }

    #[test]
    fn character_references_are_decoded_before_the_scheme_check() {
        for uri in [
            "&#106;avascript:alert(1)",
            "&#0000106avascript:alert(1)",
            "&#x6A;avascript:alert(1)",
            "&#X6a;avascript:alert(1)",
            "javascript&#58;alert(1)",
            "javascript&#x3a;alert(1)",
            "javascript&colon;alert(1)",
            "java&Tab;script:alert(1)",
            "java&NewLine;script:alert(1)",
            "java&#9;script:alert(1)",
        ] {
            assert_eq!(
                check_uri(uri),
                UriVerdict::Disallowed("javascript".into()),
                "{uri}"
            );
        }
    }

    #[test]
    fn unknown_or_double_escaped_references_stay_literal() {
        assert_eq!(decode_char_refs("a&unknown;b"), "a&unknown;b");
        assert_eq!(decode_char_refs("&amp;#106;"), "&#106;");
        assert_eq!(decode_char_refs("&#;&#x;"), "&#;&#x;");
        assert_eq!(decode_char_refs("&#99999999999;"), "\u{FFFD}");
    }

    #[test]
    fn srcset_candidates_are_checked_individually() {
        assert_eq!(
            check_uri_list("/a.png 1x, https://cdn.example.com/a@2x.png 2x"),
            UriVerdict::Allowed
        );
        assert_eq!(
            check_uri_list("/a.png 1x, javascript:alert(1) 2x"),
            UriVerdict::Disallowed("javascript".into())
        );
        assert_eq!(
            check_uri_list("data:image/png;base64,AAAA 1x"),
            UriVerdict::Disallowed("data".into())
        );
    }
}
