//! Name conversion: namespace URI → package identifier, and schema names →
//! Rust type and field identifiers.
//!
//! The package mapping follows the usual XML-binding convention: the host
//! name is reversed, path segments follow, and every segment is sanitized
//! into a lowercase identifier. `http://domainmodel.pts_fsm.org/2015/10/29/transportation`
//! becomes `org.pts_fsm.domainmodel._2015._10._29.transportation`.

/// Package used for schemas without a target namespace.
pub const DEFAULT_PACKAGE: &str = "generated";

/// Rust keywords (strict and reserved) that cannot be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Returns true if `s` is a Rust keyword.
#[must_use]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Converts a namespace URI into a dotted package identifier.
///
/// Only the `http` and `urn` schemes are stripped; any other scheme stays in
/// place and becomes the first segment. Returns an empty string when the URI
/// has no segments at all.
#[must_use]
pub fn uri_to_identifier(uri: &str) -> String {
    let mut rest = uri;
    let mut scheme = "";
    if let Some(idx) = uri.find(':') {
        scheme = &uri[..idx];
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("urn") {
            rest = &uri[idx + 1..];
        }
    }

    let mut tokens: Vec<String> = rest
        .split(['/', ':', ' '])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return String::new();
    }

    // Drop a trailing file extension ("schema.xsd" → "schema"). A single
    // token is a bare host name whose last dot must survive.
    if tokens.len() > 1 {
        if let Some(last) = tokens.last_mut() {
            if let Some(idx) = last.rfind('.') {
                if idx > 0 {
                    last.truncate(idx);
                }
            }
        }
    }

    let domain = tokens.remove(0);
    let separators: &[char] = if scheme == "urn" { &['.', '-'] } else { &['.'] };
    let mut host: Vec<String> = domain
        .split(separators)
        .filter(|s| !s.is_empty())
        .rev()
        .map(str::to_string)
        .collect();
    if host.last().is_some_and(|h| h.eq_ignore_ascii_case("www")) {
        host.pop();
    }
    host.extend(tokens);

    host.iter()
        .map(|token| sanitize_segment(token))
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns the package identifier for a target namespace, falling back to
/// [`DEFAULT_PACKAGE`] when the namespace yields no identifier.
#[must_use]
pub fn package_for_namespace(uri: &str) -> String {
    let identifier = uri_to_identifier(uri);
    if identifier.is_empty() {
        DEFAULT_PACKAGE.to_string()
    } else {
        identifier
    }
}

fn sanitize_segment(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 1);
    for (i, ch) in token.chars().enumerate() {
        if i == 0 && !is_ident_start(ch) {
            out.push('_');
        }
        if is_ident_part(ch) {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let lower = out.to_lowercase();
    if is_keyword(&lower) {
        format!("_{lower}")
    } else {
        lower
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Splits a schema name into words at separators and case boundaries.
fn words(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        if !is_ident_part(ch) || ch == '_' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => ch.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()),
            None => false,
        };
        if boundary && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev = Some(ch);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Converts a schema name into a PascalCase type identifier.
///
/// `"fare-travel_url"` → `"FareTravelUrl"`. Names starting with a digit get a
/// leading underscore; names with no usable characters become `"Unnamed"`.
#[must_use]
pub fn to_type_name(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for word in words(s) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        return "Unnamed".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    // `Self` is the only keyword that starts with an uppercase letter.
    if result == "Self" || is_keyword(&result) {
        result.push('_');
    }
    result
}

/// Converts a camelCase, PascalCase or hyphenated name into a snake_case
/// identifier. Keywords get a trailing underscore (`"type"` → `"type_"`).
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    if result.is_empty() {
        return "unnamed".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if is_keyword(&result) {
        result.push('_');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transportation_namespace() {
        assert_eq!(
            uri_to_identifier("http://domainmodel.pts_fsm.org/2015/10/29/transportation"),
            "org.pts_fsm.domainmodel._2015._10._29.transportation"
        );
    }

    #[test]
    fn leading_www_and_file_extension_are_dropped() {
        assert_eq!(
            uri_to_identifier("http://www.example.com/schemas/travel.xsd"),
            "com.example.schemas.travel"
        );
        assert_eq!(uri_to_identifier("http://www.example.com"), "com.example");
    }

    #[test]
    fn urn_host_splits_on_hyphen() {
        assert_eq!(
            uri_to_identifier("urn:st4rt-travel:messages"),
            "travel.st4rt.messages"
        );
    }

    #[test]
    fn other_schemes_are_kept() {
        assert_eq!(
            uri_to_identifier("https://example.org/x"),
            "https.example_org.x"
        );
    }

    #[test]
    fn keywords_are_prefixed() {
        assert_eq!(uri_to_identifier("http://example.org/type/impl"), "org.example._type._impl");
    }

    #[test]
    fn empty_namespace_uses_default_package() {
        assert_eq!(uri_to_identifier(""), "");
        assert_eq!(package_for_namespace(""), DEFAULT_PACKAGE);
    }

    #[test]
    fn type_names() {
        assert_eq!(to_type_name("travel"), "Travel");
        assert_eq!(to_type_name("fare-travel_url"), "FareTravelUrl");
        assert_eq!(to_type_name("fareTravelUrl"), "FareTravelUrl");
        assert_eq!(to_type_name("2ndLeg"), "_2ndLeg");
        assert_eq!(to_type_name("--"), "Unnamed");
        assert_eq!(to_type_name("self"), "Self_");
        assert_eq!(to_type_name("selfService"), "SelfService");
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("fareTravelUrl"), "fare_travel_url");
        assert_eq!(to_snake_case("FareTravel"), "fare_travel");
        assert_eq!(to_snake_case("arrival-time"), "arrival_time");
        assert_eq!(to_snake_case("type"), "type_");
        assert_eq!(to_snake_case("ID"), "id");
    }

    proptest! {
        #[test]
        fn identifiers_are_lowercase_dotted_segments(uri in "(http|urn):[a-z0-9./:-]{0,40}") {
            let id = uri_to_identifier(&uri);
            for segment in id.split('.').filter(|s| !s.is_empty()) {
                prop_assert!(segment.chars().all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '_'));
                prop_assert!(!segment.starts_with(|c: char| c.is_ascii_digit()));
            }
        }

        #[test]
        fn snake_case_is_stable(name in "[a-zA-Z][a-zA-Z0-9_-]{0,20}") {
            let once = to_snake_case(&name);
            prop_assert_eq!(to_snake_case(&once), once);
        }
    }
}
