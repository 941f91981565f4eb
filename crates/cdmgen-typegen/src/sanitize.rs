//! Identifier and namespace sanitization.
//!
//! Reserved words follow C#, the language the generated declarations are
//! first rendered into; an escaped identifier is prefixed with `@`.

/// Prefix that turns a reserved word into a legal identifier.
pub const ESCAPE_MARKER: char = '@';

/// Reserved words, sorted for binary search.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.binary_search(&name).is_ok()
}

/// Prefix `name` with the escape marker if it is a reserved word.
pub fn escape_if_reserved(name: &str) -> String {
    if is_reserved(name) {
        format!("{ESCAPE_MARKER}{name}")
    } else {
        name.to_string()
    }
}

/// Prefix `name` with `_` if it equals the owning class name.
pub fn disambiguate_if_self_named(name: &str, owner: &str) -> String {
    if name == owner {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// Replace characters that cannot appear in an identifier with `_`.
///
/// A leading digit gets a `_` prefix, a leading escape marker is kept, and
/// an empty result becomes `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let (marker, body) = match raw.strip_prefix(ESCAPE_MARKER) {
        Some(rest) if !rest.is_empty() => (Some(ESCAPE_MARKER), rest),
        _ => (None, raw),
    };
    let mut out = String::with_capacity(raw.len() + 1);
    if let Some(marker) = marker {
        out.push(marker);
    }
    if body.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.push('_');
    }
    out.extend(
        body.chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' }),
    );
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Class name for an entity: sanitized, then escaped.
pub fn class_name(raw: &str) -> String {
    escape_if_reserved(&sanitize_identifier(raw))
}

/// Property name for an attribute of class `owner`.
///
/// Sanitizes, then either disambiguates against the owner (if it collides)
/// or escapes reserved words. Applying it to its own output is a no-op.
pub fn property_name(raw: &str, owner: &str) -> String {
    let sanitized = sanitize_identifier(raw);
    let owner = owner.strip_prefix(ESCAPE_MARKER).unwrap_or(owner);
    if sanitized == owner {
        disambiguate_if_self_named(&sanitized, owner)
    } else {
        escape_if_reserved(&sanitized)
    }
}

/// Turn a `/`-separated folder path into a dotted namespace.
///
/// Path separators become `.`, whitespace becomes `_`, and empty segments
/// (including leading and trailing dots) disappear.
pub fn sanitize_namespace(path: &str) -> String {
    let replaced: String = path
        .chars()
        .map(|c| match c {
            '/' | '\\' => '.',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    replaced
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Namespace for a folder chain given root-to-leaf.
pub fn namespace_for<S: AsRef<str>>(folders: &[S]) -> String {
    let joined = folders
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    sanitize_namespace(&joined)
}

/// Escape `&`, `<` and `>` for XML text and attribute content.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
