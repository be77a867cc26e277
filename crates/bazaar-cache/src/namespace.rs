//! Key namespacing.

/// Maps caller keys to the keys stored in Redis.
///
/// Every key is stored under `prefix`, and patterns only ever match inside
/// that namespace. Glob metacharacters in the prefix are escaped so a
/// prefix like `shop[1]:` matches literally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: String,
}

impl KeyNamespace {
    /// Create a namespace for the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if keys are stored unprefixed.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Stored key for a caller key.
    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Caller key for a stored key.
    ///
    /// Keys that do not carry the prefix are returned unchanged.
    pub fn strip<'a>(&self, stored: &'a str) -> &'a str {
        stored.strip_prefix(self.prefix.as_str()).unwrap_or(stored)
    }

    /// Glob pattern matching caller keys that match `pattern`.
    pub fn pattern(&self, pattern: &str) -> String {
        format!("{}{}", escape_glob(&self.prefix), pattern)
    }

    /// Glob pattern matching every key in the namespace.
    pub fn everything(&self) -> String {
        self.pattern("*")
    }
}

/// Escapes the characters Redis treats specially in glob patterns.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
