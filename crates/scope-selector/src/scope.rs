//! Scope names and the ordered scope paths selectors are evaluated against.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A single dot-delimited scope name such as `keyword.control.js`.
///
/// The empty name has no segments and therefore matches no selector atom.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeName(String);

impl ScopeName {
    /// Wrap a scope name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the dot-separated segments of the name.
    ///
    /// # Examples
    /// ```
    /// use scope_selector::ScopeName;
    /// let name = ScopeName::from("source.js.embedded");
    /// assert_eq!(name.segments().collect::<Vec<_>>(), ["source", "js", "embedded"]);
    /// assert_eq!(ScopeName::default().segments().count(), 0);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let mut parts = self.0.split('.');
        if self.0.is_empty() {
            // `"".split('.')` would yield one empty segment.
            parts.next();
        }
        parts
    }
}

impl From<&str> for ScopeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScopeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ScopeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scopes enclosing a document position, ordered outermost to innermost.
///
/// # Examples
/// ```
/// use scope_selector::ScopePath;
/// let path: ScopePath = "text.html.basic source.js.embedded.html".parse()
///     .unwrap_or_default();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.innermost().map(|s| s.as_str()), Some("source.js.embedded.html"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath {
    scopes: Vec<ScopeName>,
}

impl ScopePath {
    /// Create an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Build a path from the space-separated form editors report for an
    /// offset, e.g. `"text.html.basic source.js.embedded.html"`.
    #[must_use]
    pub fn from_space_separated(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    /// Borrow the scopes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ScopeName] {
        &self.scopes
    }

    /// Number of scopes in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the path holds no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The innermost (most specific) scope, if any.
    #[must_use]
    pub fn innermost(&self) -> Option<&ScopeName> {
        self.scopes.last()
    }

    /// Iterate over the scopes from outermost to innermost.
    pub fn iter(&self) -> std::slice::Iter<'_, ScopeName> {
        self.scopes.iter()
    }
}

impl<S: Into<ScopeName>> FromIterator<S> for ScopePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<ScopeName>> From<Vec<S>> for ScopePath {
    fn from(scopes: Vec<S>) -> Self {
        scopes.into_iter().collect()
    }
}

impl<S: Into<ScopeName>, const N: usize> From<[S; N]> for ScopePath {
    fn from(scopes: [S; N]) -> Self {
        scopes.into_iter().collect()
    }
}

impl FromStr for ScopePath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_space_separated(s))
    }
}

impl<'a> IntoIterator for &'a ScopePath {
    type Item = &'a ScopeName;
    type IntoIter = std::slice::Iter<'a, ScopeName>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.iter()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, scope) in self.scopes.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(scope.as_str())?;
        }
        Ok(())
    }
}
