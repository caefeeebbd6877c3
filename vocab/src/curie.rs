//! Compact URIs: `prefix:reference`, bare `reference`, and the bracketed
//! safe form `[prefix:reference]` used by RDFa.

use std::fmt;
use std::str::FromStr;

use crate::error::VocabularyError;

/// A compact URI: an optional prefix and a non-empty reference.
///
/// A prefix, when present, is non-empty and never contains `:`. A CURIE
/// without prefix is resolved against the default vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Curie {
    prefix: Option<String>,
    reference: String,
}

impl Curie {
    /// Creates a CURIE from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::InvalidPrefix`] if the prefix is empty or
    /// contains `:`, `[` or `]`; [`VocabularyError::EmptyReference`] if
    /// `reference` is empty; and [`VocabularyError::InvalidReference`] if it
    /// contains `[` or `]`.
    pub fn new(prefix: Option<&str>, reference: &str) -> Result<Self, VocabularyError> {
        if let Some(prefix) = prefix {
            if prefix.is_empty() || prefix.contains([':', '[', ']']) {
                return Err(VocabularyError::InvalidPrefix(prefix.to_owned()));
            }
        }
        check_reference(reference)?;
        Ok(Self::new_unchecked(
            prefix.map(str::to_owned),
            reference.to_owned(),
        ))
    }

    /// Builds a CURIE from parts the caller has already validated.
    pub(crate) fn new_unchecked(prefix: Option<String>, reference: String) -> Self {
        debug_assert!(prefix
            .as_deref()
            .map_or(true, |p| !p.is_empty() && !p.contains([':', '[', ']'])));
        debug_assert!(check_reference(&reference).is_ok());
        Self { prefix, reference }
    }

    /// Parses CURIE text.
    ///
    /// With `allow_safe`, a `[...]` wrapper is stripped first; without it a
    /// bracket anywhere is an error. The text is split on its first `:`; an
    /// empty string before the colon means the CURIE has no prefix.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::MalformedCurie`] for unbalanced, nested or
    /// disallowed brackets and for an empty reference.
    pub fn parse(text: &str, allow_safe: bool) -> Result<Self, VocabularyError> {
        let malformed = |reason| VocabularyError::MalformedCurie {
            text: text.to_owned(),
            reason,
        };

        let (body, wrapped) = match text.strip_prefix('[') {
            Some(_) if !allow_safe => return Err(malformed("safe CURIE syntax is not allowed")),
            Some(inner) => (
                inner
                    .strip_suffix(']')
                    .ok_or_else(|| malformed("unbalanced brackets"))?,
                true,
            ),
            None => (text, false),
        };
        if body.contains(['[', ']']) {
            return Err(malformed(if wrapped {
                "nested brackets"
            } else {
                "unbalanced brackets"
            }));
        }

        let (prefix, reference) = match body.split_once(':') {
            Some(("", reference)) => (None, reference),
            Some((prefix, reference)) => (Some(prefix), reference),
            None => (None, body),
        };
        if reference.is_empty() {
            return Err(malformed("empty reference"));
        }
        Ok(Self::new_unchecked(
            prefix.map(str::to_owned),
            reference.to_owned(),
        ))
    }

    /// Formats CURIE parts without building a [`Curie`].
    ///
    /// An unprefixed reference that itself contains `:` is written with a
    /// leading colon so that it parses back without a prefix.
    #[must_use]
    pub fn format(prefix: Option<&str>, reference: &str, safe: bool) -> String {
        let mut out = String::with_capacity(
            reference.len() + prefix.map_or(0, str::len) + if safe { 3 } else { 1 },
        );
        if safe {
            out.push('[');
        }
        match prefix {
            Some(prefix) => {
                out.push_str(prefix);
                out.push(':');
            }
            None if reference.contains(':') => out.push(':'),
            None => {}
        }
        out.push_str(reference);
        if safe {
            out.push(']');
        }
        out
    }

    /// The prefix, or `None` for a CURIE in the default vocabulary.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The reference, i.e. the local name within the prefix's vocabulary.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the textual form, bracketed when `safe`.
    #[must_use]
    pub fn to_text(&self, safe: bool) -> String {
        Self::format(self.prefix(), &self.reference, safe)
    }

    /// Returns a CURIE with the same prefix and a transformed reference.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::EmptyReference`] if `f` produces an empty
    /// reference, or [`VocabularyError::InvalidReference`] if it produces one
    /// with brackets.
    pub fn map_reference<F>(&self, f: F) -> Result<Self, VocabularyError>
    where
        F: FnOnce(&str) -> String,
    {
        let reference = f(&self.reference);
        check_reference(&reference)?;
        Ok(Self::new_unchecked(self.prefix.clone(), reference))
    }
}

fn check_reference(reference: &str) -> Result<(), VocabularyError> {
    if reference.is_empty() {
        Err(VocabularyError::EmptyReference)
    } else if reference.contains(['[', ']']) {
        Err(VocabularyError::InvalidReference(reference.to_owned()))
    } else {
        Ok(())
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

impl FromStr for Curie {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, true)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Curie {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Curie {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&text, true).map_err(serde::de::Error::custom)
    }
}

/// Converts a camelCase or PascalCase identifier to kebab-case.
///
/// Runs of capitals stay together (`"XMLSchema"` becomes `"xml-schema"`) and
/// underscores become hyphens.
#[must_use]
pub fn kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            result.push('-');
        } else if ch.is_uppercase() {
            if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    result.push('-');
                }
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
