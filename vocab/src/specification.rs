//! Vocabulary dialect policies.
//!
//! A [`VocabularySpecification`] decides which strings are acceptable
//! prefixes, which namespace IRIs are *regular* (end in a separator so that
//! local names can be split off unambiguously), and how an absolute IRI is
//! split into namespace and local name. Registries and managers are handed a
//! specification at construction instead of being specialized per dialect.

use std::fmt;

use oxiri::Iri;

use crate::error::{parse_absolute_iri, VocabularyError};
use crate::term::VocabularyTerm;

/// The XML namespace, `http://www.w3.org/XML/1998/namespace`.
///
/// It does not end in a separator and is therefore not regular, yet terms
/// such as `xml:lang` are formed by appending local names to it directly.
/// Splitting it is never attempted.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Policy consulted when registering prefixes and resolving terms.
///
/// Only [`is_valid_prefix`](Self::is_valid_prefix) is dialect specific; the
/// provided methods implement the regularity and splitting rules shared by
/// every dialect in this crate.
pub trait VocabularySpecification: fmt::Debug + Send + Sync {
    /// Returns `true` if `prefix` may be used as a vocabulary prefix.
    fn is_valid_prefix(&self, prefix: &str) -> bool;

    /// Returns `true` if the namespace IRI ends in `/` or `#`.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `iri` is not an absolute IRI.
    fn is_namespace_regular(&self, iri: &str) -> Result<bool, VocabularyError> {
        let iri = parse_absolute_iri(iri)?;
        Ok(is_regular(&iri))
    }

    /// Splits an absolute IRI into a vocabulary namespace and a local name.
    ///
    /// Returns `None` if the IRI is itself namespace-shaped (ends in `/` or
    /// `#`), is the [`XML_NAMESPACE`], or has no path segment or fragment to
    /// use as a local name.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `iri` is not an absolute IRI.
    fn find_term_namespace(&self, iri: &str) -> Result<Option<VocabularyTerm>, VocabularyError> {
        let iri = parse_absolute_iri(iri)?;
        Ok(split_term(&iri))
    }
}

/// The liberal default dialect: any non-empty prefix without whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultSpecification;

impl VocabularySpecification for DefaultSpecification {
    fn is_valid_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && !prefix.contains(is_prefix_whitespace)
    }
}

/// The RDFa 1.1 dialect: prefixes are XML NCNames and `_` is reserved for
/// blank nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RdfaSpecification;

impl VocabularySpecification for RdfaSpecification {
    fn is_valid_prefix(&self, prefix: &str) -> bool {
        prefix != "_" && is_ncname(prefix)
    }
}

/// Whitespace as understood by HTML attribute tokenization.
pub(crate) fn is_prefix_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '\u{B7}'))
}

/// Typed form of [`VocabularySpecification::is_namespace_regular`].
#[must_use]
pub fn is_regular(iri: &Iri<String>) -> bool {
    iri.as_str().ends_with(['/', '#'])
}

/// Typed form of [`VocabularySpecification::find_term_namespace`].
#[must_use]
pub fn split_term(iri: &Iri<String>) -> Option<VocabularyTerm> {
    let text = iri.as_str();
    if text == XML_NAMESPACE || is_regular(iri) {
        return None;
    }

    let split_at = match iri.fragment() {
        // The fragment is the tail of the IRI; split just after its `#`.
        Some(fragment) => text.len() - fragment.len(),
        None => {
            let path = iri.path();
            let path_end = text.len() - iri.query().map_or(0, |q| q.len() + 1);
            let path_start = path_end - path.len();
            let slash = path.rfind('/')?;
            if slash + 1 == path.len() {
                return None;
            }
            path_start + slash + 1
        }
    };

    let (namespace, local_name) = text.split_at(split_at);
    let namespace = Iri::parse(namespace.to_owned()).ok()?;
    VocabularyTerm::new(namespace, local_name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(iri: &str) -> Option<(String, String)> {
        DefaultSpecification
            .find_term_namespace(iri)
            .unwrap()
            .map(|t| (t.namespace().as_str().to_owned(), t.local_name().to_owned()))
    }

    #[test]
    fn default_prefix_rules() {
        let spec = DefaultSpecification;
        assert!(spec.is_valid_prefix("dc"));
        assert!(spec.is_valid_prefix("2020"));
        assert!(spec.is_valid_prefix("_genprefix1"));
        assert!(!spec.is_valid_prefix(""));
        assert!(!spec.is_valid_prefix("foo bar"));
        assert!(!spec.is_valid_prefix("foo\tbar"));
        assert!(!spec.is_valid_prefix("foo\nbar"));
    }

    #[test]
    fn rdfa_prefix_rules() {
        let spec = RdfaSpecification;
        assert!(spec.is_valid_prefix("dc"));
        assert!(spec.is_valid_prefix("dc11"));
        assert!(spec.is_valid_prefix("_genprefix1"));
        assert!(spec.is_valid_prefix("my-vocab.v2"));
        assert!(!spec.is_valid_prefix("_"));
        assert!(!spec.is_valid_prefix("2020"));
        assert!(!spec.is_valid_prefix("-x"));
        assert!(!spec.is_valid_prefix(""));
    }

    #[test]
    fn regularity() {
        let spec = DefaultSpecification;
        assert!(spec.is_namespace_regular("http://purl.org/dc/terms/").unwrap());
        assert!(spec.is_namespace_regular("http://ogp.me/ns#").unwrap());
        assert!(!spec.is_namespace_regular(XML_NAMESPACE).unwrap());
        assert!(!spec.is_namespace_regular("http://example.com/foo").unwrap());
    }

    #[test]
    fn relative_iri_is_an_argument_error() {
        let spec = DefaultSpecification;
        assert!(matches!(
            spec.is_namespace_regular("terms/"),
            Err(VocabularyError::RelativeIri(_))
        ));
        assert!(matches!(
            spec.find_term_namespace("terms/creator"),
            Err(VocabularyError::RelativeIri(_))
        ));
    }

    #[test]
    fn splits_slash_namespace() {
        assert_eq!(
            split("http://purl.org/dc/terms/creator"),
            Some(("http://purl.org/dc/terms/".into(), "creator".into()))
        );
    }

    #[test]
    fn splits_hash_namespace() {
        assert_eq!(
            split("http://ogp.me/ns#title"),
            Some(("http://ogp.me/ns#".into(), "title".into()))
        );
        assert_eq!(
            split("http://example.com/a/b#c/d"),
            Some(("http://example.com/a/b#".into(), "c/d".into()))
        );
    }

    #[test]
    fn namespace_shaped_iris_do_not_split() {
        assert_eq!(split("http://purl.org/dc/terms/"), None);
        assert_eq!(split("http://ogp.me/ns#"), None);
        assert_eq!(split("http://example.com"), None);
        assert_eq!(split(XML_NAMESPACE), None);
        assert_eq!(split("urn:isbn:0451450523"), None);
    }

    #[test]
    fn query_stays_with_local_name() {
        assert_eq!(
            split("http://example.com/things/item?id=1"),
            Some(("http://example.com/things/".into(), "item?id=1".into()))
        );
        assert_eq!(split("http://example.com/things/?id=1"), None);
    }
}
