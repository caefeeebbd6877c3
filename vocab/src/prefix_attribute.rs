//! RDFa `prefix` attribute values, e.g.
//! `"dc: http://purl.org/dc/terms/ og: http://ogp.me/ns#"`.

use oxiri::Iri;

use crate::error::{parse_absolute_iri, VocabularyError};
use crate::registry::Registrar;
use crate::specification::is_prefix_whitespace;

/// Parses a `prefix` attribute value into `(prefix, namespace)` pairs, in
/// document order.
///
/// Tokens are separated by runs of space, tab, CR or LF. Each pair is a
/// `prefix:` token followed by an absolute namespace IRI.
///
/// # Errors
///
/// Returns [`VocabularyError::MalformedPrefixAttribute`] for a prefix token
/// without its trailing colon, a bare `:`, or a prefix with no namespace
/// after it; returns an argument error if a namespace is not an absolute
/// IRI.
pub fn from_prefix_attribute_value(
    text: &str,
) -> Result<Vec<(String, Iri<String>)>, VocabularyError> {
    let malformed = |reason: String| VocabularyError::MalformedPrefixAttribute {
        text: text.to_owned(),
        reason,
    };

    let mut tokens = text.split(is_prefix_whitespace).filter(|t| !t.is_empty());
    let mut pairs = Vec::new();
    while let Some(token) = tokens.next() {
        let prefix = match token.strip_suffix(':') {
            Some("") => return Err(malformed("empty prefix before ':'".to_owned())),
            Some(prefix) => prefix,
            None => return Err(malformed(format!("prefix {token:?} does not end in ':'"))),
        };
        let namespace = tokens
            .next()
            .ok_or_else(|| malformed(format!("no namespace for prefix {prefix:?}")))?;
        pairs.push((prefix.to_owned(), parse_absolute_iri(namespace)?));
    }
    Ok(pairs)
}

/// Renders `(prefix, namespace)` pairs as a `prefix` attribute value: each
/// pair as `prefix: namespace`, joined by single spaces, in iteration order.
pub fn to_prefix_attribute_value<'a, I, P>(registrations: I) -> String
where
    I: IntoIterator<Item = (P, &'a Iri<String>)>,
    P: AsRef<str>,
{
    let mut out = String::new();
    for (prefix, namespace) in registrations {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(prefix.as_ref());
        out.push_str(": ");
        out.push_str(namespace.as_str());
    }
    out
}

/// Parses a `prefix` attribute value and registers every pair with
/// `registrar`.
///
/// Nothing is registered if the value does not parse; otherwise pairs are
/// registered in order and registration stops at the first rejected prefix.
///
/// # Errors
///
/// Returns the parse error, or the registrar's error for a rejected prefix.
pub fn register_prefix_attribute_value<R>(
    registrar: &mut R,
    text: &str,
) -> Result<usize, VocabularyError>
where
    R: Registrar + ?Sized,
{
    let pairs = from_prefix_attribute_value(text)?;
    let count = pairs.len();
    for (prefix, namespace) in pairs {
        registrar.register_prefix(&prefix, namespace)?;
    }
    Ok(count)
}
