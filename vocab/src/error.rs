//! Error type shared by every component of the crate.
//!
//! Errors fall into two families:
//!
//! - **argument errors**: a caller handed a value that can never be valid
//!   (relative IRI where an absolute one is required, an unusable prefix,
//!   an empty local name or reference);
//! - **format errors**: text that was supposed to follow a grammar (a CURIE,
//!   an RDFa `prefix` attribute value) does not.
//!
//! Prefix and CURIE *determination* never produces an error; see
//! [`VocabularyManager`](crate::VocabularyManager).

use oxiri::{Iri, IriParseError, IriRef};
use thiserror::Error;

/// Errors raised by vocabulary registration and CURIE parsing.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The text is not a syntactically valid IRI reference.
    #[error("invalid IRI <{iri}>: {source}")]
    InvalidIri {
        /// The offending text.
        iri: String,
        /// The underlying parse failure.
        #[source]
        source: IriParseError,
    },

    /// An absolute IRI was required but a relative reference was given.
    #[error("IRI <{0}> is not absolute")]
    RelativeIri(String),

    /// The prefix is not allowed by the active vocabulary specification.
    #[error("invalid vocabulary prefix {0:?}")]
    InvalidPrefix(String),

    /// A vocabulary term was constructed with an empty local name.
    #[error("vocabulary term local name must not be empty")]
    EmptyLocalName,

    /// A vocabulary term local name contains characters no IRI path, query
    /// or fragment can hold.
    #[error("invalid vocabulary term local name {0:?}")]
    InvalidLocalName(String),

    /// A CURIE was constructed with an empty reference.
    #[error("CURIE reference must not be empty")]
    EmptyReference,

    /// A CURIE reference contains `[` or `]`, which CURIE text cannot carry.
    #[error("invalid CURIE reference {0:?}")]
    InvalidReference(String),

    /// CURIE text does not follow the CURIE or safe CURIE syntax.
    #[error("malformed CURIE {text:?}: {reason}")]
    MalformedCurie {
        /// The offending text.
        text: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An RDFa `prefix` attribute value could not be tokenized into pairs.
    #[error("malformed prefix attribute value {text:?}: {reason}")]
    MalformedPrefixAttribute {
        /// The offending attribute value.
        text: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl VocabularyError {
    /// Returns `true` for errors caused by malformed CURIE or prefix
    /// attribute text, `false` for argument errors.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCurie { .. } | Self::MalformedPrefixAttribute { .. }
        )
    }
}

/// Parses `text` as an absolute IRI.
///
/// # Errors
///
/// Returns [`VocabularyError::InvalidIri`] if `text` is not an IRI reference
/// at all, or [`VocabularyError::RelativeIri`] if it is a relative reference.
pub fn parse_absolute_iri(text: &str) -> Result<Iri<String>, VocabularyError> {
    let reference = IriRef::parse(text).map_err(|source| VocabularyError::InvalidIri {
        iri: text.to_owned(),
        source,
    })?;
    if reference.scheme().is_none() {
        return Err(VocabularyError::RelativeIri(text.to_owned()));
    }
    Iri::parse(text.to_owned()).map_err(|source| VocabularyError::InvalidIri {
        iri: text.to_owned(),
        source,
    })
}
