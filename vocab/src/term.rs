//! Absolute identifiers expressed as a vocabulary namespace plus a local name.

use std::fmt;
use std::hash::{Hash, Hasher};

use oxiri::Iri;

use crate::error::VocabularyError;

/// One term of a vocabulary, e.g. `http://purl.org/dc/terms/` + `creator`.
///
/// The term's IRI is the plain concatenation of namespace and local name; no
/// separator is inserted, so the namespace is expected to end in `/` or `#`
/// already (the XML namespace is the well-known exception).
#[derive(Debug, Clone)]
pub struct VocabularyTerm {
    namespace: Iri<String>,
    local_name: String,
}

impl VocabularyTerm {
    /// Creates a term from its namespace and local name.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::EmptyLocalName`] if `local_name` is empty,
    /// or [`VocabularyError::InvalidLocalName`] if it contains `[` or `]`.
    pub fn new(
        namespace: Iri<String>,
        local_name: impl Into<String>,
    ) -> Result<Self, VocabularyError> {
        let local_name = local_name.into();
        if local_name.is_empty() {
            return Err(VocabularyError::EmptyLocalName);
        }
        // Brackets are only legal in an IRI host.
        if local_name.contains(['[', ']']) {
            return Err(VocabularyError::InvalidLocalName(local_name));
        }
        Ok(Self {
            namespace,
            local_name,
        })
    }

    /// The vocabulary namespace IRI.
    #[must_use]
    pub fn namespace(&self) -> &Iri<String> {
        &self.namespace
    }

    /// The name of the term within its vocabulary.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the absolute IRI of the term: namespace followed by local name.
    #[must_use]
    pub fn to_iri(&self) -> String {
        let mut iri = String::with_capacity(self.namespace.as_str().len() + self.local_name.len());
        iri.push_str(self.namespace.as_str());
        iri.push_str(&self.local_name);
        iri
    }
}

impl PartialEq for VocabularyTerm {
    fn eq(&self, other: &Self) -> bool {
        self.namespace.as_str() == other.namespace.as_str() && self.local_name == other.local_name
    }
}

impl Eq for VocabularyTerm {}

impl Hash for VocabularyTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.as_str().hash(state);
        self.local_name.hash(state);
    }
}

impl fmt::Display for VocabularyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace.as_str(), self.local_name)
    }
}
