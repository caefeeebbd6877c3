//! Vocabulary registry and CURIE resolution.
//!
//! Maps absolute IRIs to compact `prefix:reference` forms and back, the way
//! an RDFa or Turtle serializer needs it:
//!
//! - [`VocabularyTerm`]: namespace + local name.
//! - [`Curie`]: optional prefix + reference, with the bracketed safe form.
//! - [`VocabularySpecification`]: pluggable dialect rules
//!   ([`DefaultSpecification`], [`RdfaSpecification`]).
//! - [`VocabularyRegistry`]: immutable prefix/namespace table built once.
//! - [`VocabularyManager`]: per-session registrations and prefix
//!   determination, layered over known-vocabulary registries.
//!
//! # Entry Point
//!
//! ```
//! use std::sync::Arc;
//! use vocab_curie::{known::known_vocabularies, DefaultSpecification, VocabularyManager};
//!
//! let mut manager = VocabularyManager::new(Arc::new(DefaultSpecification))
//!     .with_known_vocabularies(known_vocabularies());
//!
//! let curie = manager
//!     .determine_curie_for_iri("http://purl.org/dc/terms/creator")?
//!     .expect("splits into a term");
//! assert_eq!(curie.to_string(), "dc:creator");
//! assert_eq!(manager.to_prefix_attribute_value(), "dc: http://purl.org/dc/terms/");
//! # Ok::<(), vocab_curie::VocabularyError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod curie;
pub mod error;
pub mod known;
pub mod manager;
pub mod prefix_attribute;
pub mod registry;
pub mod specification;
pub mod term;

pub use curie::Curie;
pub use error::{parse_absolute_iri, VocabularyError};
pub use manager::{ManagerConfig, VocabularyManager};
pub use prefix_attribute::{from_prefix_attribute_value, to_prefix_attribute_value};
pub use registry::{PrefixRegistration, Registrar, VocabularyRegistry, VocabularyRegistryBuilder};
pub use specification::{DefaultSpecification, RdfaSpecification, VocabularySpecification};
pub use term::VocabularyTerm;
