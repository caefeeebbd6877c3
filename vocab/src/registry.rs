//! Immutable prefix/namespace tables.
//!
//! A [`VocabularyRegistry`] is assembled once through a
//! [`VocabularyRegistryBuilder`] and queried afterwards. Prefixes are keys;
//! one namespace may carry several prefixes, in which case the first one
//! registered is the canonical answer for reverse lookups.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use oxiri::Iri;

use crate::curie::Curie;
use crate::error::VocabularyError;
use crate::prefix_attribute::to_prefix_attribute_value;
use crate::specification::VocabularySpecification;
use crate::term::VocabularyTerm;

/// Anything that accepts `prefix → namespace` registrations.
///
/// Implemented by [`VocabularyRegistryBuilder`] and
/// [`VocabularyManager`](crate::VocabularyManager) so that parsed RDFa
/// `prefix` attribute values can be fed to either.
pub trait Registrar {
    /// Associates `prefix` with `namespace`, replacing any namespace the
    /// prefix was associated with before.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::InvalidPrefix`] if the prefix is not usable
    /// under the registrar's specification.
    fn register_prefix(&mut self, prefix: &str, namespace: Iri<String>)
        -> Result<(), VocabularyError>;
}

/// One `(prefix, namespace)` pair. A `None` prefix marks the default
/// (unprefixed) vocabulary.
#[derive(Debug, Clone)]
pub struct PrefixRegistration {
    prefix: Option<String>,
    namespace: Iri<String>,
}

impl PrefixRegistration {
    /// The registered prefix, or `None` for the default vocabulary.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The vocabulary namespace IRI.
    #[must_use]
    pub fn namespace(&self) -> &Iri<String> {
        &self.namespace
    }
}

impl PartialEq for PrefixRegistration {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.namespace.as_str() == other.namespace.as_str()
    }
}

impl Eq for PrefixRegistration {}

impl Hash for PrefixRegistration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.namespace.as_str().hash(state);
    }
}

/// Insertion-ordered, bidirectional prefix table.
///
/// Re-registering a prefix keeps its position in `entries`, but for reverse
/// lookups it ranks as the newest association of its new namespace.
#[derive(Debug, Clone, Default)]
pub(crate) struct PrefixTable {
    entries: Vec<PrefixRegistration>,
    by_prefix: HashMap<Option<String>, usize>,
    // namespace IRI -> entry indices, oldest association first
    by_vocabulary: HashMap<String, Vec<usize>>,
}

impl PrefixTable {
    /// Inserts or overwrites; returns the namespace previously bound to the
    /// prefix, if any.
    pub(crate) fn insert(
        &mut self,
        prefix: Option<String>,
        namespace: Iri<String>,
    ) -> Option<Iri<String>> {
        let key = namespace.as_str().to_owned();
        if let Some(&index) = self.by_prefix.get(&prefix) {
            let entry = &mut self.entries[index];
            let previous = std::mem::replace(&mut entry.namespace, namespace);
            if previous.as_str() != key {
                if let Some(indices) = self.by_vocabulary.get_mut(previous.as_str()) {
                    indices.retain(|&i| i != index);
                    if indices.is_empty() {
                        self.by_vocabulary.remove(previous.as_str());
                    }
                }
                self.by_vocabulary.entry(key).or_default().push(index);
            }
            return Some(previous);
        }

        let index = self.entries.len();
        self.entries.push(PrefixRegistration {
            prefix: prefix.clone(),
            namespace,
        });
        self.by_prefix.insert(prefix, index);
        self.by_vocabulary.entry(key).or_default().push(index);
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PrefixRegistration> {
        self.entries.iter()
    }

    pub(crate) fn find_vocabulary(&self, prefix: Option<&str>) -> Option<&Iri<String>> {
        self.by_prefix
            .get(&prefix.map(str::to_owned))
            .map(|&i| &self.entries[i].namespace)
    }

    pub(crate) fn is_vocabulary_registered(&self, namespace: &str) -> bool {
        self.by_vocabulary.contains_key(namespace)
    }

    /// All registrations of `namespace`, oldest first.
    pub(crate) fn registrations_for<'a>(
        &'a self,
        namespace: &str,
    ) -> impl Iterator<Item = &'a PrefixRegistration> + 'a {
        self.by_vocabulary
            .get(namespace)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    pub(crate) fn first_registration(&self, namespace: &str) -> Option<&PrefixRegistration> {
        self.registrations_for(namespace).next()
    }

    pub(crate) fn vocabularies_by_prefix(&self) -> HashMap<Option<String>, Iri<String>> {
        self.entries
            .iter()
            .map(|r| (r.prefix.clone(), r.namespace.clone()))
            .collect()
    }

    pub(crate) fn prefixes_by_vocabulary(&self) -> HashSet<PrefixRegistration> {
        self.entries.iter().cloned().collect()
    }

    /// `prefix: namespace` pairs of every prefixed registration.
    pub(crate) fn to_prefix_attribute_value(&self) -> String {
        to_prefix_attribute_value(
            self.entries
                .iter()
                .filter_map(|r| r.prefix().map(|p| (p, r.namespace()))),
        )
    }
}

/// Checks that `prefix` is valid under `spec` and can appear in a [`Curie`].
pub(crate) fn check_prefix(
    spec: &dyn VocabularySpecification,
    prefix: &str,
) -> Result<(), VocabularyError> {
    let curie_safe = !prefix.is_empty() && !prefix.contains([':', '[', ']']);
    if curie_safe && spec.is_valid_prefix(prefix) {
        Ok(())
    } else {
        Err(VocabularyError::InvalidPrefix(prefix.to_owned()))
    }
}

/// An immutable, bidirectional table of prefix/namespace associations.
///
/// Safe to share between threads; see
/// [`known_vocabularies`](crate::known::known_vocabularies) for a
/// process-wide instance.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    specification: Arc<dyn VocabularySpecification>,
    table: PrefixTable,
}

impl VocabularyRegistry {
    /// Starts a registry whose prefixes are validated by `specification`.
    #[must_use]
    pub fn builder(specification: Arc<dyn VocabularySpecification>) -> VocabularyRegistryBuilder {
        VocabularyRegistryBuilder {
            specification,
            table: PrefixTable::default(),
        }
    }

    pub(crate) fn from_table(
        specification: Arc<dyn VocabularySpecification>,
        table: PrefixTable,
    ) -> Self {
        tracing::trace!(registrations = table.len(), "vocabulary registry frozen");
        Self {
            specification,
            table,
        }
    }

    /// The specification the registry's prefixes were validated against.
    #[must_use]
    pub fn specification(&self) -> &dyn VocabularySpecification {
        self.specification.as_ref()
    }

    /// Number of registrations, the default vocabulary included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns `true` if `prefix` is bound to some namespace.
    #[must_use]
    pub fn is_prefix_registered(&self, prefix: &str) -> bool {
        self.table.find_vocabulary(Some(prefix)).is_some()
    }

    /// Returns `true` if `namespace` is registered under any prefix or as the
    /// default vocabulary. Comparison is by exact IRI text.
    #[must_use]
    pub fn is_vocabulary_registered(&self, namespace: &Iri<String>) -> bool {
        self.table.is_vocabulary_registered(namespace.as_str())
    }

    /// The namespace bound to `prefix`.
    #[must_use]
    pub fn find_vocabulary_by_prefix(&self, prefix: &str) -> Option<&Iri<String>> {
        self.table.find_vocabulary(Some(prefix))
    }

    /// The default (unprefixed) vocabulary, if one was registered.
    #[must_use]
    pub fn default_vocabulary(&self) -> Option<&Iri<String>> {
        self.table.find_vocabulary(None)
    }

    /// The canonical registration of `namespace`: the first one made.
    ///
    /// Its prefix is `None` if the namespace was first registered as the
    /// default vocabulary.
    #[must_use]
    pub fn find_prefix_registration_for_vocabulary(
        &self,
        namespace: &Iri<String>,
    ) -> Option<&PrefixRegistration> {
        self.table.first_registration(namespace.as_str())
    }

    /// Every prefix registered for `namespace`, canonical one first.
    pub fn prefixes_for_vocabulary<'a>(
        &'a self,
        namespace: &Iri<String>,
    ) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.table
            .registrations_for(namespace.as_str())
            .map(PrefixRegistration::prefix)
    }

    /// All registrations in registration order.
    pub fn registrations(&self) -> impl Iterator<Item = &PrefixRegistration> {
        self.table.iter()
    }

    /// Snapshot of every `(namespace, prefix)` pair.
    #[must_use]
    pub fn registered_prefixes_by_vocabulary(&self) -> HashSet<PrefixRegistration> {
        self.table.prefixes_by_vocabulary()
    }

    /// Snapshot of the `prefix → namespace` map.
    #[must_use]
    pub fn registered_vocabularies_by_prefix(&self) -> HashMap<Option<String>, Iri<String>> {
        self.table.vocabularies_by_prefix()
    }

    /// Resolves a CURIE against this registry.
    ///
    /// An unprefixed CURIE resolves against the default vocabulary.
    #[must_use]
    pub fn expand(&self, curie: &Curie) -> Option<VocabularyTerm> {
        let namespace = self.table.find_vocabulary(curie.prefix())?;
        VocabularyTerm::new(namespace.clone(), curie.reference()).ok()
    }

    /// Renders every prefixed registration as an RDFa `prefix` attribute
    /// value, in registration order.
    #[must_use]
    pub fn to_prefix_attribute_value(&self) -> String {
        self.table.to_prefix_attribute_value()
    }
}

/// Accumulates registrations for a [`VocabularyRegistry`].
#[derive(Debug, Clone)]
pub struct VocabularyRegistryBuilder {
    specification: Arc<dyn VocabularySpecification>,
    table: PrefixTable,
}

impl VocabularyRegistryBuilder {
    /// Registers `prefix` for `namespace`, consuming and returning the
    /// builder for chaining. A later registration of the same prefix
    /// overwrites the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::InvalidPrefix`] if the prefix is not usable.
    pub fn with_prefix(
        mut self,
        prefix: &str,
        namespace: Iri<String>,
    ) -> Result<Self, VocabularyError> {
        self.register_prefix(prefix, namespace)?;
        Ok(self)
    }

    /// Registers `namespace` as the default (unprefixed) vocabulary.
    #[must_use]
    pub fn with_default_vocabulary(mut self, namespace: Iri<String>) -> Self {
        self.register_default_vocabulary(namespace);
        self
    }

    /// Registers `namespace` as the default (unprefixed) vocabulary.
    pub fn register_default_vocabulary(&mut self, namespace: Iri<String>) -> &mut Self {
        self.table.insert(None, namespace);
        self
    }

    /// Freezes the accumulated registrations.
    #[must_use]
    pub fn build(self) -> VocabularyRegistry {
        VocabularyRegistry::from_table(self.specification, self.table)
    }
}

impl Registrar for VocabularyRegistryBuilder {
    fn register_prefix(
        &mut self,
        prefix: &str,
        namespace: Iri<String>,
    ) -> Result<(), VocabularyError> {
        check_prefix(self.specification.as_ref(), prefix)?;
        if let Some(previous) = self.table.insert(Some(prefix.to_owned()), namespace) {
            tracing::debug!(prefix, previous = previous.as_str(), "prefix re-registered");
        }
        Ok(())
    }
}
