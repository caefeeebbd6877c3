//! Session-scoped prefix and CURIE determination.
//!
//! A [`VocabularyManager`] lives for one serialization pass. It owns the
//! registrations made during that pass, consults read-only known-vocabulary
//! registries, and never fails to produce a prefix: when nothing better is
//! available it synthesizes one from its generated-prefix tag and a counter.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use oxiri::Iri;

use crate::curie::Curie;
use crate::error::{parse_absolute_iri, VocabularyError};
use crate::known::known_vocabularies;
use crate::registry::{
    check_prefix, PrefixRegistration, PrefixTable, Registrar, VocabularyRegistry,
};
use crate::specification::VocabularySpecification;
use crate::term::VocabularyTerm;

/// Tag used for synthesized prefixes unless configured otherwise.
pub const DEFAULT_GENERATED_PREFIX_TAG: &str = "_genprefix";

/// Construction-time settings for a [`VocabularyManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Synthesized prefixes are this tag followed by a counter.
    pub generated_prefix_tag: String,
    /// Whether prefixes from known-vocabulary registries are adopted.
    pub auto_register: bool,
    /// Whether the built-in [`known_vocabularies`] registry is consulted.
    pub known_vocabularies: bool,
    /// Absolute IRI of the default (unprefixed) vocabulary.
    pub default_vocabulary: Option<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            generated_prefix_tag: DEFAULT_GENERATED_PREFIX_TAG.to_owned(),
            auto_register: true,
            known_vocabularies: true,
            default_vocabulary: None,
        }
    }
}

/// Mutable prefix registrations for one serialization session.
///
/// Not meant to be shared between threads; create one per document. Known
/// vocabulary registries are borrowed and never modified.
#[derive(Debug)]
pub struct VocabularyManager<'k> {
    specification: Arc<dyn VocabularySpecification>,
    table: PrefixTable,
    default_vocabulary: Option<Iri<String>>,
    known: Vec<&'k VocabularyRegistry>,
    generated_prefix_tag: String,
    generated_count: u64,
    auto_register: bool,
}

impl<'k> VocabularyManager<'k> {
    /// Creates an empty manager with auto-registration enabled and no known
    /// vocabularies.
    #[must_use]
    pub fn new(specification: Arc<dyn VocabularySpecification>) -> Self {
        Self {
            specification,
            table: PrefixTable::default(),
            default_vocabulary: None,
            known: Vec::new(),
            generated_prefix_tag: DEFAULT_GENERATED_PREFIX_TAG.to_owned(),
            generated_count: 0,
            auto_register: true,
        }
    }

    /// Creates a manager from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::InvalidPrefix`] if the generated prefix tag
    /// cannot form valid prefixes, or an IRI argument error if the default
    /// vocabulary is not an absolute IRI.
    pub fn from_config(
        specification: Arc<dyn VocabularySpecification>,
        config: &ManagerConfig,
    ) -> Result<Self, VocabularyError> {
        let mut manager = Self::new(specification);
        manager.set_generated_prefix_tag(&config.generated_prefix_tag)?;
        manager.auto_register = config.auto_register;
        manager.default_vocabulary = config
            .default_vocabulary
            .as_deref()
            .map(parse_absolute_iri)
            .transpose()?;
        if config.known_vocabularies {
            manager.add_known_vocabularies(known_vocabularies());
        }
        Ok(manager)
    }

    /// Adds a known-vocabularies registry, consulted after those added before.
    #[must_use]
    pub fn with_known_vocabularies(mut self, registry: &'k VocabularyRegistry) -> Self {
        self.add_known_vocabularies(registry);
        self
    }

    /// Adds a known-vocabularies registry, consulted after those added before.
    pub fn add_known_vocabularies(&mut self, registry: &'k VocabularyRegistry) {
        self.known.push(registry);
    }

    /// The specification prefixes are validated against.
    #[must_use]
    pub fn specification(&self) -> &dyn VocabularySpecification {
        self.specification.as_ref()
    }

    /// The default (unprefixed) vocabulary.
    #[must_use]
    pub fn default_vocabulary(&self) -> Option<&Iri<String>> {
        self.default_vocabulary.as_ref()
    }

    /// Sets or clears the default (unprefixed) vocabulary.
    pub fn set_default_vocabulary(&mut self, namespace: Option<Iri<String>>) {
        self.default_vocabulary = namespace;
    }

    /// Whether prefixes from known vocabularies are adopted.
    #[must_use]
    pub fn is_auto_register(&self) -> bool {
        self.auto_register
    }

    /// Enables or disables adopting prefixes from known vocabularies.
    pub fn set_auto_register(&mut self, auto_register: bool) {
        self.auto_register = auto_register;
    }

    /// The tag synthesized prefixes start with.
    #[must_use]
    pub fn generated_prefix_tag(&self) -> &str {
        &self.generated_prefix_tag
    }

    /// Changes the tag synthesized prefixes start with. The counter is kept.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::InvalidPrefix`] if `tag` followed by a
    /// number is not a usable prefix.
    pub fn set_generated_prefix_tag(&mut self, tag: &str) -> Result<(), VocabularyError> {
        check_prefix(self.specification.as_ref(), &format!("{tag}1"))
            .map_err(|_| VocabularyError::InvalidPrefix(tag.to_owned()))?;
        self.generated_prefix_tag = tag.to_owned();
        Ok(())
    }

    /// Number of registrations owned by this manager.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the manager owns no registrations yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns `true` if this manager has bound `prefix`.
    #[must_use]
    pub fn is_prefix_registered(&self, prefix: &str) -> bool {
        self.table.find_vocabulary(Some(prefix)).is_some()
    }

    /// Returns `true` if this manager has a prefix for `namespace`.
    #[must_use]
    pub fn is_vocabulary_registered(&self, namespace: &Iri<String>) -> bool {
        self.table.is_vocabulary_registered(namespace.as_str())
    }

    /// The namespace this manager has bound to `prefix`.
    #[must_use]
    pub fn find_vocabulary_by_prefix(&self, prefix: &str) -> Option<&Iri<String>> {
        self.table.find_vocabulary(Some(prefix))
    }

    /// The canonical prefix this manager has registered for `namespace`,
    /// without determining one.
    #[must_use]
    pub fn find_prefix_for_vocabulary(&self, namespace: &Iri<String>) -> Option<&str> {
        self.table
            .registrations_for(namespace.as_str())
            .find_map(PrefixRegistration::prefix)
    }

    /// The manager's registrations in registration order.
    pub fn registrations(&self) -> impl Iterator<Item = &PrefixRegistration> {
        self.table.iter()
    }

    /// Snapshot of every `(namespace, prefix)` pair owned by the manager.
    #[must_use]
    pub fn registered_prefixes_by_vocabulary(&self) -> HashSet<PrefixRegistration> {
        self.table.prefixes_by_vocabulary()
    }

    /// Snapshot of the manager's `prefix → namespace` map.
    #[must_use]
    pub fn registered_vocabularies_by_prefix(&self) -> HashMap<Option<String>, Iri<String>> {
        self.table.vocabularies_by_prefix()
    }

    /// Renders the manager's registrations as an RDFa `prefix` attribute
    /// value, in registration order.
    #[must_use]
    pub fn to_prefix_attribute_value(&self) -> String {
        self.table.to_prefix_attribute_value()
    }

    /// Freezes the current registrations, default vocabulary included, into
    /// an immutable registry.
    #[must_use]
    pub fn to_registry(&self) -> VocabularyRegistry {
        let mut table = self.table.clone();
        if let Some(default) = &self.default_vocabulary {
            table.insert(None, default.clone());
        }
        VocabularyRegistry::from_table(Arc::clone(&self.specification), table)
    }

    /// Determines the prefix to use for `namespace`, registering it.
    ///
    /// Returns `None` only for the default vocabulary. Otherwise, in order:
    /// the prefix already registered here; a prefix of the namespace in a
    /// known-vocabularies registry (with auto-registration enabled); the last
    /// path segment of the namespace if it is a usable, unregistered prefix;
    /// a synthesized `<tag><n>` prefix. Repeat calls return the same prefix.
    pub fn determine_prefix_for_vocabulary(&mut self, namespace: &Iri<String>) -> Option<String> {
        if self.is_default_vocabulary(namespace) {
            return None;
        }
        if let Some(prefix) = self.find_prefix_for_vocabulary(namespace) {
            return Some(prefix.to_owned());
        }

        let prefix = self
            .known_prefix(namespace)
            .or_else(|| self.derived_prefix(namespace))
            .unwrap_or_else(|| self.generate_prefix(namespace));
        self.table.insert(Some(prefix.clone()), namespace.clone());
        Some(prefix)
    }

    /// Splits `iri` into a term and determines the prefix of its namespace.
    ///
    /// Returns `Ok(None)` if the IRI has no local name to split off. The
    /// prefix is `None` when the namespace is the default vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `iri` is not an absolute IRI.
    pub fn determine_prefix_for_term(
        &mut self,
        iri: &str,
    ) -> Result<Option<(VocabularyTerm, Option<String>)>, VocabularyError> {
        let Some(term) = self.specification.find_term_namespace(iri)? else {
            return Ok(None);
        };
        let prefix = self.determine_prefix_for_vocabulary(term.namespace());
        Ok(Some((term, prefix)))
    }

    /// Determines the CURIE for `term`, registering its namespace's prefix.
    pub fn determine_curie(&mut self, term: &VocabularyTerm) -> Curie {
        let prefix = self.determine_prefix_for_vocabulary(term.namespace());
        Curie::new_unchecked(prefix, term.local_name().to_owned())
    }

    /// Determines the CURIE for an absolute IRI, if it splits into a term.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `iri` is not an absolute IRI.
    pub fn determine_curie_for_iri(&mut self, iri: &str) -> Result<Option<Curie>, VocabularyError> {
        Ok(self
            .determine_prefix_for_term(iri)?
            .map(|(term, prefix)| Curie::new_unchecked(prefix, term.local_name().to_owned())))
    }

    /// Resolves a CURIE using this manager's registrations, then the default
    /// vocabulary for an unprefixed CURIE, then the known vocabularies.
    #[must_use]
    pub fn expand_curie(&self, curie: &Curie) -> Option<VocabularyTerm> {
        let namespace = match curie.prefix() {
            None => self.default_vocabulary.as_ref()?,
            Some(prefix) => self.table.find_vocabulary(Some(prefix)).or_else(|| {
                self.known
                    .iter()
                    .find_map(|registry| registry.find_vocabulary_by_prefix(prefix))
            })?,
        };
        VocabularyTerm::new(namespace.clone(), curie.reference()).ok()
    }

    fn is_default_vocabulary(&self, namespace: &Iri<String>) -> bool {
        self.default_vocabulary
            .as_ref()
            .is_some_and(|default| default.as_str() == namespace.as_str())
    }

    fn known_prefix(&self, namespace: &Iri<String>) -> Option<String> {
        if !self.auto_register {
            return None;
        }
        let prefix = self.known.iter().find_map(|registry| {
            registry.prefixes_for_vocabulary(namespace).flatten().find(|prefix| {
                check_prefix(self.specification.as_ref(), prefix).is_ok()
                    && !self.is_prefix_registered(prefix)
            })
        })?;
        tracing::debug!(
            prefix,
            namespace = namespace.as_str(),
            "known vocabulary prefix adopted"
        );
        Some(prefix.to_owned())
    }

    fn derived_prefix(&self, namespace: &Iri<String>) -> Option<String> {
        let path = namespace.path();
        let segment = path
            .strip_suffix('/')
            .unwrap_or(path)
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())?;
        let candidate = urlencoding::decode(segment).ok()?.into_owned();
        if check_prefix(self.specification.as_ref(), &candidate).is_err()
            || self.is_prefix_registered(&candidate)
        {
            return None;
        }
        tracing::debug!(
            prefix = candidate.as_str(),
            namespace = namespace.as_str(),
            "prefix derived from namespace"
        );
        Some(candidate)
    }

    fn generate_prefix(&mut self, namespace: &Iri<String>) -> String {
        loop {
            self.generated_count += 1;
            let candidate = format!("{}{}", self.generated_prefix_tag, self.generated_count);
            if !self.is_prefix_registered(&candidate) {
                tracing::debug!(
                    prefix = candidate.as_str(),
                    namespace = namespace.as_str(),
                    "prefix generated"
                );
                return candidate;
            }
        }
    }
}

impl Registrar for VocabularyManager<'_> {
    fn register_prefix(
        &mut self,
        prefix: &str,
        namespace: Iri<String>,
    ) -> Result<(), VocabularyError> {
        check_prefix(self.specification.as_ref(), prefix)?;
        self.table.insert(Some(prefix.to_owned()), namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known::iris;
    use crate::prefix_attribute::register_prefix_attribute_value;
    use crate::specification::{DefaultSpecification, RdfaSpecification};

    fn iri(s: &str) -> Iri<String> {
        parse_absolute_iri(s).unwrap()
    }

    fn manager() -> VocabularyManager<'static> {
        VocabularyManager::new(Arc::new(DefaultSpecification))
    }

    #[test]
    fn derives_prefix_from_last_segment() {
        let mut m = manager();
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/foo/bar")),
            Some("bar".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/vocab/things/")),
            Some("things".to_owned())
        );
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn determination_is_idempotent() {
        let mut m = manager();
        let ns = iri("http://example.com/foo/bar");
        let first = m.determine_prefix_for_vocabulary(&ns);
        let second = m.determine_prefix_for_vocabulary(&ns);
        assert_eq!(first, second);
        assert_eq!(m.len(), 1);
        assert_eq!(m.generated_count, 0);
    }

    #[test]
    fn undecodable_segments_fall_back_to_generation() {
        let mut m = manager();
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/foo%20bar")),
            Some("_genprefix1".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/")),
            Some("_genprefix2".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/foo%20bar")),
            Some("_genprefix1".to_owned())
        );
    }

    #[test]
    fn bracketed_segment_curie_parses_back() {
        let mut m = manager();
        let term = VocabularyTerm::new(iri("http://example.com/x%5D/"), "name").unwrap();
        let curie = m.determine_curie(&term);
        assert_eq!(curie.prefix(), Some("_genprefix1"));
        let text = curie.to_string();
        assert_eq!(Curie::parse(&text, false).unwrap(), curie);
        assert_eq!(m.expand_curie(&curie).unwrap(), term);
    }

    #[test]
    fn derived_collision_falls_back_to_generation() {
        let mut m = manager();
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/a/terms/")),
            Some("terms".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.org/b/terms/")),
            Some("_genprefix1".to_owned())
        );
    }

    #[test]
    fn generation_skips_registered_candidates() {
        let mut m = manager();
        m.register_prefix("_genprefix1", iri("http://example.com/taken/"))
            .unwrap();
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("urn:example:x")),
            Some("_genprefix2".to_owned())
        );
    }

    #[test]
    fn default_vocabulary_has_no_prefix() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        m.set_default_vocabulary(Some(iri(iris::SCHEMA)));
        assert_eq!(m.determine_prefix_for_vocabulary(&iri(iris::SCHEMA)), None);
        assert!(m.is_empty());

        let term = VocabularyTerm::new(iri(iris::SCHEMA), "Person").unwrap();
        let curie = m.determine_curie(&term);
        assert_eq!(curie.prefix(), None);
        assert_eq!(curie.to_string(), "Person");
    }

    #[test]
    fn adopts_known_prefixes() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::DC)),
            Some("dc".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::FOAF)),
            Some("foaf".to_owned())
        );
        assert_eq!(
            m.to_prefix_attribute_value(),
            format!("dc: {} foaf: {}", iris::DC, iris::FOAF)
        );
    }

    #[test]
    fn known_prefix_taken_locally_tries_the_next_one() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        m.register_prefix("dc", iri("http://example.com/not-dublin-core/"))
            .unwrap();
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::DC)),
            Some("dcterms".to_owned())
        );
    }

    #[test]
    fn auto_register_off_ignores_known_vocabularies() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        m.set_auto_register(false);
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::FOAF)),
            Some("0.1".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::RDF)),
            Some("22-rdf-syntax-ns".to_owned())
        );
    }

    #[test]
    fn rdfa_dialect_rejects_non_ncname_segments() {
        let mut m = VocabularyManager::new(Arc::new(RdfaSpecification));
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/2020/")),
            Some("_genprefix1".to_owned())
        );
    }

    #[test]
    fn determines_prefix_for_term() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        let (term, prefix) = m
            .determine_prefix_for_term("http://ogp.me/ns#title")
            .unwrap()
            .unwrap();
        assert_eq!(term.namespace().as_str(), iris::OG);
        assert_eq!(term.local_name(), "title");
        assert_eq!(prefix.as_deref(), Some("og"));

        assert!(m
            .determine_prefix_for_term("http://purl.org/dc/terms/")
            .unwrap()
            .is_none());
        assert!(m.determine_prefix_for_term("dc/terms/creator").is_err());
    }

    #[test]
    fn determines_curies() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        let curie = m
            .determine_curie_for_iri("http://purl.org/dc/terms/creator")
            .unwrap()
            .unwrap();
        assert_eq!(curie.to_string(), "dc:creator");

        let xml_lang = VocabularyTerm::new(iri(iris::XML), "lang").unwrap();
        assert_eq!(m.determine_curie(&xml_lang).to_string(), "xml:lang");
    }

    #[test]
    fn expands_through_all_sources() {
        let mut m = manager().with_known_vocabularies(known_vocabularies());
        m.set_default_vocabulary(Some(iri(iris::SCHEMA)));
        m.register_prefix("ex", iri("http://example.com/ns#")).unwrap();

        let expand = |text: &str| {
            m.expand_curie(&Curie::parse(text, true).unwrap())
                .map(|t| t.to_iri())
        };
        assert_eq!(expand("ex:a").as_deref(), Some("http://example.com/ns#a"));
        assert_eq!(expand("name").as_deref(), Some("http://schema.org/name"));
        assert_eq!(
            expand("[foaf:name]").as_deref(),
            Some("http://xmlns.com/foaf/0.1/name")
        );
        assert_eq!(expand("nope:x"), None);
    }

    #[test]
    fn registrar_validates_prefixes() {
        let mut m = manager();
        assert!(matches!(
            m.register_prefix("a b", iri(iris::DC)),
            Err(VocabularyError::InvalidPrefix(_))
        ));
        let count = register_prefix_attribute_value(
            &mut m,
            "dc: http://purl.org/dc/terms/ og: http://ogp.me/ns#",
        )
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::OG)),
            Some("og".to_owned())
        );
    }

    #[test]
    fn snapshot_includes_default_vocabulary() {
        let mut m = manager();
        m.set_default_vocabulary(Some(iri(iris::SCHEMA)));
        m.determine_prefix_for_vocabulary(&iri("http://example.com/foo/bar"));
        let registry = m.to_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.default_vocabulary().map(Iri::as_str),
            Some(iris::SCHEMA)
        );
        assert!(registry.is_prefix_registered("bar"));
    }

    #[test]
    fn config_builds_manager() {
        let config = ManagerConfig {
            generated_prefix_tag: "ns".to_owned(),
            default_vocabulary: Some(iris::SCHEMA.to_owned()),
            ..ManagerConfig::default()
        };
        let mut m = VocabularyManager::from_config(Arc::new(RdfaSpecification), &config).unwrap();
        assert_eq!(m.generated_prefix_tag(), "ns");
        assert_eq!(m.default_vocabulary().map(Iri::as_str), Some(iris::SCHEMA));
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri(iris::SKOS)),
            Some("skos".to_owned())
        );
        assert_eq!(
            m.determine_prefix_for_vocabulary(&iri("http://example.com/")),
            Some("ns1".to_owned())
        );
    }

    #[test]
    fn config_rejects_bad_values() {
        let bad_tag = ManagerConfig {
            generated_prefix_tag: "gen prefix".to_owned(),
            ..ManagerConfig::default()
        };
        assert!(matches!(
            VocabularyManager::from_config(Arc::new(DefaultSpecification), &bad_tag),
            Err(VocabularyError::InvalidPrefix(_))
        ));
        let bad_default = ManagerConfig {
            default_vocabulary: Some("schema/".to_owned()),
            ..ManagerConfig::default()
        };
        assert!(matches!(
            VocabularyManager::from_config(Arc::new(DefaultSpecification), &bad_default),
            Err(VocabularyError::RelativeIri(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{ "generated_prefix_tag": "gen", "auto_register": false }"#)
                .unwrap();
        assert_eq!(config.generated_prefix_tag, "gen");
        assert!(!config.auto_register);
        assert!(config.known_vocabularies);
        assert_eq!(config.default_vocabulary, None);
    }
}
