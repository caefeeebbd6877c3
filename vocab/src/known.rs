//! Well-known vocabularies.
//!
//! The seed table is the RDFa Core 1.1 initial context
//! (<https://www.w3.org/2011/rdfa-context/rdfa-1.1>): the W3C vocabularies
//! followed by the "widely used" ones. Hand the registry to every
//! [`VocabularyManager`](crate::VocabularyManager) as its known vocabularies.

use std::sync::{Arc, OnceLock};

use crate::error::parse_absolute_iri;
use crate::registry::{Registrar, VocabularyRegistry};
use crate::specification::RdfaSpecification;

/// Namespace IRI constants for the most commonly used vocabularies.
pub mod iris {
    /// Dublin Core Metadata Terms.
    pub const DC: &str = "http://purl.org/dc/terms/";
    /// Dublin Core Metadata Element Set 1.1.
    pub const DC11: &str = "http://purl.org/dc/elements/1.1/";
    /// Friend of a Friend.
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    /// Open Graph protocol.
    pub const OG: &str = "http://ogp.me/ns#";
    /// OWL.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// schema.org.
    pub const SCHEMA: &str = "http://schema.org/";
    /// SKOS.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// XML Schema datatypes.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// The XML namespace; not regular.
    pub const XML: &str = crate::specification::XML_NAMESPACE;
    /// XHTML vocabulary.
    pub const XHV: &str = "http://www.w3.org/1999/xhtml/vocab#";
}

/// `(prefix, namespace)` pairs of the RDFa Core 1.1 initial context, in
/// registration order. `dc` precedes `dcterms`, so it is canonical for the
/// Dublin Core Terms namespace.
pub const KNOWN_VOCABULARIES: &[(&str, &str)] = &[
    // W3C documents
    ("as", "https://www.w3.org/ns/activitystreams#"),
    ("csvw", "http://www.w3.org/ns/csvw#"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("dqv", "http://www.w3.org/ns/dqv#"),
    ("duv", "http://www.w3.org/ns/duv#"),
    ("grddl", "http://www.w3.org/2003/g/data-view#"),
    ("jsonld", "http://json-ld.org/vocab#"),
    ("ma", "http://www.w3.org/ns/ma-ont#"),
    ("org", "http://www.w3.org/ns/org#"),
    ("owl", iris::OWL),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("qb", "http://purl.org/linked-data/cube#"),
    ("rdf", iris::RDF),
    ("rdfa", "http://www.w3.org/ns/rdfa#"),
    ("rdfs", iris::RDFS),
    ("rif", "http://www.w3.org/2007/rif#"),
    ("rr", "http://www.w3.org/ns/r2rml#"),
    ("sd", "http://www.w3.org/ns/sparql-service-description#"),
    ("skos", iris::SKOS),
    ("skosxl", "http://www.w3.org/2008/05/skos-xl#"),
    ("sosa", "http://www.w3.org/ns/sosa/"),
    ("ssn", "http://www.w3.org/ns/ssn/"),
    ("time", "http://www.w3.org/2006/time#"),
    ("void", "http://rdfs.org/ns/void#"),
    ("wdr", "http://www.w3.org/2007/05/powder#"),
    ("wdrs", "http://www.w3.org/2007/05/powder-s#"),
    ("xhv", iris::XHV),
    ("xml", iris::XML),
    ("xsd", iris::XSD),
    // widely used
    ("cc", "http://creativecommons.org/ns#"),
    ("ctag", "http://commontag.org/ns#"),
    ("dc", iris::DC),
    ("dc11", iris::DC11),
    ("dcterms", iris::DC),
    ("foaf", iris::FOAF),
    ("gr", "http://purl.org/goodrelations/v1#"),
    ("ical", "http://www.w3.org/2002/12/cal/icaltzd#"),
    ("og", iris::OG),
    ("rev", "http://purl.org/stuff/rev#"),
    ("schema", iris::SCHEMA),
    ("schemas", "https://schema.org/"),
    ("sioc", "http://rdfs.org/sioc/ns#"),
    ("v", "http://rdf.data-vocabulary.org/#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
];

/// Returns the process-wide registry of [`KNOWN_VOCABULARIES`], built on
/// first use under the RDFa dialect.
#[must_use]
pub fn known_vocabularies() -> &'static VocabularyRegistry {
    static KNOWN: OnceLock<VocabularyRegistry> = OnceLock::new();
    KNOWN.get_or_init(|| {
        let mut builder = VocabularyRegistry::builder(Arc::new(RdfaSpecification));
        for &(prefix, namespace) in KNOWN_VOCABULARIES {
            let registered = parse_absolute_iri(namespace)
                .and_then(|namespace| builder.register_prefix(prefix, namespace));
            if let Err(err) = registered {
                tracing::error!(prefix, namespace, %err, "skipping known vocabulary");
            }
        }
        builder.build()
    })
}
