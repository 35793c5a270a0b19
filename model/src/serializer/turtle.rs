//! Turtle 1.1 mapping manifest.
//!
//! Describes every annotated type and field of a package: the ontology class
//! or property it maps to, hop chains as RDF lists, list flags, literal
//! overrides, named graphs and namespace tables. Ontology references are
//! written as plain literals since they are opaque strings that may use
//! prefixes the manifest does not declare.

use crate::model::{iris, NamedGraph, Package, TypeNode};
use crate::serializer::{field_iri, package_iri, type_iri};

/// Serializes the mapping manifest of `package` to a Turtle string.
#[must_use]
pub fn to_turtle(package: &Package) -> String {
    let mut out = String::with_capacity(8 * 1024);

    out.push_str(&format!("@prefix rdfbind: <{}> .\n", iris::RDFBIND));
    out.push_str(&format!("@prefix rdf: <{}> .\n", iris::RDF));
    out.push_str(&format!("@prefix xsd: <{}> .\n\n", iris::XSD));

    let mut package_props = vec!["a rdfbind:Package".to_string()];
    package_props.push(format!("rdfbind:identifier {}", turtle_string(&package.name)));
    if let Some(ns) = &package.namespace {
        package_props.push(format!("rdfbind:targetNamespace {}", turtle_string(ns)));
    }
    statement(&mut out, &package_iri(package), &package_props);

    for ty in package.types.iter().filter(|t| !t.is_factory) {
        write_type(&mut out, package, ty, &mut vec![ty.name.clone()]);
    }

    out
}

fn write_type(out: &mut String, package: &Package, ty: &TypeNode, path: &mut Vec<String>) {
    let subject = type_iri(package, path);

    let mut props = vec!["a rdfbind:GeneratedType".to_string()];
    props.push(format!("rdfbind:identifier {}", turtle_string(&ty.name)));
    props.push(format!(
        "rdfbind:originalName {}",
        turtle_string(ty.original_name())
    ));
    if let Some(class) = ty.class_mapping() {
        props.push(format!("rdfbind:mapsToClass {}", turtle_string(&class.class)));
    }
    match ty.named_graph() {
        Some(NamedGraph::Instance) => props.push("rdfbind:namedGraph rdfbind:InstanceGraph".to_string()),
        Some(NamedGraph::Static(uri)) => {
            props.push(format!("rdfbind:staticGraph {}", turtle_string(uri)));
        }
        None => {}
    }
    if let Some(table) = ty.namespaces() {
        let entries: Vec<String> = table
            .pairs
            .iter()
            .map(|(prefix, uri)| {
                format!(
                    "[ rdfbind:prefix {} ; rdfbind:uri {} ]",
                    turtle_string(prefix),
                    turtle_string(uri)
                )
            })
            .collect();
        props.push(format!("rdfbind:namespaces ( {} )", entries.join(" ")));
    }
    statement(out, &subject, &props);

    for field in &ty.fields {
        let Some(mapping) = field.property_mapping() else {
            continue;
        };
        let mut props = vec!["a rdfbind:GeneratedField".to_string()];
        props.push(format!("rdfbind:declaredIn <{subject}>"));
        props.push(format!("rdfbind:identifier {}", turtle_string(&field.name)));
        if let Some(original) = field.original_name() {
            props.push(format!("rdfbind:originalName {}", turtle_string(original)));
        }
        props.push(format!(
            "rdfbind:mapsToProperty {}",
            turtle_string(&mapping.property_name)
        ));
        props.push(format!("rdfbind:isList {}", mapping.is_list));
        if !mapping.links.is_empty() {
            let hops: Vec<String> = mapping
                .links
                .iter()
                .map(|hop| {
                    let mut hop_str = format!(
                        "[ rdfbind:property {} ; rdfbind:nodeType {}",
                        turtle_string(&hop.property_name),
                        turtle_string(hop.node_type.as_str())
                    );
                    if let Some(id) = &hop.shared_id {
                        hop_str.push_str(&format!(" ; rdfbind:sharedId {}", turtle_string(id)));
                    }
                    hop_str.push_str(" ]");
                    hop_str
                })
                .collect();
            props.push(format!("rdfbind:links ( {} )", hops.join(" ")));
        }
        if let Some(literal) = &mapping.literal {
            props.push(format!("rdfbind:literalValue {}", turtle_string(&literal.value)));
            props.push(format!(
                "rdfbind:literalDatatype {}",
                turtle_string(&literal.datatype)
            ));
        }
        statement(out, &field_iri(package, path, &field.name), &props);
    }

    for nested in ty.nested.iter().filter(|t| !t.is_factory) {
        path.push(nested.name.clone());
        write_type(out, package, nested, path);
        path.pop();
    }
}

fn statement(out: &mut String, subject: &str, props: &[String]) {
    out.push_str(&format!("<{subject}>\n  {} .\n\n", props.join(" ;\n  ")));
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{escaped}\"")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{
        ClassMapping, FieldNode, LinkHop, Literal, Metadata, NamespaceTable, PropertyMapping,
        TypeNode, ValueType,
    };
    use crate::Builtin;
    use sophia_api::prelude::*;
    use sophia_inmem::graph::LightGraph;

    fn sample() -> Package {
        let mut travel = TypeNode::declared("Travel", None);
        travel.metadata.push(Metadata::Class(ClassMapping {
            class: "st4rt:Travel".to_string(),
        }));
        travel
            .metadata
            .push(Metadata::Namespaces(NamespaceTable::standard()));
        travel.metadata.push(Metadata::NamedGraph(NamedGraph::Instance));
        let mut fare = FieldNode::element("fare_url", "fareTravelUrl", Builtin::String.into());
        fare.metadata.push(Metadata::Property(PropertyMapping {
            property_name: "st4rt:hasFareTravel".to_string(),
            links: vec![LinkHop::shared("st4rt:hasOffer", "offer")],
            is_list: false,
            literal: Some(Literal::string("say \"hi\"")),
        }));
        travel.fields.push(fare);
        travel.fields.push(FieldNode::element(
            "stops",
            "stop",
            ValueType::list_of(ValueType::reference("Stop")),
        ));
        Package {
            name: "org.example.travel".to_string(),
            namespace: Some("http://example.org/travel".to_string()),
            types: vec![travel, TypeNode::factory()],
        }
    }

    #[test]
    fn manifest_mentions_mappings() {
        let ttl = to_turtle(&sample());
        assert!(ttl.contains("@prefix rdfbind:"));
        assert!(ttl.contains("rdfbind:mapsToClass \"st4rt:Travel\""));
        assert!(ttl.contains("rdfbind:mapsToProperty \"st4rt:hasFareTravel\""));
        assert!(ttl.contains("rdfbind:isList false"));
        assert!(!ttl.contains("ObjectFactory"));
        // Unmapped fields are not described.
        assert!(!ttl.contains("Travel#stops"));
    }

    #[test]
    fn manifest_is_valid_turtle() {
        let ttl = to_turtle(&sample());
        let graph: LightGraph = sophia_turtle::parser::turtle::parse_str(&ttl)
            .collect_triples()
            .expect("manifest must parse as Turtle");
        assert!(graph.triples().count() > 10);
    }
}
