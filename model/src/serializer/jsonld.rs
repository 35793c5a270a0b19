//! JSON-LD 1.1 mapping manifest.
//!
//! Same content as the Turtle manifest, as a single `@context` + `@graph`
//! document.

use serde_json::{json, Map, Value};

use crate::model::{iris, NamedGraph, Package, TypeNode};
use crate::serializer::{field_iri, package_iri, type_iri};

/// Serializes the mapping manifest of `package` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(package: &Package) -> Value {
    let mut graph = Vec::new();

    let mut package_node = json!({
        "@id": package_iri(package),
        "@type": "rdfbind:Package",
        "rdfbind:identifier": package.name,
    });
    if let Some(ns) = &package.namespace {
        package_node["rdfbind:targetNamespace"] = json!(ns);
    }
    graph.push(package_node);

    for ty in package.types.iter().filter(|t| !t.is_factory) {
        push_type(&mut graph, package, ty, &mut vec![ty.name.clone()]);
    }

    json!({
        "@context": {
            "rdfbind": iris::RDFBIND,
            "rdf": iris::RDF,
            "xsd": iris::XSD,
        },
        "@graph": graph
    })
}

fn push_type(graph: &mut Vec<Value>, package: &Package, ty: &TypeNode, path: &mut Vec<String>) {
    let subject = type_iri(package, path);
    let mut node = Map::new();
    node.insert("@id".to_owned(), json!(subject));
    node.insert("@type".to_owned(), json!("rdfbind:GeneratedType"));
    node.insert("rdfbind:identifier".to_owned(), json!(ty.name));
    node.insert("rdfbind:originalName".to_owned(), json!(ty.original_name()));
    if let Some(class) = ty.class_mapping() {
        node.insert("rdfbind:mapsToClass".to_owned(), json!(class.class));
    }
    match ty.named_graph() {
        Some(NamedGraph::Instance) => {
            node.insert(
                "rdfbind:namedGraph".to_owned(),
                json!({ "@id": "rdfbind:InstanceGraph" }),
            );
        }
        Some(NamedGraph::Static(uri)) => {
            node.insert("rdfbind:staticGraph".to_owned(), json!(uri));
        }
        None => {}
    }
    if let Some(table) = ty.namespaces() {
        let entries: Vec<Value> = table
            .pairs
            .iter()
            .map(|(prefix, uri)| json!({ "rdfbind:prefix": prefix, "rdfbind:uri": uri }))
            .collect();
        node.insert("rdfbind:namespaces".to_owned(), json!({ "@list": entries }));
    }
    graph.push(Value::Object(node));

    for field in &ty.fields {
        let Some(mapping) = field.property_mapping() else {
            continue;
        };
        let mut field_node = json!({
            "@id": field_iri(package, path, &field.name),
            "@type": "rdfbind:GeneratedField",
            "rdfbind:declaredIn": { "@id": subject },
            "rdfbind:identifier": field.name,
            "rdfbind:mapsToProperty": mapping.property_name,
            "rdfbind:isList": mapping.is_list,
        });
        if let Some(original) = field.original_name() {
            field_node["rdfbind:originalName"] = json!(original);
        }
        if !mapping.links.is_empty() {
            let hops: Vec<Value> = mapping
                .links
                .iter()
                .map(|hop| {
                    let mut hop_node = json!({
                        "rdfbind:property": hop.property_name,
                        "rdfbind:nodeType": hop.node_type.as_str(),
                    });
                    if let Some(id) = &hop.shared_id {
                        hop_node["rdfbind:sharedId"] = json!(id);
                    }
                    hop_node
                })
                .collect();
            field_node["rdfbind:links"] = json!({ "@list": hops });
        }
        if let Some(literal) = &mapping.literal {
            field_node["rdfbind:literalValue"] = json!(literal.value);
            field_node["rdfbind:literalDatatype"] = json!(literal.datatype);
        }
        graph.push(field_node);
    }

    for nested in ty.nested.iter().filter(|t| !t.is_factory) {
        path.push(nested.name.clone());
        push_type(graph, package, nested, path);
        path.pop();
    }
}
