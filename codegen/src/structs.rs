//! Struct generation.
//!
//! Every complex type becomes a plain data struct plus an `rt::RdfMapped`
//! impl carrying its mapping metadata. Nested types are emitted into an
//! inline module named after their owner.

use std::fmt::Write as FmtWrite;

use rdfbind_model::{
    FieldBinding, FieldNode, NamedGraph, TypeNode, TypeShape, DEFAULT_LITERAL_DATATYPE,
};

use crate::emit::{indent, normalize_comment, RustFile};
use crate::enums::render_enum;
use crate::mapping::{field_type, item_path, runtime_path, ModuleNames};
use crate::GenerationReport;

/// Generates the file module for the top-level type `ty` of a package that
/// sits `package_depth` modules below the output root.
#[must_use]
pub fn generate_type_file(
    ty: &TypeNode,
    package_depth: usize,
    names: &ModuleNames,
    report: &mut GenerationReport,
) -> String {
    let mut f = RustFile::new(&format!(
        "`{}`, generated from schema type `{}`.",
        ty.name,
        ty.original_name()
    ));
    f.line(&format!("use {} as rt;", runtime_path(package_depth + 1)));
    f.blank();
    let mut path = vec![ty.name.clone()];
    f.buf
        .push_str(&render_type(ty, &mut path, 1, package_depth, names, report));
    f.finish()
}

/// Renders `ty` (at identifier `path`) into a module `depth` levels below
/// the package, followed by the inline module of its nested types.
fn render_type(
    ty: &TypeNode,
    path: &mut Vec<String>,
    depth: usize,
    package_depth: usize,
    names: &ModuleNames,
    report: &mut GenerationReport,
) -> String {
    let mut out = match &ty.shape {
        TypeShape::Complex => {
            report.struct_count += 1;
            report.field_count += ty.fields.len();
            render_struct(ty, depth, names)
        }
        TypeShape::Enumeration(values) => {
            report.enum_count += 1;
            render_enum(ty, values)
        }
    };
    if ty.class_mapping().is_some() {
        report.mapped_type_count += 1;
    }
    report.mapped_field_count += ty
        .fields
        .iter()
        .filter(|f| f.property_mapping().is_some())
        .count();

    if !ty.nested.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "/// Types nested in [`{}`].", ty.name);
        if depth == 1 {
            let _ = writeln!(out, "#[allow(clippy::module_inception)]");
        }
        let _ = writeln!(out, "pub mod {} {{", names.inline(path));
        let _ = writeln!(
            out,
            "    use {} as rt;",
            runtime_path(package_depth + depth + 1)
        );
        for nested in &ty.nested {
            path.push(nested.name.clone());
            let inner = render_type(nested, path, depth + 1, package_depth, names, report);
            path.pop();
            let _ = writeln!(out);
            out.push_str(&indent(&inner, 1));
        }
        let _ = writeln!(out, "}}");
    }
    out
}

/// Documentation of a generated type.
#[must_use]
pub fn type_doc(ty: &TypeNode) -> String {
    if let Some(doc) = ty.documentation.as_deref() {
        let doc = normalize_comment(doc);
        if !doc.is_empty() {
            return doc;
        }
    }
    match ty.decl.as_ref().and_then(|d| d.name.as_deref()) {
        Some(name) => format!("Schema type `{name}`."),
        None => "Anonymous schema type.".to_string(),
    }
}

fn field_doc(field: &FieldNode) -> String {
    if let Some(doc) = field.documentation.as_deref() {
        let doc = normalize_comment(doc);
        if !doc.is_empty() {
            return doc;
        }
    }
    let name = field.original_name().unwrap_or(&field.name);
    match &field.binding {
        FieldBinding::Element { .. } => format!("Element `{name}`."),
        FieldBinding::Attribute { .. } => format!("Attribute `{name}`."),
        FieldBinding::Value => "Text content.".to_string(),
        FieldBinding::Any => "Wildcard content.".to_string(),
    }
}

fn render_struct(ty: &TypeNode, depth: usize, names: &ModuleNames) -> String {
    let mut out = String::new();
    for line in type_doc(ty).lines() {
        if line.is_empty() {
            let _ = writeln!(out, "///");
        } else {
            let _ = writeln!(out, "/// {line}");
        }
    }
    let _ = writeln!(out, "#[derive(Debug, Clone, Default, PartialEq)]");
    if ty.fields.is_empty() && ty.base.is_none() {
        let _ = writeln!(out, "pub struct {} {{}}", ty.name);
    } else {
        let _ = writeln!(out, "pub struct {} {{", ty.name);
        if let Some(base) = &ty.base {
            let _ = writeln!(out, "    /// Content of the extended type.");
            let _ = writeln!(
                out,
                "    pub {}: {},",
                base_field_name(ty),
                item_path(base, depth, names)
            );
        }
        for field in &ty.fields {
            for line in field_doc(field).lines() {
                if line.is_empty() {
                    let _ = writeln!(out, "    ///");
                } else {
                    let _ = writeln!(out, "    /// {line}");
                }
            }
            let _ = writeln!(out, "    pub {}: {},", field.name, field_type(field, depth, names));
        }
        let _ = writeln!(out, "}}");
    }
    let _ = writeln!(out);
    out.push_str(&mapped_impl(ty));
    out
}

/// Name of the field holding the extended type; avoids clashing with a
/// schema field called `base`.
fn base_field_name(ty: &TypeNode) -> String {
    let mut name = "base".to_string();
    while ty.field(&name).is_some() {
        name.push('_');
    }
    name
}

/// Renders `impl rt::RdfMapped` for `ty`, overriding only the constants
/// whose metadata is attached.
#[must_use]
pub fn mapped_impl(ty: &TypeNode) -> String {
    let mut body = String::new();
    if let Some(class) = ty.class_mapping() {
        let _ = writeln!(
            body,
            "    const RDFS_CLASS: Option<&'static str> = Some({:?});",
            class.class
        );
    }
    match ty.named_graph() {
        Some(NamedGraph::Instance) => {
            let _ = writeln!(
                body,
                "    const NAMED_GRAPH: rt::NamedGraph = rt::NamedGraph::Instance;"
            );
        }
        Some(NamedGraph::Static(uri)) => {
            let _ = writeln!(
                body,
                "    const NAMED_GRAPH: rt::NamedGraph = rt::NamedGraph::Static({uri:?});"
            );
        }
        None => {}
    }
    if let Some(table) = ty.namespaces() {
        let _ = writeln!(
            body,
            "    const NAMESPACES: &'static [(&'static str, &'static str)] = &["
        );
        for (prefix, uri) in &table.pairs {
            let _ = writeln!(body, "        ({prefix:?}, {uri:?}),");
        }
        let _ = writeln!(body, "    ];");
    }
    let mapped: Vec<&FieldNode> = ty
        .fields
        .iter()
        .filter(|f| f.property_mapping().is_some())
        .collect();
    if !mapped.is_empty() {
        let _ = writeln!(body, "    const PROPERTIES: &'static [rt::RdfProperty] = &[");
        for field in mapped {
            let Some(mapping) = field.property_mapping() else {
                continue;
            };
            let _ = writeln!(body, "        rt::RdfProperty {{");
            let _ = writeln!(body, "            field: {:?},", field.name);
            let _ = writeln!(body, "            property_name: {:?},", mapping.property_name);
            if mapping.links.is_empty() {
                let _ = writeln!(body, "            links: &[],");
            } else {
                let _ = writeln!(body, "            links: &[");
                for link in &mapping.links {
                    let shared_id = match &link.shared_id {
                        Some(id) => format!("Some({id:?})"),
                        None => "None".to_string(),
                    };
                    let _ = writeln!(
                        body,
                        "                rt::Link {{ property_name: {:?}, node_type: rt::NodeType::{}, shared_id: {shared_id} }},",
                        link.property_name,
                        link.node_type.as_str()
                    );
                }
                let _ = writeln!(body, "            ],");
            }
            let _ = writeln!(body, "            is_list: {},", mapping.is_list);
            match &mapping.literal {
                Some(literal) => {
                    let _ = writeln!(body, "            value: Some({:?}),", literal.value);
                    let _ = writeln!(body, "            data_type: {:?},", literal.datatype);
                }
                None => {
                    let _ = writeln!(body, "            value: None,");
                    let _ = writeln!(
                        body,
                        "            data_type: {DEFAULT_LITERAL_DATATYPE:?},"
                    );
                }
            }
            let _ = writeln!(body, "        }},");
        }
        let _ = writeln!(body, "    ];");
    }

    if body.is_empty() {
        format!("impl rt::RdfMapped for {} {{}}\n", ty.name)
    } else {
        format!("impl rt::RdfMapped for {} {{\n{body}}}\n", ty.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfbind_model::{
        ClassMapping, LinkHop, Literal, Metadata, NamespaceTable, PropertyMapping, ValueType,
    };

    fn travel() -> TypeNode {
        let mut travel = TypeNode::declared("Travel", Some("Travel"));
        let mut fare = FieldNode::element("fare_url", "fareTravelUrl", ValueType::from(rdfbind_model::Builtin::String));
        fare.optional = true;
        travel.fields.push(fare);
        travel.fields.push(FieldNode::element(
            "stops",
            "stop",
            ValueType::list_of(ValueType::Ref(vec!["Travel".to_string(), "Stop".to_string()])),
        ));
        let mut stop = TypeNode::declared("Stop", None);
        stop.fields.push(FieldNode::attribute(
            "name",
            "name",
            ValueType::from(rdfbind_model::Builtin::String),
        ));
        travel.nested.push(stop);
        travel
    }

    #[test]
    fn struct_fields_and_nested_module() {
        let mut report = GenerationReport::default();
        let src = generate_type_file(&travel(), 7, &ModuleNames::default(), &mut report);
        assert!(src.contains("use super::super::super::super::super::super::super::super::rdfbind_rt as rt;"));
        assert!(src.contains("pub struct Travel {"));
        assert!(src.contains("    /// Element `fareTravelUrl`.\n    pub fare_url: Option<String>,"));
        assert!(src.contains("    pub stops: Vec<super::travel::travel::Stop>,"));
        assert!(src.contains("pub mod travel {"));
        assert!(src.contains("    pub struct Stop {"));
        assert!(src.contains("        pub name: Option<String>,"));
        assert!(src.contains("    impl rt::RdfMapped for Stop {}"));
        assert_eq!(report.struct_count, 2);
        assert_eq!(report.field_count, 3);
        assert_eq!(report.mapped_field_count, 0);
    }

    #[test]
    fn metadata_becomes_associated_constants() {
        let mut ty = travel();
        ty.metadata.push(Metadata::Class(ClassMapping {
            class: "st4rt:Travel".to_string(),
        }));
        ty.metadata.push(Metadata::NamedGraph(NamedGraph::Instance));
        ty.metadata
            .push(Metadata::Namespaces(NamespaceTable::new([("st4rt", "http://st4rt.eu/ontologies/st4rt#")])));
        ty.fields[0].metadata.push(Metadata::Property(PropertyMapping {
            property_name: "st4rt:hasFareTravel".to_string(),
            links: vec![LinkHop::shared("st4rt:hasFare", "fare1")],
            is_list: false,
            literal: Some(Literal::string("fixed")),
        }));

        let src = mapped_impl(&ty);
        assert!(src.starts_with("impl rt::RdfMapped for Travel {\n"));
        assert!(src.contains("const RDFS_CLASS: Option<&'static str> = Some(\"st4rt:Travel\");"));
        assert!(src.contains("rt::NamedGraph::Instance;"));
        assert!(src.contains("(\"st4rt\", \"http://st4rt.eu/ontologies/st4rt#\"),"));
        assert!(src.contains("field: \"fare_url\","));
        assert!(src.contains(
            "rt::Link { property_name: \"st4rt:hasFare\", node_type: rt::NodeType::Shared, shared_id: Some(\"fare1\") },"
        ));
        assert!(src.contains("value: Some(\"fixed\"),"));
        assert!(!src.contains("\"stops\""));
    }

    #[test]
    fn base_field_avoids_schema_field_names() {
        let mut ty = TypeNode::declared("Derived", Some("derived"));
        ty.base = Some(vec!["Base".to_string()]);
        ty.fields.push(FieldNode::element(
            "base",
            "base",
            ValueType::from(rdfbind_model::Builtin::String),
        ));
        let src = render_struct(&ty, 1, &ModuleNames::default());
        assert!(src.contains("    pub base_: super::base::Base,"));
        assert!(src.contains("    pub base: String,"));
    }
}
