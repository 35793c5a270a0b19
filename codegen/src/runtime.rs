//! The `rdfbind_rt` support module written next to the generated packages.
//!
//! Generated types describe their RDF mapping through associated constants
//! of the `RdfMapped` trait defined here, so the emitted code depends on
//! nothing outside the output directory.

use rdfbind_model::iris;

use crate::emit::RustFile;

/// Generates the source of the runtime support module.
#[must_use]
pub fn generate_runtime_file() -> String {
    let mut f = RustFile::new(
        "RDF mapping metadata shared by the generated types.\n\
         \n\
         Every generated type implements [`RdfMapped`]; its associated constants\n\
         carry the ontology class, named graph, namespace table and property\n\
         chains attached during annotation.",
    );

    f.doc_comment("Graph individuals are persisted into unless a type says otherwise.");
    f.line(&format!(
        "pub const MESSAGE_GRAPH: &str = {:?};",
        iris::MESSAGE_GRAPH
    ));
    f.blank();

    f.doc_comment("Identity of an intermediate node in a property chain.");
    f.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    f.line("pub enum NodeType {");
    f.indented_doc_comment("A fresh blank node per individual.");
    f.line("    Anonymous,");
    f.indented_doc_comment("A node shared by every chain naming the same identifier.");
    f.line("    Shared,");
    f.line("}");
    f.blank();

    f.doc_comment("One intermediate hop of a property chain.");
    f.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    f.line("pub struct Link {");
    f.indented_doc_comment("Property leading to the intermediate node.");
    f.line("    pub property_name: &'static str,");
    f.indented_doc_comment("Identity of the intermediate node.");
    f.line("    pub node_type: NodeType,");
    f.indented_doc_comment("Identifier of a shared node.");
    f.line("    pub shared_id: Option<&'static str>,");
    f.line("}");
    f.blank();

    f.doc_comment("RDF mapping of one field.");
    f.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    f.line("pub struct RdfProperty {");
    f.indented_doc_comment("Name of the Rust field.");
    f.line("    pub field: &'static str,");
    f.indented_doc_comment("Terminal property of the chain.");
    f.line("    pub property_name: &'static str,");
    f.indented_doc_comment("Hops applied before the terminal property.");
    f.line("    pub links: &'static [Link],");
    f.indented_doc_comment("Whether the field holds several values.");
    f.line("    pub is_list: bool,");
    f.indented_doc_comment("Literal object written instead of the field value.");
    f.line("    pub value: Option<&'static str>,");
    f.indented_doc_comment("Datatype tag of `value`.");
    f.line("    pub data_type: &'static str,");
    f.line("}");
    f.blank();

    f.doc_comment("Named graph policy of a type.");
    f.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    f.line("pub enum NamedGraph {");
    f.indented_doc_comment("Each individual is its own graph.");
    f.line("    Instance,");
    f.indented_doc_comment("A fixed graph URI.");
    f.line("    Static(&'static str),");
    f.line("}");
    f.blank();

    f.doc_comment("RDF mapping metadata of a generated type.");
    f.line("pub trait RdfMapped {");
    f.indented_doc_comment("Ontology class of the type.");
    f.line("    const RDFS_CLASS: Option<&'static str> = None;");
    f.indented_doc_comment("Graph the type's individuals are written to.");
    f.line("    const NAMED_GRAPH: NamedGraph = NamedGraph::Static(MESSAGE_GRAPH);");
    f.indented_doc_comment("Prefix and namespace URI pairs, in declaration order.");
    f.line("    const NAMESPACES: &'static [(&'static str, &'static str)] = &[];");
    f.indented_doc_comment("Mapped fields, in declaration order.");
    f.line("    const PROPERTIES: &'static [RdfProperty] = &[];");
    f.blank();
    f.indented_doc_comment("Returns the mapping of the field named `field`.");
    f.line("    fn property(field: &str) -> Option<&'static RdfProperty> {");
    f.line("        Self::PROPERTIES.iter().find(|p| p.field == field)");
    f.line("    }");
    f.line("}");

    f.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_defines_the_trait_and_defaults() {
        let src = generate_runtime_file();
        assert!(src.contains("pub trait RdfMapped {"));
        assert!(src.contains(
            "pub const MESSAGE_GRAPH: &str = \"http://st4rt.eu/ontologies/st4rt/message\";"
        ));
        assert!(src.contains("const NAMED_GRAPH: NamedGraph = NamedGraph::Static(MESSAGE_GRAPH);"));
        assert_eq!(src.matches('{').count(), src.matches('}').count());
    }
}
