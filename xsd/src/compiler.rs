//! Two-pass XSD → [`Package`] compiler.
//!
//! Pass one registers every global declaration and claims the identifiers of
//! the types that will be generated, so forward references resolve. Pass two
//! walks the global declarations in document order and builds the types.

use std::collections::{HashMap, HashSet};

use rdfbind_model::{
    iris, names, Builtin, FieldBinding, FieldNode, Package, TypeNode, TypeShape, ValueType,
    FACTORY_TYPE_NAME,
};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::builtins::builtin_type;
use crate::error::SchemaError;

const XS: &str = iris::XML_SCHEMA;

/// Bound on group, type and attribute-group reference nesting.
const MAX_DEPTH: usize = 64;

/// Occurrence constraints inherited from enclosing particles.
#[derive(Debug, Clone, Copy, Default)]
struct Occurs {
    optional: bool,
    repeated: bool,
}

impl Occurs {
    fn nest(self, node: Node<'_, '_>, in_choice: bool) -> Self {
        Self {
            optional: self.optional || in_choice || node.attribute("minOccurs") == Some("0"),
            repeated: self.repeated || max_occurs_many(node),
        }
    }
}

fn max_occurs_many(node: Node<'_, '_>) -> bool {
    match node.attribute("maxOccurs") {
        Some("unbounded") => true,
        Some(n) => n.trim().parse::<u64>().is_ok_and(|n| n > 1),
        None => false,
    }
}

/// Identifiers already taken inside the type being built.
struct Scope {
    path: Vec<String>,
    fields: HashSet<String>,
    nested: HashSet<String>,
}

impl Scope {
    fn new(path: Vec<String>) -> Self {
        Self {
            path,
            fields: HashSet::new(),
            nested: HashSet::new(),
        }
    }
}

/// Returns `base`, or `base` with the smallest numeric suffix not yet in
/// `used`, and records the result.
fn unique_name(base: String, used: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}{n}");
        n += 1;
    }
    candidate
}

fn xs_children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == Some(XS))
}

fn xs_child<'a, 'input>(node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    xs_children(node).find(|n| n.tag_name().name() == local)
}

fn documentation(node: Node<'_, '_>) -> Option<String> {
    let parts: Vec<String> = xs_children(node)
        .filter(|n| n.tag_name().name() == "annotation")
        .flat_map(xs_children)
        .filter(|n| n.tag_name().name() == "documentation")
        .map(|n| {
            n.descendants()
                .filter(|d| d.is_text())
                .filter_map(|d| d.text())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn enumeration_values(simple_type: Node<'_, '_>) -> Vec<String> {
    xs_child(simple_type, "restriction")
        .map(|r| {
            xs_children(r)
                .filter(|n| n.tag_name().name() == "enumeration")
                .filter_map(|n| n.attribute("value"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Compiles a parsed schema document into its target namespace and package.
pub(crate) fn compile_document(
    doc: &Document<'_>,
    system_id: &str,
) -> Result<(String, Package), SchemaError> {
    let root = doc.root_element();
    if root.tag_name().namespace() != Some(XS) || root.tag_name().name() != "schema" {
        return Err(SchemaError::NotASchema {
            system_id: system_id.to_string(),
        });
    }

    let mut compiler = Compiler::new(doc, system_id, root.attribute("targetNamespace").unwrap_or(""));
    compiler.register(root);
    let mut types = compiler.build(root)?;
    types.push(TypeNode::factory());

    let target_namespace = compiler.target_ns.to_string();
    let package = Package {
        name: names::package_for_namespace(&target_namespace),
        namespace: (!target_namespace.is_empty()).then(|| target_namespace.clone()),
        types,
    };
    debug!(
        package = %package.name,
        types = package.types.len(),
        "compiled schema {system_id}"
    );
    Ok((target_namespace, package))
}

struct Compiler<'a, 'input> {
    doc: &'a Document<'input>,
    system_id: &'a str,
    target_ns: &'a str,
    complex_types: HashMap<&'a str, Node<'a, 'input>>,
    simple_types: HashMap<&'a str, Node<'a, 'input>>,
    elements: HashMap<&'a str, Node<'a, 'input>>,
    groups: HashMap<&'a str, Node<'a, 'input>>,
    attribute_groups: HashMap<&'a str, Node<'a, 'input>>,
    attributes: HashMap<&'a str, Node<'a, 'input>>,
    /// Named complex or enumeration type → generated identifier.
    type_ids: HashMap<&'a str, String>,
    /// Global element with an anonymous complex type → generated identifier.
    element_ids: HashMap<&'a str, String>,
    top_level: HashSet<String>,
}

impl<'a, 'input> Compiler<'a, 'input> {
    fn new(doc: &'a Document<'input>, system_id: &'a str, target_ns: &'a str) -> Self {
        Self {
            doc,
            system_id,
            target_ns,
            complex_types: HashMap::new(),
            simple_types: HashMap::new(),
            elements: HashMap::new(),
            groups: HashMap::new(),
            attribute_groups: HashMap::new(),
            attributes: HashMap::new(),
            type_ids: HashMap::new(),
            element_ids: HashMap::new(),
            top_level: HashSet::from([FACTORY_TYPE_NAME.to_string()]),
        }
    }

    fn register(&mut self, root: Node<'a, 'input>) {
        for child in xs_children(root) {
            let Some(name) = child.attribute("name") else {
                continue;
            };
            match child.tag_name().name() {
                "complexType" => {
                    self.complex_types.insert(name, child);
                    let id = unique_name(names::to_type_name(name), &mut self.top_level);
                    self.type_ids.insert(name, id);
                }
                "simpleType" => {
                    self.simple_types.insert(name, child);
                    if !enumeration_values(child).is_empty() {
                        let id = unique_name(names::to_type_name(name), &mut self.top_level);
                        self.type_ids.insert(name, id);
                    }
                }
                "element" => {
                    self.elements.insert(name, child);
                    if xs_child(child, "complexType").is_some() {
                        let id = unique_name(names::to_type_name(name), &mut self.top_level);
                        self.element_ids.insert(name, id);
                    }
                }
                "group" => {
                    self.groups.insert(name, child);
                }
                "attributeGroup" => {
                    self.attribute_groups.insert(name, child);
                }
                "attribute" => {
                    self.attributes.insert(name, child);
                }
                _ => {}
            }
        }
    }

    fn build(&self, root: Node<'a, 'input>) -> Result<Vec<TypeNode>, SchemaError> {
        let mut types = Vec::new();
        for child in xs_children(root) {
            let Some(name) = child.attribute("name") else {
                continue;
            };
            match child.tag_name().name() {
                "complexType" => {
                    if let Some(id) = self.type_ids.get(name) {
                        types.push(self.complex_type(child, id, Some(name), vec![id.clone()], 0)?);
                    }
                }
                "simpleType" => {
                    if let Some(id) = self.type_ids.get(name) {
                        let mut ty = TypeNode::declared(id, Some(name));
                        ty.shape = TypeShape::Enumeration(enumeration_values(child));
                        ty.documentation = documentation(child);
                        types.push(ty);
                    }
                }
                "element" => {
                    let (Some(id), Some(ct)) =
                        (self.element_ids.get(name), xs_child(child, "complexType"))
                    else {
                        continue;
                    };
                    let mut ty = self.complex_type(ct, id, Some(name), vec![id.clone()], 0)?;
                    if let Some(doc) = documentation(child) {
                        ty.documentation = Some(doc);
                    }
                    types.push(ty);
                }
                _ => {}
            }
        }
        Ok(types)
    }

    fn complex_type(
        &self,
        node: Node<'a, 'input>,
        id: &str,
        decl: Option<&str>,
        path: Vec<String>,
        depth: usize,
    ) -> Result<TypeNode, SchemaError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(node, "anonymous type nesting too deep"));
        }
        let mut ty = TypeNode::declared(id, decl);
        ty.documentation = documentation(node);
        let mut scope = Scope::new(path);
        self.content(node, &mut ty, &mut scope, depth)?;
        Ok(ty)
    }

    fn content(
        &self,
        node: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), SchemaError> {
        for child in xs_children(node) {
            match child.tag_name().name() {
                "sequence" | "choice" | "all" => {
                    self.particles(child, ty, scope, Occurs::default().nest(child, false), depth)?;
                }
                "group" => {
                    self.group_ref(child, ty, scope, Occurs::default().nest(child, false), depth)?;
                }
                "attribute" => self.attribute(child, ty, scope, depth)?,
                "attributeGroup" => self.attribute_group(child, ty, scope, depth)?,
                "complexContent" => {
                    for derivation in xs_children(child) {
                        match derivation.tag_name().name() {
                            "extension" => {
                                ty.base = self.complex_base(derivation)?;
                                self.content(derivation, ty, scope, depth + 1)?;
                            }
                            "restriction" => self.content(derivation, ty, scope, depth + 1)?,
                            _ => {}
                        }
                    }
                }
                "simpleContent" => {
                    for derivation in xs_children(child) {
                        let kind = derivation.tag_name().name();
                        if kind != "extension" && kind != "restriction" {
                            continue;
                        }
                        self.simple_content(derivation, ty, scope, depth)?;
                        self.content(derivation, ty, scope, depth + 1)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Records the base of a simple-content derivation: a complex base
    /// becomes the extended type, anything else a `value` field.
    fn simple_content(
        &self,
        derivation: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let value_type = match derivation.attribute("base") {
            Some(base) => {
                let (ns, local) = self.qname(base, derivation)?;
                if self.is_target(ns) && self.complex_types.contains_key(local) {
                    ty.base = self.type_ids.get(local).map(|id| vec![id.clone()]);
                    return Ok(());
                }
                self.type_ref(base, derivation, depth + 1)?
            }
            None => Builtin::String.into(),
        };
        ty.fields.push(FieldNode {
            name: unique_name("value".to_string(), &mut scope.fields),
            value_type,
            binding: FieldBinding::Value,
            optional: false,
            documentation: None,
            metadata: Vec::new(),
        });
        Ok(())
    }

    fn complex_base(&self, derivation: Node<'a, 'input>) -> Result<Option<Vec<String>>, SchemaError> {
        let Some(base) = derivation.attribute("base") else {
            return Err(self.invalid(derivation, "extension without base"));
        };
        let (ns, local) = self.qname(base, derivation)?;
        if ns == Some(XS) {
            return Ok(None);
        }
        if !self.is_target(ns) {
            warn!("{}: base type `{base}` is outside the target namespace; ignoring", self.system_id);
            return Ok(None);
        }
        match self.type_ids.get(local) {
            Some(id) if self.complex_types.contains_key(local) => Ok(Some(vec![id.clone()])),
            _ => Err(self.unresolved(derivation, "type", base)),
        }
    }

    fn particles(
        &self,
        group: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        occurs: Occurs,
        depth: usize,
    ) -> Result<(), SchemaError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(group, "model group nesting too deep"));
        }
        let in_choice = group.tag_name().name() == "choice";
        for child in xs_children(group) {
            let inner = occurs.nest(child, in_choice);
            match child.tag_name().name() {
                "element" => self.element_field(child, ty, scope, inner, depth)?,
                "sequence" | "choice" | "all" => {
                    self.particles(child, ty, scope, inner, depth + 1)?;
                }
                "group" => self.group_ref(child, ty, scope, inner, depth + 1)?,
                "any" => {
                    let value_type = if inner.repeated {
                        ValueType::list_of(Builtin::String.into())
                    } else {
                        Builtin::String.into()
                    };
                    ty.fields.push(FieldNode {
                        name: unique_name("any".to_string(), &mut scope.fields),
                        value_type,
                        binding: FieldBinding::Any,
                        optional: true,
                        documentation: documentation(child),
                        metadata: Vec::new(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn group_ref(
        &self,
        node: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        occurs: Occurs,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let Some(reference) = node.attribute("ref") else {
            return Err(self.invalid(node, "local group without ref"));
        };
        let (_, local) = self.qname(reference, node)?;
        let definition = self
            .groups
            .get(local)
            .copied()
            .ok_or_else(|| self.unresolved(node, "group", reference))?;
        for child in xs_children(definition) {
            if matches!(child.tag_name().name(), "sequence" | "choice" | "all") {
                self.particles(child, ty, scope, occurs.nest(child, false), depth + 1)?;
            }
        }
        Ok(())
    }

    fn element_field(
        &self,
        node: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        occurs: Occurs,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let (decl, name, global) = match node.attribute("ref") {
            Some(reference) => {
                let (ns, local) = self.qname(reference, node)?;
                if self.is_target(ns) {
                    let global = self
                        .elements
                        .get(local)
                        .copied()
                        .ok_or_else(|| self.unresolved(node, "element", reference))?;
                    (global, local, true)
                } else {
                    warn!("{}: element `{reference}` is outside the target namespace; mapping to String", self.system_id);
                    (node, local, false)
                }
            }
            None => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| self.invalid(node, "local element without name or ref"))?;
                (node, name, false)
            }
        };

        let value_type = if let Some(id) = self.element_ids.get(name).filter(|_| global) {
            ValueType::Ref(vec![id.clone()])
        } else if let Some(type_name) = decl.attribute("type") {
            self.type_ref(type_name, decl, depth + 1)?
        } else if let Some(ct) = xs_child(decl, "complexType") {
            let id = unique_name(names::to_type_name(name), &mut scope.nested);
            let mut path = scope.path.clone();
            path.push(id.clone());
            let mut nested = self.complex_type(ct, &id, None, path.clone(), depth + 1)?;
            if let Some(doc) = documentation(decl) {
                nested.documentation = Some(doc);
            }
            ty.nested.push(nested);
            ValueType::Ref(path)
        } else if let Some(st) = xs_child(decl, "simpleType") {
            self.simple_type(st, depth + 1)?
        } else {
            Builtin::String.into()
        };

        let value_type = if occurs.repeated {
            ValueType::list_of(value_type)
        } else {
            value_type
        };
        ty.fields.push(FieldNode {
            name: unique_name(names::to_snake_case(name), &mut scope.fields),
            value_type,
            binding: FieldBinding::Element {
                name: Some(name.to_string()),
            },
            optional: occurs.optional && !occurs.repeated,
            documentation: documentation(decl),
            metadata: Vec::new(),
        });
        Ok(())
    }

    fn attribute(
        &self,
        node: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let usage = node.attribute("use");
        if usage == Some("prohibited") {
            return Ok(());
        }
        let (decl, name) = match node.attribute("ref") {
            Some(reference) => {
                let (ns, local) = self.qname(reference, node)?;
                if self.is_target(ns) {
                    let global = self
                        .attributes
                        .get(local)
                        .copied()
                        .ok_or_else(|| self.unresolved(node, "attribute", reference))?;
                    (global, local)
                } else {
                    (node, local)
                }
            }
            None => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| self.invalid(node, "attribute without name or ref"))?;
                (node, name)
            }
        };

        let value_type = if let Some(type_name) = decl.attribute("type") {
            self.type_ref(type_name, decl, depth + 1)?
        } else if let Some(st) = xs_child(decl, "simpleType") {
            self.simple_type(st, depth + 1)?
        } else {
            Builtin::String.into()
        };
        ty.fields.push(FieldNode {
            name: unique_name(names::to_snake_case(name), &mut scope.fields),
            value_type,
            binding: FieldBinding::Attribute {
                name: Some(name.to_string()),
            },
            optional: usage != Some("required"),
            documentation: documentation(decl),
            metadata: Vec::new(),
        });
        Ok(())
    }

    fn attribute_group(
        &self,
        node: Node<'a, 'input>,
        ty: &mut TypeNode,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), SchemaError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(node, "attribute group nesting too deep"));
        }
        let Some(reference) = node.attribute("ref") else {
            return Err(self.invalid(node, "local attribute group without ref"));
        };
        let (_, local) = self.qname(reference, node)?;
        let definition = self
            .attribute_groups
            .get(local)
            .copied()
            .ok_or_else(|| self.unresolved(node, "attribute group", reference))?;
        for child in xs_children(definition) {
            match child.tag_name().name() {
                "attribute" => self.attribute(child, ty, scope, depth + 1)?,
                "attributeGroup" => self.attribute_group(child, ty, scope, depth + 1)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Resolves a `type=`/`base=` reference to a value type.
    fn type_ref(
        &self,
        qname: &'a str,
        ctx: Node<'a, 'input>,
        depth: usize,
    ) -> Result<ValueType, SchemaError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(ctx, "type derivation too deep"));
        }
        let (ns, local) = self.qname(qname, ctx)?;
        if ns == Some(XS) {
            return builtin_type(local).ok_or_else(|| SchemaError::UnknownType {
                system_id: self.system_id.to_string(),
                line: self.line(ctx),
                name: local.to_string(),
            });
        }
        if !self.is_target(ns) {
            warn!("{}: type `{qname}` is outside the target namespace; mapping to String", self.system_id);
            return Ok(Builtin::String.into());
        }
        if let Some(id) = self.type_ids.get(local) {
            return Ok(ValueType::Ref(vec![id.clone()]));
        }
        match self.simple_types.get(local) {
            Some(st) => self.simple_type(*st, depth + 1),
            None => Err(self.unresolved(ctx, "type", qname)),
        }
    }

    /// Resolves a simple type without enumeration facets to its value type.
    fn simple_type(&self, node: Node<'a, 'input>, depth: usize) -> Result<ValueType, SchemaError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(node, "type derivation too deep"));
        }
        for child in xs_children(node) {
            match child.tag_name().name() {
                "restriction" => {
                    if let Some(base) = child.attribute("base") {
                        return self.type_ref(base, child, depth + 1);
                    }
                    return match xs_child(child, "simpleType") {
                        Some(inner) => self.simple_type(inner, depth + 1),
                        None => Ok(Builtin::String.into()),
                    };
                }
                "list" => {
                    let item = if let Some(item_type) = child.attribute("itemType") {
                        self.type_ref(item_type, child, depth + 1)?
                    } else if let Some(inner) = xs_child(child, "simpleType") {
                        self.simple_type(inner, depth + 1)?
                    } else {
                        Builtin::String.into()
                    };
                    return Ok(ValueType::list_of(item));
                }
                "union" => return Ok(Builtin::String.into()),
                _ => {}
            }
        }
        Ok(Builtin::String.into())
    }

    /// Splits a QName into its namespace URI and local part, resolving the
    /// prefix against the in-scope declarations of `ctx`.
    fn qname(
        &self,
        qname: &'a str,
        ctx: Node<'a, 'input>,
    ) -> Result<(Option<&'a str>, &'a str), SchemaError> {
        match qname.split_once(':') {
            Some((prefix, local)) => {
                let ns = ctx.lookup_namespace_uri(Some(prefix)).ok_or_else(|| {
                    self.invalid(ctx, format!("undeclared namespace prefix `{prefix}`"))
                })?;
                Ok((Some(ns), local))
            }
            None => Ok((ctx.lookup_namespace_uri(None), qname)),
        }
    }

    fn is_target(&self, ns: Option<&str>) -> bool {
        ns.unwrap_or("") == self.target_ns
    }

    fn line(&self, node: Node<'_, '_>) -> u32 {
        self.doc.text_pos_at(node.range().start).row
    }

    fn invalid(&self, node: Node<'_, '_>, message: impl Into<String>) -> SchemaError {
        SchemaError::Invalid {
            system_id: self.system_id.to_string(),
            line: self.line(node),
            message: message.into(),
        }
    }

    fn unresolved(&self, node: Node<'_, '_>, kind: &'static str, name: &str) -> SchemaError {
        SchemaError::UnresolvedReference {
            system_id: self.system_id.to_string(),
            line: self.line(node),
            kind,
            name: name.to_string(),
        }
    }
}
