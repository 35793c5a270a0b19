//! Type tree → Rust mapping tables.
//!
//! Deterministic mappings from packages, type paths and value types to Rust
//! module paths and type expressions.
//!
//! Layout: a package `a.b.c` is the module `a::b::c` below the output root.
//! A top-level type `Travel` lives in the file module `travel`; types nested
//! in `Travel` live in the inline module `travel::travel`, types nested in
//! those in `travel::travel::stop`, and so on. Module names that collide in
//! their scope get numeric suffixes (see [`ModuleNames`]).

use std::collections::{HashMap, HashSet};

use rdfbind_model::{names, FieldNode, Package, TypeNode, ValueType};

use crate::error::EmitError;

/// Name of the runtime support module at the output root.
pub const RUNTIME_MODULE: &str = "rdfbind_rt";

/// Name of the factory module inside each package.
pub const FACTORY_MODULE: &str = "object_factory";

/// Returns the module name used for a type identifier.
#[must_use]
pub fn module_name(type_name: &str) -> String {
    names::to_snake_case(type_name)
}

/// Alias of the runtime module inside every generated type module.
const RUNTIME_ALIAS: &str = "rt";

/// Returns `base`, or `base` with the smallest numeric suffix not yet in
/// `used`, and records the result.
fn unique_module(base: String, used: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}{n}");
        n += 1;
    }
    candidate
}

/// Names already taken in a module holding `types` and the `rt` alias.
fn scope_names<'a>(types: impl IntoIterator<Item = &'a TypeNode>) -> HashSet<String> {
    let mut used: HashSet<String> = types.into_iter().map(|t| t.name.clone()).collect();
    used.insert(RUNTIME_ALIAS.to_string());
    used
}

/// Module names of the types of one package.
///
/// Every top-level type gets a file module in the package module, and every
/// type with nested types gets an inline module next to its own item. Type
/// identifiers are unique, but their snake-case spellings need not be
/// (`ABC` and `Abc` are both `abc`), so names are assigned per scope in
/// declaration order and collisions get numeric suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleNames {
    files: HashMap<String, String>,
    inline: HashMap<Vec<String>, String>,
}

impl ModuleNames {
    /// Assigns module names to the types of `package`. `reserved` holds the
    /// names of nested package modules.
    #[must_use]
    pub fn new<'a>(package: &Package, reserved: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names = Self::default();
        let mut used: HashSet<String> = reserved.into_iter().map(str::to_string).collect();
        used.insert(FACTORY_MODULE.to_string());
        let types: Vec<&TypeNode> = package.types.iter().filter(|t| !t.is_factory).collect();
        for ty in &types {
            let module = unique_module(module_name(&ty.name), &mut used);
            names.files.insert(ty.name.clone(), module);
        }
        let mut path = Vec::new();
        for ty in types {
            names.assign(ty, &mut path, &mut scope_names([ty]));
        }
        names
    }

    fn assign(&mut self, ty: &TypeNode, path: &mut Vec<String>, scope: &mut HashSet<String>) {
        if ty.nested.is_empty() {
            return;
        }
        path.push(ty.name.clone());
        let module = unique_module(module_name(&ty.name), scope);
        self.inline.insert(path.clone(), module);
        let mut inner = scope_names(&ty.nested);
        for nested in &ty.nested {
            self.assign(nested, path, &mut inner);
        }
        path.pop();
    }

    /// File module of the top-level type `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> String {
        self.files
            .get(name)
            .cloned()
            .unwrap_or_else(|| module_name(name))
    }

    /// Inline module holding the types nested in the type at `path`.
    #[must_use]
    pub fn inline(&self, path: &[String]) -> String {
        match self.inline.get(path) {
            Some(module) => module.clone(),
            None => path.last().map(|name| module_name(name)).unwrap_or_default(),
        }
    }
}

/// Returns true if `s` can be used as a module name.
#[must_use]
pub fn is_module_name(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && s != "_"
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !names::is_keyword(s)
}

/// Splits a package identifier into module names.
///
/// # Errors
///
/// Returns [`EmitError::InvalidPackage`] if a segment is not a usable module
/// name.
pub fn package_segments(package: &Package) -> Result<Vec<String>, EmitError> {
    package
        .name
        .split('.')
        .map(|segment| {
            if is_module_name(segment) {
                Ok(segment.to_string())
            } else {
                Err(EmitError::InvalidPackage {
                    package: package.name.clone(),
                    segment: segment.to_string(),
                })
            }
        })
        .collect()
}

/// Module path, relative to the package module, that defines the type at
/// `path`.
#[must_use]
pub fn type_module(path: &[String], names: &ModuleNames) -> Vec<String> {
    let Some(first) = path.first() else {
        return Vec::new();
    };
    let mut modules = vec![names.file(first)];
    modules.extend((1..path.len()).map(|i| names.inline(&path[..i])));
    modules
}

fn supers(depth: usize) -> String {
    "super::".repeat(depth)
}

/// Rust path of the type at `path`, as seen from a module `depth` levels
/// below the package module.
#[must_use]
pub fn item_path(path: &[String], depth: usize, names: &ModuleNames) -> String {
    let Some(item) = path.last() else {
        return "()".to_string();
    };
    let mut out = supers(depth);
    for module in type_module(path, names) {
        out.push_str(&module);
        out.push_str("::");
    }
    out.push_str(item);
    out
}

/// Path of the runtime module as seen from a module `depth` levels below
/// the output root.
#[must_use]
pub fn runtime_path(depth: usize) -> String {
    format!("{}{RUNTIME_MODULE}", supers(depth))
}

/// Rust type expression for `vt` at module `depth` below the package.
#[must_use]
pub fn rust_type(vt: &ValueType, depth: usize, names: &ModuleNames) -> String {
    match vt {
        ValueType::Builtin(b) => b.rust_name().to_string(),
        ValueType::Ref(path) => item_path(path, depth, names),
        ValueType::Generic { container, args } => {
            if args.is_empty() {
                format!("{container}<()>")
            } else {
                let args: Vec<String> = args.iter().map(|a| rust_type(a, depth, names)).collect();
                format!("{container}<{}>", args.join(", "))
            }
        }
    }
}

/// Rust type of a struct field: direct references are boxed, optional
/// fields wrapped in `Option`.
#[must_use]
pub fn field_type(field: &FieldNode, depth: usize, names: &ModuleNames) -> String {
    let inner = match &field.value_type {
        ValueType::Ref(path) => format!("Box<{}>", item_path(path, depth, names)),
        other => rust_type(other, depth, names),
    };
    if field.optional {
        format!("Option<{inner}>")
    } else {
        inner
    }
}
