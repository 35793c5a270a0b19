//! `ObjectFactory` generation: one constructor per generated type.

use std::collections::HashSet;

use rdfbind_model::{Package, TypeNode};

use crate::emit::RustFile;
use crate::mapping::{item_path, module_name, ModuleNames};

fn collect<'a>(
    ty: &'a TypeNode,
    path: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a TypeNode)>,
) {
    path.push(ty.name.clone());
    out.push((path.clone(), ty));
    for nested in &ty.nested {
        collect(nested, path, out);
    }
    path.pop();
}

/// Every non-factory type of `package` with its identifier path, in
/// declaration order.
#[must_use]
pub fn constructible_types(package: &Package) -> Vec<(Vec<String>, &TypeNode)> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    for ty in package.types.iter().filter(|t| !t.is_factory) {
        collect(ty, &mut path, &mut out);
    }
    out
}

/// Generates the factory module of `package`.
#[must_use]
pub fn generate_factory_file(
    package: &Package,
    factory: &TypeNode,
    names: &ModuleNames,
) -> String {
    let mut f = RustFile::new(&format!(
        "`{}`: constructors for the types of package `{}`.",
        factory.name, package.name
    ));

    f.doc_comment("Creates empty instances of the generated types.");
    f.line("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]");
    f.line(&format!("pub struct {};", factory.name));
    f.blank();
    f.line(&format!("impl {} {{", factory.name));
    f.indented_doc_comment("Returns a factory.");
    f.line("    #[must_use]");
    f.line("    pub fn new() -> Self {");
    f.line("        Self");
    f.line("    }");

    let mut used = HashSet::new();
    for (path, _) in constructible_types(package) {
        let base = format!(
            "create_{}",
            path.iter()
                .map(|name| module_name(name).trim_end_matches('_').to_string())
                .collect::<Vec<_>>()
                .join("_")
        );
        let mut method = base.clone();
        let mut n = 2;
        while !used.insert(method.clone()) {
            method = format!("{base}{n}");
            n += 1;
        }
        let ty = item_path(&path, 1, names);
        f.blank();
        f.indented_doc_comment(&format!("Creates an empty [`{}`]({ty}).", path.join("::")));
        f.line("    #[must_use]");
        f.line(&format!("    pub fn {method}(&self) -> {ty} {{"));
        f.line(&format!("        {ty}::default()"));
        f.line("    }");
    }
    f.line("}");
    f.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rdfbind_test_helpers::{travel_tree, TRAVEL_PACKAGE};

    #[test]
    fn one_constructor_per_type() {
        let tree = travel_tree();
        let package = tree.find_package(TRAVEL_PACKAGE).expect("fixture package");
        let factory = package.factory().expect("factory");
        let names = ModuleNames::new(package, []);
        let src = generate_factory_file(package, factory, &names);

        assert!(src.contains("pub struct ObjectFactory;"));
        assert!(src.contains("    pub fn create_travel(&self) -> super::travel::Travel {"));
        assert!(src.contains(
            "    pub fn create_travel_stop(&self) -> super::travel::travel::Stop {"
        ));
        assert!(src.contains("        super::passenger_type::PassengerType::default()"));
        assert!(src.contains("create_travel_class"));
        assert_eq!(src.matches("#[must_use]").count(), 5);
    }
}
