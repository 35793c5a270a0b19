//! Enumeration generation.
//!
//! A schema enumeration becomes a fieldless Rust enum with one variant per
//! allowed value, an `as_str` accessor returning the schema spelling and a
//! `Display` impl.

use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

use rdfbind_model::{names, TypeNode};

use crate::emit::normalize_comment;
use crate::structs::{mapped_impl, type_doc};

/// Returns `(variant, value)` pairs with unique variant identifiers.
#[must_use]
pub fn variants(values: &[String]) -> Vec<(String, String)> {
    let mut used = HashSet::new();
    values
        .iter()
        .map(|value| {
            let base = names::to_type_name(value);
            let mut candidate = base.clone();
            let mut n = 2;
            while !used.insert(candidate.clone()) {
                candidate = format!("{base}{n}");
                n += 1;
            }
            (candidate, value.clone())
        })
        .collect()
}

/// Renders the enum for `ty` with the given allowed `values`.
///
/// An enumeration without values has nothing to choose from and is rendered
/// as a newtype over `String`.
#[must_use]
pub fn render_enum(ty: &TypeNode, values: &[String]) -> String {
    let mut out = String::new();
    push_doc(&mut out, &type_doc(ty));

    if values.is_empty() {
        let _ = writeln!(out, "#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]");
        let _ = writeln!(out, "pub struct {}(pub String);", ty.name);
        let _ = writeln!(out);
        out.push_str(&mapped_impl(ty));
        return out;
    }

    let variants = variants(values);
    let _ = writeln!(
        out,
        "#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]"
    );
    let _ = writeln!(out, "pub enum {} {{", ty.name);
    for (i, (variant, value)) in variants.iter().enumerate() {
        let _ = writeln!(out, "    /// `{}`", normalize_comment(value));
        if i == 0 {
            let _ = writeln!(out, "    #[default]");
        }
        let _ = writeln!(out, "    {variant},");
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);

    let _ = writeln!(out, "impl {} {{", ty.name);
    let _ = writeln!(out, "    /// Returns the schema spelling of this value.");
    let _ = writeln!(out, "    #[must_use]");
    let _ = writeln!(out, "    pub fn as_str(self) -> &'static str {{");
    let _ = writeln!(out, "        match self {{");
    for (variant, value) in &variants {
        let _ = writeln!(out, "            Self::{variant} => {value:?},");
    }
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);

    let _ = writeln!(out, "impl core::fmt::Display for {} {{", ty.name);
    let _ = writeln!(
        out,
        "    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {{"
    );
    let _ = writeln!(out, "        f.write_str(self.as_str())");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);

    out.push_str(&mapped_impl(ty));
    out
}

fn push_doc(out: &mut String, doc: &str) {
    for line in doc.lines() {
        if line.is_empty() {
            let _ = writeln!(out, "///");
        } else {
            let _ = writeln!(out, "/// {line}");
        }
    }
}
