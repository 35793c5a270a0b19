//! XML Schema builtin datatypes → Rust value types.

use rdfbind_model::{Builtin, ValueType};

/// Maps the local name of an `xs:` builtin type to its Rust value type.
///
/// Returns `None` for names that are not XML Schema builtins.
pub(crate) fn builtin_type(local: &str) -> Option<ValueType> {
    let builtin = match local {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "NMTOKEN"
        | "ID" | "IDREF" | "ENTITY" | "QName" | "NOTATION" | "anyURI" | "anySimpleType"
        | "anyType" | "anyAtomicType" | "base64Binary" | "hexBinary" | "dateTime"
        | "dateTimeStamp" | "date" | "time" | "duration" | "dayTimeDuration"
        | "yearMonthDuration" | "gYear" | "gYearMonth" | "gMonth" | "gMonthDay" | "gDay" => {
            Builtin::String
        }
        "boolean" => Builtin::Bool,
        "byte" => Builtin::I8,
        "short" => Builtin::I16,
        "int" => Builtin::I32,
        "long" | "integer" | "negativeInteger" | "nonPositiveInteger" => Builtin::I64,
        "unsignedByte" => Builtin::U8,
        "unsignedShort" => Builtin::U16,
        "unsignedInt" => Builtin::U32,
        "unsignedLong" | "positiveInteger" | "nonNegativeInteger" => Builtin::U64,
        "float" => Builtin::F32,
        "double" | "decimal" => Builtin::F64,
        "NMTOKENS" | "IDREFS" | "ENTITIES" => {
            return Some(ValueType::list_of(Builtin::String.into()));
        }
        _ => return None,
    };
    Some(builtin.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(builtin_type("string"), Some(Builtin::String.into()));
        assert_eq!(builtin_type("dateTime"), Some(Builtin::String.into()));
        assert_eq!(builtin_type("int"), Some(Builtin::I32.into()));
        assert_eq!(builtin_type("integer"), Some(Builtin::I64.into()));
        assert_eq!(builtin_type("decimal"), Some(Builtin::F64.into()));
        assert_eq!(builtin_type("nonNegativeInteger"), Some(Builtin::U64.into()));
    }

    #[test]
    fn list_builtins_are_containers() {
        let tokens = builtin_type("NMTOKENS");
        assert!(tokens.is_some_and(|vt| vt.is_parameterized()));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(builtin_type("strin"), None);
        assert_eq!(builtin_type("Travel"), None);
    }
}
