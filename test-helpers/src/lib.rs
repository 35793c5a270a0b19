//! Shared fixtures for rdfbind tests.
//!
//! [`travel_tree`] is a hand-built type tree in the shape the schema compiler
//! produces, so engine and emitter tests do not depend on XSD parsing.
//! [`TRAVEL_XSD`] is a schema that compiles to a tree of the same shape.

#![deny(missing_docs)]

use std::io;
use std::path::{Path, PathBuf};

use rdfbind_model::{
    Builtin, FieldNode, Package, TypeNode, TypeShape, TypeTree, ValueType,
};

/// Target namespace of the transportation fixture.
pub const TRAVEL_NAMESPACE: &str = "http://domainmodel.pts_fsm.org/2015/10/29/transportation";

/// Package identifier derived from [`TRAVEL_NAMESPACE`].
pub const TRAVEL_PACKAGE: &str = "org.pts_fsm.domainmodel._2015._10._29.transportation";

/// Identifier of the unrelated sibling package in [`travel_tree`].
pub const OTHER_PACKAGE: &str = "org.example.other";

/// Returns the transportation fixture tree.
///
/// Package [`TRAVEL_PACKAGE`]:
/// - `Travel` (original `Travel`)
///   - `fare_url`: `String`, original `fareTravelUrl`
///   - `stops`: `Vec<Travel::Stop>`, original `stop`
///   - nested `Stop` (anonymous): `name` attribute, `arrival` (original `arrivalTime`)
/// - `PassengerType` (original `passengerType`): `given_name` (original `givenName`)
/// - `TravelClass` (original `travelClass`): enumeration `first`, `second`
/// - `ObjectFactory`
///
/// Package [`OTHER_PACKAGE`] holds another `Travel` type that must never be
/// reachable once the transportation scope is selected.
#[must_use]
pub fn travel_tree() -> TypeTree {
    let mut stop = TypeNode::declared("Stop", None);
    stop.fields
        .push(FieldNode::attribute("name", "name", Builtin::String.into()));
    stop.fields.push(FieldNode::element(
        "arrival",
        "arrivalTime",
        Builtin::String.into(),
    ));

    let mut travel = TypeNode::declared("Travel", Some("Travel"));
    travel.documentation = Some("A journey between two or more stops.".to_string());
    let mut fare_url = FieldNode::element("fare_url", "fareTravelUrl", Builtin::String.into());
    fare_url.optional = true;
    travel.fields.push(fare_url);
    travel.fields.push(FieldNode::element(
        "stops",
        "stop",
        ValueType::list_of(ValueType::Ref(vec!["Travel".to_string(), "Stop".to_string()])),
    ));
    travel.nested.push(stop);

    let mut passenger = TypeNode::declared("PassengerType", Some("passengerType"));
    passenger.fields.push(FieldNode::element(
        "given_name",
        "givenName",
        Builtin::String.into(),
    ));

    let mut travel_class = TypeNode::declared("TravelClass", Some("travelClass"));
    travel_class.shape = TypeShape::Enumeration(vec!["first".to_string(), "second".to_string()]);

    let mut other_travel = TypeNode::declared("Travel", Some("Travel"));
    other_travel.fields.push(FieldNode::element(
        "fare_url",
        "fareTravelUrl",
        Builtin::String.into(),
    ));

    TypeTree {
        packages: vec![
            Package {
                name: OTHER_PACKAGE.to_string(),
                namespace: Some("http://example.org/other".to_string()),
                types: vec![other_travel, TypeNode::factory()],
            },
            Package {
                name: TRAVEL_PACKAGE.to_string(),
                namespace: Some(TRAVEL_NAMESPACE.to_string()),
                types: vec![travel, passenger, travel_class, TypeNode::factory()],
            },
        ],
    }
}

/// Transportation schema compiling to a tree shaped like [`travel_tree`]'s
/// transportation package.
pub const TRAVEL_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="http://domainmodel.pts_fsm.org/2015/10/29/transportation"
           targetNamespace="http://domainmodel.pts_fsm.org/2015/10/29/transportation"
           elementFormDefault="qualified">

  <xs:element name="Travel">
    <xs:annotation>
      <xs:documentation>A journey between two or more stops.</xs:documentation>
    </xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="fareTravelUrl" type="xs:anyURI" minOccurs="0"/>
        <xs:element name="stop" maxOccurs="unbounded">
          <xs:complexType>
            <xs:sequence>
              <xs:element name="arrivalTime" type="xs:dateTime"/>
            </xs:sequence>
            <xs:attribute name="name" type="xs:string"/>
          </xs:complexType>
        </xs:element>
        <xs:element name="class" type="tns:travelClass" minOccurs="0"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>

  <xs:complexType name="passengerType">
    <xs:sequence>
      <xs:element name="givenName" type="xs:string"/>
      <xs:element name="age" type="xs:int" minOccurs="0"/>
    </xs:sequence>
    <xs:attribute name="id" type="xs:ID" use="required"/>
  </xs:complexType>

  <xs:simpleType name="travelClass">
    <xs:restriction base="xs:string">
      <xs:enumeration value="first"/>
      <xs:enumeration value="second"/>
    </xs:restriction>
  </xs:simpleType>
</xs:schema>
"#;

/// Writes [`TRAVEL_XSD`] to `dir/transportation.xsd` and returns its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_travel_xsd(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("transportation.xsd");
    std::fs::write(&path, TRAVEL_XSD)?;
    Ok(path)
}
