//! # Schema Data Model
//!
//! A small typed view of draft-07 JSON Schema: just enough structure for the
//! composition stages to edit `type`, `properties`, `required`, `anyOf`,
//! `items`, `$ref` and `additionalProperties` directly. Every other keyword
//! the reflector emits (`description`, `enum`, `format`, `minimum`, …) is
//! carried through untouched in [`Definition::extensions`].
//!
//! ## Determinism
//!
//! The definitions table is a `BTreeMap`, so it serializes in name order.
//! Reflected properties arrive in name order, since the reflector hands them
//! over as a sorted JSON map; injected properties are then appended in
//! their fixed order. Two runs over the same type model produce
//! byte-identical output.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Meta-schema URI written to the root of every document.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// JSON pointer prefix under which definitions are referenced.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// The global table of named definitions.
pub type Definitions = BTreeMap<String, Definition>;

/// Build the `$ref` string for a named definition.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{name}")
}

/// A JSON Schema primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

/// The `type` keyword: one tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    Single(InstanceType),
    Multiple(Vec<InstanceType>),
}

impl From<InstanceType> for TypeTag {
    fn from(instance_type: InstanceType) -> Self {
        Self::Single(instance_type)
    }
}

/// The schema of a property, array item, union member or
/// `additionalProperties` value.
///
/// A boolean schema (`true` accepts anything, `false` accepts nothing) or a
/// full [`Definition`], which covers primitive tags, `$ref` references and
/// composites such as array-of-X.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyType {
    Bool(bool),
    Schema(Box<Definition>),
}

impl PropertyType {
    /// A schema accepting only the given primitive.
    pub fn primitive(instance_type: InstanceType) -> Self {
        Self::Schema(Box::new(Definition {
            instance_type: Some(instance_type.into()),
            ..Definition::default()
        }))
    }

    /// A reference to the named definition.
    pub fn reference(name: &str) -> Self {
        Self::Schema(Box::new(Definition {
            reference: Some(definition_ref(name)),
            ..Definition::default()
        }))
    }

    /// An array whose items match `items`.
    pub fn array_of(items: PropertyType) -> Self {
        Self::Schema(Box::new(Definition {
            instance_type: Some(InstanceType::Array.into()),
            items: Some(Box::new(items)),
            ..Definition::default()
        }))
    }

    /// The definition name this schema refers to, if it is a local
    /// `#/definitions/<name>` reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            Self::Schema(definition) => definition
                .reference
                .as_deref()
                .and_then(|reference| reference.strip_prefix(DEFINITIONS_PREFIX)),
            Self::Bool(_) => None,
        }
    }

    /// The full definition, unless this is a boolean schema.
    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Self::Schema(definition) => Some(definition),
            Self::Bool(_) => None,
        }
    }

    /// Convert into an equivalent object-form definition.
    ///
    /// `true` becomes the empty schema and `false` becomes `{"not": {}}`.
    pub fn into_definition(self) -> Definition {
        match self {
            Self::Schema(definition) => *definition,
            Self::Bool(true) => Definition::default(),
            Self::Bool(false) => {
                let mut definition = Definition::default();
                definition
                    .extensions
                    .insert("not".to_string(), Value::Object(Map::new()));
                definition
            }
        }
    }
}

/// A named, reusable schema fragment in object form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<TypeTag>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyType>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<PropertyType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyType>>,

    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<PropertyType>>,

    /// Keywords this model does not interpret.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// The complete schema document.
///
/// The root shape is normally a `$ref` to the root configuration's
/// definition; its `additionalProperties` is what the manual override
/// loosens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "$schema")]
    pub meta_schema: String,

    #[serde(flatten)]
    pub root: Definition,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: Definitions,
}

impl SchemaDocument {
    /// A draft-07 document with the given root shape and definitions.
    pub fn new(root: Definition, definitions: Definitions) -> Self {
        Self {
            meta_schema: DRAFT_07.to_string(),
            root,
            definitions,
        }
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// Encode as compact JSON.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
