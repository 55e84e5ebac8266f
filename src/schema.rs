//! The validated schema structure handed to `Graph::build` — the "logical
//! shape" described in the external-interfaces section. Parsing this out of
//! YAML/JSON and validating it against a JSON-Schema are both out of scope;
//! this module only defines the shape a validated parser output takes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::attribute::DataType;
use crate::model::relationship::Cardinality;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInput {
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub entities: IndexMap<String, EntityDef>,
    #[serde(default)]
    pub relationships: IndexMap<String, RelationshipDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub display_name: String,
    pub external_id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attributes: Vec<AttributeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub external_id: String,
    #[serde(default)]
    pub attribute_alias: Option<String>,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub unique_id: bool,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Only the direct-relationship shape is consumed; schemas carrying `path`
/// or `childEntity` (indirect/derived relationships) are rejected by the
/// external parser before reaching the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDef {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub from_attribute: String,
    pub to_attribute: String,
    #[serde(default)]
    pub cardinality: Option<Cardinality>,
}

/// Row-count budget handed to `Graph::build`: either one integer applied
/// uniformly, or an explicit per-entity override map (entities absent from
/// the map default to zero, which `Graph::build` treats as a no-op entity
/// per the Open Question decision recorded in the design notes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedVolume {
    Uniform(usize),
    PerEntity(IndexMap<String, usize>),
}

impl ExpectedVolume {
    pub fn resolve(&self, schema: &SchemaInput) -> std::collections::HashMap<String, usize> {
        match self {
            ExpectedVolume::Uniform(n) => schema.entities.keys().map(|id| (id.clone(), *n)).collect(),
            ExpectedVolume::PerEntity(map) => schema
                .entities
                .keys()
                .map(|id| (id.clone(), map.get(id).copied().unwrap_or(0)))
                .collect(),
        }
    }
}
