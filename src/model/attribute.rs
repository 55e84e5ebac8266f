//! Column metadata: name, external id, type, unique flag, relationship role.

use crate::model::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Identifies an attribute for error reporting: the entity that owns it
/// plus its declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeId {
    pub entity: EntityId,
    pub name: String,
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.entity, self.name)
    }
}

/// Logical data type of an attribute's values. Values are always stored as
/// strings on `Row` — CSV is the final format and typing is the reader's
/// concern — but `FieldPhase` dispatches on this to pick a fake-value
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DataType {
    String,
    Integer,
    Boolean,
    Date,
    DateTime,
    Float,
    Double,
    /// Any type string the schema source didn't map to one of the above.
    Other,
}

impl DataType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "string" | "str" | "varchar" | "text" => DataType::String,
            "integer" | "int" | "int64" | "int32" | "bigint" => DataType::Integer,
            "boolean" | "bool" => DataType::Boolean,
            "date" => DataType::Date,
            "datetime" | "timestamp" => DataType::DateTime,
            "float" => DataType::Float,
            "double" => DataType::Double,
            _ => DataType::Other,
        }
    }
}

/// Immutable once constructed. Attributes are owned by their `Entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub external_id: String,
    pub alias: Option<String>,
    pub data_type: DataType,
    /// True for the single primary-key attribute of an entity.
    pub is_unique: bool,
    /// True iff this attribute is the *source* side of some relationship.
    /// Set by `Graph::build`, never by the schema source directly.
    pub is_relationship: bool,
    pub related_entity_id: Option<EntityId>,
    pub related_attr_name: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, external_id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            external_id: external_id.into(),
            alias: None,
            data_type,
            is_unique: false,
            is_relationship: false,
            related_entity_id: None,
            related_attr_name: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn mark_as_relationship_source(&mut self, related_entity_id: EntityId, related_attr_name: String) {
        self.is_relationship = true;
        self.related_entity_id = Some(related_entity_id);
        self.related_attr_name = Some(related_attr_name);
    }
}
