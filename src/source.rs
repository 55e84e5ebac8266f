//! The boundary trait a schema parser implements to hand the core a
//! validated `SchemaInput`. Parsing YAML/JSON and validating against a
//! JSON-Schema are both out of scope; this is only the seam.

use crate::schema::SchemaInput;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to load schema: {0}")]
    Load(String),
}

pub trait SchemaSource {
    fn load(&self) -> Result<SchemaInput, SchemaError>;
}
