//! Referentially-consistent synthetic data generation for a declared
//! system of record.
//!
//! Given a validated [`schema::SchemaInput`] and a [`config::GenerationConfig`],
//! [`pipeline::generate`] builds a [`model::Graph`] and runs it through three
//! fixed phases — ID minting, relationship linking, field filling — producing
//! an in-memory graph of populated entities. Schema parsing and on-disk
//! serialization are deliberately kept out of this crate: [`source::SchemaSource`]
//! and [`sink::RowSink`] are the seams an outer layer plugs into.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod sink;
pub mod source;
pub mod validator;

pub use config::GenerationConfig;
pub use error::{EntityError, GraphError, LinkError, PipelineError};
pub use model::{Attribute, Cardinality, ClusteringStrategy, DataType, Entity, Graph, Relationship, Row};
pub use schema::{AttributeDef, EntityDef, ExpectedVolume, RelationshipDef, SchemaInput};
pub use sink::{RowSink, SinkError};
pub use source::{SchemaError, SchemaSource};
pub use validator::{validate, ValidationFinding};
