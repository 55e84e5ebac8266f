//! Error taxonomy for the generation pipeline.
//!
//! One flat `thiserror` enum per subsystem: no nested `Box<dyn Error>`
//! unless a foreign error is being wrapped, and a single top-level error
//! that prefixes whichever phase produced it.

use crate::model::entity::EntityId;
use crate::model::relationship::RelationshipId;

/// Failure while constructing a `Graph` from a `SchemaInput`.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("relationship {relationship} could not resolve its {side} attribute '{reference}'")]
    SchemaReference {
        relationship: RelationshipId,
        side: &'static str,
        reference: String,
    },
    #[error("entity {0} has no primary-key attribute")]
    EntityStructure(EntityId),
}

/// Failure raised by `Entity::add_row` and friends.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("row for entity {0} is missing its primary key value")]
    MissingPrimaryKey(EntityId),
    #[error("duplicate primary key '{value}' in entity {entity}")]
    DuplicatePrimaryKey { entity: EntityId, value: String },
}

/// Failure raised while resolving a relationship's target value.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("relationship {0} has an empty target entity")]
    EmptyTarget(RelationshipId),
}

/// The pipeline's single external error, wrapping whichever phase failed
/// with a fixed prefix naming that phase. `LinkPhase` and `FieldPhase`
/// never appear here: `LinkPhase`'s only failure mode (`LinkError::EmptyTarget`)
/// is pre-checked and logged by `Graph::compute_fk_values` before it would
/// otherwise surface, and `FieldPhase`'s fake-value dispatch is an
/// exhaustive match over the closed `DataType` enum with no failure mode
/// at all — so neither phase can fail the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("graph construction failed: {0}")]
    GraphConstruction(#[from] GraphError),
    #[error("ID generation failed: {0}")]
    IdGeneration(#[from] EntityError),
}
