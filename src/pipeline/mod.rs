//! The pipeline coordinator: orders IDPhase, LinkPhase, FieldPhase and
//! wraps each phase's error with its phase prefix.

pub mod fake_values;
pub mod field_phase;
pub mod id_phase;
pub mod link_phase;

use tracing::info;

use crate::config::GenerationConfig;
use crate::error::PipelineError;
use crate::model::graph::Graph;
use crate::schema::SchemaInput;

/// Builds a `Graph` from `schema` and `config`, then runs IDPhase, LinkPhase,
/// FieldPhase in that fixed order. Returns the populated graph, ready for an
/// external writer to serialize one CSV per entity.
pub fn generate(schema: &SchemaInput, config: &GenerationConfig) -> Result<Graph, PipelineError> {
    let expected_volume = config.expected_volume(schema);
    let mut graph = Graph::build(schema, &expected_volume, config.seed)?;

    info!("starting IDPhase");
    id_phase::run(&mut graph, config).map_err(PipelineError::IdGeneration)?;

    info!("starting LinkPhase");
    link_phase::run(&mut graph, config.auto_cardinality);

    info!("starting FieldPhase");
    field_phase::run(&mut graph, config.seed);

    Ok(graph)
}
