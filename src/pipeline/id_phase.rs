//! Mints a per-entity sequence of unique primary-key values.

use tracing::info;
use uuid::Uuid;

use crate::config::GenerationConfig;
use crate::error::EntityError;
use crate::model::entity::Entity;
use crate::model::graph::Graph;
use crate::model::row::Row;

/// Fills every entity's row vector up to its configured capacity with
/// fresh PK values. Entities without a primary-key attribute are
/// unreachable here: `Graph::build` rejects them before this phase runs.
///
/// Per-entity ID minting is independent (no shared mutable state
/// across entities), so behind the `parallel` feature this dispatches one
/// rayon task per entity instead of looping sequentially. Random
/// (`Uuid::new_v4`) minting draws from the OS RNG directly, not a shared
/// deterministic stream, so parallelizing it changes nothing about
/// determinism; `config.deterministic_ids` mode derives each ID from
/// `config.seed` + the entity's own name + row position, so it stays
/// reproducible regardless of processing order too.
pub fn run(graph: &mut Graph, config: &GenerationConfig) -> Result<(), EntityError> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        graph.entities_mut().par_iter_mut().try_for_each(|entity| mint_for_entity(entity, config))
    }
    #[cfg(not(feature = "parallel"))]
    {
        graph.entities_mut().iter_mut().try_for_each(|entity| mint_for_entity(entity, config))
    }
}

fn mint_for_entity(entity: &mut Entity, config: &GenerationConfig) -> Result<(), EntityError> {
    let Some(pk) = entity.pk_attribute() else {
        return Ok(());
    };
    let pk_name = pk.name.clone();
    let entity_name = entity.name().to_string();
    let target = entity.expected_volume();
    while entity.row_count() < target {
        let position = entity.row_count();
        let id_value = if config.deterministic_ids {
            let key = format!("{}:{entity_name}:{position}", config.seed);
            Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
        } else {
            Uuid::new_v4().to_string()
        };
        let row = Row::new().with_cell(pk_name.clone(), id_value);
        entity.add_row(row)?;
    }
    info!(entity = entity.name(), rows = entity.row_count(), "IDPhase minted rows");
    Ok(())
}
