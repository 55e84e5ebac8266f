//! Fills every remaining non-key, non-FK column with a type- and
//! name-aware fake value.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::model::entity::Entity;
use crate::model::graph::Graph;
use crate::pipeline::fake_values::fake_value_for;

/// Fills every entity's plain (non-unique, non-relationship) attributes.
/// `seed` derives one deterministic RNG per entity so FieldPhase output is
/// reproducible given the same pipeline seed, independent of whichever
/// order entities happen to be processed in.
///
/// Like `IDPhase`, this loops over independent entities (no attribute is
/// ever read across entity boundaries), so behind the `parallel` feature
/// it dispatches one rayon task per entity. Determinism is unaffected:
/// each entity seeds its own `ChaCha8Rng` from `seed` and its own index,
/// never a stream shared across entities.
pub fn run(graph: &mut Graph, seed: u64) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        graph.entities_mut().par_iter_mut().for_each(|entity| fill_entity(entity, seed));
    }
    #[cfg(not(feature = "parallel"))]
    {
        graph.entities_mut().iter_mut().for_each(|entity| fill_entity(entity, seed));
    }
}

fn fill_entity(entity: &mut Entity, seed: u64) {
    let plain_attrs: Vec<(String, crate::model::attribute::DataType)> = entity
        .attributes
        .iter()
        .filter(|a| !a.is_unique && !a.is_relationship)
        .map(|a| (a.name.clone(), a.data_type))
        .collect();
    if plain_attrs.is_empty() {
        return;
    }

    let entity_seed = seed ^ (entity.id.index() as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93);
    let mut rng = ChaCha8Rng::seed_from_u64(entity_seed);

    for row in entity.rows_mut() {
        for (name, data_type) in &plain_attrs {
            let attribute = crate::model::attribute::Attribute::new(name.clone(), name.clone(), *data_type);
            row.set(name, fake_value_for(&attribute, &mut rng));
        }
    }
    info!(entity = entity.name(), attributes = plain_attrs.len(), "FieldPhase filled entity");
}
