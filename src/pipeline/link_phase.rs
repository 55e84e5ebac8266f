//! For each entity, assigns FK values to every row and prunes duplicate
//! junction tuples in place.

use tracing::info;

use crate::model::graph::Graph;

/// Runs `LinkPhase` over every entity in graph enumeration order.
///
/// `auto_cardinality` toggles cardinality-aware clustering; when false,
/// every relationship round-robins regardless of its classification.
/// Infallible: `Relationship::get_target_value_for_source_row`'s only
/// error (`EmptyTarget`) is caught and logged by `Graph::compute_fk_values`
/// rather than propagated.
pub fn run(graph: &mut Graph, auto_cardinality: bool) {
    for entity_index in 0..graph.entities().len() {
        let entity_id = graph.entities()[entity_index].id.clone();
        let source_rels = graph.relationships_from(&entity_id);
        if source_rels.is_empty() {
            continue;
        }
        let is_junction = source_rels.len() > 1;

        for (j, &rel_index) in source_rels.iter().enumerate() {
            let is_last = j == source_rels.len() - 1;
            let rel = &graph.relationships()[rel_index];
            let source_attr_name = rel.source_attr.clone();
            let is_same_as = attribute_is_unique(graph, entity_index, &rel.source_attr)
                && attribute_is_unique(graph, rel.target_entity.index(), &rel.target_attr);
            let use_auto = auto_cardinality && !is_same_as;

            let values = graph.compute_fk_values(rel_index, use_auto, is_same_as);
            let should_prune = is_last && is_junction;

            // `write_foreign_key_column` routes the duplicate check through
            // the entity's own `is_composite_key_registered`/
            // `register_composite_key` bookkeeping, so `composite_keys`
            // still reflects reality once LinkPhase finishes, not just a
            // throwaway set local to this pass.
            let entity = &mut graph.entities_mut()[entity_index];
            entity.write_foreign_key_column(&source_attr_name, &values, should_prune);
        }

        info!(
            entity = graph.entities()[entity_index].name(),
            rows = graph.entities()[entity_index].row_count(),
            "LinkPhase linked entity"
        );
    }
}

fn attribute_is_unique(graph: &Graph, entity_index: usize, attr_name: &str) -> bool {
    graph.entities()[entity_index]
        .attributes
        .iter()
        .find(|a| a.name == attr_name)
        .map(|a| a.is_unique)
        .unwrap_or(false)
}
