//! Read-only diagnostic scan of a populated `Graph`. Not part of the
//! mutation path: it never fails the run, only reports findings for an
//! outer layer to act on.

use std::collections::HashSet;

use crate::model::entity::EntityId;
use crate::model::graph::Graph;
use crate::model::relationship::RelationshipId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A defensive re-check caught a state the pipeline should never
    /// produce (dangling FK, duplicate PK). Indicates a pipeline bug.
    Error,
    /// An expected, non-fatal side effect of generation (junction rows
    /// pruned for duplicate tuples, a relationship reporting EmptyTarget).
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFinding {
    pub severity: Severity,
    pub message: String,
    pub entity_id: Option<EntityId>,
    pub relationship_id: Option<RelationshipId>,
}

impl ValidationFinding {
    fn error(entity_id: EntityId, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            entity_id: Some(entity_id),
            relationship_id: None,
        }
    }

    fn warning(entity_id: EntityId, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            entity_id: Some(entity_id),
            relationship_id: None,
        }
    }
}

/// Scans `graph` for referential-integrity violations a correct pipeline
/// run should never produce, plus informational findings about expected
/// pruning/empty-target side effects. An empty result means the graph is
/// clean. Never mutates `graph` and never fails the run.
pub fn validate(graph: &Graph) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    check_primary_keys(graph, &mut findings);
    check_foreign_keys(graph, &mut findings);
    check_junction_duplicates(graph, &mut findings);
    check_volume_shortfall(graph, &mut findings);
    findings
}

fn check_primary_keys(graph: &Graph, findings: &mut Vec<ValidationFinding>) {
    for entity in graph.entities() {
        let Some(pk) = entity.pk_attribute() else {
            findings.push(ValidationFinding::error(entity.id.clone(), "entity has no primary-key attribute"));
            continue;
        };
        let mut seen = HashSet::new();
        for row in entity.rows() {
            let value = row.get(&pk.name);
            if value.is_empty() {
                findings.push(ValidationFinding::error(entity.id.clone(), "row has an empty primary key"));
            } else if !seen.insert(value) {
                findings.push(ValidationFinding::error(entity.id.clone(), format!("duplicate primary key '{value}'")));
            }
        }
    }
}

fn check_foreign_keys(graph: &Graph, findings: &mut Vec<ValidationFinding>) {
    for rel in graph.relationships() {
        let source = graph.entity(&rel.source_entity);
        let target = graph.entity(&rel.target_entity);
        let target_values: HashSet<&str> = target.rows().iter().map(|r| r.get(&rel.target_attr)).collect();
        for row in source.rows() {
            let value = row.get(&rel.source_attr);
            if !value.is_empty() && !target_values.contains(value) {
                findings.push(ValidationFinding {
                    severity: Severity::Error,
                    message: format!(
                        "{}.{} = '{value}' does not match any {}.{}",
                        source.name(),
                        rel.source_attr,
                        target.name(),
                        rel.target_attr
                    ),
                    entity_id: Some(source.id.clone()),
                    relationship_id: Some(rel.id.clone()),
                });
            }
        }
        if target.row_count() == 0 {
            findings.push(ValidationFinding {
                severity: Severity::Warning,
                message: format!("relationship {} has an empty target entity; FK left unset", rel.id),
                entity_id: Some(source.id.clone()),
                relationship_id: Some(rel.id.clone()),
            });
        }
    }
}

/// Re-checks junction uniqueness through the entity's own secondary index
/// (`is_composite_key_registered` / `registered_composite_key_count`)
/// rather than rebuilding a local seen-set — the whole point of a
/// defensive re-check is to ask the entity's own bookkeeping whether it
/// believes its invariant holds, not to recompute the answer independently.
fn check_junction_duplicates(graph: &Graph, findings: &mut Vec<ValidationFinding>) {
    for entity in graph.entities() {
        if !entity.is_junction() {
            continue;
        }
        for row in entity.rows() {
            if !entity.is_composite_key_registered(row) {
                findings.push(ValidationFinding::error(
                    entity.id.clone(),
                    "row's composite key was never registered on the entity's own composite-key index",
                ));
            }
        }
        let registered = entity.registered_composite_key_count();
        if registered != entity.row_count() {
            findings.push(ValidationFinding::error(
                entity.id.clone(),
                format!(
                    "composite-key index has {registered} registered tuple(s) but the entity holds {} row(s) — a duplicate FK tuple survived LinkPhase",
                    entity.row_count()
                ),
            ));
        }
    }
}

/// Informational only: a junction entity whose final row count fell short
/// of its configured volume because `LinkPhase` pruned duplicate tuples.
/// Not an error: junction row counts are expected to fall short of the
/// configured volume once duplicate composite keys are pruned.
fn check_volume_shortfall(graph: &Graph, findings: &mut Vec<ValidationFinding>) {
    for entity in graph.entities() {
        let expected = entity.expected_volume();
        if entity.row_count() < expected {
            findings.push(ValidationFinding::warning(
                entity.id.clone(),
                format!("row count {} fell short of expected volume {expected} (junction pruning)", entity.row_count()),
            ));
        }
    }
}
