//! End-to-end pipeline tests exercising concrete generation scenarios:
//! full `generate()` runs checked against the resulting graph, not
//! individual phase internals.

use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexMap;
use sor_forge::{AttributeDef, DataType, EntityDef, ExpectedVolume, GenerationConfig, RelationshipDef, SchemaInput};

fn attr(name: &str, data_type: DataType, unique: bool) -> AttributeDef {
    AttributeDef {
        name: name.into(),
        external_id: name.into(),
        attribute_alias: None,
        data_type,
        unique_id: unique,
        list: false,
        description: None,
    }
}

fn entity(display_name: &str, external_id: &str, attributes: Vec<AttributeDef>) -> EntityDef {
    EntityDef {
        display_name: display_name.into(),
        external_id: external_id.into(),
        description: None,
        attributes,
    }
}

fn relationship(from_attribute: &str, to_attribute: &str) -> RelationshipDef {
    RelationshipDef {
        display_name: None,
        name: None,
        from_attribute: from_attribute.into(),
        to_attribute: to_attribute.into(),
        cardinality: None,
    }
}

fn config_with_volumes(volumes: &[(&str, usize)], auto_cardinality: bool) -> GenerationConfig {
    let mut config = GenerationConfig::default();
    config.auto_cardinality = auto_cardinality;
    for (id, v) in volumes {
        config.row_count_overrides.insert(id.to_string(), *v);
    }
    config
}

/// Scenario 1: single entity, v=3.
#[test]
fn single_entity_produces_distinct_nonempty_ids_and_names() {
    let mut entities = IndexMap::new();
    entities.insert(
        "user".to_string(),
        entity("User", "user", vec![attr("id", DataType::String, true), attr("name", DataType::String, false)]),
    );
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships: IndexMap::new(),
    };
    let config = config_with_volumes(&[("user", 3)], true);
    let graph = sor_forge::pipeline::generate(&schema, &config).unwrap();

    let user = &graph.entities()[0];
    assert_eq!(user.row_count(), 3);
    let ids: HashSet<&str> = user.rows().iter().map(|r| r.get("id")).collect();
    assert_eq!(ids.len(), 3);
    for row in user.rows() {
        assert!(!row.get("id").is_empty());
        assert!(!row.get("name").is_empty());
    }
}

/// Scenario 2: simple FK, v=2, autoCardinality=false.
#[test]
fn simple_fk_every_value_points_at_an_existing_target_row() {
    let mut entities = IndexMap::new();
    entities.insert(
        "user".to_string(),
        entity("User", "user", vec![attr("id", DataType::String, true), attr("profile_id", DataType::String, false)]),
    );
    entities.insert("profile".to_string(), entity("Profile", "profile", vec![attr("id", DataType::String, true)]));
    let mut relationships = IndexMap::new();
    relationships.insert("user_profile".to_string(), relationship("user.profile_id", "profile.id"));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships,
    };
    let config = config_with_volumes(&[("user", 2), ("profile", 2)], false);
    let graph = sor_forge::pipeline::generate(&schema, &config).unwrap();

    let profile_ids: HashSet<String> = graph.entities()[1].rows().iter().map(|r| r.get("id").to_string()).collect();
    for row in graph.entities()[0].rows() {
        assert!(profile_ids.contains(row.get("profile_id")));
    }
}

/// Scenario 3: 1:1 same-as, v=5, auto=true — bijection onto User.id.
#[test]
fn same_as_relationship_is_a_bijection_when_volumes_match() {
    let mut entities = IndexMap::new();
    entities.insert("user".to_string(), entity("User", "user", vec![attr("id", DataType::String, true)]));
    entities.insert("employee".to_string(), entity("Employee", "employee", vec![attr("user_id", DataType::String, true)]));
    let mut relationships = IndexMap::new();
    relationships.insert("employee_user".to_string(), relationship("employee.user_id", "user.id"));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships,
    };
    let config = config_with_volumes(&[("user", 5), ("employee", 5)], true);
    let graph = sor_forge::pipeline::generate(&schema, &config).unwrap();

    let user_ids: HashSet<String> = graph.entities()[0].rows().iter().map(|r| r.get("id").to_string()).collect();
    let employee_user_ids: Vec<String> = graph.entities()[1].rows().iter().map(|r| r.get("user_id").to_string()).collect();

    assert_eq!(employee_user_ids.len(), 5);
    let distinct: HashSet<&String> = employee_user_ids.iter().collect();
    assert_eq!(distinct.len(), 5, "same-as mapping must be injective");
    for id in &employee_user_ids {
        assert!(user_ids.contains(id));
    }
    assert_eq!(distinct, user_ids.iter().collect::<HashSet<_>>(), "must be onto User.id when volumes match");
}

/// Scenario 4: N:1 clustering, v=25, auto=true — non-uniform distribution.
#[test]
fn many_to_one_auto_cardinality_produces_non_uniform_clustering() {
    let mut entities = IndexMap::new();
    entities.insert(
        "user".to_string(),
        entity("User", "user", vec![attr("id", DataType::String, true), attr("dept_id", DataType::String, false)]),
    );
    entities.insert("department".to_string(), entity("Department", "department", vec![attr("id", DataType::String, true)]));
    let mut relationships = IndexMap::new();
    relationships.insert("user_dept".to_string(), relationship("user.dept_id", "department.id"));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships,
    };
    let config = config_with_volumes(&[("user", 25), ("department", 5)], true);
    let graph = sor_forge::pipeline::generate(&schema, &config).unwrap();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in graph.entities()[0].rows() {
        *counts.entry(row.get("dept_id").to_string()).or_insert(0) += 1;
    }
    let distinct_counts: HashSet<usize> = counts.values().copied().collect();
    assert!(distinct_counts.len() > 1, "expected non-uniform clustering, got {counts:?}");
    assert!(counts.values().any(|&c| c >= 2), "expected at least one popular department");
}

/// Scenario 5: M:N junction, v=10 — no duplicate composite FK tuples.
#[test]
fn junction_entity_has_no_duplicate_composite_tuples() {
    let mut entities = IndexMap::new();
    entities.insert("user".to_string(), entity("User", "user", vec![attr("id", DataType::String, true)]));
    entities.insert("group".to_string(), entity("Group", "group", vec![attr("id", DataType::String, true)]));
    entities.insert(
        "membership".to_string(),
        entity(
            "Membership",
            "membership",
            vec![
                attr("id", DataType::String, true),
                attr("user_id", DataType::String, false),
                attr("group_id", DataType::String, false),
            ],
        ),
    );
    let mut relationships = IndexMap::new();
    relationships.insert("membership_user".to_string(), relationship("membership.user_id", "user.id"));
    relationships.insert("membership_group".to_string(), relationship("membership.group_id", "group.id"));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships,
    };
    let config = config_with_volumes(&[("user", 4), ("group", 3), ("membership", 10)], true);
    let graph = sor_forge::pipeline::generate(&schema, &config).unwrap();

    let membership = &graph.entities()[2];
    assert!(membership.row_count() <= 10);
    let mut seen = HashSet::new();
    for row in membership.rows() {
        let tuple = format!("{}|{}", row.get("user_id"), row.get("group_id"));
        assert!(seen.insert(tuple), "duplicate composite FK tuple survived the pipeline");
    }
}

// Scenario 6 (duplicate PK rejection) is exercised as a unit test in
// `model::entity`, where `EntityId` construction is available; it needs
// no separate integration coverage since `Entity::add_row` is the only
// code path that can produce it.

/// Determinism: two runs with the same schema, seed, and volumes produce
/// identical FK-column sequences.
#[test]
fn same_seed_produces_identical_fk_sequences() {
    let mut entities = IndexMap::new();
    entities.insert(
        "user".to_string(),
        entity("User", "user", vec![attr("id", DataType::String, true), attr("dept_id", DataType::String, false)]),
    );
    entities.insert("department".to_string(), entity("Department", "department", vec![attr("id", DataType::String, true)]));
    let mut relationships = IndexMap::new();
    relationships.insert("user_dept".to_string(), relationship("user.dept_id", "department.id"));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships,
    };
    let config = config_with_volumes(&[("user", 30), ("department", 6)], true);

    let graph_a = sor_forge::pipeline::generate(&schema, &config).unwrap();
    let graph_b = sor_forge::pipeline::generate(&schema, &config).unwrap();

    // Department id sets differ (fresh UUIDs each run) but the *shape* of
    // the clustering — which row index each user maps to — must match,
    // since dept_id values are positionally comparable only through
    // row-index alignment with the target entity's own row order.
    let dept_index = |graph: &sor_forge::Graph, dept_id: &str| -> usize {
        graph.entities()[1].rows().iter().position(|r| r.get("id") == dept_id).unwrap()
    };
    let sequence_a: Vec<usize> = graph_a.entities()[0].rows().iter().map(|r| dept_index(&graph_a, r.get("dept_id"))).collect();
    let sequence_b: Vec<usize> = graph_b.entities()[0].rows().iter().map(|r| dept_index(&graph_b, r.get("dept_id"))).collect();
    assert_eq!(sequence_a, sequence_b);
}

/// `ExpectedVolume` resolution is exercised through `GenerationConfig` in
/// the scenarios above; this checks the alternate uniform-volume path
/// used when a caller hands the pipeline a single integer instead of
/// per-entity overrides.
#[test]
fn uniform_expected_volume_resolves_to_every_entity() {
    let mut entities = IndexMap::new();
    entities.insert("user".to_string(), entity("User", "user", vec![attr("id", DataType::String, true)]));
    entities.insert("profile".to_string(), entity("Profile", "profile", vec![attr("id", DataType::String, true)]));
    let schema = SchemaInput {
        display_name: "demo".into(),
        description: None,
        entities,
        relationships: IndexMap::new(),
    };
    let resolved = ExpectedVolume::Uniform(7).resolve(&schema);
    assert_eq!(resolved.get("user"), Some(&7));
    assert_eq!(resolved.get("profile"), Some(&7));
}
