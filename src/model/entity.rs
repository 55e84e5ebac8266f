//! A table in the output: owns rows plus the secondary indexes needed to
//! enforce primary-key uniqueness and junction-table duplicate pruning.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::EntityError;
use crate::model::attribute::Attribute;
use crate::model::row::Row;

/// Stable handle to an entity within a `Graph`. Carries the declared name
/// alongside the arena index so error messages don't need a Graph lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: usize,
    name: Arc<str>,
}

impl EntityId {
    pub(crate) fn new(index: usize, name: impl Into<Arc<str>>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Outcome a `for_each_row` callback returns for the row it was just
/// handed: keep it, or prune it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Keep,
    Skip,
}

/// A table: an append-only ordered vector of rows plus the secondary
/// indexes that make `add_row` and junction-duplicate detection O(1).
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub external_id: String,
    pub attributes: Vec<Attribute>,
    rows: Vec<Row>,
    pk_index: HashSet<String>,
    composite_keys: HashSet<String>,
    expected_volume: usize,
}

impl Entity {
    pub fn new(id: EntityId, attributes: Vec<Attribute>, expected_volume: usize) -> Self {
        Self::with_external_id(id.name().to_string(), id, attributes, expected_volume)
    }

    /// Constructs an `Entity` carrying its own schema external id,
    /// distinct from the display name held by `EntityId` — the CSV writer
    /// (or any `RowSink`) files by external id.
    pub fn with_external_id(external_id: impl Into<String>, id: EntityId, attributes: Vec<Attribute>, expected_volume: usize) -> Self {
        Self {
            id,
            external_id: external_id.into(),
            attributes,
            rows: Vec::with_capacity(expected_volume),
            pk_index: HashSet::with_capacity(expected_volume),
            composite_keys: HashSet::new(),
            expected_volume,
        }
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// The row-count budget this entity was constructed with. `IDPhase`
    /// mints rows up to this count; a junction entity may end up with
    /// fewer once `LinkPhase` prunes duplicate composite keys.
    pub fn expected_volume(&self) -> usize {
        self.expected_volume
    }

    /// The entity's single primary-key attribute. Graph construction
    /// guarantees exactly one exists.
    pub fn pk_attribute(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_unique)
    }

    /// Relationship (foreign-key source) attributes, in declaration order.
    pub fn relationship_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_relationship)
    }

    /// True when this entity carries two or more FK attributes and
    /// therefore represents an M:N association.
    pub fn is_junction(&self) -> bool {
        self.relationship_attributes().count() > 1
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Direct mutable access for phases that only ever rewrite existing
    /// cells (`FieldPhase`) and never need the PK/composite-key bookkeeping
    /// `add_row`/`for_each_row` perform.
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Appends `row`, enforcing primary-key presence and uniqueness.
    pub fn add_row(&mut self, row: Row) -> Result<(), EntityError> {
        let Some(pk) = self.pk_attribute() else {
            // Unreachable in normal runs: Graph::build rejects PK-less
            // entities before any row is ever inserted.
            return Err(EntityError::MissingPrimaryKey(self.id.clone()));
        };
        let pk_name = pk.name.clone();
        let value = row.get(&pk_name).to_string();
        if value.is_empty() {
            return Err(EntityError::MissingPrimaryKey(self.id.clone()));
        }
        if self.pk_index.contains(&value) {
            return Err(EntityError::DuplicatePrimaryKey {
                entity: self.id.clone(),
                value,
            });
        }
        self.pk_index.insert(value);
        self.rows.push(row);
        Ok(())
    }

    /// The composite key for `row`: the pipe-joined values of every
    /// relationship attribute, in declaration order. Entities with fewer
    /// than two relationship attributes are not junctions; the key is
    /// empty and registration is a no-op.
    fn composite_key(&self, row: &Row) -> Option<String> {
        let names: Vec<&str> = self.relationship_attributes().map(|a| a.name.as_str()).collect();
        if names.len() < 2 {
            return None;
        }
        Some(
            names
                .iter()
                .map(|name| row.get(name))
                .collect::<Vec<_>>()
                .join("|"),
        )
    }

    pub fn is_composite_key_registered(&self, row: &Row) -> bool {
        match self.composite_key(row) {
            Some(key) => self.composite_keys.contains(&key),
            None => false,
        }
    }

    /// Registers `row`'s composite key. Returns `false` (a no-op) for
    /// non-junction entities.
    pub fn register_composite_key(&mut self, row: &Row) -> bool {
        match self.composite_key(row) {
            Some(key) => self.composite_keys.insert(key),
            None => false,
        }
    }

    /// Number of distinct composite keys registered so far. For a junction
    /// entity whose rows were all linked through
    /// [`write_foreign_key_column`](Entity::write_foreign_key_column), this
    /// equals `row_count()` — a mismatch means some row's tuple was never
    /// registered, or a duplicate was inserted outside that path.
    pub fn registered_composite_key_count(&self) -> usize {
        self.composite_keys.len()
    }

    /// Removes the row at `index`, kept for completeness; `for_each_row`'s
    /// in-place `Skip` is the preferred O(n)-total deletion path.
    pub fn remove_row(&mut self, index: usize) -> Row {
        let row = self.rows.remove(index);
        if let Some(pk) = self.pk_attribute() {
            let value = row.get(&pk.name);
            if !value.is_empty() {
                self.pk_index.remove(value);
            }
        }
        row
    }

    /// Iterates rows in index order, handing each `(row, row_index)` to
    /// `f`. A `Skip` outcome prunes the row in place (and drops its PK
    /// from the uniqueness index); any propagated error aborts the pass
    /// with the remaining rows left untouched in `self.rows`.
    pub fn for_each_row<F, E>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut Row, usize) -> Result<RowOutcome, E>,
    {
        let pk_name = self.pk_attribute().map(|a| a.name.clone());
        let taken = std::mem::take(&mut self.rows);
        let mut kept = Vec::with_capacity(taken.len());
        for (index, mut row) in taken.into_iter().enumerate() {
            match f(&mut row, index) {
                Ok(RowOutcome::Keep) => kept.push(row),
                Ok(RowOutcome::Skip) => {
                    if let Some(name) = &pk_name {
                        let value = row.get(name);
                        if !value.is_empty() {
                            self.pk_index.remove(value);
                        }
                    }
                }
                Err(err) => {
                    kept.push(row);
                    self.rows = kept;
                    return Err(err);
                }
            }
        }
        self.rows = kept;
        Ok(())
    }

    /// Writes `values[i]` into `attr_name` for the row at index `i`
    /// (`None` clears the cell to empty), then, when `prune_junction` is
    /// set, checks/registers the row's composite key through
    /// [`is_composite_key_registered`](Entity::is_composite_key_registered)
    /// / [`register_composite_key`](Entity::register_composite_key) and
    /// prunes the row in place if its tuple already exists.
    ///
    /// This is `LinkPhase`'s write-back for one relationship pass: writing
    /// and pruning must share a single pass since pruning a junction row
    /// can only be decided once every FK on that row (the last of which is
    /// the one this call writes) is in place. Driving the check through
    /// this entity's own secondary index — rather than a caller-local set —
    /// means `composite_keys` still reflects reality afterward, for any
    /// later caller (`Validator`, a future re-entrant insert) that asks.
    pub fn write_foreign_key_column(&mut self, attr_name: &str, values: &[Option<String>], prune_junction: bool) {
        let pk_name = self.pk_attribute().map(|a| a.name.clone());
        let taken = std::mem::take(&mut self.rows);
        let mut kept = Vec::with_capacity(taken.len());
        for (index, mut row) in taken.into_iter().enumerate() {
            row.set(attr_name, values[index].clone().unwrap_or_default());
            if prune_junction && self.is_composite_key_registered(&row) {
                if let Some(name) = &pk_name {
                    let value = row.get(name);
                    if !value.is_empty() {
                        self.pk_index.remove(value);
                    }
                }
                continue;
            }
            if prune_junction {
                self.register_composite_key(&row);
            }
            kept.push(row);
        }
        self.rows = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attribute::{Attribute, DataType};

    fn make_entity(name: &str, attrs: Vec<Attribute>) -> Entity {
        Entity::new(EntityId::new(0, name), attrs, 4)
    }

    #[test]
    fn add_row_rejects_missing_pk() {
        let mut entity = make_entity("User", vec![Attribute::new("id", "id", DataType::String).unique()]);
        let row = Row::new();
        let err = entity.add_row(row).unwrap_err();
        assert!(matches!(err, EntityError::MissingPrimaryKey(_)));
    }

    #[test]
    fn add_row_rejects_duplicate_pk_with_duplicate_in_message() {
        let mut entity = make_entity("User", vec![Attribute::new("id", "id", DataType::String).unique()]);
        entity.add_row(Row::new().with_cell("id", "x")).unwrap();
        let err = entity.add_row(Row::new().with_cell("id", "x")).unwrap_err();
        assert!(format!("{err}").contains("duplicate"));
        assert_eq!(entity.row_count(), 1);
    }

    #[test]
    fn non_junction_composite_key_check_is_a_no_op() {
        let mut entity = make_entity(
            "User",
            vec![
                Attribute::new("id", "id", DataType::String).unique(),
                {
                    let mut a = Attribute::new("dept_id", "dept_id", DataType::String);
                    a.is_relationship = true;
                    a
                },
            ],
        );
        let row = Row::new().with_cell("id", "1").with_cell("dept_id", "d1");
        assert!(!entity.is_composite_key_registered(&row));
        assert!(!entity.register_composite_key(&row));
    }

    #[test]
    fn junction_composite_key_detects_duplicate_tuples() {
        let mut a1 = Attribute::new("user_id", "user_id", DataType::String);
        a1.is_relationship = true;
        let mut a2 = Attribute::new("group_id", "group_id", DataType::String);
        a2.is_relationship = true;
        let mut entity = make_entity(
            "Membership",
            vec![Attribute::new("id", "id", DataType::String).unique(), a1, a2],
        );
        let row = Row::new().with_cell("user_id", "u1").with_cell("group_id", "g1");
        assert!(!entity.is_composite_key_registered(&row));
        assert!(entity.register_composite_key(&row));
        assert!(entity.is_composite_key_registered(&row));
    }

    #[test]
    fn for_each_row_skip_prunes_and_frees_pk() {
        let mut entity = make_entity("User", vec![Attribute::new("id", "id", DataType::String).unique()]);
        entity.add_row(Row::new().with_cell("id", "1")).unwrap();
        entity.add_row(Row::new().with_cell("id", "2")).unwrap();
        entity.add_row(Row::new().with_cell("id", "3")).unwrap();

        let result: Result<(), EntityError> = entity.for_each_row(|row, _idx| {
            if row.get("id") == "2" {
                Ok(RowOutcome::Skip)
            } else {
                Ok(RowOutcome::Keep)
            }
        });
        result.unwrap();
        assert_eq!(entity.row_count(), 2);
        // The freed PK can be reused.
        entity.add_row(Row::new().with_cell("id", "2")).unwrap();
        assert_eq!(entity.row_count(), 3);
    }

    #[test]
    fn write_foreign_key_column_prunes_duplicates_and_registers_surviving_keys() {
        let mut a1 = Attribute::new("user_id", "user_id", DataType::String);
        a1.is_relationship = true;
        let mut a2 = Attribute::new("group_id", "group_id", DataType::String);
        a2.is_relationship = true;
        let mut entity = make_entity(
            "Membership",
            vec![Attribute::new("id", "id", DataType::String).unique(), a1, a2],
        );
        for i in 0..4 {
            entity.add_row(Row::new().with_cell("id", format!("m{i}"))).unwrap();
        }
        // Rows 0 and 1 collide on (user_id, group_id) once both FKs are written.
        entity.write_foreign_key_column("user_id", &[Some("u0".into()), Some("u0".into()), Some("u2".into()), Some("u3".into())], false);
        entity.write_foreign_key_column(
            "group_id",
            &[Some("g0".into()), Some("g0".into()), Some("g2".into()), Some("g3".into())],
            true,
        );

        assert_eq!(entity.row_count(), 3, "the duplicate (u0, g0) tuple must be pruned");
        let mut seen = HashSet::new();
        for row in entity.rows() {
            let tuple = format!("{}|{}", row.get("user_id"), row.get("group_id"));
            assert!(seen.insert(tuple));
        }
        assert_eq!(entity.registered_composite_key_count(), entity.row_count(), "composite_keys must reflect the surviving rows");
    }
}
