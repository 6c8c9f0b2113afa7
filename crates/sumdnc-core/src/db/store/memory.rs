use crate::{
    db::{
        order::OrderKey,
        store::{RangeQuery, RangeScan, Store, StoreError},
    },
    traits::EntityKind,
    value::Value,
};
use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
    sync::{
        RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicBool, Ordering},
    },
};

///
/// MemoryState
///
/// `rows` holds the canonical order; `ids` and `unique` are secondary
/// indexes kept in lockstep by every write.
///

struct MemoryState<E> {
    rows: BTreeMap<OrderKey, E>,
    ids: HashMap<String, OrderKey>,
    unique: HashMap<(&'static str, String), String>,
}

impl<E> Default for MemoryState<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            ids: HashMap::new(),
            unique: HashMap::new(),
        }
    }
}

///
/// MemoryStore
///
/// In-process ordered store. Reads run under one shared guard, so a range
/// read (anchor resolution + filter + scan) always sees a single committed
/// state.
///

pub struct MemoryStore<E: EntityKind> {
    state: RwLock<MemoryState<E>>,
    available: AtomicBool,
}

impl<E: EntityKind> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> MemoryStore<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Insert one row. Rejects a duplicate id or unique-field value.
    pub fn insert(&self, entity: E) -> Result<(), StoreError> {
        let mut state = self.write()?;

        if state.ids.contains_key(entity.id()) {
            return Err(StoreError::Conflict {
                entity_path: E::PATH,
                field: "id",
                key: entity.id().to_string(),
            });
        }

        let unique_keys = unique_keys(&entity);
        if let Some((field, key)) = unique_keys
            .iter()
            .find(|slot| state.unique.contains_key(*slot))
        {
            return Err(StoreError::Conflict {
                entity_path: E::PATH,
                field: *field,
                key: key.clone(),
            });
        }

        let key = OrderKey::of(&entity);
        for slot in unique_keys {
            state.unique.insert(slot, entity.id().to_string());
        }
        state.ids.insert(entity.id().to_string(), key.clone());
        state.rows.insert(key, entity);

        Ok(())
    }

    /// Remove one row by id, returning it if present.
    pub fn delete(&self, id: &str) -> Result<Option<E>, StoreError> {
        let mut state = self.write()?;

        let Some(key) = state.ids.remove(id) else {
            return Ok(None);
        };
        let removed = state.rows.remove(&key);
        if let Some(entity) = &removed {
            for slot in unique_keys(entity) {
                state.unique.remove(&slot);
            }
        }

        Ok(removed)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Toggle availability; while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                reason: format!("{} store is offline", E::PATH),
            })
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState<E>>, StoreError> {
        self.check_available()?;
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState<E>>, StoreError> {
        self.check_available()?;
        self.state.write().map_err(|_| poisoned())
    }
}

impl<E: EntityKind> Store<E> for MemoryStore<E> {
    fn range(&self, query: RangeQuery<'_>) -> Result<RangeScan<E>, StoreError> {
        let state = self.read()?;

        let lower = match query.after {
            Some(id) => {
                let key = state.ids.get(id).ok_or_else(|| StoreError::NotFound {
                    entity_path: E::PATH,
                    key: id.to_string(),
                })?;
                Bound::Excluded(key)
            }
            None => Bound::Unbounded,
        };

        let mut rows_scanned = 0_u64;
        let rows = state
            .rows
            .range::<OrderKey, _>((lower, Bound::Unbounded))
            .map(|(_, entity)| entity)
            .inspect(|_| rows_scanned += 1)
            .filter(|entity| query.predicate.matches(*entity))
            .take(query.take)
            .cloned()
            .collect();

        Ok(RangeScan { rows, rows_scanned })
    }

    fn get(&self, id: &str) -> Result<Option<E>, StoreError> {
        let state = self.read()?;

        Ok(state
            .ids
            .get(id)
            .and_then(|key| state.rows.get(key))
            .cloned())
    }

    fn get_unique(&self, field: &str, value: &str) -> Result<Option<E>, StoreError> {
        let Some(field) = E::UNIQUE_FIELDS.iter().copied().find(|f| *f == field) else {
            return Err(StoreError::NotUnique {
                entity_path: E::PATH,
                field: field.to_string(),
            });
        };

        let state = self.read()?;
        let Some(id) = state.unique.get(&(field, value.to_string())) else {
            return Ok(None);
        };

        Ok(state
            .ids
            .get(id)
            .and_then(|key| state.rows.get(key))
            .cloned())
    }
}

// Text projections of every unique field that holds a value.
fn unique_keys<E: EntityKind>(entity: &E) -> Vec<(&'static str, String)> {
    E::UNIQUE_FIELDS
        .iter()
        .filter_map(|field| match entity.field_value(field)? {
            Value::Text(text) => Some((*field, text)),
            Value::Uint(n) => Some((*field, n.to_string())),
            _ => None,
        })
        .collect()
}

fn poisoned() -> StoreError {
    StoreError::Unavailable {
        reason: "store lock poisoned".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::predicate::Predicate,
        test_support::{TestRow, row},
    };

    fn ids(rows: &[TestRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    fn store_with(rows: Vec<TestRow>) -> MemoryStore<TestRow> {
        let store = MemoryStore::new();
        for r in rows {
            store.insert(r).expect("insert should succeed");
        }
        store
    }

    #[test]
    fn range_walks_canonical_order_after_anchor() {
        let store = store_with(vec![
            row("a", 1, true),
            row("b", 3, true),
            row("c", 2, true),
            row("d", 2, true),
        ]);
        let all = Predicate::True;

        let scan = store
            .range(RangeQuery {
                predicate: &all,
                after: None,
                take: 10,
            })
            .expect("range should succeed");
        assert_eq!(ids(&scan.rows), vec!["b", "c", "d", "a"]);

        let scan = store
            .range(RangeQuery {
                predicate: &all,
                after: Some("c"),
                take: 1,
            })
            .expect("range after anchor should succeed");
        assert_eq!(ids(&scan.rows), vec!["d"]);
    }

    #[test]
    fn range_applies_filter_before_take() {
        let store = store_with(vec![
            row("a", 4, false),
            row("b", 3, true),
            row("c", 2, false),
            row("d", 1, true),
        ]);
        let published = Predicate::eq("published", true);

        let scan = store
            .range(RangeQuery {
                predicate: &published,
                after: None,
                take: 2,
            })
            .expect("range should succeed");
        assert_eq!(ids(&scan.rows), vec!["b", "d"]);
        assert_eq!(scan.rows_scanned, 4);
    }

    #[test]
    fn range_with_missing_anchor_is_not_found() {
        let store = store_with(vec![row("a", 1, true)]);

        let err = store
            .range(RangeQuery {
                predicate: &Predicate::True,
                after: Some("gone"),
                take: 1,
            })
            .expect_err("dangling anchor should fail");
        assert_eq!(
            err,
            StoreError::NotFound {
                entity_path: TestRow::PATH,
                key: "gone".to_string()
            }
        );
    }

    #[test]
    fn insert_rejects_duplicate_id_and_unique_value() {
        let store = store_with(vec![row("a", 1, true).with_slug("first")]);

        let err = store
            .insert(row("a", 2, true))
            .expect_err("duplicate id should conflict");
        assert!(matches!(err, StoreError::Conflict { field: "id", .. }));

        let err = store
            .insert(row("b", 2, true).with_slug("first"))
            .expect_err("duplicate slug should conflict");
        assert!(matches!(err, StoreError::Conflict { field: "slug", .. }));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn delete_clears_secondary_indexes() {
        let store = store_with(vec![row("a", 1, true).with_slug("first")]);

        let removed = store.delete("a").expect("delete should succeed");
        assert_eq!(removed.map(|r| r.id), Some("a".to_string()));
        assert!(store.get("a").expect("get").is_none());
        assert!(store.get_unique("slug", "first").expect("lookup").is_none());

        store
            .insert(row("b", 2, true).with_slug("first"))
            .expect("slug is free again");
    }

    #[test]
    fn get_unique_rejects_non_unique_fields() {
        let store = store_with(vec![row("a", 1, true)]);

        let err = store
            .get_unique("title", "x")
            .expect_err("title is not unique");
        assert!(matches!(err, StoreError::NotUnique { .. }));
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = store_with(vec![row("a", 1, true)]);
        store.set_available(false);

        assert!(matches!(
            store.get("a"),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(
            store.insert(row("b", 2, true)),
            Err(StoreError::Unavailable { .. })
        ));

        store.set_available(true);
        assert!(store.get("a").expect("get").is_some());
    }
}
