//! Per-type schema cache.
//!
//! Initialization runs at most once per host type for the lifetime of the
//! cache. Concurrent first calls for the same type serialize on the map
//! shard; every caller then shares the same [`CompiledSchema`].

use crate::{CompiledSchema, ValidatorRegistry};
use constraints_core::{ConfigResult, Validatable};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::TypeId;
use std::sync::Arc;

/// Concurrent map from host type to its initialized schema.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: DashMap<TypeId, Arc<CompiledSchema>>,
}

impl SchemaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled schema of `T`, compiling it on first use.
    ///
    /// A failed compilation leaves no entry behind, so the error is reported
    /// again on the next call.
    pub fn get_or_compile<T: Validatable>(
        &self,
        registry: &ValidatorRegistry,
    ) -> ConfigResult<Arc<CompiledSchema>> {
        let key = TypeId::of::<T>();
        if let Some(schema) = self.entries.get(&key) {
            return Ok(Arc::clone(schema.value()));
        }

        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let compiled = Arc::new(CompiledSchema::compile(&T::schema(), registry)?);
                entry.insert(Arc::clone(&compiled));
                Ok(compiled)
            }
        }
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached schema.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
