//! In-process store. Data does not survive a restart.

use super::PersonStore;
use crate::error::StoreError;
use crate::model::{Person, PersonId};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// Demonstration records loaded by [`VolatileStore::seeded`].
pub const DEMO_SEED: &[&str] = &["Jean", "Maria", "Carlos"];

struct Inner {
    /// Never reused, even after deletes.
    next_id: i64,
    people: Vec<Person>,
}

/// Ordered in-memory collection guarded by a single mutex. Every operation
/// takes the guard once and finishes its scan or mutation before releasing it.
pub struct VolatileStore {
    inner: Mutex<Inner>,
}

impl Default for VolatileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VolatileStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                people: Vec::new(),
            }),
        }
    }

    pub fn seeded() -> Self {
        Self::with_names(DEMO_SEED.iter().copied())
    }

    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut inner = Inner {
            next_id: 1,
            people: Vec::new(),
        };
        for name in names {
            inner.people.push(Person::new(PersonId::new(inner.next_id), name));
            inner.next_id += 1;
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.people.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.people.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl PersonStore for VolatileStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        Ok(self.lock()?.people.clone())
    }

    async fn get(&self, id: PersonId) -> Result<Option<Person>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.people.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Person, StoreError> {
        let mut guard = self.lock()?;
        let person = Person::new(PersonId::new(guard.next_id), name);
        guard.next_id += 1;
        guard.people.push(person.clone());
        Ok(person)
    }

    async fn update(&self, id: PersonId, name: &str) -> Result<Option<Person>, StoreError> {
        let mut guard = self.lock()?;
        Ok(guard.people.iter_mut().find(|p| p.id == id).map(|p| {
            p.name = name.to_string();
            p.clone()
        }))
    }

    async fn delete(&self, id: PersonId) -> Result<bool, StoreError> {
        let mut guard = self.lock()?;
        match guard.people.iter().position(|p| p.id == id) {
            Some(idx) => {
                guard.people.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
