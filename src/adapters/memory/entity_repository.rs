//! In-Memory Entity Repository Adapter
//!
//! Stores entities in insertion order and doubles as the `UnitOfWork` for
//! them. A transaction holds the single writer slot until it finishes, so
//! concurrent registrations run their check-then-insert sequence one after
//! another. Inserts made through a transaction are journaled by that
//! transaction alone and undone on rollback or drop.
//!
//! Writes made directly on the repository wait for any open transaction to
//! finish. Readers do not take the writer slot and may observe uncommitted
//! inserts.

use async_trait::async_trait;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entity::{Entity, EntityCriteria};
use crate::domain::foundation::EntityId;
use crate::ports::{EntityRepository, RepositoryError, Transaction, UnitOfWork};

#[derive(Debug, Default)]
struct EntityState {
    entities: Vec<Entity>,
}

#[derive(Debug)]
struct UndoEntry {
    id: EntityId,
    previous: Option<Entity>,
}

impl EntityState {
    fn find_first(&self, criteria: &EntityCriteria) -> Option<Entity> {
        self.entities.iter().find(|e| criteria.matches(e)).cloned()
    }

    /// Store `entity`, returning the record it replaced.
    fn apply(&mut self, entity: Entity) -> Result<Option<Entity>, RepositoryError> {
        if self.conflicts_with(&entity) {
            return Err(RepositoryError::unique_violation(
                "Entity",
                format!("(\"{}\", \"{}\")", entity.owner_user_id(), entity.name()),
            ));
        }

        match self.entities.iter().position(|e| e.id() == entity.id()) {
            Some(index) => Ok(Some(std::mem::replace(&mut self.entities[index], entity))),
            None => {
                self.entities.push(entity);
                Ok(None)
            }
        }
    }

    fn undo(&mut self, journal: Vec<UndoEntry>) {
        for entry in journal.into_iter().rev() {
            match entry.previous {
                Some(previous) => {
                    if let Some(slot) = self.entities.iter_mut().find(|e| e.id() == &entry.id) {
                        *slot = previous;
                    }
                }
                None => self.entities.retain(|e| e.id() != &entry.id),
            }
        }
    }

    fn conflicts_with(&self, candidate: &Entity) -> bool {
        self.entities.iter().any(|e| {
            e.id() != candidate.id()
                && e.owner_user_id() == candidate.owner_user_id()
                && e.name() == candidate.name()
        })
    }
}

// Critical sections never leave the state half-updated, so a poisoned lock
// is still safe to use.
fn read_state(state: &RwLock<EntityState>) -> RwLockReadGuard<'_, EntityState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &RwLock<EntityState>) -> RwLockWriteGuard<'_, EntityState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory entity store with `(owner, name)` uniqueness.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityRepository {
    state: Arc<RwLock<EntityState>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryEntityRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with entities
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let state = EntityState {
            entities: entities.into_iter().collect(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Number of stored entities
    pub fn entity_count(&self) -> usize {
        read_state(&self.state).entities.len()
    }

    /// Snapshot of stored entities in insertion order
    pub fn entities(&self) -> Vec<Entity> {
        read_state(&self.state).entities.clone()
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn find_first_by(
        &self,
        criteria: &EntityCriteria,
    ) -> Result<Option<Entity>, RepositoryError> {
        Ok(read_state(&self.state).find_first(criteria))
    }

    async fn insert(&self, entity: Entity) -> Result<Entity, RepositoryError> {
        let _writer = self.writer.lock().await;
        write_state(&self.state).apply(entity.clone())?;
        Ok(entity)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryEntityRepository {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
        let writer = Arc::clone(&self.writer).lock_owned().await;

        Ok(Box::new(InMemoryTransaction {
            state: Arc::clone(&self.state),
            journal: StdMutex::new(Vec::new()),
            _writer: writer,
        }))
    }
}

/// Open transaction over an `InMemoryEntityRepository`.
///
/// Holds the writer slot until dropped. Anything left in the journal at
/// that point is undone.
struct InMemoryTransaction {
    state: Arc<RwLock<EntityState>>,
    journal: StdMutex<Vec<UndoEntry>>,
    _writer: OwnedMutexGuard<()>,
}

impl InMemoryTransaction {
    fn take_journal(&mut self) -> Vec<UndoEntry> {
        let journal = self
            .journal
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(journal)
    }

    fn discard(&mut self) {
        let journal = self.take_journal();
        if !journal.is_empty() {
            write_state(&self.state).undo(journal);
        }
    }
}

#[async_trait]
impl EntityRepository for InMemoryTransaction {
    async fn find_first_by(
        &self,
        criteria: &EntityCriteria,
    ) -> Result<Option<Entity>, RepositoryError> {
        Ok(read_state(&self.state).find_first(criteria))
    }

    async fn insert(&self, entity: Entity) -> Result<Entity, RepositoryError> {
        let id = *entity.id();
        let previous = write_state(&self.state).apply(entity.clone())?;
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(UndoEntry { id, previous });
        Ok(entity)
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    fn entities(&self) -> &dyn EntityRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut this = self;
        this.take_journal();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut this = self;
        this.discard();
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        // Runs before the writer slot is released.
        self.discard();
    }
}
