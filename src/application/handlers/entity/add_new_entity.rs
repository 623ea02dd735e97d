//! AddNewEntityHandler - Command handler for registering an owned entity.
//!
//! Steps run in a fixed order inside one transaction, each short-circuiting
//! on failure:
//!
//! 1. Resolve the requesting user (`RecordNotFound` becomes `BadRequest`)
//! 2. Reject inactive users
//! 3. Reject a name the owner already uses
//! 4. Build the entity and insert it
//!
//! Steps 3 and 4 go through the transaction's entity repository. The
//! transaction is committed after step 4 and rolled back on any error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entity::{Entity, EntityCriteria, EntityProperties};
use crate::domain::foundation::{DomainError, EntityId, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{RepositoryError, Transaction, UnitOfWork, UserRepository};

/// Request property naming the requesting user.
pub const REQUESTED_BY_USER_ID: &str = "requestedByUserId";

/// Command to register a new entity on behalf of a user.
#[derive(Debug, Clone)]
pub struct AddNewEntityCommand {
    pub requested_by_user_id: UserId,
    pub entity_name: String,
    pub entity_purpose: String,
}

/// Failure of an `AddNewEntityCommand`.
///
/// `Domain` errors are safe to show to the caller. `Infrastructure` errors
/// are faults the handler could not reinterpret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddNewEntityError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Infrastructure failure: {0}")]
    Infrastructure(RepositoryError),
}

impl AddNewEntityError {
    /// Returns the domain error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AddNewEntityError::Domain(err) => Some(err),
            AddNewEntityError::Infrastructure(_) => None,
        }
    }
}

/// Handler for registering entities.
pub struct AddNewEntityHandler {
    users: Arc<dyn UserRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl AddNewEntityHandler {
    pub fn new(users: Arc<dyn UserRepository>, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self {
            users,
            unit_of_work,
        }
    }

    pub async fn handle(&self, cmd: AddNewEntityCommand) -> Result<Entity, AddNewEntityError> {
        let tx = self
            .unit_of_work
            .begin()
            .await
            .map_err(AddNewEntityError::Infrastructure)?;

        match self.register(tx.as_ref(), &cmd).await {
            Ok(entity) => {
                tx.commit()
                    .await
                    .map_err(AddNewEntityError::Infrastructure)?;
                info!(
                    entity_id = %entity.id(),
                    user_id = %entity.owner_user_id(),
                    entity_name = entity.name(),
                    "entity registered"
                );
                Ok(entity)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                warn!(
                    user_id = %cmd.requested_by_user_id,
                    entity_name = %cmd.entity_name,
                    error = %err,
                    "entity registration rejected"
                );
                Err(err)
            }
        }
    }

    async fn register(
        &self,
        tx: &dyn Transaction,
        cmd: &AddNewEntityCommand,
    ) -> Result<Entity, AddNewEntityError> {
        // 1. Resolve requester
        let owner = self.resolve_owner(&cmd.requested_by_user_id).await?;

        // 2. Authorize state
        if !owner.is_active() {
            return Err(DomainError::validating(REQUESTED_BY_USER_ID, "User is inactive").into());
        }

        // 3. Uniqueness check
        let criteria = EntityCriteria::new()
            .with_name(cmd.entity_name.as_str())
            .with_owner(owner.id().clone());
        if let Some(existing) = tx
            .entities()
            .find_first_by(&criteria)
            .await
            .map_err(AddNewEntityError::Infrastructure)?
        {
            return Err(DomainError::duplicate_entity(existing.name()).into());
        }

        // 4. Construct and persist
        let entity = Entity::new(EntityProperties {
            id: EntityId::new(),
            owner_user_id: owner.id().clone(),
            name: cmd.entity_name.clone(),
            purpose: cmd.entity_purpose.clone(),
            created_at: Timestamp::now(),
        });
        debug!(entity_id = %entity.id(), "inserting entity");

        tx.entities().insert(entity).await.map_err(|err| match err {
            // A store-level constraint caught a racing registration.
            RepositoryError::UniqueViolation { .. } => {
                DomainError::duplicate_entity(cmd.entity_name.as_str()).into()
            }
            other => AddNewEntityError::Infrastructure(other),
        })
    }

    async fn resolve_owner(&self, user_id: &UserId) -> Result<User, AddNewEntityError> {
        debug!(user_id = %user_id, "resolving requester");
        self.users.get_by_id(user_id).await.map_err(|err| match err {
            RepositoryError::RecordNotFound { .. } => {
                DomainError::validating(REQUESTED_BY_USER_ID, "Not found").into()
            }
            other => AddNewEntityError::Infrastructure(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryEntityRepository, InMemoryUserRepository};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::EntityRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ────────────────────────────────────────────────────────────────────
    // Spy ports
    // ────────────────────────────────────────────────────────────────────

    struct SpyUserRepository {
        result: Result<User, RepositoryError>,
        calls: AtomicUsize,
    }

    impl SpyUserRepository {
        fn returning(user: User) -> Self {
            Self {
                result: Ok(user),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: RepositoryError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UserRepository for SpyUserRepository {
        async fn get_by_id(&self, _id: &UserId) -> Result<User, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct SpyEntityRepository {
        existing: Option<Entity>,
        fail_insert: Option<RepositoryError>,
        queries: Mutex<Vec<EntityCriteria>>,
        inserted: Mutex<Vec<Entity>>,
    }

    impl SpyEntityRepository {
        fn empty() -> Self {
            Self {
                existing: None,
                fail_insert: None,
                queries: Mutex::new(Vec::new()),
                inserted: Mutex::new(Vec::new()),
            }
        }

        fn with_existing(entity: Entity) -> Self {
            Self {
                existing: Some(entity),
                ..Self::empty()
            }
        }

        fn failing_insert(err: RepositoryError) -> Self {
            Self {
                fail_insert: Some(err),
                ..Self::empty()
            }
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn insert_count(&self) -> usize {
            self.inserted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EntityRepository for SpyEntityRepository {
        async fn find_first_by(
            &self,
            criteria: &EntityCriteria,
        ) -> Result<Option<Entity>, RepositoryError> {
            self.queries.lock().unwrap().push(criteria.clone());
            Ok(self.existing.clone())
        }

        async fn insert(&self, entity: Entity) -> Result<Entity, RepositoryError> {
            self.inserted.lock().unwrap().push(entity.clone());
            match &self.fail_insert {
                Some(err) => Err(err.clone()),
                None => Ok(entity),
            }
        }
    }

    /// Hands out transactions over a spy entity repository and counts how
    /// they finish.
    struct RecordingUnitOfWork {
        entities: Arc<SpyEntityRepository>,
        fail_commit: Option<RepositoryError>,
        fail_rollback: Option<RepositoryError>,
        begins: AtomicUsize,
        commits: Arc<AtomicUsize>,
        rollbacks: Arc<AtomicUsize>,
    }

    impl RecordingUnitOfWork {
        fn new(entities: Arc<SpyEntityRepository>) -> Self {
            Self {
                entities,
                fail_commit: None,
                fail_rollback: None,
                begins: AtomicUsize::new(0),
                commits: Arc::new(AtomicUsize::new(0)),
                rollbacks: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing_commit(mut self, err: RepositoryError) -> Self {
            self.fail_commit = Some(err);
            self
        }

        fn failing_rollback(mut self, err: RepositoryError) -> Self {
            self.fail_rollback = Some(err);
            self
        }
    }

    struct RecordingTransaction {
        entities: Arc<SpyEntityRepository>,
        fail_commit: Option<RepositoryError>,
        fail_rollback: Option<RepositoryError>,
        commits: Arc<AtomicUsize>,
        rollbacks: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UnitOfWork for RecordingUnitOfWork {
        async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
            self.begins.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(RecordingTransaction {
                entities: self.entities.clone(),
                fail_commit: self.fail_commit.clone(),
                fail_rollback: self.fail_rollback.clone(),
                commits: self.commits.clone(),
                rollbacks: self.rollbacks.clone(),
            }))
        }
    }

    #[async_trait]
    impl Transaction for RecordingTransaction {
        fn entities(&self) -> &dyn EntityRepository {
            self.entities.as_ref()
        }

        async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            self.fail_commit.clone().map_or(Ok(()), Err)
        }

        async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
            self.rollbacks.fetch_add(1, Ordering::SeqCst);
            self.fail_rollback.clone().map_or(Ok(()), Err)
        }
    }

    /// Unit of work over an in-memory store whose transactional insert
    /// writes, then reports a failure.
    struct FlakyUnitOfWork(InMemoryEntityRepository);

    struct FlakyTransaction(Box<dyn Transaction>);

    #[async_trait]
    impl UnitOfWork for FlakyUnitOfWork {
        async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
            Ok(Box::new(FlakyTransaction(self.0.begin().await?)))
        }
    }

    #[async_trait]
    impl EntityRepository for FlakyTransaction {
        async fn find_first_by(
            &self,
            criteria: &EntityCriteria,
        ) -> Result<Option<Entity>, RepositoryError> {
            self.0.entities().find_first_by(criteria).await
        }

        async fn insert(&self, entity: Entity) -> Result<Entity, RepositoryError> {
            self.0.entities().insert(entity).await?;
            Err(RepositoryError::storage("acknowledgement lost"))
        }
    }

    #[async_trait]
    impl Transaction for FlakyTransaction {
        fn entities(&self) -> &dyn EntityRepository {
            self
        }

        async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
            let FlakyTransaction(inner) = *self;
            inner.commit().await
        }

        async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
            let FlakyTransaction(inner) = *self;
            inner.rollback().await
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────────────

    fn user_id(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn command(user: &str, name: &str, purpose: &str) -> AddNewEntityCommand {
        AddNewEntityCommand {
            requested_by_user_id: user_id(user),
            entity_name: name.to_string(),
            entity_purpose: purpose.to_string(),
        }
    }

    fn existing_entity(owner: &str, name: &str) -> Entity {
        Entity::new(EntityProperties {
            id: EntityId::new(),
            owner_user_id: user_id(owner),
            name: name.to_string(),
            purpose: "x".to_string(),
            created_at: Timestamp::now(),
        })
    }

    struct Fixture {
        users: Arc<SpyUserRepository>,
        entities: Arc<SpyEntityRepository>,
        uow: Arc<RecordingUnitOfWork>,
        handler: AddNewEntityHandler,
    }

    fn fixture(users: SpyUserRepository, entities: SpyEntityRepository) -> Fixture {
        fixture_with(users, entities, |uow| uow)
    }

    fn fixture_with(
        users: SpyUserRepository,
        entities: SpyEntityRepository,
        configure: impl FnOnce(RecordingUnitOfWork) -> RecordingUnitOfWork,
    ) -> Fixture {
        let users = Arc::new(users);
        let entities = Arc::new(entities);
        let uow = Arc::new(configure(RecordingUnitOfWork::new(entities.clone())));
        let handler = AddNewEntityHandler::new(users.clone(), uow.clone());
        Fixture {
            users,
            entities,
            uow,
            handler,
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Tests
    // ────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn registers_entity_for_active_user() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::empty(),
        );
        let started = Timestamp::now();

        let entity = f.handler.handle(command("u1", "NewOne", "demo")).await.unwrap();

        assert_eq!(entity.owner_user_id(), &user_id("u1"));
        assert_eq!(entity.name(), "NewOne");
        assert_eq!(entity.purpose(), "demo");
        assert!(!entity.id().to_string().is_empty());
        assert!(!entity.created_at().is_before(&started));
        assert_eq!(f.entities.insert_count(), 1);
    }

    #[tokio::test]
    async fn missing_user_is_reported_as_bad_request() {
        let f = fixture(
            SpyUserRepository::failing(RepositoryError::not_found_by("User", "id", "ghost")),
            SpyEntityRepository::empty(),
        );

        let err = f.handler.handle(command("ghost", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err,
            AddNewEntityError::Domain(DomainError::validating(REQUESTED_BY_USER_ID, "Not found"))
        );
    }

    #[tokio::test]
    async fn missing_user_skips_query_and_insert() {
        let f = fixture(
            SpyUserRepository::failing(RepositoryError::not_found_by("User", "id", "ghost")),
            SpyEntityRepository::empty(),
        );

        let _ = f.handler.handle(command("ghost", "Foo", "x")).await;

        assert_eq!(f.users.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.entities.query_count(), 0);
        assert_eq!(f.entities.insert_count(), 0);
    }

    #[tokio::test]
    async fn user_storage_failure_is_not_translated() {
        let f = fixture(
            SpyUserRepository::failing(RepositoryError::storage("connection reset")),
            SpyEntityRepository::empty(),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err,
            AddNewEntityError::Infrastructure(RepositoryError::storage("connection reset"))
        );
        assert!(err.as_domain().is_none());
        assert_eq!(f.entities.query_count(), 0);
    }

    #[tokio::test]
    async fn inactive_user_is_rejected_before_any_entity_access() {
        let f = fixture(
            SpyUserRepository::returning(User::inactive(user_id("u1"))),
            SpyEntityRepository::empty(),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&DomainError::validating(REQUESTED_BY_USER_ID, "User is inactive"))
        );
        assert_eq!(f.entities.query_count(), 0);
        assert_eq!(f.entities.insert_count(), 0);
    }

    #[tokio::test]
    async fn uniqueness_query_uses_owner_and_name() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::empty(),
        );

        f.handler.handle(command("u1", "Foo", "x")).await.unwrap();

        let queries = f.entities.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![EntityCriteria::new().with_name("Foo").with_owner(user_id("u1"))]
        );
    }

    #[tokio::test]
    async fn duplicate_names_the_conflicting_entity() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::with_existing(existing_entity("u1", "Foo")),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        let domain = err.as_domain().unwrap();
        assert_eq!(domain.code(), ErrorCode::DuplicateEntity);
        assert_eq!(domain.message(), "Duplicate record found: Foo");
        assert_eq!(f.entities.insert_count(), 0);
    }

    #[tokio::test]
    async fn unique_violation_on_insert_becomes_duplicate() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::failing_insert(RepositoryError::unique_violation("Entity", "k")),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(err, AddNewEntityError::Domain(DomainError::duplicate_entity("Foo")));
    }

    #[tokio::test]
    async fn insert_storage_failure_propagates_unchanged() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::failing_insert(RepositoryError::storage("disk full")),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err,
            AddNewEntityError::Infrastructure(RepositoryError::storage("disk full"))
        );
    }

    #[tokio::test]
    async fn success_commits_exactly_once() {
        let f = fixture(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::empty(),
        );

        f.handler.handle(command("u1", "Foo", "x")).await.unwrap();

        assert_eq!(f.uow.begins.load(Ordering::SeqCst), 1);
        assert_eq!(f.uow.commits.load(Ordering::SeqCst), 1);
        assert_eq!(f.uow.rollbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_failure_rolls_back() {
        let cases = vec![
            fixture(
                SpyUserRepository::failing(RepositoryError::not_found_by("User", "id", "u1")),
                SpyEntityRepository::empty(),
            ),
            fixture(
                SpyUserRepository::returning(User::inactive(user_id("u1"))),
                SpyEntityRepository::empty(),
            ),
            fixture(
                SpyUserRepository::returning(User::active(user_id("u1"))),
                SpyEntityRepository::with_existing(existing_entity("u1", "Foo")),
            ),
            fixture(
                SpyUserRepository::returning(User::active(user_id("u1"))),
                SpyEntityRepository::failing_insert(RepositoryError::storage("boom")),
            ),
        ];

        for f in cases {
            assert!(f.handler.handle(command("u1", "Foo", "x")).await.is_err());
            assert_eq!(f.uow.commits.load(Ordering::SeqCst), 0);
            assert_eq!(f.uow.rollbacks.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn rollback_failure_keeps_original_error() {
        let f = fixture_with(
            SpyUserRepository::returning(User::inactive(user_id("u1"))),
            SpyEntityRepository::empty(),
            |uow| uow.failing_rollback(RepositoryError::storage("rollback lost")),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err,
            AddNewEntityError::Domain(DomainError::validating(
                REQUESTED_BY_USER_ID,
                "User is inactive"
            ))
        );
        assert_eq!(f.uow.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn commit_failure_is_infrastructure_error() {
        let f = fixture_with(
            SpyUserRepository::returning(User::active(user_id("u1"))),
            SpyEntityRepository::empty(),
            |uow| uow.failing_commit(RepositoryError::storage("commit lost")),
        );

        let err = f.handler.handle(command("u1", "Foo", "x")).await.unwrap_err();

        assert_eq!(
            err,
            AddNewEntityError::Infrastructure(RepositoryError::storage("commit lost"))
        );
        assert_eq!(f.uow.commits.load(Ordering::SeqCst), 1);
        assert_eq!(f.uow.rollbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_insert_leaves_no_trace_in_store() {
        let store = InMemoryEntityRepository::new();
        let users = Arc::new(InMemoryUserRepository::with_users([User::active(user_id("u1"))]));
        let handler = AddNewEntityHandler::new(users, Arc::new(FlakyUnitOfWork(store.clone())));

        let result = handler.handle(command("u1", "Foo", "x")).await;

        assert!(result.is_err());
        let criteria = EntityCriteria::new().with_name("Foo").with_owner(user_id("u1"));
        assert!(store.find_first_by(&criteria).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn same_name_for_different_owner_is_allowed() {
        let store = Arc::new(InMemoryEntityRepository::with_entities([existing_entity(
            "u2", "Foo",
        )]));
        let users = Arc::new(InMemoryUserRepository::with_users([User::active(user_id("u1"))]));
        let handler = AddNewEntityHandler::new(users, store.clone());

        let entity = handler.handle(command("u1", "Foo", "x")).await.unwrap();

        assert_eq!(entity.owner_user_id(), &user_id("u1"));
        assert_eq!(store.entity_count(), 2);
    }
}
