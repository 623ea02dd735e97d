//! Unit of work port - all-or-nothing persistence scope.
//!
//! A handler begins a transaction before its first repository call, makes
//! every entity read and write through `Transaction::entities`, and either
//! commits after the last write or rolls back on any failure. How isolation
//! is achieved (database transaction, write lock, staging area) is up to
//! the adapter.
//!
//! ```ignore
//! let tx = unit_of_work.begin().await?;
//! match do_work(tx.entities()).await {
//!     Ok(value) => {
//!         tx.commit().await?;
//!         Ok(value)
//!     }
//!     Err(e) => {
//!         if let Err(rollback_err) = tx.rollback().await {
//!             warn!(error = %rollback_err, "rollback failed");
//!         }
//!         Err(e)
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::{EntityRepository, RepositoryError};

/// Opens transactions over the repositories it is paired with.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Begin a new transaction.
    ///
    /// May wait until a conflicting transaction finishes.
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError>;
}

/// An open transaction. Consumed by `commit` or `rollback`.
///
/// Dropping a transaction without finishing it must not make its writes
/// permanent.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Entity repository scoped to this transaction.
    ///
    /// Only writes made through it are committed or rolled back.
    fn entities(&self) -> &dyn EntityRepository;

    /// Make every write since `begin` permanent.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    /// Discard every write since `begin`.
    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
