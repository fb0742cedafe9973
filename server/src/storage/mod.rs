//! Record storage.
//!
//! Handlers only ever talk to [`Storage`]; the in-memory backend is the one
//! wired up today, and a durable backend only has to implement the same
//! trait.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Match, NewMatch, NewTicket, NewUser, Ticket, User};

pub mod memory;

pub use memory::MemStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique user field (`username` or `email`) is already taken.
    #[error("{field} is already registered")]
    Conflict { field: &'static str },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Async CRUD accessors for users, matches and tickets.
///
/// Lookups return `Ok(None)` for an unknown id. `create_*` assign the id and
/// every server-side default.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// Active matches only.
    async fn get_matches(&self) -> StorageResult<Vec<Match>>;
    async fn get_match(&self, id: Uuid) -> StorageResult<Option<Match>>;
    async fn create_match(&self, new_match: NewMatch) -> StorageResult<Match>;

    async fn get_user_tickets(&self, user_id: Uuid) -> StorageResult<Vec<Ticket>>;
    async fn get_ticket(&self, id: Uuid) -> StorageResult<Option<Ticket>>;
    /// No referential check happens here; callers verify the user and match.
    async fn create_ticket(&self, ticket: NewTicket) -> StorageResult<Ticket>;
}
