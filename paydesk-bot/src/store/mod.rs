//! Authorization state persistence facade.
//!
//! All conversational state lives here: which users have a pending
//! authorization request, which credentials they have supplied so far, which
//! chats have completed credentials, and any in-progress return-of-deposit
//! draft. Talkers and the Commander read and write through the [`AuthStore`]
//! trait and hold no state of their own.
//!
//! The store must tolerate concurrent access from multiple short-lived
//! Commanders; implementations own their locking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::MemoryAuthStore;

/// Chat identifier as the transport layer assigns them.
pub type ChatId = i64;
/// User identifier as the transport layer assigns them.
pub type UserId = i64;

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error type for the persistence facade.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backing store failed.
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A stored record could not be interpreted.
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Where a user stands in the authorization lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// No request on record.
    #[default]
    Absent,
    /// An authorization request is open and credentials are being collected.
    PendingRequest,
    /// The full credential triple has been supplied.
    Provided,
}

/// A user's (or chat's) stored authorization record.
///
/// Fields the user has not supplied yet stay `None`; that is normal state
/// during collection, not corruption.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Lifecycle position.
    #[serde(default)]
    pub status: AuthStatus,
    /// Chat that opened the request; credentials are published there on
    /// completion.
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    /// Supplied API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Supplied API passphrase.
    #[serde(default)]
    pub api_passphrase: Option<String>,
    /// Supplied API secret.
    #[serde(default)]
    pub api_secret: Option<String>,
}

/// One field of the credential triple, as the collection flow addresses them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialField {
    /// The API key.
    ApiKey,
    /// The API passphrase.
    ApiPassphrase,
    /// The API secret.
    ApiSecret,
}

/// A return-of-deposit request assembled field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDepositDraft {
    /// Order the deposit belongs to.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Deposit to return.
    #[serde(default)]
    pub deposit_id: Option<String>,
    /// Destination address for the returned funds.
    #[serde(default)]
    pub return_address: Option<String>,
    /// Currency code of the deposit.
    #[serde(default)]
    pub currency: Option<String>,
}

impl ReturnDepositDraft {
    /// True when every field has been collected.
    pub fn is_complete(&self) -> bool {
        self.order_id.is_some()
            && self.deposit_id.is_some()
            && self.return_address.is_some()
            && self.currency.is_some()
    }
}

/// Persistence operations the orchestration core consumes.
///
/// Implementations decide the merge policy for repeated requests; the
/// contract here is upsert-by-user-id, so a second `add_auth_request` for the
/// same user rebinds the pending chat without corrupting state.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Credentials authorized for a chat, if any user completed the flow
    /// there. `None` means the chat operates unauthenticated.
    async fn chat_auth_state(&self, chat_id: ChatId) -> StoreResult<Option<AuthState>>;

    /// A user's stored record. Users with no history get the default record,
    /// not an error.
    async fn user_auth_state(&self, user_id: UserId) -> StoreResult<AuthState>;

    /// Open (or rebind) a pending authorization request for a user.
    async fn add_auth_request(&self, user_id: UserId, chat_id: ChatId) -> StoreResult<()>;

    /// Clear all authorization state for a user, pending or provided.
    async fn auth_cancel(&self, user_id: UserId) -> StoreResult<()>;

    /// Store one collected credential field on the user's record.
    async fn store_credential(
        &self,
        user_id: UserId,
        field: CredentialField,
        value: String,
    ) -> StoreResult<()>;

    /// Mark a user's record provided and publish its credentials to the chat
    /// that opened the request.
    async fn mark_provided(&self, user_id: UserId) -> StoreResult<()>;

    /// The user's open return-of-deposit draft, if any.
    async fn return_deposit_draft(&self, user_id: UserId)
        -> StoreResult<Option<ReturnDepositDraft>>;

    /// Replace the user's return-of-deposit draft.
    async fn save_return_deposit_draft(
        &self,
        user_id: UserId,
        draft: ReturnDepositDraft,
    ) -> StoreResult<()>;

    /// Drop the user's return-of-deposit draft.
    async fn clear_return_deposit_draft(&self, user_id: UserId) -> StoreResult<()>;
}
