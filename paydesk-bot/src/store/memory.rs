//! In-memory store implementation.
//!
//! Thread-safe and cheap to clone; suitable for tests and single-process
//! deployments. Durable deployments put a database behind the [`AuthStore`]
//! trait instead.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{
    AuthState, AuthStatus, AuthStore, ChatId, CredentialField, ReturnDepositDraft, StoreError,
    StoreResult, UserId,
};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, AuthState>,
    chats: HashMap<ChatId, AuthState>,
    drafts: HashMap<UserId, ReturnDepositDraft>,
}

/// In-memory [`AuthStore`].
///
/// Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAuthStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("auth store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("auth store lock poisoned".into()))
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn chat_auth_state(&self, chat_id: ChatId) -> StoreResult<Option<AuthState>> {
        Ok(self.read()?.chats.get(&chat_id).cloned())
    }

    async fn user_auth_state(&self, user_id: UserId) -> StoreResult<AuthState> {
        Ok(self.read()?.users.get(&user_id).cloned().unwrap_or_default())
    }

    async fn add_auth_request(&self, user_id: UserId, chat_id: ChatId) -> StoreResult<()> {
        let mut inner = self.write()?;
        // Upsert by user id: a repeated request rebinds the chat and keeps
        // any credentials already collected.
        let state = inner.users.entry(user_id).or_default();
        state.status = AuthStatus::PendingRequest;
        state.chat_id = Some(chat_id);
        Ok(())
    }

    async fn auth_cancel(&self, user_id: UserId) -> StoreResult<()> {
        self.write()?.users.remove(&user_id);
        Ok(())
    }

    async fn store_credential(
        &self,
        user_id: UserId,
        field: CredentialField,
        value: String,
    ) -> StoreResult<()> {
        let mut inner = self.write()?;
        let state = inner.users.entry(user_id).or_default();
        match field {
            CredentialField::ApiKey => state.api_key = Some(value),
            CredentialField::ApiPassphrase => state.api_passphrase = Some(value),
            CredentialField::ApiSecret => state.api_secret = Some(value),
        }
        Ok(())
    }

    async fn mark_provided(&self, user_id: UserId) -> StoreResult<()> {
        let mut inner = self.write()?;
        let state = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::Corrupt(format!("no auth record for user {user_id}")))?;
        state.status = AuthStatus::Provided;
        let published = state.clone();
        if let Some(chat_id) = published.chat_id {
            inner.chats.insert(chat_id, published);
        }
        Ok(())
    }

    async fn return_deposit_draft(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<ReturnDepositDraft>> {
        Ok(self.read()?.drafts.get(&user_id).cloned())
    }

    async fn save_return_deposit_draft(
        &self,
        user_id: UserId,
        draft: ReturnDepositDraft,
    ) -> StoreResult<()> {
        self.write()?.drafts.insert(user_id, draft);
        Ok(())
    }

    async fn clear_return_deposit_draft(&self, user_id: UserId) -> StoreResult<()> {
        self.write()?.drafts.remove(&user_id);
        Ok(())
    }
}
