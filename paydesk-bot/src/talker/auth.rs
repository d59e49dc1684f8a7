//! The authorization credential collection flow.
//!
//! Fires while the bound user has a pending authorization request, asking for
//! the key, passphrase, and secret in that order. When the last field lands
//! the user's record is marked provided and the credentials are published to
//! the chat that opened the request; from then on the flow reports nothing
//! pending.

use async_trait::async_trait;

use super::{Talker, TalkerKind};
use crate::store::{AuthStatus, AuthStore, CredentialField, UserId};
use crate::{BotError, Result};

/// Talker collecting the gateway credential triple.
pub struct AuthTalker<'a> {
    store: &'a dyn AuthStore,
    user_id: UserId,
}

impl<'a> AuthTalker<'a> {
    /// Bind the flow to `(store, user_id)`. No side effects.
    pub fn new(store: &'a dyn AuthStore, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    /// The field the flow is waiting for, or `None` when there is no pending
    /// request or all fields have been collected.
    async fn missing_field(&self) -> Result<Option<CredentialField>> {
        let state = self.store.user_auth_state(self.user_id).await?;
        if state.status != AuthStatus::PendingRequest {
            return Ok(None);
        }
        Ok(if state.api_key.is_none() {
            Some(CredentialField::ApiKey)
        } else if state.api_passphrase.is_none() {
            Some(CredentialField::ApiPassphrase)
        } else if state.api_secret.is_none() {
            Some(CredentialField::ApiSecret)
        } else {
            None
        })
    }
}

#[async_trait]
impl Talker for AuthTalker<'_> {
    async fn next_question(&self) -> Result<Option<String>> {
        Ok(self.missing_field().await?.map(|field| {
            match field {
                CredentialField::ApiKey => "Send the API key for the merchant account.",
                CredentialField::ApiPassphrase => "Now send the API passphrase.",
                CredentialField::ApiSecret => "Finally, send the API secret.",
            }
            .to_string()
        }))
    }

    async fn accept_answer(&self, answer: &str) -> Result<()> {
        let Some(field) = self.missing_field().await? else {
            return Err(BotError::NothingPending(TalkerKind::Auth));
        };

        self.store
            .store_credential(self.user_id, field, answer.trim().to_string())
            .await?;

        // The secret is the last field; completing it closes the request and
        // publishes the triple to the requesting chat.
        if self.missing_field().await?.is_none() {
            self.store.mark_provided(self.user_id).await?;
        }
        Ok(())
    }

    fn kind(&self) -> TalkerKind {
        TalkerKind::Auth
    }
}
