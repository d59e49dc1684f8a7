//! The orchestration layer behind one chat session.

use paydesk_gateway::{ApiCredentials, ApiV2Client, ApiV3Client, ReturnDeposit};

use crate::config::BotConfig;
use crate::order::BotOrder;
use crate::store::{AuthStore, ChatId, ReturnDepositDraft, UserId};
use crate::talker::{ActiveTalker, AuthTalker, Talker, TalkerKind};
use crate::{BotError, Result};

/// Decision layer for one chat session.
///
/// Binds the chat's stored credentials at construction and exposes the
/// operations the transport layer routes chat commands to. Credentials are
/// immutable for the Commander's lifetime; handling the next chat event means
/// constructing the next Commander.
///
/// The store reference is borrowed: the store outlives every Commander and
/// carries all durable state, so Commanders stay cheap to build and safe to
/// discard.
pub struct Commander<'a> {
    store: &'a dyn AuthStore,
    talkers: Vec<TalkerKind>,
    api_v2: ApiV2Client,
    api_v3: ApiV3Client,
}

impl<'a> Commander<'a> {
    /// Bind a Commander to a chat session.
    ///
    /// Reads the chat's stored authorization state and builds one gateway
    /// client per protocol version from it, each field defaulting to the
    /// empty string when unset. Missing credentials are not an error: the
    /// session runs unauthenticated and gateway calls surface the rejection.
    /// Construction fails only on store failure or structurally invalid
    /// configuration, and performs no network calls.
    pub async fn bind(
        store: &'a dyn AuthStore,
        config: &BotConfig,
        chat_id: ChatId,
    ) -> Result<Commander<'a>> {
        let credentials = match store.chat_auth_state(chat_id).await? {
            Some(state) => ApiCredentials::new(
                state.api_key.unwrap_or_default(),
                state.api_passphrase.unwrap_or_default(),
                state.api_secret.unwrap_or_default(),
            ),
            None => ApiCredentials::empty(),
        };

        let api_v2 = ApiV2Client::new(credentials.clone(), config.v2_gateway_config())
            .map_err(|e| BotError::Configuration(e.to_string()))?;
        let api_v3 = ApiV3Client::new(credentials, config.v3_gateway_config())
            .map_err(|e| BotError::Configuration(e.to_string()))?;

        Ok(Self {
            store,
            talkers: config.talkers.clone(),
            api_v2,
            api_v3,
        })
    }

    /// Release the gateway clients.
    ///
    /// Consuming the Commander drops both clients and with them their
    /// connection pools; dropping without calling this gives the same
    /// guarantee on every exit path, including unwinding. The method exists
    /// so call sites can mark the release point explicitly.
    pub fn close(self) {}

    // ========================================================================
    // Order and deposit operations
    // ========================================================================

    /// Resolve an order from an identifier of ambiguous namespace.
    ///
    /// Chat input gives no signal whether the operator pasted a
    /// gateway-assigned or a client-assigned order id. Gateway ids are the
    /// common case, so that lookup goes first; only a not-found answer (and
    /// no other failure) retries the same string against the client-id
    /// namespace. A second not-found, and every other failure kind,
    /// propagates untouched.
    #[tracing::instrument(skip(self))]
    pub async fn order(&self, order_identifier: &str) -> Result<BotOrder> {
        match self.api_v2.order_fetch(order_identifier, true).await {
            Ok(order) => Ok(BotOrder::from(order)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(order_identifier, "not a gateway id, retrying as client id");
                let order = self
                    .api_v2
                    .order_fetch_by_client_id(order_identifier, true)
                    .await?;
                Ok(BotOrder::from(order))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Order ids that received deposits on an address. Unambiguous; straight
    /// pass-through to the gateway.
    pub async fn address(&self, address: &str) -> Result<Vec<String>> {
        Ok(self.api_v2.order_fetch_by_address(address, true).await?)
    }

    /// Order ids associated with a transaction id. Unambiguous; straight
    /// pass-through to the gateway.
    pub async fn transaction(&self, order_tx: &str) -> Result<Vec<String>> {
        Ok(self.api_v2.order_fetch_by_tx(order_tx, true).await?)
    }

    /// Create a return-of-deposit request.
    ///
    /// The four values pass through unvalidated; the gateway owns
    /// validation. The tag and unit count are fixed by this layer: no tag,
    /// one unit, meaning the whole deposit goes back. Letting operators vary
    /// them is a known limitation, not an accident.
    #[tracing::instrument(skip(self))]
    pub async fn return_deposit(
        &self,
        order_id: &str,
        deposit_id: &str,
        return_address: &str,
        currency: &str,
    ) -> Result<ReturnDeposit> {
        Ok(self
            .api_v3
            .create_return_deposit(order_id, deposit_id, return_address, currency, "", "1")
            .await?)
    }

    // ========================================================================
    // Authorization lifecycle
    // ========================================================================

    /// Open a pending authorization request for a user, bound to the chat
    /// that asked. Repeating the call rebinds the same record; the store owns
    /// the merge policy.
    pub async fn auth_start(&self, user_id: UserId, chat_id: ChatId) -> Result<()> {
        Ok(self.store.add_auth_request(user_id, chat_id).await?)
    }

    /// Clear a user's authorization state, pending or provided.
    pub async fn auth_cancel(&self, user_id: UserId) -> Result<()> {
        Ok(self.store.auth_cancel(user_id).await?)
    }

    /// The user's stored API key, or `None` when no key is on record.
    pub async fn auth_mykey(&self, user_id: UserId) -> Result<Option<String>> {
        let state = self.store.user_auth_state(user_id).await?;
        Ok(state.api_key)
    }

    // ========================================================================
    // Talker dispatch
    // ========================================================================

    /// The first configured Talker variant with a pending question for the
    /// user, or `None` when no flow has work. Priority is the configured
    /// order; first match wins.
    pub async fn talker(&self, user_id: UserId) -> Result<Option<ActiveTalker<'a>>> {
        for kind in &self.talkers {
            let talker = self.get_talker(*kind, user_id);
            if talker.next_question().await?.is_some() {
                tracing::debug!(user_id, kind = %kind, "dispatching pending talker");
                return Ok(Some(talker));
            }
        }
        Ok(None)
    }

    /// Construct a named variant unconditionally, bypassing the
    /// pending-question filter. For callers that already know which flow they
    /// are resuming.
    pub fn get_talker(&self, kind: TalkerKind, user_id: UserId) -> ActiveTalker<'a> {
        ActiveTalker::build(kind, self.store, user_id)
    }

    /// The authorization flow for a user, directly.
    pub fn auth_talker(&self, user_id: UserId) -> AuthTalker<'a> {
        AuthTalker::new(self.store, user_id)
    }

    /// Open an empty return-of-deposit draft so the collection flow has
    /// pending work for the user.
    pub async fn return_deposit_start(&self, user_id: UserId) -> Result<()> {
        Ok(self
            .store
            .save_return_deposit_draft(user_id, ReturnDepositDraft::default())
            .await?)
    }
}
