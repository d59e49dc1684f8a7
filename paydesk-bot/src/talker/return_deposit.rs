//! The return-of-deposit field collection flow.
//!
//! Inapplicable until a draft is opened for the user (see
//! [`crate::Commander::return_deposit_start`]); then collects order id,
//! deposit id, destination address, and currency, one answer each. Once the
//! draft is complete the flow goes quiet and the transport layer takes the
//! values with [`ReturnDepositTalker::finish`] to place the actual gateway
//! call.

use async_trait::async_trait;

use super::{Talker, TalkerKind};
use crate::store::{AuthStore, ReturnDepositDraft, UserId};
use crate::{BotError, Result};

enum DraftField {
    OrderId,
    DepositId,
    ReturnAddress,
    Currency,
}

/// Talker collecting a return-of-deposit request.
pub struct ReturnDepositTalker<'a> {
    store: &'a dyn AuthStore,
    user_id: UserId,
}

impl<'a> ReturnDepositTalker<'a> {
    /// Bind the flow to `(store, user_id)`. No side effects.
    pub fn new(store: &'a dyn AuthStore, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    async fn open_draft(&self) -> Result<Option<ReturnDepositDraft>> {
        Ok(self.store.return_deposit_draft(self.user_id).await?)
    }

    fn missing_field(draft: &ReturnDepositDraft) -> Option<DraftField> {
        if draft.order_id.is_none() {
            Some(DraftField::OrderId)
        } else if draft.deposit_id.is_none() {
            Some(DraftField::DepositId)
        } else if draft.return_address.is_none() {
            Some(DraftField::ReturnAddress)
        } else if draft.currency.is_none() {
            Some(DraftField::Currency)
        } else {
            None
        }
    }

    /// Take the completed draft and clear it from the store.
    ///
    /// Errors with [`BotError::FlowIncomplete`] while fields are still
    /// missing, and with [`BotError::NothingPending`] when no draft is open.
    pub async fn finish(&self) -> Result<ReturnDepositDraft> {
        let Some(draft) = self.open_draft().await? else {
            return Err(BotError::NothingPending(TalkerKind::ReturnDeposit));
        };
        if !draft.is_complete() {
            return Err(BotError::FlowIncomplete(TalkerKind::ReturnDeposit));
        }
        self.store.clear_return_deposit_draft(self.user_id).await?;
        Ok(draft)
    }
}

#[async_trait]
impl Talker for ReturnDepositTalker<'_> {
    async fn next_question(&self) -> Result<Option<String>> {
        let Some(draft) = self.open_draft().await? else {
            return Ok(None);
        };
        Ok(Self::missing_field(&draft).map(|field| {
            match field {
                DraftField::OrderId => "Which order is the deposit on? Send the order id.",
                DraftField::DepositId => "Send the deposit id to return.",
                DraftField::ReturnAddress => "Send the destination address for the returned funds.",
                DraftField::Currency => "Send the currency code of the deposit (for example BTC).",
            }
            .to_string()
        }))
    }

    async fn accept_answer(&self, answer: &str) -> Result<()> {
        let Some(mut draft) = self.open_draft().await? else {
            return Err(BotError::NothingPending(TalkerKind::ReturnDeposit));
        };
        let Some(field) = Self::missing_field(&draft) else {
            return Err(BotError::NothingPending(TalkerKind::ReturnDeposit));
        };

        let value = Some(answer.trim().to_string());
        match field {
            DraftField::OrderId => draft.order_id = value,
            DraftField::DepositId => draft.deposit_id = value,
            DraftField::ReturnAddress => draft.return_address = value,
            DraftField::Currency => draft.currency = value,
        }
        self.store
            .save_return_deposit_draft(self.user_id, draft)
            .await?;
        Ok(())
    }

    fn kind(&self) -> TalkerKind {
        TalkerKind::ReturnDeposit
    }
}
