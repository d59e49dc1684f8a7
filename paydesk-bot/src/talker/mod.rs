//! Conversational flow steps driven entirely by stored state.
//!
//! A Talker is one incremental step of a multi-step flow: asked for its next
//! question it reads the store and answers, handed an operator's reply it
//! writes the store and advances. Instances are constructed fresh per
//! dispatch, bound to one `(store, user)`, and carry no state and no
//! constructor-time side effects of their own. Two Talkers built back to
//! back see exactly the same store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::{AuthStore, UserId};
use crate::Result;

pub mod auth;
pub mod return_deposit;

pub use auth::AuthTalker;
pub use return_deposit::ReturnDepositTalker;

/// The closed set of flow variants, in the tag form configuration uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalkerKind {
    /// Credential collection for gateway authorization.
    Auth,
    /// Field collection for a return-of-deposit request.
    ReturnDeposit,
}

impl TalkerKind {
    /// The tag as it appears in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::ReturnDeposit => "return_deposit",
        }
    }
}

impl fmt::Display for TalkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incremental conversational step.
#[async_trait]
pub trait Talker {
    /// The question to present next, or `None` when this flow has nothing
    /// pending for the bound user.
    async fn next_question(&self) -> Result<Option<String>>;

    /// Consume the operator's answer to the current question and advance the
    /// flow. Errors with [`crate::BotError::NothingPending`] when the flow has
    /// no open question.
    async fn accept_answer(&self, answer: &str) -> Result<()>;

    /// The variant tag of this talker.
    fn kind(&self) -> TalkerKind;
}

/// A dispatched talker in a statically typed holder.
///
/// This is what [`crate::Commander::talker`] hands back: the transport layer
/// can drive it through the [`Talker`] trait without caring which flow it is,
/// or match on the variant when it does care.
pub enum ActiveTalker<'a> {
    /// The authorization flow.
    Auth(AuthTalker<'a>),
    /// The return-of-deposit flow.
    ReturnDeposit(ReturnDepositTalker<'a>),
}

impl<'a> ActiveTalker<'a> {
    /// Construct the named variant bound to `(store, user_id)`.
    pub fn build(kind: TalkerKind, store: &'a dyn AuthStore, user_id: UserId) -> Self {
        match kind {
            TalkerKind::Auth => Self::Auth(AuthTalker::new(store, user_id)),
            TalkerKind::ReturnDeposit => {
                Self::ReturnDeposit(ReturnDepositTalker::new(store, user_id))
            }
        }
    }
}

#[async_trait]
impl Talker for ActiveTalker<'_> {
    async fn next_question(&self) -> Result<Option<String>> {
        match self {
            Self::Auth(t) => t.next_question().await,
            Self::ReturnDeposit(t) => t.next_question().await,
        }
    }

    async fn accept_answer(&self, answer: &str) -> Result<()> {
        match self {
            Self::Auth(t) => t.accept_answer(answer).await,
            Self::ReturnDeposit(t) => t.accept_answer(answer).await,
        }
    }

    fn kind(&self) -> TalkerKind {
        match self {
            Self::Auth(t) => t.kind(),
            Self::ReturnDeposit(t) => t.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_match_config_spelling() {
        assert_eq!(TalkerKind::Auth.as_str(), "auth");
        assert_eq!(TalkerKind::ReturnDeposit.as_str(), "return_deposit");

        let parsed: TalkerKind = serde_json::from_str(r#""return_deposit""#).unwrap();
        assert_eq!(parsed, TalkerKind::ReturnDeposit);
    }

    #[test]
    fn build_produces_the_named_variant() {
        let store = crate::MemoryAuthStore::new();
        let talker = ActiveTalker::build(TalkerKind::Auth, &store, 7);
        assert_eq!(talker.kind(), TalkerKind::Auth);

        let talker = ActiveTalker::build(TalkerKind::ReturnDeposit, &store, 7);
        assert_eq!(talker.kind(), TalkerKind::ReturnDeposit);
    }
}
