//! Support-desk orchestration for a payment-gateway chat bot.
//!
//! A human operator works payment-support cases through a chat interface:
//! looking up orders whatever identifier the customer pasted, listing the
//! orders behind an address or transaction, sending deposits back, and
//! authorizing their chat against the gateway through a short conversational
//! flow.
//!
//! The [`Commander`] is the decision layer behind each chat event. It binds
//! the chat's stored credentials, hides order-identifier ambiguity behind a
//! lookup fallback, and dispatches among the pending conversational flows
//! ([`Talker`] variants). Message transport and command parsing live outside
//! this crate; so does the gateway wire protocol, which
//! [`paydesk_gateway`] wraps.
//!
//! One Commander serves one chat event: construct, use, drop. Credentials are
//! read once at construction and stay fixed for the Commander's lifetime; a
//! chat that authorizes mid-conversation gets its new credentials on the next
//! event.

pub mod commander;
pub mod config;
pub mod order;
pub mod store;
pub mod talker;

pub use commander::Commander;
pub use config::BotConfig;
pub use order::{BotDeposit, BotOrder};
pub use store::{
    AuthState, AuthStatus, AuthStore, ChatId, CredentialField, MemoryAuthStore, ReturnDepositDraft,
    StoreError, UserId,
};
pub use talker::{ActiveTalker, AuthTalker, ReturnDepositTalker, Talker, TalkerKind};

/// Result alias for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

/// Error type for the orchestration core.
///
/// The core handles exactly one failure kind itself: a gateway `NotFound`
/// during order resolution, consumed by the identifier fallback. Everything
/// else propagates to the transport layer, which owns user-facing rendering.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// A gateway call failed.
    #[error(transparent)]
    Gateway(#[from] paydesk_gateway::GatewayError),

    /// The authorization store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The bot configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An answer was supplied to a flow with nothing pending.
    #[error("the {0} flow has no pending question")]
    NothingPending(TalkerKind),

    /// A flow was asked to finish before all its fields were collected.
    #[error("the {0} flow is not complete yet")]
    FlowIncomplete(TalkerKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_not_found_stays_distinguishable_through_wrapping() {
        let err: BotError = paydesk_gateway::GatewayError::not_found("order", "O1").into();
        match err {
            BotError::Gateway(g) => assert!(g.is_not_found()),
            other => panic!("expected gateway error, got {other}"),
        }
    }

    #[test]
    fn flow_errors_name_the_variant() {
        let err = BotError::NothingPending(TalkerKind::Auth);
        assert!(err.to_string().contains("auth"));
    }
}
