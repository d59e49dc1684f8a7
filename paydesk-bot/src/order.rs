//! Chat-facing projection of gateway order records.

use std::fmt;

use serde::{Deserialize, Serialize};

use paydesk_gateway::{Deposit, Order};

/// The normalized order value the bot presents to operators.
///
/// A flattened, render-ready view of the gateway's order record; the raw
/// record stays inside the gateway crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotOrder {
    /// Gateway-assigned order id.
    pub order_id: String,
    /// Merchant's client-assigned id, when one exists.
    pub client_order_id: Option<String>,
    /// Order lifecycle status.
    pub status: String,
    /// Payment status, when the gateway reports one.
    pub paid_status: Option<String>,
    /// "amount currency" the merchant charged, when reported.
    pub charged: Option<String>,
    /// "amount currency" the payer settled, when reported.
    pub settled: Option<String>,
    /// Deposits received against the order.
    pub deposits: Vec<BotDeposit>,
}

/// One deposit in the chat-facing view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDeposit {
    /// Gateway-assigned deposit id; what return-of-deposit requests key on.
    pub deposit_id: String,
    /// Address the deposit arrived on.
    pub address: Option<String>,
    /// Whether the gateway considers it confirmed.
    pub confirmed: bool,
}

fn amount_pair(amount: Option<String>, currency: Option<String>) -> Option<String> {
    match (amount, currency) {
        (Some(amount), Some(currency)) => Some(format!("{amount} {currency}")),
        (Some(amount), None) => Some(amount),
        _ => None,
    }
}

impl From<Order> for BotOrder {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            client_order_id: order.client_order_id,
            status: order.status,
            paid_status: order.paid_status,
            charged: amount_pair(order.amount_from, order.currency_from),
            settled: amount_pair(order.amount_to, order.currency_to),
            deposits: order.deposits.into_iter().map(BotDeposit::from).collect(),
        }
    }
}

impl From<Deposit> for BotDeposit {
    fn from(deposit: Deposit) -> Self {
        Self {
            deposit_id: deposit.deposit_id,
            address: deposit.address,
            confirmed: deposit.confirmed,
        }
    }
}

impl fmt::Display for BotOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order {} [{}]", self.order_id, self.status)?;
        if let Some(client_id) = &self.client_order_id {
            write!(f, " (client id {client_id})")?;
        }
        if let Some(paid) = &self.paid_status {
            write!(f, ", {paid}")?;
        }
        if let Some(charged) = &self.charged {
            write!(f, "\n  charged: {charged}")?;
        }
        if let Some(settled) = &self.settled {
            write!(f, "\n  settled: {settled}")?;
        }
        for deposit in &self.deposits {
            write!(
                f,
                "\n  deposit {} on {} ({})",
                deposit.deposit_id,
                deposit.address.as_deref().unwrap_or("<no address>"),
                if deposit.confirmed {
                    "confirmed"
                } else {
                    "unconfirmed"
                }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        serde_json::from_value(serde_json::json!({
            "order_id": "ORD-1001",
            "client_order_id": "shop-55",
            "status": "completed",
            "paid_status": "paid",
            "currency_from": "USD",
            "currency_to": "BTC",
            "amount_from": "100.00",
            "amount_to": "0.0025",
            "deposits": [{
                "deposit_id": "DEP-1",
                "address": "bc1qdeposit",
                "confirmed": true
            }]
        }))
        .unwrap()
    }

    #[test]
    fn projection_flattens_amounts() {
        let bot_order = BotOrder::from(sample_order());
        assert_eq!(bot_order.charged.as_deref(), Some("100.00 USD"));
        assert_eq!(bot_order.settled.as_deref(), Some("0.0025 BTC"));
        assert_eq!(bot_order.deposits.len(), 1);
    }

    #[test]
    fn display_names_the_pieces_an_operator_needs() {
        let rendered = BotOrder::from(sample_order()).to_string();
        assert!(rendered.contains("ORD-1001"));
        assert!(rendered.contains("completed"));
        assert!(rendered.contains("shop-55"));
        assert!(rendered.contains("DEP-1"));
        assert!(rendered.contains("confirmed"));
    }

    #[test]
    fn sparse_orders_render_without_optional_sections() {
        let order: Order =
            serde_json::from_str(r#"{"order_id": "O1", "status": "pending"}"#).unwrap();
        let rendered = BotOrder::from(order).to_string();
        assert_eq!(rendered, "Order O1 [pending]");
    }
}
