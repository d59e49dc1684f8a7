//! Protocol v2 client: the order lookup surface.
//!
//! v2 resolves orders four ways: by gateway-assigned order id, by the
//! merchant's client-assigned order id, by deposit address, and by
//! transaction id. Address and transaction lookups return lists of order
//! ids; the id lookups return the full order record.
//!
//! Every lookup takes a `use_merchant_family` flag. When set, the gateway
//! searches the merchant's full order namespace instead of the single
//! sub-account the credentials are bound to. The support desk always wants
//! the family-wide view.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::http::{build_client, map_reqwest_error, map_status_error};
use crate::sign::{
    current_timestamp, sign_request, HEADER_KEY, HEADER_PASSPHRASE, HEADER_SIGN, HEADER_TIMESTAMP,
};
use crate::{ApiCredentials, GatewayConfig, GatewayError, Result};

/// Client for the v2 order API.
pub struct ApiV2Client {
    credentials: ApiCredentials,
    config: GatewayConfig,
    client: reqwest::Client,
}

impl ApiV2Client {
    /// Build a v2 client.
    ///
    /// Empty credentials are accepted; requests are then signed with empty
    /// material and the gateway answers with an authentication failure.
    /// Construction fails only on structurally invalid configuration.
    pub fn new(credentials: ApiCredentials, config: GatewayConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            credentials,
            config,
            client,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn signed_headers(&self, method: &str, path: &str, body: &str) -> [(&'static str, String); 4] {
        let timestamp = current_timestamp();
        let signature = sign_request(&self.credentials.secret, &timestamp, method, path, body);
        [
            (HEADER_KEY, self.credentials.key.clone()),
            (HEADER_SIGN, signature),
            (HEADER_TIMESTAMP, timestamp),
            (HEADER_PASSPHRASE, self.credentials.passphrase.clone()),
        ]
    }

    /// Signed GET, mapping 404 to `NotFound` for the given resource/identifier.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        use_merchant_family: bool,
        resource: &'static str,
        identifier: &str,
    ) -> Result<T> {
        let url = self.url(path);
        let mut request = self
            .client
            .get(&url)
            .query(&[("merchant_family", use_merchant_family.to_string())]);
        for (name, value) in self.signed_headers("GET", path, "") {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            map_reqwest_error(e, &self.config.base_url, self.config.timeout_secs, "v2 GET")
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &body, resource, identifier));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Serialization(format!("failed to parse v2 response: {e}")))
    }

    /// Fetch an order by its gateway-assigned id.
    #[tracing::instrument(skip(self))]
    pub async fn order_fetch(&self, order_id: &str, use_merchant_family: bool) -> Result<Order> {
        self.get(
            &format!("/orders/{order_id}"),
            use_merchant_family,
            "order",
            order_id,
        )
        .await
    }

    /// Fetch an order by the merchant's client-assigned id.
    #[tracing::instrument(skip(self))]
    pub async fn order_fetch_by_client_id(
        &self,
        client_order_id: &str,
        use_merchant_family: bool,
    ) -> Result<Order> {
        self.get(
            &format!("/orders/by-client-id/{client_order_id}"),
            use_merchant_family,
            "client order",
            client_order_id,
        )
        .await
    }

    /// Order ids that received deposits on the given address, newest first.
    ///
    /// An address nothing was paid to yields an empty list, not an error.
    #[tracing::instrument(skip(self))]
    pub async fn order_fetch_by_address(
        &self,
        address: &str,
        use_merchant_family: bool,
    ) -> Result<Vec<String>> {
        let page: OrderIdPage = self
            .get(
                &format!("/orders/by-address/{address}"),
                use_merchant_family,
                "address",
                address,
            )
            .await?;
        Ok(page.order_ids)
    }

    /// Order ids associated with the given transaction id, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn order_fetch_by_tx(
        &self,
        order_tx: &str,
        use_merchant_family: bool,
    ) -> Result<Vec<String>> {
        let page: OrderIdPage = self
            .get(
                &format!("/orders/by-tx/{order_tx}"),
                use_merchant_family,
                "transaction",
                order_tx,
            )
            .await?;
        Ok(page.order_ids)
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// An order record as the v2 API returns it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    /// Gateway-assigned order id.
    pub order_id: String,
    /// Merchant's client-assigned order id, if one was supplied at creation.
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Order lifecycle status (e.g. "pending", "completed", "expired").
    pub status: String,
    /// Payment status within the lifecycle (e.g. "unpaid", "paid", "overpaid").
    #[serde(default)]
    pub paid_status: Option<String>,
    /// Currency the merchant charged in.
    #[serde(default)]
    pub currency_from: Option<String>,
    /// Currency the payer settled in.
    #[serde(default)]
    pub currency_to: Option<String>,
    /// Amount charged, as the gateway's decimal string.
    #[serde(default)]
    pub amount_from: Option<String>,
    /// Amount settled, as the gateway's decimal string.
    #[serde(default)]
    pub amount_to: Option<String>,
    /// Deposits received against this order.
    #[serde(default)]
    pub deposits: Vec<Deposit>,
    /// Creation time as the gateway formats it.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One deposit received against an order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deposit {
    /// Gateway-assigned deposit id.
    pub deposit_id: String,
    /// Address the deposit arrived on.
    #[serde(default)]
    pub address: Option<String>,
    /// On-chain transaction id.
    #[serde(default)]
    pub tx_id: Option<String>,
    /// Deposited amount, as the gateway's decimal string.
    #[serde(default)]
    pub amount: Option<String>,
    /// Whether the deposit has the confirmations the gateway requires.
    #[serde(default)]
    pub confirmed: bool,
}

/// Wire shape of the list-of-ids lookups.
#[derive(Debug, Deserialize)]
struct OrderIdPage {
    #[serde(default)]
    order_ids: Vec<String>,
}
