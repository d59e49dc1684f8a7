//! Protocol v3 client: return-of-deposit creation.
//!
//! v3 is the write side the support desk needs: sending a received deposit
//! back to the payer. Lookups stay on v2; the two clients share credentials
//! and configuration shape.

use serde::{Deserialize, Serialize};

use crate::http::{build_client, map_reqwest_error, map_status_error};
use crate::sign::{
    current_timestamp, sign_request, HEADER_KEY, HEADER_PASSPHRASE, HEADER_SIGN, HEADER_TIMESTAMP,
};
use crate::{ApiCredentials, GatewayConfig, GatewayError, Result};

/// Client for the v3 return-deposit API.
pub struct ApiV3Client {
    credentials: ApiCredentials,
    config: GatewayConfig,
    client: reqwest::Client,
}

impl ApiV3Client {
    /// Build a v3 client. Same construction contract as [`crate::ApiV2Client`].
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

    /// Create a return-of-deposit request.
    ///
    /// `tag` and `amount_units` belong to the gateway protocol: the tag
    /// annotates the outgoing transaction where the destination chain supports
    /// one, and `amount_units` selects how much of the deposit to send back,
    /// in the gateway's unit notation. Validation of all six values is the
    /// gateway's responsibility; invalid input surfaces as a gateway failure.
    #[tracing::instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create_return_deposit(
        &self,
        order_id: &str,
        deposit_id: &str,
        return_address: &str,
        currency: &str,
        tag: &str,
        amount_units: &str,
    ) -> Result<ReturnDeposit> {
        let path = "/return-deposits";
        let body = serde_json::to_string(&CreateReturnDeposit {
            order_id,
            deposit_id,
            return_address,
            currency,
            tag,
            amount_units,
        })?;

        let url = self.url(path);
        let timestamp = current_timestamp();
        let signature = sign_request(&self.credentials.secret, &timestamp, "POST", path, &body);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(HEADER_KEY, &self.credentials.key)
            .header(HEADER_SIGN, signature)
            .header(HEADER_TIMESTAMP, timestamp)
            .header(HEADER_PASSPHRASE, &self.credentials.passphrase)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                map_reqwest_error(
                    e,
                    &self.config.base_url,
                    self.config.timeout_secs,
                    "v3 POST",
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &text, "deposit", deposit_id));
        }

        response
            .json::<ReturnDeposit>()
            .await
            .map_err(|e| GatewayError::Serialization(format!("failed to parse v3 response: {e}")))
    }
}

/// Wire shape of the create request.
#[derive(Debug, Serialize)]
struct CreateReturnDeposit<'a> {
    order_id: &'a str,
    deposit_id: &'a str,
    return_address: &'a str,
    currency: &'a str,
    tag: &'a str,
    amount_units: &'a str,
}

/// A return-of-deposit record as the v3 API returns it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnDeposit {
    /// Gateway-assigned id of the return request.
    pub return_id: String,
    /// Order the deposit belongs to.
    pub order_id: String,
    /// Deposit being returned.
    pub deposit_id: String,
    /// Destination address for the returned funds.
    pub return_address: String,
    /// Currency code of the return.
    pub currency: String,
    /// Lifecycle status of the return (e.g. "created", "sent").
    pub status: String,
    /// Transaction id of the outgoing payment, once sent.
    #[serde(default)]
    pub tx_id: Option<String>,
}
