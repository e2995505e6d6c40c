use crate::{
    config::KeynuaConfig,
    error::{GatewayError, UpstreamError},
    models::{ApiResponse, Contract, ContractRequest, UpstreamPayload},
    services::normalizer::build_payload,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

pub const CONTEXT: &str = "Keynua API";

pub const CREATED_MESSAGE: &str = "Contract created successfully";
pub const FOUND_MESSAGE: &str = "Contract found successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Error creating contract in Keynua";
pub const FIND_FAILED_MESSAGE: &str = "Error finding contract in Keynua";

/// Contract operations exposed to the HTTP layer.
#[async_trait]
pub trait ContractService: Send + Sync {
    async fn create(&self, request: &ContractRequest)
        -> Result<ApiResponse<Contract>, GatewayError>;

    async fn fetch_by_id(&self, id: &str) -> Result<ApiResponse<Contract>, GatewayError>;
}

/// Client for the Keynua contracts endpoint.
///
/// Holds only the configuration captured at construction, so a single
/// instance can be shared across tasks.
pub struct ContractGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ContractGateway {
    pub fn new(config: &KeynuaConfig) -> anyhow::Result<Self> {
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .context("API_KEY_KEYNUA is not a valid header value")?;
        api_key.set_sensitive(true);
        let mut api_token = HeaderValue::from_str(&config.api_token)
            .context("API_TOKEN_KEYNUA is not a valid header value")?;
        api_token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);
        headers.insert(AUTHORIZATION, api_token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build Keynua HTTP client")?;

        tracing::info!("Keynua gateway configured for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn put_contract(&self, payload: &UpstreamPayload) -> Result<Contract, UpstreamError> {
        let body = serde_json::to_vec(payload).context("Failed to serialize contract payload")?;

        tracing::debug!(
            url = %self.base_url,
            documents = payload.documents.len(),
            users = payload.users.len(),
            "PUT contract to Keynua"
        );

        self.execute(self.client.put(&self.base_url).body(body)).await
    }

    async fn get_contract(&self, id: &str) -> Result<Contract, UpstreamError> {
        let url = format!("{}/{}", self.base_url, id);
        tracing::debug!(url = %url, "GET contract from Keynua");

        self.execute(self.client.get(url)).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Contract, UpstreamError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Transport {
                status: Some(status.as_u16()),
                message: format!("Request failed with status code {}", status.as_u16()),
                body: parse_body(&bytes),
                source: None,
            });
        }

        let contract: Contract = serde_json::from_slice(&bytes)
            .context("Keynua response is not a valid contract")?;
        Ok(contract)
    }
}

#[async_trait]
impl ContractService for ContractGateway {
    async fn create(
        &self,
        request: &ContractRequest,
    ) -> Result<ApiResponse<Contract>, GatewayError> {
        let payload = build_payload(request);

        let contract = self
            .put_contract(&payload)
            .await
            .map_err(|err| translate_failure(err, CREATE_FAILED_MESSAGE))?;

        tracing::info!(contract_id = %contract.id, "Contract created in Keynua");

        Ok(ApiResponse::new(contract, CREATED_MESSAGE, 201))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<ApiResponse<Contract>, GatewayError> {
        let contract = self
            .get_contract(id)
            .await
            .map_err(|err| translate_failure(err, FIND_FAILED_MESSAGE))?;

        tracing::info!(
            contract_id = %contract.id,
            status = %contract.status,
            terminal = contract.lifecycle().is_some_and(|s| s.is_terminal()),
            "Contract found in Keynua"
        );

        Ok(ApiResponse::new(contract, FOUND_MESSAGE, 200))
    }
}

/// Logs the upstream failure and folds it into the opaque [`GatewayError`].
fn translate_failure(err: UpstreamError, message: &'static str) -> GatewayError {
    match &err {
        UpstreamError::Transport {
            status,
            message: reason,
            body,
            ..
        } => {
            tracing::error!(
                context = CONTEXT,
                status = ?status,
                message = %reason,
                body = ?body
            );
        }
        UpstreamError::Unexpected(cause) => {
            tracing::error!(context = CONTEXT, error = ?cause, "Unexpected error in {}", CONTEXT);
        }
    }

    GatewayError::new(message, err)
}

fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}
