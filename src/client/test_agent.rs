use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let base_url = std::env::var("GATEWAY_URL")
        .unwrap_or_else(|_| "http://localhost:4000".to_string());
    let template_id = std::env::var("KEYNUA_TEMPLATE_ID")
        .unwrap_or_else(|_| "keynua-peru-default".to_string());
    let signer_email = std::env::var("TEST_SIGNER_EMAIL")
        .unwrap_or_else(|_| "signer@example.com".to_string());

    println!("Keynua Gateway Test Agent");
    println!("=========================");
    println!("Server: {}", base_url);
    println!("Template: {}", template_id);
    println!();

    let client = Client::new();

    println!("Step 1: Creating contract...");
    let created = request_json(
        client
            .post(format!("{}/api-v1/contracts/create", base_url))
            .json(&sample_contract(&template_id, &signer_email)),
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&created)?);
    println!();

    let id = created["data"]["id"]
        .as_str()
        .context("Response did not include a contract id")?;

    println!("Step 2: Fetching contract {}...", id);
    let found = request_json(client.get(format!("{}/api-v1/contracts/{}", base_url, id))).await?;
    println!("   [OK] Status: {}", found["data"]["status"]);
    println!("{}", serde_json::to_string_pretty(&found)?);

    Ok(())
}

async fn request_json(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;

    if !status.is_success() {
        bail!("Request failed ({}): {}", status, body);
    }

    println!("   [OK] {} {}", status, body["message"]);
    Ok(body)
}

fn sample_contract(template_id: &str, signer_email: &str) -> Value {
    // One-page blank PDF.
    let pdf = "JVBERi0xLjQKMSAwIG9iago8PC9UeXBlL0NhdGFsb2cvUGFnZXMgMiAwIFI+PgplbmRvYmoKMiAwIG9iago8PC9UeXBlL1BhZ2VzL0tpZHNbMyAwIFJdL0NvdW50IDE+PgplbmRvYmoKMyAwIG9iago8PC9UeXBlL1BhZ2UvUGFyZW50IDIgMCBSL01lZGlhQm94WzAgMCA2MTIgNzkyXT4+CmVuZG9iagp0cmFpbGVyCjw8L1Jvb3QgMSAwIFI+PgolJUVPRgo=";

    json!({
        "title": "Test Agent Contract",
        "description": "Contract created by the gateway test agent",
        "reference": format!("TEST-{}", chrono::Utc::now().format("%Y%m%d%H%M%S")),
        "language": "es",
        "chosenNotificationOptions": ["email"],
        "expirationInHours": 24,
        "templateId": template_id,
        "documents": [{
            "name": "test-agent.pdf",
            "base64": format!("data:application/pdf;base64,{}", pdf)
        }],
        "users": [{
            "name": "Test Signer",
            "email": signer_email,
            "groups": ["signers"]
        }],
        "metadata": { "source": "test-agent" }
    })
}
