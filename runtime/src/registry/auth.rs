//! Anonymous pull tokens for Docker Hub-family registries.

use please_core::config::RegistryConfig;
use please_core::error::{PleaseError, Result};
use reqwest::StatusCode;
use serde::Deserialize;

use super::reference::ImageReference;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Obtain a pull-scope bearer token for `reference`.
///
/// Registries outside the Docker Hub family get an empty token and no
/// request is made.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    config: &RegistryConfig,
    reference: &ImageReference,
) -> Result<String> {
    if !reference.is_docker_hub() {
        return Ok(String::new());
    }

    let scope = format!("repository:{}:pull", reference.repository);
    let auth_error = |message: String| PleaseError::AuthError {
        registry: reference.registry.clone(),
        message,
    };

    tracing::debug!(auth_url = %config.auth_url, scope = %scope, "Requesting registry token");

    let response = http
        .get(&config.auth_url)
        .query(&[("service", config.auth_service.as_str()), ("scope", scope.as_str())])
        .send()
        .await
        .map_err(|e| auth_error(format!("token request failed: {}", e)))?;

    if response.status() != StatusCode::OK {
        return Err(auth_error(format!(
            "auth request failed: {}",
            response.status().as_u16()
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| auth_error(format!("invalid token response: {}", e)))?;

    tracing::debug!(registry = %reference.registry, "Obtained registry token");
    Ok(body.token)
}
