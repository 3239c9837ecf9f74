//! Registry tag listing (`GET /v2/<repository>/tags/list`).

use please_core::config::RegistryConfig;
use please_core::error::{PleaseError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;

use super::reference::ImageReference;

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Fetch every tag of `reference`. A `null` tag list yields an empty vector.
///
/// The bearer token is attached only when non-empty.
pub(crate) async fn list_tags(
    http: &reqwest::Client,
    config: &RegistryConfig,
    reference: &ImageReference,
    token: &str,
) -> Result<Vec<String>> {
    let url = format!(
        "{}://{}/v2/{}/tags/list",
        config.scheme, reference.registry, reference.repository
    );
    let registry_error = |message: String| PleaseError::RegistryError {
        registry: reference.registry.clone(),
        message,
    };

    tracing::debug!(url = %url, authenticated = !token.is_empty(), "Listing registry tags");

    let mut request = http.get(&url);
    if !token.is_empty() {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = request
        .send()
        .await
        .map_err(|e| registry_error(format!("tags request failed: {}", e)))?;

    if response.status() != StatusCode::OK {
        return Err(registry_error(format!(
            "tags request failed: {}",
            response.status().as_u16()
        )));
    }

    let body: TagsResponse = response
        .json()
        .await
        .map_err(|e| registry_error(format!("invalid tags response: {}", e)))?;

    let tags = body.tags.unwrap_or_default();
    tracing::debug!(repository = %reference.repository, count = tags.len(), "Received tags");
    Ok(tags)
}
