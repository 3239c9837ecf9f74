//! Version discovery client.
//!
//! Resolves the available versions of a package by listing its image tags
//! on the registry, filtering them with the manifest's rules and ordering
//! them newest first.

use std::time::Duration;

use please_core::config::RegistryConfig;
use please_core::error::{PleaseError, Result};
use please_core::manifest::PackageManifest;

use super::auth::request_token;
use super::reference::ImageReference;
use super::tags::list_tags;
use super::version::filter_versions;

/// Lists available package versions from container registries.
///
/// Holds only an HTTP transport and its settings, so one instance can serve
/// many packages concurrently.
#[derive(Debug, Clone)]
pub struct RegistryVersionClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryVersionClient {
    /// Create a client with its own HTTP transport.
    ///
    /// `config.timeout_secs` bounds every individual request.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("please/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PleaseError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(http, config))
    }

    /// Create a client on top of an existing HTTP transport.
    pub fn with_http_client(http: reqwest::Client, config: RegistryConfig) -> Self {
        Self { http, config }
    }

    /// List the versions of `manifest` available on its registry, newest first.
    ///
    /// No retries are made; the first failing request is returned.
    pub async fn list_versions(&self, manifest: &PackageManifest) -> Result<Vec<String>> {
        let discovery = manifest.version_discovery.as_ref().ok_or_else(|| {
            PleaseError::ConfigError("version discovery configuration is required".to_string())
        })?;

        let reference = ImageReference::parse(&manifest.image);
        tracing::debug!(
            package = %manifest.name,
            registry = %reference.registry,
            repository = %reference.repository,
            "Discovering versions"
        );

        let token = request_token(&self.http, &self.config, &reference).await?;
        let tags = list_tags(&self.http, &self.config, &reference, &token).await?;
        let total = tags.len();
        let versions = filter_versions(tags, &discovery.filter)?;

        tracing::debug!(
            package = %manifest.name,
            tags = total,
            versions = versions.len(),
            "Version discovery complete"
        );
        Ok(versions)
    }

    /// [`list_versions`](Self::list_versions) bounded by `deadline`.
    pub async fn list_versions_within(
        &self,
        manifest: &PackageManifest,
        deadline: Duration,
    ) -> Result<Vec<String>> {
        tokio::time::timeout(deadline, self.list_versions(manifest))
            .await
            .map_err(|_| {
                PleaseError::TimeoutError(format!(
                    "version discovery for '{}' exceeded {:?}",
                    manifest.name, deadline
                ))
            })?
    }

    /// Versions of `manifest`, preferring its static list.
    ///
    /// A non-empty `versions` list is returned as declared without touching
    /// the network. Otherwise the registry is queried. A manifest with
    /// neither is a configuration error.
    pub async fn resolve_versions(&self, manifest: &PackageManifest) -> Result<Vec<String>> {
        if let Some(versions) = manifest.static_versions() {
            return Ok(versions.to_vec());
        }
        if manifest.version_discovery.is_none() {
            return Err(PleaseError::ConfigError(format!(
                "package '{}' declares neither versions nor version discovery",
                manifest.name
            )));
        }
        self.list_versions(manifest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_server::{http_client, Route, TestServer};
    use please_core::manifest::{VersionDiscovery, VersionFilter};

    fn client_for(server: &TestServer) -> RegistryVersionClient {
        RegistryVersionClient::with_http_client(
            http_client(),
            RegistryConfig {
                scheme: "http".to_string(),
                auth_url: format!("http://{}/token", server.host()),
                ..Default::default()
            },
        )
    }

    fn discovered(name: &str, image: &str, pattern: &str, exclude: &[&str]) -> PackageManifest {
        PackageManifest {
            name: name.to_string(),
            image: image.to_string(),
            version_discovery: Some(VersionDiscovery {
                filter: VersionFilter {
                    pattern: pattern.to_string(),
                    exclude: exclude.iter().map(|s| s.to_string()).collect(),
                },
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_versions_private_registry() {
        let server = TestServer::start(vec![Route::new(
            "/v2/team/tool/tags/list",
            200,
            r#"{"name": "team/tool", "tags": ["1.2.0", "latest", "1.10.0", "1.9.3", "nightly"]}"#,
        )])
        .await;
        let client = client_for(&server);
        let manifest = discovered(
            "tool",
            &format!("{}/team/tool", server.host()),
            r"^[0-9]+\.[0-9]+\.[0-9]+$",
            &["latest"],
        );

        let versions = client.list_versions(&manifest).await.unwrap();
        assert_eq!(versions, vec!["1.10.0", "1.9.3", "1.2.0"]);

        // A non-Docker Hub registry gets no token request
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].contains("authorization:"));
    }

    #[tokio::test]
    async fn test_list_versions_docker_hub_sends_bearer_token() {
        let server = TestServer::start(vec![
            Route::new("/token", 200, r#"{"token": "hub-token"}"#),
            Route::new(
                "/v2/team/tool/tags/list",
                200,
                r#"{"tags": ["2.0.1", "edge", "2.1.0"]}"#,
            ),
        ])
        .await;
        // Any registry host containing docker.io goes through the token flow
        let http = reqwest::Client::builder()
            .no_proxy()
            .resolve("docker.io.test", server.addr())
            .build()
            .unwrap();
        let client = RegistryVersionClient::with_http_client(
            http,
            RegistryConfig {
                scheme: "http".to_string(),
                auth_url: format!("http://{}/token", server.host()),
                ..Default::default()
            },
        );
        let manifest = discovered(
            "tool",
            &format!("docker.io.test:{}/team/tool", server.addr().port()),
            r"^[0-9.]+$",
            &[],
        );

        let versions = client.list_versions(&manifest).await.unwrap();
        assert_eq!(versions, vec!["2.1.0", "2.0.1"]);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("get /token?"));
        assert!(requests[0].contains("scope=repository%3ateam%2ftool%3apull"));
        assert!(!requests[0].contains("authorization:"));
        assert!(requests[1].starts_with("get /v2/team/tool/tags/list "));
        assert!(requests[1].contains("authorization: bearer hub-token"));
    }

    #[tokio::test]
    async fn test_list_versions_missing_discovery() {
        let server = TestServer::start(vec![]).await;
        let client = client_for(&server);
        let manifest = PackageManifest {
            name: "jq".to_string(),
            image: "jq".to_string(),
            ..Default::default()
        };

        let err = client.list_versions(&manifest).await.unwrap_err();
        match err {
            PleaseError::ConfigError(msg) => {
                assert!(msg.contains("version discovery configuration is required"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_versions_registry_error() {
        let server = TestServer::start(vec![Route::new("/v2/", 404, "{}")]).await;
        let client = client_for(&server);
        let manifest = discovered("tool", &format!("{}/team/tool", server.host()), "", &[]);

        let err = client.list_versions(&manifest).await.unwrap_err();
        assert!(matches!(err, PleaseError::RegistryError { .. }));
    }

    #[tokio::test]
    async fn test_list_versions_bad_pattern() {
        let server = TestServer::start(vec![Route::new(
            "/v2/team/tool/tags/list",
            200,
            r#"{"tags": ["1.0"]}"#,
        )])
        .await;
        let client = client_for(&server);
        let manifest = discovered("tool", &format!("{}/team/tool", server.host()), "([0-9", &[]);

        let err = client.list_versions(&manifest).await.unwrap_err();
        assert!(matches!(err, PleaseError::PatternError { .. }));
    }

    #[tokio::test]
    async fn test_list_versions_within_deadline_elapsed() {
        let server = TestServer::start(vec![Route::new(
            "/v2/team/tool/tags/list",
            200,
            r#"{"tags": ["1.0"]}"#,
        )
        .delayed(Duration::from_secs(5))])
        .await;
        let client = client_for(&server);
        let manifest = discovered("tool", &format!("{}/team/tool", server.host()), "", &[]);

        let err = client
            .list_versions_within(&manifest, Duration::from_millis(100))
            .await
            .unwrap_err();
        match err {
            PleaseError::TimeoutError(msg) => assert!(msg.contains("tool")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_versions_within_deadline_met() {
        let server = TestServer::start(vec![Route::new(
            "/v2/team/tool/tags/list",
            200,
            r#"{"tags": ["v1.0", "v2.0"]}"#,
        )])
        .await;
        let client = client_for(&server);
        let manifest = discovered("tool", &format!("{}/team/tool", server.host()), "", &[]);

        let versions = client
            .list_versions_within(&manifest, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(versions, vec!["v2.0", "v1.0"]);
    }

    #[tokio::test]
    async fn test_resolve_versions_static_list_wins() {
        let server = TestServer::start(vec![]).await;
        let client = client_for(&server);
        let mut manifest = discovered("tool", &format!("{}/team/tool", server.host()), "", &[]);
        manifest.versions = Some(vec!["3.0".to_string(), "2.0".to_string()]);

        let versions = client.resolve_versions(&manifest).await.unwrap();
        assert_eq!(versions, vec!["3.0", "2.0"]);
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_versions_empty_static_list_discovers() {
        let server = TestServer::start(vec![Route::new(
            "/v2/team/tool/tags/list",
            200,
            r#"{"tags": ["0.1", "0.2"]}"#,
        )])
        .await;
        let client = client_for(&server);
        let mut manifest = discovered("tool", &format!("{}/team/tool", server.host()), "", &[]);
        manifest.versions = Some(Vec::new());

        let versions = client.resolve_versions(&manifest).await.unwrap();
        assert_eq!(versions, vec!["0.2", "0.1"]);
    }

    #[tokio::test]
    async fn test_resolve_versions_neither_source() {
        let server = TestServer::start(vec![]).await;
        let client = client_for(&server);
        let manifest = PackageManifest {
            name: "bare".to_string(),
            ..Default::default()
        };

        let err = client.resolve_versions(&manifest).await.unwrap_err();
        assert!(matches!(err, PleaseError::ConfigError(_)));
    }

    #[test]
    fn test_new_builds_transport() {
        let config = RegistryConfig {
            timeout_secs: 5,
            ..Default::default()
        };
        assert!(RegistryVersionClient::new(config).is_ok());
    }
}
