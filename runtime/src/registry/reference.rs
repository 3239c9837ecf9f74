//! Image reference splitting for registry API calls.
//!
//! Splits image strings like `ghcr.io/org/tool` into the registry host and
//! repository path used by the tag listing endpoint.

/// Docker Hub's registry API host.
pub(crate) const DOCKER_HUB_REGISTRY: &str = "registry-1.docker.io";

/// Registry host and repository path of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImageReference {
    /// Registry hostname (e.g., "ghcr.io", "registry-1.docker.io")
    pub registry: String,
    /// Repository path (e.g., "library/nginx", "org/tool")
    pub repository: String,
}

impl ImageReference {
    /// Classify an image string. Any input is accepted.
    ///
    /// - `nginx` → registry-1.docker.io, library/nginx
    /// - `user/repo` → registry-1.docker.io, user/repo
    /// - `ghcr.io/org/tool` → ghcr.io, org/tool
    /// - `docker.io/org/tool` → registry-1.docker.io, org/tool
    pub(crate) fn parse(image: &str) -> Self {
        let Some((first, rest)) = image.split_once('/') else {
            return Self {
                registry: DOCKER_HUB_REGISTRY.to_string(),
                repository: format!("library/{}", image),
            };
        };

        // First component is a registry host when it contains a dot or a port
        if first.contains('.') || first.contains(':') {
            let registry = if first == "docker.io" {
                DOCKER_HUB_REGISTRY
            } else {
                first
            };
            return Self {
                registry: registry.to_string(),
                repository: rest.to_string(),
            };
        }

        Self {
            registry: DOCKER_HUB_REGISTRY.to_string(),
            repository: image.to_string(),
        }
    }

    /// Whether the registry belongs to the Docker Hub family.
    pub(crate) fn is_docker_hub(&self) -> bool {
        self.registry.contains("docker.io")
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.registry, self.repository)
    }
}
