//! Create request payloads

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Droplet name used when none is given
pub const DEFAULT_DROPLET_NAME: &str = "my-droplet";
/// Region used when none is given
pub const DEFAULT_REGION: &str = "nyc3";
/// Size slug used when none is given
pub const DEFAULT_SIZE: &str = "s-1vcpu-1gb";
/// Image slug used when none is given
pub const DEFAULT_IMAGE: &str = "ubuntu-20-04-x64";
/// Tag applied when no tags are given
pub const DEFAULT_TAG: &str = "frontend-droplet";

/// User input for a new droplet; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletRequest {
    /// Droplet name
    pub name: Option<String>,
    /// Region slug
    pub region: Option<String>,
    /// Size slug
    pub size: Option<String>,
    /// Image slug
    pub image: Option<String>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DropletRequest {
    /// Create empty request (all defaults)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// With size
    #[inline]
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// With image
    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// With tags from comma-separated input
    #[inline]
    #[must_use]
    pub fn with_tag_list(mut self, input: &str) -> Self {
        self.tags = split_list(input);
        self
    }

    /// Resolve defaults into the wire payload
    #[must_use]
    pub fn into_payload(self) -> DropletPayload {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        let tags = if self.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            self.tags
        };

        DropletPayload {
            name: or_default(self.name, DEFAULT_DROPLET_NAME),
            region: or_default(self.region, DEFAULT_REGION),
            size: or_default(self.size, DEFAULT_SIZE),
            image: or_default(self.image, DEFAULT_IMAGE),
            backups: false,
            ipv6: true,
            monitoring: true,
            tags,
            user_data: None,
        }
    }
}

/// Body of `POST /droplets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletPayload {
    /// Droplet name
    pub name: String,
    /// Region slug
    pub region: String,
    /// Size slug
    pub size: String,
    /// Image slug
    pub image: String,
    /// Automated backups
    pub backups: bool,
    /// IPv6 networking
    pub ipv6: bool,
    /// Monitoring agent
    pub monitoring: bool,
    /// Tags
    pub tags: Vec<String>,
    /// Cloud-init user data, sent as `null` when absent
    pub user_data: Option<String>,
}

/// Body of `POST /domains`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequest {
    /// Domain name
    pub name: String,
    /// Address for the apex A record
    pub ip_address: Ipv4Addr,
}

impl DomainRequest {
    /// Create domain request
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ip_address: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            ip_address,
        }
    }
}

/// Split comma-separated input into trimmed, non-empty items
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
