//! Build platforms and tag prefixes.

use serde::{Deserialize, Serialize};

/// CPU architecture an image is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
}

impl Platform {
    /// Every platform a multi-arch manifest is assembled from.
    pub const ALL: [Platform; 2] = [Platform::X86_64, Platform::Aarch64];

    /// The platform this binary was compiled for.
    pub fn host() -> Option<Self> {
        std::env::consts::ARCH.parse().ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// Tags prefix for this platform, optionally qualified by an image variant.
    ///
    /// `x86_64` for the default variant, `aarch64-cuda12` for a named one.
    pub fn tags_prefix(&self, variant: Option<&str>) -> String {
        match variant {
            Some(v) if !v.is_empty() && v != "default" => format!("{}-{}", self.as_str(), v),
            _ => self.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            _ => Err(format!(
                "unknown platform: '{}' (supported: x86_64, aarch64)",
                s
            )),
        }
    }
}
