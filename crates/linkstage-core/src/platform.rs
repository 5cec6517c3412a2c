//! Platform targets and build configurations.
//!
//! Support for a platform is decided in one exhaustive match
//! ([`PlatformTarget::artifact_layout`]), so adding a platform is a
//! compile-checked change rather than another string comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a platform or configuration name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTargetError {
    #[error("Unknown platform '{}' (expected one of: {})", .0, PlatformTarget::names())]
    UnknownPlatform(String),

    #[error(
        "Unknown build configuration '{}' (expected one of: {})",
        .0,
        BuildConfiguration::names()
    )]
    UnknownConfiguration(String),
}

/// Target platform of a resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformTarget {
    Win64,
    Linux,
    LinuxArm64,
    Mac,
    #[serde(rename = "IOS")]
    Ios,
    Android,
}

/// Where a platform's binaries live inside the package and how they are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Directory under the package root holding the platform binaries.
    pub binary_dir: &'static str,
    /// Extension of static link libraries (no leading dot).
    pub static_extension: &'static str,
    /// Extension of dynamically loadable binaries (no leading dot).
    pub dynamic_extension: &'static str,
}

impl PlatformTarget {
    /// Every known platform, in display order.
    pub const ALL: [Self; 6] = [
        Self::Win64,
        Self::Linux,
        Self::LinuxArm64,
        Self::Mac,
        Self::Ios,
        Self::Android,
    ];

    /// Canonical platform name, also used as the binary directory name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Win64 => "Win64",
            Self::Linux => "Linux",
            Self::LinuxArm64 => "LinuxArm64",
            Self::Mac => "Mac",
            Self::Ios => "IOS",
            Self::Android => "Android",
        }
    }

    /// Binary layout for the platforms the package ships binaries for.
    ///
    /// `None` means the platform is unsupported and resolution must stop
    /// before touching the filesystem.
    pub const fn artifact_layout(self) -> Option<ArtifactLayout> {
        match self {
            Self::Win64 => Some(ArtifactLayout {
                binary_dir: "Win64",
                static_extension: "lib",
                dynamic_extension: "dll",
            }),
            Self::Linux | Self::LinuxArm64 | Self::Mac | Self::Ios | Self::Android => None,
        }
    }

    pub const fn is_supported(self) -> bool {
        self.artifact_layout().is_some()
    }

    fn names() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlatformTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTargetError::UnknownPlatform(trimmed.to_string()))
    }
}

/// Build configuration of a resolution run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum BuildConfiguration {
    Debug,
    DebugGame,
    #[default]
    Development,
    Test,
    Shipping,
}

impl BuildConfiguration {
    /// Every known configuration, in display order.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::DebugGame,
        Self::Development,
        Self::Test,
        Self::Shipping,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::DebugGame => "DebugGame",
            Self::Development => "Development",
            Self::Test => "Test",
            Self::Shipping => "Shipping",
        }
    }

    /// Whether delay-loaded binaries are copied next to the executable.
    ///
    /// Other configurations still discover and classify them.
    pub const fn stages_runtime_binaries(self) -> bool {
        matches!(self, Self::Development | Self::DebugGame | Self::Shipping)
    }

    fn names() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildConfiguration {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|configuration| configuration.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTargetError::UnknownConfiguration(trimmed.to_string()))
    }
}
