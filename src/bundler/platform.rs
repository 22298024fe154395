//! Target platforms and the architectures each one accepts.

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// Platform slice of an xcframework.
///
/// The set is closed: every platform has a fixed row in [`VALID_ARCHITECTURES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// Physical iOS devices
    IphoneOs,
    /// iOS simulator on Intel hosts
    IphoneSimulator,
}

/// Architectures a fat binary may keep for each platform.
const VALID_ARCHITECTURES: &[(Platform, &[&str])] = &[
    (
        Platform::IphoneOs,
        &["armv6", "armv7", "armv7s", "armv8", "arm64", "arm64e"],
    ),
    (Platform::IphoneSimulator, &["i386", "x86_64"]),
];

impl Platform {
    /// Every platform, in assembly order.
    pub const ALL: [Platform; 2] = [Platform::IphoneOs, Platform::IphoneSimulator];

    /// Identifier used in working directory names and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IphoneOs => "iphoneos",
            Self::IphoneSimulator => "iphonesimulator",
        }
    }

    /// Architectures allowed in this platform's slice.
    #[must_use]
    pub fn valid_architectures(&self) -> &'static [&'static str] {
        VALID_ARCHITECTURES
            .iter()
            .find(|(platform, _)| platform == self)
            .map(|(_, archs)| *archs)
            .unwrap_or(&[])
    }

    /// Whether `arch` belongs to this platform.
    #[must_use]
    pub fn accepts(&self, arch: &str) -> bool {
        self.valid_architectures().contains(&arch)
    }

    /// Whether any known platform accepts `arch`.
    #[must_use]
    pub fn is_known_architecture(arch: &str) -> bool {
        Self::ALL.iter().any(|platform| platform.accepts(arch))
    }

    pub(crate) fn identifiers() -> String {
        Self::ALL
            .iter()
            .map(Platform::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}
