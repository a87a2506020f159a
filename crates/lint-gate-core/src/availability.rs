//! Host capability check performed once at initialization.

use crate::pipeline::PipelineFactory;
use semver::{Version, VersionReq};

/// Minimum host version able to drive a pipeline.
pub const MINIMUM_HOST_VERSION: &str = ">=0.3.0";

/// Identifies the tool that supplies records to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Host name, for messages.
    pub name: String,
    /// Host version.
    pub version: Version,
}

impl HostInfo {
    /// Creates host information.
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Result of the capability check.
pub enum Availability {
    /// The host is supported; here is the factory.
    Available(PipelineFactory),
    /// The host is too old; validation must be skipped.
    Unavailable {
        /// The host that was checked.
        host: HostInfo,
        /// Requirement it failed.
        required: VersionReq,
    },
}

impl Availability {
    /// Returns the factory if the host is supported.
    #[must_use]
    pub fn into_factory(self) -> Option<PipelineFactory> {
        match self {
            Self::Available(factory) => Some(factory),
            Self::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable { host, required } => f
                .debug_struct("Unavailable")
                .field("host", host)
                .field("required", required)
                .finish(),
        }
    }
}

/// Returns the factory when `host` satisfies [`MINIMUM_HOST_VERSION`].
///
/// `make` is only called for supported hosts.
pub fn check<F>(host: &HostInfo, make: F) -> Availability
where
    F: FnOnce() -> PipelineFactory,
{
    // MINIMUM_HOST_VERSION always parses.
    let required = VersionReq::parse(MINIMUM_HOST_VERSION).unwrap_or(VersionReq::STAR);
    if required.matches(&host.version) {
        Availability::Available(make())
    } else {
        tracing::error!(
            "Validation not available in {} {} (requires {})",
            host.name,
            host.version,
            required
        );
        Availability::Unavailable {
            host: host.clone(),
            required,
        }
    }
}
