//! Origin validation for script sources.

use std::fmt;

use mfe_shell_sdk::OriginError;
use tracing::{debug, warn};
use url::Url;

/// Ordered allow-list of trusted origins (`scheme://host[:port]`).
///
/// An empty list disables the check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    #[must_use]
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            origins
                .into_iter()
                .map(|o| o.into().trim_end_matches('/').to_owned())
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, origin: &Origin) -> bool {
        self.0.iter().any(|o| o == origin.as_str())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// ASCII serialization of a tuple origin, default ports elided.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Origin of `url`.
    ///
    /// # Errors
    /// Returns `OriginError::InvalidUrl` when `url` is not absolute or has an
    /// opaque origin (`data:`, `file:`, ...).
    pub fn of(url: &str) -> Result<Self, OriginError> {
        let parsed = Url::parse(url).map_err(|e| OriginError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let origin = parsed.origin();
        if !origin.is_tuple() {
            return Err(OriginError::InvalidUrl {
                url: url.to_owned(),
                reason: format!("scheme '{}' has no network origin", parsed.scheme()),
            });
        }

        Ok(Self(origin.ascii_serialization()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confirm `base_url`'s origin is trusted before anything is injected from it.
///
/// # Errors
/// Returns `OriginError::InvalidUrl` for a malformed or opaque URL and
/// `OriginError::UntrustedOrigin` when a non-empty allow-list does not
/// contain the URL's origin.
pub fn validate_origin(base_url: &str, allowed: &AllowedOrigins) -> Result<Origin, OriginError> {
    let origin = Origin::of(base_url)?;

    if allowed.is_empty() {
        debug!(%origin, "no origin allow-list configured, skipping check");
        return Ok(origin);
    }

    if !allowed.contains(&origin) {
        warn!(
            %origin,
            allowed = ?allowed.as_slice(),
            "rejected script source from untrusted origin"
        );
        return Err(OriginError::UntrustedOrigin {
            origin: origin.0,
            allowed: allowed.as_slice().to_vec(),
        });
    }

    Ok(origin)
}
