//! CORS policy for the browser front-end.
//!
//! Note:
//! - CORS is enforced by browsers; server-to-server callers are not restricted by it.
//! - Applied once at the Router level, outside auth, so preflights never need a token.
//!
//! Policy:
//! - Exact allow-list: `CORS_ALLOWED_ORIGINS` when set, built-in defaults otherwise.
//! - Plus one wildcard pattern for preview deployments (`https://linkbin-*.vercel.app`).
//! - Credentials allowed; methods and headers mirrored from the preflight.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use url::Url;

use crate::config::Config;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://linkbin-front-end.vercel.app",
    "http://localhost:3000",
];

#[derive(Debug, PartialEq, Eq, Error)]
#[error("origin pattern must be <scheme>://<host> with exactly one '*' in the host")]
pub struct InvalidOriginPattern;

/// `scheme://prefix*suffix`, where `*` stands for exactly one DNS label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    scheme: String,
    host_prefix: String,
    host_suffix: String,
}

impl OriginPattern {
    pub fn parse(pattern: &str) -> Result<Self, InvalidOriginPattern> {
        let (scheme, host) = pattern.split_once("://").ok_or(InvalidOriginPattern)?;
        let host = host.trim_end_matches('/');

        if scheme.is_empty() || host.contains('/') || host.matches('*').count() != 1 {
            return Err(InvalidOriginPattern);
        }

        let (host_prefix, host_suffix) = host.split_once('*').ok_or(InvalidOriginPattern)?;
        // The wildcard may not cover the registrable domain itself.
        if !host_suffix.contains('.') {
            return Err(InvalidOriginPattern);
        }

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host_prefix: host_prefix.to_ascii_lowercase(),
            host_suffix: host_suffix.to_ascii_lowercase(),
        })
    }

    pub fn matches(&self, origin: &str) -> bool {
        let Ok(url) = Url::parse(origin) else {
            return false;
        };
        if url.scheme() != self.scheme || url.port().is_some() || url.path() != "/" {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };

        let Some(label) = host
            .strip_prefix(self.host_prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.host_suffix.as_str()))
        else {
            return false;
        };

        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

/// Origins this API answers CORS requests for. Built once at start-up.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<HeaderValue>,
    preview: Option<OriginPattern>,
}

impl OriginPolicy {
    pub fn new(explicit: Option<&[HeaderValue]>, preview: Option<OriginPattern>) -> Self {
        let allowed = match explicit {
            Some(origins) => origins.to_vec(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .copied()
                .map(HeaderValue::from_static)
                .collect(),
        };

        Self { allowed, preview }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cors_allowed_origins.as_deref(),
            config.cors_preview_origin.clone(),
        )
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        if self.allowed.iter().any(|v| v == origin) {
            return true;
        }

        match (&self.preview, origin.to_str()) {
            (Some(pattern), Ok(origin)) => pattern.matches(origin),
            _ => false,
        }
    }
}

pub fn layer(policy: OriginPolicy) -> CorsLayer {
    let policy = Arc::new(policy);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            policy.allows(origin)
        }))
        .allow_credentials(true)
        // Wildcards are not allowed together with credentials; mirroring is the equivalent.
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(60 * 10))
}

/// Apply the CORS policy to the given Router.
pub fn apply(router: Router, policy: OriginPolicy) -> Router {
    router.layer(layer(policy))
}
