// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend connection settings and the connection gate.

use std::time::Duration;

/// Default timeout applied to every backend call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout used by the activity and notification feeds.
pub const FEED_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

/// URL and anonymous key of the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    url: String,
    anon_key: String,
    request_timeout: Duration,
}

impl BackendConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Unset variables yield empty values, which leaves the gate closed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(first_env(&URL_VARS), first_env(&KEY_VARS))
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// The connection gate.
    ///
    /// True iff both the URL and the key are non-empty and neither is the
    /// literal string "undefined". Performs no I/O.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        is_usable(&self.url) && is_usable(&self.anon_key)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn is_usable(value: &str) -> bool {
    let trimmed: &str = value.trim();
    !trimmed.is_empty() && trimmed != "undefined"
}

fn first_env(names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| is_usable(value))
        .unwrap_or_default()
}
