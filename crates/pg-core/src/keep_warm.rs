//! Keep-warm ping
//!
//! Run from a timer trigger so that the hosting platform does not unload an
//! idle plaything.

use crate::core::Core;
use crate::error::PingError;
use crate::host::PING_URL_BASE_VAR;
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(20);

/// Result of a timer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// `keep_warm` is off for this plaything
    Disabled,
    /// Ping sent and answered
    Answered {
        /// URL that was requested
        url: String,
        /// HTTP status of the reply
        status: u16,
        /// Reply text
        body: String,
    },
}

/// `{base}/{plaything}/ping`
#[must_use]
pub fn ping_url(url_base: &str, plaything_name: &str) -> String {
    format!("{}/{}/ping", url_base.trim_end_matches('/'), plaything_name)
}

/// Ping the plaything if keep-warm is enabled
///
/// # Errors
/// Returns error if the base URL is not set or the request fails or times
/// out.
pub fn ping(core: &Core, past_due: bool) -> Result<PingOutcome, PingError> {
    if !core.keep_warm() {
        return Ok(PingOutcome::Disabled);
    }
    if past_due {
        tracing::info!("The timer is past due!");
    }

    let Some(url_base) = core.environment().ping_url_base() else {
        tracing::error!(
            "Environment variable {} is not set; abort pinging {}.",
            PING_URL_BASE_VAR,
            core.plaything_name()
        );
        return Err(PingError::MissingBaseUrl(PING_URL_BASE_VAR));
    };
    let url = ping_url(url_base, core.plaything_name());

    let client = reqwest::blocking::Client::builder()
        .timeout(PING_TIMEOUT)
        .connect_timeout(PING_TIMEOUT)
        .build()
        .map_err(|source| PingError::Request {
            url: url.clone(),
            source,
        })?;

    let response = client.get(&url).send().map_err(|e| classify(&url, e))?;
    let status = response.status().as_u16();
    let body = response.text().map_err(|e| classify(&url, e))?;
    tracing::info!("Ping {} from timer => HTTP {}, Content: {}", url, status, body);

    Ok(PingOutcome::Answered { url, status, body })
}

fn classify(url: &str, err: reqwest::Error) -> PingError {
    if err.is_timeout() {
        let e = if err.is_connect() {
            PingError::ConnectTimeout(url.to_string())
        } else {
            PingError::ReadTimeout(url.to_string())
        };
        tracing::warn!("{}", e);
        e
    } else {
        PingError::Request {
            url: url.to_string(),
            source: err,
        }
    }
}
