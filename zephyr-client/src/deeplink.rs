//! Mobile wallet deep-link handshake.
//!
//! When no in-page provider exists on a mobile user agent, the session
//! manager hands control to the wallet app through a universal link that
//! encodes the page URL as a return target. The return URL carries a resume
//! marker; consuming it must strip it exactly once so an unrelated later
//! load does not re-trigger the silent connect.

use serde::{Deserialize, Serialize};

/// Query parameter signaling "resume after wallet app handshake".
pub const RETURN_MARKER: &str = "zephyr_resume";

/// Where the wallet app handshake should go and come back to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    /// Base universal link of the wallet app's in-app browser,
    /// e.g. `https://phantom.app/ul/browse`.
    pub wallet_base_url: String,
    /// URL the wallet app should load to resume the flow.
    pub return_url: String,
}

impl DeepLinkConfig {
    /// Create a deep-link configuration.
    pub fn new(wallet_base_url: impl Into<String>, return_url: impl Into<String>) -> Self {
        Self {
            wallet_base_url: wallet_base_url.into(),
            return_url: return_url.into(),
        }
    }
}

/// Build the wallet-app handshake URL for this configuration.
///
/// The return target gets the resume marker appended before being
/// percent-encoded into the link, so the handshake round-trips through the
/// wallet app and lands back on a URL [`consume_return_marker`] recognises.
pub fn handshake_url(config: &DeepLinkConfig) -> String {
    let target = append_return_marker(&config.return_url);
    let encoded = urlencoding::encode(&target);
    format!(
        "{}/{}?ref={}",
        config.wallet_base_url.trim_end_matches('/'),
        encoded,
        encoded
    )
}

/// Append the resume marker to a URL, preserving existing query and
/// fragment. A URL that already carries the marker is returned unchanged.
pub fn append_return_marker(url: &str) -> String {
    if has_return_marker(url) {
        return url.to_string();
    }
    let (head, fragment) = split_fragment(url);
    let separator = if head.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{head}{separator}{RETURN_MARKER}=1#{fragment}"),
        None => format!("{head}{separator}{RETURN_MARKER}=1"),
    }
}

/// Whether a URL carries the resume marker.
pub fn has_return_marker(url: &str) -> bool {
    let (head, _) = split_fragment(url);
    match head.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .any(|pair| pair.split('=').next() == Some(RETURN_MARKER)),
        None => false,
    }
}

/// Strip the resume marker from a URL.
///
/// Returns whether the marker was present, plus the URL without it. All
/// other query parameters and any fragment survive untouched.
pub fn consume_return_marker(url: &str) -> (bool, String) {
    let (head, fragment) = split_fragment(url);
    let Some((base, query)) = head.split_once('?') else {
        return (false, url.to_string());
    };

    let mut found = false;
    let remaining: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            if pair.split('=').next() == Some(RETURN_MARKER) {
                found = true;
                false
            } else {
                !pair.is_empty()
            }
        })
        .collect();

    if !found {
        return (false, url.to_string());
    }

    let mut cleaned = base.to_string();
    if !remaining.is_empty() {
        cleaned.push('?');
        cleaned.push_str(&remaining.join("&"));
    }
    if let Some(fragment) = fragment {
        cleaned.push('#');
        cleaned.push_str(fragment);
    }
    (true, cleaned)
}

fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    }
}
