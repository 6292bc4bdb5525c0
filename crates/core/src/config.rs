//! SDK-wide configuration shared by every ad unit.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default auction timeout advertised in `tmax`.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 2000;

/// Process-wide SDK settings. The host configures one of these at startup
/// and hands a reference to the request assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Identifier of the account-level stored request on the auction server.
    pub account_id: String,
    /// When set, rendering and mediation integrations also ask the auction
    /// server to cache winning bids for reporting.
    pub use_cache_for_reporting_with_rendering_api: bool,
    /// Auction timeout hint, in milliseconds.
    pub timeout_millis: u64,
    #[serde(default)]
    stored_bid_responses: Vec<StoredBidResponse>,
    #[serde(default)]
    pub app: AppIdentity,
    #[serde(default)]
    pub device: DeviceInfo,
}

impl SdkConfig {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    /// Register a canned response for one bidder. A later call for the same
    /// bidder replaces the earlier one; registration order is preserved.
    pub fn add_stored_bid_response(
        &mut self,
        bidder: impl Into<String>,
        response_id: impl Into<String>,
    ) {
        let bidder = bidder.into();
        let response_id = response_id.into();
        if bidder.is_empty() || response_id.is_empty() {
            warn!(%bidder, %response_id, "Ignoring stored bid response with empty field");
            return;
        }
        match self
            .stored_bid_responses
            .iter_mut()
            .find(|entry| entry.bidder == bidder)
        {
            Some(entry) => entry.response_id = response_id,
            None => self.stored_bid_responses.push(StoredBidResponse {
                bidder,
                response_id,
            }),
        }
    }

    pub fn clear_stored_bid_responses(&mut self) {
        self.stored_bid_responses.clear();
    }

    pub fn stored_bid_responses(&self) -> &[StoredBidResponse] {
        &self.stored_bid_responses
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            use_cache_for_reporting_with_rendering_api: false,
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            stored_bid_responses: Vec::new(),
            app: AppIdentity::default(),
            device: DeviceInfo::default(),
        }
    }
}

/// Canned auction response for one bidder, used in test setups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBidResponse {
    pub bidder: String,
    pub response_id: String,
}

/// Identity of the host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub bundle: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Facts about the device the host collected for the SDK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub user_agent: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub pixel_ratio: Option<f64>,
    /// Advertising identifier, if the user allowed access.
    pub advertising_id: Option<String>,
    /// "Limit ad tracking" switch state, if known.
    pub limit_ad_tracking: Option<bool>,
}
