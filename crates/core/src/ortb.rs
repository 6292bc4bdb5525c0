//! OpenRTB 2.5 compatible bid request types.
//! Subset of fields the BidForge parameter builders populate, with typed
//! extension objects in place of free-form JSON.
//!
//! Every aggregate the builders touch is always present in memory and
//! skipped on the wire while empty, so builders assign fields directly
//! instead of threading `Option` chains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::BidForgeResult;
use crate::types::AdSize;

/// OpenRTB Bid Request assembled by the builder pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    pub id: String,
    #[serde(default)]
    pub imp: Vec<Impression>,
    #[serde(default, skip_serializing_if = "App::is_empty")]
    pub app: App,
    #[serde(default, skip_serializing_if = "Device::is_empty")]
    pub device: Device,
    #[serde(default, skip_serializing_if = "User::is_empty")]
    pub user: User,
    #[serde(default, skip_serializing_if = "Regs::is_empty")]
    pub regs: Regs,
    #[serde(default, skip_serializing_if = "Source::is_empty")]
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u64>,
    #[serde(default, skip_serializing_if = "RequestExt::is_empty")]
    pub ext: RequestExt,
}

impl BidRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Serialize for the wire. Empty aggregates are omitted, never null.
    pub fn to_json(&self) -> BidForgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> BidForgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Impression {
    pub id: String,
    #[serde(default)]
    pub instl: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaymanager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaymanagerver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(default, skip_serializing_if = "ImpressionExt::is_empty")]
    pub ext: ImpressionExt,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<i32>>,
}

/// A single size entry in `banner.format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub w: u32,
    pub h: u32,
}

impl From<AdSize> for Format {
    fn from(size: AdSize) -> Self {
        Self {
            w: size.width,
            h: size.height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minduration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxduration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdelay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linearity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minbitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxbitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playbackend: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storeurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(default, skip_serializing_if = "AppExt::is_empty")]
    pub ext: AppExt,
}

impl App {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bundle.is_none()
            && self.domain.is_none()
            && self.storeurl.is_none()
            && self.ver.is_none()
            && self.publisher.is_none()
            && self.ext.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppExt {
    /// First-party context data: key to set of values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Vec<String>>,
}

impl AppExt {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lmt: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pxratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifa: Option<String>,
}

impl Device {
    pub fn is_empty(&self) -> bool {
        self.ua.is_none()
            && self.lmt.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.os.is_none()
            && self.osv.is_none()
            && self.w.is_none()
            && self.h.is_none()
            && self.pxratio.is_none()
            && self.ifa.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yob: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "UserExt::is_empty")]
    pub ext: UserExt,
}

impl User {
    pub fn is_empty(&self) -> bool {
        self.yob.is_none() && self.gender.is_none() && self.keywords.is_none() && self.ext.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserExt {
    /// IAB TCF consent string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent: Option<String>,
    /// First-party user data: key to set of values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Vec<String>>,
}

impl UserExt {
    pub fn is_empty(&self) -> bool {
        self.consent.is_none() && self.data.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Regs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coppa: Option<i32>,
    #[serde(default, skip_serializing_if = "RegsExt::is_empty")]
    pub ext: RegsExt,
}

impl Regs {
    pub fn is_empty(&self) -> bool {
        self.coppa.is_none() && self.ext.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegsExt {
    /// 1 when the request is subject to GDPR, 0 when it is not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<i32>,
    /// IAB CCPA/US privacy string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_privacy: Option<String>,
}

impl RegsExt {
    pub fn is_empty(&self) -> bool {
        self.gdpr.is_none() && self.us_privacy.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "SourceExt::is_empty")]
    pub ext: SourceExt,
}

impl Source {
    pub fn is_empty(&self) -> bool {
        self.ext.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceExt {
    /// Open Measurement partner name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omidpn: Option<String>,
    /// Open Measurement partner version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omidpv: Option<String>,
}

impl SourceExt {
    pub fn is_empty(&self) -> bool {
        self.omidpn.is_none() && self.omidpv.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpressionExt {
    #[serde(default, skip_serializing_if = "ImpressionExtPrebid::is_empty")]
    pub prebid: ImpressionExtPrebid,
    #[serde(default, skip_serializing_if = "ImpressionExtContext::is_empty")]
    pub context: ImpressionExtContext,
}

impl ImpressionExt {
    pub fn is_empty(&self) -> bool {
        self.prebid.is_empty() && self.context.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpressionExtPrebid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storedrequest: Option<StoredRequest>,
}

impl ImpressionExtPrebid {
    pub fn is_empty(&self) -> bool {
        self.storedrequest.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpressionExtContext {
    #[serde(default, skip_serializing_if = "ContextData::is_empty")]
    pub data: ContextData,
}

impl ImpressionExtContext {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Per-impression first-party data. The `adslot` key is reserved for the
/// typed field; builders keep it out of `entries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adslot: Option<String>,
    #[serde(flatten)]
    pub entries: BTreeMap<String, Vec<String>>,
}

impl ContextData {
    pub fn is_empty(&self) -> bool {
        self.adslot.is_none() && self.entries.is_empty()
    }
}

/// Reference to a stored request definition on the auction server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: String,
}

impl StoredRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestExt {
    #[serde(default, skip_serializing_if = "RequestExtPrebid::is_empty")]
    pub prebid: RequestExtPrebid,
}

impl RequestExt {
    pub fn is_empty(&self) -> bool {
        self.prebid.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestExtPrebid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storedrequest: Option<StoredRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtPrebidData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storedbidresponse: Vec<StoredBidResponseEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<PrebidCache>,
}

impl RequestExtPrebid {
    pub fn is_empty(&self) -> bool {
        self.storedrequest.is_none()
            && self.data.is_none()
            && self.storedbidresponse.is_empty()
            && self.cache.is_none()
    }
}

/// Bidder access control list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtPrebidData {
    pub bidders: Vec<String>,
}

/// Canned response reference for one bidder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredBidResponseEntry {
    pub bidder: String,
    pub id: String,
}

/// Asks the auction server to cache winning bids. Both sub-objects are
/// intentionally empty on the wire; their presence is the signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrebidCache {
    #[serde(default)]
    pub bids: CacheSpec,
    #[serde(default)]
    pub vastxml: CacheSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSpec {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_empty_aggregates_are_omitted() {
        let request = BidRequest::new("req-1");
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({ "id": "req-1", "imp": [] }));
    }

    #[test]
    fn test_cache_directive_shape() {
        let mut request = BidRequest::new("req-1");
        request.ext.prebid.cache = Some(PrebidCache::default());
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            value.pointer("/ext/prebid/cache"),
            Some(&json!({ "bids": {}, "vastxml": {} }))
        );
    }

    #[test]
    fn test_context_data_flattens_beside_adslot() {
        let mut data = ContextData {
            adslot: Some("/1111/homepage".to_string()),
            ..Default::default()
        };
        data.entries
            .insert("buy".to_string(), vec!["mushrooms".to_string()]);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({ "adslot": "/1111/homepage", "buy": ["mushrooms"] })
        );
    }

    #[test]
    fn test_consent_and_privacy_wire_keys() {
        let mut request = BidRequest::new("req-1");
        request.regs.coppa = Some(1);
        request.regs.ext.gdpr = Some(1);
        request.regs.ext.us_privacy = Some("1YNN".to_string());
        request.user.ext.consent = Some("BOMyQRvOMyQRvABABBAAABAAAAAAEA".to_string());
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value.pointer("/regs/coppa"), Some(&json!(1)));
        assert_eq!(value.pointer("/regs/ext/gdpr"), Some(&json!(1)));
        assert_eq!(value.pointer("/regs/ext/us_privacy"), Some(&json!("1YNN")));
        assert_eq!(
            value.pointer("/user/ext/consent"),
            Some(&json!("BOMyQRvOMyQRvABABBAAABAAAAAAEA"))
        );
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let mut request = BidRequest::new("req-1");
        request.tmax = Some(2000);
        request.app.bundle = Some("com.example.app".to_string());
        request.source.ext.omidpn = Some("BidForge".to_string());
        let mut imp = Impression {
            id: "imp-1".to_string(),
            banner: Some(Banner {
                pos: Some(4),
                format: vec![Format { w: 320, h: 50 }],
                api: None,
            }),
            ..Default::default()
        };
        imp.ext.prebid.storedrequest = Some(StoredRequest::new("config-1"));
        request.imp.push(imp);

        let decoded: BidRequest = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(decoded, request);
    }
}
