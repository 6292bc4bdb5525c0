use serde::{Deserialize, Serialize};

/// SDK identity reported in `imp.displaymanager`.
pub const SDK_NAME: &str = "bidforge-mobile";
/// SDK version reported in `imp.displaymanagerver` and `source.ext.omidpv`.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Default measurement partner name reported in `source.ext.omidpn`.
pub const OMID_PARTNER_NAME: &str = "BidForge";

/// Video MIME types every bundled renderer can decode.
pub const SUPPORTED_VIDEO_MIME_TYPES: [&str; 5] = [
    "video/mp4",
    "video/quicktime",
    "video/x-m4v",
    "video/3gpp",
    "video/3gpp2",
];

/// VAST 2.0 and 3.0, the protocols the bundled video player speaks.
pub const VIDEO_PROTOCOLS: [i32; 2] = [2, 5];
/// Progressive delivery only.
pub const VIDEO_DELIVERY: [i32; 1] = [3];
/// Playback ends when the creative completes.
pub const VIDEO_PLAYBACK_END: i32 = 2;

/// API frameworks the bundled banner renderer supports. Advertised on
/// `banner.api` for every integration that renders through the SDK.
pub const SUPPORTED_RENDERING_BANNER_API_SIGNALS: [ApiFramework; 4] = [
    ApiFramework::Mraid1,
    ApiFramework::Mraid2,
    ApiFramework::Mraid3,
    ApiFramework::Omid1,
];

/// Creative formats an ad unit can request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    Display,
    Video,
}

/// On-screen placement of an ad unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdPosition {
    Header,
    Footer,
    Sidebar,
    FullScreen,
}

impl AdPosition {
    /// OpenRTB `pos` code.
    pub fn code(&self) -> i32 {
        match self {
            AdPosition::Header => 4,
            AdPosition::Footer => 5,
            AdPosition::Sidebar => 6,
            AdPosition::FullScreen => 7,
        }
    }
}

/// Width and height of a creative slot, in density-independent pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdSize {
    pub width: u32,
    pub height: u32,
}

impl AdSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the host app integrates the SDK for a given ad unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    /// Legacy ad-server integration: the SDK only enriches targeting and the
    /// primary ad server renders the creative.
    Original,
    /// The SDK renders the winning creative itself.
    Rendering,
    /// A third-party mediation adapter drives rendering through the SDK.
    Mediation,
}

impl Default for IntegrationKind {
    fn default() -> Self {
        IntegrationKind::Rendering
    }
}

/// API frameworks per the OpenRTB API frameworks list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiFramework {
    Vpaid1,
    Vpaid2,
    Mraid1,
    Ormma,
    Mraid2,
    Mraid3,
    Omid1,
}

impl ApiFramework {
    /// OpenRTB `api` code.
    pub fn code(&self) -> i32 {
        match self {
            ApiFramework::Vpaid1 => 1,
            ApiFramework::Vpaid2 => 2,
            ApiFramework::Mraid1 => 3,
            ApiFramework::Ormma => 4,
            ApiFramework::Mraid2 => 5,
            ApiFramework::Mraid3 => 6,
            ApiFramework::Omid1 => 7,
        }
    }
}

/// Video linearity per OpenRTB.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoLinearity {
    Linear,
    NonLinear,
}

impl VideoLinearity {
    /// OpenRTB `linearity` code.
    pub fn code(&self) -> i32 {
        match self {
            VideoLinearity::Linear => 1,
            VideoLinearity::NonLinear => 2,
        }
    }
}

/// Video placement subtype per OpenRTB.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoPlacement {
    InStream,
    InBanner,
    InArticle,
    InFeed,
    Interstitial,
}

impl VideoPlacement {
    /// OpenRTB `placement` code.
    pub fn code(&self) -> i32 {
        match self {
            VideoPlacement::InStream => 1,
            VideoPlacement::InBanner => 2,
            VideoPlacement::InArticle => 3,
            VideoPlacement::InFeed => 4,
            VideoPlacement::Interstitial => 5,
        }
    }
}

/// When video playback starts relative to the content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartDelay {
    PreRoll,
    GenericMidRoll,
    GenericPostRoll,
    /// Mid-roll at a specific offset, in seconds.
    MidRollOffset(u32),
}

impl StartDelay {
    /// OpenRTB `startdelay` code. Generic positions use the reserved
    /// negative codes; explicit offsets pass through as seconds.
    pub fn code(&self) -> i32 {
        match self {
            StartDelay::PreRoll => 0,
            StartDelay::GenericMidRoll => -1,
            StartDelay::GenericPostRoll => -2,
            StartDelay::MidRollOffset(seconds) => *seconds as i32,
        }
    }
}
