//! Auction-server extension parameters: sizes, video code mapping,
//! first-party data routing, access control, stored responses, and the
//! cache directive.

use bidforge_core::adunit::AdUnitConfig;
use bidforge_core::config::SdkConfig;
use bidforge_core::ortb::{
    BidRequest, ContextData, ExtPrebidData, Format, Impression, PrebidCache,
    StoredBidResponseEntry, StoredRequest,
};
use bidforge_core::types::{IntegrationKind, SUPPORTED_RENDERING_BANNER_API_SIGNALS};
use bidforge_targeting::TargetingSnapshot;

use crate::pipeline::ParameterBuilder;

/// Enriches the impression appended for its ad unit and the request-level
/// `ext.prebid` block.
///
/// Must run after the basic builder: it addresses its impression by index
/// and treats a missing one as a broken pipeline, not a recoverable error.
pub struct PrebidParameterBuilder<'a> {
    ad_unit: &'a AdUnitConfig,
    sdk_config: &'a SdkConfig,
    targeting: &'a TargetingSnapshot,
    imp_index: usize,
}

impl<'a> PrebidParameterBuilder<'a> {
    pub fn new(
        ad_unit: &'a AdUnitConfig,
        sdk_config: &'a SdkConfig,
        targeting: &'a TargetingSnapshot,
        imp_index: usize,
    ) -> Self {
        Self {
            ad_unit,
            sdk_config,
            targeting,
            imp_index,
        }
    }

    fn build_impression(&self, imp: &mut Impression) {
        if let Some(banner) = imp.banner.as_mut() {
            let mut formats = vec![Format::from(self.ad_unit.size)];
            formats.extend(
                self.ad_unit
                    .additional_sizes
                    .iter()
                    .copied()
                    .map(Format::from),
            );
            banner.format = formats;
            banner.api = match self.ad_unit.integration {
                IntegrationKind::Original => None,
                IntegrationKind::Rendering | IntegrationKind::Mediation => Some(
                    SUPPORTED_RENDERING_BANNER_API_SIGNALS
                        .iter()
                        .map(|api| api.code())
                        .collect(),
                ),
            };
        }

        if let Some(video) = imp.video.as_mut() {
            video.w = Some(self.ad_unit.size.width);
            video.h = Some(self.ad_unit.size.height);
            if let Some(params) = self.ad_unit.video_parameters.as_ref() {
                video.linearity = params.linearity.map(|linearity| linearity.code());
                video.placement = params.placement.map(|placement| placement.code());
                if !params.api.is_empty() {
                    video.api = Some(params.api.iter().map(|api| api.code()).collect());
                }
                video.minduration = params.min_duration;
                video.maxduration = params.max_duration;
                video.minbitrate = params.min_bitrate;
                video.maxbitrate = params.max_bitrate;
                video.startdelay = params.start_delay.map(|delay| delay.code());
            }
        }

        // The adslot key is reserved for the typed field; a context entry
        // under the same name would duplicate the wire key.
        let mut entries = self.ad_unit.context_data().clone();
        entries.remove("adslot");
        let adslot = self
            .ad_unit
            .pb_ad_slot
            .as_ref()
            .filter(|slot| !slot.is_empty())
            .cloned();
        if adslot.is_some() || !entries.is_empty() {
            imp.ext.context.data = ContextData { adslot, entries };
        }

        if !self.ad_unit.config_id.is_empty() {
            imp.ext.prebid.storedrequest = Some(StoredRequest::new(self.ad_unit.config_id.clone()));
        }
    }

    fn build_request(&self, request: &mut BidRequest) {
        if !self.targeting.context_data.is_empty() {
            request.app.ext.data = self.targeting.context_data.clone();
        }
        if !self.targeting.user_data.is_empty() {
            request.user.ext.data = self.targeting.user_data.clone();
        }
        if self.targeting.year_of_birth.is_some() {
            request.user.yob = self.targeting.year_of_birth;
        }
        if let Some(gender) = self.targeting.gender {
            request.user.gender = Some(gender.code().to_string());
        }
        if !self.targeting.keywords.is_empty() {
            request.user.keywords = Some(self.targeting.keywords.join(","));
        }

        let prebid = &mut request.ext.prebid;
        if !self.sdk_config.account_id.is_empty() {
            prebid.storedrequest = Some(StoredRequest::new(self.sdk_config.account_id.clone()));
        }
        if !self.targeting.access_control_list.is_empty() {
            prebid.data = Some(ExtPrebidData {
                bidders: self.targeting.access_control_list.clone(),
            });
        }
        let stored = self.sdk_config.stored_bid_responses();
        if !stored.is_empty() {
            prebid.storedbidresponse = stored
                .iter()
                .map(|entry| StoredBidResponseEntry {
                    bidder: entry.bidder.clone(),
                    id: entry.response_id.clone(),
                })
                .collect();
        }

        // Legacy integrations always ask the auction server to cache the
        // winning bid; SDK-rendered ones only when the reporting switch is
        // on. Units never disable what another unit enabled.
        let cache_enabled = match self.ad_unit.integration {
            IntegrationKind::Original => true,
            IntegrationKind::Rendering | IntegrationKind::Mediation => {
                self.sdk_config.use_cache_for_reporting_with_rendering_api
            }
        };
        if cache_enabled {
            prebid.cache = Some(PrebidCache::default());
        }
    }
}

impl ParameterBuilder for PrebidParameterBuilder<'_> {
    fn build(&self, request: &mut BidRequest) {
        assert!(
            self.imp_index < request.imp.len(),
            "no impression at index {}: the basic builder must run first",
            self.imp_index
        );
        self.build_impression(&mut request.imp[self.imp_index]);
        self.build_request(request);
    }
}
