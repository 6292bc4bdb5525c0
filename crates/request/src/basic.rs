//! Baseline impression scaffolding shared by every integration kind.

use bidforge_core::adunit::AdUnitConfig;
use bidforge_core::ortb::{Banner, BidRequest, Impression, Video};
use bidforge_core::types::{
    AdFormat, AdPosition, OMID_PARTNER_NAME, SDK_NAME, SUPPORTED_VIDEO_MIME_TYPES, VIDEO_DELIVERY,
    VIDEO_PLAYBACK_END, VIDEO_PROTOCOLS,
};
use bidforge_targeting::TargetingSnapshot;

use crate::pipeline::ParameterBuilder;

/// Appends one impression for its ad unit and stamps SDK and measurement
/// identity on the request.
///
/// Exactly one impression is appended per `build` call; running the builder
/// twice for the same unit appends twice. The driver owns deduplication.
pub struct BasicParameterBuilder<'a> {
    ad_unit: &'a AdUnitConfig,
    targeting: &'a TargetingSnapshot,
    sdk_version: &'a str,
}

impl<'a> BasicParameterBuilder<'a> {
    pub fn new(
        ad_unit: &'a AdUnitConfig,
        targeting: &'a TargetingSnapshot,
        sdk_version: &'a str,
    ) -> Self {
        Self {
            ad_unit,
            targeting,
            sdk_version,
        }
    }
}

impl ParameterBuilder for BasicParameterBuilder<'_> {
    fn build(&self, request: &mut BidRequest) {
        let omidpn = self
            .targeting
            .omid_partner_name
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| OMID_PARTNER_NAME.to_string());
        let omidpv = self
            .targeting
            .omid_partner_version
            .as_ref()
            .filter(|version| !version.is_empty())
            .cloned()
            .unwrap_or_else(|| self.sdk_version.to_string());
        request.source.ext.omidpn = Some(omidpn);
        request.source.ext.omidpv = Some(omidpv);

        let pos = self.ad_unit.ad_position.map(|position| position.code());
        let mut imp = Impression {
            id: format!("imp-{}", request.imp.len() + 1),
            instl: if self.ad_unit.ad_position == Some(AdPosition::FullScreen) {
                1
            } else {
                0
            },
            displaymanager: Some(SDK_NAME.to_string()),
            displaymanagerver: Some(self.sdk_version.to_string()),
            ..Default::default()
        };

        if self.ad_unit.has_format(AdFormat::Display) {
            imp.banner = Some(Banner {
                pos,
                ..Default::default()
            });
        }
        if self.ad_unit.has_format(AdFormat::Video) {
            imp.video = Some(Video {
                pos,
                mimes: SUPPORTED_VIDEO_MIME_TYPES
                    .iter()
                    .map(|mime| mime.to_string())
                    .collect(),
                protocols: Some(VIDEO_PROTOCOLS.to_vec()),
                delivery: Some(VIDEO_DELIVERY.to_vec()),
                playbackend: Some(VIDEO_PLAYBACK_END),
                ..Default::default()
            });
        }

        request.imp.push(imp);
    }
}
