//! Builder pipeline: runs the parameter builders in a fixed order over one
//! freshly created bid request.

use bidforge_core::adunit::AdUnitConfig;
use bidforge_core::config::SdkConfig;
use bidforge_core::ortb::BidRequest;
use bidforge_core::types::SDK_VERSION;
use bidforge_targeting::{ConsentSnapshot, TargetingSnapshot};
use tracing::debug;
use uuid::Uuid;

use crate::app_info::AppInfoParameterBuilder;
use crate::basic::BasicParameterBuilder;
use crate::device_info::DeviceInfoParameterBuilder;
use crate::prebid::PrebidParameterBuilder;
use crate::user_consent::UserConsentParameterBuilder;

/// One transformer unit contributing fields to a bid request.
///
/// Builders only read their input snapshots and write into the request;
/// they never read each other's output.
pub trait ParameterBuilder {
    fn build(&self, request: &mut BidRequest);
}

/// Drives one build invocation: a fresh request, the fixed builder order,
/// one impression per ad unit.
///
/// The assembler borrows the SDK configuration and owns the snapshots it
/// was given, so a build observes one coherent state even while the host
/// keeps mutating the stores.
pub struct BidRequestAssembler<'a> {
    sdk_config: &'a SdkConfig,
    targeting: TargetingSnapshot,
    consent: ConsentSnapshot,
}

impl<'a> BidRequestAssembler<'a> {
    pub fn new(
        sdk_config: &'a SdkConfig,
        targeting: TargetingSnapshot,
        consent: ConsentSnapshot,
    ) -> Self {
        Self {
            sdk_config,
            targeting,
            consent,
        }
    }

    /// Assemble a complete bid request for the given ad units.
    ///
    /// Basic builders run first and append one impression per unit, then the
    /// request-level builders run, then one prebid builder per unit enriches
    /// its impression by index.
    pub fn assemble(&self, ad_units: &[AdUnitConfig]) -> BidRequest {
        let mut request = BidRequest::new(Uuid::new_v4().to_string());
        request.tmax = Some(self.sdk_config.timeout_millis);

        let mut builders: Vec<Box<dyn ParameterBuilder + '_>> = Vec::new();
        for unit in ad_units {
            builders.push(Box::new(BasicParameterBuilder::new(
                unit,
                &self.targeting,
                SDK_VERSION,
            )));
        }
        builders.push(Box::new(AppInfoParameterBuilder::new(
            &self.sdk_config.app,
            &self.targeting,
        )));
        builders.push(Box::new(DeviceInfoParameterBuilder::new(
            &self.sdk_config.device,
        )));
        builders.push(Box::new(UserConsentParameterBuilder::new(&self.consent)));
        for (index, unit) in ad_units.iter().enumerate() {
            builders.push(Box::new(PrebidParameterBuilder::new(
                unit,
                self.sdk_config,
                &self.targeting,
                index,
            )));
        }

        for builder in &builders {
            builder.build(&mut request);
        }

        debug!(
            request_id = %request.id,
            impressions = request.imp.len(),
            "Bid request assembled"
        );
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidforge_core::types::AdSize;

    fn make_unit(config_id: &str) -> AdUnitConfig {
        AdUnitConfig::new(config_id, AdSize::new(320, 50))
    }

    #[test]
    fn test_one_impression_per_unit_in_order() {
        let sdk_config = SdkConfig::new("account-1");
        let assembler = BidRequestAssembler::new(
            &sdk_config,
            TargetingSnapshot::default(),
            ConsentSnapshot::default(),
        );
        let units = vec![make_unit("config-1"), make_unit("config-2")];
        let request = assembler.assemble(&units);

        assert_eq!(request.imp.len(), 2);
        assert_eq!(request.imp[0].id, "imp-1");
        assert_eq!(request.imp[1].id, "imp-2");
        assert_eq!(
            request.imp[0].ext.prebid.storedrequest.as_ref().unwrap().id,
            "config-1"
        );
        assert_eq!(
            request.imp[1].ext.prebid.storedrequest.as_ref().unwrap().id,
            "config-2"
        );
    }

    #[test]
    fn test_request_identity_and_timeout() {
        let mut sdk_config = SdkConfig::new("account-1");
        sdk_config.timeout_millis = 750;
        let assembler = BidRequestAssembler::new(
            &sdk_config,
            TargetingSnapshot::default(),
            ConsentSnapshot::default(),
        );
        let request = assembler.assemble(std::slice::from_ref(&make_unit("config-1")));

        assert!(!request.id.is_empty());
        assert_eq!(request.tmax, Some(750));

        let other = assembler.assemble(std::slice::from_ref(&make_unit("config-1")));
        assert_ne!(request.id, other.id);
    }

    #[test]
    fn test_no_units_yields_no_impressions() {
        let sdk_config = SdkConfig::new("account-1");
        let assembler = BidRequestAssembler::new(
            &sdk_config,
            TargetingSnapshot::default(),
            ConsentSnapshot::default(),
        );
        let request = assembler.assemble(&[]);
        assert!(request.imp.is_empty());
        assert_eq!(
            request.ext.prebid.storedrequest.as_ref().map(|s| s.id.as_str()),
            None
        );
    }

    #[test]
    fn test_consent_builder_runs_in_pipeline() {
        let sdk_config = SdkConfig::new("account-1");
        let consent = ConsentSnapshot {
            subject_to_gdpr: true,
            gdpr_consent_string: Some("consentstring".to_string()),
            ..Default::default()
        };
        let assembler =
            BidRequestAssembler::new(&sdk_config, TargetingSnapshot::default(), consent);
        let request = assembler.assemble(std::slice::from_ref(&make_unit("config-1")));
        assert_eq!(request.regs.ext.gdpr, Some(1));
        assert_eq!(request.user.ext.consent.as_deref(), Some("consentstring"));
    }
}
