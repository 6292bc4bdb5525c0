//! Consent and privacy regulation parameters.

use bidforge_core::ortb::BidRequest;
use bidforge_targeting::ConsentSnapshot;

use crate::pipeline::ParameterBuilder;

/// Writes GDPR, COPPA and US privacy signals into `regs` and `user`.
///
/// Applicability flags are always emitted as explicit 1/0 so downstream
/// bidders can tell "not subject" from "unknown". Consent strings are only
/// written when non-empty; an absent string means an absent field.
pub struct UserConsentParameterBuilder<'a> {
    consent: &'a ConsentSnapshot,
}

impl<'a> UserConsentParameterBuilder<'a> {
    pub fn new(consent: &'a ConsentSnapshot) -> Self {
        Self { consent }
    }
}

impl ParameterBuilder for UserConsentParameterBuilder<'_> {
    fn build(&self, request: &mut BidRequest) {
        request.regs.ext.gdpr = Some(i32::from(self.consent.subject_to_gdpr));
        request.regs.coppa = Some(i32::from(self.consent.subject_to_coppa));

        if let Some(consent) = self
            .consent
            .gdpr_consent_string
            .as_ref()
            .filter(|value| !value.is_empty())
        {
            request.user.ext.consent = Some(consent.clone());
        }
        if let Some(us_privacy) = self
            .consent
            .us_privacy_string
            .as_ref()
            .filter(|value| !value.is_empty())
        {
            request.regs.ext.us_privacy = Some(us_privacy.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_with(consent: &ConsentSnapshot) -> BidRequest {
        let mut request = BidRequest::new("test-request");
        UserConsentParameterBuilder::new(consent).build(&mut request);
        request
    }

    #[test]
    fn test_not_subject_to_gdpr_still_forwards_consent_string() {
        let consent = ConsentSnapshot {
            subject_to_gdpr: false,
            gdpr_consent_string: Some("consentstring".to_string()),
            ..Default::default()
        };
        let request = build_with(&consent);
        assert_eq!(request.regs.ext.gdpr, Some(0));
        assert_eq!(request.user.ext.consent.as_deref(), Some("consentstring"));
    }

    #[test]
    fn test_subject_to_gdpr_with_consent_string() {
        let consent = ConsentSnapshot {
            subject_to_gdpr: true,
            gdpr_consent_string: Some("differentconsentstring".to_string()),
            ..Default::default()
        };
        let request = build_with(&consent);
        assert_eq!(request.regs.ext.gdpr, Some(1));
        assert_eq!(
            request.user.ext.consent.as_deref(),
            Some("differentconsentstring")
        );
    }

    #[test]
    fn test_empty_consent_string_is_omitted() {
        let consent = ConsentSnapshot {
            subject_to_gdpr: true,
            gdpr_consent_string: Some(String::new()),
            ..Default::default()
        };
        let request = build_with(&consent);
        assert_eq!(request.regs.ext.gdpr, Some(1));
        assert!(request.user.ext.consent.is_none());
    }

    #[test]
    fn test_coppa_flag_mirrors_state() {
        let subject = ConsentSnapshot {
            subject_to_coppa: true,
            ..Default::default()
        };
        assert_eq!(build_with(&subject).regs.coppa, Some(1));

        let not_subject = ConsentSnapshot::default();
        assert_eq!(build_with(&not_subject).regs.coppa, Some(0));
    }

    #[test]
    fn test_us_privacy_string() {
        let consent = ConsentSnapshot {
            us_privacy_string: Some("1YNN".to_string()),
            ..Default::default()
        };
        let request = build_with(&consent);
        assert_eq!(request.regs.ext.us_privacy.as_deref(), Some("1YNN"));

        let absent = ConsentSnapshot::default();
        assert!(build_with(&absent).regs.ext.us_privacy.is_none());
    }

    #[test]
    fn test_rebuild_with_unchanged_state_is_idempotent() {
        let consent = ConsentSnapshot {
            subject_to_gdpr: true,
            gdpr_consent_string: Some("consentstring".to_string()),
            subject_to_coppa: true,
            us_privacy_string: Some("1YNN".to_string()),
        };
        let mut request = BidRequest::new("test-request");
        let builder = UserConsentParameterBuilder::new(&consent);
        builder.build(&mut request);
        let first_pass = request.clone();
        builder.build(&mut request);
        assert_eq!(request, first_pass);
    }
}
