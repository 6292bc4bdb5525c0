//! User consent state: GDPR, CCPA and COPPA signals applied to outgoing
//! bid requests.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Immutable view of the consent state, captured once per request build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentSnapshot {
    /// Whether the request falls under GDPR.
    pub subject_to_gdpr: bool,
    /// IAB TCF consent string, if the consent management platform produced one.
    pub gdpr_consent_string: Option<String>,
    /// Whether the request falls under COPPA.
    pub subject_to_coppa: bool,
    /// IAB US privacy string.
    pub us_privacy_string: Option<String>,
}

/// Process-wide consent store. The host mutates it from any thread; each
/// request build reads one coherent snapshot and never sees a half-applied
/// update.
#[derive(Debug, Default)]
pub struct ConsentStore {
    inner: RwLock<ConsentSnapshot>,
}

impl ConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subject_to_gdpr(&self, subject: bool) {
        self.inner.write().subject_to_gdpr = subject;
        debug!(subject_to_gdpr = subject, "GDPR applicability updated");
    }

    pub fn set_gdpr_consent_string(&self, consent: Option<String>) {
        // Log presence only, never the string itself.
        debug!(present = consent.is_some(), "GDPR consent string updated");
        self.inner.write().gdpr_consent_string = consent;
    }

    pub fn set_subject_to_coppa(&self, subject: bool) {
        self.inner.write().subject_to_coppa = subject;
        debug!(subject_to_coppa = subject, "COPPA applicability updated");
    }

    pub fn set_us_privacy_string(&self, us_privacy: Option<String>) {
        debug!(present = us_privacy.is_some(), "US privacy string updated");
        self.inner.write().us_privacy_string = us_privacy;
    }

    pub fn snapshot(&self) -> ConsentSnapshot {
        self.inner.read().clone()
    }
}
