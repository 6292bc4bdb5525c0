//! Host application identity parameters.

use bidforge_core::config::AppIdentity;
use bidforge_core::ortb::{BidRequest, Publisher};
use bidforge_targeting::TargetingSnapshot;

use crate::pipeline::ParameterBuilder;

/// Writes the host app identity into `app`, layering targeting-level
/// overrides (store URL, domain, publisher name) on top of the static
/// identity the host registered at startup.
pub struct AppInfoParameterBuilder<'a> {
    app: &'a AppIdentity,
    targeting: &'a TargetingSnapshot,
}

impl<'a> AppInfoParameterBuilder<'a> {
    pub fn new(app: &'a AppIdentity, targeting: &'a TargetingSnapshot) -> Self {
        Self { app, targeting }
    }
}

impl ParameterBuilder for AppInfoParameterBuilder<'_> {
    fn build(&self, request: &mut BidRequest) {
        let app = &mut request.app;
        if let Some(name) = non_empty(&self.app.name) {
            app.name = Some(name.clone());
        }
        if let Some(bundle) = non_empty(&self.app.bundle) {
            app.bundle = Some(bundle.clone());
        }
        if let Some(version) = non_empty(&self.app.version) {
            app.ver = Some(version.clone());
        }
        if let Some(store_url) = non_empty(&self.targeting.store_url) {
            app.storeurl = Some(store_url.clone());
        }
        if let Some(domain) = non_empty(&self.targeting.domain) {
            app.domain = Some(domain.clone());
        }
        if let Some(publisher_name) = non_empty(&self.targeting.publisher_name) {
            app.publisher
                .get_or_insert_with(Publisher::default)
                .name = Some(publisher_name.clone());
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|entry| !entry.is_empty())
}
