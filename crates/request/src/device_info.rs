//! Device identity parameters.

use bidforge_core::config::DeviceInfo;
use bidforge_core::ortb::BidRequest;

use crate::pipeline::ParameterBuilder;

/// Writes the device facts the host collected into `device`. Unknown facts
/// stay omitted; the builder never guesses.
pub struct DeviceInfoParameterBuilder<'a> {
    device: &'a DeviceInfo,
}

impl<'a> DeviceInfoParameterBuilder<'a> {
    pub fn new(device: &'a DeviceInfo) -> Self {
        Self { device }
    }
}

impl ParameterBuilder for DeviceInfoParameterBuilder<'_> {
    fn build(&self, request: &mut BidRequest) {
        let info = self.device;
        let device = &mut request.device;
        device.ua = info.user_agent.clone().filter(|value| !value.is_empty());
        device.make = info.make.clone().filter(|value| !value.is_empty());
        device.model = info.model.clone().filter(|value| !value.is_empty());
        device.os = info.os.clone().filter(|value| !value.is_empty());
        device.osv = info.os_version.clone().filter(|value| !value.is_empty());
        device.w = info.screen_width;
        device.h = info.screen_height;
        device.pxratio = info.pixel_ratio;
        device.ifa = info.advertising_id.clone().filter(|value| !value.is_empty());
        device.lmt = info.limit_ad_tracking.map(i32::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_facts_are_copied() {
        let info = DeviceInfo {
            user_agent: Some("Mozilla/5.0 (Mobile)".to_string()),
            make: Some("Apple".to_string()),
            model: Some("iPhone14,2".to_string()),
            os: Some("iOS".to_string()),
            os_version: Some("17.4".to_string()),
            screen_width: Some(390),
            screen_height: Some(844),
            pixel_ratio: Some(3.0),
            advertising_id: Some("00000000-0000-0000-0000-000000000001".to_string()),
            limit_ad_tracking: Some(true),
        };
        let mut request = BidRequest::new("test-request");
        DeviceInfoParameterBuilder::new(&info).build(&mut request);
        let device = &request.device;
        assert_eq!(device.ua.as_deref(), Some("Mozilla/5.0 (Mobile)"));
        assert_eq!(device.make.as_deref(), Some("Apple"));
        assert_eq!(device.model.as_deref(), Some("iPhone14,2"));
        assert_eq!(device.os.as_deref(), Some("iOS"));
        assert_eq!(device.osv.as_deref(), Some("17.4"));
        assert_eq!(device.w, Some(390));
        assert_eq!(device.h, Some(844));
        assert_eq!(device.pxratio, Some(3.0));
        assert_eq!(device.lmt, Some(1));
    }

    #[test]
    fn test_unknown_facts_stay_omitted() {
        let mut request = BidRequest::new("test-request");
        DeviceInfoParameterBuilder::new(&DeviceInfo::default()).build(&mut request);
        assert!(request.device.is_empty());
    }
}
