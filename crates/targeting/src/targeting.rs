//! First-party targeting state shared across ad units: context and user
//! data, bidder access control, app identity overrides, and user attributes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Years of birth outside this range are treated as input errors.
const YEAR_OF_BIRTH_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// User gender, mapped to the single-letter OpenRTB codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserGender {
    Male,
    Female,
    Other,
}

impl UserGender {
    /// OpenRTB `gender` code.
    pub fn code(&self) -> &'static str {
        match self {
            UserGender::Male => "M",
            UserGender::Female => "F",
            UserGender::Other => "O",
        }
    }
}

/// Immutable view of the targeting state, captured once per request build.
///
/// Every map value is an insertion-ordered set: duplicates are dropped on
/// write, so repeated host calls collapse to one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetingSnapshot {
    /// App-level first-party data, forwarded under `app.ext.data`.
    pub context_data: BTreeMap<String, Vec<String>>,
    /// User-level first-party data, forwarded under `user.ext.data`.
    pub user_data: BTreeMap<String, Vec<String>>,
    /// Bidders allowed to see first-party data.
    pub access_control_list: Vec<String>,
    /// Override for the Open Measurement partner name.
    pub omid_partner_name: Option<String>,
    /// Override for the Open Measurement partner version.
    pub omid_partner_version: Option<String>,
    /// App store URL of the host app.
    pub store_url: Option<String>,
    /// Domain of the host app.
    pub domain: Option<String>,
    /// Publisher name of the host app.
    pub publisher_name: Option<String>,
    pub year_of_birth: Option<i32>,
    pub gender: Option<UserGender>,
    /// User keywords, joined into a comma-separated list on the wire.
    pub keywords: Vec<String>,
}

/// Process-wide targeting store. The host mutates it from any thread; each
/// request build reads one coherent snapshot.
#[derive(Debug, Default)]
pub struct TargetingStore {
    inner: RwLock<TargetingSnapshot>,
}

impl TargetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── App-level context data ─────────────────────────────────────────

    /// Add one value to the context set stored under `key`. Duplicates are
    /// ignored, first-insertion order is kept.
    pub fn add_context_data(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut state = self.inner.write();
        insert_unique(state.context_data.entry(key.into()).or_default(), value.into());
    }

    /// Replace the whole context set stored under `key`.
    pub fn update_context_data(
        &self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = String>,
    ) {
        self.inner
            .write()
            .context_data
            .insert(key.into(), dedup(values));
    }

    pub fn remove_context_data(&self, key: &str) {
        self.inner.write().context_data.remove(key);
    }

    pub fn clear_context_data(&self) {
        self.inner.write().context_data.clear();
    }

    // ─── User-level data ────────────────────────────────────────────────

    /// Add one value to the user set stored under `key`. Duplicates are
    /// ignored, first-insertion order is kept.
    pub fn add_user_data(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut state = self.inner.write();
        insert_unique(state.user_data.entry(key.into()).or_default(), value.into());
    }

    /// Replace the whole user set stored under `key`.
    pub fn update_user_data(
        &self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = String>,
    ) {
        self.inner.write().user_data.insert(key.into(), dedup(values));
    }

    pub fn remove_user_data(&self, key: &str) {
        self.inner.write().user_data.remove(key);
    }

    pub fn clear_user_data(&self) {
        self.inner.write().user_data.clear();
    }

    // ─── Bidder access control ──────────────────────────────────────────

    pub fn add_bidder_to_access_control_list(&self, bidder: impl Into<String>) {
        let bidder = bidder.into();
        debug!(%bidder, "Bidder added to access control list");
        insert_unique(&mut self.inner.write().access_control_list, bidder);
    }

    pub fn remove_bidder_from_access_control_list(&self, bidder: &str) {
        self.inner
            .write()
            .access_control_list
            .retain(|entry| entry != bidder);
    }

    pub fn clear_access_control_list(&self) {
        self.inner.write().access_control_list.clear();
    }

    // ─── Measurement and app identity ───────────────────────────────────

    pub fn set_omid_partner_name(&self, name: Option<String>) {
        self.inner.write().omid_partner_name = name;
    }

    pub fn set_omid_partner_version(&self, version: Option<String>) {
        self.inner.write().omid_partner_version = version;
    }

    pub fn set_store_url(&self, url: Option<String>) {
        self.inner.write().store_url = url;
    }

    pub fn set_domain(&self, domain: Option<String>) {
        self.inner.write().domain = domain;
    }

    pub fn set_publisher_name(&self, name: Option<String>) {
        self.inner.write().publisher_name = name;
    }

    // ─── User attributes ────────────────────────────────────────────────

    /// Set the user's year of birth. Out-of-range years are ignored with a
    /// warning and leave the stored value untouched.
    pub fn set_year_of_birth(&self, year: Option<i32>) {
        if let Some(year) = year {
            if !YEAR_OF_BIRTH_RANGE.contains(&year) {
                warn!(year, "Ignoring out-of-range year of birth");
                return;
            }
        }
        self.inner.write().year_of_birth = year;
    }

    pub fn set_gender(&self, gender: Option<UserGender>) {
        self.inner.write().gender = gender;
    }

    /// Add one user keyword. Duplicates are ignored, first-insertion order
    /// is kept.
    pub fn add_user_keyword(&self, keyword: impl Into<String>) {
        insert_unique(&mut self.inner.write().keywords, keyword.into());
    }

    pub fn remove_user_keyword(&self, keyword: &str) {
        self.inner.write().keywords.retain(|entry| entry != keyword);
    }

    pub fn clear_user_keywords(&self) {
        self.inner.write().keywords.clear();
    }

    pub fn snapshot(&self) -> TargetingSnapshot {
        self.inner.read().clone()
    }
}

fn insert_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn dedup(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut deduped: Vec<String> = Vec::new();
    for value in values {
        insert_unique(&mut deduped, value);
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_data_collapses_duplicates() {
        let store = TargetingStore::new();
        store.add_context_data("last_search_keywords", "wolf");
        store.add_context_data("last_search_keywords", "pet");
        store.add_context_data("last_search_keywords", "wolf");

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.context_data.get("last_search_keywords").unwrap(),
            &vec!["wolf".to_string(), "pet".to_string()]
        );
    }

    #[test]
    fn test_update_user_data_replaces_values() {
        let store = TargetingStore::new();
        store.add_user_data("fav_colors", "red");
        store.update_user_data(
            "fav_colors",
            vec!["orange".to_string(), "orange".to_string(), "green".to_string()],
        );

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.user_data.get("fav_colors").unwrap(),
            &vec!["orange".to_string(), "green".to_string()]
        );
    }

    #[test]
    fn test_access_control_list_is_an_ordered_set() {
        let store = TargetingStore::new();
        store.add_bidder_to_access_control_list("bidder-a");
        store.add_bidder_to_access_control_list("bidder-b");
        store.add_bidder_to_access_control_list("bidder-a");
        assert_eq!(
            store.snapshot().access_control_list,
            vec!["bidder-a".to_string(), "bidder-b".to_string()]
        );

        store.remove_bidder_from_access_control_list("bidder-a");
        assert_eq!(
            store.snapshot().access_control_list,
            vec!["bidder-b".to_string()]
        );
    }

    #[test]
    fn test_year_of_birth_validation() {
        let store = TargetingStore::new();
        store.set_year_of_birth(Some(1899));
        assert!(store.snapshot().year_of_birth.is_none());

        store.set_year_of_birth(Some(1985));
        assert_eq!(store.snapshot().year_of_birth, Some(1985));

        store.set_year_of_birth(Some(2101));
        assert_eq!(store.snapshot().year_of_birth, Some(1985));

        store.set_year_of_birth(None);
        assert!(store.snapshot().year_of_birth.is_none());
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(UserGender::Male.code(), "M");
        assert_eq!(UserGender::Female.code(), "F");
        assert_eq!(UserGender::Other.code(), "O");
    }

    #[test]
    fn test_snapshot_is_decoupled_from_later_writes() {
        let store = TargetingStore::new();
        store.add_user_keyword("sports");
        let snapshot = store.snapshot();

        store.add_user_keyword("travel");
        store.clear_user_keywords();

        assert_eq!(snapshot.keywords, vec!["sports".to_string()]);
    }
}
