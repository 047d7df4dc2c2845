use serde::{Deserialize, Serialize};

/// One streaming/rental service offering a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<i64>,
}

/// Watch-provider availability for a single region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchProviders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flatrate: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rent: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buy: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub free: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ads: Vec<WatchProvider>,
}

impl WatchProviders {
    pub fn is_empty(&self) -> bool {
        self.link.is_none()
            && self.flatrate.is_empty()
            && self.rent.is_empty()
            && self.buy.is_empty()
            && self.free.is_empty()
            && self.ads.is_empty()
    }
}
