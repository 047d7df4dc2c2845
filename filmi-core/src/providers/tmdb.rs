use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use filmi_model::{MovieId, WatchProviders};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use super::{DetailsSource, WatchProviderSource, status_error};
use crate::{details::PrimaryDetails, error::ProviderError};

pub const TMDB_V3_BASE: &str = "https://api.themoviedb.org/3";

const CATALOG_LIMIT: usize = 10;
const SEARCH_LIMIT: usize = 20;
const MIN_SEARCH_LEN: usize = 2;

#[derive(Clone)]
pub struct TmdbSettings {
    pub api_key: Option<String>,
    pub language: String,
    pub region: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for TmdbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "en-IN".to_string(),
            region: "IN".to_string(),
            base_url: TMDB_V3_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Home-page style listings served straight from TMDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogList {
    Trending,
    Upcoming,
    TopRated,
    PopularSeries,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<Value>,
}

/// Regions are kept raw so a malformed entry for some other region cannot
/// fail the decode of the configured one.
#[derive(Debug, Default, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct LanguageQuery<'a> {
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DetailsQuery<'a> {
    language: &'a str,
    append_to_response: &'static str,
}

#[derive(Debug, Serialize)]
struct DiscoverQuery<'a> {
    region: &'a str,
    with_origin_country: &'a str,
    sort_by: &'static str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
}

pub struct TmdbClient {
    http: reqwest::Client,
    settings: TmdbSettings,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl TmdbClient {
    pub fn new(settings: TmdbSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    async fn get_tmdb_json<Q, T>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::Unconfigured("TMDB_API_KEY"))?;
        let url = format!("{}{path}", self.settings.base_url);

        debug!(url = %url, "Querying TMDB");
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()));
        }

        #[derive(Debug, Deserialize)]
        struct TmdbErrorBody {
            #[serde(default)]
            status_message: Option<String>,
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| {
                format!("TMDB request failed with status {status}")
            });

        Err(status_error(status, message))
    }

    pub async fn list(
        &self,
        list: CatalogList,
    ) -> Result<Vec<Value>, ProviderError> {
        let language = self.settings.language.as_str();
        let region = self.settings.region.as_str();

        let page: Page = match list {
            CatalogList::Trending => {
                let query = DiscoverQuery {
                    region,
                    with_origin_country: region,
                    sort_by: "popularity.desc",
                    language,
                };
                self.get_tmdb_json("/discover/movie", &query).await?
            }
            CatalogList::Upcoming => {
                let query = LanguageQuery {
                    language,
                    region: Some(region),
                };
                self.get_tmdb_json("/movie/upcoming", &query).await?
            }
            CatalogList::TopRated => {
                let query = LanguageQuery {
                    language,
                    region: Some(region),
                };
                self.get_tmdb_json("/movie/top_rated", &query).await?
            }
            CatalogList::PopularSeries => {
                let query = LanguageQuery {
                    language,
                    region: None,
                };
                self.get_tmdb_json("/tv/popular", &query).await?
            }
        };

        Ok(page.results.into_iter().take(CATALOG_LIMIT).collect())
    }

    /// Mixed movie + series search. Either half failing degrades to an empty
    /// half rather than failing the whole search.
    pub async fn search_multi(&self, query: &str) -> Vec<Value> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        let language = self.settings.language.as_str();
        let movie_query = SearchQuery {
            query,
            language,
            region: Some(self.settings.region.as_str()),
        };
        let tv_query = SearchQuery {
            query,
            language,
            region: None,
        };

        let (movies, series) = tokio::join!(
            self.get_tmdb_json::<_, Page>("/search/movie", &movie_query),
            self.get_tmdb_json::<_, Page>("/search/tv", &tv_query),
        );

        let movies = movies.unwrap_or_else(|err| {
            warn!(error = %err, "TMDB movie search failed");
            Page::default()
        });
        let series = series.unwrap_or_else(|err| {
            warn!(error = %err, "TMDB series search failed");
            Page::default()
        });

        merge_search_results(movies.results, series.results)
    }
}

fn tag_media_type(mut item: Value, media_type: &str) -> Value {
    if let Value::Object(map) = &mut item {
        map.insert("media_type".into(), Value::String(media_type.into()));
    }
    item
}

fn merge_search_results(movies: Vec<Value>, series: Vec<Value>) -> Vec<Value> {
    movies
        .into_iter()
        .map(|item| tag_media_type(item, "movie"))
        .chain(series.into_iter().map(|item| tag_media_type(item, "tv")))
        .take(SEARCH_LIMIT)
        .collect()
}

fn region_providers(
    mut response: WatchProvidersResponse,
    region: &str,
) -> Result<WatchProviders, ProviderError> {
    match response.results.remove(region) {
        Some(entry) => serde_json::from_value(entry).map_err(|e| {
            ProviderError::Parse(format!(
                "watch providers for region {region}: {e}"
            ))
        }),
        None => Ok(WatchProviders::default()),
    }
}

#[async_trait]
impl DetailsSource for TmdbClient {
    async fn movie_details(
        &self,
        id: &MovieId,
    ) -> Result<PrimaryDetails, ProviderError> {
        let query = DetailsQuery {
            language: &self.settings.language,
            append_to_response: "credits",
        };
        let raw: Value = self
            .get_tmdb_json(&format!("/movie/{id}"), &query)
            .await?;
        PrimaryDetails::from_payload(raw)
    }
}

#[async_trait]
impl WatchProviderSource for TmdbClient {
    async fn watch_providers(
        &self,
        id: &MovieId,
    ) -> Result<WatchProviders, ProviderError> {
        let response: WatchProvidersResponse = self
            .get_tmdb_json(
                &format!("/movie/{id}/watch/providers"),
                &Vec::<(&str, &str)>::new(),
            )
            .await?;
        region_providers(response, &self.settings.region)
    }
}
