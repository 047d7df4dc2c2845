use chrono::{DateTime, NaiveDate, Utc};
use filmi_model::{
    CompositeRecord, DerivedFlags, EditorialBlog, MediaRef, MovieId,
    WatchProviders,
};

use super::ResolverSettings;
use crate::details::PrimaryDetails;

/// Outputs of the secondary fetch phase, each already defaulted on failure.
#[derive(Debug, Default)]
pub(crate) struct SecondaryData {
    pub trailer: Option<MediaRef>,
    pub playlist: Option<MediaRef>,
    pub watch_providers: WatchProviders,
    pub editorial_blog: EditorialBlog,
}

pub fn derive_flags(
    details: &PrimaryDetails,
    today: NaiveDate,
    settings: &ResolverSettings,
) -> DerivedFlags {
    let popularity = details.popularity();
    // Unreleased titles count as new.
    let is_new = details
        .parsed_release_date()
        .map(|released| {
            today.signed_duration_since(released).num_days()
                < settings.new_release_days
        })
        .unwrap_or(false);

    DerivedFlags {
        is_trending: popularity > settings.trending_popularity,
        is_new,
        popularity,
        rating_score: details.rating(),
    }
}

/// Build a complete record from one resolution attempt. Nothing is carried
/// over from any previously stored record.
pub(crate) fn assemble(
    id: MovieId,
    details: PrimaryDetails,
    secondary: SecondaryData,
    now: DateTime<Utc>,
    settings: &ResolverSettings,
) -> CompositeRecord {
    let flags = derive_flags(&details, now.date_naive(), settings);
    let title = details.title().map(str::to_owned);
    let poster_path = details.poster_path().map(str::to_owned);
    let release_date = details.release_date().map(str::to_owned);

    CompositeRecord {
        id,
        title,
        poster_path,
        release_date,
        details: details.into_raw(),
        trailer: secondary.trailer,
        playlist: secondary.playlist,
        editorial_blog: secondary.editorial_blog,
        watch_providers: secondary.watch_providers,
        flags,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("date")
    }

    #[test]
    fn popularity_threshold_is_strict() {
        let settings = ResolverSettings::default();
        let at_threshold = PrimaryDetails::new(json!({"popularity": 100.0}));
        let above = PrimaryDetails::new(json!({"popularity": 100.5}));

        assert!(!derive_flags(&at_threshold, today(), &settings).is_trending);
        assert!(derive_flags(&above, today(), &settings).is_trending);
    }

    #[test]
    fn release_recency_uses_day_difference() {
        let settings = ResolverSettings::default();
        let recent = PrimaryDetails::new(json!({"release_date": "2026-08-18"}));
        let edge = PrimaryDetails::new(json!({"release_date": "2026-08-17"}));
        let upcoming = PrimaryDetails::new(json!({"release_date": "2026-12-25"}));
        let unknown = PrimaryDetails::new(json!({"release_date": ""}));

        assert!(derive_flags(&recent, today(), &settings).is_new);
        assert!(!derive_flags(&edge, today(), &settings).is_new);
        assert!(derive_flags(&upcoming, today(), &settings).is_new);
        assert!(!derive_flags(&unknown, today(), &settings).is_new);
    }

    #[test]
    fn rating_and_popularity_pass_through() {
        let details = PrimaryDetails::new(json!({
            "popularity": 42.5,
            "vote_average": 8.4
        }));
        let flags = derive_flags(&details, today(), &ResolverSettings::default());
        assert_eq!(flags.popularity, 42.5);
        assert_eq!(flags.rating_score, 8.4);
    }

    #[test]
    fn assemble_copies_summary_fields_from_details() {
        let details = PrimaryDetails::new(json!({
            "title": "Inception",
            "poster_path": "/poster.jpg",
            "release_date": "2010-07-15"
        }));
        let now = Utc::now();
        let record = assemble(
            MovieId::parse("27205").expect("id"),
            details,
            SecondaryData::default(),
            now,
            &ResolverSettings::default(),
        );

        assert_eq!(record.title.as_deref(), Some("Inception"));
        assert_eq!(record.poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(record.details["release_date"], "2010-07-15");
        assert_eq!(record.last_updated, now);
        assert!(record.editorial_blog.is_empty());
    }
}
