use serde::{Deserialize, Serialize};

/// Highest rating a user can give a movie.
pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has rated.
///
/// Field names on disk follow the snapshot layout written by earlier
/// versions of the app, so existing `watched` slots keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "poster", default)]
    pub poster_url: String,
    #[serde(rename = "imdbRating", default)]
    pub external_rating: Option<f32>,
    #[serde(rename = "runtime", default)]
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
    #[serde(rename = "countRatingDecisions", default)]
    pub rating_revision_count: u32,
}

impl WatchedEntry {
    /// Whether the user rating is inside `1..=MAX_USER_RATING`.
    pub fn has_valid_rating(&self) -> bool {
        (1..=MAX_USER_RATING).contains(&self.user_rating)
    }
}

/// Aggregate figures shown above the watched list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_external_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime_minutes: f32,
}

impl WatchedSummary {
    /// Averages only count entries where the value is known.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_external_rating: average(entries.iter().filter_map(|e| e.external_rating)),
            avg_user_rating: average(entries.iter().map(|e| f32::from(e.user_rating))),
            avg_runtime_minutes: average(
                entries
                    .iter()
                    .filter_map(|e| e.runtime_minutes)
                    .map(|m| m as f32),
            ),
        }
    }
}

fn average(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0_f32, 0_u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, rating: u8, imdb: Option<f32>, runtime: Option<u32>) -> WatchedEntry {
        WatchedEntry {
            id: id.into(),
            title: "Test".into(),
            year: "2010".into(),
            poster_url: String::new(),
            external_rating: imdb,
            runtime_minutes: runtime,
            user_rating: rating,
            rating_revision_count: 1,
        }
    }

    #[test]
    fn test_deserialize_legacy_snapshot() {
        let json = r#"[{
            "imdbID": "tt1375666",
            "title": "Inception",
            "year": "2010",
            "poster": "https://m.media-amazon.com/images/M/inception.jpg",
            "imdbRating": 8.8,
            "runtime": 148,
            "userRating": 9,
            "countRatingDecisions": 2
        }]"#;

        let entries: Vec<WatchedEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "tt1375666");
        assert_eq!(entries[0].external_rating, Some(8.8));
        assert_eq!(entries[0].runtime_minutes, Some(148));
        assert_eq!(entries[0].user_rating, 9);
        assert_eq!(entries[0].rating_revision_count, 2);
    }

    #[test]
    fn test_deserialize_null_numbers() {
        // NaN values were stored as null.
        let json = r#"{ "imdbID": "tt0000001", "title": "X", "imdbRating": null,
                        "runtime": null, "userRating": 5 }"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert!(entry.external_rating.is_none());
        assert!(entry.runtime_minutes.is_none());
        assert_eq!(entry.rating_revision_count, 0);
    }

    #[test]
    fn test_valid_rating_bounds() {
        assert!(!entry("a", 0, None, None).has_valid_rating());
        assert!(entry("a", 1, None, None).has_valid_rating());
        assert!(entry("a", 10, None, None).has_valid_rating());
        assert!(!entry("a", 11, None, None).has_valid_rating());
    }

    #[test]
    fn test_summary_skips_unknown_values() {
        let entries = vec![
            entry("a", 8, Some(7.0), Some(100)),
            entry("b", 6, None, Some(120)),
            entry("c", 10, Some(9.0), None),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.avg_user_rating, 8.0);
        assert_eq!(summary.avg_external_rating, 8.0);
        assert_eq!(summary.avg_runtime_minutes, 110.0);
    }

    #[test]
    fn test_summary_empty() {
        let summary = WatchedSummary::from_entries(&[]);
        assert_eq!(summary, WatchedSummary::default());
    }
}
