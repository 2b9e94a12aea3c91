//! Movie catalog entries.

use serde::{Deserialize, Serialize};
use url::Url;

/// Server-side movie identifier.
pub type MovieId = u64;

/// A movie as it appears on cards in rows, grids, and recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Movie identifier.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Release year, when known.
    #[serde(default)]
    pub year: Option<u32>,
    /// Genre label.
    #[serde(default)]
    pub genre: String,
    /// Poster path or absolute URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Coins charged to play; zero means free.
    #[serde(default)]
    pub coins: u64,
    /// Whether the movie is on the caller's watchlist.
    #[serde(default)]
    pub is_watchlisted: bool,
}

impl MovieSummary {
    /// Returns true if playing this movie costs coins.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.coins > 0
    }

    /// Returns the poster URL resolved against the API origin.
    #[must_use]
    pub fn thumbnail_url(&self, base: &Url) -> String {
        resolve_media_url(&self.thumbnail, base)
    }

    /// Returns the "year • genre" caption shown under the title.
    #[must_use]
    pub fn caption(&self) -> String {
        match self.year {
            Some(year) => format!("{year} • {}", self.genre),
            None => self.genre.clone(),
        }
    }
}

/// Full movie page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Card-level fields, including the watchlist flag.
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Director credit.
    #[serde(default)]
    pub director: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Opaque player embed markup, rendered by the host as-is.
    #[serde(default)]
    pub embedded: Option<String>,
    /// Related movies shown below the player.
    #[serde(default)]
    pub recommended_movies: Vec<MovieSummary>,
}

impl MovieDetail {
    /// Returns the director credit, or "Unknown".
    #[must_use]
    pub fn director_or_unknown(&self) -> &str {
        self.director.as_deref().unwrap_or("Unknown")
    }
}

/// A watchlist row as returned by the watchlist endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Watchlist entry identifier.
    pub id: u64,
    /// The listed movie.
    pub movie: MovieSummary,
}

/// Resolves a media path served by the API.
///
/// Absolute `http`/`https` references are returned unchanged; anything else
/// is appended to the API origin.
#[must_use]
pub fn resolve_media_url(reference: &str, base: &Url) -> String {
    if reference.starts_with("http") {
        return reference.to_string();
    }
    let origin = base.origin().ascii_serialization();
    if reference.starts_with('/') {
        format!("{origin}{reference}")
    } else {
        format!("{origin}/{reference}")
    }
}
