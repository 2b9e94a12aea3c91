//! Home page catalog: named rows of movies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::movie::MovieSummary;

/// Category rendered as the featured carousel.
pub const FEATURED_CATEGORY: &str = "Hot Movies";

/// Category name to movies, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    rows: IndexMap<String, Vec<MovieSummary>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends (or replaces) a row.
    pub fn insert(&mut self, category: impl Into<String>, movies: Vec<MovieSummary>) {
        self.rows.insert(category.into(), movies);
    }

    /// Iterates rows in server order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[MovieSummary])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the featured carousel row, if the server sent one.
    #[must_use]
    pub fn featured(&self) -> Option<&[MovieSummary]> {
        self.row(FEATURED_CATEGORY)
    }

    /// Returns one row by name.
    #[must_use]
    pub fn row(&self, category: &str) -> Option<&[MovieSummary]> {
        self.rows.get(category).map(Vec::as_slice)
    }

    /// Category names in server order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
