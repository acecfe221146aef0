//! Display-list derivation for the project catalog and the community board.
//!
//! Everything here is a pure function of its inputs: the same collection and
//! selectors always yield the same ordered output, and the input slice is
//! never reordered or mutated.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{Category, CommunityPost, Difficulty, Project};
use crate::error::DomainError;

/// Category selector values meaning "no category filter".
pub const CATEGORY_SENTINELS: [&str; 2] = ["All", "All projects"];

/// Difficulty selector values meaning "no difficulty filter".
pub const DIFFICULTY_SENTINELS: [&str; 2] = ["All difficulties", "All"];

/// A filter selector: either the "all" sentinel or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Selector<T>
where
    T: std::str::FromStr<Err = DomainError>,
{
    fn parse(raw: Option<&str>, sentinels: &[&str]) -> Result<Self, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Selector::All),
            Some(s) if sentinels.contains(&s) => Ok(Selector::All),
            Some(s) => s.parse().map(Selector::Only),
        }
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Most viewed first.
    #[default]
    Trending,
    MostLiked,
    Newest,
    /// Keep the filtered order.
    Unsorted,
}

impl SortMode {
    /// Map a UI sort selector. Unknown values leave the order untouched.
    pub fn from_selector(raw: &str) -> Self {
        match raw.trim() {
            "Trending" => SortMode::Trending,
            "Most Liked" => SortMode::MostLiked,
            "Newest" => SortMode::Newest,
            _ => SortMode::Unsorted,
        }
    }
}

/// The four catalog selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub category: Selector<Category>,
    pub difficulty: Selector<Difficulty>,
    pub sort: SortMode,
}

impl ListQuery {
    /// Build a query from raw selector strings. Absent selectors fall back to
    /// the catalog defaults (no filters, trending order).
    pub fn from_selectors(
        search: Option<&str>,
        category: Option<&str>,
        difficulty: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            search: search.unwrap_or_default().to_string(),
            category: Selector::parse(category, &CATEGORY_SENTINELS)?,
            difficulty: Selector::parse(difficulty, &DIFFICULTY_SENTINELS)?,
            sort: sort.map(SortMode::from_selector).unwrap_or_default(),
        })
    }

    fn matches(&self, project: &Project, needle: &str) -> bool {
        let matches_search = needle.is_empty()
            || project.title.to_lowercase().contains(needle)
            || project.description.to_lowercase().contains(needle);

        matches_search
            && self.category.admits(&project.category)
            && self.difficulty.admits(&project.difficulty)
    }
}

/// Derive the ordered display subset of `projects` for `query`.
pub fn derive<'a>(projects: &'a [Project], query: &ListQuery) -> Vec<&'a Project> {
    let needle = query.search.to_lowercase();
    let mut visible: Vec<&Project> = projects
        .iter()
        .filter(|p| query.matches(p, &needle))
        .collect();

    match query.sort {
        SortMode::Trending => visible.sort_by_key(|p| Reverse(p.views)),
        SortMode::MostLiked => visible.sort_by_key(|p| Reverse(p.likes)),
        // Unparseable dates are `None`, which ranks below every real date.
        SortMode::Newest => visible.sort_by_key(|p| Reverse(published_timestamp(&p.published_at))),
        SortMode::Unsorted => {}
    }

    visible
}

/// Parse a `publishedAt` value into a unix timestamp (milliseconds).
///
/// Accepts plain dates (`2023-10-15`, read as UTC midnight), RFC 3339 and
/// naive date-times.
pub fn published_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Community board ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    /// Store order.
    #[default]
    Best,
    MostLikes,
    LeastLikes,
}

impl PostSort {
    pub fn from_selector(raw: &str) -> Self {
        match raw.trim() {
            "most" => PostSort::MostLikes,
            "least" => PostSort::LeastLikes,
            _ => PostSort::Best,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostSort::Best => "BEST COMMENTS",
            PostSort::MostLikes => "MOST LIKES",
            PostSort::LeastLikes => "LEAST LIKES",
        }
    }
}

pub fn order_posts(posts: &[CommunityPost], sort: PostSort) -> Vec<&CommunityPost> {
    let mut ordered: Vec<&CommunityPost> = posts.iter().collect();
    match sort {
        PostSort::Best => {}
        PostSort::MostLikes => ordered.sort_by_key(|p| Reverse(p.likes)),
        PostSort::LeastLikes => ordered.sort_by_key(|p| p.likes),
    }
    ordered
}

/// Headline numbers shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub post_count: usize,
    pub total_votes: i64,
}

pub fn board_stats(posts: &[CommunityPost]) -> BoardStats {
    BoardStats {
        post_count: posts.len(),
        total_votes: posts.iter().map(|p| p.likes).sum(),
    }
}
