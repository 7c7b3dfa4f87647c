use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AppError;

/// Original-language filter understood by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguagePreference {
    #[default]
    En,
    Hi,
}

impl LanguagePreference {
    /// Maps any input onto a supported language, falling back to English
    pub fn normalize(lang: &str) -> Self {
        match lang {
            "hi" => LanguagePreference::Hi,
            _ => LanguagePreference::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LanguagePreference::En => "en",
            LanguagePreference::Hi => "hi",
        }
    }
}

impl Display for LanguagePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sort orders accepted by the sorted genre listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSpec {
    PopularityAsc,
    PopularityDesc,
    VoteAverageAsc,
    VoteAverageDesc,
    ReleaseDateAsc,
    ReleaseDateDesc,
}

impl SortSpec {
    pub const ALL: [SortSpec; 6] = [
        SortSpec::PopularityAsc,
        SortSpec::PopularityDesc,
        SortSpec::VoteAverageAsc,
        SortSpec::VoteAverageDesc,
        SortSpec::ReleaseDateAsc,
        SortSpec::ReleaseDateDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortSpec::PopularityAsc => "popularity.asc",
            SortSpec::PopularityDesc => "popularity.desc",
            SortSpec::VoteAverageAsc => "vote_average.asc",
            SortSpec::VoteAverageDesc => "vote_average.desc",
            SortSpec::ReleaseDateAsc => "release_date.asc",
            SortSpec::ReleaseDateDesc => "release_date.desc",
        }
    }

    fn valid_values() -> String {
        SortSpec::ALL
            .iter()
            .map(SortSpec::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SortSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortSpec::ALL
            .into_iter()
            .find(|spec| spec.as_str() == s)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid sort_by value. Must be one of: {}",
                    SortSpec::valid_values()
                ))
            })
    }
}

impl Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many results to return and which upstream page to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub count: usize,
    pub page: u32,
}

impl Paging {
    pub fn new(count: usize, page: u32) -> Self {
        Self { count, page }
    }
}

/// Body of `POST /recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    #[serde(rename = "fav_movie", alias = "favorite", alias = "favorite_title")]
    pub favorite_title: String,
    pub genre: String,
    #[serde(rename = "min_ratings", alias = "min_rating")]
    pub min_rating: f64,
}
