use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{genre_id, LanguagePreference, MovieRecord, RecommendationRequest, SortSpec},
    services::{
        enricher::ResultEnricher,
        merge::merge_unique,
        upstream::{endpoints, QueryParams, UpstreamClient},
    },
};

pub const MAX_RECOMMENDATIONS: usize = 10;

/// Generates recommendations seeded by a favorite movie
///
/// Three sources are combined, in priority order:
/// 1. discovery by genre, minimum rating and the favorite's keywords
/// 2. the upstream's own recommendations for the favorite
/// 3. the most popular titles in the genre, so sparse keyword matches still
///    produce a full list
#[derive(Clone)]
pub struct RecommendationEngine {
    upstream: UpstreamClient,
    enricher: ResultEnricher,
}

impl RecommendationEngine {
    pub fn new(upstream: UpstreamClient, enricher: ResultEnricher) -> Self {
        Self { upstream, enricher }
    }

    #[tracing::instrument(skip(self, request), fields(favorite = %request.favorite_title, genre = %request.genre))]
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let genre = genre_id(&request.genre)
            .ok_or_else(|| AppError::InvalidInput("Invalid genre provided".to_string()))?;

        let favorite_id = self.resolve_favorite(&request.favorite_title).await?;
        let keywords = self.keyword_filter(favorite_id).await?;

        let by_keywords = QueryParams::new()
            .with("with_genres", genre)
            .with("vote_average.gte", request.min_rating)
            .with("sort_by", SortSpec::PopularityDesc)
            .with_opt("with_keywords", (!keywords.is_empty()).then_some(&keywords))
            .with_opt("with_original_language", language);
        let popular_in_genre = QueryParams::new()
            .with("with_genres", genre)
            .with("sort_by", SortSpec::PopularityDesc);
        let native_endpoint = endpoints::movie_recommendations(favorite_id);

        let (matched, native, popular) = tokio::try_join!(
            self.upstream
                .fetch_results(endpoints::DISCOVER_MOVIE, by_keywords),
            self.upstream.fetch_results(&native_endpoint, QueryParams::new()),
            self.upstream
                .fetch_results(endpoints::DISCOVER_MOVIE, popular_in_genre),
        )?;

        tracing::debug!(
            matched = matched.len(),
            native = native.len(),
            popular = popular.len(),
            "Recommendation sources fetched"
        );

        let mut movies = merge_unique([matched, native, popular], Some(favorite_id));
        movies.truncate(MAX_RECOMMENDATIONS);

        if movies.is_empty() {
            return Err(AppError::NotFound("No recommended movies found".to_string()));
        }

        tracing::info!(
            favorite_id,
            recommendations = movies.len(),
            "Recommendations generated"
        );

        Ok(self.enricher.enrich_all(movies))
    }

    /// Upstream id of the first title search hit
    async fn resolve_favorite(&self, title: &str) -> AppResult<i64> {
        let hits = self
            .upstream
            .fetch_results(endpoints::SEARCH_MOVIE, QueryParams::new().with("query", title))
            .await?;

        let first = hits
            .first()
            .ok_or_else(|| AppError::NotFound("Favorite movie not found".to_string()))?;

        first.id().ok_or_else(|| {
            AppError::ExternalApi("Favorite movie search hit has no id".to_string())
        })
    }

    /// Comma-joined keyword ids of a movie, empty when it has none
    async fn keyword_filter(&self, movie_id: i64) -> AppResult<String> {
        let document = self
            .upstream
            .fetch(&endpoints::movie_keywords(movie_id), QueryParams::new())
            .await?;

        let ids: Vec<String> = document
            .get("keywords")
            .and_then(Value::as_array)
            .map(|keywords| {
                keywords
                    .iter()
                    .filter_map(|keyword| keyword.get("id").and_then(Value::as_i64))
                    .map(|id| id.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids.join(","))
    }
}
