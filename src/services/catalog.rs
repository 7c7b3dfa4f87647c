/// List-style catalog queries
///
/// Each query makes one or two upstream calls, trims the listing to the
/// requested count and enriches every record it returns.
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{GenreId, LanguagePreference, MovieRecord, Paging, SortSpec},
    services::{
        enricher::ResultEnricher,
        merge::merge_unique,
        upstream::{endpoints, QueryParams, UpstreamClient},
    },
};

/// Minimum vote count for the top-rated listing, keeps low-sample titles out
const TOP_RATED_MIN_VOTES: u32 = 1000;
const SORTED_MAX_COUNT: usize = 50;

#[derive(Clone)]
pub struct CatalogService {
    upstream: UpstreamClient,
    enricher: ResultEnricher,
}

impl CatalogService {
    pub fn new(upstream: UpstreamClient, enricher: ResultEnricher) -> Self {
        Self { upstream, enricher }
    }

    /// Genre list as reported by the upstream catalog
    pub async fn genres(&self) -> AppResult<Vec<Value>> {
        let document = self
            .upstream
            .fetch(endpoints::GENRE_LIST, QueryParams::new())
            .await?;

        let genres = document
            .get("genres")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        tracing::info!(genres = genres.len(), "Genre list fetched");
        Ok(genres)
    }

    pub async fn popular(
        &self,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let params = discover_params(SortSpec::PopularityDesc, paging, language);
        self.discover(params, paging.count).await
    }

    /// Weekly trending titles
    ///
    /// The trending endpoint has no language filter, so the preference is
    /// applied to the fetched page before trimming.
    pub async fn trending(
        &self,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let mut movies = self
            .upstream
            .fetch_results(
                endpoints::TRENDING_WEEK,
                QueryParams::new().with("page", paging.page),
            )
            .await?;

        if let Some(language) = language {
            movies = ResultEnricher::retain_language(movies, language);
        }

        Ok(self.finish(movies, paging.count))
    }

    pub async fn top_rated(
        &self,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let params = discover_params(SortSpec::VoteAverageDesc, paging, language)
            .with("vote_count.gte", TOP_RATED_MIN_VOTES);
        self.discover(params, paging.count).await
    }

    /// Titles releasing today (UTC) or later
    pub async fn upcoming(
        &self,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d");
        let params = discover_params(SortSpec::PopularityDesc, paging, language)
            .with("release_date.gte", today);
        self.discover(params, paging.count).await
    }

    /// Movies in a genre; an empty listing is returned as-is
    pub async fn by_genre(
        &self,
        genre: &str,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let genre = resolve_genre(genre)?;
        let params = QueryParams::new()
            .with("with_genres", genre.0)
            .with("page", paging.page)
            .with_opt("with_original_language", language);
        self.discover(params, paging.count).await
    }

    /// Movies in a genre in the requested order; an empty listing is not found
    pub async fn by_genre_sorted(
        &self,
        genre: &str,
        sort_by: &str,
        paging: Paging,
        language: Option<LanguagePreference>,
    ) -> AppResult<Vec<MovieRecord>> {
        let sort: SortSpec = sort_by.parse()?;
        if paging.count == 0 || paging.count > SORTED_MAX_COUNT {
            return Err(AppError::InvalidInput(format!(
                "count must be between 1 and {}",
                SORTED_MAX_COUNT
            )));
        }
        if paging.page == 0 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        let genre = resolve_genre(genre)?;

        let params = discover_params(sort, paging, language).with("with_genres", genre.0);
        let movies = self.discover(params, paging.count).await?;

        if movies.is_empty() {
            return Err(AppError::NotFound(
                "No movies found for the specified genre".to_string(),
            ));
        }

        Ok(movies)
    }

    /// Title search widened with the best matching keyword
    ///
    /// Title hits come first; the keyword's discovery results follow. Each
    /// source is trimmed to `count` before merging, and the merged list again.
    pub async fn search(&self, query: &str, paging: Paging) -> AppResult<Vec<MovieRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let (mut title_hits, keyword_document) = tokio::try_join!(
            self.upstream.fetch_results(
                endpoints::SEARCH_MOVIE,
                QueryParams::new()
                    .with("query", query)
                    .with("page", paging.page),
            ),
            self.upstream.fetch(
                endpoints::SEARCH_KEYWORD,
                QueryParams::new().with("query", query),
            ),
        )?;
        title_hits.truncate(paging.count);

        let keyword_id = keyword_document
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|keyword| keyword.get("id"))
            .and_then(Value::as_i64);

        let mut keyword_hits = Vec::new();
        if let Some(keyword_id) = keyword_id {
            keyword_hits = self
                .upstream
                .fetch_results(
                    endpoints::DISCOVER_MOVIE,
                    QueryParams::new()
                        .with("with_keywords", keyword_id)
                        .with("page", paging.page),
                )
                .await?;
            keyword_hits.truncate(paging.count);
        }

        let movies = merge_unique([title_hits, keyword_hits], None);

        tracing::info!(
            query = %query,
            keyword_id = ?keyword_id,
            results = movies.len(),
            "Search completed"
        );

        if movies.is_empty() {
            return Err(AppError::NotFound(
                "No movies found for this search query".to_string(),
            ));
        }

        Ok(self.finish(movies, paging.count))
    }

    /// Full details for one movie
    pub async fn movie_details(&self, movie_id: i64) -> AppResult<MovieRecord> {
        let document = self
            .upstream
            .fetch(&endpoints::movie(movie_id), QueryParams::new())
            .await?;

        let movie = MovieRecord::from_value(document).ok_or_else(|| {
            AppError::ExternalApi("Movie details response is not an object".to_string())
        })?;

        Ok(self.enricher.enrich(movie))
    }

    async fn discover(&self, params: QueryParams, count: usize) -> AppResult<Vec<MovieRecord>> {
        let movies = self
            .upstream
            .fetch_results(endpoints::DISCOVER_MOVIE, params)
            .await?;
        Ok(self.finish(movies, count))
    }

    fn finish(&self, mut movies: Vec<MovieRecord>, count: usize) -> Vec<MovieRecord> {
        movies.truncate(count);
        self.enricher.enrich_all(movies)
    }
}

fn discover_params(
    sort: SortSpec,
    paging: Paging,
    language: Option<LanguagePreference>,
) -> QueryParams {
    QueryParams::new()
        .with("sort_by", sort)
        .with("page", paging.page)
        .with_opt("with_original_language", language)
}

fn resolve_genre(genre: &str) -> AppResult<GenreId> {
    GenreId::resolve(genre)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid genre provided: {}", genre)))
}
