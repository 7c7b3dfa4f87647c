use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        upstream::RetryPolicy, CatalogService, RecommendationEngine, ResultEnricher,
        UpstreamClient, UpstreamTransport,
    },
};

/// Shared application state
///
/// Holds no mutable data; every request works only with what it fetches.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub recommendations: RecommendationEngine,
}

impl AppState {
    /// Wires the services over the given transport
    pub fn new(config: &Config, transport: Arc<dyn UpstreamTransport>) -> Self {
        let upstream = UpstreamClient::new(
            transport,
            config.tmdb_api_key.clone(),
            RetryPolicy::from_config(config),
        );
        Self::with_client(config, upstream)
    }

    /// Wires the services over the real TMDB transport
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::from_config(config)?;
        Ok(Self::with_client(config, upstream))
    }

    fn with_client(config: &Config, upstream: UpstreamClient) -> Self {
        let enricher = ResultEnricher::new(config.image_base_url.clone());
        Self {
            catalog: CatalogService::new(upstream.clone(), enricher.clone()),
            recommendations: RecommendationEngine::new(upstream, enricher),
        }
    }
}
