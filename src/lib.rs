pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, AdvisorSettings};

pub use adapters::{LocalStorage, ReqwestFetcher};
pub use crate::core::{
    catalog::CatalogStore, etl::EtlEngine, pipeline::RecommendationPipeline, PageFetcher,
};
pub use domain::model::{CourseRequest, Recommendation, ResolvedCourse};
pub use utils::error::{AdvisorError, Result};

use std::sync::Arc;

/// Program match, plan retrieval, semester selection and course backfill for
/// one request, with default settings and nothing written to disk.
///
/// Soft failures (unknown major, unreachable page, missing semester) come back
/// as an empty course list with an explanatory `message`.
pub async fn get_course_recommendations<F: PageFetcher>(
    store: Arc<CatalogStore>,
    fetcher: F,
    major: &str,
    semester: &str,
) -> Result<Recommendation> {
    let pipeline = RecommendationPipeline::new(
        LocalStorage::new(".".to_string()),
        AdvisorSettings::default(),
        store,
        fetcher,
        CourseRequest::new(major, semester),
    )?;
    EtlEngine::new(pipeline).recommend().await
}
