use crate::domain::model::{PlanExtraction, Recommendation};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn knowledge_dir(&self) -> &str;
    fn directory_file(&self) -> &str;
    fn courses_file(&self) -> &str;
    fn match_cutoff(&self) -> f64;
    fn plan_anchor(&self) -> &str;
    fn seed(&self) -> Option<u64>;
    fn output_path(&self) -> Option<&str>;
}

/// Retrieves the raw HTML of a plan-of-study page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PlanExtraction>;
    async fn transform(&self, extraction: PlanExtraction) -> Result<Recommendation>;
    async fn load(&self, recommendation: &Recommendation) -> Result<Option<String>>;
}
