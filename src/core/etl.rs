use crate::core::Pipeline;
use crate::domain::model::Recommendation;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extract and transform only; nothing is written.
    pub async fn recommend(&self) -> Result<Recommendation> {
        let started = Instant::now();

        tracing::info!("Extracting plan of study...");
        let extraction = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} plan entries (program: {})",
            extraction.plan.len(),
            extraction
                .program
                .as_ref()
                .map(|p| p.name.as_str())
                .unwrap_or("none")
        );

        tracing::info!("Resolving courses...");
        let recommendation = self.pipeline.transform(extraction).await?;
        tracing::info!(
            "Resolved {} courses in {:?}",
            recommendation.courses.len(),
            started.elapsed()
        );

        Ok(recommendation)
    }

    pub async fn run(&self) -> Result<Recommendation> {
        let recommendation = self.recommend().await?;

        if let Some(output_path) = self.pipeline.load(&recommendation).await? {
            tracing::info!("Output saved to: {}", output_path);
        }

        Ok(recommendation)
    }
}
