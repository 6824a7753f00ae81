use crate::core::catalog::CatalogStore;
use crate::core::course_resolver::{resolve_courses, CourseRequirement};
use crate::core::plan_parser::{PlanLayout, PlanParser};
use crate::core::program_resolver::ProgramResolver;
use crate::core::{ConfigProvider, PageFetcher, Pipeline, Storage};
use crate::domain::model::{
    CourseRequest, PlanExtraction, Recommendation, ResolvedCourse, SemesterSlot,
};
use crate::utils::error::{AdvisorError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// One (major, semester) request run against a shared catalog.
pub struct RecommendationPipeline<S: Storage, C: ConfigProvider, F: PageFetcher> {
    storage: S,
    config: C,
    store: Arc<CatalogStore>,
    parser: PlanParser<F>,
    request: CourseRequest,
    rng: Mutex<StdRng>,
}

impl<S: Storage, C: ConfigProvider, F: PageFetcher> RecommendationPipeline<S, C, F> {
    pub fn new(
        storage: S,
        config: C,
        store: Arc<CatalogStore>,
        fetcher: F,
        request: CourseRequest,
    ) -> Result<Self> {
        let parser = PlanParser::with_layout(fetcher, config.plan_anchor(), PlanLayout::default())?;
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            storage,
            config,
            store,
            parser,
            request,
            rng: Mutex::new(rng),
        })
    }

    pub fn request(&self) -> &CourseRequest {
        &self.request
    }

    fn recommendation(
        &self,
        extraction: &PlanExtraction,
        courses: Vec<ResolvedCourse>,
        message: String,
    ) -> Recommendation {
        Recommendation {
            major: self.request.major.clone(),
            semester: self.request.semester.clone(),
            program: extraction.program.as_ref().map(|p| p.name.clone()),
            plan_url: extraction.program.as_ref().map(|p| p.url.clone()),
            courses,
            message,
            generated_at: chrono::Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: PageFetcher> Pipeline for RecommendationPipeline<S, C, F> {
    async fn extract(&self) -> Result<PlanExtraction> {
        let slot = SemesterSlot::parse(&self.request.semester)?;

        let program = ProgramResolver::with_cutoff(self.store.programs(), self.config.match_cutoff())
            .resolve(&self.request.major);

        let plan = match &program {
            Some(matched) => self.parser.parse(&matched.url).await,
            None => Vec::new(),
        };

        Ok(PlanExtraction {
            slot,
            program,
            plan,
        })
    }

    async fn transform(&self, extraction: PlanExtraction) -> Result<Recommendation> {
        let major = &self.request.major;

        if extraction.program.is_none() {
            let not_found =
                AdvisorError::not_found(format!("No url found for the degree program: {}", major));
            tracing::warn!("{}", not_found);
            return Ok(self.recommendation(&extraction, Vec::new(), not_found.to_string()));
        }

        if extraction.plan.is_empty() {
            let not_found =
                AdvisorError::not_found(format!("No plan of study found for the major: {}", major));
            tracing::warn!("{}", not_found);
            return Ok(self.recommendation(&extraction, Vec::new(), not_found.to_string()));
        }

        let slot = extraction.slot;
        tracing::info!("Looking for courses in {}", slot);
        let Some(entry) = extraction.plan.iter().find(|entry| slot.matches(entry)) else {
            let not_found =
                AdvisorError::not_found(format!("No courses found for {}, {}", major, slot));
            tracing::warn!("{}", not_found);
            return Ok(self.recommendation(&extraction, Vec::new(), not_found.to_string()));
        };

        tracing::info!("Found {} courses for {}, {}", entry.courses.len(), major, slot);
        let requirements: Vec<CourseRequirement> =
            entry.courses.iter().map(CourseRequirement::from).collect();

        let courses = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            resolve_courses(requirements, &self.store, &mut *rng)
        };

        let message = format!("Found courses for {}, {}", major, slot);
        Ok(self.recommendation(&extraction, courses, message))
    }

    async fn load(&self, recommendation: &Recommendation) -> Result<Option<String>> {
        let Some(path) = self.config.output_path() else {
            return Ok(None);
        };

        let json = serde_json::to_string_pretty(recommendation)?;
        tracing::debug!("Writing recommendation ({} bytes) to {}", json.len(), path);
        self.storage.write_file(path, json.as_bytes()).await?;
        Ok(Some(path.to_string()))
    }
}
