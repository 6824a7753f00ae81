pub mod catalog;
pub mod course_resolver;
pub mod etl;
pub mod pipeline;
pub mod plan_parser;
pub mod program_resolver;
pub mod similarity;

pub use crate::domain::model::{PlanEntry, Recommendation, ResolvedCourse};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
