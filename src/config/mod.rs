pub mod toml_config;

use crate::core::plan_parser::DEFAULT_PLAN_ANCHOR;
use crate::core::similarity::DEFAULT_CUTOFF;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_KNOWLEDGE_DIR: &str = "knowledge";
pub const DEFAULT_DIRECTORY_FILE: &str = "degree_programs.csv";
pub const DEFAULT_COURSES_FILE: &str = "courses.csv";

/// Settings for library callers that do not go through the CLI or a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSettings {
    pub knowledge_dir: String,
    pub directory_file: String,
    pub courses_file: String,
    pub match_cutoff: f64,
    pub plan_anchor: String,
    pub seed: Option<u64>,
    pub output_path: Option<String>,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            knowledge_dir: DEFAULT_KNOWLEDGE_DIR.to_string(),
            directory_file: DEFAULT_DIRECTORY_FILE.to_string(),
            courses_file: DEFAULT_COURSES_FILE.to_string(),
            match_cutoff: DEFAULT_CUTOFF,
            plan_anchor: DEFAULT_PLAN_ANCHOR.to_string(),
            seed: None,
            output_path: None,
        }
    }
}

impl ConfigProvider for AdvisorSettings {
    fn knowledge_dir(&self) -> &str {
        &self.knowledge_dir
    }

    fn directory_file(&self) -> &str {
        &self.directory_file
    }

    fn courses_file(&self) -> &str {
        &self.courses_file
    }

    fn match_cutoff(&self) -> f64 {
        self.match_cutoff
    }

    fn plan_anchor(&self) -> &str {
        &self.plan_anchor
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

impl Validate for AdvisorSettings {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "advisor-etl")]
#[command(about = "Resolve a degree program's plan of study into concrete course recommendations")]
pub struct CliConfig {
    /// Degree program, e.g. "B.S. in Computer Science"
    #[arg(long)]
    pub major: String,

    /// Semester number (1 = first Fall, 2 = first Spring, ...)
    #[arg(long)]
    pub semester: String,

    /// TOML configuration file; catalog and resolver flags below are ignored when set
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_KNOWLEDGE_DIR)]
    pub knowledge_dir: String,

    #[arg(long, default_value = DEFAULT_DIRECTORY_FILE)]
    pub directory_file: String,

    #[arg(long, default_value = DEFAULT_COURSES_FILE)]
    pub courses_file: String,

    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    pub match_cutoff: f64,

    #[arg(long, default_value = DEFAULT_PLAN_ANCHOR)]
    pub anchor: String,

    /// Seed for placeholder course selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the recommendation JSON to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Resolve a requirement list (JSON array) instead of fetching the plan
    #[arg(long)]
    pub requirements: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn knowledge_dir(&self) -> &str {
        &self.knowledge_dir
    }

    fn directory_file(&self) -> &str {
        &self.directory_file
    }

    fn courses_file(&self) -> &str {
        &self.courses_file
    }

    fn match_cutoff(&self) -> f64 {
        self.match_cutoff
    }

    fn plan_anchor(&self) -> &str {
        &self.anchor
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("major", &self.major)?;
        validate_provider(self)
    }
}
