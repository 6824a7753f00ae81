use crate::config::{DEFAULT_COURSES_FILE, DEFAULT_DIRECTORY_FILE, DEFAULT_KNOWLEDGE_DIR};
use crate::core::plan_parser::DEFAULT_PLAN_ANCHOR;
use crate::core::similarity::DEFAULT_CUTOFF;
use crate::core::ConfigProvider;
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub knowledge_dir: String,
    pub directory_file: String,
    pub courses_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            knowledge_dir: DEFAULT_KNOWLEDGE_DIR.to_string(),
            directory_file: DEFAULT_DIRECTORY_FILE.to_string(),
            courses_file: DEFAULT_COURSES_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub match_cutoff: f64,
    pub seed: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            match_cutoff: DEFAULT_CUTOFF,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub anchor: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_PLAN_ANCHOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KNOWLEDGE_DIR})；未設定的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn knowledge_dir(&self) -> &str {
        &self.catalog.knowledge_dir
    }

    fn directory_file(&self) -> &str {
        &self.catalog.directory_file
    }

    fn courses_file(&self) -> &str {
        &self.catalog.courses_file
    }

    fn match_cutoff(&self) -> f64 {
        self.resolver.match_cutoff
    }

    fn plan_anchor(&self) -> &str {
        &self.parser.anchor
    }

    fn seed(&self) -> Option<u64> {
        self.resolver.seed
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
