use advisor_etl::core::course_resolver::{parse_requirement_document, resolve_records};
use advisor_etl::core::ConfigProvider;
use advisor_etl::utils::error::ErrorSeverity;
use advisor_etl::utils::logger;
use advisor_etl::utils::validation::{validate_non_empty_string, Validate};
use advisor_etl::{
    AdvisorError, CatalogStore, CliConfig, CourseRequest, EtlEngine, LocalStorage,
    RecommendationPipeline, ReqwestFetcher, TomlConfig,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting advisor-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(&cli, config).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli, cli.clone()).await,
    };

    if let Err(e) = result {
        if e.is_soft() {
            tracing::warn!("advisor-etl finished with a recoverable error: {}", e);
        } else {
            tracing::error!(
                "advisor-etl failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
        }
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<C>(cli: &CliConfig, config: C) -> Result<(), AdvisorError>
where
    C: ConfigProvider + Validate + 'static,
{
    validate_non_empty_string("major", &cli.major)?;
    config.validate()?;

    let storage = LocalStorage::new(".".to_string());
    let store = Arc::new(CatalogStore::load(&storage, &config).await?);

    // 直接解析外部提供的需求清單，不抓取修課計畫
    if let Some(path) = &cli.requirements {
        let text = tokio::fs::read_to_string(path).await?;
        let records = parse_requirement_document(&text)?;
        let mut rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let courses = resolve_records(&records, &store, &mut rng);
        tracing::info!("Resolved {} of {} requirements", courses.len(), records.len());
        println!("{}", serde_json::to_string_pretty(&courses)?);
        return Ok(());
    }

    let pipeline = RecommendationPipeline::new(
        storage,
        config,
        store,
        ReqwestFetcher::new(),
        CourseRequest::new(cli.major.clone(), cli.semester.clone()),
    )?;
    let engine = EtlEngine::new(pipeline);
    let recommendation = engine.run().await?;

    tracing::info!("{}", recommendation.message);
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
