use advisor_etl::core::Pipeline;
use advisor_etl::{
    get_course_recommendations, AdvisorSettings, CatalogStore, CourseRequest, EtlEngine,
    LocalStorage, RecommendationPipeline, ReqwestFetcher, TomlConfig,
};
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

const PLAN_HTML: &str = include_str!("fixtures/plan_of_study.html");
const COURSES_CSV: &str = include_str!("../knowledge/courses.csv");
const PLAN_PATH: &str = "/undergraduate/engineering/computer-science-bs/";

/// 在暫存目錄建立 knowledge 資料，目錄檔指向 mock server
fn write_knowledge(dir: &TempDir, plan_url: &str) {
    let directory = format!(
        "degree_program,plan_of_study_url\n\
         B.S. in Computer Science,{}\n\
         B.S. in Computer Engineering,http://127.0.0.1:9/computer-engineering-bs/\n\
         B.A. in English,http://127.0.0.1:9/english-ba/\n",
        plan_url
    );
    std::fs::write(dir.path().join("degree_programs.csv"), directory).unwrap();
    std::fs::write(dir.path().join("courses.csv"), COURSES_CSV).unwrap();
}

fn settings_for(knowledge: &TempDir, seed: Option<u64>) -> AdvisorSettings {
    AdvisorSettings {
        knowledge_dir: knowledge.path().to_str().unwrap().to_string(),
        seed,
        output_path: Some("recommendation.json".to_string()),
        ..AdvisorSettings::default()
    }
}

async fn load_store(settings: &AdvisorSettings) -> Arc<CatalogStore> {
    let storage = LocalStorage::new(".".to_string());
    Arc::new(CatalogStore::load(&storage, settings).await.unwrap())
}

fn codes(recommendation: &advisor_etl::Recommendation) -> Vec<String> {
    recommendation
        .courses
        .iter()
        .map(|course| course.code.clone().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_recommendation_with_real_http() {
    let knowledge = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(PLAN_HTML);
    });

    write_knowledge(&knowledge, &server.url(PLAN_PATH));
    let settings = settings_for(&knowledge, Some(42));
    let store = load_store(&settings).await;

    let pipeline = RecommendationPipeline::new(
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        settings,
        store,
        ReqwestFetcher::new(),
        CourseRequest::new("BS Computer Science", "2"),
    )
    .unwrap();

    let engine = EtlEngine::new(pipeline);
    assert_eq!(engine.pipeline().request().semester, "2");
    let recommendation = engine.run().await.unwrap();
    plan_mock.assert();

    assert_eq!(
        recommendation.message,
        "Found courses for BS Computer Science, Year 1 Spring"
    );
    assert_eq!(recommendation.program.as_deref(), Some("B.S. in Computer Science"));

    // CSC 1500 原樣保留，STEM 與 Language 兩個 placeholder 從 catalog 補上
    assert_eq!(recommendation.courses.len(), 3);
    assert_eq!(recommendation.courses[0].code.as_deref(), Some("CSC 1500"));
    assert_eq!(
        recommendation.courses[0].name.as_deref(),
        Some("Programming Fundamentals")
    );
    assert_eq!(recommendation.courses[0].credits.as_deref(), Some("3"));
    assert_eq!(
        recommendation.courses[1].fulfillment_type.as_deref(),
        Some("STEM Cognate")
    );
    assert!(["MAT 2500", "PHY 2410", "CHE 1410"]
        .contains(&recommendation.courses[1].code.as_deref().unwrap()));
    assert_eq!(
        recommendation.courses[2].fulfillment_type.as_deref(),
        Some("Language")
    );
    assert!(["SPA 1110", "FRE 1110"].contains(&recommendation.courses[2].code.as_deref().unwrap()));

    // Verify output file
    let written = std::fs::read(output.path().join("recommendation.json")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(value["major"], "BS Computer Science");
    assert_eq!(value["courses"].as_array().unwrap().len(), 3);
    assert_eq!(value["courses"][0]["code"], "CSC 1500");
}

#[tokio::test]
async fn test_same_seed_gives_same_backfill() {
    let knowledge = TempDir::new().unwrap();
    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(200).body(PLAN_HTML);
    });

    write_knowledge(&knowledge, &server.url(PLAN_PATH));
    let mut settings = settings_for(&knowledge, Some(7));
    settings.output_path = None;
    let store = load_store(&settings).await;

    let mut runs = Vec::new();
    for _ in 0..2 {
        let pipeline = RecommendationPipeline::new(
            LocalStorage::new(".".to_string()),
            settings.clone(),
            store.clone(),
            ReqwestFetcher::new(),
            CourseRequest::new("Computer Science", "3"),
        )
        .unwrap();
        runs.push(EtlEngine::new(pipeline).recommend().await.unwrap());
    }

    plan_mock.assert_hits(2);
    assert_eq!(codes(&runs[0]), codes(&runs[1]));
    assert_eq!(runs[0].courses.len(), 3);
    assert_eq!(runs[0].courses[0].code.as_deref(), Some("CSC 2100"));
    assert_eq!(
        runs[0].courses[2].fulfillment_type.as_deref(),
        Some("People and Society Cognate")
    );
}

#[tokio::test]
async fn test_missing_plan_page_degrades_to_message() {
    let knowledge = TempDir::new().unwrap();
    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(404).body("<html><body>Not Found</body></html>");
    });

    write_knowledge(&knowledge, &server.url(PLAN_PATH));
    let settings = settings_for(&knowledge, None);
    let store = load_store(&settings).await;

    let recommendation = get_course_recommendations(
        store,
        ReqwestFetcher::new(),
        "B.S. in Computer Science",
        "1",
    )
    .await
    .unwrap();

    plan_mock.assert();
    assert!(recommendation.courses.is_empty());
    assert_eq!(
        recommendation.message,
        "No plan of study found for the major: B.S. in Computer Science"
    );
}

#[tokio::test]
async fn test_page_without_plan_grid_degrades_to_message() {
    let knowledge = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(200)
            .body("<html><body><div id=\"requirementstextcontainer\"></div></body></html>");
    });

    write_knowledge(&knowledge, &server.url(PLAN_PATH));
    let store = load_store(&settings_for(&knowledge, None)).await;

    let recommendation =
        get_course_recommendations(store, ReqwestFetcher::new(), "BS Computer Science", "1")
            .await
            .unwrap();
    assert!(recommendation.courses.is_empty());
    assert!(recommendation.message.starts_with("No plan of study found"));
}

#[tokio::test]
async fn test_semester_beyond_plan_and_unknown_major() {
    let knowledge = TempDir::new().unwrap();
    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(200).body(PLAN_HTML);
    });

    write_knowledge(&knowledge, &server.url(PLAN_PATH));
    let store = load_store(&settings_for(&knowledge, None)).await;

    let last = get_course_recommendations(
        store.clone(),
        ReqwestFetcher::new(),
        "BS Computer Science",
        "8",
    )
    .await
    .unwrap();
    assert_eq!(codes(&last), vec!["CSC 4600".to_string()]);
    assert_eq!(last.message, "Found courses for BS Computer Science, Year 4 Spring");

    let beyond = get_course_recommendations(
        store.clone(),
        ReqwestFetcher::new(),
        "BS Computer Science",
        "9",
    )
    .await
    .unwrap();
    assert!(beyond.courses.is_empty());
    assert_eq!(
        beyond.message,
        "No courses found for BS Computer Science, Year 5 Fall"
    );
    plan_mock.assert_hits(2);

    // 沒有任何 program 過門檻時不會發出請求
    let unknown = get_course_recommendations(
        store,
        ReqwestFetcher::new(),
        "Culinary Arts Certificate",
        "1",
    )
    .await
    .unwrap();
    assert!(unknown.courses.is_empty());
    assert_eq!(
        unknown.message,
        "No url found for the degree program: Culinary Arts Certificate"
    );
    plan_mock.assert_hits(2);
}

#[tokio::test]
async fn test_invalid_semester_is_hard_error() {
    let knowledge = TempDir::new().unwrap();
    write_knowledge(&knowledge, "http://127.0.0.1:9/computer-science-bs/");
    let store = load_store(&settings_for(&knowledge, None)).await;

    let err = get_course_recommendations(store, ReqwestFetcher::new(), "BS Computer Science", "0")
        .await
        .unwrap_err();
    assert!(matches!(err, advisor_etl::AdvisorError::ValidationError { .. }));
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() {
    let knowledge = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PLAN_PATH);
        then.status(200).body(PLAN_HTML);
    });
    write_knowledge(&knowledge, &server.url(PLAN_PATH));

    let toml_content = format!(
        r#"
[catalog]
knowledge_dir = "{}"

[resolver]
match_cutoff = 0.6
seed = 5

[output]
path = "plans/year-two-spring.json"
"#,
        knowledge.path().to_str().unwrap().replace('\\', "/")
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let storage = LocalStorage::new(".".to_string());
    let store = Arc::new(CatalogStore::load(&storage, &config).await.unwrap());

    let pipeline = RecommendationPipeline::new(
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        config,
        store,
        ReqwestFetcher::new(),
        CourseRequest::new("BS Computer Science", "4"),
    )
    .unwrap();

    let extraction = pipeline.extract().await.unwrap();
    assert_eq!(extraction.plan.len(), 8);

    let recommendation = EtlEngine::new(pipeline).run().await.unwrap();
    assert_eq!(recommendation.courses.len(), 2);
    assert_eq!(recommendation.courses[0].code.as_deref(), Some("CSC 2400"));
    assert_eq!(
        recommendation.courses[1].fulfillment_type.as_deref(),
        Some("Arts and Humanities Cognate")
    );
    assert!(output.path().join("plans/year-two-spring.json").exists());
}

#[test]
fn test_bundled_knowledge_loads() {
    let settings = AdvisorSettings {
        knowledge_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/knowledge").to_string(),
        ..AdvisorSettings::default()
    };
    let storage = LocalStorage::new(".".to_string());

    let store = tokio_test::block_on(CatalogStore::load(&storage, &settings)).unwrap();
    assert_eq!(store.programs().len(), 8);
    assert!(store
        .programs()
        .iter()
        .all(|program| program.plan_url.starts_with("https://")));
}
