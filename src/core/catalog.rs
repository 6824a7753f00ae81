use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{CatalogCourse, DegreeProgramEntry, FulfillmentType};
use crate::utils::error::{AdvisorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const DIRECTORY_COLUMNS: [&str; 2] = ["degree_program", "plan_of_study_url"];

// 目錄檔的欄位就是拼成 fullfillment_type
const COURSE_COLUMNS: [&str; 5] = [
    "course_code",
    "course_name",
    "description",
    "credits",
    "fullfillment_type",
];

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    degree_program: String,
    plan_of_study_url: String,
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    course_code: String,
    course_name: String,
    description: String,
    credits: String,
    fullfillment_type: String,
}

/// Read-only tables behind program resolution and category backfill.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    programs: Vec<DegreeProgramEntry>,
    buckets: HashMap<FulfillmentType, Vec<CatalogCourse>>,
}

impl CatalogStore {
    pub fn new(programs: Vec<DegreeProgramEntry>, courses: Vec<CatalogCourse>) -> Self {
        let mut buckets: HashMap<FulfillmentType, Vec<CatalogCourse>> = HashMap::new();
        for course in courses {
            if course.fulfillment_type == FulfillmentType::Specific {
                continue;
            }
            buckets
                .entry(course.fulfillment_type)
                .or_default()
                .push(course);
        }
        Self { programs, buckets }
    }

    /// 透過 Storage 讀取兩個 CSV 來源，路徑為 knowledge_dir 底下的檔名
    pub async fn load<S: Storage, C: ConfigProvider + ?Sized>(storage: &S, config: &C) -> Result<Self> {
        let knowledge_dir = Path::new(config.knowledge_dir());
        let directory_path = knowledge_dir.join(config.directory_file());
        let courses_path = knowledge_dir.join(config.courses_file());
        tracing::debug!(
            "Loading catalog from {} and {}",
            directory_path.display(),
            courses_path.display()
        );
        let directory = storage.read_file(&directory_path.to_string_lossy()).await?;
        let courses = storage.read_file(&courses_path.to_string_lossy()).await?;
        let store = Self::from_readers(directory.as_slice(), courses.as_slice())?;
        tracing::info!(
            "Catalog loaded: {} degree programs, {} bucketed courses",
            store.programs.len(),
            store.buckets.values().map(Vec::len).sum::<usize>()
        );
        Ok(store)
    }

    pub fn from_readers<D: Read, R: Read>(directory: D, courses: R) -> Result<Self> {
        let programs = read_directory(directory)?;
        let courses = read_courses(courses)?;
        Ok(Self::new(programs, courses))
    }

    pub fn programs(&self) -> &[DegreeProgramEntry] {
        &self.programs
    }

    pub fn courses_for_category(&self, category: FulfillmentType) -> &[CatalogCourse] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    source_name: &str,
    columns: &[&str],
) -> Result<()> {
    let headers = reader.headers()?;
    for column in columns {
        if !headers.iter().any(|header| header.trim() == *column) {
            return Err(AdvisorError::MissingColumnError {
                source_name: source_name.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn read_directory<R: Read>(source: R) -> Result<Vec<DegreeProgramEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source);
    require_columns(&mut reader, "degree program directory", &DIRECTORY_COLUMNS)?;

    let mut programs = Vec::new();
    for row in reader.deserialize::<DirectoryRow>() {
        let row = row?;
        programs.push(DegreeProgramEntry {
            name: row.degree_program,
            plan_url: row.plan_of_study_url.trim().to_string(),
        });
    }
    Ok(programs)
}

fn read_courses<R: Read>(source: R) -> Result<Vec<CatalogCourse>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source);
    require_columns(&mut reader, "course catalog", &COURSE_COLUMNS)?;

    let mut courses = Vec::new();
    for row in reader.deserialize::<CourseRow>() {
        let row = row?;
        match FulfillmentType::from_label(&row.fullfillment_type) {
            Some(fulfillment_type) => courses.push(CatalogCourse {
                code: row.course_code,
                name: row.course_name,
                description: row.description,
                credits: row.credits,
                fulfillment_type,
            }),
            None => tracing::debug!(
                "Dropping {} with unrecognized fulfillment type '{}'",
                row.course_code,
                row.fullfillment_type
            ),
        }
    }
    Ok(courses)
}
