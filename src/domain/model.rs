use crate::utils::error::{AdvisorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeProgramEntry {
    pub name: String,
    pub plan_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentType {
    Elective,
    StemCognate,
    Language,
    PeopleAndSocietyCognate,
    ArtsAndHumanitiesCognate,
    Specific,
}

impl FulfillmentType {
    /// 目錄中可以被抽選的五個分類
    pub const BUCKETS: [FulfillmentType; 5] = [
        FulfillmentType::Elective,
        FulfillmentType::StemCognate,
        FulfillmentType::Language,
        FulfillmentType::PeopleAndSocietyCognate,
        FulfillmentType::ArtsAndHumanitiesCognate,
    ];

    /// Label as written in the catalog's `fullfillment_type` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elective => "Elective",
            Self::StemCognate => "STEM Cognate",
            Self::Language => "Language",
            Self::PeopleAndSocietyCognate => "People and Society Cognate",
            Self::ArtsAndHumanitiesCognate => "Arts and Humanities Cognate",
            Self::Specific => "Specific",
        }
    }

    /// Only the five bucket labels are recognized; anything else returns `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::BUCKETS
            .into_iter()
            .find(|bucket| bucket.label() == label.trim())
    }
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCourse {
    pub code: String,
    pub name: String,
    pub description: String,
    pub credits: String,
    pub fulfillment_type: FulfillmentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Spring,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Fall => f.write_str("Fall"),
            Term::Spring => f.write_str("Spring"),
        }
    }
}

/// 一列課程，欄位名稱維持爬下來時的樣子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCourseRequirement {
    pub course_code: String,
    pub course_name: String,
    pub credit_hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub year: u8,
    pub semester: Term,
    pub courses: Vec<RawCourseRequirement>,
}

/// Semester number as the caller counts it: 1 = Year 1 Fall, 2 = Year 1 Spring, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterSlot {
    pub year: u32,
    pub term: Term,
}

impl SemesterSlot {
    pub fn from_index(semester: u32) -> Result<Self> {
        if semester == 0 {
            return Err(AdvisorError::ValidationError {
                message: "semester numbering starts at 1".to_string(),
            });
        }
        let term = if semester % 2 == 1 {
            Term::Fall
        } else {
            Term::Spring
        };
        Ok(Self {
            year: semester / 2 + semester % 2,
            term,
        })
    }

    pub fn parse(semester: &str) -> Result<Self> {
        let index = semester
            .trim()
            .parse::<u32>()
            .map_err(|e| AdvisorError::ValidationError {
                message: format!("semester '{}' is not a number: {}", semester, e),
            })?;
        Self::from_index(index)
    }

    pub fn matches(&self, entry: &PlanEntry) -> bool {
        u32::from(entry.year) == self.year && entry.semester == self.term
    }
}

impl fmt::Display for SemesterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Year {} {}", self.year, self.term)
    }
}

/// Caller-facing course record. Absent fields are left out of the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCourse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<serde_json::Value>,
}

impl From<&CatalogCourse> for ResolvedCourse {
    fn from(course: &CatalogCourse) -> Self {
        Self {
            code: Some(course.code.clone()),
            name: Some(course.name.clone()),
            description: Some(course.description.clone()),
            credits: Some(course.credits.clone()),
            fulfillment_type: Some(course.fulfillment_type.label().to_string()),
            prerequisites: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramMatch {
    pub name: String,
    pub url: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRequest {
    pub major: String,
    pub semester: String,
}

impl CourseRequest {
    pub fn new(major: impl Into<String>, semester: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            semester: semester.into(),
        }
    }
}

/// extract 階段的產物
#[derive(Debug, Clone)]
pub struct PlanExtraction {
    pub slot: SemesterSlot,
    pub program: Option<ProgramMatch>,
    pub plan: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub major: String,
    pub semester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_url: Option<String>,
    pub courses: Vec<ResolvedCourse>,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}
