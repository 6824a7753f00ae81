use crate::core::catalog::CatalogStore;
use crate::domain::model::{FulfillmentType, RawCourseRequirement, ResolvedCourse};
use crate::utils::error::{AdvisorError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{Map, Value};

/// Placeholder phrases, checked in order against the requirement code.
const PLACEHOLDER_MARKERS: [(&str, FulfillmentType); 5] = [
    ("Elective", FulfillmentType::Elective),
    ("STEM", FulfillmentType::StemCognate),
    ("Language", FulfillmentType::Language),
    ("People and Society", FulfillmentType::PeopleAndSocietyCognate),
    ("Arts and Humanities", FulfillmentType::ArtsAndHumanitiesCognate),
];

/// 同一欄位的歷史別名，前面的優先
const CODE_ALIASES: &[&str] = &["code", "course_code"];
const NAME_ALIASES: &[&str] = &["name", "course_name"];
const DESCRIPTION_ALIASES: &[&str] = &["description"];
const CREDITS_ALIASES: &[&str] = &["credits", "credit_hours"];
const FULFILLMENT_ALIASES: &[&str] = &["fulfillment_type"];
const PREREQUISITE_ALIASES: &[&str] = &["prerequisites"];

/// A requirement in canonical field names, whatever shape it arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseRequirement {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub credits: Option<String>,
    pub fulfillment_type: Option<String>,
    pub prerequisites: Option<Value>,
    /// 第一個非空的 code 別名，只用來判斷分類
    category_code: Option<String>,
}

impl CourseRequirement {
    pub fn from_record(record: &Value) -> Result<Self> {
        let Value::Object(fields) = record else {
            return Err(AdvisorError::MappingError {
                message: format!("expected an object, got {}", record),
            });
        };

        let requirement = Self {
            code: string_field(fields, CODE_ALIASES),
            name: string_field(fields, NAME_ALIASES),
            description: string_field(fields, DESCRIPTION_ALIASES),
            credits: string_field(fields, CREDITS_ALIASES),
            fulfillment_type: string_field(fields, FULFILLMENT_ALIASES),
            prerequisites: first_present(fields, PREREQUISITE_ALIASES).cloned(),
            category_code: first_non_empty(fields, CODE_ALIASES).map(coerce),
        };

        let has_name = first_non_empty(fields, NAME_ALIASES).is_some();
        if requirement.category_code.is_none() && !has_name {
            return Err(AdvisorError::MappingError {
                message: format!("requirement has neither code nor name: {}", record),
            });
        }
        Ok(requirement)
    }

    /// Placeholder category named by the code, or `Specific`.
    pub fn category(&self) -> FulfillmentType {
        let code = self
            .category_code
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or_default();
        PLACEHOLDER_MARKERS
            .iter()
            .find(|(marker, _)| code.contains(marker))
            .map(|(_, category)| *category)
            .unwrap_or(FulfillmentType::Specific)
    }

    fn into_resolved(self) -> ResolvedCourse {
        ResolvedCourse {
            code: self.code,
            name: self.name,
            description: self.description,
            credits: self.credits,
            fulfillment_type: self.fulfillment_type,
            prerequisites: self.prerequisites,
        }
    }
}

impl From<&RawCourseRequirement> for CourseRequirement {
    fn from(raw: &RawCourseRequirement) -> Self {
        Self {
            code: Some(raw.course_code.clone()),
            name: Some(raw.course_name.clone()),
            credits: Some(raw.credit_hours.clone()),
            ..Self::default()
        }
    }
}

/// First alias that is present and non-null.
fn first_present<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find(|value| !value.is_null())
}

/// First alias holding something other than null or an empty string.
fn first_non_empty<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find(|value| !value.is_null() && value.as_str().map_or(true, |s| !s.is_empty()))
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_field(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    first_present(fields, aliases).map(coerce)
}

/// Normalizes loosely shaped records. Records that cannot be mapped are
/// logged and skipped.
pub fn normalize_records(records: &[Value]) -> Vec<CourseRequirement> {
    records
        .iter()
        .filter_map(|record| match CourseRequirement::from_record(record) {
            Ok(requirement) => Some(requirement),
            Err(e) => {
                tracing::warn!("Skipping requirement: {}", e);
                None
            }
        })
        .collect()
}

/// Expands placeholders into random catalog picks and passes specific courses
/// through unchanged. An empty bucket drops the requirement.
pub fn resolve_courses<R: Rng + ?Sized>(
    requirements: Vec<CourseRequirement>,
    store: &CatalogStore,
    rng: &mut R,
) -> Vec<ResolvedCourse> {
    let mut courses = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        match requirement.category() {
            FulfillmentType::Specific => courses.push(requirement.into_resolved()),
            category => match store.courses_for_category(category).choose(&mut *rng) {
                Some(pick) => {
                    tracing::debug!(
                        "Filled '{}' with {} ({})",
                        requirement.code.as_deref().unwrap_or_default(),
                        pick.code,
                        category
                    );
                    courses.push(ResolvedCourse::from(pick));
                }
                None => tracing::warn!(
                    "No catalog courses for {}; dropping '{}'",
                    category,
                    requirement.code.as_deref().unwrap_or_default()
                ),
            },
        }
    }

    courses
}

pub fn resolve_records<R: Rng + ?Sized>(
    records: &[Value],
    store: &CatalogStore,
    rng: &mut R,
) -> Vec<ResolvedCourse> {
    resolve_courses(normalize_records(records), store, rng)
}

/// Parses a requirement list, tolerating a surrounding Markdown code fence.
pub fn parse_requirement_document(text: &str) -> Result<Vec<Value>> {
    let body = strip_code_fence(text.trim());
    let records: Vec<Value> = serde_json::from_str(body)?;
    Ok(records)
}

fn strip_code_fence(text: &str) -> &str {
    if text.len() >= 6 && text.starts_with("```") && text.ends_with("```") {
        if let Some(newline) = text.find('\n') {
            if newline < text.len() - 3 {
                return text[newline + 1..text.len() - 3].trim();
            }
        }
    }
    text
}
