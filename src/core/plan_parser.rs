//! Plan-of-study extraction.
//!
//! Rows of the plan grid are first classified into [`PlanRow`]s, then folded
//! through a [`PlanAccumulator`] that tracks the current year and term and
//! flushes a [`PlanEntry`] whenever a marker row closes a non-empty group.

use crate::core::PageFetcher;
use crate::domain::model::{PlanEntry, RawCourseRequirement, Term};
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::validate_url;
use scraper::{ElementRef, Html, Selector};

pub const DEFAULT_PLAN_ANCHOR: &str = "planofstudytext";

const YEAR_MARKERS: [(&str, &str, u8); 4] = [
    ("Year One", "Freshman Year", 1),
    ("Year Two", "Sophomore Year", 2),
    ("Year Three", "Junior Year", 3),
    ("Year Four", "Senior Year", 4),
];

/// CSS hooks of the catalog's plan grid.
#[derive(Debug, Clone)]
pub struct PlanLayout {
    pub table: &'static str,
    pub year_class: &'static str,
    pub term_class: &'static str,
    pub sum_class: &'static str,
    pub total_class: &'static str,
    pub code_cell: &'static str,
    pub title_cell: &'static str,
    pub hours_cell: &'static str,
    pub comment: &'static str,
}

impl Default for PlanLayout {
    fn default() -> Self {
        Self {
            table: "#planofstudytextcontainer table.sc_plangrid",
            year_class: "plangridyear",
            term_class: "plangridterm",
            sum_class: "plangridsum",
            total_class: "plangridtotal",
            code_cell: "td.codecol",
            title_cell: "td.titlecol",
            hours_cell: "td.hourscol",
            comment: "span.comment",
        }
    }
}

struct PlanSelectors {
    table: Selector,
    row: Selector,
    code_cell: Selector,
    title_cell: Selector,
    hours_cell: Selector,
    link: Selector,
    comment: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AdvisorError::ConfigError {
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

impl PlanSelectors {
    fn new(layout: &PlanLayout) -> Result<Self> {
        Ok(Self {
            table: selector(layout.table)?,
            row: selector("tr")?,
            code_cell: selector(layout.code_cell)?,
            title_cell: selector(layout.title_cell)?,
            hours_cell: selector(layout.hours_cell)?,
            link: selector("a")?,
            comment: selector(layout.comment)?,
        })
    }
}

/// One table row after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRow {
    /// Year marker; `None` when no known phrase appears in the row text.
    Year(Option<u8>),
    /// Term marker; `None` when the row mentions neither Fall nor Spring.
    Term(Option<Term>),
    Course(RawCourseRequirement),
    Other,
}

/// Each phrase pair is checked on its own, so "Year Two" maps to 2.
pub fn detect_year(text: &str) -> Option<u8> {
    YEAR_MARKERS
        .iter()
        .find(|(ordinal, class_year, _)| text.contains(ordinal) || text.contains(class_year))
        .map(|(_, _, year)| *year)
}

pub fn detect_term(text: &str) -> Option<Term> {
    if text.contains("Fall") {
        Some(Term::Fall)
    } else if text.contains("Spring") {
        Some(Term::Spring)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct PlanAccumulator {
    year: Option<u8>,
    term: Option<Term>,
    pending: Vec<RawCourseRequirement>,
    entries: Vec<PlanEntry>,
}

impl PlanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(&self) -> Option<u8> {
        self.year
    }

    pub fn term(&self) -> Option<Term> {
        self.term
    }

    pub fn pending(&self) -> &[RawCourseRequirement] {
        &self.pending
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Fold step. Marker rows flush before they update the state.
    pub fn feed(mut self, row: PlanRow) -> Self {
        match row {
            PlanRow::Year(year) => {
                self.flush();
                if let Some(year) = year {
                    self.year = Some(year);
                }
            }
            PlanRow::Term(term) => {
                self.flush();
                if let Some(term) = term {
                    self.term = Some(term);
                }
            }
            PlanRow::Course(course) => {
                let has_content = !course.course_code.is_empty() || !course.course_name.is_empty();
                if has_content && self.year.is_some() && self.term.is_some() {
                    tracing::debug!(
                        "Added course: {} - {} ({} credit hours)",
                        course.course_code,
                        course.course_name,
                        course.credit_hours
                    );
                    self.pending.push(course);
                }
            }
            PlanRow::Other => {}
        }
        self
    }

    /// Only flushes when year, term and at least one course are present.
    fn flush(&mut self) {
        if let (Some(year), Some(term)) = (self.year, self.term) {
            if !self.pending.is_empty() {
                let courses = std::mem::take(&mut self.pending);
                tracing::debug!(
                    "Saved {} courses for Year {}, {}",
                    courses.len(),
                    year,
                    term
                );
                self.entries.push(PlanEntry {
                    year,
                    semester: term,
                    courses,
                });
            }
        }
    }

    pub fn finish(mut self) -> Vec<PlanEntry> {
        self.flush();
        self.entries
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub struct PlanParser<F: PageFetcher> {
    fetcher: F,
    anchor: String,
    layout: PlanLayout,
    selectors: PlanSelectors,
}

impl<F: PageFetcher> PlanParser<F> {
    pub fn new(fetcher: F) -> Result<Self> {
        Self::with_layout(fetcher, DEFAULT_PLAN_ANCHOR, PlanLayout::default())
    }

    pub fn with_layout(fetcher: F, anchor: &str, layout: PlanLayout) -> Result<Self> {
        let selectors = PlanSelectors::new(&layout)?;
        Ok(Self {
            fetcher,
            anchor: anchor.to_string(),
            layout,
            selectors,
        })
    }

    /// Fetches and parses a plan page. Every failure degrades to an empty plan.
    pub async fn parse(&self, url: &str) -> Vec<PlanEntry> {
        let target = match self.anchored_url(url) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!("Cannot build plan of study URL from '{}': {}", url, e);
                return Vec::new();
            }
        };

        tracing::info!("Fetching plan of study from {}", target);
        match self.fetcher.fetch(&target).await {
            Ok(html) => self.extract_plan(&html),
            Err(e) => {
                tracing::error!("Request error fetching plan of study: {}", e);
                Vec::new()
            }
        }
    }

    fn anchored_url(&self, url: &str) -> Result<String> {
        let mut parsed = validate_url("plan_of_study_url", url.trim())?;
        parsed.set_fragment(Some(&self.anchor));
        Ok(parsed.to_string())
    }

    pub fn extract_plan(&self, html: &str) -> Vec<PlanEntry> {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&self.selectors.table).next() else {
            tracing::warn!("No plan of study table found ({})", self.layout.table);
            return Vec::new();
        };

        let plan = table
            .select(&self.selectors.row)
            .map(|row| self.classify_row(row))
            .fold(PlanAccumulator::new(), PlanAccumulator::feed)
            .finish();

        tracing::info!("Extracted plan of study with {} semesters", plan.len());
        for entry in &plan {
            tracing::debug!(
                "Year {} {}: {} courses",
                entry.year,
                entry.semester,
                entry.courses.len()
            );
        }
        plan
    }

    pub fn classify_row(&self, row: ElementRef<'_>) -> PlanRow {
        let has_class = |class: &str| row.value().classes().any(|c| c == class);

        if has_class(self.layout.year_class) {
            let text = element_text(row);
            tracing::debug!("Found year row: {}", text);
            return PlanRow::Year(detect_year(&text));
        }
        if has_class(self.layout.term_class) {
            let text = element_text(row);
            tracing::debug!("Found semester row: {}", text);
            return PlanRow::Term(detect_term(&text));
        }
        if has_class(self.layout.sum_class) || has_class(self.layout.total_class) {
            return PlanRow::Other;
        }
        let Some(code_cell) = row.select(&self.selectors.code_cell).next() else {
            return PlanRow::Other;
        };

        let course_code = code_cell
            .select(&self.selectors.link)
            .next()
            .or_else(|| code_cell.select(&self.selectors.comment).next())
            .map(element_text)
            .unwrap_or_default();

        let course_name = match row.select(&self.selectors.title_cell).next() {
            Some(title) => element_text(title),
            None if course_code.is_empty() => element_text(code_cell),
            None => String::new(),
        };

        let credit_hours = row
            .select(&self.selectors.hours_cell)
            .next()
            .map(element_text)
            .unwrap_or_default();

        PlanRow::Course(RawCourseRequirement {
            course_code,
            course_name,
            credit_hours,
        })
    }
}
