use serde::Serialize;

use crate::scrape_error::ScrapeError;

pub type Year = i32;

/// The profile site moved to its current layout part-way through this year;
/// Semester 1 of it still lives in the archive.
const CUTOVER_YEAR: Year = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Semester {
    One,
    Two,
    Summer,
}

impl Semester {
    /// `"1"` and `"2"` are the regular semesters; anything else is summer.
    pub fn from_input(semester: &str) -> Self {
        match semester.trim() {
            "1" => Semester::One,
            "2" => Semester::Two,
            _ => Semester::Summer,
        }
    }

    /// How the course directory labels this semester in its offerings table.
    pub fn directory_label(self) -> &'static str {
        match self {
            Semester::One => "Semester 1",
            Semester::Two => "Semester 2",
            Semester::Summer => "Summer Semester",
        }
    }
}

/// Which of the two profile layouts an offering is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileFormat {
    /// Tabular archive pages, up to and including 2024 Semester 1.
    Legacy,
    /// Heading + definition-list pages from 2024 Semester 2 onwards.
    Current,
}

impl ProfileFormat {
    pub fn select(year: Year, semester: Semester) -> Self {
        if year < CUTOVER_YEAR || (year == CUTOVER_YEAR && semester == Semester::One) {
            ProfileFormat::Legacy
        } else {
            ProfileFormat::Current
        }
    }
}

/// A course in a particular semester of a particular year, as requested by the
/// caller.
#[derive(Debug, Clone)]
pub struct Offering {
    pub course_code: String,
    pub semester: Semester,
    /// The semester exactly as the caller gave it; error messages echo it.
    pub semester_input: String,
    pub year: Year,
}

impl Offering {
    pub fn new(course_code: &str, semester: &str, year: &str) -> Result<Self, ScrapeError> {
        let course_code = course_code.trim();
        if course_code.is_empty() {
            return Err(ScrapeError::InvalidOffering(
                "course code must not be empty".to_string(),
            ));
        }
        let year = year.trim().parse::<Year>().map_err(|_| {
            ScrapeError::InvalidOffering(format!("year '{}' is not a number", year.trim()))
        })?;
        Ok(Self {
            course_code: course_code.to_string(),
            semester: Semester::from_input(semester),
            semester_input: semester.trim().to_string(),
            year,
        })
    }

    pub fn profile_format(&self) -> ProfileFormat {
        ProfileFormat::select(self.year, self.semester)
    }

    pub fn wrong_semester(&self) -> ScrapeError {
        ScrapeError::WrongSemester {
            course: self.course_code.clone(),
            semester: self.semester_input.clone(),
        }
    }
}
