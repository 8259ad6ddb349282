use log::info;

use crate::{
    course_metadata_scraper,
    course_profile::{Assessments, ExtractionResult},
    current_assessment_scraper, legacy_assessment_scraper,
    offering::{Offering, ProfileFormat},
    page_locator,
    requests::{PageFetcher, RequestClient},
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    text_manipulators::section_code_from_href,
};

/// Turns a course offering into its assessment schedule and course details.
///
/// Holds no per-course state, so one scraper can serve any number of
/// concurrent calls.
pub struct CourseProfileScraper<F = RequestClient> {
    context: ScrapingContext<F>,
}

impl CourseProfileScraper<RequestClient> {
    /// Scraper for the live sites, configured from the environment.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_context(ScrapingContext::new()?))
    }
}

impl<F: PageFetcher> CourseProfileScraper<F> {
    pub fn with_context(context: ScrapingContext<F>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ScrapingContext<F> {
        &self.context
    }

    /// Locates the profile for `course_code` in `semester` of `year`, then
    /// extracts its assessments (in whichever layout that offering uses) and
    /// the course name, code and units.
    ///
    /// Fails with [`ScrapeError::CourseNotFound`] if the directory doesn't know
    /// the course and [`ScrapeError::WrongSemester`] if it isn't offered then.
    pub async fn get_course_and_assessments(
        &self,
        course_code: &str,
        semester: &str,
        year: &str,
    ) -> Result<ExtractionResult, ScrapeError> {
        let offering = Offering::new(course_code, semester, year)?;

        let Some(profile_href) = page_locator::locate(&self.context, &offering).await? else {
            return Err(offering.wrong_semester());
        };
        let Some(section_code) = section_code_from_href(&profile_href) else {
            return Err(ScrapeError::malformed(
                &profile_href,
                "profile link has no section code",
            ));
        };
        info!("Section code for {}: {section_code}", offering.course_code);

        let format = offering.profile_format();
        info!(
            "Using {format:?} profile format for {} {}",
            offering.semester.directory_label(),
            offering.year
        );
        let assessments = match format {
            ProfileFormat::Legacy => Assessments::Legacy(
                legacy_assessment_scraper::extract(&self.context, section_code).await?,
            ),
            ProfileFormat::Current => Assessments::Current(
                current_assessment_scraper::extract(&self.context, section_code).await?,
            ),
        };

        let metadata = course_metadata_scraper::extract(&self.context, section_code).await?;

        Ok(ExtractionResult::new(metadata, assessments))
    }
}
