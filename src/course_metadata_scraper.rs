use log::{debug, info};
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::{
    course_profile::CourseMetadata,
    requests::PageFetcher,
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    selectors::{COURSE_HEADING, COURSE_OVERVIEW, DEFINITION_TERM, DEFINITION_VALUE},
    text_manipulators::extract_normalized_text,
};

pub struct CourseHeadingExtractor {
    // Splits "Data Structures (CSSE2002)" into name and code.
    heading_regex: Regex,
}

impl CourseHeadingExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let heading_regex = Regex::new(r"^([^(]+)\(([^)]+)\)")?;
        Ok(Self { heading_regex })
    }

    /// Course name and code from a profile heading. `None` if the heading
    /// isn't `<name> (<code>)`.
    pub fn extract(&self, heading: &str) -> Option<(String, String)> {
        let caps = self.heading_regex.captures(heading)?;
        let course_name = caps.get(1)?.as_str().trim();
        let course_code = caps.get(2)?.as_str().trim();
        if course_name.is_empty() || course_code.is_empty() {
            return None;
        }
        Some((course_name.to_string(), course_code.to_string()))
    }
}

pub async fn extract<F: PageFetcher>(
    context: &ScrapingContext<F>,
    section_code: &str,
) -> Result<CourseMetadata, ScrapeError> {
    let url = context
        .scraping_config
        .get_current_profile_url(section_code, "course-overview");
    let html = context.fetch_page(&url).await?;
    let metadata = parse_course_metadata(&html, &context.course_heading_extractor, &url)?;
    info!(
        "Resolved {} ({}), {} units",
        metadata.course_code, metadata.course_name, metadata.units
    );
    Ok(metadata)
}

/// `url` is only used to say where a malformed page came from.
pub fn parse_course_metadata(
    html: &str,
    heading_extractor: &CourseHeadingExtractor,
    url: &str,
) -> Result<CourseMetadata, ScrapeError> {
    let document = Html::parse_document(html);

    let Some(heading) = document.select(&COURSE_HEADING).next() else {
        return Err(ScrapeError::malformed(url, "profile has no course heading"));
    };
    let heading = extract_normalized_text(heading);
    debug!("Course heading: {heading:?}");

    let Some((course_name, course_code)) = heading_extractor.extract(&heading) else {
        return Err(ScrapeError::malformed(
            url,
            format!("course heading {heading:?} is not of the form \"<name> (<code>)\""),
        ));
    };

    let units = document
        .select(&COURSE_OVERVIEW)
        .next()
        .and_then(find_units)
        .unwrap_or_default();

    Ok(CourseMetadata {
        course_name,
        course_code,
        units,
    })
}

fn find_units(overview: ElementRef) -> Option<String> {
    let term = overview
        .select(&DEFINITION_TERM)
        .find(|term| extract_normalized_text(*term) == "Units")?;
    term.next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|next| DEFINITION_VALUE.matches(next))
        .map(extract_normalized_text)
}
