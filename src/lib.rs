mod config;
mod pipeline;
mod ratelimit;
mod requests;
mod scrape_error;
mod scraping_context;
mod selectors;
mod text_manipulators;

pub mod course_metadata_scraper;
pub mod course_profile;
pub mod current_assessment_scraper;
pub mod legacy_assessment_scraper;
pub mod offering;
pub mod page_locator;
pub mod weight;

pub use config::{LoadFromEnv, ScraperConfig};
pub use course_profile::{
    AssessmentDetail, Assessments, CourseMetadata, ExtractionResult, LegacyAssessmentDetail,
};
pub use offering::{Offering, ProfileFormat, Semester, Year};
pub use pipeline::CourseProfileScraper;
pub use requests::{PageFetcher, RequestClient};
pub use scrape_error::{FetchError, ScrapeError};
pub use scraping_context::ScrapingContext;
