use crate::{
    config::ScraperConfig,
    course_metadata_scraper::CourseHeadingExtractor,
    requests::{PageFetcher, RequestClient},
    scrape_error::ScrapeError,
};

pub struct ScrapingContext<F> {
    pub scraping_config: ScraperConfig,
    pub course_heading_extractor: CourseHeadingExtractor,
    pub fetcher: F,
}

impl ScrapingContext<RequestClient> {
    /// Context for scraping the live sites, configured from the environment.
    pub fn new() -> anyhow::Result<Self> {
        let scraping_config = ScraperConfig::new()?;
        let request_client = RequestClient::new(&scraping_config)?;
        Self::with_fetcher(scraping_config, request_client)
    }
}

impl<F: PageFetcher> ScrapingContext<F> {
    pub fn with_fetcher(scraping_config: ScraperConfig, fetcher: F) -> anyhow::Result<Self> {
        let course_heading_extractor = CourseHeadingExtractor::new()?;
        Ok(ScrapingContext {
            scraping_config,
            course_heading_extractor,
            fetcher,
        })
    }

    pub(crate) async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        Ok(self.fetcher.fetch_page(url).await?)
    }
}
