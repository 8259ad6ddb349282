use std::{num::NonZeroU32, time::Duration};

use anyhow::Context;
use nonzero_ext::nonzero;
use serde::{Deserialize, de::DeserializeOwned};

const COURSE_CODE_PLACEHOLDER: &str = "{course_code}";
const SECTION_CODE_PLACEHOLDER: &str = "{section_code}";

const DEFAULT_REQ_PER_SEC: NonZeroU32 = nonzero!(4u32);

/// The env vars that tune scraping. All of them are optional.
#[derive(Debug, Deserialize)]
pub struct ScrapingEnv {
    #[serde(default = "default_course_directory_url")]
    course_directory_url: String,
    #[serde(default = "default_legacy_profile_url")]
    legacy_profile_url: String,
    #[serde(default = "default_current_profile_url")]
    current_profile_url: String,
    #[serde(default = "default_user_agent")]
    scraper_user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,
    #[serde(default = "default_requests_per_second")]
    requests_per_second: u32,
}

fn default_course_directory_url() -> String {
    "https://my.uq.edu.au/programs-courses/course.html?course_code={course_code}".to_string()
}

fn default_legacy_profile_url() -> String {
    "https://archive.course-profiles.uq.edu.au/student_section_loader/section_5/{section_code}"
        .to_string()
}

fn default_current_profile_url() -> String {
    "https://course-profiles.uq.edu.au/course-profiles/{section_code}".to_string()
}

fn default_user_agent() -> String {
    // The directory site turns away some default client agents.
    "My User Agent 1.0".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_requests_per_second() -> u32 {
    DEFAULT_REQ_PER_SEC.get()
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    course_directory_url: String,
    legacy_profile_url: String,
    current_profile_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub requests_per_second: NonZeroU32,
}

impl ScraperConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Ok(Self::from(scraping_env))
    }

    /// Config pointing the three endpoint families at `base_url`. Useful for
    /// local mirrors and tests.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            course_directory_url: format!(
                "{base_url}/programs-courses/course.html?course_code={COURSE_CODE_PLACEHOLDER}"
            ),
            legacy_profile_url: format!(
                "{base_url}/student_section_loader/section_5/{SECTION_CODE_PLACEHOLDER}"
            ),
            current_profile_url: format!(
                "{base_url}/course-profiles/{SECTION_CODE_PLACEHOLDER}"
            ),
            ..Self::default()
        }
    }

    pub fn get_course_directory_url(&self, course_code: &str) -> String {
        self.course_directory_url
            .replace(COURSE_CODE_PLACEHOLDER, course_code)
    }

    pub fn get_legacy_profile_url(&self, section_code: &str) -> String {
        self.legacy_profile_url
            .replace(SECTION_CODE_PLACEHOLDER, section_code)
    }

    /// Profile page on the current site, jumping to `anchor`. The fragment
    /// never reaches the server; it only documents which part of the page a
    /// stage reads.
    pub fn get_current_profile_url(&self, section_code: &str, anchor: &str) -> String {
        let url = self
            .current_profile_url
            .replace(SECTION_CODE_PLACEHOLDER, section_code);
        format!("{url}#{anchor}")
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            course_directory_url: default_course_directory_url(),
            legacy_profile_url: default_legacy_profile_url(),
            current_profile_url: default_current_profile_url(),
            user_agent: default_user_agent(),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            max_retries: default_max_retries(),
            retry_backoff: Duration::from_millis(default_retry_backoff_ms()),
            requests_per_second: DEFAULT_REQ_PER_SEC,
        }
    }
}

impl From<ScrapingEnv> for ScraperConfig {
    fn from(env: ScrapingEnv) -> Self {
        Self {
            course_directory_url: env.course_directory_url,
            legacy_profile_url: env.legacy_profile_url,
            current_profile_url: env.current_profile_url,
            user_agent: env.scraper_user_agent,
            request_timeout: Duration::from_secs(env.request_timeout_secs),
            max_retries: env.max_retries,
            retry_backoff: Duration::from_millis(env.retry_backoff_ms),
            requests_per_second: NonZeroU32::new(env.requests_per_second)
                .unwrap_or(DEFAULT_REQ_PER_SEC),
        }
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
