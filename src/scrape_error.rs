use thiserror::Error;

/// A failure to retrieve a page from one of the external sites.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Whether trying the same request again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Http { source, .. } => source.is_connect() || source.is_request(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("The course '{course}' could not be found or does not exist.")]
    CourseNotFound { course: String },

    #[error("{}", wrong_semester_message(course, semester))]
    WrongSemester { course: String, semester: String },

    #[error("unexpected page structure at {url}: {reason}")]
    MalformedPage { url: String, reason: String },

    #[error("invalid course offering: {0}")]
    InvalidOffering(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ScrapeError {
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        ScrapeError::MalformedPage {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Only transport hiccups are worth retrying. A course that doesn't exist
    /// or isn't offered will not start existing on the next attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Fetch(err) => err.is_transient(),
            _ => false,
        }
    }
}

fn wrong_semester_message(course: &str, semester: &str) -> String {
    if semester == "3" {
        format!("The course '{course}' does not exist in the summer semester.")
    } else {
        format!(
            "The course '{course}' does not exist in the selected semester. (Semester {semester})"
        )
    }
}
