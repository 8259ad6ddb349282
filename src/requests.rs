use log::{debug, warn};
use reqwest::{Client, ClientBuilder, Response};

use crate::{config::ScraperConfig, ratelimit::RateLimiter, scrape_error::FetchError};

/// Anything that can turn a URL into an HTML body. The pipeline only ever
/// talks to the network through this, so tests can hand it canned pages.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct RequestClient {
    client: Client,
    rate_limiter: RateLimiter,
    max_retries: u32,
    retry_backoff: std::time::Duration,
}

impl RequestClient {
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        let rate_limiter = RateLimiter::new(config.requests_per_second);
        Ok(Self {
            client,
            rate_limiter,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
        })
    }

    pub async fn fetch_url_response(&self, url: &str) -> Result<Response, FetchError> {
        // Wait (non-blocking) until we're allowed to make a request according
        // to our self-imposed rate-limiting policy.
        self.rate_limiter.wait_until_ready().await;

        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    pub async fn fetch_url_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self.fetch_url_response(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        Ok(body)
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_url_body(url).await {
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let backoff = self.retry_backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        "{err} (attempt {attempt}/{}), backing off {:.1}s",
                        self.max_retries,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                }
                result => return result,
            }
        }
    }
}

impl PageFetcher for RequestClient {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        self.fetch_with_retry(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };

    fn read_request(stream: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    struct TestServer {
        url: String,
        hits: Arc<AtomicUsize>,
        last_request: Arc<Mutex<String>>,
    }

    /// Answers the nth request with `statuses[n]`, repeating the last status
    /// once the list runs out.
    fn serve(statuses: Vec<u16>) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/course-profiles/abc", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(String::new()));

        let server_hits = Arc::clone(&hits);
        let server_request = Arc::clone(&last_request);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                *server_request.lock().unwrap() = read_request(&mut stream);
                let hit = server_hits.fetch_add(1, Ordering::SeqCst);
                let status = statuses[hit.min(statuses.len() - 1)];
                let body = format!("<html>hit {}</html>", hit + 1);
                let response = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        TestServer {
            url,
            hits,
            last_request,
        }
    }

    fn client(max_retries: u32, request_timeout: Duration) -> RequestClient {
        let mut config = ScraperConfig::default();
        config.max_retries = max_retries;
        config.retry_backoff = Duration::from_millis(1);
        config.request_timeout = request_timeout;
        RequestClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let server = serve(vec![503, 503, 200]);
        let body = client(2, Duration::from_secs(5))
            .fetch_page(&server.url)
            .await
            .unwrap();
        assert_eq!(body, "<html>hit 3</html>");
        assert_eq!(server.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = serve(vec![404]);
        let err = client(2, Duration::from_secs(5))
            .fetch_page(&server.url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let server = serve(vec![500]);
        let err = client(2, Duration::from_secs(5))
            .fetch_page(&server.url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(server.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = serve(vec![200]);
        client(0, Duration::from_secs(5))
            .fetch_page(&server.url)
            .await
            .unwrap();
        let request = server.last_request.lock().unwrap().to_lowercase();
        assert!(request.contains("user-agent: my user agent 1.0"), "{request}");
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        thread::spawn(move || {
            // Hold each connection open without ever replying.
            let mut open = Vec::new();
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                read_request(&mut stream);
                open.push(stream);
            }
        });

        let err = client(0, Duration::from_millis(200))
            .fetch_page(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
        assert!(err.is_transient());
    }
}
