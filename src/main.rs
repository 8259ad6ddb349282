use std::process::ExitCode;

use chrono::{Datelike, Utc};
use clap::Parser;
use dotenv::dotenv;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{LevelFilter, error, info};
use profile_scraper::CourseProfileScraper;

#[derive(Parser)]
#[command(
    name = "profile_scraper",
    about = "Scrape UQ course profiles into assessment schedules"
)]
struct Cli {
    /// Course codes to look up, e.g. CSSE2002
    #[arg(required = true)]
    course_codes: Vec<String>,

    /// 1, 2, or 3 for the summer semester
    #[arg(short, long, default_value = "1")]
    semester: String,

    /// Defaults to the current year
    #[arg(short, long)]
    year: Option<String>,

    /// Print each result on one line
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let year = cli
        .year
        .clone()
        .unwrap_or_else(|| Utc::now().year().to_string());

    let scraper = CourseProfileScraper::new()?;

    let mut jobs: FuturesUnordered<_> = cli
        .course_codes
        .iter()
        .map(|course_code| {
            let scraper = &scraper;
            let semester = cli.semester.as_str();
            let year = year.as_str();
            async move {
                let result = scraper
                    .get_course_and_assessments(course_code, semester, year)
                    .await;
                (course_code, result)
            }
        })
        .collect();

    let mut failures = 0;
    while let Some((course_code, result)) = jobs.next().await {
        match result {
            Ok(course) => {
                info!(
                    "{course_code}: {} assessments, total weight {:.0}%",
                    course.assessments.len(),
                    course.total_weight() * 100.0
                );
                let json = if cli.compact {
                    serde_json::to_string(&course)?
                } else {
                    serde_json::to_string_pretty(&course)?
                };
                println!("{json}");
            }
            Err(e) => {
                error!("{course_code}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{failures} of {} courses failed", cli.course_codes.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
