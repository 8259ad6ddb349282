use log::{debug, info};
use scraper::Html;

use crate::{
    offering::Offering,
    requests::PageFetcher,
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    selectors::{AVAILABLE_PROFILE_LINK, COURSE_NOT_FOUND, OFFERING_ROW},
    text_manipulators::extract_text,
};

/// Finds the profile link for `offering` in the course directory.
///
/// `Ok(None)` means the course exists but has no available profile for that
/// semester and year.
pub async fn locate<F: PageFetcher>(
    context: &ScrapingContext<F>,
    offering: &Offering,
) -> Result<Option<String>, ScrapeError> {
    let url = context
        .scraping_config
        .get_course_directory_url(&offering.course_code);
    info!("Looking up {} in the course directory", offering.course_code);
    let html = context.fetch_page(&url).await?;
    let profile_href = find_profile_link(&html, offering)?;
    match &profile_href {
        Some(href) => info!("Found profile for {}: {href}", offering.course_code),
        None => info!(
            "No {} {} profile listed for {}",
            offering.semester.directory_label(),
            offering.year,
            offering.course_code
        ),
    }
    Ok(profile_href)
}

pub fn find_profile_link(html: &str, offering: &Offering) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);

    if document.select(&COURSE_NOT_FOUND).next().is_some() {
        return Err(ScrapeError::CourseNotFound {
            course: offering.course_code.clone(),
        });
    }

    let year = offering.year.to_string();
    let semester_label = offering.semester.directory_label();

    for row in document.select(&OFFERING_ROW) {
        let text = extract_text(row);
        let text = text.trim();
        if text.contains(&year) && text.contains(semester_label) && !text.contains("unavailable") {
            debug!("Matched offering row: {text:?}");
            // First matching row decides, even if it carries no link.
            let href = row
                .select(&AVAILABLE_PROFILE_LINK)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(String::from);
            return Ok(href);
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"
        <html><body>
        <table id="course-current-offerings">
          <thead><tr><th>Semester</th><th>Location</th><th>Mode</th><th>Profile</th></tr></thead>
          <tbody>
            <tr>
              <td>Semester 1, 2025</td><td>St Lucia</td><td>In Person</td>
              <td><a class="profile-available" href="https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20510-7560">Course Profile</a></td>
            </tr>
            <tr>
              <td>Semester 2, 2025</td><td>External</td><td>External</td>
              <td><span class="profile-unavailable">Course profile unavailable</span></td>
            </tr>
            <tr>
              <td>Semester 2, 2025</td><td>St Lucia</td><td>In Person</td>
              <td><a class="profile-available" href="https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20520-7620">Course Profile</a></td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    fn offering(semester: &str, year: &str) -> Offering {
        Offering::new("CSSE2002", semester, year).unwrap()
    }

    #[test]
    fn finds_matching_row() {
        let href = find_profile_link(DIRECTORY, &offering("1", "2025")).unwrap();
        assert_eq!(
            href.as_deref(),
            Some("https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20510-7560")
        );
    }

    #[test]
    fn skips_unavailable_rows() {
        let href = find_profile_link(DIRECTORY, &offering("2", "2025")).unwrap();
        assert_eq!(
            href.as_deref(),
            Some("https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20520-7620")
        );
    }

    #[test]
    fn no_row_for_year_or_semester() {
        assert_eq!(find_profile_link(DIRECTORY, &offering("1", "2019")).unwrap(), None);
        assert_eq!(find_profile_link(DIRECTORY, &offering("3", "2025")).unwrap(), None);
    }

    #[test]
    fn not_found_marker() {
        let html = r#"<html><body><div id="course-notfound">Course not found</div></body></html>"#;
        let err = find_profile_link(html, &offering("1", "2025")).unwrap_err();
        assert!(matches!(err, ScrapeError::CourseNotFound { ref course } if course == "CSSE2002"));
    }

    #[test]
    fn summer_label() {
        let html = r#"
            <table><tr>
              <td>Summer Semester, 2024</td>
              <td><a class="profile-available" href="/course-profiles/CSSE2002-20530-1">Profile</a></td>
            </tr></table>
        "#;
        let href = find_profile_link(html, &offering("3", "2024")).unwrap();
        assert_eq!(href.as_deref(), Some("/course-profiles/CSSE2002-20530-1"));
    }
}
