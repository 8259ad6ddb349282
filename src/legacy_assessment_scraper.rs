use log::{debug, info, warn};
use scraper::{ElementRef, Html};

use crate::{
    course_profile::LegacyAssessmentDetail,
    requests::PageFetcher,
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    selectors::{TABLE, TABLE_BODY_ROW, TABLE_CELL},
    text_manipulators::{extract_normalized_text, non_empty},
};

pub async fn extract<F: PageFetcher>(
    context: &ScrapingContext<F>,
    section_code: &str,
) -> Result<Vec<LegacyAssessmentDetail>, ScrapeError> {
    let url = context.scraping_config.get_legacy_profile_url(section_code);
    let html = context.fetch_page(&url).await?;
    let assessments = parse_assessment_table(&html);
    info!(
        "Extracted {} legacy assessments for section {section_code}",
        assessments.len()
    );
    Ok(assessments)
}

/// Rows of the first table on an archive assessment page, in page order.
/// Columns are task, due date, weight and objectives.
pub fn parse_assessment_table(html: &str) -> Vec<LegacyAssessmentDetail> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&TABLE).next() else {
        warn!("Legacy profile has no assessment table");
        return vec![];
    };

    table
        .select(&TABLE_BODY_ROW)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(&TABLE_CELL).collect();
            // Header rows end up in the implied tbody when there's no thead.
            if cells.is_empty() {
                debug!("Skipping legacy table row without data cells");
                return None;
            }
            let cell_text = |i: usize| {
                cells
                    .get(i)
                    .map(|&cell| extract_normalized_text(cell))
                    .unwrap_or_default()
            };

            let assessment = LegacyAssessmentDetail {
                task: cell_text(0),
                due_date: non_empty(cell_text(1)),
                weight: cell_text(2),
                objectives: non_empty(cell_text(3)),
            };
            debug!("Legacy assessment row: {assessment:?}");
            Some(assessment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_order() {
        let html = r#"
            <table>
              <thead><tr><th>Assessment Task</th><th>Due Date</th><th>Weighting</th><th>Learning Objectives</th></tr></thead>
              <tbody>
                <tr><td>Report
                      1</td><td>  12 Apr 24 16:00 </td><td>30%</td><td>1, 2,
                      3</td></tr>
                <tr><td>Quiz</td><td>Week 4 -
                      Week 10</td><td>20%</td><td>4</td></tr>
                <tr><td>Final   Exam</td><td>Exam Period</td><td>50%</td><td>1, 2, 3, 4</td></tr>
              </tbody>
            </table>
            <table><tbody><tr><td>Not an assessment</td></tr></tbody></table>
        "#;
        let assessments = parse_assessment_table(html);
        assert_eq!(
            assessments,
            vec![
                LegacyAssessmentDetail {
                    task: "Report 1".into(),
                    due_date: Some("12 Apr 24 16:00".into()),
                    weight: "30%".into(),
                    objectives: Some("1, 2, 3".into()),
                },
                LegacyAssessmentDetail {
                    task: "Quiz".into(),
                    due_date: Some("Week 4 - Week 10".into()),
                    weight: "20%".into(),
                    objectives: Some("4".into()),
                },
                LegacyAssessmentDetail {
                    task: "Final Exam".into(),
                    due_date: Some("Exam Period".into()),
                    weight: "50%".into(),
                    objectives: Some("1, 2, 3, 4".into()),
                },
            ]
        );
    }

    #[test]
    fn short_rows_leave_fields_empty() {
        let html = "<table><tbody><tr><td>Participation</td><td></td><td>10</td></tr></tbody></table>";
        let assessments = parse_assessment_table(html);
        assert_eq!(assessments.len(), 1);
        assert_eq!(assessments[0].task, "Participation");
        assert_eq!(assessments[0].due_date, None);
        assert_eq!(assessments[0].weight, "10");
        assert_eq!(assessments[0].objectives, None);
    }

    #[test]
    fn header_row_without_thead_is_skipped() {
        let html = r#"
            <table>
              <tr><th>Assessment Task</th><th>Due Date</th><th>Weighting</th><th>Learning Objectives</th></tr>
              <tr><td>Quiz</td><td>Week 5</td><td>10%</td><td>1</td></tr>
            </table>
        "#;
        assert_eq!(
            parse_assessment_table(html),
            vec![LegacyAssessmentDetail {
                task: "Quiz".into(),
                due_date: Some("Week 5".into()),
                weight: "10%".into(),
                objectives: Some("1".into()),
            }]
        );
    }

    #[test]
    fn no_table_means_no_assessments() {
        assert!(parse_assessment_table("<html><body><p>Nothing here</p></body></html>").is_empty());
    }

    #[test]
    fn empty_table_means_no_assessments() {
        assert!(parse_assessment_table("<table><tbody></tbody></table>").is_empty());
    }
}
