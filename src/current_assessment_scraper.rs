use std::collections::BTreeMap;

use log::{debug, info, warn};
use scraper::{ElementRef, Html, Selector};

use crate::{
    course_profile::AssessmentDetail,
    requests::PageFetcher,
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    selectors::{
        ASSESSMENT_DETAILS, ASSESSMENT_HEADING, COLLAPSIBLE, DEFINITION_LIST, DEFINITION_TERM,
        DEFINITION_VALUE, ICON_LIST, PARAGRAPH, SUB_HEADING,
    },
    text_manipulators::{extract_normalized_text, extract_text, non_empty},
};

pub async fn extract<F: PageFetcher>(
    context: &ScrapingContext<F>,
    section_code: &str,
) -> Result<Vec<AssessmentDetail>, ScrapeError> {
    let url = context
        .scraping_config
        .get_current_profile_url(section_code, "assessment");
    let html = context.fetch_page(&url).await?;
    let assessments = parse_assessment_details(&html);
    info!(
        "Extracted {} assessments for section {section_code}",
        assessments.len()
    );
    Ok(assessments)
}

/// One `AssessmentDetail` per `h3` in the assessment details section, in page
/// order.
pub fn parse_assessment_details(html: &str) -> Vec<AssessmentDetail> {
    let document = Html::parse_document(html);

    let Some(section) = document.select(&ASSESSMENT_DETAILS).next() else {
        warn!("Profile has no assessment details section");
        return vec![];
    };

    section
        .select(&ASSESSMENT_HEADING)
        .filter_map(|heading| {
            let assessment = parse_assessment(heading)?;
            debug!("Assessment: {assessment:?}");
            Some(assessment)
        })
        .collect()
}

/// `None` for a heading with no text; there's nothing to title the record by.
fn parse_assessment(heading: ElementRef) -> Option<AssessmentDetail> {
    let title = extract_normalized_text(heading);
    if title.is_empty() {
        debug!("Skipping assessment heading without text");
        return None;
    }
    let mut assessment = AssessmentDetail {
        title,
        ..Default::default()
    };

    if let Some(list) = next_in_block(heading, &DEFINITION_LIST) {
        apply_definition_list(&mut assessment, list);
    }

    if let Some(collapsible) = next_in_block(heading, &COLLAPSIBLE) {
        assessment.task_description = collapsible
            .select(&PARAGRAPH)
            .next()
            .map(extract_normalized_text)
            .and_then(non_empty);
        assessment.hurdle_requirements = hurdle_requirements(collapsible);
    }

    let is_hurdled = next_in_block(heading, &ICON_LIST)
        .is_some_and(|icons| extract_text(icons).contains("Hurdle"));
    assessment.is_hurdled = Some(is_hurdled);

    Some(assessment)
}

/// The first sibling after `heading` matching `selector`, without running into
/// the next assessment's heading.
fn next_in_block<'a>(heading: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| !ASSESSMENT_HEADING.matches(sibling))
        .find(|sibling| selector.matches(sibling))
}

fn apply_definition_list(assessment: &mut AssessmentDetail, list: ElementRef) {
    let mut additional_details = BTreeMap::new();

    for term in list.select(&DEFINITION_TERM) {
        let label = extract_normalized_text(term);
        let value = term
            .next_siblings()
            .find_map(ElementRef::wrap)
            .filter(|next| DEFINITION_VALUE.matches(next))
            .map(extract_normalized_text)
            .unwrap_or_default();

        match label.as_str() {
            "Mode" => assessment.mode = Some(value),
            "Category" => assessment.category = Some(value),
            "Weight" => assessment.weight = value,
            "Due date" => assessment.due_date = Some(value),
            "Learning outcomes" => assessment.learning_outcomes = Some(value),
            _ => {
                additional_details.insert(label, value);
            }
        }
    }

    if !additional_details.is_empty() {
        assessment.additional_details = Some(additional_details);
    }
}

/// Text of the paragraphs under a "Hurdle requirements" sub-heading, if the
/// task description has one.
fn hurdle_requirements(collapsible: ElementRef) -> Option<String> {
    let sub_heading = collapsible
        .select(&SUB_HEADING)
        .find(|h| extract_text(*h).contains("Hurdle requirements"))?;

    let text = sub_heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| !SUB_HEADING.matches(sibling))
        .filter(|sibling| PARAGRAPH.matches(sibling))
        .map(extract_normalized_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(text)
}
