use std::collections::BTreeMap;

use serde::Serialize;

use crate::weight::parse_weight;

/// One graded item from a current-format profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetail {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Kept as the page prints it; sometimes `"30%"`, sometimes `"30"`.
    pub weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_outcomes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hurdle_requirements: Option<String>,
    /// Labelled fields the extractor has no slot for, keyed by the label
    /// exactly as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hurdled: Option<bool>,
}

/// One row of a legacy (archive) assessment table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAssessmentDetail {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
}

impl From<LegacyAssessmentDetail> for AssessmentDetail {
    fn from(legacy: LegacyAssessmentDetail) -> Self {
        AssessmentDetail {
            title: legacy.task,
            weight: legacy.weight,
            due_date: legacy.due_date,
            learning_outcomes: legacy.objectives,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Assessments {
    Legacy(Vec<LegacyAssessmentDetail>),
    Current(Vec<AssessmentDetail>),
}

impl Assessments {
    pub fn len(&self) -> usize {
        match self {
            Assessments::Legacy(items) => items.len(),
            Assessments::Current(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn weights(&self) -> Vec<&str> {
        match self {
            Assessments::Legacy(items) => items.iter().map(|a| a.weight.as_str()).collect(),
            Assessments::Current(items) => items.iter().map(|a| a.weight.as_str()).collect(),
        }
    }

    /// Both shapes as current-format records; legacy rows lose nothing but
    /// gain no category, mode or hurdle information either.
    pub fn into_current(self) -> Vec<AssessmentDetail> {
        match self {
            Assessments::Legacy(items) => items.into_iter().map(AssessmentDetail::from).collect(),
            Assessments::Current(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMetadata {
    pub course_name: String,
    pub course_code: String,
    /// Empty when the overview doesn't list units.
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub course_name: String,
    pub course_code: String,
    pub units: String,
    pub assessments: Assessments,
}

impl ExtractionResult {
    pub fn new(metadata: CourseMetadata, assessments: Assessments) -> Self {
        Self {
            course_name: metadata.course_name,
            course_code: metadata.course_code,
            units: metadata.units,
            assessments,
        }
    }

    /// Sum of every weight that reads as a number, as a fraction of 1.
    pub fn total_weight(&self) -> f64 {
        self.assessments
            .weights()
            .into_iter()
            .filter_map(parse_weight)
            .sum()
    }
}
