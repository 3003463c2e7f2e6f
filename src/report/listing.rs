use crate::store::Snapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Criteria for narrowing the evaluation listing. Empty fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationFilter {
    /// Case-insensitive substring of the project title
    pub project: Option<String>,
    /// Case-insensitive substring of the evaluator id or e-mail
    pub evaluator: Option<String>,
    /// Exact category name
    pub category: Option<String>,
    /// First day included (UTC)
    pub from: Option<NaiveDate>,
    /// Last day included (UTC)
    pub to: Option<NaiveDate>,
}

/// One evaluation joined with its project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    pub project_id: String,
    /// `None` when the project is missing from the snapshot
    pub project_title: Option<String>,
    pub category: Option<String>,
    pub evaluator_id: String,
    pub evaluator: String,
    pub scores: BTreeMap<String, f64>,
    pub raw_total: f64,
    pub comment: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Trimmed, lower-cased needle; blank input means no filter
fn needle(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

impl EvaluationFilter {
    fn has_date_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether an entry passes every filter that is set.
    ///
    /// With a date bound set, entries without a timestamp are dropped.
    pub fn matches(&self, entry: &EvaluationEntry) -> bool {
        if let Some(project) = needle(&self.project) {
            let title = entry.project_title.as_deref().unwrap_or_default();
            if !title.to_lowercase().contains(&project) {
                return false;
            }
        }

        if let Some(evaluator) = needle(&self.evaluator) {
            let hit = entry.evaluator_id.to_lowercase().contains(&evaluator)
                || entry.evaluator.to_lowercase().contains(&evaluator);
            if !hit {
                return false;
            }
        }

        if let Some(ref category) = self.category {
            if entry.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if self.has_date_range() {
            let Some(day) = entry.timestamp.map(|t| t.date_naive()) else {
                return false;
            };
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }

        true
    }
}

/// Every evaluation in the snapshot that passes `filter`, newest first.
/// Evaluations without a timestamp come last, in store order.
pub fn list_evaluations(snapshot: &Snapshot, filter: &EvaluationFilter) -> Vec<EvaluationEntry> {
    let mut entries: Vec<EvaluationEntry> = snapshot
        .evaluations
        .iter()
        .map(|evaluation| {
            let project = snapshot.project(&evaluation.project_id);
            EvaluationEntry {
                project_id: evaluation.project_id.clone(),
                project_title: project.map(|p| p.title.clone()),
                category: project.map(|p| p.category.clone()),
                evaluator_id: evaluation.evaluator_id.clone(),
                evaluator: evaluation.evaluator_label().to_string(),
                scores: evaluation.scores.clone(),
                raw_total: evaluation.raw_total(),
                comment: evaluation.comment.clone(),
                timestamp: evaluation.timestamp,
            }
        })
        .filter(|entry| filter.matches(entry))
        .collect();

    // None < Some, so missing timestamps sort last; sort_by is stable
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Evaluation, Project};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(2025, 10, day, hour, 0, 0).single()
    }

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 10, day)
    }

    fn evaluation(
        project: &str,
        evaluator: &str,
        email: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Evaluation {
        let mut eval = Evaluation::new(project, evaluator, BTreeMap::from([("C1".to_string(), 1.0)]));
        eval.evaluator_email = email.map(str::to_string);
        eval.timestamp = timestamp;
        eval
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Project::new("p1", "Horta Escolar", "Extensão"),
                Project::new("p2", "Secador Solar", "IFTECH"),
                Project::new("p3", "Horta Vertical", "IFTECH"),
            ],
            vec![
                evaluation("p1", "ev-a", Some("ana@fair.example"), at(14, 9)),
                evaluation("p2", "ev-b", None, at(16, 10)),
                evaluation("p3", "ev-a", Some("ana@fair.example"), None),
                evaluation("p3", "ev-c", None, at(15, 23)),
                evaluation("gone", "ev-b", None, at(17, 8)),
            ],
        )
    }

    fn keys(entries: &[EvaluationEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.project_id.as_str(), e.evaluator_id.as_str()))
            .collect()
    }

    #[test]
    fn test_newest_first_untimed_last() {
        let entries = list_evaluations(&snapshot(), &EvaluationFilter::default());
        assert_eq!(
            keys(&entries),
            vec![
                ("gone", "ev-b"),
                ("p2", "ev-b"),
                ("p3", "ev-c"),
                ("p1", "ev-a"),
                ("p3", "ev-a"),
            ]
        );
        assert_eq!(entries[0].project_title, None);
        assert_eq!(entries[1].project_title.as_deref(), Some("Secador Solar"));
    }

    #[test]
    fn test_project_title_substring_ignores_case() {
        let filter = EvaluationFilter {
            project: Some("  hORTA ".to_string()),
            ..Default::default()
        };
        let entries = list_evaluations(&snapshot(), &filter);
        assert_eq!(
            keys(&entries),
            vec![("p3", "ev-c"), ("p1", "ev-a"), ("p3", "ev-a")]
        );
    }

    #[test]
    fn test_evaluator_matches_id_or_email() {
        let by_email = EvaluationFilter {
            evaluator: Some("ANA@".to_string()),
            ..Default::default()
        };
        assert_eq!(
            keys(&list_evaluations(&snapshot(), &by_email)),
            vec![("p1", "ev-a"), ("p3", "ev-a")]
        );

        let by_id = EvaluationFilter {
            evaluator: Some("ev-b".to_string()),
            ..Default::default()
        };
        assert_eq!(
            keys(&list_evaluations(&snapshot(), &by_id)),
            vec![("gone", "ev-b"), ("p2", "ev-b")]
        );
    }

    #[test]
    fn test_category_is_exact() {
        let filter = EvaluationFilter {
            category: Some("IFTECH".to_string()),
            ..Default::default()
        };
        let entries = list_evaluations(&snapshot(), &filter);
        assert_eq!(
            keys(&entries),
            vec![("p2", "ev-b"), ("p3", "ev-c"), ("p3", "ev-a")]
        );

        let partial = EvaluationFilter {
            category: Some("IFT".to_string()),
            ..Default::default()
        };
        assert!(list_evaluations(&snapshot(), &partial).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive_by_day() {
        let filter = EvaluationFilter {
            from: date(15),
            to: date(16),
            ..Default::default()
        };
        // 15th 23:00 and 16th 10:00 both fall on included days
        assert_eq!(
            keys(&list_evaluations(&snapshot(), &filter)),
            vec![("p2", "ev-b"), ("p3", "ev-c")]
        );
    }

    #[test]
    fn test_open_ended_date_range_drops_untimed() {
        let from = EvaluationFilter {
            from: date(16),
            ..Default::default()
        };
        assert_eq!(
            keys(&list_evaluations(&snapshot(), &from)),
            vec![("gone", "ev-b"), ("p2", "ev-b")]
        );

        let to = EvaluationFilter {
            to: date(14),
            ..Default::default()
        };
        assert_eq!(keys(&list_evaluations(&snapshot(), &to)), vec![("p1", "ev-a")]);
    }

    #[test]
    fn test_filters_combine() {
        let filter = EvaluationFilter {
            project: Some("horta".to_string()),
            category: Some("IFTECH".to_string()),
            from: date(1),
            ..Default::default()
        };
        assert_eq!(
            keys(&list_evaluations(&snapshot(), &filter)),
            vec![("p3", "ev-c")]
        );
    }
}
