// SPDX-License-Identifier: MIT

//! Same-day detail aggregation for display.

use serde::Serialize;

use crate::models::{DetailAggregation, DetailKind, Habit, HabitRecord};

/// Aggregated view of one detail across a day's records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSummary {
    pub detail_id: String,
    pub name: String,
    pub unit: Option<String>,
    /// Aggregated numeric value (numeric details only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    /// Chronological text entries (text details only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<String>,
    /// Number of values that contributed
    pub samples: u32,
}

/// Combine a day's detail values per the habit's detail definitions.
///
/// Numeric details are summed, or averaged when the definition says so;
/// a definition without an aggregation rule defaults to sum. Values that
/// fail to parse as numbers are skipped. Text details collect their
/// values in completion-time order. Records for other habits are
/// ignored.
pub fn summarize_details(habit: &Habit, records: &[HabitRecord]) -> Vec<DetailSummary> {
    let mut own: Vec<&HabitRecord> = records.iter().filter(|r| r.habit_id == habit.id).collect();
    own.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));

    habit
        .details
        .iter()
        .map(|detail| {
            let values: Vec<&crate::models::DetailValue> = own
                .iter()
                .flat_map(|r| r.details.iter())
                .filter(|v| v.detail_id == detail.id)
                .collect();

            let unit = detail
                .unit
                .clone()
                .or_else(|| values.iter().find_map(|v| v.unit.clone()));

            match detail.kind {
                DetailKind::Number => {
                    let numbers: Vec<f64> = values
                        .iter()
                        .filter_map(|v| v.value.trim().parse::<f64>().ok())
                        .collect();
                    let samples = numbers.len() as u32;
                    let number = if numbers.is_empty() {
                        None
                    } else {
                        let sum: f64 = numbers.iter().sum();
                        match detail.aggregation.unwrap_or(DetailAggregation::Sum) {
                            DetailAggregation::Sum => Some(sum),
                            DetailAggregation::Average => Some(sum / numbers.len() as f64),
                        }
                    };
                    DetailSummary {
                        detail_id: detail.id.clone(),
                        name: detail.name.clone(),
                        unit,
                        number,
                        texts: Vec::new(),
                        samples,
                    }
                }
                DetailKind::Text => {
                    let texts: Vec<String> = values.iter().map(|v| v.value.clone()).collect();
                    let samples = texts.len() as u32;
                    DetailSummary {
                        detail_id: detail.id.clone(),
                        name: detail.name.clone(),
                        unit,
                        number: None,
                        texts,
                        samples,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityDetail, DetailValue};
    use chrono::{Duration, Utc};

    fn habit_with_details(details: Vec<ActivityDetail>) -> Habit {
        Habit {
            details,
            ..Habit::new("Run")
        }
    }

    fn number_detail(id: &str, aggregation: Option<DetailAggregation>) -> ActivityDetail {
        ActivityDetail {
            id: id.to_string(),
            name: "Distance".to_string(),
            kind: DetailKind::Number,
            unit: Some("km".to_string()),
            aggregation,
        }
    }

    fn text_detail(id: &str) -> ActivityDetail {
        ActivityDetail {
            id: id.to_string(),
            name: "Notes".to_string(),
            kind: DetailKind::Text,
            unit: None,
            aggregation: None,
        }
    }

    fn record_with(habit: &Habit, minutes_ago: i64, values: Vec<(&str, &str)>) -> HabitRecord {
        let ts = Utc::now() - Duration::minutes(minutes_ago);
        HabitRecord {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            created_at: ts,
            completed_at: ts,
            details: values
                .into_iter()
                .map(|(detail_id, value)| DetailValue {
                    detail_id: detail_id.to_string(),
                    value: value.to_string(),
                    unit: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_sum_aggregation() {
        let habit = habit_with_details(vec![number_detail("d1", Some(DetailAggregation::Sum))]);
        let records = vec![
            record_with(&habit, 10, vec![("d1", "2.5")]),
            record_with(&habit, 5, vec![("d1", "4")]),
        ];

        let out = summarize_details(&habit, &records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].number, Some(6.5));
        assert_eq!(out[0].samples, 2);
        assert_eq!(out[0].unit.as_deref(), Some("km"));
    }

    #[test]
    fn test_average_aggregation() {
        let habit = habit_with_details(vec![number_detail("d1", Some(DetailAggregation::Average))]);
        let records = vec![
            record_with(&habit, 10, vec![("d1", "3")]),
            record_with(&habit, 5, vec![("d1", "5")]),
        ];

        let out = summarize_details(&habit, &records);
        assert_eq!(out[0].number, Some(4.0));
    }

    #[test]
    fn test_unparseable_numbers_skipped() {
        let habit = habit_with_details(vec![number_detail("d1", None)]);
        let records = vec![
            record_with(&habit, 10, vec![("d1", "not a number")]),
            record_with(&habit, 5, vec![("d1", "2")]),
        ];

        let out = summarize_details(&habit, &records);
        assert_eq!(out[0].number, Some(2.0));
        assert_eq!(out[0].samples, 1);
    }

    #[test]
    fn test_text_values_chronological() {
        let habit = habit_with_details(vec![text_detail("d1")]);
        let records = vec![
            record_with(&habit, 5, vec![("d1", "later")]),
            record_with(&habit, 60, vec![("d1", "earlier")]),
        ];

        let out = summarize_details(&habit, &records);
        assert_eq!(out[0].texts, vec!["earlier", "later"]);
        assert_eq!(out[0].number, None);
    }

    #[test]
    fn test_foreign_records_ignored() {
        let habit = habit_with_details(vec![number_detail("d1", None)]);
        let other = habit_with_details(vec![number_detail("d1", None)]);
        let records = vec![record_with(&other, 5, vec![("d1", "99")])];

        let out = summarize_details(&habit, &records);
        assert_eq!(out[0].number, None);
        assert_eq!(out[0].samples, 0);
    }
}
