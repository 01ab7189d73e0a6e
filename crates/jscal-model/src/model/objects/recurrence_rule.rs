//! Recurrence rules, converted through serde by list views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::registry::types;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::Hourly => "hourly",
            Self::Minutely => "minutely",
            Self::Secondly => "secondly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn recurrence_rule_type() -> String {
    types::RECURRENCE_RULE.to_string()
}

fn nday_type() -> String {
    types::NDAY.to_string()
}

/// A day of the week, optionally the nth of the period (`-1` is the last).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NDay {
    #[serde(rename = "@type", default = "nday_type")]
    pub object_type: String,
    /// Two-letter day: `mo`, `tu`, ...
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth_of_period: Option<i32>,
}

impl NDay {
    #[must_use]
    pub fn new(day: impl Into<String>, nth_of_period: Option<i32>) -> Self {
        Self {
            object_type: nday_type(),
            day: day.into(),
            nth_of_period,
        }
    }
}

/// One `recurrenceRules` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "@type", default = "recurrence_rule_type")]
    pub object_type: String,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rscale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_day: Vec<NDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month_day: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_year_day: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_week_no: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_hour: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_minute: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_second: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_set_position: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDateTime>,
}

impl RecurrenceRule {
    /// Creates a rule with only a frequency.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            object_type: recurrence_rule_type(),
            frequency,
            interval: None,
            rscale: None,
            skip: None,
            first_day_of_week: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
            by_second: Vec::new(),
            by_set_position: Vec::new(),
            count: None,
            until: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_jscalendar_names() {
        let mut rule = RecurrenceRule::new(Frequency::Weekly);
        rule.by_day = vec![NDay::new("mo", None), NDay::new("fr", Some(-1))];
        rule.until = NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(9, 0, 0));

        assert_eq!(
            serde_json::to_value(&rule).expect("serializes"),
            json!({
                "@type": "RecurrenceRule",
                "frequency": "weekly",
                "byDay": [
                    {"@type": "NDay", "day": "mo"},
                    {"@type": "NDay", "day": "fr", "nthOfPeriod": -1}
                ],
                "until": "2024-03-01T09:00:00"
            })
        );
    }

    #[test]
    fn discriminator_is_optional_on_input() {
        let rule: RecurrenceRule =
            serde_json::from_value(json!({"frequency": "daily", "count": 5})).expect("parses");
        assert_eq!(rule.object_type, types::RECURRENCE_RULE);
        assert_eq!(rule.count, Some(5));
    }
}
