use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DateRange {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub from: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub to: Option<NaiveDate>,
}

/// Accepts `2026-01-05` as well as full timestamps such as the
/// `2026-01-05T18:30:00.000Z` strings browsers write for dates.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|stamp| stamp.date_naive()))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|text| {
        parse_date(&text).ok_or_else(|| de::Error::custom(format!("invalid date '{text}'")))
    })
    .transpose()
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterSet {
    pub name: String,
    #[serde(default)]
    pub date: Option<DateRange>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<String>,
}

/// KPI values are displayed verbatim, so both "₹9.3M" and 421 are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Number(value) => write!(f, "{value}"),
            KpiValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        KpiValue::Text(value.to_string())
    }
}

impl From<f64> for KpiValue {
    fn from(value: f64) -> Self {
        KpiValue::Number(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiEntry {
    pub label: String,
    pub value: KpiValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl KpiEntry {
    pub fn new(label: &str, value: impl Into<KpiValue>, category: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            category: category.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillDownSelection {
    pub label: String,
    pub value: KpiValue,
}

impl From<&KpiEntry> for DrillDownSelection {
    fn from(entry: &KpiEntry) -> Self {
        Self {
            label: entry.label.clone(),
            value: entry.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub month: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillDownDetail {
    pub title: String,
    pub label: String,
    pub value: KpiValue,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub user: String,
    pub action: String,
    pub item: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportFolder {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedUser {
    pub name: String,
    pub email: String,
}

pub type FormSubmission = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleReport {
    pub id: u32,
    pub name: String,
    pub folder: String,
    pub editable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportVersion {
    pub version: String,
    pub date: String,
    pub editor: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSchedule {
    pub report_name: String,
    pub frequency: String,
    pub at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterView {
    pub mode: String,
    pub date: DateRange,
    pub selected_categories: Vec<String>,
    pub selected_kpis: Vec<String>,
    pub available_categories: Vec<String>,
    pub available_kpis: Vec<String>,
    pub generation: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub dashboard: String,
    pub editable: bool,
    pub filter: FilterView,
    pub kpis: Vec<KpiEntry>,
    pub visible_kpis: Vec<KpiEntry>,
    pub filter_sets: Vec<FilterSet>,
    pub drilldown: Option<DrillDownDetail>,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct DrillDownRequest {
    pub label: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
