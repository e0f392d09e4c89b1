//! The sample report list with its version history and scheduling. Every
//! action on a report lands in the audit trail.

use crate::audit;
use crate::errors::AppError;
use crate::models::{ReportSchedule, ReportVersion, SampleReport};
use crate::storage::KeyValueStore;
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub const VIEWED_VERSION_ACTION: &str = "Viewed Report Version";
pub const OPENED_SCHEDULE_ACTION: &str = "Opened Schedule";
pub const SCHEDULED_ACTION: &str = "Scheduled Report";
pub const DEFAULT_SCHEDULE_TIME: &str = "10:00";

const SAMPLE_REPORTS: [(u32, &str, &str, bool); 3] = [
    (1, "Q2 Financials", "Finance", true),
    (2, "Retail Store Stats", "Retail", true),
    (3, "Operations Audit", "Audit", false),
];

const VERSIONS: [(&str, &str, &str, &str); 3] = [
    ("v1.0", "2024-06-01", "Alice", "Initial draft"),
    ("v1.1", "2024-06-07", "Bob", "Fixed summary"),
    ("v2.0", "2024-06-10", "Alice", "Major revision"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        })
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.to_string().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "frequency must be Daily, Weekly or Monthly, got '{value}'"
                ))
            })
    }
}

pub fn sample_reports() -> Vec<SampleReport> {
    SAMPLE_REPORTS
        .iter()
        .map(|&(id, name, folder, editable)| SampleReport {
            id,
            name: name.to_string(),
            folder: folder.to_string(),
            editable,
        })
        .collect()
}

pub fn find(id: u32) -> Result<SampleReport, AppError> {
    sample_reports()
        .into_iter()
        .find(|report| report.id == id)
        .ok_or_else(|| AppError::not_found(format!("no report with id {id}")))
}

/// Version history of a report; records the view.
pub fn view_versions<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: u32,
) -> Result<Vec<ReportVersion>, AppError> {
    let report = find(id)?;
    audit::record(store, VIEWED_VERSION_ACTION, &report.name)?;
    Ok(VERSIONS
        .iter()
        .map(|&(version, date, editor, notes)| ReportVersion {
            version: version.to_string(),
            date: date.to_string(),
            editor: editor.to_string(),
            notes: notes.to_string(),
        })
        .collect())
}

/// Opens the schedule form with its defaults; records the open.
pub fn open_schedule<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: u32,
) -> Result<ReportSchedule, AppError> {
    let report = find(id)?;
    audit::record(store, OPENED_SCHEDULE_ACTION, &report.name)?;
    Ok(ReportSchedule {
        report_name: report.name,
        frequency: Frequency::default().to_string(),
        at: DEFAULT_SCHEDULE_TIME.to_string(),
    })
}

/// Missing fields fall back to weekly at 10:00. `at` must read `HH:MM`.
pub fn schedule<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: u32,
    frequency: Option<&str>,
    at: Option<&str>,
) -> Result<ReportSchedule, AppError> {
    let report = find(id)?;
    let frequency = match frequency {
        Some(value) => value.parse()?,
        None => Frequency::default(),
    };
    let at = at.map(str::trim).unwrap_or(DEFAULT_SCHEDULE_TIME);
    let time = NaiveTime::parse_from_str(at, "%H:%M")
        .map_err(|_| AppError::bad_request(format!("schedule time must be HH:MM, got '{at}'")))?;
    let schedule = ReportSchedule {
        report_name: report.name,
        frequency: frequency.to_string(),
        at: time.format("%H:%M").to_string(),
    };
    audit::record(
        store,
        SCHEDULED_ACTION,
        &format!("{} ({} at {})", schedule.report_name, schedule.frequency, schedule.at),
    )?;
    info!("scheduled '{}' {} at {}", schedule.report_name, schedule.frequency, schedule.at);
    Ok(schedule)
}
