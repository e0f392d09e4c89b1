use crate::errors::AppError;
use crate::models::AuditEntry;
use crate::storage::{AUDIT_TRAIL_KEY, KeyValueStore, read_json_list, write_json};
use chrono::{DateTime, Local};

pub const AUDIT_CAPACITY: usize = 50;
const AUDIT_USER: &str = "User";

pub fn entries<S: KeyValueStore + ?Sized>(store: &S) -> Vec<AuditEntry> {
    read_json_list(store, AUDIT_TRAIL_KEY)
}

pub fn record<S: KeyValueStore + ?Sized>(
    store: &mut S,
    action: &str,
    item: &str,
) -> Result<AuditEntry, AppError> {
    record_at(store, action, item, Local::now())
}

/// Prepends an entry and keeps the newest [`AUDIT_CAPACITY`] entries.
pub fn record_at<S: KeyValueStore + ?Sized>(
    store: &mut S,
    action: &str,
    item: &str,
    now: DateTime<Local>,
) -> Result<AuditEntry, AppError> {
    let mut trail = entries(store);
    let newest = trail.first().map(|entry| entry.id).unwrap_or(i64::MIN);
    let entry = AuditEntry {
        id: now.timestamp_millis().max(newest.saturating_add(1)),
        user: AUDIT_USER.to_string(),
        action: action.to_string(),
        item: item.to_string(),
        date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    trail.insert(0, entry.clone());
    trail.truncate(AUDIT_CAPACITY);
    write_json(store, AUDIT_TRAIL_KEY, &trail)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreData;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut store = StoreData::default();
        record_at(&mut store, "Viewed KPI Details", "Stores", at(1_000)).unwrap();
        record_at(&mut store, "Viewed KPI Details", "Churn Rate", at(2_000)).unwrap();
        let trail = entries(&store);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].item, "Churn Rate");
        assert_eq!(trail[0].user, "User");
    }

    #[test]
    fn trail_is_capped() {
        let mut store = StoreData::default();
        for i in 0..60 {
            record_at(&mut store, "Viewed KPI Details", &format!("kpi-{i}"), at(1_000 + i)).unwrap();
        }
        let trail = entries(&store);
        assert_eq!(trail.len(), AUDIT_CAPACITY);
        assert_eq!(trail[0].item, "kpi-59");
        assert_eq!(trail[AUDIT_CAPACITY - 1].item, "kpi-10");
    }

    #[test]
    fn ids_stay_monotonic_within_the_same_millisecond() {
        let mut store = StoreData::default();
        let first = record_at(&mut store, "a", "x", at(5)).unwrap();
        let second = record_at(&mut store, "b", "y", at(5)).unwrap();
        assert!(second.id > first.id);
    }
}
