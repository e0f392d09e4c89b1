use crate::errors::AppError;
use crate::models::{DateRange, FilterSet, FilterView};
use crate::storage::{FILTER_SETS_KEY, KeyValueStore, read_json_list, write_json};
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use tracing::info;

pub const MAX_FILTER_SET_NAME: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    ThisWeek,
    ThisMonth,
    LastSixMonths,
    ThisYear,
    PreviousYear,
}

impl DatePreset {
    pub const ALL: [DatePreset; 5] = [
        DatePreset::ThisWeek,
        DatePreset::ThisMonth,
        DatePreset::LastSixMonths,
        DatePreset::ThisYear,
        DatePreset::PreviousYear,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            DatePreset::ThisWeek => "this-week",
            DatePreset::ThisMonth => "this-month",
            DatePreset::LastSixMonths => "last-6-months",
            DatePreset::ThisYear => "this-year",
            DatePreset::PreviousYear => "previous-year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::ThisWeek => "This Week",
            DatePreset::ThisMonth => "This Month",
            DatePreset::LastSixMonths => "Last 6 Months",
            DatePreset::ThisYear => "This Year",
            DatePreset::PreviousYear => "Previous Year",
        }
    }

    /// Concrete range relative to `today`. Weeks start on Monday.
    pub fn range_at(self, today: NaiveDate) -> DateRange {
        match self {
            DatePreset::ThisWeek => {
                let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                DateRange::new(Some(start), Some(start + Duration::days(6)))
            }
            DatePreset::ThisMonth => {
                let start = today.with_day(1);
                let end = start
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .and_then(|next| next.pred_opt());
                DateRange::new(start, end)
            }
            DatePreset::LastSixMonths => {
                DateRange::new(today.checked_sub_months(Months::new(6)), Some(today))
            }
            DatePreset::ThisYear => year_range(today.year()),
            DatePreset::PreviousYear => year_range(today.year() - 1),
        }
    }
}

fn year_range(year: i32) -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    )
}

/// What a page lets the user filter on. `Basic` pages only filter by date.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCapabilities {
    Basic,
    Advanced {
        categories: Vec<String>,
        kpis: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct FilterController {
    capabilities: FilterCapabilities,
    date: DateRange,
    selected_categories: Vec<String>,
    selected_kpis: Vec<String>,
    generation: u64,
}

impl FilterController {
    pub fn new(capabilities: FilterCapabilities) -> Self {
        Self {
            capabilities,
            date: DateRange::default(),
            selected_categories: Vec::new(),
            selected_kpis: Vec::new(),
            generation: 0,
        }
    }

    pub fn capabilities(&self) -> &FilterCapabilities {
        &self.capabilities
    }

    /// Swaps the available options. The category and KPI selection carries
    /// over between advanced pages and is dropped on basic ones.
    pub fn set_capabilities(&mut self, capabilities: FilterCapabilities) {
        if capabilities == FilterCapabilities::Basic {
            self.selected_categories.clear();
            self.selected_kpis.clear();
        }
        self.capabilities = capabilities;
    }

    pub fn date(&self) -> DateRange {
        self.date
    }

    pub fn selected_categories(&self) -> &[String] {
        &self.selected_categories
    }

    pub fn selected_kpis(&self) -> &[String] {
        &self.selected_kpis
    }

    /// Bumped on every apply/reset so views know to refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self.capabilities, FilterCapabilities::Advanced { .. })
    }

    pub fn set_date_range(&mut self, range: DateRange) -> Result<(), AppError> {
        if range.is_inverted() {
            return Err(AppError::bad_request("date range must not end before it starts"));
        }
        self.date = range;
        Ok(())
    }

    pub fn apply_preset(&mut self, key: &str) {
        self.apply_preset_at(key, Local::now().date_naive());
    }

    pub fn apply_preset_at(&mut self, key: &str, today: NaiveDate) {
        self.date = match DatePreset::parse(key) {
            Some(preset) => preset.range_at(today),
            None => DateRange::default(),
        };
    }

    pub fn toggle_category(&mut self, category: &str) {
        if self.is_advanced() {
            toggle(&mut self.selected_categories, category);
        }
    }

    pub fn toggle_kpi(&mut self, label: &str) {
        if self.is_advanced() {
            toggle(&mut self.selected_kpis, label);
        }
    }

    pub fn apply(&mut self) {
        self.generation += 1;
        info!(
            "applying filter: date={:?} categories={:?} kpis={:?}",
            self.date, self.selected_categories, self.selected_kpis
        );
    }

    pub fn reset(&mut self) {
        self.date = DateRange::default();
        self.selected_categories.clear();
        self.selected_kpis.clear();
        self.generation += 1;
        info!("filter reset");
    }

    pub fn filter_sets<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<FilterSet> {
        read_json_list(store, FILTER_SETS_KEY)
    }

    /// Stores the current selection under `name`, replacing a set with the
    /// same name. Returns the trimmed name that was used.
    pub fn save_filter_set<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        name: &str,
    ) -> Result<String, AppError> {
        self.require_advanced()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("filter set name is required"));
        }
        if name.chars().count() > MAX_FILTER_SET_NAME {
            return Err(AppError::bad_request(format!(
                "filter set name must be at most {MAX_FILTER_SET_NAME} characters"
            )));
        }

        let mut sets = self.filter_sets(store);
        sets.retain(|set| set.name != name);
        sets.push(FilterSet {
            name: name.to_string(),
            date: (!self.date.is_empty()).then_some(self.date),
            categories: self.selected_categories.clone(),
            kpis: self.selected_kpis.clone(),
        });
        write_json(store, FILTER_SETS_KEY, &sets)?;
        info!("saved filter set '{name}'");
        Ok(name.to_string())
    }

    pub fn apply_filter_set<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
    ) -> Result<(), AppError> {
        self.require_advanced()?;
        let name = name.trim();
        let set = self
            .filter_sets(store)
            .into_iter()
            .find(|set| set.name == name)
            .ok_or_else(|| AppError::not_found(format!("no filter set named '{name}'")))?;

        let date = set.date.unwrap_or_default();
        if date.is_inverted() {
            return Err(AppError::bad_request(format!(
                "filter set '{name}' holds a date range that ends before it starts"
            )));
        }
        self.date = date;
        self.selected_categories = set.categories;
        self.selected_kpis = set.kpis;
        Ok(())
    }

    pub fn delete_filter_set<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        name: &str,
    ) -> Result<(), AppError> {
        self.require_advanced()?;
        let name = name.trim();
        let mut sets = self.filter_sets(store);
        let before = sets.len();
        sets.retain(|set| set.name != name);
        if sets.len() != before {
            write_json(store, FILTER_SETS_KEY, &sets)?;
            info!("deleted filter set '{name}'");
        }
        Ok(())
    }

    pub fn view(&self) -> FilterView {
        let (mode, available_categories, available_kpis) = match &self.capabilities {
            FilterCapabilities::Basic => ("basic", Vec::new(), Vec::new()),
            FilterCapabilities::Advanced { categories, kpis } => {
                ("advanced", categories.clone(), kpis.clone())
            }
        };
        FilterView {
            mode: mode.to_string(),
            date: self.date,
            selected_categories: self.selected_categories.clone(),
            selected_kpis: self.selected_kpis.clone(),
            available_categories,
            available_kpis,
            generation: self.generation,
        }
    }

    fn require_advanced(&self) -> Result<(), AppError> {
        if self.is_advanced() {
            Ok(())
        } else {
            Err(AppError::bad_request("filter sets are not available in basic mode"))
        }
    }
}

fn toggle(selection: &mut Vec<String>, value: &str) {
    if let Some(pos) = selection.iter().position(|item| item == value) {
        selection.remove(pos);
    } else {
        selection.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreData;
    use axum::http::StatusCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn advanced() -> FilterController {
        FilterController::new(FilterCapabilities::Advanced {
            categories: vec!["X".into(), "Y".into()],
            kpis: vec!["A".into(), "B".into()],
        })
    }

    #[test]
    fn presets_resolve_relative_to_today() {
        // Wednesday
        let today = date(2026, 10, 14);
        assert_eq!(
            DatePreset::ThisWeek.range_at(today),
            DateRange::new(Some(date(2026, 10, 12)), Some(date(2026, 10, 18)))
        );
        assert_eq!(
            DatePreset::ThisMonth.range_at(today),
            DateRange::new(Some(date(2026, 10, 1)), Some(date(2026, 10, 31)))
        );
        assert_eq!(
            DatePreset::LastSixMonths.range_at(today),
            DateRange::new(Some(date(2026, 4, 14)), Some(today))
        );
        assert_eq!(
            DatePreset::ThisYear.range_at(today),
            DateRange::new(Some(date(2026, 1, 1)), Some(date(2026, 12, 31)))
        );
        assert_eq!(
            DatePreset::PreviousYear.range_at(today),
            DateRange::new(Some(date(2025, 1, 1)), Some(date(2025, 12, 31)))
        );
    }

    #[test]
    fn this_month_handles_february_and_sunday_weeks() {
        let today = date(2026, 2, 15);
        assert_eq!(
            DatePreset::ThisMonth.range_at(today),
            DateRange::new(Some(date(2026, 2, 1)), Some(date(2026, 2, 28)))
        );
        // 2026-02-15 is a Sunday, still part of the week that began Monday.
        assert_eq!(
            DatePreset::ThisWeek.range_at(today),
            DateRange::new(Some(date(2026, 2, 9)), Some(today))
        );
    }

    #[test]
    fn unknown_preset_clears_range() {
        let mut filters = advanced();
        filters.apply_preset_at("this-year", date(2026, 5, 5));
        assert!(!filters.date().is_empty());
        filters.apply_preset_at("next-decade", date(2026, 5, 5));
        assert!(filters.date().is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut filters = advanced();
        let err = filters
            .set_date_range(DateRange::new(Some(date(2026, 2, 1)), Some(date(2026, 1, 1))))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(filters.date().is_empty());

        filters
            .set_date_range(DateRange::new(Some(date(2026, 1, 1)), None))
            .unwrap();
        assert_eq!(filters.date().from, Some(date(2026, 1, 1)));
    }

    #[test]
    fn toggles_add_and_remove() {
        let mut filters = advanced();
        filters.toggle_category("X");
        filters.toggle_category("Y");
        filters.toggle_category("X");
        assert_eq!(filters.selected_categories(), ["Y".to_string()]);
        filters.toggle_kpi("A");
        assert_eq!(filters.selected_kpis(), ["A".to_string()]);
    }

    #[test]
    fn basic_mode_ignores_toggles_and_filter_sets() {
        let mut filters = FilterController::new(FilterCapabilities::Basic);
        filters.toggle_category("X");
        filters.toggle_kpi("A");
        assert!(filters.selected_categories().is_empty());
        assert!(filters.selected_kpis().is_empty());

        let mut store = StoreData::default();
        assert!(filters.save_filter_set(&mut store, "Q1").is_err());
        assert!(filters.filter_sets(&store).is_empty());
    }

    #[test]
    fn switching_to_basic_drops_selection_but_keeps_date() {
        let mut filters = advanced();
        filters.apply_preset_at("this-year", date(2026, 5, 5));
        filters.toggle_category("X");
        filters.set_capabilities(FilterCapabilities::Basic);
        assert!(filters.selected_categories().is_empty());
        assert!(!filters.date().is_empty());
        assert_eq!(filters.view().mode, "basic");
    }

    #[test]
    fn save_then_apply_restores_selection() {
        let mut store = StoreData::default();
        let mut filters = advanced();
        let range = DateRange::new(Some(date(2026, 1, 1)), Some(date(2026, 3, 31)));
        filters.set_date_range(range).unwrap();
        filters.toggle_category("X");
        filters.toggle_kpi("B");
        let saved = filters.save_filter_set(&mut store, "  Q1  ").unwrap();
        assert_eq!(saved, "Q1");

        filters.reset();
        assert!(filters.date().is_empty());

        filters.apply_filter_set(&store, "Q1").unwrap();
        assert_eq!(filters.date(), range);
        assert_eq!(filters.selected_categories(), ["X".to_string()]);
        assert_eq!(filters.selected_kpis(), ["B".to_string()]);
    }

    #[test]
    fn saving_same_name_replaces() {
        let mut store = StoreData::default();
        let mut filters = advanced();
        filters.toggle_category("X");
        filters.save_filter_set(&mut store, "Q1").unwrap();
        filters.save_filter_set(&mut store, "Q2").unwrap();
        filters.toggle_category("Y");
        filters.save_filter_set(&mut store, "Q1").unwrap();

        let sets = filters.filter_sets(&store);
        let names: Vec<_> = sets.iter().map(|set| set.name.as_str()).collect();
        assert_eq!(names, vec!["Q2", "Q1"]);
        assert_eq!(sets[1].categories, vec!["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn empty_or_long_names_are_rejected() {
        let mut store = StoreData::default();
        let filters = advanced();
        assert!(filters.save_filter_set(&mut store, "   ").is_err());
        assert!(filters.save_filter_set(&mut store, &"x".repeat(21)).is_err());
        assert!(filters.filter_sets(&store).is_empty());
    }

    #[test]
    fn delete_then_apply_leaves_state_unchanged() {
        let mut store = StoreData::default();
        let mut filters = advanced();
        filters.toggle_category("X");
        filters.save_filter_set(&mut store, "Q1").unwrap();
        filters.delete_filter_set(&mut store, "Q1").unwrap();

        filters.toggle_kpi("A");
        let err = filters.apply_filter_set(&store, "Q1").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(filters.selected_categories(), ["X".to_string()]);
        assert_eq!(filters.selected_kpis(), ["A".to_string()]);
    }

    #[test]
    fn corrupt_filter_sets_read_as_empty() {
        let mut store = StoreData::default();
        store.set(FILTER_SETS_KEY, serde_json::json!("garbage"));
        let mut filters = advanced();
        assert!(filters.filter_sets(&store).is_empty());
        filters.save_filter_set(&mut store, "fresh").unwrap();
        assert_eq!(filters.filter_sets(&store).len(), 1);
        filters.apply_filter_set(&store, "fresh").unwrap();
    }

    #[test]
    fn one_bad_filter_set_does_not_lose_the_others() {
        let mut store = StoreData::default();
        store.set(
            FILTER_SETS_KEY,
            serde_json::json!([
                { "name": "Legacy", "date": { "from": "2026-01-05T18:30:00.000Z" } },
                { "name": "Broken", "date": { "from": "someday" } },
                { "name": "Good", "categories": ["A"] },
            ]),
        );
        let mut filters = advanced();
        filters.save_filter_set(&mut store, "New").unwrap();

        let names: Vec<_> = filters
            .filter_sets(&store)
            .into_iter()
            .map(|set| set.name)
            .collect();
        assert_eq!(names, vec!["Legacy", "Good", "New"]);

        filters.apply_filter_set(&store, "Legacy").unwrap();
        assert_eq!(filters.date().from, Some(date(2026, 1, 5)));
        filters.apply_filter_set(&store, "Good").unwrap();
        assert_eq!(filters.selected_categories(), ["A".to_string()]);
    }

    #[test]
    fn stored_inverted_range_is_refused() {
        let mut store = StoreData::default();
        store.set(
            FILTER_SETS_KEY,
            serde_json::json!([
                { "name": "Upside", "date": { "from": "2026-03-01", "to": "2026-01-01" }, "kpis": ["A"] },
            ]),
        );
        let mut filters = advanced();
        let err = filters.apply_filter_set(&store, "Upside").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(filters.date().is_empty());
        assert!(filters.selected_kpis().is_empty());
    }

    #[test]
    fn reset_clears_everything_and_bumps_generation() {
        let mut filters = advanced();
        filters.apply_preset_at("this-month", date(2026, 1, 10));
        filters.toggle_category("X");
        filters.apply();
        filters.reset();
        assert!(filters.date().is_empty());
        assert!(filters.selected_categories().is_empty());
        assert_eq!(filters.generation(), 2);
    }
}
