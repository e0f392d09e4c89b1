use crate::errors::AppError;
use crate::models::KpiEntry;
use crate::storage::{KPI_ORDER_KEY, KeyValueStore, read_json_list, write_json};
use std::str::FromStr;

/// Where the user's KPI order preference lives. `Global` shares one order
/// across every dashboard whose labels overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiOrderScope {
    #[default]
    Global,
    PerDashboard,
}

impl KpiOrderScope {
    pub fn storage_key(self, dashboard: &str) -> String {
        match self {
            KpiOrderScope::Global => KPI_ORDER_KEY.to_string(),
            KpiOrderScope::PerDashboard => format!("{KPI_ORDER_KEY}:{dashboard}"),
        }
    }
}

impl FromStr for KpiOrderScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(KpiOrderScope::Global),
            "dashboard" | "per-dashboard" => Ok(KpiOrderScope::PerDashboard),
            other => Err(format!("unknown kpi order scope '{other}'")),
        }
    }
}

/// Moves the element at `from` to `to`, shifting the ones in between.
/// Out-of-range indices leave the order untouched.
pub fn move_item<T: Clone>(order: &[T], from: usize, to: usize) -> Vec<T> {
    let mut updated = order.to_vec();
    if from >= updated.len() || to >= updated.len() {
        return updated;
    }
    let moved = updated.remove(from);
    updated.insert(to, moved);
    updated
}

pub fn persist_order<S: KeyValueStore + ?Sized>(
    store: &mut S,
    scope: KpiOrderScope,
    dashboard: &str,
    order: &[KpiEntry],
) -> Result<(), AppError> {
    let labels: Vec<&str> = order.iter().map(|entry| entry.label.as_str()).collect();
    write_json(store, &scope.storage_key(dashboard), &labels)
}

/// Reorders `catalog` by the stored preference. Labels no longer in the
/// catalog are dropped; catalog entries the preference doesn't mention keep
/// their catalog order at the end.
pub fn load_order<S: KeyValueStore + ?Sized>(
    store: &S,
    scope: KpiOrderScope,
    dashboard: &str,
    catalog: &[KpiEntry],
) -> Vec<KpiEntry> {
    let saved: Vec<String> = read_json_list(store, &scope.storage_key(dashboard));
    if saved.is_empty() {
        return catalog.to_vec();
    }

    let mut ordered: Vec<KpiEntry> = Vec::with_capacity(catalog.len());
    for label in &saved {
        if ordered.iter().any(|entry| &entry.label == label) {
            continue;
        }
        if let Some(entry) = catalog.iter().find(|entry| &entry.label == label) {
            ordered.push(entry.clone());
        }
    }
    for entry in catalog {
        if !saved.contains(&entry.label) {
            ordered.push(entry.clone());
        }
    }
    ordered
}

/// Empty selection means "all".
pub fn filter_by_category(entries: &[KpiEntry], selected: &[String]) -> Vec<KpiEntry> {
    if selected.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| {
            entry
                .category
                .as_ref()
                .is_some_and(|category| selected.contains(category))
        })
        .cloned()
        .collect()
}

pub fn filter_by_label(entries: &[KpiEntry], selected: &[String]) -> Vec<KpiEntry> {
    if selected.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| selected.contains(&entry.label))
        .cloned()
        .collect()
}

pub fn visible_kpis(
    order: &[KpiEntry],
    selected_categories: &[String],
    selected_kpis: &[String],
) -> Vec<KpiEntry> {
    filter_by_label(&filter_by_category(order, selected_categories), selected_kpis)
}

/// The user-ordered KPI list of one dashboard.
#[derive(Debug, Clone)]
pub struct KpiList {
    dashboard: String,
    scope: KpiOrderScope,
    editable: bool,
    entries: Vec<KpiEntry>,
}

impl KpiList {
    pub fn load<S: KeyValueStore + ?Sized>(
        store: &S,
        dashboard: &str,
        catalog: &[KpiEntry],
        scope: KpiOrderScope,
        editable: bool,
    ) -> Self {
        Self {
            dashboard: dashboard.to_string(),
            scope,
            editable,
            entries: load_order(store, scope, dashboard, catalog),
        }
    }

    /// A read-only row shown in catalog order; stored preferences are ignored.
    pub fn fixed(dashboard: &str, catalog: &[KpiEntry], scope: KpiOrderScope) -> Self {
        Self {
            dashboard: dashboard.to_string(),
            scope,
            editable: false,
            entries: catalog.to_vec(),
        }
    }

    pub fn entries(&self) -> &[KpiEntry] {
        &self.entries
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn find(&self, label: &str) -> Option<&KpiEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Drag-drop from `from` onto `to`, persisting the new order.
    pub fn reorder<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        from: usize,
        to: usize,
    ) -> Result<(), AppError> {
        if !self.editable {
            return Err(AppError::bad_request("kpi list is read-only"));
        }
        let len = self.entries.len();
        if from >= len || to >= len {
            return Err(AppError::bad_request(format!(
                "reorder indices must be below {len}"
            )));
        }
        if from == to {
            return Ok(());
        }
        self.entries = move_item(&self.entries, from, to);
        persist_order(store, self.scope, &self.dashboard, &self.entries)
    }
}
