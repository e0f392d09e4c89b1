use crate::audit;
use crate::catalog::{self, DashboardPage, FilterMode, dashboard_names, kpi_catalog};
use crate::drilldown::DrillDown;
use crate::errors::AppError;
use crate::filters::{FilterCapabilities, FilterController};
use crate::kpis::{KpiList, KpiOrderScope, visible_kpis};
use crate::models::{DashboardView, DrillDownDetail, DrillDownSelection, KpiEntry};
use crate::storage::KeyValueStore;
use tracing::info;

pub const KPI_DRILLDOWN_ACTION: &str = "Viewed KPI Details";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub order_scope: KpiOrderScope,
    pub editable: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            order_scope: KpiOrderScope::Global,
            editable: true,
        }
    }
}

/// Everything one open dashboard page holds: the filter, the ordered KPI
/// list and the drill-down.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    settings: SessionSettings,
    dashboard: String,
    filters: FilterController,
    kpis: KpiList,
    drilldown: DrillDown,
}

impl DashboardSession {
    /// Opens the first known dashboard.
    pub fn new<S: KeyValueStore + ?Sized>(store: &S, settings: SessionSettings) -> Self {
        let dashboard = dashboard_names().into_iter().next().unwrap_or_default();
        let catalog = kpi_catalog(&dashboard).unwrap_or_default();
        let page = catalog::page(&dashboard);
        Self {
            settings,
            filters: FilterController::new(capabilities_for(page, &catalog)),
            kpis: kpi_list(store, &dashboard, page, &catalog, settings),
            drilldown: DrillDown::default(),
            dashboard,
        }
    }

    pub fn dashboard(&self) -> &str {
        &self.dashboard
    }

    pub fn filters(&self) -> &FilterController {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterController {
        &mut self.filters
    }

    pub fn drilldown(&self) -> &DrillDown {
        &self.drilldown
    }

    pub fn select_dashboard<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
    ) -> Result<(), AppError> {
        let catalog = kpi_catalog(name)
            .ok_or_else(|| AppError::not_found(format!("no dashboard named '{name}'")))?;
        let page = catalog::page(name);
        self.dashboard = name.to_string();
        self.filters.set_capabilities(capabilities_for(page, &catalog));
        self.kpis = kpi_list(store, name, page, &catalog, self.settings);
        self.drilldown.close();
        info!("switched to dashboard '{name}'");
        Ok(())
    }

    pub fn ordered_kpis(&self) -> &[KpiEntry] {
        self.kpis.entries()
    }

    pub fn visible_kpis(&self) -> Vec<KpiEntry> {
        visible_kpis(
            self.kpis.entries(),
            self.filters.selected_categories(),
            self.filters.selected_kpis(),
        )
    }

    pub fn reorder<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        from: usize,
        to: usize,
    ) -> Result<(), AppError> {
        self.kpis.reorder(store, from, to)
    }

    /// Opens the detail view for a visible KPI and records the view.
    pub fn drill_down<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        label: &str,
    ) -> Result<DrillDownDetail, AppError> {
        let entry = self
            .visible_kpis()
            .into_iter()
            .find(|entry| entry.label == label)
            .ok_or_else(|| AppError::not_found(format!("no visible kpi labelled '{label}'")))?;
        self.drilldown.select(DrillDownSelection::from(&entry));
        audit::record(store, KPI_DRILLDOWN_ACTION, &entry.label)?;
        self.drilldown
            .detail()
            .ok_or_else(|| AppError::not_found("drill-down is closed"))
    }

    pub fn close_drilldown(&mut self) {
        self.drilldown.close();
    }

    pub fn view<S: KeyValueStore + ?Sized>(&self, store: &S) -> DashboardView {
        DashboardView {
            dashboard: self.dashboard.clone(),
            editable: self.kpis.editable(),
            filter: self.filters.view(),
            kpis: self.kpis.entries().to_vec(),
            visible_kpis: self.visible_kpis(),
            filter_sets: self.filters.filter_sets(store),
            drilldown: self.drilldown.detail(),
        }
    }
}

fn capabilities_for(page: Option<DashboardPage>, catalog: &[KpiEntry]) -> FilterCapabilities {
    match page.map(|page| page.filter_mode) {
        Some(FilterMode::Basic) => FilterCapabilities::Basic,
        _ => FilterCapabilities::Advanced {
            categories: catalog::categories(catalog),
            kpis: catalog::labels(catalog),
        },
    }
}

/// Pages without a draggable row keep their catalog order whatever the
/// stored preference says.
fn kpi_list<S: KeyValueStore + ?Sized>(
    store: &S,
    dashboard: &str,
    page: Option<DashboardPage>,
    catalog: &[KpiEntry],
    settings: SessionSettings,
) -> KpiList {
    if page.is_some_and(|page| !page.editable) {
        return KpiList::fixed(dashboard, catalog, settings.order_scope);
    }
    KpiList::load(store, dashboard, catalog, settings.order_scope, settings.editable)
}
