use crate::models::KpiEntry;

pub const EXECUTIVE_OVERVIEW: &str = "Executive Overview";
pub const RETAIL_PERFORMANCE: &str = "Retail Performance";
pub const REPORTS: &str = "Reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Date range only.
    Basic,
    Advanced,
}

/// How a page presents its KPIs and which filters it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardPage {
    pub name: &'static str,
    pub filter_mode: FilterMode,
    /// Whether users may drag the KPI row into their own order.
    pub editable: bool,
}

const PAGES: [DashboardPage; 3] = [
    DashboardPage {
        name: EXECUTIVE_OVERVIEW,
        filter_mode: FilterMode::Advanced,
        editable: true,
    },
    DashboardPage {
        name: RETAIL_PERFORMANCE,
        filter_mode: FilterMode::Advanced,
        editable: true,
    },
    DashboardPage {
        name: REPORTS,
        filter_mode: FilterMode::Basic,
        editable: false,
    },
];

pub fn page(name: &str) -> Option<DashboardPage> {
    PAGES.into_iter().find(|page| page.name == name)
}

pub fn dashboard_names() -> Vec<String> {
    PAGES.iter().map(|page| page.name.to_string()).collect()
}

/// Static KPI catalog of a dashboard, `None` for unknown dashboards.
pub fn kpi_catalog(dashboard: &str) -> Option<Vec<KpiEntry>> {
    let entries = match dashboard {
        EXECUTIVE_OVERVIEW => vec![
            KpiEntry::new("Total Revenue", "₹9.3M", Some("A")),
            KpiEntry::new("YTD Growth", "7.6%", Some("B")),
            KpiEntry::new("Active Clients", "421", Some("C")),
            KpiEntry::new("Churn Rate", "1.2%", Some("D")),
        ],
        RETAIL_PERFORMANCE => vec![
            KpiEntry::new("Total Sales", "₹5.1M", Some("A")),
            KpiEntry::new("Products Sold", "18,120", Some("B")),
            KpiEntry::new("Stores", "12", Some("C")),
            KpiEntry::new("Active Promotions", "4", Some("D")),
        ],
        REPORTS => vec![
            KpiEntry::new("Total Revenue", "₹4.2M", None),
            KpiEntry::new("Active Users", "1,253", None),
            KpiEntry::new("Conversion Rate", "3.2%", None),
            KpiEntry::new("Churn Rate", "0.8%", None),
        ],
        _ => return None,
    };
    Some(entries)
}

/// Distinct categories in catalog order.
pub fn categories(catalog: &[KpiEntry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in catalog.iter().filter_map(|entry| entry.category.as_ref()) {
        if !seen.contains(category) {
            seen.push(category.clone());
        }
    }
    seen
}

pub fn labels(catalog: &[KpiEntry]) -> Vec<String> {
    catalog.iter().map(|entry| entry.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_dashboard_has_a_catalog() {
        for name in dashboard_names() {
            assert!(kpi_catalog(&name).is_some(), "missing catalog for {name}");
            assert!(page(&name).is_some());
        }
        assert!(kpi_catalog("Nope").is_none());
        assert!(page("Nope").is_none());
    }

    #[test]
    fn reports_page_is_date_only_and_fixed() {
        let reports = page(REPORTS).unwrap();
        assert_eq!(reports.filter_mode, FilterMode::Basic);
        assert!(!reports.editable);
        assert_eq!(page(EXECUTIVE_OVERVIEW).unwrap().filter_mode, FilterMode::Advanced);
    }

    #[test]
    fn categories_are_distinct_and_ordered() {
        let catalog = vec![
            KpiEntry::new("A", "1", Some("Y")),
            KpiEntry::new("B", "2", Some("X")),
            KpiEntry::new("C", "3", Some("Y")),
            KpiEntry::new("D", "4", None),
        ];
        assert_eq!(categories(&catalog), vec!["Y".to_string(), "X".to_string()]);
    }
}
