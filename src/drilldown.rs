use crate::models::{DrillDownDetail, DrillDownSelection, TrendPoint};

const SAMPLE_TREND: [(&str, u64); 3] = [("April", 1000), ("May", 1050), ("June", 1200)];

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrillDown {
    #[default]
    Closed,
    Open(DrillDownSelection),
}

impl DrillDown {
    /// Opens the detail view, replacing whatever was shown before.
    pub fn select(&mut self, point: DrillDownSelection) {
        *self = DrillDown::Open(point);
    }

    pub fn close(&mut self) {
        *self = DrillDown::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DrillDown::Open(_))
    }

    pub fn selection(&self) -> Option<&DrillDownSelection> {
        match self {
            DrillDown::Open(selection) => Some(selection),
            DrillDown::Closed => None,
        }
    }

    /// The trend is placeholder content; it does not depend on the value.
    pub fn detail(&self) -> Option<DrillDownDetail> {
        self.selection().map(|selection| DrillDownDetail {
            title: format!("{} - Drill Down", selection.label),
            label: selection.label.clone(),
            value: selection.value.clone(),
            trend: SAMPLE_TREND
                .iter()
                .map(|(month, value)| TrendPoint {
                    month: month.to_string(),
                    value: *value,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KpiValue;

    fn point(label: &str, value: &str) -> DrillDownSelection {
        DrillDownSelection {
            label: label.to_string(),
            value: KpiValue::from(value),
        }
    }

    #[test]
    fn select_then_close_returns_to_closed() {
        let mut drill = DrillDown::default();
        assert!(!drill.is_open());
        drill.select(point("Stores", "12"));
        assert!(drill.is_open());
        drill.close();
        assert_eq!(drill, DrillDown::Closed);
        assert!(drill.detail().is_none());
    }

    #[test]
    fn second_select_replaces_without_close() {
        let mut drill = DrillDown::default();
        drill.select(point("Stores", "12"));
        drill.select(point("Churn Rate", "1.2%"));
        assert_eq!(drill.selection(), Some(&point("Churn Rate", "1.2%")));
    }

    #[test]
    fn detail_carries_static_trend() {
        let mut drill = DrillDown::default();
        drill.select(point("Total Sales", "₹5.1M"));
        let detail = drill.detail().unwrap();
        assert_eq!(detail.title, "Total Sales - Drill Down");
        assert_eq!(detail.value.to_string(), "₹5.1M");
        let months: Vec<_> = detail.trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["April", "May", "June"]);
        assert_eq!(detail.trend[2].value, 1200);
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut drill = DrillDown::default();
        drill.close();
        assert_eq!(drill, DrillDown::Closed);
    }
}
