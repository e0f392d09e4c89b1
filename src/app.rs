use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/dashboards", get(handlers::list_dashboards))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/dashboard/select", post(handlers::select_dashboard))
        .route("/api/filters/date", post(handlers::set_date_range))
        .route("/api/filters/preset", post(handlers::apply_preset))
        .route("/api/filters/categories/toggle", post(handlers::toggle_category))
        .route("/api/filters/kpis/toggle", post(handlers::toggle_kpi))
        .route("/api/filters/apply", post(handlers::apply_filters))
        .route("/api/filters/reset", post(handlers::reset_filters))
        .route(
            "/api/filter-sets",
            get(handlers::list_filter_sets).post(handlers::save_filter_set),
        )
        .route("/api/filter-sets/:name", delete(handlers::delete_filter_set))
        .route("/api/filter-sets/:name/apply", post(handlers::apply_filter_set))
        .route("/api/kpis/reorder", post(handlers::reorder_kpis))
        .route("/api/kpis/drilldown", post(handlers::drill_down))
        .route("/api/drilldown", delete(handlers::close_drilldown))
        .route("/api/audit", get(handlers::list_audit))
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/:id/versions", post(handlers::report_versions))
        .route("/api/reports/:id/schedule/open", post(handlers::open_schedule))
        .route("/api/reports/:id/schedule", post(handlers::schedule_report))
        .route(
            "/api/folders",
            get(handlers::list_folders).post(handlers::add_folder),
        )
        .route("/api/folders/:id", delete(handlers::delete_folder))
        .route("/api/users", get(handlers::list_users).post(handlers::add_user))
        .route("/api/forms", get(handlers::list_forms))
        .route(
            "/api/forms/:name/submissions",
            get(handlers::list_submissions).post(handlers::submit_form),
        )
        .with_state(state)
}
