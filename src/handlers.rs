use crate::audit;
use crate::catalog::dashboard_names;
use crate::errors::AppError;
use crate::models::{
    AuditEntry, CreateUserRequest, CreatedUser, DashboardView, DateRange, DrillDownDetail,
    DrillDownRequest, FilterSet, FormSubmission, NameRequest, PresetRequest, ReorderRequest,
    ReportFolder, ReportSchedule, ReportVersion, SampleReport, ScheduleRequest, ValueRequest,
};
use crate::records;
use crate::reports;
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    let data = state.data.lock().await;
    Html(render_index(&session.view(&*data)))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_dashboards() -> Json<Vec<String>> {
    Json(dashboard_names())
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let session = state.session.lock().await;
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn select_dashboard(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = state.session.lock().await;
    let data = state.data.lock().await;
    session.select_dashboard(&*data, payload.name.trim())?;
    Ok(Json(session.view(&*data)))
}

pub async fn set_date_range(
    State(state): State<AppState>,
    Json(range): Json<DateRange>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = state.session.lock().await;
    session.filters_mut().set_date_range(range)?;
    let data = state.data.lock().await;
    Ok(Json(session.view(&*data)))
}

pub async fn apply_preset(
    State(state): State<AppState>,
    Json(payload): Json<PresetRequest>,
) -> Json<DashboardView> {
    let mut session = state.session.lock().await;
    session.filters_mut().apply_preset(payload.preset.trim());
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn toggle_category(
    State(state): State<AppState>,
    Json(payload): Json<ValueRequest>,
) -> Json<DashboardView> {
    let mut session = state.session.lock().await;
    session.filters_mut().toggle_category(&payload.value);
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn toggle_kpi(
    State(state): State<AppState>,
    Json(payload): Json<ValueRequest>,
) -> Json<DashboardView> {
    let mut session = state.session.lock().await;
    session.filters_mut().toggle_kpi(&payload.value);
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn apply_filters(State(state): State<AppState>) -> Json<DashboardView> {
    let mut session = state.session.lock().await;
    session.filters_mut().apply();
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn reset_filters(State(state): State<AppState>) -> Json<DashboardView> {
    let mut session = state.session.lock().await;
    session.filters_mut().reset();
    let data = state.data.lock().await;
    Json(session.view(&*data))
}

pub async fn list_filter_sets(State(state): State<AppState>) -> Json<Vec<FilterSet>> {
    let session = state.session.lock().await;
    let data = state.data.lock().await;
    Json(session.filters().filter_sets(&*data))
}

pub async fn save_filter_set(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<(StatusCode, Json<Vec<FilterSet>>), AppError> {
    let session = state.session.lock().await;
    let mut data = state.data.lock().await;
    session.filters().save_filter_set(&mut *data, &payload.name)?;
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(session.filters().filter_sets(&*data))))
}

pub async fn apply_filter_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = state.session.lock().await;
    let data = state.data.lock().await;
    session.filters_mut().apply_filter_set(&*data, &name)?;
    Ok(Json(session.view(&*data)))
}

pub async fn delete_filter_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<FilterSet>>, AppError> {
    let session = state.session.lock().await;
    let mut data = state.data.lock().await;
    session.filters().delete_filter_set(&mut *data, &name)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(session.filters().filter_sets(&*data)))
}

pub async fn reorder_kpis(
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = state.session.lock().await;
    let mut data = state.data.lock().await;
    session.reorder(&mut *data, payload.from, payload.to)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(session.view(&*data)))
}

pub async fn drill_down(
    State(state): State<AppState>,
    Json(payload): Json<DrillDownRequest>,
) -> Result<Json<DrillDownDetail>, AppError> {
    let mut session = state.session.lock().await;
    let mut data = state.data.lock().await;
    let detail = session.drill_down(&mut *data, &payload.label)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(detail))
}

pub async fn close_drilldown(State(state): State<AppState>) -> StatusCode {
    let mut session = state.session.lock().await;
    session.close_drilldown();
    StatusCode::NO_CONTENT
}

pub async fn list_audit(State(state): State<AppState>) -> Json<Vec<AuditEntry>> {
    let data = state.data.lock().await;
    Json(audit::entries(&*data))
}

pub async fn list_reports() -> Json<Vec<SampleReport>> {
    Json(reports::sample_reports())
}

pub async fn report_versions(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Vec<ReportVersion>>, AppError> {
    let mut data = state.data.lock().await;
    let versions = reports::view_versions(&mut *data, id)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(versions))
}

pub async fn open_schedule(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ReportSchedule>, AppError> {
    let mut data = state.data.lock().await;
    let form = reports::open_schedule(&mut *data, id)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(form))
}

pub async fn schedule_report(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<ReportSchedule>), AppError> {
    let mut data = state.data.lock().await;
    let schedule = reports::schedule(
        &mut *data,
        id,
        payload.frequency.as_deref(),
        payload.at.as_deref(),
    )?;
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn list_folders(State(state): State<AppState>) -> Json<Vec<ReportFolder>> {
    let data = state.data.lock().await;
    Json(records::folders(&*data))
}

pub async fn add_folder(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<(StatusCode, Json<ReportFolder>), AppError> {
    let mut data = state.data.lock().await;
    let folder = records::add_folder(&mut *data, &payload.name)?;
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    records::delete_folder(&mut *data, id)?;
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<CreatedUser>> {
    let data = state.data.lock().await;
    Json(records::users(&*data))
}

pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUser>), AppError> {
    let mut data = state.data.lock().await;
    let user = records::add_user(&mut *data, &payload.name, &payload.email, &payload.password)?;
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_forms(State(state): State<AppState>) -> Json<Vec<String>> {
    let data = state.data.lock().await;
    Json(records::form_names(&*data))
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Path(form): Path<String>,
) -> Json<Vec<FormSubmission>> {
    let data = state.data.lock().await;
    Json(records::submissions(&*data, &form))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Path(form): Path<String>,
    Json(record): Json<FormSubmission>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    records::submit(&mut *data, &form, record)?;
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::CREATED)
}
