//! Small local record lists kept next to the dashboard: report folders,
//! demo users and form submissions.

use crate::errors::AppError;
use crate::models::{CreatedUser, FormSubmission, ReportFolder};
use crate::storage::{
    CREATED_USERS_KEY, FORM_DATA_PREFIX, KeyValueStore, REPORT_FOLDERS_KEY, read_json_list,
    write_json,
};
use chrono::Utc;
use tracing::info;

pub fn folders<S: KeyValueStore + ?Sized>(store: &S) -> Vec<ReportFolder> {
    read_json_list(store, REPORT_FOLDERS_KEY)
}

pub fn add_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
) -> Result<ReportFolder, AppError> {
    add_folder_at(store, name, Utc::now().timestamp_millis())
}

pub fn add_folder_at<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    now_millis: i64,
) -> Result<ReportFolder, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("folder name is required"));
    }
    let mut list = folders(store);
    let last = list.iter().map(|folder| folder.id).max().unwrap_or(i64::MIN);
    let folder = ReportFolder {
        id: now_millis.max(last.saturating_add(1)),
        name: name.to_string(),
    };
    list.push(folder.clone());
    write_json(store, REPORT_FOLDERS_KEY, &list)?;
    info!("created report folder '{}'", folder.name);
    Ok(folder)
}

pub fn delete_folder<S: KeyValueStore + ?Sized>(store: &mut S, id: i64) -> Result<(), AppError> {
    let mut list = folders(store);
    let before = list.len();
    list.retain(|folder| folder.id != id);
    if list.len() == before {
        return Err(AppError::not_found(format!("no folder with id {id}")));
    }
    write_json(store, REPORT_FOLDERS_KEY, &list)
}

pub fn users<S: KeyValueStore + ?Sized>(store: &S) -> Vec<CreatedUser> {
    read_json_list(store, CREATED_USERS_KEY)
}

/// The password is only checked for presence; it is never stored.
pub fn add_user<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    email: &str,
    password: &str,
) -> Result<CreatedUser, AppError> {
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() || email.is_empty() || password.trim().is_empty() {
        return Err(AppError::bad_request("name, email and password are required"));
    }
    let mut list = users(store);
    let user = CreatedUser {
        name: name.to_string(),
        email: email.to_string(),
    };
    list.push(user.clone());
    write_json(store, CREATED_USERS_KEY, &list)?;
    info!("created user '{name}'");
    Ok(user)
}

fn form_key(form: &str) -> String {
    format!("{FORM_DATA_PREFIX}{}", form.trim())
}

pub fn form_names<S: KeyValueStore + ?Sized>(store: &S) -> Vec<String> {
    store
        .keys()
        .into_iter()
        .filter_map(|key| key.strip_prefix(FORM_DATA_PREFIX).map(str::to_string))
        .collect()
}

pub fn submissions<S: KeyValueStore + ?Sized>(store: &S, form: &str) -> Vec<FormSubmission> {
    read_json_list(store, &form_key(form))
}

pub fn submit<S: KeyValueStore + ?Sized>(
    store: &mut S,
    form: &str,
    record: FormSubmission,
) -> Result<usize, AppError> {
    let form = form.trim();
    if form.is_empty() {
        return Err(AppError::bad_request("form name is required"));
    }
    let key = form_key(form);
    let mut list: Vec<FormSubmission> = read_json_list(store, &key);
    list.push(record);
    write_json(store, &key, &list)?;
    Ok(list.len())
}
