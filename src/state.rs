use crate::session::{DashboardSession, SessionSettings};
use crate::storage::StoreData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Handlers needing both locks take `session` before `data`.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<StoreData>>,
    pub session: Arc<Mutex<DashboardSession>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: StoreData, settings: SessionSettings) -> Self {
        let session = DashboardSession::new(&data, settings);
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            session: Arc::new(Mutex::new(session)),
        }
    }
}
