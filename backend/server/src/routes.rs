use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use feed::{BackupRecord, NotificationRecord};
use tracing::debug;

use crate::{backups::list_backups, error::AppError, state::AppState, viewer::Viewer};

pub async fn notifications_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let Some(viewer) = Viewer::from_headers(&headers) else {
        return Json(Vec::<NotificationRecord>::new()).into_response();
    };

    let records = state.store.latest_for(&viewer);
    debug!("{} notifications for {}", records.len(), viewer.username);

    Json(records).into_response()
}

pub async fn backups_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BackupRecord>>, AppError> {
    Ok(Json(list_backups(&state.config.backups_dir).await?))
}
