use axum::{Json, extract::State};

use crate::{BlogError, router::BlogState};

/// `GET /`: every post title as a JSON array of strings.
///
/// Each call builds its own pool and closes it on the way out, whether the
/// query succeeded or not.
pub async fn list_titles_handler(
    State(state): State<BlogState>,
) -> Result<Json<Vec<String>>, BlogError> {
    let storage = state.factory.connect()?;
    let titles = storage.list_titles(state.row_scan).await;
    storage.close().await;
    Ok(Json(titles?))
}
