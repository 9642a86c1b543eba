use axum::{extract::State, http::StatusCode, routing::put, Json, Router};

use crate::error::Result;
use crate::state::AppState;
use crate::store::Table;

mod games;
mod players;
mod rules;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .merge(rules::routes())
        .merge(players::routes(state.clone()))
        .nest("/games", games::routes(state.clone()))
        .route("/restart_db", put(restart_db).with_state(state))
}

/// Drops and recreates the named tables. Admin and test convenience.
async fn restart_db(
    State(state): State<AppState>,
    Json(tables): Json<Vec<String>>,
) -> Result<StatusCode> {
    for name in &tables {
        let table = Table::parse(name)?;
        state.store.clear(table).await?;
        log::info!("table {} reset", table);
    }
    Ok(StatusCode::NO_CONTENT)
}
