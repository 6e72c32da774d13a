use axum::{routing::get, Json, Router};

use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}
