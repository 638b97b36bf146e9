use axum::{
    Json,
    response::{IntoResponse, Response},
};

use crate::server::errors::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}
