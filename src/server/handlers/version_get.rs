use crate::server::AppState;
use actix_web::{HttpResponse, web};

pub async fn version_get(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(state.config.version.clone())
}
