use crate::utils::request::request_user_id;
use actix_web::{Error, HttpRequest, HttpResponse, web};

pub fn configure_protected(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/me").get(get_me));
}

pub async fn get_me(req: HttpRequest) -> Result<HttpResponse, Error> {
    let user_id = request_user_id(&req)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": user_id })))
}
