use crate::auth::UserId;
use actix_web::{HttpMessage, HttpRequest};

pub fn request_user_id(req: &HttpRequest) -> Result<UserId, actix_web::Error> {
    let ext = req.extensions();

    let user_id = ext
        .get::<UserId>()
        .ok_or(actix_web::error::ErrorUnauthorized("User not authorized"))?;

    Ok(user_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_identity_is_unauthorized() {
        let req = TestRequest::default().to_http_request();

        let err = request_user_id(&req).unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_stored_identity_is_returned() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(UserId::from("carol"));

        assert_eq!(request_user_id(&req).unwrap(), UserId::from("carol"));
    }
}
