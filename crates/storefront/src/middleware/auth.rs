//! Request identity.
//!
//! The storefront sits behind an edge proxy that authenticates the
//! session and forwards the resolved user id in the `x-user-id` header.
//! Every route that touches per-user data extracts [`CurrentUser`] and
//! threads the id through explicitly; nothing downstream reads ambient
//! identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use copperleaf_core::UserId;

use crate::error::AppError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("missing user identity".to_owned()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("malformed user identity".to_owned()))?;

        let id = raw
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("malformed user identity".to_owned()))?;

        let user_id = UserId::new(id);
        crate::error::set_user_context(user_id);
        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CurrentUser, AppError> {
        let (mut parts, ()) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn resolves_user_from_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "42")
            .body(())
            .expect("request");
        let user = extract(request).await.expect("extract");
        assert_eq!(user.0, UserId::new(42));
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        let request = Request::builder().body(()).expect("request");
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));

        let request = Request::builder()
            .header(USER_ID_HEADER, "not-a-number")
            .body(())
            .expect("request");
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
