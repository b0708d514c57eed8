use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kernel::model::{
    id::UserId,
    user::{Actor, User},
};
use registry::AppRegistry;
use shared::error::AppError;

/// The identity a request acts as. Authentication itself lives outside
/// this service; the upstream layer forwards the opaque user id in the
/// `x-user-id` header and we only resolve it to a role.
pub struct ActingUser(pub User);

impl ActingUser {
    pub fn id(&self) -> UserId {
        self.0.user_id
    }

    pub fn is_staff(&self) -> bool {
        self.0.is_staff()
    }

    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let user_id: UserId = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(ActingUser(user))
    }
}
