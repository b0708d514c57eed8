use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    user::{event::CreateUser, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<UserId>;
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;
}
