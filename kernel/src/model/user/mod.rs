use crate::model::{id::UserId, role::Role};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

/// The identity attempting a status transition. The completion sweep is not
/// a user, so it gets its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User { user_id: UserId, role: Role },
    System,
}

impl Actor {
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Actor::User {
                role: Role::Staff,
                ..
            }
        )
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::User { user_id, .. } => Some(*user_id),
            Actor::System => None,
        }
    }
}

impl From<&User> for Actor {
    fn from(value: &User) -> Self {
        Actor::User {
            user_id: value.user_id,
            role: value.role,
        }
    }
}
