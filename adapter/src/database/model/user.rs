use kernel::model::{id::UserId, user::User};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            user_name,
            email,
            role,
        } = value;
        Ok(User {
            user_id,
            user_name,
            email,
            role: role.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use kernel::model::role::Role;

    use super::*;

    #[test]
    fn role_column_is_parsed() {
        let row = UserRow {
            user_id: UserId::new(),
            user_name: "admin".into(),
            email: "admin@example.com".into(),
            role: "staff".into(),
        };
        let user = User::try_from(row).unwrap();
        assert_eq!(user.role, Role::Staff);
    }

    #[test]
    fn unknown_role_fails_conversion() {
        let row = UserRow {
            user_id: UserId::new(),
            user_name: "admin".into(),
            email: "admin@example.com".into(),
            role: "superuser".into(),
        };
        assert!(User::try_from(row).is_err());
    }
}
