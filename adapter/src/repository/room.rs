use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::RoomId,
        room::{event::CreateRoom, Room},
    },
    repository::room::RoomRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::room::RoomRow, ConnectionPool};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let room_id = RoomId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO rooms (room_id, room_name, description, location, capacity)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(room_id)
        .bind(&event.room_name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.capacity)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no room record has been created".into(),
            ));
        }

        Ok(room_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT room_id, room_name, description, location,
                   capacity, is_active, created_at, updated_at
            FROM rooms
            WHERE is_active = TRUE
            ORDER BY room_name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT room_id, room_name, description, location,
                   capacity, is_active, created_at, updated_at
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        Ok(row.map(Room::from))
    }
}
