//! Loads a small demo data set: one staff account, three members, a few
//! rooms, future-dated bookings through the validated path and one truly
//! historical booking through the backfill path.

use adapter::database::connect_database_with;
use anyhow::Result;
use chrono::{Duration, Utc};
use kernel::model::{
    booking::{
        event::{BackfillBooking, CreateBooking, UpdateBookingStatus},
        window::TimeWindow,
        BookingStatus,
    },
    role::Role,
    user::{event::CreateUser, Actor},
};
use kernel::model::room::event::CreateRoom;
use registry::AppRegistry;
use shared::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database);
    let registry = AppRegistry::new(pool);

    let staff_id = registry
        .user_repository()
        .create(CreateUser::new(
            "admin".into(),
            "admin@example.com".into(),
            Role::Staff,
        ))
        .await?;
    let mut member_ids = Vec::new();
    for (name, email) in [
        ("John Doe", "user1@example.com"),
        ("Jane Smith", "user2@example.com"),
        ("Bob Johnson", "user3@example.com"),
    ] {
        let id = registry
            .user_repository()
            .create(CreateUser::new(name.into(), email.into(), Role::Member))
            .await?;
        member_ids.push(id);
    }
    tracing::info!("created {} users", member_ids.len() + 1);

    let rooms = [
        ("Meeting Room A", "Floor 2, Building A", 20),
        ("Seminar Room B", "Floor 3, Building B", 50),
        ("Huddle Room C", "Floor 1, Building A", 10),
        ("Auditorium", "Ground Floor, Main Building", 100),
    ];
    let mut room_ids = Vec::new();
    for (name, location, capacity) in rooms {
        let id = registry
            .room_repository()
            .create(CreateRoom::new(
                name.into(),
                String::new(),
                location.into(),
                capacity,
            ))
            .await?;
        room_ids.push(id);
    }
    tracing::info!("created {} rooms", room_ids.len());

    let now = Utc::now();

    // Future bookings go through the normal validated path.
    let weekly_sync = registry
        .booking_repository()
        .create(CreateBooking::new(
            room_ids[0],
            member_ids[0],
            "Weekly team sync".into(),
            "Recurring project status meeting".into(),
            TimeWindow::new(now + Duration::days(1), now + Duration::days(1) + Duration::hours(2)),
            15,
        ))
        .await?;
    registry
        .booking_repository()
        .create(CreateBooking::new(
            room_ids[1],
            member_ids[1],
            "Technology seminar".into(),
            String::new(),
            TimeWindow::new(now + Duration::days(3), now + Duration::days(3) + Duration::hours(3)),
            45,
        ))
        .await?;

    // One of them gets approved by staff, exercising the transition path
    // and writing its history row.
    registry
        .booking_repository()
        .update_status(UpdateBookingStatus::new(
            weekly_sync,
            BookingStatus::Approved,
            Actor::User {
                user_id: staff_id,
                role: Role::Staff,
            },
            "approved during seeding".into(),
        ))
        .await?;

    // A historical booking can only enter through the backfill path; the
    // normal one refuses past-dated windows.
    registry
        .booking_repository()
        .create_backfill(BackfillBooking::new(
            room_ids[2],
            member_ids[2],
            "Project Alpha retrospective".into(),
            String::new(),
            TimeWindow::new(now - Duration::days(7), now - Duration::days(7) + Duration::hours(2)),
            8,
            BookingStatus::Completed,
        ))
        .await?;

    tracing::info!("sample data loaded");
    Ok(())
}
