use derive_new::new;

#[derive(new)]
pub struct CreateRoom {
    pub room_name: String,
    pub description: String,
    pub location: String,
    pub capacity: i32,
}
