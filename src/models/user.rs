/// A signed-up account. The integer id is the store's internal key; only the
/// uuid ever crosses the wire.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub user_uuid: String,
    pub full_name: String,
    pub email: String,
}
