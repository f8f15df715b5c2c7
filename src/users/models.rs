use crate::db::schema::users;
use crate::types::ApiError;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    /// Every user. An empty table is reported as not found.
    pub fn load_all(connection: &mut PgConnection) -> Result<Vec<User>, ApiError> {
        let users = users::table
            .select(User::as_select())
            .load::<User>(connection)?;
        if users.is_empty() {
            return Err(ApiError::not_found("No users found"));
        }
        Ok(users)
    }
}
