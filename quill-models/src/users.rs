use crate::{db_conn::DbConn, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub const AUTH_COOKIE: &str = "user_id";

#[derive(Queryable, Identifiable, Clone, Debug, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable, Default)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
}

impl NewUser {
    /// Creates a new local user, with a hashed password.
    pub fn new_local(
        conn: &Connection,
        username: String,
        display_name: String,
        email: Option<String>,
        password: String,
    ) -> Result<User> {
        if username.is_empty() {
            return Err(Error::InvalidValue);
        }
        User::insert(
            conn,
            NewUser {
                username,
                display_name,
                email,
                hashed_password: Some(User::hash_pass(&password)?),
            },
        )
    }
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_name, username as &str);
    find_by!(users, find_by_email, email as &str);

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(Error::from)
    }

    pub fn auth(&self, pass: &str) -> bool {
        self.hashed_password
            .as_ref()
            .map(|hashed| bcrypt::verify(pass, hashed).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn get_followed(&self, conn: &Connection) -> Result<Vec<User>> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(self.id))
            .select(follows::following_id);
        users::table
            .filter(users::id.eq_any(followed))
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn count_followers(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::follows;
        follows::table
            .filter(follows::following_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn is_following(&self, conn: &Connection, other_id: i32) -> Result<bool> {
        use crate::schema::follows;
        follows::table
            .filter(follows::follower_id.eq(self.id))
            .filter(follows::following_id.eq(other_id))
            .count()
            .get_result::<i64>(conn)
            .map_err(Error::from)
            .map(|r| r > 0)
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&*conn, id).ok())
            .or_forward(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;

    pub(crate) fn fill_database(conn: &Connection) -> Vec<User> {
        let admin = NewUser::new_local(
            conn,
            "admin".to_owned(),
            "The admin".to_owned(),
            Some("admin@example.com".to_owned()),
            "invalid_admin_password".to_owned(),
        )
        .unwrap();
        let user = NewUser::new_local(
            conn,
            "user".to_owned(),
            "Some user".to_owned(),
            Some("user@example.com".to_owned()),
            "invalid_user_password".to_owned(),
        )
        .unwrap();
        let other = NewUser::new_local(
            conn,
            "other".to_owned(),
            "Another user".to_owned(),
            None,
            "invalid_other_password".to_owned(),
        )
        .unwrap();
        vec![admin, user, other]
    }

    #[test]
    fn find_by() {
        let conn = db();
        fill_database(&conn);

        let user = User::find_by_name(&conn, "user").unwrap();
        assert_eq!(user.display_name, "Some user");
        assert_eq!(
            User::find_by_email(&conn, "admin@example.com").unwrap().id,
            User::find_by_name(&conn, "admin").unwrap().id
        );
        assert!(matches!(
            User::find_by_name(&conn, "ghost"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn auth() {
        let conn = db();
        let user = NewUser::new_local(
            &conn,
            "test".to_owned(),
            "Test".to_owned(),
            None,
            "correct_password".to_owned(),
        )
        .unwrap();

        assert!(user.auth("correct_password"));
        assert!(!user.auth("wrong_password"));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let conn = db();
        fill_database(&conn);

        assert!(NewUser::new_local(
            &conn,
            "admin".to_owned(),
            "Impostor".to_owned(),
            None,
            "password".to_owned(),
        )
        .is_err());
    }
}
