use crate::Connection;
use diesel::r2d2::{
    ConnectionManager, CustomizeConnection, Error as ConnError, Pool, PooledConnection,
};
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
use diesel::{sql_query, RunQueryDsl};
use rocket::{
    http::Status,
    request::{self, FromRequest},
    Outcome, Request, State,
};
use std::ops::Deref;

pub type DbPool = Pool<ConnectionManager<Connection>>;

// Connection request guard type: a wrapper around an r2d2 pooled connection.
pub struct DbConn(pub PooledConnection<ConnectionManager<Connection>>);

/// Attempts to retrieve a single connection from the managed database pool. If
/// no pool is currently managed, fails with an `InternalServerError` status. If
/// no connections are available, fails with a `ServiceUnavailable` status.
impl<'a, 'r> FromRequest<'a, 'r> for DbConn {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<Self, Self::Error> {
        let pool = request.guard::<State<DbPool>>()?;
        match pool.get() {
            Ok(conn) => Outcome::Success(DbConn(conn)),
            Err(_) => Outcome::Failure((Status::ServiceUnavailable, ())),
        }
    }
}

// For the convenience of using an &DbConn as an &Connection.
impl Deref for DbConn {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Makes sure cascade and nullify rules declared in the migrations are
/// actually applied by SQLite.
#[derive(Debug, Clone, Copy)]
pub struct PragmaForeignKey;

impl CustomizeConnection<Connection, ConnError> for PragmaForeignKey {
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))] // on Postgres this defaults to an empty function
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), ConnError> {
        sql_query("PRAGMA foreign_keys = on;")
            .execute(conn)
            .map(|_| ())
            .map_err(ConnError::QueryError)
    }
}
