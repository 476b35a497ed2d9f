#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

#[cfg(all(not(feature = "sqlite"), feature = "postgres"))]
pub type Connection = diesel::PgConnection;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    InvalidValue,
    Migration,
    NotFound,
    Password,
    Unauthorized,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            e => Error::Db(e),
        }
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(_: bcrypt::BcryptError) -> Self {
        Error::Password
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds a function to a model, that returns the first
/// matching row for a given list of columns.
///
/// Usage:
///
/// ```ignore
/// impl Model {
///     find_by!(model_table, name_of_the_function, column1 as String, column2 as i32);
/// }
///
/// // Get the Model with these values for col1 and col2
/// Model::name_of_the_function(connection, "value1", 12);
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// List all rows of a model, with filters.
macro_rules! list_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by its primary key.
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row.
///
/// SQLite has no `RETURNING`, so the freshly inserted row is fetched back
/// with `last`.
macro_rules! insert {
    ($table:ident, $from:ty) => {
        last!($table);
        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table)
                .values(new)
                .execute(conn)?;
            Self::last(conn)
        }
    };
}

/// Returns the last row of a table.
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// How many items are displayed on each listing page.
pub const ITEMS_PER_PAGE: i32 = 10;

pub mod comments;
pub mod config;
pub mod db_conn;
pub mod follows;
pub mod groups;
pub mod migrations;
pub mod posts;
pub mod schema;
pub mod users;

pub use config::CONFIG;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{migrations, Connection as Conn};
    use diesel::{Connection, RunQueryDsl};

    pub(crate) fn db() -> Conn {
        let conn = Conn::establish(":memory:").expect("Couldn't open the test database");
        diesel::sql_query("PRAGMA foreign_keys = on;")
            .execute(&conn)
            .expect("Couldn't enable foreign keys");
        migrations::run(&conn).expect("Couldn't run the migrations");
        conn
    }
}
