use crate::{schema::follows, users::User, Connection, Error, Result};
use diesel::{
    self,
    result::{DatabaseErrorKind, Error as DieselError},
    ExpressionMethods, QueryDsl, RunQueryDsl,
};

#[derive(Queryable, Identifiable, Clone, Debug)]
pub struct Follow {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);
    get!(follows);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Get-or-create for the edge between two users.
    ///
    /// Self-follows are silently ignored. When a concurrent request inserts
    /// the same edge first, the unique constraint fires and the existing row
    /// is returned instead.
    pub fn ensure(conn: &Connection, from: &User, to: &User) -> Result<Option<Follow>> {
        if from.id == to.id {
            return Ok(None);
        }
        match Follow::find(conn, from.id, to.id) {
            Ok(follow) => Ok(Some(follow)),
            Err(Error::NotFound) => match Follow::insert(
                conn,
                NewFollow {
                    follower_id: from.id,
                    following_id: to.id,
                },
            ) {
                Ok(follow) => Ok(Some(follow)),
                Err(Error::Db(DieselError::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    _,
                ))) => Follow::find(conn, from.id, to.id).map(Some),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Removes the edge between two users. Removing an edge that does not
    /// exist is a no-op.
    pub fn remove(conn: &Connection, from: &User, to: &User) -> Result<()> {
        diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(from.id))
                .filter(follows::following_id.eq(to.id)),
        )
        .execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::QueryDsl;

    fn edge_count(conn: &Connection) -> i64 {
        follows::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn follow_is_idempotent() {
        let conn = db();
        let users = fill_database(&conn);

        let first = Follow::ensure(&conn, &users[0], &users[1]).unwrap().unwrap();
        let second = Follow::ensure(&conn, &users[0], &users[1]).unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(edge_count(&conn), 1);
    }

    #[test]
    fn self_follow_is_suppressed() {
        let conn = db();
        let users = fill_database(&conn);

        assert!(Follow::ensure(&conn, &users[0], &users[0]).unwrap().is_none());
        assert_eq!(edge_count(&conn), 0);
        assert!(!users[0].is_following(&conn, users[0].id).unwrap());
    }

    #[test]
    fn unfollow_is_idempotent() {
        let conn = db();
        let users = fill_database(&conn);
        Follow::ensure(&conn, &users[0], &users[1]).unwrap();

        Follow::remove(&conn, &users[0], &users[1]).unwrap();
        Follow::remove(&conn, &users[0], &users[1]).unwrap();

        assert_eq!(edge_count(&conn), 0);
        assert!(matches!(
            Follow::find(&conn, users[0].id, users[1].id),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn edges_are_directed() {
        let conn = db();
        let users = fill_database(&conn);

        Follow::ensure(&conn, &users[0], &users[1]).unwrap();

        assert!(users[0].is_following(&conn, users[1].id).unwrap());
        assert!(!users[1].is_following(&conn, users[0].id).unwrap());
        assert_eq!(users[1].count_followers(&conn).unwrap(), 1);
        assert_eq!(users[0].count_followers(&conn).unwrap(), 0);
    }

    #[test]
    fn deleting_a_user_deletes_their_edges() {
        let conn = db();
        let users = fill_database(&conn);
        Follow::ensure(&conn, &users[0], &users[1]).unwrap();
        Follow::ensure(&conn, &users[1], &users[0]).unwrap();

        users[0].delete(&conn).unwrap();

        assert_eq!(edge_count(&conn), 0);
    }

    #[test]
    fn followed_users_are_listed() {
        let conn = db();
        let users = fill_database(&conn);
        Follow::ensure(&conn, &users[0], &users[1]).unwrap();
        Follow::ensure(&conn, &users[0], &users[2]).unwrap();

        let followed = users[0].get_followed(&conn).unwrap();
        assert_eq!(followed.len(), 2);
        assert!(followed.iter().any(|u| u.id == users[1].id));
        assert!(followed.iter().any(|u| u.id == users[2].id));
    }
}
