use crate::{posts::Post, schema::comments, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, Serialize)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub post_id: Option<i32>,
    pub author_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable, Default)]
#[table_name = "comments"]
pub struct NewComment {
    pub content: String,
    pub post_id: Option<i32>,
    pub author_id: i32,
}

impl Comment {
    get!(comments);
    last!(comments);
    list_by!(comments, list_by_post, post_id as i32);

    pub fn insert(conn: &Connection, new: NewComment) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        diesel::insert_into(comments::table)
            .values(new)
            .execute(conn)?;
        Self::last(conn)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn count_for_post(conn: &Connection, post: &Post) -> Result<i64> {
        comments::table
            .filter(comments::post_id.eq(post.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts::NewPost, tests::db, users::tests::fill_database};

    fn simple_post(conn: &Connection, author: &User) -> Post {
        Post::insert(
            conn,
            NewPost {
                content: "A post".to_owned(),
                author_id: author.id,
                ..NewPost::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn insert_and_list() {
        let conn = db();
        let users = fill_database(&conn);
        let post = simple_post(&conn, &users[0]);

        let comment = Comment::insert(
            &conn,
            NewComment {
                content: "Nice one".to_owned(),
                post_id: Some(post.id),
                author_id: users[1].id,
            },
        )
        .unwrap();

        let comments = post.get_comments(&conn).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, comment.id);
        assert_eq!(comment.get_author(&conn).unwrap().id, users[1].id);
    }

    #[test]
    fn empty_content_is_rejected() {
        let conn = db();
        let users = fill_database(&conn);
        let post = simple_post(&conn, &users[0]);

        assert!(matches!(
            Comment::insert(
                &conn,
                NewComment {
                    content: "   ".to_owned(),
                    post_id: Some(post.id),
                    author_id: users[1].id,
                },
            ),
            Err(Error::InvalidValue)
        ));
        assert_eq!(Comment::count_for_post(&conn, &post).unwrap(), 0);
    }

    #[test]
    fn deleting_the_post_deletes_its_comments() {
        let conn = db();
        let users = fill_database(&conn);
        let post = simple_post(&conn, &users[0]);
        Comment::insert(
            &conn,
            NewComment {
                content: "Soon gone".to_owned(),
                post_id: Some(post.id),
                author_id: users[1].id,
            },
        )
        .unwrap();

        post.delete(&conn).unwrap();

        assert_eq!(Comment::count_for_post(&conn, &post).unwrap(), 0);
    }

    #[test]
    fn deleting_the_author_deletes_their_comments() {
        let conn = db();
        let users = fill_database(&conn);
        let post = simple_post(&conn, &users[0]);
        Comment::insert(
            &conn,
            NewComment {
                content: "By someone else".to_owned(),
                post_id: Some(post.id),
                author_id: users[1].id,
            },
        )
        .unwrap();

        users[1].delete(&conn).unwrap();

        assert_eq!(Comment::count_for_post(&conn, &post).unwrap(), 0);
        // the post itself is not touched
        assert!(Post::get(&conn, post.id).is_ok());
    }
}
