use crate::{
    comments::Comment, groups::Group, schema::posts, users::User, Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, Serialize, AsChangeset)]
#[changeset_options(treat_none_as_null = "true")]
pub struct Post {
    pub id: i32,
    pub content: String,
    pub creation_date: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

#[derive(Insertable, Default)]
#[table_name = "posts"]
pub struct NewPost {
    pub content: String,
    pub creation_date: Option<NaiveDateTime>,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl Post {
    get!(posts);
    last!(posts);

    pub fn insert(conn: &Connection, new: NewPost) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        diesel::insert_into(posts::table).values(new).execute(conn)?;
        Self::last(conn)
    }

    /// Batch insert, for seeding.
    pub fn insert_many(conn: &Connection, new: Vec<NewPost>) -> Result<usize> {
        if new.iter().any(|p| p.content.trim().is_empty()) {
            return Err(Error::InvalidValue);
        }
        diesel::insert_into(posts::table)
            .values(&new)
            .execute(conn)
            .map_err(Error::from)
    }

    pub fn update(&self, conn: &Connection) -> Result<Self> {
        if self.content.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        diesel::update(self).set(self).execute(conn)?;
        Self::get(conn, self.id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn list_page(conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        posts::table
            .order((posts::creation_date.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn count_for_group(conn: &Connection, group: &Group) -> Result<i64> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn group_page(conn: &Connection, group: &Group, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .order((posts::creation_date.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn count_for_author(conn: &Connection, author: &User) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn author_page(
        conn: &Connection,
        author: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .order((posts::creation_date.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn count_for_feed(conn: &Connection, user: &User) -> Result<i64> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Everything written by the authors the given user follows, most
    /// recent first.
    pub fn feed_page(conn: &Connection, user: &User, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .order((posts::creation_date.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_group(&self, conn: &Connection) -> Result<Option<Group>> {
        self.group_id.map(|id| Group::get(conn, id)).transpose()
    }

    pub fn get_comments(&self, conn: &Connection) -> Result<Vec<Comment>> {
        Comment::list_by_post(conn, self.id)
    }
}
