use crate::{schema::groups, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, Serialize)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Insertable, Default)]
#[table_name = "groups"]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    last!(groups);
    get!(groups);
    find_by!(groups, find_by_slug, slug as &str);

    pub fn insert(conn: &Connection, new: NewGroup) -> Result<Self> {
        if new.title.trim().is_empty() || new.slug.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        diesel::insert_into(groups::table)
            .values(new)
            .execute(conn)?;
        Self::last(conn)
    }

    pub fn list(conn: &Connection) -> Result<Vec<Group>> {
        groups::table
            .order(groups::title.asc())
            .load::<Group>(conn)
            .map_err(Error::from)
    }

    /// Posts referencing this group are kept, their reference is cleared
    /// (`ON DELETE SET NULL`).
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;

    pub(crate) fn simple_group(conn: &Connection) -> Group {
        Group::insert(
            conn,
            NewGroup {
                title: "Test group".to_owned(),
                slug: "test_slug".to_owned(),
                description: "A group for tests".to_owned(),
            },
        )
        .unwrap()
    }

    #[test]
    fn find_by_slug() {
        let conn = db();
        let group = simple_group(&conn);

        assert_eq!(Group::find_by_slug(&conn, "test_slug").unwrap().id, group.id);
        assert!(matches!(
            Group::find_by_slug(&conn, "missing"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn slug_is_unique() {
        let conn = db();
        simple_group(&conn);

        assert!(Group::insert(
            &conn,
            NewGroup {
                title: "Another group".to_owned(),
                slug: "test_slug".to_owned(),
                description: String::new(),
            },
        )
        .is_err());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let conn = db();

        assert!(matches!(
            Group::insert(
                &conn,
                NewGroup {
                    title: String::new(),
                    slug: "slug".to_owned(),
                    description: String::new(),
                },
            ),
            Err(Error::InvalidValue)
        ));
        assert!(matches!(
            Group::insert(
                &conn,
                NewGroup {
                    title: "Title".to_owned(),
                    slug: "  ".to_owned(),
                    description: String::new(),
                },
            ),
            Err(Error::InvalidValue)
        ));
    }
}
