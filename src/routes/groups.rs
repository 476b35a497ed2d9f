use rocket_contrib::templates::Template;

use crate::routes::{errors::ErrorPage, posts_to_json, Page};
use quill_models::{db_conn::DbConn, groups::Group, posts::Post, users::User};

#[get("/group/<slug>?<page>")]
pub fn details(
    slug: String,
    conn: DbConn,
    account: Option<User>,
    page: Option<Page>,
) -> Result<Template, ErrorPage> {
    let group = Group::find_by_slug(&*conn, &slug)?;
    let n_pages = Page::total(Post::count_for_group(&*conn, &group)? as i32);
    let page = page.unwrap_or_default().clamped(n_pages);
    let posts = Post::group_page(&*conn, &group, page.limits())?;
    Ok(Template::render(
        "groups/details",
        json!({
            "account": account,
            "group": group,
            "posts": posts_to_json(&posts, &*conn)?,
            "page": page.number(),
            "n_pages": n_pages,
            "has_next": page.has_next(n_pages),
            "has_previous": page.has_previous(),
        }),
    ))
}
