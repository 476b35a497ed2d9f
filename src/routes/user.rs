use rocket::response::{Flash, Redirect};
use rocket_contrib::templates::Template;

use crate::routes::{errors::ErrorPage, posts_to_json, Page};
use crate::utils;
use quill_models::{db_conn::DbConn, follows::Follow, posts::Post, users::User};

#[get("/profile/<name>?<page>")]
pub fn details(
    name: String,
    conn: DbConn,
    account: Option<User>,
    page: Option<Page>,
) -> Result<Template, ErrorPage> {
    let author = User::find_by_name(&*conn, &name)?;
    // anonymous visitors never follow anyone, no need to ask the database
    let following = match account {
        Some(ref account) => account.is_following(&*conn, author.id)?,
        None => false,
    };
    let n_pages = Page::total(Post::count_for_author(&*conn, &author)? as i32);
    let page = page.unwrap_or_default().clamped(n_pages);
    let posts = Post::author_page(&*conn, &author, page.limits())?;
    Ok(Template::render(
        "users/details",
        json!({
            "account": account,
            "author": author,
            "following": following,
            "n_followers": author.count_followers(&*conn)?,
            "posts": posts_to_json(&posts, &*conn)?,
            "page": page.number(),
            "n_pages": n_pages,
            "has_next": page.has_next(n_pages),
            "has_previous": page.has_previous(),
        }),
    ))
}

#[get("/profile/<name>/follow")]
pub fn follow(name: String, conn: DbConn, user: User) -> Result<Redirect, ErrorPage> {
    let target = User::find_by_name(&*conn, &name)?;
    Follow::ensure(&*conn, &user, &target)?;
    Ok(Redirect::to(format!("/profile/{}", name)))
}

#[get("/profile/<name>/follow", rank = 2)]
pub fn follow_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to follow someone",
        format!("/profile/{}/follow", name),
    )
}

#[get("/profile/<name>/unfollow")]
pub fn unfollow(name: String, conn: DbConn, user: User) -> Result<Redirect, ErrorPage> {
    let target = User::find_by_name(&*conn, &name)?;
    Follow::remove(&*conn, &user, &target)?;
    Ok(Redirect::to(format!("/profile/{}", name)))
}

#[get("/profile/<name>/unfollow", rank = 2)]
pub fn unfollow_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to unfollow someone",
        format!("/profile/{}/unfollow", name),
    )
}

#[get("/follow?<page>")]
pub fn feed(conn: DbConn, user: User, page: Option<Page>) -> Result<Template, ErrorPage> {
    let n_pages = Page::total(Post::count_for_feed(&*conn, &user)? as i32);
    let page = page.unwrap_or_default().clamped(n_pages);
    let posts = Post::feed_page(&*conn, &user, page.limits())?;
    Ok(Template::render(
        "posts/feed",
        json!({
            "account": user,
            "posts": posts_to_json(&posts, &*conn)?,
            "page": page.number(),
            "n_pages": n_pages,
            "has_next": page.has_next(n_pages),
            "has_previous": page.has_previous(),
        }),
    ))
}

#[get("/follow", rank = 2)]
pub fn feed_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in order to see your feed", "/follow")
}
