use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use rocket_contrib::templates::Template;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::routes::{errors::ErrorPage, post_to_json, posts_to_json, Page, RespondOrRedirect};
use crate::utils;
use quill_models::{
    db_conn::DbConn,
    groups::Group,
    posts::{NewPost, Post},
    users::User,
    Connection, Error,
};

#[get("/?<page>")]
pub fn index(
    conn: DbConn,
    account: Option<User>,
    page: Option<Page>,
) -> Result<Template, ErrorPage> {
    let n_pages = Page::total(Post::count(&*conn)? as i32);
    let page = page.unwrap_or_default().clamped(n_pages);
    let posts = Post::list_page(&*conn, page.limits())?;
    Ok(Template::render(
        "posts/index",
        json!({
            "account": account,
            "posts": posts_to_json(&posts, &*conn)?,
            "page": page.number(),
            "n_pages": n_pages,
            "has_next": page.has_next(n_pages),
            "has_previous": page.has_previous(),
        }),
    ))
}

#[get("/posts/<id>")]
pub fn details(id: i32, conn: DbConn, account: Option<User>) -> Result<Template, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    render_details(&*conn, account, &post, None).map_err(ErrorPage::from)
}

/// The post page, with its comments and the comment form. Shared with the
/// comment submission handler so that field errors can be shown in place.
pub fn render_details(
    conn: &Connection,
    account: Option<User>,
    post: &Post,
    errors: Option<ValidationErrors>,
) -> Result<Template, Error> {
    let comments = post
        .get_comments(conn)?
        .into_iter()
        .map(|c| {
            let author = c.get_author(conn)?;
            Ok(json!({ "comment": c, "author": author }))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Template::render(
        "posts/details",
        json!({
            "account": account,
            "post": post_to_json(post, conn)?,
            "comments": comments,
            "errors": errors,
        }),
    ))
}

/// Blank text never reaches the database, whitespace-only included.
pub fn not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some(Cow::from("This field can't be empty"));
        return Err(err);
    }
    Ok(())
}

#[derive(FromForm, Validate)]
pub struct NewPostForm {
    #[validate(custom = "not_blank")]
    pub content: String,
    pub group: Option<String>,
}

#[get("/create")]
pub fn new(conn: DbConn, user: User) -> Result<Template, ErrorPage> {
    Ok(Template::render(
        "posts/new",
        json!({
            "account": user,
            "groups": Group::list(&*conn)?,
            "content": "",
            "group": null,
            "errors": null,
        }),
    ))
}

#[get("/create", rank = 2)]
pub fn new_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in order to write a post", "/create")
}

#[post("/create", data = "<form>")]
pub fn create(
    conn: DbConn,
    user: User,
    form: LenientForm<NewPostForm>,
) -> Result<RespondOrRedirect, ErrorPage> {
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        return Ok(Template::render(
            "posts/new",
            json!({
                "account": user,
                "groups": Group::list(&*conn)?,
                "content": form.content,
                "group": form.group,
                "errors": errors,
            }),
        )
        .into());
    }

    let group_id = match form.group.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => Some(Group::find_by_slug(&*conn, slug)?.id),
        None => None,
    };
    Post::insert(
        &*conn,
        NewPost {
            content: form.content,
            creation_date: None,
            author_id: user.id,
            group_id,
            image: None,
        },
    )?;
    Ok(Flash::success(
        Redirect::to(format!("/profile/{}", user.username)),
        "Your post has been published",
    )
    .into())
}

#[get("/posts/<id>/edit")]
pub fn edit(id: i32, conn: DbConn, user: User) -> Result<RespondOrRedirect, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    if post.author_id != user.id {
        // only the author may touch a post, everyone else is sent back to it
        return Ok(Redirect::to(format!("/posts/{}", id)).into());
    }
    let group = post.get_group(&*conn)?;
    Ok(Template::render(
        "posts/edit",
        json!({
            "account": user,
            "groups": Group::list(&*conn)?,
            "post_id": post.id,
            "content": post.content,
            "group": group.map(|g| g.slug),
            "errors": null,
        }),
    )
    .into())
}

#[get("/posts/<id>/edit", rank = 2)]
pub fn edit_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to edit a post",
        format!("/posts/{}/edit", id),
    )
}

#[post("/posts/<id>/edit", data = "<form>")]
pub fn update(
    id: i32,
    conn: DbConn,
    user: User,
    form: LenientForm<NewPostForm>,
) -> Result<RespondOrRedirect, ErrorPage> {
    let mut post = Post::get(&*conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(format!("/posts/{}", id)).into());
    }

    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        return Ok(Template::render(
            "posts/edit",
            json!({
                "account": user,
                "groups": Group::list(&*conn)?,
                "post_id": post.id,
                "content": form.content,
                "group": form.group,
                "errors": errors,
            }),
        )
        .into());
    }

    post.content = form.content;
    post.group_id = match form.group.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => Some(Group::find_by_slug(&*conn, slug)?.id),
        None => None,
    };
    let post = post.update(&*conn)?;
    Ok(Flash::success(
        Redirect::to(format!("/posts/{}", post.id)),
        "Your post has been updated",
    )
    .into())
}
