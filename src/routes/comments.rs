use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use validator::Validate;

use crate::routes::{errors::ErrorPage, posts, RespondOrRedirect};
use crate::utils;
use quill_models::{
    comments::{Comment, NewComment},
    db_conn::DbConn,
    posts::Post,
    users::User,
};

#[derive(FromForm, Validate)]
pub struct NewCommentForm {
    #[validate(custom = "crate::routes::posts::not_blank")]
    pub content: String,
}

#[post("/posts/<id>/comment", data = "<form>")]
pub fn create(
    id: i32,
    conn: DbConn,
    user: User,
    form: LenientForm<NewCommentForm>,
) -> Result<RespondOrRedirect, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        // nothing is saved, the post page is shown again with the field errors
        return posts::render_details(&*conn, Some(user), &post, Some(errors))
            .map(RespondOrRedirect::from)
            .map_err(ErrorPage::from);
    }

    Comment::insert(
        &*conn,
        NewComment {
            content: form.content,
            post_id: Some(post.id),
            author_id: user.id,
        },
    )?;
    Ok(Redirect::to(format!("/posts/{}", id)).into())
}

#[post("/posts/<id>/comment", rank = 2)]
pub fn create_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to comment",
        format!("/posts/{}", id),
    )
}
