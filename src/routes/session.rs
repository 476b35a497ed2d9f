use rocket::{
    http::{Cookie, Cookies},
    request::{FlashMessage, LenientForm},
    response::Redirect,
};
use rocket_contrib::templates::Template;

use crate::routes::RespondOrRedirect;
use quill_models::{
    db_conn::DbConn,
    users::{User, AUTH_COOKIE},
};

#[get("/login?<m>")]
pub fn new(m: Option<String>, account: Option<User>, msg: Option<FlashMessage>) -> Template {
    Template::render(
        "sessions/login",
        json!({
            "account": account,
            "message": m,
            "flash": msg.map(|f| f.msg().to_owned()),
        }),
    )
}

#[derive(FromForm)]
pub struct LoginForm {
    pub email_or_name: String,
    pub password: String,
}

#[post("/login", data = "<form>")]
pub fn create(conn: DbConn, form: LenientForm<LoginForm>, mut cookies: Cookies) -> RespondOrRedirect {
    let form = form.into_inner();
    let user = User::find_by_name(&*conn, &form.email_or_name)
        .or_else(|_| User::find_by_email(&*conn, &form.email_or_name));

    match user {
        Ok(user) if user.auth(&form.password) => {
            cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
            Redirect::to("/").into()
        }
        _ => Template::render(
            "sessions/login",
            json!({
                "account": null,
                "message": "Invalid username, or password",
                "flash": null,
            }),
        )
        .into(),
    }
}

#[get("/logout")]
pub fn delete(mut cookies: Cookies) -> Redirect {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Redirect::to("/")
}
