use rocket::{
    http::uri::Uri,
    response::{Flash, Redirect},
};

/// Sends the user to the login page, remembering where they wanted to go.
pub fn requires_login(message: &str, url: impl Into<String>) -> Flash<Redirect> {
    Flash::new(
        Redirect::to(format!("/login?m={}", Uri::percent_encode(message))),
        "callback",
        url.into(),
    )
}
