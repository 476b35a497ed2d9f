use quill_models::{users::User, Error};
use rocket::{
    http::Status,
    request::{FromRequest, Request},
    response::{self, Flash, Redirect, Responder},
};
use rocket_contrib::templates::Template;
use tracing::warn;

#[derive(Debug)]
pub struct ErrorPage(Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

impl<'r> Responder<'r> for ErrorPage {
    fn respond_to(self, req: &Request) -> response::Result<'r> {
        warn!("{:?}", self.0);
        match self.0 {
            Error::NotFound => Err(Status::NotFound),
            Error::Unauthorized => {
                Flash::error(Redirect::to("/login"), "You need to be logged in first")
                    .respond_to(req)
            }
            _ => Err(Status::InternalServerError),
        }
    }
}

#[catch(404)]
pub fn not_found(req: &Request) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render("errors/404", json!({ "account": user }))
}

#[catch(500)]
pub fn server_error(req: &Request) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render("errors/500", json!({ "account": user }))
}
