use rocket_contrib::templates::Template;

use quill_models::users::User;

#[get("/about/author")]
pub fn author(account: Option<User>) -> Template {
    Template::render("about/author", json!({ "account": account }))
}

#[get("/about/tech")]
pub fn tech(account: Option<User>) -> Template {
    Template::render("about/tech", json!({ "account": account }))
}
