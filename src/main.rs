#![feature(proc_macro_hygiene, decl_macro)]

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_json;

use diesel::r2d2::ConnectionManager;
use dotenv::dotenv;
use quill_models::{
    db_conn::{DbPool, PragmaForeignKey},
    Connection, CONFIG,
};
use rocket_contrib::templates::Template;
use tracing::info;

mod routes;
mod utils;

/// Initializes a database pool.
fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let mut builder = DbPool::builder().connection_customizer(Box::new(PragmaForeignKey));
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    }
    if let Some(min_idle) = CONFIG.db_min_idle {
        builder = builder.min_idle(Some(min_idle));
    }
    builder.build(manager).ok()
}

fn main() {
    dotenv().ok();
    tracing_subscriber::fmt().init();

    let pool = init_pool().expect("main: database pool initialization error");
    info!("Starting quill on {}", CONFIG.base_url);

    rocket::ignite()
        .mount(
            "/",
            routes![
                routes::posts::index,
                routes::posts::details,
                routes::posts::new,
                routes::posts::new_auth,
                routes::posts::create,
                routes::posts::edit,
                routes::posts::edit_auth,
                routes::posts::update,
                routes::groups::details,
                routes::comments::create,
                routes::comments::create_auth,
                routes::user::details,
                routes::user::follow,
                routes::user::follow_auth,
                routes::user::unfollow,
                routes::user::unfollow_auth,
                routes::user::feed,
                routes::user::feed_auth,
                routes::session::new,
                routes::session::create,
                routes::session::delete,
                routes::about::author,
                routes::about::tech,
            ],
        )
        .register(catchers![routes::errors::not_found, routes::errors::server_error])
        .manage(pool)
        .attach(Template::fairing())
        .launch();
}
