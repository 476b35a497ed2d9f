use quill_models::{comments::Comment, posts::Post, Connection, Result, ITEMS_PER_PAGE};
use rocket::{
    http::RawStr,
    request::FromFormValue,
    response::{Flash, Redirect},
};
use rocket_contrib::templates::Template;

/// A page number, taken from the `?page=` query parameter.
///
/// Anything that does not parse as a positive integer falls back to the
/// first page; numbers past the end are clamped to the last page by the
/// handlers, through [`Page::clamped`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page(i32);

impl<'v> FromFormValue<'v> for Page {
    type Error = ();

    fn from_form_value(form_value: &'v RawStr) -> std::result::Result<Page, Self::Error> {
        match form_value.parse::<i32>() {
            Ok(page) if page >= 1 => Ok(Page(page)),
            _ => Ok(Page::first()),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first()
    }
}

impl Page {
    pub fn first() -> Page {
        Page(1)
    }

    pub fn number(self) -> i32 {
        self.0
    }

    /// Computes the total number of pages needed to display n_items
    pub fn total(n_items: i32) -> i32 {
        if n_items % ITEMS_PER_PAGE == 0 && n_items > 0 {
            n_items / ITEMS_PER_PAGE
        } else {
            (n_items / ITEMS_PER_PAGE) + 1
        }
    }

    /// Clamps the page number to the last page.
    pub fn clamped(self, n_pages: i32) -> Page {
        if self.0 > n_pages {
            Page(n_pages.max(1))
        } else {
            self
        }
    }

    pub fn limits(self) -> (i32, i32) {
        ((self.0 - 1) * ITEMS_PER_PAGE, self.0 * ITEMS_PER_PAGE)
    }

    pub fn has_previous(self) -> bool {
        self.0 > 1
    }

    pub fn has_next(self, n_pages: i32) -> bool {
        self.0 < n_pages
    }
}

/// Everything the templates need to display a post in a listing.
pub fn post_to_json(post: &Post, conn: &Connection) -> Result<serde_json::Value> {
    Ok(json!({
        "post": post,
        "author": post.get_author(conn)?,
        "group": post.get_group(conn)?,
        "n_comments": Comment::count_for_post(conn, post)?,
    }))
}

pub fn posts_to_json(posts: &[Post], conn: &Connection) -> Result<Vec<serde_json::Value>> {
    posts.iter().map(|p| post_to_json(p, conn)).collect()
}

#[derive(Responder)]
pub enum RespondOrRedirect {
    Response(Template),
    FlashResponse(Flash<Template>),
    Redirect(Redirect),
    FlashRedirect(Flash<Redirect>),
}

impl From<Template> for RespondOrRedirect {
    fn from(template: Template) -> Self {
        RespondOrRedirect::Response(template)
    }
}

impl From<Flash<Template>> for RespondOrRedirect {
    fn from(template: Flash<Template>) -> Self {
        RespondOrRedirect::FlashResponse(template)
    }
}

impl From<Redirect> for RespondOrRedirect {
    fn from(redirect: Redirect) -> Self {
        RespondOrRedirect::Redirect(redirect)
    }
}

impl From<Flash<Redirect>> for RespondOrRedirect {
    fn from(redirect: Flash<Redirect>) -> Self {
        RespondOrRedirect::FlashRedirect(redirect)
    }
}

pub mod about;
pub mod comments;
pub mod errors;
pub mod groups;
pub mod posts;
pub mod session;
pub mod user;
