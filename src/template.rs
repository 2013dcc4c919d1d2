//! Askama templates for the server-rendered pages.
//!
//! The workflow surfaces (photos, crawl, generation, analyses) are JSON
//! endpoints under /api; these pages cover the account and dashboard shell.

use crate::middleware::ClientCtx;
use crate::orm::{categories, posts};
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub client: ClientCtx,
    pub site_name: String,
    pub site_description: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub client: ClientCtx,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "create_user.html")]
pub struct CreateUserTemplate {
    pub client: ClientCtx,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub client: ClientCtx,
    pub categories: Vec<categories::Model>,
    pub posts: Vec<posts::Model>,
}
