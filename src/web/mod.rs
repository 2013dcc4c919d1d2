pub mod categories;
pub mod crawl;
pub mod error;
pub mod export;
pub mod generate;
pub mod index;
pub mod login;
pub mod logout;
pub mod payments;
pub mod photos;
pub mod posts;
pub mod samples;
pub mod style;

use actix_web::HttpRequest;

/// Configures the web app by adding services from each web file.
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match; keep the page routes
    // first and the API routes grouped after them.
    index::configure(conf);
    login::configure(conf);
    logout::configure(conf);
    categories::configure(conf);
    samples::configure(conf);
    style::configure(conf);
    posts::configure(conf);
    photos::configure(conf);
    crawl::configure(conf);
    generate::configure(conf);
    export::configure(conf);
    payments::configure(conf);

    conf.service(crate::create_user::create_user_get)
        .service(crate::create_user::create_user_post)
        .service(crate::session::view_task_expire_sessions);
}

/// Best-effort client address for rate limiting.
pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
