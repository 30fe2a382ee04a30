//! A small JSON API for managing blog posts, kept in memory.
//!
//! [`app`] assembles the routes and middleware into an iron [`Chain`]
//! that can be served with `Iron::new(chain).http(addr)`.

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod store;

use iron::Chain;
use logger::Logger;
use router::Router;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use model::{Post, PostDraft, PostField, SortDirection};
pub use store::PostStore;

use docs::{DescriptorHandler, SwaggerUiHandler, DESCRIPTOR_PATH, DOCS_PATH};
use handlers::{Handlers, PreflightHandler};
use middleware::{CorsAfterMiddleware, JsonAfterMiddleware, RateLimiter};

pub fn app(store: PostStore, config: &Config) -> Chain {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/api/posts", handlers.list, "list_posts");
    router.post("/api/posts", handlers.create, "create_post");
    router.get("/api/posts/search", handlers.search, "search_posts");
    router.put("/api/posts/:id", handlers.update, "update_post");
    router.delete("/api/posts/:id", handlers.delete, "delete_post");
    router.options("/api/posts", PreflightHandler, "posts_preflight");
    router.options("/api/posts/:id", PreflightHandler, "post_preflight");
    router.get(DOCS_PATH, SwaggerUiHandler, "docs");
    router.get(DESCRIPTOR_PATH, DescriptorHandler, "docs_descriptor");

    let (logger_before, logger_after) = Logger::new(None);
    let rate_limiter = RateLimiter::new(config.rate_limit, config.rate_window);

    let mut chain = Chain::new(router);
    chain.link_before(logger_before); // Should be first!
    chain.link_before(rate_limiter);
    chain.link_after(JsonAfterMiddleware);
    chain.link_after(CorsAfterMiddleware);
    chain.link_after(logger_after); // Should be last!
    chain
}
