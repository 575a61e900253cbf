pub mod handlers;
pub mod llm;
pub mod middleware;
pub mod routes;
pub mod video;

pub use routes::create_router;
