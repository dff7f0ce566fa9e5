pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary can build the router from one place.
pub use middleware::require_actor;
pub use rest::{
    accept_request_handler, complete_request_handler, create_request_handler,
    get_request_handler, list_requests_handler, preview_template_handler, reject_request_handler,
    router,
};
