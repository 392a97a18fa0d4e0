pub mod cors;
pub mod json_body;
pub mod trace;

pub use cors::permissive_cors;
pub use json_body::JsonBody;
pub use trace::log_request;
