pub mod auth_response;
pub mod error_envelope;
pub mod login_request;
pub mod register_request;
