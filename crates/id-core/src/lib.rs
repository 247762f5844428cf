pub mod dto;
pub mod models;

pub use dto::auth_response::AuthResponse;
pub use dto::error_envelope::ErrorEnvelope;
pub use dto::login_request::LoginRequest;
pub use dto::register_request::RegisterRequest;
pub use models::user::User;
pub use models::user_projection::UserProjection;

#[cfg(test)]
mod tests;
