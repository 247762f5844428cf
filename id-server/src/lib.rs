pub mod error;
pub mod logger;
pub mod rpc;
pub mod service;

pub use error::{Result, ServerError};
pub use rpc::dispatch::dispatch;
pub use rpc::envelope::RpcRequest;
pub use rpc::listener::serve;
pub use service::{IdentityError, IdentityService};

#[cfg(test)]
mod tests;
