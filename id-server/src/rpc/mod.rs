//! Message-pattern RPC boundary.
//!
//! The broker in front of this service is an external collaborator; what
//! lives here is the explicit dispatch surface (operation name -> handler)
//! plus a newline-delimited JSON transport so the service runs end to end
//! over a plain socket.

pub mod dispatch;
pub mod envelope;
pub mod listener;
