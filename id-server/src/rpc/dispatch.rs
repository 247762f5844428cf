//! Explicit dispatch table: operation name -> handler function.

use crate::rpc::envelope::RpcRequest;
use crate::service::{IdentityError, IdentityService};

use id_core::{ErrorEnvelope, LoginRequest, RegisterRequest};

use serde::Serialize;
use serde_json::Value;
use serde_json::json;

pub const OP_REGISTER: &str = "auth.register";
pub const OP_LOGIN: &str = "auth.login";
pub const OP_VERIFY: &str = "auth.verify";

/// Route a request to its handler. Unknown operations get a 400 envelope;
/// nothing here panics or propagates a raw internal error.
pub async fn dispatch(service: &IdentityService, request: RpcRequest) -> Result<Value, ErrorEnvelope> {
    match request.op.as_str() {
        OP_REGISTER => handle_register(service, request.data).await,
        OP_LOGIN => handle_login(service, request.data).await,
        OP_VERIFY => handle_verify(service, request.data),
        other => Err(ErrorEnvelope::new(
            400,
            format!("unknown operation: {}", other),
        )),
    }
}

async fn handle_register(service: &IdentityService, data: Value) -> Result<Value, ErrorEnvelope> {
    let request: RegisterRequest = parse_payload(data)?;

    let response = service
        .register(request)
        .await
        .map_err(|e| translate(OP_REGISTER, e))?;

    to_reply(response)
}

async fn handle_login(service: &IdentityService, data: Value) -> Result<Value, ErrorEnvelope> {
    let request: LoginRequest = parse_payload(data)?;

    let response = service
        .login(request)
        .await
        .map_err(|e| translate(OP_LOGIN, e))?;

    to_reply(response)
}

fn handle_verify(service: &IdentityService, data: Value) -> Result<Value, ErrorEnvelope> {
    let Some(token) = data.as_str() else {
        return Err(ErrorEnvelope::new(400, "expected a token string payload"));
    };

    let response = service.verify(token).map_err(|e| translate(OP_VERIFY, e))?;

    to_reply(response)
}

/// Log the internal error (with location) and hand back the caller-facing
/// envelope.
fn translate(op: &str, e: IdentityError) -> ErrorEnvelope {
    match e {
        IdentityError::Infrastructure { .. } => log::error!("{} failed: {}", op, e),
        _ => log::debug!("{} rejected: {}", op, e),
    }

    e.envelope()
}

fn parse_payload<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, ErrorEnvelope> {
    serde_json::from_value(data)
        .map_err(|e| ErrorEnvelope::new(400, format!("malformed payload: {}", e)))
}

fn to_reply<T: Serialize>(response: T) -> Result<Value, ErrorEnvelope> {
    serde_json::to_value(response).map_err(|e| {
        log::error!("Response serialization failed: {}", e);
        ErrorEnvelope::new(500, "internal error")
    })
}

/// Serialize an envelope for the wire. Infallible by construction.
pub fn envelope_value(envelope: &ErrorEnvelope) -> Value {
    json!({ "status": envelope.status, "message": envelope.message })
}
