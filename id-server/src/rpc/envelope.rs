use serde::Deserialize;
use serde_json::Value;

/// One inbound RPC frame: the operation name and its payload.
///
/// `auth.register` and `auth.login` carry object payloads; `auth.verify`
/// carries the token as a raw string payload.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub op: String,
    #[serde(default)]
    pub data: Value,
}
