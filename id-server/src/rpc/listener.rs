use crate::rpc::dispatch::{dispatch, envelope_value};
use crate::rpc::envelope::RpcRequest;
use crate::service::IdentityService;

use id_core::ErrorEnvelope;

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Accept loop: one task per connection, connections are independent.
/// Runs until the listener fails; graceful shutdown is the caller's
/// `select!` against the signal handler.
pub async fn serve(listener: TcpListener, service: Arc<IdentityService>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("Connection from {}", peer);

        let service = service.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, service).await {
                warn!("Connection from {} dropped: {}", peer, e);
            }
        });
    }
}

/// Newline-delimited JSON frames: one request per line, one reply per
/// line. A malformed frame gets an error envelope and the connection
/// stays up.
async fn handle_connection(
    stream: TcpStream,
    service: Arc<IdentityService>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => match dispatch(&service, request).await {
                Ok(value) => value,
                Err(envelope) => envelope_value(&envelope),
            },
            Err(e) => envelope_value(&ErrorEnvelope::new(
                400,
                format!("malformed request frame: {}", e),
            )),
        };

        write_reply(&mut write_half, &reply).await?;
    }

    Ok(())
}

async fn write_reply<W: AsyncWriteExt + Unpin>(writer: &mut W, reply: &Value) -> std::io::Result<()> {
    writer.write_all(reply.to_string().as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
