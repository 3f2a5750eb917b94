use std::net::SocketAddr;

use eyre::Result;
use futures::StreamExt;
use gymbook_db::Stores;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

use crate::session::Session;

/// Longest line accepted from a client, in bytes. A client that exceeds it
/// is told so and disconnected.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Accepts connections forever, serving each on its own task.
pub async fn serve(listener: TcpListener, stores: Stores) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let stores = stores.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, peer, stores).await {
                error!("Error serving {}: {:?}", peer, err);
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, stores: Stores) -> Result<()> {
    info!("New connection from {}", peer);

    let (reader, mut writer) = stream.into_split();
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let mut session = Session::new();

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                warn!("Dropping {}: line longer than {} bytes", peer, MAX_LINE_LENGTH);
                writer.write_all(b"ERROR: Line too long\n").await?;
                break;
            }
            Err(LinesCodecError::Io(err)) => return Err(err.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received from {}: {}", peer, line);

        let mut reply = session.process(&stores, &line).await;
        reply.push('\n');
        writer.write_all(reply.as_bytes()).await?;
    }

    info!("Connection closed for {}", peer);
    Ok(())
}
