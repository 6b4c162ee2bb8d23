//! # Banner Grabbing
//!
//! One fresh connection per open port, a nudge for plain-HTTP ports, a
//! single bounded read. Encrypted ports get a passive read only; driving a
//! TLS handshake just to see a certificate is out of scope here.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const HTTP_PROBE: &[u8] = b"GET / HTTP/1.0\r\n\r\n";
const MAX_BANNER_BYTES: usize = 1024;

/// Reads up to 1 KiB of greeting text from `addr:port`.
///
/// Ports 80 and 8080 get a minimal `GET /` first, since web servers say
/// nothing unprompted. Any failure yields an empty banner; nothing
/// propagates to the caller.
pub async fn grab_banner(
    addr: Ipv4Addr,
    port: u16,
    connect_budget: Duration,
    read_budget: Duration,
) -> String {
    read_banner(addr, port, connect_budget, read_budget)
        .await
        .unwrap_or_default()
}

async fn read_banner(
    addr: Ipv4Addr,
    port: u16,
    connect_budget: Duration,
    read_budget: Duration,
) -> io::Result<String> {
    let target = SocketAddr::from((addr, port));
    let mut stream = timeout(connect_budget, TcpStream::connect(target))
        .await
        .map_err(|_| io::Error::from(io::ErrorKind::TimedOut))??;

    if matches!(port, 80 | 8080) {
        stream.write_all(HTTP_PROBE).await?;
    }

    let mut buf = [0u8; MAX_BANNER_BYTES];
    let read = timeout(read_budget, stream.read(&mut buf))
        .await
        .map_err(|_| io::Error::from(io::ErrorKind::TimedOut))??;

    if read == 0 {
        return Ok(String::new());
    }
    Ok(normalize(&String::from_utf8_lossy(&buf[..read])))
}

/// Trims surrounding whitespace and folds CRLF line endings to LF.
fn normalize(raw: &str) -> String {
    raw.trim().replace("\r\n", "\n")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
