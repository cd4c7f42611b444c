use anyhow::Result;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves a single HTTP response with the given status line and body, then stops.
/// Returns the base URL of the server.
pub async fn serve_once(status: &str, body: Vec<u8>) -> Result<Url> {
    let content_length = body.len();
    serve(status, content_length, body).await
}

/// Like [`serve_once`], but announces `content_length` bytes and closes the
/// connection after sending the shorter `body`.
pub async fn serve_truncated(content_length: usize, body: Vec<u8>) -> Result<Url> {
    serve("200 OK", content_length, body).await
}

async fn serve(status: &str, content_length: usize, body: Vec<u8>) -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let status = status.to_string();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // Read until the end of the request headers
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let header = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
        );
        let _ = socket.write_all(header.as_bytes()).await;
        let _ = socket.write_all(&body).await;
        let _ = socket.shutdown().await;
    });

    Ok(Url::parse(&format!("http://{addr}/"))?)
}

/// A URL pointing at a local port nothing is listening on.
pub async fn refused_url() -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{addr}/"))?)
}
