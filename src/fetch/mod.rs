use std::time::Duration;

use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

/// How long a single download of the hours page may take before it is abandoned.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[instrument(skip_all, fields(url = %url), level = Level::TRACE)]
pub async fn hours_page(client: &Client, url: &Url) -> Result<String, RequestError> {
    let start = std::time::Instant::now();
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let text = response.text().await?;
    log::trace!("Got text of hours page in \t {:?}", start.elapsed());
    Ok(text)
}

pub fn make_client() -> Result<Client, RequestError> {
    Client::builder()
        .gzip(true)
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// Serves each `(status, body)` pair to one connection, in order, and returns the url to fetch.
#[cfg(test)]
pub async fn serve_pages(pages: Vec<(&'static str, String)>) -> Url {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for (status, body) in pages {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        }
    });
    format!("http://{addr}/forms/dining/menus-hours/").parse().unwrap()
}
