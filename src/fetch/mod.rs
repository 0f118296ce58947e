//! Download of the raw passenger feed.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Published daily passenger traffic statistics (CSV).
pub const DEFAULT_SOURCE_URL: &str = "https://www.immd.gov.hk/opendata/eng/transport/immigration_clearance/statistics_on_daily_passenger_traffic.csv";

/// GETs `url` and returns the body. Non-2xx responses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads the raw feed to `dest`, creating parent directories as needed.
/// Returns the number of bytes written.
#[tracing::instrument(skip(client, dest), fields(dest = %dest.display()))]
pub async fn download_raw_feed<C: HttpClient>(client: &C, url: &str, dest: &Path) -> Result<usize> {
    let bytes = fetch_bytes(client, url)
        .await
        .with_context(|| format!("downloading {url}"))?;

    let written = store_raw_feed(dest, &bytes)?;
    info!(bytes = written, "Raw feed downloaded");
    Ok(written)
}

/// Writes a downloaded body to `dest`, creating parent directories as needed.
pub fn store_raw_feed(dest: &Path, bytes: &[u8]) -> Result<usize> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(dest, bytes).with_context(|| format!("writing {}", dest.display()))?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join("hk_passenger_tracker_fetch_test").join(name)
    }

    /// Serves one canned HTTP response on a local port and returns its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/feed.csv")
    }

    #[test]
    fn test_store_raw_feed_creates_parent_dirs() {
        let dest = temp_path("nested/raw.csv");
        let _ = fs::remove_file(&dest);

        assert_eq!(store_raw_feed(&dest, b"Date,Control Point\n").unwrap(), 19);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "Date,Control Point\n");

        fs::remove_file(&dest).unwrap();
    }

    #[tokio::test]
    async fn test_download_raw_feed_writes_body() {
        let url = serve_once("200 OK", "Date,Control Point\n").await;
        let dest = temp_path("ok.csv");
        let _ = fs::remove_file(&dest);

        let client = BasicClient::new().unwrap();
        let written = download_raw_feed(&client, &url, &dest).await.unwrap();

        assert_eq!(written, 19);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "Date,Control Point\n");
        fs::remove_file(&dest).unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_an_error_and_writes_nothing() {
        let url = serve_once("404 Not Found", "missing").await;
        let dest = temp_path("not_found.csv");
        let _ = fs::remove_file(&dest);

        let client = BasicClient::new().unwrap();
        let err = download_raw_feed(&client, &url, &dest).await.unwrap_err();

        let status = err
            .chain()
            .find_map(|e| e.downcast_ref::<reqwest::Error>())
            .and_then(reqwest::Error::status);
        assert_eq!(status, Some(reqwest::StatusCode::NOT_FOUND));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let client = BasicClient::new().unwrap();
        assert!(fetch_bytes(&client, "not a url").await.is_err());
    }
}
