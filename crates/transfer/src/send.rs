use std::{io, net::SocketAddr, path::Path};

use reqwest::{
    header::{HeaderValue, CONTENT_LENGTH},
    Body, Client, StatusCode,
};
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt},
};
use tracing::info;

use crate::{
    error::TransferError,
    protocol::{self, HEADER_DEVICE, HEADER_FILENAME, HEADER_FILESIZE, STDIN_FILENAME},
};

enum Content {
    File(File),
    Bytes(Vec<u8>),
}

/// One file's worth of bytes plus the name it is announced under.
pub struct Payload {
    file_name: String,
    len: u64,
    content: Content,
}

impl Payload {
    /// Open `path` for streaming. The announced name is its base name.
    pub async fn from_path(path: &Path) -> Result<Self, TransferError> {
        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TransferError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(TransferError::FileNotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| STDIN_FILENAME.to_string());

        Ok(Self {
            file_name,
            len: metadata.len(),
            content: Content::File(file),
        })
    }

    /// Buffer all of standard input, announced as `download`.
    pub async fn from_stdin() -> Result<Self, TransferError> {
        Self::from_reader(tokio::io::stdin()).await
    }

    pub async fn from_reader<R>(mut reader: R) -> Result<Self, TransferError>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        Ok(Self::from_bytes(STDIN_FILENAME, data))
    }

    /// In-memory payload. `file_name` is sent as given.
    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            len: data.len() as u64,
            content: Content::Bytes(data),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn into_body(self) -> Body {
        match self.content {
            Content::File(file) => Body::from(file),
            Content::Bytes(data) => Body::from(data),
        }
    }
}

/// What the receiver answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareResponse {
    pub status: StatusCode,
}

impl ShareResponse {
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    pub fn is_saved(&self) -> bool {
        self.status == protocol::STATUS_SAVED
    }
}

/// Push `payload` to the transfer server at `target` in a single request.
pub async fn send_file(
    client: &Client,
    target: SocketAddr,
    payload: Payload,
    sender: &str,
) -> Result<ShareResponse, TransferError> {
    let url = format!("http://{}/", target);
    let file_name = protocol::encode_filename(payload.file_name());
    let len = payload.len();

    info!("Pushing {} ({} bytes) to {}", payload.file_name(), len, url);

    let response = client
        .post(&url)
        .header(CONTENT_LENGTH, len)
        .header(HEADER_FILENAME, header_value(&file_name, HEADER_FILENAME)?)
        .header(HEADER_FILESIZE, len)
        .header(HEADER_DEVICE, header_value(sender, HEADER_DEVICE)?)
        .body(payload.into_body())
        .send()
        .await?;

    let status = response.status();
    info!("{} answered {}", target, status);
    Ok(ShareResponse { status })
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, TransferError> {
    HeaderValue::from_str(value).map_err(|_| TransferError::InvalidHeader(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        match Payload::from_path(&missing).await {
            Err(TransferError::FileNotFound(path)) => assert_eq!(path, missing),
            other => panic!("unexpected {:?}", other.map(|p| p.len())),
        }
    }

    #[tokio::test]
    async fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Payload::from_path(dir.path()).await,
            Err(TransferError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn path_payload_uses_base_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let payload = Payload::from_path(&path).await.unwrap();
        assert_eq!(payload.file_name(), "photo.jpg");
        assert_eq!(payload.len(), 4096);
    }

    #[tokio::test]
    async fn reader_payload_is_buffered_as_download() {
        let payload = Payload::from_reader(&b"piped bytes"[..]).await.unwrap();
        assert_eq!(payload.file_name(), "download");
        assert_eq!(payload.len(), 11);
    }

    #[test]
    fn sender_with_newline_is_invalid_header() {
        assert!(matches!(
            header_value("bad\nname", HEADER_DEVICE),
            Err(TransferError::InvalidHeader("x-device"))
        ));
    }
}
