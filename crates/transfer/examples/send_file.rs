use std::path::Path;

use transfer::{endpoint::make_client, protocol::sender_descriptor, send_file, Payload};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = make_client()?;
    let payload = Payload::from_path(Path::new("test.txt")).await?;

    let response = send_file(
        &client,
        "127.0.0.1:8000".parse()?,
        payload,
        &sender_descriptor("demo"),
    )
    .await?;
    println!("{} {}", response.status.as_u16(), response.reason());
    Ok(())
}

// cargo run --example send_file -p transfer
