use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::integration::{init_tracing, start_server};

#[tokio::test]
async fn test_health_endpoint() {
    init_tracing();

    let (addr, _service) = start_server().await;

    let mut stream = TcpStream::connect(addr).await.expect("Failed to connect");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("Failed to write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("Failed to read response");

    assert!(response.starts_with("HTTP/1.1 200"), "Got: {}", response);
    assert!(response.ends_with("OK"), "Got: {}", response);
}
