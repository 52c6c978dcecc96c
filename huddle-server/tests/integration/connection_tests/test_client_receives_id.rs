use huddle_core::PeerId;

use crate::integration::{init_tracing, start_server};
use crate::utils::TestClient;

#[tokio::test]
async fn test_client_receives_id() {
    init_tracing();

    let (addr, service) = start_server().await;

    let mut client1 = TestClient::connect(addr)
        .await
        .expect("Failed to connect client 1");
    let client2 = TestClient::connect(addr)
        .await
        .expect("Failed to connect client 2");

    assert!(!client1.peer_id.is_empty());
    assert_ne!(client1.peer_id, client2.peer_id, "Ids must be unique");

    let registered = service
        .registry()
        .lookup(&PeerId::from(client1.peer_id.as_str()))
        .expect("Client 1 should be registered");
    assert!(registered.mic_on, "Mic defaults to on");
    assert_eq!(registered.room, None);

    // The greeting is sent exactly once
    client1.expect_silence().await.expect("Only one id message");

    client1.close().await.expect("Failed to close client 1");
    client2.close().await.expect("Failed to close client 2");
}
