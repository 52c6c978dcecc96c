use serde_json::json;

use crate::integration::{init_tracing, start_server};
use crate::utils::TestClient;

#[tokio::test]
async fn test_relay_to_unknown_peer() {
    init_tracing();

    let (addr, _service) = start_server().await;

    let mut client = TestClient::connect(addr)
        .await
        .expect("Failed to connect");

    client
        .send_json(json!({"type": "offer", "to": "nobody-home", "offer": {"sdp": "x"}}))
        .await
        .expect("Send failed");
    client.expect_silence().await.expect("Miss is not reported");

    // The connection is still fully usable
    client.join("r1").await.expect("Join failed");
    let roster = client.recv_roster().await.expect("No roster");
    assert_eq!(roster, vec![(client.peer_id.clone(), true)]);

    client.close().await.expect("Failed to close");
}

#[tokio::test]
async fn test_relay_to_departed_peer() {
    init_tracing();

    let (addr, _service) = start_server().await;

    let mut caller = TestClient::connect(addr)
        .await
        .expect("Failed to connect caller");
    let callee = TestClient::connect(addr)
        .await
        .expect("Failed to connect callee");
    let callee_id = callee.peer_id.clone();
    callee.close().await.expect("Failed to close callee");

    caller
        .send_json(json!({"type": "candidate", "to": callee_id, "candidate": {}}))
        .await
        .expect("Send failed");
    caller.expect_silence().await.expect("Miss is not reported");

    caller.close().await.expect("Failed to close caller");
}
