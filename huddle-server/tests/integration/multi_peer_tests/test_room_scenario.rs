use serde_json::json;

use crate::integration::{init_tracing, start_server};
use crate::utils::TestClient;

#[tokio::test]
async fn test_room_scenario() {
    init_tracing();

    let (addr, _service) = start_server().await;

    let mut client_a = TestClient::connect(addr)
        .await
        .expect("Failed to connect A");
    let a = client_a.peer_id.clone();

    client_a.join("r1").await.expect("A join failed");
    assert_eq!(
        client_a.recv_roster().await.expect("A: no roster"),
        vec![(a.clone(), true)]
    );

    let mut client_b = TestClient::connect(addr)
        .await
        .expect("Failed to connect B");
    let b = client_b.peer_id.clone();

    client_b.join("r1").await.expect("B join failed");
    let both = vec![(a.clone(), true), (b.clone(), true)];
    assert_eq!(client_a.recv_roster().await.expect("A: no roster"), both);
    assert_eq!(client_b.recv_roster().await.expect("B: no roster"), both);

    client_a
        .send_json(json!({"type": "mic", "micOn": false}))
        .await
        .expect("Mic toggle failed");
    let muted = vec![(a.clone(), false), (b.clone(), true)];
    assert_eq!(client_a.recv_roster().await.expect("A: no roster"), muted);
    assert_eq!(client_b.recv_roster().await.expect("B: no roster"), muted);

    drop(client_b);

    assert_eq!(
        client_a.recv_roster().await.expect("A: no roster after B left"),
        vec![(a.clone(), false)]
    );

    client_a.close().await.expect("Failed to close A");
}

#[tokio::test]
async fn test_explicit_leave() {
    init_tracing();

    let (addr, service) = start_server().await;

    let mut client1 = TestClient::connect(addr)
        .await
        .expect("Failed to connect client 1");
    let mut client2 = TestClient::connect(addr)
        .await
        .expect("Failed to connect client 2");

    client1.join("r1").await.expect("Join failed");
    client1.recv_roster().await.expect("No roster");
    client2.join("r1").await.expect("Join failed");
    client1.recv_roster().await.expect("No roster");
    client2.recv_roster().await.expect("No roster");

    client2
        .send_json(json!({"type": "leave", "room": "r1"}))
        .await
        .expect("Leave failed");

    assert_eq!(
        client1.recv_roster().await.expect("No roster after leave"),
        vec![(client1.peer_id.clone(), true)]
    );
    client2.expect_silence().await.expect("Leaver is not in the room anymore");

    // Leaving keeps the connection registered and able to relay
    let peer2 = huddle_core::PeerId::from(client2.peer_id.as_str());
    assert!(service.registry().lookup(&peer2).is_some());

    client2
        .send_json(json!({"type": "offer", "to": client1.peer_id, "offer": "sdp"}))
        .await
        .expect("Send failed");
    let offer = client1.recv().await.expect("No offer");
    assert_eq!(offer["offer"], "sdp");

    client1.close().await.expect("Failed to close client 1");
    client2.close().await.expect("Failed to close client 2");
}
