use easel_core::DrawLine;
use easel_server::Frame;

use crate::integration::init_tracing;
use crate::utils::{TestClient, connect_client, create_rtc_negotiator, wait_for_members};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_peers_exchange_strokes() {
    init_tracing();

    let negotiator = create_rtc_negotiator();

    let alice = TestClient::new().await.expect("Failed to create client 1");
    let bob = TestClient::new().await.expect("Failed to create client 2");

    connect_client(&alice, &negotiator)
        .await
        .expect("Client 1 failed to connect");
    connect_client(&bob, &negotiator)
        .await
        .expect("Client 2 failed to connect");

    assert!(
        wait_for_members(negotiator.room(), 2, 5000).await,
        "both channels should be in the room"
    );

    let line = DrawLine {
        prev_x: 100,
        prev_y: 120,
        curr_x: 104,
        curr_y: 126,
        color: "#222222".to_owned(),
    };
    let text = serde_json::to_string(&line).unwrap();

    alice.send_text(&text).await.expect("Send failed");

    assert!(bob.wait_for_messages(1, 5000).await, "Peer 2 got nothing");
    let received = bob.received_messages().await;
    assert_eq!(received[0].as_ref(), text.as_bytes());

    let decoded: DrawLine = serde_json::from_slice(&received[0]).unwrap();
    assert_eq!(decoded, line);

    // Sender exclusion: alice never hears her own stroke.
    assert!(!alice.wait_for_messages(1, 300).await);

    bob.send_text(&text).await.expect("Send failed");
    assert!(alice.wait_for_messages(1, 5000).await, "Peer 1 got nothing");

    alice.close().await.expect("Failed to close client 1");
    bob.close().await.expect("Failed to close client 2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_frame_kind_survives_the_relay() {
    init_tracing();

    let negotiator = create_rtc_negotiator();

    let alice = TestClient::new().await.expect("Failed to create client 1");
    let bob = TestClient::new().await.expect("Failed to create client 2");
    connect_client(&alice, &negotiator)
        .await
        .expect("Client 1 failed to connect");
    connect_client(&bob, &negotiator)
        .await
        .expect("Client 2 failed to connect");
    assert!(wait_for_members(negotiator.room(), 2, 5000).await);

    // Valid UTF-8 sent as binary, then the same bytes as text.
    alice.send_binary(b"{\"color\":\"red\"}").await.expect("Send failed");
    alice.send_text("{\"color\":\"red\"}").await.expect("Send failed");

    assert!(bob.wait_for_messages(2, 5000).await, "Peer 2 got nothing");
    let frames = bob.received_frames().await;
    assert_eq!(frames[0], Frame::binary(&b"{\"color\":\"red\"}"[..]));
    assert_eq!(frames[1], Frame::text(&b"{\"color\":\"red\"}"[..]));

    alice.close().await.expect("Failed to close client 1");
    bob.close().await.expect("Failed to close client 2");
}
