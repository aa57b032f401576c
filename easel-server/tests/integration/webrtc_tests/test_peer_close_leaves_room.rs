use crate::integration::init_tracing;
use crate::utils::{TestClient, connect_client, create_rtc_negotiator, wait_for_members};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_peer_close_leaves_room() {
    init_tracing();

    let negotiator = create_rtc_negotiator();

    let staying = TestClient::new().await.expect("Failed to create client 1");
    let leaving = TestClient::new().await.expect("Failed to create client 2");

    connect_client(&staying, &negotiator)
        .await
        .expect("Client 1 failed to connect");
    connect_client(&leaving, &negotiator)
        .await
        .expect("Client 2 failed to connect");
    assert!(wait_for_members(negotiator.room(), 2, 5000).await);

    leaving.close().await.expect("Failed to close client 2");

    assert!(
        wait_for_members(negotiator.room(), 1, 35000).await,
        "closed peer should leave the room"
    );

    // The remaining peer can still draw; nobody is left to receive it.
    staying.send_text("{}").await.expect("Send failed");

    staying.close().await.expect("Failed to close client 1");
}
