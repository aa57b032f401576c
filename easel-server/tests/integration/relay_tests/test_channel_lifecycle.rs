use bytes::Bytes;
use easel_server::{Channel, Frame};

use crate::integration::init_tracing;
use crate::utils::{
    FailurePoint, MOCK_OFFER, MockPeer, create_mock_negotiator, wait_for_members, wait_until,
};

async fn negotiate_peers(count: usize) -> (std::sync::Arc<easel_server::Negotiator>, Vec<MockPeer>) {
    let (negotiator, factory) = create_mock_negotiator(FailurePoint::None);
    for _ in 0..count {
        negotiator
            .negotiate(MOCK_OFFER.as_bytes())
            .await
            .expect("Negotiation failed");
    }
    let peers = factory.peers().await;
    (negotiator, peers)
}

#[tokio::test]
async fn test_message_is_relayed_to_other_peers_only() {
    init_tracing();

    let (negotiator, peers) = negotiate_peers(3).await;
    let mut channels = Vec::new();
    for peer in &peers {
        channels.push(peer.open_channel().await);
    }
    assert!(wait_for_members(negotiator.room(), 3, 2000).await);

    let stroke = Bytes::from_static(br#"{"prevX":0,"prevY":0,"currX":5,"currY":5,"color":"red"}"#);
    peers[0].send_from(&channels[0], stroke.clone()).await;

    assert!(wait_until(2000, || channels[1].received().len() == 1 && channels[2].received().len() == 1).await);
    assert_eq!(channels[1].received(), vec![stroke.clone()]);
    assert_eq!(channels[2].received(), vec![stroke]);
    assert!(channels[0].received().is_empty());
}

#[tokio::test]
async fn test_closed_channel_leaves_room() {
    init_tracing();

    let (negotiator, peers) = negotiate_peers(2).await;
    let first = peers[0].open_channel().await;
    let second = peers[1].open_channel().await;
    assert!(wait_for_members(negotiator.room(), 2, 2000).await);

    peers[1].close_channel(&second).await;
    assert!(wait_for_members(negotiator.room(), 1, 2000).await);
    assert!(negotiator.room().contains(&first.id()).await);
    assert!(!negotiator.room().contains(&second.id()).await);

    // The peer connection itself stays up until the transport goes away.
    assert!(!peers[1].transport.is_closed());
}

#[tokio::test]
async fn test_transport_failure_removes_its_channels() {
    init_tracing();

    let (negotiator, peers) = negotiate_peers(2).await;
    let survivor = peers[0].open_channel().await;
    peers[1].open_channel().await;
    peers[1].open_channel().await;
    assert!(wait_for_members(negotiator.room(), 3, 2000).await);

    peers[1].drop_connection().await;

    assert!(wait_for_members(negotiator.room(), 1, 2000).await);
    assert_eq!(negotiator.room().members().await, vec![survivor.id()]);
    assert!(wait_until(2000, || peers[1].transport.is_closed()).await);
    assert!(!peers[0].transport.is_closed());
}

#[tokio::test]
async fn test_messages_from_one_peer_keep_their_order() {
    init_tracing();

    let (negotiator, peers) = negotiate_peers(2).await;
    let sender = peers[0].open_channel().await;
    let receiver = peers[1].open_channel().await;
    assert!(wait_for_members(negotiator.room(), 2, 2000).await);

    for i in 0..20 {
        peers[0]
            .send_from(&sender, Bytes::from(format!("stroke {}", i)))
            .await;
    }

    assert!(wait_until(2000, || receiver.received().len() == 20).await);
    for (i, payload) in receiver.received().iter().enumerate() {
        assert_eq!(payload.as_ref(), format!("stroke {}", i).as_bytes());
    }
}

#[tokio::test]
async fn test_binary_frame_is_relayed_as_binary() {
    init_tracing();

    let (negotiator, peers) = negotiate_peers(2).await;
    let sender = peers[0].open_channel().await;
    let receiver = peers[1].open_channel().await;
    assert!(wait_for_members(negotiator.room(), 2, 2000).await);

    let frame = Frame::binary(Bytes::from_static(b"stroke as binary"));
    peers[0].send_frame(&sender, frame.clone()).await;
    peers[0].send_from(&sender, Bytes::from_static(b"stroke as text")).await;

    assert!(wait_until(2000, || receiver.received().len() == 2).await);
    let frames = receiver.received_frames();
    assert_eq!(frames[0], frame);
    assert!(frames[1].is_text);
}
