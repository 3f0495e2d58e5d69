use infrastructure::MqttClient;

#[tokio::test]
async fn test_message_queue_has_single_consumer() {
    // Nothing listens on this port; the event loop just keeps retrying.
    let client = MqttClient::new("127.0.0.1", 1, "attendance-test")
        .await
        .unwrap();

    let rx = client.take_messages();
    assert!(rx.is_some());
    assert!(client.take_messages().is_none());
    assert!(client.clone().take_messages().is_none());
    assert!(!client.is_connected());
}
