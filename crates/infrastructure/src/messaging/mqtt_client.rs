use anyhow::{Result, anyhow};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio::task;
use tracing::{error, info, warn};

#[derive(Clone, Debug)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub pkid: u16,
}

/// Subscriber side of the RFID reader link
///
/// Incoming publishes are queued on a bounded channel that exists from
/// construction on, so nothing delivered before the consumer attaches is
/// lost. A full queue stops polling the broker instead of dropping
/// messages. Acks are manual: the consumer acks once a reading is settled,
/// anything unacked is redelivered by the broker.
#[derive(Clone)]
pub struct MqttClient {
    client: AsyncClient,
    rx: Arc<Mutex<Option<mpsc::Receiver<MqttMessage>>>>,
    connected: Arc<AtomicBool>,
    subscriptions: Arc<RwLock<Vec<String>>>,
}

impl MqttClient {
    pub async fn new(host: &str, port: u16, client_id: &str) -> Result<Self> {
        let mut mqttoptions = MqttOptions::new(client_id, host, port);
        mqttoptions.set_keep_alive(Duration::from_secs(20));
        mqttoptions.set_clean_session(false);
        mqttoptions.set_manual_acks(true);

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, 100);
        let (tx, rx) = mpsc::channel(250);
        let connected = Arc::new(AtomicBool::new(false));
        let connected_clone = connected.clone();

        let subscriptions = Arc::new(RwLock::new(Vec::<String>::new()));
        let subscriptions_clone = subscriptions.clone();
        let client_clone = client.clone();

        task::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let msg = MqttMessage {
                            topic: publish.topic,
                            payload: publish.payload.to_vec(),
                            pkid: publish.pkid,
                        };
                        if let Err(mpsc::error::SendError(dropped)) = tx.send(msg).await {
                            warn!(topic = %dropped.topic, "MQTT consumer gone, message left unacked");
                        }
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("MQTT Connected");
                        connected_clone.store(true, Ordering::Relaxed);

                        let subs = subscriptions_clone.read().await.clone();
                        if !subs.is_empty() {
                            info!("Re-subscribing to {} topics...", subs.len());
                            for topic in subs {
                                if let Err(e) =
                                    client_clone.subscribe(&topic, QoS::AtLeastOnce).await
                                {
                                    error!("Failed to re-subscribe to {}: {}", topic, e);
                                }
                            }
                        }
                    }
                    Ok(Event::Outgoing(rumqttc::Outgoing::Disconnect)) => {
                        connected_clone.store(false, Ordering::Relaxed);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("MQTT Connection error: {:?}", e);
                        connected_clone.store(false, Ordering::Relaxed);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self {
            client,
            rx: Arc::new(Mutex::new(Some(rx))),
            connected,
            subscriptions,
        })
    }

    /// The incoming message queue. There is a single consumer: only the
    /// first call returns it.
    pub fn take_messages(&self) -> Option<mpsc::Receiver<MqttMessage>> {
        self.rx.lock().ok()?.take()
    }

    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        {
            let mut subs = self.subscriptions.write().await;
            if !subs.iter().any(|t| t == topic) {
                subs.push(topic.to_string());
            }
        }

        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| anyhow!("Failed to subscribe to topic {}: {}", topic, e))?;
        Ok(())
    }

    pub async fn ack(&self, msg: &MqttMessage) -> Result<()> {
        let publish = rumqttc::Publish {
            pkid: msg.pkid,
            topic: msg.topic.clone(),
            qos: QoS::AtLeastOnce,
            payload: bytes::Bytes::new(),
            retain: false,
            dup: false,
        };

        self.client
            .ack(&publish)
            .await
            .map_err(|e| anyhow!("Failed to ack packet {}: {}", msg.pkid, e))
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}
