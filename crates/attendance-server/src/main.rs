use anyhow::Result;
use clap::Parser;
use infrastructure::{MqttClient, ServerConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use attendance_server::state::AppState;
use attendance_server::{api, build_service, rfid_bridge};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// HTTP port, overrides http.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,attendance_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv::dotenv().ok();
    let args = Args::parse();
    info!("🕒 Attendance Server Starting...");

    let mut config = ServerConfig::load(&args.config_dir)?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // 1. Storage + service
    let service = build_service(&config.database).await?;
    let mut state = AppState::new(service.clone());

    // 2. RFID readers over MQTT (optional)
    if let Some(mqtt) = &config.mqtt {
        info!(host = %mqtt.host, port = %mqtt.port, client_id = %mqtt.client_id, "Connecting to MQTT...");
        let client = MqttClient::new(&mqtt.host, mqtt.port, &mqtt.client_id).await?;
        let messages = client
            .take_messages()
            .ok_or_else(|| anyhow::anyhow!("MQTT message queue already taken"))?;
        client.subscribe(&mqtt.topic).await?;
        info!(topic = %mqtt.topic, "✅ MQTT Subscribed");

        tokio::spawn(rfid_bridge::run(service, client.clone(), messages));
        state = state.with_mqtt(client);
    }

    // 3. HTTP API
    let app = api::create_router(Arc::new(state));
    let addr = format!("{}:{}", config.http.host, config.http.port);
    info!("🚀 API Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
