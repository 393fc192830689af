use anyhow::Result;
use aquadesk::relay::{RelayConfig, TextRelay, VoiceRelay};
use aquadesk::ui::{AppState, AquadeskApp};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aquadesk=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Pick up GEMINI_API_KEY from a local .env if present
    let _ = dotenvy::dotenv();

    info!("Starting Aquadesk console");

    let mut state = AppState::new();

    // Without a credential the console still runs; the assistant degrades
    // to an inline notice instead of refusing to start.
    match RelayConfig::from_env() {
        Ok(config) => {
            let text_relay = TextRelay::new(config.clone());
            let chat_tx = text_relay.command_sender();
            let chat_rx = text_relay.event_receiver();
            text_relay.start_worker().map_err(|e| anyhow::anyhow!(e))?;
            state.attach_chat(chat_tx, chat_rx);

            let voice_relay = VoiceRelay::new(config);
            let voice_tx = voice_relay.command_sender();
            let voice_rx = voice_relay.event_receiver();
            voice_relay.start_worker().map_err(|e| anyhow::anyhow!(e))?;
            state.attach_voice(voice_tx, voice_rx);
        }
        Err(e) => {
            warn!("AI relays disabled: {}", e);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Aquaculture Admin"),
        ..Default::default()
    };

    eframe::run_native(
        "Aquaculture Admin",
        options,
        Box::new(move |cc| Ok(Box::new(AquadeskApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
