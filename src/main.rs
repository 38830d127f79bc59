use agrivoice::capability::{GeminiBackend, LogNavigator, NullPlayback, UnsupportedCapture};
use agrivoice::{AssistantConfig, Author, ConversationSession, Locale};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Headless demo shell: typed turns from stdin through the real session.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrivoice=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AssistantConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(locale = %config.default_locale, model = %config.model, "starting assistant");

    let backend = GeminiBackend::from_env()
        .context("GEMINI_API_KEY is required")?
        .with_model(config.model.clone());

    let session = ConversationSession::new(
        Arc::new(UnsupportedCapture),
        Arc::new(NullPlayback),
        Arc::new(backend),
        Arc::new(LogNavigator),
    );

    let mut locale = config.default_locale;
    println!("farm assistant ready ({locale}). /lang <locale>, /clear, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                session.clear();
                println!("(history cleared)");
                continue;
            }
            _ if line.starts_with("/lang") => {
                match line.trim_start_matches("/lang").trim().parse::<Locale>() {
                    Ok(next) => {
                        locale = next;
                        println!("(locale set to {locale})");
                    }
                    Err(err) => println!("({err})"),
                }
                continue;
            }
            _ => {}
        }

        match session.submit_text(line, locale).await {
            Ok(_) => {
                if let Some(reply) = session
                    .history()
                    .iter()
                    .rev()
                    .find(|msg| msg.author == Author::Assistant)
                {
                    println!("assistant> {}", reply.text);
                }
            }
            Err(err) => println!("({err})"),
        }
    }

    info!("assistant stopped");
    Ok(())
}
