use anyhow::Context;

/// Process-wide configuration, read once at startup. The bot token is the
/// only optional piece: without it the ingestion pipeline stays off while
/// the HTTP surface runs normally.
pub struct Config {
    pub store_url: String,
    pub store_key: String,
    pub bot_token: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_url =
            std::env::var("ROADWATCH_STORE_URL").context("ROADWATCH_STORE_URL is required")?;
        let store_key =
            std::env::var("ROADWATCH_STORE_KEY").context("ROADWATCH_STORE_KEY is required")?;
        let bot_token = std::env::var("ROADWATCH_BOT_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        let host = std::env::var("ROADWATCH_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("ROADWATCH_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("ROADWATCH_PORT must be a port number")?;

        Ok(Self {
            store_url,
            store_key,
            bot_token,
            host,
            port,
        })
    }
}
