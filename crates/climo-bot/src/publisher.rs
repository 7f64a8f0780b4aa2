//! Where the briefing goes: a Discord channel, or stdout for dry runs.

use async_trait::async_trait;
use climo_common::{truncate_string, ClimoError, PostId, Result};
use climo_config::DiscordConfig;
use serenity::all::{ChannelId, CreateAttachment, CreateMessage};
use serenity::http::Http;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Longest message body Discord accepts.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Publishes a text post with an optional image attachment.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Posts `text`, attaching the image at `image` when given.
    async fn publish(&self, text: &str, image: Option<&Path>) -> Result<PostId>;
}

/// Posts to one Discord channel over the REST API.
pub struct DiscordPublisher {
    http: Arc<Http>,
    channel: ChannelId,
}

impl std::fmt::Debug for DiscordPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordPublisher")
            .field("http", &"<serenity::Http>")
            .field("channel", &self.channel)
            .finish()
    }
}

impl DiscordPublisher {
    /// Verifies the token by fetching the bot's own user; an invalid token
    /// fails here, before any data is fetched.
    #[instrument(skip(config), fields(channel = config.channel_id))]
    pub async fn connect(config: &DiscordConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ClimoError::Authentication {
                message: "Discord token is empty".to_string(),
                source: None,
            });
        }
        if config.channel_id == 0 {
            return Err(ClimoError::config_field(
                "Discord channel id must be non-zero",
                "discord.channel_id",
            ));
        }

        let http = Arc::new(Http::new(config.token.trim()));
        let user = http
            .get_current_user()
            .await
            .map_err(|e| ClimoError::auth_with_source("Discord rejected the bot token", e))?;
        info!("Authenticated with Discord as {}", user.name);

        Ok(Self {
            http,
            channel: ChannelId::new(config.channel_id),
        })
    }
}

#[async_trait]
impl Publisher for DiscordPublisher {
    #[instrument(skip(self, text), fields(channel = %self.channel, chars = text.chars().count()))]
    async fn publish(&self, text: &str, image: Option<&Path>) -> Result<PostId> {
        let mut message = CreateMessage::new().content(truncate_string(text, DISCORD_MESSAGE_LIMIT));
        if let Some(path) = image {
            let attachment = CreateAttachment::path(path).await.map_err(|e| {
                ClimoError::publication_with_source(
                    format!("cannot attach {}", path.display()),
                    e,
                )
            })?;
            debug!("Attaching {}", path.display());
            message = message.add_file(attachment);
        }

        let posted = self
            .channel
            .send_message(&self.http, message)
            .await
            .map_err(|e| ClimoError::publication_with_source("Discord rejected the post", e))?;

        info!("Posted message {}", posted.id);
        Ok(PostId(posted.id.to_string()))
    }
}

/// Dry-run publisher writing the post to a stream.
pub struct ConsolePublisher {
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsolePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePublisher").finish_non_exhaustive()
    }
}

impl ConsolePublisher {
    /// Identifier returned for every dry-run post.
    pub const DRY_RUN_ID: &'static str = "dry-run";

    /// Publisher writing to stdout.
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Publisher writing to `out`.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }
}

#[async_trait]
impl Publisher for ConsolePublisher {
    async fn publish(&self, text: &str, image: Option<&Path>) -> Result<PostId> {
        let mut out = self.out.lock().await;
        writeln!(out, "{text}")?;
        if let Some(path) = image {
            writeln!(out, "[image: {}]", path.display())?;
        }
        out.flush()?;
        Ok(PostId(Self::DRY_RUN_ID.to_string()))
    }
}
