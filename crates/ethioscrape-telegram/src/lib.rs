//! [`MessageSource`] backed by a Telegram user session (MTProto).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use ethioscrape_core::source::channel_username;
use ethioscrape_core::{FetchedMessage, MessageSource, SourceError, TelegramConfig};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::{PackedType, Session};
use tracing::{debug, info};

/// RPC error names that mean the channel exists but this account cannot read it.
const ACCESS_ERRORS: &[&str] = &[
    "CHANNEL_PRIVATE",
    "CHANNEL_PUBLIC_GROUP_NA",
    "CHAT_FORBIDDEN",
    "CHAT_ADMIN_REQUIRED",
    "USER_BANNED_IN_CHANNEL",
];

/// RPC error names that mean the identifier does not name a reachable chat.
const LOOKUP_ERRORS: &[&str] = &[
    "USERNAME_NOT_OCCUPIED",
    "USERNAME_INVALID",
    "CHANNEL_INVALID",
    "PEER_ID_INVALID",
];

const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

pub struct TelegramSource {
    client: Client,
    session_file: PathBuf,
}

impl TelegramSource {
    /// Opens the session stored in `config.session_file`, signing in
    /// interactively when it is not yet authorized.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, SourceError> {
        let session = Session::load_file_or_create(&config.session_file)
            .map_err(|err| session_error("failed to load session file", err))?;

        let client = Client::connect(Config {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: InitParams {
                catch_up: false,
                ..Default::default()
            },
        })
        .await
        .map_err(|err| session_error("failed to connect", err))?;
        info!("Client connected");

        let source = Self {
            client,
            session_file: config.session_file.clone(),
        };

        let authorized = source
            .client
            .is_authorized()
            .await
            .map_err(|err| session_error("authorization check failed", err))?;
        if !authorized {
            source.sign_in(config.phone.as_deref()).await?;
        }

        Ok(source)
    }

    async fn sign_in(&self, phone: Option<&str>) -> Result<(), SourceError> {
        let phone = match phone {
            Some(phone) => phone.to_string(),
            None => prompt("Enter your phone number (international format): ")?,
        };

        let token = self
            .client
            .request_login_code(&phone)
            .await
            .map_err(|err| session_error("failed to request login code", err))?;
        let code = prompt("Enter the code you received: ")?;

        match self.client.sign_in(&token, &code).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token.hint().unwrap_or("none").to_string();
                let password = prompt(&format!("Enter the password (hint: {hint}): "))?;
                self.client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(|err| session_error("password check failed", err))?;
            }
            Err(err) => return Err(session_error("sign in failed", err)),
        }
        info!("Signed in");

        self.save_session()
    }

    fn save_session(&self) -> Result<(), SourceError> {
        self.client
            .session()
            .save_to_file(&self.session_file)
            .map_err(|err| session_error("failed to save session file", err))
    }
}

#[async_trait]
impl MessageSource for TelegramSource {
    async fn fetch_recent(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, SourceError> {
        let username = channel_username(channel);
        let chat = self
            .client
            .resolve_username(username)
            .await
            .map_err(|err| classify_rpc_error(channel, &err.to_string()))?
            .ok_or_else(|| SourceError::ChannelNotFound(channel.to_string()))?;
        debug!(channel, chat_id = chat.id(), "Resolved channel");

        let mut messages = self.client.iter_messages(chat.pack()).limit(limit);
        let mut fetched = Vec::with_capacity(limit);
        while let Some(message) = messages
            .next()
            .await
            .map_err(|err| classify_rpc_error(channel, &err.to_string()))?
        {
            fetched.push(FetchedMessage {
                date: message.date(),
                sender_id: message.sender().map(|sender| {
                    let packed = sender.pack();
                    marked_id(packed.ty, packed.id)
                }),
                text: message.text().to_string(),
            });
        }

        Ok(fetched)
    }

    async fn close(&self) -> Result<(), SourceError> {
        self.save_session()
    }
}

/// Maps a client error onto the collector's taxonomy by its RPC error name.
pub fn classify_rpc_error(channel: &str, message: &str) -> SourceError {
    if LOOKUP_ERRORS.iter().any(|name| message.contains(name)) {
        SourceError::ChannelNotFound(channel.to_string())
    } else if ACCESS_ERRORS.iter().any(|name| message.contains(name)) {
        SourceError::AccessDenied {
            channel: channel.to_string(),
            reason: message.to_string(),
        }
    } else {
        SourceError::Request {
            channel: channel.to_string(),
            reason: message.to_string(),
        }
    }
}

/// Bot API style peer id: users as is, basic groups negated, channels and
/// supergroups as `-100<id>`.
pub fn marked_id(ty: PackedType, id: i64) -> i64 {
    match ty {
        PackedType::User | PackedType::Bot => id,
        PackedType::Chat => -id,
        PackedType::Megagroup | PackedType::Broadcast | PackedType::Gigagroup => {
            -(CHANNEL_ID_OFFSET + id)
        }
    }
}

fn session_error(context: &str, err: impl std::fmt::Display) -> SourceError {
    SourceError::Session(format!("{context}: {err}"))
}

fn prompt(message: &str) -> Result<String, SourceError> {
    let read = || -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    };
    read().map_err(|err| session_error("failed to read from stdin", err))
}
