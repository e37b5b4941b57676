pub mod collector;
pub mod config;
pub mod source;
pub mod table;

pub use collector::{
    ChannelOutcome, ChannelResult, CollectionReport, Collector, CollectorConfig, CollectorError,
    MessageRecord,
};
pub use config::{AppConfig, ConfigError, TelegramConfig};
pub use source::{FetchedMessage, MessageSource, SourceError};
pub use table::{StageReport, TableError};
