pub mod bot;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod metrics;
pub mod subtitle;
pub mod telegram;
pub mod testing;

pub use bot::{run_polling, Bot, ChatEvent, RouteAction, RoutingTable};
pub use command::{DownloadRef, DownloadRefError, DOWNLOAD_COMMAND_PREFIX};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, LimitsConfig, SanitizedConfig, ServerConfig, SubtitleApiConfig, TelegramConfig,
    MAX_INLINE_RESULTS, MAX_TEXT_RESULTS,
};
pub use dispatch::{classify, parse_bulk_items, DispatchError, Query, QueryDispatcher};
pub use format::{
    Document, InlineArticle, Reply, ResponseFormatter, NO_RESULTS_MESSAGE, WELCOME_MESSAGE,
};
pub use subtitle::{
    BetterCopeClient, BulkItem, SubtitleApi, SubtitleError, SubtitleRecord,
};
pub use telegram::{ChatApi, TelegramClient, TelegramError, Update};
