use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::telegram::TelegramError;

use super::Bot;

impl Bot {
    /// One getUpdates round trip. Updates are handled one after another, in
    /// order. Returns the offset for the next call.
    pub async fn poll_once(
        &self,
        offset: Option<i64>,
        timeout_secs: u32,
    ) -> Result<Option<i64>, TelegramError> {
        let updates = self.chat().get_updates(offset, timeout_secs).await?;

        let mut next = offset;
        for update in &updates {
            next = Some(update.update_id + 1);
            self.handle_update(update).await;
        }
        Ok(next)
    }
}

/// Long-poll until `shutdown` turns true. A failed poll is logged and retried
/// after `error_backoff`.
pub async fn run_polling(
    bot: &Bot,
    timeout_secs: u32,
    error_backoff: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Polling for updates");
    let mut offset = None;

    while !*shutdown.borrow() {
        let result = tokio::select! {
            _ = shutdown.changed() => break,
            result = bot.poll_once(offset, timeout_secs) => result,
        };

        match result {
            Ok(next) if next == offset => tokio::task::yield_now().await,
            Ok(next) => offset = next,
            Err(e) => {
                warn!(error = %e, "Polling failed, retrying in {:?}", error_backoff);
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(error_backoff) => {}
                }
            }
        }
    }

    info!("Polling stopped");
}
