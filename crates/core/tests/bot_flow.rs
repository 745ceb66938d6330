//! End-to-end routing through `Bot` with mocked API and chat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use copelk_core::testing::{fixtures, MockChat, MockSubtitleApi, SentItem};
use copelk_core::{
    run_polling, Bot, Document, QueryDispatcher, ResponseFormatter, RoutingTable, SubtitleError,
    NO_RESULTS_MESSAGE, WELCOME_MESSAGE,
};

const HOST: &str = "bettercopelk.navinda.xyz";

struct Harness {
    bot: Arc<Bot>,
    api: Arc<MockSubtitleApi>,
    chat: Arc<MockChat>,
}

fn harness() -> Harness {
    let api = Arc::new(MockSubtitleApi::new());
    let chat = Arc::new(MockChat::new());
    let dispatcher = QueryDispatcher::new(api.clone(), ResponseFormatter::default(), HOST);
    let bot = Arc::new(Bot::new(RoutingTable::standard(), dispatcher, chat.clone()));
    Harness { bot, api, chat }
}

#[tokio::test]
async fn test_start_command_sends_welcome() {
    let h = harness();
    h.bot.handle_update(&fixtures::text_update(1, 42, "/start")).await;

    assert_eq!(
        h.chat.sent().await,
        vec![SentItem::Message {
            chat_id: 42,
            reply_to: Some(1),
            text: WELCOME_MESSAGE.to_string(),
        }]
    );
    assert!(h.api.recorded_searches().await.is_empty());
}

#[tokio::test]
async fn test_plain_text_searches_and_replies() {
    let h = harness();
    h.api
        .set_results(vec![fixtures::record("Dune", "osdb", "subs/1")])
        .await;

    h.bot.handle_update(&fixtures::text_update(2, 42, "dune")).await;

    let messages = h.chat.sent_messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Search Results:"));
    assert!(messages[0].contains("/download_osdb_1"));
    assert_eq!(h.api.recorded_searches().await, vec!["dune"]);
}

#[tokio::test]
async fn test_empty_search_sends_no_results_message() {
    let h = harness();
    h.bot.handle_update(&fixtures::text_update(2, 42, "zzz")).await;
    assert_eq!(h.chat.sent_messages().await, vec![NO_RESULTS_MESSAGE]);
}

#[tokio::test]
async fn test_download_command_sends_document() {
    let h = harness();
    h.api.set_archive(b"zip-bytes".to_vec()).await;

    h.bot
        .handle_update(&fixtures::text_update(3, 42, "/download_osdb_12345"))
        .await;

    assert_eq!(
        h.chat.sent().await,
        vec![SentItem::Document {
            chat_id: 42,
            reply_to: Some(3),
            document: Document {
                filename: "subtitle_osdb.zip".to_string(),
                bytes: b"zip-bytes".to_vec(),
            },
        }]
    );
    assert_eq!(
        h.api.recorded_downloads().await,
        vec![("osdb".to_string(), "12345".to_string())]
    );
}

#[tokio::test]
async fn test_download_not_found_replies_with_failure_text() {
    let h = harness();
    h.api.fail_next(SubtitleError::Download { status: 404 }).await;

    h.bot
        .handle_update(&fixtures::text_update(3, 42, "/download_osdb_12345"))
        .await;

    let sent = h.chat.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(!matches!(sent[0], SentItem::Document { .. }));
    assert_eq!(
        h.chat.sent_messages().await,
        vec!["Failed to download subtitle"]
    );
}

#[tokio::test]
async fn test_malformed_download_command_replies_with_error() {
    let h = harness();
    h.bot
        .handle_update(&fixtures::text_update(4, 42, "/download_osdb"))
        .await;

    let messages = h.chat.sent_messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Error: Malformed download command"));
    assert!(h.api.recorded_downloads().await.is_empty());
}

#[tokio::test]
async fn test_pasted_links_trigger_bulk_download() {
    let h = harness();
    h.api.set_archive(vec![1, 2, 3]).await;

    let text = "https://bettercopelk.navinda.xyz/api/download?postUrl=a/b&source=osdb \
                https://bettercopelk.navinda.xyz/api/download?postUrl=c&source=subz";
    h.bot.handle_update(&fixtures::text_update(5, 42, text)).await;

    let bulk = h.api.recorded_bulk_downloads().await;
    assert_eq!(bulk.len(), 1);
    assert_eq!(bulk[0].len(), 2);
    assert!(h.api.recorded_searches().await.is_empty());

    match &h.chat.sent().await[..] {
        [SentItem::Document { document, .. }] => {
            assert_eq!(document.filename, "bulk_subtitles.zip")
        }
        other => panic!("expected one document, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bulk_failure_replies_with_failure_text() {
    let h = harness();
    h.api.fail_next(SubtitleError::Download { status: 500 }).await;

    h.bot
        .handle_update(&fixtures::text_update(
            5,
            42,
            "https://bettercopelk.navinda.xyz/x?postUrl=a&source=osdb",
        ))
        .await;

    assert_eq!(
        h.chat.sent_messages().await,
        vec!["Failed to download bulk subtitles"]
    );
}

#[tokio::test]
async fn test_foreign_links_are_ignored() {
    let h = harness();
    h.bot
        .handle_update(&fixtures::text_update(6, 42, "https://example.com/page"))
        .await;
    assert!(h.chat.sent().await.is_empty());
    assert!(h.api.recorded_searches().await.is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let h = harness();
    h.bot.handle_update(&fixtures::text_update(7, 42, "/help")).await;
    assert!(h.chat.sent().await.is_empty());
}

#[tokio::test]
async fn test_inline_query_is_answered() {
    let h = harness();
    h.api
        .set_results(
            (0..70)
                .map(|i| fixtures::record(&format!("M{}", i), "osdb", &format!("s/{}", i)))
                .collect(),
        )
        .await;

    h.bot
        .handle_update(&fixtures::inline_update(8, "q-1", "m"))
        .await;

    match &h.chat.sent().await[..] {
        [SentItem::InlineAnswer {
            inline_query_id,
            articles,
        }] => {
            assert_eq!(inline_query_id, "q-1");
            assert_eq!(articles.len(), 50);
            assert_eq!(articles[0].title, "M0 (Sinhala)");
        }
        other => panic!("expected inline answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_inline_search_failure_answers_empty() {
    let h = harness();
    h.api
        .fail_next(SubtitleError::Network("connection reset".into()))
        .await;

    h.bot
        .handle_update(&fixtures::inline_update(9, "q-2", "dune"))
        .await;

    assert_eq!(
        h.chat.sent().await,
        vec![SentItem::InlineAnswer {
            inline_query_id: "q-2".to_string(),
            articles: vec![],
        }]
    );
}

#[tokio::test]
async fn test_send_failure_does_not_panic() {
    let h = harness();
    h.chat.set_fail_sends(true).await;
    h.bot.handle_update(&fixtures::text_update(1, 42, "/start")).await;
    assert!(h.chat.sent().await.is_empty());
}

#[tokio::test]
async fn test_poll_once_advances_offset() {
    let h = harness();
    h.chat
        .push_updates(vec![
            fixtures::text_update(10, 42, "/start"),
            fixtures::text_update(11, 42, "/start"),
        ])
        .await;

    let next = h.bot.poll_once(None, 0).await.unwrap();
    assert_eq!(next, Some(12));
    assert_eq!(h.chat.sent_messages().await.len(), 2);

    let next = h.bot.poll_once(next, 0).await.unwrap();
    assert_eq!(next, Some(12));
    assert_eq!(h.chat.requested_offsets().await, vec![None, Some(12)]);
}

#[tokio::test]
async fn test_run_polling_stops_on_shutdown() {
    let h = harness();
    h.chat
        .push_updates(vec![fixtures::text_update(20, 42, "/start")])
        .await;

    let (tx, rx) = watch::channel(false);
    let bot = h.bot.clone();
    let task = tokio::spawn(async move {
        run_polling(&bot, 0, Duration::from_millis(10), rx).await;
    });

    for _ in 0..100 {
        if !h.chat.sent_messages().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(h.chat.sent_messages().await, vec![WELCOME_MESSAGE]);

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("polling did not stop")
        .unwrap();

    let offsets = h.chat.requested_offsets().await;
    assert_eq!(offsets[0], None);
    assert!(offsets[1..].iter().all(|o| *o == Some(21)));
}
