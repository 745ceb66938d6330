//! Download reference codec.
//!
//! A search hit is turned into a chat command of the form
//! `/download_<source>_<segment>`, where `<segment>` is the last path segment
//! of the record's `postUrl`. Sending that command back asks the bot to fetch
//! the archive.
//!
//! Reserved characters:
//! - `source` must be non-empty and free of `_`, `/` and whitespace.
//! - `segment` must be non-empty and free of whitespace. It may contain `_`,
//!   but every `_` decodes back as `/`, so such a segment does not survive the
//!   round trip unchanged.
//! - `@` is allowed unless the encoded command would end in something that
//!   reads as a `@<name>bot` mention, which decoding strips.
//!
//! For any reference accepted by [`DownloadRef::from_record`] whose segment
//! contains no `_`, `decode(encode(r)) == r`.

use thiserror::Error;

/// Prefix every download command starts with.
pub const DOWNLOAD_COMMAND_PREFIX: &str = "/download_";

const SEPARATOR: char = '_';

/// Errors from building or parsing a download reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DownloadRefError {
    /// Text is not a `/download_<source>_<segment>` command.
    #[error("Malformed download command: {0}")]
    Malformed(String),

    /// A component contains a character the command grammar reserves.
    #[error("Download reference {field} contains a reserved character: {value}")]
    ReservedCharacter { field: &'static str, value: String },

    /// The post URL has no usable last path segment.
    #[error("Post URL has no path segment: {0}")]
    EmptySegment(String),
}

/// `(source, postUrl suffix)` pair carried by a download command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRef {
    pub source: String,
    pub post_url_suffix: String,
}

impl DownloadRef {
    /// Build a reference from a search record's `source` and `postUrl`.
    pub fn from_record(source: &str, post_url: &str) -> Result<Self, DownloadRefError> {
        if source.is_empty()
            || source
                .chars()
                .any(|c| c == SEPARATOR || c == '/' || c.is_whitespace())
        {
            return Err(DownloadRefError::ReservedCharacter {
                field: "source",
                value: source.to_string(),
            });
        }

        let segment = last_path_segment(post_url)
            .ok_or_else(|| DownloadRefError::EmptySegment(post_url.to_string()))?;
        if segment.chars().any(char::is_whitespace) {
            return Err(DownloadRefError::ReservedCharacter {
                field: "postUrl",
                value: segment.to_string(),
            });
        }

        let reference = Self {
            source: source.to_string(),
            post_url_suffix: segment.to_string(),
        };
        let encoded = reference.encode();
        if strip_bot_mention(&encoded) != encoded {
            let (field, value) = if segment.contains('@') {
                ("postUrl", segment)
            } else {
                ("source", source)
            };
            return Err(DownloadRefError::ReservedCharacter {
                field,
                value: value.to_string(),
            });
        }

        Ok(reference)
    }

    /// Render as `/download_<source>_<segment>`.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}{}",
            DOWNLOAD_COMMAND_PREFIX, self.source, SEPARATOR, self.post_url_suffix
        )
    }

    /// Parse a download command. Segments after the source are rejoined with
    /// `/` to rebuild the suffix. A trailing `@botname` mention is ignored.
    pub fn decode(text: &str) -> Result<Self, DownloadRefError> {
        let command = text.split_whitespace().next().unwrap_or_default();
        let command = strip_bot_mention(command);

        let body = command
            .strip_prefix(DOWNLOAD_COMMAND_PREFIX)
            .ok_or_else(|| DownloadRefError::Malformed(text.to_string()))?;

        let (source, rest) = body
            .split_once(SEPARATOR)
            .ok_or_else(|| DownloadRefError::Malformed(text.to_string()))?;

        if source.is_empty() || rest.is_empty() {
            return Err(DownloadRefError::Malformed(text.to_string()));
        }

        let suffix = rest.split(SEPARATOR).collect::<Vec<_>>().join("/");

        Ok(Self {
            source: source.to_string(),
            post_url_suffix: suffix,
        })
    }
}

/// Drop a trailing `@<username>` when it is a valid bot username: 5 to 32
/// ASCII letters, digits or `_`, ending in "bot".
fn strip_bot_mention(command: &str) -> &str {
    match command.rsplit_once('@') {
        Some((head, name)) if is_bot_username(name) => head,
        _ => command,
    }
}

fn is_bot_username(name: &str) -> bool {
    (5..=32).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.to_ascii_lowercase().ends_with("bot")
}

/// Last non-empty path segment of a URL or path, ignoring trailing slashes.
fn last_path_segment(post_url: &str) -> Option<&str> {
    let without_query = post_url.split(['?', '#']).next().unwrap_or_default();
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}
