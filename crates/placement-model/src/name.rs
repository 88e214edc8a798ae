//! User name validation and download file naming.

use serde::{Deserialize, Serialize};

use posterframe_common::config::ExportSettings;
use posterframe_common::error::{PosterError, PosterResult};

/// A trimmed, non-empty user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a raw name.
    pub fn parse(raw: &str) -> PosterResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PosterError::invalid_input("Please enter your name."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-name-safe token for this name, or `None` if nothing survives.
    pub fn file_token(&self) -> Option<String> {
        let token = sanitize_file_token(&self.0);
        (!token.is_empty()).then_some(token)
    }
}

impl TryFrom<String> for UserName {
    type Error = PosterError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        UserName::parse(&raw)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reduce a name to `[A-Za-z0-9_]`.
///
/// A whitespace run between two word characters becomes one `_`. Any other
/// character is dropped, including whitespace that touches punctuation.
pub fn sanitize_file_token(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut token = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            let run_start = i;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let before = run_start.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i).copied();
            if before.is_some_and(is_word_char) && after.is_some_and(is_word_char) {
                token.push('_');
            }
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            token.push(c);
        }
        i += 1;
    }
    token
}

/// Download file name for the exported poster.
pub fn download_file_name(name: Option<&UserName>, settings: &ExportSettings) -> String {
    let token = name
        .and_then(UserName::file_token)
        .unwrap_or_else(|| settings.fallback_name.clone());
    format!(
        "{}{}{}",
        settings.file_prefix, token, settings.file_extension
    )
}
