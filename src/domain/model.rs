use std::fmt;

use serde::Serialize;
use serde_json::json;

/// Everything a user can submit on the download form.
///
/// Empty strings are treated the same as missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    pub input_text: Option<String>,
    pub input_file_path: Option<String>,
    pub spotify_playlist_url: Option<String>,
    pub path: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub format: Option<String>,
    pub no_progress: bool,
    pub desperate: bool,
    pub fast_search: bool,
    pub remove_ft: bool,
    pub artist_maybe_wrong: bool,
    pub album: bool,
    pub interactive: bool,
    pub use_database: bool,
}

impl DownloadOptions {
    /// The positional argument for sldl: playlist URL, then uploaded file, then free text.
    pub fn primary_input(&self) -> Option<&str> {
        non_empty(&self.spotify_playlist_url)
            .or_else(|| non_empty(&self.input_file_path))
            .or_else(|| non_empty(&self.input_text))
    }

    pub fn has_input(&self) -> bool {
        self.primary_input().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub query: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A fully built sldl invocation: the executable followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    parts: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            parts: vec![program.into()],
        }
    }

    pub(crate) fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.parts.push(arg.into());
        self
    }

    pub(crate) fn flag_with_value(&mut self, flag: &str, value: &str) -> &mut Self {
        self.arg(flag).arg(value)
    }

    pub fn program(&self) -> &str {
        &self.parts[0]
    }

    pub fn args(&self) -> &[String] {
        &self.parts[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.parts
    }

    /// Display form for logs with the password value masked.
    pub fn redacted(&self) -> Redacted<'_> {
        Redacted(self)
    }
}

pub struct Redacted<'a>(&'a ToolCommand);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mask_next = false;
        for (i, part) in self.0.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if mask_next {
                f.write_str("****")?;
            } else {
                write!(f, "{:?}", part)?;
            }
            mask_next = part == "--pass";
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineColor {
    Default,
    Red,
}

/// One unit of the progress stream sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Line { text: String, color: LineColor },
    Done,
    Crash { code: i32 },
}

impl StreamEvent {
    pub fn line(text: impl Into<String>, color: LineColor) -> Self {
        Self::Line {
            text: text.into(),
            color,
        }
    }

    /// JSON payload carried in the `data:` field of an SSE frame.
    pub fn to_json(&self) -> String {
        let value = match self {
            Self::Line { text, color } => json!({ "text": text, "color": color }),
            Self::Done => json!({ "event": "DONE" }),
            Self::Crash { code } => json!({ "event": "CRASH", "code": code }),
        };
        value.to_string()
    }
}

/// An (artist, album) group inferred from search result paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCandidate {
    pub artist: String,
    pub album: String,
    pub count: usize,
    pub sample_file: String,
    pub score: f64,
    pub art_url: Option<String>,
}

impl SearchCandidate {
    pub fn new(artist: String, album: String, sample_file: String) -> Self {
        Self {
            artist,
            album,
            count: 1,
            sample_file,
            score: 0.0,
            art_url: None,
        }
    }

    pub fn key(&self) -> String {
        format!("{}|{}", self.artist, self.album)
    }
}
