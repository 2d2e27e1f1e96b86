use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::model::SearchCandidate;

/// Folder names that say nothing about the artist.
const GENERIC_FOLDERS: &[&str] = &[
    "music",
    "mp3",
    "flac",
    "uploads",
    "soulseek",
    "downloads",
    "complete",
];

lazy_static! {
    static ref LEADING_YEAR: Regex =
        Regex::new(r"^\s*(?:\(\d{4}\)|\[\d{4}\]|\d{4}\b)\s*-?\s*").unwrap();
    static ref FORMAT_TAG: Regex =
        Regex::new(r"(?i)[\[\(\{]\s*(?:flac|mp3|320|v0|aac)\b[^\]\)\}]*[\]\)\}]").unwrap();
    static ref ANNOTATION: Regex = Regex::new(r"[\[\(\{][^\]\)\}]*[\]\)\}]").unwrap();
}

/// Album cleanup steps, applied in order.
pub const ALBUM_CLEANUP: &[fn(&str) -> String] =
    &[strip_leading_year, strip_format_tags, strip_annotations];

pub fn strip_leading_year(album: &str) -> String {
    LEADING_YEAR.replace(album, "").into_owned()
}

pub fn strip_format_tags(album: &str) -> String {
    FORMAT_TAG.replace_all(album, "").into_owned()
}

pub fn strip_annotations(album: &str) -> String {
    ANNOTATION.replace_all(album, "").into_owned()
}

pub fn clean_album(album: &str) -> String {
    ALBUM_CLEANUP
        .iter()
        .fold(album.to_string(), |acc, step| step(&acc))
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ResultEntry>),
    One(ResultEntry),
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    #[serde(rename = "File", alias = "file", default)]
    file: Option<FileDescriptor>,
}

#[derive(Debug, Deserialize)]
struct FileDescriptor {
    #[serde(rename = "Filename", default)]
    filename: Option<String>,
}

/// Guess (artist, album) from a remote file path.
pub fn extract_artist_album(filename: &str) -> Option<(String, String)> {
    let normalized = filename.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

    let (artist, album) = match segments.len() {
        0 | 1 => return None,
        2 => split_artist_album(segments[0])?,
        n => {
            let artist = segments[n - 3];
            let album = segments[n - 2];
            let generic = GENERIC_FOLDERS
                .iter()
                .any(|g| g.eq_ignore_ascii_case(artist.trim()));
            match split_artist_album(album) {
                Some(split) if generic => split,
                _ => (artist.to_string(), album.to_string()),
            }
        }
    };

    let artist = artist.trim().to_string();
    let album = clean_album(&album);
    if artist.is_empty() || artist.eq_ignore_ascii_case("unknown") || album.is_empty() {
        return None;
    }
    Some((artist, album))
}

fn split_artist_album(segment: &str) -> Option<(String, String)> {
    segment
        .split_once(" - ")
        .map(|(artist, album)| (artist.to_string(), album.to_string()))
}

/// Group sldl's `json-all` output into candidates keyed by `artist|album`.
///
/// Output that does not decode yields no candidates.
pub fn parse_search_output(output: &[u8]) -> BTreeMap<String, SearchCandidate> {
    let entries = match serde_json::from_slice::<OneOrMany>(output) {
        Ok(OneOrMany::Many(entries)) => entries,
        Ok(OneOrMany::One(entry)) => vec![entry],
        Err(e) => {
            tracing::warn!("Could not decode sldl search output: {}", e);
            return BTreeMap::new();
        }
    };

    let mut candidates: BTreeMap<String, SearchCandidate> = BTreeMap::new();
    for entry in entries {
        let Some(filename) = entry.file.and_then(|f| f.filename) else {
            continue;
        };
        let Some((artist, album)) = extract_artist_album(&filename) else {
            continue;
        };
        let candidate = SearchCandidate::new(artist, album, filename);
        candidates
            .entry(candidate.key())
            .and_modify(|existing| existing.count += 1)
            .or_insert(candidate);
    }
    candidates
}
