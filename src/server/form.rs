use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;

use crate::config::AppConfig;
use crate::domain::command::INDEX_FILE;
use crate::domain::{AppError, DownloadOptions, SearchOptions};
use crate::utils::upload_filename;

/// A file attached to the form under `input_file`.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

/// Decoded multipart form: text fields by name plus an optional upload.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    fields: HashMap<String, String>,
    upload: Option<Upload>,
}

impl SubmittedForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidForm(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidForm(e.to_string()))?;
                // Browsers send an empty part when no file was chosen.
                if name == "input_file" && !filename.is_empty() {
                    form.upload = Some(Upload { filename, data });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::InvalidForm(e.to_string()))?;
            form.fields.insert(name, value);
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            upload: None,
        }
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Checkbox semantics: present with a truthy value.
    fn flag(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "1" | "yes"
            )
        })
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            input_text: self.text("input_text"),
            input_file_path: None,
            spotify_playlist_url: self.text("spotify_playlist_url"),
            path: self.text("path"),
            user: self.text("user"),
            password: self.text("password"),
            format: self.text("format"),
            no_progress: self.flag("no_progress"),
            desperate: self.flag("desperate"),
            fast_search: self.flag("fast_search"),
            remove_ft: self.flag("remove_ft"),
            artist_maybe_wrong: self.flag("artist_maybe_wrong"),
            album: self.flag("album"),
            interactive: self.flag("interactive"),
            use_database: self.flag("use_database"),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            query: self
                .text("input_text")
                .map(|q| q.trim().to_string())
                .unwrap_or_default(),
            user: self.text("user"),
            password: self.text("password"),
        }
    }
}

/// Writes the upload into `app_root` under its original name and returns the full path.
///
/// The sldl executable, the download index, symlinks and executable files are never replaced.
pub async fn save_upload(upload: &Upload, config: &AppConfig) -> Result<PathBuf, AppError> {
    let filename = upload_filename(&upload.filename).ok_or_else(|| {
        AppError::InvalidForm(format!("Unusable upload filename: {:?}", upload.filename))
    })?;

    let path = config.app_root.join(&filename);
    if filename == INDEX_FILE || is_executable_path(&path, &config.executable).await {
        return Err(protected(&filename));
    }
    if let Ok(meta) = tokio::fs::symlink_metadata(&path).await {
        if !meta.is_file() || is_executable(&meta) {
            return Err(protected(&filename));
        }
    }

    tokio::fs::write(&path, &upload.data)
        .await
        .map_err(|e| AppError::Io(format!("Failed to save {}: {}", path.display(), e)))?;

    tracing::info!("Saved upload to {} ({} bytes)", path.display(), upload.data.len());
    Ok(path)
}

fn protected(filename: &str) -> AppError {
    tracing::warn!("Rejected upload that would replace {}", filename);
    AppError::InvalidForm(format!("Refusing to overwrite {}", filename))
}

async fn is_executable_path(path: &Path, executable: &Path) -> bool {
    if path == executable {
        return true;
    }
    match tokio::fs::canonicalize(executable).await {
        Ok(resolved) => resolved == path,
        Err(_) => false,
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_options_from_fields() {
        let form = SubmittedForm::from_fields([
            ("input_text", "Artist - Song"),
            ("spotify_playlist_url", ""),
            ("user", "me"),
            ("desperate", "true"),
            ("album", "on"),
            ("fast_search", "false"),
            ("use_database", "1"),
        ]);
        let options = form.download_options();

        assert_eq!(options.input_text.as_deref(), Some("Artist - Song"));
        assert_eq!(options.spotify_playlist_url, None);
        assert_eq!(options.user.as_deref(), Some("me"));
        assert!(options.desperate);
        assert!(options.album);
        assert!(!options.fast_search);
        assert!(options.use_database);
        assert!(!options.interactive);
    }

    #[test]
    fn test_search_options_from_fields() {
        let form = SubmittedForm::from_fields([("input_text", "Discovery"), ("password", " ")]);
        let options = form.search_options();
        assert_eq!(options.query, "Discovery");
        assert_eq!(options.password, None);
    }

    fn upload(filename: &str, data: &'static [u8]) -> Upload {
        Upload {
            filename: filename.to_string(),
            data: Bytes::from_static(data),
        }
    }

    async fn config_in(name: &str) -> AppConfig {
        let dir = std::env::temp_dir().join(format!("sldl-web-{}-{}", name, std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        AppConfig {
            executable: dir.join("sldl"),
            app_root: dir,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_search_query_is_trimmed() {
        let form = SubmittedForm::from_fields([("input_text", "  Discovery ")]);
        assert_eq!(form.search_options().query, "Discovery");
    }

    #[tokio::test]
    async fn test_save_upload() {
        let config = config_in("upload").await;
        let path = save_upload(&upload("../list.csv", b"artist,title\n"), &config)
            .await
            .unwrap();

        assert_eq!(path, config.app_root.join("list.csv"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"artist,title\n");

        // Re-uploading a track list replaces it.
        save_upload(&upload("list.csv", b"a,b\n"), &config)
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"a,b\n");
    }

    #[tokio::test]
    async fn test_save_upload_refuses_protected_files() {
        let config = config_in("protected").await;

        let err = save_upload(&upload("sldl", b"#!/bin/sh\n"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidForm(_)));
        assert!(!config.executable.exists());

        let err = save_upload(&upload(INDEX_FILE, b""), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidForm(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_upload_refuses_existing_executable() {
        use std::os::unix::fs::PermissionsExt;

        let config = config_in("exec").await;
        let tool = config.app_root.join("helper.sh");
        tokio::fs::write(&tool, b"#!/bin/sh\necho ok\n").await.unwrap();
        tokio::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755))
            .await
            .unwrap();

        let err = save_upload(&upload("helper.sh", b"#!/bin/sh\necho other\n"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidForm(_)));
        assert_eq!(
            tokio::fs::read(&tool).await.unwrap(),
            b"#!/bin/sh\necho ok\n"
        );
    }
}
