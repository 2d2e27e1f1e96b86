use crate::config::AppConfig;

use super::model::{non_empty, DownloadOptions, SearchOptions, ToolCommand};

pub const INDEX_FILE: &str = "slsk_downloads.index";

/// Turns form options into sldl argument lists.
///
/// Values are passed through verbatim; sldl does its own validation.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    executable: String,
    default_path: Option<String>,
    default_user: Option<String>,
    default_password: Option<String>,
    search_timeout_ms: u64,
}

impl CommandBuilder {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            executable: config.executable.to_string_lossy().into_owned(),
            default_path: config.download_path.clone(),
            default_user: config.user.clone(),
            default_password: config.password.clone(),
            search_timeout_ms: config.search_timeout_ms,
        }
    }

    pub fn build(&self, options: &DownloadOptions) -> ToolCommand {
        let mut command = ToolCommand::new(&self.executable);

        if let Some(input) = options.primary_input() {
            command.arg(input);
        }

        if let Some(path) = non_empty(&options.path).or(non_empty(&self.default_path)) {
            command.flag_with_value("--path", path);
        }
        self.push_credentials(&mut command, &options.user, &options.password);

        if let Some(format) = non_empty(&options.format) {
            command.flag_with_value("--pref-format", format);
        }
        if options.no_progress {
            command.arg("--no-progress");
        }

        let toggles = [
            (options.desperate, "--desperate"),
            (options.fast_search, "--fast-search"),
            (options.remove_ft, "--remove-ft"),
            (options.artist_maybe_wrong, "--artist-maybe-wrong"),
            (options.album, "--album"),
            (options.interactive, "--interactive"),
        ];
        for (enabled, flag) in toggles {
            if enabled {
                command.arg(flag);
            }
        }

        if options.use_database {
            command
                .flag_with_value("--index-path", INDEX_FILE)
                .arg("--skip-existing");
        }

        command
    }

    /// Command that asks sldl to print every search result as one JSON value.
    pub fn build_search(&self, options: &SearchOptions) -> ToolCommand {
        let mut command = ToolCommand::new(&self.executable);
        command
            .arg(&options.query)
            .flag_with_value("--print", "json-all")
            .flag_with_value("--search-timeout", &self.search_timeout_ms.to_string());
        self.push_credentials(&mut command, &options.user, &options.password);
        command
    }

    fn push_credentials(
        &self,
        command: &mut ToolCommand,
        user: &Option<String>,
        password: &Option<String>,
    ) {
        if let Some(user) = non_empty(user).or(non_empty(&self.default_user)) {
            command.flag_with_value("--user", user);
        }
        if let Some(password) = non_empty(password).or(non_empty(&self.default_password)) {
            command.flag_with_value("--pass", password);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const EXECUTABLE: &str = "/opt/sldl/sldl";

    fn builder() -> CommandBuilder {
        CommandBuilder::new(&AppConfig {
            executable: EXECUTABLE.into(),
            ..AppConfig::default()
        })
    }

    fn text(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_build_no_input() {
        let command = builder().build(&DownloadOptions::default());
        assert_eq!(command.as_slice(), [EXECUTABLE]);
    }

    #[test]
    fn test_build_simple_text() {
        let options = DownloadOptions {
            input_text: text("Artist - Song"),
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [EXECUTABLE, "Artist - Song"]
        );
    }

    #[test]
    fn test_build_playlist_wins_over_file_and_text() {
        let options = DownloadOptions {
            input_text: text("some other text"),
            input_file_path: text("/path/to/file.csv"),
            spotify_playlist_url: text("https://open.spotify.com/playlist/123"),
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [EXECUTABLE, "https://open.spotify.com/playlist/123"]
        );
    }

    #[test]
    fn test_build_file_wins_over_text() {
        let options = DownloadOptions {
            input_text: text("some other text"),
            input_file_path: text("/path/to/file.csv"),
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [EXECUTABLE, "/path/to/file.csv"]
        );
    }

    #[test]
    fn test_build_boolean_flags() {
        let options = DownloadOptions {
            input_text: text("test"),
            desperate: true,
            album: true,
            ..Default::default()
        };
        let command = builder().build(&options);
        assert_eq!(command.args()[0], "test");
        let flags: BTreeSet<&str> = command.args()[1..].iter().map(String::as_str).collect();
        assert_eq!(flags, BTreeSet::from(["--desperate", "--album"]));
    }

    #[test]
    fn test_build_database_pair() {
        let options = DownloadOptions {
            input_text: text("test"),
            use_database: true,
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [
                EXECUTABLE,
                "test",
                "--index-path",
                "slsk_downloads.index",
                "--skip-existing"
            ]
        );
    }

    #[test]
    fn test_build_user_pass() {
        let options = DownloadOptions {
            input_text: text("test"),
            user: text("testuser"),
            password: text("testpass"),
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [EXECUTABLE, "test", "--user", "testuser", "--pass", "testpass"]
        );
    }

    #[test]
    fn test_build_full_order() {
        let options = DownloadOptions {
            spotify_playlist_url: text("https://spotify.com/playlist/abc"),
            path: text("/music"),
            user: text("testuser"),
            password: text("testpass"),
            format: text("flac"),
            no_progress: true,
            remove_ft: true,
            album: true,
            interactive: true,
            use_database: true,
            ..Default::default()
        };
        assert_eq!(
            builder().build(&options).as_slice(),
            [
                EXECUTABLE,
                "https://spotify.com/playlist/abc",
                "--path",
                "/music",
                "--user",
                "testuser",
                "--pass",
                "testpass",
                "--pref-format",
                "flac",
                "--no-progress",
                "--remove-ft",
                "--album",
                "--interactive",
                "--index-path",
                "slsk_downloads.index",
                "--skip-existing"
            ]
        );
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let builder = CommandBuilder::new(&AppConfig {
            executable: EXECUTABLE.into(),
            download_path: text("/srv/music"),
            user: text("envuser"),
            password: text("envpass"),
            ..AppConfig::default()
        });

        let options = DownloadOptions {
            input_text: text("test"),
            user: text("formuser"),
            password: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            builder.build(&options).as_slice(),
            [
                EXECUTABLE,
                "test",
                "--path",
                "/srv/music",
                "--user",
                "formuser",
                "--pass",
                "envpass"
            ]
        );
    }

    #[test]
    fn test_build_search() {
        let options = SearchOptions {
            query: "Daft Punk Discovery".to_string(),
            user: text("u"),
            password: None,
        };
        assert_eq!(
            builder().build_search(&options).as_slice(),
            [
                EXECUTABLE,
                "Daft Punk Discovery",
                "--print",
                "json-all",
                "--search-timeout",
                "6000",
                "--user",
                "u"
            ]
        );
    }
}
