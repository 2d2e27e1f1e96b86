use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::{
    api::ArtClient,
    domain::{parser, ranking, AppError, CommandBuilder, SearchCandidate, SearchOptions},
};

#[derive(Clone)]
pub struct SearchCoordinator {
    builder: CommandBuilder,
    app_root: PathBuf,
    art: ArtClient,
    placeholder_art_url: String,
}

impl SearchCoordinator {
    pub fn new(
        builder: CommandBuilder,
        app_root: PathBuf,
        art: ArtClient,
        placeholder_art_url: String,
    ) -> Self {
        Self {
            builder,
            app_root,
            art,
            placeholder_art_url,
        }
    }

    /// Runs an sldl search and returns the best (artist, album) groups with artwork.
    pub async fn search(&self, options: &SearchOptions) -> Result<Vec<SearchCandidate>, AppError> {
        if options.query.trim().is_empty() {
            return Err(AppError::NoInput);
        }

        let output = self.run_search(options).await?;
        let candidates = parser::parse_search_output(&output);
        tracing::info!(
            "Search for {:?} produced {} candidates",
            options.query,
            candidates.len()
        );

        let mut ranked = ranking::rank(candidates.into_values(), &options.query);
        for candidate in ranked.iter_mut() {
            let art = self.art.resolve(&candidate.artist, &candidate.album).await;
            candidate.art_url = Some(art.unwrap_or_else(|| self.placeholder_art_url.clone()));
        }
        Ok(ranked)
    }

    /// Raw stdout of `sldl <query> --print json-all`.
    async fn run_search(&self, options: &SearchOptions) -> Result<Vec<u8>, AppError> {
        let command = self.builder.build_search(options);
        tracing::info!("Launching: {}", command.redacted());

        let output = Command::new(command.program())
            .args(command.args())
            .current_dir(&self.app_root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AppError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!("sldl search failed with {}: {}", output.status, stderr.trim());
            return Err(AppError::Tool {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}
