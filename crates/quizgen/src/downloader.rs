//! Picture download and PNG normalization for quiz media.
//!
//! Everything ends up as `{base_name}.png`:
//!
//! | Source       | Handling                                               |
//! |--------------|--------------------------------------------------------|
//! | `.png`       | kept as downloaded                                     |
//! | `.svg`       | rasterized by `rsvg-convert`, else ImageMagick `convert` |
//! | other raster | re-encoded with the `image` crate, original kept on failure |

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::QuizError;

pub const USER_AGENT: &str = "DuolingoCards-QuizGenerator/1.0";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Extension assumed when the URL path carries none.
pub const DEFAULT_EXTENSION: &str = ".png";

pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self, QuizError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` into `dest`, creating parent directories as needed.
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<(), QuizError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| QuizError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuizError::Status {
                service: "download",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| QuizError::io(dest, e))
    }

    /// Download `url` into `dir` and normalize it to `{base_name}.png`.
    ///
    /// Returns the file name (not the path) of the stored picture, which is
    /// `{base_name}{ext}` when a raster could not be re-encoded.
    pub async fn download_and_convert(
        &self,
        url: &str,
        dir: &Path,
        base_name: &str,
        width: u32,
    ) -> Result<String, QuizError> {
        let ext = extension_from_url(url);
        let downloaded = dir.join(format!("{base_name}{ext}"));
        self.download_file(url, &downloaded).await?;

        if ext == ".png" {
            return Ok(format!("{base_name}.png"));
        }

        let target = dir.join(format!("{base_name}.png"));

        if ext == ".svg" {
            rasterize_svg(&downloaded, &target, width).await?;
            remove_quietly(&downloaded).await;
            return Ok(format!("{base_name}.png"));
        }

        match reencode_png(downloaded.clone(), target).await {
            Ok(()) => {
                remove_quietly(&downloaded).await;
                Ok(format!("{base_name}.png"))
            }
            Err(e) => {
                tracing::debug!(
                    path = %downloaded.display(),
                    error = %e,
                    "Keeping picture in its original format"
                );
                Ok(format!("{base_name}{ext}"))
            }
        }
    }
}

/// Lowercased extension (with the dot) of the URL path, ignoring any query
/// string. Defaults to [`DEFAULT_EXTENSION`].
pub fn extension_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);

    match file.rfind('.') {
        Some(dot) if dot + 1 < file.len() => file[dot..].to_lowercase(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Rasterize an SVG to a PNG `width` pixels wide.
async fn rasterize_svg(svg: &Path, png: &Path, width: u32) -> Result<(), QuizError> {
    let width = width.to_string();

    let rsvg = tokio::process::Command::new("rsvg-convert")
        .args(["-w", &width, "-o"])
        .arg(png)
        .arg(svg)
        .output()
        .await;

    match rsvg {
        Ok(output) if output.status.success() => return Ok(()),
        Ok(output) => {
            return Err(QuizError::Conversion(format!(
                "rsvg-convert exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(QuizError::Conversion(format!("rsvg-convert: {e}"))),
    }

    let output = tokio::process::Command::new("convert")
        .args(["-background", "none", "-resize", &format!("{width}x")])
        .arg(svg)
        .arg(png)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QuizError::Conversion("no SVG converter available (install librsvg or imagemagick)".into())
            } else {
                QuizError::Conversion(format!("convert: {e}"))
            }
        })?;

    if !output.status.success() {
        return Err(QuizError::Conversion(format!(
            "convert exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

/// Decode any raster format the `image` crate knows and write it as PNG.
async fn reencode_png(src: PathBuf, dst: PathBuf) -> Result<(), QuizError> {
    tokio::task::spawn_blocking(move || {
        let img = image::open(&src).map_err(|e| QuizError::Conversion(e.to_string()))?;
        img.save_with_format(&dst, image::ImageFormat::Png)
            .map_err(|e| QuizError::Conversion(e.to_string()))
    })
    .await
    .map_err(|e| QuizError::Conversion(format!("encoder task failed: {e}")))?
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), error = %e, "Failed to remove temporary download");
    }
}
