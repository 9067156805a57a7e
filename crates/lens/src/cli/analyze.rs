//! The `lens analyze` command.

use super::KeyArgs;
use anyhow::Context;
use base64::Engine;
use clap::Args;
use lens_core::{
    AnalysisResult, AnalyzeError, Classification, Config, VisionClient, CLASSIFY_PROMPT,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze
    #[arg(required = true)]
    pub image: PathBuf,

    /// Prompt sent to the providers (defaults to the waste-sorting prompt)
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Skip parsing the answer as a waste-sorting classification
    #[arg(long)]
    pub raw: bool,

    /// Print per-provider health counters to stderr afterwards
    #[arg(long)]
    pub stats: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub keys: KeyArgs,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    #[serde(flatten)]
    result: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let image = load_image(&args.image).await?;
    let client = VisionClient::from_config(config, args.keys.key_store(config));
    let prompt = args.prompt.as_deref().unwrap_or(CLASSIFY_PROMPT);

    tracing::info!(
        providers = client.providers().len(),
        image = %args.image.display(),
        "Analyzing image"
    );

    let outcome = client.analyze(prompt, &image).await;

    if args.stats {
        eprintln!("{}", serde_json::to_string_pretty(&client.health())?);
    }

    let result = match outcome {
        Ok(result) => result,
        Err(AnalyzeError::AllProvidersFailed(failure)) => {
            eprintln!("Tried: {}", failure.attempted_provider_names.join(", "));
            if !failure.rate_limited_provider_names.is_empty() {
                eprintln!(
                    "Rate limited: {}",
                    failure.rate_limited_provider_names.join(", ")
                );
            }
            return Err(failure.into());
        }
        Err(e) => return Err(e.into()),
    };

    let classification = if args.raw {
        None
    } else {
        match Classification::parse(&result.content) {
            Ok(classification) => Some(classification),
            Err(e) => {
                tracing::warn!("Answer is not a classification, printing raw content: {e}");
                None
            }
        }
    };

    let output = AnalyzeOutput {
        result,
        classification,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");

    Ok(())
}

/// Read an image file and encode it as a base64 data URL.
async fn load_image(path: &Path) -> anyhow::Result<String> {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    let bytes = tokio::fs::read(&expanded)
        .await
        .with_context(|| format!("Failed to read image: {}", expanded.display()))?;
    if bytes.is_empty() {
        anyhow::bail!("Image file is empty: {}", expanded.display());
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{encoded}", media_type(&expanded)))
}

fn media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        other => {
            tracing::warn!("Unknown image extension '{other}', sending as image/jpeg");
            "image/jpeg"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_media_type_by_extension() {
        assert_eq!(media_type(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(media_type(Path::new("a.png")), "image/png");
        assert_eq!(media_type(Path::new("a.heic")), "image/jpeg");
    }

    #[tokio::test]
    async fn test_load_image_builds_data_url() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"ABC").unwrap();

        let url = load_image(file.path()).await.unwrap();
        assert_eq!(url, "data:image/png;base64,QUJD");
    }

    #[tokio::test]
    async fn test_load_image_rejects_empty_file() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let err = load_image(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_load_image_missing_file() {
        let err = load_image(Path::new("/nonexistent/lens/photo.jpg"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read image"));
    }
}
