use std::{fs, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};

use crate::segmentation::SegmentationConfig;

use super::payload::{sample_records, FeedPayload};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const DEFAULT_SOURCE: &str = "http://localhost:5003/api/environment-messages";

const BUILTIN_SAMPLE: &str = "builtin:sample";

/// Where the caption payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Http(String),
    File(PathBuf),
    Sample,
}

impl SourceLocation {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source == BUILTIN_SAMPLE {
            SourceLocation::Sample
        } else if source.starts_with("http://") || source.starts_with("https://") {
            SourceLocation::Http(source.to_string())
        } else {
            SourceLocation::File(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Http(url) => write!(f, "{url}"),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Sample => write!(f, "{BUILTIN_SAMPLE}"),
        }
    }
}

pub async fn fetch_payload(location: &SourceLocation, timeout: Duration) -> Result<FeedPayload> {
    match location {
        SourceLocation::Http(url) => {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("failed to build http client")?;
            let response = client
                .get(url)
                .send()
                .await
                .with_context(|| format!("request to {url} failed"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(anyhow!("{url} responded with {status}"));
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read body from {url}"))?;
            FeedPayload::from_json(&body)
        }
        SourceLocation::File(path) => {
            let body = fs::read_to_string(path)
                .with_context(|| format!("failed to read feed from {}", path.display()))?;
            FeedPayload::from_json(&body)
        }
        SourceLocation::Sample => Ok(FeedPayload::Raw {
            environment: sample_records(),
        }),
    }
}

/// Load and segment the caption sequence for playback.
///
/// A source that cannot be fetched or decoded yields an empty sequence so the
/// scheduler idles. An invalid segmentation window is returned as an error.
pub async fn load_sequence(
    location: &SourceLocation,
    config: &SegmentationConfig,
    timeout: Duration,
) -> Result<Vec<String>> {
    config.validate()?;

    let payload = match fetch_payload(location, timeout).await {
        Ok(payload) => payload,
        Err(err) => {
            log_warn!("caption source {location} unavailable, feed will idle: {err:#}");
            return Ok(Vec::new());
        }
    };

    let sequence = payload.into_sequence(config)?;
    log_info!("loaded {} caption units from {location}", sequence.len());
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn temp_feed(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("iassist-{}-{name}.json", std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_locations() {
        assert_eq!(
            SourceLocation::parse(DEFAULT_SOURCE),
            SourceLocation::Http(DEFAULT_SOURCE.to_string())
        );
        assert_eq!(
            SourceLocation::parse("feeds/demo.json"),
            SourceLocation::File(PathBuf::from("feeds/demo.json"))
        );
        assert_eq!(SourceLocation::parse(" builtin:sample "), SourceLocation::Sample);
    }

    #[tokio::test]
    async fn loads_presegmented_file() {
        let path = temp_feed("preseg", r#"{"messages":["Door ahead","Clear path forward"]}"#);

        let sequence = load_sequence(
            &SourceLocation::File(path.clone()),
            &SegmentationConfig::default(),
            TIMEOUT,
        )
        .await
        .unwrap();
        let _ = fs::remove_file(path);

        assert_eq!(sequence, vec!["Door ahead", "Clear path forward"]);
    }

    #[tokio::test]
    async fn segments_raw_file() {
        let path = temp_feed(
            "raw",
            r#"{"environment":[{"message":"Door ahead. Push left. It opens outward."}]}"#,
        );
        let config = SegmentationConfig::new(10, 30).unwrap();

        let sequence = load_sequence(&SourceLocation::File(path.clone()), &config, TIMEOUT)
            .await
            .unwrap();
        let _ = fs::remove_file(path);

        assert_eq!(sequence, vec!["Door ahead", "Push left. It opens outward"]);
    }

    #[tokio::test]
    async fn missing_source_idles_instead_of_failing() {
        let location = SourceLocation::File(PathBuf::from("/nonexistent/iassist/feed.json"));
        let sequence = load_sequence(&location, &SegmentationConfig::default(), TIMEOUT)
            .await
            .unwrap();
        assert!(sequence.is_empty());
    }

    #[tokio::test]
    async fn malformed_source_idles_instead_of_failing() {
        let path = temp_feed("malformed", r#"{"status":"running"}"#);
        let sequence = load_sequence(
            &SourceLocation::File(path.clone()),
            &SegmentationConfig::default(),
            TIMEOUT,
        )
        .await
        .unwrap();
        let _ = fs::remove_file(path);

        assert!(sequence.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_idles_instead_of_failing() {
        let location = SourceLocation::Http("http://127.0.0.1:1/api/environment-messages".into());
        let sequence = load_sequence(&location, &SegmentationConfig::default(), TIMEOUT)
            .await
            .unwrap();
        assert!(sequence.is_empty());
    }

    #[tokio::test]
    async fn invalid_window_is_an_error() {
        let config = SegmentationConfig {
            min_length: 0,
            max_length: 10,
        };
        assert!(load_sequence(&SourceLocation::Sample, &config, TIMEOUT).await.is_err());
    }

    #[tokio::test]
    async fn builtin_sample_is_segmented() {
        let sequence = load_sequence(&SourceLocation::Sample, &SegmentationConfig::default(), TIMEOUT)
            .await
            .unwrap();
        assert!(!sequence.is_empty());
    }
}
