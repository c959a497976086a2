use std::path::{Path, PathBuf};

use bytes::Bytes;
use time::OffsetDateTime;
use tracing::warn;

/// Strip anything that could escape the upload directory or confuse a
/// filesystem: whitespace becomes underscores, everything outside
/// `[A-Za-z0-9_.-]` is dropped.
pub fn sanitize_filename(original: &str) -> String {
    let spaced: String = original
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let safe: String = spaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    if safe.is_empty() {
        "file".into()
    } else {
        safe
    }
}

/// Unique on-disk name: millisecond timestamp prefix plus sanitized original.
pub fn stored_name_for(original: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{}-{}", millis, sanitize_filename(original))
}

pub fn documents_dir(upload_dir: &str) -> PathBuf {
    Path::new(upload_dir).join("documents")
}

pub async fn save_file(upload_dir: &str, stored_name: &str, body: Bytes) -> anyhow::Result<PathBuf> {
    let dir = documents_dir(upload_dir);
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(stored_name);
    tokio::fs::write(&path, &body).await?;
    Ok(path)
}

/// Best-effort removal; a missing backing file is logged, not fatal.
pub async fn remove_file(upload_dir: &str, stored_name: &str) {
    let path = documents_dir(upload_dir).join(stored_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(path = %path.display(), error = %e, "could not remove document file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_whitespace() {
        assert_eq!(sanitize_filename("ration card.pdf"), "ration_card.pdf");
    }

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("a\\b/c.txt"), "abc.txt");
    }

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("Aadhar-2025_v2.pdf"), "Aadhar-2025_v2.pdf");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename("///"), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn stored_name_has_timestamp_prefix() {
        let name = stored_name_for("card.pdf");
        let (prefix, rest) = name.split_once('-').expect("dash separator");
        assert!(prefix.parse::<i128>().is_ok());
        assert_eq!(rest, "card.pdf");
    }

    #[tokio::test]
    async fn save_and_remove_roundtrip() {
        let dir = std::env::temp_dir().join("village-portal-doc-test");
        let upload_dir = dir.to_string_lossy().into_owned();
        let path = save_file(&upload_dir, "t-1.txt", Bytes::from_static(b"hello"))
            .await
            .expect("save should succeed");
        assert!(path.exists());
        remove_file(&upload_dir, "t-1.txt").await;
        assert!(!path.exists());
    }
}
