//! Async file front end for the merger.
//!
//! Reading the inputs is I/O bound and runs concurrently; the merge itself
//! is sequential and CPU bound, so it runs on tokio's blocking pool once every
//! read has completed.

use std::path::Path;

use log::debug;

use crate::ooxml::docx::merge::{MergeOptions, merge_documents};
use crate::ooxml::error::Result;

/// Read the files at `paths` concurrently and merge them in the given order.
///
/// Returns `Ok(None)` when `paths` is empty.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn run() -> docx_merge::Result<()> {
/// use docx_merge::{MergeOptions, merge_files};
///
/// let merged = merge_files(["a.docx", "b.docx"], MergeOptions::default()).await?;
/// if let Some(bytes) = merged {
///     tokio::fs::write("merged.docx", bytes).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn merge_files<I, P>(paths: I, options: MergeOptions) -> Result<Option<Vec<u8>>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    options.validate()?;

    let reads: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref().to_path_buf();
            tokio::spawn(async move {
                let bytes = tokio::fs::read(&path).await?;
                debug!("Read {} ({} bytes)", path.display(), bytes.len());
                Ok::<_, std::io::Error>(bytes)
            })
        })
        .collect();

    let mut sources = Vec::with_capacity(reads.len());
    for read in reads {
        sources.push(read.await??);
    }

    tokio::task::spawn_blocking(move || merge_documents(sources, options)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::merge::test_support::Fixture;
    use crate::ooxml::error::MergeError;

    #[tokio::test]
    async fn test_merge_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.docx");
        let second = dir.path().join("second.docx");
        tokio::fs::write(&first, Fixture::new().body("<w:p>one</w:p>").to_bytes())
            .await
            .unwrap();
        tokio::fs::write(&second, Fixture::new().body("<w:p>two</w:p>").to_bytes())
            .await
            .unwrap();

        let merged = merge_files([&first, &second], MergeOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&merged[..2], b"PK");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = merge_files([dir.path().join("absent.docx")], MergeOptions::default()).await;
        assert!(matches!(result, Err(MergeError::Io(_))));
    }

    #[tokio::test]
    async fn test_no_files() {
        let result = merge_files(Vec::<std::path::PathBuf>::new(), MergeOptions::default()).await;
        assert!(result.unwrap().is_none());
    }
}
