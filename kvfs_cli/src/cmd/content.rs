use std::path::PathBuf;

use anyhow::{Context, Result};
use kvfs::ScopedFs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub async fn run_write(
    fs: &ScopedFs,
    path: &str,
    from: Option<PathBuf>,
    data: Option<String>,
) -> Result<()> {
    let content = match (from, data) {
        (Some(file), _) => tokio::fs::read(&file)
            .await
            .with_context(|| format!("failed to read {file:?}"))?,
        (None, Some(data)) => data.into_bytes(),
        (None, None) => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        }
    };

    let outcome = fs.write(path, content).await?;
    println!("wrote {} bytes to {}", outcome.size, outcome.path);
    Ok(())
}

pub async fn run_read(fs: &ScopedFs, path: &str, out: Option<PathBuf>) -> Result<()> {
    let outcome = fs.read(path).await?;
    match out {
        Some(file) => tokio::fs::write(&file, &outcome.content)
            .await
            .with_context(|| format!("failed to write {file:?}"))?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&outcome.content).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
