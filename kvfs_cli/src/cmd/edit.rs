use anyhow::Result;
use kvfs::ScopedFs;

pub async fn run_mkdir(fs: &ScopedFs, path: &str, parents: bool) -> Result<()> {
    let outcome = if parents {
        fs.mkdir_all(path).await?
    } else {
        fs.mkdir(path).await?
    };
    println!("created {}", outcome.path);
    Ok(())
}

pub async fn run_rm(fs: &ScopedFs, path: &str) -> Result<()> {
    let outcome = fs.delete(path).await?;
    if outcome.removed > 0 {
        println!("deleted {} and {} entries below it", outcome.path, outcome.removed);
    } else {
        println!("deleted {}", outcome.path);
    }
    Ok(())
}

pub async fn run_cp(fs: &ScopedFs, src: &str, dest: &str) -> Result<()> {
    let outcome = fs.copy(src, dest).await?;
    println!("copied {} -> {}", outcome.from, outcome.to);
    Ok(())
}

pub async fn run_mv(fs: &ScopedFs, src: &str, dest: &str) -> Result<()> {
    let outcome = fs.r#move(src, dest).await?;
    println!("moved {} -> {}", outcome.from, outcome.to);
    Ok(())
}
