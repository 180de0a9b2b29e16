use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use kvfs::{FsConfig, KvFs, ScopedFs};
use kvfs_store_memory::MemoryStore;

async fn create_fs_with_files(file_count: usize) -> kvfs::FsResult<ScopedFs> {
    let fs = KvFs::new(Arc::new(MemoryStore::new()), FsConfig::default()).scope("bench");
    for i in 0..file_count {
        let path = format!("/dir_{}/file_{}.bin", i / 1000, i);
        fs.write(&path, &b"x"[..]).await?;
    }
    Ok(fs)
}

fn bench_write(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;

    c.bench_function("kvfs_write_1k_files", |b| {
        b.iter(|| {
            rt_handle.block_on(async {
                let _ = create_fs_with_files(1_000).await.unwrap();
            });
        });
    });
}

fn bench_list(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;

    // Pre-populate a filesystem and then benchmark listing it.
    let fs = rt_handle.block_on(async { create_fs_with_files(5_000).await.unwrap() });

    c.bench_function("kvfs_list_root_5k_entries", |b| {
        b.iter(|| {
            rt_handle.block_on(async {
                let _children = fs.list("/").await.unwrap();
            });
        });
    });
}

fn bench_copy_tree(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;

    let fs = rt_handle.block_on(async { create_fs_with_files(1_000).await.unwrap() });

    c.bench_function("kvfs_copy_then_delete_1k_subtree", |b| {
        b.iter(|| {
            rt_handle.block_on(async {
                fs.copy("/dir_0/", "/copy/").await.unwrap();
                fs.delete("/copy/").await.unwrap();
            });
        });
    });
}

criterion_group!(kvfs_ops, bench_write, bench_list, bench_copy_tree);
criterion_main!(kvfs_ops);
