//! Queries answered by a real Go toolchain
//!
//! Each test returns early when `go` is not on PATH.

use pkgcache::{Cache, GoToolchain, SizeResult};
use tempfile::TempDir;

fn go_available() -> bool {
    let available = GoToolchain::default().is_available();
    if !available {
        eprintln!("go not found, skipping");
    }
    available
}

#[test]
fn list_standard_packages() {
    if !go_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let cache = Cache::make("xyz", "def", temp.path().join("cachedir"), 3).unwrap();

    let unsafe_pkg = cache.list("unsafe").unwrap();
    assert!(unsafe_pkg.standard);
    assert_eq!(unsafe_pkg.import_path, "unsafe");

    let io = cache.list("io").unwrap();
    assert!(io.standard);
    assert_eq!(io.import_path, "io");
    assert!(io.imports.iter().any(|i| i == "sync"));
    assert!(io.imports.iter().any(|i| i == "errors"));

    assert_eq!(cache.list("unsafe").unwrap(), unsafe_pkg);
    assert!(temp.path().join("cachedir").join("io.list").is_file());
}

#[test]
fn size_of_standard_packages() {
    if !go_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let cache = Cache::make("qrs", "abc", temp.path().join("cachedir"), 3).unwrap();

    assert_eq!(cache.size("unsafe").unwrap(), SizeResult { size: 1, num_funcs: 0 });

    let io = cache.size("io").unwrap();
    assert!(io.size > 0);
    assert!(io.num_funcs > 0);
    assert_eq!(cache.size("io").unwrap(), io);
    let leftovers = std::fs::read_dir(temp.path().join("cachedir"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "archive"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn unknown_package_fails_without_caching() {
    if !go_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("cachedir");
    let cache = Cache::make("xyz", "def", &root, 0).unwrap();

    let err = cache.size("example.invalid/does/not/exist").unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(cache.store().entry_count().unwrap(), 0);
}
