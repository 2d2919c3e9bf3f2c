//! Cache behavior against a counting fake toolchain

use pkgcache::cache::TOKEN_FILE;
use pkgcache::{Cache, EntryKind, PkgCacheError, PkgCacheResult, SizeResult, Toolchain};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct Calls {
    list: AtomicUsize,
    build: AtomicUsize,
    symbols: AtomicUsize,
}

impl Calls {
    fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    fn build(&self) -> usize {
        self.build.load(Ordering::SeqCst)
    }
}

/// Deterministic toolchain whose answers depend only on the identifier
#[derive(Default)]
struct FakeToolchain {
    calls: Arc<Calls>,
    failing: Arc<AtomicBool>,
    inspect_failing: Arc<AtomicBool>,
    garbage: bool,
    /// Hold the built artifact for 200ms times the build's ordinal
    slow_builds: bool,
}

impl Toolchain for FakeToolchain {
    fn list(&self, identifier: &str) -> PkgCacheResult<Vec<u8>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PkgCacheError::ListFailed {
                identifier: identifier.to_string(),
                reason: "exit status 1".to_string(),
            });
        }
        if self.garbage {
            return Ok(b"<html>".to_vec());
        }

        let standard = !identifier.contains('.');
        Ok(format!(
            r#"{{"ImportPath": "{}", "Standard": {}, "Root": "/goroot", "Imports": ["sync", "errors"]}}"#,
            identifier, standard
        )
        .into_bytes())
    }

    fn build(&self, identifier: &str, output: &Path) -> PkgCacheResult<()> {
        let ordinal = self.calls.build.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(PkgCacheError::BuildFailed {
                identifier: identifier.to_string(),
                output: "cannot find package".to_string(),
            });
        }
        fs::write(output, vec![7u8; 100 + identifier.len()])
            .map_err(|e| PkgCacheError::io("fake build", e))?;
        if self.slow_builds {
            thread::sleep(Duration::from_millis(200 * ordinal));
        }
        Ok(())
    }

    fn symbols(&self, artifact: &Path) -> PkgCacheResult<String> {
        self.calls.symbols.fetch_add(1, Ordering::SeqCst);
        if self.inspect_failing.load(Ordering::SeqCst) {
            return Err(PkgCacheError::InspectFailed {
                artifact: artifact.to_path_buf(),
                reason: "not an object file".to_string(),
            });
        }
        Ok(" 100 T pkg.A\n 200 T pkg.B\n 300 T pkg.C\n 400 D pkg.x\n".to_string())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Scratch artifacts left in a cache root
fn scratch_files(root: &Path) -> Vec<PathBuf> {
    fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "archive"))
        .collect()
}

struct Harness {
    _temp: TempDir,
    root: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cachedir");
        Self { _temp: temp, root }
    }

    fn open(&self, tree_hash: &str, toolchain: FakeToolchain) -> Cache {
        Cache::with_toolchain(tree_hash, "def", &self.root, 3, Box::new(toolchain)).unwrap()
    }

    /// Open with a fresh fake, returning its call counters
    fn open_counting(&self, tree_hash: &str) -> (Cache, Arc<Calls>) {
        let fake = FakeToolchain::default();
        let calls = Arc::clone(&fake.calls);
        (self.open(tree_hash, fake), calls)
    }
}

#[test]
fn list_scenario() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("xyz");

    let unsafe_pkg = cache.list("unsafe").unwrap();
    assert!(unsafe_pkg.standard);
    assert_eq!(unsafe_pkg.import_path, "unsafe");

    let io = cache.list("io").unwrap();
    assert!(io.standard);
    assert_eq!(io.import_path, "io");
    assert_eq!(io.imports, vec!["sync", "errors"]);

    let again = cache.list("unsafe").unwrap();
    assert_eq!(again, unsafe_pkg);
    assert_eq!(calls.list(), 2);
}

#[test]
fn size_scenario() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("qrs");

    assert_eq!(cache.size("unsafe").unwrap(), SizeResult { size: 1, num_funcs: 0 });
    assert_eq!(calls.build(), 0);

    let io = cache.size("io").unwrap();
    assert_eq!(io, SizeResult { size: 102, num_funcs: 3 });

    assert_eq!(cache.size("io").unwrap(), io);
    assert_eq!(calls.build(), 1);
    assert_eq!(calls.symbols.load(Ordering::SeqCst), 1);
}

#[test]
fn disk_hit_in_new_instance() {
    let h = Harness::new();
    let (first, _) = h.open_counting("xyz");
    let pkg = first.list("golang.org/x/tools").unwrap();
    let size = first.size("golang.org/x/tools").unwrap();
    drop(first);

    let (second, calls) = h.open_counting("xyz");
    assert_eq!(second.list("golang.org/x/tools").unwrap(), pkg);
    assert_eq!(second.size("golang.org/x/tools").unwrap(), size);
    assert_eq!(calls.list(), 0);
    assert_eq!(calls.build(), 0);
    assert!(h.root.join("golang.org%x%tools.list").is_file());
}

#[test]
fn changed_hashes_recompute() {
    let h = Harness::new();
    let (first, _) = h.open_counting("xyz");
    first.list("io").unwrap();
    first.size("io").unwrap();
    drop(first);

    let (second, calls) = h.open_counting("abc");
    assert!(!h.root.join("io.list").exists());
    assert!(!h.root.join("io.build").exists());

    second.list("io").unwrap();
    second.size("io").unwrap();
    assert_eq!(calls.list(), 1);
    assert_eq!(calls.build(), 1);
    assert_eq!(fs::read_to_string(h.root.join(TOKEN_FILE)).unwrap(), "abc def\n");
}

#[test]
fn token_replaced_underneath_wipes_on_next_miss() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("xyz");
    cache.list("io").unwrap();
    cache.list("fmt").unwrap();

    fs::write(h.root.join(TOKEN_FILE), "other hashes\n").unwrap();

    // Memoized results are still served without touching disk
    cache.list("io").unwrap();
    assert_eq!(calls.list(), 2);

    // A miss revalidates, wiping the store before computing
    cache.list("os").unwrap();
    assert_eq!(calls.list(), 3);
    assert!(!h.root.join("fmt.list").exists());
    assert!(h.root.join("os.list").exists());
    assert_eq!(fs::read_to_string(h.root.join(TOKEN_FILE)).unwrap(), "xyz def\n");
}

#[test]
fn written_entries_skip_toolchain() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("xyz");

    cache
        .write_cache_entry(
            "example.com/m",
            EntryKind::List,
            br#"{"ImportPath": "example.com/m", "Imports": ["fmt"]}"#,
        )
        .unwrap();
    cache
        .write_cache_entry("example.com/m", EntryKind::Build, b"5000 42\n")
        .unwrap();

    let pkg = cache.list("example.com/m").unwrap();
    assert!(!pkg.standard);
    assert_eq!(pkg.imports, vec!["fmt"]);
    assert_eq!(
        cache.size("example.com/m").unwrap(),
        SizeResult { size: 5000, num_funcs: 42 }
    );
    assert_eq!(calls.list(), 0);
    assert_eq!(calls.build(), 0);
}

#[test]
fn malformed_entries_are_decode_errors() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("xyz");

    cache.write_cache_entry("io", EntryKind::List, b"{truncated").unwrap();
    cache.write_cache_entry("io", EntryKind::Build, b"12\n").unwrap();

    assert!(matches!(cache.list("io"), Err(PkgCacheError::Decode { .. })));
    assert!(matches!(cache.size("io"), Err(PkgCacheError::Decode { .. })));

    // Still an error on retry; never silently refetched
    assert!(cache.size("io").is_err());
    assert_eq!(calls.list(), 0);
    assert_eq!(calls.build(), 0);
}

#[test]
fn undecodable_toolchain_output_is_not_cached() {
    let h = Harness::new();
    let fake = FakeToolchain {
        garbage: true,
        ..FakeToolchain::default()
    };
    let cache = h.open("xyz", fake);

    let err = cache.list("io").unwrap_err();
    assert!(matches!(err, PkgCacheError::Decode { .. }));
    assert!(!h.root.join("io.list").exists());
}

#[test]
fn toolchain_failure_caches_nothing() {
    let h = Harness::new();
    let fake = FakeToolchain::default();
    let calls = Arc::clone(&fake.calls);
    let failing = Arc::clone(&fake.failing);
    failing.store(true, Ordering::SeqCst);
    let cache = h.open("xyz", fake);

    let list_err = cache.list("io").unwrap_err();
    assert!(list_err.is_retryable());
    assert!(list_err.to_string().contains("io"));

    let size_err = cache.size("io").unwrap_err();
    assert!(matches!(size_err, PkgCacheError::BuildFailed { .. }));
    assert!(!h.root.join("io.list").exists());
    assert!(!h.root.join("io.build").exists());
    assert!(scratch_files(&h.root).is_empty());

    failing.store(false, Ordering::SeqCst);
    assert_eq!(cache.list("io").unwrap().import_path, "io");
    assert_eq!(cache.size("io").unwrap().num_funcs, 3);
    assert_eq!(calls.list(), 2);
    assert_eq!(calls.build(), 2);
}

#[test]
fn inspection_failure_removes_artifact_and_caches_nothing() {
    let h = Harness::new();
    let fake = FakeToolchain::default();
    let calls = Arc::clone(&fake.calls);
    let inspect_failing = Arc::clone(&fake.inspect_failing);
    inspect_failing.store(true, Ordering::SeqCst);
    let cache = h.open("xyz", fake);

    let err = cache.size("io").unwrap_err();
    assert!(matches!(err, PkgCacheError::InspectFailed { .. }));
    assert!(err.is_retryable());
    assert!(scratch_files(&h.root).is_empty());
    assert!(!h.root.join("io.build").exists());

    inspect_failing.store(false, Ordering::SeqCst);
    assert_eq!(cache.size("io").unwrap(), SizeResult { size: 102, num_funcs: 3 });
    assert_eq!(calls.build(), 2);
    assert!(scratch_files(&h.root).is_empty());
    assert!(h.root.join("io.build").is_file());
}

#[test]
fn overlapping_measurements_of_one_package_both_succeed() {
    let h = Harness::new();
    let fake = FakeToolchain {
        slow_builds: true,
        ..FakeToolchain::default()
    };
    let calls = Arc::clone(&fake.calls);
    let cache = h.open("xyz", fake);

    // The second miss starts while the first build's artifact is still held
    let (first, second) = thread::scope(|s| {
        let first = s.spawn(|| cache.size("io"));
        thread::sleep(Duration::from_millis(50));
        let second = s.spawn(|| cache.size("io"));
        (first.join().unwrap(), second.join().unwrap())
    });

    let expected = SizeResult { size: 102, num_funcs: 3 };
    assert_eq!(first.unwrap(), expected);
    assert_eq!(second.unwrap(), expected);
    assert_eq!(calls.build(), 2);
    assert!(scratch_files(&h.root).is_empty());
}

#[test]
fn concurrent_queries_converge() {
    let h = Harness::new();
    let (cache, calls) = h.open_counting("xyz");
    let ids = ["io", "fmt", "net/http", "golang.org/x/sync"];

    let results: Vec<Vec<(String, SizeResult)>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    ids.iter()
                        .map(|id| {
                            let pkg = cache.list(id).unwrap();
                            (pkg.import_path.clone(), cache.size(id).unwrap())
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for per_thread in &results {
        assert_eq!(per_thread, &results[0]);
    }
    for (id, (path, size)) in ids.iter().zip(&results[0]) {
        assert_eq!(path, id);
        assert_eq!(size.size, 100 + id.len() as u64);
    }

    // Duplicate work is allowed, but every identifier was computed at least once
    assert!(calls.list() >= ids.len());
    assert!(calls.build() >= ids.len());

    let (reopened, fresh) = h.open_counting("xyz");
    for id in ids {
        reopened.size(id).unwrap();
    }
    assert_eq!(fresh.build(), 0);
}
