use dupscan::duplicates::{DuplicateFinder, DuplicateReport, FinderConfig, ScanSummary};
use dupscan::scanner::{Blake3Hasher, DigestProvider, Sha256Hasher};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn scan_with<D: DigestProvider>(
    digester: D,
    config: FinderConfig,
    root: &Path,
) -> (Vec<DuplicateReport>, ScanSummary) {
    let mut reports = Vec::new();
    let mut finder = DuplicateFinder::new(digester, config);
    let summary = finder
        .scan(root, |report| {
            reports.push(report.clone());
            Ok(())
        })
        .unwrap();
    (reports, summary)
}

fn scan(root: &Path) -> (Vec<DuplicateReport>, ScanSummary) {
    scan_with(Sha256Hasher::new(), FinderConfig::default(), root)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (reports, summary) = scan(dir.path());

    assert!(reports.is_empty());
    assert_eq!(summary.files, 0);
    assert_eq!(summary.directories, 1);
    assert_eq!(summary.retained, 0);
}

#[test]
fn test_scan_example_tree() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"XXXXXXXXXX");
    write(&dir.path().join("b"), b"XXXXXXXXXX");
    write(&dir.path().join("c"), b"YYYYYYYYYY");
    write(&dir.path().join("d"), b"ZZZZZZZZZZZZZZZZZZZZ");

    let (reports, summary) = scan(dir.path());

    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].to_string(),
        format!(
            ">>> DUP file: {}. Original: {}.",
            dir.path().join("b").display(),
            dir.path().join("a").display()
        )
    );
    assert_eq!(reports[0].size, 10);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.retained, 3);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.duplicate_bytes, 10);
}

#[test]
fn test_scan_unique_sizes_never_hashed() {
    let dir = tempdir().unwrap();
    for i in 1..=20usize {
        write(&dir.path().join(format!("f{i:02}")), &vec![b'q'; i]);
    }

    let (reports, summary) = scan(dir.path());

    assert!(reports.is_empty());
    assert_eq!(summary.retained, 20);
    assert_eq!(summary.digests_computed, 0);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one"), b"content a");
    write(&dir.path().join("two"), b"content b");
    write(&dir.path().join("three"), b"content c");

    let (reports, summary) = scan(dir.path());

    assert!(reports.is_empty());
    assert_eq!(summary.retained, 3);
    assert_eq!(summary.digests_computed, 3);
}

#[test]
fn test_scan_many_copies_point_at_first() {
    let dir = tempdir().unwrap();
    for name in ["copy1", "copy2", "copy3", "copy4"] {
        write(&dir.path().join(name), b"the same bytes");
    }

    let (reports, summary) = scan(dir.path());

    let original = dir.path().join("copy1");
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.original == original));
    assert_eq!(
        reports.iter().map(|r| r.duplicate.clone()).collect::<Vec<_>>(),
        vec![
            dir.path().join("copy2"),
            dir.path().join("copy3"),
            dir.path().join("copy4")
        ]
    );
    assert_eq!(summary.retained, 1);
    assert_eq!(summary.reused_slots, 2);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();

    write(&dir.path().join("a.txt"), b"shared content");
    write(&deeper.join("z.txt"), b"shared content");
    write(&sub.join("m.txt"), b"unique content!");

    let (reports, summary) = scan(dir.path());

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].duplicate, deeper.join("z.txt"));
    assert_eq!(reports[0].original, dir.path().join("a.txt"));
    assert_eq!(summary.directories, 3);
}

#[test]
fn test_scan_skips_empty_files() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();
    write(&dir.path().join("full"), b"data");

    let (reports, summary) = scan(dir.path());

    assert!(reports.is_empty());
    assert_eq!(summary.files, 3);
    assert_eq!(summary.empty_files, 2);
    assert_eq!(summary.retained, 1);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write(&dir.path().join("x1"), b"alpha");
    write(&dir.path().join("x2"), b"alpha");
    write(&sub.join("y1"), b"bravo");
    write(&sub.join("y2"), b"alpha");
    write(&sub.join("y3"), b"bravo");

    let (first, _) = scan(dir.path());
    let (second, _) = scan(dir.path());

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_blake3_and_sha256_agree_on_duplicates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"1234567890");
    write(&dir.path().join("b"), b"1234567890");
    write(&dir.path().join("c"), b"0987654321");

    let (sha, _) = scan(dir.path());
    let (b3, _) = scan_with(Blake3Hasher::new(), FinderConfig::default(), dir.path());

    assert_eq!(sha, b3);
    assert_eq!(sha.len(), 1);
}

#[test]
fn test_single_bucket_index_still_correct() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"short");
    write(&dir.path().join("b"), b"a little longer");
    write(&dir.path().join("c"), b"short");
    write(&dir.path().join("d"), b"a little longer");

    let (reports, summary) = scan_with(
        Sha256Hasher::new(),
        FinderConfig::default().with_buckets(1),
        dir.path(),
    );

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].original, dir.path().join("a"));
    assert_eq!(reports[1].original, dir.path().join("b"));
    assert_eq!(summary.retained, 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_ignored() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"linked content");
    std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("b_link")).unwrap();

    let (reports, summary) = scan(dir.path());

    assert!(reports.is_empty());
    assert_eq!(summary.symlinks, 1);
    assert_eq!(summary.files, 1);
}

#[test]
fn test_dry_run_reports_the_same() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"same");
    write(&dir.path().join("b"), b"same");

    let (normal, _) = scan(dir.path());
    let (dry, _) = scan_with(
        Sha256Hasher::new(),
        FinderConfig::default().with_dry_run(true),
        dir.path(),
    );

    assert_eq!(normal, dry);
    assert!(dir.path().join("b").exists());
}
