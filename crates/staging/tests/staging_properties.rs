use std::collections::BTreeMap;
use std::path::Path;

use framestage_asset_bundle::{DirBundle, MemoryBundle};
use framestage_staging::{CopyOutcome, StagingCopier, StagingTarget, StorageLayout};
use proptest::prelude::*;

fn write_bundle(root: &Path, files: &[(&str, Vec<u8>)]) {
    let images = root.join("images");
    std::fs::create_dir_all(&images).unwrap();
    for (name, bytes) in files {
        std::fs::write(images.join(name), bytes).unwrap();
    }
}

fn dir_contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().into_string().unwrap(),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn stages_example_bundle_into_fresh_layout() {
    let bundle_dir = tempfile::tempdir().unwrap();
    let storage = tempfile::tempdir().unwrap();
    let a: Vec<u8> = (0..100u8).collect();
    write_bundle(bundle_dir.path(), &[("a.png", a.clone()), ("b.png", Vec::new())]);

    let layout = StorageLayout::new(storage.path(), "Download", "images").unwrap();
    let staging_dir = layout.staging_dir();
    assert!(!staging_dir.exists());

    let bundle = DirBundle::new(bundle_dir.path());
    let mut target = StagingTarget::new(&staging_dir);
    let report = StagingCopier::new(&bundle)
        .stage_root("images", &mut target)
        .unwrap();

    assert!(staging_dir.is_dir());
    assert_eq!(report.copied(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(std::fs::read(staging_dir.join("a.png")).unwrap(), a);
    assert_eq!(std::fs::metadata(staging_dir.join("b.png")).unwrap().len(), 0);
    assert_eq!(
        report.entries()[1].outcome,
        CopyOutcome::Copied { bytes: 0 }
    );
}

#[test]
fn restaging_leaves_unrelated_files_alone() {
    let storage = tempfile::tempdir().unwrap();
    let staging_dir = storage.path().join("Download").join("images");
    std::fs::create_dir_all(&staging_dir).unwrap();
    std::fs::write(staging_dir.join("notes.txt"), b"keep me").unwrap();
    std::fs::write(staging_dir.join("a.png"), vec![0xFFu8; 4096]).unwrap();

    let bundle = MemoryBundle::new().with("images/a.png", vec![1u8, 2, 3]);
    let mut target = StagingTarget::new(&staging_dir);
    StagingCopier::new(&bundle)
        .stage_root("images", &mut target)
        .unwrap();

    let contents = dir_contents(&staging_dir);
    assert_eq!(contents["notes.txt"], b"keep me".to_vec());
    // Overwritten in place, not appended to.
    assert_eq!(contents["a.png"], vec![1u8, 2, 3]);
}

#[test]
fn missing_source_root_still_prepares_directory() {
    let bundle_dir = tempfile::tempdir().unwrap();
    let storage = tempfile::tempdir().unwrap();
    let staging_dir = storage.path().join("images");

    let bundle = DirBundle::new(bundle_dir.path());
    let mut target = StagingTarget::new(&staging_dir);
    let report = StagingCopier::new(&bundle)
        .stage_root("does-not-exist", &mut target)
        .unwrap();

    assert!(report.entries().is_empty());
    assert!(staging_dir.is_dir());
}

fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(
        "[a-z]{1,8}\\.(png|jpg)",
        prop::collection::vec(any::<u8>(), 0..3000),
        0..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn staged_bytes_match_source(files in file_set(), buffer_size in 1usize..2048) {
        let storage = tempfile::tempdir().unwrap();
        let mut bundle = MemoryBundle::new();
        for (name, bytes) in &files {
            bundle.insert(format!("images/{name}"), bytes.clone());
        }

        let mut target = StagingTarget::new(storage.path().join("images"));
        let report = StagingCopier::new(&bundle)
            .with_buffer_size(buffer_size)
            .stage_root("images", &mut target)
            .unwrap();

        prop_assert_eq!(report.copied(), files.len());
        prop_assert_eq!(dir_contents(target.dir()), files);
    }

    #[test]
    fn staging_twice_is_idempotent(files in file_set()) {
        let storage = tempfile::tempdir().unwrap();
        let mut bundle = MemoryBundle::new();
        for (name, bytes) in &files {
            bundle.insert(format!("images/{name}"), bytes.clone());
        }
        let copier = StagingCopier::new(&bundle);

        let mut first = StagingTarget::new(storage.path().join("images"));
        copier.stage_root("images", &mut first).unwrap();
        let after_first = dir_contents(first.dir());

        let mut second = StagingTarget::new(storage.path().join("images"));
        copier.stage_root("images", &mut second).unwrap();
        let after_second = dir_contents(second.dir());

        prop_assert_eq!(&after_first, &after_second);
        prop_assert_eq!(after_second, files);
    }
}
