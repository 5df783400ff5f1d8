//! Extension directory synchronization behavior.

mod common;

use common::{listing, read_entry, write_mod, write_oversized_entry, write_zip};
use mod_deployer::deployer::{
    ArchiveTransformer, Deployer, FailureStage, Mappings, RemappingTransformer, SkipReason,
    read_extension_name,
};
use mod_deployer::source::{ModSource, ModSources};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Fails for one source file name and copies everything else.
struct FailingFor(&'static str);

impl ArchiveTransformer for FailingFor {
    fn describe(&self) -> &'static str {
        "failing"
    }

    fn transform(&self, source: &Path, destination: &Path) -> io::Result<()> {
        if source.file_name().is_some_and(|n| n == self.0) {
            return Err(io::Error::other("simulated transform failure"));
        }
        fs::copy(source, destination).map(|_| ())
    }
}

#[test]
fn deploys_into_missing_nested_directory() {
    let tmp = TempDir::new().unwrap();
    let source = write_mod(&tmp.path().join("build/foo.jar"), "Foo", "v1");
    let target = tmp.path().join("run/mods");

    let report = Deployer::new(&target).deploy(&[source]);

    assert!(report.is_success());
    assert_eq!(report.deployed_names(), vec!["Foo"]);
    assert_eq!(listing(&target), vec!["foo.jar"]);
    assert_eq!(report.deployed[0].sha256.len(), 64);
    assert_eq!(
        report.deployed[0].size,
        fs::metadata(target.join("foo.jar")).unwrap().len()
    );
}

#[test]
fn deploying_twice_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let a = write_mod(&tmp.path().join("build/a.jar"), "A", "a");
    let b = write_mod(&tmp.path().join("build/b.jar"), "B", "b");
    let target = tmp.path().join("mods");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("notes.txt"), "keep").unwrap();

    let deployer = Deployer::new(&target);
    let first = deployer.deploy(&[a.clone(), b.clone()]);
    let after_first = listing(&target);
    let second = deployer.deploy(&[a, b]);

    assert!(first.is_success() && second.is_success());
    assert_eq!(listing(&target), after_first);
    assert_eq!(after_first, vec!["a.jar", "b.jar", "notes.txt"]);
    assert_eq!(
        first.deployed.iter().map(|d| &d.sha256).collect::<Vec<_>>(),
        second.deployed.iter().map(|d| &d.sha256).collect::<Vec<_>>()
    );
    // The second run replaced the previous copies by name
    assert_eq!(second.removed.len(), 2);
}

#[test]
fn replaces_older_copy_by_logical_name() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    write_mod(&target.join("old.jar"), "Foo", "old content");
    write_mod(&target.join("other.jar"), "Bar", "unrelated");
    let source = write_mod(&tmp.path().join("build/new.jar"), "Foo", "new content");

    let report = Deployer::new(&target).deploy(&[source]);

    assert!(report.is_success());
    assert_eq!(listing(&target), vec!["new.jar", "other.jar"]);
    assert_eq!(read_entry(&target.join("new.jar"), "payload.txt"), "new content");
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].name, "Foo");
    assert_eq!(report.removed[0].path, target.join("old.jar"));
}

#[test]
fn excludes_invalid_archives_without_aborting() {
    let tmp = TempDir::new().unwrap();
    let build = tmp.path().join("build");
    let plain = build.join("library.jar");
    write_zip(&plain, &[("com/example/Lib.class", b"\xca\xfe\xba\xbe")]);
    let text = build.join("readme.jar");
    fs::write(&text, "not a zip").unwrap();
    let broken = build.join("broken.jar");
    write_zip(&broken, &[("extension.json", b"{not json")]);
    let good = write_mod(&build.join("good.jar"), "Good", "ok");
    let target = tmp.path().join("mods");

    let report = Deployer::new(&target).deploy(&[plain.clone(), text.clone(), broken.clone(), good]);

    assert!(report.is_success());
    assert_eq!(listing(&target), vec!["good.jar"]);
    assert_eq!(report.skipped.len(), 3);
    assert_eq!(report.skipped[0].path, plain);
    assert_eq!(report.skipped[0].reason, SkipReason::NotAMod);
    assert!(matches!(report.skipped[1].reason, SkipReason::InvalidManifest(_)));
    assert!(matches!(report.skipped[2].reason, SkipReason::InvalidManifest(_)));
}

#[test]
fn scan_is_not_recursive_and_ignores_other_files() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    // Same logical name, but inside a subdirectory or without the .jar suffix
    write_mod(&target.join("nested/foo.jar"), "Foo", "nested");
    write_mod(&target.join("foo.zip"), "Foo", "zip");
    write_mod(&target.join("FOO.JAR"), "Foo", "upper");
    fs::create_dir_all(target.join("folder.jar")).unwrap();
    let source = write_mod(&tmp.path().join("build/foo-2.jar"), "Foo", "new");

    let report = Deployer::new(&target).deploy(&[source]);

    assert!(report.is_success());
    assert!(report.removed.is_empty());
    assert_eq!(
        listing(&target),
        vec!["FOO.JAR", "folder.jar/", "foo-2.jar", "foo.zip", "nested/"]
    );
    assert_eq!(listing(&target.join("nested")), vec!["foo.jar"]);
}

#[test]
fn keeps_deployed_jar_with_unreadable_manifest() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    write_zip(&target.join("corrupt.jar"), &[("extension.json", b"[1, 2")]);
    let source = write_mod(&tmp.path().join("build/foo.jar"), "Foo", "v1");

    let report = Deployer::new(&target).deploy(&[source]);

    assert!(report.is_success());
    assert_eq!(listing(&target), vec!["corrupt.jar", "foo.jar"]);
}

#[test]
fn duplicate_sources_deploy_once() {
    let tmp = TempDir::new().unwrap();
    let build = tmp.path().join("build");
    write_mod(&build.join("foo.jar"), "Foo", "v1");
    let target = tmp.path().join("mods");

    let mut sources = ModSources::new(tmp.path());
    sources
        .add(ModSource::parse("build/foo.jar").unwrap())
        .add(ModSource::parse("artifact:./build/foo.jar").unwrap())
        .add(ModSource::parse("task:build/foo.jar").unwrap())
        .add(ModSource::parse("build/*.jar").unwrap());
    let paths = sources.paths().unwrap();
    assert_eq!(paths, vec![build.join("foo.jar")]);

    let report = Deployer::new(&target).deploy(&paths);
    assert_eq!(report.deployed.len(), 1);
    assert_eq!(listing(&target), vec!["foo.jar"]);
}

#[test]
fn missing_sources_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("build/never-built.jar");
    let present = write_mod(&tmp.path().join("build/foo.jar"), "Foo", "v1");
    let target = tmp.path().join("mods");

    let report = Deployer::new(&target).deploy(&[missing.clone(), present]);

    assert!(report.is_success());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, missing);
    assert_eq!(report.skipped[0].reason, SkipReason::Missing);
    assert_eq!(listing(&target), vec!["foo.jar"]);
}

#[test]
fn transform_failure_is_isolated_per_mod() {
    let tmp = TempDir::new().unwrap();
    let a = write_mod(&tmp.path().join("build/a.jar"), "A", "a");
    let b = write_mod(&tmp.path().join("build/b.jar"), "B", "b");
    let c = write_mod(&tmp.path().join("build/c.jar"), "C", "c");
    let target = tmp.path().join("mods");

    let report = Deployer::new(&target)
        .with_transformer(Box::new(FailingFor("b.jar")))
        .deploy(&[a, b.clone(), c]);

    assert!(!report.is_success());
    assert_eq!(report.deployed_names(), vec!["A", "C"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, b);
    assert_eq!(report.failures[0].stage, FailureStage::Transform);
    assert!(report.failures[0].message.contains("simulated"));
    assert_eq!(listing(&target), vec!["a.jar", "c.jar"]);
}

#[test]
fn source_without_file_name_uses_fallback() {
    let deployer = Deployer::new("/game/mods");
    assert_eq!(
        deployer.destination_for(Path::new("/")),
        PathBuf::from("/game/mods/extension.jar")
    );
    assert_eq!(
        deployer.destination_for(Path::new("/build/libs/x.jar")),
        PathBuf::from("/game/mods/x.jar")
    );
}

#[test]
fn plan_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    write_mod(&target.join("old.jar"), "Foo", "old");
    let source = write_mod(&tmp.path().join("build/new.jar"), "Foo", "new");

    let plan = Deployer::new(&target).plan(&[source.clone()]);

    assert_eq!(plan.mods.len(), 1);
    assert_eq!(plan.mods[0].destination, target.join("new.jar"));
    assert_eq!(plan.stale.len(), 1);
    assert_eq!(listing(&target), vec!["old.jar"]);

    let report = plan.into_report();
    assert!(report.dry_run);
    assert_eq!(report.deployed_names(), vec!["Foo"]);
    assert_eq!(report.removed[0].path, target.join("old.jar"));
}

#[test]
fn plan_against_missing_target_does_not_create_it() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    let source = write_mod(&tmp.path().join("build/new.jar"), "Foo", "new");

    let plan = Deployer::new(&target).plan(&[source]);

    assert_eq!(plan.mods.len(), 1);
    assert!(plan.stale.is_empty());
    assert!(!target.exists());
}

#[test]
fn empty_source_list_deploys_nothing() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    write_mod(&target.join("old.jar"), "Foo", "old");

    let sources = ModSources::new(tmp.path());
    let report = Deployer::new(&target).deploy(&sources.paths().unwrap());

    assert!(report.is_success());
    assert!(report.deployed.is_empty());
    assert_eq!(listing(&target), vec!["old.jar"]);
}

const HUGE: u64 = 1 << 62;

#[test]
fn oversized_manifest_header_is_a_read_error() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("corrupt.jar");
    write_oversized_entry(&jar, "extension.json", br#"{"name": "Corrupt"}"#, HUGE);

    assert!(read_extension_name(&jar).is_err());
}

#[test]
fn oversized_header_in_target_does_not_stop_deploy() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("mods");
    write_oversized_entry(
        &target.join("corrupt.jar"),
        "extension.json",
        br#"{"name": "Corrupt"}"#,
        HUGE,
    );
    let source = write_mod(&tmp.path().join("build/foo.jar"), "Foo", "v1");

    let report = Deployer::new(&target).deploy(&[source]);

    assert!(report.is_success());
    assert_eq!(report.deployed_names(), vec!["Foo"]);
    assert_eq!(listing(&target), vec!["corrupt.jar", "foo.jar"]);
}

#[test]
fn oversized_header_source_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let corrupt = tmp.path().join("build/corrupt.jar");
    write_oversized_entry(&corrupt, "extension.json", br#"{"name": "Foo"}"#, HUGE);
    let good = write_mod(&tmp.path().join("build/good.jar"), "Good", "ok");
    let target = tmp.path().join("mods");

    let report = Deployer::new(&target).deploy(&[corrupt.clone(), good]);

    assert_eq!(report.deployed_names(), vec!["Good"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, corrupt);
    assert!(matches!(report.skipped[0].reason, SkipReason::InvalidManifest(_)));
}

#[test]
fn remapping_oversized_entry_fails_cleanly() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("corrupt.jar");
    write_oversized_entry(&source, "payload.bin", b"payload", HUGE);
    let dest = tmp.path().join("out.jar");

    let result = RemappingTransformer::new(None, Mappings::new()).transform(&source, &dest);

    assert!(result.is_err());
}
