//! End-to-end resolution and staging against a real directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use linkstage_core::{
    BuildConfiguration, NativeLibraryDescriptor, PackageManifest, PlatformTarget, ResolveError,
    ResolveTarget, StagingError, StagingOperation,
};
use linkstage_runtime::LocalFileSystem;
use tempfile::{TempDir, tempdir};

/// `include/`, `include/opencv2/`, `Win64/{foo.lib, bar.dll, appsettings.json}`.
fn package() -> TempDir {
    let root = tempdir().unwrap();
    fs::create_dir_all(root.path().join("include").join("opencv2")).unwrap();
    let win64 = root.path().join("Win64");
    fs::create_dir_all(&win64).unwrap();
    fs::write(win64.join("foo.lib"), b"static").unwrap();
    fs::write(win64.join("bar.dll"), b"dynamic-v1").unwrap();
    fs::write(win64.join("appsettings.json"), br#"{"level":"info"}"#).unwrap();
    root
}

fn target(root: &Path, output: &Path, configuration: BuildConfiguration) -> ResolveTarget {
    ResolveTarget {
        platform: PlatformTarget::Win64,
        configuration,
        package_root: root.to_path_buf(),
        output_dir: output.to_path_buf(),
    }
}

fn file_names(paths: &[&Path]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn dir_listing(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let path = e.unwrap().path();
            (
                path.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read(&path).unwrap(),
            )
        })
        .collect();
    entries.sort();
    entries
}

#[test]
fn development_resolves_and_stages_binaries_and_settings() {
    let root = package();
    let out = tempdir().unwrap();
    let fs_port = LocalFileSystem::new();

    let resolved = NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), out.path(), BuildConfiguration::Development),
            &fs_port,
        )
        .unwrap();

    assert_eq!(
        resolved.include_paths.as_slice(),
        [
            root.path().join("include"),
            root.path().join("include").join("opencv2")
        ]
    );
    assert_eq!(file_names(&resolved.static_link_artifacts()), ["foo.lib"]);
    assert_eq!(file_names(&resolved.delay_load_artifacts()), ["bar.dll"]);
    let destinations: Vec<PathBuf> = resolved
        .staging
        .actions()
        .iter()
        .map(|a| a.destination.clone())
        .collect();
    assert_eq!(
        destinations,
        [out.path().join("bar.dll"), out.path().join("appsettings.json")]
    );

    resolved.staging.apply(&fs_port).unwrap();

    assert_eq!(
        dir_listing(out.path()),
        [
            ("appsettings.json".to_string(), br#"{"level":"info"}"#.to_vec()),
            ("bar.dll".to_string(), b"dynamic-v1".to_vec()),
        ]
    );
}

#[test]
fn unstaged_configuration_copies_only_settings() {
    let root = package();
    let out = tempdir().unwrap();
    let fs_port = LocalFileSystem::new();

    let resolved = NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), out.path(), BuildConfiguration::Test),
            &fs_port,
        )
        .unwrap();
    assert_eq!(file_names(&resolved.delay_load_artifacts()), ["bar.dll"]);

    resolved.staging.apply(&fs_port).unwrap();

    let names: Vec<_> = dir_listing(out.path()).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["appsettings.json"]);
}

#[test]
fn restaging_replaces_stale_copies() {
    let root = package();
    let out = tempdir().unwrap();
    let fs_port = LocalFileSystem::new();
    let descriptor = NativeLibraryDescriptor::default();
    let run_target = target(root.path(), out.path(), BuildConfiguration::Shipping);

    descriptor
        .resolve(&run_target, &fs_port)
        .unwrap()
        .staging
        .apply(&fs_port)
        .unwrap();
    let first = dir_listing(out.path());

    let report = descriptor
        .resolve(&run_target, &fs_port)
        .unwrap()
        .staging
        .apply(&fs_port)
        .unwrap();
    assert_eq!(report.replaced_count(), 2);
    assert_eq!(dir_listing(out.path()), first);

    // A new binary version replaces the previously staged one.
    fs::write(root.path().join("Win64").join("bar.dll"), b"dynamic-v2").unwrap();
    descriptor
        .resolve(&run_target, &fs_port)
        .unwrap()
        .staging
        .apply(&fs_port)
        .unwrap();
    assert_eq!(fs::read(out.path().join("bar.dll")).unwrap(), b"dynamic-v2");
    assert_eq!(dir_listing(out.path()).len(), 2);
}

#[test]
fn staging_creates_missing_output_directory() {
    let root = package();
    let out = tempdir().unwrap();
    let nested = out.path().join("Binaries").join("Win64");
    let fs_port = LocalFileSystem::new();

    NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), &nested, BuildConfiguration::DebugGame),
            &fs_port,
        )
        .unwrap()
        .staging
        .apply(&fs_port)
        .unwrap();

    assert!(nested.join("bar.dll").is_file());
}

#[test]
fn missing_settings_file_fails_before_touching_output() {
    let root = package();
    fs::remove_file(root.path().join("Win64").join("appsettings.json")).unwrap();
    let out = tempdir().unwrap();
    fs::write(out.path().join("bar.dll"), b"stale").unwrap();
    let fs_port = LocalFileSystem::new();

    let resolved = NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), out.path(), BuildConfiguration::Development),
            &fs_port,
        )
        .unwrap();
    let err = resolved.staging.apply(&fs_port).unwrap_err();

    assert!(matches!(
        err,
        StagingError::Io {
            operation: StagingOperation::Locate,
            ..
        }
    ));
    assert_eq!(fs::read(out.path().join("bar.dll")).unwrap(), b"stale");
}

#[test]
fn unsupported_platform_names_the_platform() {
    let root = package();
    let out = tempdir().unwrap();
    let mut linux = target(root.path(), out.path(), BuildConfiguration::Development);
    linux.platform = PlatformTarget::Linux;

    let err = NativeLibraryDescriptor::new(PackageManifest::default())
        .resolve(&linux, &LocalFileSystem::new())
        .unwrap_err();

    assert!(matches!(err, ResolveError::UnsupportedPlatform { .. }));
    assert_eq!(
        err.to_string(),
        "Linux is not supported by the IrisLibrary package"
    );
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn unstaged_configuration_removes_stale_binary_from_output() {
    let root = package();
    let out = tempdir().unwrap();
    fs::write(out.path().join("bar.dll"), b"stale").unwrap();
    let fs_port = LocalFileSystem::new();

    let resolved = NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), out.path(), BuildConfiguration::Debug),
            &fs_port,
        )
        .unwrap();
    assert!(resolved.staging.actions().iter().all(|a| !a.source.ends_with("bar.dll")));

    let report = resolved.staging.apply(&fs_port).unwrap();

    assert_eq!(report.removed, [out.path().join("bar.dll")]);
    let names: Vec<_> = dir_listing(out.path()).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["appsettings.json"]);
}

#[test]
fn output_dir_inside_package_keeps_package_intact() {
    let root = package();
    let win64 = root.path().join("Win64");
    let before = dir_listing(&win64);
    let fs_port = LocalFileSystem::new();

    for configuration in [BuildConfiguration::Development, BuildConfiguration::Debug] {
        let resolved = NativeLibraryDescriptor::default()
            .resolve(&target(root.path(), &win64, configuration), &fs_port)
            .unwrap();
        let err = resolved.staging.apply(&fs_port).unwrap_err();

        assert!(matches!(
            err,
            StagingError::Io {
                operation: StagingOperation::Locate,
                ..
            }
        ));
        assert_eq!(dir_listing(&win64), before, "{configuration}");
    }
}

#[test]
fn output_dir_reached_through_parent_components_is_detected() {
    let root = package();
    let roundabout = root.path().join("include").join("..").join("Win64");
    let fs_port = LocalFileSystem::new();

    let resolved = NativeLibraryDescriptor::default()
        .resolve(
            &target(root.path(), &roundabout, BuildConfiguration::Shipping),
            &fs_port,
        )
        .unwrap();

    assert!(resolved.staging.apply(&fs_port).is_err());
    assert_eq!(
        fs::read(root.path().join("Win64").join("bar.dll")).unwrap(),
        b"dynamic-v1"
    );
}
