use cutekit_deps::manifest::{ManifestReader, ManifestSource};
use cutekit_deps::resolver::ResolvedDependency;
use serde_json::json;

use crate::common::{ProjectFixture, git, git_tag};

fn ids(deps: &[ResolvedDependency]) -> Vec<&str> {
    deps.iter().map(|dep| dep.id.as_str()).collect()
}

#[test]
fn test_resolved_and_missing_externs() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(
        root,
        &[("libx", git_tag("https://git/libx", "v1.0")), ("liby", git("https://git/liby"))],
    )
    .unwrap();
    let libx = ProjectFixture::create_extern_cache(root, "libx").unwrap();

    let deps = fixture.collector().collect(root);

    assert_eq!(ids(&deps), vec!["libx", "liby"]);
    assert_eq!(deps[0].content_root.as_deref(), Some(libx.as_path()));
    assert_eq!(deps[0].pin(), Some("v1.0"));
    assert_eq!(deps[0].origin, root);
    assert_eq!(deps[1].content_root, None);
}

#[test]
fn test_lockfile_preferred_over_manifest() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("from-lock", git("https://l"))]).unwrap();
    ProjectFixture::write_manifest(root, &[("from-manifest", git("https://m"))]).unwrap();

    let read = ManifestReader::new().read_detailed(root);
    assert_eq!(read.source, ManifestSource::Lockfile);
    assert_eq!(ids(&fixture.collector().collect(root)), vec!["from-lock"]);
}

#[test]
fn test_malformed_lockfile_falls_back_to_manifest() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    fixture.write_file("project.lock", "{ broken").unwrap();
    ProjectFixture::write_manifest(root, &[("from-manifest", git("https://m"))]).unwrap();

    let read = ManifestReader::new().read_detailed(root);
    assert_eq!(read.source, ManifestSource::Manifest);
    assert_eq!(read.problems.len(), 1);
    assert_eq!(read.externs[0].id, "from-manifest");
}

#[test]
fn test_transitive_externs_through_checkouts() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("liba", git("https://a"))]).unwrap();

    // liba lives in the global cache and declares libb, found in its own cache
    let liba = fixture.create_global_cache("liba").unwrap();
    ProjectFixture::write_manifest(&liba, &[("libb", git("https://b"))]).unwrap();
    let libb = ProjectFixture::create_extern_cache(&liba, "libb").unwrap();

    let collection = fixture.collector().collect_with_visited(root);

    assert_eq!(ids(&collection.dependencies), vec!["liba", "libb"]);
    assert_eq!(collection.dependencies[1].origin, liba);
    assert_eq!(collection.dependencies[1].content_root.as_deref(), Some(libb.as_path()));
    assert_eq!(collection.visited_roots.len(), 3);
}

#[test]
fn test_vendored_checkout_requires_git() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("vendored", git("https://v")), ("local", json!({}))]).unwrap();
    fixture.write_file("vendored/README.md", "").unwrap();
    fixture.write_file("local/README.md", "").unwrap();

    let deps = fixture.collector().collect(root);

    assert_eq!(ids(&deps), vec!["local", "vendored"]);
    assert!(deps[0].content_root.is_none());
    assert!(deps[1].content_root.is_some());
}

#[test]
fn test_mutual_dependencies_terminate() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("liba", git("https://a"))]).unwrap();
    let liba = fixture.create_global_cache("liba").unwrap();
    let libb = fixture.create_global_cache("libb").unwrap();
    ProjectFixture::write_manifest(&liba, &[("libb", git("https://b"))]).unwrap();
    ProjectFixture::write_manifest(&libb, &[("liba", git("https://a"))]).unwrap();

    let collection = fixture.collector().collect_with_visited(root);

    // libb re-declares liba from a different origin, so that declaration is kept
    assert_eq!(ids(&collection.dependencies), vec!["liba", "liba", "libb"]);
    assert_eq!(collection.visited_roots.len(), 3);
}

#[test]
fn test_non_object_externs_are_skipped() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    fixture
        .write_file(
            "project.lock",
            r#"{"extern": {"ok": {"git": "https://ok", "names": ["alias", ""]}, "bad": "nope", "also-bad": 3}}"#,
        )
        .unwrap();

    let deps = fixture.collector().collect(root);

    assert_eq!(ids(&deps), vec!["ok"]);
    assert_eq!(deps[0].names, vec!["alias".to_string()]);
}
