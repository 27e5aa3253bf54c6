use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::manifest::ExternDeclaration;
use crate::test_utils::{ManifestFixture, TestEnvironment};

#[test]
fn test_candidates_order_with_home_and_git() {
    let resolver = ExternResolver::new(Some("/home/u".into()));
    let candidates = resolver.candidates("libx", Some("https://x"), Path::new("/work/app"));

    assert_eq!(
        candidates,
        vec![
            Path::new("/work/app/.cutekit/extern/libx").to_path_buf(),
            Path::new("/home/u/.cutekit/extern/libx").to_path_buf(),
            Path::new("/work/app/libx").to_path_buf(),
        ]
    );
}

#[test]
fn test_candidates_skip_home_and_vendored() {
    let resolver = ExternResolver::new(None);
    let candidates = resolver.candidates("libx", None, Path::new("/work/app"));

    assert_eq!(candidates, vec![Path::new("/work/app/.cutekit/extern/libx").to_path_buf()]);
}

#[test]
fn test_resolve_prefers_project_cache() {
    let env = TestEnvironment::new().unwrap();
    let local = env.create_extern_cache("libx").unwrap();
    env.create_global_cache("libx").unwrap();
    env.create_vendored("libx").unwrap();

    let resolver = ExternResolver::new(Some(env.home_dir.clone()));
    assert_eq!(resolver.resolve("libx", Some("https://x"), &env.project_dir), Some(local));
}

#[test]
fn test_resolve_global_cache_before_vendored() {
    let env = TestEnvironment::new().unwrap();
    let global = env.create_global_cache("libx").unwrap();
    env.create_vendored("libx").unwrap();

    let resolver = ExternResolver::new(Some(env.home_dir.clone()));
    assert_eq!(resolver.resolve("libx", Some("https://x"), &env.project_dir), Some(global));
}

#[test]
fn test_resolve_vendored_requires_git() {
    let env = TestEnvironment::new().unwrap();
    let vendored = env.create_vendored("libx").unwrap();
    let resolver = ExternResolver::new(None);

    assert_eq!(resolver.resolve("libx", None, &env.project_dir), None);
    assert_eq!(resolver.resolve("libx", Some("https://x"), &env.project_dir), Some(vendored));
}

#[test]
fn test_resolve_ignores_plain_files() {
    let env = TestEnvironment::new().unwrap();
    let cache = env.project_dir.join(".cutekit/extern");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("libx"), "not a directory").unwrap();

    assert_eq!(ExternResolver::new(None).resolve("libx", None, &env.project_dir), None);
}

#[test]
fn test_collect_single_resolved_dependency() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new()
        .extern_entry(
            "libx",
            json!({
                "git": "https://x",
                "version": "1.2"
            }),
        )
        .write_lockfile(&env.project_dir)
        .unwrap();
    let cache = env.create_extern_cache("libx").unwrap();

    let deps = env.collector().collect(&env.project_dir);
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].id, "libx");
    assert_eq!(deps[0].git.as_deref(), Some("https://x"));
    assert_eq!(deps[0].version.as_deref(), Some("1.2"));
    assert_eq!(deps[0].content_root.as_deref(), Some(cache.as_path()));
    assert_eq!(deps[0].origin, env.project_dir);
}

#[test]
fn test_collect_unresolved_dependency() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new().git_extern("libx", "https://x").write_lockfile(&env.project_dir).unwrap();

    let deps = env.collector().collect(&env.project_dir);
    assert_eq!(deps.len(), 1);
    assert!(deps[0].content_root.is_none());
    assert!(!deps[0].is_resolved());
}

#[test]
fn test_collect_no_manifest() {
    let env = TestEnvironment::new().unwrap();
    let collection = env.collector().collect_with_visited(&env.project_dir);

    assert!(collection.dependencies.is_empty());
    assert_eq!(collection.visited_roots.len(), 1);
}

#[test]
fn test_collect_transitive_and_sorted() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new()
        .bare_extern("Zeta")
        .bare_extern("alpha")
        .write_manifest(&env.project_dir)
        .unwrap();
    let alpha = env.create_extern_cache("alpha").unwrap();
    env.create_extern_cache("Zeta").unwrap();
    ManifestFixture::new().bare_extern("beta").write_manifest(&alpha).unwrap();

    let deps = env.collector().collect(&env.project_dir);
    let ids: Vec<&str> = deps.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "beta", "Zeta"]);

    let beta = &deps[1];
    assert_eq!(beta.origin, alpha);
    assert!(beta.content_root.is_none());
}

#[test]
fn test_collect_cycle_terminates() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new().bare_extern("a").write_manifest(&env.project_dir).unwrap();
    let a = env.create_extern_cache("a").unwrap();
    ManifestFixture::new().bare_extern("b").write_manifest(&a).unwrap();
    let b = a.join(".cutekit/extern/b");
    fs::create_dir_all(&b).unwrap();
    ManifestFixture::new().bare_extern("a").write_manifest(&b).unwrap();
    // b's checkout of "a" is the same directory as the project's, via symlink
    #[cfg(unix)]
    {
        let link_parent = b.join(".cutekit/extern");
        fs::create_dir_all(&link_parent).unwrap();
        std::os::unix::fs::symlink(&a, link_parent.join("a")).unwrap();
    }

    let collection = env.collector().collect_with_visited(&env.project_dir);
    let ids: Vec<&str> = collection.dependencies.iter().map(|d| d.id.as_str()).collect();

    assert_eq!(ids, vec!["a", "a", "b"]);
    assert_eq!(collection.visited_roots.len(), 3);
}

#[cfg(unix)]
#[test]
fn test_collect_extern_pointing_back_at_project() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new().bare_extern("self").write_manifest(&env.project_dir).unwrap();
    let cache_parent = env.project_dir.join(".cutekit/extern");
    fs::create_dir_all(&cache_parent).unwrap();
    std::os::unix::fs::symlink(&env.project_dir, cache_parent.join("self")).unwrap();

    let collection = env.collector().collect_with_visited(&env.project_dir);
    assert_eq!(collection.dependencies.len(), 1);
    assert_eq!(collection.visited_roots.len(), 1);
}

#[test]
fn test_collect_diamond_reads_shared_root_once() {
    let env = TestEnvironment::new().unwrap();
    let home_shared = env.create_global_cache("shared").unwrap();
    ManifestFixture::new().bare_extern("leaf").write_manifest(&home_shared).unwrap();

    ManifestFixture::new()
        .bare_extern("left")
        .bare_extern("right")
        .write_manifest(&env.project_dir)
        .unwrap();
    let left = env.create_extern_cache("left").unwrap();
    let right = env.create_extern_cache("right").unwrap();
    ManifestFixture::new().bare_extern("shared").write_manifest(&left).unwrap();
    ManifestFixture::new().bare_extern("shared").write_manifest(&right).unwrap();

    let collection = env.collector().collect_with_visited(&env.project_dir);
    let ids: Vec<&str> = collection.dependencies.iter().map(|d| d.id.as_str()).collect();

    // "shared" is declared twice with different origins; "leaf" is read once
    assert_eq!(ids, vec!["leaf", "left", "right", "shared", "shared"]);
    assert_eq!(collection.visited_roots.len(), 4);
}

#[test]
fn test_collect_dedup_keys_unique() {
    let env = TestEnvironment::new().unwrap();
    ManifestFixture::new()
        .git_extern("libx", "https://x")
        .git_extern("liby", "https://y")
        .write_manifest(&env.project_dir)
        .unwrap();

    let deps = env.collector().collect(&env.project_dir);
    let mut keys: Vec<DependencyKey> = deps.iter().map(ResolvedDependency::key).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
}

#[test]
fn test_key_includes_attributes_but_not_names() {
    let origin = Path::new("/work/app");
    let base = ResolvedDependency::from_declaration(ExternDeclaration::new("libx"), origin, None);

    let mut aliased = base.clone();
    aliased.names = vec!["x".to_string()];
    assert_eq!(base.key(), aliased.key());

    let mut bumped = base.clone();
    bumped.commit = Some("abc123".to_string());
    assert_ne!(base.key(), bumped.key());

    let elsewhere =
        ResolvedDependency::from_declaration(ExternDeclaration::new("libx"), Path::new("/other"), None);
    assert_ne!(base.key(), elsewhere.key());
}

#[test]
fn test_pin_prefers_tag() {
    let mut dep = ResolvedDependency::from_declaration(
        ExternDeclaration::new("libx").with_version("1.0"),
        Path::new("/p"),
        None,
    );
    assert_eq!(dep.pin(), Some("1.0"));
    dep.tag = Some("v1.0.0".to_string());
    assert_eq!(dep.pin(), Some("v1.0.0"));
}

#[test]
fn test_collect_default_collector_without_home() {
    let temp = TempDir::new().unwrap();
    ManifestFixture::new().git_extern("libx", "https://x").write_manifest(temp.path()).unwrap();

    let collector = DependencyCollector::default();
    assert!(collector.resolver().home().is_none());

    let collection = collector.collect_with_visited(temp.path());
    assert_eq!(collection.dependencies.len(), 1);
    assert_eq!(collection.visited_roots.len(), 1);
}
