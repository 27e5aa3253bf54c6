use cutekit_deps::constants::NO_CHECKOUT_MESSAGE;
use cutekit_deps::tree::{IconHint, LocalFileSystem, NodeKind, TreeBuilder, TreeModel, TreeStateStore, ViewState};
use std::fs;

use crate::common::{ProjectFixture, git};

fn build(fixture: &ProjectFixture) -> TreeModel {
    let deps = fixture.collector().collect(fixture.project_path());
    TreeBuilder::new(LocalFileSystem::new()).build(&deps, fixture.project_path())
}

fn labels(model: &TreeModel, ids: &[cutekit_deps::tree::NodeId]) -> Vec<String> {
    ids.iter().filter_map(|&id| model.kind(id)).map(NodeKind::label).collect()
}

#[test]
fn test_tree_shape_with_checkout_and_placeholder() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("libx", git("https://x")), ("liby", git("https://y"))]).unwrap();
    let libx = fixture.create_global_cache("libx").unwrap();
    fs::create_dir_all(libx.join("src")).unwrap();
    fs::write(libx.join("src/x.c"), "").unwrap();

    let model = build(&fixture);

    let roots = model.roots();
    assert_eq!(roots.len(), 3);
    assert_eq!(model.kind(roots[0]).unwrap().icon(), IconHint::Project);
    assert_eq!(labels(&model, &roots[1..]), vec!["libx", "liby"]);

    // directories first, then files
    assert_eq!(labels(&model, model.children(roots[1])), vec!["src", "README.md"]);

    let placeholder = model.children(roots[2]);
    assert_eq!(placeholder.len(), 1);
    assert_eq!(model.kind(placeholder[0]).unwrap().label(), NO_CHECKOUT_MESSAGE);
    assert!(model.kind(placeholder[0]).unwrap().is_placeholder());

    assert!(model.contains_path(&libx.join("src/x.c")));
    assert_eq!(model.dependency_count(), 2);
}

#[test]
fn test_search_matches_case_insensitively() {
    let fixture = ProjectFixture::new().unwrap();
    ProjectFixture::write_lockfile(fixture.project_path(), &[("LibHeap", git("https://h"))]).unwrap();
    fixture.write_file("src/heap_test.c", "").unwrap();

    let model = build(&fixture);
    let hits = model.search("HEAP");

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|key| model.find_by_key(key).is_some()));
    assert!(model.search("  ").is_empty());
}

#[test]
fn test_state_survives_rebuild_with_new_sibling() {
    let fixture = ProjectFixture::new().unwrap();
    fixture.write_file("src/b.c", "").unwrap();
    fixture.write_file("docs/readme.txt", "").unwrap();

    let before = build(&fixture);
    let project = before.project_node().unwrap();
    let src = before.children(project).iter().copied().find(|&id| before.kind(id).unwrap().label() == "src").unwrap();
    let b = before.children(src)[0];

    let mut view = ViewState::new();
    view.expand(project);
    view.select(&before, b);
    let state = TreeStateStore::capture(&before, &view);

    // a new folder sorts before `docs`, shifting every positional id after it
    fixture.write_file("assets/logo.svg", "").unwrap();
    fixture.write_file("src/a.c", "").unwrap();
    let after = build(&fixture);

    let mut restored = ViewState::new();
    let outcome = TreeStateStore::restore(&after, &mut restored, &state);

    assert!(outcome.matched_any());
    let selected = restored.selected();
    assert_eq!(selected.len(), 1);
    assert_eq!(after.kind(selected[0]).unwrap().label(), "b.c");
    let new_src = after.parent(selected[0]).unwrap();
    assert!(restored.is_expanded(new_src));
    assert!(restored.is_expanded(after.project_node().unwrap()));
}

#[test]
fn test_symlink_loop_in_checkout_is_listed_once() {
    #[cfg(unix)]
    {
        let fixture = ProjectFixture::new().unwrap();
        ProjectFixture::write_lockfile(fixture.project_path(), &[("libx", git("https://x"))]).unwrap();
        let libx = fixture.create_global_cache("libx").unwrap();
        std::os::unix::fs::symlink(&libx, libx.join("self")).unwrap();

        let model = build(&fixture);
        let dep = model.dependency_node("libx").unwrap();

        let link = model.children(dep).iter().copied().find(|&id| model.kind(id).unwrap().label() == "self").unwrap();
        assert!(model.children(link).is_empty());
    }
}
