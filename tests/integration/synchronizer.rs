use cutekit_deps::config::SyncConfig;
use cutekit_deps::sync::{ApplyOutcome, FsEvent, SyncCommand, SyncNotification, Synchronizer, ViewStatus};
use cutekit_deps::utils::paths::path_key;
use cutekit_deps::vcs::{InMemoryMappings, VcsMapping, VcsMappings};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::common::{ProjectFixture, git};

fn config(fixture: &ProjectFixture) -> SyncConfig {
    SyncConfig {
        home_dir: Some(fixture.home_path().to_path_buf()),
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn test_lockfile_edit_adds_dependency_and_mapping() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("libx", git("https://x"))]).unwrap();
    let libx = fixture.create_global_cache("libx").unwrap();

    let vcs = Arc::new(InMemoryMappings::new());
    let mut sync = Synchronizer::new(root, &config(&fixture), vcs.clone());
    assert_eq!(sync.refresh_and_wait().await, ApplyOutcome::Applied);
    assert_eq!(sync.status(), ViewStatus::Ready);
    assert_eq!(vcs.list_mappings(), vec![VcsMapping::new(path_key(&libx).unwrap(), "Git")]);

    let lockfile = ProjectFixture::write_lockfile(root, &[("libx", git("https://x")), ("liby", git("https://y"))]).unwrap();
    let liby = fixture.create_global_cache("liby").unwrap();

    let id = sync.handle_events(&[FsEvent::Modified(lockfile)]);
    assert!(id.is_some());
    assert_eq!(sync.process_next_completion().await, Some(ApplyOutcome::Applied));

    assert_eq!(sync.dependencies().len(), 2);
    assert!(sync.observed_roots().contains(&path_key(&liby).unwrap()));
    assert_eq!(vcs.list_mappings().len(), 2);
}

#[tokio::test]
async fn test_events_outside_observed_roots_are_ignored() {
    let fixture = ProjectFixture::new().unwrap();
    let mut sync = Synchronizer::new(fixture.project_path(), &config(&fixture), Arc::new(InMemoryMappings::new()));
    sync.refresh_and_wait().await;
    assert_eq!(sync.status(), ViewStatus::Empty);

    // the home cache is not observed while nothing resolves into it
    let stray = fixture.home_path().join("notes.txt");
    assert!(sync.handle_events(&[FsEvent::Created(stray)]).is_none());
    assert!(!sync.is_refreshing());
}

#[tokio::test]
async fn test_removed_checkout_falls_back_to_placeholder() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("libx", git("https://x"))]).unwrap();
    let libx = fixture.create_global_cache("libx").unwrap();

    let vcs = Arc::new(InMemoryMappings::new());
    let mut sync = Synchronizer::new(root, &config(&fixture), vcs.clone());
    sync.refresh_and_wait().await;

    std::fs::remove_dir_all(&libx).unwrap();
    assert!(sync.handle_events(&[FsEvent::Removed(libx)]).is_some());
    sync.process_next_completion().await;

    let dep = sync.model().dependency_node("libx").unwrap();
    let children = sync.model().children(dep);
    assert_eq!(children.len(), 1);
    assert!(sync.model().kind(children[0]).unwrap().is_placeholder());
    assert!(vcs.list_mappings().is_empty());
}

#[tokio::test]
async fn test_run_loop_follows_editor_selection() {
    let fixture = ProjectFixture::new().unwrap();
    let root = fixture.project_path();
    ProjectFixture::write_lockfile(root, &[("libx", git("https://x"))]).unwrap();
    let libx = fixture.create_global_cache("libx").unwrap();
    let readme = libx.join("README.md");

    let sync = Synchronizer::new(root, &config(&fixture), Arc::new(InMemoryMappings::new()));
    let mut notifications = sync.subscribe();
    let (commands, rx) = mpsc::channel(8);
    let handle = tokio::spawn(sync.run(rx));

    // selection requested before the first tree exists is applied once it does
    commands.send(SyncCommand::SelectPath(readme.clone())).await.unwrap();
    commands.send(SyncCommand::Refresh).await.unwrap();

    let replaced = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match notifications.recv().await {
                Ok(SyncNotification::TreeReplaced {
                    observed_roots,
                    ..
                }) => break observed_roots,
                Ok(_) => continue,
                Err(e) => panic!("notification channel failed: {e}"),
            }
        }
    })
    .await
    .unwrap();
    assert!(replaced.iter().any(|path| path_key(path) == path_key(&libx)));

    commands.send(SyncCommand::Shutdown).await.unwrap();
    let sync = handle.await.unwrap();

    assert_eq!(sync.pending_selection(), None);
    assert_eq!(sync.selected_entries(), vec![readme]);
}
