//! End-to-end workflow tests
//!
//! These tests drive the full catalog -> resolve -> switch -> prune loop
//! against an in-memory host graph and a real cache tree on disk:
//! - Catalog filtering across all supported node types
//! - Version resolution against mixed directory contents
//! - Switch-then-prune housekeeping with per-node tolerance
//! - Panel rows staying in sync with host and disk state

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use cachesweep::{
    list_cache_nodes, prune_unused_caches, resolve_versions, CachePanel, MemGraph, NodeId,
    ParamMap, PruneOptions, RowStatus, VersionToken,
};

/// Create one version directory with a couple of cache files in it
fn populate_version(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("frames")).unwrap();
    fs::write(dir.join("frames").join("frame.0001.bgeo.sc"), b"frame").unwrap();
    fs::write(dir.join("frames").join("frame.0002.bgeo.sc"), b"frame").unwrap();
    fs::write(dir.join("manifest.json"), b"{}").unwrap();
}

struct Scene {
    graph: MemGraph,
    splash: NodeId,
    char_anim: NodeId,
    export: NodeId,
    broken: NodeId,
}

/// A scene with three supported cache nodes, one broken one and a camera
///
/// Each cache node gets its own versions root under `temp`, with the path
/// parameter pointing at the listed current version.
fn studio_scene(temp: &Path) -> Scene {
    let graph = MemGraph::new();

    let splash = graph.add_node("/obj/fx/splash_cache", "splash_cache", "filecache");
    let splash_root = temp.join("splash");
    for name in ["v001", "v002", "v003"] {
        populate_version(&splash_root, name);
    }
    graph
        .define_parm(
            &splash,
            "file",
            format!("{}/v003/splash.0001.bgeo.sc", splash_root.display()),
        )
        .unwrap();

    let char_anim = graph.add_node("/obj/char/char_abc", "char_abc", "alembic");
    let char_root = temp.join("char");
    for name in ["v001", "v002"] {
        populate_version(&char_root, name);
    }
    graph
        .define_parm(
            &char_anim,
            "fileName",
            format!("{}/v001/char.abc", char_root.display()),
        )
        .unwrap();

    let export = graph.add_node("/out/export_abc", "export_abc", "rop_alembic");
    let export_root = temp.join("export");
    for name in ["v001", "v002", "v004", "vtmp"] {
        populate_version(&export_root, name);
    }
    graph
        .define_parm(
            &export,
            "filename",
            format!("{}/v002/export.abc", export_root.display()),
        )
        .unwrap();

    let broken = graph.add_node("/obj/fx/legacy_cache", "legacy_cache", "filecache");
    graph
        .define_parm(&broken, "file", "/renders/final/out.bgeo")
        .unwrap();

    // not a cache node at all
    graph.add_node("/obj/cam1", "cam1", "cam");

    Scene {
        graph,
        splash,
        char_anim,
        export,
        broken,
    }
}

#[test]
fn test_catalog_finds_supported_nodes() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());

    let nodes = list_cache_nodes(&scene.graph, &ParamMap::builtin()).unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "/obj/fx/splash_cache",
            "/obj/char/char_abc",
            "/out/export_abc",
            "/obj/fx/legacy_cache"
        ]
    );
}

#[test]
fn test_resolver_matches_disk_state() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());

    // decoys that must never show up in a version listing
    let export_root = temp.path().join("export");
    fs::write(export_root.join("notes.txt"), b"notes").unwrap();
    fs::write(export_root.join("v005"), b"not a directory").unwrap();
    fs::create_dir(export_root.join("backup")).unwrap();

    let nodes = list_cache_nodes(&scene.graph, &ParamMap::builtin()).unwrap();
    let export = nodes.iter().find(|n| n.id == scene.export).unwrap();

    let versions = resolve_versions(&scene.graph, export, &ParamMap::builtin()).unwrap();
    let names: Vec<&str> = versions.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["v001", "v002", "v004", "vtmp"]);
}

#[test]
fn test_full_cleanup_workflow() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());

    let mut panel = CachePanel::new(&scene.graph).unwrap();
    assert_eq!(panel.rows().len(), 4);

    let splash_row = panel.row(&scene.splash).unwrap();
    assert_eq!(splash_row.status, RowStatus::Ready);
    assert_eq!(splash_row.current.as_ref().unwrap().name(), "v003");
    let unused: Vec<String> = splash_row
        .unused()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(unused, vec!["v001", "v002"]);

    let broken_row = panel.row(&scene.broken).unwrap();
    assert!(matches!(broken_row.status, RowStatus::MalformedPath(_)));

    // artist drops splash back one version before cleaning up
    let outcome = panel
        .select_version(&scene.splash, &VersionToken::new("v002"))
        .unwrap();
    assert!(outcome.changed());
    assert_eq!(
        panel
            .row(&scene.splash)
            .unwrap()
            .current
            .as_ref()
            .unwrap()
            .name(),
        "v002"
    );

    let report = panel.prune(PruneOptions::default()).unwrap();
    assert!(!report.dry_run);
    assert_eq!(report.nodes_with_deletions().len(), 2);

    // splash: only v001 sits below the new current v002
    let splash_record = report.record_for(&scene.splash).unwrap();
    let deleted: Vec<&str> = splash_record.deleted.iter().map(|t| t.name()).collect();
    assert_eq!(deleted, vec!["v001"]);
    assert!(!temp.path().join("splash").join("v001").exists());
    assert!(temp.path().join("splash").join("v002").exists());
    assert!(temp.path().join("splash").join("v003").exists());

    // char: already on its oldest version, nothing eligible
    let char_record = report.record_for(&scene.char_anim).unwrap();
    assert!(char_record.deleted.is_empty());
    assert!(temp.path().join("char").join("v001").exists());

    // export: v001 goes, newer and unnumbered versions stay
    let export_record = report.record_for(&scene.export).unwrap();
    let deleted: Vec<&str> = export_record.deleted.iter().map(|t| t.name()).collect();
    assert_eq!(deleted, vec!["v001"]);
    assert!(temp.path().join("export").join("v004").exists());
    assert!(temp.path().join("export").join("vtmp").exists());

    // broken: skipped, with the reason recorded
    let broken_record = report.record_for(&scene.broken).unwrap();
    assert!(broken_record.skipped);
    assert!(broken_record.skip_reason.is_some());

    // rows re-resolved after the prune
    let splash_row = panel.row(&scene.splash).unwrap();
    let names: Vec<&str> = splash_row.versions.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["v002", "v003"]);
    assert_eq!(splash_row.status, RowStatus::Ready);
}

#[test]
fn test_dry_run_then_real_prune() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());
    let params = ParamMap::builtin();
    let catalog = list_cache_nodes(&scene.graph, &params).unwrap();

    let dry = prune_unused_caches(
        &scene.graph,
        &catalog,
        &params,
        PruneOptions { dry_run: true },
    )
    .unwrap();
    assert!(dry.dry_run);
    // splash v001+v002, export v001
    assert_eq!(dry.deleted_count(), 3);
    assert!(temp.path().join("splash").join("v001").exists());

    let real =
        prune_unused_caches(&scene.graph, &catalog, &params, PruneOptions::default()).unwrap();
    assert_eq!(real.deleted_count(), 3);
    assert!(!temp.path().join("splash").join("v001").exists());
    assert!(!temp.path().join("splash").join("v002").exists());
    assert!(!temp.path().join("export").join("v001").exists());

    // the dry run predicted exactly what the real run removed
    for record in &dry.records {
        let real_record = real.record_for(&record.node.id).unwrap();
        let predicted: Vec<&str> = record.deleted.iter().map(|t| t.name()).collect();
        let removed: Vec<&str> = real_record.deleted.iter().map(|t| t.name()).collect();
        assert_eq!(predicted, removed);
    }

    // nothing left to do on a second pass
    let again =
        prune_unused_caches(&scene.graph, &catalog, &params, PruneOptions::default()).unwrap();
    assert_eq!(again.deleted_count(), 0);
}

#[test]
fn test_host_selection_flow() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());

    let panel = CachePanel::new(&scene.graph).unwrap();
    panel.activate(&scene.char_anim).unwrap();
    assert_eq!(scene.graph.selected(), vec![scene.char_anim.clone()]);

    panel.activate(&scene.splash).unwrap();
    assert_eq!(scene.graph.selected(), vec![scene.splash.clone()]);
}

#[test]
fn test_prune_report_serializes_for_host_ui() {
    let temp = TempDir::new().unwrap();
    let scene = studio_scene(temp.path());

    let mut panel = CachePanel::new(&scene.graph).unwrap();
    let report = panel.prune(PruneOptions::default()).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert!(value["started_at"].is_string());
    assert!(value["finished_at"].is_string());
    assert_eq!(value["dry_run"], serde_json::json!(false));
    assert_eq!(
        value["records"][0]["node"]["id"],
        serde_json::json!("/obj/fx/splash_cache")
    );
    assert_eq!(
        value["records"][0]["deleted"],
        serde_json::json!(["v001", "v002"])
    );
}
