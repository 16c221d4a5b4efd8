//! Container tests: child discovery, lazy loading and class dispatch.
//!
//! Layouts mirror real record trees: a container of numbered children,
//! nested containers, and domain variants registered at bootstrap.

use std::fs;

use dat::core::spec::CLASS_KEY;
use dat::error::ErrorKind;
use dat::registry::{CONTAINER_TYPE, Registry};
use dat::test_support::{TestRoot, spec};
use dat::{Container, Dat, Record, Spec, SpecSource, SpecTarget, Store, get, set};
use serde_json::json;

/// Domain variant used to check that registered constructors are honored.
#[derive(Debug)]
struct Game {
    record: Record,
}

impl SpecSource for Game {
    fn spec(&self) -> &Spec {
        self.record.spec()
    }
}

impl SpecTarget for Game {
    fn spec_mut(&mut self) -> &mut Spec {
        self.record.spec_mut()
    }
}

impl Dat for Game {
    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

fn construct_game(record: Record, _store: &Store) -> Box<dyn Dat> {
    Box::new(Game { record })
}

fn registry_with_game() -> Registry {
    let mut registry = Registry::with_builtins();
    registry.register("Game", construct_game).expect("register");
    registry
}

#[test]
fn unsaved_container_has_no_children() {
    let root = TestRoot::new().expect("root");
    let container = root.store.container(Spec::new(), "job_test", false).expect("container");
    assert!(container.dat_paths().expect("paths").is_empty());
    assert!(container.dats().expect("dats").is_empty());
}

#[test]
fn saved_empty_container_declares_its_type() {
    let root = TestRoot::new().expect("root");
    let mut container = root.store.container(Spec::new(), "job_test", false).expect("container");
    container.save().expect("save");
    assert_eq!(get(&container, CLASS_KEY).expect("class"), CONTAINER_TYPE);

    let loaded = root.store.load("job_test").expect("load");
    assert_eq!(get(&loaded, CLASS_KEY).expect("class"), "DatContainer");
    let reloaded = loaded.as_container().expect("container variant");
    assert!(reloaded.dat_paths().expect("paths").is_empty());
}

#[test]
fn composite_container_lists_and_loads_children_in_order() {
    let root = TestRoot::new().expect("root");
    let mut container = root.store.container(Spec::new(), "job_test", true).expect("container");
    container.save().expect("save");
    for i in 0..10 {
        let name = format!("sub_{i}");
        let mut child = Spec::new();
        set(&mut child, "main.my_nifty_name", json!(name)).expect("set");
        let mut sub = root
            .store
            .create(child, container.path().join(&name), false)
            .expect("child");
        sub.save().expect("save child");
    }

    let reload = root.store.load_container("job_test").expect("reload");
    assert_eq!(get(&reload, CLASS_KEY).expect("class"), "DatContainer");

    let paths = reload.dat_paths().expect("paths");
    assert_eq!(paths.len(), 10);
    assert_eq!(paths[3].to_str(), Some("job_test/sub_3"));

    let subs = reload.dats().expect("dats");
    assert_eq!(subs.len(), paths.len());
    for (sub, path) in subs.iter().zip(&paths) {
        assert_eq!(sub.path(), path.as_path());
    }
    assert_eq!(get(&subs[8], "main.my_nifty_name").expect("name"), "sub_8");
}

#[test]
fn discovery_ignores_files_and_directories_without_spec() {
    let root = TestRoot::new().expect("root");
    let mut container = root.store.container(Spec::new(), "set", false).expect("container");
    container.save().expect("save");
    fs::create_dir_all(root.path().join("set/empty_dir")).expect("dir");
    fs::write(root.path().join("set/notes.txt"), "x").expect("file");
    root.write_raw_spec("set/b", &json!({})).expect("b");
    root.write_raw_spec("set/a", &json!({})).expect("a");
    root.write_raw_spec("set/a/nested", &json!({})).expect("nested");

    let names: Vec<String> = container
        .dat_paths()
        .expect("paths")
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    assert_eq!(names, vec!["set/a", "set/b"]);
}

#[test]
fn listing_reflects_current_disk_state() {
    let root = TestRoot::new().expect("root");
    let mut container = root.store.container(Spec::new(), "set", false).expect("container");
    container.save().expect("save");
    root.write_raw_spec("set/one", &json!({})).expect("one");
    assert_eq!(container.dats().expect("dats").len(), 1);

    root.write_raw_spec("set/two", &json!({})).expect("two");
    let children = container.dats().expect("dats");
    assert_eq!(children.len(), 2);

    assert!(children[0].delete().expect("delete child"));
    assert_eq!(container.dat_paths().expect("paths").len(), 1);
    assert!(container.record().exists(), "parent survives child deletion");
}

#[test]
fn deleting_a_container_removes_descendants() {
    let root = TestRoot::new().expect("root");
    let mut container = root.store.container(Spec::new(), "set", false).expect("container");
    container.save().expect("save");
    root.write_raw_spec("set/one/deep", &json!({})).expect("deep");

    assert!(container.delete().expect("delete"));
    for path in ["set", "set/one", "set/one/deep"] {
        let err = root.store.load(path).expect_err(path);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[test]
fn registered_variants_are_reconstructed_from_class() {
    let root = TestRoot::with_registry(registry_with_game()).expect("root");
    root.write_raw_spec("gamesets/bb/baller10", &json!({"main": {"class": "DatContainer"}}))
        .expect("gameset");
    root.write_raw_spec(
        "gamesets/bb/baller10/1",
        &json!({"main": {"class": "Game"}, "game": {"views": {"view_1": "vid_1.mp4"}}}),
    )
    .expect("game");

    let gameset = root.store.load_container("gamesets/bb/baller10").expect("gameset");
    let games = gameset.dats().expect("games");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].class_name().expect("class"), "Game");
    assert!(games[0].as_container().is_none());
    assert_eq!(get(&games[0], "game.views.view_1").expect("view"), "vid_1.mp4");
}

#[test]
fn unregistered_child_type_fails_the_whole_listing() {
    let root = TestRoot::new().expect("root");
    root.write_raw_spec("set", &json!({"main": {"class": "DatContainer"}})).expect("set");
    root.write_raw_spec("set/1", &json!({"main": {"class": "MCProcRun"}})).expect("run");

    let set = root.store.load_container("set").expect("set");
    assert_eq!(set.dat_paths().expect("paths").len(), 1);
    let err = set.dats().expect_err("unknown child type");
    assert_eq!(err.kind(), ErrorKind::UnknownType);
}

#[test]
fn nested_containers_form_a_tree() {
    let root = TestRoot::new().expect("root");
    let mut top: Container = root.store.container(Spec::new(), "runsets", false).expect("top");
    top.save().expect("save top");
    for group in ["bb", "aa"] {
        let mut inner = root
            .store
            .container(spec(json!({"main": {"group": group}})), top.path().join(group), false)
            .expect("inner");
        inner.save().expect("save inner");
        for run in 0..2 {
            let mut leaf = root
                .store
                .create(Spec::new(), inner.path().join(run.to_string()), false)
                .expect("leaf");
            leaf.save().expect("save leaf");
        }
    }

    let children = top.dats().expect("children");
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|child| child.as_container().is_some()));

    let walked: Vec<String> = top
        .walk()
        .expect("walk")
        .iter()
        .map(|dat| dat.path().display().to_string())
        .collect();
    assert_eq!(
        walked,
        vec![
            "runsets/aa",
            "runsets/aa/0",
            "runsets/aa/1",
            "runsets/bb",
            "runsets/bb/0",
            "runsets/bb/1",
        ]
    );
}
