//! End-to-end tests: product directory on disk to resolved, cached bundle.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use deckhand_core::product::{
    FileResultCache, NoCache, ProductTemplates, ResultCache, content_key, load_product_dir,
};
use deckhand_core::template::{ResolveOptions, ResolvedBundle};
use tempfile::TempDir;

const ROOT_TEMPLATE: &str = r#"
id: server-base
name: Server ${node}
application: server
templateVariables:
  - id: node
    name: Node name
  - id: port
    defaultValue: 7700
startParameters:
  - uid: port
    value: ${port}
  - uid: heap
    value: 512
processControl:
  startType: MANUAL
"#;

const CHILD_TEMPLATE: &str = r#"
id: server-fast
template: server-base
templateVariables:
  - id: threads
fixedVariables:
  - id: port
    value: 9000
startParameters:
  - uid: threads
    value: ${threads}
"#;

const INSTANCE_TEMPLATE: &str = r#"
name: Standard Setup
description: One fast server
templateVariables:
  - id: stage
instanceVariables:
  - template: common
  - id: log.level
    value: INFO
instanceVariableDefaults:
  - id: log.level
    value: DEBUG
groups:
  - name: Server Apps
    applications:
      - template: server-fast
        name: Fast server
      - template: not-there
"#;

const VARIABLE_TEMPLATE: &str = r#"
id: common
instanceVariables:
  - id: common.home
    value: /opt/app
"#;

const PARAMETER_TEMPLATE: &str = r#"
id: jvm
name: JVM settings
parameters:
  - id: heap
    name: Heap size
    defaultValue: 512
    type: NUMERIC
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_product() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "application-templates/base.yaml", ROOT_TEMPLATE);
    write(root, "application-templates/fast/fast.yaml", CHILD_TEMPLATE);
    write(root, "instance-templates/standard.yaml", INSTANCE_TEMPLATE);
    write(root, "instance-variable-templates/common.yaml", VARIABLE_TEMPLATE);
    write(root, "parameter-templates/jvm.yml", PARAMETER_TEMPLATE);
    tmp
}

/// Records every call so tests can see whether resolution hit the cache.
#[derive(Default)]
struct RecordingCache {
    entries: RefCell<Vec<(String, ResolvedBundle)>>,
    reads: RefCell<usize>,
}

impl ResultCache for RecordingCache {
    fn read(&self, key: &str) -> Option<ResolvedBundle> {
        *self.reads.borrow_mut() += 1;
        self.entries
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, b)| b.clone())
    }

    fn store(&self, key: &str, bundle: &ResolvedBundle) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .push((key.to_string(), bundle.clone()));
        Ok(())
    }
}

#[test]
fn loads_every_descriptor_kind() {
    let product = sample_product();
    let raw = load_product_dir(product.path()).unwrap();

    assert_eq!(raw.instance_templates.len(), 1);
    assert_eq!(raw.application_templates.len(), 2);
    assert_eq!(raw.parameter_templates.len(), 1);
    assert_eq!(raw.variable_templates.len(), 1);

    let jvm = &raw.parameter_templates[0];
    assert_eq!(jvm.parameters[0].default_value.as_deref(), Some("512"));
    assert_eq!(
        jvm.parameters[0].attributes.get("type"),
        Some(&serde_yaml::Value::from("NUMERIC"))
    );
}

#[test]
fn malformed_file_is_skipped() {
    let product = sample_product();
    write(
        product.path(),
        "application-templates/broken.yaml",
        "id: [unterminated\n",
    );

    let raw = load_product_dir(product.path()).unwrap();
    assert_eq!(raw.application_templates.len(), 2);
}

#[test]
fn missing_product_dir_is_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    assert!(load_product_dir(&missing).is_err());
    assert!(ProductTemplates::load(&missing, &NoCache, &ResolveOptions::default()).is_err());
}

#[test]
fn resolves_product_from_disk() {
    let product = sample_product();
    let templates =
        ProductTemplates::load(product.path(), &NoCache, &ResolveOptions::default()).unwrap();

    let itd = &templates.instance_templates()[0];
    assert_eq!(itd.name, "Standard Setup");

    // the dangling application is dropped, the group survives
    let group = itd.group("Server Apps").unwrap();
    assert_eq!(group.applications.len(), 1);

    let app = &group.applications[0];
    assert!(app.is_resolved());
    assert_eq!(app.application.as_deref(), Some("server"));
    assert_eq!(app.name.as_deref(), Some("Fast server"));
    assert_eq!(app.start_parameter("port").unwrap().value.as_deref(), Some("9000"));
    assert_eq!(app.start_parameter("heap").unwrap().value.as_deref(), Some("512"));
    assert_eq!(
        app.start_parameter("threads").unwrap().value.as_deref(),
        Some("${threads}")
    );
    assert_eq!(
        app.process_control.get("startType"),
        Some(&serde_yaml::Value::from("MANUAL"))
    );

    let mut free: Vec<_> = itd.template_variables.iter().map(|v| v.id.as_str()).collect();
    free.sort_unstable();
    assert_eq!(free, vec!["node", "stage", "threads"]);

    // the surfaced variable keeps its metadata
    assert_eq!(
        itd.template_variable("node").unwrap().name.as_deref(),
        Some("Node name")
    );

    let vars: Vec<_> = itd
        .instance_variables
        .iter()
        .map(|v| (v.id.as_deref().unwrap(), v.value.as_deref().unwrap()))
        .collect();
    assert_eq!(vars, vec![("common.home", "/opt/app"), ("log.level", "DEBUG")]);

    let ids: Vec<_> = templates
        .application_templates()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"server-base") && ids.contains(&"server-fast"));
    assert_eq!(templates.parameter_templates()[0].id, "jvm");
}

#[test]
fn second_load_uses_cache() {
    let product = sample_product();
    let cache = RecordingCache::default();
    let options = ResolveOptions::default();

    let first = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    assert_eq!(cache.entries.borrow().len(), 1);

    let second = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    assert_eq!(cache.entries.borrow().len(), 1, "cache hit must not store again");
    assert_eq!(*cache.reads.borrow(), 2);
    assert_eq!(first, second);
}

#[test]
fn content_key_tracks_content_and_options() {
    let product = sample_product();
    let options = ResolveOptions::default();

    let key = content_key(product.path(), &options).unwrap();
    assert_eq!(key, content_key(product.path(), &options).unwrap());
    assert_ne!(
        key,
        content_key(product.path(), &ResolveOptions { max_depth: 3 }).unwrap()
    );

    write(
        product.path(),
        "parameter-templates/extra.yaml",
        "id: extra\nparameters: []\n",
    );
    assert_ne!(key, content_key(product.path(), &options).unwrap());
}

#[test]
fn hidden_files_are_neither_loaded_nor_hashed() {
    let product = sample_product();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileResultCache::new(cache_dir.path());
    let options = ResolveOptions::default();
    let hidden = "application-templates/.draft.yaml";
    let hidden_dir = "application-templates/.backup/old.yaml";

    write(product.path(), hidden, "id: draft\nname: First\napplication: app\n");
    write(product.path(), hidden_dir, "id: old\napplication: app\n");
    let first = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    assert_eq!(first.application_templates().len(), 2);

    write(product.path(), hidden, "id: draft\nname: Second\napplication: app\n");
    let cached = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    let fresh = ProductTemplates::load(product.path(), &NoCache, &options).unwrap();
    assert_eq!(cached.key(), first.key());
    assert_eq!(cached.bundle(), fresh.bundle());
    assert!(
        fresh
            .application_templates()
            .iter()
            .all(|t| t.id != "draft" && t.id != "old")
    );
}

#[cfg(unix)]
#[test]
fn symlinked_template_is_loaded_and_tracked() {
    use std::os::unix::fs::symlink;

    let product = sample_product();
    let shared = TempDir::new().unwrap();
    let target = shared.path().join("shared.yaml");
    fs::write(&target, "id: shared\nname: First\napplication: app\n").unwrap();
    symlink(&target, product.path().join("application-templates/shared.yaml")).unwrap();
    symlink(shared.path(), product.path().join("parameter-templates/linked-dir")).unwrap();
    symlink(
        shared.path().join("gone.yaml"),
        product.path().join("parameter-templates/dangling.yaml"),
    )
    .unwrap();

    let cache_dir = TempDir::new().unwrap();
    let cache = FileResultCache::new(cache_dir.path());
    let options = ResolveOptions::default();

    let first = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    let linked = first
        .application_templates()
        .iter()
        .find(|t| t.id == "shared")
        .unwrap();
    assert_eq!(linked.display_name(), "First");
    assert_eq!(first.parameter_templates().len(), 1);

    // editing the link target changes the key, so the cache is not consulted
    fs::write(&target, "id: shared\nname: Second\napplication: app\n").unwrap();
    let second = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    assert_ne!(second.key(), first.key());
    let linked = second
        .application_templates()
        .iter()
        .find(|t| t.id == "shared")
        .unwrap();
    assert_eq!(linked.display_name(), "Second");
}

#[test]
fn file_cache_serves_resolved_bundle() {
    let product = sample_product();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileResultCache::new(cache_dir.path().join("templates"));
    let options = ResolveOptions::default();

    let fresh = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    let entry = cache_dir
        .path()
        .join("templates")
        .join(format!("{}.json", fresh.key()));
    assert!(entry.exists());

    let cached = cache.read(fresh.key()).unwrap();
    assert_eq!(&cached, fresh.bundle());

    let reloaded = ProductTemplates::load(product.path(), &cache, &options).unwrap();
    assert_eq!(reloaded.into_bundle(), fresh.into_bundle());
}

#[test]
fn concurrent_stores_leave_a_valid_entry() {
    let product = sample_product();
    let cache_dir = TempDir::new().unwrap();
    let options = ResolveOptions::default();
    let bundle = ProductTemplates::load(product.path(), &NoCache, &options)
        .unwrap()
        .into_bundle();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let dir = cache_dir.path().to_path_buf();
            let bundle = &bundle;
            scope.spawn(move || {
                FileResultCache::new(dir).store("shared", bundle).unwrap();
            });
        }
    });

    let cache = FileResultCache::new(cache_dir.path());
    assert_eq!(cache.read("shared").as_ref(), Some(&bundle));

    let leftovers: Vec<_> = fs::read_dir(cache_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
}

#[test]
fn corrupt_cache_entry_is_a_miss() {
    let cache_dir = TempDir::new().unwrap();
    fs::write(cache_dir.path().join("abc.json"), "{ not json").unwrap();

    let cache = FileResultCache::new(cache_dir.path());
    assert!(cache.read("abc").is_none());
    assert!(cache.read("never-stored").is_none());
}
