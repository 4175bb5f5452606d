//! Integration tests for package loading.

use asset_include::config::{AppPaths, AssetConfig, IntegrityEntry, PackageEntry};
use asset_include::html::Attributes;
use asset_include::manifest::Manifest;
use asset_include::package::{AssetPackage, PackageHook};
use asset_include::registry::ResourceRegistry;
use asset_include::resource::{Location, ResourceKind};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

type CallLog = Rc<RefCell<Vec<String>>>;

/// Package with both cdn and local hooks, recording every call.
struct DualPackage {
    name: String,
    version: Option<String>,
    disabled: Vec<PackageHook>,
    log: CallLog,
}

impl AssetPackage for DualPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_config(&mut self, config: Value) {
        self.log.borrow_mut().push(format!("config:{}", config));
    }

    fn disabled_hooks(&self) -> &[PackageHook] {
        &self.disabled
    }

    fn before(&self, _registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push(format!("{}:before", self.name));
    }

    fn cdn(&self, registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push(format!("{}:cdn", self.name));
        let version = self.version.as_deref().unwrap_or("latest");
        registry.add(
            &format!("https://cdn.example.com/{}/{}.min.js", version, self.name),
            None,
            Attributes::new(),
            None,
        );
    }

    fn local(&self, registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push(format!("{}:local", self.name));
        registry.content(
            ResourceKind::Js,
            &format!("window.{} = true;", self.name),
            Location::FooterInline,
        );
    }

    fn after(&self, _registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push(format!("{}:after", self.name));
    }
}

/// Package that only provides a cdn hook.
struct CdnOnlyPackage {
    name: String,
    log: CallLog,
}

impl AssetPackage for CdnOnlyPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn cdn(&self, _registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push(format!("{}:cdn", self.name));
    }
}

/// Package that loads another package from its cdn hook.
struct NestedPackage {
    log: CallLog,
}

impl AssetPackage for NestedPackage {
    fn name(&self) -> &str {
        "bundle"
    }

    fn cdn(&self, registry: &mut ResourceRegistry) {
        self.log.borrow_mut().push("bundle:cdn".to_string());
        registry.package("jquery", None);
    }
}

fn config_with_packages(entries: &[(&str, PackageEntry)], cdn: bool) -> AssetConfig {
    let packages: HashMap<String, PackageEntry> = entries
        .iter()
        .map(|(name, entry)| (name.to_string(), entry.clone()))
        .collect();
    AssetConfig {
        cdn,
        packages,
        ..AssetConfig::default()
    }
}

fn jquery_entry() -> PackageEntry {
    PackageEntry::Positional(vec!["vendor.jquery".to_string(), "3.7.1".to_string()])
}

fn registry_with(config: AssetConfig) -> ResourceRegistry {
    ResourceRegistry::new(config, Manifest::new(), AppPaths::new("/srv/app"))
}

fn register_dual(registry: &mut ResourceRegistry, class: &str, name: &str, log: CallLog) {
    let name = name.to_string();
    registry.register_package(class, move |init| {
        Box::new(DualPackage {
            name: name.clone(),
            version: init.version,
            disabled: Vec::new(),
            log: log.clone(),
        })
    });
}

#[test]
fn package_loads_once_per_registry() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package("jquery", None);
    registry.package("jquery", None);

    let calls = log.borrow();
    assert_eq!(calls.iter().filter(|c| *c == "jquery:cdn").count(), 1);
    assert!(registry.package_loaded("vendor.jquery"));
}

#[test]
fn load_runs_before_variant_after_in_order() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package("jquery", None);

    assert_eq!(
        *log.borrow(),
        vec!["jquery:before", "jquery:cdn", "jquery:after"]
    );
}

#[test]
fn local_mode_runs_local_hook() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], false));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package("jquery", None);

    assert!(log.borrow().contains(&"jquery:local".to_string()));
    assert!(!log.borrow().contains(&"jquery:cdn".to_string()));
}

#[test]
fn default_local_falls_back_to_cdn() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], false));
    {
        let log = log.clone();
        registry.register_package("vendor.jquery", move |_init| {
            Box::new(CdnOnlyPackage {
                name: "jquery".to_string(),
                log: log.clone(),
            })
        });
    }

    registry.package("jquery", None);

    assert!(log.borrow().contains(&"jquery:cdn".to_string()));
}

#[test]
fn disabled_cdn_hook_is_skipped() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    {
        let log = log.clone();
        registry.register_package("vendor.jquery", move |init| {
            Box::new(DualPackage {
                name: "jquery".to_string(),
                version: init.version,
                disabled: vec![PackageHook::Cdn],
                log: log.clone(),
            })
        });
    }

    registry.package("jquery", None);

    assert_eq!(*log.borrow(), vec!["jquery:before", "jquery:after"]);
}

#[test]
fn unconfigured_package_is_ignored() {
    let mut registry = registry_with(AssetConfig::default());
    registry.package("unknown", None);

    assert!(registry.resources().is_empty());
    assert!(!registry.package_loaded("unknown"));
}

#[test]
fn package_without_factory_is_ignored() {
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    registry.package("jquery", None);

    assert!(registry.resources().is_empty());
    assert!(!registry.package_loaded("vendor.jquery"));
}

#[test]
fn configured_version_reaches_the_factory() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package("jquery", None);

    let footer = registry.footer();
    assert!(footer.contains("https://cdn.example.com/3.7.1/jquery.min.js"));
}

#[test]
fn request_argument_overrides_configured_version() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package(("jquery", vec![json!("4.0.0")]), None);

    let footer = registry.footer();
    assert!(footer.contains("https://cdn.example.com/4.0.0/jquery.min.js"));
}

#[test]
fn package_version_precedence() {
    let entry = PackageEntry::Detailed {
        class: "vendor.jquery".to_string(),
        version: Some("3.7.1".to_string()),
        integrity: None,
    };
    let registry = registry_with(config_with_packages(&[("jquery", entry)], true));

    assert_eq!(
        registry.package_version("jquery", Some("9.0.0")),
        Some("9.0.0".to_string())
    );
    assert_eq!(
        registry.package_version("jquery", None),
        Some("3.7.1".to_string())
    );
    assert_eq!(registry.package_version("unknown", None), None);
}

#[test]
fn legacy_positional_version_is_honored() {
    let registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    assert_eq!(
        registry.package_version("jquery", None),
        Some("3.7.1".to_string())
    );
}

#[test]
fn package_integrity_lookup() {
    let entry = PackageEntry::Detailed {
        class: "vendor.datatables".to_string(),
        version: None,
        integrity: Some(IntegrityEntry::PerAsset(HashMap::from([
            ("datatables.min.js".to_string(), "sha384-js".to_string()),
            ("datatables.min.css".to_string(), "sha384-css".to_string()),
        ]))),
    };
    let registry = registry_with(config_with_packages(&[("datatables", entry)], true));

    assert_eq!(
        registry.package_integrity("datatables", "datatables.min.js"),
        Some("sha384-js".to_string())
    );
    assert_eq!(registry.package_integrity("datatables", "missing.js"), None);
    assert_eq!(registry.package_integrity("unknown", "x"), None);
}

#[test]
fn set_config_receives_load_settings() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = registry_with(config_with_packages(&[("jquery", jquery_entry())], true));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());

    registry.package("jquery", Some(json!({"theme": "dark"})));

    assert!(log
        .borrow()
        .iter()
        .any(|call| call.starts_with("config:") && call.contains("dark")));
}

#[test]
fn package_can_load_nested_packages() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let bundle_entry = PackageEntry::Positional(vec!["vendor.bundle".to_string()]);
    let mut registry = registry_with(config_with_packages(
        &[("bundle", bundle_entry), ("jquery", jquery_entry())],
        true,
    ));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());
    {
        let log = log.clone();
        registry.register_package("vendor.bundle", move |_init| {
            Box::new(NestedPackage { log: log.clone() })
        });
    }

    registry.package("bundle", None);

    assert!(registry.package_loaded("vendor.bundle"));
    assert!(registry.package_loaded("vendor.jquery"));
    assert!(log.borrow().contains(&"jquery:cdn".to_string()));
}

#[test]
fn packages_loads_a_list() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let select2_entry = PackageEntry::Positional(vec!["vendor.select2".to_string()]);
    let mut registry = registry_with(config_with_packages(
        &[("jquery", jquery_entry()), ("select2", select2_entry)],
        true,
    ));
    register_dual(&mut registry, "vendor.jquery", "jquery", log.clone());
    register_dual(&mut registry, "vendor.select2", "select2", log.clone());

    registry.packages(["jquery", "select2"]);

    assert!(registry.package_loaded("vendor.jquery"));
    assert!(registry.package_loaded("vendor.select2"));
}
