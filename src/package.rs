//! Named resource bundles with CDN/local loading variants.
//!
//! A package groups the resources of one third-party library behind a
//! name (`jquery`, `datatables`). Configuration maps the name to a class
//! identity; the host registers a constructor for each identity with
//! [`ResourceRegistry::register_package`]. Every hook on [`AssetPackage`]
//! has a no-op default, so an implementation provides only the behavior it
//! needs; a missing hook is skipped, never an error.
//!
//! [`ResourceRegistry::register_package`]: crate::registry::ResourceRegistry::register_package

use crate::registry::ResourceRegistry;
use serde_json::Value;

/// Hooks a package may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageHook {
    Before,
    Cdn,
    Local,
    After,
}

/// A named bundle of resources with CDN and local loading variants.
///
/// Hooks receive the registry so a package can register its own
/// sub-resources and nested packages. `local` falls back to `cdn` when
/// not provided.
pub trait AssetPackage {
    /// Package name, matching its configuration key.
    fn name(&self) -> &str;

    /// Receive the settings blob passed at load time.
    fn set_config(&mut self, _config: Value) {}

    /// Hooks suppressed for this package.
    fn disabled_hooks(&self) -> &[PackageHook] {
        &[]
    }

    fn before(&self, _registry: &mut ResourceRegistry) {}

    fn cdn(&self, _registry: &mut ResourceRegistry) {}

    /// Local-serving variant; defaults to the CDN behavior.
    fn local(&self, registry: &mut ResourceRegistry) {
        self.cdn(registry);
    }

    fn after(&self, _registry: &mut ResourceRegistry) {}

    /// Run the load sequence: `before`, then `cdn` or `local` depending
    /// on the registry's CDN mode, then `after`.
    fn load(&mut self, registry: &mut ResourceRegistry, config: Option<Value>) {
        if let Some(config) = config {
            self.set_config(config);
        }

        self.before(registry);

        if registry.cdn_enabled() && !self.disabled_hooks().contains(&PackageHook::Cdn) {
            self.cdn(registry);
        } else if !registry.cdn_enabled() && !self.disabled_hooks().contains(&PackageHook::Local) {
            self.local(registry);
        }

        self.after(registry);
    }
}

/// Construction context handed to a package factory.
#[derive(Debug, Clone, Default)]
pub struct PackageInit {
    /// Version resolved from the request override or configuration.
    pub version: Option<String>,

    /// Positional arguments from the package request.
    pub args: Vec<Value>,
}

/// Constructor for a configured package class identity.
pub type PackageFactory = Box<dyn Fn(PackageInit) -> Box<dyn AssetPackage>>;

/// A request to load a package.
///
/// Either a bare name or a name with constructor arguments; the first
/// argument, when it is a string, overrides the configured version.
#[derive(Debug, Clone)]
pub enum PackageRequest {
    Name(String),
    WithArgs(String, Vec<Value>),
}

impl PackageRequest {
    pub fn name(&self) -> &str {
        match self {
            PackageRequest::Name(name) => name,
            PackageRequest::WithArgs(name, _) => name,
        }
    }

    pub fn args(&self) -> &[Value] {
        match self {
            PackageRequest::Name(_) => &[],
            PackageRequest::WithArgs(_, args) => args,
        }
    }
}

impl From<&str> for PackageRequest {
    fn from(name: &str) -> Self {
        PackageRequest::Name(name.to_string())
    }
}

impl From<String> for PackageRequest {
    fn from(name: String) -> Self {
        PackageRequest::Name(name)
    }
}

impl From<(&str, Vec<Value>)> for PackageRequest {
    fn from((name, args): (&str, Vec<Value>)) -> Self {
        PackageRequest::WithArgs(name.to_string(), args)
    }
}
