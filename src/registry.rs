//! The request-scoped resource registry and renderer.
//!
//! [`ResourceRegistry`] owns every resource and package registered for one
//! request: it deduplicates resources by hash, buckets them by
//! (kind, location), applies priority ordering, and renders the header and
//! footer blocks. It also resolves logical paths to servable URLs through
//! the revision manifest and filesystem fallbacks, and collects HTTP/2
//! preload header values for the host to attach to the response.
//!
//! One registry instance serves one request; construct it at the start of
//! the request and drop it at the end.

use crate::config::{AppPaths, AssetConfig, PackageEntry};
use crate::error::Result;
use crate::html::{self, Attributes};
use crate::manifest::Manifest;
use crate::package::{AssetPackage, PackageFactory, PackageInit, PackageRequest};
use crate::resource::{Location, Resource, ResourceKind};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// An arbitrary head element rendered ahead of registered resources.
#[derive(Debug, Clone)]
pub struct HeadTag {
    pub tag: String,
    pub attributes: Attributes,
}

impl HeadTag {
    pub fn new(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            tag: tag.into(),
            attributes,
        }
    }
}

/// A `<meta>` entry, keyed by name. Re-adding a name replaces the entry.
#[derive(Debug, Clone)]
struct MetaTag {
    name: String,
    attributes: Attributes,
    named: bool,
}

/// The central registry of resources and packages for one request.
pub struct ResourceRegistry {
    config: AssetConfig,
    manifest: Manifest,
    paths: AppPaths,
    domain: String,
    secure: bool,
    resources: Vec<Resource>,
    packages: HashMap<String, Box<dyn AssetPackage>>,
    loaded: HashSet<String>,
    factories: HashMap<String, PackageFactory>,
    head_tags: Vec<HeadTag>,
    meta: Vec<MetaTag>,
    extensions: Vec<(ResourceKind, Regex)>,
    default_locations: HashMap<ResourceKind, Location>,
}

impl ResourceRegistry {
    pub fn new(config: AssetConfig, manifest: Manifest, paths: AppPaths) -> Self {
        let mut registry = Self {
            config,
            manifest,
            paths,
            domain: "/".to_string(),
            secure: false,
            resources: Vec::new(),
            packages: HashMap::new(),
            loaded: HashSet::new(),
            factories: HashMap::new(),
            head_tags: Vec::new(),
            meta: Vec::new(),
            extensions: Vec::new(),
            default_locations: HashMap::from([
                (ResourceKind::Css, Location::Header),
                (ResourceKind::Js, Location::Footer),
            ]),
        };

        registry.map_extension(ResourceKind::Css, "css");
        registry.map_extension(ResourceKind::Js, "js");
        registry
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Is CDN mode active?
    pub fn cdn_enabled(&self) -> bool {
        self.config.cdn
    }

    /// Set the domain resources are served from.
    pub fn set_domain(&mut self, domain: &str) -> &mut Self {
        let trimmed = domain.trim_end_matches('/');
        self.domain = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn set_secure(&mut self, secure: bool) -> &mut Self {
        self.secure = secure;
        self
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Map an extra file extension onto a resource kind.
    pub fn map_extension(&mut self, kind: ResourceKind, extension: &str) {
        let pattern = format!(r"(?i)(\.{0}|/{0}\?)$", regex::escape(extension));
        if let Ok(re) = Regex::new(&pattern) {
            self.extensions.push((kind, re));
        }
    }

    /// Identify the kind and target location for a path.
    ///
    /// The location is only filled in when unset and the kind is known,
    /// using the per-kind defaults (css→header, js→footer).
    pub fn parse_extension(
        &self,
        path: &str,
        location: Option<Location>,
    ) -> (Option<ResourceKind>, Option<Location>) {
        let mut kind = None;

        for (candidate, pattern) in &self.extensions {
            if pattern.is_match(path) {
                kind = Some(*candidate);
                break;
            }
        }

        let location = location.or_else(|| {
            kind.map(|kind| {
                self.default_locations
                    .get(&kind)
                    .copied()
                    .unwrap_or(Location::Footer)
            })
        });

        (kind, location)
    }

    // --- Resource registration ---

    /// Register a resource by path.
    ///
    /// Returns the stored entry so the caller can adjust it further.
    pub fn add(
        &mut self,
        path: &str,
        location: Option<Location>,
        attributes: Attributes,
        priority: Option<i32>,
    ) -> &mut Resource {
        let mut resource = Resource::by_path(path, location, attributes, self);

        if let Some(priority) = priority {
            resource.set_priority(priority);
        }

        self.store_resource(resource)
    }

    /// Register a resource that renders before default-priority entries.
    pub fn add_first(
        &mut self,
        path: &str,
        location: Option<Location>,
        attributes: Attributes,
    ) -> &mut Resource {
        self.add(path, location, attributes, Some(1))
    }

    /// Register raw inline content.
    pub fn content(
        &mut self,
        kind: ResourceKind,
        content: &str,
        location: Location,
    ) -> &mut Resource {
        self.store_resource(Resource::by_content(kind, content, location))
    }

    /// Store a resource keyed by its hash.
    ///
    /// An existing entry with the same hash is replaced in place, keeping
    /// its original position.
    pub fn store_resource(&mut self, resource: Resource) -> &mut Resource {
        match self
            .resources
            .iter()
            .position(|stored| stored.hash() == resource.hash())
        {
            Some(index) => {
                self.resources[index] = resource;
                &mut self.resources[index]
            }
            None => {
                self.resources.push(resource);
                let index = self.resources.len() - 1;
                &mut self.resources[index]
            }
        }
    }

    /// All stored resources, in registration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    // --- URL resolution ---

    /// Resolve a logical path to a servable URL.
    ///
    /// Resolution order: external passthrough, manifest revision, file
    /// under the public root, file under the conventional `assets`
    /// subfolder. An empty string signals that nothing matched.
    pub fn url(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }

        if let Some(revision) = self.manifest.revision(path) {
            if self.config.source == "build" {
                return format!("/build/{}", revision);
            }
            return format!("/{}/{}", self.config.source, path);
        }

        let relative = path.trim_start_matches('/');

        if self.paths.public_root.join(relative).exists() {
            return path.to_string();
        }

        if self.paths.public_root.join("assets").join(relative).exists() {
            return format!("/assets/{}", relative);
        }

        tracing::debug!("no servable url for {}", path);
        String::new()
    }

    /// Apply the configured domain to an already-resolved path.
    pub(crate) fn resource_url(&self, path: &str) -> String {
        if self.domain == "/" {
            return path.to_string();
        }

        let domain = if self.domain.contains("://") || self.domain.starts_with("//") {
            self.domain.clone()
        } else if self.secure {
            format!("https://{}", self.domain)
        } else {
            format!("http://{}", self.domain)
        };

        format!("{}/{}", domain, path.trim_start_matches('/'))
    }

    // --- Rendering ---

    /// Render every resource in one (kind, location) bucket.
    ///
    /// Resources render in ascending priority order; ties keep their
    /// registration order. In the local environment the bucket is
    /// prefixed with a comment marker naming it.
    pub fn render(&self, kind: ResourceKind, location: Location) -> String {
        let mut result = String::new();

        if self.config.env.is_local() {
            result.push_str(&format!("<!-- {}/{} -->\n", kind, location));
        }

        let mut bucket: Vec<&Resource> = self
            .resources
            .iter()
            .filter(|resource| resource.kind() == Some(kind) && resource.location() == location)
            .collect();
        bucket.sort_by_key(|resource| resource.priority());

        for resource in bucket {
            let rendered = resource.render(self);
            if rendered.is_empty() {
                continue;
            }
            result.push_str(&rendered);
            result.push('\n');
        }

        result
    }

    /// Render the header block: head tags, meta, then the header and
    /// inline css/js buckets.
    pub fn header(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.head_tags());
        output.push_str(&self.meta());
        output.push_str(&self.render(ResourceKind::Css, Location::Header));
        output.push_str(&self.render(ResourceKind::Css, Location::Inline));
        output.push_str(&self.render(ResourceKind::Js, Location::Header));
        output.push_str(&self.render(ResourceKind::Js, Location::HeaderInline));
        output
    }

    /// Render the footer block: footer css/js buckets and document-ready
    /// scripts.
    pub fn footer(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.render(ResourceKind::Css, Location::Footer));
        output.push_str(&self.render(ResourceKind::Css, Location::FooterInline));
        output.push_str(&self.render(ResourceKind::Js, Location::Footer));
        output.push_str(&self.render(ResourceKind::Js, Location::FooterInline));
        output.push_str(&self.render(ResourceKind::Js, Location::Ready));
        output
    }

    /// Write the header block to an output stream.
    pub fn write_header<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.header().as_bytes())?;
        Ok(())
    }

    /// Write the footer block to an output stream.
    pub fn write_footer<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.footer().as_bytes())?;
        Ok(())
    }

    // --- Head tags and meta ---

    pub fn add_head_tag(&mut self, tag: HeadTag) -> &mut Self {
        self.head_tags.push(tag);
        self
    }

    pub fn add_head_tags(&mut self, tags: impl IntoIterator<Item = HeadTag>) -> &mut Self {
        self.head_tags.extend(tags);
        self
    }

    /// Render the registered head tags.
    pub fn head_tags(&self) -> String {
        let mut output = String::new();

        for tag in &self.head_tags {
            output.push_str(&html::element(&tag.tag, &tag.attributes));
            output.push('\n');
        }

        output
    }

    /// Add a `<meta>` entry. Re-adding a name replaces the entry in place.
    pub fn add_meta(&mut self, name: &str, attributes: Attributes) -> &mut Self {
        self.push_meta(MetaTag {
            name: name.to_string(),
            attributes,
            named: true,
        });
        self
    }

    /// Add a `<meta>` entry whose name is only a registry key, not a
    /// rendered attribute (charset-style tags).
    pub fn add_meta_nameless(&mut self, name: &str, attributes: Attributes) -> &mut Self {
        self.push_meta(MetaTag {
            name: name.to_string(),
            attributes,
            named: false,
        });
        self
    }

    fn push_meta(&mut self, entry: MetaTag) {
        match self.meta.iter().position(|meta| meta.name == entry.name) {
            Some(index) => self.meta[index] = entry,
            None => self.meta.push(entry),
        }
    }

    /// Render the registered meta entries.
    pub fn meta(&self) -> String {
        let mut output = String::new();

        for meta in &self.meta {
            let mut attributes = Attributes::new();
            if meta.named {
                attributes.set("name", meta.name.as_str());
            }
            attributes.extend(&meta.attributes);

            output.push_str(&html::element("meta", &attributes));
            output.push('\n');
        }

        output
    }

    // --- Packages ---

    /// Register a constructor for a package class identity.
    pub fn register_package<F>(&mut self, class: &str, factory: F)
    where
        F: Fn(PackageInit) -> Box<dyn AssetPackage> + 'static,
    {
        self.factories.insert(class.to_string(), Box::new(factory));
    }

    /// Look up the configured entry for a package name.
    pub fn package_info(&self, name: &str) -> Option<&PackageEntry> {
        self.config.packages.get(name)
    }

    /// Resolve a package version: explicit override, configured version,
    /// then the legacy positional entry.
    pub fn package_version(&self, name: &str, version: Option<&str>) -> Option<String> {
        if let Some(version) = version {
            return Some(version.to_string());
        }

        self.package_info(name)
            .and_then(|entry| entry.version())
            .map(str::to_string)
    }

    /// Integrity digest for one of a package's assets.
    pub fn package_integrity(&self, name: &str, asset: &str) -> Option<String> {
        self.package_info(name)
            .and_then(|entry| entry.integrity(asset))
            .map(str::to_string)
    }

    /// Has a package class been loaded in this registry's lifetime?
    pub fn package_loaded(&self, class: &str) -> bool {
        self.loaded.contains(class)
    }

    /// Load a package by name, at most once per registry lifetime.
    ///
    /// An unconfigured name or an identity with no registered constructor
    /// is skipped; a missing asset never breaks the page.
    pub fn package(&mut self, request: impl Into<PackageRequest>, config: Option<serde_json::Value>) {
        let request = request.into();
        let name = request.name().to_string();

        let Some(class) = self
            .package_info(&name)
            .and_then(|entry| entry.class())
            .map(str::to_string)
        else {
            tracing::debug!("package {} is not configured, skipping", name);
            return;
        };

        if self.loaded.contains(&class) {
            return;
        }

        let Some(factory) = self.factories.remove(&class) else {
            tracing::debug!("no constructor registered for {}, skipping", class);
            return;
        };

        // Mark before the hooks run so re-entrant loads are no-ops.
        self.loaded.insert(class.clone());

        let version_override = request.args().first().and_then(|value| value.as_str());
        let version = self.package_version(&name, version_override);
        let init = PackageInit {
            version,
            args: request.args().to_vec(),
        };

        let mut package = factory(init);
        package.load(self, config);

        self.factories.insert(class.clone(), factory);
        self.packages.insert(class, package);
    }

    /// Load multiple packages.
    pub fn packages<I>(&mut self, requests: I)
    where
        I: IntoIterator,
        I::Item: Into<PackageRequest>,
    {
        for request in requests {
            self.package(request, None);
        }
    }

    // --- HTTP/2 preload ---

    /// Collect `Link` header values for every stored resource that
    /// qualifies for an HTTP/2 preload hint.
    pub fn http2(&self) -> Vec<String> {
        if !self.config.http2 {
            return Vec::new();
        }

        self.resources
            .iter()
            .filter_map(|resource| resource.http2(self))
            .collect()
    }

    // --- Auto-include ---

    /// Register view-associated assets by naming convention.
    ///
    /// `view` is a dotted view identifier (`pages.dashboard`); a trailing
    /// `*` expands into a directory scan. Whether a discovered file is
    /// registered inline or as a link follows the `inline` configuration.
    pub fn auto_include(&mut self, extensions: &[&str], view: &str) {
        let path = view.replace('.', "/");

        if let Some(stripped) = path.strip_suffix('*') {
            self.auto_include_by_wildcard(extensions, stripped);
            return;
        }

        for extension in extensions {
            let file_name = format!("{}.{}", path, extension);
            let (dir, base) = match file_name.rsplit_once('/') {
                Some((dir, base)) => (dir, base),
                None => ("", file_name.as_str()),
            };

            let candidate = self.paths.views_root.join(dir).join(extension).join(base);

            let mut full_path = PathBuf::new();
            if self.config.env.is_local() {
                full_path = if candidate.exists() {
                    candidate
                } else {
                    self.paths.public_root.join("assets").join(&file_name)
                };
            }

            self.load_resource(&file_name, &full_path);
        }
    }

    /// Scan per-extension view directories for assets to register.
    fn auto_include_by_wildcard(&mut self, extensions: &[&str], path: &str) {
        let path = path.trim_end_matches('/');
        let (root, name) = match path.rsplit_once('/') {
            Some((root, name)) => (root, name),
            None => ("", path),
        };

        for extension in extensions {
            let extension_dir = if root.is_empty() {
                format!("{}/{}", extension, name)
            } else {
                format!("{}/{}/{}", root, extension, name)
            };
            let dir = self.paths.views_root.join(&extension_dir);

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(_) => {
                    tracing::debug!("no asset directory at {}, skipping", dir.display());
                    continue;
                }
            };

            // read_dir order is platform-dependent; sort for stable output.
            let mut files: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect();
            files.sort();

            for file in files {
                let file_name = format!("{}/{}", extension_dir, file);
                let full_path = dir.join(&file);
                self.load_resource(&file_name, &full_path);
            }
        }
    }

    /// Register a discovered asset, linked or inline per configuration.
    fn load_resource(&mut self, file_name: &str, full_path: &Path) {
        if !self.config.inline {
            // Linked resources must be in the revision manifest.
            if !self.manifest.has_revision(file_name) {
                tracing::debug!("no manifest revision for {}, skipping", file_name);
                return;
            }

            self.add(file_name, None, Attributes::new(), None);
            return;
        }

        if full_path.as_os_str().is_empty() || !full_path.exists() {
            tracing::debug!("inline candidate missing for {}, skipping", file_name);
            return;
        }

        let path = full_path.to_string_lossy().to_string();
        self.add(&path, Some(Location::FooterInline), Attributes::new(), None);
    }
}
