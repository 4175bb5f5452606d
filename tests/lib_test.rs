//! Library integration tests.

use asset_include::AssetIncludeError;

#[test]
fn error_types_are_public() {
    let err = AssetIncludeError::ManifestParse {
        path: "/build/rev-manifest.json".into(),
        message: "expected value".into(),
    };
    assert!(err.to_string().contains("rev-manifest.json"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> asset_include::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn registry_types_are_public() {
    use asset_include::config::{AppPaths, AssetConfig};
    use asset_include::manifest::Manifest;
    use asset_include::registry::ResourceRegistry;

    let registry = ResourceRegistry::new(
        AssetConfig::default(),
        Manifest::new(),
        AppPaths::new("/srv/app"),
    );
    assert_eq!(registry.header(), "");
    assert_eq!(registry.footer(), "");
}
