use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tfmigrate::core::{
    build_pipeline, BlockAction, Diagnostics, MigrateError, ResourceTransformer, StateOutcome,
    StatePath, TransformerRegistry,
};
use tfmigrate::resources::{self, FactoryTable, TransformerFactory};

struct Tagger;

impl ResourceTransformer for Tagger {
    fn resource_type(&self) -> &str {
        "cloudflare_record"
    }

    fn transform_block(
        &self,
        block: &mut hcl_edit::structure::Block,
        _diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError> {
        tfmigrate::core::hcl::push_attribute(&mut block.body, "tagged", "true")?;
        Ok(BlockAction::Keep)
    }

    fn transform_state(&self, _resource: &Value, _path: &StatePath) -> StateOutcome {
        StateOutcome::Delete
    }
}

fn fake_table() -> FactoryTable {
    let mut table: FactoryTable = IndexMap::new();
    let tagger: TransformerFactory = || Box::new(Tagger);
    table.insert("dns_record", tagger);
    table
}

#[test]
fn test_injected_table_replaces_builtins() {
    let mut registry = TransformerRegistry::new();
    let registered = resources::register_from(&fake_table(), &mut registry, &[]);
    assert_eq!(registered, 1);

    let pipeline = build_pipeline(Arc::new(registry));
    let output = pipeline
        .transform(b"resource \"cloudflare_record\" \"a\" {\n  value = \"x\"\n}\n", "a.tf")
        .unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("resource \"cloudflare_record\" \"a\""), "{text}");
    assert!(text.contains("  tagged = true\n"), "{text}");
    assert!(text.contains("  value  = \"x\"\n"), "{text}");
}

#[test]
fn test_later_registration_overrides_builtin() {
    let mut registry = TransformerRegistry::new();
    resources::register_all(&mut registry);
    resources::register_from(&fake_table(), &mut registry, &["dns_record".to_string()]);

    assert_eq!(registry.count(), 2);
    let transformer = registry.find("cloudflare_record").unwrap();
    assert_eq!(
        transformer.transform_state(&Value::Null, &StatePath::resource(0)),
        StateOutcome::Delete
    );
}

#[test]
fn test_selected_subset_only() {
    let mut registry = TransformerRegistry::new();
    resources::register_from_factories(&mut registry, &["zone_settings_override".to_string()]);

    assert_eq!(registry.resource_types(), ["cloudflare_zone_settings_override"]);
    let pipeline = build_pipeline(Arc::new(registry));
    let source = "resource \"cloudflare_record\" \"a\" {\n  value = \"x\"\n}\n";
    assert_eq!(pipeline.transform(source.as_bytes(), "a.tf").unwrap(), source.as_bytes());
}

#[test]
fn test_every_factory_builds_a_distinct_type() {
    let types: Vec<String> = resources::factories()
        .values()
        .map(|factory| factory().resource_type().to_string())
        .collect();
    assert_eq!(types, ["cloudflare_record", "cloudflare_zone_settings_override"]);
    assert_eq!(resources::available_resources().len(), types.len());
}
