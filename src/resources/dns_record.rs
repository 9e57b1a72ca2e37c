use crate::core::diagnostics::Diagnostics;
use crate::core::error::MigrateError;
use crate::core::hcl;
use crate::core::state::StatePath;
use crate::core::transformer::{BlockAction, ResourceTransformer, StateOutcome, StatePatch};
use hcl_edit::structure::Block;
use serde_json::{Map, Value};

const SOURCE_TYPE: &str = "cloudflare_record";
const TARGET_TYPE: &str = "cloudflare_dns_record";
const DROPPED_ATTRIBUTES: [&str; 2] = ["hostname", "allow_overwrite"];
const DEFAULT_TTL: i64 = 1;

/// `cloudflare_record` becomes `cloudflare_dns_record`.
///
/// `value` is folded into `content`, the computed `hostname` and the `allow_overwrite` switch
/// disappear, `data` turns from a nested block into an object and `ttl` becomes required
/// (`1` means automatic).
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsRecord;

impl ResourceTransformer for DnsRecord {
    fn resource_type(&self) -> &str {
        SOURCE_TYPE
    }

    fn transform_block(
        &self,
        block: &mut Block,
        _diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError> {
        hcl::set_resource_type(block, TARGET_TYPE);

        let body = &mut block.body;
        if hcl::has_attribute(body, "content") {
            hcl::remove_attribute(body, "value");
        } else {
            hcl::rename_attribute(body, "value", "content");
        }
        for attribute in DROPPED_ATTRIBUTES {
            hcl::remove_attribute(body, attribute);
        }
        hcl::block_to_object_attribute(body, "data")?;
        if !hcl::has_attribute(body, "ttl") {
            hcl::push_attribute(body, "ttl", &DEFAULT_TTL.to_string())?;
        }
        Ok(BlockAction::Keep)
    }

    fn transform_state(&self, resource: &Value, _path: &StatePath) -> StateOutcome {
        let patch = StatePatch::new().set("type", TARGET_TYPE);
        match resource.get("instances") {
            None => StateOutcome::Keep(patch),
            Some(Value::Array(instances)) => {
                let migrated: Vec<Value> = instances.iter().map(migrate_instance).collect();
                StateOutcome::Keep(patch.set("instances", migrated))
            }
            Some(other) => StateOutcome::Fail(format!(
                "instances must be an array, found {}",
                json_kind(other)
            )),
        }
    }
}

fn migrate_instance(instance: &Value) -> Value {
    let mut instance = instance.clone();
    if let Some(fields) = instance.as_object_mut() {
        fields.insert("schema_version".to_string(), Value::from(0));
        if let Some(attributes) = fields.get_mut("attributes").and_then(Value::as_object_mut) {
            migrate_attributes(attributes);
        }
    }
    instance
}

fn migrate_attributes(attributes: &mut Map<String, Value>) {
    if let Some(value) = attributes.shift_remove("value") {
        let has_content = attributes.get("content").is_some_and(|content| !content.is_null());
        if !has_content {
            attributes.insert("content".to_string(), value);
        }
    }
    for attribute in DROPPED_ATTRIBUTES {
        attributes.shift_remove(attribute);
    }

    // Lists of at most one element were how nested blocks were stored.
    let single = match attributes.get("data") {
        Some(Value::Array(items)) if items.len() <= 1 => Some(items.first().cloned()),
        _ => None,
    };
    match single {
        Some(Some(data)) => {
            attributes.insert("data".to_string(), data);
        }
        Some(None) => {
            attributes.shift_remove("data");
        }
        None => {}
    }

    if attributes.get("ttl").map_or(true, Value::is_null) {
        attributes.insert("ttl".to_string(), Value::from(DEFAULT_TTL));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
