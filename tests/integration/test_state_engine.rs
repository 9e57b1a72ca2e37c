use serde_json::{json, Value};
use std::sync::Arc;
use tfmigrate::core::{
    build_state_pipeline, BlockAction, Diagnostics, ErrorCategory, MigrateError,
    ResourceTransformer, StateOutcome, StatePatch, StatePath, TransformerRegistry,
};
use tfmigrate::resources;

/// Test transformer whose state behaviour is a plain function.
struct FnTransformer {
    resource_type: &'static str,
    state: fn(&Value) -> StateOutcome,
}

impl ResourceTransformer for FnTransformer {
    fn resource_type(&self) -> &str {
        self.resource_type
    }

    fn transform_block(
        &self,
        _block: &mut hcl_edit::structure::Block,
        _diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError> {
        Ok(BlockAction::Keep)
    }

    fn transform_state(&self, resource: &Value, _path: &StatePath) -> StateOutcome {
        (self.state)(resource)
    }
}

fn run(registry: TransformerRegistry, input: &Value) -> Value {
    let pipeline = build_state_pipeline(Arc::new(registry));
    let output = pipeline
        .transform_state(input.to_string().as_bytes(), "terraform.tfstate")
        .unwrap();
    serde_json::from_slice(&output).unwrap()
}

fn delete_marked(resource: &Value) -> StateOutcome {
    if resource.get("doomed") == Some(&Value::Bool(true)) {
        StateOutcome::Delete
    } else {
        StateOutcome::Keep(StatePatch::new())
    }
}

#[test]
fn test_rename_scenario_output() {
    let mut registry = TransformerRegistry::new();
    registry.register(FnTransformer {
        resource_type: "dns_record",
        state: |resource| StateOutcome::Keep(StatePatch::new().rename(resource, "foo", "data")),
    });
    let pipeline = build_state_pipeline(Arc::new(registry));

    let output = pipeline
        .transform_state(
            br#"{"resources":[{"type":"dns_record","path":"resources.0","foo":"bar"}]}"#,
            "terraform.tfstate",
        )
        .unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(text.ends_with("}\n"));
    insta::assert_snapshot!(text.trim_end(), @r#"
{
  "resources": [
    {
      "type": "dns_record",
      "path": "resources.0",
      "data": "bar"
    }
  ]
}
"#);
}

#[test]
fn test_deletion_keeps_exactly_the_survivors() {
    let mut registry = TransformerRegistry::new();
    registry.register(FnTransformer {
        resource_type: "thing",
        state: delete_marked,
    });
    let resources: Vec<Value> = (0..7)
        .map(|i| json!({"type": "thing", "id": i, "doomed": i % 3 == 0, "tags": {"n": i}}))
        .collect();
    let input = json!({"version": 4, "resources": resources});

    let output = run(registry, &input);

    let survivors = output["resources"].as_array().unwrap();
    assert_eq!(survivors.len(), 4);
    let expected: Vec<&Value> = resources
        .iter()
        .filter(|r| r["doomed"] == json!(false))
        .collect();
    assert_eq!(survivors.iter().collect::<Vec<_>>(), expected);
    assert_eq!(output["version"], json!(4));
}

#[test]
fn test_deleting_the_middle_entry_keeps_its_neighbours_once() {
    let mut registry = TransformerRegistry::new();
    registry.register(FnTransformer {
        resource_type: "thing",
        state: delete_marked,
    });
    let input = json!({"resources": [
        {"type": "thing", "name": "first"},
        {"type": "thing", "name": "second", "doomed": true},
        {"type": "thing", "name": "third"}
    ]});

    let output = run(registry, &input);

    assert_eq!(
        output["resources"],
        json!([
            {"type": "thing", "name": "first"},
            {"type": "thing", "name": "third"}
        ])
    );
}

#[test]
fn test_patch_merges_instead_of_replacing() {
    let mut registry = TransformerRegistry::new();
    registry.register(FnTransformer {
        resource_type: "thing",
        state: |_| StateOutcome::Keep(StatePatch::new().set("new_field", "x")),
    });
    let input = json!({"resources": [{"type": "thing", "old_field": "y"}]});

    let output = run(registry, &input);

    assert_eq!(
        output["resources"][0],
        json!({"type": "thing", "old_field": "y", "new_field": "x"})
    );
}

#[test]
fn test_unregistered_entries_are_untouched() {
    let input = json!({"resources": [{"type": "aws_instance", "instances": [{"attributes": {"value": 1}}]}]});
    let output = run(TransformerRegistry::new(), &input);
    assert_eq!(output, input);
}

#[test]
fn test_failure_aborts_the_document() {
    let mut registry = TransformerRegistry::new();
    registry.register(FnTransformer {
        resource_type: "thing",
        state: |_| StateOutcome::Fail("unexpected layout".to_string()),
    });
    let pipeline = build_state_pipeline(Arc::new(registry));

    let err = pipeline
        .transform_state(br#"{"resources":[{"type":"thing"}]}"#, "prod.tfstate")
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::TransformerError);
    assert_eq!(err.message, "failed to transform thing state: unexpected layout");
    assert_eq!(err.context.get("file").map(String::as_str), Some("prod.tfstate"));
}

#[test]
fn test_cloudflare_state_document() {
    let mut registry = TransformerRegistry::new();
    resources::register_all(&mut registry);
    let input = json!({
        "version": 4,
        "terraform_version": "1.5.7",
        "resources": [
            {
                "mode": "managed",
                "type": "cloudflare_zone_settings_override",
                "name": "main",
                "provider": "provider[\"registry.terraform.io/cloudflare/cloudflare\"]",
                "instances": [{"schema_version": 0, "attributes": {"zone_id": "z1"}}]
            },
            {
                "mode": "managed",
                "type": "cloudflare_record",
                "name": "www",
                "provider": "provider[\"registry.terraform.io/cloudflare/cloudflare\"]",
                "instances": [{
                    "schema_version": 3,
                    "attributes": {
                        "id": "rec1",
                        "zone_id": "z1",
                        "name": "www",
                        "type": "A",
                        "value": "192.0.2.1",
                        "hostname": "www.example.com",
                        "allow_overwrite": false,
                        "ttl": 300,
                        "data": []
                    }
                }]
            }
        ]
    });

    let output = run(registry, &input);

    let resources = output["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["type"], json!("cloudflare_dns_record"));
    assert_eq!(resources[0]["name"], json!("www"));
    assert_eq!(
        resources[0]["instances"][0],
        json!({
            "schema_version": 0,
            "attributes": {
                "id": "rec1",
                "zone_id": "z1",
                "name": "www",
                "type": "A",
                "ttl": 300,
                "content": "192.0.2.1"
            }
        })
    );
    assert_eq!(output["terraform_version"], json!("1.5.7"));
}

#[test]
fn test_malformed_state_is_rejected() {
    let pipeline = build_state_pipeline(Arc::new(TransformerRegistry::new()));
    let err = pipeline
        .transform_state(b"{\"resources\": [", "terraform.tfstate")
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::SerializationError);
    assert!(err.message.starts_with("invalid state JSON"));
}
