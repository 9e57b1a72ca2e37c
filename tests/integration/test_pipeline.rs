use std::sync::Arc;
use tfmigrate::core::{
    build_pipeline, Diagnostics, ErrorCategory, MigrateError, PipelineBuilder, StateOutcome,
    StatePath, TransformerRegistry,
};
use tfmigrate::core::{BlockAction, ResourceTransformer};
use tfmigrate::resources;

const MIXED_CONFIG: &str = r#"# DNS for the marketing site
resource "cloudflare_record" "www" {
  zone_id = var.zone_id
  name    = "www"
  value   = "192.0.2.1"
  type    = "A"
  proxied = true
}

resource "cloudflare_zone_settings_override" "main" {
  zone_id = var.zone_id
  settings {
    tls_1_3 = "on"
  }
}

output "record_id" {
  value = cloudflare_record.www.id
}
"#;

fn all_resources() -> Arc<TransformerRegistry> {
    let mut registry = TransformerRegistry::new();
    resources::register_all(&mut registry);
    Arc::new(registry)
}

#[test]
fn test_mixed_file_is_migrated() {
    let pipeline = build_pipeline(all_resources());
    let output = pipeline.transform_unit(MIXED_CONFIG.as_bytes(), "main.tf").unwrap();
    let text = String::from_utf8(output.content).unwrap();

    assert!(output.changed);
    assert!(text.starts_with("# DNS for the marketing site\n"), "{text}");
    assert!(
        text.contains(
            r#"resource "cloudflare_dns_record" "www" {
  zone_id = var.zone_id
  name    = "www"
  content = "192.0.2.1"
  type    = "A"
  proxied = true
  ttl     = 1
}
"#
        ),
        "{text}"
    );
    assert!(!text.contains("cloudflare_zone_settings_override"), "{text}");
    // References to the old type are left for the user.
    assert!(text.contains("value = cloudflare_record.www.id"), "{text}");
    assert!(text.ends_with("}\n"));

    let warnings: Vec<String> = output.diagnostics.warnings().map(|d| d.summary.clone()).collect();
    assert_eq!(warnings, ["removed cloudflare_zone_settings_override.main"]);
}

#[test]
fn test_second_run_is_a_no_op() {
    let pipeline = build_pipeline(all_resources());
    let once = pipeline.transform(MIXED_CONFIG.as_bytes(), "main.tf").unwrap();
    let twice = pipeline.transform_unit(&once, "main.tf").unwrap();
    assert_eq!(String::from_utf8(twice.content).unwrap(), String::from_utf8(once).unwrap());
    assert!(!twice.changed);
}

#[test]
fn test_comments_inside_data_block_are_kept() {
    let source = r#"resource "cloudflare_record" "caa" {
  name = "@"
  type = "CAA"
  data {
    # issuer flag
    flags = 0 # critical
    tag = "issue"
  }
}
"#;
    let pipeline = build_pipeline(all_resources());
    let output = pipeline.transform(source.as_bytes(), "caa.tf").unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(
        text.contains("  data = {\n    # issuer flag\n    flags = 0 # critical\n    tag   = \"issue\"\n  }\n"),
        "{text}"
    );
}

#[test]
fn test_unregistered_types_pass_through() {
    let source = r#"terraform {
  required_providers {
    cloudflare = {
      source  = "cloudflare/cloudflare"
      version = "~> 5.0"
    }
  }
}

resource "aws_instance" "web" {
  ami           = "ami-123"
  instance_type = "t3.micro" # smallest
}
"#;
    let pipeline = build_pipeline(all_resources());
    let output = pipeline.transform_unit(source.as_bytes(), "main.tf").unwrap();
    assert_eq!(String::from_utf8(output.content).unwrap(), source);
    assert!(!output.changed);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_parse_failure_reports_position() {
    let pipeline = build_pipeline(all_resources());
    let err = pipeline
        .transform(b"resource \"cloudflare_record\" \"a\" {\n  value = \n", "broken.tf")
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ParseError);
    assert!(err.message.starts_with("failed to parse HCL: broken.tf:"), "{}", err.message);
    assert_eq!(err.context.get("stage").map(String::as_str), Some("parse"));
}

#[test]
fn test_crlf_input_is_normalized() {
    let pipeline = build_pipeline(all_resources());
    let output = pipeline.transform(b"locals {\r\n  a = 1\r\n}\r\n", "main.tf").unwrap();
    assert_eq!(output, b"locals {\n  a = 1\n}\n".to_vec());
}

struct FailingTransformer;

impl ResourceTransformer for FailingTransformer {
    fn resource_type(&self) -> &str {
        "broken_thing"
    }

    fn transform_block(
        &self,
        _block: &mut hcl_edit::structure::Block,
        _diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError> {
        Err(MigrateError::new(
            ErrorCategory::TransformerError,
            "cannot migrate broken_thing",
        ))
    }

    fn transform_state(&self, _resource: &serde_json::Value, _path: &StatePath) -> StateOutcome {
        StateOutcome::Fail("cannot migrate broken_thing".to_string())
    }
}

#[test]
fn test_transformer_error_names_stage_and_type() {
    let mut registry = TransformerRegistry::new();
    registry.register(FailingTransformer);
    let pipeline = PipelineBuilder::new(Arc::new(registry))
        .with_preprocessing()
        .with_parsing()
        .with_resource_transformation()
        .with_formatting()
        .build();

    let err = pipeline
        .transform(b"resource \"broken_thing\" \"x\" {}\n", "main.tf")
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::TransformerError);
    assert_eq!(err.context.get("stage").map(String::as_str), Some("transform"));
    assert_eq!(
        err.context.get("resource_type").map(String::as_str),
        Some("broken_thing")
    );
}

#[test]
fn test_pipeline_is_shareable_across_threads() {
    let pipeline = build_pipeline(all_resources());
    let inputs: Vec<String> = (0..4)
        .map(|i| format!("resource \"cloudflare_record\" \"r{i}\" {{\n  value = \"10.0.0.{i}\"\n}}\n"))
        .collect();

    let outputs: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let pipeline = &pipeline;
                scope.spawn(move || pipeline.transform(input.as_bytes(), &format!("r{i}.tf")))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    for (i, output) in outputs.iter().enumerate() {
        let text = std::str::from_utf8(output).unwrap();
        assert!(text.contains(&format!("content = \"10.0.0.{i}\"")), "{text}");
    }
}
