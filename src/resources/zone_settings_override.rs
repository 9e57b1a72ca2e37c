use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::error::MigrateError;
use crate::core::state::StatePath;
use crate::core::transformer::{BlockAction, ResourceTransformer, StateOutcome};
use hcl_edit::structure::Block;
use serde_json::Value;

const SOURCE_TYPE: &str = "cloudflare_zone_settings_override";

/// `cloudflare_zone_settings_override` has no counterpart in the new schema, so blocks and state
/// entries are removed. Settings need to be recreated by hand as individual zone settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZoneSettingsOverride;

impl ResourceTransformer for ZoneSettingsOverride {
    fn resource_type(&self) -> &str {
        SOURCE_TYPE
    }

    fn transform_block(
        &self,
        block: &mut Block,
        diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError> {
        let name = block
            .labels
            .get(1)
            .map(|label| label.as_str().to_string())
            .unwrap_or_default();
        diagnostics.push(
            Diagnostic::warning(format!("removed {}.{}", SOURCE_TYPE, name)).with_detail(
                "the resource no longer exists; recreate its settings as individual zone setting resources",
            ),
        );
        Ok(BlockAction::Remove)
    }

    fn transform_state(&self, _resource: &Value, path: &StatePath) -> StateOutcome {
        tracing::debug!(path = %path, "dropping zone settings override from state");
        StateOutcome::Delete
    }
}
