//! Concrete resource transformers and the name → constructor table used to register them.

mod dns_record;
mod zone_settings_override;

pub use dns_record::DnsRecord;
pub use zone_settings_override::ZoneSettingsOverride;

use crate::core::registry::TransformerRegistry;
use crate::core::transformer::ResourceTransformer;
use indexmap::IndexMap;

/// Builds a fresh transformer.
pub type TransformerFactory = fn() -> Box<dyn ResourceTransformer>;

/// Factory table keyed by the short name accepted on the command line.
pub type FactoryTable = IndexMap<&'static str, TransformerFactory>;

pub fn factories() -> FactoryTable {
    let mut table: FactoryTable = IndexMap::new();
    table.insert("dns_record", || Box::new(DnsRecord));
    table.insert("zone_settings_override", || Box::new(ZoneSettingsOverride));
    table.sort_keys();
    table
}

/// Register the transformers named in `names` from `table`, or every entry when `names` is
/// empty. Unknown names are skipped. Returns how many transformers were registered.
pub fn register_from(
    table: &FactoryTable,
    registry: &mut TransformerRegistry,
    names: &[String],
) -> usize {
    if names.is_empty() {
        tracing::info!(count = table.len(), "registering all available resources");
        for factory in table.values() {
            registry.register_boxed(factory());
        }
        return table.len();
    }

    tracing::debug!(resources = ?names, "registering selected resources");
    let mut registered = 0;
    for name in names {
        match table.get(name.as_str()) {
            Some(factory) => {
                registry.register_boxed(factory());
                registered += 1;
            }
            None => tracing::warn!(resource = %name, "unknown resource, skipping"),
        }
    }
    registered
}

pub fn register_from_factories(registry: &mut TransformerRegistry, names: &[String]) -> usize {
    register_from(&factories(), registry, names)
}

pub fn register_all(registry: &mut TransformerRegistry) -> usize {
    register_from_factories(registry, &[])
}

/// Short names of every available transformer, sorted.
pub fn available_resources() -> Vec<&'static str> {
    factories().keys().copied().collect()
}
