use std::any::Any;

use crate::chain::{BundlerChain, BundlerPlugin};
use crate::compilation::Compilation;

struct Marker {
    label: &'static str,
}

impl BundlerPlugin for Marker {
    fn name(&self) -> &str {
        "marker"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn after_emit(&mut self, compilation: &mut Compilation) -> anyhow::Result<()> {
        compilation.push_warning(self.label);
        Ok(())
    }
}

#[test]
fn use_plugin_installs_into_named_slot() {
    let mut chain = BundlerChain::new();
    let replaced = chain.plugin("marker").use_plugin(Marker { label: "first" });

    assert!(replaced.is_none());
    assert!(chain.has("marker"));
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.get("marker").map(|plugin| plugin.name()), Some("marker"));
}

#[test]
fn use_plugin_replaces_occupied_slot_in_place() {
    let mut chain = BundlerChain::new();
    chain.plugin("a").use_plugin(Marker { label: "a" });
    chain.plugin("b").use_plugin(Marker { label: "b" });

    let replaced = chain.plugin("a").use_plugin(Marker { label: "a2" });

    assert!(replaced.is_some());
    assert_eq!(chain.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    let marker = chain.get_as::<Marker>("a").expect("slot a");
    assert_eq!(marker.label, "a2");
}

#[test]
fn get_as_rejects_wrong_type() {
    let mut chain = BundlerChain::new();
    chain.plugin("marker").use_plugin(Marker { label: "x" });

    assert!(chain.get_as::<String>("marker").is_none());
    assert!(chain.get_as::<Marker>("missing").is_none());
}

#[test]
fn remove_drops_slot() {
    let mut chain = BundlerChain::new();
    chain.plugin("marker").use_plugin(Marker { label: "x" });

    assert!(chain.remove("marker").is_some());
    assert!(chain.is_empty());
}
