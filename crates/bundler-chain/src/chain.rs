use anyhow::Result;
use indexmap::IndexMap;
use std::any::Any;

use crate::compilation::Compilation;

/// A plugin installed into a [`BundlerChain`] slot.
///
/// `before_compile` runs before the host emits assets and must not block on
/// long-running work; `after_emit` runs once emitting is done and may collect
/// results started earlier.
pub trait BundlerPlugin: Send {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn before_compile(&mut self, _compilation: &mut Compilation) -> Result<()> {
        Ok(())
    }

    fn after_emit(&mut self, _compilation: &mut Compilation) -> Result<()> {
        Ok(())
    }
}

/// Ordered set of plugins keyed by slot id.
///
/// Installing into an occupied slot replaces the previous plugin but keeps
/// the slot's position.
#[derive(Default)]
pub struct BundlerChain {
    plugins: IndexMap<String, Box<dyn BundlerPlugin>>,
}

impl BundlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plugin(&mut self, id: &str) -> PluginSlot<'_> {
        PluginSlot {
            chain: self,
            id: id.to_string(),
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn BundlerPlugin> {
        self.plugins.get(id).map(|plugin| plugin.as_ref())
    }

    /// Look up a slot and downcast it to the concrete plugin type.
    pub fn get_as<T: 'static>(&self, id: &str) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn remove(&mut self, id: &str) -> Option<Box<dyn BundlerPlugin>> {
        self.plugins.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    pub(crate) fn plugins_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn BundlerPlugin>> {
        self.plugins.values_mut()
    }
}

impl std::fmt::Debug for BundlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundlerChain")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handle to one slot of a [`BundlerChain`].
pub struct PluginSlot<'a> {
    chain: &'a mut BundlerChain,
    id: String,
}

impl PluginSlot<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Install `plugin` into this slot, returning the plugin it replaced.
    pub fn use_plugin<P>(self, plugin: P) -> Option<Box<dyn BundlerPlugin>>
    where
        P: BundlerPlugin + 'static,
    {
        tracing::debug!(slot = %self.id, plugin = plugin.name(), "install plugin");
        self.chain.plugins.insert(self.id, Box::new(plugin))
    }
}
