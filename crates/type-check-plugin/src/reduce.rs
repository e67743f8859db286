//! Folding a default options value with user override layers.
//!
//! A [`ConfigChain`] is either a literal partial value, a function producing
//! one, or an ordered list of chains. Layers apply left to right, so later
//! layers win on every field both of them set. A function layer sees the
//! value accumulated so far plus the build context and may return `None` to
//! contribute nothing; it can append to a list by reading the current value.

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// Function layer: `(current, context) -> partial override or nothing`.
pub type ConfigFn<T, P, C> = Arc<dyn Fn(&T, &C) -> Result<Option<P>> + Send + Sync>;

pub enum ConfigChain<T, P, C> {
    Value(P),
    Function(ConfigFn<T, P, C>),
    Many(Vec<ConfigChain<T, P, C>>),
}

impl<T, P, C> ConfigChain<T, P, C> {
    pub fn value(partial: P) -> Self {
        ConfigChain::Value(partial)
    }

    pub fn function(
        layer: impl Fn(&T, &C) -> Result<Option<P>> + Send + Sync + 'static,
    ) -> Self {
        ConfigChain::Function(Arc::new(layer))
    }

    pub fn many(layers: impl IntoIterator<Item = ConfigChain<T, P, C>>) -> Self {
        ConfigChain::Many(layers.into_iter().collect())
    }
}

impl<T, P: Clone, C> Clone for ConfigChain<T, P, C> {
    fn clone(&self) -> Self {
        match self {
            ConfigChain::Value(partial) => ConfigChain::Value(partial.clone()),
            ConfigChain::Function(layer) => ConfigChain::Function(Arc::clone(layer)),
            ConfigChain::Many(layers) => ConfigChain::Many(layers.clone()),
        }
    }
}

impl<T, P: fmt::Debug, C> fmt::Debug for ConfigChain<T, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigChain::Value(partial) => f.debug_tuple("Value").field(partial).finish(),
            ConfigChain::Function(_) => f.write_str("Function(..)"),
            ConfigChain::Many(layers) => f.debug_tuple("Many").field(layers).finish(),
        }
    }
}

/// Accepts a single partial object or an array of them.
impl<'de, T, P, C> Deserialize<'de> for ConfigChain<T, P, C>
where
    P: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany<P> {
            Many(Vec<P>),
            One(P),
        }

        Ok(match OneOrMany::<P>::deserialize(deserializer)? {
            OneOrMany::Many(values) => {
                ConfigChain::Many(values.into_iter().map(ConfigChain::Value).collect())
            }
            OneOrMany::One(value) => ConfigChain::Value(value),
        })
    }
}

/// Fold `config` over `initial` with `merge_fn`.
///
/// Returns `initial` untouched when there is no config. An error from a
/// function layer aborts the fold and is returned as-is.
pub fn reduce_configs<T, P, C, F>(
    initial: T,
    config: Option<&ConfigChain<T, P, C>>,
    context: &C,
    merge_fn: F,
) -> Result<T>
where
    P: Clone,
    F: Fn(T, P) -> T,
{
    let Some(config) = config else {
        return Ok(initial);
    };
    apply_layer(initial, config, context, &merge_fn)
}

fn apply_layer<T, P, C, F>(
    current: T,
    layer: &ConfigChain<T, P, C>,
    context: &C,
    merge_fn: &F,
) -> Result<T>
where
    P: Clone,
    F: Fn(T, P) -> T,
{
    match layer {
        ConfigChain::Value(partial) => Ok(merge_fn(current, partial.clone())),
        ConfigChain::Function(layer) => match layer(&current, context)? {
            Some(partial) => Ok(merge_fn(current, partial)),
            None => Ok(current),
        },
        ConfigChain::Many(layers) => layers
            .iter()
            .try_fold(current, |acc, layer| apply_layer(acc, layer, context, merge_fn)),
    }
}
