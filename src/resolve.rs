//! Recipe resolution: turning a typed recipe into what an engine consumes.
//!
//! [`resolve`] is pure. The same recipe always yields the same token and the
//! same options in the same order. Parameters the caller left unset are
//! dropped entirely, so the engine's own default applies to them.

use crate::convert::EngineValue;
use crate::recipe::{OptionKey, Recipe, Token};
use tracing::trace;

/// An engine operation token plus the options to set on it, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub token: Token,
    pub options: Vec<(OptionKey, EngineValue)>,
}

impl Resolved {
    pub fn option(&self, key: OptionKey) -> Option<&EngineValue> {
        self.options.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Option keys in application order.
    pub fn keys(&self) -> Vec<OptionKey> {
        self.options.iter().map(|(k, _)| *k).collect()
    }
}

pub fn resolve(recipe: &Recipe) -> Resolved {
    let sub = recipe.sub_recipe();
    let token = sub.token();
    let options = sub
        .options()
        .into_iter()
        .filter_map(|(key, value)| {
            if value.is_none() {
                trace!(%token, %key, "unset, engine default applies");
            }
            value.map(|v| (key, v))
        })
        .collect();
    Resolved { token, options }
}
