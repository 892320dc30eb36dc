use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Message keys understood by the catalog.
pub const CLAIM_SUCCESS: &str = "ClaimSuccess";
pub const NOTHING_TO_CLAIM: &str = "NothingToClaim";
pub const NO_PERMISSION: &str = "NoPermission";

static DEFAULT_MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (CLAIM_SUCCESS, "You have claimed {amount} {item}."),
        (NOTHING_TO_CLAIM, "Nothing to claim."),
        (NO_PERMISSION, "You do not have permission to use this command."),
    ])
});

/// User-facing reply texts with per-key overrides, so a host can localize
/// without touching the claim flow. Placeholders use `{name}` syntax.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    overrides: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text for `key`; unknown keys are accepted and simply
    /// never rendered by this crate.
    pub fn with_override(mut self, key: &str, text: &str) -> Self {
        self.overrides.insert(key.to_string(), text.to_string());
        self
    }

    /// Raw template for `key`; falls back to the documented default, then
    /// to the key itself.
    pub fn template<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(text) = self.overrides.get(key) {
            return text;
        }
        DEFAULT_MESSAGES.get(key).copied().unwrap_or(key)
    }

    /// Render `key` substituting each `{name}` placeholder.
    pub fn render(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.template(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn claim_success(&self, amount: u32, item: &str) -> String {
        self.render(
            CLAIM_SUCCESS,
            &[("amount", amount.to_string()), ("item", item.to_string())],
        )
    }

    pub fn nothing_to_claim(&self) -> String {
        self.render(NOTHING_TO_CLAIM, &[])
    }

    pub fn no_permission(&self) -> String {
        self.render(NO_PERMISSION, &[])
    }
}
