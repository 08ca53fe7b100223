//! App-level keybind registry
//!
//! Maps keys to named actions, grouped by category. Categories carry a
//! fixed priority used to order help output; unknown categories from the
//! config file sort last. Re-registering a key replaces its old binding.

use std::str::FromStr;

use crate::input::keys::Key;

/// Binding category with a fixed display/dispatch priority, lower first
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BindCategory {
    System,
    Yolo,
    Exposure,
    Display,
    Movement,
    Hardware,
    #[strum(default)]
    Other(String),
}

impl BindCategory {
    pub fn priority(&self) -> u32 {
        match self {
            BindCategory::System => 0,
            BindCategory::Yolo => 10,
            BindCategory::Exposure => 20,
            BindCategory::Display => 30,
            BindCategory::Movement => 40,
            BindCategory::Hardware => 50,
            BindCategory::Other(_) => 100,
        }
    }

    /// Parse a config category name; never fails, unknown names become
    /// `Other` with priority 100
    pub fn parse(name: &str) -> BindCategory {
        BindCategory::from_str(name).unwrap_or_else(|_| BindCategory::Other(name.to_string()))
    }
}

/// One registered binding
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub key: Key,
    pub action: String,
    pub description: String,
    pub category: BindCategory,
    pub enabled: bool,
}

/// Registry of app-level keybinds
#[derive(Debug, Default)]
pub struct KeybindRegistry {
    // Vec keeps registration order for deterministic help output
    bindings: Vec<KeyBinding>,
}

impl KeybindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding; an existing binding on the same key is replaced
    pub fn register(
        &mut self,
        key: Key,
        action: impl Into<String>,
        description: impl Into<String>,
        category: BindCategory,
    ) {
        self.bindings.retain(|b| b.key != key);
        self.bindings.push(KeyBinding {
            key,
            action: action.into(),
            description: description.into(),
            category,
            enabled: true,
        });
    }

    /// Action bound to `key`, if any enabled binding exists
    pub fn resolve(&self, key: Key) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.key == key && b.enabled)
            .map(|b| b.action.as_str())
    }

    pub fn enable(&mut self, key: Key) -> bool {
        self.set_enabled(key, true)
    }

    pub fn disable(&mut self, key: Key) -> bool {
        self.set_enabled(key, false)
    }

    fn set_enabled(&mut self, key: Key, enabled: bool) -> bool {
        match self.bindings.iter_mut().find(|b| b.key == key) {
            Some(binding) => {
                binding.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Enabled bindings grouped by category, categories in ascending
    /// priority order, bindings in registration order
    pub fn by_category(&self) -> Vec<(BindCategory, Vec<&KeyBinding>)> {
        let mut groups: Vec<(BindCategory, Vec<&KeyBinding>)> = Vec::new();
        for binding in self.bindings.iter().filter(|b| b.enabled) {
            match groups.iter_mut().find(|(c, _)| *c == binding.category) {
                Some((_, members)) => members.push(binding),
                None => groups.push((binding.category.clone(), vec![binding])),
            }
        }
        groups.sort_by_key(|(c, _)| c.priority());
        groups
    }

    /// Human-readable help listing
    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (category, members) in self.by_category() {
            lines.push(format!("[{}]", category));
            for binding in members {
                lines.push(format!("  {:<6} {}", binding.key.to_string(), binding.description));
            }
        }
        lines
    }
}
