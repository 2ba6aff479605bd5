//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data-driven so `[keybindings]` in config.toml can remap any
//! action. Lookups are context-aware; most contexts fall back to `Global`.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    SwitchView,
    OpenDetail,
    CloseDetail,
    Refresh,
    OpenLink,
    DeleteArticle,
    EditCategory,
    CommitCategory,
    CycleTheme,
    ShowHelp,
    CloseHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::SwitchView => "Switch Dashboard / Explore",
            Self::OpenDetail => "Open article details",
            Self::CloseDetail => "Close details",
            Self::Refresh => "Reload articles",
            Self::OpenLink => "Open link in browser",
            Self::DeleteArticle => "Delete article",
            Self::EditCategory => "Edit category",
            Self::CommitCategory => "Save category",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::CloseHelp => "Close help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Dashboard,
    Explorer,
    Detail,
    /// Editing a category field. Unbound keys are text input, so this
    /// context never falls back to `Global`.
    CategoryField,
    Help,
}

impl Context {
    /// Heading used by the help overlay.
    pub fn title(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Dashboard => "Dashboard",
            Self::Explorer => "Explore",
            Self::Detail => "Article details",
            Self::CategoryField => "Category editing",
            Self::Help => "Help",
        }
    }

    fn falls_back_to_global(self) -> bool {
        !matches!(self, Self::Global | Self::CategoryField)
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "d", "?"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Backspace", "Delete"
/// - Modifier combos: "Ctrl+r"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(num) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = num.parse::<u8>() {
            return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use KeyCode::{Char, Down, Enter, Esc, Tab, Up};
        let plain = KeySpec::plain;

        // === Global ===
        self.bind(Context::Global, plain(Char('q')), Action::Quit);
        self.bind(Context::Global, plain(Char('j')), Action::NavDown);
        self.bind(Context::Global, plain(Down), Action::NavDown);
        self.bind(Context::Global, plain(Char('k')), Action::NavUp);
        self.bind(Context::Global, plain(Up), Action::NavUp);
        self.bind(Context::Global, plain(Tab), Action::SwitchView);
        self.bind(Context::Global, plain(Enter), Action::OpenDetail);
        self.bind(Context::Global, plain(Char('r')), Action::Refresh);
        self.bind(Context::Global, plain(Char('o')), Action::OpenLink);
        self.bind(Context::Global, plain(Char('T')), Action::CycleTheme);
        self.bind(Context::Global, plain(Char('?')), Action::ShowHelp);

        // === Dashboard: the only view with mutations ===
        self.bind(Context::Dashboard, plain(Char('d')), Action::DeleteArticle);
        self.bind(Context::Dashboard, plain(Char('e')), Action::EditCategory);

        // === Detail overlay ===
        self.bind(Context::Detail, plain(Esc), Action::CloseDetail);
        self.bind(Context::Detail, plain(Char('x')), Action::CloseDetail);

        // === Category field: every way of leaving the field commits ===
        self.bind(Context::CategoryField, plain(Enter), Action::CommitCategory);
        self.bind(Context::CategoryField, plain(Tab), Action::CommitCategory);
        self.bind(Context::CategoryField, plain(Esc), Action::CommitCategory);
        self.bind(Context::CategoryField, plain(Down), Action::NavDown);
        self.bind(Context::CategoryField, plain(Up), Action::NavUp);

        // === Help overlay ===
        self.bind(Context::Help, plain(Esc), Action::CloseHelp);
        self.bind(Context::Help, plain(Char('?')), Action::CloseHelp);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "delete").
    /// Values are key strings (e.g., "q", "Ctrl+r", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            // Printable keys are text inside the category field, so its
            // bindings keep their defaults there.
            let is_text = matches!(key.code, KeyCode::Char(_))
                && !key.modifiers.contains(KeyModifiers::CONTROL);
            let keeps = |ctx: Context| is_text && ctx == Context::CategoryField;

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(c, _, a)| *a == action && !keeps(*c))
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            if contexts.is_empty() {
                warnings.push(format!(
                    "Key '{}' is text in the category field, keeping defaults for '{}'",
                    key_str, action_name
                ));
                continue;
            }

            self.lookup.retain(|(c, _), a| *a != action || keeps(*c));
            self.bindings.retain(|(c, _, a)| *a != action || keeps(*c));

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global where the
    /// context allows it.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context.falls_back_to_global() {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// First key bound to `action`, formatted for hints.
    pub fn key_hint(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "switch_view" | "switchview" => Some(Action::SwitchView),
        "open_detail" | "opendetail" | "select" => Some(Action::OpenDetail),
        "close_detail" | "closedetail" => Some(Action::CloseDetail),
        "refresh" | "reload" => Some(Action::Refresh),
        "open_link" | "openlink" | "open" => Some(Action::OpenLink),
        "delete_article" | "deletearticle" | "delete" => Some(Action::DeleteArticle),
        "edit_category" | "editcategory" | "edit" => Some(Action::EditCategory),
        "commit_category" | "commitcategory" => Some(Action::CommitCategory),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "close_help" | "closehelp" => Some(Action::CloseHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_default_nav_keys() {
        let reg = KeybindingRegistry::new();
        for (code, expected) in [
            (KeyCode::Char('j'), Action::NavDown),
            (KeyCode::Down, Action::NavDown),
            (KeyCode::Char('k'), Action::NavUp),
            (KeyCode::Up, Action::NavUp),
        ] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::Dashboard),
                Some(expected)
            );
        }
    }

    #[test]
    fn test_mutations_only_on_dashboard() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::NONE, Context::Dashboard),
            Some(Action::DeleteArticle)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::NONE, Context::Explorer),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('e'), KeyModifiers::NONE, Context::Explorer),
            None
        );
    }

    #[test]
    fn test_detail_close_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Detail),
            Some(Action::CloseDetail)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('x'), KeyModifiers::NONE, Context::Detail),
            Some(Action::CloseDetail)
        );
        // Falls back to Global for opening the link
        assert_eq!(
            reg.action_for_key(KeyCode::Char('o'), KeyModifiers::NONE, Context::Detail),
            Some(Action::OpenLink)
        );
    }

    #[test]
    fn test_category_field_does_not_fall_back() {
        let reg = KeybindingRegistry::new();
        // 'q' is text while editing, not Quit
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::CategoryField),
            None
        );
        for code in [KeyCode::Enter, KeyCode::Tab, KeyCode::Esc] {
            assert_eq!(
                reg.action_for_key(code, KeyModifiers::NONE, Context::CategoryField),
                Some(Action::CommitCategory)
            );
        }
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::CategoryField),
            Some(Action::NavDown)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::F(12), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_preserves_contexts() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("commit_category".to_string(), "F2".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::F(2), KeyModifiers::NONE, Context::CategoryField),
            Some(Action::CommitCategory)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::CategoryField),
            None
        );
    }

    #[test]
    fn test_printable_override_leaves_category_field_alone() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nav_down".to_string(), "n".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::Dashboard),
            Some(Action::NavDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::CategoryField),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::CategoryField),
            Some(Action::NavDown)
        );
    }

    #[test]
    fn test_printable_commit_key_is_refused() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("commit_category".to_string(), "s".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::CategoryField),
            Some(Action::CommitCategory)
        );
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("mark_all_read".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("delete".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(
            parse_key_string("Enter"),
            Some(KeySpec::plain(KeyCode::Enter))
        );
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("Delete"),
            Some(KeySpec::plain(KeyCode::Delete))
        );
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+r"), Some(KeySpec::ctrl('r')));
        assert_eq!(
            parse_key_string("?"),
            Some(KeySpec::plain(KeyCode::Char('?')))
        );
        assert_eq!(
            parse_key_string("F"),
            Some(KeySpec::plain(KeyCode::Char('F')))
        );
        assert_eq!(parse_key_string("qq"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::ctrl('r')), "Ctrl+r");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Space");
    }

    #[test]
    fn test_key_hint_follows_overrides() {
        let mut reg = KeybindingRegistry::new();
        assert_eq!(reg.key_hint(Action::Refresh).as_deref(), Some("r"));

        let mut overrides = HashMap::new();
        overrides.insert("refresh".to_string(), "F5".to_string());
        reg.apply_overrides(&overrides);
        assert_eq!(reg.key_hint(Action::Refresh).as_deref(), Some("F5"));
    }

    #[test]
    fn test_every_context_has_bindings() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        for ctx in [
            Context::Global,
            Context::Dashboard,
            Context::Detail,
            Context::CategoryField,
            Context::Help,
        ] {
            assert!(bindings.iter().any(|(c, _, _, _)| *c == ctx), "{:?}", ctx);
        }
    }
}
