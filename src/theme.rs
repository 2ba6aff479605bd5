//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub nav_active: Style,
    pub nav_inactive: Style,

    // -- Article rows --
    pub row_selected: Style,
    pub article_title: Style,
    pub article_date: Style,
    pub article_excerpt: Style,
    pub category_clean: Style,
    pub category_editing: Style,
    pub category_dirty: Style,
    pub category_committing: Style,
    pub link: Style,
    pub action_hint: Style,

    // -- Query state --
    pub loading: Style,
    pub error: Style,
    pub empty: Style,

    // -- Detail overlay --
    pub detail_border: Style,
    pub detail_title: Style,
    pub detail_meta: Style,
    pub detail_body: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub help_heading: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::Gray),

            row_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_date: Style::default().fg(Color::DarkGray),
            article_excerpt: Style::default().fg(Color::Gray),
            category_clean: Style::default().fg(Color::Green),
            category_editing: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED),
            category_dirty: Style::default().fg(Color::Yellow),
            category_committing: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            action_hint: Style::default().fg(Color::DarkGray),

            loading: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            empty: Style::default().fg(Color::DarkGray),

            detail_border: Style::default().fg(Color::Cyan),
            detail_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_body: Style::default(),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            help_heading: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::DarkGray),

            row_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_date: Style::default().fg(Color::DarkGray),
            article_excerpt: Style::default().fg(Color::DarkGray),
            category_clean: Style::default().fg(Color::Green),
            category_editing: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),
            category_dirty: Style::default().fg(Color::Magenta),
            category_committing: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::DIM),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            action_hint: Style::default().fg(Color::DarkGray),

            loading: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            empty: Style::default().fg(Color::DarkGray),

            detail_border: Style::default().fg(Color::Blue),
            detail_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_body: Style::default().fg(Color::Black),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            help_heading: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this allows resolving role names (e.g.
/// `"detail_title"`) to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 23] = [
    "header_title",
    "nav_active",
    "nav_inactive",
    "row_selected",
    "article_title",
    "article_date",
    "article_excerpt",
    "category_clean",
    "category_editing",
    "category_dirty",
    "category_committing",
    "link",
    "action_hint",
    "loading",
    "error",
    "empty",
    "detail_border",
    "detail_title",
    "detail_meta",
    "detail_body",
    "status_bar",
    "panel_border",
    "help_heading",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 23] = [
            p.header_title,
            p.nav_active,
            p.nav_inactive,
            p.row_selected,
            p.article_title,
            p.article_date,
            p.article_excerpt,
            p.category_clean,
            p.category_editing,
            p.category_dirty,
            p.category_committing,
            p.link,
            p.action_hint,
            p.loading,
            p.error,
            p.empty,
            p.detail_border,
            p.detail_title,
            p.detail_meta,
            p.detail_body,
            p.status_bar,
            p.panel_border,
            p.help_heading,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
