use crate::api::{Article, ArticleId};
use crate::keybindings::{Context as KbContext, KeybindingRegistry};
use crate::store::{ArticleStore, SyncState};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tokio::time::Instant;

mod editor;

pub use editor::CategoryEditor;

// ============================================================================
// View Enum
// ============================================================================

/// Top-level views reachable from the header bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Editable article rows: category, delete, open link.
    Dashboard,
    /// Read-only feed of the same snapshot.
    Explorer,
}

impl View {
    pub const ALL: [View; 2] = [View::Dashboard, View::Explorer];

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Explorer => "Explore",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Explorer,
            View::Explorer => View::Dashboard,
        }
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// Results reported by background tasks over the app event channel.
///
/// Snapshot changes are not events: they arrive through the store's watch
/// channel.
#[derive(Debug)]
pub enum AppEvent {
    ArticleRemoved {
        article_id: ArticleId,
    },
    RemoveFailed {
        article_id: ArticleId,
        error: String,
    },
    CategoryCommitted {
        article_id: ArticleId,
    },
    CategoryCommitFailed {
        article_id: ArticleId,
        error: String,
    },
    /// A background task panicked.
    ///
    /// - `task`: name of the task (e.g. "remove", "set_category")
    /// - `error`: the panic message extracted from the payload
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub store: ArticleStore,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    /// Keybinding registry with config overrides applied.
    pub keybindings: KeybindingRegistry,

    /// Last state observed from the store. Rendering reads only this.
    pub sync: SyncState,

    // UI State
    pub view: View,
    pub selected: usize,

    /// Category editors for rows that have been touched. Rows without an
    /// entry show the article's own category.
    pub editors: HashMap<ArticleId, CategoryEditor>,
    /// Row whose category field has input focus.
    pub editing: Option<ArticleId>,
    /// Deletes sent but not yet answered.
    pub pending_removals: HashSet<ArticleId>,

    /// Article shown in the detail overlay. A copy, so the overlay survives
    /// the list going back to `Loading` during a refetch.
    pub detail: Option<Article>,
    /// Screen area of the detail overlay as last rendered, for click-outside
    /// dismissal.
    pub detail_area: Option<Rect>,

    pub show_help: bool,

    /// Status message and when it was set; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Set when state changed and the next loop iteration must redraw.
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(store: ArticleStore) -> Self {
        let sync = store.current();
        Self {
            store,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            sync,
            view: View::Dashboard,
            selected: 0,
            editors: HashMap::new(),
            editing: None,
            pending_removals: HashSet::new(),
            detail: None,
            detail_area: None,
            show_help: false,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Keybinding context for the current overlay, field focus and view.
    pub fn key_context(&self) -> KbContext {
        if self.show_help {
            KbContext::Help
        } else if self.detail.is_some() {
            KbContext::Detail
        } else if self.editing.is_some() {
            KbContext::CategoryField
        } else {
            match self.view {
                View::Dashboard => KbContext::Dashboard,
                View::Explorer => KbContext::Explorer,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------------

    /// Articles of the current snapshot; empty unless `Ready`.
    pub fn articles(&self) -> &[Article] {
        self.sync.articles().map(|a| &a[..]).unwrap_or(&[])
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles().get(self.selected)
    }

    /// Adopt a state published by the store.
    ///
    /// On a new snapshot, editors for vanished articles are dropped, clean
    /// editors fall back to the server value and the detail overlay follows
    /// its article (closing if it was deleted).
    pub fn apply_sync_state(&mut self, state: SyncState) {
        tracing::debug!(state = state.label(), "Applying article state");
        self.sync = state;
        self.needs_redraw = true;

        let Some(articles) = self.sync.articles().cloned() else {
            return;
        };
        let by_id: HashMap<ArticleId, &Article> = articles.iter().map(|a| (a.id, a)).collect();

        self.editors.retain(|id, editor| match by_id.get(id) {
            Some(article) => {
                editor.sync_committed(article.category.as_deref());
                !matches!(editor, CategoryEditor::Clean { .. })
            }
            None => false,
        });
        if let Some(id) = self.editing {
            if !by_id.contains_key(&id) {
                self.editing = None;
            }
        }
        self.pending_removals.retain(|id| by_id.contains_key(id));

        if let Some(open_id) = self.detail.as_ref().map(|a| a.id) {
            match by_id.get(&open_id) {
                Some(article) => self.detail = Some((*article).clone()),
                None => self.close_detail(),
            }
        }

        self.clamp_selection();
    }

    /// Keep the selection inside the list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.articles().len();
        self.selected = if len == 0 {
            0
        } else {
            self.selected.min(len - 1)
        };
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.articles().len();
        if len > 0 {
            self.selected = self.selected.saturating_add(1).min(len - 1);
        }
    }

    pub fn switch_view(&mut self) {
        self.view = self.view.next();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Category editing
    // ------------------------------------------------------------------------

    /// Category text shown for `article`: local edits win over the snapshot.
    pub fn category_value<'a>(&'a self, article: &'a Article) -> &'a str {
        self.editors
            .get(&article.id)
            .map(CategoryEditor::value)
            .unwrap_or_else(|| article.category_label())
    }

    /// Focus the selected row's category field.
    ///
    /// Returns false when there is no row, or its previous commit is still
    /// in flight.
    pub fn begin_edit(&mut self) -> bool {
        let Some(article) = self.selected_article() else {
            return false;
        };
        let id = article.id;
        let category = article.category.clone();

        let editor = self
            .editors
            .entry(id)
            .or_insert_with(|| CategoryEditor::new(category.as_deref()));
        if editor.is_committing() {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Editor of the focused field.
    pub fn active_editor(&mut self) -> Option<&mut CategoryEditor> {
        let id = self.editing?;
        self.editors.get_mut(&id)
    }

    /// Leave the focused field. Returns the request to send, if the value
    /// changed.
    pub fn end_edit(&mut self) -> Option<(ArticleId, String)> {
        let id = self.editing.take()?;
        let editor = self.editors.get_mut(&id)?;
        let value = editor.begin_commit();
        if matches!(editor, CategoryEditor::Clean { .. }) {
            self.editors.remove(&id);
        }
        value.map(|v| (id, v))
    }

    /// Outcome of a category request for `id`.
    pub fn finish_commit(&mut self, id: ArticleId, succeeded: bool) {
        if let Some(editor) = self.editors.get_mut(&id) {
            if succeeded {
                editor.commit_succeeded();
            } else {
                editor.commit_failed();
            }
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------------

    pub fn open_detail(&mut self) -> bool {
        match self.selected_article() {
            Some(article) => {
                self.detail = Some(article.clone());
                true
            }
            None => false,
        }
    }

    /// Close the overlay. Never touches the store.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_area = None;
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
