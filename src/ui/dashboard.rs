//! Dashboard view: one editable row per article.
//!
//! Rows come straight from the snapshot in server order. A row's category
//! field shows local text while it is being edited or awaiting a retry.

use crate::api::ArticleId;
use crate::app::{App, CategoryEditor};
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

/// Category field state as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FieldState {
    Clean,
    Editing,
    Dirty,
    Committing,
}

impl FieldState {
    fn style_role(self) -> &'static str {
        match self {
            Self::Clean => "category_clean",
            Self::Editing => "category_editing",
            Self::Dirty => "category_dirty",
            Self::Committing => "category_committing",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Clean | Self::Editing => "",
            Self::Dirty => " (not saved)",
            Self::Committing => " (saving...)",
        }
    }
}

/// One dashboard row, borrowed from the snapshot and the editors.
#[derive(Debug)]
pub(super) struct DashboardRow<'a> {
    pub id: ArticleId,
    pub title: &'a str,
    pub date: &'a str,
    pub category: &'a str,
    pub field: FieldState,
    pub deleting: bool,
}

pub(super) fn rows(app: &App) -> Vec<DashboardRow<'_>> {
    app.articles()
        .iter()
        .map(|article| {
            let field = if app.editing == Some(article.id) {
                FieldState::Editing
            } else {
                match app.editors.get(&article.id) {
                    Some(CategoryEditor::Dirty { .. }) => FieldState::Dirty,
                    Some(CategoryEditor::Committing { .. }) => FieldState::Committing,
                    Some(CategoryEditor::Clean { .. }) | None => FieldState::Clean,
                }
            };
            DashboardRow {
                id: article.id,
                title: &article.title,
                date: &article.date,
                category: app.category_value(article),
                field,
                deleting: app.pending_removals.contains(&article.id),
            }
        })
        .collect()
}

fn row_item(app: &App, row: &DashboardRow<'_>, width: usize) -> ListItem<'static> {
    let date = strip_control_chars(row.date);
    let title = strip_control_chars(row.title);
    let title_width = width.saturating_sub(display_width(&date) + 3);
    let title = truncate_to_width(&title, title_width).into_owned();

    let headline = Line::from(vec![
        Span::styled(title, app.style("article_title")),
        Span::raw("  "),
        Span::styled(date.into_owned(), app.style("article_date")),
    ]);

    let mut field = vec![
        Span::styled("  Category: ", app.style("detail_meta")),
        Span::styled(
            format!("[{}", strip_control_chars(row.category)),
            app.style(row.field.style_role()),
        ),
    ];
    if row.field == FieldState::Editing {
        field.push(Span::styled("_", app.style("category_editing")));
    }
    field.push(Span::styled("]", app.style(row.field.style_role())));
    field.push(Span::styled(row.field.suffix(), app.style(row.field.style_role())));
    if row.deleting {
        field.push(Span::styled("  deleting...", app.style("loading")));
    }

    ListItem::new(vec![headline, Line::from(field)])
}

/// Render the dashboard list inside `block`.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect, block: Block<'_>) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = rows(app)
        .iter()
        .map(|row| row_item(app, row, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("row_selected"))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Article;
    use crate::app::tests::{article, ready, test_app};
    use crate::ui::test_support::screen_text;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_rows_follow_snapshot_order() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![
            article(3, Some("AI")),
            article(1, None),
            article(2, Some("News")),
        ]));
        let ids: Vec<_> = rows(&app).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_field_states() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, None), article(2, None), article(3, None)]));

        app.begin_edit();
        app.active_editor().unwrap().push('A');
        app.end_edit();
        app.nav_down();
        app.begin_edit();
        app.active_editor().unwrap().push('B');
        app.end_edit();
        app.finish_commit(2, false);
        app.nav_down();
        app.begin_edit();
        app.pending_removals.insert(1);

        let rows = rows(&app);
        assert_eq!(rows[0].field, FieldState::Committing);
        assert!(rows[0].deleting);
        assert_eq!(rows[1].field, FieldState::Dirty);
        assert_eq!(rows[1].category, "B");
        assert_eq!(rows[2].field, FieldState::Editing);
    }

    #[test]
    fn test_render_shows_title_date_and_category() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, Some("Science"))]));
        let screen = screen_text(&mut app, 80, 20);
        assert!(screen.contains("Article 1"));
        assert!(screen.contains("2024-05-01"));
        assert!(screen.contains("Category: [Science]"));
    }

    #[test]
    fn test_render_null_category_as_empty_field() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, None), article(2, Some(""))]));
        let screen = screen_text(&mut app, 80, 20);
        assert_eq!(screen.matches("Category: []").count(), 2);
        assert!(!screen.contains("null"));
        assert!(!screen.contains("None"));
    }

    #[test]
    fn test_render_strips_terminal_escapes() {
        let mut app = test_app();
        let mut evil = article(1, None);
        evil.title = "Hi\x1b[2Jthere".to_string();
        app.apply_sync_state(ready(vec![evil]));
        let screen = screen_text(&mut app, 80, 20);
        assert!(screen.contains("Hithere"));
    }

    fn arb_articles() -> impl Strategy<Value = Vec<Article>> {
        let entry = ("[a-zA-Z0-9 ]{0,30}", prop::option::of("[a-z]{0,8}"));
        prop::collection::vec(entry, 0..20).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (title, category))| Article {
                    id: i as ArticleId,
                    title,
                    link: format!("https://example.com/{}", i),
                    date: "2024-01-01".to_string(),
                    content: String::new(),
                    category,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_one_row_per_article_verbatim(articles in arb_articles()) {
            let mut app = test_app();
            app.apply_sync_state(crate::store::SyncState::Ready(Arc::from(articles.clone())));

            let rows = rows(&app);
            prop_assert_eq!(rows.len(), articles.len());
            for (row, article) in rows.iter().zip(&articles) {
                prop_assert_eq!(row.id, article.id);
                prop_assert_eq!(row.title, article.title.as_str());
                prop_assert_eq!(row.date, article.date.as_str());
                prop_assert_eq!(row.category, article.category_label());
                prop_assert_eq!(row.field, FieldState::Clean);
            }
        }
    }
}
