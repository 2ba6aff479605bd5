//! Explore view: a read-only feed of the same snapshot.

use crate::app::App;
use crate::util::{single_line, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

/// Excerpt shown under each title, kept to one line.
fn excerpt(content: &str, width: usize) -> String {
    let clean = strip_control_chars(content);
    truncate_to_width(&single_line(&clean), width).into_owned()
}

fn card(app: &App, index: usize, width: usize) -> Option<ListItem<'static>> {
    let article = app.articles().get(index)?;
    let title = strip_control_chars(&article.title);
    let link = strip_control_chars(&article.link);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            app.style("article_title"),
        )),
        Line::from(Span::styled(
            strip_control_chars(&article.date).into_owned(),
            app.style("article_date"),
        )),
    ];
    let body = excerpt(&article.content, width);
    if !body.is_empty() {
        lines.push(Line::from(Span::styled(body, app.style("article_excerpt"))));
    }
    lines.push(Line::from(Span::styled(
        truncate_to_width(&format!("Read more → {}", link), width).into_owned(),
        app.style("link"),
    )));
    lines.push(Line::from(""));

    Some(ListItem::new(lines))
}

/// Render the explore feed inside `block`.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect, block: Block<'_>) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = (0..app.articles().len())
        .filter_map(|i| card(app, i, width))
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
    use crate::app::tests::{article, ready, test_app};
    use crate::ui::test_support::screen_text;

    #[test]
    fn test_excerpt_is_single_line() {
        assert_eq!(excerpt("first\n\nsecond   line", 80), "first second line");
        assert_eq!(excerpt("", 80), "");
    }

    #[test]
    fn test_cards_show_read_more_link() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, Some("Tech")), article(2, None)]));
        app.switch_view();

        let screen = screen_text(&mut app, 80, 24);
        assert!(screen.contains("Article 1"));
        assert!(screen.contains("Body of article 2"));
        assert!(screen.contains("Read more → https://example.com/1"));
        // Read-only: no category field
        assert!(!screen.contains("Category:"));
    }
}
