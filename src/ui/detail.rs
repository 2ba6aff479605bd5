//! Article detail overlay.
//!
//! Shows the full article over the active view. Closing it never touches
//! the store; the view underneath keeps its selection.

use crate::app::App;
use crate::keybindings::Action as KbAction;
use crate::util::strip_control_chars;
use ratatui::{
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::centered_rect;

/// Render the overlay and record where it was drawn.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        app.detail_area = None;
        return;
    }
    let Some(article) = app.detail.as_ref() else {
        app.detail_area = None;
        return;
    };

    let close = app
        .keybindings
        .key_hint(KbAction::CloseDetail)
        .unwrap_or_else(|| "Esc".to_string());
    let open = app
        .keybindings
        .key_hint(KbAction::OpenLink)
        .unwrap_or_else(|| "o".to_string());

    let mut meta = vec![Span::styled(
        strip_control_chars(&article.date).into_owned(),
        app.style("detail_meta"),
    )];
    if let Some(category) = article.category.as_deref().filter(|c| !c.is_empty()) {
        meta.push(Span::styled(
            format!("  ·  {}", strip_control_chars(category)),
            app.style("detail_meta"),
        ));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            app.style("detail_title").add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(""),
    ];
    lines.extend(
        strip_control_chars(&article.content)
            .lines()
            .map(|l| Line::styled(l.to_string(), app.style("detail_body"))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        strip_control_chars(&article.link).into_owned(),
        app.style("link"),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("detail_border"))
                .title(" Article ")
                .title_bottom(Line::from(Span::styled(
                    format!(" [{}] close  [{}] open link ", close, open),
                    app.style("action_hint"),
                ))),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, overlay);
    f.render_widget(paragraph, overlay);
    app.detail_area = Some(overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, ready, test_app};
    use crate::ui::test_support::screen_text;

    #[test]
    fn test_overlay_shows_full_article() {
        let mut app = test_app();
        let mut a = article(1, Some("Tech"));
        a.content = "Line one\nLine two".to_string();
        app.apply_sync_state(ready(vec![a]));
        app.open_detail();

        let screen = screen_text(&mut app, 100, 30);
        assert!(screen.contains("Article 1"));
        assert!(screen.contains("2024-05-01  ·  Tech"));
        assert!(screen.contains("Line one"));
        assert!(screen.contains("Line two"));
        assert!(screen.contains("https://example.com/1"));
        assert!(screen.contains("[Esc] close"));
    }

    #[test]
    fn test_overlay_stays_over_loading_list() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, None)]));
        app.open_detail();
        app.apply_sync_state(crate::store::SyncState::Loading);

        let screen = screen_text(&mut app, 100, 30);
        assert!(screen.contains("Body of article 1"));
        assert!(app.detail_area.is_some());
    }
}
