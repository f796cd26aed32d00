use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use apihub_core::catalog;
use apihub_core::utils::mask_key;
use apihub_core::Route;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_key(frame, app, chunks[0]);
    render_api_list(frame, app, chunks[1]);
}

fn render_key(frame: &mut Frame, app: &App, area: Rect) {
    let key_line = match app.config.api_key() {
        Some(key) => Line::from(vec![
            Span::styled("  API key: ", styles::muted_style()),
            Span::styled(mask_key(key), styles::highlight_style()),
        ]),
        None => Line::from(Span::styled(
            "  No API key configured. Set APIHUB_API_KEY or api_key in config.json.",
            styles::muted_style(),
        )),
    };

    let lines = vec![
        Line::from(Span::styled(
            "  Free APIs for developers. Pick one to read its docs and try it live.",
            styles::list_item_style(),
        )),
        Line::from(""),
        key_line,
    ];

    let block = Block::default()
        .title(" Welcome ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_api_list(frame: &mut Frame, app: &App, area: Rect) {
    let nav = app.nav_routes();
    let mut lines = Vec::new();

    for doc in catalog::all() {
        let number = nav
            .iter()
            .position(|r| *r == Route::Api(doc.id))
            .map(|i| format!("[{}] ", i + 1))
            .unwrap_or_default();

        lines.push(Line::from(vec![
            Span::styled(format!("  {}", number), styles::help_key_style()),
            Span::styled(doc.title, styles::title_style()),
            Span::styled(format!("  {} endpoints", doc.endpoints.len()), styles::muted_style()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", doc.summary),
            styles::list_item_style(),
        )));
        lines.push(Line::from(""));
    }

    if !app.auth.authenticated {
        lines.push(Line::from(Span::styled(
            "  Login or register to open the API pages.",
            styles::highlight_style(),
        )));
    }

    let block = Block::default()
        .title(" APIs ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
