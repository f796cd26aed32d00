use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use apihub_core::catalog::{ApiDoc, EndpointDoc, ResponseKind};
use apihub_core::snippets::Language;
use apihub_core::utils::truncate_string;

use crate::app::{App, DocFocus};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(doc) = app.current_doc() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(area);

    render_endpoint_list(frame, app, doc, chunks[0]);

    let Some(endpoint) = app.selected_endpoint() else {
        return;
    };

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),      // Endpoint detail
            Constraint::Percentage(45), // Snippet
            Constraint::Length(3),      // Try-it input
            Constraint::Min(4),         // Response
        ])
        .split(chunks[1]);

    render_endpoint_detail(frame, app, doc, endpoint, right[0]);
    render_snippet(frame, app, right[1]);
    render_request_input(frame, app, right[2]);
    render_response(frame, app, endpoint, right[3]);
}

fn render_endpoint_list(frame: &mut Frame, app: &App, doc: &ApiDoc, area: Rect) {
    let width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = doc
        .endpoints
        .iter()
        .map(|e| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<4}", e.method), styles::method_style()),
                Span::styled(truncate_string(e.title, width), styles::list_item_style()),
            ]))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.endpoint_selection));
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", doc.title, doc.endpoints.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.doc_focus == DocFocus::Endpoints)),
        )
        .highlight_style(styles::selected_style());

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_endpoint_detail(
    frame: &mut Frame,
    app: &App,
    doc: &ApiDoc,
    endpoint: &EndpointDoc,
    area: Rect,
) {
    let base_url = app.config.base_url(doc.id);
    let returns = match endpoint.response {
        ResponseKind::Json => "JSON",
        ResponseKind::Audio => "audio (mp3)",
        ResponseKind::Image => "image",
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", endpoint.method), styles::method_style()),
            Span::styled(format!("{}{}", base_url, endpoint.path), styles::list_item_style()),
        ]),
        Line::from(vec![
            Span::styled(" Auth:    ", styles::muted_style()),
            Span::styled(doc.key.describe(), styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled(" Returns: ", styles::muted_style()),
            Span::styled(returns, styles::list_item_style()),
        ]),
        Line::from(Span::styled(format!(" {}", doc.summary), styles::muted_style())),
    ];

    let block = Block::default()
        .title(format!(" {} ", endpoint.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_snippet(frame: &mut Frame, app: &App, area: Rect) {
    let mut tabs = vec![Span::raw(" ")];
    for (i, lang) in Language::ALL.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::styled(" | ", styles::muted_style()));
        }
        tabs.push(Span::styled(lang.label(), styles::nav_style(*lang == app.language, false)));
    }
    tabs.push(Span::raw(" "));

    let code = app.snippet().unwrap_or_default();
    let block = Block::default()
        .title(Line::from(tabs))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(Text::from(code))
            .style(styles::code_style())
            .block(block),
        area,
    );
}

fn render_request_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.doc_focus == DocFocus::TryIt;
    let cursor = if focused { "▌" } else { "" };
    let line = Line::from(vec![
        Span::styled(" GET ", styles::method_style()),
        Span::styled(
            format!("{}{}", app.request_input, cursor),
            if focused { styles::selected_style() } else { styles::list_item_style() },
        ),
    ]);

    let title = if focused {
        " Try it out - Enter to send, Esc to cancel "
    } else {
        " Try it out - [t] to edit "
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_response(frame: &mut Frame, app: &App, endpoint: &EndpointDoc, area: Rect) {
    let (title, text, style) = match app.response {
        Some(Ok(ref response)) => (" Response ", response.display(), styles::success_style()),
        Some(Err(ref e)) => (" Error ", e.clone(), styles::error_style()),
        None if app.pending => (
            " Response ",
            "Waiting for response...".to_string(),
            styles::muted_style(),
        ),
        None => (" Sample response ", endpoint.sample_response.to_string(), styles::muted_style()),
    };

    let block = Block::default()
        .title(title)
        .title_style(style)
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(Text::from(text))
            .style(styles::code_style())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
