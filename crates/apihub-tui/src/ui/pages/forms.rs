//! Login, register and logout pages.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use apihub_core::Route;

use crate::app::{App, FormField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of a form field
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let register = app.route == Route::Register;
    let fields = if register { 3 } else { 2 };
    let height = 8 + fields + if app.form.error.is_some() { 2 } else { 0 };
    let area = centered_rect_fixed(50, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];

    if register {
        lines.push(field_line(app, FormField::Name, "    Name: ", &app.form.name));
    }
    lines.push(field_line(app, FormField::Email, "   Email: ", &app.form.email));
    let masked = "*".repeat(app.form.password.chars().count());
    lines.push(field_line(app, FormField::Password, "Password: ", &masked));

    let label = if register { "Register" } else { "Login" };
    lines.push(Line::from(""));
    let button = if app.pending {
        format!("  {}...  ", label)
    } else if app.form_focus == FormField::Submit {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let button_style = if app.form_focus == FormField::Submit {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    let hint = if register {
        "  Already have an account? Press Esc, then Login."
    } else {
        "  No account yet? Press Esc, then Register."
    };
    lines.push(Line::from(Span::styled(hint, styles::muted_style())));

    let block = Block::default()
        .title(format!(" {} ", label))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line<'a>(app: &App, field: FormField, label: &'a str, value: &str) -> Line<'a> {
    let focused = app.form_focus == field;
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    // Show the tail when the value is wider than the field
    let skip = value.chars().count().saturating_sub(FIELD_WIDTH);
    let visible: String = value.chars().skip(skip).collect();

    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}{}", visible, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

pub fn render_logout(frame: &mut Frame, app: &App, area: Rect) {
    let area = centered_rect_fixed(46, 8, area);
    frame.render_widget(Clear, area);

    let prompt = if app.pending {
        Line::from(Span::styled("   Logging out...", styles::highlight_style()))
    } else {
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to log out", styles::muted_style()),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("   Signed in as ", styles::muted_style()),
            Span::styled(app.user_label().to_string(), styles::success_style()),
        ]),
        Line::from(""),
        prompt,
    ];

    let block = Block::default()
        .title(" Logout ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
