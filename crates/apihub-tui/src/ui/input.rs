//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use apihub_core::Route;

use crate::app::{
    can_add_email_char, can_add_name_char, can_add_password_char, can_add_request_char, App,
    AppState, DocFocus, FormField,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Text entry swallows printable keys
    match app.route {
        Route::Login | Route::Register => return handle_form_input(app, key),
        Route::Api(_) if app.doc_focus == DocFocus::TryIt => {
            handle_request_input(app, key);
            return Ok(false);
        }
        _ => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='9') => {
            app.navigate_index(c as usize - '1' as usize);
            return Ok(false);
        }
        KeyCode::Left | KeyCode::BackTab => {
            app.navigate_relative(false);
            return Ok(false);
        }
        KeyCode::Right | KeyCode::Tab => {
            app.navigate_relative(true);
            return Ok(false);
        }
        _ => {}
    }

    match app.route {
        Route::Logout => {
            if key.code == KeyCode::Enter {
                app.submit_logout();
            }
        }
        Route::Api(_) => handle_doc_input(app, key),
        Route::Home | Route::Login | Route::Register => {}
    }
    Ok(false)
}

fn handle_doc_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if app.endpoint_selection > 0 {
                app.select_endpoint(app.endpoint_selection - 1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_endpoint(app.endpoint_selection + 1);
        }
        KeyCode::Char(']') => app.language = app.language.next(),
        KeyCode::Char('[') => app.language = app.language.prev(),
        KeyCode::Char('t') => app.doc_focus = DocFocus::TryIt,
        KeyCode::Enter => app.send_request(),
        _ => {}
    }
}

fn handle_request_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.doc_focus = DocFocus::Endpoints;
        }
        KeyCode::Enter => {
            app.doc_focus = DocFocus::Endpoints;
            app.send_request();
        }
        KeyCode::Backspace => {
            app.request_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_request_char(app.request_input.chars().count(), c) {
                app.request_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let register = app.route == Route::Register;
    match key.code {
        KeyCode::Esc => {
            app.navigate(Route::Home);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.form_focus = app.form_focus.next(register);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.form_focus = app.form_focus.prev(register);
        }
        KeyCode::Left => app.navigate_relative(false),
        KeyCode::Right => app.navigate_relative(true),
        KeyCode::Enter => match app.form_focus {
            FormField::Submit if register => app.submit_register(),
            FormField::Submit => app.submit_login(),
            field => app.form_focus = field.next(register),
        },
        KeyCode::Backspace => match app.form_focus {
            FormField::Name => {
                app.form.name.pop();
            }
            FormField::Email => {
                app.form.email.pop();
            }
            FormField::Password => {
                app.form.password.pop();
            }
            FormField::Submit => {}
        },
        KeyCode::Char(c) => match app.form_focus {
            FormField::Name => {
                if can_add_name_char(app.form.name.chars().count(), c) {
                    app.form.name.push(c);
                }
            }
            FormField::Email => {
                if can_add_email_char(app.form.email.chars().count(), c) {
                    app.form.email.push(c);
                }
            }
            FormField::Password => {
                if can_add_password_char(app.form.password.chars().count(), c) {
                    app.form.password.push(c);
                }
            }
            FormField::Submit => {
                // Ignore character input on button
            }
        },
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apihub_core::{ApiId, Config, MemorySessionStore, Session};
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::build_session_with_store;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(signed_in: bool) -> App {
        let store = if signed_in {
            MemorySessionStore::with_session(Session::new("tok".to_string(), None))
        } else {
            MemorySessionStore::new()
        };
        let mut config = Config::default();
        config.auth_base_url = Some("http://127.0.0.1:9".to_string());
        let session = build_session_with_store(&config, Arc::new(store)).unwrap();
        App::with_session(config, session).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_number_keys_go_through_guard() {
        let mut app = app(false);
        handle_input(&mut app, key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn test_form_typing_and_focus() {
        let mut app = app(false);
        app.navigate(Route::Register);
        type_text(&mut app, "Ada L");
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "ada @example.com");
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "q?1");

        assert_eq!(app.form.name, "Ada L");
        assert_eq!(app.form.email, "ada@example.com");
        assert_eq!(app.form.password, "q?1");
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.route, Route::Register);

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_doc_page_keys() {
        let mut app = app(true);
        app.navigate(Route::Api(ApiId::Quran));
        handle_input(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.endpoint_selection, 1);
        assert_eq!(app.request_input, "/surah/1");

        handle_input(&mut app, key(KeyCode::Char(']'))).unwrap();
        assert_eq!(app.language, apihub_core::snippets::Language::Python);

        handle_input(&mut app, key(KeyCode::Char('t'))).unwrap();
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "2q");
        assert_eq!(app.request_input, "/surah/2q");
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.doc_focus, DocFocus::Endpoints);
    }

    #[test]
    fn test_arrows_pass_through_logout_page() {
        let mut app = app(true);
        handle_input(&mut app, key(KeyCode::Left)).unwrap();
        assert_eq!(app.route, Route::Logout);
        handle_input(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.route, Route::Home);
        assert!(app.session.is_authenticated());
        assert!(!app.pending);
    }

    #[tokio::test]
    async fn test_enter_on_logout_page_signs_out() {
        let mut app = app(true);
        app.navigate(Route::Logout);
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert!(!app.pending);

        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.pending);
        assert_eq!(app.status_message.as_deref(), Some("Logging out..."));
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = app(false);
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))).unwrap());
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
    }
}
