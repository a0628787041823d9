//! Input handling for TUI key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::warn;

use herbtrace_core::UserType;
use herbtrace_core::ids::is_batch_id;

use crate::app::{Action, App, FormField, InputField, LoginFocus, Screen, ScreenData};
use crate::worker::Command;

use super::TermEvent;

/// Handle a terminal event.
pub async fn handle_term_event(app: &mut App, commands: &mpsc::Sender<Command>, event: TermEvent) {
    match event {
        TermEvent::Key(key) => handle_key(app, commands, key).await,
        TermEvent::Resize(_, _) => {}
    }
}

/// Handle a key press: update state, and forward any resulting command.
pub async fn handle_key(app: &mut App, commands: &mpsc::Sender<Command>, key: KeyEvent) {
    if let Some(command) = key_to_command(app, key) {
        if commands.send(command).await.is_err() {
            warn!("Worker channel closed");
            app.busy = false;
            app.crash(&"Background worker stopped");
        }
    }
}

/// Apply a key to `app`, returning the command to send, if any.
pub fn key_to_command(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    if app.crash.is_some() {
        if matches!(key.code, KeyCode::Char('r' | 'R')) {
            app.reload();
        }
        return None;
    }

    if key.code == KeyCode::Esc {
        return app.dispatch(Action::Back);
    }

    match app.screen() {
        Screen::Login(user_type) => login_key(app, user_type, key.code),
        Screen::FarmerForm => farmer_form_key(app, key.code),
        Screen::LocationPicker => location_key(app, key.code),
        Screen::QrScanner => scanner_key(app, key.code),
        Screen::FarmerDashboard => farmer_dashboard_key(app, key.code),
        Screen::CustomerDashboard => match key.code {
            KeyCode::Char('s') => app.dispatch(navigate(Screen::QrScanner)),
            KeyCode::Char('l') => app.dispatch(Action::Logout),
            _ => None,
        },
        Screen::AdminDashboard => match key.code {
            KeyCode::Char('r') => {
                app.busy = true;
                Some(Command::LoadAllBatches)
            }
            KeyCode::Up => {
                app.select_prev();
                None
            }
            KeyCode::Down => {
                app.select_next();
                None
            }
            KeyCode::Char('l') => app.dispatch(Action::Logout),
            _ => None,
        },
        Screen::QrGenerated => match key.code {
            KeyCode::Enter | KeyCode::Char('d') => app.dispatch(navigate(Screen::FarmerDashboard)),
            _ => None,
        },
        Screen::HerbDetails => match key.code {
            KeyCode::Enter | KeyCode::Char('s') => app.dispatch(navigate(Screen::QrScanner)),
            _ => None,
        },
        screen => public_page_key(app, screen, key.code),
    }
}

fn navigate(screen: Screen) -> Action {
    Action::Navigate(screen, ScreenData::None)
}

/// Dashboard and footer pages.
fn public_page_key(app: &mut App, screen: Screen, code: KeyCode) -> Option<Command> {
    if screen == Screen::Dashboard {
        let login = match code {
            KeyCode::Char('1') => Some(UserType::Farmer),
            KeyCode::Char('2') => Some(UserType::Customer),
            KeyCode::Char('3') => Some(UserType::Admin),
            _ => None,
        };
        if let Some(user_type) = login {
            return app.dispatch(navigate(Screen::Login(user_type)));
        }
    }
    let target = match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('h') => Screen::Dashboard,
        KeyCode::Char('a') => Screen::About,
        KeyCode::Char('f') => Screen::Features,
        KeyCode::Char('c') => Screen::Contact,
        KeyCode::Char('v') => Screen::QaResults,
        KeyCode::Char('s') => Screen::Stakeholders,
        KeyCode::Char('p') => Screen::Compliance,
        _ => return None,
    };
    app.dispatch(navigate(target))
}

fn edit(field: &mut InputField, code: KeyCode) {
    match code {
        KeyCode::Char(c) => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        _ => {}
    }
}

fn login_key(app: &mut App, user_type: UserType, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.toggle_focus();
            None
        }
        KeyCode::Enter if app.login.focus == LoginFocus::Email => {
            app.login.toggle_focus();
            None
        }
        KeyCode::Enter => app.attempt_login(user_type),
        other => {
            edit(app.login.focused_mut(), other);
            None
        }
    }
}

fn farmer_dashboard_key(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('n') => app.dispatch(navigate(Screen::FarmerForm)),
        KeyCode::Char('r') => {
            let farmer_id = app.state.user.as_ref()?.user_id.clone();
            app.busy = true;
            Some(Command::LoadCollections(farmer_id))
        }
        KeyCode::Char('l') => app.dispatch(Action::Logout),
        KeyCode::Up => {
            app.select_prev();
            None
        }
        KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::Enter => {
            let batch_id = app.collections.get(app.selected)?.batch_id.clone();
            app.dispatch(Action::Navigate(
                Screen::QrGenerated,
                ScreenData::Batch { batch_id },
            ))
        }
        _ => None,
    }
}

fn farmer_form_key(app: &mut App, code: KeyCode) -> Option<Command> {
    let focus = app.farmer_form.focus;
    match code {
        KeyCode::Tab | KeyCode::Down => {
            app.farmer_form.focus = focus.next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.farmer_form.focus = focus.prev();
            None
        }
        KeyCode::Enter => match focus {
            FormField::Location => {
                let data = app.state.data.clone();
                app.dispatch(Action::Navigate(Screen::LocationPicker, data))
            }
            FormField::Organic => {
                app.farmer_form.organic = !app.farmer_form.organic;
                None
            }
            FormField::Submit if app.busy => None,
            FormField::Submit => Some(app.submit_farmer_form()),
            _ => {
                app.farmer_form.focus = focus.next();
                None
            }
        },
        KeyCode::Char(' ') if focus == FormField::Organic => {
            app.farmer_form.organic = !app.farmer_form.organic;
            None
        }
        other => {
            if let Some(field) = app.farmer_form.text_mut(focus) {
                edit(field, other);
            }
            None
        }
    }
}

fn location_key(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Tab | KeyCode::Down => {
            app.location.next_focus();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.location.prev_focus();
            None
        }
        KeyCode::Enter => match app.location.parse() {
            Ok(location) => {
                app.status = format!("Location set to {location}");
                app.dispatch(Action::SelectLocation(location))
            }
            Err(e) => {
                app.status = e;
                None
            }
        },
        other => {
            edit(app.location.focused_mut(), other);
            None
        }
    }
}

fn scanner_key(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Enter => {
            let batch_id = app.scanner.trimmed().to_ascii_uppercase();
            if !is_batch_id(&batch_id) {
                app.status = "Enter a batch id such as HERB...".to_string();
                return None;
            }
            if app.busy {
                return None;
            }
            app.busy = true;
            app.status = format!("Verifying {batch_id}...");
            Some(Command::LookupBatch(batch_id))
        }
        other => {
            edit(&mut app.scanner, other);
            None
        }
    }
}
