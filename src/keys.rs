use crate::app::{App, MenuItem};
use crate::state::messages::RosterRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    roster_requests: &mpsc::Sender<RosterRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => quit(),
            _ => {}
        }
        return;
    }

    // The score popup swallows everything except Ctrl-C.
    if guard.state.editor.is_some() {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => quit(),
            (KeyCode::Esc, _) => guard.cancel_score_editor(),
            (KeyCode::Enter, _) => guard.submit_score_editor(),
            (KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down, _) => {
                if let Some(editor) = guard.state.editor.as_mut() {
                    editor.toggle_focus();
                }
            }
            (KeyCode::Backspace, _) => {
                if let Some(editor) = guard.state.editor.as_mut() {
                    editor.backspace();
                }
            }
            (Char(c), _) => {
                if let Some(editor) = guard.state.editor.as_mut() {
                    editor.push_digit(c);
                }
            }
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_match_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_match_up(),
        (MenuItem::Bracket, KeyCode::Enter, _) => guard.open_score_editor(),

        // Global
        (_, Char('e'), _) => guard.toggle_edit_mode(),
        (_, Char('R'), _) => {
            guard.state.status = Some("Reloading roster, recorded results will be dropped".to_string());
            drop(guard);
            let _ = roster_requests.send(RosterRequest::Load).await;
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

fn quit() {
    crate::cleanup_terminal();
    std::process::exit(0);
}
