use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, ScoreEditor};
use crate::state::roster::TournamentInfo;
use bracket_engine::{Bracket, ErrorKind, MatchId};
use log::{error, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Standings,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(settings.edit_mode),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Roster responses, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_roster_loaded(&mut self, tournament: TournamentInfo, bracket: Bracket) {
        self.state.last_error = None;
        self.state.editor = None;
        self.state.activity.clear();
        self.state.status = Some(format!(
            "{} teams seeded, {} rounds to play",
            bracket.team_count(),
            bracket.total_rounds()
        ));
        self.state.bracket.load(tournament, bracket);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    pub fn toggle_edit_mode(&mut self) {
        self.state.edit_mode = !self.state.edit_mode;
        if !self.state.edit_mode {
            self.state.editor = None;
        }
        self.state.status = Some(
            if self.state.edit_mode {
                "Edit mode on: Enter on a match to record its result"
            } else {
                "Edit mode off"
            }
            .to_string(),
        );
    }

    // -----------------------------------------------------------------------
    // Bracket navigation, delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        self.state.bracket.navigate_round_next();
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.navigate_round_prev();
    }

    pub fn bracket_match_down(&mut self) {
        self.state.bracket.navigate_match_down();
    }

    pub fn bracket_match_up(&mut self) {
        self.state.bracket.navigate_match_up();
    }

    // -----------------------------------------------------------------------
    // Result editing
    // -----------------------------------------------------------------------

    /// Open the score popup for the highlighted match. Only playable matches
    /// can be edited, and only in edit mode.
    pub fn open_score_editor(&mut self) {
        if !self.state.edit_mode {
            self.state.status = Some("Results are read-only. Press e to enable editing.".to_string());
            return;
        }
        let (Some(bracket), Some(m)) = (self.state.bracket.bracket.as_ref(), self.state.bracket.selected())
        else {
            return;
        };
        if !m.is_ready() {
            self.state.status = Some(format!(
                "{} is not ready: {} vs {}",
                m.id,
                m.slot_a.display_name(),
                m.slot_b.display_name()
            ));
            return;
        }
        let round = bracket
            .round_name(m.round)
            .map(|n| n.label())
            .unwrap_or_else(|_| format!("Round {}", m.round));
        self.state.editor = Some(ScoreEditor::for_match(m, format!("{round} {}", m.id)));
    }

    pub fn cancel_score_editor(&mut self) {
        self.state.editor = None;
    }

    /// Hand the editor's scores to the bracket. Rejections the user can fix
    /// stay in the popup; anything else closes it.
    pub fn submit_score_editor(&mut self) {
        let Some(editor) = self.state.editor.as_mut() else {
            return;
        };
        let (score_a, score_b) = match editor.parse() {
            Ok(scores) => scores,
            Err(message) => {
                editor.error = Some(message);
                return;
            }
        };
        let match_id = editor.match_id;
        let Some(bracket) = self.state.bracket.bracket.as_mut() else {
            self.state.editor = None;
            return;
        };

        let previous = bracket
            .match_by_id(match_id)
            .ok()
            .and_then(|m| m.winner.clone());

        match bracket.record_result(match_id, score_a, score_b) {
            Ok(bracket) => {
                let mut summary = describe_result(bracket, match_id);
                let changed = previous.is_some_and(|p| {
                    bracket
                        .match_by_id(match_id)
                        .is_ok_and(|m| m.winner.as_ref() != Some(&p))
                });
                if changed {
                    summary.push_str(" (downstream reset)");
                }
                if let Some(champion) = bracket.champion() {
                    summary.push_str(&format!(". {} are champions!", champion.name));
                }
                self.state.activity.push(summary.clone());
                self.state.status = Some(summary);
                self.state.editor = None;
            }
            Err(err) => match err.kind() {
                ErrorKind::InvalidInput | ErrorKind::IllegalState => {
                    warn!("result for {match_id} rejected: {err}");
                    editor.error = Some(err.reason().to_string());
                }
                ErrorKind::NotFound => {
                    error!("result for {match_id} failed: {err}");
                    self.state.editor = None;
                    self.state.status = Some(format!("Could not save result: {err}"));
                }
            },
        }
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }
}

/// "Semi-Final M5: Fire Eagles 2-1 Ice Dragons, Fire Eagles advances"
fn describe_result(bracket: &Bracket, match_id: MatchId) -> String {
    let Ok(m) = bracket.match_by_id(match_id) else {
        return format!("{match_id} recorded");
    };
    let round = bracket
        .round_name(m.round)
        .map(|n| n.label())
        .unwrap_or_default();
    let score = |s: Option<u32>| s.map(|s| s.to_string()).unwrap_or_default();
    let winner = m.winner.as_ref().map(|t| t.name.as_str()).unwrap_or("nobody");
    let verb = if m.downstream(bracket.total_rounds()).is_some() {
        "advances"
    } else {
        "wins the final"
    };
    format!(
        "{round} {}: {} {}-{} {}, {winner} {verb}",
        m.id,
        m.slot_a.display_name(),
        score(m.slot_a.score),
        score(m.slot_b.score),
        m.slot_b.display_name()
    )
}
