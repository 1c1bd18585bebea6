use crate::app::MenuItem;
use crate::state::roster::TournamentInfo;
use bracket_engine::{Bracket, Match, MatchId};
use chrono::Local;

/// Most recent results kept for the activity panel.
const ACTIVITY_LIMIT: usize = 50;
/// Score fields accept at most this many digits.
const SCORE_DIGITS: usize = 3;

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter, drives the bouncing ball row.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count.max(1);
    }
}

// ---------------------------------------------------------------------------
// Bracket view state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub tournament: Option<TournamentInfo>,
    pub bracket: Option<Bracket>,
    /// Round the cursor is in, 1-based. 0 until a bracket is loaded.
    pub view_round: u32,
    /// Index of the highlighted match within `view_round`.
    pub selected_match: usize,
}

impl BracketState {
    /// Store a freshly built bracket and jump to the first round with work left.
    pub fn load(&mut self, tournament: TournamentInfo, bracket: Bracket) {
        self.view_round = detect_active_round(&bracket);
        self.selected_match = first_open_match(&bracket, self.view_round);
        self.tournament = Some(tournament);
        self.bracket = Some(bracket);
    }

    pub fn total_rounds(&self) -> u32 {
        self.bracket.as_ref().map(Bracket::total_rounds).unwrap_or(0)
    }

    pub fn navigate_round_next(&mut self) {
        if self.view_round < self.total_rounds() {
            self.view_round += 1;
            self.clamp_selection();
        }
    }

    pub fn navigate_round_prev(&mut self) {
        if self.view_round > 1 {
            self.view_round -= 1;
            self.clamp_selection();
        }
    }

    pub fn navigate_match_down(&mut self) {
        let max = self.matches_in_view().saturating_sub(1);
        if self.selected_match < max {
            self.selected_match += 1;
        }
    }

    pub fn navigate_match_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&Match> {
        let bracket = self.bracket.as_ref()?;
        bracket.round(self.view_round).get(self.selected_match).copied()
    }

    pub fn selected_match_id(&self) -> Option<MatchId> {
        self.selected().map(|m| m.id)
    }

    fn matches_in_view(&self) -> usize {
        self.bracket
            .as_ref()
            .map(|b| b.round(self.view_round).len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let max = self.matches_in_view().saturating_sub(1);
        self.selected_match = self.selected_match.min(max);
    }
}

/// First round holding a playable, undecided match; the final once everything
/// is settled.
fn detect_active_round(bracket: &Bracket) -> u32 {
    bracket
        .matches()
        .find(|m| m.is_ready() && !m.is_decided())
        .map(|m| m.round)
        .unwrap_or_else(|| bracket.total_rounds())
}

fn first_open_match(bracket: &Bracket, round: u32) -> usize {
    bracket
        .round(round)
        .iter()
        .position(|m| m.is_ready() && !m.is_decided())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Score editor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EditorField {
    #[default]
    ScoreA,
    ScoreB,
}

/// Form state of the edit-result popup.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEditor {
    pub match_id: MatchId,
    pub title: String,
    pub team_a: String,
    pub team_b: String,
    pub score_a: String,
    pub score_b: String,
    pub focus: EditorField,
    /// Inline validation message, cleared on the next keystroke.
    pub error: Option<String>,
}

impl ScoreEditor {
    /// Prefilled with the recorded scores when the match was already played.
    pub fn for_match(m: &Match, title: String) -> Self {
        let prefill = |score: Option<u32>| score.map(|s| s.to_string()).unwrap_or_default();
        Self {
            match_id: m.id,
            title,
            team_a: m.slot_a.display_name().to_string(),
            team_b: m.slot_b.display_name().to_string(),
            score_a: prefill(m.slot_a.score),
            score_b: prefill(m.slot_b.score),
            focus: EditorField::ScoreA,
            error: None,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            EditorField::ScoreA => &mut self.score_a,
            EditorField::ScoreB => &mut self.score_b,
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        self.error = None;
        let field = self.focused_mut();
        if field.len() < SCORE_DIGITS {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        self.focused_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            EditorField::ScoreA => EditorField::ScoreB,
            EditorField::ScoreB => EditorField::ScoreA,
        };
    }

    /// Both fields as numbers. The engine still owns tie and range checks.
    pub fn parse(&self) -> Result<(i32, i32), String> {
        let parse_one = |raw: &str, team: &str| {
            if raw.is_empty() {
                return Err(format!("enter a score for {team}"));
            }
            raw.parse::<i32>()
                .map_err(|_| format!("'{raw}' is not a valid score for {team}"))
        };
        Ok((parse_one(&self.score_a, &self.team_a)?, parse_one(&self.score_b, &self.team_b)?))
    }
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub at: String,
    pub summary: String,
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<ResultEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, summary: impl Into<String>) {
        self.entries.push(ResultEntry {
            at: Local::now().format("%H:%M:%S").to_string(),
            summary: summary.into(),
        });
        if self.entries.len() > ACTIVITY_LIMIT {
            let overflow = self.entries.len() - ACTIVITY_LIMIT;
            self.entries.drain(..overflow);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    /// Result editing is allowed only while this is on.
    pub edit_mode: bool,
    pub last_error: Option<String>,
    /// One-line feedback shown under the bracket header.
    pub status: Option<String>,
    pub bracket: BracketState,
    pub editor: Option<ScoreEditor>,
    pub activity: ActivityLog,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new(edit_mode: bool) -> Self {
        Self {
            show_intro: true,
            edit_mode,
            ..Self::default()
        }
    }
}
