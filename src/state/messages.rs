use crate::state::roster::{LoadingState, TournamentInfo};
use bracket_engine::Bracket;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum RosterRequest {
    /// Read the roster and seed a fresh bracket. Recorded results are dropped.
    Load,
}

#[derive(Debug)]
pub enum RosterResponse {
    LoadingStateChanged { loading_state: LoadingState },
    Loaded { tournament: TournamentInfo, bracket: Bracket },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
