use crate::state::messages::{RosterRequest, RosterResponse};
use anyhow::{Context, bail};
use bracket_engine::{Bracket, Team};
use log::{debug, error, info};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

/// Roster shipped with the binary, used when no roster file is configured.
pub const DEFAULT_ROSTER: &str = include_str!("../../data/summer_championship.json");

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Headline details shown above the bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentInfo {
    pub name: String,
    pub sport: String,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    pub name: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub host: String,
    pub teams: Vec<RosterTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterTeam {
    pub id: String,
    pub name: String,
}

impl Roster {
    pub fn info(&self) -> TournamentInfo {
        TournamentInfo {
            name: self.name.clone(),
            sport: self.sport.clone(),
            host: self.host.clone(),
        }
    }

    /// Teams in seeding order.
    pub fn teams(&self) -> Vec<Team> {
        self.teams
            .iter()
            .map(|t| Team::new(t.id.trim(), t.name.trim()))
            .collect()
    }
}

pub fn parse_roster(json: &str) -> anyhow::Result<Roster> {
    let roster: Roster = serde_json::from_str(json).context("roster is not valid JSON")?;
    if roster.name.trim().is_empty() {
        bail!("roster has no tournament name");
    }
    if let Some(team) = roster.teams.iter().find(|t| t.id.trim().is_empty()) {
        bail!("team '{}' has an empty id", team.name);
    }
    Ok(roster)
}

/// Loads the roster and seeds a bracket from it, reporting progress back to
/// the UI loop.
pub struct RosterWorker {
    source: Option<PathBuf>,
    requests: mpsc::Receiver<RosterRequest>,
    responses: mpsc::Sender<RosterResponse>,
    is_loading: Arc<AtomicBool>,
}

impl RosterWorker {
    pub fn new(
        source: Option<PathBuf>,
        requests: mpsc::Receiver<RosterRequest>,
        responses: mpsc::Sender<RosterResponse>,
    ) -> Self {
        Self {
            source,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                RosterRequest::Load => self.handle_load().await,
            };

            debug!("roster request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| RosterResponse::Error {
                message: format!("{err:#}"),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send roster response: {e}");
                break;
            }
        }
    }

    async fn handle_load(&self) -> anyhow::Result<RosterResponse> {
        let json = match &self.source {
            Some(path) => {
                debug!("reading roster from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("cannot read roster {}", path.display()))?
            }
            None => {
                debug!("using built-in roster");
                DEFAULT_ROSTER.to_string()
            }
        };
        let roster = parse_roster(&json)?;
        let bracket = Bracket::new(roster.teams()).context("cannot seed bracket")?;
        info!(
            "loaded {} with {} teams over {} rounds",
            roster.name,
            bracket.team_count(),
            bracket.total_rounds()
        );
        Ok(RosterResponse::Loaded {
            tournament: roster.info(),
            bracket,
        })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(RosterResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(RosterResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(RosterResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_parses() {
        let roster = parse_roster(DEFAULT_ROSTER).unwrap();
        assert_eq!(roster.name, "Summer Football Championship 2024");
        assert_eq!(roster.teams.len(), 8);
        assert_eq!(roster.teams()[0].name, "Thunder Wolves");

        let bracket = Bracket::new(roster.teams()).unwrap();
        assert_eq!(bracket.total_rounds(), 3);
    }

    #[test]
    fn sport_and_host_are_optional() {
        let roster = parse_roster(r#"{"name":"Cup","teams":[{"id":"a","name":"A"}]}"#).unwrap();
        assert_eq!(roster.info().sport, "");
        assert_eq!(roster.info().host, "");
    }

    #[test]
    fn rejects_blank_ids_and_names() {
        let err = parse_roster(r#"{"name":"Cup","teams":[{"id":" ","name":"A"}]}"#).unwrap_err();
        assert!(err.to_string().contains("empty id"));

        let err = parse_roster(r#"{"name":"","teams":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no tournament name"));

        assert!(parse_roster("not json").is_err());
    }

    #[tokio::test]
    async fn worker_builds_bracket_from_builtin_roster() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = RosterWorker::new(None, req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        req_tx.send(RosterRequest::Load).await.unwrap();
        let loaded = loop {
            match resp_rx.recv().await.unwrap() {
                RosterResponse::LoadingStateChanged { .. } => continue,
                other => break other,
            }
        };
        task.abort();

        let RosterResponse::Loaded { tournament, bracket } = loaded else {
            panic!("expected a loaded roster");
        };
        assert_eq!(tournament.host, "Sports Club NYC");
        assert_eq!(bracket.team_count(), 8);
    }
}
