use bracket_engine::{Bracket, Match, MatchId, Side, Slot};
use std::collections::HashMap;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: slot-A line, status line, slot-B line.
pub const GAME_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 24;

/// Narrowest cell worth drawing. Rounds that do not fit at this width are
/// scrolled out horizontally.
pub const CELL_W_MIN: u16 = 14;

/// Rows above the grid: round header plus a blank line.
const HEADER_ROWS: u16 = 2;

/// Slot height at `depth` columns from the leftmost visible round.
/// SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
pub fn slot_height(depth: u32) -> u16 {
    (0..depth).fold(GAME_HEIGHT, |h, _| h.saturating_mul(2).saturating_add(1))
}

// ---------------------------------------------------------------------------
// MatchCell: pre-computed position for one match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row of the status line (center of the 3-row cell), grid-relative.
    pub center_row: u16,
    /// Starting x-column within the grid.
    pub col: u16,
    pub cell_width: u16,
    /// False for the rightmost visible column.
    pub draw_outbound_connector: bool,
    pub round: u32,
    pub position: u32,
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine for a window of rounds
// ---------------------------------------------------------------------------

/// Pre-computed layout for the visible rounds of a bracket.
///
/// The leftmost visible round is laid out as leaves; every later round sits
/// on the midpoints of its feeders:
///   center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d])
///
/// For an 8-team field (rounds 1..=3):
///   Round 1     (d=0): [1, 5, 9, 13]  (spacing 4)
///   Semi-Final  (d=1): [3, 11]        (spacing 8)
///   Final       (d=2): [7]
#[derive(Debug, Clone, Default)]
pub struct BracketGrid {
    /// Cells in round-major order, positions ascending.
    pub cells: Vec<MatchCell>,
    pub first_round: u32,
    pub last_round: u32,
    /// Starting x-column for each visible round, leftmost first.
    pub round_cols: Vec<u16>,
    pub total_width: u16,
    pub total_height: u16,
    pub cell_width: u16,
    /// `offsets[i]..offsets[i+1]` are the cells of visible round `i`.
    offsets: Vec<usize>,
}

impl BracketGrid {
    /// Lay out `round_sizes` (match count per round, round 1 first) in
    /// `width` columns. When not every round fits, the window starts at
    /// `focus_round` or as close to it as keeps the window full.
    pub fn compute(width: u16, round_sizes: &[u32], focus_round: u32) -> Self {
        let total = round_sizes.len() as u32;
        if total == 0 {
            return Self::default();
        }

        let fit = u32::from(width.saturating_add(CONNECTOR_WIDTH) / (CELL_W_MIN + CONNECTOR_WIDTH)).max(1);
        let visible = fit.min(total);
        let first_round = window_start(focus_round, visible, total);
        let last_round = first_round + visible - 1;

        let cols = visible as u16;
        let per_col = width.saturating_sub(CONNECTOR_WIDTH * (cols - 1)) / cols;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;

        let mut cells = Vec::new();
        let mut offsets = vec![0];
        let mut round_cols = Vec::with_capacity(visible as usize);
        let mut total_height = 0;

        for (d, round) in (first_round..=last_round).enumerate() {
            let depth = d as u32;
            let col = stride * d as u16;
            let first_center = slot_height(depth) / 2;
            let spacing = slot_height(depth + 1) - slot_height(depth);
            round_cols.push(col);

            for position in 1..=round_sizes[(round - 1) as usize] {
                let center_row = first_center.saturating_add(spacing.saturating_mul(position as u16 - 1));
                total_height = total_height.max(center_row.saturating_add(2));
                cells.push(MatchCell {
                    center_row,
                    col,
                    cell_width,
                    draw_outbound_connector: round < last_round,
                    round,
                    position,
                });
            }
            offsets.push(cells.len());
        }

        Self {
            cells,
            first_round,
            last_round,
            round_cols,
            total_width: stride * (cols - 1) + cell_width,
            total_height,
            cell_width,
            offsets,
        }
    }

    pub fn cells_for_round(&self, round: u32) -> &[MatchCell] {
        if round < self.first_round || round > self.last_round {
            return &[];
        }
        let i = (round - self.first_round) as usize;
        &self.cells[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn cell(&self, round: u32, position: u32) -> Option<&MatchCell> {
        self.cells_for_round(round)
            .iter()
            .find(|c| c.position == position)
    }
}

fn window_start(focus_round: u32, visible: u32, total: u32) -> u32 {
    let focus = focus_round.clamp(1, total);
    focus.min(total - visible + 1)
}

/// Scroll offset that keeps `center_row` near the middle of a `viewport`
/// rows tall view without scrolling past the grid.
pub fn scroll_to_show(center_row: u16, viewport: u16, total_height: u16) -> u16 {
    let max_scroll = total_height.saturating_sub(viewport);
    center_row.saturating_sub(viewport / 2).min(max_scroll)
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders the visible rounds of a bracket with their connectors.
pub struct BracketView<'a> {
    pub bracket: &'a Bracket,
    /// Pre-computed layout. Rebuild on resize or when the window moves.
    pub grid: &'a BracketGrid,
    pub selected: Option<MatchId>,
    /// Vertical scroll offset in grid rows.
    pub scroll_offset: u16,
    pub theme: BannerTheme,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < GAME_HEIGHT + HEADER_ROWS || self.grid.cells.is_empty() {
            return;
        }

        draw_round_headers(self.bracket, self.grid, area, self.theme, buf);
        let body = Rect::new(area.x, area.y + HEADER_ROWS, area.width, area.height - HEADER_ROWS);
        let seeds: HashMap<&str, usize> = self
            .bracket
            .teams()
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i + 1))
            .collect();

        // Pass 1: match cells.
        for cell in &self.grid.cells {
            let Ok(m) = self.bracket.find(cell.round, cell.position) else {
                continue;
            };
            let selected = self.selected == Some(m.id);
            draw_match_cell(m, cell, &seeds, selected, body, self.scroll_offset, self.theme, buf);
        }

        // Pass 2: connectors from each pair of feeders into their parent.
        for round in self.grid.first_round..self.grid.last_round {
            let children = self.grid.cells_for_round(round);
            let conn_x = body.x + self.grid.round_cols[(round - self.grid.first_round) as usize]
                + self.grid.cell_width;

            for parent in self.grid.cells_for_round(round + 1) {
                let Some(top) = children
                    .iter()
                    .find(|c| c.position == 2 * parent.position - 1 && c.draw_outbound_connector)
                else {
                    continue;
                };
                let bottom = children.iter().find(|c| c.position == 2 * parent.position);
                draw_connector(
                    top.center_row,
                    parent.center_row,
                    bottom.map(|c| c.center_row),
                    conn_x,
                    body,
                    self.scroll_offset,
                    self.theme,
                    buf,
                );
            }
        }
    }
}

fn draw_round_headers(bracket: &Bracket, grid: &BracketGrid, area: Rect, theme: BannerTheme, buf: &mut Buffer) {
    let accent = resolve(BannerColor::Accent, theme);
    let dim = resolve(BannerColor::Dim, theme);
    let limit_x = area.x + area.width;

    if grid.first_round > 1 {
        put_char(buf, area.x, area.y, '<', dim);
    }
    for (i, round) in (grid.first_round..=grid.last_round).enumerate() {
        let Ok(name) = bracket.round_name(round) else {
            continue;
        };
        let x = area.x + grid.round_cols[i] + 1;
        if x >= limit_x {
            break;
        }
        let label: String = name
            .banner()
            .chars()
            .take(grid.cell_width.saturating_sub(1) as usize)
            .collect();
        buf.set_string(x, area.y, label, accent);
    }
    if grid.last_round < bracket.total_rounds() {
        put_char(buf, limit_x.saturating_sub(1), area.y, '>', dim);
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a grid row to an absolute screen y, applying scroll + area bounds.
/// Returns `None` if the row is off-screen.
fn screen_y(grid_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if grid_row < scroll {
        return None;
    }
    let rel = grid_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

#[allow(clippy::too_many_arguments)]
fn draw_match_cell(
    m: &Match,
    cell: &MatchCell,
    seeds: &HashMap<&str, usize>,
    selected: bool,
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let winner_style = resolve(BannerColor::Winner, theme);
    let dim = resolve(BannerColor::Dim, theme);
    let ready = resolve(BannerColor::Editable, theme);

    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };

    let winner = m.winner_side();
    let rows = [
        (cell.center_row.saturating_sub(1), Some(Side::A)),
        (cell.center_row, None),
        (cell.center_row.saturating_add(1), Some(Side::B)),
    ];

    for (grid_row, side) in rows {
        let Some(sy) = screen_y(grid_row, scroll, area) else {
            continue;
        };
        let (content, style) = match side {
            Some(side) => {
                let slot = m.slot(side);
                let seed = slot.team.as_ref().and_then(|t| seeds.get(t.id.as_str()).copied());
                let style = if winner == Some(side) {
                    winner_style
                } else if slot.is_placeholder() {
                    dim
                } else {
                    base_style
                };
                (format_team_line(slot, seed, cell.cell_width as usize), style)
            }
            None => {
                let style = if m.is_ready() && !m.is_decided() { ready } else { dim };
                (format_status_line(m, cell.cell_width as usize), style)
            }
        };
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, style);
    }
}

/// Format a slot line: `"[seed] [name       ] [score] "`.
///
/// Total width = seed(2) + " " + name(width-8) + " " + score(3) + " " = width.
pub fn format_team_line(slot: &Slot, seed: Option<usize>, width: usize) -> String {
    let seed = match seed {
        Some(s) => format!("{:2}", s),
        None => "  ".to_string(),
    };
    let score = match slot.score {
        Some(s) => format!("{:3}", s),
        None => "   ".to_string(),
    };
    let name_w = width.saturating_sub(8);
    let name: String = slot.display_name().chars().take(name_w).collect();
    let line = format!("{seed} {name:<name_w$} {score} ");
    line.chars().take(width).collect()
}

/// Center row of a cell: match id and where the match stands.
pub fn format_status_line(m: &Match, width: usize) -> String {
    let state = if m.is_bye() {
        if m.is_decided() { "BYE" } else { "WAITING" }
    } else if m.is_decided() {
        "FINAL"
    } else if m.is_ready() {
        "READY"
    } else {
        "TBD"
    };
    let raw = format!("   {} {}", m.id, state);
    let padded = format!("{raw:<width$}");
    padded.chars().take(width).collect()
}

/// Draw box-drawing connectors between one parent and its feeders. A parent
/// fed by a bye has only the top feeder.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: Option<u16>,
    conn_base_x: u16, // absolute screen x of connector column 0
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Dim, theme);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, if r_bot.is_some() { '├' } else { '└' });
    put!(col_c, r_mid, '─');

    if let Some(r_bot) = r_bot {
        for row in (r_mid + 1)..r_bot {
            put!(col_b, row, '│');
        }
        put!(col_a, r_bot, '─');
        put!(col_b, r_bot, '┘');
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::{Team, matches_in_round, total_rounds_for};

    fn sizes(n: u32) -> Vec<u32> {
        (1..=total_rounds_for(n)).map(|r| matches_in_round(n, r)).collect()
    }

    fn centers(grid: &BracketGrid, round: u32) -> Vec<u16> {
        grid.cells_for_round(round).iter().map(|c| c.center_row).collect()
    }

    fn bracket(n: usize) -> Bracket {
        Bracket::new(
            (1..=n)
                .map(|i| Team::new(format!("t{i}"), format!("Team {i}")))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_slot_heights() {
        let sh: Vec<u16> = (0..4).map(slot_height).collect();
        assert_eq!(sh, vec![3, 7, 15, 31]);
    }

    #[test]
    fn test_eight_team_centers() {
        let grid = BracketGrid::compute(120, &sizes(8), 1);
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(centers(&grid, 1), vec![1, 5, 9, 13]);
        assert_eq!(centers(&grid, 2), vec![3, 11]);
        assert_eq!(centers(&grid, 3), vec![7]);
        assert_eq!(grid.total_height, 15);
    }

    #[test]
    fn test_short_rounds_keep_feed_positions() {
        // 5 teams: rounds of 3, 2 and 1 matches.
        let grid = BracketGrid::compute(120, &sizes(5), 1);
        assert_eq!(centers(&grid, 1), vec![1, 5, 9]);
        assert_eq!(centers(&grid, 2), vec![3, 11]);
        assert_eq!(centers(&grid, 3), vec![7]);
        assert_eq!(grid.total_height, 13);
    }

    #[test]
    fn test_parent_center_is_midpoint_of_children() {
        let grid = BracketGrid::compute(200, &sizes(16), 1);
        for round in 1..grid.last_round {
            let children = grid.cells_for_round(round);
            for parent in grid.cells_for_round(round + 1) {
                let c_top = children[(2 * parent.position - 2) as usize].center_row;
                let c_bot = children[(2 * parent.position - 1) as usize].center_row;
                assert_eq!(
                    parent.center_row,
                    (c_top + c_bot) / 2,
                    "round={round} parent={}",
                    parent.position
                );
            }
        }
    }

    #[test]
    fn test_last_column_has_no_outbound_connector() {
        let grid = BracketGrid::compute(120, &sizes(8), 1);
        assert!(grid.cells_for_round(1).iter().all(|c| c.draw_outbound_connector));
        assert!(!grid.cells_for_round(3)[0].draw_outbound_connector);
    }

    #[test]
    fn test_narrow_width_windows_rounds() {
        // 64 teams = 6 rounds; 40 columns fit two.
        let grid = BracketGrid::compute(40, &sizes(64), 5);
        assert_eq!((grid.first_round, grid.last_round), (5, 6));
        assert_eq!(centers(&grid, 5), vec![1, 5]);
        assert!(grid.cells_for_round(1).is_empty());

        let grid = BracketGrid::compute(40, &sizes(64), 2);
        assert_eq!((grid.first_round, grid.last_round), (2, 3));
        assert!(grid.cell(2, 16).is_some());
    }

    #[test]
    fn test_cell_width_caps_at_full_width_limit() {
        let grid = BracketGrid::compute(300, &sizes(8), 1);
        assert_eq!(grid.cell_width, CELL_W_FULL);
        assert_eq!(grid.total_width, 3 * CELL_W_FULL + 2 * CONNECTOR_WIDTH);
    }

    #[test]
    fn test_scroll_to_show() {
        assert_eq!(scroll_to_show(3, 20, 63), 0);
        assert_eq!(scroll_to_show(33, 20, 63), 23);
        assert_eq!(scroll_to_show(61, 20, 63), 43);
        assert_eq!(scroll_to_show(5, 40, 15), 0);
    }

    #[test]
    fn test_format_team_line_width() {
        let b = bracket(2);
        let m = b.find(1, 1).unwrap();
        let line = format_team_line(&m.slot_a, Some(1), 14);
        assert_eq!(line.chars().count(), 14, "line: {:?}", line);
        assert!(line.starts_with(" 1 Team 1"));

        let line = format_team_line(&Slot::default(), None, 22);
        assert_eq!(line.chars().count(), 22);
        assert!(line.contains("TBD"));
    }

    #[test]
    fn test_status_line_states() {
        let mut b = bracket(3);
        assert!(format_status_line(b.find(1, 2).unwrap(), 16).contains("M2 BYE"));
        assert!(format_status_line(b.find(1, 1).unwrap(), 16).contains("READY"));
        assert!(format_status_line(b.find(2, 1).unwrap(), 16).contains("TBD"));
        b.record_result(MatchId(1), 3, 1).unwrap();
        assert!(format_status_line(b.find(1, 1).unwrap(), 16).contains("FINAL"));
    }

    #[test]
    fn test_view_renders_names_and_connectors() {
        let b = bracket(4);
        let grid = BracketGrid::compute(60, &sizes(4), 1);
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        BracketView {
            bracket: &b,
            grid: &grid,
            selected: Some(MatchId(1)),
            scroll_offset: 0,
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .filter_map(|pos| buf.cell(pos).map(|c| c.symbol().to_string()))
            .collect();
        assert!(text.contains("SEMI-FINAL"));
        assert!(text.contains("Team 4"));
        assert!(text.contains('├'));
    }
}
