use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
/// Rows given to the log pane when it is open.
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main: body,
                logs,
            };
        }

        let [tab, main] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(body);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Option<Rect>) {
        if !show_logs || area.height < LOG_PANE_HEIGHT * 2 {
            return (area, None);
        }
        let [body, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)]).areas(area);
        (body, Some(logs))
    }
}

/// A `width` x `height` box centered in `area`, shrunk to fit.
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_pane_takes_bottom_rows() {
        let mut areas = LayoutAreas::new(Size::new(100, 40));
        assert!(areas.logs.is_none());

        areas.update(Rect::new(0, 0, 100, 40), false, true);
        let logs = areas.logs.unwrap();
        assert_eq!(logs.height, LOG_PANE_HEIGHT);
        assert_eq!(logs.y, 40 - LOG_PANE_HEIGHT);
        assert_eq!(areas.main.y, TAB_BAR_HEIGHT);
        assert_eq!(areas.main.height, 40 - TAB_BAR_HEIGHT - LOG_PANE_HEIGHT);
    }

    #[test]
    fn short_terminal_hides_logs() {
        let mut areas = LayoutAreas::new(Size::new(100, 12));
        areas.update(Rect::new(0, 0, 100, 12), false, true);
        assert!(areas.logs.is_none());
    }

    #[test]
    fn full_screen_drops_tab_bar() {
        let mut areas = LayoutAreas::new(Size::new(80, 30));
        areas.update(Rect::new(0, 0, 80, 30), true, false);
        assert_eq!(areas.main, Rect::new(0, 0, 80, 30));
        assert_eq!(areas.tab_bar, [Rect::ZERO, Rect::ZERO]);
    }

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(10, 5, 60, 20);
        assert_eq!(centered_popup(area, 40, 10), Rect::new(20, 10, 40, 10));
        assert_eq!(centered_popup(area, 100, 50), area);
    }
}
