use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Dim,
    Winner,
    Editable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(34, 139, 84)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(240, 196, 25)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow | BannerColor::Dim => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        BannerColor::Editable => Style::default().fg(Color::Cyan),
    }
}

/// Triangle wave over `0..height`, one step per tick.
pub fn ball_row(tick: u64, height: u16) -> u16 {
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let t = tick % (2 * h);
    h.abs_diff(t) as u16
}

pub fn ball_frame(frame: usize) -> [&'static str; 5] {
    const FRAMES: [[&str; 5]; FRAME_COUNT] = [
        ["  .---.  ", " / \\_/ \\ ", "|--/ \\--|", " \\_\\_/_/ ", "  '---'  "],
        ["  .---.  ", " /_/ \\_\\ ", "| \\___/ |", " \\ / \\ / ", "  '---'  "],
        ["  .---.  ", " / /_\\ \\ ", "|-<   >-|", " \\ \\_/ / ", "  '---'  "],
        ["  .---.  ", " /\\_ _/\\ ", "|  /_\\  |", " \\/   \\/ ", "  '---'  "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 5] {
    [
        " _____ ___  _   _ ____  _   _ _______   __",
        "|_   _/ _ \\| | | |  _ \\| \\ | | ____\\ \\ / /",
        "  | || | | | | | | |_) |  \\| |  _|  \\ V / ",
        "  | || |_| | |_| |  _ <| |\\  | |___  | |  ",
        "  |_| \\___/ \\___/|_| \\_\\_| \\_|_____| |_|  ",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_bounces_between_edges() {
        let rows: Vec<u16> = (0..10).map(|t| ball_row(t, 5)).collect();
        assert_eq!(rows, vec![4, 3, 2, 1, 0, 1, 2, 3, 4, 3]);
        assert_eq!(ball_row(7, 1), 0);
    }

    #[test]
    fn art_rows_have_even_width() {
        for frame in 0..FRAME_COUNT {
            let widths: Vec<usize> = ball_frame(frame).iter().map(|r| r.chars().count()).collect();
            assert!(widths.iter().all(|w| *w == 9), "frame {frame}: {widths:?}");
        }
        let title = title_rows();
        assert!(title.iter().all(|r| r.chars().count() == title[0].chars().count()));
    }
}
