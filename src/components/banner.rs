use crate::components::banner_frames::{
    BannerColor, BannerTheme, ball_frame, ball_row, resolve, title_rows,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

/// Art rows of the full banner: ball/title block plus the caption line.
const ART_ROWS: u16 = 5;

pub struct AnimatedBanner<'a> {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    /// Tournament name, e.g. "Summer Football Championship 2024".
    pub title: &'a str,
    /// Sport, host and current round, already joined.
    pub caption: String,
}

impl Widget for AnimatedBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" TOURNEY "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Primary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < 64 || inner.height <= ART_ROWS {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    render_centered(
        Line::from(Span::styled(banner.title, resolve(BannerColor::Accent, banner.theme))),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(
                banner.caption.as_str(),
                resolve(BannerColor::Secondary, banner.theme),
            )),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left_ball = ball_frame(banner.frame);
    let right_ball = ball_frame((banner.frame + 2) % FRAME_COUNT);
    let bounce = ball_row(banner.tick, ART_ROWS);
    let show_right_ball = inner.width > 80;

    for row in 0..ART_ROWS {
        let y = inner.y + row;
        let ball_style = if row == bounce {
            resolve(BannerColor::Secondary, banner.theme)
        } else {
            resolve(BannerColor::Shadow, banner.theme)
        };

        let mut spans = vec![
            Span::styled(left_ball[row as usize], ball_style),
            Span::raw("  "),
            Span::styled(title[row as usize], resolve(BannerColor::Primary, banner.theme)),
        ];
        if show_right_ball {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(right_ball[row as usize], ball_style));
        }
        render_centered(Line::from(spans), inner, y, buf);
    }

    if inner.height > ART_ROWS + 1 {
        render_centered(
            Line::from(Span::styled(banner.title, resolve(BannerColor::Accent, banner.theme))),
            inner,
            inner.y + ART_ROWS + 1,
            buf,
        );
    }
    if inner.height > ART_ROWS + 2 {
        render_centered(
            Line::from(Span::styled(
                banner.caption.as_str(),
                resolve(BannerColor::Secondary, banner.theme),
            )),
            inner,
            inner.y + ART_ROWS + 2,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let style: Style = span.style;
        let run: String = span
            .content
            .chars()
            .take(limit.saturating_sub(cx) as usize)
            .collect();
        if run.is_empty() {
            break;
        }
        let len = run.chars().count() as u16;
        buf.set_string(cx, y, run, style);
        cx += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn compact_banner_shows_title_and_caption() {
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            frame: 0,
            tick: 0,
            theme: BannerTheme::Dark,
            title: "Test Cup",
            caption: "FINAL".to_string(),
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("Test Cup"));
        assert!(row_text(&buf, 2).contains("FINAL"));
    }

    #[test]
    fn tiny_area_falls_back_to_name() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            frame: 1,
            tick: 3,
            theme: BannerTheme::Dark,
            title: "ignored",
            caption: String::new(),
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("TOURNEY"));
    }
}
