use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use starchart::braille::{BrailleCanvas, BrailleSink};
use starchart::LayerKind;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Chart
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_chart(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.renderer.layout.label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let widget = ChartWidget {
        sink: app.rasterize(inner.width as usize, inner.height as usize),
    };
    frame.render_widget(widget, inner);
}

fn layer_color(kind: LayerKind) -> Color {
    match kind {
        LayerKind::MilkyWay => Color::Rgb(70, 70, 110),
        LayerKind::Grid => Color::Blue,
        LayerKind::Stars => Color::White,
        LayerKind::ConstellationLines => Color::Cyan,
        LayerKind::ConstellationBorders => Color::DarkGray,
        LayerKind::Messier => Color::Red,
        LayerKind::DeepSky => Color::Magenta,
        LayerKind::Herschel => Color::Green,
        LayerKind::MapLabel => Color::Yellow,
        LayerKind::FrameBorder => Color::Gray,
    }
}

/// Braille chart layers with text labels overlaid
struct ChartWidget {
    sink: BrailleSink,
}

impl ChartWidget {
    /// Render one braille layer in its colour, leaving blank cells alone
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for ChartWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // back to front
        for (kind, canvas) in self.sink.layers() {
            self.render_layer(canvas, layer_color(kind), area, buf);
        }

        for label in self.sink.labels() {
            if label.row >= area.height || label.col >= area.width {
                continue;
            }
            let style = Style::default().fg(layer_color(label.layer));
            let x = area.x + label.col;
            let y = area.y + label.row;
            let max_len = area.width.saturating_sub(label.col) as usize;
            for (i, ch) in label.text.chars().take(max_len).enumerate() {
                buf[(x + i as u16, y)].set_char(ch).set_style(style);
            }
        }
    }
}

fn toggle_span(label: &'static str, on: bool) -> Span<'static> {
    Span::styled(
        label,
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.renderer.settings;
    let deep_sky = settings.show_messier || settings.show_dsos || settings.show_herschel;

    let status = Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.renderer.layout.label.clone(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.scale_text(), Style::default().fg(Color::Magenta)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        toggle_span("[g]rid ", settings.show_grid),
        toggle_span("[m]ilky ", settings.show_milky_way),
        toggle_span("[s]tars ", settings.show_stars),
        toggle_span("[c]onst ", settings.show_lines),
        toggle_span("[b]order ", settings.show_borders),
        toggle_span("[d]so ", deep_sky),
        toggle_span("[x]mark ", settings.marker_override),
        Span::styled(
            "| n/p:map q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
