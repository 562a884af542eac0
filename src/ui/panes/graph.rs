//! Graph pane rendering
//!
//! Draws the rendered frame graph inside the pane using upper half blocks:
//! each terminal cell shows two vertically stacked pixels, the top one as the
//! foreground color and the bottom one as the background color. The image is
//! centred on a white canvas.

use crate::render::RasterImage;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HALF_BLOCK: &str = "▀";

/// Pixel size available inside a pane of the given outer area
pub fn pixel_capacity(area: Rect) -> (u32, u32) {
    let inner_width = area.width.saturating_sub(2) as u32;
    let inner_height = area.height.saturating_sub(2) as u32;
    (inner_width, inner_height * 2)
}

/// Render the graph pane; `image` must already fit [`pixel_capacity`]
pub fn render_graph_pane(
    frame: &mut Frame,
    area: Rect,
    image: Option<&RasterImage>,
    title: &str,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(image) = image else {
        let paragraph = Paragraph::new("(nothing to show yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let (cols, pixel_rows) = pixel_capacity(area);
    let x_offset = cols.saturating_sub(image.width()) / 2;
    let y_offset = pixel_rows.saturating_sub(image.height()) / 2;

    let canvas = DEFAULT_THEME.canvas;
    let sample = |x: u32, y: u32| -> Color {
        let inside = x >= x_offset
            && y >= y_offset
            && x - x_offset < image.width()
            && y - y_offset < image.height();
        let [r, g, b] = if inside {
            image.pixel_over(x - x_offset, y - y_offset, canvas)
        } else {
            canvas
        };
        Color::Rgb(r, g, b)
    };

    let lines: Vec<Line> = (0..pixel_rows / 2)
        .map(|row| {
            let spans: Vec<Span> = (0..cols)
                .map(|col| {
                    let top = sample(col, row * 2);
                    let bottom = sample(col, row * 2 + 1);
                    Span::styled(HALF_BLOCK, Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
