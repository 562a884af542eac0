//! Source code pane rendering with syntax highlighting
//!
//! Shows the debugged file with a two-column gutter. The gutter of the paused
//! line carries the current marker (`>` for a line pause, `R` for a return
//! pause); every other gutter is blank, so at most one marker is visible.

use crate::stepper::SourceMarker;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for Python-like source
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte_pos, c) = chars[i];

        // Comments run to end of line
        if c == '#' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            spans.push(Span::styled(
                line[byte_pos..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        // Strings, either quote style
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                if chars[end].1 == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            end = (end + 1).min(chars.len());
            let end_byte = chars.get(end).map_or(line.len(), |(pos, _)| *pos);
            spans.push(Span::styled(
                line[byte_pos..end_byte].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = get_keyword_style(&current_word, c == '(');
                spans.push(Span::styled(current_word.clone(), style));
                current_word.clear();
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_call: bool) -> Style {
    match word {
        "def" | "class" | "return" | "if" | "elif" | "else" | "while" | "for" | "in" | "import"
        | "from" | "as" | "with" | "try" | "except" | "finally" | "raise" | "pass" | "break"
        | "continue" | "lambda" | "yield" | "global" | "nonlocal" | "del" | "assert" | "and"
        | "or" | "not" | "is" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "True" | "False" | "None" => Style::default().fg(DEFAULT_THEME.number),
        "print" | "len" | "range" | "list" | "dict" | "set" | "tuple" | "int" | "str" | "float"
        | "sorted" | "enumerate" | "zip" => Style::default().fg(DEFAULT_THEME.type_name),
        _ if word.chars().all(|c| c.is_ascii_digit() || c == '_') => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the marked line is pinned to (None = center on first render)
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    marker: Option<SourceMarker>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the marked line at its pinned row
    if let Some(marker) = marker.filter(|m| m.line > 0 && m.line <= total_lines) {
        scroll_state.offset = (marker.line - 1).saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let glyph = marker.filter(|m| m.line == line_num).map(|m| m.glyph);

            let (gutter, num_style) = match glyph {
                Some(glyph) => {
                    let color = if glyph == 'R' {
                        DEFAULT_THEME.return_value
                    } else {
                        DEFAULT_THEME.secondary
                    };
                    (
                        format!("{} ", glyph),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                }
                None => ("  ".to_string(), Style::default().fg(DEFAULT_THEME.comment)),
            };

            let mut content_line = highlight_source_code(line);
            if glyph.is_some() {
                let current = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current);
                }
            }

            let mut spans = vec![
                Span::styled(gutter, num_style),
                Span::styled(format!("{:4} ", line_num), num_style),
            ];
            spans.extend(content_line.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let src = "def f(x):  # say 'hi'";
        assert_eq!(text(&highlight_source_code(src)), src);

        let src = "s = 'a\\'b' + \"c\"";
        assert_eq!(text(&highlight_source_code(src)), src);
    }

    #[test]
    fn test_unterminated_string() {
        let src = "x = 'abc";
        assert_eq!(text(&highlight_source_code(src)), src);
    }
}
