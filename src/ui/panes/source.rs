//! Source code pane rendering with syntax highlighting
//!
//! Displays the program being executed with line numbers, keyword/number
//! highlighting, and the current line marked. When execution stopped on an
//! error and the viewer is at the last step, the failing line is shown in the
//! error colour instead.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Highlight one line. `in_comment` carries `/* */` state across lines.
fn highlight_source_code(line: &str, in_comment: &mut bool) -> Line<'static> {
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);
    let mut spans = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if *in_comment {
            let start = i;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            if i < chars.len() {
                i += 2;
                *in_comment = false;
            }
            spans.push(Span::styled(chars[start..i].iter().collect::<String>(), comment_style));
            continue;
        }

        let c = chars[i];

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            spans.push(Span::styled(chars[i..].iter().collect::<String>(), comment_style));
            break;
        }

        if c == '/' && chars.get(i + 1) == Some(&'*') {
            *in_comment = true;
            spans.push(Span::styled("/*", comment_style));
            i += 2;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let style = get_keyword_style(&word);
            spans.push(Span::styled(word, style));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            spans.push(Span::styled(
                chars[start..i].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.number),
            ));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary), // Brackets
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        i += 1;
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str) -> Style {
    match word {
        "int" | "float" => Style::default().fg(DEFAULT_THEME.type_name),
        "if" | "else" | "while" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "print" => Style::default().fg(DEFAULT_THEME.builtin),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
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
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current line on a fixed visual row while stepping
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        let target_line_idx = current_line - 1;
        scroll_state.offset = target_line_idx.saturating_sub(target_row);

        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let mut in_comment = false;
    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx, highlight_source_code(line, &mut in_comment)))
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, mut content_line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let num_style = if is_current && is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            if is_current && is_error {
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content_line.spans {
                    span.style = error_style;
                }
            } else if is_current {
                let current_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current_style);
                }
            }

            let marker = if is_current { "▶" } else { " " };
            let mut spans = vec![Span::styled(format!("{:4}{} ", line_num, marker), num_style)];
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

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let mut in_comment = false;
        let src = "while (i < 3) { print(i * 2.5); } // loop";
        assert_eq!(text(&highlight_source_code(src, &mut in_comment)), src);
        assert!(!in_comment);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let mut in_comment = false;
        highlight_source_code("int x; /* start", &mut in_comment);
        assert!(in_comment);
        let line = highlight_source_code("still comment */ x = 1;", &mut in_comment);
        assert!(!in_comment);
        assert_eq!(line.spans[0].content, "still comment */");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.comment));
    }

    #[test]
    fn test_keyword_styles() {
        assert_eq!(get_keyword_style("float").fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(get_keyword_style("print").fg, Some(DEFAULT_THEME.builtin));
        assert_eq!(get_keyword_style("counter").fg, Some(DEFAULT_THEME.fg));
    }
}
