//! Scope chain pane rendering
//!
//! Shows every active scope layer, innermost first, with the variables
//! declared in it. A variable hidden by a declaration of the same name in an
//! inner layer is dimmed and marked as shadowed.

use crate::memory::scope::ScopeStack;
use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use rustc_hash::FxHashSet;

/// Scroll state for the scopes pane
#[derive(Debug, Default)]
pub struct ScopesScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

fn format_value(value: &Value) -> Span<'static> {
    Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.number))
}

/// Build the pane's lines, innermost layer first
fn build_scope_lines(scopes: &ScopeStack) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (level, scope) in scopes.layers().iter().enumerate().rev() {
        lines.push(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                scope.name.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.scope_name)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  level {}", level),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]));

        if scope.is_empty() {
            lines.push(Line::from(Span::styled(
                "    (no variables)",
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }

        let mut newly_seen = Vec::new();
        for (name, binding) in scope.iter() {
            let shadowed = seen.contains(name);
            let name_style = if shadowed {
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            let mut spans = vec![
                Span::raw("    "),
                Span::styled(
                    format!("{} ", binding.var_type),
                    Style::default().fg(DEFAULT_THEME.type_name),
                ),
                Span::styled(name.to_string(), name_style),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                format_value(&binding.value),
            ];
            if shadowed {
                spans.push(Span::styled(
                    " (shadowed)",
                    Style::default().fg(DEFAULT_THEME.comment),
                ));
            }
            lines.push(Line::from(spans));
            newly_seen.push(name);
        }
        seen.extend(newly_seen);
    }

    lines
}

/// Render the scopes pane
pub fn render_scopes_pane(
    frame: &mut Frame,
    area: Rect,
    scopes: &ScopeStack,
    is_focused: bool,
    scroll_state: &mut ScopesScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Scopes ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let all_items: Vec<ListItem> = build_scope_lines(scopes)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // New layer opened: jump back to the top where the innermost layer is
    if total_items > scroll_state.prev_item_count {
        scroll_state.offset = 0;
    }
    scroll_state.prev_item_count = total_items;

    if total_items > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_items - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
