// ui/scenario_list.rs

use super::{
    Component, center_rect,
    constants::{RULES, TITLE},
    is_too_small, render_console, render_header, render_status, render_too_small,
};
use crate::{app::Action, context::Context, scenario::Scenario};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

#[derive(Debug)]
pub struct ScenarioList {
    state: ListState,
}

impl Default for ScenarioList {
    fn default() -> Self {
        Self {
            state: ListState::default().with_selected(Some(0)),
        }
    }
}

impl Component for ScenarioList {
    fn on_key(&mut self, key: KeyEvent, context: &Context) -> Option<Action> {
        let scenarios = context.catalog.scenarios();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected(scenarios.len()).saturating_sub(1), scenarios);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected(scenarios.len()) + 1, scenarios);
                None
            }
            KeyCode::Enter => scenarios
                .get(self.selected(scenarios.len()))
                .map(|scenario| Action::SelectScenario(scenario.id.clone())),
            KeyCode::Char('l') | KeyCode::Esc => Some(Action::Logout),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char(c) => {
                let digit = c.to_digit(10)? as usize;
                let scenario = scenarios.get(digit.checked_sub(1)?)?;
                self.state.select(Some(digit - 1));
                Some(Action::SelectScenario(scenario.id.clone()))
            }
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if is_too_small(area) {
            render_too_small(area, buffer);
            return;
        }

        let [header, title, console, list, rules, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(if area.height > 36 { 7 } else { 0 }),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(RULES.len() as u16 + 2),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(header, buffer);
        Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green))
            .render(title, buffer);
        render_console(console, buffer, context);
        self.render_list(list, buffer, context);
        render_rules(rules, buffer);
        render_status(
            status,
            buffer,
            "↑/↓: 选择 | Enter 或数字: 开始 | l/Esc: 退出登录 | q: 退出",
        );
    }
}

impl ScenarioList {
    fn selected(&self, len: usize) -> usize {
        self.state
            .selected()
            .unwrap_or(0)
            .min(len.saturating_sub(1))
    }

    fn select(&mut self, index: usize, scenarios: &[Scenario]) {
        if !scenarios.is_empty() {
            self.state.select(Some(index.min(scenarios.len() - 1)));
        }
    }

    fn render_list(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let block = Block::default()
            .title(" 选择谜题 ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let area = center_rect(area, Constraint::Percentage(80), Constraint::Percentage(100));

        let scenarios = context.catalog.scenarios();
        if scenarios.is_empty() {
            Paragraph::new("暂无游戏，敬请期待更多谜题")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buffer);
            return;
        }

        let preview_width = area.width.saturating_sub(12) as usize;
        let items: Vec<ListItem> = scenarios
            .iter()
            .enumerate()
            .map(|(i, scenario)| {
                let difficulty = scenario.difficulty();
                let title = Line::from(vec![
                    Span::raw(format!("{}. ", i + 1)),
                    Span::styled(
                        scenario.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        "●".repeat(difficulty),
                        Style::default().fg(Color::LightRed),
                    ),
                    Span::styled(
                        "○".repeat(3 - difficulty),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                let preview = Line::from(Span::styled(
                    format!("   {}", preview(&scenario.description, preview_width)),
                    Style::default().fg(Color::Gray),
                ));
                ListItem::new(vec![title, preview])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");

        self.select(self.selected(scenarios.len()), scenarios);
        StatefulWidget::render(list, area, buffer, &mut self.state);
    }
}

fn render_rules(area: Rect, buffer: &mut Buffer) {
    let lines: Vec<Line> = RULES
        .iter()
        .map(|rule| Line::from(format!("• {rule}")))
        .collect();
    Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .title(" 游戏规则 ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(
            center_rect(area, Constraint::Percentage(80), Constraint::Percentage(100)),
            buffer,
        );
}

// Single-line preview of the riddle, cut on display width.
fn preview(text: &str, width: usize) -> String {
    textwrap::wrap(text, width.max(1))
        .first()
        .map(|line| {
            if line.len() < text.len() {
                format!("{line}…")
            } else {
                line.to_string()
            }
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::BackendStatus, scenario::Catalog, session::Session, ui::spinner::Spinner,
    };

    #[test]
    fn digits_and_enter_pick_scenarios() {
        let (session, catalog, spinner) =
            (Session::default(), Catalog::builtin().unwrap(), Spinner::new());
        let context = Context {
            session: &session,
            catalog: &catalog,
            backend_status: BackendStatus::Demo,
            awaiting_reply: false,
            spinner: &spinner,
            console: None,
        };
        let mut list = ScenarioList::default();

        list.on_key(KeyEvent::from(KeyCode::Down), &context);
        match list.on_key(KeyEvent::from(KeyCode::Enter), &context) {
            Some(Action::SelectScenario(id)) => assert_eq!(id, catalog.scenarios()[1].id),
            _ => panic!("Expected a scenario selection"),
        }

        match list.on_key(KeyEvent::from(KeyCode::Char('1')), &context) {
            Some(Action::SelectScenario(id)) => assert_eq!(id, catalog.scenarios()[0].id),
            _ => panic!("Expected a scenario selection"),
        }
        assert!(list.on_key(KeyEvent::from(KeyCode::Char('0')), &context).is_none());
        assert!(matches!(
            list.on_key(KeyEvent::from(KeyCode::Esc), &context),
            Some(Action::Logout)
        ));
    }

    #[test]
    fn preview_is_cut_to_one_line() {
        assert_eq!(preview("short", 20), "short");
        assert!(preview("一个男人走进一家海边餐厅", 8).ends_with('…'));
    }
}
