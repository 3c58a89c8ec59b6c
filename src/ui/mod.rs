// ui/mod.rs

pub mod chat;
pub mod constants;
pub mod login;
pub mod scenario_list;
pub mod spinner;

pub use chat::ChatView;
pub use login::LoginView;
pub use scenario_list::ScenarioList;

use crate::{app::Action, app_state::Page, context::Context};
use crossterm::event::KeyEvent;
use enum_dispatch::enum_dispatch;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use tui_input::Input;

pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

#[enum_dispatch]
pub trait Component {
    fn on_key(&mut self, key: KeyEvent, context: &Context) -> Option<Action>;
    fn on_paste(&mut self, _text: &str) {}
    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context);
}

#[enum_dispatch(Component)]
#[derive(Debug)]
pub enum ComponentEnum {
    LoginView,
    ScenarioList,
    ChatView,
}

impl ComponentEnum {
    pub fn for_page(page: Page) -> Self {
        match page {
            Page::Login => LoginView::default().into(),
            Page::ScenarioList => ScenarioList::default().into(),
            Page::InGame => ChatView::default().into(),
        }
    }

    pub fn page(&self) -> Page {
        match self {
            ComponentEnum::LoginView(_) => Page::Login,
            ComponentEnum::ScenarioList(_) => Page::ScenarioList,
            ComponentEnum::ChatView(_) => Page::InGame,
        }
    }
}

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub fn render_too_small(area: Rect, buffer: &mut Buffer) {
    Paragraph::new("终端窗口太小，请调整大小")
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

pub fn render_header(area: Rect, buffer: &mut Buffer) {
    Paragraph::new(format!("海龟汤 v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().border_type(BorderType::Rounded))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

// One-line status area, the terminal stand-in for toast notifications.
pub fn render_console(area: Rect, buffer: &mut Buffer, context: &Context) {
    if let Some(console) = context.console {
        Paragraph::new(console)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow))
            .render(area, buffer);
    }
}

pub fn render_status(area: Rect, buffer: &mut Buffer, status: &str) {
    Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

/// Input text with a caret at the cursor; `mask` hides every character.
pub fn with_caret(input: &Input, mask: Option<char>) -> String {
    let value: String = match mask {
        Some(mask) => input.value().chars().map(|_| mask).collect(),
        None => input.value().to_string(),
    };
    let split = value
        .char_indices()
        .nth(input.cursor())
        .map_or(value.len(), |(index, _)| index);
    let (before, after) = value.split_at(split);
    format!("{before}▏{after}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_follows_the_cursor() {
        let input = Input::new("他是".to_string());
        assert_eq!(with_caret(&input, None), "他是▏");
        assert_eq!(with_caret(&input, Some('•')), "••▏");
        assert_eq!(with_caret(&Input::default(), None), "▏");
    }

    #[test]
    fn each_page_gets_its_component() {
        for page in [Page::Login, Page::ScenarioList, Page::InGame] {
            assert_eq!(ComponentEnum::for_page(page).page(), page);
        }
    }
}
