// ui/login.rs
use crate::{app::Action, context::Context};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::*,
};
use tui_input::{Input, backend::crossterm::EventHandler};

use super::{
    Component, center_rect,
    constants::{TITLE, TURTLE},
    is_too_small, render_console, render_header, render_status, render_too_small, with_caret,
};

#[derive(Debug, Default)]
pub struct LoginView {
    input: Input,
    reveal: bool,
}

impl Component for LoginView {
    fn on_key(&mut self, key: KeyEvent, _context: &Context) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => {
                let password = self.input.value().to_string();
                if password.trim().is_empty() {
                    return Some(Action::Notice("请输入密码".to_string()));
                }
                self.input.reset();
                Some(Action::Login(password))
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reveal = !self.reveal;
                None
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn on_paste(&mut self, text: &str) {
        let value = format!("{}{}", self.input.value(), text.trim_end());
        self.input = std::mem::take(&mut self.input).with_value(value);
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if is_too_small(area) {
            render_too_small(area, buffer);
            return;
        }

        let [header, art, title, console, form, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(if area.height > 30 { 6 } else { 0 }),
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(header, buffer);
        Paragraph::new(TURTLE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green))
            .render(art, buffer);
        Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green))
            .render(title, buffer);
        render_console(console, buffer, context);
        self.render_form(form, buffer);
        render_status(
            status,
            buffer,
            "Enter: 登录 | Ctrl+R: 显示/隐藏密码 | Esc: 退出",
        );
    }
}

impl LoginView {
    fn render_form(&self, area: Rect, buffer: &mut Buffer) {
        let form = center_rect(area, Constraint::Length(44), Constraint::Length(5));
        let [label, field, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(form);

        Paragraph::new(" 游戏密码 ".bold())
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .render(label, buffer);

        let mask = (!self.reveal).then_some('•');
        Paragraph::new(with_caret(&self.input, mask))
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(field, buffer);

        Paragraph::new("提示：请联系小文获取密码")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(hint, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::BackendStatus, scenario::Catalog, session::Session, ui::spinner::Spinner};

    fn type_text(view: &mut LoginView, context: &Context, text: &str) {
        for c in text.chars() {
            view.on_key(KeyEvent::from(KeyCode::Char(c)), context);
        }
    }

    #[test]
    fn enter_submits_the_typed_password() {
        let (session, catalog, spinner) = (Session::default(), Catalog::default(), Spinner::new());
        let context = Context {
            session: &session,
            catalog: &catalog,
            backend_status: BackendStatus::Demo,
            awaiting_reply: false,
            spinner: &spinner,
            console: None,
        };
        let mut view = LoginView::default();

        assert!(matches!(
            view.on_key(KeyEvent::from(KeyCode::Enter), &context),
            Some(Action::Notice(notice)) if notice == "请输入密码"
        ));

        type_text(&mut view, &context, "turtle123");
        match view.on_key(KeyEvent::from(KeyCode::Enter), &context) {
            Some(Action::Login(password)) => assert_eq!(password, "turtle123"),
            _ => panic!("Expected a login action"),
        }
        assert!(view.input.value().is_empty());
    }
}
