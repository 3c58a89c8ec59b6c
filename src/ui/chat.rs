// ui/chat.rs
use super::{
    Component, center_rect, constants::QUICK_QUESTIONS, is_too_small, render_console,
    render_status, render_too_small, spinner::spinner_frame, with_caret,
};
use crate::{app::Action, client::BackendStatus, context::Context, message::Message};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};
use tui_input::{Input, backend::crossterm::EventHandler};

#[derive(Debug)]
pub struct ChatView {
    input: Input,
    scroll: usize,
    // Stick to the newest message until the player scrolls up.
    follow: bool,
    seen_messages: usize,
    page_height: usize,
    total_lines: usize,
    show_hints: bool,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            input: Input::default(),
            scroll: 0,
            follow: true,
            seen_messages: 0,
            page_height: 0,
            total_lines: 0,
            show_hints: false,
        }
    }
}

impl Component for ChatView {
    fn on_key(&mut self, key: KeyEvent, context: &Context) -> Option<Action> {
        match key.code {
            KeyCode::Esc if self.show_hints => {
                self.show_hints = false;
                None
            }
            KeyCode::Esc => Some(Action::BackToList),
            KeyCode::Tab => {
                self.show_hints = !self.show_hints;
                None
            }
            KeyCode::PageUp => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(self.page_height.max(1));
                None
            }
            KeyCode::PageDown => {
                self.scroll += self.page_height.max(1);
                if self.scroll + self.page_height >= self.total_lines {
                    self.follow = true;
                }
                None
            }
            KeyCode::F(n @ 1..=4) => {
                if !context.awaiting_reply {
                    let question = QUICK_QUESTIONS[usize::from(n) - 1];
                    self.input = Input::new(question.to_string());
                }
                None
            }
            KeyCode::Enter => {
                let question = self.input.value().trim().to_string();
                if question.is_empty() || context.awaiting_reply {
                    return None;
                }
                self.input.reset();
                self.follow = true;
                Some(Action::Ask(question))
            }
            _ if context.awaiting_reply => None,
            _ => {
                self.input.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn on_paste(&mut self, text: &str) {
        let value = format!("{}{}", self.input.value(), text.replace('\n', " "));
        self.input = std::mem::take(&mut self.input).with_value(value);
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if is_too_small(area) {
            render_too_small(area, buffer);
            return;
        }
        let Some(scenario) = context.session.current_scenario() else {
            Paragraph::new("游戏加载中...")
                .alignment(Alignment::Center)
                .render(area, buffer);
            return;
        };

        let banner_height = if context.backend_status.is_live() { 0 } else { 2 };
        let [header, transcript, console, banner, input, quick, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                scenario.title.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "向主持人提问，找出真相",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .render(header, buffer);

        self.render_transcript(transcript, buffer, context);
        render_console(console, buffer, context);
        if banner_height > 0 {
            Paragraph::new(offline_banner(context.backend_status))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(banner, buffer);
        }
        self.render_input(input, buffer, context);
        render_quick_questions(quick, buffer);
        render_status(
            status,
            buffer,
            "Enter: 提问 | Tab: 提示 | PgUp/PgDn: 滚动 | Esc: 返回列表",
        );

        if self.show_hints {
            render_hints(area, buffer, &scenario.hints);
        }
    }
}

impl ChatView {
    fn render_transcript(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green));
        let inner = block.inner(area);
        block.render(area, buffer);

        let max_width = inner.width.saturating_sub(2).max(1) as usize;
        let transcript = context.session.transcript();
        let mut lines = transcript_lines(transcript, max_width);
        if context.awaiting_reply {
            lines.push(
                Line::from(Span::styled(
                    spinner_frame(context.spinner),
                    Style::default().fg(Color::Green),
                ))
                .alignment(Alignment::Left),
            );
        }

        if transcript.len() != self.seen_messages {
            self.seen_messages = transcript.len();
            self.follow = true;
        }
        self.page_height = inner.height as usize;
        self.total_lines = lines.len();
        let bottom = self.total_lines.saturating_sub(self.page_height);
        self.scroll = if self.follow {
            bottom
        } else {
            self.scroll.min(bottom)
        };

        Paragraph::new(lines)
            .scroll((self.scroll as u16, 0))
            .render(inner, buffer);
    }

    fn render_input(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let (title, color) = if context.awaiting_reply {
            (" 主持人思考中... ", Color::DarkGray)
        } else {
            (" 输入你的问题，例如：他是男人吗？ ", Color::Yellow)
        };
        Paragraph::new(with_caret(&self.input, None))
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            )
            .render(area, buffer);
    }
}

/// Player lines on the right in cyan, host lines on the left in green, each under a time stamp.
pub fn transcript_lines(transcript: &[Message], max_width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in transcript {
        let (speaker, style, alignment) = if message.is_user {
            ("你", Style::default().fg(Color::Cyan), Alignment::Right)
        } else {
            ("主持人", Style::default().fg(Color::Green), Alignment::Left)
        };
        lines.push(
            Line::from(Span::styled(
                format!("{speaker} · {}", message.time_label()),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(alignment),
        );
        for paragraph in message.content.split('\n') {
            if paragraph.is_empty() {
                lines.push(Line::default());
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, max_width) {
                let line = Line::from(Span::styled(wrapped.into_owned(), style));
                lines.push(line.alignment(alignment));
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn render_quick_questions(area: Rect, buffer: &mut Buffer) {
    let spans: Vec<Span> = QUICK_QUESTIONS
        .iter()
        .enumerate()
        .flat_map(|(i, question)| {
            [
                Span::styled(
                    format!(" F{} ", i + 1),
                    Style::default().fg(Color::Black).bg(Color::Gray),
                ),
                Span::styled(format!(" {question}  "), Style::default().fg(Color::Gray)),
            ]
        })
        .collect();
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

fn offline_banner(status: BackendStatus) -> &'static str {
    match status {
        BackendStatus::Unreachable => "无法连接服务器，正在使用离线回复。",
        BackendStatus::Live | BackendStatus::Demo => {
            "演示模式：未配置 OpenAI API 密钥，回答为模拟内容。"
        }
    }
}

fn render_hints(area: Rect, buffer: &mut Buffer, hints: &[String]) {
    let lines: Vec<Line> = if hints.is_empty() {
        vec![Line::from("这道题没有提示。")]
    } else {
        hints
            .iter()
            .map(|hint| Line::from(format!("• {hint}")))
            .collect()
    };
    let popup = center_rect(
        area,
        Constraint::Percentage(60),
        Constraint::Length(lines.len() as u16 + 2),
    );
    Clear.render(popup, buffer);
    Paragraph::new(lines)
        .style(Style::default().fg(Color::LightRed))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" 提示（Tab 关闭） ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .render(popup, buffer);
}
