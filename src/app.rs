// /app.rs
use crate::{
    client::{BackendStatus, ProxyClient},
    context::Context,
    mock,
    scenario::Catalog,
    session::Session,
    tui::{Tui, TuiEvent},
    ui::{Component, ComponentEnum, spinner::Spinner},
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Login(String),
    Logout,
    SelectScenario(String),
    BackToList,
    Ask(String),
    // Tagged with the round it answers so late replies from a left game are dropped.
    HostReply { generation: u64, reply: String },
    Notice(String),
    Backend(BackendStatus),
    Resize,
}

pub struct App {
    running: bool,
    component: ComponentEnum,
    needs_clear: bool,

    session: Session,
    catalog: Catalog,
    client: ProxyClient,
    backend_status: BackendStatus,

    awaiting_reply: bool,
    generation: u64,
    spinner: Spinner,
    console: Option<String>,

    action_sender: mpsc::UnboundedSender<Action>,
    action_receiver: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        session: Session,
        catalog: Catalog,
        client: ProxyClient,
        backend_status: BackendStatus,
    ) -> Self {
        let (action_sender, action_receiver) = mpsc::unbounded_channel();
        let component = ComponentEnum::for_page(session.page());
        Self {
            running: true,
            component,
            needs_clear: false,

            session,
            catalog,
            client,
            backend_status,

            awaiting_reply: false,
            generation: 0,
            spinner: Spinner::new(),
            console: None,

            action_sender,
            action_receiver,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend_status(&self) -> BackendStatus {
        self.backend_status
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn console(&self) -> Option<&str> {
        self.console.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(8.0) // spinner speed
            .frame_rate(30.0);

        tui.enter()?;
        log::info!(
            "Client started against {} ({})",
            self.client.base_url(),
            self.backend_status
        );

        while self.running {
            if self.needs_clear {
                tui.clear()?;
                self.needs_clear = false;
            }
            tui.draw(|frame| {
                let context = Context {
                    session: &self.session,
                    catalog: &self.catalog,
                    backend_status: self.backend_status,
                    awaiting_reply: self.awaiting_reply,
                    spinner: &self.spinner,
                    console: self.console.as_deref(),
                };
                self.component
                    .render(frame.area(), frame.buffer_mut(), &context)
            })?;

            tokio::select! {
                Some(event) = tui.next() => self.handle_tui_event(event),
                Some(action) = self.action_receiver.recv() => self.handle_action(action),
                else => break,
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.on_key(key_event)
            }
            TuiEvent::Paste(text) => self.component.on_paste(&text),
            TuiEvent::Tick => self.spinner.tick(),
            TuiEvent::Resize(_, _) => self.handle_action(Action::Resize),
            TuiEvent::Error => log::warn!("Terminal event stream reported an error"),
            TuiEvent::Key(_)
            | TuiEvent::Init
            | TuiEvent::Render
            | TuiEvent::FocusGained
            | TuiEvent::FocusLost => {}
        }
    }

    pub fn on_key(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.handle_action(Action::Quit);
            return;
        }

        self.console = None;
        let context = Context {
            session: &self.session,
            catalog: &self.catalog,
            backend_status: self.backend_status,
            awaiting_reply: self.awaiting_reply,
            spinner: &self.spinner,
            console: None,
        };
        if let Some(action) = self.component.on_key(key_event, &context) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Login(password) => {
                if self.session.login(&password) {
                    log::info!("Player logged in");
                    self.console = Some("欢迎！请选择一个谜题".to_string());
                } else {
                    log::info!("Rejected login attempt");
                    self.console = Some("密码错误，请重试".to_string());
                }
            }
            Action::Logout => {
                self.abandon_round();
                self.session.logout();
                self.console = Some("已退出登录".to_string());
            }
            Action::SelectScenario(id) => self.select_scenario(&id),
            Action::BackToList => {
                self.abandon_round();
                self.session.reset_scenario();
            }
            Action::Ask(question) => self.ask(question),
            Action::HostReply { generation, reply } => {
                if generation != self.generation || self.session.current_scenario().is_none() {
                    log::debug!("Dropping host reply from an abandoned round");
                } else {
                    self.session.append_message(reply, false);
                    self.awaiting_reply = false;
                    self.spinner.stop();
                }
            }
            Action::Notice(notice) => self.console = Some(notice),
            Action::Backend(status) => {
                if status != self.backend_status {
                    log::info!("Backend status changed to {status}");
                }
                self.backend_status = status;
            }
            Action::Resize => self.needs_clear = true,
        }
        self.sync_component();
    }

    fn sync_component(&mut self) {
        let page = self.session.page();
        if self.component.page() != page {
            log::debug!("Switching to page {page}");
            self.component = ComponentEnum::for_page(page);
        }
    }

    // Leaving a game orphans any in-flight reply.
    fn abandon_round(&mut self) {
        self.generation += 1;
        self.awaiting_reply = false;
        self.spinner.stop();
    }

    fn select_scenario(&mut self, id: &str) {
        let Some(scenario) = self.catalog.get(id).cloned() else {
            log::warn!("Unknown scenario id {id}");
            self.console = Some("游戏不存在".to_string());
            return;
        };
        self.abandon_round();
        log::info!("Starting scenario {} ({})", scenario.id, scenario.title);
        self.console = Some(format!("开始游戏：{}", scenario.title));
        self.session.select_scenario(scenario);

        if self.backend_status == BackendStatus::Unreachable {
            let client = self.client.clone();
            let sender = self.action_sender.clone();
            tokio::spawn(async move {
                let _ = sender.send(Action::Backend(client.probe().await));
            });
        }
    }

    fn ask(&mut self, question: String) {
        let question = question.trim().to_string();
        if question.is_empty() || self.awaiting_reply {
            return;
        }
        let Some(scenario) = self.session.current_scenario().cloned() else {
            return;
        };

        let history = self.session.prior_transcript_texts();
        self.session.append_message(question.as_str(), true);

        if !self.backend_status.is_live() {
            let notice = mock::offline_notice(&question, &mut rand::rng());
            self.session.append_message(notice, false);
            return;
        }

        self.awaiting_reply = true;
        self.spinner.start();
        let client = self.client.clone();
        let sender = self.action_sender.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let reply = client.ask(&question, &scenario, history).await;
            let _ = sender.send(Action::HostReply { generation, reply });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app_state::Page, prompt};

    // Nothing listens on port 1, so every request fails fast.
    const DEAD_PROXY: &str = "http://127.0.0.1:1";

    fn app(status: BackendStatus) -> App {
        App::new(
            Session::default(),
            Catalog::builtin().unwrap(),
            ProxyClient::new(DEAD_PROXY),
            status,
        )
    }

    fn playing(status: BackendStatus) -> App {
        let mut app = app(status);
        app.handle_action(Action::Login("turtle123".into()));
        app.handle_action(Action::SelectScenario("1".into()));
        app
    }

    #[test]
    fn navigation_follows_the_session() {
        let mut app = app(BackendStatus::Demo);
        assert_eq!(app.component.page(), Page::Login);

        app.handle_action(Action::Login("nope".into()));
        assert_eq!(app.console(), Some("密码错误，请重试"));
        assert_eq!(app.component.page(), Page::Login);

        app.handle_action(Action::Login("turtle123".into()));
        assert_eq!(app.component.page(), Page::ScenarioList);

        app.handle_action(Action::SelectScenario("404".into()));
        assert_eq!(app.console(), Some("游戏不存在"));
        assert_eq!(app.component.page(), Page::ScenarioList);

        app.handle_action(Action::SelectScenario("1".into()));
        assert_eq!(app.component.page(), Page::InGame);
        assert_eq!(app.session().transcript().len(), 1);

        app.handle_action(Action::BackToList);
        assert_eq!(app.component.page(), Page::ScenarioList);
        assert!(app.session().current_scenario().is_none());

        app.handle_action(Action::Logout);
        assert_eq!(app.component.page(), Page::Login);
        assert!(!app.session().is_authenticated());
    }

    #[test]
    fn demo_mode_answers_locally() {
        let mut app = playing(BackendStatus::Demo);
        app.handle_action(Action::Ask("  他是男人吗？ ".into()));

        let transcript = app.session().transcript();
        assert_eq!(transcript.len(), 3);
        assert!(transcript[1].is_user);
        assert_eq!(transcript[1].content, "他是男人吗？");
        assert!(!transcript[2].is_user);
        assert!(transcript[2].content.starts_with(mock::OFFLINE_BANNER));
        assert!(transcript[2].content.ends_with(mock::YES));
        assert!(!app.is_awaiting_reply());
    }

    #[test]
    fn blank_questions_are_ignored() {
        let mut app = playing(BackendStatus::Demo);
        app.handle_action(Action::Ask("   ".into()));
        assert_eq!(app.session().transcript().len(), 1);
    }

    #[test]
    fn ctrl_c_quits_from_any_page() {
        let mut app = app(BackendStatus::Demo);
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn unreachable_proxy_yields_the_fallback() {
        let mut app = playing(BackendStatus::Live);
        app.handle_action(Action::Ask("他是男人吗？".into()));
        assert!(app.is_awaiting_reply());

        // A second question while waiting is ignored.
        app.handle_action(Action::Ask("有人死了吗？".into()));
        assert_eq!(app.session().transcript().len(), 2);

        let action = app.action_receiver.recv().await.unwrap();
        app.handle_action(action);

        let transcript = app.session().transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].content, prompt::SERVICE_UNAVAILABLE);
        assert!(!app.is_awaiting_reply());
    }

    #[tokio::test]
    async fn replies_for_an_abandoned_round_are_dropped() {
        let mut app = playing(BackendStatus::Live);
        app.handle_action(Action::Ask("这是意外吗？".into()));
        app.handle_action(Action::BackToList);
        app.handle_action(Action::SelectScenario("2".into()));

        let action = app.action_receiver.recv().await.unwrap();
        assert!(matches!(action, Action::HostReply { generation: 1, .. }));
        app.handle_action(action);

        assert_eq!(app.session().transcript().len(), 1);
        assert_eq!(app.session().current_scenario().unwrap().id, "2");
    }
}
