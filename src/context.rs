use crate::{client::BackendStatus, scenario::Catalog, session::Session, ui::spinner::Spinner};

/// Read-only view of the app handed to components on every key and every frame.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub session: &'a Session,
    pub catalog: &'a Catalog,
    pub backend_status: BackendStatus,
    pub awaiting_reply: bool,
    pub spinner: &'a Spinner,
    pub console: Option<&'a str>,
}
