// app_state.rs

use crate::session::Session;
use strum_macros::Display;

/// The three screens of the client. The page is never stored: it follows from the session.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum Page {
    #[strum(to_string = "Login")]
    Login,
    #[strum(to_string = "Scenario list")]
    ScenarioList,
    #[strum(to_string = "In game")]
    InGame,
}

impl Page {
    pub fn of(session: &Session) -> Self {
        match (session.is_authenticated(), session.current_scenario()) {
            (false, _) => Page::Login,
            (true, None) => Page::ScenarioList,
            (true, Some(_)) => Page::InGame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Catalog;

    #[test]
    fn transitions_follow_the_session() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::default();
        assert_eq!(Page::of(&session), Page::Login);

        session.login("turtle123");
        assert_eq!(session.page(), Page::ScenarioList);

        session.select_scenario(catalog.scenarios()[0].clone());
        assert_eq!(session.page(), Page::InGame);

        session.reset_scenario();
        assert_eq!(session.page(), Page::ScenarioList);

        session.select_scenario(catalog.scenarios()[0].clone());
        session.logout();
        assert_eq!(session.page(), Page::Login);
    }
}
