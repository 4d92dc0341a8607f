use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    state: GateState,
    password_incorrect: bool,
}

impl SessionState {
    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == GateState::Authenticated
    }

    pub fn password_incorrect(&self) -> bool {
        self.password_incorrect
    }
}

pub struct AccessGate<'a> {
    secret: &'a SecretString,
}

impl<'a> AccessGate<'a> {
    pub fn new(secret: &'a SecretString) -> Self {
        Self { secret }
    }

    // The attempt is zeroized on drop whatever the outcome.
    pub fn submit(&self, session: &mut SessionState, password: String) -> GateState {
        let attempt = SecretString::from(password);
        if session.is_authenticated() {
            return session.state;
        }

        let matches: bool = attempt
            .expose_secret()
            .as_bytes()
            .ct_eq(self.secret.expose_secret().as_bytes())
            .into();

        if matches {
            session.state = GateState::Authenticated;
            session.password_incorrect = false;
        } else {
            session.password_incorrect = true;
        }
        session.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("open sesame")
    }

    #[test]
    fn correct_password_authenticates() {
        let secret = secret();
        let gate = AccessGate::new(&secret);
        let mut session = SessionState::default();
        assert_eq!(session.state(), GateState::Unauthenticated);

        let outcome = gate.submit(&mut session, "open sesame".to_string());

        assert_eq!(outcome, GateState::Authenticated);
        assert!(session.is_authenticated());
        assert!(!session.password_incorrect());
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("open sesame"));
    }

    #[test]
    fn wrong_password_sets_indicator_and_stays_locked() {
        let secret = secret();
        let gate = AccessGate::new(&secret);
        let mut session = SessionState::default();

        for attempt in ["", "open", "open sesame ", "OPEN SESAME"] {
            let outcome = gate.submit(&mut session, attempt.to_string());
            assert_eq!(outcome, GateState::Unauthenticated);
            assert!(session.password_incorrect());
        }
    }

    #[test]
    fn retry_after_failure_clears_indicator() {
        let secret = secret();
        let gate = AccessGate::new(&secret);
        let mut session = SessionState::default();

        gate.submit(&mut session, "nope".to_string());
        assert!(session.password_incorrect());

        gate.submit(&mut session, "open sesame".to_string());
        assert!(session.is_authenticated());
        assert!(!session.password_incorrect());
    }

    #[test]
    fn authenticated_session_is_terminal() {
        let secret = secret();
        let gate = AccessGate::new(&secret);
        let mut session = SessionState::default();

        gate.submit(&mut session, "open sesame".to_string());
        let outcome = gate.submit(&mut session, "wrong".to_string());

        assert_eq!(outcome, GateState::Authenticated);
        assert!(!session.password_incorrect());
    }
}
