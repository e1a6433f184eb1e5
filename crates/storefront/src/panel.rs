//! Login panel state machine.
//!
//! The panel is closed or shows one of three forms. The current state travels
//! with each panel control, so the server keeps nothing between requests.

use std::fmt;
use std::str::FromStr;

/// Which panel form is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Login,
    Reset,
    Signup,
}

/// A panel control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Open,
    Close,
    ShowReset,
    ShowSignup,
    BackToLogin,
}

impl PanelState {
    /// The state after `action`. Form switches only apply while open.
    #[must_use]
    pub const fn apply(self, action: PanelAction) -> Self {
        match (self, action) {
            (_, PanelAction::Open) => Self::Login,
            (_, PanelAction::Close) | (Self::Closed, _) => Self::Closed,
            (_, PanelAction::ShowReset) => Self::Reset,
            (_, PanelAction::ShowSignup) => Self::Signup,
            (_, PanelAction::BackToLogin) => Self::Login,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Login => "login",
            Self::Reset => "reset",
            Self::Signup => "signup",
        }
    }
}

impl FromStr for PanelState {
    type Err = UnknownPanelValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(Self::Closed),
            "login" => Ok(Self::Login),
            "reset" => Ok(Self::Reset),
            "signup" => Ok(Self::Signup),
            other => Err(UnknownPanelValue(other.to_string())),
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelAction {
    type Err = UnknownPanelValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "show-reset" => Ok(Self::ShowReset),
            "show-signup" => Ok(Self::ShowSignup),
            "back-to-login" => Ok(Self::BackToLogin),
            other => Err(UnknownPanelValue(other.to_string())),
        }
    }
}

/// An unrecognized panel state or action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown panel value: {0}")]
pub struct UnknownPanelValue(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shows_login() {
        for state in [PanelState::Closed, PanelState::Reset, PanelState::Signup] {
            assert_eq!(state.apply(PanelAction::Open), PanelState::Login);
        }
    }

    #[test]
    fn test_switching_forms_while_open() {
        let open = PanelState::Closed.apply(PanelAction::Open);
        let reset = open.apply(PanelAction::ShowReset);
        assert_eq!(reset, PanelState::Reset);
        assert_eq!(reset.apply(PanelAction::BackToLogin), PanelState::Login);
        assert_eq!(open.apply(PanelAction::ShowSignup), PanelState::Signup);
        assert_eq!(reset.apply(PanelAction::Close), PanelState::Closed);
    }

    #[test]
    fn test_switching_while_closed_stays_closed() {
        for action in [PanelAction::ShowReset, PanelAction::ShowSignup, PanelAction::BackToLogin] {
            assert_eq!(PanelState::Closed.apply(action), PanelState::Closed);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("show-signup".parse::<PanelAction>().unwrap(), PanelAction::ShowSignup);
        assert_eq!("reset".parse::<PanelState>().unwrap(), PanelState::Reset);
        assert!("dance".parse::<PanelAction>().is_err());
    }
}
