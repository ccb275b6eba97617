//! Button state machine.

use std::fmt;

pub const TOOLTIP_NO_CREDENTIAL: &str = "API key required: click to add one";
pub const TOOLTIP_EMPTY: &str = "Input a prompt first";
pub const TOOLTIP_READY: &str = "Improve your prompt with AI";
pub const TOOLTIP_BUSY: &str = "Improving…";

/// State of one action button. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonState {
    /// No credential stored; clicking asks the host for the credential surface.
    NoCredential,
    /// Credential present, prompt blank.
    Empty,
    /// Clickable.
    Ready,
    /// Rewrite in flight.
    Busy,
    /// Rewrite applied; reverts after a delay.
    Success,
    /// Rewrite failed with this message; reverts after a delay.
    Error(String),
}

impl ButtonState {
    /// Resting state for the given credential presence and prompt blankness.
    pub fn evaluate(has_credential: bool, prompt_blank: bool) -> Self {
        match (has_credential, prompt_blank) {
            (false, _) => Self::NoCredential,
            (true, true) => Self::Empty,
            (true, false) => Self::Ready,
        }
    }

    /// Whether the button accepts a rewrite click.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Resting states follow the prompt text; the others wait for the
    /// rewrite or the revert timer.
    pub fn is_resting(&self) -> bool {
        matches!(self, Self::NoCredential | Self::Empty | Self::Ready)
    }

    /// Success and error indicators revert on a timer.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }

    pub fn tooltip(&self) -> &str {
        match self {
            Self::NoCredential => TOOLTIP_NO_CREDENTIAL,
            Self::Empty => TOOLTIP_EMPTY,
            Self::Ready | Self::Success => TOOLTIP_READY,
            Self::Busy => TOOLTIP_BUSY,
            Self::Error(message) => message,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoCredential => "no-credential",
            Self::Empty => "empty",
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Success => "success",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(message) => write!(f, "error ({})", message),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        assert_eq!(ButtonState::evaluate(false, false), ButtonState::NoCredential);
        assert_eq!(ButtonState::evaluate(false, true), ButtonState::NoCredential);
        assert_eq!(ButtonState::evaluate(true, true), ButtonState::Empty);
        assert_eq!(ButtonState::evaluate(true, false), ButtonState::Ready);
    }

    #[test]
    fn test_only_ready_is_interactive() {
        let states = [
            ButtonState::NoCredential,
            ButtonState::Empty,
            ButtonState::Busy,
            ButtonState::Success,
            ButtonState::Error("x".into()),
        ];
        assert!(ButtonState::Ready.is_interactive());
        assert!(states.iter().all(|s| !s.is_interactive()));
    }

    #[test]
    fn test_tooltips() {
        assert_eq!(ButtonState::NoCredential.tooltip(), TOOLTIP_NO_CREDENTIAL);
        assert_eq!(ButtonState::Empty.tooltip(), "Input a prompt first");
        assert_eq!(ButtonState::Ready.tooltip(), "Improve your prompt with AI");
        assert_eq!(ButtonState::Busy.tooltip(), "Improving…");
        assert_eq!(ButtonState::Error("API error: 500".into()).tooltip(), "API error: 500");
    }

    #[test]
    fn test_resting_and_transient() {
        assert!(ButtonState::Empty.is_resting());
        assert!(!ButtonState::Busy.is_resting());
        assert!(!ButtonState::Busy.is_transient());
        assert!(ButtonState::Success.is_transient());
        assert!(ButtonState::Error(String::new()).is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(ButtonState::Ready.to_string(), "ready");
        assert_eq!(ButtonState::Error("boom".into()).to_string(), "error (boom)");
    }
}
