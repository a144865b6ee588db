//! Redirect-to-login seam

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a session was ended and the user sent back to sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The backend refused (or could not be reached for) a token refresh
    RefreshFailed,
    /// The access token expired and there was no refresh token to use
    MissingRefreshToken,
    /// The backend rejected an authenticated request
    Rejected,
    /// The session timer ran out
    Expired,
    /// A protected command was run without a usable session
    NotSignedIn,
}

impl LogoutReason {
    pub fn describe(&self) -> &'static str {
        match self {
            LogoutReason::RefreshFailed => "Your session could not be renewed.",
            LogoutReason::MissingRefreshToken => "Your session expired.",
            LogoutReason::Rejected => "The server rejected your session.",
            LogoutReason::Expired => "Your session expired.",
            LogoutReason::NotSignedIn => "You are not signed in.",
        }
    }
}

/// Where the user goes when a session ends
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, reason: LogoutReason);
}

/// Prints a sign-in hint to stderr, once per process
#[derive(Default)]
pub struct TerminalNavigator {
    shown: AtomicBool,
}

impl Navigator for TerminalNavigator {
    fn redirect_to_login(&self, reason: LogoutReason) {
        if self.shown.swap(true, Ordering::SeqCst) {
            return;
        }
        eprintln!(
            "{} {} Run {} to sign in.",
            "⚠".yellow(),
            reason.describe(),
            "guardian login".cyan()
        );
    }
}

/// Records redirects for assertions
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: std::sync::Mutex<Vec<LogoutReason>>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<LogoutReason> {
        self.redirects.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self, reason: LogoutReason) {
        self.redirects.lock().unwrap().push(reason);
    }
}
