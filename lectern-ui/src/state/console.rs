//! Console State
//!
//! Reactive state shared across the console: the gate-resolved profile,
//! feed connection status, and the toast surface.

use leptos::*;

use lectern::model::{Role, User};

/// Global console state provided to all components
#[derive(Clone, Copy)]
pub struct ConsoleState {
    /// Directory row of the signed-in user, set by the access gate
    pub profile: RwSignal<Option<User>>,
    /// Whether any change-feed socket is currently open
    pub feed_connected: RwSignal<bool>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide console state to the component tree
pub fn provide_console_state() -> ConsoleState {
    let state = ConsoleState {
        profile: create_rw_signal(None),
        feed_connected: create_rw_signal(false),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
    state
}

/// The console state from context
pub fn use_console_state() -> ConsoleState {
    use_context::<ConsoleState>().expect("ConsoleState not provided")
}

impl ConsoleState {
    /// Role of the signed-in user, if the gate has resolved one
    pub fn role(&self) -> Option<Role> {
        self.profile.get().map(|u| u.role)
    }

    /// Tenant the signed-in user is scoped to. Platform staff see the
    /// whole platform and get `None`.
    pub fn org_scope(&self) -> Option<uuid::Uuid> {
        self.profile.get().and_then(|u| u.org_id)
    }

    /// Drop everything tied to the session
    pub fn reset(&self) {
        self.profile.set(None);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

/// Initials for the sidebar avatar, first and last word of the name
pub fn initials(full_name: &str) -> String {
    let mut words = full_name.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().next());
    match (first, last) {
        (Some(a), Some(b)) => format!("{a}{b}").to_uppercase(),
        (Some(a), None) => a.to_uppercase().to_string(),
        _ => "?".to_string(),
    }
}

/// Short date-time label for table cells
pub fn format_timestamp(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|dt| dt.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Asha Nair"), "AN");
        assert_eq!(initials("Priya Lakshmi Iyer"), "PI");
        assert_eq!(initials("Madonna"), "M");
        assert_eq!(initials("  "), "?");
    }

    #[test]
    fn test_format_timestamp_handles_missing() {
        assert_eq!(format_timestamp(None), "-");
        let at = "2026-02-14T09:30:00Z".parse().unwrap();
        assert_eq!(format_timestamp(Some(at)), "Feb 14, 2026 09:30");
    }
}
