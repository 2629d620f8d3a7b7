//! Shared fixtures for the Atende end-to-end scenarios: where the app
//! lives, which structural selectors the generated flows target, and the
//! texts and routes they assert on.
//!
//! Each scenario is its own binary under `src/bin/`; exit status reflects
//! the embedded assertions (known failures excepted, see the runner).

use tracing_subscriber::EnvFilter;

/// Everything the scenarios know about the application under test.
///
/// The app itself is an external collaborator: it must already be running
/// at the base address before a scenario starts.
pub mod app {
    /// Fixed local address the generated flows target. `E2E_BASE_URL`
    /// overrides it for local runs against another port.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

    /// Password-recovery route.
    pub const ROUTE_RECOVERY: &str = "/esqueci-senha";

    /// Authenticated attendance dashboard route.
    pub const ROUTE_ATTENDANCE: &str = "/atendimento";

    /// Test-account credentials used by the login flow.
    pub const LOGIN_EMAIL: &str = "arthurkalleb@protonmail.com";
    pub const LOGIN_PASSWORD: &str = "123456";

    // Structural selectors recorded from the live DOM. The login markup
    // moved around between recordings, hence the candidate lists.
    pub const LOGIN_EMAIL_INPUT: &str =
        "xpath=/html/body/div[1]/div/div[2]/div[2]/form/div[1]/div/input";
    pub const LOGIN_PASSWORD_INPUT: &str =
        "xpath=/html/body/div[1]/div/div[2]/div[2]/form/div[2]/div[2]/div/input";
    pub const LOGIN_SUBMIT_BUTTON: &str =
        "xpath=/html/body/div[1]/div/div[2]/div[2]/form/button";

    /// Candidate selectors for the "Esqueceu a senha?" link, in the order
    /// the recordings found them.
    pub const FORGOT_PASSWORD_LINKS: &[&str] = &[
        "xpath=/html/body/div[1]/div/div[2]/div[2]/form/div[2]/div[1]/a",
        "xpath=/html/body/div[1]/div/div/div[2]/form/div[2]/div[1]/a",
        "xpath=/html/body/div[1]/div/div/div[2]/form/div[2]/div[2]/button",
    ];

    /// Confirmation texts shown after requesting a password reset.
    pub const TEXT_EMAIL_SENT: &str = "Email enviado";
    pub const TEXT_CHECK_INBOX: &str = "Verifique sua caixa de entrada";

    /// Labels the attendance dashboard is expected to show.
    pub const ATTENDANCE_TEXTS: &[&str] = &["Conversas", "Status"];

    /// Base address of the running app.
    pub fn base_url() -> String {
        std::env::var("E2E_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    /// Absolute URL for an app route.
    pub fn url_for(route: &str) -> String {
        format!("{}{}", base_url(), route)
    }
}

/// Installs the compact fmt subscriber; `RUST_LOG` filters, default `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::app;

    #[test]
    fn routes_match_the_recorded_flows() {
        assert_eq!(app::ROUTE_RECOVERY, "/esqueci-senha");
        assert_eq!(app::ROUTE_ATTENDANCE, "/atendimento");
    }

    #[test]
    fn forgot_password_candidates_keep_recorded_order() {
        // The anchor inside the two-column login form was found first in
        // every recording; order is what makes the fallback meaningful.
        assert_eq!(app::FORGOT_PASSWORD_LINKS.len(), 3);
        assert!(app::FORGOT_PASSWORD_LINKS[0].ends_with("div[1]/a"));
        assert!(
            app::FORGOT_PASSWORD_LINKS
                .iter()
                .all(|s| s.starts_with("xpath=/html/body"))
        );
    }

    #[test]
    fn url_for_joins_route_onto_base() {
        // Uses the default unless E2E_BASE_URL is exported by the caller.
        assert!(app::url_for("/esqueci-senha").ends_with("/esqueci-senha"));
    }
}
