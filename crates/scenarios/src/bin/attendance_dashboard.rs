// Authenticated attendance dashboard flow
//
// Log in with the test account and require the attendance dashboard: the
// /atendimento route and its "Conversas" / "Status" labels. The feature is
// missing from the app today, so the scenario is declared a known failure;
// it starts failing the build again the day it unexpectedly passes.

use std::process::ExitCode;
use std::time::Duration;

use atende_e2e_core::{Error, GotoOptions, Page, Result, Scenario, expect, run};
use atende_e2e_scenarios::app;

/// Budget for the post-login redirect to land on the dashboard.
const LOGIN_REDIRECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Budget for each dashboard label to appear.
const LABEL_TIMEOUT: Duration = Duration::from_millis(3000);

#[tokio::main]
async fn main() -> ExitCode {
    atende_e2e_scenarios::init_tracing();
    run(Scenario::new("attendance_dashboard").expect_failure(), flow).await
}

async fn flow(page: Page) -> Result<()> {
    page.goto(&app::base_url(), GotoOptions::commit()).await?;

    page.locator(app::LOGIN_EMAIL_INPUT)
        .fill(app::LOGIN_EMAIL)
        .await?;
    page.locator(app::LOGIN_PASSWORD_INPUT)
        .fill(app::LOGIN_PASSWORD)
        .await?;
    page.locator(app::LOGIN_SUBMIT_BUTTON).click().await?;

    if let Err(e) = page
        .wait_for_url_contains(app::ROUTE_ATTENDANCE, LOGIN_REDIRECT_TIMEOUT)
        .await
    {
        tracing::error!(
            "The '{}' route did not load; the attendance navigation may not exist",
            app::ROUTE_ATTENDANCE
        );
        return Err(e);
    }

    // Check every label so the report names exactly what is missing.
    let mut missing = Vec::new();
    for text in app::ATTENDANCE_TEXTS {
        let visible = expect(page.locator(&format!("text={text}")))
            .with_timeout(LABEL_TIMEOUT)
            .to_be_visible()
            .await;
        if visible.is_err() {
            missing.push(*text);
        }
    }

    if !missing.is_empty() {
        let quoted: Vec<String> = missing.iter().map(|t| format!("\"{t}\"")).collect();
        return Err(Error::Assertion(format!(
            "required texts not found on page: {}",
            quoted.join(", ")
        )));
    }

    Ok(())
}
