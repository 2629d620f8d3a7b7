// Integration tests for the driver/context/page lifecycle
//
// These drive a real Chromium against data: URLs, so they are ignored by
// default. Run them with: cargo test -p atende-e2e-core -- --ignored

use std::time::Duration;

use anyhow::Result;
use atende_e2e_core::{Driver, Error, GotoOptions, LaunchOptions, expect};

const FORM_PAGE: &str = "data:text/html,<html><body>\
    <input id='email' type='email'>\
    <button id='send' onclick=\"document.getElementById('done').style.display='block'\">Enviar</button>\
    <div id='done' style='display:none'>Email enviado</div>\
    </body></html>";

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn fill_click_and_visibility_assertion() -> Result<()> {
    let mut driver = Driver::start(LaunchOptions::default()).await?;
    let mut context = driver.new_context().await?;
    let page = context.new_page().await?;

    page.goto(FORM_PAGE, GotoOptions::commit()).await?;
    assert!(page.current_url().await?.starts_with("data:"));

    page.locator("#email").fill("arthurkalleb@protonmail.com").await?;
    page.locator("#send").click().await?;
    expect(page.locator("text=Email enviado"))
        .with_timeout(Duration::from_millis(3000))
        .to_be_visible()
        .await?;

    context.close().await;
    driver.stop().await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn candidate_locator_uses_first_that_resolves() -> Result<()> {
    let mut driver = Driver::start(LaunchOptions::default()).await?;
    let mut context = driver.new_context().await?;
    let page = context.new_page().await?;

    page.goto(
        "data:text/html,<html><body><a id='real' href='#ok'>Esqueceu a senha?</a></body></html>",
        GotoOptions::commit(),
    )
    .await?;

    // First two candidates never resolve; the action falls through to the
    // working one without erroring.
    let link = page.locator_any([
        "xpath=/html/body/div[9]/a",
        "#missing",
        "xpath=/html/body/a",
    ]);
    link.click_with_timeout(Duration::from_millis(3000)).await?;
    assert!(page.current_url().await?.contains("#ok"));

    context.close().await;
    driver.stop().await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn teardown_is_safe_after_failure_and_repeat() -> Result<()> {
    let mut driver = Driver::start(LaunchOptions::default()).await?;
    let mut context = driver.new_context().await?;
    let page = context.new_page().await?;

    page.goto("data:text/html,<html><body>vazio</body></html>", GotoOptions::commit())
        .await?;

    // A failed action must leave the tree tear-downable.
    let err = page
        .locator("#nao-existe")
        .click_with_timeout(Duration::from_millis(300))
        .await
        .expect_err("selector should never resolve");
    assert!(matches!(err, Error::ActionTimeout { .. }));

    let err = page
        .wait_for_url_contains("/atendimento", Duration::from_millis(300))
        .await
        .expect_err("fragment should never appear");
    assert!(err.to_string().contains("/atendimento"));

    context.close().await;
    context.close().await; // idempotent

    // Pages from a closed context are a lifecycle error, not a hang.
    let err = context.new_page().await.expect_err("context is closed");
    assert!(matches!(err, Error::Context(_)));

    driver.stop().await;
    driver.stop().await; // idempotent

    let err = driver.new_context().await.expect_err("driver stopped");
    assert!(matches!(err, Error::Context(_)));
    Ok(())
}
