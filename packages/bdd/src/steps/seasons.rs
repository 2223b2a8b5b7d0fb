use anyhow::{Context, Result, ensure};
use cucumber::{given, then, when};

use super::authentication::{LOGOUT_BUTTON, TEST_PASSWORD, sign_in};
use crate::world::BddWorld;

const TITLE_FIELD: &[&str] = &["[data-testid='season-title']", "#season-title", "#title"];
const LOCATION_FIELD: &[&str] = &["[data-testid='season-location']", "#location"];
const START_DATE_FIELD: &[&str] = &["[data-testid='season-start-date']", "#start-date"];
const END_DATE_FIELD: &[&str] = &["[data-testid='season-end-date']", "#end-date"];
const SEASON_SUBMIT: &[&str] = &["[data-testid='create-season-button']", "button[type='submit']"];
const INVITATION_CODE: &[&str] = &["[data-testid='invitation-code']", ".invitation-code"];
const CODE_FIELD: &[&str] = &["[data-testid='invitation-code-input']", "#invitation-code"];
const JOIN_SUBMIT: &[&str] = &["[data-testid='join-season-button']", "button[type='submit']"];
const SEASON_DASHBOARD: &[&str] = &["[data-testid='season-dashboard']", ".season-dashboard"];

/// Create a season through the UI and remember its invitation code.
pub async fn create_season(world: &mut BddWorld, title: &str) -> Result<()> {
    world.goto("/seasons/new").await?;
    world.fill(TITLE_FIELD, title).await?;
    world.fill(LOCATION_FIELD, "Lake Annecy").await?;
    world.fill(START_DATE_FIELD, "2025-07-01").await?;
    world.fill(END_DATE_FIELD, "2025-07-15").await?;
    world.click(SEASON_SUBMIT).await?;

    let code = world.text_of(INVITATION_CODE).await?;
    let code = code.trim().to_string();
    ensure!(!code.is_empty(), "invitation code element was empty");

    world.invitation_code = Some(code);
    world.season_title = Some(title.to_string());
    Ok(())
}

#[given(expr = "I have created a season named {string}")]
async fn have_created_season(world: &mut BddWorld, title: String) -> Result<()> {
    create_season(world, &title).await
}

#[when("I open the new season form")]
async fn open_new_season_form(world: &mut BddWorld) -> Result<()> {
    world.goto("/seasons/new").await
}

#[when(expr = "I name the season {string}")]
async fn name_the_season(world: &mut BddWorld, title: String) -> Result<()> {
    world.season_title = Some(title.clone());
    world.fill(TITLE_FIELD, &title).await
}

#[when(expr = "I set the location to {string}")]
async fn set_location(world: &mut BddWorld, location: String) -> Result<()> {
    world.fill(LOCATION_FIELD, &location).await
}

#[when(expr = "I set the dates from {string} to {string}")]
async fn set_dates(world: &mut BddWorld, start: String, end: String) -> Result<()> {
    world.fill(START_DATE_FIELD, &start).await?;
    world.fill(END_DATE_FIELD, &end).await
}

#[when("I submit the season form")]
async fn submit_season_form(world: &mut BddWorld) -> Result<()> {
    world.click(SEASON_SUBMIT).await
}

#[then("I should see a 6-character invitation code")]
async fn should_see_invitation_code(world: &mut BddWorld) -> Result<()> {
    let code = world.text_of(INVITATION_CODE).await?;
    let code = code.trim();
    ensure!(
        code.len() == 6 && code.chars().all(|c| c.is_ascii_alphanumeric()),
        "unexpected invitation code: {code:?}"
    );
    Ok(())
}

#[when(expr = "I switch to the account {string}")]
async fn switch_account(world: &mut BddWorld, email: String) -> Result<()> {
    // Keep the remembered invitation code across the account change.
    let _ = world.click(LOGOUT_BUTTON).await;
    sign_in(world, &email, TEST_PASSWORD).await
}

#[when("I join the season using the invitation code")]
async fn join_with_code(world: &mut BddWorld) -> Result<()> {
    let code = world
        .invitation_code
        .clone()
        .context("no invitation code was captured earlier in the scenario")?;

    world.goto("/seasons/join").await?;
    world.fill(CODE_FIELD, &code).await?;
    world.click(JOIN_SUBMIT).await
}

#[then("I should see the season dashboard")]
async fn should_see_season_dashboard(world: &mut BddWorld) -> Result<()> {
    world.find_any(SEASON_DASHBOARD).await?;
    Ok(())
}

#[then(expr = "I should see {string} in my seasons list")]
async fn should_see_in_seasons_list(world: &mut BddWorld, title: String) -> Result<()> {
    world.goto("/seasons").await?;
    let text = world.page_text().await?;
    ensure!(
        text.contains(&title),
        "seasons list does not mention {title:?}"
    );
    Ok(())
}
