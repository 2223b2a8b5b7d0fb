use anyhow::{Result, ensure};
use cucumber::{given, then, when};

use super::seasons::create_season;
use crate::world::BddWorld;

const CHALLENGES_TAB: &[&str] = &["[data-testid='challenges-tab']", "a[href*='challenges']"];
const CHALLENGE_LIST: &[&str] = &["[data-testid='challenge-list']", ".challenge-list"];
const CHALLENGE_CARD: &[&str] = &["[data-testid='challenge-card']", ".challenge-card"];
const RESPONSE_FIELD: &[&str] = &["[data-testid='submission-content']", "#submission-content"];
const SUBMIT_RESPONSE: &[&str] = &["[data-testid='submit-response']", "button[type='submit']"];
const SUBMISSION_STATUS: &[&str] = &["[data-testid='submission-status']", ".submission-status"];

#[given("I am viewing a season")]
async fn viewing_a_season(world: &mut BddWorld) -> Result<()> {
    if world.season_title.is_none() {
        create_season(world, "BDD Season").await?;
    }
    world.goto("/seasons").await?;
    world
        .click(&["[data-testid='season-card']", ".season-card"])
        .await
}

#[when("I open the challenges tab")]
async fn open_challenges_tab(world: &mut BddWorld) -> Result<()> {
    world.click(CHALLENGES_TAB).await
}

#[then("I should see the challenge list")]
async fn should_see_challenge_list(world: &mut BddWorld) -> Result<()> {
    world.find_any(CHALLENGE_LIST).await?;
    Ok(())
}

#[when("I open the first challenge")]
async fn open_first_challenge(world: &mut BddWorld) -> Result<()> {
    world.click(CHALLENGES_TAB).await?;
    world.click(CHALLENGE_CARD).await
}

#[when(expr = "I write the response {string}")]
async fn write_response(world: &mut BddWorld, content: String) -> Result<()> {
    world.fill(RESPONSE_FIELD, &content).await
}

#[when("I submit my response")]
async fn submit_response(world: &mut BddWorld) -> Result<()> {
    world.click(SUBMIT_RESPONSE).await
}

#[then("I should see a pending confirmation")]
async fn should_see_pending(world: &mut BddWorld) -> Result<()> {
    let status = world.text_of(SUBMISSION_STATUS).await?;
    ensure!(
        status.to_lowercase().contains("pending"),
        "submission status was {status:?}"
    );
    Ok(())
}
