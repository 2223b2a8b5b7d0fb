use anyhow::{Result, ensure};
use cucumber::{then, when};

use crate::world::BddWorld;

const LEADERBOARD_TAB: &[&str] = &["[data-testid='leaderboard-tab']", "a[href*='leaderboard']"];
const LEADERBOARD_ENTRY: &[&str] = &["[data-testid='leaderboard-entry']", ".leaderboard-entry"];
const BADGE_COLLECTION: &[&str] = &["[data-testid='badge-collection']", ".badge-collection"];

#[when("I open the leaderboard tab")]
async fn open_leaderboard_tab(world: &mut BddWorld) -> Result<()> {
    world.click(LEADERBOARD_TAB).await
}

#[then("I should see ranked family members")]
async fn should_see_ranked_members(world: &mut BddWorld) -> Result<()> {
    let entry = world.find_any(LEADERBOARD_ENTRY).await?;
    let text = entry.text().await?;
    ensure!(!text.trim().is_empty(), "leaderboard entry was empty");
    Ok(())
}

#[when("I open my profile page")]
async fn open_profile_page(world: &mut BddWorld) -> Result<()> {
    world.goto("/profile").await
}

#[then("I should see my badge collection")]
async fn should_see_badges(world: &mut BddWorld) -> Result<()> {
    world.find_any(BADGE_COLLECTION).await?;
    Ok(())
}
