use anyhow::Result;
use cucumber::{given, then, when};

use crate::world::BddWorld;

pub const EMAIL_FIELD: &[&str] = &["[data-testid='email']", "input[type='email']", "#email"];
pub const PASSWORD_FIELD: &[&str] = &[
    "[data-testid='password']",
    "input[type='password']",
    "#password",
];
const CONFIRM_FIELD: &[&str] = &["[data-testid='confirm-password']", "#confirm-password"];
pub const LOGIN_BUTTON: &[&str] = &[
    "[data-testid='login-button']",
    "button[type='submit']",
    ".login-btn",
];
const REGISTER_BUTTON: &[&str] = &["[data-testid='register-button']", "button[type='submit']"];
pub const DASHBOARD: &[&str] = &["[data-testid='dashboard']", ".dashboard"];
const AUTH_ERROR: &[&str] = &["[data-testid='auth-error']", ".error-message", "[role='alert']"];
pub const LOGOUT_BUTTON: &[&str] = &["[data-testid='logout-button']", ".logout-btn"];

/// Default password for throwaway BDD accounts.
pub const TEST_PASSWORD: &str = "TestPass123!";

/// Register through the UI. An "already registered" error is fine: the
/// account then simply exists from an earlier scenario against the same
/// deployment.
pub async fn ensure_registered(world: &mut BddWorld, email: &str, password: &str) -> Result<()> {
    world.goto("/register").await?;
    world.fill(EMAIL_FIELD, email).await?;
    world.fill(PASSWORD_FIELD, password).await?;
    world.fill(CONFIRM_FIELD, password).await?;
    world.click(REGISTER_BUTTON).await?;

    // Either we land on the dashboard or the duplicate-email error shows.
    let _ = world
        .find_any(&[DASHBOARD[0], DASHBOARD[1], AUTH_ERROR[0], AUTH_ERROR[1]])
        .await;
    Ok(())
}

/// Full sign-in flow, registering the account first if needed.
pub async fn sign_in(world: &mut BddWorld, email: &str, password: &str) -> Result<()> {
    ensure_registered(world, email, password).await?;

    world.goto("/login").await?;
    world.fill(EMAIL_FIELD, email).await?;
    world.fill(PASSWORD_FIELD, password).await?;
    world.click(LOGIN_BUTTON).await?;
    world.find_any(DASHBOARD).await?;
    Ok(())
}

#[given("the application is open")]
async fn application_is_open(world: &mut BddWorld) -> Result<()> {
    world.goto("/").await
}

#[given(expr = "a registered user {string} with password {string}")]
async fn registered_user(world: &mut BddWorld, email: String, password: String) -> Result<()> {
    ensure_registered(world, &email, &password).await
}

#[given(expr = "I am signed in as {string}")]
async fn signed_in_as(world: &mut BddWorld, email: String) -> Result<()> {
    sign_in(world, &email, TEST_PASSWORD).await
}

#[when("I open the login form")]
async fn open_login_form(world: &mut BddWorld) -> Result<()> {
    world.goto("/login").await
}

#[when("I open the registration form")]
async fn open_registration_form(world: &mut BddWorld) -> Result<()> {
    world.goto("/register").await
}

#[when(expr = "I fill in the email {string}")]
async fn fill_email(world: &mut BddWorld, email: String) -> Result<()> {
    world.fill(EMAIL_FIELD, &email).await
}

#[when(expr = "I fill in the password {string}")]
async fn fill_password(world: &mut BddWorld, password: String) -> Result<()> {
    world.fill(PASSWORD_FIELD, &password).await
}

#[when(expr = "I confirm the password {string}")]
async fn confirm_password(world: &mut BddWorld, password: String) -> Result<()> {
    world.fill(CONFIRM_FIELD, &password).await
}

#[when("I submit the registration form")]
async fn submit_registration(world: &mut BddWorld) -> Result<()> {
    world.click(REGISTER_BUTTON).await
}

#[when("I submit the login form")]
async fn submit_login(world: &mut BddWorld) -> Result<()> {
    world.click(LOGIN_BUTTON).await
}

#[then("I should see the dashboard")]
async fn should_see_dashboard(world: &mut BddWorld) -> Result<()> {
    world.find_any(DASHBOARD).await?;
    Ok(())
}

#[then("I should see an authentication error")]
async fn should_see_auth_error(world: &mut BddWorld) -> Result<()> {
    world.find_any(AUTH_ERROR).await?;
    Ok(())
}
