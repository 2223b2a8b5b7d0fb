mod steps;
mod world;

use cucumber::{World, writer};

use world::BddWorld;

/// Runs the browser-driven suite against a deployed frontend.
///
/// Environment:
/// - `BASE_URL` (default http://localhost:3000): the frontend under test
/// - `WEBDRIVER_URL` (default http://localhost:4444): a running chromedriver/Selenium
/// - `REPORT_JSON`: when set, write Cucumber JSON there for `lakeside-report`
/// - `FEATURES_DIR` (default: this crate's `features/`): feature file location
#[tokio::main]
async fn main() {
    let features = std::env::var("FEATURES_DIR")
        .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/features").to_string());

    let cucumber = BddWorld::cucumber().after(|_feature, _rule, _scenario, _ev, world| {
        Box::pin(async move {
            if let Some(world) = world {
                world.quit().await;
            }
        })
    });

    match std::env::var("REPORT_JSON") {
        Ok(path) => {
            // With the JSON writer, pass/fail is judged downstream by
            // `lakeside-report` from the emitted document.
            let file = std::fs::File::create(&path)
                .unwrap_or_else(|e| panic!("cannot create {path}: {e}"));
            cucumber
                .with_writer(writer::Json::new(file))
                .run(features)
                .await;
        }
        Err(_) => {
            cucumber.run_and_exit(features).await;
        }
    }
}
