//! Aggregation of Cucumber JSON result files into suite and overall stats.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Scenario counts for one result file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuiteStats {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl SuiteStats {
    pub fn add(&mut self, other: SuiteStats) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// All loaded results, keyed the way the CI pipeline names its artifacts.
#[derive(Debug, Default)]
pub struct TestResults {
    pub smoke: Option<Value>,
    pub e2e: Option<Value>,
    pub performance: Option<Value>,
    /// Feature suites by name (from `<name>-results.json`).
    pub features: BTreeMap<String, Value>,
}

impl TestResults {
    /// Slot a result file in by its artifact filename.
    /// Returns `false` when the name does not look like a result file.
    pub fn insert(&mut self, filename: &str, data: Value) -> bool {
        if filename.contains("smoke-results") {
            self.smoke = Some(data);
        } else if filename.contains("e2e-results") {
            self.e2e = Some(data);
        } else if filename.contains("performance-results") {
            self.performance = Some(data);
        } else if let Some(feature) = filename.strip_suffix("-results.json") {
            self.features.insert(feature.to_string(), data);
        } else {
            return false;
        }
        true
    }
}

/// Serialized shape of `test-summary.json`.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub generated_at: String,
    pub suites: SuiteBreakdown,
    pub overall: OverallStats,
}

#[derive(Debug, Serialize)]
pub struct SuiteBreakdown {
    pub smoke: SuiteStats,
    pub e2e: SuiteStats,
    pub performance: SuiteStats,
    pub features: BTreeMap<String, SuiteStats>,
}

#[derive(Debug, Serialize)]
pub struct OverallStats {
    #[serde(flatten)]
    pub stats: SuiteStats,
    pub success_rate: f64,
}

impl Summary {
    pub fn build(results: &TestResults, generated_at: String) -> Self {
        let smoke = count_scenarios(results.smoke.as_ref());
        let e2e = count_scenarios(results.e2e.as_ref());
        let performance = count_scenarios(results.performance.as_ref());
        let features: BTreeMap<String, SuiteStats> = results
            .features
            .iter()
            .map(|(name, data)| (name.clone(), count_scenarios(Some(data))))
            .collect();

        let mut overall = SuiteStats::default();
        for stats in [smoke, e2e, performance].iter().chain(features.values()) {
            overall.add(*stats);
        }

        Summary {
            generated_at,
            suites: SuiteBreakdown {
                smoke,
                e2e,
                performance,
                features,
            },
            overall: OverallStats {
                success_rate: overall.success_rate(),
                stats: overall,
            },
        }
    }
}

/// Count scenarios in one Cucumber JSON document (an array of features, each
/// with `elements`). A scenario's status comes from its own `status` field
/// when present, otherwise from its worst step result.
pub fn count_scenarios(data: Option<&Value>) -> SuiteStats {
    let mut stats = SuiteStats::default();
    let Some(features) = data.and_then(|d| d.as_array()) else {
        return stats;
    };

    for feature in features {
        let Some(elements) = feature.get("elements").and_then(|e| e.as_array()) else {
            continue;
        };
        for element in elements {
            // Backgrounds also appear as elements; only scenarios count.
            let kind = element.get("type").and_then(|t| t.as_str());
            if kind.is_some_and(|k| k != "scenario") {
                continue;
            }

            stats.total += 1;
            match scenario_status(element) {
                "passed" => stats.passed += 1,
                "failed" => stats.failed += 1,
                "skipped" => stats.skipped += 1,
                _ => {}
            }
        }
    }

    stats
}

fn scenario_status(element: &Value) -> &str {
    if let Some(status) = element.get("status").and_then(|s| s.as_str()) {
        return if status == "passed" || status == "failed" || status == "skipped" {
            status
        } else {
            "unknown"
        };
    }

    let Some(steps) = element.get("steps").and_then(|s| s.as_array()) else {
        return "unknown";
    };

    let mut saw_skipped = false;
    let mut saw_passed = false;
    for step in steps {
        match step
            .pointer("/result/status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown")
        {
            "failed" => return "failed",
            "skipped" | "undefined" | "pending" => saw_skipped = true,
            "passed" => saw_passed = true,
            _ => {}
        }
    }

    if saw_skipped {
        "skipped"
    } else if saw_passed {
        "passed"
    } else {
        "unknown"
    }
}

/// Render the consolidated HTML report.
pub fn render_html(summary: &Summary) -> String {
    let overall = &summary.overall;
    let mut suite_rows = String::new();

    let mut push_row = |name: &str, stats: &SuiteStats| {
        if stats.total == 0 {
            return;
        }
        suite_rows.push_str(&format!(
            "<tr><td>{name}</td><td>{}</td><td class=\"passed\">{}</td>\
             <td class=\"failed\">{}</td><td class=\"skipped\">{}</td><td>{:.1}%</td></tr>\n",
            stats.total,
            stats.passed,
            stats.failed,
            stats.skipped,
            stats.success_rate(),
        ));
    };

    push_row("smoke", &summary.suites.smoke);
    for (name, stats) in &summary.suites.features {
        push_row(name, stats);
    }
    push_row("e2e", &summary.suites.e2e);
    push_row("performance", &summary.suites.performance);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>BDD Test Report - Lakeside</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       margin: 0; padding: 20px; background: #f5f7fa; }}
.container {{ max-width: 960px; margin: 0 auto; background: white; border-radius: 8px;
              box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; }}
.header {{ background: linear-gradient(135deg, #2193b0 0%, #6dd5ed 100%);
           color: white; padding: 30px; text-align: center; }}
.stats {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
          gap: 16px; padding: 24px; background: #f8f9fa; }}
.stat-card {{ background: white; padding: 16px; border-radius: 8px; text-align: center;
              box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
.stat-number {{ font-size: 2em; font-weight: bold; }}
.passed {{ color: #28a745; }}
.failed {{ color: #dc3545; }}
.skipped {{ color: #6c757d; }}
table {{ width: 100%; border-collapse: collapse; margin: 0; }}
th, td {{ padding: 10px 16px; text-align: left; border-bottom: 1px solid #e9ecef; }}
th {{ background: #f8f9fa; }}
.footer {{ padding: 16px; text-align: center; color: #6c757d; font-size: 0.9em; }}
</style>
</head>
<body>
<div class="container">
  <div class="header"><h1>BDD Test Report</h1><p>Lakeside - gamified family vacations</p></div>
  <div class="stats">
    <div class="stat-card"><div class="stat-number">{total}</div><div>Total</div></div>
    <div class="stat-card"><div class="stat-number passed">{passed}</div><div>Passed</div></div>
    <div class="stat-card"><div class="stat-number failed">{failed}</div><div>Failed</div></div>
    <div class="stat-card"><div class="stat-number skipped">{skipped}</div><div>Skipped</div></div>
    <div class="stat-card"><div class="stat-number">{rate:.1}%</div><div>Success rate</div></div>
  </div>
  <table>
    <thead><tr><th>Suite</th><th>Total</th><th>Passed</th><th>Failed</th><th>Skipped</th><th>Rate</th></tr></thead>
    <tbody>
{suite_rows}    </tbody>
  </table>
  <div class="footer">Generated at {generated_at}</div>
</div>
</body>
</html>
"#,
        total = overall.stats.total,
        passed = overall.stats.passed,
        failed = overall.stats.failed,
        skipped = overall.stats.skipped,
        rate = overall.success_rate,
        generated_at = summary.generated_at,
    )
}
