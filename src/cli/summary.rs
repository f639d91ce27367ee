//! Summary command implementation

use anyhow::Result;
use chrono::Duration;

use crate::store::InsightsStore;
use crate::timestamp;

/// Print totals since `since` (RFC 3339), or over the last 7 days
pub fn run(store: &InsightsStore, since: Option<&str>) -> Result<()> {
    let since = match since {
        Some(s) => timestamp::parse_rfc3339(s)?,
        None => timestamp::now_seconds() - Duration::days(7),
    };

    let summary = store.summary(since)?;

    println!("Since {}", since.to_rfc3339());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Executions", summary.total());
    println!("{:<20} {}", "Succeeded", summary.succeeded);
    println!("{:<20} {}", "Failed", summary.failed);
    println!("{:<20} {:.1}%", "Failure rate", summary.failure_rate() * 100.0);
    println!("{:<20} {:.0} ms", "Average runtime", summary.average_runtime_ms());
    println!("{:<20} {} min", "Time saved", summary.time_saved_min);
    Ok(())
}
