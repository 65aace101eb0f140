//! Local filter over a catalog dump.

use anyhow::{Context, Result};
use campus_activity_core::ActivityFilter;
use campus_activity_types::{parse_bound, Activity, ModuleTag};
use std::path::Path;

/// Filter criteria; every flag is optional.
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring over name, content, place, department and organizer
    #[arg(long)]
    pub keyword: Option<String>,

    /// Module letter (d, z, t, m, l); repeat to accept several
    #[arg(long)]
    pub module: Vec<String>,

    /// Department name substring
    #[arg(long)]
    pub department: Option<String>,

    /// Organizer name substring
    #[arg(long)]
    pub organizer: Option<String>,

    /// Only activities starting at or after this time (YYYY-MM-DD[ HH:MM[:SS]])
    #[arg(long)]
    pub start_after: Option<String>,

    /// Only activities ending before this time (YYYY-MM-DD[ HH:MM[:SS]])
    #[arg(long)]
    pub end_before: Option<String>,
}

/// Build the filter, rejecting unknown modules and malformed bounds.
pub fn build_filter(args: &FilterArgs) -> Result<ActivityFilter> {
    let mut filter = ActivityFilter::new();

    if let Some(keyword) = &args.keyword {
        filter = filter.with_keyword(keyword);
    }
    for letter in &args.module {
        let tag: ModuleTag = letter
            .parse()
            .with_context(|| format!("Invalid --module {letter:?}"))?;
        filter = filter.with_module(tag);
    }
    if let Some(department) = &args.department {
        filter = filter.with_department(department);
    }
    if let Some(organizer) = &args.organizer {
        filter = filter.with_organizer(organizer);
    }
    if let Some(bound) = &args.start_after {
        filter = filter.with_start_after(parse_bound(bound).context("Invalid --start-after")?);
    }
    if let Some(bound) = &args.end_before {
        filter = filter.with_end_before(parse_bound(bound).context("Invalid --end-before")?);
    }

    Ok(filter)
}

/// Read a JSON list of activities.
pub async fn load_catalog(path: &Path) -> Result<Vec<Activity>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&contents).context("Invalid catalog")
}

/// One output line per activity.
pub fn format_row(activity: &Activity) -> String {
    let module = activity
        .module_tag()
        .map(|tag| tag.letter().to_string())
        .unwrap_or_else(|| "-".to_string());
    let start = activity.start_time.as_deref().unwrap_or("-");
    format!(
        "{}  [{}]  {}  {}  {}",
        activity.id,
        activity.status(),
        module,
        start,
        activity.name
    )
}

/// Run the filter command.
pub async fn run(catalog: &Path, args: &FilterArgs) -> Result<()> {
    let filter = build_filter(args)?;
    let activities = load_catalog(catalog).await?;
    let matched = filter.apply(&activities);

    for activity in &matched {
        println!("{}", format_row(activity));
    }
    println!();
    println!("{} of {} activities match", matched.len(), activities.len());
    Ok(())
}
