use crate::activity::record::{ActivityRecord, CommitRecord, IssueRecord};
use crate::activity::{ActivityLog, ActivityQuery, DateRange, SearchTarget, ACTIVITY_QUERIES};
use crate::commands::resolve_orgs;
use crate::config::load_config;
use crate::display;
use crate::error::Result;
use crate::github::models::{SearchCommit, SearchIssue};
use crate::github::{GithubClient, Query, PER_PAGE};
use crate::output::{self, OutputPaths};
use crate::progress::Progress;
use chrono::Local;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use std::pin::pin;

#[derive(Debug, Default)]
pub struct ExportArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub orgs: Vec<String>,
    pub out: Option<String>,
    pub verbose: bool,
}

pub async fn run(args: &ExportArgs) -> Result<()> {
    let config = load_config()?;
    let token = config.token()?;

    if args.from.is_some() != args.to.is_some() {
        display::warn("--from and --to must be given together; using the last 365 days.");
    }
    let range = DateRange::resolve(
        args.from.as_deref(),
        args.to.as_deref(),
        Local::now().date_naive(),
    )?;

    let client = GithubClient::new(&token, &config.api())?;
    let user = client.whoami().await?;
    let allow = config.org_filter(&args.orgs);
    let orgs = resolve_orgs(allow.as_deref(), &client).await?;

    let user_label = match &user.name {
        Some(name) => format!("{} ({name})", user.login),
        None => user.login.clone(),
    };
    display::summary(
        "GitHub Activity Export",
        &[
            ("User", user_label),
            ("Date range", range.to_string()),
            (
                "Organizations",
                if orgs.is_empty() {
                    "None found".to_string()
                } else {
                    orgs.join(", ")
                },
            ),
        ],
    );

    if orgs.is_empty() {
        display::warn("No organizations to process.");
        return Ok(());
    }

    let total = (orgs.len() * ACTIVITY_QUERIES.len()) as u64;
    // Debug logging and a redrawing bar don't mix on one stream.
    let progress = if args.verbose {
        Progress::hidden()
    } else {
        Progress::bar(total, "Fetching activity...")
    };
    let collected = collect_activity(&client, &user.login, &orgs, &range, &progress).await;
    progress.finish();
    let records = collected?;

    let paths = OutputPaths::from_stem(&range.file_stem(&config.out_prefix(args.out.as_deref())));
    output::write_all(&paths, &records)?;

    println!();
    display::success(&format!("Wrote {} records", records.len()));
    display::bullet(&paths.json.display().to_string());
    display::bullet(&paths.csv.display().to_string());

    Ok(())
}

/// Run every query for every organization, in order, and return the
/// deduplicated records in fetch order.
pub async fn collect_activity(
    client: &GithubClient,
    login: &str,
    orgs: &[String],
    range: &DateRange,
    progress: &Progress,
) -> Result<Vec<ActivityRecord>> {
    let mut log = ActivityLog::new();

    for org in orgs {
        for query in &ACTIVITY_QUERIES {
            progress.set_message(format!("{org} → {}", query.kind));
            tracing::debug!(%org, kind = %query.kind, "running search");

            match query.target {
                SearchTarget::Issues => {
                    drain::<SearchIssue, _>(client, query, org, login, range, &mut log, |item| {
                        ActivityRecord::Issue(IssueRecord::from_search(query.kind, org, item))
                    })
                    .await?
                }
                SearchTarget::Commits => {
                    drain::<SearchCommit, _>(client, query, org, login, range, &mut log, |item| {
                        ActivityRecord::Commit(CommitRecord::from_search(org, item))
                    })
                    .await?
                }
            }

            progress.inc();
        }
    }

    tracing::debug!(records = log.len(), "activity collected");
    Ok(log.into_records())
}

async fn drain<T, F>(
    client: &GithubClient,
    query: &ActivityQuery,
    org: &str,
    login: &str,
    range: &DateRange,
    log: &mut ActivityLog,
    mut to_record: F,
) -> Result<()>
where
    T: DeserializeOwned,
    F: FnMut(T) -> ActivityRecord,
{
    let params: Query = vec![
        ("q", query.render(org, login, range)),
        ("per_page", PER_PAGE.into()),
    ];
    let mut items = pin!(client.paginate::<T>(query.target.path(), params, Some("items")));
    while let Some(item) = items.try_next().await? {
        log.add(to_record(item));
    }
    Ok(())
}
