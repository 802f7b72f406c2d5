use super::range::DateRange;
use super::record::Kind;

/// Which search endpoint a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Issues,
    Commits,
}

impl SearchTarget {
    pub fn path(self) -> &'static str {
        match self {
            SearchTarget::Issues => "/search/issues",
            SearchTarget::Commits => "/search/commits",
        }
    }
}

/// One row of the per-organization query table. `{login}` and `{range}`
/// in the template are filled in per run; `org:{org}` is always prepended.
#[derive(Debug)]
pub struct ActivityQuery {
    pub kind: Kind,
    pub target: SearchTarget,
    template: &'static str,
}

/// Run in this order for every organization.
///
/// Reviews and comments filter on `updated:` because search has no
/// reviewed-at or commented-at qualifier.
pub const ACTIVITY_QUERIES: [ActivityQuery; 7] = [
    ActivityQuery {
        kind: Kind::PrsOpened,
        target: SearchTarget::Issues,
        template: "type:pr author:{login} created:{range}",
    },
    ActivityQuery {
        kind: Kind::PrsMerged,
        target: SearchTarget::Issues,
        template: "type:pr author:{login} is:merged merged:{range}",
    },
    ActivityQuery {
        kind: Kind::PrsReviewed,
        target: SearchTarget::Issues,
        template: "type:pr reviewed-by:{login} updated:{range}",
    },
    ActivityQuery {
        kind: Kind::PrsCommented,
        target: SearchTarget::Issues,
        template: "type:pr commenter:{login} updated:{range}",
    },
    ActivityQuery {
        kind: Kind::IssuesOpened,
        target: SearchTarget::Issues,
        template: "type:issue author:{login} created:{range}",
    },
    ActivityQuery {
        kind: Kind::InvolvesMe,
        target: SearchTarget::Issues,
        template: "involves:{login} updated:{range}",
    },
    ActivityQuery {
        kind: Kind::Commits,
        target: SearchTarget::Commits,
        template: "author:{login} committer-date:{range}",
    },
];

impl ActivityQuery {
    pub fn render(&self, org: &str, login: &str, range: &DateRange) -> String {
        let qualifiers = self
            .template
            .replace("{login}", login)
            .replace("{range}", &range.qualifier());
        format!("org:{org} {qualifiers}")
    }
}
