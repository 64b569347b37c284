//! Pipeline result types: the projected account detail, per-request
//! outcomes, and invocation-scoped run statistics.

use serde::Serialize;

use cloutwatch_twitch::ChannelDetail;

/// Stable account identifier resolved from a username. Opaque to the
/// pipeline; produced by the identity endpoint and consumed by the detail
/// endpoint.
pub type AccountId = String;

/// The projected subset of channel detail retained for qualifying accounts.
#[derive(Debug, Clone, Serialize)]
pub struct AccountDetail {
    pub display_name: String,
    pub id: String,
    pub name: String,
    pub is_partner: bool,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub profile_url: Option<String>,
    pub follower_count: u64,
    pub view_count: u64,
    pub description: Option<String>,
}

impl From<ChannelDetail> for AccountDetail {
    fn from(detail: ChannelDetail) -> Self {
        Self {
            display_name: detail.display_name,
            id: detail.id,
            name: detail.name,
            is_partner: detail.partner,
            logo_url: detail.logo,
            banner_url: detail.profile_banner,
            profile_url: detail.url,
            follower_count: detail.followers,
            view_count: detail.views,
            description: detail.description,
        }
    }
}

/// Settled outcome of one per-account detail request.
///
/// `Fulfilled(None)` is a successful request whose account fell below the
/// threshold: counted as a success, never surfaced in results.
#[derive(Debug, Clone)]
pub enum DetailOutcome {
    Fulfilled(Option<AccountDetail>),
    Rejected(String),
}

/// Request counters for a single pipeline invocation.
///
/// Created fresh per run and returned by value, so concurrent invocations
/// cannot interleave each other's counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub successful_requests: u64,
    pub failed_requests: u64,
}

impl RunStats {
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.successful_requests + self.failed_requests
    }

    /// Share of detail requests that succeeded, as a percentage. `0.0` when
    /// no requests were made.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_percentage(&self) -> f64 {
        if self.total_requests() == 0 {
            return 0.0;
        }
        (self.successful_requests as f64 / self.total_requests() as f64) * 100.0
    }
}

/// Everything a caller needs from one pipeline run: the qualifying accounts,
/// the fulfilled/rejected split, and the request counters.
#[derive(Debug)]
pub struct PipelineReport {
    pub qualifying: Vec<AccountDetail>,
    pub fulfilled: u64,
    pub rejected: u64,
    pub stats: RunStats,
}

impl PipelineReport {
    /// Derives the report from settled outcomes: counts fulfilled/rejected
    /// and keeps only the present (threshold-clearing) values.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<DetailOutcome>, stats: RunStats) -> Self {
        let mut qualifying = Vec::new();
        let mut fulfilled = 0u64;
        let mut rejected = 0u64;
        for outcome in outcomes {
            match outcome {
                DetailOutcome::Fulfilled(value) => {
                    fulfilled += 1;
                    if let Some(detail) = value {
                        qualifying.push(detail);
                    }
                }
                DetailOutcome::Rejected(_) => rejected += 1,
            }
        }
        Self {
            qualifying,
            fulfilled,
            rejected,
            stats,
        }
    }
}
