//! High-level pipeline: fetch → classify → convert.
//!
//! [`grind`] loads one inventory snapshot through a [`SteamApi`], selects the
//! candidates with the configured filters and converts them one at a time.
//!
//! # Failure model
//! - Inventory fetch failures abort before anything is classified.
//! - Candidates without a convertible description, without a gem action, or
//!   whose value lookup fails are skipped and recorded in the report.
//! - A malformed action link (with [`ValueSource::Link`]), a conversion
//!   response rejected by the [`ResponsePolicy`], or a failed conversion
//!   request aborts the rest of the batch. Nothing is resumed.

use tracing::{debug, error, info, warn};

use crate::acceptance::ResponsePolicy;
use crate::classify::{classify, Candidate, CandidateSet};
use crate::config::{GrindConfig, ValueSource};
use crate::contract::{ConversionRequest, GooValueQuery, SteamApi};
use crate::error::{GrindError, LookupError};
use crate::goo_link::{expected_value_from_link, mentions_goo};
use crate::inventory::DescriptionCache;
use crate::progress::ProgressSink;

/// Outcome of a run that did not abort.
#[derive(Debug, Default)]
pub struct GrindReport {
    pub candidates: usize,
    /// Conversions accepted by the response policy.
    pub completed: u64,
    pub converted: Vec<String>,
    /// Requests that would have been sent in a dry run.
    pub planned: Vec<ConversionRequest>,
    pub skipped: Vec<SkippedCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub candidate: Candidate,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No description shares the asset's classid.
    MissingDescription,
    /// The description lacks `owner_actions` or `market_fee_app`.
    NotConvertible,
    /// The last owner action is not the gem conversion.
    NoGooAction,
    ValueLookupFailed(LookupError),
}

/// Runs the whole pipeline against `api`.
pub async fn grind<A, P>(
    config: &GrindConfig,
    api: &A,
    policy: &P,
    progress: &dyn ProgressSink,
) -> Result<GrindReport, GrindError>
where
    A: SteamApi + ?Sized,
    P: ResponsePolicy + ?Sized,
{
    info!(
        app_id = config.app_id,
        context_id = config.context_id,
        "[GRIND] Fetching inventory"
    );
    let snapshot = match api
        .fetch_inventory(config.app_id, config.context_id, config.inventory_count)
        .await
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "[GRIND][ERROR] Inventory could not be loaded");
            return Err(e.into());
        }
    };
    snapshot.trace_loaded();

    let mut cache = DescriptionCache::new(&snapshot);
    let candidates = classify(&mut cache, &config.filters, &config.protected);

    convert(config, api, policy, progress, &mut cache, &candidates).await
}

/// Converts every candidate in order. Stops at the first fatal error.
pub async fn convert<A, P>(
    config: &GrindConfig,
    api: &A,
    policy: &P,
    progress: &dyn ProgressSink,
    cache: &mut DescriptionCache<'_>,
    candidates: &CandidateSet,
) -> Result<GrindReport, GrindError>
where
    A: SteamApi + ?Sized,
    P: ResponsePolicy + ?Sized,
{
    let mut report = GrindReport {
        candidates: candidates.len(),
        ..Default::default()
    };
    let session_id = api.session_id();
    let mut attempted: u64 = 0;

    progress.begin(candidates.len() as u64);
    info!(candidates = candidates.len(), dry_run = config.dry_run, "[GRIND] Converting candidates");

    for candidate in candidates {
        let skip = |reason: SkipReason| SkippedCandidate {
            candidate: candidate.clone(),
            reason,
        };

        let Some(desc) = cache.get(&candidate.classid) else {
            warn!(
                assetid = %candidate.assetid,
                classid = %candidate.classid,
                "Skipping asset without description"
            );
            report.skipped.push(skip(SkipReason::MissingDescription));
            continue;
        };
        let (Some(action), Some(fee_app)) = (desc.last_owner_action(), desc.market_fee_app) else {
            debug!(assetid = %candidate.assetid, item = desc.display_name(), "Not convertible");
            report.skipped.push(skip(SkipReason::NotConvertible));
            continue;
        };
        if !mentions_goo(&action.link) {
            debug!(
                assetid = %candidate.assetid,
                item = desc.display_name(),
                link = %action.link,
                "No gem action"
            );
            report.skipped.push(skip(SkipReason::NoGooAction));
            continue;
        }

        let query = GooValueQuery {
            contextid: config.context_id.to_string(),
            assetid: candidate.assetid.clone(),
            sessionid: session_id.clone(),
            appid: fee_app.to_string(),
        };

        let expected = match config.value_source {
            ValueSource::Lookup => match api.goo_value(&query).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        assetid = %candidate.assetid,
                        error = %e,
                        "Value lookup failed, skipping"
                    );
                    report.skipped.push(skip(SkipReason::ValueLookupFailed(e)));
                    continue;
                }
            },
            ValueSource::Link => match expected_value_from_link(&action.link) {
                Ok(value) => value,
                Err(e) => {
                    error!(
                        assetid = %candidate.assetid,
                        link = %action.link,
                        reason = %e.reason,
                        "[GRIND][ERROR] Malformed gem action link"
                    );
                    progress.finish(report.completed);
                    return Err(e.into());
                }
            },
        };

        let request = ConversionRequest::new(query, expected);
        if config.dry_run {
            info!(
                assetid = %request.assetid,
                appid = %request.appid,
                goo_value_expected = %request.goo_value_expected,
                item = desc.display_name(),
                "Would grind"
            );
            report.planned.push(request);
            continue;
        }

        if attempted > 0 && !config.delay.is_zero() {
            tokio::time::sleep(config.delay).await;
        }
        attempted += 1;

        let response = match api.grind_into_goo(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    assetid = %request.assetid,
                    error = %e,
                    "[GRIND][ERROR] Conversion request failed"
                );
                progress.finish(report.completed);
                return Err(GrindError::Transport {
                    assetid: request.assetid,
                    reason: e.to_string(),
                });
            }
        };

        if !policy.is_acceptable(response.status, &response.body) {
            error!(
                assetid = %request.assetid,
                status = response.status,
                body = %response.body,
                "[GRIND][ERROR] Unexpected conversion response, aborting batch"
            );
            progress.finish(report.completed);
            return Err(GrindError::UnexpectedResponse {
                assetid: request.assetid,
                status: response.status,
                body: response.body,
            });
        }

        report.completed += 1;
        debug!(assetid = %request.assetid, status = response.status, "Ground into gems");
        report.converted.push(request.assetid);
        progress.set_completed(report.completed);
    }

    progress.finish(report.completed);
    info!(
        completed = report.completed,
        skipped = report.skipped.len(),
        planned = report.planned.len(),
        "[GRIND] Done"
    );
    Ok(report)
}
