use std::cmp::Ordering;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::application_store::ApplicationStore;
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::score::ScoreWeights;

/// Placeholder name left behind by orphaned candidate records.
const UNKNOWN_CANDIDATE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct RankedApplication {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub application: Application,
}

#[derive(Debug, Clone)]
pub struct JobRanking {
    pub job_id: Uuid,
    pub job_title: String,
    pub weights: ScoreWeights,
    pub items: Vec<RankedApplication>,
    /// Applications left out because their candidate could not be resolved.
    pub excluded: usize,
}

#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn ApplicationStore>,
    default_weights: ScoreWeights,
}

impl RankingService {
    pub fn new(store: Arc<dyn ApplicationStore>, default_weights: ScoreWeights) -> Self {
        Self {
            store,
            default_weights,
        }
    }

    pub async fn rank(&self, job_id: Uuid) -> Result<JobRanking> {
        let job = self
            .store
            .find_job_scoring(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;

        let applications = self.store.list_for_job(job_id).await?;
        let total = applications.len();
        let items = rank_applications(applications);
        let excluded = total - items.len();

        tracing::debug!(job_id = %job_id, ranked = items.len(), excluded, "ranking built");

        Ok(JobRanking {
            job_id,
            job_title: job.title,
            weights: job.weights.unwrap_or(self.default_weights),
            items,
            excluded,
        })
    }
}

pub fn has_resolvable_candidate(application: &Application) -> bool {
    match &application.candidate {
        Some(candidate) => {
            let name = candidate.name.trim();
            !name.is_empty() && name != UNKNOWN_CANDIDATE
        }
        None => false,
    }
}

/// Highest score first; ties go to the earlier application, then to the
/// lower id so the order is fully deterministic.
pub fn ranking_order(a: &Application, b: &Application) -> Ordering {
    b.ranking_score
        .cmp(&a.ranking_score)
        .then_with(|| a.applied_at.cmp(&b.applied_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn rank_applications(applications: Vec<Application>) -> Vec<RankedApplication> {
    let mut visible: Vec<Application> = applications
        .into_iter()
        .filter(|application| {
            let keep = has_resolvable_candidate(application);
            if !keep {
                tracing::warn!(
                    application_id = %application.id,
                    job_id = %application.job_id,
                    "excluding application with unresolved candidate from ranking"
                );
            }
            keep
        })
        .collect();

    visible.sort_by(ranking_order);

    visible
        .into_iter()
        .enumerate()
        .map(|(idx, application)| RankedApplication {
            rank: idx + 1,
            application,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::application_store::MockApplicationStore;
    use crate::models::application::{ApplicationStatus, CandidateSummary};
    use crate::models::job::JobScoring;
    use crate::models::score::ScoreBreakdown;
    use crate::services::scoring_service::ScoreAggregator;
    use chrono::{Duration, TimeZone, Utc};

    fn candidate(name: &str) -> Option<CandidateSummary> {
        Some(CandidateSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
    }

    fn application(
        job_id: Uuid,
        candidate: Option<CandidateSummary>,
        ranking_score: i32,
        minutes_after_open: i64,
    ) -> Application {
        let opened = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Application {
            id: Uuid::new_v4(),
            job_id,
            candidate,
            status: ApplicationStatus::Applied,
            ranking_score,
            score_breakdown: ScoreBreakdown::default(),
            cover_note: None,
            applied_at: opened + Duration::minutes(minutes_after_open),
            updated_at: opened,
        }
    }

    #[test]
    fn sorts_by_score_then_earliest_application() {
        let job = Uuid::new_v4();
        let late_ninety = application(job, candidate("Ines"), 90, 30);
        let forty = application(job, candidate("Omar"), 40, 0);
        let early_ninety = application(job, candidate("Lena"), 90, 5);
        let zero = application(job, candidate("Ravi"), 0, 1);

        let ranked = rank_applications(vec![
            late_ninety.clone(),
            forty.clone(),
            early_ninety.clone(),
            zero.clone(),
        ]);

        let ids: Vec<Uuid> = ranked.iter().map(|r| r.application.id).collect();
        assert_eq!(ids, vec![early_ninety.id, late_ninety.id, forty.id, zero.id]);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unresolved_candidates_are_excluded() {
        let job = Uuid::new_v4();
        let named = application(job, candidate("Mia"), 10, 0);
        let ranked = rank_applications(vec![
            application(job, candidate("Unknown"), 99, 0),
            application(job, None, 98, 0),
            application(job, candidate("   "), 97, 0),
            named.clone(),
        ]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].application.id, named.id);
    }

    #[test]
    fn ordering_is_deterministic_for_identical_keys() {
        let job = Uuid::new_v4();
        let a = application(job, candidate("Ana"), 50, 0);
        let mut b = application(job, candidate("Ben"), 50, 0);
        b.applied_at = a.applied_at;

        let forward = rank_applications(vec![a.clone(), b.clone()]);
        let backward = rank_applications(vec![b, a]);
        assert_eq!(forward, backward);
    }

    #[tokio::test]
    async fn ranks_job_end_to_end() {
        let job_id = Uuid::new_v4();
        let aggregator = ScoreAggregator::default();

        let mut a = application(job_id, candidate("Ada"), 0, 0);
        let mut b = application(job_id, candidate("Bo"), 0, 1);
        let mut c = application(job_id, None, 0, 2);
        for (app, ai, manual) in [(&mut a, 90.0, 70.0), (&mut b, 60.0, 60.0), (&mut c, 0.0, 0.0)] {
            let scored = aggregator.aggregate(Some(ai), Some(manual));
            app.ranking_score = scored.ranking_score;
            app.score_breakdown = scored.breakdown;
        }
        let stored = vec![c, b.clone(), a.clone()];

        let mut store = MockApplicationStore::new();
        store.expect_find_job_scoring().returning(|id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "Platform Engineer".into(),
                weights: None,
            }))
        });
        store
            .expect_list_for_job()
            .returning(move |_| Ok(stored.clone()));

        let service = RankingService::new(Arc::new(store), ScoreWeights::default());
        let ranking = service.rank(job_id).await.unwrap();

        let scores: Vec<(Uuid, i32)> = ranking
            .items
            .iter()
            .map(|r| (r.application.id, r.application.ranking_score))
            .collect();
        assert_eq!(scores, vec![(a.id, 80), (b.id, 60)]);
        assert_eq!(ranking.excluded, 1);
        assert_eq!(ranking.job_title, "Platform Engineer");
    }

    #[test]
    fn reports_job_weights_over_defaults() {
        let mut store = MockApplicationStore::new();
        store.expect_find_job_scoring().returning(|id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "Data Analyst".into(),
                weights: Some(ScoreWeights::new(0.7, 0.3)),
            }))
        });
        store.expect_list_for_job().returning(|_| Ok(Vec::new()));

        let service = RankingService::new(Arc::new(store), ScoreWeights::default());
        let ranking = tokio_test::block_on(service.rank(Uuid::new_v4())).unwrap();

        assert!(ranking.items.is_empty());
        assert!((ranking.weights.ai() - 0.7).abs() < 1e-9);
        assert!((ranking.weights.manual() - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let mut store = MockApplicationStore::new();
        store.expect_find_job_scoring().returning(|_| Ok(None));
        store.expect_list_for_job().never();

        let service = RankingService::new(Arc::new(store), ScoreWeights::default());
        let err = service.rank(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
