use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::application_store::ApplicationStore;
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::score::{
    round_to_stored, AggregatedScore, ScoreBreakdown, ScoreWeights, MAX_SCORE, MIN_SCORE,
};

/// Guarded score writes retried before giving up on a hot application.
const MAX_WRITE_ATTEMPTS: usize = 5;

/// Brings any score input into [0, 100] at stored precision. Non-finite input
/// counts as 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        round_to_stored(value.clamp(MIN_SCORE, MAX_SCORE))
    } else {
        MIN_SCORE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatingScale {
    /// Ratings from 1 to 5, as entered on the interview feedback form.
    FivePoint,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InterviewerRatings {
    pub technical: f64,
    pub communication: f64,
    pub problem_solving: f64,
}

/// Mean of the three interviewer ratings on the 0-100 scale.
pub fn manual_score_from_ratings(ratings: &InterviewerRatings, scale: RatingScale) -> f64 {
    let normalize = |value: f64| -> f64 {
        match scale {
            RatingScale::FivePoint => {
                let value = if value.is_finite() { value.clamp(0.0, 5.0) } else { 0.0 };
                value / 5.0 * MAX_SCORE
            }
            RatingScale::Percent => clamp_score(value),
        }
    };

    let total = normalize(ratings.technical)
        + normalize(ratings.communication)
        + normalize(ratings.problem_solving);
    clamp_score(total / 3.0)
}

/// Combines an AI score and an interviewer score into one ranking score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator {
    weights: ScoreWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Missing inputs count as 0 so partially evaluated applications still
    /// rank. The returned breakdown holds the clamped inputs.
    pub fn aggregate(&self, ai_score: Option<f64>, manual_score: Option<f64>) -> AggregatedScore {
        let breakdown = ScoreBreakdown {
            ai_score: ai_score.map(clamp_score),
            manual_score: manual_score.map(clamp_score),
        };

        let weighted = self.weights.ai() * breakdown.ai_score.unwrap_or(MIN_SCORE)
            + self.weights.manual() * breakdown.manual_score.unwrap_or(MIN_SCORE);

        AggregatedScore {
            ranking_score: clamp_score(weighted.round()) as i32,
            breakdown,
        }
    }

    pub fn aggregate_breakdown(&self, breakdown: &ScoreBreakdown) -> AggregatedScore {
        self.aggregate(breakdown.ai_score, breakdown.manual_score)
    }
}

/// Recomputes and persists ranking scores when one of their inputs changes.
#[derive(Clone)]
pub struct ScoringService {
    store: Arc<dyn ApplicationStore>,
    default_weights: ScoreWeights,
}

impl ScoringService {
    pub fn new(store: Arc<dyn ApplicationStore>, default_weights: ScoreWeights) -> Self {
        Self {
            store,
            default_weights,
        }
    }

    /// Job weights when the job sets them, otherwise the configured default.
    pub async fn weights_for_job(&self, job_id: Uuid) -> Result<ScoreWeights> {
        let job = self
            .store
            .find_job_scoring(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        Ok(job.weights.unwrap_or(self.default_weights))
    }

    /// Called when the external AI evaluation finishes.
    pub async fn record_ai_score(
        &self,
        application_id: Uuid,
        ai_score: Option<f64>,
    ) -> Result<Application> {
        self.update_breakdown(application_id, |current| ScoreBreakdown {
            ai_score,
            ..current
        })
        .await
    }

    pub async fn record_manual_score(
        &self,
        application_id: Uuid,
        manual_score: Option<f64>,
    ) -> Result<Application> {
        self.update_breakdown(application_id, |current| ScoreBreakdown {
            manual_score,
            ..current
        })
        .await
    }

    /// Called when an interviewer submits feedback.
    pub async fn record_manual_ratings(
        &self,
        application_id: Uuid,
        ratings: &InterviewerRatings,
        scale: RatingScale,
    ) -> Result<Application> {
        let manual = manual_score_from_ratings(ratings, scale);
        self.record_manual_score(application_id, Some(manual)).await
    }

    /// Recomputes every application of a job, typically after its weights
    /// changed. Returns how many scores moved.
    pub async fn rescore_job(&self, job_id: Uuid) -> Result<usize> {
        let aggregator = ScoreAggregator::new(self.weights_for_job(job_id).await?);
        let applications = self.store.list_for_job(job_id).await?;

        let mut changed = 0;
        for application in applications {
            let current = application.stored_score();
            let scored = aggregator.aggregate_breakdown(&current.breakdown);
            if scored == current {
                continue;
            }
            if !self.store.save_scores(application.id, &current, &scored).await? {
                // Written concurrently: recompute from the fresh row.
                self.update_breakdown(application.id, |fresh| fresh).await?;
            }
            changed += 1;
        }

        tracing::info!(job_id = %job_id, changed, "rescored job applications");
        Ok(changed)
    }

    async fn load(&self, application_id: Uuid) -> Result<Application> {
        self.store
            .get_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    /// Read, merge one input, aggregate and write back, guarded on the row
    /// still holding what was read. A lost race rereads and merges again, so
    /// concurrent updates of different inputs both survive.
    async fn update_breakdown<F>(&self, application_id: Uuid, merge: F) -> Result<Application>
    where
        F: Fn(ScoreBreakdown) -> ScoreBreakdown + Send + Sync,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut application = self.load(application_id).await?;
            let aggregator = ScoreAggregator::new(self.weights_for_job(application.job_id).await?);
            let current = application.stored_score();
            let scored = aggregator.aggregate_breakdown(&merge(current.breakdown));

            if self.store.save_scores(application.id, &current, &scored).await? {
                tracing::debug!(
                    application_id = %application.id,
                    ranking_score = scored.ranking_score,
                    "application rescored"
                );
                application.ranking_score = scored.ranking_score;
                application.score_breakdown = scored.breakdown;
                return Ok(application);
            }

            tracing::debug!(application_id = %application_id, attempt, "score write raced, retrying");
        }

        Err(Error::Conflict(
            "Application scores are being updated concurrently; retry".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::application_store::MockApplicationStore;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::JobScoring;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Barrier;

    fn equal() -> ScoreAggregator {
        ScoreAggregator::new(ScoreWeights::default())
    }

    #[test]
    fn weighted_average_is_rounded() {
        assert_eq!(equal().aggregate(Some(90.0), Some(70.0)).ranking_score, 80);
        assert_eq!(equal().aggregate(Some(61.0), Some(60.0)).ranking_score, 61);

        let skewed = ScoreAggregator::new(ScoreWeights::new(0.7, 0.3));
        assert_eq!(skewed.aggregate(Some(80.0), Some(50.0)).ranking_score, 71);
    }

    #[test]
    fn result_matches_formula_across_grid() {
        let weights = ScoreWeights::new(0.3, 0.7);
        let aggregator = ScoreAggregator::new(weights);
        for ai in (0..=100).step_by(7) {
            for manual in (0..=100).step_by(11) {
                let (ai, manual) = (ai as f64, manual as f64);
                let expected = (weights.ai() * ai + weights.manual() * manual).round() as i32;
                let score = aggregator.aggregate(Some(ai), Some(manual)).ranking_score;
                assert_eq!(score, expected);
                assert!((0..=100).contains(&score));
            }
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let first = equal().aggregate(Some(33.3), Some(66.6));
        let second = equal().aggregate_breakdown(&first.breakdown);
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let scored = equal().aggregate(Some(150.0), Some(-20.0));
        assert_eq!(scored.breakdown.ai_score, Some(100.0));
        assert_eq!(scored.breakdown.manual_score, Some(0.0));
        assert_eq!(scored.ranking_score, 50);

        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 0.0);
    }

    #[test]
    fn missing_manual_score_counts_as_zero() {
        let scored = equal().aggregate(Some(80.0), None);
        assert_eq!(scored.ranking_score, 40);
        assert_eq!(scored.breakdown.manual_score, None);
    }

    #[test]
    fn nothing_evaluated_scores_zero() {
        assert_eq!(equal().aggregate(None, None).ranking_score, 0);
    }

    #[test]
    fn five_point_ratings_rescale_to_percent() {
        let ratings = InterviewerRatings {
            technical: 4.0,
            communication: 5.0,
            problem_solving: 3.0,
        };
        assert!((manual_score_from_ratings(&ratings, RatingScale::FivePoint) - 80.0).abs() < 1e-9);

        let wild = InterviewerRatings {
            technical: 9.0,
            communication: -1.0,
            problem_solving: 5.0,
        };
        let manual = manual_score_from_ratings(&wild, RatingScale::FivePoint);
        assert_eq!(manual, 66.67);
    }

    #[test]
    fn percent_ratings_are_averaged() {
        let ratings = InterviewerRatings {
            technical: 90.0,
            communication: 60.0,
            problem_solving: 120.0,
        };
        let manual = manual_score_from_ratings(&ratings, RatingScale::Percent);
        assert_eq!(manual, 83.33);
    }

    fn application(job_id: Uuid, breakdown: ScoreBreakdown, ranking_score: i32) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id,
            candidate: None,
            status: ApplicationStatus::Interviewed,
            ranking_score,
            score_breakdown: breakdown,
            cover_note: None,
            applied_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ratings_are_folded_into_stored_score() {
        let job_id = Uuid::new_v4();
        let app = application(
            job_id,
            ScoreBreakdown {
                ai_score: Some(60.0),
                manual_score: None,
            },
            30,
        );
        let app_id = app.id;

        let mut store = MockApplicationStore::new();
        store
            .expect_get_application()
            .returning(move |_| Ok(Some(app.clone())));
        store.expect_find_job_scoring().returning(move |id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "Backend Engineer".into(),
                weights: None,
            }))
        });
        store
            .expect_save_scores()
            .withf(move |id, _, scored| {
                *id == app_id
                    && scored.ranking_score == 70
                    && scored.breakdown.manual_score == Some(80.0)
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = ScoringService::new(Arc::new(store), ScoreWeights::default());
        let ratings = InterviewerRatings {
            technical: 4.0,
            communication: 4.0,
            problem_solving: 4.0,
        };
        let updated = service
            .record_manual_ratings(app_id, &ratings, RatingScale::FivePoint)
            .await
            .unwrap();

        assert_eq!(updated.ranking_score, 70);
        assert_eq!(updated.score_breakdown.ai_score, Some(60.0));
    }

    #[tokio::test]
    async fn job_weights_override_default() {
        let job_id = Uuid::new_v4();
        let app = application(
            job_id,
            ScoreBreakdown {
                ai_score: None,
                manual_score: Some(50.0),
            },
            25,
        );

        let mut store = MockApplicationStore::new();
        store
            .expect_get_application()
            .returning(move |_| Ok(Some(app.clone())));
        store.expect_find_job_scoring().returning(|id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "Data Analyst".into(),
                weights: Some(ScoreWeights::new(0.8, 0.2)),
            }))
        });
        store
            .expect_save_scores()
            .withf(|_, _, scored| scored.ranking_score == 90)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = ScoringService::new(Arc::new(store), ScoreWeights::default());
        let updated = service.record_ai_score(Uuid::new_v4(), Some(100.0)).await.unwrap();
        assert_eq!(updated.ranking_score, 90);
    }

    #[tokio::test]
    async fn missing_application_is_not_found() {
        let mut store = MockApplicationStore::new();
        store.expect_get_application().returning(|_| Ok(None));
        store.expect_save_scores().never();

        let service = ScoringService::new(Arc::new(store), ScoreWeights::default());
        let err = service.record_ai_score(Uuid::new_v4(), Some(50.0)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn rescore_only_touches_changed_scores() {
        let job_id = Uuid::new_v4();
        let breakdown = ScoreBreakdown {
            ai_score: Some(100.0),
            manual_score: Some(0.0),
        };
        let stale = application(job_id, breakdown, 50);
        let current = application(job_id, breakdown, 100);
        let apps = vec![stale.clone(), current];
        let stale_id = stale.id;

        let mut store = MockApplicationStore::new();
        store.expect_find_job_scoring().returning(|id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "QA".into(),
                weights: Some(ScoreWeights::new(1.0, 0.0)),
            }))
        });
        store
            .expect_list_for_job()
            .returning(move |_| Ok(apps.clone()));
        store
            .expect_save_scores()
            .withf(move |id, _, scored| *id == stale_id && scored.ranking_score == 100)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = ScoringService::new(Arc::new(store), ScoreWeights::default());
        assert_eq!(service.rescore_job(job_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn gives_up_when_every_write_races() {
        let app = application(Uuid::new_v4(), ScoreBreakdown::default(), 0);
        let app_id = app.id;

        let mut store = MockApplicationStore::new();
        store
            .expect_get_application()
            .times(MAX_WRITE_ATTEMPTS)
            .returning(move |_| Ok(Some(app.clone())));
        store.expect_find_job_scoring().returning(|id| {
            Ok(Some(JobScoring {
                job_id: id,
                title: "SRE".into(),
                weights: None,
            }))
        });
        store
            .expect_save_scores()
            .times(MAX_WRITE_ATTEMPTS)
            .returning(|_, _, _| Ok(false));

        let service = ScoringService::new(Arc::new(store), ScoreWeights::default());
        let err = service.record_ai_score(app_id, Some(70.0)).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    /// Holds the first `racers` reads (single or listed) at a barrier so every
    /// caller works from the same snapshot before anyone writes.
    struct InterleavingStore {
        job: JobScoring,
        application: Mutex<Application>,
        barrier: Barrier,
        racers: usize,
        reads: AtomicUsize,
    }

    impl InterleavingStore {
        fn new(application: Application, racers: usize) -> Self {
            Self {
                job: JobScoring {
                    job_id: application.job_id,
                    title: "Backend Engineer".into(),
                    weights: None,
                },
                application: Mutex::new(application),
                barrier: Barrier::new(racers),
                racers,
                reads: AtomicUsize::new(0),
            }
        }

        fn current(&self) -> Application {
            self.application.lock().unwrap().clone()
        }

        async fn hold_first_reads(&self) {
            if self.reads.fetch_add(1, Ordering::SeqCst) < self.racers {
                self.barrier.wait().await;
            }
        }
    }

    #[async_trait]
    impl ApplicationStore for InterleavingStore {
        async fn find_job_scoring(&self, _job_id: Uuid) -> Result<Option<JobScoring>> {
            Ok(Some(self.job.clone()))
        }

        async fn list_for_job(&self, _job_id: Uuid) -> Result<Vec<Application>> {
            let snapshot = vec![self.current()];
            self.hold_first_reads().await;
            Ok(snapshot)
        }

        async fn get_application(&self, _id: Uuid) -> Result<Option<Application>> {
            let snapshot = self.current();
            self.hold_first_reads().await;
            Ok(Some(snapshot))
        }

        async fn save_scores(
            &self,
            _id: Uuid,
            current: &AggregatedScore,
            next: &AggregatedScore,
        ) -> Result<bool> {
            let mut stored = self.application.lock().unwrap();
            if stored.stored_score() != *current {
                return Ok(false);
            }
            stored.ranking_score = next.ranking_score;
            stored.score_breakdown = next.breakdown;
            Ok(true)
        }
    }

    #[tokio::test]
    async fn concurrent_ai_and_manual_updates_both_survive() {
        let app = application(Uuid::new_v4(), ScoreBreakdown::default(), 0);
        let app_id = app.id;
        let store = Arc::new(InterleavingStore::new(app, 2));
        let service = ScoringService::new(store.clone(), ScoreWeights::default());

        let ratings = InterviewerRatings {
            technical: 5.0,
            communication: 5.0,
            problem_solving: 5.0,
        };
        let (ai, manual) = tokio::join!(
            service.record_ai_score(app_id, Some(90.0)),
            service.record_manual_ratings(app_id, &ratings, RatingScale::FivePoint),
        );
        ai.unwrap();
        manual.unwrap();

        let stored = store.current();
        assert_eq!(stored.score_breakdown.ai_score, Some(90.0));
        assert_eq!(stored.score_breakdown.manual_score, Some(100.0));
        assert_eq!(stored.ranking_score, 95);
    }

    #[tokio::test]
    async fn rescore_keeps_a_score_recorded_meanwhile() {
        let app = application(
            Uuid::new_v4(),
            ScoreBreakdown {
                ai_score: None,
                manual_score: Some(80.0),
            },
            10,
        );
        let app_id = app.id;
        let store = Arc::new(InterleavingStore::new(app, 2));
        let service = ScoringService::new(store.clone(), ScoreWeights::default());

        // The AI write lands between rescore listing and rescore writing.
        let job_id = store.job.job_id;
        let (recorded, rescored) = tokio::join!(
            service.record_ai_score(app_id, Some(60.0)),
            service.rescore_job(job_id),
        );
        recorded.unwrap();
        rescored.unwrap();

        let stored = store.current();
        assert_eq!(stored.score_breakdown.ai_score, Some(60.0));
        assert_eq!(stored.score_breakdown.manual_score, Some(80.0));
        assert_eq!(stored.ranking_score, 70);
    }

    #[test]
    fn fractional_inputs_rescore_to_the_same_value() {
        let ratings = InterviewerRatings {
            technical: 4.0,
            communication: 3.0,
            problem_solving: 3.0,
        };
        let manual = manual_score_from_ratings(&ratings, RatingScale::FivePoint);
        let fresh = equal().aggregate(Some(0.333), Some(manual));

        assert_eq!(fresh.breakdown.ai_score, Some(0.33));
        assert_eq!(fresh.breakdown.manual_score, Some(66.67));
        assert_eq!(equal().aggregate_breakdown(&fresh.breakdown), fresh);
    }
}
