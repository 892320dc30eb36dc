use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::claim::domain::ClaimOutcome;
use crate::claim::granter::RewardGranter;
use crate::claim_log::ClaimLog;
use crate::errors::ServiceError;
use crate::ledger::RewardLedger;

/// Claim service configuration: what every grant delivers.
#[derive(Clone)]
pub struct ClaimConfig {
    pub reward_item: String,
    pub reward_skin_id: u64,
}

/// Orchestrates the claim transition across the ledger, the grant
/// collaborator and the claim log, independent of any host framework.
pub struct ClaimService<G: RewardGranter> {
    ledger: Arc<RewardLedger>,
    log: Arc<ClaimLog>,
    granter: Arc<G>,
    cfg: ClaimConfig,
    // serializes claim transitions so two concurrent calls for the same
    // user cannot both pass the has_reward check
    claim_gate: Mutex<()>,
}

impl<G: RewardGranter> ClaimService<G> {
    pub fn new(
        ledger: Arc<RewardLedger>,
        log: Arc<ClaimLog>,
        granter: Arc<G>,
        cfg: ClaimConfig,
    ) -> Self {
        Self { ledger, log, granter, cfg, claim_gate: Mutex::new(()) }
    }

    /// Convert `user_id`'s pending entitlement into a delivered reward plus
    /// a permanent audit record.
    ///
    /// Effect order: grant, then ledger removal (persisted), then log
    /// append (persisted). The grant lands before either file is touched,
    /// so a failed delivery leaves no bookkeeping behind. A persistence
    /// failure after a successful grant is surfaced to the caller and the
    /// grant is not rolled back; the entry then remains claimable.
    ///
    /// # Examples
    /// ```
    /// use service::claim::domain::ClaimOutcome;
    /// use service::claim::granter::mock::RecordingGranter;
    /// use service::claim::service::{ClaimConfig, ClaimService};
    /// use service::claim_log::ClaimLog;
    /// use service::ledger::RewardLedger;
    /// use std::sync::Arc;
    /// let dir = std::env::temp_dir();
    /// let ledger_path = dir.join(format!("doc_ledger_{}.json", uuid::Uuid::new_v4()));
    /// let log_path = dir.join(format!("doc_log_{}.json", uuid::Uuid::new_v4()));
    /// let (ledger, _) = tokio_test::block_on(RewardLedger::open(&ledger_path)).unwrap();
    /// let (log, _) = tokio_test::block_on(ClaimLog::open(&log_path)).unwrap();
    /// tokio_test::block_on(ledger.set_reward("76561198000000001", 50)).unwrap();
    /// let svc = ClaimService::new(
    ///     ledger,
    ///     log,
    ///     Arc::new(RecordingGranter::new()),
    ///     ClaimConfig { reward_item: "blood".into(), reward_skin_id: 0 },
    /// );
    /// let outcome = tokio_test::block_on(svc.claim_for("76561198000000001")).unwrap();
    /// assert_eq!(outcome, ClaimOutcome::Claimed { amount: 50, item: "blood".into() });
    /// ```
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn claim_for(&self, user_id: &str) -> Result<ClaimOutcome, ServiceError> {
        let _gate = self.claim_gate.lock().await;

        if !self.ledger.has_reward(user_id).await {
            return Ok(ClaimOutcome::NothingToClaim);
        }
        let amount = self.ledger.reward_amount(user_id).await;

        self.granter
            .grant(user_id, &self.cfg.reward_item, amount, self.cfg.reward_skin_id)
            .await?;

        self.ledger.remove_reward(user_id).await?;
        self.log.log_claim(user_id, amount).await?;

        info!(%user_id, amount, item = %self.cfg.reward_item, "reward_claimed");
        Ok(ClaimOutcome::Claimed { amount, item: self.cfg.reward_item.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::granter::mock::RecordingGranter;
    use crate::test_support::temp_json_path;

    async fn setup(
        granter: RecordingGranter,
    ) -> (ClaimService<RecordingGranter>, Arc<RewardLedger>, Arc<ClaimLog>) {
        let (ledger, _) = RewardLedger::open(temp_json_path("claim_svc_ledger"))
            .await
            .expect("open ledger");
        let (log, _) = ClaimLog::open(temp_json_path("claim_svc_log"))
            .await
            .expect("open log");
        let svc = ClaimService::new(
            ledger.clone(),
            log.clone(),
            Arc::new(granter),
            ClaimConfig { reward_item: "blood".into(), reward_skin_id: 0 },
        );
        (svc, ledger, log)
    }

    #[tokio::test]
    async fn grant_failure_leaves_both_documents_untouched() -> Result<(), anyhow::Error> {
        let (svc, ledger, log) = setup(RecordingGranter::failing()).await;
        ledger.set_reward("u1", 10).await?;

        let err = svc.claim_for("u1").await;
        assert!(matches!(err, Err(ServiceError::Grant(_))));

        // delivery failed before bookkeeping: entry intact, nothing logged
        assert!(ledger.has_reward("u1").await);
        assert_eq!(ledger.reward_amount("u1").await, 10);
        assert!(log.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn nothing_to_claim_invokes_no_collaborator() -> Result<(), anyhow::Error> {
        let (svc, _ledger, log) = setup(RecordingGranter::new()).await;
        let outcome = svc.claim_for("ghost").await?;
        assert_eq!(outcome, ClaimOutcome::NothingToClaim);
        assert!(log.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_claims_for_one_user_pay_out_once() -> Result<(), anyhow::Error> {
        let (svc, ledger, log) = setup(RecordingGranter::new()).await;
        ledger.set_reward("u1", 25).await?;

        let svc = Arc::new(svc);
        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.claim_for("u1").await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.claim_for("u1").await }
        });
        let outcomes = [a.await.expect("join")?, b.await.expect("join")?];

        let claimed = outcomes
            .iter()
            .filter(|o| matches!(o, ClaimOutcome::Claimed { .. }))
            .count();
        assert_eq!(claimed, 1);
        assert_eq!(log.len().await, 1);
        Ok(())
    }
}
