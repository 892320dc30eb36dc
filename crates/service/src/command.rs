use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::claim::domain::ClaimOutcome;
use crate::claim::granter::RewardGranter;
use crate::claim::service::ClaimService;
use crate::errors::ServiceError;
use crate::messages::MessageCatalog;

/// Authorization collaborator consulted before a claim is attempted.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn has_permission(&self, user_id: &str) -> bool;
}

/// Permission checkers for tests and permissive hosts
pub mod mock {
    use super::*;
    use std::collections::HashSet;

    /// Grants everyone.
    pub struct AllowAll;

    #[async_trait]
    impl PermissionChecker for AllowAll {
        async fn has_permission(&self, _user_id: &str) -> bool {
            true
        }
    }

    /// Grants only an explicit set of user ids.
    pub struct AllowList {
        allowed: HashSet<String>,
    }

    impl AllowList {
        pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(ids: I) -> Self {
            Self { allowed: ids.into_iter().map(Into::into).collect() }
        }
    }

    #[async_trait]
    impl PermissionChecker for AllowList {
        async fn has_permission(&self, user_id: &str) -> bool {
            self.allowed.contains(user_id)
        }
    }
}

/// What the host should relay back to the user, with the structured outcome
/// kept alongside the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReply {
    pub outcome: ReplyOutcome,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Claimed { amount: u32, item: String },
    NothingToClaim,
    Denied,
}

/// Thin adapter between the host's claim trigger and the claim service:
/// permission gate first, then the transition, then reply rendering.
pub struct ClaimCommandHandler<G: RewardGranter, P: PermissionChecker> {
    service: Arc<ClaimService<G>>,
    permissions: Arc<P>,
    catalog: MessageCatalog,
}

impl<G: RewardGranter, P: PermissionChecker> ClaimCommandHandler<G, P> {
    pub fn new(service: Arc<ClaimService<G>>, permissions: Arc<P>, catalog: MessageCatalog) -> Self {
        Self { service, permissions, catalog }
    }

    /// Handle one claim trigger for `user_id`. A denied user never reaches
    /// the claim service.
    pub async fn handle_claim(&self, user_id: &str) -> Result<ClaimReply, ServiceError> {
        if !self.permissions.has_permission(user_id).await {
            debug!(%user_id, "claim denied by permission gate");
            return Ok(ClaimReply {
                outcome: ReplyOutcome::Denied,
                message: self.catalog.no_permission(),
            });
        }

        match self.service.claim_for(user_id).await? {
            ClaimOutcome::Claimed { amount, item } => Ok(ClaimReply {
                message: self.catalog.claim_success(amount, &item),
                outcome: ReplyOutcome::Claimed { amount, item },
            }),
            ClaimOutcome::NothingToClaim => Ok(ClaimReply {
                outcome: ReplyOutcome::NothingToClaim,
                message: self.catalog.nothing_to_claim(),
            }),
        }
    }
}
