//! Toggle Engagement Use Case
//!
//! Flips an engagement record between present and absent and projects the
//! net effect onto counters and the author's reputation.
//!
//! The existence check and the write are separate store calls. The unique
//! key decides races: an insert rejected as a duplicate still reports
//! `Added`, a delete that finds nothing still reports `Removed`, and
//! neither writes counters. Every counter write is thus paired with exactly
//! one successful ledger write, so counters match the ledger once writes
//! settle.

use std::sync::Arc;

use kernel::identity::RequestIdentity;
use platform::clock::Clock;
use uuid::Uuid;

use crate::application::projector::CounterProjector;
use crate::domain::entities::{EngagementKey, EngagementRecord};
use crate::domain::repository::{ContentRepository, CounterStore, EngagementLedger};
use crate::domain::services::project;
use crate::domain::value_objects::{ActionType, TargetRef, TargetType, ToggleOutcome};
use crate::error::{EngagementError, EngagementResult};

#[derive(Debug, Clone, Copy)]
pub struct ToggleEngagementInput {
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub action: ActionType,
}

pub struct ToggleEngagementUseCase<L, C, R>
where
    L: EngagementLedger,
    C: CounterStore,
    R: ContentRepository,
{
    ledger: Arc<L>,
    projector: CounterProjector<C>,
    content: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<L, C, R> ToggleEngagementUseCase<L, C, R>
where
    L: EngagementLedger,
    C: CounterStore,
    R: ContentRepository,
{
    pub fn new(ledger: Arc<L>, counters: Arc<C>, content: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            projector: CounterProjector::new(counters),
            content,
            clock,
        }
    }

    pub async fn execute(
        &self,
        identity: &RequestIdentity,
        input: ToggleEngagementInput,
    ) -> EngagementResult<ToggleOutcome> {
        let actor = identity.require_authenticated()?;

        let field = input.target_type.counter_for(input.action).ok_or(
            EngagementError::UnsupportedAction {
                action: input.action,
                target_type: input.target_type,
            },
        )?;

        let target_ref = TargetRef::new(input.target_type, input.target_id);
        let target = self
            .content
            .find_target(&target_ref)
            .await?
            .ok_or(EngagementError::TargetNotFound)?;

        let key = EngagementKey {
            actor_id: actor.user_id,
            target: target_ref,
            action: input.action,
        };

        let (outcome, effective) = if self.ledger.exists(&key).await? {
            let deleted = self.ledger.delete_if_exists(&key).await?;
            (ToggleOutcome::Removed, deleted)
        } else {
            let record = EngagementRecord {
                key,
                created_at: self.clock.now(),
            };
            let inserted = self.ledger.insert_if_absent(&record).await?;
            (ToggleOutcome::Added, inserted)
        };

        if effective {
            let projection = project(&target, field, input.action, outcome);
            self.projector.apply(&projection).await?;
        } else {
            tracing::debug!(
                target_ref = %target_ref,
                action = %input.action,
                ?outcome,
                "Concurrent toggle already applied"
            );
        }

        tracing::info!(
            user_id = %actor.user_id,
            target_ref = %target_ref,
            action = %input.action,
            ?outcome,
            "Engagement toggled"
        );

        Ok(outcome)
    }
}
