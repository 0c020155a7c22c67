//! Counter Projector
//!
//! Applies a [`Projection`] to the store: one counter write and, for actions
//! that carry reputation, one write to the author's score. The two writes
//! are independent single-row increments; a failure between them leaves the
//! reputation behind the counter and is reported as a persistence failure.

use std::sync::Arc;

use crate::domain::repository::CounterStore;
use crate::domain::services::Projection;
use crate::error::EngagementResult;

pub struct CounterProjector<C>
where
    C: CounterStore,
{
    counters: Arc<C>,
}

impl<C> CounterProjector<C>
where
    C: CounterStore,
{
    pub fn new(counters: Arc<C>) -> Self {
        Self { counters }
    }

    pub async fn apply(&self, projection: &Projection) -> EngagementResult<()> {
        self.counters
            .increment_counter(&projection.target, projection.field, projection.counter_delta)
            .await?;

        if projection.carries_reputation() {
            self.counters
                .adjust_reputation(&projection.author_id, projection.reputation_delta)
                .await?;
        }

        Ok(())
    }
}
