use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Counts served requests and starts a drain once the budget is spent, so
/// the supervisor restarts the process with fresh memory.
#[derive(Debug)]
pub struct RequestBudget {
    limit: Option<u64>,
    served: AtomicU64,
    drain: CancellationToken,
}

impl RequestBudget {
    /// `max_requests` of zero disables recycling. Otherwise the limit is
    /// `max_requests` plus a random `0..=jitter` so replicas do not restart
    /// in lockstep.
    pub fn new<R: Rng>(max_requests: u64, jitter: u64, rng: &mut R, drain: CancellationToken) -> Self {
        let limit = (max_requests > 0).then(|| max_requests + rng.gen_range(0..=jitter));
        Self {
            limit,
            served: AtomicU64::new(0),
            drain,
        }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    /// Records one finished request. Returns `true` for the request that
    /// exhausted the budget.
    pub fn record(&self) -> bool {
        let served = self.served.fetch_add(1, Ordering::Relaxed) + 1;
        match self.limit {
            Some(limit) if served == limit => {
                tracing::info!(served, limit, "request budget reached, recycling server");
                self.drain.cancel();
                true
            }
            _ => false,
        }
    }
}

pub async fn count_request(
    State(budget): State<Arc<RequestBudget>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    budget.record();
    response
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio_util::sync::CancellationToken;

    use super::RequestBudget;

    #[test]
    fn zero_disables_recycling() {
        let drain = CancellationToken::new();
        let budget = RequestBudget::new(0, 100, &mut StdRng::seed_from_u64(1), drain.clone());
        assert_eq!(budget.limit(), None);
        for _ in 0..5_000 {
            assert!(!budget.record());
        }
        assert!(!drain.is_cancelled());
    }

    #[test]
    fn limit_includes_bounded_jitter() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let budget = RequestBudget::new(1000, 100, &mut rng, CancellationToken::new());
            let limit = budget.limit().unwrap();
            assert!((1000..=1100).contains(&limit));
        }
    }

    #[test]
    fn exhausting_budget_triggers_drain_once() {
        let drain = CancellationToken::new();
        let budget = RequestBudget::new(3, 0, &mut StdRng::seed_from_u64(2), drain.clone());
        assert!(!budget.record());
        assert!(!budget.record());
        assert!(!drain.is_cancelled());
        assert!(budget.record());
        assert!(drain.is_cancelled());
        assert!(!budget.record());
        assert_eq!(budget.served(), 4);
    }
}
