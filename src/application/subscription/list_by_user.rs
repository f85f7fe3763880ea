//! ListSubscriptionsHandler - read-only query over the actor's ledger.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

/// Query for all subscriptions owned by the actor, any status.
#[derive(Debug, Clone)]
pub struct ListSubscriptionsQuery {
    pub user_id: UserId,
}

/// Handler for the list query.
pub struct ListSubscriptionsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListSubscriptionsHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        Ok(self.subscriptions.find_all_by_user(&query.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::foundation::{ShelterId, SubscriptionId};
    use crate::domain::subscription::{SubscriptionStatus, Tier};
    use chrono::NaiveDate;

    fn sub_for(user_id: UserId) -> Subscription {
        Subscription::open(
            SubscriptionId::new(),
            user_id,
            ShelterId::new(),
            Tier::Basic,
            format!("sub_{}", SubscriptionId::new()),
            SubscriptionStatus::Active,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn returns_only_the_actors_subscriptions() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let user_id = UserId::new();

        repo.save(&sub_for(user_id)).await.unwrap();
        repo.save(&sub_for(user_id)).await.unwrap();
        repo.save(&sub_for(UserId::new())).await.unwrap();

        let handler = ListSubscriptionsHandler::new(repo);
        let result = handler.handle(ListSubscriptionsQuery { user_id }).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|s| s.user_id == user_id));
    }

    #[tokio::test]
    async fn includes_canceled_subscriptions() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let user_id = UserId::new();

        let mut sub = sub_for(user_id);
        sub.cancel().unwrap();
        repo.save(&sub).await.unwrap();

        let handler = ListSubscriptionsHandler::new(repo);
        let result = handler.handle(ListSubscriptionsQuery { user_id }).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_canceled());
    }
}
