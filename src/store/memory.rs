use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::order::Order;
use crate::store::{ExpectedOrder, OrderFilter, OrderSort, OrderStore, OrderUpdate, StoreError};

/// In-memory backend over a `DashMap`. `conditional_update` checks and
/// writes while holding the entry guard, which serializes concurrent claims
/// on the same order within this process.
#[derive(Default)]
pub struct MemoryStore {
    orders: DashMap<Uuid, Order>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Order, StoreError> {
        self.orders
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn find(&self, filter: OrderFilter, sort: OrderSort) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        sort.apply(&mut orders);
        Ok(orders)
    }

    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        match self.orders.entry(order.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(order.id)),
            Entry::Vacant(slot) => {
                slot.insert(order);
                Ok(())
            }
        }
    }

    async fn conditional_update(
        &self,
        id: Uuid,
        expected: ExpectedOrder,
        update: OrderUpdate,
    ) -> Result<Order, StoreError> {
        let mut entry = self.orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let order = entry.value_mut();

        if order.status != expected.status || order.courier_id != expected.courier_id {
            return Err(StoreError::Conflict(id));
        }

        order.status = update.status;
        if let Some(courier_id) = update.courier_id {
            order.courier_id = Some(courier_id);
        }
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::models::order::{Location, Order, OrderStatus};
    use crate::store::{
        CourierSelector, ExpectedOrder, OrderFilter, OrderSort, OrderStore, OrderUpdate, StoreError,
    };

    fn location(address: &str) -> Location {
        Location {
            address: address.to_string(),
            coords: None,
        }
    }

    fn order(customer_seed: u128) -> Order {
        Order::new(
            Uuid::from_u128(customer_seed),
            "parcel".to_string(),
            location("A St"),
            location("B Ave"),
        )
    }

    #[tokio::test]
    async fn insert_and_find_by_id() {
        let store = MemoryStore::new();
        let order = order(1);

        store.insert(order.clone()).await.unwrap();

        let found = store.find_by_id(order.id).await.unwrap();
        assert_eq!(found.id, order.id);
        assert_eq!(found.status, OrderStatus::Pending);
        assert!(found.courier_id.is_none());
    }

    #[tokio::test]
    async fn find_by_id_missing_returns_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::from_u128(99);

        let result = store.find_by_id(id).await;
        assert!(matches!(result, Err(StoreError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let order = order(1);

        store.insert(order.clone()).await.unwrap();
        let result = store.insert(order.clone()).await;

        assert!(matches!(result, Err(StoreError::Duplicate(id)) if id == order.id));
    }

    #[tokio::test]
    async fn find_applies_filter_and_sort() {
        let store = MemoryStore::new();
        let customer = Uuid::from_u128(7);
        let courier = Uuid::from_u128(8);
        let base = Utc::now();

        let mut first = order(7);
        first.customer_id = customer;
        first.created_at = base - Duration::seconds(30);

        let mut second = order(7);
        second.customer_id = customer;
        second.created_at = base - Duration::seconds(10);

        let mut claimed = order(9);
        claimed.status = OrderStatus::PickedUp;
        claimed.courier_id = Some(courier);

        store.insert(first.clone()).await.unwrap();
        store.insert(second.clone()).await.unwrap();
        store.insert(claimed.clone()).await.unwrap();

        let pending = store
            .find(
                OrderFilter {
                    status: Some(OrderStatus::Pending),
                    ..OrderFilter::default()
                },
                OrderSort::CreatedAsc,
            )
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, first.id);
        assert_eq!(pending[1].id, second.id);

        let newest_first = store
            .find(
                OrderFilter {
                    customer_id: Some(customer),
                    ..OrderFilter::default()
                },
                OrderSort::CreatedDesc,
            )
            .await
            .unwrap();
        assert_eq!(newest_first[0].id, second.id);
        assert_eq!(newest_first[1].id, first.id);

        let unassigned = store
            .find(
                OrderFilter {
                    courier: Some(CourierSelector::Unassigned),
                    ..OrderFilter::default()
                },
                OrderSort::CreatedAsc,
            )
            .await
            .unwrap();
        assert_eq!(unassigned.len(), 2);

        let mine = store
            .find(
                OrderFilter {
                    courier: Some(CourierSelector::Assigned(courier)),
                    ..OrderFilter::default()
                },
                OrderSort::UpdatedDesc,
            )
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, claimed.id);
    }

    #[tokio::test]
    async fn conditional_update_commits_when_snapshot_matches() {
        let store = MemoryStore::new();
        let courier = Uuid::from_u128(5);
        let mut approved = order(1);
        approved.status = OrderStatus::Approved;
        let before = approved.updated_at;

        store.insert(approved.clone()).await.unwrap();

        let updated = store
            .conditional_update(
                approved.id,
                ExpectedOrder {
                    status: OrderStatus::Approved,
                    courier_id: None,
                },
                OrderUpdate {
                    status: OrderStatus::PickedUp,
                    courier_id: Some(courier),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::PickedUp);
        assert_eq!(updated.courier_id, Some(courier));
        assert!(updated.updated_at >= before);
    }

    #[tokio::test]
    async fn conditional_update_conflicts_when_snapshot_is_stale() {
        let store = MemoryStore::new();
        let approved = {
            let mut order = order(1);
            order.status = OrderStatus::Approved;
            order
        };
        store.insert(approved.clone()).await.unwrap();

        let expected = ExpectedOrder {
            status: OrderStatus::Approved,
            courier_id: None,
        };
        let claim = |courier: u128| OrderUpdate {
            status: OrderStatus::PickedUp,
            courier_id: Some(Uuid::from_u128(courier)),
        };

        store
            .conditional_update(approved.id, expected, claim(21))
            .await
            .unwrap();

        let second = store
            .conditional_update(approved.id, expected, claim(22))
            .await;
        assert!(matches!(second, Err(StoreError::Conflict(id)) if id == approved.id));

        let current = store.find_by_id(approved.id).await.unwrap();
        assert_eq!(current.courier_id, Some(Uuid::from_u128(21)));
        assert_eq!(current.status, OrderStatus::PickedUp);
    }

    #[tokio::test]
    async fn conditional_update_missing_order_returns_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::from_u128(42);

        let result = store
            .conditional_update(
                id,
                ExpectedOrder {
                    status: OrderStatus::Pending,
                    courier_id: None,
                },
                OrderUpdate {
                    status: OrderStatus::Approved,
                    courier_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::NotFound(got)) if got == id));
    }
}
