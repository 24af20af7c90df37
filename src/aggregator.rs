use std::collections::HashMap;

use crate::models::{SalesOrder, SalesOrderItem};

/// Folds flat `(order, item)` join rows into one order per `order_id`.
///
/// Orders come out in the order their id was first seen, and the first row of
/// each id supplies the header fields. Items are appended in arrival order;
/// a `None` item (outer join without a match) contributes nothing, so an order
/// without lines still appears with an empty `items` list. Rows for the same
/// order do not need to be adjacent.
pub fn aggregate(pairs: Vec<(SalesOrder, Option<SalesOrderItem>)>) -> Vec<SalesOrder> {
    let mut orders: Vec<SalesOrder> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for (order, item) in pairs {
        let position = match positions.get(&order.order_id) {
            Some(&position) => position,
            None => {
                positions.insert(order.order_id, orders.len());
                orders.push(SalesOrder {
                    items: Vec::new(),
                    ..order
                });
                orders.len() - 1
            }
        };

        if let (Some(item), Some(target)) = (item, orders.get_mut(position)) {
            target.items.push(item);
        }
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::aggregate;
    use crate::models::{OrderStatus, SalesOrder, SalesOrderItem};

    fn order(id: i32) -> SalesOrder {
        SalesOrder {
            order_id: id,
            ..Default::default()
        }
    }

    fn item(order_id: i32, detail_id: i64) -> SalesOrderItem {
        SalesOrderItem {
            order_id,
            detail_id,
            ..Default::default()
        }
    }

    fn detail_ids(order: &SalesOrder) -> Vec<i64> {
        order.items.iter().map(|i| i.detail_id).collect()
    }

    #[test]
    fn groups_items_under_their_order() {
        let pairs = vec![
            (order(1), Some(item(1, 10))),
            (order(1), Some(item(1, 11))),
            (order(2), Some(item(2, 20))),
        ];

        let orders = aggregate(pairs);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 1);
        assert_eq!(detail_ids(&orders[0]), vec![10, 11]);
        assert_eq!(orders[1].order_id, 2);
        assert_eq!(detail_ids(&orders[1]), vec![20]);
    }

    #[test]
    fn empty_input_yields_no_orders() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn order_without_items_keeps_empty_list() {
        let orders = aggregate(vec![(order(7), None)]);

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, 7);
        assert!(orders[0].items.is_empty());
    }

    #[test]
    fn interleaved_rows_are_grouped_in_first_seen_order() {
        let pairs = vec![
            (order(2), Some(item(2, 20))),
            (order(1), Some(item(1, 10))),
            (order(2), Some(item(2, 21))),
            (order(1), Some(item(1, 11))),
        ];

        let orders = aggregate(pairs);

        let ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(detail_ids(&orders[0]), vec![20, 21]);
        assert_eq!(detail_ids(&orders[1]), vec![10, 11]);
    }

    #[test]
    fn first_header_row_wins() {
        let first = SalesOrder {
            status: OrderStatus::Approved,
            ..order(3)
        };
        let later = SalesOrder {
            status: OrderStatus::Shipped,
            ..order(3)
        };

        let orders = aggregate(vec![(first, Some(item(3, 30))), (later, Some(item(3, 31)))]);

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Approved);
        assert_eq!(detail_ids(&orders[0]), vec![30, 31]);
    }

    #[test]
    fn items_already_on_the_header_row_are_discarded() {
        let mut stale = order(4);
        stale.items.push(item(4, 99));

        let orders = aggregate(vec![(stale, Some(item(4, 40)))]);

        assert_eq!(detail_ids(&orders[0]), vec![40]);
    }
}
