// core/src/dashboard.rs

//! Aggregates for the admin dashboard.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Order, OrderItem, OrderStatus};
use crate::pricing::div_round;

pub const TOP_PRODUCTS_LIMIT: usize = 5;
const TOP_PRODUCT_NAME_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
  pub day: NaiveDate,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAmount {
  pub day: NaiveDate,
  pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
  pub status: OrderStatus,
  pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
  pub name: String,
  pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
  pub total: usize,
  pub pending: usize,
  pub completed: usize,
  pub rejected: usize,
  /// Sum of completed order totals.
  pub revenue: i64,
  pub average_order: i64,
  pub orders_over_time: Vec<DayCount>,
  pub revenue_over_time: Vec<DayAmount>,
  pub status_distribution: Vec<StatusSlice>,
  pub top_products: Vec<TopProduct>,
}

pub fn compute(orders: &[Order], items: &[OrderItem]) -> DashboardStats {
  let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
  let pending = count(OrderStatus::Pending);
  let completed = count(OrderStatus::Completed);
  let rejected = count(OrderStatus::Rejected);

  let revenue: i64 = orders
    .iter()
    .filter(|o| o.status == OrderStatus::Completed)
    .fold(0i64, |total, o| total.saturating_add(o.total_amount));
  let average_order = if completed > 0 {
    div_round(revenue, completed as i64)
  } else {
    0
  };

  let mut orders_by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
  let mut revenue_by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
  for order in orders {
    let day = order.created_at.date_naive();
    *orders_by_day.entry(day).or_insert(0) += 1;
    if order.status == OrderStatus::Completed {
      let amount = revenue_by_day.entry(day).or_insert(0);
      *amount = amount.saturating_add(order.total_amount);
    }
  }

  let status_distribution = [
    (OrderStatus::Pending, pending),
    (OrderStatus::Completed, completed),
    (OrderStatus::Rejected, rejected),
  ]
  .into_iter()
  .filter(|(_, value)| *value > 0)
  .map(|(status, value)| StatusSlice { status, value })
  .collect();

  DashboardStats {
    total: orders.len(),
    pending,
    completed,
    rejected,
    revenue,
    average_order,
    orders_over_time: orders_by_day
      .into_iter()
      .map(|(day, count)| DayCount { day, count })
      .collect(),
    revenue_over_time: revenue_by_day
      .into_iter()
      .map(|(day, amount)| DayAmount { day, amount })
      .collect(),
    status_distribution,
    top_products: top_products(items, TOP_PRODUCTS_LIMIT),
  }
}

/// Products ranked by units sold. Equal quantities are ordered by name.
pub fn top_products(items: &[OrderItem], limit: usize) -> Vec<TopProduct> {
  let mut totals: HashMap<&str, u64> = HashMap::new();
  for item in items {
    *totals.entry(item.product_name.as_str()).or_insert(0) += u64::from(item.quantity);
  }
  let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
  ranked
    .into_iter()
    .take(limit)
    .map(|(name, quantity)| TopProduct {
      name: shorten(name),
      quantity,
    })
    .collect()
}

fn shorten(name: &str) -> String {
  if name.chars().count() > TOP_PRODUCT_NAME_CHARS {
    let head: String = name.chars().take(TOP_PRODUCT_NAME_CHARS).collect();
    format!("{}…", head)
  } else {
    name.to_string()
  }
}
