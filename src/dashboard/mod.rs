//! Dashboard module
//!
//! Provides an overview page and a JSON endpoint with the sales, deposit and
//! balance totals for a month, plus the most recent transactions.

mod cards;
mod handlers;
mod stats;
mod tables;

pub use handlers::{
    DashboardResponse, DashboardState, get_dashboard_page, get_dashboard_stats_endpoint,
};
pub use stats::{DashboardStats, dashboard_stats};
