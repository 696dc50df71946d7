//! Stock collaborator domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::stock_role::StockRole;

/// A non-owner user granted a role on one stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCollaborator {
    pub stock_id: i64,
    pub user_id: i64,
    pub role: StockRole,
    pub created_at: DateTime<Utc>,
}
