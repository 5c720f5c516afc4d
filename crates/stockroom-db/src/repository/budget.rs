//! # Budget Repository
//!
//! Budget requests and their approvals.
//!
//! The material list is stored as a JSON array in `budget_requests.material_list`.
//! Status transitions are decided by [`BudgetRequest`] itself; this
//! repository persists the outcome.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use stockroom_core::validation::validate_new_budget_request;
use stockroom_core::{
    Approval, ApprovalDecision, BudgetRequest, BudgetStatus, CoreError, MaterialItem, NewBudgetRequest,
};

const REQUEST_COLUMNS: &str = r#"
    id, request_no, requester, request_date, account_code, account_name,
    amount, material_list, note, status, created_at, updated_at
"#;

/// Row shape of `budget_requests` before the material list is decoded.
#[derive(Debug, sqlx::FromRow)]
struct BudgetRequestRow {
    id: String,
    request_no: String,
    requester: String,
    request_date: NaiveDate,
    account_code: String,
    account_name: Option<String>,
    amount: f64,
    material_list: String,
    note: Option<String>,
    status: BudgetStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BudgetRequestRow> for BudgetRequest {
    type Error = DbError;

    fn try_from(row: BudgetRequestRow) -> DbResult<Self> {
        let material_list: Vec<MaterialItem> = serde_json::from_str(&row.material_list)?;

        Ok(BudgetRequest {
            id: row.id,
            request_no: row.request_no,
            requester: row.requester,
            request_date: row.request_date,
            account_code: row.account_code,
            account_name: row.account_name,
            amount: row.amount,
            material_list,
            note: row.note,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for budget requests and approvals.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.budgets();
///
/// let request = repo.create(payload).await?;
/// let approval = repo.record_decision(&request.id, decision).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    pool: SqlitePool,
}

impl BudgetRepository {
    /// Creates a new BudgetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BudgetRepository { pool }
    }

    /// Lists all requests, newest first.
    pub async fn list(&self) -> DbResult<Vec<BudgetRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM budget_requests ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query_as::<_, BudgetRequestRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(BudgetRequest::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<BudgetRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM budget_requests WHERE id = ?1");
        let row = sqlx::query_as::<_, BudgetRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(BudgetRequest::try_from).transpose()
    }

    /// Validates a payload and stores it as a new PENDING request.
    pub async fn create(&self, data: NewBudgetRequest) -> DbResult<BudgetRequest> {
        validate_new_budget_request(&data)?;
        let request = BudgetRequest::new(data);
        self.insert(&request).await
    }

    /// Inserts a fully-formed request.
    pub async fn insert(&self, request: &BudgetRequest) -> DbResult<BudgetRequest> {
        debug!(id = %request.id, request_no = %request.request_no, "Inserting budget request");

        let material_list = serde_json::to_string(&request.material_list)?;

        sqlx::query(
            r#"
            INSERT INTO budget_requests (
                id, request_no, requester, request_date, account_code, account_name,
                amount, material_list, note, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&request.id)
        .bind(&request.request_no)
        .bind(&request.requester)
        .bind(request.request_date)
        .bind(&request.account_code)
        .bind(&request.account_name)
        .bind(request.amount)
        .bind(material_list)
        .bind(&request.note)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(request.clone())
    }

    /// Replaces the editable fields of a PENDING request.
    ///
    /// ## Returns
    /// * `Err(DbError::Core(CoreError::BudgetRequestNotFound(..)))` - No request with this id
    /// * `Err(DbError::Core(CoreError::InvalidBudgetStatus { .. }))` - Already decided
    pub async fn update(&self, id: &str, data: NewBudgetRequest) -> DbResult<BudgetRequest> {
        validate_new_budget_request(&data)?;

        let mut request = self.require(id).await?;
        request.apply_edit(data)?;

        let material_list = serde_json::to_string(&request.material_list)?;

        let result = sqlx::query(
            r#"
            UPDATE budget_requests SET
                request_no = ?2,
                requester = ?3,
                request_date = ?4,
                account_code = ?5,
                account_name = ?6,
                amount = ?7,
                material_list = ?8,
                note = ?9,
                updated_at = ?10
            WHERE id = ?1 AND status = 'PENDING'
            "#,
        )
        .bind(&request.id)
        .bind(&request.request_no)
        .bind(&request.requester)
        .bind(request.request_date)
        .bind(&request.account_code)
        .bind(&request.account_name)
        .bind(request.amount)
        .bind(material_list)
        .bind(&request.note)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pending budget request", id));
        }

        debug!(id = %id, "Budget request updated");
        Ok(request)
    }

    /// Deletes a PENDING request.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let request = self.require(id).await?;

        if !request.can_edit() {
            return Err(CoreError::InvalidBudgetStatus {
                request_no: request.request_no,
                status: request.status,
                operation: "delete",
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM budget_requests WHERE id = ?1 AND status = 'PENDING'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pending budget request", id));
        }

        info!(id = %id, request_no = %request.request_no, "Budget request deleted");
        Ok(())
    }

    /// Approves or rejects a PENDING request.
    ///
    /// The status change and the approval record are written in one
    /// transaction. A request can be decided once.
    pub async fn record_decision(&self, id: &str, decision: ApprovalDecision) -> DbResult<Approval> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sql = format!("SELECT {REQUEST_COLUMNS} FROM budget_requests WHERE id = ?1");
        let row = sqlx::query_as::<_, BudgetRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::BudgetRequestNotFound(id.to_string()))?;

        let mut request = BudgetRequest::try_from(row)?;
        let approval = request.decide(decision)?;

        sqlx::query("UPDATE budget_requests SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = 'PENDING'")
            .bind(&request.id)
            .bind(request.status)
            .bind(request.updated_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO approvals (id, request_id, approver_name, decision, remark, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&approval.id)
        .bind(&approval.request_id)
        .bind(&approval.approver_name)
        .bind(approval.decision)
        .bind(&approval.remark)
        .bind(approval.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %request.id,
            request_no = %request.request_no,
            decision = ?approval.decision,
            approver = %approval.approver_name,
            "Budget request decided"
        );
        Ok(approval)
    }

    /// Returns the approval recorded for a request, if decided.
    pub async fn approval_for(&self, request_id: &str) -> DbResult<Option<Approval>> {
        let approval = sqlx::query_as::<_, Approval>(
            r#"
            SELECT id, request_id, approver_name, decision, remark, created_at
            FROM approvals
            WHERE request_id = ?1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(approval)
    }

    async fn require(&self, id: &str) -> DbResult<BudgetRequest> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::BudgetRequestNotFound(id.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    fn payload(request_no: &str) -> NewBudgetRequest {
        NewBudgetRequest {
            request_no: request_no.to_string(),
            requester: "Somchai".to_string(),
            request_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            account_code: "5101".to_string(),
            account_name: Some("Office supplies".to_string()),
            amount: 12500.0,
            material_list: vec![MaterialItem {
                item: "A4 paper".to_string(),
                quantity: 20,
            }],
            note: None,
        }
    }

    fn decision(status: BudgetStatus) -> ApprovalDecision {
        ApprovalDecision {
            approver_name: "Director".to_string(),
            decision: status,
            remark: Some("within budget".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trips_material_list() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();

        let loaded = db.budgets().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.status, BudgetStatus::Pending);
        assert_eq!(loaded.material_units(), 20);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        db.budgets().create(payload("BR-001")).await.unwrap();
        db.budgets().create(payload("BR-002")).await.unwrap();

        let numbers: Vec<String> = db
            .budgets()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.request_no)
            .collect();
        assert_eq!(numbers, vec!["BR-002", "BR-001"]);
    }

    #[tokio::test]
    async fn test_update_pending() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();

        let mut edited = payload("BR-001");
        edited.amount = 9000.0;
        edited.material_list.clear();

        let updated = db.budgets().update(&created.id, edited).await.unwrap();
        assert_eq!(updated.amount, 9000.0);

        let loaded = db.budgets().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.amount, 9000.0);
        assert!(loaded.material_list.is_empty());
    }

    #[tokio::test]
    async fn test_approve_once() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();

        let approval = db
            .budgets()
            .record_decision(&created.id, decision(BudgetStatus::Approved))
            .await
            .unwrap();
        assert_eq!(approval.request_id, created.id);

        let loaded = db.budgets().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, BudgetStatus::Approved);
        assert_eq!(db.budgets().approval_for(&created.id).await.unwrap(), Some(approval));

        let err = db
            .budgets()
            .record_decision(&created.id, decision(BudgetStatus::Rejected))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidBudgetStatus {
                status: BudgetStatus::Approved,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_decided_request_is_locked() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();
        db.budgets()
            .record_decision(&created.id, decision(BudgetStatus::Rejected))
            .await
            .unwrap();

        assert!(matches!(
            db.budgets().update(&created.id, payload("BR-001")).await,
            Err(DbError::Core(CoreError::InvalidBudgetStatus { operation: "edit", .. }))
        ));
        assert!(matches!(
            db.budgets().delete(&created.id).await,
            Err(DbError::Core(CoreError::InvalidBudgetStatus { operation: "delete", .. }))
        ));
    }

    #[tokio::test]
    async fn test_pending_decision_rejected() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();

        let err = db
            .budgets()
            .record_decision(&created.id, decision(BudgetStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InvalidDecision(_))));
        assert!(db.budgets().approval_for(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_pending_and_missing() {
        let db = test_db().await;
        let created = db.budgets().create(payload("BR-001")).await.unwrap();

        db.budgets().delete(&created.id).await.unwrap();
        assert!(db.budgets().get_by_id(&created.id).await.unwrap().is_none());

        assert!(matches!(
            db.budgets().delete(&created.id).await,
            Err(DbError::Core(CoreError::BudgetRequestNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amount() {
        let db = test_db().await;
        let mut bad = payload("BR-001");
        bad.amount = 0.0;

        assert!(matches!(
            db.budgets().create(bad).await,
            Err(DbError::Core(CoreError::Validation(_)))
        ));
    }
}
