//! # Budget Requests
//!
//! Requests to spend against an account code, and their one-time approval.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Budget Request Lifecycle                             │
//! │                                                                         │
//! │  BudgetRequest::new(..)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   PENDING ──── apply_edit(..) ───► PENDING   (editable, deletable)      │
//! │       │                                                                 │
//! │       │ decide(ApprovalDecision)                                        │
//! │       │                                                                 │
//! │       ├──────────────► APPROVED  + Approval record                      │
//! │       └──────────────► REJECTED  + Approval record                      │
//! │                                                                         │
//! │  APPROVED / REJECTED are final: edit and decide both fail.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::generate_id;

// =============================================================================
// Budget Status
// =============================================================================

/// Status of a budget request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl BudgetStatus {
    /// Human-readable label for status badges.
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::Pending => "Awaiting approval",
            BudgetStatus::Approved => "Approved",
            BudgetStatus::Rejected => "Rejected",
        }
    }

    /// True once a decision has been recorded.
    pub fn is_final(self) -> bool {
        !matches!(self, BudgetStatus::Pending)
    }
}

// =============================================================================
// Material Item
// =============================================================================

/// One line of the material list attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialItem {
    pub item: String,
    pub quantity: u32,
}

// =============================================================================
// Budget Request
// =============================================================================

/// A budget request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub id: String,
    /// Business identifier shown on printouts.
    pub request_no: String,
    pub requester: String,
    #[ts(as = "String")]
    pub request_date: NaiveDate,
    pub account_code: String,
    pub account_name: Option<String>,
    pub amount: f64,
    pub material_list: Vec<MaterialItem>,
    pub note: Option<String>,
    pub status: BudgetStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or editing a budget request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetRequest {
    pub request_no: String,
    pub requester: String,
    #[ts(as = "String")]
    pub request_date: NaiveDate,
    pub account_code: String,
    pub account_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub material_list: Vec<MaterialItem>,
    pub note: Option<String>,
}

/// An approver's verdict on a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDecision {
    pub approver_name: String,
    /// `APPROVED` or `REJECTED`.
    pub decision: BudgetStatus,
    pub remark: Option<String>,
}

/// The recorded outcome of a budget request. One per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: String,
    pub request_id: String,
    pub approver_name: String,
    pub decision: BudgetStatus,
    pub remark: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BudgetRequest {
    /// Creates a PENDING request with a generated id.
    pub fn new(data: NewBudgetRequest) -> Self {
        let now = Utc::now();
        BudgetRequest {
            id: generate_id(),
            request_no: data.request_no,
            requester: data.requester,
            request_date: data.request_date,
            account_code: data.account_code,
            account_name: data.account_name,
            amount: data.amount,
            material_list: data.material_list,
            note: data.note,
            status: BudgetStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Only pending requests may be edited or deleted.
    pub fn can_edit(&self) -> bool {
        self.status == BudgetStatus::Pending
    }

    /// Replaces the editable fields of a pending request.
    pub fn apply_edit(&mut self, data: NewBudgetRequest) -> CoreResult<()> {
        self.ensure_pending("edit")?;

        self.request_no = data.request_no;
        self.requester = data.requester;
        self.request_date = data.request_date;
        self.account_code = data.account_code;
        self.account_name = data.account_name;
        self.amount = data.amount;
        self.material_list = data.material_list;
        self.note = data.note;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records the approver's decision and moves the request to its final
    /// status.
    pub fn decide(&mut self, decision: ApprovalDecision) -> CoreResult<Approval> {
        if !decision.decision.is_final() {
            return Err(CoreError::InvalidDecision(decision.decision));
        }
        if decision.approver_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "approver_name".to_string(),
            }
            .into());
        }
        self.ensure_pending("decide")?;

        let now = Utc::now();
        self.status = decision.decision;
        self.updated_at = now;

        Ok(Approval {
            id: generate_id(),
            request_id: self.id.clone(),
            approver_name: decision.approver_name.trim().to_string(),
            decision: decision.decision,
            remark: decision.remark.filter(|r| !r.trim().is_empty()),
            created_at: now,
        })
    }

    /// Total units across the material list.
    pub fn material_units(&self) -> u64 {
        self.material_list.iter().map(|m| u64::from(m.quantity)).sum()
    }

    fn ensure_pending(&self, operation: &'static str) -> CoreResult<()> {
        if self.can_edit() {
            Ok(())
        } else {
            Err(CoreError::InvalidBudgetStatus {
                request_no: self.request_no.clone(),
                status: self.status,
                operation,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewBudgetRequest {
        NewBudgetRequest {
            request_no: "BR-2024-001".to_string(),
            requester: "Somchai".to_string(),
            request_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            account_code: "5101".to_string(),
            account_name: Some("Office supplies".to_string()),
            amount: 12500.0,
            material_list: vec![
                MaterialItem {
                    item: "A4 paper".to_string(),
                    quantity: 20,
                },
                MaterialItem {
                    item: "Toner".to_string(),
                    quantity: 2,
                },
            ],
            note: None,
        }
    }

    fn decision(status: BudgetStatus) -> ApprovalDecision {
        ApprovalDecision {
            approver_name: "Director".to_string(),
            decision: status,
            remark: Some("ok".to_string()),
        }
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = BudgetRequest::new(payload());
        assert_eq!(request.status, BudgetStatus::Pending);
        assert!(request.can_edit());
        assert_eq!(request.material_units(), 22);
    }

    #[test]
    fn test_approve() {
        let mut request = BudgetRequest::new(payload());
        let approval = request.decide(decision(BudgetStatus::Approved)).unwrap();

        assert_eq!(request.status, BudgetStatus::Approved);
        assert_eq!(approval.request_id, request.id);
        assert_eq!(approval.decision, BudgetStatus::Approved);
        assert_eq!(approval.remark.as_deref(), Some("ok"));
        assert!(!request.can_edit());
    }

    #[test]
    fn test_reject_is_final() {
        let mut request = BudgetRequest::new(payload());
        request.decide(decision(BudgetStatus::Rejected)).unwrap();

        let err = request.decide(decision(BudgetStatus::Approved)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBudgetStatus { status: BudgetStatus::Rejected, .. }));

        let err = request.apply_edit(payload()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBudgetStatus { operation: "edit", .. }));
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let mut request = BudgetRequest::new(payload());
        let err = request.decide(decision(BudgetStatus::Pending)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDecision(BudgetStatus::Pending)));
        assert_eq!(request.status, BudgetStatus::Pending);
    }

    #[test]
    fn test_decision_requires_approver() {
        let mut request = BudgetRequest::new(payload());
        let mut d = decision(BudgetStatus::Approved);
        d.approver_name = "  ".to_string();
        assert!(matches!(request.decide(d), Err(CoreError::Validation(_))));
        assert!(request.can_edit());
    }

    #[test]
    fn test_blank_remark_dropped() {
        let mut request = BudgetRequest::new(payload());
        let mut d = decision(BudgetStatus::Approved);
        d.remark = Some("   ".to_string());
        assert_eq!(request.decide(d).unwrap().remark, None);
    }

    #[test]
    fn test_edit_pending_request() {
        let mut request = BudgetRequest::new(payload());
        let mut edited = payload();
        edited.amount = 9000.0;
        edited.material_list.clear();

        request.apply_edit(edited).unwrap();
        assert_eq!(request.amount, 9000.0);
        assert!(request.material_list.is_empty());
        assert_eq!(request.status, BudgetStatus::Pending);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&BudgetStatus::Approved).unwrap(), "\"APPROVED\"");
        assert_eq!(BudgetStatus::Pending.label(), "Awaiting approval");
    }
}
