//! Reviewable workflow
//!
//! Leave requests and job applications share the same review pattern: an
//! enumerated status advanced only by an authorized reviewer, recorded
//! together with the processor and a timestamp. This module is the single
//! home for that pattern.

use chrono::Utc;
use sea_orm::prelude::DateTimeUtc;

/// Common surface of a workflow status enum.
pub trait WorkflowStatus: Sized + Copy {
    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;

    /// Whether the item still awaits a decision.
    fn is_pending(&self) -> bool;
}

/// Leave request status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl WorkflowStatus for LeaveStatus {
    fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(LeaveStatus::Pending),
            "Approved" => Some(LeaveStatus::Approved),
            "Rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, LeaveStatus::Pending)
    }
}

/// Job application status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Accepted,
    Rejected,
}

impl WorkflowStatus for ApplicationStatus {
    fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(ApplicationStatus::Pending),
            "Under Review" => Some(ApplicationStatus::UnderReview),
            "Accepted" => Some(ApplicationStatus::Accepted),
            "Rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        // "Under Review" is still open for a decision
        matches!(self, ApplicationStatus::Pending | ApplicationStatus::UnderReview)
    }
}

/// A recorded review decision: the new status plus who decided and when.
#[derive(Clone, Debug)]
pub struct Review {
    pub status: String,
    pub processed_by: i64,
    pub processed_at: DateTimeUtc,
}

impl Review {
    /// Record a decision by `reviewer_id`, stamped with the current time.
    pub fn decide<S: WorkflowStatus>(status: S, reviewer_id: i64) -> Self {
        Self {
            status: status.as_str().to_string(),
            processed_by: reviewer_id,
            processed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_status_round_trip() {
        for s in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert_eq!(LeaveStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(LeaveStatus::parse("Cancelled"), None);
    }

    #[test]
    fn test_application_status_space_in_name() {
        assert_eq!(
            ApplicationStatus::parse("Under Review"),
            Some(ApplicationStatus::UnderReview)
        );
        assert_eq!(ApplicationStatus::UnderReview.as_str(), "Under Review");
    }

    #[test]
    fn test_pending_predicates() {
        assert!(LeaveStatus::Pending.is_pending());
        assert!(!LeaveStatus::Approved.is_pending());
        assert!(ApplicationStatus::UnderReview.is_pending());
        assert!(!ApplicationStatus::Rejected.is_pending());
    }

    #[test]
    fn test_decide_records_reviewer() {
        let review = Review::decide(LeaveStatus::Approved, 42);
        assert_eq!(review.status, "Approved");
        assert_eq!(review.processed_by, 42);
    }
}
