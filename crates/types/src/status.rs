use serde::{Deserialize, Serialize};

/// `TaskProjection.status`, matching the on-chain numeric encoding exactly
/// so the wire value can be compared against contract reads directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum TaskStatus {
    None = 0,
    Created = 1,
    Funded = 2,
    Cancelled = 3,
    Completed = 4,
    Closed = 5,
}

impl TaskStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Created),
            2 => Some(Self::Funded),
            3 => Some(Self::Cancelled),
            4 => Some(Self::Completed),
            5 => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// `SubmissionProjection.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum SubmissionStatus {
    None = 0,
    Claimed = 1,
    Submitted = 2,
    Approved = 3,
    Rejected = 4,
    Withdrawn = 5,
    Disputed = 6,
}

impl SubmissionStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Claimed),
            2 => Some(Self::Submitted),
            3 => Some(Self::Approved),
            4 => Some(Self::Rejected),
            5 => Some(Self::Withdrawn),
            6 => Some(Self::Disputed),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// A submission awaiting a final decision (§GLOSSARY "Pending submission").
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Submitted | Self::Disputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_round_trips_through_i16() {
        for v in 0..=5 {
            let status = TaskStatus::from_i16(v).unwrap();
            assert_eq!(status.as_i16(), v);
        }
        assert!(TaskStatus::from_i16(6).is_none());
    }

    #[test]
    fn submission_status_pending_set() {
        assert!(SubmissionStatus::Submitted.is_pending());
        assert!(SubmissionStatus::Disputed.is_pending());
        assert!(!SubmissionStatus::Approved.is_pending());
        assert!(!SubmissionStatus::Claimed.is_pending());
    }
}
