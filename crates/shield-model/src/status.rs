//! # Lifecycle Statuses
//!
//! Closed status sets carried by tickets, ticket items, and forensic
//! evidence. Entities only guarantee that the current value is a member of
//! its set; moving between statuses is the caller's business. The legal
//! successor sets are published as data through `successors()` so callers
//! can enforce transitions without re-deriving them.

closed_set! {
    /// Status of a blocking ticket.
    ///
    /// `creating → created → open → closed`, with `failed` reachable from
    /// every non-terminal status. New tickets start in `created`.
    pub enum TicketStatus("ticket status") {
        /// Submitted, items not yet dispatched.
        Creating => "creating",
        /// Items dispatched to providers.
        Created => "created",
        /// Inside the processing window.
        Open => "open",
        /// Processing window elapsed.
        Closed => "closed",
        /// Creation or dispatch failed.
        Failed => "failed",
    }
}

impl TicketStatus {
    /// Statuses a ticket may move to from this one.
    pub fn successors(&self) -> &'static [TicketStatus] {
        match self {
            Self::Creating => &[Self::Created, Self::Failed],
            Self::Created => &[Self::Open, Self::Failed],
            Self::Open => &[Self::Closed, Self::Failed],
            Self::Closed | Self::Failed => &[],
        }
    }

    /// True when no further transition exists.
    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

closed_set! {
    /// Status of a single ticket item as reported by a provider.
    pub enum TicketItemStatus("ticket item status") {
        /// Awaiting provider action.
        Pending => "pending",
        /// Blocked by the provider.
        Processed => "processed",
        /// Not blocked; a reason accompanies the report.
        Unprocessed => "unprocessed",
        /// Block lifted.
        Unblocked => "unblocked",
    }
}

impl TicketItemStatus {
    /// Statuses an item may move to from this one.
    pub fn successors(&self) -> &'static [TicketItemStatus] {
        match self {
            Self::Pending => &[Self::Processed, Self::Unprocessed, Self::Unblocked],
            Self::Processed | Self::Unprocessed | Self::Unblocked => &[],
        }
    }
}

closed_set! {
    /// Status of forensic evidence under review.
    pub enum ForensicStatus("forensic status") {
        /// Hash submitted, archive not yet requested.
        Pending => "pending",
        /// Archive upload scheduled.
        Scheduled => "scheduled",
        /// Under analysis.
        InProgress => "in progress",
        /// Evidence accepted.
        Approved => "approved",
        /// Evidence rejected.
        Rejected => "rejected",
    }
}

impl ForensicStatus {
    /// Statuses evidence may move to from this one.
    pub fn successors(&self) -> &'static [ForensicStatus] {
        match self {
            Self::Pending | Self::Scheduled => &[Self::InProgress],
            Self::InProgress => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_status_wire_forms() {
        let wire: Vec<&str> = TicketStatus::all().iter().map(|s| s.as_str()).collect();
        assert_eq!(wire, vec!["creating", "created", "open", "closed", "failed"]);
    }

    #[test]
    fn ticket_status_roundtrip() {
        for status in TicketStatus::all() {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), *status);
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn unknown_status_is_rejected_not_coerced() {
        let err = "CREATED".parse::<TicketStatus>().unwrap_err();
        assert_eq!(err.kind, "ticket status");
        assert!("".parse::<TicketItemStatus>().is_err());
        assert!("in_progress".parse::<ForensicStatus>().is_err());
    }

    #[test]
    fn forensic_in_progress_keeps_space() {
        assert_eq!(ForensicStatus::InProgress.as_str(), "in progress");
        assert_eq!("in progress".parse::<ForensicStatus>().unwrap(), ForensicStatus::InProgress);
    }

    #[test]
    fn failed_reachable_from_every_live_ticket_status() {
        for status in [TicketStatus::Creating, TicketStatus::Created, TicketStatus::Open] {
            assert!(status.successors().contains(&TicketStatus::Failed));
        }
        assert!(TicketStatus::Closed.is_terminal());
        assert!(TicketStatus::Failed.is_terminal());
    }

    #[test]
    fn pending_item_fans_out() {
        assert_eq!(TicketItemStatus::Pending.successors().len(), 3);
        assert!(TicketItemStatus::Processed.successors().is_empty());
    }

    #[test]
    fn forensic_review_ends_in_verdict() {
        assert_eq!(ForensicStatus::Scheduled.successors(), &[ForensicStatus::InProgress]);
        assert_eq!(
            ForensicStatus::InProgress.successors(),
            &[ForensicStatus::Approved, ForensicStatus::Rejected]
        );
    }
}
