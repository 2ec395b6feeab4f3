use uuid::Uuid;

use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::order::{Order, OrderStatus};
use crate::store::{ExpectedOrder, OrderUpdate};

/// One variant per status-changing operation. Required role, source and
/// target status live here so every caller shares the same guards and the
/// same rejection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Cancel,
    Accept { courier_id: Uuid },
    Deliver { courier_id: Uuid },
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Cancel => "cancel",
            Transition::Accept { .. } => "accept",
            Transition::Deliver { .. } => "deliver",
        }
    }

    pub fn required_role(&self) -> Role {
        match self {
            Transition::Approve | Transition::Cancel => Role::Admin,
            Transition::Accept { .. } | Transition::Deliver { .. } => Role::Courier,
        }
    }

    pub fn source_status(&self) -> OrderStatus {
        match self {
            Transition::Approve | Transition::Cancel => OrderStatus::Pending,
            Transition::Accept { .. } => OrderStatus::Approved,
            Transition::Deliver { .. } => OrderStatus::PickedUp,
        }
    }

    pub fn target_status(&self) -> OrderStatus {
        match self {
            Transition::Approve => OrderStatus::Approved,
            Transition::Cancel => OrderStatus::Cancelled,
            Transition::Accept { .. } => OrderStatus::PickedUp,
            Transition::Deliver { .. } => OrderStatus::Delivered,
        }
    }

    /// Actor guards: role first, then courier verification for accept.
    pub fn authorize_actor(&self, actor: &Actor) -> Result<(), AppError> {
        let required = self.required_role();
        if actor.role != required {
            return Err(AppError::UnauthorizedRole {
                required,
                actual: actor.role,
            });
        }

        if matches!(self, Transition::Accept { .. }) && !actor.verified {
            return Err(AppError::Unverified);
        }

        Ok(())
    }

    /// Order guards. Accept reports a claimed order as `AlreadyAssigned`
    /// whatever its current status; deliver reports a wrong status before a
    /// wrong assignee, so a courier re-delivering their own completed order
    /// sees `IllegalState`.
    pub fn check_order(&self, order: &Order) -> Result<(), AppError> {
        match self {
            Transition::Accept { .. } => {
                if order.courier_id.is_some() {
                    return Err(AppError::AlreadyAssigned);
                }
                self.check_status(order)
            }
            Transition::Deliver { courier_id } => {
                self.check_status(order)?;
                if order.courier_id != Some(*courier_id) {
                    return Err(AppError::NotAssignee);
                }
                Ok(())
            }
            Transition::Approve | Transition::Cancel => self.check_status(order),
        }
    }

    fn check_status(&self, order: &Order) -> Result<(), AppError> {
        if order.status != self.source_status() {
            return Err(AppError::IllegalState {
                expected: self.source_status(),
                actual: order.status,
            });
        }
        Ok(())
    }

    /// Snapshot the conditional update must observe at commit time. Approve,
    /// cancel and accept all require an unassigned order; deliver requires
    /// the acting courier to hold the assignment.
    pub fn expected(&self) -> ExpectedOrder {
        ExpectedOrder {
            status: self.source_status(),
            courier_id: match self {
                Transition::Deliver { courier_id } => Some(*courier_id),
                _ => None,
            },
        }
    }

    pub fn update(&self) -> OrderUpdate {
        OrderUpdate {
            status: self.target_status(),
            courier_id: match self {
                Transition::Accept { courier_id } => Some(*courier_id),
                _ => None,
            },
        }
    }

    /// Names the reason a conditional update lost, given the state read back
    /// after the conflict. The guards that passed before the commit are
    /// re-run against current truth; the one that fails now is the reason.
    pub fn classify_conflict(&self, current: &Order) -> AppError {
        match self.check_order(current) {
            Err(err) => err,
            Ok(()) => AppError::IllegalState {
                expected: self.source_status(),
                actual: current.status,
            },
        }
    }
}
