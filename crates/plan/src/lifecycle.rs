use habita_shared::plan::{Plan, PlanStatus};
use strum::{AsRefStr, Display};

#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Lifecycle {
    None,
    Pending,
    Applied,
}

/// How a mutation reaches the plan.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum MutationPath {
    /// Applied to the draft right away.
    Local,
    /// Confirmed by the server before it touches the in-memory plan.
    Remote,
}

impl Lifecycle {
    pub fn of(plan: Option<&Plan>) -> Self {
        match plan.map(|p| p.status) {
            None => Lifecycle::None,
            Some(PlanStatus::Pending) => Lifecycle::Pending,
            Some(PlanStatus::Applied) => Lifecycle::Applied,
        }
    }

    pub fn mutation_path(self) -> Option<MutationPath> {
        match self {
            Lifecycle::None => None,
            Lifecycle::Pending => Some(MutationPath::Local),
            Lifecycle::Applied => Some(MutationPath::Remote),
        }
    }

    pub fn can_generate(self) -> bool {
        self == Lifecycle::None
    }

    pub fn can_regenerate(self) -> bool {
        self != Lifecycle::None
    }

    pub fn can_apply(self) -> bool {
        self == Lifecycle::Pending
    }

    pub fn can_discard(self) -> bool {
        self == Lifecycle::Pending
    }

    /// State after the server answered an apply request.
    pub fn after_apply(self, assignments_created: u32) -> Self {
        match self {
            Lifecycle::Pending if assignments_created > 0 => Lifecycle::Applied,
            other => other,
        }
    }
}

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ConfirmAction {
    Discard,
    Regenerate,
}

impl ConfirmAction {
    /// Discarding asks twice.
    pub fn required_acknowledgements(self) -> u8 {
        match self {
            ConfirmAction::Discard => 2,
            ConfirmAction::Regenerate => 1,
        }
    }

    pub fn prompt(self, step: u8) -> &'static str {
        match (self, step) {
            (ConfirmAction::Discard, 0) => "Discard this plan?",
            (ConfirmAction::Discard, _) => {
                "This deletes the generated plan and cannot be undone. Discard anyway?"
            }
            (ConfirmAction::Regenerate, _) => "Replace the current plan with a new one?",
        }
    }
}

/// Consent collected from the user before a destructive transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    action: ConfirmAction,
    acknowledgements: u8,
}

impl Confirmation {
    pub fn request(action: ConfirmAction) -> Self {
        Self {
            action,
            acknowledgements: 0,
        }
    }

    /// Fully acknowledged confirmation, for callers that already asked.
    pub fn granted(action: ConfirmAction) -> Self {
        Self {
            action,
            acknowledgements: action.required_acknowledgements(),
        }
    }

    pub fn acknowledge(mut self) -> Self {
        self.acknowledgements = self.acknowledgements.saturating_add(1);
        self
    }

    pub fn action(&self) -> ConfirmAction {
        self.action
    }

    pub fn next_prompt(&self) -> Option<&'static str> {
        if self.is_confirmed() {
            return None;
        }

        Some(self.action.prompt(self.acknowledgements))
    }

    pub fn is_confirmed(&self) -> bool {
        self.acknowledgements >= self.action.required_acknowledgements()
    }

    pub fn confirms(&self, action: ConfirmAction) -> bool {
        self.action == action && self.is_confirmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_follows_status() {
        assert_eq!(Lifecycle::None.mutation_path(), None);
        assert_eq!(Lifecycle::Pending.mutation_path(), Some(MutationPath::Local));
        assert_eq!(Lifecycle::Applied.mutation_path(), Some(MutationPath::Remote));
    }

    #[test]
    fn test_apply_needs_created_assignments() {
        assert_eq!(Lifecycle::Pending.after_apply(0), Lifecycle::Pending);
        assert_eq!(Lifecycle::Pending.after_apply(3), Lifecycle::Applied);
        assert_eq!(Lifecycle::None.after_apply(3), Lifecycle::None);
    }

    #[test]
    fn test_discard_needs_two_acknowledgements() {
        let confirmation = Confirmation::request(ConfirmAction::Discard);
        assert!(!confirmation.is_confirmed());
        assert_eq!(confirmation.next_prompt(), Some("Discard this plan?"));

        let confirmation = confirmation.acknowledge();
        assert!(!confirmation.confirms(ConfirmAction::Discard));

        let confirmation = confirmation.acknowledge();
        assert!(confirmation.confirms(ConfirmAction::Discard));
        assert!(!confirmation.confirms(ConfirmAction::Regenerate));
        assert_eq!(confirmation.next_prompt(), None);
    }

    #[test]
    fn test_regenerate_needs_one_acknowledgement() {
        let confirmation = Confirmation::request(ConfirmAction::Regenerate).acknowledge();
        assert!(confirmation.confirms(ConfirmAction::Regenerate));
    }
}
