use std::collections::{BTreeMap, BTreeSet, HashSet};

use habita_shared::{
    AssignmentKey,
    api::{AssignmentPatch, PatchAction},
    plan::{Assignment, MANUAL_REASSIGN_REASON, Member, Plan, PlanStatus},
};
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::OffsetDateTime;

/// What happens when an add would repeat an existing assignment key.
#[derive(
    Deserialize, EnumString, VariantArray, Display, AsRefStr, Clone, Copy, Debug, Default,
    PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DuplicatePolicy {
    /// Refuse the add; keys stay unique within the plan.
    #[default]
    Reject,
    /// Append the duplicate; removal then takes out one copy per call.
    Allow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Add(Assignment),
    /// Without a start time the first slot of that day is removed.
    Remove {
        task_name: String,
        member_id: String,
        day_of_week: Option<u8>,
        start_time: Option<String>,
    },
    Reassign {
        task_name: String,
        old_member_id: String,
        new_member: Member,
    },
}

impl Mutation {
    pub fn action(&self) -> PatchAction {
        match self {
            Mutation::Add(_) => PatchAction::Add,
            Mutation::Remove { .. } => PatchAction::Remove,
            Mutation::Reassign { .. } => PatchAction::Reassign,
        }
    }

    pub fn to_patch(&self) -> AssignmentPatch {
        match self {
            Mutation::Add(assignment) => AssignmentPatch {
                action: PatchAction::Add,
                task_name: assignment.task_name.to_owned(),
                member_id: assignment.member_id.to_owned(),
                day_of_week: assignment.day_of_week,
                start_time: assignment.start_time.to_owned(),
                new_member_id: None,
            },
            Mutation::Remove {
                task_name,
                member_id,
                day_of_week,
                start_time,
            } => AssignmentPatch {
                action: PatchAction::Remove,
                task_name: task_name.to_owned(),
                member_id: member_id.to_owned(),
                day_of_week: *day_of_week,
                start_time: start_time.to_owned(),
                new_member_id: None,
            },
            Mutation::Reassign {
                task_name,
                old_member_id,
                new_member,
            } => AssignmentPatch {
                action: PatchAction::Reassign,
                task_name: task_name.to_owned(),
                member_id: old_member_id.to_owned(),
                day_of_week: None,
                start_time: None,
                new_member_id: Some(new_member.id.to_owned()),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
    Added(AssignmentKey),
    Removed(Assignment),
    Reassigned(usize),
}

/// The plan held in memory together with the keys the user intends to
/// commit.
#[derive(Clone, Debug)]
pub struct AssignmentSet {
    plan: Plan,
    selected: BTreeSet<AssignmentKey>,
    policy: DuplicatePolicy,
}

impl AssignmentSet {
    /// Every assignment of a pending plan starts selected.
    pub fn new(plan: Plan, policy: DuplicatePolicy) -> Self {
        let selected = if plan.is_pending() {
            plan.assignments.iter().map(Assignment::key).collect()
        } else {
            BTreeSet::new()
        };

        Self {
            plan,
            selected,
            policy,
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn status(&self) -> PlanStatus {
        self.plan.status
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.plan.assignments
    }

    pub fn selected(&self) -> &BTreeSet<AssignmentKey> {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, key: &AssignmentKey) -> bool {
        self.selected.contains(key)
    }

    pub fn contains(&self, key: &AssignmentKey) -> bool {
        self.plan.assignments.iter().any(|a| &a.key() == key)
    }

    /// First assignment in plan order for that task, member and day. A
    /// start time narrows the lookup to that slot.
    pub fn find(
        &self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Option<&Assignment> {
        self.plan
            .assignments
            .iter()
            .find(|a| a.matches(task_name, member_id, day_of_week, start_time))
    }

    /// Assignments in plan order with repeated keys collapsed to their first
    /// occurrence.
    pub fn unique_assignments(&self) -> Vec<&Assignment> {
        let mut seen = HashSet::new();

        self.plan
            .assignments
            .iter()
            .filter(|a| seen.insert(a.key()))
            .collect()
    }

    pub fn selected_assignments(&self) -> Vec<Assignment> {
        self.unique_assignments()
            .into_iter()
            .filter(|a| self.selected.contains(&a.key()))
            .cloned()
            .collect()
    }

    /// Day-less assignments are grouped under `None`.
    pub fn grouped_by_day(&self) -> BTreeMap<Option<u8>, Vec<&Assignment>> {
        let mut groups: BTreeMap<Option<u8>, Vec<&Assignment>> = BTreeMap::new();

        for assignment in self.unique_assignments() {
            groups
                .entry(assignment.day_of_week)
                .or_default()
                .push(assignment);
        }

        for group in groups.values_mut() {
            group.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        }

        groups
    }

    /// Flips the selection of the matching assignment, the first one of the
    /// day when no start time is given. Returns the new selection state, or
    /// `None` when nothing changed.
    pub fn toggle_selection(
        &mut self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Option<bool> {
        if !self.plan.is_pending() {
            return None;
        }

        let key = self
            .find(task_name, member_id, day_of_week, start_time)?
            .key();

        if self.selected.remove(&key) {
            Some(false)
        } else {
            self.selected.insert(key);
            Some(true)
        }
    }

    /// Checks a mutation against the current collection without touching
    /// it.
    pub fn check(&self, mutation: &Mutation) -> habita_shared::Result<()> {
        match mutation {
            Mutation::Add(assignment) => {
                if self.policy == DuplicatePolicy::Reject && self.contains(&assignment.key()) {
                    habita_shared::user!(
                        "{} is already assigned to {}",
                        assignment.task_name,
                        assignment.member_name
                    );
                }
            }
            Mutation::Remove {
                task_name,
                member_id,
                day_of_week,
                start_time,
            } => {
                let found = self.find(task_name, member_id, *day_of_week, start_time.as_deref());
                if found.is_none() {
                    habita_shared::not_found!("assignment {task_name} for {member_id}");
                }
            }
            Mutation::Reassign {
                task_name,
                old_member_id,
                new_member,
            } => {
                if old_member_id == &new_member.id {
                    habita_shared::user!("{task_name} is already assigned to {}", new_member.name);
                }

                let moved = self
                    .plan
                    .assignments
                    .iter()
                    .filter(|a| &a.task_name == task_name && &a.member_id == old_member_id)
                    .collect::<Vec<_>>();

                if moved.is_empty() {
                    habita_shared::not_found!("assignment {task_name} for {old_member_id}");
                }

                if self.policy == DuplicatePolicy::Reject {
                    let clash = moved.iter().any(|a| {
                        let target = AssignmentKey::new(
                            task_name,
                            &new_member.id,
                            a.day_of_week,
                            a.start_time.as_deref(),
                        );
                        self.contains(&target)
                    });

                    if clash {
                        habita_shared::user!(
                            "{task_name} is already assigned to {}",
                            new_member.name
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies a mutation to the in-memory plan. Server supplied fairness
    /// details no longer describe the collection afterwards and are dropped.
    pub fn apply(&mut self, mutation: Mutation) -> habita_shared::Result<MutationOutcome> {
        self.check(&mutation)?;

        let outcome = match mutation {
            Mutation::Add(assignment) => self.add_assignment(assignment),
            Mutation::Remove {
                task_name,
                member_id,
                day_of_week,
                start_time,
            } => match self.remove_assignment(
                &task_name,
                &member_id,
                day_of_week,
                start_time.as_deref(),
            ) {
                Some(removed) => MutationOutcome::Removed(removed),
                None => habita_shared::not_found!("assignment {task_name} for {member_id}"),
            },
            Mutation::Reassign {
                task_name,
                old_member_id,
                new_member,
            } => MutationOutcome::Reassigned(self.reassign_assignment(
                &task_name,
                &old_member_id,
                &new_member,
            )),
        };

        self.plan.fairness_details = None;

        Ok(outcome)
    }

    fn add_assignment(&mut self, assignment: Assignment) -> MutationOutcome {
        let key = assignment.key();

        if self.plan.is_pending() {
            self.selected.insert(key.clone());
        }

        self.plan.assignments.push(assignment);

        MutationOutcome::Added(key)
    }

    /// Removes the first matching record only.
    fn remove_assignment(
        &mut self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Option<Assignment> {
        let position = self
            .plan
            .assignments
            .iter()
            .position(|a| a.matches(task_name, member_id, day_of_week, start_time))?;

        let removed = self.plan.assignments.remove(position);
        let key = removed.key();

        if !self.contains(&key) {
            self.selected.remove(&key);
        }

        Some(removed)
    }

    /// Rewrites every `(task, old member)` record in place, whatever its day.
    /// Selected keys follow the record to its new member.
    fn reassign_assignment(
        &mut self,
        task_name: &str,
        old_member_id: &str,
        new_member: &Member,
    ) -> usize {
        let mut count = 0;

        for assignment in self.plan.assignments.iter_mut() {
            if assignment.task_name != task_name || assignment.member_id != old_member_id {
                continue;
            }

            let old_key = assignment.key();

            assignment.member_id = new_member.id.to_owned();
            assignment.member_name = new_member.name.to_owned();
            assignment.member_type = new_member.member_type;
            assignment.reason = MANUAL_REASSIGN_REASON.to_owned();

            if self.selected.remove(&old_key) {
                self.selected.insert(assignment.key());
            }

            count += 1;
        }

        count
    }

    /// Marks the plan as committed. Only the assignments that were sent
    /// remain.
    pub fn mark_applied(&mut self, applied_at: OffsetDateTime) {
        let selected = std::mem::take(&mut self.selected);

        self.plan
            .assignments
            .retain(|assignment| selected.contains(&assignment.key()));
        self.plan.status = PlanStatus::Applied;
        self.plan.applied_at = Some(applied_at);
    }

    /// Replaces the whole plan with the server's copy. Selections survive for
    /// keys that still exist while the plan is pending.
    pub fn replace_plan(&mut self, plan: Plan) {
        let keys = plan.assignments.iter().map(Assignment::key).collect::<HashSet<_>>();

        if plan.is_pending() {
            self.selected.retain(|key| keys.contains(key));
        } else {
            self.selected.clear();
        }

        self.plan = plan;
    }
}
