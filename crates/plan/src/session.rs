use std::collections::BTreeSet;

use habita_shared::{
    Error,
    api::{ApplyRequest, NewTask, PreviewRequest},
    plan::{Assignment, MANUAL_ADD_REASON, Member, Plan, TaskFrequency},
};
use time::OffsetDateTime;
use validator::Validate;

use crate::{
    AssignmentSet, ConfirmAction, Confirmation, DuplicatePolicy, FairnessSummary, Lifecycle,
    LocalStrategy, Mutation, MutationPath, MutationStrategy, Notice, PlanApi, RemoteStrategy,
};

#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    pub members: Vec<Member>,
    /// Names of the tasks the household already has.
    pub tasks: Vec<String>,
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Validate, Clone, Debug)]
pub struct AddAssignmentInput {
    #[validate(length(min = 1, max = 100))]
    pub task_name: String,
    #[validate(length(min = 1))]
    pub member_id: String,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: Option<u8>,
    /// Used when the task has to be created first.
    pub frequency: Option<TaskFrequency>,
}

/// Owns the one plan the user is working on.
///
/// Every entry point reports its result as a [`Notice`]; network failures
/// never escape as errors. Which mutation path is used depends only on the
/// plan status: pending drafts are edited locally, applied plans go through
/// the server first.
pub struct PlanSession<A: PlanApi> {
    api: A,
    members: Vec<Member>,
    tasks: BTreeSet<String>,
    policy: DuplicatePolicy,
    draft: Option<AssignmentSet>,
    busy: bool,
}

impl<A: PlanApi> PlanSession<A> {
    pub fn new(api: A, options: SessionOptions) -> Self {
        Self {
            api,
            members: options.members,
            tasks: options.tasks.into_iter().collect(),
            policy: options.duplicate_policy,
            draft: None,
            busy: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn knows_task(&self, name: &str) -> bool {
        self.tasks.contains(name)
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.draft.as_ref().map(AssignmentSet::plan)
    }

    pub fn draft(&self) -> Option<&AssignmentSet> {
        self.draft.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::of(self.plan())
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn selected_count(&self) -> usize {
        self.draft
            .as_ref()
            .map(AssignmentSet::selected_count)
            .unwrap_or_default()
    }

    pub fn fairness(&self) -> Option<FairnessSummary> {
        self.plan()
            .map(|plan| crate::fairness::project(plan, &self.members))
    }

    #[tracing::instrument(skip_all, fields(duration_days = request.duration_days))]
    pub async fn generate(&mut self, request: PreviewRequest) -> Notice {
        if !self.lifecycle().can_generate() {
            return Notice::info("A plan is already loaded. Regenerate it to start over.");
        }

        if let Err(err) = request.validate() {
            return Notice::failed("generate a plan", &err.into());
        }

        self.busy = true;
        let result = self.api.preview(&request).await;
        self.busy = false;

        let preview = match result {
            Ok(preview) => preview,
            Err(err) => return self.failed("generate a plan", err),
        };

        let plan = preview.into_pending(OffsetDateTime::now_utc());
        let count = plan.assignments.len();

        self.tasks
            .extend(plan.assignments.iter().map(|a| a.task_name.to_owned()));
        self.tasks
            .extend(plan.excluded_tasks.iter().map(|t| t.task_name.to_owned()));

        tracing::info!(plan_id = %plan.id, assignments = count, "plan generated");
        self.draft = Some(AssignmentSet::new(plan, self.policy));

        Notice::success(format!("Plan generated with {count} assignments"))
    }

    /// Drops the current plan and asks for a new one.
    #[tracing::instrument(skip_all)]
    pub async fn regenerate(
        &mut self,
        request: PreviewRequest,
        confirmation: Confirmation,
    ) -> Notice {
        if !self.lifecycle().can_regenerate() {
            return Notice::info("There is no plan to regenerate.");
        }

        if !confirmation.confirms(ConfirmAction::Regenerate) {
            return Notice::info("Regeneration cancelled.");
        }

        if let Some(previous) = self.draft.take() {
            tracing::info!(
                plan_id = %previous.plan().id,
                status = %previous.status(),
                "plan dropped for regeneration"
            );
        }

        self.generate(request).await
    }

    /// Commits the selected assignments. The plan only becomes applied when
    /// the server reports new assignments.
    #[tracing::instrument(skip_all)]
    pub async fn apply(&mut self) -> Notice {
        let now = OffsetDateTime::now_utc();

        let lifecycle = self.lifecycle();
        if !lifecycle.can_apply() {
            return match lifecycle {
                Lifecycle::None => Notice::info("Generate a plan first."),
                _ => Notice::info("This plan is already applied."),
            };
        }

        let notice = {
            let Some(draft) = self.draft.as_mut() else {
                return Notice::info("Generate a plan first.");
            };

            if draft.plan().is_expired(now) {
                return Notice::info("This plan has expired. Generate a new one.");
            }

            if draft.selected_count() == 0 {
                return Notice::info("Select at least one assignment to apply.");
            }

            let request = ApplyRequest {
                plan_id: draft.plan().id.to_owned(),
                assignments: draft.selected_assignments(),
            };

            self.busy = true;
            let result = self.api.apply(&request).await;
            self.busy = false;

            let response = match result {
                Ok(response) if response.success => response,
                Ok(_) => {
                    tracing::warn!(plan_id = %request.plan_id, "apply reported failure");
                    return Notice::error("Could not apply the plan. Please try again.");
                }
                Err(err) => return self.failed("apply the plan", err),
            };

            match Lifecycle::Pending.after_apply(response.assignments_created) {
                Lifecycle::Applied => {
                    draft.mark_applied(now);
                    tracing::info!(
                        plan_id = %request.plan_id,
                        created = response.assignments_created,
                        "plan applied"
                    );

                    Notice::success(format!(
                        "{} assignments added to the schedule",
                        response.assignments_created
                    ))
                }
                _ => {
                    tracing::info!(plan_id = %request.plan_id, "nothing new to apply");

                    return Notice::info("All selected assignments were already applied.");
                }
            }
        };

        self.refresh().await;

        notice
    }

    /// Deletes a pending plan on the server, then forgets it.
    #[tracing::instrument(skip_all)]
    pub async fn discard(&mut self, confirmation: Confirmation) -> Notice {
        let Some(plan_id) = self.plan().map(|p| p.id.to_owned()) else {
            return Notice::info("There is no plan to discard.");
        };

        if !self.lifecycle().can_discard() {
            return Notice::info("Only a pending plan can be discarded.");
        }

        if !confirmation.confirms(ConfirmAction::Discard) {
            return Notice::info("Discard cancelled.");
        }

        self.busy = true;
        let result = self.api.discard(&plan_id).await;
        self.busy = false;

        if let Err(err) = result {
            return self.failed("discard the plan", err);
        }

        self.draft = None;
        tracing::info!(plan_id = %plan_id, "plan discarded");

        Notice::success("Plan discarded")
    }

    /// Returns the new selection state, `None` when nothing changed.
    pub fn toggle(
        &mut self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Option<bool> {
        self.draft
            .as_mut()?
            .toggle_selection(task_name, member_id, day_of_week, start_time)
    }

    #[tracing::instrument(skip_all, fields(task = %input.task_name, member = %input.member_id))]
    pub async fn add(&mut self, input: AddAssignmentInput) -> Notice {
        if let Err(err) = input.validate() {
            return Notice::failed("add the assignment", &err.into());
        }

        let Some(member) = self.member(&input.member_id).cloned() else {
            return Notice::error(format!("member {} not found", input.member_id));
        };

        let mutation = Mutation::Add(Assignment {
            task_name: input.task_name.to_owned(),
            member_id: member.id.to_owned(),
            member_name: member.name.to_owned(),
            member_type: member.member_type,
            reason: MANUAL_ADD_REASON.to_owned(),
            day_of_week: input.day_of_week,
            start_time: None,
            end_time: None,
        });

        match self.draft.as_ref() {
            Some(draft) => {
                if let Err(err) = draft.check(&mutation) {
                    return Notice::failed("add the assignment", &err);
                }
            }
            None => return Notice::info("Generate a plan first."),
        }

        if !self.knows_task(&input.task_name) {
            let task = NewTask {
                name: input.task_name.to_owned(),
                frequency: input.frequency.unwrap_or_default(),
            };

            if let Err(err) = task.validate() {
                return Notice::failed("create the task", &err.into());
            }

            self.busy = true;
            let result = self.api.create_task(&task).await;
            self.busy = false;

            match result {
                Ok(created) => {
                    tracing::info!(task_id = %created.id, name = %created.name, "task created");
                    self.tasks.insert(created.name);
                    self.tasks.insert(task.name);
                }
                Err(err) => return self.failed("create the task", err),
            }
        }

        let success = format!("{} assigned to {}", input.task_name, member.name);
        self.mutate(mutation, "add the assignment", success).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(
        &mut self,
        task_name: &str,
        member_id: &str,
        day_of_week: Option<u8>,
        start_time: Option<&str>,
    ) -> Notice {
        let mutation = Mutation::Remove {
            task_name: task_name.to_owned(),
            member_id: member_id.to_owned(),
            day_of_week,
            start_time: start_time.map(str::to_owned),
        };

        self.mutate(
            mutation,
            "remove the assignment",
            format!("{task_name} removed"),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn reassign(
        &mut self,
        task_name: &str,
        old_member_id: &str,
        new_member_id: &str,
    ) -> Notice {
        let Some(new_member) = self.member(new_member_id).cloned() else {
            return Notice::error(format!("member {new_member_id} not found"));
        };

        let success = format!("{task_name} reassigned to {}", new_member.name);
        let mutation = Mutation::Reassign {
            task_name: task_name.to_owned(),
            old_member_id: old_member_id.to_owned(),
            new_member,
        };

        self.mutate(mutation, "reassign the task", success).await
    }

    async fn mutate(&mut self, mutation: Mutation, action: &str, success: String) -> Notice {
        let result = {
            let Some(draft) = self.draft.as_mut() else {
                return Notice::info("Generate a plan first.");
            };

            let strategy: Box<dyn MutationStrategy + '_> =
                match Lifecycle::of(Some(draft.plan())).mutation_path() {
                    Some(MutationPath::Remote) => Box::new(RemoteStrategy::new(&self.api)),
                    _ => Box::new(LocalStrategy),
                };

            tracing::debug!(
                path = %strategy.path(),
                action = %mutation.action(),
                "committing mutation"
            );

            self.busy = true;
            let result = strategy.commit(draft, mutation).await;
            self.busy = false;

            result
        };

        match result {
            Ok(committed) => {
                if committed.needs_refresh {
                    self.refresh().await;
                }

                Notice::success(success)
            }
            Err(err) => self.failed(action, err),
        }
    }

    /// Reloads the plan from the server after a confirmed change. A failed
    /// reload keeps the local copy.
    async fn refresh(&mut self) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };

        let plan_id = draft.plan().id.to_owned();

        self.busy = true;
        let result = self.api.fetch_plan(&plan_id).await;
        self.busy = false;

        match result {
            Ok(plan) => {
                tracing::debug!(plan_id = %plan_id, status = %plan.status, "plan refreshed");
                draft.replace_plan(plan);
            }
            Err(err) => {
                tracing::warn!(plan_id = %plan_id, error = %err, "plan refresh failed");
            }
        }
    }

    fn failed(&self, action: &str, err: Error) -> Notice {
        if err.is_informational() {
            tracing::info!(error = %err, "could not {action}");
        } else {
            tracing::warn!(error = %err, "could not {action}");
        }

        Notice::failed(action, &err)
    }
}
