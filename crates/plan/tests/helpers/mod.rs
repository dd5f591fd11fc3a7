#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use habita_plan::{DuplicatePolicy, PlanApi, PlanSession, SessionOptions};
use habita_shared::{
    Error,
    api::{ApplyRequest, ApplyResponse, AssignmentPatch, CreatedTask, NewTask, PreviewRequest},
    plan::{Assignment, FairnessDetails, Member, MemberType, Plan, PlanPreview},
};

#[derive(Default)]
pub struct FakeState {
    pub preview: Option<PlanPreview>,
    pub preview_error: Option<u16>,
    /// Defaults to the number of assignments sent.
    pub assignments_created: Option<u32>,
    pub fail_apply: bool,
    pub fail_discard: bool,
    pub fail_patch: bool,
    pub fail_create_task: bool,
    pub server_plan: Option<Plan>,
    pub calls: Vec<&'static str>,
    pub applied: Vec<ApplyRequest>,
    pub patches: Vec<AssignmentPatch>,
    pub created_tasks: Vec<NewTask>,
}

impl FakeState {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_preview(preview: PlanPreview) -> Self {
        let api = Self::default();
        api.state().preview = Some(preview);
        api
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

fn server_error() -> Error {
    Error::Remote {
        status: 500,
        message: "internal error".to_owned(),
    }
}

#[async_trait::async_trait]
impl PlanApi for FakeApi {
    async fn preview(&self, _request: &PreviewRequest) -> habita_shared::Result<PlanPreview> {
        let mut state = self.state();
        state.calls.push("preview");

        match state.preview_error {
            Some(503) => Err(Error::ServiceUnavailable),
            Some(400) => Err(Error::NoEligibleTasks(String::new())),
            Some(status) => Err(Error::Remote {
                status,
                message: "failed".to_owned(),
            }),
            None => state
                .preview
                .clone()
                .ok_or_else(|| Error::NotFound("preview".to_owned())),
        }
    }

    async fn apply(&self, request: &ApplyRequest) -> habita_shared::Result<ApplyResponse> {
        let mut state = self.state();
        state.calls.push("apply");

        if state.fail_apply {
            return Err(server_error());
        }

        state.applied.push(request.clone());

        Ok(ApplyResponse {
            success: true,
            assignments_created: state
                .assignments_created
                .unwrap_or(request.assignments.len() as u32),
        })
    }

    async fn discard(&self, _plan_id: &str) -> habita_shared::Result<()> {
        let mut state = self.state();
        state.calls.push("discard");

        if state.fail_discard {
            return Err(server_error());
        }

        Ok(())
    }

    async fn patch_assignments(
        &self,
        _plan_id: &str,
        patch: &AssignmentPatch,
    ) -> habita_shared::Result<()> {
        let mut state = self.state();
        state.calls.push("patch");

        if state.fail_patch {
            return Err(server_error());
        }

        state.patches.push(patch.clone());

        Ok(())
    }

    async fn fetch_plan(&self, plan_id: &str) -> habita_shared::Result<Plan> {
        let mut state = self.state();
        state.calls.push("fetch_plan");

        state
            .server_plan
            .clone()
            .ok_or_else(|| Error::NotFound(format!("plan {plan_id}")))
    }

    async fn create_task(&self, task: &NewTask) -> habita_shared::Result<CreatedTask> {
        let mut state = self.state();
        state.calls.push("create_task");

        if state.fail_create_task {
            return Err(server_error());
        }

        state.created_tasks.push(task.clone());

        Ok(CreatedTask {
            id: format!("task-{}", state.created_tasks.len()),
            name: task.name.to_owned(),
        })
    }
}

pub fn member(id: &str, name: &str, member_type: MemberType) -> Member {
    Member {
        id: id.to_owned(),
        name: name.to_owned(),
        member_type,
    }
}

/// Two adults and a teen.
pub fn household() -> Vec<Member> {
    vec![
        member("m1", "Ana", MemberType::Adult),
        member("m2", "Ben", MemberType::Adult),
        member("m3", "Caro", MemberType::Teen),
    ]
}

pub fn assignment(task_name: &str, member: &Member, day_of_week: Option<u8>) -> Assignment {
    Assignment {
        task_name: task_name.to_owned(),
        member_id: member.id.to_owned(),
        member_name: member.name.to_owned(),
        member_type: member.member_type,
        reason: "balanced rotation".to_owned(),
        day_of_week,
        start_time: None,
        end_time: None,
    }
}

pub fn preview(assignments: Vec<Assignment>) -> PlanPreview {
    PlanPreview {
        id: "plan-1".to_owned(),
        assignments,
        balance_score: 85,
        notes: vec!["Tasks spread evenly".to_owned()],
        duration_days: 7,
        start_date: None,
        excluded_tasks: vec![],
        fairness_details: Some(FairnessDetails::default()),
        created_at: None,
    }
}

/// Dishes and Laundry for Ana, Vacuum for Ben.
pub fn three_task_preview() -> PlanPreview {
    let members = household();

    preview(vec![
        assignment("Dishes", &members[0], None),
        assignment("Laundry", &members[0], None),
        assignment("Vacuum", &members[1], None),
    ])
}

pub fn session(api: FakeApi, policy: DuplicatePolicy) -> PlanSession<FakeApi> {
    PlanSession::new(
        api,
        SessionOptions {
            members: household(),
            tasks: vec!["Dishes".to_owned(), "Laundry".to_owned(), "Vacuum".to_owned()],
            duplicate_policy: policy,
        },
    )
}

pub fn week() -> PreviewRequest {
    PreviewRequest {
        duration_days: 7,
        start_date: None,
    }
}
