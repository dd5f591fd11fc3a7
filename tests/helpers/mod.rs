#![allow(dead_code)]

use std::sync::Mutex;

use habita_plan::PlanApi;
use habita_shared::{
    Error,
    api::{ApplyRequest, ApplyResponse, AssignmentPatch, CreatedTask, NewTask, PreviewRequest},
    plan::{Assignment, FairnessDetails, Member, MemberType, Plan, PlanPreview},
};

fn member(id: &str, name: &str, member_type: MemberType) -> Member {
    Member {
        id: id.to_owned(),
        name: name.to_owned(),
        member_type,
    }
}

pub fn household() -> Vec<Member> {
    vec![
        member("m1", "Ana", MemberType::Adult),
        member("m2", "Ben", MemberType::Adult),
        member("m3", "Caro", MemberType::Child),
    ]
}

fn assignment(task_name: &str, member: &Member, day_of_week: Option<u8>) -> Assignment {
    Assignment {
        task_name: task_name.to_owned(),
        member_id: member.id.to_owned(),
        member_name: member.name.to_owned(),
        member_type: member.member_type,
        reason: "fewest tasks".to_owned(),
        day_of_week,
        start_time: None,
        end_time: None,
    }
}

pub fn preview() -> PlanPreview {
    let members = household();

    PlanPreview {
        id: "plan-7".to_owned(),
        assignments: vec![
            assignment("Dishes", &members[0], Some(1)),
            assignment("Vacuum", &members[1], Some(1)),
            assignment("Laundry", &members[0], None),
        ],
        balance_score: 72,
        notes: vec!["Ben has fewer tasks this week".to_owned()],
        duration_days: 7,
        start_date: Some("2026-10-19".to_owned()),
        excluded_tasks: vec![],
        fairness_details: Some(FairnessDetails::default()),
        created_at: None,
    }
}

/// Serves one canned preview and records the calls the shell makes. Plans
/// are never found on refresh, so the shell keeps its local copy.
#[derive(Default)]
pub struct CannedApi {
    calls: Mutex<Vec<&'static str>>,
}

impl CannedApi {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlanApi for CannedApi {
    async fn preview(&self, _request: &PreviewRequest) -> habita_shared::Result<PlanPreview> {
        self.record("preview");
        Ok(preview())
    }

    async fn apply(&self, request: &ApplyRequest) -> habita_shared::Result<ApplyResponse> {
        self.record("apply");
        Ok(ApplyResponse {
            success: true,
            assignments_created: request.assignments.len() as u32,
        })
    }

    async fn discard(&self, _plan_id: &str) -> habita_shared::Result<()> {
        self.record("discard");
        Ok(())
    }

    async fn patch_assignments(
        &self,
        _plan_id: &str,
        _patch: &AssignmentPatch,
    ) -> habita_shared::Result<()> {
        self.record("patch");
        Ok(())
    }

    async fn fetch_plan(&self, plan_id: &str) -> habita_shared::Result<Plan> {
        self.record("fetch_plan");
        Err(Error::NotFound(format!("plan {plan_id}")))
    }

    async fn create_task(&self, task: &NewTask) -> habita_shared::Result<CreatedTask> {
        self.record("create_task");
        Ok(CreatedTask {
            id: "t-1".to_owned(),
            name: task.name.to_owned(),
        })
    }
}
