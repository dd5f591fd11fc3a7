use habita_shared::{
    api::{ApplyRequest, ApplyResponse, AssignmentPatch, CreatedTask, NewTask, PreviewRequest},
    plan::{Plan, PlanPreview},
};

/// Backend endpoints the plan session talks to.
#[async_trait::async_trait]
pub trait PlanApi: Send + Sync {
    async fn preview(&self, request: &PreviewRequest) -> habita_shared::Result<PlanPreview>;

    async fn apply(&self, request: &ApplyRequest) -> habita_shared::Result<ApplyResponse>;

    async fn discard(&self, plan_id: &str) -> habita_shared::Result<()>;

    async fn patch_assignments(
        &self,
        plan_id: &str,
        patch: &AssignmentPatch,
    ) -> habita_shared::Result<()>;

    async fn fetch_plan(&self, plan_id: &str) -> habita_shared::Result<Plan>;

    async fn create_task(&self, task: &NewTask) -> habita_shared::Result<CreatedTask>;
}
