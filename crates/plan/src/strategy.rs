use crate::{AssignmentSet, Mutation, MutationOutcome, MutationPath, PlanApi};

#[derive(Clone, Debug, PartialEq)]
pub struct Committed {
    pub outcome: MutationOutcome,
    /// The server may have side effects the client does not model; the
    /// caller reloads the plan when set.
    pub needs_refresh: bool,
}

#[async_trait::async_trait]
pub trait MutationStrategy: Send + Sync {
    fn path(&self) -> MutationPath;

    async fn commit(
        &self,
        set: &mut AssignmentSet,
        mutation: Mutation,
    ) -> habita_shared::Result<Committed>;
}

/// Draft edits: applied to the in-memory plan with no network round-trip.
pub struct LocalStrategy;

#[async_trait::async_trait]
impl MutationStrategy for LocalStrategy {
    fn path(&self) -> MutationPath {
        MutationPath::Local
    }

    async fn commit(
        &self,
        set: &mut AssignmentSet,
        mutation: Mutation,
    ) -> habita_shared::Result<Committed> {
        let outcome = set.apply(mutation)?;
        tracing::debug!(plan_id = %set.plan().id, ?outcome, "draft mutated");

        Ok(Committed {
            outcome,
            needs_refresh: false,
        })
    }
}

/// Committed plans: the server must accept the change before the in-memory
/// plan reflects it. A rejected call leaves the plan untouched.
pub struct RemoteStrategy<'a, A: PlanApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: PlanApi + ?Sized> RemoteStrategy<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: PlanApi + ?Sized> MutationStrategy for RemoteStrategy<'_, A> {
    fn path(&self) -> MutationPath {
        MutationPath::Remote
    }

    async fn commit(
        &self,
        set: &mut AssignmentSet,
        mutation: Mutation,
    ) -> habita_shared::Result<Committed> {
        set.check(&mutation)?;

        let plan_id = set.plan().id.to_owned();
        let patch = mutation.to_patch();

        if let Err(err) = self.api.patch_assignments(&plan_id, &patch).await {
            tracing::warn!(
                plan_id = %plan_id,
                action = %patch.action,
                error = %err,
                "assignment change rejected"
            );

            return Err(err);
        }

        let outcome = set.apply(mutation)?;
        tracing::info!(
            plan_id = %plan_id,
            action = %patch.action,
            ?outcome,
            "assignment change confirmed"
        );

        Ok(Committed {
            outcome,
            needs_refresh: true,
        })
    }
}
