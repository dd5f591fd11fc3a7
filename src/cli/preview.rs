use std::io::Write;

use anyhow::Result;
use habita_plan::{PlanApi, PlanSession};
use habita_shared::api::PreviewRequest;

use crate::render;

/// Generates a plan once and prints it with its fairness summary. The plan
/// is left pending on the server until it expires.
pub async fn run<A: PlanApi, W: Write>(
    session: &mut PlanSession<A>,
    request: PreviewRequest,
    out: &mut W,
) -> Result<()> {
    let notice = session.generate(request).await;
    writeln!(out, "{}", render::notice(&notice))?;

    if notice.is_error() {
        anyhow::bail!(notice.message);
    }

    let Some(draft) = session.draft() else {
        return Ok(());
    };

    write!(out, "{}", render::plan(draft))?;

    if let Some(summary) = session.fairness() {
        writeln!(out, "\n{}", render::fairness(&summary))?;
    }

    Ok(())
}
