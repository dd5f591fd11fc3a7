use std::str::FromStr;

use habita_plan::{HttpOptions, HttpPlanApi, SessionOptions};
use habita_shared::plan::{Member, MemberType};
use strum::VariantArray;

use crate::config::Config;

pub mod preview;
pub mod shell;

/// Parses `id:name[:type]`; the type defaults to adult.
pub fn parse_member(value: &str) -> Result<Member, String> {
    let mut parts = value.splitn(3, ':');

    let id = parts.next().unwrap_or_default().trim();
    let name = parts.next().unwrap_or_default().trim();
    if id.is_empty() || name.is_empty() {
        return Err(format!("expected id:name[:type], got {value:?}"));
    }

    let member_type = match parts.next().map(str::trim) {
        Some(kind) if !kind.is_empty() => MemberType::from_str(kind).map_err(|_| {
            let known = MemberType::VARIANTS
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            format!("unknown member type {kind:?}, expected one of {}", known.join(", "))
        })?,
        _ => MemberType::default(),
    };

    Ok(Member {
        id: id.to_owned(),
        name: name.to_owned(),
        member_type,
    })
}

pub fn session_options(
    config: &Config,
    members: Vec<Member>,
    tasks: Vec<String>,
) -> SessionOptions {
    SessionOptions {
        members,
        tasks,
        duplicate_policy: config.plan.duplicate_policy,
    }
}

pub fn http_api(config: &Config) -> anyhow::Result<HttpPlanApi> {
    let api = HttpPlanApi::new(HttpOptions {
        base_url: config.api.base_url.to_owned(),
        token: config.api.token.to_owned(),
        timeout: config.api.timeout(),
    })?;

    tracing::debug!(base_url = %config.api.base_url, "plan api ready");

    Ok(api)
}
