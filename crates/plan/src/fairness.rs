use std::collections::{BTreeMap, HashSet};

use habita_shared::plan::{FairnessDetails, Member, MemberType, Plan};
use strum::{AsRefStr, Display};

#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ScoreTier {
    Good,
    Medium,
    Poor,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreTier::Good,
            60..=79 => ScoreTier::Medium,
            _ => ScoreTier::Poor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FairnessSummary {
    pub balance_score: u8,
    pub tier: ScoreTier,
    /// Width of the score bar, in percent.
    pub bar_width: u8,
    pub details: FairnessDetails,
    /// `false` when the details were recomputed from the local assignments.
    pub from_server: bool,
}

/// Server details win; a plan edited locally since the last server scoring
/// has none and gets a local recount.
pub fn project(plan: &Plan, members: &[Member]) -> FairnessSummary {
    let balance_score = plan.balance_score.min(100);
    let (details, from_server) = match plan.fairness_details.as_ref() {
        Some(details) => (details.clone(), true),
        None => (distribution(plan, members), false),
    };

    FairnessSummary {
        balance_score,
        tier: ScoreTier::from_score(balance_score),
        bar_width: balance_score,
        details,
        from_server,
    }
}

/// Per-adult task counts. Adults known to the household start at zero so an
/// idle adult shows up as an imbalance.
pub fn distribution(plan: &Plan, members: &[Member]) -> FairnessDetails {
    let mut adult_distribution: BTreeMap<String, u32> = members
        .iter()
        .filter(|m| m.member_type == MemberType::Adult)
        .map(|m| (m.name.to_owned(), 0))
        .collect();

    let mut seen = HashSet::new();
    for assignment in plan.assignments.iter().filter(|a| seen.insert(a.key())) {
        if assignment.is_adult() {
            *adult_distribution
                .entry(assignment.member_name.to_owned())
                .or_default() += 1;
        }
    }

    let max = adult_distribution.values().max().copied().unwrap_or_default();
    let min = adult_distribution.values().min().copied().unwrap_or_default();

    FairnessDetails {
        adult_distribution,
        is_symmetric: max == min,
        max_difference: max - min,
    }
}

#[cfg(test)]
mod tests {
    use habita_shared::plan::{Assignment, PlanStatus};
    use time::macros::datetime;

    use super::*;

    fn member(id: &str, name: &str, member_type: MemberType) -> Member {
        Member {
            id: id.to_owned(),
            name: name.to_owned(),
            member_type,
        }
    }

    fn assignment(task: &str, member: &Member) -> Assignment {
        Assignment {
            task_name: task.to_owned(),
            member_id: member.id.to_owned(),
            member_name: member.name.to_owned(),
            member_type: member.member_type,
            reason: String::new(),
            day_of_week: None,
            start_time: None,
            end_time: None,
        }
    }

    fn plan(assignments: Vec<Assignment>, score: u8) -> Plan {
        Plan {
            id: "plan-1".to_owned(),
            status: PlanStatus::Pending,
            balance_score: score,
            notes: vec![],
            assignments,
            duration_days: 7,
            start_date: None,
            excluded_tasks: vec![],
            fairness_details: None,
            created_at: datetime!(2026-10-19 08:00 UTC),
            applied_at: None,
            expires_at: datetime!(2026-10-26 08:00 UTC),
        }
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ScoreTier::from_score(100), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(80), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(79), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(60), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(59), ScoreTier::Poor);
        assert_eq!(ScoreTier::Medium.to_string(), "medium");
    }

    #[test]
    fn test_local_distribution_counts_adults_only() {
        let ana = member("m1", "Ana", MemberType::Adult);
        let ben = member("m2", "Ben", MemberType::Adult);
        let kid = member("m3", "Kid", MemberType::Child);
        let members = vec![ana.clone(), ben.clone(), kid.clone()];

        let plan = plan(
            vec![
                assignment("Dishes", &ana),
                assignment("Laundry", &ana),
                assignment("Vacuum", &ben),
                assignment("Toys", &kid),
            ],
            72,
        );

        let summary = project(&plan, &members);

        assert!(!summary.from_server);
        assert_eq!(summary.tier, ScoreTier::Medium);
        assert_eq!(summary.bar_width, 72);
        assert_eq!(summary.details.adult_distribution.len(), 2);
        assert_eq!(summary.details.adult_distribution["Ana"], 2);
        assert_eq!(summary.details.adult_distribution["Ben"], 1);
        assert!(!summary.details.is_symmetric);
        assert_eq!(summary.details.max_difference, 1);
    }

    #[test]
    fn test_idle_adult_counts_as_zero() {
        let ana = member("m1", "Ana", MemberType::Adult);
        let ben = member("m2", "Ben", MemberType::Adult);

        let plan = plan(vec![assignment("Dishes", &ana)], 50);
        let details = distribution(&plan, &[ana, ben]);

        assert_eq!(details.adult_distribution["Ben"], 0);
        assert_eq!(details.max_difference, 1);
    }

    #[test]
    fn test_duplicates_counted_once() {
        let ana = member("m1", "Ana", MemberType::Adult);
        let plan = plan(
            vec![assignment("Dishes", &ana), assignment("Dishes", &ana)],
            90,
        );

        let details = distribution(&plan, std::slice::from_ref(&ana));
        assert_eq!(details.adult_distribution["Ana"], 1);
        assert!(details.is_symmetric);
    }

    #[test]
    fn test_server_details_preferred() {
        let ana = member("m1", "Ana", MemberType::Adult);
        let mut plan = plan(vec![assignment("Dishes", &ana)], 130);
        plan.fairness_details = Some(FairnessDetails {
            adult_distribution: BTreeMap::from([("Ana".to_owned(), 4)]),
            is_symmetric: true,
            max_difference: 0,
        });

        let summary = project(&plan, &[ana]);

        assert!(summary.from_server);
        assert_eq!(summary.details.adult_distribution["Ana"], 4);
        assert_eq!(summary.balance_score, 100);
        assert_eq!(summary.tier, ScoreTier::Good);
    }
}
