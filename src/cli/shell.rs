use std::{io::Write, str::FromStr};

use anyhow::Result;
use habita_plan::{AddAssignmentInput, ConfirmAction, Confirmation, Notice, PlanApi, PlanSession};
use habita_shared::{api::PreviewRequest, plan::TaskFrequency};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::render;

pub const HELP: &str = "\
Commands:
  generate [days] [yyyy-mm-dd]        ask for a new plan
  show                                print the plan
  toggle <member> <slot> <task>       select or unselect an assignment
  add <member> <day|-> [freq=<f>] <task>
  remove <member> <slot> <task>
  reassign <member> <new member> <task>
  apply                               commit the selected assignments
  discard                             delete the pending plan
  regenerate [days] [yyyy-mm-dd]      replace the plan with a new one
  fairness                            print the balance summary
  quit

A slot is a day 1-7 or -, optionally with a start time: 3@18:00";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Generate {
        duration_days: Option<u8>,
        start_date: Option<String>,
    },
    Show,
    Toggle {
        member_id: String,
        day_of_week: Option<u8>,
        start_time: Option<String>,
        task_name: String,
    },
    Add {
        member_id: String,
        day_of_week: Option<u8>,
        frequency: Option<TaskFrequency>,
        task_name: String,
    },
    Remove {
        member_id: String,
        day_of_week: Option<u8>,
        start_time: Option<String>,
        task_name: String,
    },
    Reassign {
        old_member_id: String,
        new_member_id: String,
        task_name: String,
    },
    Apply,
    Discard,
    Regenerate {
        duration_days: Option<u8>,
        start_date: Option<String>,
    },
    Fairness,
    Help,
    Quit,
}

fn parse_day(word: Option<&str>) -> Result<Option<u8>, String> {
    match word {
        None => Err("missing day, use 1-7 or -".to_owned()),
        Some("-") | Some("any") => Ok(None),
        Some(word) => match word.parse::<u8>() {
            Ok(day @ 1..=7) => Ok(Some(day)),
            _ => Err(format!("invalid day {word:?}, use 1-7 or -")),
        },
    }
}

/// `day[@start]`, e.g. `3@18:00` or `-@07:30`.
fn parse_slot(word: Option<&str>) -> Result<(Option<u8>, Option<String>), String> {
    let Some((day, start_time)) = word.and_then(|w| w.split_once('@')) else {
        return Ok((parse_day(word)?, None));
    };

    if start_time.is_empty() {
        return Err(format!("missing start time after {day}@"));
    }

    Ok((parse_day(Some(day))?, Some(start_time.to_owned())))
}

fn parse_window(words: &[&str]) -> Result<(Option<u8>, Option<String>), String> {
    let duration_days = match words.first() {
        Some(word) => Some(
            word.parse::<u8>()
                .map_err(|_| format!("invalid number of days {word:?}"))?,
        ),
        None => None,
    };

    Ok((duration_days, words.get(1).map(|d| (*d).to_owned())))
}

fn required<'a>(word: Option<&'a str>, what: &str) -> Result<&'a str, String> {
    word.ok_or_else(|| format!("missing {what}"))
}

fn task_name(words: &[&str]) -> Result<String, String> {
    if words.is_empty() {
        return Err("missing task name".to_owned());
    }

    Ok(words.join(" "))
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = line.split_whitespace().collect::<Vec<_>>();
        let Some((name, args)) = words.split_first() else {
            return Err("empty command".to_owned());
        };
        let name = name.to_ascii_lowercase();

        let command = match name.as_str() {
            "generate" | "gen" => {
                let (duration_days, start_date) = parse_window(args)?;
                ShellCommand::Generate {
                    duration_days,
                    start_date,
                }
            }
            "regenerate" => {
                let (duration_days, start_date) = parse_window(args)?;
                ShellCommand::Regenerate {
                    duration_days,
                    start_date,
                }
            }
            "show" | "ls" => ShellCommand::Show,
            "toggle" | "remove" | "rm" => {
                let member_id = required(args.first().copied(), "member")?.to_owned();
                let (day_of_week, start_time) = parse_slot(args.get(1).copied())?;
                let task_name = task_name(args.get(2..).unwrap_or_default())?;

                if name == "toggle" {
                    ShellCommand::Toggle {
                        member_id,
                        day_of_week,
                        start_time,
                        task_name,
                    }
                } else {
                    ShellCommand::Remove {
                        member_id,
                        day_of_week,
                        start_time,
                        task_name,
                    }
                }
            }
            "add" => {
                let member_id = required(args.first().copied(), "member")?.to_owned();
                let day_of_week = parse_day(args.get(1).copied())?;
                let mut rest = args.get(2..).unwrap_or_default();

                let frequency = match rest.first().and_then(|w| w.strip_prefix("freq=")) {
                    Some(value) => {
                        rest = &rest[1..];
                        Some(
                            TaskFrequency::from_str(value)
                                .map_err(|_| format!("unknown frequency {value:?}"))?,
                        )
                    }
                    None => None,
                };

                ShellCommand::Add {
                    member_id,
                    day_of_week,
                    frequency,
                    task_name: task_name(rest)?,
                }
            }
            "reassign" => ShellCommand::Reassign {
                old_member_id: required(args.first().copied(), "member")?.to_owned(),
                new_member_id: required(args.get(1).copied(), "new member")?.to_owned(),
                task_name: task_name(args.get(2..).unwrap_or_default())?,
            },
            "apply" => ShellCommand::Apply,
            "discard" => ShellCommand::Discard,
            "fairness" => ShellCommand::Fairness,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command {other:?}, try help")),
        };

        Ok(command)
    }
}

fn request(
    defaults: &PreviewRequest,
    duration_days: Option<u8>,
    start_date: Option<String>,
) -> PreviewRequest {
    PreviewRequest {
        duration_days: duration_days.unwrap_or(defaults.duration_days),
        start_date: start_date.or_else(|| defaults.start_date.to_owned()),
    }
}

/// Asks every prompt of the confirmation in turn. Anything but yes stops
/// asking and leaves the confirmation short.
async fn confirm<R, W>(
    action: ConfirmAction,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<Confirmation>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut confirmation = Confirmation::request(action);

    while let Some(prompt) = confirmation.next_prompt() {
        write!(out, "{prompt} [y/N] ")?;
        out.flush()?;

        let answer = lines.next_line().await?.unwrap_or_default();
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            break;
        }

        confirmation = confirmation.acknowledge();
    }

    Ok(confirmation)
}

fn print_notice<W: Write>(out: &mut W, notice: &Notice) -> Result<()> {
    writeln!(out, "{}", render::notice(notice))?;

    Ok(())
}

fn print_plan<A: PlanApi, W: Write>(out: &mut W, session: &PlanSession<A>) -> Result<()> {
    match session.draft() {
        Some(draft) => write!(out, "{}", render::plan(draft))?,
        None => writeln!(out, "No plan loaded. Run generate.")?,
    }

    Ok(())
}

/// Reads commands line by line until `quit` or end of input.
pub async fn run<A, R, W>(
    session: &mut PlanSession<A>,
    defaults: PreviewRequest,
    input: R,
    out: &mut W,
) -> Result<()>
where
    A: PlanApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "habita> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        tracing::debug!(?command, "shell command");

        match command {
            ShellCommand::Generate {
                duration_days,
                start_date,
            } => {
                let notice = session
                    .generate(request(&defaults, duration_days, start_date))
                    .await;
                print_notice(out, &notice)?;

                if !notice.is_error() && session.plan().is_some() {
                    print_plan(out, session)?;
                }
            }
            ShellCommand::Regenerate {
                duration_days,
                start_date,
            } => {
                let confirmation = if session.lifecycle().can_regenerate() {
                    confirm(ConfirmAction::Regenerate, &mut lines, out).await?
                } else {
                    Confirmation::request(ConfirmAction::Regenerate)
                };

                let notice = session
                    .regenerate(request(&defaults, duration_days, start_date), confirmation)
                    .await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Show => print_plan(out, session)?,
            ShellCommand::Toggle {
                member_id,
                day_of_week,
                start_time,
                task_name,
            } => match session.toggle(&task_name, &member_id, day_of_week, start_time.as_deref()) {
                Some(true) => writeln!(out, "{task_name} selected")?,
                Some(false) => writeln!(out, "{task_name} unselected")?,
                None => writeln!(out, "Nothing to toggle")?,
            },
            ShellCommand::Add {
                member_id,
                day_of_week,
                frequency,
                task_name,
            } => {
                let notice = session
                    .add(AddAssignmentInput {
                        task_name,
                        member_id,
                        day_of_week,
                        frequency,
                    })
                    .await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Remove {
                member_id,
                day_of_week,
                start_time,
                task_name,
            } => {
                let notice = session
                    .remove(&task_name, &member_id, day_of_week, start_time.as_deref())
                    .await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Reassign {
                old_member_id,
                new_member_id,
                task_name,
            } => {
                let notice = session
                    .reassign(&task_name, &old_member_id, &new_member_id)
                    .await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Apply => {
                let notice = session.apply().await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Discard => {
                let confirmation = if session.lifecycle().can_discard() {
                    confirm(ConfirmAction::Discard, &mut lines, out).await?
                } else {
                    Confirmation::request(ConfirmAction::Discard)
                };

                let notice = session.discard(confirmation).await;
                print_notice(out, &notice)?;
            }
            ShellCommand::Fairness => match session.fairness() {
                Some(summary) => writeln!(out, "{}", render::fairness(&summary))?,
                None => writeln!(out, "No plan loaded. Run generate.")?,
            },
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}
