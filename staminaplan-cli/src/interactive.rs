//! Line-oriented recalculation loop.
//!
//! Edits only touch the session's configuration; plans are recomputed once at
//! startup and afterwards only on `calc`.
use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

use staminaplan_game::PlannerSession;

use crate::render::{PlanView, generate_console_report, write_costs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(i64),
    Target(i64),
    Turns(i64),
    Skill(SkillEdit),
    Costs,
    Show,
    Calc,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEdit {
    Set(i64),
    Increment,
    Decrement,
}

/// Parse one input line. Empty lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    let number = |name: &str| -> Result<i64, String> {
        let raw = arg.ok_or_else(|| format!("{name} needs a value"))?;
        raw.parse::<i64>()
            .map_err(|_| format!("{name}: '{raw}' is not an integer"))
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "start" => Command::Start(number("start")?),
        "target" => Command::Target(number("target")?),
        "turns" => Command::Turns(number("turns")?),
        "skill" => match arg {
            Some("+") => Command::Skill(SkillEdit::Increment),
            Some("-") => Command::Skill(SkillEdit::Decrement),
            _ => Command::Skill(SkillEdit::Set(number("skill")?)),
        },
        "costs" => Command::Costs,
        "show" => Command::Show,
        "calc" | "calculate" => Command::Calc,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn write_help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  start N       set start stamina (0-100)")?;
    writeln!(out, "  target N      set target stamina (0-100)")?;
    writeln!(out, "  turns N       set remaining turns (1-14)")?;
    writeln!(out, "  skill N|+|-   set, raise or lower the skill level")?;
    writeln!(out, "  costs         show resolved costs")?;
    writeln!(out, "  show          show the current settings")?;
    writeln!(out, "  calc          recalculate plans")?;
    writeln!(out, "  quit          leave")?;
    Ok(())
}

fn write_settings(out: &mut dyn Write, session: &PlannerSession) -> Result<()> {
    let cfg = session.config();
    let marker = if session.is_stale() {
        " (edited, run 'calc')".yellow().to_string()
    } else {
        String::new()
    };
    writeln!(
        out,
        "Start {} | Target {} | Turns {} | Skill Lv.{}{marker}",
        cfg.start_stamina(),
        cfg.target_stamina(),
        cfg.remaining_turns(),
        cfg.skill_level()
    )?;
    Ok(())
}

fn calculate(out: &mut dyn Write, session: &mut PlannerSession, limit: Option<usize>) -> Result<()> {
    writeln!(out, "{}", "⏳ Calculating…".dimmed())?;
    let summary = session.recalculate();
    let view = PlanView {
        catalog: session.catalog(),
        config: session.config(),
        costs: session.costs(),
        plans: session.plans(),
        summary,
    };
    generate_console_report(out, &view, limit)
}

/// Apply a command; returns false when the loop should stop.
pub fn apply(
    out: &mut dyn Write,
    session: &mut PlannerSession,
    command: Command,
    limit: Option<usize>,
) -> Result<bool> {
    match command {
        Command::Start(v) => session.set_start_stamina(v),
        Command::Target(v) => session.set_target_stamina(v),
        Command::Turns(v) => session.set_remaining_turns(v),
        Command::Skill(SkillEdit::Set(v)) => session.set_skill_level(v),
        Command::Skill(SkillEdit::Increment) => session.increment_skill(),
        Command::Skill(SkillEdit::Decrement) => session.decrement_skill(),
        Command::Costs => {
            write_costs(out, session.catalog(), session.costs())?;
            return Ok(true);
        }
        Command::Show => {
            write_settings(out, session)?;
            return Ok(true);
        }
        Command::Calc => {
            calculate(out, session, limit)?;
            return Ok(true);
        }
        Command::Help => {
            write_help(out)?;
            return Ok(true);
        }
        Command::Quit => return Ok(false),
    }
    write_settings(out, session)?;
    Ok(true)
}

/// Drive the loop until `quit` or end of input.
pub fn run(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    session: &mut PlannerSession,
    limit: Option<usize>,
) -> Result<()> {
    write_help(out)?;
    write_settings(out, session)?;
    calculate(out, session, limit)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match parse_command(&line) {
            Ok(Some(command)) => {
                log::debug!("interactive command {command:?}");
                if !apply(out, session, command, limit)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => writeln!(out, "⚠️  {}", message.yellow())?,
        }
    }
    Ok(())
}
