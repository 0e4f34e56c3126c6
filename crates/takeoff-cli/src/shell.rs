// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::io::{BufRead, Write};
use takeoff_app::{
    AppCommand, AppEvent, BuilderId, CommunityId, KITCHEN_FAUCET_MODELS, ListKind, TrimSelection,
};
use takeoff_catalog::CatalogSource;

use crate::runtime::{ClipboardSink, Session};

const HELP: &str = "\
commands (rows are numbered from 1):
  builders                      list builders
  builder <id>                  select a builder
  communities                   list the selected builder's communities
  community <id>                select a community
  plans                         list floor plans
  plan <name>                   select a floor plan
  options                       list options for the floor plan
  option <name>                 toggle an option
  options-set <a>, <b>          replace the selected options
  trim <fixture>=<model>, ...   pick trim models (brand/series/finish are attributes)
  trim-clear                    go back to the catalog trim list
  show                          print the selection and both lists
  remove <list> <row>           remove a row from plumbing or trim
  move <list> <from> <to>       move a row
  add <list> <text>             append a custom row
  faucet <list> <row> <model>   set the model on a row
  faucet-models                 list known kitchen faucet models
  undo <list>                   undo the last change to a list
  copy [list]                   copy one list, or both
  help                          show this help
  quit                          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Builders,
    Builder(BuilderId),
    Communities,
    Community(CommunityId),
    Plans,
    Plan(String),
    Options,
    ToggleOption(String),
    SetOptions(Vec<String>),
    Trim(TrimSelection),
    TrimClear,
    Show,
    Remove { list: ListKind, index: usize },
    Move { list: ListKind, from: usize, to: usize },
    Add { list: ListKind, text: String },
    Faucet { list: ListKind, index: usize, model: String },
    FaucetModels,
    Undo(ListKind),
    Copy(Option<ListKind>),
    Help,
    Quit,
}

/// Parses one shell line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "builders" => ShellCommand::Builders,
        "builder" => ShellCommand::Builder(BuilderId::new(parse_id(rest, "builder")?)),
        "communities" => ShellCommand::Communities,
        "community" => ShellCommand::Community(CommunityId::new(parse_id(rest, "community")?)),
        "plans" => ShellCommand::Plans,
        "plan" => ShellCommand::Plan(required(rest, "plan <name>")?.to_owned()),
        "options" => ShellCommand::Options,
        "option" => ShellCommand::ToggleOption(required(rest, "option <name>")?.to_owned()),
        "options-set" => ShellCommand::SetOptions(
            rest.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        "trim" => ShellCommand::Trim(parse_trim_selection(rest)?),
        "trim-clear" => ShellCommand::TrimClear,
        "show" => ShellCommand::Show,
        "remove" => {
            let (list, rest) = split_list(rest, "remove <list> <row>")?;
            ShellCommand::Remove {
                list,
                index: parse_row(rest)?,
            }
        }
        "move" => {
            let (list, rest) = split_list(rest, "move <list> <from> <to>")?;
            let (from, to) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: move <list> <from> <to>"))?;
            ShellCommand::Move {
                list,
                from: parse_row(from)?,
                to: parse_row(to.trim())?,
            }
        }
        "add" => {
            let (list, text) = split_list(rest, "add <list> <text>")?;
            ShellCommand::Add {
                list,
                text: text.to_owned(),
            }
        }
        "faucet" => {
            let (list, rest) = split_list(rest, "faucet <list> <row> <model>")?;
            let (row, model) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: faucet <list> <row> <model>"))?;
            ShellCommand::Faucet {
                list,
                index: parse_row(row)?,
                model: model.trim().to_owned(),
            }
        }
        "faucet-models" => ShellCommand::FaucetModels,
        "undo" => ShellCommand::Undo(parse_list(required(rest, "undo <list>")?)?),
        "copy" if rest.is_empty() => ShellCommand::Copy(None),
        "copy" => ShellCommand::Copy(Some(parse_list(rest)?)),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        unknown => bail!("unknown command {unknown:?}; type `help` for the command list"),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

fn parse_id(raw: &str, what: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("{what} id must be a number, got {raw:?}"))
}

fn parse_row(raw: &str) -> Result<usize> {
    let row: usize = raw
        .parse()
        .with_context(|| format!("row must be a number, got {raw:?}"))?;
    row.checked_sub(1)
        .ok_or_else(|| anyhow!("rows are numbered from 1"))
}

fn parse_list(raw: &str) -> Result<ListKind> {
    ListKind::parse(raw).ok_or_else(|| anyhow!("unknown list {raw:?}; use plumbing or trim"))
}

fn split_list<'a>(rest: &'a str, usage: &str) -> Result<(ListKind, &'a str)> {
    let (list, tail) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("usage: {usage}"))?;
    Ok((parse_list(list)?, tail.trim()))
}

/// `key=model` pairs separated by commas, or by whitespace when no comma is present.
fn parse_trim_selection(rest: &str) -> Result<TrimSelection> {
    let pairs: Vec<&str> = if rest.contains(',') {
        rest.split(',').collect()
    } else {
        rest.split_whitespace().collect()
    };
    let mut selection = TrimSelection::new();
    for pair in pairs.into_iter().map(str::trim).filter(|pair| !pair.is_empty()) {
        let (key, model) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("trim entries look like fixture=model, got {pair:?}"))?;
        let (key, model) = (key.trim(), model.trim());
        if key.is_empty() || model.is_empty() {
            bail!("trim entries look like fixture=model, got {pair:?}");
        }
        selection.insert(key, model);
    }
    if selection.is_empty() {
        bail!("usage: trim <fixture>=<model>, ...");
    }
    Ok(selection)
}

/// Reads commands from `input` until EOF or `quit`. Bad lines are reported
/// and skipped; only IO failures end the loop early.
pub fn run_shell<S, C, R, W>(
    session: &mut Session<S, C>,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()>
where
    S: CatalogSource,
    C: ClipboardSink,
    R: BufRead,
    W: Write,
{
    let events = session.start();
    report(session, &events, out)?;

    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line.context("read shell input")?;
        match parse_command(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(error) = execute(session, command, out) {
                    writeln!(out, "error: {error:#}")?;
                }
            }
            Ok(None) => {}
            Err(error) => writeln!(out, "error: {error:#}")?,
        }
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    out.flush()?;
    Ok(())
}

fn execute<S, C, W>(session: &mut Session<S, C>, command: ShellCommand, out: &mut W) -> Result<()>
where
    S: CatalogSource,
    C: ClipboardSink,
    W: Write,
{
    let app_command = match command {
        ShellCommand::Builders => return render_builders(session, out),
        ShellCommand::Communities => return render_communities(session, out),
        ShellCommand::Plans => return render_plans(session, out),
        ShellCommand::Options => return render_options(session, out),
        ShellCommand::Show => return render_show(session, out),
        ShellCommand::FaucetModels => return render_faucet_models(session, out),
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(());
        }
        ShellCommand::Copy(list) => {
            session.copy(list)?;
            writeln!(
                out,
                "copied {}",
                list.map_or("takeoff", ListKind::as_str)
            )?;
            return Ok(());
        }
        ShellCommand::Quit => return Ok(()),
        ShellCommand::Builder(id) => AppCommand::SelectBuilder(id),
        ShellCommand::Community(id) => AppCommand::SelectCommunity(id),
        ShellCommand::Plan(name) => AppCommand::SelectFloorPlan(name),
        ShellCommand::ToggleOption(name) => AppCommand::ToggleOption(name),
        ShellCommand::SetOptions(names) => AppCommand::SetOptions(names),
        ShellCommand::Trim(selection) => AppCommand::SelectTrimModels(selection),
        ShellCommand::TrimClear => AppCommand::ClearTrimModels,
        ShellCommand::Remove { list, index } => AppCommand::RemoveItem { list, index },
        ShellCommand::Move { list, from, to } => AppCommand::MoveItem { list, from, to },
        ShellCommand::Add { list, text } => AppCommand::AddCustomItem { list, text },
        ShellCommand::Faucet { list, index, model } => {
            AppCommand::SetFaucetModel { list, index, model }
        }
        ShellCommand::Undo(list) => AppCommand::Undo(list),
    };

    let events = session.dispatch(app_command);
    report(session, &events, out)
}

/// Prints status lines, fetch failures and the lists an event batch changed.
fn report<S, C, W>(session: &mut Session<S, C>, events: &[AppEvent], out: &mut W) -> Result<()>
where
    S: CatalogSource,
    C: ClipboardSink,
    W: Write,
{
    if let Some(failure) = session.take_failure() {
        writeln!(out, "error: {failure}")?;
    }
    for event in events {
        match event {
            AppEvent::StatusUpdated(message) => writeln!(out, "{message}")?,
            AppEvent::KitchenFaucetModelChanged(model) => {
                writeln!(out, "kitchen faucet model: {model}")?
            }
            _ => {}
        }
    }
    for kind in ListKind::ALL {
        if events.contains(&AppEvent::ListChanged(kind)) {
            render_list(session, kind, out)?;
        }
    }
    Ok(())
}

fn marker(selected: bool) -> char {
    if selected { '*' } else { ' ' }
}

fn render_builders<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let state = session.state();
    if state.catalog.builders.is_empty() {
        writeln!(out, "no builders loaded")?;
    }
    for builder in &state.catalog.builders {
        let selected = state.selection.builder == Some(builder.id);
        writeln!(
            out,
            "{} {:>4}  {}",
            marker(selected),
            builder.id.get(),
            builder.name
        )?;
    }
    Ok(())
}

fn render_communities<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let state = session.state();
    let mut any = false;
    for community in state.visible_communities() {
        any = true;
        let selected = state.selection.community == Some(community.id);
        writeln!(
            out,
            "{} {:>4}  {}",
            marker(selected),
            community.id.get(),
            community.name
        )?;
    }
    if !any {
        writeln!(out, "no communities; select a builder first")?;
    }
    Ok(())
}

fn render_plans<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let state = session.state();
    if state.floor_plans().is_empty() {
        writeln!(out, "no floor plans; select a community first")?;
    }
    for plan in state.floor_plans() {
        let selected = state.selection.floor_plan.as_deref() == Some(plan.name.as_str());
        writeln!(out, "{} {}", marker(selected), plan.name)?;
    }
    Ok(())
}

fn render_options<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let state = session.state();
    let available = state.available_options();
    if available.is_empty() {
        writeln!(out, "no options for this floor plan")?;
    }
    for name in available {
        let selected = state.selection.options.iter().any(|option| option == name);
        writeln!(out, "[{}] {name}", if selected { 'x' } else { ' ' })?;
    }
    Ok(())
}

fn render_faucet_models<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let current = session.state().kitchen_faucet_model.as_str();
    for model in KITCHEN_FAUCET_MODELS {
        writeln!(out, "{} {model}", marker(model == current))?;
    }
    Ok(())
}

fn render_list<S, C, W: Write>(session: &Session<S, C>, kind: ListKind, out: &mut W) -> Result<()> {
    let list = session.state().list(kind);
    writeln!(out, "{}:", kind.title())?;
    if list.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for (row, item) in list.items().iter().enumerate() {
        writeln!(out, "{:>3}. {item}", row + 1)?;
    }
    Ok(())
}

fn render_show<S, C, W: Write>(session: &Session<S, C>, out: &mut W) -> Result<()> {
    let state = session.state();
    let none = "-";
    writeln!(
        out,
        "builder:    {}",
        state.selected_builder().map_or(none, |b| b.name.as_str())
    )?;
    writeln!(
        out,
        "community:  {}",
        state.selected_community().map_or(none, |c| c.name.as_str())
    )?;
    writeln!(
        out,
        "floor plan: {}",
        state.selection.floor_plan.as_deref().unwrap_or(none)
    )?;
    let options = state.selection.options.join(", ");
    writeln!(
        out,
        "options:    {}",
        if options.is_empty() {
            none
        } else {
            options.as_str()
        }
    )?;
    writeln!(out, "faucet:     {}", state.kitchen_faucet_model)?;
    for kind in ListKind::ALL {
        render_list(session, kind, out)?;
    }
    Ok(())
}
