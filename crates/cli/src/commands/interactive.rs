//! `promptdeck interactive` — Line-oriented stand-in for a pointer.
//!
//! Blocks are referred to by their 1-based position in the list, palette
//! entries by kind name. Every command becomes one or more `InputEvent`s.

use promptdeck_core::{BlockKind, Deck, InputEvent, Outcome};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use super::demo::describe;
use super::{build_deck, LIST_DROP_ID};
use crate::render::print_snapshot;

const HELP: &str = "\
  drag <kind|n>    start dragging a palette entry (user/assistant/system) or block n
  drop [n|list]    drop the dragged item on block n, on the list, or (no arg) outside
  cancel           abandon the current drag
  add <kind>       drag a palette entry onto the list in one go
  move <n> <m>     drag block n onto block m
  rm <n>           delete block n
  reset            back to the initial system block
  show             print the deck
  json             print the deck snapshot as JSON
  exit             quit";

/// Where a drag starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragArg {
    Palette(BlockKind),
    Block(usize),
}

/// Where a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropArg {
    Outside,
    List,
    Block(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Drag(DragArg),
    Drop(DropArg),
    Cancel,
    Add(BlockKind),
    Move(usize, usize),
    Remove(usize),
    Reset,
    Show,
    Json,
    Help,
    Quit,
}

/// Parse one input line. Positions are 1-based.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".into());
    };
    let args: Vec<&str> = parts.collect();

    let position = |raw: &str| -> Result<usize, String> {
        match raw.trim_start_matches('#').parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(format!("expected a block number (1, 2, ...), got {raw:?}")),
        }
    };
    let kind = |raw: &str| raw.parse::<BlockKind>().map_err(|e| e.to_string());

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("drag", [arg]) => match arg.parse::<BlockKind>() {
            Ok(k) => ReplCommand::Drag(DragArg::Palette(k)),
            Err(_) => ReplCommand::Drag(DragArg::Block(position(*arg)?)),
        },
        ("drop", []) => ReplCommand::Drop(DropArg::Outside),
        ("drop", ["list"]) => ReplCommand::Drop(DropArg::List),
        ("drop", [n]) => ReplCommand::Drop(DropArg::Block(position(*n)?)),
        ("cancel", []) => ReplCommand::Cancel,
        ("add", [k]) => ReplCommand::Add(kind(*k)?),
        ("move" | "mv", [from, to]) => ReplCommand::Move(position(*from)?, position(*to)?),
        ("rm" | "remove" | "delete", [n]) => ReplCommand::Remove(position(*n)?),
        ("reset", []) => ReplCommand::Reset,
        ("show" | "ls", []) => ReplCommand::Show,
        ("json", []) => ReplCommand::Json,
        ("help" | "?", []) => ReplCommand::Help,
        ("exit" | "quit" | "/exit" | "/quit" | ":q", []) => ReplCommand::Quit,
        (other, _) => return Err(format!("unknown command or arguments: {other}")),
    };
    Ok(command)
}

/// Translate a command into input events against the current deck.
pub fn to_events(deck: &Deck, command: ReplCommand) -> Result<Vec<InputEvent>, String> {
    let block_id = |n: usize| -> Result<String, String> {
        deck.store()
            .blocks()
            .get(n - 1)
            .map(|b| b.id().0.clone())
            .ok_or_else(|| format!("there is no block #{n}"))
    };

    let events = match command {
        ReplCommand::Drag(DragArg::Palette(kind)) => vec![InputEvent::palette(kind)],
        ReplCommand::Drag(DragArg::Block(n)) => vec![InputEvent::DragStart {
            source_id: block_id(n)?,
            is_template: false,
            kind: None,
        }],
        ReplCommand::Drop(target) => {
            let Some(source_id) = deck.gesture().active_id.clone() else {
                return Err("nothing is being dragged".into());
            };
            let target_id = match target {
                DropArg::Outside => None,
                DropArg::List => Some(LIST_DROP_ID.to_string()),
                DropArg::Block(n) => Some(block_id(n)?),
            };
            vec![InputEvent::DragEnd {
                source_id,
                target_id,
            }]
        }
        ReplCommand::Cancel => vec![InputEvent::Cancel],
        ReplCommand::Add(kind) => vec![
            InputEvent::palette(kind),
            InputEvent::drop_on(format!("palette-{kind}"), LIST_DROP_ID),
        ],
        ReplCommand::Move(from, to) => {
            let source_id = block_id(from)?;
            let target_id = block_id(to)?;
            vec![
                InputEvent::DragStart {
                    source_id: source_id.clone(),
                    is_template: false,
                    kind: None,
                },
                InputEvent::drop_on(source_id, target_id),
            ]
        }
        ReplCommand::Remove(n) => vec![InputEvent::Remove { id: block_id(n)? }],
        ReplCommand::Reset => vec![InputEvent::Reset],
        ReplCommand::Show | ReplCommand::Json | ReplCommand::Help | ReplCommand::Quit => {
            Vec::new()
        }
    };
    Ok(events)
}

pub async fn run(seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let mut deck = build_deck(seed)?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        PromptDeck — Interactive Mode         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("{HELP}");
    println!();
    print_snapshot(&deck.snapshot());
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }

        match parse_command(line) {
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Help) => println!("{HELP}"),
            Ok(ReplCommand::Show) => print_snapshot(&deck.snapshot()),
            Ok(ReplCommand::Json) => {
                println!("{}", serde_json::to_string_pretty(&deck.snapshot())?)
            }
            Ok(command) => match apply(&mut deck, command) {
                Ok(outcomes) => {
                    for outcome in &outcomes {
                        println!("  {}", describe(outcome));
                    }
                    if outcomes.iter().any(Outcome::is_mutation) {
                        print_snapshot(&deck.snapshot());
                    }
                }
                Err(e) => eprintln!("  [Error] {e}"),
            },
            Err(e) => eprintln!("  [Error] {e} (type `help`)"),
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

fn apply(deck: &mut Deck, command: ReplCommand) -> Result<Vec<Outcome>, String> {
    let events = to_events(deck, command)?;
    events
        .into_iter()
        .map(|event| deck.dispatch(event).map_err(|e| e.to_string()))
        .collect()
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  deck > ");
    std::io::stdout().flush()
}
