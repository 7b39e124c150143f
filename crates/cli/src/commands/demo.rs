//! `promptdeck demo` — Scripted walk through a context build.

use promptdeck_core::{BlockKind, Deck, InputEvent, Outcome, INITIAL_BLOCK_ID};

use super::{build_deck, LIST_DROP_ID};
use crate::render::print_snapshot;

pub async fn run(seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let mut deck = build_deck(seed)?;

    println!("🧱 PromptDeck Demo");
    println!("==================\n");
    step(&mut deck, "Start", &[])?;

    let user_step = step(
        &mut deck,
        "Drag a user message from the palette onto the list",
        &[
            InputEvent::palette(BlockKind::User),
            InputEvent::drop_on("palette-user", INITIAL_BLOCK_ID),
        ],
    )?;

    step(
        &mut deck,
        "Drag an assistant message but let go outside the list",
        &[
            InputEvent::palette(BlockKind::Assistant),
            InputEvent::drop_outside("palette-assistant"),
        ],
    )?;

    step(
        &mut deck,
        "Drag an assistant message onto the list",
        &[
            InputEvent::palette(BlockKind::Assistant),
            InputEvent::drop_on("palette-assistant", LIST_DROP_ID),
        ],
    )?;

    let user_id = user_step
        .iter()
        .find_map(|outcome| match outcome {
            Outcome::Inserted { block } => Some(block.id().clone()),
            _ => None,
        })
        .ok_or("user message was not inserted")?;
    step(
        &mut deck,
        "Move the user message above the system prompt",
        &[
            InputEvent::grab(&user_id),
            InputEvent::drop_on(user_id.as_str(), INITIAL_BLOCK_ID),
        ],
    )?;

    step(
        &mut deck,
        "Delete the system prompt",
        &[InputEvent::Remove {
            id: INITIAL_BLOCK_ID.into(),
        }],
    )?;

    step(&mut deck, "Reset", &[InputEvent::Reset])?;

    Ok(())
}

fn step(
    deck: &mut Deck,
    title: &str,
    events: &[InputEvent],
) -> Result<Vec<Outcome>, Box<dyn std::error::Error>> {
    println!("▶ {title}");
    let mut outcomes = Vec::with_capacity(events.len());
    for event in events {
        let outcome = deck.dispatch(event.clone())?;
        println!("    {}", describe(&outcome));
        outcomes.push(outcome);
    }
    print_snapshot(&deck.snapshot());
    println!();
    Ok(outcomes)
}

pub(crate) fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Started => "drag started".into(),
        Outcome::Ignored => "ignored".into(),
        Outcome::Cancelled { source_id } => format!("cancelled drag of {source_id}"),
        Outcome::NoOp => "no change".into(),
        Outcome::Inserted { block } => format!(
            "appended {} block ({} tokens)",
            block.kind(),
            block.token_cost()
        ),
        Outcome::Moved { from, to, .. } => format!("moved #{} → #{}", from + 1, to + 1),
        Outcome::Removed { block } => format!("removed {} block", block.kind()),
        Outcome::Reset => "reset to the initial system block".into(),
    }
}
