//! `promptdeck replay` — Apply recorded input events from a JSON file.

use promptdeck_core::{Deck, DeckSnapshot, InputEvent, Outcome};
use serde_json::json;
use std::path::Path;

use super::build_deck;

pub async fn run(
    file: &Path,
    seed: Option<u64>,
    each: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let events = InputEvent::parse_list(&raw)
        .map_err(|e| format!("Failed to parse events in {}: {e}", file.display()))?;

    let mut deck = build_deck(seed)?;
    tracing::info!(count = events.len(), "Replaying input events");

    let steps = apply_all(&mut deck, events)?;
    if each {
        for (index, (event, outcome, snapshot)) in steps.iter().enumerate() {
            let line = json!({
                "step": index + 1,
                "event": event,
                "outcome": outcome,
                "snapshot": snapshot,
            });
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&deck.snapshot())?);
    }

    Ok(())
}

/// Dispatch every event, recording the outcome and resulting snapshot.
pub(crate) fn apply_all(
    deck: &mut Deck,
    events: Vec<InputEvent>,
) -> Result<Vec<(InputEvent, Outcome, DeckSnapshot)>, Box<dyn std::error::Error>> {
    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let outcome = deck
            .dispatch(event.clone())
            .map_err(|e| format!("Event #{}: {e}", index + 1))?;
        steps.push((event, outcome, deck.snapshot()));
    }
    Ok(steps)
}
