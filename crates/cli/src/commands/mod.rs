//! Subcommand implementations.

pub mod config_cmd;
pub mod demo;
pub mod interactive;
pub mod replay;
pub mod status;

use promptdeck_config::AppConfig;
use promptdeck_core::{Deck, RandomCost};

/// Drop-target id of the list container itself (not a block).
pub const LIST_DROP_ID: &str = "deck-list";

/// Load config and build a deck.
pub fn build_deck(seed: Option<u64>) -> Result<Deck, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    deck_from_config(&config, seed)
}

/// A `--seed` flag beats the config (or `PROMPTDECK_SEED`) seed.
pub(crate) fn effective_seed(flag: Option<u64>, config: &AppConfig) -> Option<u64> {
    flag.or(config.seed)
}

pub(crate) fn deck_from_config(
    config: &AppConfig,
    seed: Option<u64>,
) -> Result<Deck, Box<dyn std::error::Error>> {
    let settings = config.to_settings()?;

    let cost_source = match effective_seed(seed, config) {
        Some(seed) => {
            tracing::debug!(seed, "Using seeded token costs");
            RandomCost::seeded(seed)
        }
        None => RandomCost::new(),
    };

    Ok(Deck::new(settings, Box::new(cost_source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdeck_core::{BlockKind, InputEvent, Outcome};

    fn inserted_costs(deck: &mut Deck, count: usize) -> Vec<u32> {
        (0..count)
            .map(|_| {
                deck.dispatch(InputEvent::palette(BlockKind::User)).unwrap();
                match deck
                    .dispatch(InputEvent::drop_on("palette-user", LIST_DROP_ID))
                    .unwrap()
                {
                    Outcome::Inserted { block } => block.token_cost(),
                    other => panic!("expected an insert, got {other:?}"),
                }
            })
            .collect()
    }

    #[test]
    fn seed_flag_takes_precedence() {
        let config = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };
        assert_eq!(effective_seed(Some(2), &config), Some(2));
        assert_eq!(effective_seed(None, &config), Some(1));
        assert_eq!(effective_seed(None, &AppConfig::default()), None);
    }

    #[test]
    fn flag_seed_drives_token_costs() {
        let config = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };
        let mut flagged = deck_from_config(&config, Some(77)).unwrap();
        let mut plain = deck_from_config(&AppConfig::default(), Some(77)).unwrap();
        let mut config_only = deck_from_config(&config, None).unwrap();

        let costs = inserted_costs(&mut flagged, 16);
        assert_eq!(costs, inserted_costs(&mut plain, 16));
        assert_ne!(costs, inserted_costs(&mut config_only, 16));
    }
}
