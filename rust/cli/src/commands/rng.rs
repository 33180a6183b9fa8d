//! `rng` command: print what the seeded ChaCha20 source produces, so a seed
//! can be checked for reproducibility across machines.

use crate::error::CliError;
use crate::formatters::format_card;
use rand::{RngCore, SeedableRng};
use sabacc_engine::coin::{CoinToss, RandomCoin};
use sabacc_engine::deck::Deck;
use sabacc_engine::player::Side;
use std::io::Write;

const SAMPLE_LEN: usize = 5;
const COIN_TOSSES: usize = 8;
const TOP_CARDS: usize = 4;

pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(s);
    let vals: Vec<u64> = (0..SAMPLE_LEN).map(|_| rng.next_u64()).collect();

    let mut coin = RandomCoin::new_with_seed(s);
    let tosses: String = (0..COIN_TOSSES)
        .map(|_| match coin.toss() {
            Side::Player => 'P',
            Side::Dealer => 'D',
        })
        .collect();

    let deck = Deck::shuffled_with_seed(s);
    let top: Vec<String> = deck.cards().iter().take(TOP_CARDS).map(format_card).collect();

    writeln!(out, "Seed: {}", deck.seed())?;
    writeln!(out, "RNG sample: {:?}", vals)?;
    writeln!(out, "Coin tosses: {}", tosses)?;
    writeln!(out, "Top of deck: {} ({} cards)", top.join(", "), deck.remaining())?;
    Ok(())
}
