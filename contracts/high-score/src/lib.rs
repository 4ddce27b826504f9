//! Stellarcade High Score Contract
//!
//! An on-chain scoreboard that keeps every player's best score together with
//! a display name, plus a single champion: the player who first reached the
//! highest score seen so far.
//!
//! ## Game Flow
//! 1. A player calls `submit_score` with a score and (optionally) a name.
//!    The first call creates their record; later calls can only raise it.
//! 2. A player calls `change_name` to relabel their record at any time.
//! 3. Anyone calls `get_high_score` for the champion or `get_best_for` for a
//!    given player.
//!
//! ## Champion Rules
//! - The champion changes only when a submission strictly exceeds the
//!   current high score. A tie keeps the earlier holder.
//! - The champion's score and name are read from their live record, so a
//!   rename shows up in `get_high_score` immediately.
//! - An empty board reports `(0, "nobody")`.
//!
//! ## Storage Strategy
//! - `instance()` storage: the champion pointer and the player count. Small,
//!   bounded, stored in a single ledger entry.
//! - `persistent()` storage: one `PlayerRecord` per player, each an independent
//!   ledger entry with its TTL extended on every write (~30 days).
//!
//! ## Security
//! - Every mutation requires the player's own authorization; nobody can submit
//!   or rename on behalf of another address.
//! - Names are capped at `MAX_NAME_LEN` bytes.
//! - Lower or equal submissions never reduce a stored score.
#![no_std]
#![allow(unexpected_cfgs)]

#[cfg(test)]
extern crate std;

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, Env, IntoVal,
    String, Val,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest display name accepted, in bytes.
///
/// Longer names are rejected with `NameTooLong`; this is the one input for
/// which `submit_score` can fail.
pub const MAX_NAME_LEN: u32 = 32;

/// Name reported by `get_high_score` before anyone has taken the crown.
pub const DEFAULT_CHAMPION_NAME: &str = "nobody";

/// Persistent storage TTL (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// Instance storage TTL, bumped on every mutation.
pub const INSTANCE_BUMP_LEDGERS: u32 = 518_400;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    PlayerNotFound = 1,
    NameTooLong = 2,
    Overflow = 3,
}

// ---------------------------------------------------------------------------
// Storage types
// ---------------------------------------------------------------------------

/// A player's best score and current display name.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayerRecord {
    /// Never decreases once written.
    pub score: u64,
    pub name: String,
}

/// Query result for `get_high_score` and `get_best_for`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreRow {
    pub name: String,
    pub score: u64,
}

impl From<PlayerRecord> for ScoreRow {
    fn from(record: PlayerRecord) -> Self {
        ScoreRow {
            name: record.name,
            score: record.score,
        }
    }
}

/// What a successful `submit_score` did to the caller's stored score.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// First submission; the record was created.
    Created = 0,
    /// The submitted score beat the stored one.
    Improved = 1,
    /// The submitted score was lower or equal; the stored score was kept.
    Unchanged = 2,
}

/// Storage key discriminants.
///
/// Instance keys (Champion, PlayerCount) hold board-wide state in a single
/// ledger entry. Persistent keys (Player) are per-player, each stored as an
/// independent ledger entry with its own TTL.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() keys ---
    /// Address of the player who first reached the current high score.
    Champion,
    /// Number of distinct players with a record.
    PlayerCount,
    // --- persistent() keys ---
    /// PlayerRecord keyed by player address.
    Player(Address),
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct ScoreSubmitted {
    #[topic]
    pub player: Address,
    /// Score carried by this submission.
    pub score: u64,
    /// Player's stored best after the submission.
    pub best: u64,
}

#[contractevent]
pub struct HighScoreSet {
    #[topic]
    pub player: Address,
    pub score: u64,
}

#[contractevent]
pub struct NameChanged {
    #[topic]
    pub player: Address,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct HighScore;

#[contractimpl]
impl HighScore {
    // -----------------------------------------------------------------------
    // submit_score
    // -----------------------------------------------------------------------

    /// Record a score for `player`.
    ///
    /// Creates the player's record on the first call. Afterwards the stored
    /// score is only replaced by a strictly higher one; a lower or equal score
    /// is accepted and leaves it as is (`SubmitOutcome::Unchanged`).
    ///
    /// A supplied `name` always overwrites the display name, whether or not
    /// the score improved. `None` keeps the current name (an empty name on a
    /// first submission).
    ///
    /// The player takes the crown when their best strictly exceeds the
    /// current high score.
    ///
    /// Emits `ScoreSubmitted`, and `HighScoreSet` when the high score moves.
    pub fn submit_score(
        env: Env,
        player: Address,
        score: u64,
        name: Option<String>,
    ) -> Result<SubmitOutcome, Error> {
        player.require_auth();

        if let Some(name) = &name {
            check_name(name)?;
        }

        // Read before the player write: the caller may already be champion.
        let high_score = load_champion(&env).map_or(0, |record| record.score);

        let key = DataKey::Player(player.clone());
        let (record, outcome) = match env.storage().persistent().get::<_, PlayerRecord>(&key) {
            None => {
                let count = load_player_count(&env)
                    .checked_add(1)
                    .ok_or(Error::Overflow)?;
                env.storage().instance().set(&DataKey::PlayerCount, &count);

                let record = PlayerRecord {
                    score,
                    name: name.unwrap_or_else(|| String::from_str(&env, "")),
                };
                (record, SubmitOutcome::Created)
            }
            Some(mut record) => {
                let outcome = if score > record.score {
                    record.score = score;
                    SubmitOutcome::Improved
                } else {
                    SubmitOutcome::Unchanged
                };
                if let Some(name) = name {
                    record.name = name;
                }
                (record, outcome)
            }
        };

        persist_set(&env, key, &record);

        if record.score > high_score {
            env.storage().instance().set(&DataKey::Champion, &player);
            HighScoreSet {
                player: player.clone(),
                score: record.score,
            }
            .publish(&env);
        }
        bump_instance(&env);

        ScoreSubmitted {
            player,
            score,
            best: record.score,
        }
        .publish(&env);

        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // change_name
    // -----------------------------------------------------------------------

    /// Replace the display name of an existing player. The score is untouched.
    ///
    /// Fails with `PlayerNotFound` if `player` has never submitted a score.
    ///
    /// Emits `NameChanged`.
    pub fn change_name(env: Env, player: Address, name: String) -> Result<(), Error> {
        player.require_auth();
        check_name(&name)?;

        let key = DataKey::Player(player.clone());
        let mut record: PlayerRecord = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::PlayerNotFound)?;

        record.name = name.clone();
        persist_set(&env, key, &record);
        bump_instance(&env);

        NameChanged { player, name }.publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // View helpers
    // -----------------------------------------------------------------------

    /// Current champion's score and name, or `(0, "nobody")` on an empty board.
    pub fn get_high_score(env: Env) -> ScoreRow {
        match load_champion(&env) {
            Some(record) => record.into(),
            None => ScoreRow {
                name: String::from_str(&env, DEFAULT_CHAMPION_NAME),
                score: 0,
            },
        }
    }

    /// Best score and name of `player`. Unknown players are `PlayerNotFound`.
    pub fn get_best_for(env: Env, player: Address) -> Result<ScoreRow, Error> {
        load_player(&env, &player).map(ScoreRow::from)
    }

    /// Caller-scoped variant of `get_best_for`; answers only for the signer.
    pub fn get_my_score(env: Env, player: Address) -> Result<ScoreRow, Error> {
        player.require_auth();
        load_player(&env, &player).map(ScoreRow::from)
    }

    /// Address currently holding the high score, if any.
    pub fn get_champion(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Champion)
    }

    /// Number of distinct players on the board.
    pub fn player_count(env: Env) -> u32 {
        load_player_count(&env)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn check_name(name: &String) -> Result<(), Error> {
    if name.len() > MAX_NAME_LEN {
        return Err(Error::NameTooLong);
    }
    Ok(())
}

fn load_player(env: &Env, player: &Address) -> Result<PlayerRecord, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Player(player.clone()))
        .ok_or(Error::PlayerNotFound)
}

/// Live record of the current champion.
///
/// Records are never deleted, so a stored champion always has a record
/// behind it; the `None` from a missing record is unreachable.
fn load_champion(env: &Env) -> Option<PlayerRecord> {
    let champion: Address = env.storage().instance().get(&DataKey::Champion)?;
    load_player(env, &champion).ok()
}

fn load_player_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PlayerCount)
        .unwrap_or(0)
}

/// Persist a value in persistent storage and extend its TTL.
fn persist_set<V: IntoVal<Env, Val>>(env: &Env, key: DataKey, val: &V) {
    env.storage().persistent().set(&key, val);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_BUMP_LEDGERS, INSTANCE_BUMP_LEDGERS);
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
