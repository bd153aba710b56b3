//! Player and map naming helpers.

use rand::Rng;
use thiserror::Error;

pub const MIN_PLAYER_NAME_LEN: usize = 3;
pub const MAX_PLAYER_NAME_LEN: usize = 16;

/// Used by the start menu when the player leaves the name blank.
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous Player";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Check a player name against length bounds, counting characters after trimming.
pub fn validate_player_name(name: &str, min: usize, max: usize) -> Result<(), NameError> {
    let len = name.trim().chars().count();
    if len < min {
        Err(NameError::TooShort { min })
    } else if len > max {
        Err(NameError::TooLong { max })
    } else {
        Ok(())
    }
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// `Player-` followed by 7 random base-36 characters.
pub fn random_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Player-{}", random_suffix(rng, 7))
}

/// `Map-` followed by 6 random base-36 characters.
pub fn random_map_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Map-{}", random_suffix(rng, 6))
}
