use rand::Rng;
use std::fmt;
use std::num::IntErrorKind;

pub const MIN_NUMBER: i64 = 1;
pub const MAX_NUMBER: i64 = 100;
pub const MAX_ATTEMPTS: u32 = 10;

/// Range and attempt limit shared by every game on a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub min: i64,
    pub max: i64,
    pub max_attempts: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min: MIN_NUMBER,
            max: MAX_NUMBER,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("lowest number {min} is above highest number {max}")]
    EmptyRange { min: i64, max: i64 },
    #[error("a game needs at least one attempt")]
    NoAttempts,
}

impl GameRules {
    pub fn new(min: i64, max: i64, max_attempts: u32) -> Result<Self, RulesError> {
        if min > max {
            return Err(RulesError::EmptyRange { min, max });
        }
        if max_attempts == 0 {
            return Err(RulesError::NoAttempts);
        }

        Ok(Self {
            min,
            max,
            max_attempts,
        })
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn draw_secret<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Rejected guesses. Neither variant touches the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error("Please enter a valid number.")]
    NotANumber,
    #[error("The number must be between {min} and {max}.")]
    OutOfRange { min: i64, max: i64 },
    #[error("The game is over.")]
    GameOver,
}

/// Bootstrap alert flavour used when showing feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Success,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Success => "success",
            AlertLevel::Danger => "danger",
        }
    }
}

impl GuessError {
    pub fn alert(&self) -> AlertLevel {
        AlertLevel::Warning
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { attempts: u32 },
    Exhausted,
    TooLow { remaining: u32 },
    TooHigh { remaining: u32 },
}

impl GuessOutcome {
    pub fn alert(&self) -> AlertLevel {
        match self {
            GuessOutcome::Correct { .. } => AlertLevel::Success,
            GuessOutcome::Exhausted => AlertLevel::Danger,
            GuessOutcome::TooLow { .. } | GuessOutcome::TooHigh { .. } => AlertLevel::Info,
        }
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessOutcome::Correct { attempts } => {
                write!(f, "Congratulations! You guessed it in {} attempts.", attempts)
            }
            GuessOutcome::Exhausted => write!(f, "Sorry, you are out of guesses. Game over."),
            GuessOutcome::TooLow { remaining } => {
                write!(f, "Too low. Remaining guesses: {}.", remaining)
            }
            GuessOutcome::TooHigh { remaining } => {
                write!(f, "Too high. Remaining guesses: {}.", remaining)
            }
        }
    }
}

/// Parses raw form input into a guess inside the configured range.
///
/// Surrounding whitespace is ignored and a leading sign is accepted. Integers
/// too large for an `i64` are reported as out of range rather than as garbage.
/// Only ASCII digits count: digit separators like `1_0` and non-ASCII digits
/// are not a number.
pub fn parse_guess(raw: &str, rules: &GameRules) -> Result<i64, GuessError> {
    let out_of_range = GuessError::OutOfRange {
        min: rules.min,
        max: rules.max,
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if rules.contains(value) => Ok(value),
        Ok(_) => Err(out_of_range),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(out_of_range),
            _ => Err(GuessError::NotANumber),
        },
    }
}

/// Per-player game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub secret: i64,
    pub attempts: u32,
    pub history: Vec<i64>,
    pub finished: bool,
}

impl GameSession {
    pub fn new(secret: i64) -> Self {
        Self {
            secret,
            attempts: 0,
            history: Vec::new(),
            finished: false,
        }
    }

    pub fn start<R: Rng + ?Sized>(rules: &GameRules, rng: &mut R) -> Self {
        Self::new(rules.draw_secret(rng))
    }

    pub fn remaining(&self, rules: &GameRules) -> u32 {
        rules.max_attempts.saturating_sub(self.attempts)
    }

    /// Validates and applies one guess.
    ///
    /// Only a valid guess on an unfinished game changes anything: the attempt
    /// counter and history grow by one and the game may end. A hit is checked
    /// before the attempt limit, so guessing right on the last attempt wins.
    pub fn guess(&mut self, raw: &str, rules: &GameRules) -> Result<GuessOutcome, GuessError> {
        if self.finished {
            return Err(GuessError::GameOver);
        }

        let value = parse_guess(raw, rules)?;
        self.attempts += 1;
        self.history.push(value);

        if value == self.secret {
            self.finished = true;
            return Ok(GuessOutcome::Correct {
                attempts: self.attempts,
            });
        }

        if self.attempts >= rules.max_attempts {
            self.finished = true;
            return Ok(GuessOutcome::Exhausted);
        }

        let remaining = self.remaining(rules);
        if value < self.secret {
            Ok(GuessOutcome::TooLow { remaining })
        } else {
            Ok(GuessOutcome::TooHigh { remaining })
        }
    }
}
