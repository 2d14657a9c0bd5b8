//! Sources of identifiers, fake data and time used to build broadcast messages.
//!
//! Payload assembly in [`payload`](../payload/index.html) never reads the clock or a random
//! number generator directly. Everything it needs comes through a [`PayloadSource`], so a
//! load test can use the thread-local generator and the system clock while a test can use
//! a seeded generator and a frozen clock without touching the assembly logic.
//!
//! ```rust
//! use broadcast_loadtest::source::{FixedClock, PayloadSource, SeededSource};
//! use chrono::{TimeZone, Utc};
//!
//! let frozen = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! let mut source = SeededSource::seeded(42, FixedClock::new(frozen));
//!
//! assert_eq!(source.current_utc_time(), frozen);
//! assert_eq!(source.new_time_ordered_id().timestamp_ms(), 1_705_314_600_000);
//! ```

use chrono::{DateTime, Utc};
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use ulid::Ulid;
use uuid::Uuid;

/// The fewest words a generated sentence contains.
pub const SENTENCE_MIN_WORDS: usize = 4;
/// The most words a generated sentence contains.
pub const SENTENCE_MAX_WORDS: usize = 10;

/// Anything that can tell the current UTC time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that is stopped at a single instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedClock(DateTime<Utc>);
impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        FixedClock(instant)
    }
}
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The capabilities needed to build one broadcast message.
pub trait PayloadSource {
    /// A new lexicographically sortable identifier, time-prefixed with
    /// [`current_utc_time`](#tymethod.current_utc_time).
    fn new_time_ordered_id(&mut self) -> Ulid;
    /// A new random (version 4) identifier.
    fn new_random_id(&mut self) -> Uuid;
    /// A human-looking full name.
    fn fake_name(&mut self) -> String;
    /// A short grammatical sentence, capitalized and ending with a period.
    fn fake_sentence(&mut self) -> String;
    /// The current UTC time.
    fn current_utc_time(&self) -> DateTime<Utc>;
}

/// A [`PayloadSource`] backed by a random number generator and a [`Clock`].
///
/// Identifiers generated by the same source are strictly increasing, even when the clock
/// does not advance between calls.
#[derive(Debug)]
pub struct RandomSource<R, C> {
    rng: R,
    clock: C,
    last_id: Option<Ulid>,
}

/// The source used while load testing: thread-local entropy and the system clock.
pub type SystemSource = RandomSource<ThreadRng, SystemClock>;

/// A reproducible source: the same seed and clock always yield the same payloads.
pub type SeededSource<C> = RandomSource<StdRng, C>;

impl RandomSource<ThreadRng, SystemClock> {
    /// Cheap to build, so each transaction builds its own.
    pub fn new() -> Self {
        RandomSource::with_rng(rand::rng(), SystemClock)
    }
}

impl Default for RandomSource<ThreadRng, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RandomSource<StdRng, C> {
    pub fn seeded(seed: u64, clock: C) -> Self {
        RandomSource::with_rng(StdRng::seed_from_u64(seed), clock)
    }
}

impl<R: Rng, C: Clock> RandomSource<R, C> {
    /// Build a source from any random number generator and clock.
    pub fn with_rng(rng: R, clock: C) -> Self {
        RandomSource {
            rng,
            clock,
            last_id: None,
        }
    }

    /// Milliseconds since the Unix epoch, clamped to the 48 bits a ULID timestamp holds.
    fn timestamp_ms(&self) -> u64 {
        let millis = self.clock.now().timestamp_millis().max(0) as u64;
        millis.min(ULID_TIMESTAMP_MAX)
    }

    fn random_suffix(&mut self) -> u128 {
        self.rng.random::<u128>() & ULID_RANDOM_MASK
    }
}

const ULID_TIMESTAMP_MAX: u64 = (1 << 48) - 1;
const ULID_RANDOM_MASK: u128 = (1 << 80) - 1;

impl<R: Rng, C: Clock> PayloadSource for RandomSource<R, C> {
    fn new_time_ordered_id(&mut self) -> Ulid {
        let timestamp = self.timestamp_ms();
        let id = match self.last_id {
            // Same millisecond (or a clock that went backwards): keep ordering by bumping the
            // random part of the previous identifier.
            Some(last) if last.timestamp_ms() >= timestamp => match last.increment() {
                Some(next) => next,
                // Random part exhausted: borrow the next millisecond.
                None => Ulid::from_parts(
                    (last.timestamp_ms() + 1).min(ULID_TIMESTAMP_MAX),
                    self.random_suffix(),
                ),
            },
            _ => Ulid::from_parts(timestamp, self.random_suffix()),
        };
        self.last_id = Some(id);
        id
    }

    fn new_random_id(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    fn fake_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn fake_sentence(&mut self) -> String {
        let words: Vec<String> =
            Words(SENTENCE_MIN_WORDS..SENTENCE_MAX_WORDS + 1).fake_with_rng(&mut self.rng);
        sentence_from_words(&words)
    }

    fn current_utc_time(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Join words into a sentence: first letter upper case, single spaces, trailing period.
pub fn sentence_from_words<S: AsRef<str>>(words: &[S]) -> String {
    let joined = words
        .iter()
        .map(AsRef::as_ref)
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>()
        .join(" ");

    let mut chars = joined.chars();
    let mut sentence = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    sentence.push('.');
    sentence
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn frozen() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
    }

    #[test]
    fn fixed_clock_never_moves() {
        let clock = frozen();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 1_705_314_600);
    }

    #[test]
    fn ulid_timestamp_follows_clock() {
        let mut source = SeededSource::seeded(7, frozen());
        let id = source.new_time_ordered_id();
        assert_eq!(id.timestamp_ms(), 1_705_314_600_000);
        assert_eq!(id.to_string().len(), 26);
    }

    #[test]
    fn ulids_increase_under_frozen_clock() {
        let mut source = SeededSource::seeded(7, frozen());
        let mut previous = source.new_time_ordered_id();
        for _ in 0..1_000 {
            let next = source.new_time_ordered_id();
            assert!(next > previous);
            assert!(next.to_string() > previous.to_string());
            previous = next;
        }
    }

    #[test]
    fn ulid_overflow_moves_to_next_millisecond() {
        let mut source = SeededSource::seeded(7, frozen());
        let saturated = Ulid::from_parts(1_705_314_600_000, ULID_RANDOM_MASK);
        source.last_id = Some(saturated);
        let next = source.new_time_ordered_id();
        assert_eq!(next.timestamp_ms(), 1_705_314_600_001);
        assert!(next > saturated);
    }

    #[test]
    fn uuids_are_version_4() {
        let mut source = SeededSource::seeded(11, frozen());
        let id = source.new_random_id();
        assert_eq!(id.get_version_num(), 4);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn same_seed_same_output() {
        let mut first = SeededSource::seeded(99, frozen());
        let mut second = SeededSource::seeded(99, frozen());
        assert_eq!(first.new_time_ordered_id(), second.new_time_ordered_id());
        assert_eq!(first.new_random_id(), second.new_random_id());
        assert_eq!(first.fake_name(), second.fake_name());
        assert_eq!(first.fake_sentence(), second.fake_sentence());
    }

    #[test]
    fn names_and_sentences_are_not_empty() {
        let mut source = SystemSource::new();
        for _ in 0..50 {
            let name = source.fake_name();
            assert!(!name.trim().is_empty());

            let sentence = source.fake_sentence();
            assert!(sentence.ends_with('.'));
            let words = sentence.trim_end_matches('.').split(' ').count();
            assert!((SENTENCE_MIN_WORDS..=SENTENCE_MAX_WORDS).contains(&words));
            assert!(sentence.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn sentence_formatting() {
        assert_eq!(
            sentence_from_words(&["lorem", "ipsum", "dolor"]),
            "Lorem ipsum dolor."
        );
        assert_eq!(sentence_from_words(&["", "sit", "", "amet"]), "Sit amet.");
        assert_eq!(sentence_from_words::<&str>(&[]), ".");
    }
}
