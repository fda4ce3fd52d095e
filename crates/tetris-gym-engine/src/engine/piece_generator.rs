use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::piece::{Piece, PieceKind};

/// Deals pieces using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. The bag is filled with one of each of the 7 piece kinds
/// 2. The bag is shuffled with the generator's own random source
/// 3. Pieces are dealt from the bag until it is empty
/// 4. An empty bag is refilled before the next deal or peek
///
/// Every run of 7 deals that starts on a bag boundary therefore contains each
/// kind exactly once.
///
/// The random source is owned by the generator and injected by the caller,
/// so a seeded source gives a reproducible piece sequence.
///
/// # Example
///
/// ```
/// use tetris_gym_engine::{PieceGenerator, PieceSeed};
///
/// let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(42));
///
/// let upcoming = generator.peek_next();
/// let piece = generator.next_piece();
/// assert_eq!(piece.kind(), upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator<R = Pcg32> {
    rng: R,
    bag: Vec<PieceKind>,
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the [`Pcg32`] random
/// number generator behind [`PieceGenerator::with_seed`]. Using the same seed
/// will produce the same sequence of pieces, enabling:
///
/// - Reproducible episodes
/// - Deterministic testing
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tetris_gym_engine::{BoardConfig, Board, PieceSeed};
///
/// // Generate a random seed
/// let seed: PieceSeed = rand::rng().random();
///
/// let board1 = Board::with_seed(BoardConfig::default(), seed).unwrap();
/// let board2 = Board::with_seed(BoardConfig::default(), seed).unwrap();
///
/// assert_eq!(board1.current_piece(), board2.current_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Expands a 64-bit seed into a full seed.
    ///
    /// Uses `Pcg32`'s own `seed_from_u64` expansion, so equal inputs always
    /// give equal seeds.
    #[must_use]
    pub fn from_u64(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        rng.random()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Builds the random source this seed stands for.
    #[must_use]
    pub fn into_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceGenerator<Pcg32> {
    /// Creates a generator seeded from the thread-local entropy source.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::from_entropy`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::new(seed.into_rng())
    }
}

impl<R> PieceGenerator<R>
where
    R: Rng,
{
    /// Creates a generator drawing randomness from `rng`.
    ///
    /// The bag is immediately filled with the first shuffled set of 7 pieces.
    pub fn new(rng: R) -> Self {
        let mut this = Self {
            rng,
            bag: Vec::with_capacity(PieceKind::LEN),
        };
        this.refill_bag();
        this
    }

    /// Replaces the bag with all 7 kinds in a freshly shuffled order.
    pub fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }

    fn ensure_filled(&mut self) {
        if self.bag.is_empty() {
            self.refill_bag();
        }
    }

    /// Deals the next piece, placed at the spawn position with rotation 0.
    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }

    /// Deals the next piece kind from the bag.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty (should never happen with proper refill logic).
    pub fn next_kind(&mut self) -> PieceKind {
        self.ensure_filled();
        self.bag.pop().expect("Piece bag should never be empty")
    }

    /// Returns the kind the next deal will produce, without consuming it.
    ///
    /// An empty bag is refilled first, exactly as a deal would; the following
    /// [`Self::next_piece`] then deals from that same bag.
    pub fn peek_next(&mut self) -> PieceKind {
        self.ensure_filled();
        *self.bag.last().expect("Piece bag should never be empty")
    }

    /// Kinds left in the current bag, in the order they will be dealt.
    pub fn upcoming(&self) -> impl ExactSizeIterator<Item = PieceKind> + '_ {
        self.bag.iter().rev().copied()
    }

    /// Number of kinds left in the current bag.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Consumes the generator and returns its random source.
    ///
    /// Lets a replacement generator continue the same random stream.
    pub fn into_rng(self) -> R {
        self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_kinds(kinds: &[PieceKind]) -> [usize; PieceKind::LEN] {
        let mut counts = [0; PieceKind::LEN];
        for kind in kinds {
            counts[kind.index()] += 1;
        }
        counts
    }

    #[test]
    fn test_each_bag_contains_every_kind_once() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(7));
        for _ in 0..50 {
            let bag: Vec<_> = (0..PieceKind::LEN).map(|_| generator.next_kind()).collect();
            assert_eq!(count_kinds(&bag), [1; PieceKind::LEN], "bag: {bag:?}");
        }
    }

    #[test]
    fn test_fairness_over_many_bags() {
        let k = 100;
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(1234));
        let dealt: Vec<_> = (0..PieceKind::LEN * k)
            .map(|_| generator.next_piece().kind())
            .collect();
        assert_eq!(count_kinds(&dealt), [k; PieceKind::LEN]);
    }

    #[test]
    fn test_new_piece_is_at_spawn() {
        let mut generator = PieceGenerator::from_entropy();
        for _ in 0..14 {
            let piece = generator.next_piece();
            assert_eq!(piece, Piece::new(piece.kind()));
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(99));
        for _ in 0..30 {
            let peeked = generator.peek_next();
            assert_eq!(generator.peek_next(), peeked);
            assert_eq!(generator.next_kind(), peeked);
        }
    }

    #[test]
    fn test_peek_on_empty_bag_refills_once() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(5));
        for _ in 0..PieceKind::LEN {
            generator.next_kind();
        }
        assert_eq!(generator.remaining(), 0);

        let peeked = generator.peek_next();
        assert_eq!(generator.remaining(), PieceKind::LEN);

        // The deal uses the bag the peek filled, it does not refill again.
        let bag: Vec<_> = generator.upcoming().collect();
        assert_eq!(bag[0], peeked);
        let dealt: Vec<_> = (0..PieceKind::LEN).map(|_| generator.next_kind()).collect();
        assert_eq!(dealt, bag);
    }

    #[test]
    fn test_peek_matches_unpeeked_sequence() {
        let seed = PieceSeed::from_u64(2024);
        let mut peeking = PieceGenerator::with_seed(seed);
        let mut plain = PieceGenerator::with_seed(seed);
        for _ in 0..40 {
            peeking.peek_next();
            assert_eq!(peeking.next_kind(), plain.next_kind());
        }
    }

    #[test]
    fn test_upcoming_is_deal_order() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_u64(3));
        generator.next_kind();
        let upcoming: Vec<_> = generator.upcoming().collect();
        assert_eq!(upcoming.len(), PieceKind::LEN - 1);
        for kind in upcoming {
            assert_eq!(generator.next_kind(), kind);
        }
    }

    #[test]
    fn test_into_rng_continues_stream() {
        let seed = PieceSeed::from_u64(11);
        let mut a = PieceGenerator::with_seed(seed);
        let mut b = PieceGenerator::with_seed(seed);
        for _ in 0..3 {
            assert_eq!(a.next_kind(), b.next_kind());
        }

        // Replacing the generator keeps the stream but starts a fresh bag.
        let mut a = PieceGenerator::new(a.into_rng());
        let mut b = PieceGenerator::new(b.into_rng());
        assert_eq!(a.remaining(), PieceKind::LEN);
        for _ in 0..21 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: bytes appear in order as hex pairs
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_deserialize_uppercase_hex() {
            let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
            let deserialized: PieceSeed = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized.as_bytes()[0], 0x01);
            assert_eq!(deserialized.as_bytes()[15], 0x10);
        }

        #[test]
        fn test_error_cases() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"", // 32 chars but not hex
                "\"0123456789abcdef0123456789abcde\"",  // 31 chars
                "\"0123456789abcdef0123456789abcdef0\"", // 33 chars
                "\"\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{json}: {err}");
            }
        }

        #[test]
        fn test_from_u64_is_deterministic() {
            assert_eq!(PieceSeed::from_u64(42), PieceSeed::from_u64(42));
            assert_ne!(PieceSeed::from_u64(42), PieceSeed::from_u64(43));
        }

        #[test]
        fn test_deterministic_piece_generation() {
            let seed = PieceSeed::from_u64(0x1234_5678);
            let mut generator1 = PieceGenerator::with_seed(seed);
            let mut generator2 = PieceGenerator::with_seed(seed);
            for _ in 0..20 {
                assert_eq!(generator1.next_kind(), generator2.next_kind());
            }
        }
    }
}
