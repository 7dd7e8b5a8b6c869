use crate::{MatchId, PlayerId, RoundId};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";
const ID_LEN: usize = 6;

/// Seeded source of short prefixed ids (`p_`, `rnd_`, `m_`).
#[derive(Debug, Clone)]
pub struct IdGen {
    seed: u64,
    rng: StdRng,
}

impl IdGen {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let mut out = String::with_capacity(prefix.len() + ID_LEN);
        out.push_str(prefix);
        for _ in 0..ID_LEN {
            let idx = self.rng.gen_range(0..ID_ALPHABET.len());
            out.push(ID_ALPHABET[idx] as char);
        }
        out
    }

    pub fn player_id(&mut self) -> PlayerId {
        PlayerId::new(self.next_id("p_"))
    }

    pub fn round_id(&mut self) -> RoundId {
        RoundId::new(self.next_id("rnd_"))
    }

    pub fn match_id(&mut self) -> MatchId {
        MatchId::new(self.next_id("m_"))
    }
}
