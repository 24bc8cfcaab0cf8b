//! Short name generation
//!
//! Names are drawn uniformly from `0-9A-Za-z` using an explicitly seeded
//! generator, so a fixed seed yields a reproducible sequence.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// base62 字符表
pub const NAME_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// 自动生成名称的长度
pub const NAME_LENGTH: usize = 6;

pub struct NameGenerator {
    rng: Mutex<StdRng>,
}

impl NameGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 配置了种子时使用固定种子，否则使用系统熵
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn generate(&self) -> String {
        self.generate_with_length(NAME_LENGTH)
    }

    pub fn generate_with_length(&self, length: usize) -> String {
        let mut rng = self.rng.lock();
        (0..length)
            .map(|_| NAME_ALPHABET[rng.random_range(0..NAME_ALPHABET.len())] as char)
            .collect()
    }
}
