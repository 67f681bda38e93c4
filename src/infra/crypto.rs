use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Криптографическая capability движка.
///
/// Движок никогда не трогает глобальные источники (thread_rng, время и т.п.)
/// напрямую — всё идёт через эту абстракцию, поэтому раунд целиком
/// воспроизводим в тестах детерминированной реализацией.
pub trait CryptoService {
    /// Заполнить буфер случайными байтами.
    fn fill_random(&mut self, out: &mut [u8]);

    fn sha256(&self, data: &[u8]) -> [u8; 32];

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32];
}

/// Боевая реализация: системная энтропия + RustCrypto.
#[derive(Clone, Debug, Default)]
pub struct OsCrypto;

impl CryptoService for OsCrypto {
    fn fill_random(&mut self, out: &mut [u8]) {
        use rand::rngs::OsRng;
        use rand::RngCore;

        OsRng.fill_bytes(out);
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32] {
        // Ключ любой длины валиден для HMAC, поэтому unwrap здесь безопасен.
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(msg);
        mac.finalize().into_bytes().into()
    }
}

/// Детерминированная реализация для тестов и реплея:
/// «случайные» байты — это SHA-256(seed || counter), hash/HMAC настоящие.
#[derive(Clone, Debug)]
pub struct FixedCrypto {
    seed: [u8; 32],
    counter: u64,
}

impl FixedCrypto {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed, counter: 0 }
    }

    pub fn from_u64(x: u64) -> Self {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&x.to_le_bytes());
        Self::from_seed(seed)
    }
}

impl CryptoService for FixedCrypto {
    fn fill_random(&mut self, out: &mut [u8]) {
        let mut filled = 0;
        while filled < out.len() {
            let mut hasher = Sha256::new();
            hasher.update(self.seed);
            hasher.update(self.counter.to_be_bytes());
            self.counter += 1;
            let block: [u8; 32] = hasher.finalize().into();

            let take = (out.len() - filled).min(block.len());
            out[filled..filled + take].copy_from_slice(&block[..take]);
            filled += take;
        }
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        OsCrypto.sha256(data)
    }

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32] {
        OsCrypto.hmac_sha256(key, msg)
    }
}

/// Равномерное число в [0, n) через rejection sampling по байтам crypto.
/// Тот же приём, что в тасовании шуза: бракуем верхний «хвост» диапазона
/// u32, чтобы не ловить modulo bias.
pub fn uniform_below<C: CryptoService + ?Sized>(crypto: &mut C, n: u32) -> u32 {
    assert!(n > 0, "uniform_below: n must be positive");
    let bound = (1u64 << 32) / n as u64 * n as u64;
    loop {
        let mut buf = [0u8; 4];
        crypto.fill_random(&mut buf);
        let word = u32::from_be_bytes(buf);
        if (word as u64) < bound {
            return word % n;
        }
    }
}
