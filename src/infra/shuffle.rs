//! Вывод порядка шуза из (server seed, client seed, nonce).
//!
//! Схема:
//!   - байтовый поток: HMAC-SHA256(key = server_seed,
//!     msg = "{client_seed}:{nonce}:{round}") для round = 0, 1, 2, …;
//!   - поток режется на 4-байтовые big-endian слова;
//!   - Fisher–Yates от 312 вниз до 1, позиция i тянет индекс из [0, i)
//!     rejection sampling'ом: слово принимается, только если оно меньше
//!     наибольшего кратного i, умещающегося в 32 бита;
//!   - исчерпание потока детерминированно продлевается следующими
//!     HMAC-раундами, никогда не заворачивается по кругу.
//!
//! Любое изменение этой процедуры ломает клиентскую верификацию
//! исторических раундов.

use crate::domain::card::SHOE_SIZE;
use crate::domain::table::SeedReveal;
use crate::infra::crypto::CryptoService;

/// Детерминированный байтовый поток поверх HMAC-раундов.
struct HmacByteStream<'a, C: CryptoService + ?Sized> {
    crypto: &'a C,
    key: &'a [u8],
    prefix: String,
    round: u64,
    block: [u8; 32],
    offset: usize,
}

impl<'a, C: CryptoService + ?Sized> HmacByteStream<'a, C> {
    fn new(crypto: &'a C, key: &'a [u8], client_seed: &str, nonce: u64) -> Self {
        let mut stream = Self {
            crypto,
            key,
            prefix: format!("{client_seed}:{nonce}"),
            round: 0,
            block: [0u8; 32],
            offset: 32,
        };
        stream.refill();
        stream
    }

    fn refill(&mut self) {
        let msg = format!("{}:{}", self.prefix, self.round);
        self.block = self.crypto.hmac_sha256(self.key, msg.as_bytes());
        self.round += 1;
        self.offset = 0;
    }

    /// Следующее 4-байтовое big-endian слово.
    fn next_word(&mut self) -> u32 {
        if self.offset + 4 > self.block.len() {
            self.refill();
        }
        let word = u32::from_be_bytes(
            self.block[self.offset..self.offset + 4]
                .try_into()
                .expect("4-byte slice"),
        );
        self.offset += 4;
        word
    }

    /// Равномерный индекс в [0, n): бракуем слова из диапазона
    /// [floor(2^32 / n) * n, 2^32).
    fn uniform_index(&mut self, n: u32) -> u32 {
        let bound = (1u64 << 32) / n as u64 * n as u64;
        loop {
            let word = self.next_word();
            if (word as u64) < bound {
                return word % n;
            }
        }
    }
}

/// Чистая функция: перестановка индексов 0..312 из тройки seed'ов.
/// Одинаковые входы всегда дают одинаковый порядок.
pub fn derive_shoe_order<C: CryptoService + ?Sized>(
    crypto: &C,
    server_seed: &[u8; 32],
    client_seed: &str,
    nonce: u64,
) -> Vec<u16> {
    let mut stream = HmacByteStream::new(crypto, server_seed, client_seed, nonce);

    let mut pool: Vec<u16> = (0..SHOE_SIZE).collect();
    let mut order = Vec::with_capacity(SHOE_SIZE as usize);

    for i in (1..=SHOE_SIZE as u32).rev() {
        let j = stream.uniform_index(i);
        // swap-pop: взятый индекс замещается последним элементом пула.
        order.push(pool.swap_remove(j as usize));
    }

    order
}

/// Результат клиентской верификации. Чисто информационный:
/// сервер никогда не принимает решений по нему.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub hash_match: bool,
    pub cards_match: bool,
}

/// Перепроверить раскрытый раунд: commitment и фактически розданные карты.
///
/// `dealt` сверяется с префиксом перестановки индекс-в-индекс.
pub fn verify<C: CryptoService + ?Sized>(
    crypto: &C,
    server_seed: &[u8; 32],
    expected_hash: &str,
    client_seed: &str,
    nonce: u64,
    dealt: &[u16],
) -> VerifyOutcome {
    let hash = hex::encode(crypto.sha256(server_seed));
    let hash_match = hash == expected_hash.to_ascii_lowercase();

    let order = derive_shoe_order(crypto, server_seed, client_seed, nonce);
    let cards_match =
        dealt.len() <= order.len() && order[..dealt.len()] == *dealt;

    VerifyOutcome {
        hash_match,
        cards_match,
    }
}

/// То же самое поверх раскрытия из истории (hex-представление seed'а).
pub fn verify_reveal<C: CryptoService + ?Sized>(crypto: &C, reveal: &SeedReveal) -> VerifyOutcome {
    let bytes = match hex::decode(&reveal.server_seed) {
        Ok(b) => b,
        Err(_) => {
            return VerifyOutcome {
                hash_match: false,
                cards_match: false,
            }
        }
    };
    let seed: [u8; 32] = match bytes.try_into() {
        Ok(s) => s,
        Err(_) => {
            return VerifyOutcome {
                hash_match: false,
                cards_match: false,
            }
        }
    };

    verify(
        crypto,
        &seed,
        &reveal.server_seed_hash,
        &reveal.client_seed,
        reveal.nonce,
        &reveal.dealt_indices,
    )
}
