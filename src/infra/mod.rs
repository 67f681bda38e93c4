//! Инфраструктурный слой вокруг движка:
//! - CryptoService (hash, HMAC, secure random) и его реализации;
//! - commit-reveal жизненный цикл server seed'а;
//! - вывод порядка шуза и клиентская верификация;
//! - генерация ID и кодов комнат.

pub mod crypto;
pub mod ids;
pub mod seed;
pub mod shuffle;

pub use crypto::{uniform_below, CryptoService, FixedCrypto, OsCrypto};
pub use ids::{generate_room_code, IdGenerator, ROOM_CODE_LEN};
pub use seed::{commit, initial_fairness, reveal_current, rotate};
pub use shuffle::{derive_shoe_order, verify, verify_reveal, VerifyOutcome};
