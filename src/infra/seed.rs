//! Commit-reveal жизненный цикл server seed'а.
//!
//! Порядок обязателен: хэш публикуется ДО того, как клиент может повлиять
//! на client seed следующего раунда, иначе commitment ничего не стоит.
//! Сам seed раскрывается только при ротации, вместе со списком карт,
//! фактически розданных за его «жизнь».

use crate::domain::table::{FairnessState, SeedReveal};
use crate::infra::crypto::CryptoService;

/// Сгенерировать новый server seed и его опубликованный commitment.
pub fn commit<C: CryptoService + ?Sized>(crypto: &mut C) -> ([u8; 32], String) {
    let mut seed = [0u8; 32];
    crypto.fill_random(&mut seed);
    let hash = hex::encode(crypto.sha256(&seed));
    (seed, hash)
}

/// Состояние fairness при создании комнаты: первый commitment, nonce = 0.
pub fn initial_fairness<C: CryptoService + ?Sized>(
    crypto: &mut C,
    client_seed: String,
) -> FairnessState {
    let (server_seed, server_seed_hash) = commit(crypto);
    FairnessState {
        server_seed,
        server_seed_hash,
        client_seed,
        pending_client_seed: None,
        nonce: 0,
        dealt_this_round: Vec::new(),
        previous: None,
    }
}

/// Ротация на границе раундов:
/// - текущий seed раскрывается (вместе с розданными индексами);
/// - генерируется и коммитится новый;
/// - nonce инкрементируется.
///
/// Вызывается атомарно внутри подготовки раунда — ни одна команда
/// не видит стол с наполовину ротированным состоянием.
pub fn rotate<C: CryptoService + ?Sized>(fairness: &mut FairnessState, crypto: &mut C) {
    let reveal = SeedReveal {
        server_seed: hex::encode(fairness.server_seed),
        server_seed_hash: fairness.server_seed_hash.clone(),
        client_seed: fairness.client_seed.clone(),
        nonce: fairness.nonce,
        dealt_indices: std::mem::take(&mut fairness.dealt_this_round),
    };

    let (server_seed, server_seed_hash) = commit(crypto);
    fairness.server_seed = server_seed;
    fairness.server_seed_hash = server_seed_hash;
    fairness.nonce += 1;
    if let Some(pending) = fairness.pending_client_seed.take() {
        fairness.client_seed = pending;
    }
    fairness.previous = Some(reveal);
}

/// Раскрытие текущей генерации без ротации — для записи в историю
/// на расчёте раунда (новые карты из этого шуза уже не раздаются).
pub fn reveal_current(fairness: &FairnessState) -> SeedReveal {
    SeedReveal {
        server_seed: hex::encode(fairness.server_seed),
        server_seed_hash: fairness.server_seed_hash.clone(),
        client_seed: fairness.client_seed.clone(),
        nonce: fairness.nonce,
        dealt_indices: fairness.dealt_this_round.clone(),
    }
}
