use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{PlayerId, RoomId};
use crate::infra::crypto::{uniform_below, CryptoService};

/// Алфавит кодов комнат: без 0/O/1/I, чтобы код диктовался голосом.
const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Длина кода комнаты.
pub const ROOM_CODE_LEN: usize = 6;

/// Простая генерация ID на основе монотонных счётчиков.
/// Состояние живёт столько же, сколько процесс — персистентности нет.
#[derive(Debug)]
pub struct IdGenerator {
    room_counter: AtomicU64,
    player_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            room_counter: AtomicU64::new(1),
            player_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_room_id(&self) -> RoomId {
        self.room_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Случайный код комнаты. Символы берутся равномерно (rejection sampling),
/// чтобы код не протекал информацией о состоянии генератора.
pub fn generate_room_code<C: CryptoService + ?Sized>(crypto: &mut C) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| {
            let idx = uniform_below(crypto, ROOM_CODE_CHARSET.len() as u32) as usize;
            ROOM_CODE_CHARSET[idx] as char
        })
        .collect()
}
