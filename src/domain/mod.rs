//! Доменная модель блэкджека: карты, шуз, руки, сиденья, стол.

pub mod card;
pub mod chips;
pub mod hand;
pub mod seat;
pub mod shoe;
pub mod table;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type RoomId = u64;
pub type RoundId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use hand::*;
pub use seat::*;
pub use shoe::*;
pub use table::*;
