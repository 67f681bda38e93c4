//! Движок мультиплеерного блэкджека с provably-fair тасованием.
//!
//! Вариант правил: одна стартовая карта, неограниченные даблы
//! с эскалацией ставки, перебор дилера ровно на 22 — пуш, без сплитов.
//! До пяти мест за столом, до пяти рук на место.
//!
//! Крейт — чистая библиотека: авторитарная машина фаз раунда плюс
//! commit-reveal тасование. Транспорт, session-слой и таймеры простоя
//! живут снаружи и общаются с движком командами (`api::Command`)
//! и пер-зрительскими снапшотами (`api::build_client_state`).

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;

pub use api::{apply_command, Command, CommandResponse};
pub use engine::{EngineError, RoomManager};
pub use infra::{CryptoService, FixedCrypto, OsCrypto};
