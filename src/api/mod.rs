//! Внешний API движка.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние (создать комнату,
//!   ставка, ход, страховка, готовность);
//! - запросы (queries.rs) — только чтение, пер-зрительские снапшоты;
//! - DTO (dto.rs) — структуры для клиента;
//! - ошибки (errors.rs) — то, что видит клиент.
//!
//! Рассылку снапшотов делает внешний session-слой: он вызывает
//! `build_client_state` для каждого зрителя комнаты отдельно.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
