use crate::domain::table::SeatIndex;

use thiserror::Error;

/// Ошибки движка раунда.
///
/// Всё это — ошибки легальности: интент отклонён, состояние стола
/// не изменилось ни на байт. Они уходят вызывающему как сообщение
/// и никогда не логируются как сбой.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("В этом месте нет игрока")]
    EmptySeat,

    #[error("Команда не подходит к текущей фазе раунда")]
    WrongPhase,

    #[error("Сейчас не ход этого места")]
    NotYourTurn,

    #[error("Недостаточно средств")]
    NotEnoughBalance,

    #[error("Недопустимая ставка")]
    InvalidBet,

    #[error("Количество рук должно быть от 1 до 5")]
    InvalidHandCount,

    #[error("Ставка в этом раунде уже сделана")]
    AlreadyBet,

    #[error("Кнопка не участвует в ставках этого раунда")]
    ButtonSitsOut,

    #[error("Страховка сейчас не предлагается или решение уже принято")]
    InsuranceNotAvailable,

    #[error("Недопустимое действие для текущей руки")]
    IllegalAction,

    #[error("Недопустимый клиентский seed")]
    InvalidClientSeed,

    #[error("Недопустимый набор номиналов фишек")]
    InvalidDenominations,

    #[error("Нет подходящих мест для выбора кнопки")]
    NoCandidates,

    #[error("Шуз исчерпан")]
    ShoeExhausted,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
