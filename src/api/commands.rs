use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;
use crate::engine::actions::PlayerMove;
use crate::engine::RoomManager;
use crate::infra::crypto::CryptoService;

use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::build_client_state;

/// Команда верхнего уровня — один в один входящие интенты протокола.
///
/// Session-слой резолвит подключение в `caller` (PlayerId) и передаёт
/// команду сюда; движок дальше сам проверяет фазу, очередь и баланс.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать комнату. Вызывающий становится хостом.
    CreateRoom(CreateRoomCommand),

    /// Войти в комнату по коду (игроком или зрителем).
    JoinRoom(JoinRoomCommand),

    /// Покинуть комнату.
    LeaveRoom,

    /// Хост стартует первый раунд из лобби.
    StartRound,

    /// Хост назначает кнопку вручную (до первого раунда).
    SelectButton { seat: u8 },

    /// Хост разыгрывает кнопку костями.
    RollButtonDice,

    /// Ставка: amount на каждую руку + опциональная сайд-ставка.
    PlaceBet(PlaceBetCommand),

    /// Ход по активной руке.
    PlayerAction { action: PlayerMove },

    /// Решение по страховке.
    InsuranceDecision { take: bool },

    /// Сменить клиентский seed (вступит в силу со следующего шуза).
    SetClientSeed { seed: String },

    /// Отойти от стола / вернуться.
    ToggleAway,

    /// Готов к следующему раунду.
    ReadyForNext,

    /// Хост меняет номиналы фишек стола.
    SetChipDenoms { denominations: Vec<u64> },

    /// Докупка к балансу (применится, когда деньги не в игре).
    RequestBuyIn { amount: Chips },
}

/// Создание комнаты.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRoomCommand {
    /// Отображаемое имя хоста.
    pub name: String,
    /// Стартовый баланс хоста.
    pub buy_in: Chips,
}

/// Вход в комнату.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinRoomCommand {
    pub code: String,
    pub name: String,
    pub buy_in: Chips,
    pub as_spectator: bool,
}

/// Ставка сиденья.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceBetCommand {
    /// Ставка на каждую руку.
    pub amount: Chips,
    /// Сайд-ставка на «дилер переберёт ровно 22».
    pub side_bet: Chips,
    /// Количество рук (1–5).
    pub num_hands: u8,
}

/// Применить команду к менеджеру комнат.
///
/// `caller` обязателен для всего, кроме CreateRoom/JoinRoom. Любая
/// ошибка означает, что состояние комнаты не изменилось.
pub fn apply_command<C: CryptoService + ?Sized>(
    manager: &mut RoomManager,
    crypto: &mut C,
    caller: Option<PlayerId>,
    command: Command,
) -> Result<CommandResponse, ApiError> {
    match command {
        Command::CreateRoom(cmd) => {
            let (room_id, room_code, player_id) =
                manager.create_room(crypto, cmd.name, cmd.buy_in);
            let state = state_of(manager, room_id, player_id)?;
            Ok(CommandResponse::RoomCreated {
                room_id,
                room_code,
                player_id,
                state,
            })
        }

        Command::JoinRoom(cmd) => {
            let (room_id, player_id, seat) =
                manager.join_room(&cmd.code, cmd.name, cmd.buy_in, cmd.as_spectator)?;
            let state = state_of(manager, room_id, player_id)?;
            Ok(CommandResponse::RoomJoined {
                room_id,
                room_code: cmd.code.trim().to_ascii_uppercase(),
                player_id,
                seat,
                state,
            })
        }

        Command::LeaveRoom => {
            let caller = require_caller(caller)?;
            let room_id = manager.leave_room(crypto, caller)?;
            Ok(CommandResponse::Left { room_id })
        }

        Command::StartRound => {
            let caller = require_caller(caller)?;
            manager.start_round(caller)?;
            caller_state(manager, caller)
        }

        Command::SelectButton { seat } => {
            let caller = require_caller(caller)?;
            manager.select_button(caller, seat)?;
            caller_state(manager, caller)
        }

        Command::RollButtonDice => {
            let caller = require_caller(caller)?;
            let roll = manager.roll_button_dice(crypto, caller)?;
            let state = match caller_state(manager, caller)? {
                CommandResponse::State(state) => state,
                _ => return Err(ApiError::Internal("state expected".into())),
            };
            Ok(CommandResponse::DiceRolled { roll, state })
        }

        Command::PlaceBet(cmd) => {
            let caller = require_caller(caller)?;
            manager.place_bet(caller, cmd.amount, cmd.side_bet, cmd.num_hands)?;
            caller_state(manager, caller)
        }

        Command::PlayerAction { action } => {
            let caller = require_caller(caller)?;
            manager.player_action(caller, action)?;
            caller_state(manager, caller)
        }

        Command::InsuranceDecision { take } => {
            let caller = require_caller(caller)?;
            manager.insurance_decision(caller, take)?;
            caller_state(manager, caller)
        }

        Command::SetClientSeed { seed } => {
            let caller = require_caller(caller)?;
            manager.set_client_seed(caller, seed)?;
            caller_state(manager, caller)
        }

        Command::ToggleAway => {
            let caller = require_caller(caller)?;
            manager.toggle_away(crypto, caller)?;
            caller_state(manager, caller)
        }

        Command::ReadyForNext => {
            let caller = require_caller(caller)?;
            manager.ready_for_next(crypto, caller)?;
            caller_state(manager, caller)
        }

        Command::SetChipDenoms { denominations } => {
            let caller = require_caller(caller)?;
            manager.set_chip_denoms(caller, denominations)?;
            caller_state(manager, caller)
        }

        Command::RequestBuyIn { amount } => {
            let caller = require_caller(caller)?;
            manager.request_buy_in(caller, amount)?;
            caller_state(manager, caller)
        }
    }
}

fn require_caller(caller: Option<PlayerId>) -> Result<PlayerId, ApiError> {
    caller.ok_or_else(|| ApiError::BadRequest("команда требует player_id".into()))
}

fn caller_state(manager: &RoomManager, caller: PlayerId) -> Result<CommandResponse, ApiError> {
    let room_id = manager
        .room_of_player(caller)
        .ok_or(ApiError::NotInRoom)?;
    let state = state_of(manager, room_id, caller)?;
    Ok(CommandResponse::State(state))
}

fn state_of(
    manager: &RoomManager,
    room_id: crate::domain::RoomId,
    viewer: PlayerId,
) -> Result<super::dto::ClientTableState, ApiError> {
    let room = manager
        .room(room_id)
        .ok_or_else(|| ApiError::Internal(format!("комната {room_id} исчезла")))?;
    Ok(build_client_state(room, viewer))
}
