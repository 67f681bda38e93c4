//! Менеджер комнат: несколько независимых столов по RoomId.
//!
//! Каждая комната мутируется строго одной командой за раз — команда
//! обрабатывается до конца (проверка фазы → мутация → снапшот) прежде,
//! чем менеджер примет следующую для этой комнаты. Комнаты между собой
//! независимы. Таймеры простоя и сетевой session-слой живут снаружи:
//! они дергают `set_connected` / `destroy_room`.

use std::collections::HashMap;

use crate::domain::chips::Chips;
use crate::domain::seat::Seat;
use crate::domain::shoe::Shoe;
use crate::domain::table::{SeatIndex, Spectator, Table, TableConfig};
use crate::domain::{PlayerId, RoomId};
use crate::engine::actions::{PlayerAction, PlayerMove};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{RoomJournal, RoundEventKind};
use crate::engine::round::{self, DiceRoll};
use crate::infra::crypto::CryptoService;
use crate::infra::ids::{generate_room_code, IdGenerator};
use crate::infra::{seed, shuffle};

/// Ошибки уровня менеджера (над движком одного раунда).
#[derive(Debug, PartialEq, Eq)]
pub enum ManagerError {
    /// Комната с таким ID не найдена.
    RoomNotFound(RoomId),

    /// Нет комнаты с таким кодом.
    UnknownRoomCode(String),

    /// Игрок не находится ни в одной комнате.
    NotInRoom(PlayerId),

    /// Игрок в комнате, но без места (зритель).
    NoSeat(PlayerId),

    /// Свободных мест нет.
    SeatsFull,

    /// Команда доступна только хосту комнаты.
    NotHost,

    /// Проброшенная ошибка движка.
    Engine(EngineError),
}

impl From<EngineError> for ManagerError {
    fn from(e: EngineError) -> Self {
        ManagerError::Engine(e)
    }
}

/// Одна комната: стол + журнал (события раунда и архив раздач).
pub struct Room {
    pub table: Table,
    pub journal: RoomJournal,
}

/// Менеджер комнат.
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
    codes: HashMap<String, RoomId>,
    players: HashMap<PlayerId, RoomId>,
    ids: IdGenerator,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            codes: HashMap::new(),
            players: HashMap::new(),
            ids: IdGenerator::new(),
        }
    }

    // -- жизненный цикл комнат -------------------------------------------

    /// Создать комнату. Создатель становится хостом и занимает место 0.
    /// Возвращает (room_id, код комнаты, player_id хоста).
    pub fn create_room<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        display_name: String,
        buy_in: Chips,
    ) -> (RoomId, String, PlayerId) {
        let room_id = self.ids.next_room_id();
        let player_id = self.ids.next_player_id();

        let mut room_code = generate_room_code(crypto);
        while self.codes.contains_key(&room_code) {
            room_code = generate_room_code(crypto);
        }

        // Commitment публикуется при создании; клиентский seed по умолчанию —
        // код комнаты, шуз первого раунда выводится сразу.
        let fairness = seed::initial_fairness(crypto, room_code.clone());
        let order = shuffle::derive_shoe_order(
            crypto,
            &fairness.server_seed,
            &fairness.client_seed,
            fairness.nonce,
        );
        let config = TableConfig::default();
        let history_cap = config.history_cap;
        let mut table = Table::new(
            room_id,
            room_code.clone(),
            player_id,
            config,
            fairness,
            Shoe::from_order(order),
        );
        table.seats[0] = Some(Seat::new(player_id, display_name, buy_in));

        let mut journal = RoomJournal::new(history_cap);
        journal.push(RoundEventKind::SeatJoined {
            seat: 0,
            player_id,
        });

        self.codes.insert(room_code.clone(), room_id);
        self.players.insert(player_id, room_id);
        self.rooms.insert(room_id, Room { table, journal });

        tracing::info!(room = room_id, code = %room_code, "комната создана");
        (room_id, room_code, player_id)
    }

    /// Войти в комнату по коду — на свободное место или зрителем.
    pub fn join_room(
        &mut self,
        code: &str,
        display_name: String,
        buy_in: Chips,
        as_spectator: bool,
    ) -> Result<(RoomId, PlayerId, Option<SeatIndex>), ManagerError> {
        let normalized = code.trim().to_ascii_uppercase();
        let room_id = *self
            .codes
            .get(&normalized)
            .ok_or_else(|| ManagerError::UnknownRoomCode(normalized.clone()))?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(ManagerError::RoomNotFound(room_id))?;

        let player_id = self.ids.next_player_id();

        if as_spectator {
            room.table.spectators.push(Spectator {
                player_id,
                display_name,
            });
            self.players.insert(player_id, room_id);
            return Ok((room_id, player_id, None));
        }

        let seat_idx = (0..room.table.max_seats())
            .find(|idx| room.table.is_seat_empty(*idx))
            .ok_or(ManagerError::SeatsFull)?;

        room.table.seats[seat_idx as usize] = Some(Seat::new(player_id, display_name, buy_in));
        room.journal.push(RoundEventKind::SeatJoined {
            seat: seat_idx,
            player_id,
        });
        self.players.insert(player_id, room_id);

        tracing::info!(room = room_id, seat = seat_idx, "игрок сел за стол");
        Ok((room_id, player_id, Some(seat_idx)))
    }

    /// Покинуть комнату. Место освобождается; недоигранные ставки
    /// ушедшего сгорают. Раунд продолжается без него.
    pub fn leave_room<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        player_id: PlayerId,
    ) -> Result<RoomId, ManagerError> {
        let room_id = *self
            .players
            .get(&player_id)
            .ok_or(ManagerError::NotInRoom(player_id))?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(ManagerError::RoomNotFound(room_id))?;

        if let Some(seat_idx) = room.table.seat_of(player_id) {
            // Сначала «отключаем» — это продвигает очередь/страховку,
            // затем освобождаем место.
            round::set_connected(&mut room.table, &mut room.journal, crypto, seat_idx, false)?;
            room.table.seats[seat_idx as usize] = None;
            room.journal.push(RoundEventKind::SeatLeft {
                seat: seat_idx,
                player_id,
            });
            if room.table.button == Some(seat_idx) {
                room.table.button = None;
            }
            // Уход мог разблокировать раздачу или следующий раунд.
            round::presence_side_effects(&mut room.table, &mut room.journal, crypto)?;

            // Хост ушёл — роль переходит первому занятому месту.
            if room.table.host == player_id {
                if let Some(new_host) = room
                    .table
                    .seats
                    .iter()
                    .flatten()
                    .map(|s| s.player_id)
                    .next()
                {
                    room.table.host = new_host;
                }
            }
        } else {
            room.table
                .spectators
                .retain(|s| s.player_id != player_id);
        }

        self.players.remove(&player_id);
        tracing::info!(room = room_id, player = player_id, "игрок вышел");
        Ok(room_id)
    }

    /// Комната пуста (ни мест, ни зрителей)?
    pub fn is_room_empty(&self, room_id: RoomId) -> bool {
        self.rooms
            .get(&room_id)
            .map(|r| r.table.seated_count() == 0 && r.table.spectators.is_empty())
            .unwrap_or(true)
    }

    /// Снести комнату (после grace-таймера внешнего слоя).
    pub fn destroy_room(&mut self, room_id: RoomId) {
        if let Some(room) = self.rooms.remove(&room_id) {
            self.codes.remove(&room.table.room_code);
            self.players.retain(|_, rid| *rid != room_id);
            tracing::info!(room = room_id, "комната уничтожена");
        }
    }

    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    pub fn room_mut(&mut self, room_id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&room_id)
    }

    pub fn room_of_player(&self, player_id: PlayerId) -> Option<RoomId> {
        self.players.get(&player_id).copied()
    }

    pub fn room_by_code(&self, code: &str) -> Option<RoomId> {
        self.codes.get(&code.trim().to_ascii_uppercase()).copied()
    }

    // -- маршрутизация игровых команд ------------------------------------

    fn player_room_mut(&mut self, player_id: PlayerId) -> Result<&mut Room, ManagerError> {
        let room_id = *self
            .players
            .get(&player_id)
            .ok_or(ManagerError::NotInRoom(player_id))?;
        self.rooms
            .get_mut(&room_id)
            .ok_or(ManagerError::RoomNotFound(room_id))
    }

    fn seat_ctx(&mut self, player_id: PlayerId) -> Result<(&mut Room, SeatIndex), ManagerError> {
        let room = self.player_room_mut(player_id)?;
        let seat = room
            .table
            .seat_of(player_id)
            .ok_or(ManagerError::NoSeat(player_id))?;
        Ok((room, seat))
    }

    fn host_room_mut(&mut self, caller: PlayerId) -> Result<&mut Room, ManagerError> {
        let room = self.player_room_mut(caller)?;
        if room.table.host != caller {
            return Err(ManagerError::NotHost);
        }
        Ok(room)
    }

    /// Хост стартует первый раунд из лобби.
    pub fn start_round(&mut self, caller: PlayerId) -> Result<(), ManagerError> {
        let room = self.host_room_mut(caller)?;
        round::start_round(&mut room.table, &mut room.journal)?;
        Ok(())
    }

    /// Хост назначает кнопку вручную (до первого раунда).
    pub fn select_button(&mut self, caller: PlayerId, seat: SeatIndex) -> Result<(), ManagerError> {
        let room = self.host_room_mut(caller)?;
        round::select_button(&mut room.table, &mut room.journal, seat)?;
        Ok(())
    }

    /// Хост разыгрывает кнопку костями.
    pub fn roll_button_dice<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        caller: PlayerId,
    ) -> Result<DiceRoll, ManagerError> {
        let room = self.host_room_mut(caller)?;
        Ok(round::roll_button_dice(
            &mut room.table,
            &mut room.journal,
            crypto,
        )?)
    }

    pub fn place_bet(
        &mut self,
        caller: PlayerId,
        amount: Chips,
        side_bet: Chips,
        num_hands: u8,
    ) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        round::place_bet(
            &mut room.table,
            &mut room.journal,
            seat,
            amount,
            side_bet,
            num_hands,
        )?;
        Ok(())
    }

    pub fn player_action(&mut self, caller: PlayerId, kind: PlayerMove) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        let action = PlayerAction {
            player_id: caller,
            seat,
            kind,
        };
        round::apply_player_action(&mut room.table, &mut room.journal, action)?;
        Ok(())
    }

    pub fn insurance_decision(&mut self, caller: PlayerId, take: bool) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        round::decide_insurance(&mut room.table, &mut room.journal, seat, take)?;
        Ok(())
    }

    pub fn set_client_seed(&mut self, caller: PlayerId, new_seed: String) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        round::set_client_seed(&mut room.table, &mut room.journal, seat, new_seed)?;
        Ok(())
    }

    pub fn toggle_away<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        caller: PlayerId,
    ) -> Result<bool, ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        Ok(round::toggle_away(
            &mut room.table,
            &mut room.journal,
            crypto,
            seat,
        )?)
    }

    /// Готовность к следующему раунду. true — стол уже перешёл к ставкам.
    pub fn ready_for_next<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        caller: PlayerId,
    ) -> Result<bool, ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        Ok(round::mark_ready(
            &mut room.table,
            &mut room.journal,
            crypto,
            seat,
        )?)
    }

    pub fn set_chip_denoms(&mut self, caller: PlayerId, denoms: Vec<u64>) -> Result<(), ManagerError> {
        let room = self.host_room_mut(caller)?;
        round::set_chip_denoms(&mut room.table, denoms)?;
        Ok(())
    }

    pub fn request_buy_in(&mut self, caller: PlayerId, amount: Chips) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(caller)?;
        round::request_buy_in(&mut room.table, &mut room.journal, seat, amount)?;
        Ok(())
    }

    /// Session-слой сообщает о смене подключения игрока.
    pub fn set_connected<C: CryptoService + ?Sized>(
        &mut self,
        crypto: &mut C,
        player_id: PlayerId,
        connected: bool,
    ) -> Result<(), ManagerError> {
        let (room, seat) = self.seat_ctx(player_id)?;
        round::set_connected(&mut room.table, &mut room.journal, crypto, seat, connected)?;
        Ok(())
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
