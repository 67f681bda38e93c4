use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::RoundSettlement;
use crate::domain::seat::Seat;
use crate::domain::shoe::Shoe;
use crate::domain::{PlayerId, RoomId};

/// Индекс сиденья за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Фаза раунда.
///
/// `Dealing`, `PeekCheck` и `DealerTurn` — транзитные: движок проходит их
/// внутри одной команды, но они остаются в enum, потому что события истории
/// и снапшоты фиксируют их прохождение.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundPhase {
    /// До первого раунда: выбор кнопки, рассадка.
    Lobby,
    /// Приём ставок.
    Betting,
    /// Раздача стартовых карт.
    Dealing,
    /// Открытая карта дилера — туз; сиденья решают по страховке.
    InsuranceOffered,
    /// Проверка закрытой карты дилера на блэкджек.
    PeekCheck,
    /// Ходит ровно одна пара (seat, hand).
    PlayerTurn,
    /// Добор дилера.
    DealerTurn,
    /// Раунд рассчитан; ждём готовности к следующему.
    Settlement,
}

/// Курсор активной руки: единственная пара (seat, hand),
/// которую разрешено мутировать в фазе `PlayerTurn`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveCursor {
    pub seat: SeatIndex,
    pub hand: u8,
}

/// Решение сиденья по страховке.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsuranceEntry {
    /// Взял ли игрок страховку.
    pub taken: bool,
    /// Суммарная страховая ставка сиденья (floor(bet/2) за каждую руку).
    pub bet: Chips,
}

/// Данные commit-reveal текущей генерации шуза.
///
/// `server_seed` — секрет процесса; наружу до ротации уходит только
/// `server_seed_hash`. Раскрытие предыдущего раунда хранится в `previous`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FairnessState {
    pub server_seed: [u8; 32],
    /// SHA-256(server_seed), hex — опубликованный commitment.
    pub server_seed_hash: String,
    /// Клиентский seed, из которого выведен ТЕКУЩИЙ шуз.
    pub client_seed: String,
    /// Смена клиентского seed'а вступает в силу на следующей деривации,
    /// иначе раскрытие текущего раунда перестало бы сходиться.
    pub pending_client_seed: Option<String>,
    /// Инкрементируется на каждый раунд.
    pub nonce: u64,
    /// Индексы карт, розданных в текущем раунде (по порядку).
    pub dealt_this_round: Vec<u16>,
    /// Полное раскрытие предыдущего раунда.
    pub previous: Option<SeedReveal>,
}

/// Раскрытый seed завершённого раунда — всё, что нужно клиенту,
/// чтобы пересчитать шуз и сверить розданные карты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedReveal {
    pub server_seed: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub dealt_indices: Vec<u16>,
}

/// Зритель: получает состояние стола, но не сидит за ним.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spectator {
    pub player_id: PlayerId,
    pub display_name: String,
}

/// Конфиг стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест (в этом варианте — 5).
    pub max_seats: u8,
    /// Максимум рук на сиденье.
    pub max_hands_per_seat: u8,
    /// Минимальная ставка на руку.
    pub min_bet: Chips,
    /// Сколько записей истории раздач храним.
    pub history_cap: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_seats: 5,
            max_hands_per_seat: 5,
            min_bet: Chips(100),
            history_cap: 50,
        }
    }
}

/// Номиналы фишек по умолчанию (в центах).
pub fn default_chip_denoms() -> Vec<u64> {
    vec![100, 500, 1_000, 5_000, 10_000]
}

/// Основное состояние комнаты: единый владеемый агрегат.
/// Все перекрёстные ссылки — индексы, не указатели, поэтому
/// состояние тривиально снапшотится для broadcast и тестов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: RoomId,
    /// Код комнаты, по которому заходят игроки.
    pub room_code: String,
    pub config: TableConfig,
    /// Хост комнаты (создатель) — выбирает кнопку и стартует первый раунд.
    pub host: PlayerId,

    /// Места за столом: индекс вектора = SeatIndex. None — место пустое.
    pub seats: Vec<Option<Seat>>,
    pub spectators: Vec<Spectator>,

    pub phase: RoundPhase,
    /// Кнопка-«банкир»: сидит вне раздачи этого раунда. None — все играют.
    pub button: Option<SeatIndex>,

    /// Карты дилера: первая открытая, вторая закрыта до peek/reveal.
    pub dealer_cards: Vec<Card>,
    /// Активная пара (seat, hand) в фазе PlayerTurn.
    pub active: Option<ActiveCursor>,

    pub shoe: Shoe,
    pub fairness: FairnessState,

    /// Страховые решения текущего раунда (ключ — сиденье).
    pub insurance: BTreeMap<SeatIndex, InsuranceEntry>,

    /// Расчёт текущего раунда (фаза Settlement).
    pub settlement: Option<RoundSettlement>,

    pub round_number: u64,
    pub chip_denoms: Vec<u64>,
    /// Докупки, отложенные до конца раунда: (сиденье, сумма).
    pub pending_buy_ins: Vec<(SeatIndex, Chips)>,
}

impl Table {
    /// Новый стол в лобби. Шуз и commitment подставляет движок
    /// при создании комнаты (ему нужен CryptoService).
    pub fn new(
        id: RoomId,
        room_code: String,
        host: PlayerId,
        config: TableConfig,
        fairness: FairnessState,
        shoe: Shoe,
    ) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            room_code,
            config,
            host,
            seats,
            spectators: Vec::new(),
            phase: RoundPhase::Lobby,
            button: None,
            dealer_cards: Vec::new(),
            active: None,
            shoe,
            fairness,
            insurance: BTreeMap::new(),
            settlement: None,
            round_number: 0,
            chip_denoms: default_chip_denoms(),
            pending_buy_ins: Vec::new(),
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&Seat> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut Seat> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    /// Найти сиденье игрока.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats.iter().enumerate().find_map(|(idx, s)| {
            s.as_ref()
                .filter(|seat| seat.player_id == player_id)
                .map(|_| idx as SeatIndex)
        })
    }

    /// Сиденье ставит в этом раунде: занято, на связи, не away и не кнопка.
    pub fn is_betting_seat(&self, index: SeatIndex) -> bool {
        if self.button == Some(index) {
            return false;
        }
        self.seat(index).map(|s| s.is_present()).unwrap_or(false)
    }
}
