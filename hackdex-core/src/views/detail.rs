//! Single-record reads behind the detail pages.

use serde::{Deserialize, Serialize};

use crate::cache::{QueryKey, ViewId};
use crate::game::GameId;
use crate::query::{Filter, QueryRequest};

pub const POKEMON_DETAIL_COLLECTION: &str = "pokemon_detail_view";
pub const TRAINER_DETAIL_COLLECTION: &str = "trainer_detail_view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    #[must_use]
    pub const fn total(&self) -> u16 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub dex_number: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub base_stats: BaseStats,
    /// Routes this species can be encountered on in the game.
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub species: String,
    pub level: u8,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerDetail {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub split: String,
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

fn detail(view: ViewId, collection: &str, game: &GameId, id: u32) -> (QueryKey, QueryRequest) {
    let id = id.to_string();
    let key = QueryKey::new(view, game.clone()).with("id", &id);
    let request = QueryRequest::new(collection)
        .filter(Filter::eq("game_id", game.as_str()))
        .filter(Filter::eq("id", id))
        .range(0, 0);
    (key, request)
}

#[must_use]
pub fn pokemon_detail(game: &GameId, id: u32) -> (QueryKey, QueryRequest) {
    detail(ViewId::PokemonDetail, POKEMON_DETAIL_COLLECTION, game, id)
}

#[must_use]
pub fn trainer_detail(game: &GameId, id: u32) -> (QueryKey, QueryRequest) {
    detail(ViewId::TrainerDetail, TRAINER_DETAIL_COLLECTION, game, id)
}
