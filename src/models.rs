use std::collections::BTreeMap;
use std::path::PathBuf;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_URL, DEFAULT_INGEST_URL, UPLOADS_DIR};

/// Read-only snapshot of a finished encounter, handed over by the parser.
///
/// The parser owns and mutates its own state; the uploader only ever sees
/// a snapshot taken at upload time and never writes back into it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub started_on: i64,
    pub last_combat_packet: i64,
    pub fight_started_on: i64,
    pub local_player: u64,
    pub current_boss: Option<EntityState>,
    pub entities: HashMap<u64, EntityState>,
    pub damage_statistics: DamageStatistics,
}

#[derive(Debug, Clone, Default)]
pub struct EntityState {
    pub id: u64,
    pub npc_id: u32,
    pub name: String,
    pub class_id: u32,
    pub party_id: Option<u32>,
    pub icon: String,
    pub is_boss: bool,
    pub is_player: bool,
    pub is_esther: bool,
    pub is_dead: bool,
    pub deaths: i32,
    pub death_time: i64,
    pub gear_score: f32,
    pub current_hp: i64,
    pub max_hp: i64,
    pub last_update: i64,
    pub damage_dealt: i64,
    pub damage_dealt_debuffed_by_support: i64,
    pub damage_dealt_buffed_by_support: i64,
    pub healing_done: i64,
    pub shield_done: i64,
    pub damage_taken: i64,
    pub shield_received: i64,
    pub damage_prevented_with_shield_on_others: i64,
    pub damage_prevented_by_shield: i64,
    pub skills: BTreeMap<u32, EntitySkill>,
    pub hits: SkillHits,
    pub damage_dealt_debuffed_by: BTreeMap<u32, i64>,
    pub damage_dealt_buffed_by: BTreeMap<u32, i64>,
    pub damage_prevented_with_shield_on_others_by: BTreeMap<u32, i64>,
    pub damage_prevented_by_shield_by: BTreeMap<u32, i64>,
    pub shield_done_by: BTreeMap<u32, i64>,
    pub shield_received_by: BTreeMap<u32, i64>,
}

#[derive(Debug, Clone, Default)]
pub struct EntitySkill {
    pub id: u32,
    pub icon: String,
    pub damage_dealt: i64,
    pub damage_dealt_debuffed_by_support: i64,
    pub damage_dealt_buffed_by_support: i64,
    pub max_damage: i64,
    pub hits: SkillHits,
    pub breakdown: Vec<Breakdown>,
    pub damage_dealt_debuffed_by: BTreeMap<u32, i64>,
    pub damage_dealt_buffed_by: BTreeMap<u32, i64>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillHits {
    pub casts: i64,
    pub total: i64,
    pub crit: i64,
    pub back_attack: i64,
    pub total_back_attack: i64,
    pub front_attack: i64,
    pub total_front_attack: i64,
    pub counter: i64,
    pub hits_debuffed_by_support: i64,
    pub hits_buffed_by_support: i64,
    pub hits_buffed_by: BTreeMap<u32, i64>,
    pub hits_debuffed_by: BTreeMap<u32, i64>,
}

/// Per-hit record attributed to a specific target entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub timestamp: i64,
    pub damage: i64,
    pub target_entity: u64,
    pub is_crit: bool,
    pub is_back_attack: bool,
    pub is_front_attack: bool,
    pub is_buffed_by_support: bool,
    pub is_debuffed_by_support: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusEffectTarget {
    #[default]
    Party,
    #[serde(rename = "self")]
    SelfTarget,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusEffectCategory {
    #[default]
    Buff,
    Debuff,
}

#[derive(Debug, Clone, Default)]
pub struct StatusEffect {
    pub target: StatusEffectTarget,
    pub category: StatusEffectCategory,
    pub buff_category: String,
    pub buff_type: u32,
    pub unique_group: u32,
    pub source: StatusEffectSource,
}

/// Buff/debuff definition as tracked by the parser. `name` and `desc` are
/// localized display strings and never leave the client.
#[derive(Debug, Clone, Default)]
pub struct StatusEffectSource {
    pub name: String,
    pub desc: String,
    pub icon: String,
    pub set_name: Option<String>,
    pub skill: Option<EffectSkill>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EffectSkill {
    pub id: u32,
    pub classid: u32,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summonids: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summonsourceskill: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourceskill: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DamageStatistics {
    pub total_damage_dealt: i64,
    pub top_damage_dealt: i64,
    pub total_damage_taken: i64,
    pub top_damage_taken: i64,
    pub total_healing_done: i64,
    pub top_healing_done: i64,
    pub total_shield_done: i64,
    pub top_shield_done: i64,
    pub top_shield_gotten: i64,
    pub total_effective_shielding_done: i64,
    pub top_effective_shielding_done: i64,
    pub top_effective_shielding_used: i64,
    pub buffs: BTreeMap<u32, StatusEffect>,
    pub debuffs: BTreeMap<u32, StatusEffect>,
    pub effective_shielding_buffs: BTreeMap<u32, StatusEffect>,
    pub applied_shielding_buffs: BTreeMap<u32, StatusEffect>,
}

/// Upload configuration, passed explicitly into each operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSettings {
    pub upload_logs: bool,
    pub jwt: String,
    pub api_url: String,
    pub ingest_url: String,
    pub save_copy: bool,
    pub uploads_directory: PathBuf,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            upload_logs: false,
            jwt: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            ingest_url: DEFAULT_INGEST_URL.to_string(),
            save_copy: false,
            uploads_directory: PathBuf::from(UPLOADS_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub discord_id: String,
    pub discord_username: String,
    pub discriminator: String,
    pub avatar: String,
    pub registered_date: i64,
    pub last_seen: i64,
    pub banned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthResponse {
    pub token: String,
    pub user: User,
}
