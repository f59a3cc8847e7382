use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::debug;
use serde::Serialize;

use crate::models::*;

use super::error::UploaderError;

/// Upload-shaped copy of a [`SessionState`], built once per upload attempt.
///
/// Entities that are not a boss, player or esther are dropped, `Map`-backed
/// aggregation fields are materialized into plain key-value maps and
/// localized strings (entity names for non-players, buff names and
/// descriptions) are stripped. The frontend re-applies display strings from
/// its own localization data, so sending them would only cost bandwidth and
/// storage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocument {
    pub started_on: i64,
    pub last_combat_packet: i64,
    pub fight_started_on: i64,
    pub local_player: u64,
    pub current_boss: u64,
    pub entities: Vec<UploadEntity>,
    pub damage_statistics: UploadDamageStatistics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEntity {
    pub is_local_player: bool,
    pub last_update: i64,
    pub id: u64,
    pub npc_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub class_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_id: Option<u32>,
    pub is_boss: bool,
    pub is_player: bool,
    pub is_esther: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_dead: bool,
    pub deaths: i32,
    pub death_time: i64,
    pub gear_score: f32,
    pub current_hp: i64,
    pub max_hp: i64,
    pub damage_dealt: i64,
    pub damage_dealt_debuffed_by_support: i64,
    pub damage_dealt_buffed_by_support: i64,
    pub healing_done: i64,
    pub shield_done: i64,
    pub damage_taken: i64,
    pub shield_received: i64,
    pub damage_prevented_with_shield_on_others: i64,
    pub damage_prevented_by_shield: i64,
    pub skills: Vec<UploadSkill>,
    pub hits: UploadHits,
    pub damage_dealt_debuffed_by: HashMap<u32, i64>,
    pub damage_dealt_buffed_by: HashMap<u32, i64>,
    pub damage_prevented_with_shield_on_others_by: HashMap<u32, i64>,
    pub damage_prevented_by_shield_by: HashMap<u32, i64>,
    pub shield_done_by: HashMap<u32, i64>,
    pub shield_received_by: HashMap<u32, i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSkill {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub damage_dealt: i64,
    pub damage_dealt_debuffed_by_support: i64,
    pub damage_dealt_buffed_by_support: i64,
    pub max_damage: i64,
    pub hits: UploadHits,
    pub breakdown: Vec<Breakdown>,
    pub damage_dealt_debuffed_by: HashMap<u32, i64>,
    pub damage_dealt_buffed_by: HashMap<u32, i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHits {
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
    pub hits_buffed_by: HashMap<u32, i64>,
    pub hits_debuffed_by: HashMap<u32, i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDamageStatistics {
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
    pub buffs: HashMap<u32, UploadStatusEffect>,
    pub debuffs: HashMap<u32, UploadStatusEffect>,
    pub effective_shielding_buffs: HashMap<u32, UploadStatusEffect>,
    pub applied_shielding_buffs: HashMap<u32, UploadStatusEffect>,
}

#[derive(Debug, Serialize)]
pub struct UploadStatusEffect {
    pub id: u32,
    pub target: StatusEffectTarget,
    pub category: StatusEffectCategory,
    pub buffcategory: String,
    pub bufftype: u32,
    pub uniquegroup: u32,
    pub source: UploadStatusEffectSource,
}

#[derive(Debug, Serialize)]
pub struct UploadStatusEffectSource {
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<EffectSkill>,
}

impl UploadDocument {
    /// Builds an upload document from a session snapshot, validating the
    /// encounter along the way. The first violated invariant aborts the
    /// whole build, partial documents are never produced.
    pub fn from_session(session: &SessionState) -> Result<Self, UploaderError> {
        if session.fight_started_on == 0 {
            return Err(UploaderError::FightNotStarted);
        }

        let boss = match (&session.current_boss, session.entities.is_empty()) {
            (Some(boss), false) => boss,
            _ => return Err(UploaderError::NoBossEntity),
        };

        let entities = Self::handle_entities(session, boss)?;

        Ok(Self {
            started_on: session.started_on,
            last_combat_packet: session.last_combat_packet,
            fight_started_on: session.fight_started_on,
            local_player: session.local_player,
            current_boss: boss.id,
            entities,
            damage_statistics: UploadDamageStatistics::from_snapshot(&session.damage_statistics),
        })
    }

    fn is_typed_entity(entity: &EntityState) -> bool {
        entity.is_boss || entity.is_player || entity.is_esther
    }

    fn entity_type(entity: &EntityState) -> &'static str {
        if entity.is_boss {
            return "boss";
        }
        if entity.is_player {
            return "player";
        }
        if entity.is_esther {
            return "esther";
        }
        "unknown"
    }

    fn handle_entities(
        session: &SessionState,
        boss: &EntityState,
    ) -> Result<Vec<UploadEntity>, UploaderError> {
        // Sometimes the boss is only tracked by reference and never makes it
        // into the entity collection, so it has to be pulled in here for
        // filtering to pick it up.
        let tracked_boss = (!session.entities.contains_key(&boss.id)).then_some(boss);

        let mut bosses = 0;
        let mut local_player_found = false;
        let mut handled = Vec::new();

        for entity in session.entities.values().chain(tracked_boss) {
            if !Self::is_typed_entity(entity) {
                debug!(
                    "skipping entity {} ({}, {})",
                    entity.id,
                    entity.npc_id,
                    Self::entity_type(entity)
                );
                continue;
            }

            if entity.id == boss.id && entity.current_hp > 0 {
                return Err(UploaderError::BossNotDead);
            }

            if entity.is_player && entity.gear_score == 0.0 {
                return Err(UploaderError::MissingGearScore);
            }

            if entity.is_boss {
                bosses += 1;
            }

            let is_local_player = entity.id == session.local_player;
            local_player_found |= is_local_player;

            handled.push(UploadEntity::from_snapshot(entity, is_local_player));
            debug!(
                "handled entity {} ({})",
                entity.id,
                Self::entity_type(entity)
            );
        }

        if bosses == 0 {
            return Err(UploaderError::NoBossEntity);
        }

        if !local_player_found {
            return Err(UploaderError::NoLocalPlayer);
        }

        Ok(handled)
    }
}

impl UploadEntity {
    fn from_snapshot(entity: &EntityState, is_local_player: bool) -> Self {
        Self {
            is_local_player,
            last_update: entity.last_update,
            id: entity.id,
            npc_id: entity.npc_id,
            // Non-player names are localized game data, only player names
            // survive into the document.
            name: entity.is_player.then(|| entity.name.clone()),
            class_id: entity.class_id,
            party_id: entity.party_id,
            is_boss: entity.is_boss,
            is_player: entity.is_player,
            is_esther: entity.is_esther,
            icon: (!entity.icon.is_empty()).then(|| entity.icon.clone()),
            is_dead: entity.is_dead,
            deaths: entity.deaths,
            death_time: entity.death_time,
            gear_score: entity.gear_score,
            current_hp: entity.current_hp,
            max_hp: entity.max_hp,
            damage_dealt: entity.damage_dealt,
            damage_dealt_debuffed_by_support: entity.damage_dealt_debuffed_by_support,
            damage_dealt_buffed_by_support: entity.damage_dealt_buffed_by_support,
            healing_done: entity.healing_done,
            shield_done: entity.shield_done,
            damage_taken: entity.damage_taken,
            shield_received: entity.shield_received,
            damage_prevented_with_shield_on_others: entity.damage_prevented_with_shield_on_others,
            damage_prevented_by_shield: entity.damage_prevented_by_shield,
            skills: entity.skills.values().map(UploadSkill::from_snapshot).collect(),
            hits: UploadHits::from_snapshot(&entity.hits),
            damage_dealt_debuffed_by: materialize(&entity.damage_dealt_debuffed_by),
            damage_dealt_buffed_by: materialize(&entity.damage_dealt_buffed_by),
            damage_prevented_with_shield_on_others_by: materialize(
                &entity.damage_prevented_with_shield_on_others_by,
            ),
            damage_prevented_by_shield_by: materialize(&entity.damage_prevented_by_shield_by),
            shield_done_by: materialize(&entity.shield_done_by),
            shield_received_by: materialize(&entity.shield_received_by),
        }
    }
}

impl UploadSkill {
    fn from_snapshot(skill: &EntitySkill) -> Self {
        Self {
            id: skill.id,
            icon: (!skill.icon.is_empty()).then(|| skill.icon.clone()),
            damage_dealt: skill.damage_dealt,
            damage_dealt_debuffed_by_support: skill.damage_dealt_debuffed_by_support,
            damage_dealt_buffed_by_support: skill.damage_dealt_buffed_by_support,
            max_damage: skill.max_damage,
            hits: UploadHits::from_snapshot(&skill.hits),
            breakdown: skill.breakdown.clone(),
            damage_dealt_debuffed_by: materialize(&skill.damage_dealt_debuffed_by),
            damage_dealt_buffed_by: materialize(&skill.damage_dealt_buffed_by),
        }
    }

    /// Rewrites breakdown records pointing at `previous` to point at
    /// `updated`. Downstream tooling calls this when entity ids get
    /// remapped after the fact.
    pub fn reassign_breakdown_target(&mut self, previous: u64, updated: u64) {
        for breakdown in &mut self.breakdown {
            if breakdown.target_entity == previous {
                breakdown.target_entity = updated;
            }
        }
    }
}

impl UploadHits {
    fn from_snapshot(hits: &SkillHits) -> Self {
        Self {
            casts: hits.casts,
            total: hits.total,
            crit: hits.crit,
            back_attack: hits.back_attack,
            total_back_attack: hits.total_back_attack,
            front_attack: hits.front_attack,
            total_front_attack: hits.total_front_attack,
            counter: hits.counter,
            hits_debuffed_by_support: hits.hits_debuffed_by_support,
            hits_buffed_by_support: hits.hits_buffed_by_support,
            hits_buffed_by: materialize(&hits.hits_buffed_by),
            hits_debuffed_by: materialize(&hits.hits_debuffed_by),
        }
    }
}

impl UploadDamageStatistics {
    // Total and top damage dealt are deliberately not carried over, the
    // server recomputes them from the entities.
    fn from_snapshot(statistics: &DamageStatistics) -> Self {
        Self {
            total_damage_taken: statistics.total_damage_taken,
            top_damage_taken: statistics.top_damage_taken,
            total_healing_done: statistics.total_healing_done,
            top_healing_done: statistics.top_healing_done,
            total_shield_done: statistics.total_shield_done,
            top_shield_done: statistics.top_shield_done,
            top_shield_gotten: statistics.top_shield_gotten,
            total_effective_shielding_done: statistics.total_effective_shielding_done,
            top_effective_shielding_done: statistics.top_effective_shielding_done,
            top_effective_shielding_used: statistics.top_effective_shielding_used,
            buffs: materialize_effects(&statistics.buffs),
            debuffs: materialize_effects(&statistics.debuffs),
            effective_shielding_buffs: materialize_effects(&statistics.effective_shielding_buffs),
            applied_shielding_buffs: materialize_effects(&statistics.applied_shielding_buffs),
        }
    }
}

impl UploadStatusEffect {
    fn from_snapshot(id: u32, effect: &StatusEffect) -> Self {
        Self {
            id,
            target: effect.target,
            category: effect.category,
            buffcategory: effect.buff_category.clone(),
            bufftype: effect.buff_type,
            uniquegroup: effect.unique_group,
            source: UploadStatusEffectSource {
                icon: effect.source.icon.clone(),
                setname: effect.source.set_name.clone(),
                skill: effect.source.skill.clone(),
            },
        }
    }
}

fn materialize(map: &BTreeMap<u32, i64>) -> HashMap<u32, i64> {
    map.iter().map(|(key, value)| (*key, *value)).collect()
}

fn materialize_effects(effects: &BTreeMap<u32, StatusEffect>) -> HashMap<u32, UploadStatusEffect> {
    effects
        .iter()
        .map(|(id, effect)| (*id, UploadStatusEffect::from_snapshot(*id, effect)))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use crate::uploader::error::UploaderError;

    use super::*;

    #[test]
    fn should_reject_when_fight_not_started() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        let mut session = session_builder.build();
        session.fight_started_on = 0;

        let result = UploadDocument::from_session(&session);

        assert!(matches!(result, Err(UploaderError::FightNotStarted)));
    }

    #[test]
    fn should_reject_without_boss() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        let session = session_builder.build();

        let result = UploadDocument::from_session(&session);

        let error = result.unwrap_err();
        assert!(matches!(error, UploaderError::NoBossEntity));
        assert!(!error.notify());
    }

    #[test]
    fn should_reject_when_boss_alive() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 1_000_000);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        let session = session_builder.build();

        let result = UploadDocument::from_session(&session);

        let error = result.unwrap_err();
        assert!(matches!(error, UploaderError::BossNotDead));
        assert!(!error.notify());
    }

    #[test]
    fn should_reject_player_without_gear_score() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        let mut template = PLAYER_TEMPLATE_BERSERKER;
        template.gear_score = 0.0;
        session_builder.create_player(&template);
        let session = session_builder.build();

        let result = UploadDocument::from_session(&session);

        let error = result.unwrap_err();
        assert!(matches!(error, UploaderError::MissingGearScore));
        assert!(error.notify());
    }

    #[test]
    fn should_reject_without_local_player() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        let mut session = session_builder.build();
        session.local_player = 0;

        let result = UploadDocument::from_session(&session);

        let error = result.unwrap_err();
        assert!(matches!(error, UploaderError::NoLocalPlayer));
        assert!(error.notify());
    }

    #[test]
    fn should_build_document_for_cleared_encounter() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        session_builder.create_player(&PLAYER_TEMPLATE_BARD);
        session_builder.create_esther(&ESTHER_TEMPLATE_AZENA);
        let session = session_builder.build();

        let document = UploadDocument::from_session(&session).unwrap();

        assert_eq!(document.entities.len(), 4);
        assert_eq!(document.current_boss, BOSS_TEMPLATE_THAEMINE.id);
        let locals = document
            .entities
            .iter()
            .filter(|entity| entity.is_local_player)
            .count();
        assert_eq!(locals, 1);
        assert!(document
            .entities
            .iter()
            .any(|entity| entity.id == ESTHER_TEMPLATE_AZENA.id && entity.is_esther));
    }

    #[test]
    fn should_include_boss_tracked_by_reference_only() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        let mut session = session_builder.build();
        session.entities.remove(&BOSS_TEMPLATE_THAEMINE.id);

        let document = UploadDocument::from_session(&session).unwrap();

        assert!(document
            .entities
            .iter()
            .any(|entity| entity.id == BOSS_TEMPLATE_THAEMINE.id && entity.is_boss));
    }

    #[test]
    fn should_drop_untyped_entities() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        session_builder.create_summon(9001);
        let session = session_builder.build();

        let document = UploadDocument::from_session(&session).unwrap();

        assert!(!document.entities.iter().any(|entity| entity.id == 9001));
    }

    #[test]
    fn should_keep_player_names_only() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        session_builder.create_esther(&ESTHER_TEMPLATE_AZENA);
        let session = session_builder.build();

        let document = UploadDocument::from_session(&session).unwrap();

        for entity in &document.entities {
            assert_eq!(entity.name.is_some(), entity.is_player);
        }
    }

    #[test]
    fn should_strip_status_effect_display_strings() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        session_builder.create_player(&PLAYER_TEMPLATE_BERSERKER);
        session_builder.add_buff(211601, create_status_effect("Heavenly Tune", "Atk. Power +8%"));
        let session = session_builder.build();

        let document = UploadDocument::from_session(&session).unwrap();
        let serialized = serde_json::to_string(&document).unwrap();

        assert!(document.damage_statistics.buffs.contains_key(&211601));
        assert!(!serialized.contains("Heavenly Tune"));
        assert!(!serialized.contains("Atk. Power"));
    }

    #[test]
    fn should_materialize_ordered_maps() {
        let mut session_builder = SessionBuilder::new();
        session_builder.create_boss(&BOSS_TEMPLATE_THAEMINE, 0);
        let mut template = PLAYER_TEMPLATE_BERSERKER;
        template.id = 201;
        session_builder.create_player_with_skills(&template);
        let session = session_builder.build();

        let document = UploadDocument::from_session(&session).unwrap();

        let player = document
            .entities
            .iter()
            .find(|entity| entity.id == 201)
            .unwrap();
        assert_eq!(player.damage_dealt_buffed_by.get(&211601), Some(&5000));
        assert!(!player.skills.is_empty());
        assert_eq!(player.skills[0].hits.hits_buffed_by.get(&211601), Some(&3));
    }

    #[test]
    fn should_reassign_breakdown_targets() {
        let mut skill = UploadSkill {
            id: 16140,
            icon: None,
            damage_dealt: 100,
            damage_dealt_debuffed_by_support: 0,
            damage_dealt_buffed_by_support: 0,
            max_damage: 60,
            hits: UploadHits::from_snapshot(&SkillHits::default()),
            breakdown: vec![
                Breakdown {
                    target_entity: 100,
                    damage: 60,
                    ..Default::default()
                },
                Breakdown {
                    target_entity: 42,
                    damage: 40,
                    ..Default::default()
                },
            ],
            damage_dealt_debuffed_by: HashMap::new(),
            damage_dealt_buffed_by: HashMap::new(),
        };

        skill.reassign_breakdown_target(100, 777);

        assert_eq!(skill.breakdown[0].target_entity, 777);
        assert_eq!(skill.breakdown[1].target_entity, 42);
    }
}
