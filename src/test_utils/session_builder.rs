use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::*;

use super::templates::{BossTemplate, PlayerTemplate};

pub fn create_status_effect(name: &str, desc: &str) -> StatusEffect {
    StatusEffect {
        target: StatusEffectTarget::Party,
        category: StatusEffectCategory::Buff,
        buff_category: "classskill".into(),
        buff_type: 1,
        unique_group: 0,
        source: StatusEffectSource {
            name: name.into(),
            desc: desc.into(),
            icon: "buff_icon.png".into(),
            set_name: None,
            skill: Some(EffectSkill {
                id: 211601,
                classid: 204,
                icon: "skill_icon.png".into(),
                summonids: None,
                summonsourceskill: None,
                sourceskill: None,
            }),
        },
    }
}

pub struct SessionBuilder {
    session: SessionState,
}

impl SessionBuilder {
    pub fn new() -> Self {
        let now = Utc::now().timestamp_millis();

        Self {
            session: SessionState {
                started_on: now - 360_000,
                fight_started_on: now - 300_000,
                last_combat_packet: now,
                ..SessionState::default()
            },
        }
    }

    pub fn create_player(&mut self, template: &PlayerTemplate) {
        let entity = EntityState {
            id: template.id,
            name: template.name.into(),
            class_id: template.class_id,
            gear_score: template.gear_score,
            is_player: true,
            party_id: Some(1),
            current_hp: 300_000,
            max_hp: 300_000,
            damage_dealt: 1_000_000,
            ..EntityState::default()
        };

        // The first player created is the local one.
        if self.session.local_player == 0 {
            self.session.local_player = template.id;
        }

        self.session.entities.insert(template.id, entity);
    }

    pub fn create_player_with_skills(&mut self, template: &PlayerTemplate) {
        self.create_player(template);

        let entity = self.session.entities.get_mut(&template.id).unwrap();
        entity.damage_dealt_buffed_by = BTreeMap::from([(211601, 5000)]);
        entity.skills.insert(
            16140,
            EntitySkill {
                id: 16140,
                icon: "skill_icon.png".into(),
                damage_dealt: 500_000,
                max_damage: 120_000,
                hits: SkillHits {
                    casts: 10,
                    total: 20,
                    crit: 8,
                    hits_buffed_by: BTreeMap::from([(211601, 3)]),
                    ..SkillHits::default()
                },
                breakdown: vec![Breakdown {
                    timestamp: 1_700_000_070_000,
                    damage: 120_000,
                    target_entity: 3000,
                    is_crit: true,
                    ..Breakdown::default()
                }],
                damage_dealt_buffed_by: BTreeMap::from([(211601, 5000)]),
                ..EntitySkill::default()
            },
        );
    }

    pub fn create_boss(&mut self, template: &BossTemplate, current_hp: i64) {
        let entity = EntityState {
            id: template.id,
            npc_id: template.npc_id,
            name: template.name.into(),
            is_boss: true,
            is_dead: current_hp == 0,
            current_hp,
            max_hp: template.max_hp,
            ..EntityState::default()
        };

        self.session.current_boss = Some(entity.clone());
        self.session.entities.insert(template.id, entity);
    }

    pub fn create_esther(&mut self, template: &BossTemplate) {
        let entity = EntityState {
            id: template.id,
            npc_id: template.npc_id,
            name: template.name.into(),
            is_esther: true,
            ..EntityState::default()
        };

        self.session.entities.insert(template.id, entity);
    }

    pub fn create_summon(&mut self, id: u64) {
        let entity = EntityState {
            id,
            npc_id: 45001,
            name: "Shadowhunter Summon".into(),
            ..EntityState::default()
        };

        self.session.entities.insert(id, entity);
    }

    pub fn add_buff(&mut self, id: u32, status_effect: StatusEffect) {
        self.session
            .damage_statistics
            .buffs
            .insert(id, status_effect);
    }

    pub fn build(self) -> SessionState {
        self.session
    }
}
