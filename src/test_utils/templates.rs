#[derive(Debug, Clone, Copy)]
pub struct PlayerTemplate {
    pub id: u64,
    pub name: &'static str,
    pub class_id: u32,
    pub gear_score: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct BossTemplate {
    pub id: u64,
    pub npc_id: u32,
    pub name: &'static str,
    pub max_hp: i64,
}

pub const PLAYER_TEMPLATE_BERSERKER: PlayerTemplate = PlayerTemplate {
    id: 100,
    name: "Mokoko",
    class_id: 102,
    gear_score: 1620.0,
};

pub const PLAYER_TEMPLATE_BARD: PlayerTemplate = PlayerTemplate {
    id: 101,
    name: "Sceptrum",
    class_id: 204,
    gear_score: 1610.0,
};

pub const BOSS_TEMPLATE_THAEMINE: BossTemplate = BossTemplate {
    id: 3000,
    npc_id: 485800,
    name: "Thaemine the Lightqueller",
    max_hp: 100_000_000,
};

pub const ESTHER_TEMPLATE_AZENA: BossTemplate = BossTemplate {
    id: 4000,
    npc_id: 2000801,
    name: "Azena",
    max_hp: 0,
};
