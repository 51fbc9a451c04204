use tactics_core::{ActorTemplate, Level, Role};

/// A fully resolved mission: a built level and the two combatants.
#[derive(Clone, Debug)]
pub struct Mission {
    pub name: String,
    pub level: Level,
    pub player: ActorTemplate,
    pub enemy: ActorTemplate,
}

impl Mission {
    pub fn template(&self, role: Role) -> &ActorTemplate {
        match role {
            Role::Player => &self.player,
            Role::Enemy => &self.enemy,
        }
    }
}
