use tactics_content::Mission;
use tactics_core::{
    ActorTemplate, CellId, Coord, Hint, LevelLayout, Phase, Role, TurnEvent, TurnMachine,
    TurnState,
};
use tactics_runtime::{
    ChaseProvider, PlayerCommand, PlayerProvider, Prompt, Runtime, RuntimeError,
};

const DT: f32 = 0.05;

/// 6x6 flat arena: player pool in the first two cells, enemy pool in the
/// last two.
fn mission(player_actions: u32) -> Mission {
    let mut obstacles = vec![0u8; 36];
    obstacles[0] = 4;
    obstacles[1] = 4;
    obstacles[34] = 3;
    obstacles[35] = 3;
    let level = LevelLayout::new("arena", 6, 6, vec![1; 36])
        .with_obstacles(obstacles)
        .build(true)
        .unwrap();
    Mission {
        name: "Arena".into(),
        level,
        player: ActorTemplate::new("scout", 10, 1, player_actions),
        enemy: ActorTemplate::new("raider", 10, 1, 3),
    }
}

/// Spawns on the first pool cell and otherwise leaves every decision to
/// the test.
struct Manual;

impl PlayerProvider for Manual {
    fn provide(&mut self, prompt: Prompt, machine: &TurnMachine) -> Option<PlayerCommand> {
        match prompt {
            Prompt::Spawn => Some(PlayerCommand::Spawn(machine.spawns().pool(Role::Player)[0])),
            _ => None,
        }
    }
}

fn at(runtime: &Runtime, row: i32, column: i32) -> CellId {
    runtime.machine().grid().cell_at(Coord::new(row, column)).unwrap()
}

fn until_player_menu(runtime: &mut Runtime) {
    for _ in 0..500 {
        runtime.tick(DT).unwrap();
        if runtime.state() == TurnState::acting(Role::Player, Phase::Menu) {
            return;
        }
    }
    panic!("player never got a turn");
}

#[test]
fn waiting_player_keeps_turns_flowing() {
    let mut runtime = Runtime::builder()
        .mission(mission(3))
        .seed(7)
        .build()
        .unwrap();

    for _ in 0..200 {
        runtime.tick(DT).unwrap();
    }

    assert!(runtime.turn_number() >= 4);
    assert_eq!(runtime.machine().actor_cell(Role::Player), Ok(at(&runtime, 0, 0)));

    let enemy_pool = runtime.machine().spawns().pool(Role::Enemy).to_vec();
    let events = runtime.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        TurnEvent::Spawned { role: Role::Enemy, cell } if enemy_pool.contains(cell)
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        TurnEvent::TurnStarted {
            role: Role::Player,
            ..
        }
    )));
}

#[test]
fn same_seed_spawns_the_enemy_on_the_same_cell() {
    let spawn = |seed| {
        let mut runtime = Runtime::builder()
            .mission(mission(3))
            .seed(seed)
            .build()
            .unwrap();
        runtime.tick(DT).unwrap();
        runtime.machine().actor_cell(Role::Enemy).unwrap()
    };
    assert_eq!(spawn(42), spawn(42));
}

#[test]
fn chasing_player_ends_up_next_to_the_enemy() {
    let mut runtime = Runtime::builder()
        .mission(mission(4))
        .player_provider(ChaseProvider)
        .seed(3)
        .build()
        .unwrap();

    for _ in 0..2_000 {
        runtime.tick(DT).unwrap();
    }

    let machine = runtime.machine();
    let player = machine.actor_cell(Role::Player).unwrap();
    let enemy = machine.actor_cell(Role::Enemy).unwrap();
    assert!(machine.grid().distance(player, enemy) <= 14);
}

#[test]
fn invalid_target_returns_to_menu_with_a_hint() {
    let mut runtime = Runtime::builder()
        .mission(mission(2))
        .player_provider(Manual)
        .seed(1)
        .build()
        .unwrap();
    until_player_menu(&mut runtime);

    let far = at(&runtime, 5, 2);
    runtime.command(PlayerCommand::Move(far)).unwrap();

    assert_eq!(runtime.state(), TurnState::acting(Role::Player, Phase::Menu));
    assert_eq!(runtime.hints().current(), Some(Hint::InvalidTarget));
}

#[test]
fn move_command_plays_back_and_spends_hops() {
    let mut runtime = Runtime::builder()
        .mission(mission(2))
        .player_provider(Manual)
        .seed(1)
        .build()
        .unwrap();
    until_player_menu(&mut runtime);

    let machine = runtime.machine();
    let own = machine.actor_cell(Role::Player).unwrap();
    let target = machine
        .reachable(Role::Player)
        .unwrap()
        .iter()
        .find(|&cell| cell != own)
        .unwrap();

    runtime.command(PlayerCommand::Move(target)).unwrap();
    assert!(runtime.is_busy());
    assert_eq!(runtime.state(), TurnState::acting(Role::Player, Phase::Moving));

    for _ in 0..200 {
        runtime.tick(DT).unwrap();
        if !runtime.is_busy() {
            break;
        }
    }

    let machine = runtime.machine();
    assert_eq!(machine.actor_cell(Role::Player), Ok(target));
    assert_eq!(machine.actor(Role::Player).unwrap().budget.current, 1);
    assert_eq!(runtime.state(), TurnState::acting(Role::Player, Phase::Menu));
}

#[test]
fn spawn_outside_the_pool_is_rejected_with_a_hint() {
    struct Stubborn;
    impl PlayerProvider for Stubborn {
        fn provide(&mut self, _: Prompt, machine: &TurnMachine) -> Option<PlayerCommand> {
            let centre = machine.grid().cell_at(Coord::new(3, 3))?;
            Some(PlayerCommand::Spawn(centre))
        }
    }

    let mut runtime = Runtime::builder()
        .mission(mission(3))
        .player_provider(Stubborn)
        .build()
        .unwrap();
    runtime.tick(DT).unwrap();

    assert!(runtime.machine().actor(Role::Player).is_none());
    assert_eq!(runtime.hints().current(), Some(Hint::NotASpawnPoint));
    assert_eq!(runtime.state(), TurnState::Spawn);
}

#[test]
fn builder_requires_a_mission_with_both_spawn_pools() {
    assert!(matches!(
        Runtime::builder().build(),
        Err(RuntimeError::MissingMission)
    ));

    let mut bare = mission(3);
    bare.level = LevelLayout::new("bare", 2, 2, vec![1; 4])
        .with_obstacles(vec![4, 0, 0, 0])
        .build(true)
        .unwrap();
    assert!(matches!(
        Runtime::builder().mission(bare).build(),
        Err(RuntimeError::NoSpawnPoints(Role::Enemy))
    ));
}
