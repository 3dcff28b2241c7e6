//! Fixed timestep simulation tick
//!
//! One call advances a level by one frame in a fixed order: player, then
//! obstacles or enemies, then collisions, then win/lose checks, then score.

use super::actor::Combatant;
use super::collision::{
    resolve_enemy_contact, resolve_enemy_projectiles, resolve_player_vs_obstacles,
    resolve_projectiles_vs_enemies, resolve_projectiles_vs_obstacles,
};
use super::entity::Facing;
use super::obstacle::{FLYING_LANES, ObstacleKind};
use super::state::{GameEvent, GameMode, GamePhase, GameState};
use crate::consts::SCORE_PER_TICK;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub duck: bool,
    pub stop_ducking: bool,
    pub attack: bool,
    pub move_forward: bool,
    pub move_back: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the simulation steer the player (demo / headless runs)
    pub autopilot: bool,
}

/// Autopilot: attack hazards from this far out (gap between bodies)
const AUTO_FIRE_MIN_GAP: f64 = 120.0;
const AUTO_FIRE_MAX_GAP: f64 = 260.0;
/// Autopilot: jump when a hazard is this close
const AUTO_JUMP_GAP: f64 = 60.0;
/// Autopilot: duck under the highest flying lane inside this gap
const AUTO_DUCK_GAP: f64 = 150.0;
/// Autopilot: preferred firing distance to an enemy
const AUTO_ENEMY_RANGE: f64 = 220.0;
/// Autopilot: hop over enemy fire this close
const AUTO_DODGE_GAP: f64 = 90.0;

impl TickInput {
    /// Inputs a simple bot would press this tick
    pub fn autopilot(state: &GameState) -> Self {
        let mut input = TickInput::default();
        if state.player.is_dead() {
            return input;
        }
        match state.mode {
            GameMode::Run => autopilot_run(state, &mut input),
            GameMode::Battle => autopilot_battle(state, &mut input),
        }
        input
    }
}

fn autopilot_run(state: &GameState, input: &mut TickInput) {
    let player = state.player.body();
    let ducking = state.player.actor().is_ducking();
    let player_right = player.x() + player.width();

    let nearest = state
        .spawner
        .obstacles()
        .iter()
        .filter(|o| !o.is_dead() && o.body.x() + o.body.width() >= player.x())
        .map(|o| (o, o.body.x() - player_right))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((obstacle, gap)) = nearest else {
        input.stop_ducking = ducking;
        return;
    };

    let high_lane = state.bounds.ground_y - FLYING_LANES[0];
    let duck_under = obstacle.kind == ObstacleKind::Flying && obstacle.body.y() <= high_lane;

    if duck_under && gap < AUTO_DUCK_GAP {
        input.duck = !ducking;
        return;
    }
    input.stop_ducking = ducking;

    if obstacle.kind != ObstacleKind::Falling
        && state.player.can_attack()
        && (AUTO_FIRE_MIN_GAP..=AUTO_FIRE_MAX_GAP).contains(&gap)
    {
        input.attack = true;
    } else if gap < AUTO_JUMP_GAP && !state.player.actor().is_jumping() {
        input.jump = true;
    }
}

fn autopilot_battle(state: &GameState, input: &mut TickInput) {
    let player = state.player.body();
    let enemies = state.encounter.enemies();

    let incoming = enemies.iter().flat_map(|e| e.projectiles()).any(|p| {
        p.is_active() && (p.body().x() - (player.x() + player.width() / 2.0)).abs() < AUTO_DODGE_GAP
    });
    if incoming && !state.player.actor().is_jumping() {
        input.jump = true;
    }

    let target = enemies
        .iter()
        .filter(|e| !e.is_dead())
        .min_by(|a, b| {
            let da = (a.body().x() - player.x()).abs();
            let db = (b.body().x() - player.x()).abs();
            da.total_cmp(&db)
        });
    let Some(target) = target else {
        return;
    };

    let dx = target.body().x() - player.x();
    let facing = Facing::toward(dx);
    if state.player.actor().facing() != facing || dx.abs() > AUTO_ENEMY_RANGE {
        match facing {
            Facing::Right => input.move_forward = true,
            Facing::Left => input.move_back = true,
        }
    } else if state.player.can_attack() {
        input.attack = true;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                log::info!("Paused at tick {}", state.time_ticks);
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                log::info!("Resumed at tick {}", state.time_ticks);
                state.phase = GamePhase::Playing;
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let generated;
    let input = if input.autopilot {
        generated = TickInput::autopilot(state);
        &generated
    } else {
        input
    };

    state.time_ticks += 1;

    apply_input(state, input);

    if state.player.update() {
        state.events.push(GameEvent::ProjectileLaunched { by_player: true });
    }

    match state.mode {
        GameMode::Run => update_run(state),
        GameMode::Battle => update_battle(state),
    }

    check_end_conditions(state);

    state.score = state.time_ticks as f64 * SCORE_PER_TICK;
    let points = state.score_points();
    if points > state.high_score {
        state.high_score = points;
        if !state.new_high_score {
            log::info!("New high score reached at {}", points);
            state.new_high_score = true;
            state.events.push(GameEvent::NewHighScore { score: points });
        }
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    if input.stop_ducking {
        player.stop_ducking();
    }
    if input.duck {
        player.duck();
    }
    if input.jump {
        player.jump();
    }
    if input.move_forward {
        player.move_forward();
    }
    if input.move_back {
        player.move_back();
    }
    if input.attack {
        player.attack();
    }
}

fn update_run(state: &mut GameState) {
    let allow_completion = !state.player.is_dead();
    state
        .spawner
        .update(&mut state.rng, allow_completion, &mut state.events);

    resolve_player_vs_obstacles(&mut state.player, state.spawner.obstacles(), &mut state.events);
    resolve_projectiles_vs_obstacles(
        state.player.projectiles_mut(),
        state.spawner.obstacles_mut(),
        &mut state.events,
    );
    state.player.actor_mut().prune_projectiles();
}

fn update_battle(state: &mut GameState) {
    let target_x = state.player.body().x();
    state
        .encounter
        .update(target_x, &mut state.rng, &mut state.events);

    let damage = state.encounter.settings().player_fire_damage;
    resolve_projectiles_vs_enemies(
        state.player.projectiles_mut(),
        state.encounter.enemies_mut(),
        damage,
        &mut state.events,
    );
    resolve_enemy_contact(&mut state.player, state.encounter.enemies(), &mut state.events);
    resolve_enemy_projectiles(
        &mut state.player,
        state.encounter.enemies_mut(),
        &mut state.events,
    );

    state.player.actor_mut().prune_projectiles();
    for enemy in state.encounter.enemies_mut() {
        enemy.actor_mut().prune_projectiles();
    }
}

fn check_end_conditions(state: &mut GameState) {
    if state.player.actor().death_animation_complete() {
        log::info!(
            "Game over on level {} at tick {} with score {}",
            state.level,
            state.time_ticks,
            state.score_points()
        );
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        return;
    }

    let won = match state.mode {
        GameMode::Run => state.spawner.is_complete(),
        GameMode::Battle => !state.player.is_dead() && state.encounter.all_defeated(),
    };
    if won {
        log::info!("Level {} complete at tick {}", state.level, state.time_ticks);
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete);
    }
}
