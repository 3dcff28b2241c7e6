//! Collision detection and damage dispatch
//!
//! Two coordinate conventions meet here: projectiles are center-anchored,
//! bodies are corner-anchored. Projectile hits use inclusive edge tests built
//! from each convention; player vs obstacle keeps the center-distance test.
//!
//! Every function is stateless. Health changes only through `take_damage` /
//! `kill`, projectiles only through `deactivate`, obstacles only through
//! `destroy`.

use super::actor::{Combatant, DamageOutcome};
use super::enemy::{AiState, EnemyActor};
use super::entity::Entity;
use super::obstacle::Obstacle;
use super::player::PlayerActor;
use super::projectile::Projectile;
use super::state::GameEvent;

/// Projectile (center-anchored) vs body (corner-anchored), edges inclusive
pub fn projectile_hits(projectile: &Projectile, target: &Entity) -> bool {
    projectile.is_active() && projectile.body().centered_aabb().touches(&target.corner_aabb())
}

/// Player vs hazard contact
pub fn player_touches_obstacle(player: &Entity, obstacle: &Obstacle) -> bool {
    !obstacle.is_dead() && player.collides_with(&obstacle.body)
}

/// Touching any live hazard kills the player outright.
/// Returns true if the player died this call.
pub fn resolve_player_vs_obstacles(
    player: &mut PlayerActor,
    obstacles: &[Obstacle],
    events: &mut Vec<GameEvent>,
) -> bool {
    if player.is_dead() {
        return false;
    }
    let Some(obstacle) = obstacles
        .iter()
        .find(|o| player_touches_obstacle(player.body(), o))
    else {
        return false;
    };
    log::info!("Player hit {} hazard #{}", obstacle.kind.as_str(), obstacle.id);
    player.kill();
    events.push(GameEvent::PlayerKilled);
    true
}

/// Player projectiles destroy hazards. Returns the number destroyed.
pub fn resolve_projectiles_vs_obstacles(
    projectiles: &mut [Projectile],
    obstacles: &mut [Obstacle],
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut destroyed = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.is_dead()) {
        let Some(projectile) = projectiles
            .iter_mut()
            .find(|p| projectile_hits(p, &obstacle.body))
        else {
            continue;
        };
        projectile.deactivate();
        obstacle.destroy();
        destroyed += 1;
        log::debug!("Destroyed {} hazard #{}", obstacle.kind.as_str(), obstacle.id);
        events.push(GameEvent::ObstacleDestroyed { kind: obstacle.kind });
    }
    destroyed
}

/// Player projectiles damage live enemies
pub fn resolve_projectiles_vs_enemies(
    projectiles: &mut [Projectile],
    enemies: &mut [EnemyActor],
    damage: u32,
    events: &mut Vec<GameEvent>,
) {
    for enemy in enemies.iter_mut() {
        for projectile in projectiles.iter_mut() {
            if enemy.is_dead() {
                break;
            }
            if !projectile_hits(projectile, enemy.body()) {
                continue;
            }
            projectile.deactivate();
            let outcome = enemy.take_damage(damage);
            if outcome != DamageOutcome::Ignored {
                log::debug!(
                    "Enemy #{} hit, health {}/{}",
                    enemy.id,
                    enemy.actor().health(),
                    enemy.actor().max_health()
                );
                events.push(GameEvent::EnemyHit {
                    id: enemy.id,
                    killed: outcome == DamageOutcome::Killed,
                });
            }
        }
    }
}

/// Attacking enemies with fire in flight hurt the player on body overlap
pub fn resolve_enemy_contact(
    player: &mut PlayerActor,
    enemies: &[EnemyActor],
    events: &mut Vec<GameEvent>,
) {
    for enemy in enemies {
        if enemy.is_dead() || enemy.ai_state() != AiState::Attack {
            continue;
        }
        if !player.body().corner_aabb().overlaps(&enemy.body().corner_aabb()) {
            continue;
        }
        if !enemy.projectiles().iter().any(Projectile::is_active) {
            continue;
        }
        damage_player(player, enemy.damage(), events);
    }
}

/// Enemy projectiles hurt the player and are consumed on hit
pub fn resolve_enemy_projectiles(
    player: &mut PlayerActor,
    enemies: &mut [EnemyActor],
    events: &mut Vec<GameEvent>,
) {
    for enemy in enemies.iter_mut() {
        let damage = enemy.fire_damage();
        for projectile in enemy.projectiles_mut() {
            if player.is_dead() {
                return;
            }
            if projectile_hits(projectile, player.body()) {
                projectile.deactivate();
                damage_player(player, damage, events);
            }
        }
    }
}

fn damage_player(player: &mut PlayerActor, amount: u32, events: &mut Vec<GameEvent>) {
    match player.take_damage(amount) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hurt => {
            log::debug!("Player hit, health {}", player.actor().health());
            events.push(GameEvent::PlayerHit { damage: amount });
        }
        DamageOutcome::Killed => {
            log::info!("Player killed");
            events.push(GameEvent::PlayerHit { damage: amount });
            events.push(GameEvent::PlayerKilled);
        }
    }
}
