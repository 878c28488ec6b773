//! Hit resolution: turns projectile hits into damage and status effects.
//!
//! Crits are rolled on the session RNG. Armor reduces every instance of
//! direct damage. Splash and chain spread the same damage to enemies near
//! the primary target; neither changes how many shots a tower fires.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use penguard_core::constants::CRIT_MULTIPLIER;
use penguard_core::types::{EnemyId, WorldPos};

use crate::components::Payload;
use crate::scene::SceneSink;
use crate::systems::enemies::{EnemySystem, RemovedEnemy};
use crate::systems::projectiles::Hit;

/// Apply a batch of hits in order. Returns every enemy killed.
pub fn resolve_hits(
    world: &mut World,
    scene: &mut dyn SceneSink,
    enemies: &mut EnemySystem,
    rng: &mut ChaCha8Rng,
    hits: &[Hit],
) -> Vec<RemovedEnemy> {
    let mut kills = Vec::new();

    for hit in hits {
        // An earlier hit this tick may already have killed the target.
        let Some(origin) = enemies.position(world, hit.target_id) else {
            continue;
        };

        let payload = hit.payload;
        let mut damage = payload.damage;
        if let Some(chance) = payload.crit_chance {
            if rng.gen::<f32>() < chance {
                damage *= CRIT_MULTIPLIER;
            }
        }

        let mut targets = vec![hit.target_id];
        for id in secondary_targets(&enemies.positions(world), hit.target_id, origin, &payload) {
            if !targets.contains(&id) {
                targets.push(id);
            }
        }

        for id in targets {
            kills.extend(strike(world, scene, enemies, id, damage, &payload));
        }
    }

    kills
}

/// Damage one enemy and apply lingering effects if it survives.
fn strike(
    world: &mut World,
    scene: &mut dyn SceneSink,
    enemies: &mut EnemySystem,
    id: EnemyId,
    damage: f32,
    payload: &Payload,
) -> Option<RemovedEnemy> {
    let armor = enemies
        .enemy(world, id)
        .map(|e| e.kind.armor.unwrap_or(0.0))?;
    let killed = enemies.damage(world, scene, id, damage * (1.0 - armor));
    if killed.is_some() {
        return killed;
    }
    if let Some(duration) = payload.slow {
        enemies.apply_slow(world, id, duration);
    }
    if let Some((dps, duration)) = payload.burn {
        if dps > 0.0 && duration > 0.0 {
            enemies.apply_burn(world, id, dps, duration);
        }
    }
    None
}

/// Enemies other than the primary target caught by splash or chain.
///
/// Chain hops to the nearest enemies first; ties go to the earlier spawn.
pub fn secondary_targets(
    live: &[(EnemyId, WorldPos)],
    primary: EnemyId,
    origin: WorldPos,
    payload: &Payload,
) -> Vec<EnemyId> {
    let mut nearby: Vec<(f32, EnemyId)> = live
        .iter()
        .filter(|(id, _)| *id != primary)
        .map(|&(id, pos)| (origin.distance(pos), id))
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut out = Vec::new();
    if let Some(radius) = payload.splash {
        out.extend(nearby.iter().filter(|(d, _)| *d <= radius).map(|(_, id)| *id));
    }
    if let Some((count, range)) = payload.chain {
        let extra = count.saturating_sub(1) as usize;
        for &(_, id) in nearby.iter().filter(|(d, _)| *d <= range).take(extra) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}
