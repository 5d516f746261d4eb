/// Formation controller: the synchronized "marching wall".
///
/// All enemies share one horizontal direction.  After everyone has moved,
/// a single check over the whole frame decides whether the wall bounces:
/// one flip and one descent step, no matter how many enemies hit the edge.

use rand::Rng;
use tracing::trace;

use crate::compute::{enemy_shoot, move_ship, update_ship};
use crate::entities::{Formation, Rules, Ship};

/// True when the enemy's box touches or crosses either side wall.
pub fn touches_wall(enemy: &Ship, playfield_width: f32) -> bool {
    let bbox = enemy.bounding_box();
    bbox.x <= 0.0 || bbox.right() >= playfield_width
}

/// Flip the shared direction and drop every enemy by `descent` if any
/// enemy is at a wall.  Otherwise the formation is returned unchanged.
pub fn bounce(formation: &Formation, playfield_width: f32, descent: f32) -> Formation {
    let triggered = formation
        .enemies
        .iter()
        .any(|e| touches_wall(e, playfield_width));
    if !triggered {
        return formation.clone();
    }

    let direction = formation.direction.flipped();
    trace!(?direction, enemies = formation.enemies.len(), "formation bounced");
    Formation {
        enemies: formation
            .enemies
            .iter()
            .map(|e| Ship {
                y: e.y + descent,
                ..e.clone()
            })
            .collect(),
        direction,
    }
}

/// One tick for every enemy: advance its bullets, move it along the shared
/// direction, roll its fire trial.  Then bounce.
pub fn advance(formation: &Formation, rules: &Rules, rng: &mut impl Rng) -> Formation {
    let enemies = formation
        .enemies
        .iter()
        .map(|enemy| {
            let updated = update_ship(enemy, rules);
            let moved = move_ship(&updated, formation.direction, rules.width);
            enemy_shoot(&moved, rules, rng)
        })
        .collect();

    bounce(
        &Formation {
            enemies,
            direction: formation.direction,
        },
        rules.width,
        rules.descent_step,
    )
}
