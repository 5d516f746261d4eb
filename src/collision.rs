/// Collision detector: AABB overlap, scan-and-mark, then compact.
///
/// Nothing is removed while scanning.  Each pass records what was hit, and a
/// separate compacting pass rebuilds the collections afterwards, so removals
/// can never cause the scan to skip an element.

use tracing::debug;

use crate::entities::{Bullet, Formation, Rect, SessionState, Ship, BONUS_SCORE, ENEMY_SCORE};

/// Strict overlap: rectangles that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// A bullet (by index) that struck a target (by index).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub bullet: usize,
    pub target: usize,
}

/// First match in iteration order: each bullet takes the first target it
/// overlaps that no earlier bullet has already claimed this tick.
pub fn first_hits(bullets: &[Bullet], targets: &[Rect]) -> Vec<Strike> {
    let mut claimed = vec![false; targets.len()];
    let mut strikes = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let bbox = bullet.bounding_box();
        let hit = targets
            .iter()
            .enumerate()
            .find(|(ti, target)| !claimed[*ti] && overlaps(&bbox, target));
        if let Some((ti, _)) = hit {
            claimed[ti] = true;
            strikes.push(Strike {
                bullet: bi,
                target: ti,
            });
        }
    }

    strikes
}

/// Keep only the items whose mark is unset.
fn compact<T>(items: &[T], marked: &[bool]) -> Vec<T>
where
    T: Clone,
{
    items
        .iter()
        .zip(marked)
        .filter_map(|(item, &m)| (!m).then(|| item.clone()))
        .collect()
}

fn strip_bullets(ship: &Ship, marked: &[bool]) -> Ship {
    Ship {
        bullets: compact(&ship.bullets, marked),
        ..ship.clone()
    }
}

/// Run every collision pass for one tick.
///
/// * player bullets ↔ enemies, then the bonus ship: remove both, score up.
/// * enemy and bonus bullets ↔ player: remove the bullet, one life down.
pub fn resolve(state: &SessionState) -> SessionState {
    // ── 1. Player fire ───────────────────────────────────────────────────────
    let enemies = &state.formation.enemies;
    let mut targets: Vec<Rect> = enemies.iter().map(Ship::bounding_box).collect();
    if let Some(bonus) = &state.bonus {
        targets.push(bonus.bounding_box());
    }

    let strikes = first_hits(&state.player.bullets, &targets);
    let mut spent = vec![false; state.player.bullets.len()];
    let mut killed = vec![false; enemies.len()];
    let mut bonus_down = false;
    for strike in &strikes {
        spent[strike.bullet] = true;
        if strike.target < enemies.len() {
            killed[strike.target] = true;
        } else {
            bonus_down = true;
        }
    }

    let kills = killed.iter().filter(|&&k| k).count() as u32;
    let mut score = state.score + kills * ENEMY_SCORE;
    if kills > 0 {
        debug!(kills, score, "enemies destroyed");
    }
    if bonus_down {
        score += BONUS_SCORE;
        debug!(score, "bonus ship destroyed");
    }

    // ── 2. Incoming fire ─────────────────────────────────────────────────────
    let player_box = state.player.bounding_box();
    let mut hits: u32 = 0;
    let mut strip = |ship: &Ship| {
        let marked: Vec<bool> = ship
            .bullets
            .iter()
            .map(|b| overlaps(&b.bounding_box(), &player_box))
            .collect();
        hits += marked.iter().filter(|&&m| m).count() as u32;
        strip_bullets(ship, &marked)
    };

    let survivors: Vec<Ship> = compact(enemies, &killed).iter().map(&mut strip).collect();
    let bonus = if bonus_down {
        None
    } else {
        state.bonus.as_ref().map(&mut strip)
    };

    let lives = state.lives.saturating_sub(hits);
    if hits > 0 {
        debug!(hits, lives, "player hit");
    }

    // ── 3. Compact ───────────────────────────────────────────────────────────
    SessionState {
        player: strip_bullets(&state.player, &spent),
        formation: Formation {
            enemies: survivors,
            direction: state.formation.direction,
        },
        bonus,
        score,
        lives,
        ..state.clone()
    }
}
