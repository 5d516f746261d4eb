/// Draw-call layer between the game state and whatever renders it.
///
/// `draw` clears the frame and emits one primitive per visible entity in
/// playfield coordinates.  It knows nothing about terminals.

use crate::entities::{Bullet, Heading, Rect, SessionState, Ship};

/// What an entity should look like; the surface picks the actual colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    Background,
    Player,
    Enemy,
    Bonus,
    PlayerShot,
    EnemyShot,
}

pub trait Surface {
    fn clear(&mut self, paint: Paint);
    fn fill_rect(&mut self, rect: Rect, paint: Paint);
    /// Closed polygon; the last point connects back to the first.
    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint);
}

/// Nose-up triangle filling the player's box.
pub fn player_outline(ship: &Ship) -> [(f32, f32); 3] {
    let b = ship.bounding_box();
    [
        (b.x + b.width / 2.0, b.y),
        (b.right(), b.bottom()),
        (b.x, b.bottom()),
    ]
}

/// Flattened hexagon filling the bonus ship's box.
pub fn bonus_outline(ship: &Ship) -> [(f32, f32); 6] {
    let b = ship.bounding_box();
    let inset = b.width / 4.0;
    let mid = b.y + b.height / 2.0;
    [
        (b.x + inset, b.y),
        (b.right() - inset, b.y),
        (b.right(), mid),
        (b.right() - inset, b.bottom()),
        (b.x + inset, b.bottom()),
        (b.x, mid),
    ]
}

fn shot_paint(bullet: &Bullet) -> Paint {
    match bullet.heading {
        Heading::Up => Paint::PlayerShot,
        Heading::Down | Heading::Angle(_) => Paint::EnemyShot,
    }
}

fn draw_bullets<S: Surface>(surface: &mut S, ship: &Ship) {
    for bullet in &ship.bullets {
        surface.fill_rect(bullet.bounding_box(), shot_paint(bullet));
    }
}

/// Render one complete frame onto `surface`.
pub fn draw<S: Surface>(surface: &mut S, state: &SessionState) {
    surface.clear(Paint::Background);

    for enemy in &state.formation.enemies {
        surface.fill_rect(enemy.bounding_box(), Paint::Enemy);
        draw_bullets(surface, enemy);
    }
    if let Some(bonus) = &state.bonus {
        surface.fill_polygon(&bonus_outline(bonus), Paint::Bonus);
        draw_bullets(surface, bonus);
    }

    surface.fill_polygon(&player_outline(&state.player), Paint::Player);
    draw_bullets(surface, &state.player);
}

/// Up to this many lives are drawn as individual hearts.
pub const MAX_HEART_GLYPHS: u32 = 5;

/// HUD text for the lives counter: one heart per life, or a count once the
/// hearts would crowd the row.
pub fn lives_label(lives: u32) -> String {
    if lives <= MAX_HEART_GLYPHS {
        format!("Lives:{}", "♥".repeat(lives as usize))
    } else {
        format!("Lives:♥x{lives}")
    }
}
