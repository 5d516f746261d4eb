/// Pure game-logic functions.
///
/// Every public function takes immutable references (and, where needed, an
/// RNG handle) and returns a brand-new value.  Side effects are limited to
/// the injected RNG and `tracing` events.

use rand::Rng;
use tracing::{debug, info};

use crate::collision;
use crate::entities::{
    Bullet, Direction, Formation, GameStatus, Heading, Intent, Level, Rules, SessionState, Ship,
    ShipKind, BONUS_WIDTH, BULLET_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH,
};
use crate::formation;

// ── Layout ────────────────────────────────────────────────────────────────────

const GRID_LEFT: f32 = 50.0;
const GRID_TOP: f32 = 50.0;
const GRID_SPACING_X: f32 = 60.0;
const GRID_SPACING_Y: f32 = 50.0;
const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
const BONUS_LANE_Y: f32 = 10.0;

// ── Difficulty tables ────────────────────────────────────────────────────────

fn enemy_speed_factor(level: Level) -> f32 {
    match level {
        Level::Easy => 0.75,
        Level::Medium => 1.0,
        Level::Hard => 1.5,
    }
}

fn enemy_fire_factor(level: Level) -> f64 {
    match level {
        Level::Easy => 0.5,
        Level::Medium => 1.0,
        Level::Hard => 2.0,
    }
}

/// Scale the base rules for a difficulty level.  `Medium` is the identity.
pub fn rules_for(level: Level, base: &Rules) -> Rules {
    Rules {
        enemy_speed: base.enemy_speed * enemy_speed_factor(level),
        enemy_fire_chance: (base.enemy_fire_chance * enemy_fire_factor(level)).min(1.0),
        ..*base
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Lay out the `rows × cols` enemy grid, marching right.
pub fn spawn_formation(rules: &Rules) -> Formation {
    let enemies = (0..rules.enemy_rows)
        .flat_map(|row| {
            (0..rules.enemy_cols).map(move |col| {
                Ship::enemy(
                    GRID_LEFT + col as f32 * GRID_SPACING_X,
                    GRID_TOP + row as f32 * GRID_SPACING_Y,
                    rules.enemy_speed,
                )
            })
        })
        .collect();
    Formation {
        enemies,
        direction: Direction::Right,
    }
}

fn fresh(level: Level, rules: Rules) -> SessionState {
    SessionState {
        player: Ship::player(
            (rules.width - PLAYER_WIDTH) / 2.0,
            rules.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            rules.player_speed,
        ),
        formation: spawn_formation(&rules),
        bonus: None,
        score: 0,
        lives: rules.starting_lives,
        status: GameStatus::NotStarted,
        level,
        rules,
        steer: Direction::Idle,
        clock_ms: 0,
        frame: 0,
    }
}

/// Build the initial (not yet started) session for a level.
pub fn new_session(level: Level, base: &Rules) -> SessionState {
    fresh(level, rules_for(level, base))
}

/// `NotStarted → Running`.  Any other status is returned unchanged.
pub fn start(state: &SessionState) -> SessionState {
    if state.status != GameStatus::NotStarted {
        return state.clone();
    }
    info!(
        level = ?state.level,
        enemies = state.formation.enemies.len(),
        lives = state.lives,
        "session started"
    );
    SessionState {
        status: GameStatus::Running,
        ..state.clone()
    }
}

/// Throw the session away and start a new one with the same level and rules.
pub fn restart(state: &SessionState) -> SessionState {
    info!(previous_score = state.score, "session restarted");
    start(&fresh(state.level, state.rules))
}

// ── Bullets ──────────────────────────────────────────────────────────────────

pub fn advance_bullet(bullet: &Bullet) -> Bullet {
    let (dx, dy) = match bullet.heading {
        Heading::Up => (0.0, -bullet.speed),
        Heading::Down => (0.0, bullet.speed),
        Heading::Angle(a) => (bullet.speed * a.cos(), bullet.speed * a.sin()),
    };
    Bullet {
        x: bullet.x + dx,
        y: bullet.y + dy,
        ..bullet.clone()
    }
}

/// A bullet is gone once its top edge leaves `(0, height)`, whichever way it
/// was travelling, or once it drifts fully off either side.
pub fn is_out_of_bounds(bullet: &Bullet, rules: &Rules) -> bool {
    bullet.y <= 0.0
        || bullet.y >= rules.height
        || bullet.x + BULLET_WIDTH <= 0.0
        || bullet.x >= rules.width
}

// ── Ships ────────────────────────────────────────────────────────────────────

/// Horizontal move.  Only the player is clamped to the playfield; enemies and
/// the bonus ship go wherever their speed takes them.
pub fn move_ship(ship: &Ship, direction: Direction, playfield_width: f32) -> Ship {
    let x = ship.x + direction.sign() * ship.speed;
    let x = match ship.kind {
        // min-then-max so a playfield narrower than the ship pins x to 0
        ShipKind::Player => x.min(playfield_width - ship.width).max(0.0),
        ShipKind::Enemy | ShipKind::Bonus => x,
    };
    Ship { x, ..ship.clone() }
}

/// Advance every owned bullet and drop the ones that left the playfield.
pub fn update_ship(ship: &Ship, rules: &Rules) -> Ship {
    if ship.bullets.is_empty() {
        return ship.clone();
    }
    let bullets = ship
        .bullets
        .iter()
        .map(advance_bullet)
        .filter(|b| !is_out_of_bounds(b, rules))
        .collect();
    Ship {
        bullets,
        ..ship.clone()
    }
}

/// Fire from the top centre, unless the cooldown hasn't elapsed yet.
pub fn player_shoot(ship: &Ship, clock_ms: u64, rules: &Rules) -> Ship {
    let ready = match ship.last_shot_ms {
        None => true,
        Some(last) => clock_ms.saturating_sub(last) >= rules.shot_cooldown_ms,
    };
    if !ready {
        return ship.clone();
    }
    let mut bullets = ship.bullets.clone();
    bullets.push(Bullet::new(
        ship.x + ship.width / 2.0,
        ship.y,
        Heading::Up,
        rules.player_bullet_speed,
    ));
    Ship {
        bullets,
        last_shot_ms: Some(clock_ms),
        ..ship.clone()
    }
}

/// One independent Bernoulli trial; on success drop a bullet from the
/// bottom centre.
pub fn enemy_shoot(ship: &Ship, rules: &Rules, rng: &mut impl Rng) -> Ship {
    if !rng.gen_bool(rules.enemy_fire_chance) {
        return ship.clone();
    }
    let mut bullets = ship.bullets.clone();
    bullets.push(Bullet::new(
        ship.x + ship.width / 2.0,
        ship.y + ship.height,
        Heading::Down,
        rules.enemy_bullet_speed,
    ));
    Ship {
        bullets,
        ..ship.clone()
    }
}

/// Like `enemy_shoot`, but the bullet is aimed at `target`.
pub fn bonus_shoot(ship: &Ship, target: (f32, f32), rules: &Rules, rng: &mut impl Rng) -> Ship {
    if !rng.gen_bool(rules.bonus_fire_chance) {
        return ship.clone();
    }
    let origin_x = ship.x + ship.width / 2.0;
    let origin_y = ship.y + ship.height;
    let angle = (target.1 - origin_y).atan2(target.0 - origin_x);
    let mut bullets = ship.bullets.clone();
    bullets.push(Bullet::new(
        origin_x,
        origin_y,
        Heading::Angle(angle),
        rules.bonus_bullet_speed,
    ));
    Ship {
        bullets,
        ..ship.clone()
    }
}

// ── Bonus ship ───────────────────────────────────────────────────────────────

/// Enter just off the left or right edge.  The speed is signed: negative
/// means the ship crosses right-to-left.
pub fn spawn_bonus(rules: &Rules, rng: &mut impl Rng) -> Ship {
    if rng.gen_bool(0.5) {
        Ship::bonus(-BONUS_WIDTH, BONUS_LANE_Y, rules.bonus_speed)
    } else {
        Ship::bonus(rules.width, BONUS_LANE_Y, -rules.bonus_speed)
    }
}

fn has_crossed(bonus: &Ship, rules: &Rules) -> bool {
    if bonus.speed >= 0.0 {
        bonus.x >= rules.width
    } else {
        bonus.x + bonus.width <= 0.0
    }
}

/// Spawn, move, despawn and fire the bonus ship for one tick.
pub fn advance_bonus(
    bonus: Option<&Ship>,
    target: (f32, f32),
    rules: &Rules,
    rng: &mut impl Rng,
) -> Option<Ship> {
    let Some(bonus) = bonus else {
        if rng.gen_bool(rules.bonus_spawn_chance) {
            let ship = spawn_bonus(rules, rng);
            debug!(x = ship.x, "bonus ship spawned");
            return Some(ship);
        }
        return None;
    };

    let moved = move_ship(&update_ship(bonus, rules), Direction::Right, rules.width);
    if has_crossed(&moved, rules) {
        return None;
    }
    Some(bonus_shoot(&moved, target, rules, rng))
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Apply intents in arrival order; the last steering intent wins.
pub fn apply_intents(state: &SessionState, intents: &[Intent]) -> SessionState {
    let mut steer = state.steer;
    let mut player = state.player.clone();
    for intent in intents {
        match intent {
            Intent::MoveLeft => steer = Direction::Left,
            Intent::MoveRight => steer = Direction::Right,
            Intent::Stop => steer = Direction::Idle,
            Intent::Fire => player = player_shoot(&player, state.clock_ms, &state.rules),
        }
    }
    SessionState {
        player,
        steer,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Terminal conditions.  A loss wins over a win when both happen in the same
/// tick.
pub fn evaluate(state: &SessionState) -> GameStatus {
    if state.status != GameStatus::Running {
        return state.status;
    }
    let invaded = state
        .formation
        .enemies
        .iter()
        .any(|e| e.bounding_box().bottom() >= state.player.y);
    if state.lives == 0 || invaded {
        GameStatus::Lost
    } else if state.formation.enemies.is_empty() {
        GameStatus::Won
    } else {
        GameStatus::Running
    }
}

/// Advance the simulation by one frame of `dt_ms` milliseconds.  All
/// randomness comes through `rng` so callers control determinism.
pub fn tick(
    state: &SessionState,
    intents: &[Intent],
    dt_ms: u64,
    rng: &mut impl Rng,
) -> SessionState {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let rules = state.rules;

    // ── 1. Clock, then input ─────────────────────────────────────────────────
    let clocked = SessionState {
        clock_ms: state.clock_ms + dt_ms,
        frame: state.frame + 1,
        ..state.clone()
    };
    let steered = apply_intents(&clocked, intents);

    // ── 2. Player and its bullets ────────────────────────────────────────────
    let player = update_ship(
        &move_ship(&steered.player, steered.steer, rules.width),
        &rules,
    );

    // ── 3. Enemies: update, move, fire, then bounce ──────────────────────────
    let formation = formation::advance(&steered.formation, &rules, rng);

    // ── 4. Bonus ship ────────────────────────────────────────────────────────
    let target = player.bounding_box().center();
    let bonus = advance_bonus(steered.bonus.as_ref(), target, &rules, rng);

    // ── 5. Collisions ────────────────────────────────────────────────────────
    let resolved = collision::resolve(&SessionState {
        player,
        formation,
        bonus,
        ..steered
    });

    // ── 6. End conditions ────────────────────────────────────────────────────
    let status = evaluate(&resolved);
    match status {
        GameStatus::Won => info!(
            score = resolved.score,
            frame = resolved.frame,
            "formation cleared"
        ),
        GameStatus::Lost => info!(
            score = resolved.score,
            lives = resolved.lives,
            frame = resolved.frame,
            "player defeated"
        ),
        GameStatus::NotStarted | GameStatus::Running => {}
    }

    SessionState { status, ..resolved }
}
