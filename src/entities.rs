/// All game entity types: pure data, no game rules.
///
/// Coordinates are playfield units with a top-left origin; `y` grows
/// downward.

// ── Fixed sizes ───────────────────────────────────────────────────────────────

pub const PLAYFIELD_WIDTH: f32 = 800.0;
pub const PLAYFIELD_HEIGHT: f32 = 600.0;

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 30.0;
pub const BONUS_WIDTH: f32 = 60.0;
pub const BONUS_HEIGHT: f32 = 20.0;
pub const BULLET_WIDTH: f32 = 3.0;
pub const BULLET_HEIGHT: f32 = 15.0;

/// Points for each enemy destroyed.
pub const ENEMY_SCORE: u32 = 10;
/// Points for shooting down the bonus ship.
pub const BONUS_SCORE: u32 = 50;

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    /// `Won` and `Lost` accept no further ticks.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// Horizontal movement intent, shared by the player's steering and the
/// formation's march.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Idle,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Idle => 0.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Idle => Direction::Idle,
            Direction::Right => Direction::Left,
        }
    }
}

/// Discrete input events, drained at the start of each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Stop,
    Fire,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Heading {
    Up,
    Down,
    /// Radians, measured from the +x axis with +y pointing down.
    Angle(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub heading: Heading,
}

impl Bullet {
    /// A bullet whose top edge sits at `origin_y`, centred on `origin_x`.
    pub fn new(origin_x: f32, origin_y: f32, heading: Heading, speed: f32) -> Self {
        Self {
            x: origin_x - BULLET_WIDTH / 2.0,
            y: origin_y,
            speed,
            heading,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

// ── Ships ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipKind {
    Player,
    Enemy,
    Bonus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub kind: ShipKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Units per tick.  Signed for the bonus ship, which may cross leftward.
    pub speed: f32,
    /// Bullets this ship fired that are still in flight.
    pub bullets: Vec<Bullet>,
    /// Session clock (ms) of the last accepted shot.
    pub last_shot_ms: Option<u64>,
}

impl Ship {
    fn of_kind(kind: ShipKind, x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            speed,
            bullets: Vec::new(),
            last_shot_ms: None,
        }
    }

    pub fn player(x: f32, y: f32, speed: f32) -> Self {
        Self::of_kind(ShipKind::Player, x, y, PLAYER_WIDTH, PLAYER_HEIGHT, speed)
    }

    pub fn enemy(x: f32, y: f32, speed: f32) -> Self {
        Self::of_kind(ShipKind::Enemy, x, y, ENEMY_WIDTH, ENEMY_HEIGHT, speed)
    }

    pub fn bonus(x: f32, y: f32, speed: f32) -> Self {
        Self::of_kind(ShipKind::Bonus, x, y, BONUS_WIDTH, BONUS_HEIGHT, speed)
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// The live enemies, marching together.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub enemies: Vec<Ship>,
    /// Shared horizontal direction; never `Idle` while enemies remain.
    pub direction: Direction,
}

// ── Tunables ──────────────────────────────────────────────────────────────────

/// Every number the simulation reads. Built from `config::GameConfig` and
/// scaled per difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub width: f32,
    pub height: f32,
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub starting_lives: u32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub bonus_speed: f32,
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub bonus_bullet_speed: f32,
    /// Vertical step applied to the whole formation on each wall bounce.
    pub descent_step: f32,
    pub shot_cooldown_ms: u64,
    /// Per-tick, per-enemy probability of firing.
    pub enemy_fire_chance: f64,
    pub bonus_spawn_chance: f64,
    pub bonus_fire_chance: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            enemy_rows: 5,
            enemy_cols: 10,
            starting_lives: 3,
            player_speed: 5.0,
            enemy_speed: 1.0,
            bonus_speed: 2.0,
            player_bullet_speed: 7.0,
            enemy_bullet_speed: 4.0,
            bonus_bullet_speed: 4.0,
            descent_step: 20.0,
            shot_cooldown_ms: 250,
            enemy_fire_chance: 0.001,
            bonus_spawn_chance: 0.002,
            bonus_fire_chance: 0.01,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session.  Cloneable so pure update functions can return a new
/// copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub player: Ship,
    pub formation: Formation,
    /// The bonus ship currently crossing the top of the playfield, if any.
    pub bonus: Option<Ship>,
    pub score: u32,
    pub lives: u32,
    pub status: GameStatus,
    pub level: Level,
    pub rules: Rules,
    /// Player steering, set by intents and applied every tick.
    pub steer: Direction,
    /// Milliseconds of simulated time since the session started.
    pub clock_ms: u64,
    pub frame: u64,
}
