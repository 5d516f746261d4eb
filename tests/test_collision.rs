use invaders::collision::*;
use invaders::compute::{new_session, start};
use invaders::entities::*;

fn make_state() -> SessionState {
    let mut s = start(&new_session(Level::Medium, &Rules::default()));
    s.formation.enemies.clear();
    s
}

fn up(x: f32, y: f32) -> Bullet {
    Bullet {
        x,
        y,
        speed: 7.0,
        heading: Heading::Up,
    }
}

fn down(x: f32, y: f32) -> Bullet {
    Bullet {
        x,
        y,
        speed: 4.0,
        heading: Heading::Down,
    }
}

// ── overlaps ──────────────────────────────────────────────────────────────────

#[test]
fn bullet_inside_enemy_box_overlaps() {
    let bullet = Rect::new(10.0, 10.0, 3.0, 15.0);
    let enemy = Rect::new(9.0, 5.0, 40.0, 30.0);
    assert!(overlaps(&bullet, &enemy));
    assert!(overlaps(&enemy, &bullet));
}

#[test]
fn bullet_beside_enemy_box_does_not_overlap() {
    let bullet = Rect::new(60.0, 10.0, 3.0, 15.0);
    let enemy = Rect::new(9.0, 5.0, 40.0, 30.0);
    assert!(!overlaps(&bullet, &enemy));
}

#[test]
fn shared_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
    assert!(overlaps(&a, &Rect::new(9.9, 9.9, 10.0, 10.0)));
}

// ── first_hits ────────────────────────────────────────────────────────────────

#[test]
fn overlapping_targets_resolve_to_first_in_order() {
    let targets = [
        Rect::new(0.0, 0.0, 40.0, 30.0),
        Rect::new(20.0, 0.0, 40.0, 30.0),
    ];
    let strikes = first_hits(&[up(25.0, 5.0)], &targets);
    assert_eq!(strikes, vec![Strike { bullet: 0, target: 0 }]);
}

#[test]
fn a_target_is_claimed_by_one_bullet_per_tick() {
    let targets = [Rect::new(0.0, 0.0, 40.0, 30.0)];
    let strikes = first_hits(&[up(5.0, 5.0), up(10.0, 5.0)], &targets);
    assert_eq!(strikes, vec![Strike { bullet: 0, target: 0 }]);
}

#[test]
fn second_bullet_falls_through_to_next_target() {
    let targets = [
        Rect::new(0.0, 0.0, 40.0, 30.0),
        Rect::new(20.0, 0.0, 40.0, 30.0),
    ];
    let strikes = first_hits(&[up(25.0, 5.0), up(26.0, 5.0)], &targets);
    assert_eq!(
        strikes,
        vec![
            Strike { bullet: 0, target: 0 },
            Strike { bullet: 1, target: 1 },
        ]
    );
}

// ── resolve ───────────────────────────────────────────────────────────────────

#[test]
fn player_bullet_kills_enemy_and_scores() {
    let mut s = make_state();
    s.formation.enemies = vec![Ship::enemy(50.0, 50.0, 1.0), Ship::enemy(200.0, 50.0, 1.0)];
    s.player.bullets = vec![up(70.0, 65.0), up(500.0, 300.0)];

    let s2 = resolve(&s);
    assert_eq!(s2.formation.enemies.len(), 1);
    assert_eq!(s2.formation.enemies[0].x, 200.0);
    assert_eq!(s2.player.bullets, vec![up(500.0, 300.0)]);
    assert_eq!(s2.score, 10);
    assert_eq!(s2.lives, 3);
}

#[test]
fn adjacent_kills_are_not_skipped() {
    let mut s = make_state();
    s.formation.enemies = vec![
        Ship::enemy(0.0, 50.0, 1.0),
        Ship::enemy(50.0, 50.0, 1.0),
        Ship::enemy(100.0, 50.0, 1.0),
    ];
    s.player.bullets = vec![up(10.0, 60.0), up(60.0, 60.0), up(110.0, 60.0)];

    let s2 = resolve(&s);
    assert!(s2.formation.enemies.is_empty());
    assert!(s2.player.bullets.is_empty());
    assert_eq!(s2.score, 30);
}

#[test]
fn bonus_ship_is_worth_fifty() {
    let mut s = make_state();
    s.formation.enemies = vec![Ship::enemy(500.0, 200.0, 1.0)];
    s.bonus = Some(Ship::bonus(100.0, 10.0, 2.0));
    s.player.bullets = vec![up(120.0, 15.0)];

    let s2 = resolve(&s);
    assert!(s2.bonus.is_none());
    assert_eq!(s2.score, BONUS_SCORE);
    assert_eq!(s2.formation.enemies.len(), 1);
}

#[test]
fn enemy_bullet_costs_a_life() {
    let mut s = make_state(); // player box 375..425 × 550..580
    let mut shooter = Ship::enemy(50.0, 50.0, 1.0);
    shooter.bullets = vec![down(390.0, 545.0), down(100.0, 300.0)];
    s.formation.enemies = vec![shooter];

    let s2 = resolve(&s);
    assert_eq!(s2.lives, 2);
    assert_eq!(s2.formation.enemies[0].bullets, vec![down(100.0, 300.0)]);
}

#[test]
fn every_hit_in_a_tick_counts() {
    let mut s = make_state();
    let mut a = Ship::enemy(50.0, 50.0, 1.0);
    a.bullets = vec![down(390.0, 545.0)];
    let mut b = Ship::enemy(150.0, 50.0, 1.0);
    b.bullets = vec![down(410.0, 560.0)];
    s.formation.enemies = vec![a, b];

    assert_eq!(resolve(&s).lives, 1);
}

#[test]
fn lives_saturate_at_zero() {
    let mut s = make_state();
    s.lives = 1;
    let mut shooter = Ship::enemy(50.0, 50.0, 1.0);
    shooter.bullets = vec![down(390.0, 545.0), down(400.0, 560.0)];
    s.formation.enemies = vec![shooter];

    assert_eq!(resolve(&s).lives, 0);
}

#[test]
fn bonus_bullets_hit_the_player_too() {
    let mut s = make_state();
    s.formation.enemies = vec![Ship::enemy(50.0, 50.0, 1.0)];
    let mut bonus = Ship::bonus(300.0, 10.0, 2.0);
    bonus.bullets = vec![Bullet {
        x: 400.0,
        y: 560.0,
        speed: 4.0,
        heading: Heading::Angle(1.0),
    }];
    s.bonus = Some(bonus);

    let s2 = resolve(&s);
    assert_eq!(s2.lives, 2);
    assert!(s2.bonus.expect("bonus survives").bullets.is_empty());
}

#[test]
fn no_contact_leaves_state_untouched() {
    let mut s = make_state();
    s.formation.enemies = vec![Ship::enemy(50.0, 50.0, 1.0)];
    s.player.bullets = vec![up(600.0, 300.0)];
    assert_eq!(resolve(&s), s);
}
