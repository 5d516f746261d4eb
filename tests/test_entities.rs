use invaders::entities::*;

#[test]
fn direction_sign_and_flip() {
    assert_eq!(Direction::Left.sign(), -1.0);
    assert_eq!(Direction::Idle.sign(), 0.0);
    assert_eq!(Direction::Right.sign(), 1.0);
    assert_eq!(Direction::Left.flipped(), Direction::Right);
    assert_eq!(Direction::Right.flipped(), Direction::Left);
    assert_eq!(Direction::Idle.flipped(), Direction::Idle);
}

#[test]
fn only_won_and_lost_are_terminal() {
    assert!(!GameStatus::NotStarted.is_terminal());
    assert!(!GameStatus::Running.is_terminal());
    assert!(GameStatus::Won.is_terminal());
    assert!(GameStatus::Lost.is_terminal());
}

#[test]
fn rect_edges_and_centre() {
    let r = Rect::new(10.0, 20.0, 40.0, 30.0);
    assert_eq!(r.right(), 50.0);
    assert_eq!(r.bottom(), 50.0);
    assert_eq!(r.center(), (30.0, 35.0));
}

#[test]
fn bullet_is_centred_on_origin() {
    let b = Bullet::new(100.0, 200.0, Heading::Down, 4.0);
    let bbox = b.bounding_box();
    assert_eq!(bbox, Rect::new(98.5, 200.0, BULLET_WIDTH, BULLET_HEIGHT));
    assert_eq!(bbox.center().0, 100.0);
}

#[test]
fn ship_variants_have_fixed_sizes() {
    let p = Ship::player(0.0, 0.0, 5.0);
    let e = Ship::enemy(0.0, 0.0, 1.0);
    let b = Ship::bonus(0.0, 0.0, 2.0);
    assert_eq!((p.kind, p.width, p.height), (ShipKind::Player, PLAYER_WIDTH, PLAYER_HEIGHT));
    assert_eq!((e.kind, e.width, e.height), (ShipKind::Enemy, ENEMY_WIDTH, ENEMY_HEIGHT));
    assert_eq!((b.kind, b.width, b.height), (ShipKind::Bonus, BONUS_WIDTH, BONUS_HEIGHT));
    assert!(p.bullets.is_empty());
    assert_eq!(p.last_shot_ms, None);
}

#[test]
fn default_rules_match_the_classic_game() {
    let r = Rules::default();
    assert_eq!((r.width, r.height), (800.0, 600.0));
    assert_eq!(r.descent_step, 20.0);
    assert_eq!(r.shot_cooldown_ms, 250);
    assert_eq!(r.enemy_fire_chance, 0.001);
    assert_eq!(r.starting_lives, 3);
    assert_eq!(ENEMY_SCORE, 10);
}

#[test]
fn session_clone_is_independent() {
    let original = invaders::compute::new_session(Level::Easy, &Rules::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.formation.enemies.clear();

    assert_eq!(original.player.x, 375.0);
    assert_eq!(original.score, 0);
    assert_eq!(original.formation.enemies.len(), 50);
}
