use invaders::compute::{new_session, start};
use invaders::entities::*;
use invaders::scene::*;

#[derive(Debug, PartialEq)]
enum Call {
    Clear(Paint),
    Rect(Rect, Paint),
    Polygon(Vec<(f32, f32)>, Paint),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Surface for Recorder {
    fn clear(&mut self, paint: Paint) {
        self.calls.push(Call::Clear(paint));
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        self.calls.push(Call::Rect(rect, paint));
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint) {
        self.calls.push(Call::Polygon(points.to_vec(), paint));
    }
}

impl Recorder {
    fn rects(&self, paint: Paint) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Rect(_, p) if *p == paint))
            .count()
    }

    fn polygons(&self, paint: Paint) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Polygon(_, p) if *p == paint))
            .count()
    }
}

fn make_state() -> SessionState {
    start(&new_session(Level::Medium, &Rules::default()))
}

#[test]
fn frame_starts_with_a_clear() {
    let mut rec = Recorder::default();
    draw(&mut rec, &make_state());
    assert_eq!(rec.calls.first(), Some(&Call::Clear(Paint::Background)));
    assert_eq!(
        rec.calls.iter().filter(|c| matches!(c, Call::Clear(_))).count(),
        1
    );
}

#[test]
fn one_primitive_per_entity() {
    let mut s = make_state();
    s.player.bullets.push(Bullet::new(400.0, 300.0, Heading::Up, 7.0));
    s.formation.enemies[0]
        .bullets
        .push(Bullet::new(70.0, 80.0, Heading::Down, 4.0));

    let mut rec = Recorder::default();
    draw(&mut rec, &s);
    assert_eq!(rec.rects(Paint::Enemy), 50);
    assert_eq!(rec.polygons(Paint::Player), 1);
    assert_eq!(rec.polygons(Paint::Bonus), 0);
    assert_eq!(rec.rects(Paint::PlayerShot), 1);
    assert_eq!(rec.rects(Paint::EnemyShot), 1);
}

#[test]
fn bonus_ship_and_its_shots_are_drawn() {
    let mut s = make_state();
    let mut bonus = Ship::bonus(100.0, 10.0, 2.0);
    bonus
        .bullets
        .push(Bullet::new(130.0, 30.0, Heading::Angle(1.2), 4.0));
    s.bonus = Some(bonus);

    let mut rec = Recorder::default();
    draw(&mut rec, &s);
    assert_eq!(rec.polygons(Paint::Bonus), 1);
    assert_eq!(rec.rects(Paint::EnemyShot), 1);
}

#[test]
fn player_triangle_points_up_from_its_box() {
    let ship = Ship::player(375.0, 550.0, 5.0);
    assert_eq!(
        player_outline(&ship),
        [(400.0, 550.0), (425.0, 580.0), (375.0, 580.0)]
    );
}

#[test]
fn bonus_outline_stays_inside_its_box() {
    let ship = Ship::bonus(100.0, 10.0, 2.0);
    let bbox = ship.bounding_box();
    for (x, y) in bonus_outline(&ship) {
        assert!(x >= bbox.x && x <= bbox.right());
        assert!(y >= bbox.y && y <= bbox.bottom());
    }
}

#[test]
fn lives_label_draws_one_heart_per_life() {
    assert_eq!(lives_label(0), "Lives:");
    assert_eq!(lives_label(3), "Lives:♥♥♥");
    assert_eq!(lives_label(MAX_HEART_GLYPHS), "Lives:♥♥♥♥♥");
}

#[test]
fn lives_label_switches_to_a_count_when_crowded() {
    assert_eq!(lives_label(6), "Lives:♥x6");
    assert_eq!(lives_label(u32::MAX), "Lives:♥x4294967295");
}
