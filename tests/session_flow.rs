//! End-to-end checks of a session playing the built-in levels

use std::sync::mpsc;

use breakout_sim::Settings;
use breakout_sim::consts::{MOVEMENT_EPSILON, PADDLE_MAX_RIGHT_HEADING, PADDLE_MIN_LEFT_HEADING};
use breakout_sim::levels::{BuiltinLevels, LevelLoader};
use breakout_sim::observer::ChannelPresenter;
use breakout_sim::platform::SharedPaddle;
use breakout_sim::runner::Runner;
use breakout_sim::sim::{CollisionKind, GameEvent, Session, SessionPhase};

const DT: f32 = 1.0 / 40.0;

fn new_session(settings: &Settings, paddle: &SharedPaddle) -> Session {
    Session::new(settings, Box::new(BuiltinLevels), &paddle.snapshot()).unwrap()
}

#[test]
fn test_autopilot_invariants_over_many_ticks() {
    let settings = Settings::default();
    let paddle = SharedPaddle::new(
        settings.play_area(),
        settings.paddle_size(),
        settings.paddle_margin,
    );
    let mut session = new_session(&settings, &paddle);
    let initial_bricks = BuiltinLevels.load(1).unwrap().active_count();

    let mut destroyed = 0usize;
    let mut level = session.level();

    for tick in 0..20_000u32 {
        if matches!(
            session.phase(),
            SessionPhase::NotStarted | SessionPhase::LevelComplete
        ) {
            session.start();
        }
        if session.phase() == SessionPhase::Finished {
            break;
        }

        let before = session.ball().pos;
        let active_before = session.field().active_count();
        let report = session.tick(DT, &paddle.snapshot());

        let heading = session.ball().heading();
        assert!((0.0..360.0).contains(&heading));

        match report.collision {
            Some(CollisionKind::Paddle) => {
                assert!(
                    heading <= PADDLE_MAX_RIGHT_HEADING || heading >= PADDLE_MIN_LEFT_HEADING,
                    "tick {tick}: paddle bounce left at {heading}"
                );
            }
            Some(CollisionKind::BottomWall) => {}
            // A new level puts the ball back on the paddle
            _ if report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelStarted { .. })) => {}
            _ => {
                let moved = (session.ball().pos - before).length();
                assert!(moved <= settings.ball_speed * DT + MOVEMENT_EPSILON);
            }
        }

        let hits = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert!(hits <= 1, "more than one brick per tick");
        if level == 1 {
            destroyed += hits;
        }
        if session.level() == level {
            assert_eq!(session.field().active_count() + hits, active_before);
        } else {
            level = session.level();
        }

        // Track the ball with a wobble so bounces get steered
        let half = settings.paddle_width / 2.0;
        let wobble = (tick as f32 * 0.05).sin() * half * 0.6;
        paddle.set_paddle_x(session.ball().center().x - half + wobble);
    }

    assert!(destroyed <= initial_bricks);
    assert!(session.stats().bricks_destroyed > 0);
}

#[test]
fn test_runner_round_trip_with_shared_paddle() {
    let settings = Settings {
        tick_rate: 500,
        fixed_frame_time: Some(DT),
        ..Default::default()
    };
    let paddle = SharedPaddle::new(
        settings.play_area(),
        settings.paddle_size(),
        settings.paddle_margin,
    );
    let session = new_session(&settings, &paddle);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::spawn(
        session,
        paddle.clone(),
        &settings,
        Box::new(ChannelPresenter::new(tx)),
        None,
    )
    .unwrap();

    // Before start the ball rides along with the paddle
    paddle.set_paddle_x(10.0);
    let snapshot = rx.iter().find(|s| s.paddle.pos.x == 10.0).unwrap();
    assert_eq!(snapshot.phase, SessionPhase::NotStarted);
    assert!((snapshot.ball.center().x - 60.0).abs() < 1e-3);
    assert_eq!(
        snapshot.bricks.len(),
        BuiltinLevels.load(1).unwrap().active_count()
    );

    runner.start();
    let running = rx
        .iter()
        .find(|s| s.phase == SessionPhase::Running)
        .unwrap();
    assert_eq!(running.level, 1);

    let session = runner.stop().unwrap();
    assert!(session.stats().ticks >= 1);
}
