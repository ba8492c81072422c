//! Replay a synthetic exam session and print the alert records

use chrono::{DateTime, Duration, TimeZone, Utc};
use synheart_proctor::landmarks::{
    LEFT_EYE_LOWER, LEFT_EYE_OUTER, LEFT_EYE_UPPER, NOSE_TIP, RIGHT_EYE_LOWER, RIGHT_EYE_OUTER,
    RIGHT_EYE_UPPER,
};
use synheart_proctor::{
    replay_to_alerts, FaceBatch, FrameEvent, LandmarkSet, MonitorConfig, Point2, VisibilityState,
};

/// A face turned by `angle` degrees with the given outer-eye span
fn face(angle: f64, eye_distance: f64) -> LandmarkSet {
    let (cx, cy) = (320.0, 240.0);
    let mut mesh = vec![Point2::new(0.0, 0.0); 468];
    mesh[LEFT_EYE_OUTER] = Point2::new(cx - eye_distance / 2.0, cy);
    mesh[RIGHT_EYE_OUTER] = Point2::new(cx + eye_distance / 2.0, cy);
    let theta = angle.to_radians();
    mesh[NOSE_TIP] = Point2::new(cx - 40.0 * theta.sin(), cy + 40.0 * theta.cos());
    mesh[LEFT_EYE_UPPER] = Point2::new(cx - 40.0, cy - 5.0);
    mesh[LEFT_EYE_LOWER] = Point2::new(cx - 40.0, cy + 5.0);
    mesh[RIGHT_EYE_UPPER] = Point2::new(cx + 40.0, cy - 5.0);
    mesh[RIGHT_EYE_LOWER] = Point2::new(cx + 40.0, cy + 5.0);
    LandmarkSet::new(mesh)
}

fn at(start: DateTime<Utc>, ms: i64) -> DateTime<Utc> {
    start + Duration::milliseconds(ms)
}

fn main() {
    let Some(start) = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).single() else {
        eprintln!("Error: invalid session start");
        return;
    };

    let mut events = vec![FrameEvent::model_ready(start)];
    // Attentive for 3s, then looking away for 4s
    for i in 0..8 {
        let angle = if i < 3 { 2.0 } else { 45.0 };
        events.push(FrameEvent::faces(
            at(start, 500 + i * 1000),
            FaceBatch::new(vec![face(angle, 150.0)]),
        ));
    }
    events.push(FrameEvent::visibility(at(start, 9_200), VisibilityState::Hidden));
    events.push(FrameEvent::visibility(at(start, 10_000), VisibilityState::Visible));
    events.push(FrameEvent::visibility(at(start, 11_000), VisibilityState::Hidden));

    let ndjson = events
        .iter()
        .filter_map(|e| serde_json::to_string(e).ok())
        .collect::<Vec<_>>()
        .join("\n");

    match replay_to_alerts(&ndjson, &MonitorConfig::default()) {
        Ok(records) => {
            for record in records {
                match serde_json::to_string(&record) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("Error: {e:?}"),
                }
            }
        }
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
