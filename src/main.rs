// What you SEE:
// • Live (mirrored) camera is always the base image, with your hand's skeleton on top.
// • Index finger up, middle down: you draw in red with the smoothed fingertip.
// • Only the thumb up: the thumb tip erases.
// • Wave your hand side to side: the whole drawing clears.
// • Up/Down (or =/-) change the brush size. Q or ESC quits.

mod camera;
mod canvas;
mod config;
mod draw;
mod error;
mod gesture;
mod hand;
mod history;
mod landmarker;
mod session;
mod types;
mod vision;

use camera::CameraCapture;
use clap::Parser;
use config::Args;
use draw::{draw_circle, draw_hand, draw_slider, draw_text_5x7, BrushSlider, Drawer};
use error::Error;
use landmarker::{LandmarkSource, SubprocessLandmarker};
use log::{error, info};
use session::Session;
use std::time::{Duration, Instant};
use types::FrameBuffer;
use vision::{blend_weighted, Clahe};

const WHITE: u32 = 0x00_FF_FF_FF;
const GREEN: u32 = 0x00_00_FF_00;
const GREY: u32 = 0x00_C8_C8_C8;
const BONE: u32 = 0x00_E0_E0_E0;
const JOINT: u32 = 0x00_FF_40_40;
/// Share of the camera image in the output; the canvas gets the rest.
const FRAME_WEIGHT: f32 = 0.7;

fn main() {
    let args = Args::parse();

    // --verbose enables debug-level output; RUST_LOG still wins.
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    args.validate()?;

    /* --- Camera + landmark helper + window setup ---
       Visual: window opens with live camera feed. */
    let mut cam = CameraCapture::new(args.camera, args.width, args.height, args.fps, !args.no_mirror)?;
    let (w, h) = cam.resolution();
    let mut landmarker = SubprocessLandmarker::spawn(&args.python, &args.landmarker, args.confidence())?;
    let mut drawer = Drawer::new("Finger Paint", w as usize, h as usize)?;

    /* --- Per-session state ---
       Visual: the canvas starts empty; everything you draw stays until you wave. */
    let clahe = (!args.no_enhance).then(Clahe::default);
    let mut brush = BrushSlider::new(args.brush);
    let mut session = Session::new();

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut segments_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.exit_pressed() {
        /* 1) Grab a fresh live frame. A camera failure ends the session. */
        let rgb = cam.next_frame()?;
        let mut screen = FrameBuffer::from_rgb(&rgb);

        /* 2) Brush size from the slider (never below 1 px). */
        drawer.poll_brush(&mut brush);
        let brush_px = brush.read();

        /* 3) Find the hand on a contrast-normalised copy; only the first hand counts. */
        let hands = match &clahe {
            Some(clahe) => landmarker.detect(&clahe.apply(&rgb))?,
            None => landmarker.detect(&rgb)?,
        };
        let hand = hands.first();

        /* 4) Gesture → mode → smoothing → wave clear → stroke. */
        let outcome = session.process_frame(hand, screen.width, screen.height, brush_px);
        if outcome.cleared {
            info!("wave detected, canvas cleared");
        }
        if outcome.segment.is_some() {
            segments_this_second += 1;
        }

        /* 5) Skeleton + cursor ring on the camera image.
           Visual: green ring when the index finger is up, grey otherwise. */
        if let Some(hand) = hand {
            draw_hand(&mut screen, hand, BONE, JOINT);
        }
        if let (Some(cursor), Some(fingers)) = (outcome.cursor, outcome.fingers) {
            let ring = if fingers.index { GREEN } else { GREY };
            draw_circle(&mut screen, cursor, brush_px, 2, ring);
        }

        /* 6) Canvas over camera. */
        if let Some(canvas) = session.canvas() {
            blend_weighted(&mut screen, canvas.surface(), FRAME_WEIGHT)?;
        }

        /* 7) HUD: brush size, slider, mode. */
        let x = draw_text_5x7(&mut screen, 10, 10, &format!("BRUSH: {brush_px}PX"), 2, WHITE);
        draw_slider(&mut screen, x + 8, 10, 100, 14, brush.value(), BrushSlider::MAX, WHITE);
        draw_text_5x7(&mut screen, 10, 34, outcome.mode.label(), 2, WHITE);

        /* 8) Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;

        /* 9) FPS counter (logged once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            info!(
                "FPS: {:.1}, segments: {segments_this_second}",
                frames_this_second as f32 / secs
            );
            frames_this_second = 0;
            segments_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("session ended");
    Ok(())
}
