use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vip8_core::{Chip8, KeyWait};
use vip8_display::Display;

use crate::keymap::keymap;
use crate::sound::Beeper;
use crate::Args;

/// Wall-clock length of one pass of the run loop.
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Drives the interpreter at 60 frames per second until quit.
///
/// Each frame polls input, executes a batch of CPU cycles, renders the frame
/// buffer if it changed, and mirrors the sound timer onto the beeper.
pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::new();
    if args.wait_key {
        chip8.set_key_wait(KeyWait::Block);
    }

    let file = File::open(&args.rom)?;
    let mut reader = BufReader::new(file);
    let loaded = chip8.load_rom(&mut reader)?;
    log::info!("loaded {loaded} byte ROM from {}", args.rom.display());

    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, args.scale, args.fullscreen)?;
    let mut events = sdl.event_pump()?;

    let mut beeper = match Beeper::new(&sdl) {
        Ok(beeper) => Some(beeper),
        Err(e) => {
            log::warn!("audio disabled: {e}");
            None
        }
    };

    'frame: loop {
        let frame_start = Instant::now();

        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'frame,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc);
                    }
                }
                _ => continue,
            }
        }

        for _ in 0..args.cycles {
            chip8.step()?;
        }

        // repaint only when the interpreter reports a changed frame
        if let Some(frame) = chip8.frame() {
            display.render(frame)?;
            chip8.clear_draw_flag();
        }

        if let Some(beeper) = &mut beeper {
            beeper.set_active(chip8.sound_active());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}
