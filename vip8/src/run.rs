use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Renderer;
use machine::constants::{CLOCK_SPEED, TIMER_RATE};
use machine::Machine;

use crate::keymap::keymap;

/// Wall-clock accounting for the 60Hz timer cadence. Resuming from a
/// pause re-baselines the count so the paused interval never lands as
/// one burst of ticks.
struct TickCounter {
    ticks_done: u32,
}

impl TickCounter {
    fn new() -> Self {
        TickCounter { ticks_done: 0 }
    }

    /// Ticks that have come due since the last call.
    fn due(&mut self, elapsed: Duration) -> u32 {
        let total = Self::total(elapsed);
        let fresh = total.saturating_sub(self.ticks_done);
        self.ticks_done = total;
        fresh
    }

    /// Discard the ticks that accumulated while paused.
    fn resume(&mut self, elapsed: Duration) {
        self.ticks_done = Self::total(elapsed);
    }

    fn total(elapsed: Duration) -> u32 {
        (elapsed.as_secs_f64() * f64::from(TIMER_RATE)) as u32
    }
}

/// The outer loop. Each iteration, in order:
/// - execute at most one instruction (a key wait suspends this)
/// - drain pending input events into the key latches
/// - apply the timer ticks that have come due and, if the frame buffer
///   changed, hand it to the renderer
///
/// `P` pauses and resumes, `Escape` quits. A step failure reports the
/// offending opcode and ends the session.
pub fn run(mut machine: Machine, rom_name: &str) {
    let sdl: sdl2::Sdl = sdl2::init().unwrap();
    let mut renderer = Renderer::new(&sdl, &format!("Vip8 - {}", rom_name));
    let mut events = sdl.event_pump().unwrap();

    let cycle_time: Duration = Duration::new(0, CLOCK_SPEED);
    let mut last_cycle: Instant = Instant::now();

    let start: Instant = Instant::now();
    let mut ticks = TickCounter::new();
    let mut paused: bool = false;

    'event: loop {
        if !paused {
            if let Err(e) = machine.step() {
                eprintln!("machine halted: {}", e);
                break 'event;
            }
        }

        // drain input; a key-down also resolves a pending key wait
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => {
                        machine.set_key(kc, true);
                        if machine.awaiting_key().is_some() {
                            machine.resolve_key(kc);
                        }
                    }
                    (Keycode::P, _) => {
                        paused = !paused;
                        if !paused {
                            ticks.resume(start.elapsed());
                        }
                    }
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match keymap(key) {
                    Some(kc) => machine.set_key(kc, false),
                    None => continue,
                },
                _ => continue,
            };
        }

        // timers run on wall-clock 60ths, decoupled from the CPU rate
        if !paused {
            let due = ticks.due(start.elapsed());
            if due > 0 {
                for _ in 0..due {
                    machine.tick_timers();
                }

                if let Some(frame) = machine.take_frame() {
                    renderer.render(&frame);
                }
            }
        }

        // pace the CPU
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }
}
