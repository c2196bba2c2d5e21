use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// A 440Hz square wave filled into the audio device's sample buffer.
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// The Chip-8 buzzer: a square wave tone that plays while the interpreter's
/// sound timer is nonzero.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    active: bool,
}

impl Beeper {
    /// Opens the default audio playback device.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context to bind the device to
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let spec = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio.open_playback(None, &spec, |spec| SquareWave {
            phase_inc: 440.0 / spec.freq as f32,
            phase: 0.0,
            volume: 0.25,
        })?;
        Ok(Beeper {
            device,
            active: false,
        })
    }

    /// Starts or stops the tone to match the interpreter's sound timer.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.active = active;
    }
}
