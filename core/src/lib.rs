pub use cpu::{Chip8, KeyWait};
pub use error::Chip8Error;
pub use framebuffer::FrameBuffer;
pub use timer::Timers;

mod bits;
pub mod constants;
mod cpu;
mod error;
mod framebuffer;
mod opcode;
mod operations;
pub mod state;
mod timer;
