pub mod packet;
pub mod palette;
pub mod transition;
pub mod vram;
