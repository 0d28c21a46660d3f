use crate::foundation::core::Rgba8;

pub const SKY_TOP: Rgba8 = Rgba8::hex(0x81d0ef);
pub const SKY_BOTTOM: Rgba8 = Rgba8::hex(0xf8f1d9);
pub const SUN: Rgba8 = Rgba8::hex(0xffd166);
pub const GRASS: Rgba8 = Rgba8::hex(0x87c665);
pub const PATH: Rgba8 = Rgba8::hex(0xd9c3a1);
pub const BARK: Rgba8 = Rgba8::hex(0x7a5135);
pub const FOLIAGE: Rgba8 = Rgba8::hex(0x3e8139);
pub const BENCH_BACKREST: Rgba8 = Rgba8::hex(0x623f28);
pub const SHIRT: Rgba8 = Rgba8::hex(0x4a90e2);
pub const SKIN: Rgba8 = Rgba8::hex(0xf7d794);

pub fn cloud() -> Rgba8 {
    Rgba8::hex(0xffffff).with_alpha(0.85)
}

pub fn bird() -> Rgba8 {
    Rgba8 {
        r: 40,
        g: 44,
        b: 52,
        a: 255,
    }
    .with_alpha(0.8)
}

pub fn label_box() -> Rgba8 {
    Rgba8::hex(0xffffff).with_alpha(0.75)
}

pub fn label_text() -> Rgba8 {
    Rgba8::hex(0x000000).with_alpha(0.6)
}
