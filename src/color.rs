// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packed colors.  Every color in this crate is a single `u32` laid
//! out as alpha, red, green, blue from the most significant byte
//! down, eight bits per channel.

/// A packed 0xAARRGGBB color.
pub type Argb = u32;

/// Opaque black.  Interior points are painted this.
pub const BLACK: Argb = 0xff00_0000;
/// Opaque white.
pub const WHITE: Argb = 0xffff_ffff;
/// Opaque red, used for points caught by the period-2 bulb test.
pub const RED: Argb = 0xffff_0000;
/// Opaque yellow, used for points caught by the cardioid test.
pub const YELLOW: Argb = 0xffff_ff00;
/// Opaque cornflower blue, used for points caught by periodicity checking.
pub const CORNFLOWER_BLUE: Argb = 0xff64_95ed;
/// Fully transparent black.  Substituted when a color cannot be resolved.
pub const TRANSPARENT: Argb = 0x0000_0000;

/// Pack four channels into a color.  Only the low eight bits of each
/// channel survive.
#[inline]
pub fn to_argb(alpha: u32, red: u32, green: u32, blue: u32) -> Argb {
    ((alpha & 0xff) << 24) | ((red & 0xff) << 16) | ((green & 0xff) << 8) | (blue & 0xff)
}

/// Pack an opaque color.
#[inline]
pub fn to_rgb(red: u32, green: u32, blue: u32) -> Argb {
    to_argb(255, red, green, blue)
}

/// The alpha channel.
#[inline]
pub fn alpha(argb: Argb) -> u32 {
    (argb >> 24) & 0xff
}

/// The red channel.
#[inline]
pub fn red(argb: Argb) -> u32 {
    (argb >> 16) & 0xff
}

/// The green channel.
#[inline]
pub fn green(argb: Argb) -> u32 {
    (argb >> 8) & 0xff
}

/// The blue channel.
#[inline]
pub fn blue(argb: Argb) -> u32 {
    argb & 0xff
}

/// Unpack into `[alpha, red, green, blue]`.
#[inline]
pub fn channels(argb: Argb) -> [u32; 4] {
    [alpha(argb), red(argb), green(argb), blue(argb)]
}

/// Image encoders want bytes in RGBA order; this flattens a buffer of
/// packed colors into that layout.
pub fn argb_to_rgba_bytes(pixels: &[Argb]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        bytes.push(red(p) as u8);
        bytes.push(green(p) as u8);
        bytes.push(blue(p) as u8);
        bytes.push(alpha(p) as u8);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_puts_alpha_in_the_high_byte() {
        assert_eq!(to_argb(0x12, 0x34, 0x56, 0x78), 0x1234_5678);
        assert_eq!(to_rgb(0, 8, 106), 0xff00_086a);
    }

    #[test]
    fn channels_unpack_what_was_packed() {
        let c = to_argb(1, 2, 3, 4);
        assert_eq!(channels(c), [1, 2, 3, 4]);
        assert_eq!(alpha(CORNFLOWER_BLUE), 255);
        assert_eq!(red(CORNFLOWER_BLUE), 0x64);
    }

    #[test]
    fn oversized_channels_are_masked() {
        assert_eq!(to_argb(0x1ff, 0, 0, 0), 0xff00_0000);
    }

    #[test]
    fn rgba_bytes_reorder_channels() {
        assert_eq!(argb_to_rgba_bytes(&[0x8011_2233]), vec![0x11, 0x22, 0x33, 0x80]);
    }
}
