//! 16x16 application icons.

/// Pack 16 rows of 16 pixels (MSB is the leftmost pixel) into the 1bpp
/// layout `Application::icon` expects.
const fn icon(rows: [u16; 16]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < 16 {
        out[i * 2] = (rows[i] >> 8) as u8;
        out[i * 2 + 1] = rows[i] as u8;
        i += 1;
    }
    out
}

pub static NOTES: [u8; 32] = icon([
    0x0000, 0x3FF0, 0x2018, 0x2014, 0x201E, 0x2002, 0x27E2, 0x2002, 0x27E2, 0x2002, 0x27E2,
    0x2002, 0x2002, 0x3FFE, 0x0000, 0x0000,
]);

pub static MUSIC: [u8; 32] = icon([
    0x0000, 0x01FC, 0x01FC, 0x0104, 0x0104, 0x0104, 0x0104, 0x0104, 0x0104, 0x0104, 0x1F04,
    0x3F7C, 0x3EFC, 0x1CFC, 0x0078, 0x0000,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pack_big_endian() {
        let packed = icon([0x8001; 16]);
        assert_eq!(&packed[..2], &[0x80, 0x01]);
        assert_eq!(NOTES[2], 0x3F);
        assert_eq!(NOTES[3], 0xF0);
    }
}
