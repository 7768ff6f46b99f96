/// Splits packed 4bpp bytes into one sample per byte. The low nibble is the
/// left pixel.
pub fn unpack_nibbles(packed: &[u8]) -> Vec<u8> {
    let mut samples = Vec::with_capacity(packed.len() * 2);
    for &byte in packed {
        samples.push(byte & 0x0F);
        samples.push(byte >> 4);
    }
    samples
}

/// Packs pairs of 4bpp samples into bytes, left pixel in the low nibble.
///
/// Callers validate sample values first; only the low four bits of each
/// sample are kept. An odd trailing sample gets a zero high nibble.
pub fn pack_nibbles(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks(2)
        .map(|pair| {
            let high = pair.get(1).copied().unwrap_or(0);
            (pair[0] & 0x0F) | (high & 0x0F) << 4
        })
        .collect()
}
